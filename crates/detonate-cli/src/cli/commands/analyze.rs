//! Analyze command implementation -- the full pipeline.

use chrono::Utc;
use std::io::Write;

use detonate_core::report::{emit, host_id, persist};
use detonate_core::{Analyzer, AnalysisReport, AnalyzerConfig};

use crate::cli::args::AnalyzeArgs;
use crate::output::{render_pretty, OutputFormat};

use super::Context;

/// Execute the analyze command and return the process exit status.
pub async fn execute(ctx: &Context, args: AnalyzeArgs) -> u8 {
    let started_at = Utc::now();

    let (config, report) = match ctx.load_config() {
        Ok(config) => {
            let config = apply_overrides(config, &args);
            let report = Analyzer::new(config.clone()).run().await;
            (config, report)
        }
        Err(e) => {
            tracing::error!(path = %ctx.config_path().display(), error = %e, "failed to load config");
            let config = apply_overrides(AnalyzerConfig::default(), &args);
            (config, AnalysisReport::failed(host_id(), started_at, e))
        }
    };

    let mut stdout = std::io::stdout().lock();
    match ctx.output_format {
        OutputFormat::Json => emit(report, &config.output_path, &mut stdout),
        OutputFormat::Pretty => {
            let report = persist(report, &config.output_path);
            print_pretty(&report, &mut stdout)
        }
    }
}

/// Print the summary on `out`. A broken stdout is logged, not fatal.
fn print_pretty<W: Write>(report: &AnalysisReport, out: &mut W) -> u8 {
    if let Err(e) = write!(out, "{}", render_pretty(report)) {
        tracing::error!(error = %e, "failed to print report");
    }
    report.exit_code()
}

/// Command-line values win over the config file.
fn apply_overrides(mut config: AnalyzerConfig, args: &AnalyzeArgs) -> AnalyzerConfig {
    if let Some(dir) = &args.input_dir {
        config.input_dir.clone_from(dir);
    }
    if let Some(root) = &args.watch_root {
        config.watch_root.clone_from(root);
    }
    if let Some(path) = &args.output {
        config.output_path.clone_from(path);
    }
    if let Some(secs) = args.timeout {
        config.timeout_secs = secs;
    }
    if let Some(ms) = args.settle_ms {
        config.settle_delay_ms = ms;
    }
    config
}
