//! Output formatting for reports and rule tables.

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use detonate_core::scoring::RiskRule;
use detonate_core::{AnalysisReport, ExecutionRecord, Verdict};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON (the same document written to the output path)
    #[default]
    Json,
    /// Human-readable summary with colors
    Pretty,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Pretty => write!(f, "pretty"),
        }
    }
}

fn verdict_label(verdict: Verdict) -> ColoredString {
    let text = verdict.to_string();
    match verdict {
        Verdict::Clean => text.bright_green().bold(),
        Verdict::Suspicious => text.bright_yellow().bold(),
        Verdict::Malware => text.bright_red().bold(),
        Verdict::Error => text.red().bold().reversed(),
    }
}

fn describe_execution(exec: &ExecutionRecord) -> String {
    let outcome = if exec.timed_out {
        "timed out".bright_yellow().to_string()
    } else if let Some(err) = &exec.error {
        format!("failed: {err}").bright_red().to_string()
    } else if let Some(len) = exec.content_length {
        format!("read {len} chars")
    } else {
        match (exec.exit_code, exec.signal) {
            (Some(code), _) => format!("exit {code}"),
            (None, Some(sig)) => format!("signal {sig}"),
            (None, None) => "no status".to_string(),
        }
    };
    format!("{} ({outcome}, {} ms)", exec.dispatch, exec.elapsed_ms)
}

/// Render a report as a human-readable summary.
pub fn render_pretty(report: &AnalysisReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "  {} {} {}",
        "Verdict:".dimmed(),
        verdict_label(report.verdict),
        format!("(score {})", report.risk_score).dimmed()
    );
    let _ = writeln!(out, "  {} {}", "Host:   ".dimmed(), report.host_id);

    match (&report.target, &report.execution) {
        (Some(target), Some(exec)) => {
            let _ = writeln!(
                out,
                "  {} {} {}",
                "Target: ".dimmed(),
                target.display().to_string().bright_white(),
                describe_execution(exec).dimmed()
            );
        }
        _ => {
            let _ = writeln!(out, "  {} {}", "Target: ".dimmed(), "none".dimmed());
        }
    }

    if let Some(err) = &report.error {
        let _ = writeln!(out, "  {} {}", "Error:  ".dimmed(), err.bright_red());
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {} files created",
        report.file_events.len().to_string().bright_white()
    );
    for event in &report.file_events {
        let _ = writeln!(out, "    {}", event.path.display());
    }

    let _ = writeln!(
        out,
        "  {} processes created",
        report.process_events.len().to_string().bright_white()
    );
    for event in &report.process_events {
        let _ = writeln!(
            out,
            "    {:>7}  {}  {}",
            event.pid.to_string().dimmed(),
            event.name.bright_white(),
            event.cmdline.join(" ").dimmed()
        );
    }

    let _ = writeln!(
        out,
        "  {} sockets opened",
        report.network_events.len().to_string().bright_white()
    );
    for event in &report.network_events {
        let _ = writeln!(
            out,
            "    {} {} -> {}",
            event.protocol,
            event.local,
            event.remote
        );
    }

    let _ = writeln!(
        out,
        "  {} signals",
        report.signals.len().to_string().bright_white()
    );
    for signal in &report.signals {
        let _ = writeln!(
            out,
            "    {} {} {} {}",
            format!("+{:<3}", signal.weight).bright_red(),
            signal.category.to_string().bright_yellow(),
            signal.keyword.bright_white(),
            format!("in {}", signal.process).dimmed()
        );
    }

    out
}

/// Render the rule table as aligned text.
pub fn render_rules(rules: &[RiskRule]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<20} {:>6}  {}",
        "CATEGORY".dimmed(),
        "WEIGHT".dimmed(),
        "KEYWORDS".dimmed()
    );
    for rule in rules {
        let _ = writeln!(
            out,
            "  {:<20} {:>6}  {}",
            rule.category.to_string().bright_white(),
            rule.weight,
            rule.keywords.join(", ")
        );
    }
    out
}
