//! The analysis pipeline.
//!
//! ```text
//! snapshot -> execute -> settle -> snapshot -> diff -> score -> report
//! ```
//!
//! Each step consumes the previous step's output and returns a new value;
//! nothing is shared or mutated across steps.

use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{error, info, warn};

use crate::config::AnalyzerConfig;
use crate::diff::diff;
use crate::error::{AnalysisError, Result};
use crate::report::{self, RunInfo};
use crate::runner::{select_target, ExecutionRunner};
use crate::scoring::{aggregate, classify, score_signals};
use crate::snapshot::{StateProbe, SystemProbe};
use crate::types::{AnalysisReport, ExecutionRecord};

/// Runs one analysis end to end.
#[derive(Debug)]
pub struct Analyzer<P = SystemProbe> {
    config: AnalyzerConfig,
    probe: P,
    runner: ExecutionRunner,
}

impl Analyzer<SystemProbe> {
    /// Analyzer observing the live system.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_probe(config, SystemProbe)
    }
}

impl<P: StateProbe> Analyzer<P> {
    pub fn with_probe(config: AnalyzerConfig, probe: P) -> Self {
        let runner = ExecutionRunner::new(&config);
        Self {
            config,
            probe,
            runner,
        }
    }

    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Run the pipeline. Always returns a report.
    ///
    /// Any error or panic escaping the pipeline yields an `ERROR` report
    /// carrying the failure message and, if the target already ran, its
    /// execution record.
    pub async fn run(&self) -> AnalysisReport {
        let run = RunInfo::start();
        info!(host = %run.host_id, "starting analysis");

        let mut execution = None;
        let outcome = AssertUnwindSafe(self.try_run(run.clone(), &mut execution))
            .catch_unwind()
            .await;

        let e = match outcome {
            Ok(Ok(report)) => return report,
            Ok(Err(e)) => e,
            Err(panic) => AnalysisError::Panicked(panic_message(panic.as_ref())),
        };
        error!(error = %e, executed = execution.is_some(), "analysis failed");
        AnalysisReport::failed(run.host_id, run.started_at, e).with_execution(execution)
    }

    /// `execution` is filled in as soon as the target has run so a later
    /// failure can still report it.
    async fn try_run(
        &self,
        run: RunInfo,
        execution: &mut Option<ExecutionRecord>,
    ) -> Result<AnalysisReport> {
        let root = &self.config.watch_root;

        let pre = self.probe.capture(root)?;
        info!(
            files = pre.files().len(),
            processes = pre.processes().len(),
            "initial state captured"
        );

        *execution = match select_target(&self.config.input_dir) {
            Some(target) => Some(self.runner.execute(&target).await),
            None => {
                warn!(
                    path = %self.config.input_dir.display(),
                    "no target file found in input directory"
                );
                None
            }
        };

        // Give delayed side effects (detached grandchildren) time to show.
        tokio::time::sleep(self.config.settle_delay()).await;

        let post = self.probe.capture(root)?;
        let changes = diff(&pre, &post, &self.probe);
        info!(
            files_created = changes.file_events.len(),
            processes_created = changes.process_events.len(),
            sockets_opened = changes.network_events.len(),
            "changes detected"
        );

        let signals = score_signals(&changes.process_events, &self.config.rules);
        let score = aggregate(
            &changes.file_events,
            &changes.process_events,
            &signals,
            &self.config.weights,
        );
        let verdict = classify(score);
        info!(score, %verdict, signals = signals.len(), "analysis complete");

        Ok(report::build(
            run,
            execution.take(),
            changes,
            signals,
            score,
            verdict,
        ))
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
