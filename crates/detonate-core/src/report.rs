//! Result reporting -- assemble, persist, and print the final report.

use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

use crate::diff::ChangeSet;
use crate::error::{AnalysisError, Result};
use crate::types::{AnalysisReport, ExecutionRecord, SuspicionSignal, Verdict};

/// Facts about the run that are known before anything is observed.
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub host_id: String,
    pub started_at: DateTime<Utc>,
}

impl RunInfo {
    /// Stamp a run starting now on this host.
    pub fn start() -> Self {
        Self {
            host_id: host_id(),
            started_at: Utc::now(),
        }
    }
}

/// Assemble the report from the outputs of every pipeline step.
pub fn build(
    run: RunInfo,
    execution: Option<ExecutionRecord>,
    changes: ChangeSet,
    signals: Vec<SuspicionSignal>,
    risk_score: u32,
    verdict: Verdict,
) -> AnalysisReport {
    AnalysisReport {
        host_id: run.host_id,
        started_at: run.started_at,
        finished_at: Utc::now(),
        target: execution.as_ref().map(|e| e.target.clone()),
        execution,
        file_events: changes.file_events,
        process_events: changes.process_events,
        network_events: changes.network_events,
        signals,
        risk_score,
        verdict,
        error: None,
    }
}

/// Pretty JSON rendering of a report.
pub fn render_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write the report to `output_path`, creating parent directories.
pub fn write_report(report: &AnalysisReport, output_path: &Path) -> Result<()> {
    let path_str = output_path.display().to_string();
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AnalysisError::io(&path_str, e))?;
    }
    let json = render_json(report)?;
    std::fs::write(output_path, json).map_err(|e| AnalysisError::io(&path_str, e))
}

/// Persist the report, degrading it to `ERROR` if that fails.
pub fn persist(report: AnalysisReport, output_path: &Path) -> AnalysisReport {
    match write_report(&report, output_path) {
        Ok(()) => {
            info!(path = %output_path.display(), "report written");
            report
        }
        Err(e) => {
            error!(path = %output_path.display(), error = %e, "failed to write report");
            report.into_error(e)
        }
    }
}

/// Persist the report, print it as JSON on `out`, and return the exit
/// status for the process.
pub fn emit<W: Write>(report: AnalysisReport, output_path: &Path, out: &mut W) -> u8 {
    let report = persist(report, output_path);
    match render_json(&report) {
        Ok(json) => {
            if let Err(e) = writeln!(out, "{json}") {
                error!(error = %e, "failed to print report");
            }
        }
        Err(e) => error!(error = %e, "failed to render report"),
    }
    report.exit_code()
}

/// Stable identifier for the host the run happens on.
///
/// Container runtimes set `HOSTNAME` to the container id, so that comes
/// first.
pub fn host_id() -> String {
    if let Ok(name) = std::env::var("HOSTNAME") {
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    hostname::get().map_or_else(
        |_| "unknown".to_string(),
        |h| h.to_string_lossy().into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DispatchKind, FileEventKind, FileSystemEvent};
    use std::path::PathBuf;

    fn sample() -> AnalysisReport {
        let execution = ExecutionRecord::new(PathBuf::from("/sandbox/input/a.py"), DispatchKind::Interpreter);
        let changes = ChangeSet {
            file_events: vec![FileSystemEvent {
                kind: FileEventKind::FileCreated,
                path: PathBuf::from("/sandbox/out.txt"),
                observed_at: Utc::now(),
            }],
            ..ChangeSet::default()
        };
        build(
            RunInfo {
                host_id: "box-1".into(),
                started_at: Utc::now(),
            },
            Some(execution),
            changes,
            Vec::new(),
            5,
            Verdict::Clean,
        )
    }

    #[test]
    fn build_carries_target_and_events() {
        let report = sample();
        assert_eq!(report.target, Some(PathBuf::from("/sandbox/input/a.py")));
        assert_eq!(report.file_events.len(), 1);
        assert_eq!(report.risk_score, 5);
        assert_eq!(report.verdict, Verdict::Clean);
        assert!(report.error.is_none());
        assert!(report.finished_at >= report.started_at);
    }

    #[test]
    fn json_field_names() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["verdict"], "CLEAN");
        assert_eq!(value["risk_score"], 5);
        assert_eq!(value["file_events"][0]["type"], "file_created");
        assert_eq!(value["execution"]["dispatch"], "interpreter");
        assert_eq!(value["host_id"], "box-1");
    }

    #[test]
    fn emit_writes_file_and_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("report.json");
        let mut out = Vec::new();

        let code = emit(sample(), &path, &mut out);

        assert_eq!(code, 0);
        let written: AnalysisReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.verdict, Verdict::Clean);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("\"verdict\": \"CLEAN\""));
    }

    #[test]
    fn unwritable_output_degrades_to_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is needed.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let mut out = Vec::new();

        let code = emit(sample(), &blocker.join("report.json"), &mut out);

        assert_eq!(code, Verdict::Error.exit_code());
        let printed: AnalysisReport = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed.verdict, Verdict::Error);
        assert!(printed.error.is_some());
        assert_eq!(printed.file_events.len(), 1);
    }
}
