//! Analysis report -- the terminal artifact of a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::event::{FileSystemEvent, NetworkEvent, ProcessEvent};
use super::execution::ExecutionRecord;
use super::signal::SuspicionSignal;

/// Score below which a run is clean.
pub const SUSPICIOUS_THRESHOLD: u32 = 20;

/// Score at or above which a run is classified as malware.
pub const MALWARE_THRESHOLD: u32 = 50;

/// Final classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Clean,
    Suspicious,
    Malware,
    /// The pipeline itself failed; the score carries no meaning
    Error,
}

impl Verdict {
    /// Classify a score. Lower bounds are inclusive.
    pub const fn from_score(score: u32) -> Self {
        if score >= MALWARE_THRESHOLD {
            Self::Malware
        } else if score >= SUSPICIOUS_THRESHOLD {
            Self::Suspicious
        } else {
            Self::Clean
        }
    }

    /// Process exit status for this verdict.
    ///
    /// `1` and `2` mean the run completed with a bad verdict; `3` means
    /// the pipeline failed.
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Clean => 0,
            Self::Malware => 1,
            Self::Suspicious => 2,
            Self::Error => 3,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => write!(f, "CLEAN"),
            Self::Suspicious => write!(f, "SUSPICIOUS"),
            Self::Malware => write!(f, "MALWARE"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Complete result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Host (container) the run happened on
    pub host_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// File selected for execution, if any
    pub target: Option<PathBuf>,
    pub execution: Option<ExecutionRecord>,
    pub file_events: Vec<FileSystemEvent>,
    pub process_events: Vec<ProcessEvent>,
    /// Reported but not scored
    pub network_events: Vec<NetworkEvent>,
    pub signals: Vec<SuspicionSignal>,
    pub risk_score: u32,
    pub verdict: Verdict,
    /// Set when `verdict` is `ERROR`
    pub error: Option<String>,
}

impl AnalysisReport {
    /// Report for a run whose pipeline failed before producing results.
    pub fn failed(host_id: String, started_at: DateTime<Utc>, error: impl fmt::Display) -> Self {
        Self {
            host_id,
            started_at,
            finished_at: Utc::now(),
            target: None,
            execution: None,
            file_events: Vec::new(),
            process_events: Vec::new(),
            network_events: Vec::new(),
            signals: Vec::new(),
            risk_score: 0,
            verdict: Verdict::Error,
            error: Some(error.to_string()),
        }
    }

    /// Attach the execution that already happened when a later step failed.
    #[must_use]
    pub fn with_execution(self, execution: Option<ExecutionRecord>) -> Self {
        Self {
            target: execution.as_ref().map(|e| e.target.clone()),
            execution,
            ..self
        }
    }

    /// Turn this report into an `ERROR` report, keeping what was observed.
    ///
    /// Used when a step after assembly (persisting the report) fails.
    #[must_use]
    pub fn into_error(self, error: impl fmt::Display) -> Self {
        Self {
            verdict: Verdict::Error,
            error: Some(error.to_string()),
            finished_at: Utc::now(),
            ..self
        }
    }

    /// Exit status callers should see for this report.
    pub const fn exit_code(&self) -> u8 {
        self.verdict.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_boundaries() {
        assert_eq!(Verdict::from_score(0), Verdict::Clean);
        assert_eq!(Verdict::from_score(19), Verdict::Clean);
        assert_eq!(Verdict::from_score(20), Verdict::Suspicious);
        assert_eq!(Verdict::from_score(49), Verdict::Suspicious);
        assert_eq!(Verdict::from_score(50), Verdict::Malware);
        assert_eq!(Verdict::from_score(u32::MAX), Verdict::Malware);
    }

    #[test]
    fn exit_codes_are_distinct() {
        assert_eq!(Verdict::Clean.exit_code(), 0);
        assert_eq!(Verdict::Malware.exit_code(), 1);
        assert_eq!(Verdict::Suspicious.exit_code(), 2);
        let error = Verdict::Error.exit_code();
        assert!(error != 0 && error != 1 && error != 2);
    }

    #[test]
    fn verdict_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&Verdict::Suspicious).unwrap(),
            "\"SUSPICIOUS\""
        );
    }

    #[test]
    fn failed_report_is_error() {
        let report = AnalysisReport::failed("box".into(), Utc::now(), "boom");
        assert_eq!(report.verdict, Verdict::Error);
        assert_eq!(report.error.as_deref(), Some("boom"));
        assert_eq!(report.risk_score, 0);
        assert_eq!(report.exit_code(), 3);
    }
}
