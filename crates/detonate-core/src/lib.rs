//! # detonate-core
//!
//! Behavioral triage of a single untrusted file. The file is executed
//! inside an environment that is already isolated by the host; this crate
//! only observes what the execution changed and scores it.
//!
//! ## Pipeline
//!
//! ```text
//! StateProbe::capture()        pre snapshot (files, processes, sockets)
//!   -> select_target()         first regular file in the input dir
//!   -> ExecutionRunner         interpreter / text / binary, with deadline
//!   -> settle delay
//!   -> StateProbe::capture()   post snapshot
//!   -> diff()                  new files, processes, sockets
//!   -> score_signals()         keyword rule table
//!   -> aggregate() + classify()
//!   -> report::build()         AnalysisReport
//! ```
//!
//! A deadline expiry is a normal outcome. Enumeration faults are skipped.
//! Anything else that escapes the pipeline becomes an `ERROR` verdict with
//! its own exit status.

pub mod config;
pub mod diff;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod scoring;
pub mod snapshot;
pub mod types;

pub use config::AnalyzerConfig;
pub use diff::ChangeSet;
pub use error::{AnalysisError, Result};
pub use pipeline::Analyzer;
pub use snapshot::{StateProbe, SystemProbe};
pub use types::*;

/// Analyze with `config` against the live system.
pub async fn analyze(config: AnalyzerConfig) -> AnalysisReport {
    Analyzer::new(config).run().await
}
