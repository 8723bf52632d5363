//! Core types for the analysis pipeline.

pub mod event;
pub mod execution;
pub mod report;
pub mod signal;
pub mod snapshot;

pub use event::{FileEventKind, FileSystemEvent, NetworkEvent, ProcessEvent};
pub use execution::{CapturedOutput, DispatchKind, ExecutionRecord};
pub use report::{AnalysisReport, Verdict};
pub use signal::{RiskCategory, SuspicionSignal};
pub use snapshot::{ProcessIdentity, Protocol, Snapshot, SocketIdentity};
