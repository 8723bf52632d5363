//! Suspicion signals -- heuristic matches against new processes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::snapshot::ProcessIdentity;

/// Category of risky tooling a keyword belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// Interactive remote shells and raw socket tools
    RemoteAccess,
    /// Download / upload utilities
    NetworkTransfer,
    /// File deletion and disk wiping
    Destructive,
    /// Operator-defined category from a config file
    #[serde(untagged)]
    Custom(String),
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteAccess => write!(f, "remote_access"),
            Self::NetworkTransfer => write!(f, "network_transfer"),
            Self::Destructive => write!(f, "destructive"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// One keyword hit on one new process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspicionSignal {
    pub category: RiskCategory,
    pub keyword: String,
    /// Score contribution of this signal
    pub weight: u32,
    /// The process event that triggered the match
    pub process: ProcessIdentity,
}
