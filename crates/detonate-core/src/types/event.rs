//! Change events derived from a snapshot diff.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::snapshot::{ProcessIdentity, Protocol};

/// Kind of filesystem change. Only creation is observable from a
/// set difference of paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileEventKind {
    FileCreated,
}

/// A file that exists after execution but did not before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemEvent {
    #[serde(rename = "type")]
    pub kind: FileEventKind,
    pub path: PathBuf,
    pub observed_at: DateTime<Utc>,
}

/// A process that is running after execution but was not before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEvent {
    pub pid: i32,
    pub name: String,
    /// Command line read at detection time; empty when unavailable.
    pub cmdline: Vec<String>,
    pub observed_at: DateTime<Utc>,
}

impl ProcessEvent {
    pub fn identity(&self) -> ProcessIdentity {
        ProcessIdentity::new(self.pid, self.name.clone())
    }
}

/// A socket that is open after execution but was not before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEvent {
    pub protocol: Protocol,
    pub local: String,
    pub remote: String,
    pub observed_at: DateTime<Utc>,
}
