//! Snapshot -- point-in-time view of files, processes, and sockets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Identity of a running process.
///
/// The pair is used rather than the pid alone so that a pid recycled by
/// a differently named process between two snapshots still shows up as
/// new. A pid recycled by a process with the same name does not.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessIdentity {
    /// Process ID
    pub pid: i32,
    /// Process name (comm)
    pub name: String,
}

impl ProcessIdentity {
    pub fn new(pid: i32, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
        }
    }
}

impl fmt::Display for ProcessIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.pid)
    }
}

/// Transport protocol of a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Udp => write!(f, "udp"),
        }
    }
}

/// Identity of an open socket. Connection state is deliberately left out
/// so a socket moving from SYN_SENT to ESTABLISHED is not counted twice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SocketIdentity {
    pub protocol: Protocol,
    pub local: SocketAddr,
    pub remote: SocketAddr,
}

/// Immutable capture of system state at one instant.
///
/// Fields are private: once built a snapshot cannot be changed, only read
/// and compared against another snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    captured_at: DateTime<Utc>,
    files: BTreeSet<PathBuf>,
    processes: BTreeSet<ProcessIdentity>,
    sockets: BTreeSet<SocketIdentity>,
}

impl Snapshot {
    /// Build a snapshot stamped with the current time.
    pub fn new(
        files: BTreeSet<PathBuf>,
        processes: BTreeSet<ProcessIdentity>,
        sockets: BTreeSet<SocketIdentity>,
    ) -> Self {
        Self::at(Utc::now(), files, processes, sockets)
    }

    /// Build a snapshot with an explicit capture time.
    pub fn at(
        captured_at: DateTime<Utc>,
        files: BTreeSet<PathBuf>,
        processes: BTreeSet<ProcessIdentity>,
        sockets: BTreeSet<SocketIdentity>,
    ) -> Self {
        Self {
            captured_at,
            files,
            processes,
            sockets,
        }
    }

    pub const fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub const fn files(&self) -> &BTreeSet<PathBuf> {
        &self.files
    }

    pub const fn processes(&self) -> &BTreeSet<ProcessIdentity> {
        &self.processes
    }

    pub const fn sockets(&self) -> &BTreeSet<SocketIdentity> {
        &self.sockets
    }
}
