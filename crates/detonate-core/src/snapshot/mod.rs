//! State snapshotting -- files under a root, running processes, sockets.
//!
//! Every enumeration here is best-effort. A path that vanishes mid-walk or
//! a process that exits while it is being read is skipped and logged at
//! `debug`; it never fails the capture. The only hard failure is the
//! process table being unreadable as a whole.

pub mod files;
pub mod network;
pub mod processes;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::types::{ProcessIdentity, Snapshot, SocketIdentity};

pub use files::capture_files;
pub use network::capture_sockets;
pub use processes::{capture_processes, command_line};

/// Source of system state.
///
/// The pipeline captures through this trait twice per run, so the pre and
/// post snapshots always come from the same enumeration logic.
pub trait StateProbe {
    /// Every non-directory entry below `root`.
    fn capture_files(&self, root: &Path) -> BTreeSet<PathBuf>;

    /// Every readable process as (pid, name).
    fn capture_processes(&self) -> Result<BTreeSet<ProcessIdentity>>;

    /// Every readable TCP/UDP socket.
    fn capture_sockets(&self) -> BTreeSet<SocketIdentity>;

    /// Command line of `pid`, empty if it cannot be read.
    fn command_line(&self, pid: i32) -> Vec<String>;

    /// Capture a full snapshot.
    fn capture(&self, root: &Path) -> Result<Snapshot> {
        let files = self.capture_files(root);
        let processes = self.capture_processes()?;
        let sockets = self.capture_sockets();
        debug!(
            files = files.len(),
            processes = processes.len(),
            sockets = sockets.len(),
            "snapshot captured"
        );
        Ok(Snapshot::new(files, processes, sockets))
    }
}

/// Probe backed by the live filesystem and `/proc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl StateProbe for SystemProbe {
    fn capture_files(&self, root: &Path) -> BTreeSet<PathBuf> {
        files::capture_files(root)
    }

    fn capture_processes(&self) -> Result<BTreeSet<ProcessIdentity>> {
        processes::capture_processes()
    }

    fn capture_sockets(&self) -> BTreeSet<SocketIdentity> {
        network::capture_sockets()
    }

    fn command_line(&self, pid: i32) -> Vec<String> {
        processes::command_line(pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_probe_captures_own_process_and_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();

        let snapshot = SystemProbe.capture(dir.path()).unwrap();

        assert!(snapshot.files().contains(&dir.path().join("a.txt")));
        #[allow(clippy::cast_possible_wrap)]
        let own_pid = std::process::id() as i32;
        assert!(snapshot.processes().iter().any(|p| p.pid == own_pid));
    }
}
