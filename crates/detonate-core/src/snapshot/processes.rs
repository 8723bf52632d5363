//! Process enumeration via `/proc`.

use std::collections::BTreeSet;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::types::ProcessIdentity;

/// Enumerate running processes as (pid, name) identities.
///
/// Processes that exit during enumeration or deny access are skipped.
///
/// # Errors
///
/// Returns `AnalysisError::Procfs` if `/proc` cannot be listed at all.
pub fn capture_processes() -> Result<BTreeSet<ProcessIdentity>> {
    let all_procs =
        procfs::process::all_processes().map_err(|e| AnalysisError::Procfs(e.to_string()))?;

    let mut processes = BTreeSet::new();
    for entry in all_procs {
        let proc = match entry {
            Ok(p) => p,
            Err(e) => {
                debug!(error = %e, "skipping inaccessible process");
                continue;
            }
        };

        match proc.stat() {
            Ok(stat) => {
                processes.insert(ProcessIdentity::new(stat.pid, stat.comm));
            }
            Err(e) => {
                debug!(pid = proc.pid(), error = %e, "skipping process");
            }
        }
    }

    Ok(processes)
}

/// Read the command line of `pid`.
///
/// Empty when the process has exited, is a kernel thread, or cannot be read.
pub fn command_line(pid: i32) -> Vec<String> {
    procfs::process::Process::new(pid)
        .and_then(|p| p.cmdline())
        .unwrap_or_else(|e| {
            debug!(pid, error = %e, "command line unavailable");
            Vec::new()
        })
}
