//! Change detection -- set difference between two snapshots.
//!
//! Only additions are observable: paths, processes, and sockets present
//! after execution but not before. Deletions and in-place modifications
//! are out of reach of a path/identity set and are not reported.

use serde::{Deserialize, Serialize};

use crate::snapshot::StateProbe;
use crate::types::{FileEventKind, FileSystemEvent, NetworkEvent, ProcessEvent, Snapshot};

/// Everything new in `post` relative to `pre`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub file_events: Vec<FileSystemEvent>,
    pub process_events: Vec<ProcessEvent>,
    pub network_events: Vec<NetworkEvent>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.file_events.is_empty()
            && self.process_events.is_empty()
            && self.network_events.is_empty()
    }
}

/// Compute the delta between `pre` and `post`.
///
/// Events are stamped with the post snapshot's capture time. Command lines
/// of new processes are read through `probe` now, at detection time, and
/// are empty for processes that have already gone.
pub fn diff<P>(pre: &Snapshot, post: &Snapshot, probe: &P) -> ChangeSet
where
    P: StateProbe + ?Sized,
{
    let observed_at = post.captured_at();

    let file_events = post
        .files()
        .difference(pre.files())
        .map(|path| FileSystemEvent {
            kind: FileEventKind::FileCreated,
            path: path.clone(),
            observed_at,
        })
        .collect();

    let process_events = post
        .processes()
        .difference(pre.processes())
        .map(|identity| ProcessEvent {
            pid: identity.pid,
            name: identity.name.clone(),
            cmdline: probe.command_line(identity.pid),
            observed_at,
        })
        .collect();

    let network_events = post
        .sockets()
        .difference(pre.sockets())
        .map(|socket| NetworkEvent {
            protocol: socket.protocol,
            local: socket.local.to_string(),
            remote: socket.remote.to_string(),
            observed_at,
        })
        .collect();

    ChangeSet {
        file_events,
        process_events,
        network_events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::types::{ProcessIdentity, Protocol, SocketIdentity};
    use std::collections::{BTreeMap, BTreeSet};
    use std::path::{Path, PathBuf};

    /// Probe that only answers command-line lookups.
    struct Cmdlines(BTreeMap<i32, Vec<String>>);

    impl StateProbe for Cmdlines {
        fn capture_files(&self, _root: &Path) -> BTreeSet<PathBuf> {
            BTreeSet::new()
        }
        fn capture_processes(&self) -> Result<BTreeSet<ProcessIdentity>> {
            Ok(BTreeSet::new())
        }
        fn capture_sockets(&self) -> BTreeSet<SocketIdentity> {
            BTreeSet::new()
        }
        fn command_line(&self, pid: i32) -> Vec<String> {
            self.0.get(&pid).cloned().unwrap_or_default()
        }
    }

    fn no_cmdlines() -> Cmdlines {
        Cmdlines(BTreeMap::new())
    }

    fn snap(files: &[&str], procs: &[(i32, &str)]) -> Snapshot {
        Snapshot::new(
            files.iter().map(PathBuf::from).collect(),
            procs
                .iter()
                .map(|(pid, name)| ProcessIdentity::new(*pid, *name))
                .collect(),
            BTreeSet::new(),
        )
    }

    #[test]
    fn file_events_are_exactly_the_new_paths() {
        let pre = snap(&["/sandbox/input/a.py", "/sandbox/old"], &[]);
        let post = snap(&["/sandbox/input/a.py", "/sandbox/new1", "/sandbox/new2"], &[]);

        let changes = diff(&pre, &post, &no_cmdlines());

        let paths: Vec<_> = changes.file_events.iter().map(|e| e.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("/sandbox/new1"), PathBuf::from("/sandbox/new2")]
        );
        assert!(changes
            .file_events
            .iter()
            .all(|e| e.kind == FileEventKind::FileCreated && e.observed_at == post.captured_at()));
    }

    #[test]
    fn deletions_are_not_reported() {
        let pre = snap(&["/sandbox/gone"], &[(1, "init"), (50, "victim")]);
        let post = snap(&[], &[(1, "init")]);

        assert!(diff(&pre, &post, &no_cmdlines()).is_empty());
    }

    #[test]
    fn identical_snapshots_give_no_events() {
        let a = snap(&["/sandbox/x"], &[(1, "init"), (7, "sh")]);
        let b = snap(&["/sandbox/x"], &[(1, "init"), (7, "sh")]);

        assert!(diff(&a, &b, &no_cmdlines()).is_empty());
        assert!(diff(&a, &a, &no_cmdlines()).is_empty());
    }

    #[test]
    fn process_identity_includes_name() {
        let pre = snap(&[], &[(1, "init"), (42, "bash")]);
        let post = snap(&[], &[(1, "init"), (42, "curl")]);

        let changes = diff(&pre, &post, &no_cmdlines());

        assert_eq!(changes.process_events.len(), 1);
        assert_eq!(changes.process_events[0].pid, 42);
        assert_eq!(changes.process_events[0].name, "curl");
    }

    #[test]
    fn reused_pid_with_same_name_is_invisible() {
        let pre = snap(&[], &[(42, "sh")]);
        let post = snap(&[], &[(42, "sh")]);
        assert!(diff(&pre, &post, &no_cmdlines()).process_events.is_empty());
    }

    #[test]
    fn command_lines_are_read_best_effort() {
        let pre = snap(&[], &[(1, "init")]);
        let post = snap(&[], &[(1, "init"), (100, "wget"), (101, "sleep")]);
        let probe = Cmdlines(BTreeMap::from([(
            100,
            vec!["wget".to_string(), "http://example.test/x".to_string()],
        )]));

        let changes = diff(&pre, &post, &probe);

        assert_eq!(changes.process_events.len(), 2);
        assert_eq!(
            changes.process_events[0].cmdline,
            vec!["wget", "http://example.test/x"]
        );
        assert!(changes.process_events[1].cmdline.is_empty());
    }

    #[test]
    fn new_sockets_become_network_events() {
        let listener = SocketIdentity {
            protocol: Protocol::Tcp,
            local: "0.0.0.0:22".parse().unwrap(),
            remote: "0.0.0.0:0".parse().unwrap(),
        };
        let outbound = SocketIdentity {
            protocol: Protocol::Tcp,
            local: "10.0.0.2:40000".parse().unwrap(),
            remote: "203.0.113.9:443".parse().unwrap(),
        };
        let pre = Snapshot::new(
            BTreeSet::new(),
            BTreeSet::new(),
            BTreeSet::from([listener.clone()]),
        );
        let post = Snapshot::new(
            BTreeSet::new(),
            BTreeSet::new(),
            BTreeSet::from([listener, outbound]),
        );

        let changes = diff(&pre, &post, &no_cmdlines());

        assert_eq!(changes.network_events.len(), 1);
        assert_eq!(changes.network_events[0].remote, "203.0.113.9:443");
        assert_eq!(changes.network_events[0].protocol, Protocol::Tcp);
    }
}
