//! Socket enumeration via `/proc/net`.

use std::collections::BTreeSet;
use tracing::debug;

use crate::types::{Protocol, SocketIdentity};

/// Collect TCP and UDP sockets (v4 and v6) visible in this namespace.
///
/// A table that cannot be read (no IPv6, restricted `/proc`) contributes
/// nothing.
pub fn capture_sockets() -> BTreeSet<SocketIdentity> {
    let mut sockets = BTreeSet::new();

    for (table, entries) in [("tcp", procfs::net::tcp()), ("tcp6", procfs::net::tcp6())] {
        match entries {
            Ok(entries) => sockets.extend(entries.into_iter().map(|e| SocketIdentity {
                protocol: Protocol::Tcp,
                local: e.local_address,
                remote: e.remote_address,
            })),
            Err(e) => debug!(table, error = %e, "socket table unavailable"),
        }
    }

    for (table, entries) in [("udp", procfs::net::udp()), ("udp6", procfs::net::udp6())] {
        match entries {
            Ok(entries) => sockets.extend(entries.into_iter().map(|e| SocketIdentity {
                protocol: Protocol::Udp,
                local: e.local_address,
                remote: e.remote_address,
            })),
            Err(e) => debug!(table, error = %e, "socket table unavailable"),
        }
    }

    sockets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn sees_own_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let sockets = capture_sockets();

        assert!(sockets
            .iter()
            .any(|s| s.protocol == Protocol::Tcp && s.local == addr));
    }
}
