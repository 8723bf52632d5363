//! detonate - behavioral triage of a single untrusted file.
//!
//! Runs inside an already-isolated sandbox; the exit status carries the
//! verdict.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    detonate_cli::run().await
}
