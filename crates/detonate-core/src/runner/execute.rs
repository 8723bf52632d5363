//! Deadline-bounded execution of the target.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::dispatch::Dispatch;
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, Result};
use crate::types::{CapturedOutput, ExecutionRecord};

/// How long output readers may keep going after the child is gone.
///
/// A grandchild that inherited stdout can hold the pipe open forever.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(500);

const READ_CHUNK: usize = 8 * 1024;

/// `ETXTBSY`: the target is still open for writing somewhere, typically an
/// fd inherited by a child forked while the file was being written.
const TEXT_FILE_BUSY: i32 = 26;
const SPAWN_ATTEMPTS: u32 = 5;

/// Runs one target per call and always returns a record.
#[derive(Debug, Clone)]
pub struct ExecutionRunner {
    interpreters: BTreeMap<String, String>,
    text_extensions: Vec<String>,
    deadline: Duration,
    workdir: PathBuf,
    max_output_bytes: usize,
}

impl ExecutionRunner {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            interpreters: config.interpreters.clone(),
            text_extensions: config.text_extensions.clone(),
            deadline: config.timeout(),
            workdir: config.workdir().to_path_buf(),
            max_output_bytes: config.max_output_bytes,
        }
    }

    /// Dispatch decision for `target`.
    pub fn plan(&self, target: &Path) -> Dispatch {
        Dispatch::for_path(target, &self.interpreters, &self.text_extensions)
    }

    /// Execute `target` once.
    ///
    /// Never fails: a deadline expiry sets `timed_out`, and any other
    /// failure is logged and stored in `error`.
    pub async fn execute(&self, target: &Path) -> ExecutionRecord {
        let dispatch = self.plan(target);
        let mut record = ExecutionRecord::new(target.to_path_buf(), dispatch.kind());
        let started = Instant::now();

        info!(
            target = %target.display(),
            dispatch = %dispatch.kind(),
            "executing target"
        );

        if let Err(e) = self.run(target, &dispatch, &mut record).await {
            error!(target = %target.display(), error = %e, "execution error");
            record.error = Some(e.to_string());
        }

        record.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        if !record.timed_out && !record.failed() {
            info!(
                exit_code = ?record.exit_code,
                elapsed_ms = record.elapsed_ms,
                "execution completed"
            );
        }
        record
    }

    async fn run(
        &self,
        target: &Path,
        dispatch: &Dispatch,
        record: &mut ExecutionRecord,
    ) -> Result<()> {
        // The child runs in `workdir`, so relative paths would break.
        let target = tokio::fs::canonicalize(target)
            .await
            .map_err(|e| AnalysisError::io(target.display().to_string(), e))?;
        let target_arg = target.display().to_string();

        match dispatch {
            Dispatch::Text => {
                let measure = async {
                    let file = tokio::fs::File::open(&target).await?;
                    count_chars(file).await
                };
                match timeout(self.deadline, measure).await {
                    Ok(length) => {
                        let length = length.map_err(|e| AnalysisError::io(&target_arg, e))?;
                        info!(length, "text file content length");
                        record.content_length = Some(length);
                    }
                    Err(_) => {
                        warn!(
                            deadline_secs = self.deadline.as_secs(),
                            "text measurement timed out"
                        );
                        record.timed_out = true;
                    }
                }
                Ok(())
            }
            Dispatch::Interpreter { program } => {
                self.spawn_and_wait(program, vec![target_arg], record).await
            }
            Dispatch::Binary => {
                grant_execute(&target).await?;
                self.spawn_and_wait(&target_arg, Vec::new(), record).await
            }
        }
    }

    async fn spawn_and_wait(
        &self,
        program: &str,
        args: Vec<String>,
        record: &mut ExecutionRecord,
    ) -> Result<()> {
        record.program = Some(program.to_string());
        record.args.clone_from(&args);

        let mut command = Command::new(program);
        command
            .args(&args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut attempt = 1;
        let mut child = loop {
            match command.spawn() {
                Ok(child) => break child,
                Err(e) if e.raw_os_error() == Some(TEXT_FILE_BUSY) && attempt < SPAWN_ATTEMPTS => {
                    debug!(program, attempt, "target busy, retrying spawn");
                    tokio::time::sleep(Duration::from_millis(50 * u64::from(attempt))).await;
                    attempt += 1;
                }
                Err(source) => {
                    return Err(AnalysisError::Spawn {
                        program: program.to_string(),
                        source,
                    });
                }
            }
        };

        let pid = child.id();
        debug!(pid, program, "target spawned");

        let stdout = tokio::spawn(capture(child.stdout.take(), self.max_output_bytes));
        let stderr = tokio::spawn(capture(child.stderr.take(), self.max_output_bytes));

        match timeout(self.deadline, child.wait()).await {
            Ok(status) => {
                let status = status.map_err(|e| AnalysisError::io(program, e))?;
                record.exit_code = status.code();
                #[cfg(unix)]
                {
                    use std::os::unix::process::ExitStatusExt;
                    record.signal = status.signal();
                }
            }
            Err(_) => {
                warn!(
                    pid,
                    deadline_secs = self.deadline.as_secs(),
                    "execution timed out, killing target"
                );
                if let Err(e) = child.kill().await {
                    warn!(pid, error = %e, "failed to kill target");
                }
                record.timed_out = true;
            }
        }

        record.stdout = drain(stdout).await;
        record.stderr = drain(stderr).await;
        Ok(())
    }
}

/// Mark the target executable regardless of its current mode.
#[cfg(unix)]
async fn grant_execute(target: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    debug!(target = %target.display(), "granting execute permission");
    tokio::fs::set_permissions(target, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(|e| AnalysisError::io(target.display().to_string(), e))
}

#[cfg(not(unix))]
async fn grant_execute(_target: &Path) -> Result<()> {
    Ok(())
}

/// Read a stream to EOF, keeping at most `limit` bytes.
///
/// Reading continues past the limit so the child never blocks on a full
/// pipe.
async fn capture<R>(stream: Option<R>, limit: usize) -> CapturedOutput
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let Some(mut stream) = stream else {
        return CapturedOutput::default();
    };

    let mut kept = Vec::new();
    let mut truncated = false;
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let room = limit.saturating_sub(kept.len());
                if n > room {
                    truncated = true;
                }
                kept.extend_from_slice(&buf[..n.min(room)]);
            }
            Err(e) => {
                debug!(error = %e, "output stream read failed");
                break;
            }
        }
    }

    CapturedOutput {
        text: String::from_utf8_lossy(&kept).into_owned(),
        truncated,
    }
}

/// Count characters as `String::from_utf8_lossy` would, one chunk at a
/// time. Each invalid sequence counts as one replacement character.
async fn count_chars<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<usize> {
    let mut buf = vec![0u8; READ_CHUNK];
    // Bytes of a sequence split across reads, kept at the front of `buf`.
    let mut pending = 0;
    let mut count = 0;

    loop {
        let n = reader.read(&mut buf[pending..]).await?;
        if n == 0 {
            if pending > 0 {
                count += 1;
            }
            return Ok(count);
        }

        let filled = pending + n;
        let mut rest = &buf[..filled];
        pending = 0;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    count += text.chars().count();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    count += std::str::from_utf8(&rest[..valid]).map_or(0, |t| t.chars().count());
                    match e.error_len() {
                        Some(bad) => {
                            count += 1;
                            rest = &rest[valid + bad..];
                        }
                        None => {
                            pending = rest.len() - valid;
                            break;
                        }
                    }
                }
            }
        }
        buf.copy_within(filled - pending..filled, 0);
    }
}

async fn drain(mut handle: JoinHandle<CapturedOutput>) -> CapturedOutput {
    match timeout(OUTPUT_DRAIN_GRACE, &mut handle).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            debug!(error = %e, "output reader failed");
            CapturedOutput::default()
        }
        Err(_) => {
            debug!("output pipe still held open, abandoning capture");
            handle.abort();
            CapturedOutput::default()
        }
    }
}
