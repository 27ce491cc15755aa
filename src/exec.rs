//! Running the npm executable as a subprocess.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

/// How long output readers may run once a timed-out process was terminated.
const READER_GRACE: Duration = Duration::from_secs(1);

/// Runs one executable with captured output and an optional timeout.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl CommandRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandRunner {
            program: program.into(),
            timeout: None,
        }
    }

    /// Find `npm` on `PATH`.
    ///
    /// On Windows this resolves the `npm.cmd` shim.
    pub fn locate_npm() -> Result<Self> {
        let program = which::which("npm").map_err(Error::NpmNotFound)?;
        Ok(Self::new(program))
    }

    /// Terminate the process with SIGTERM if it runs longer than `timeout`.
    ///
    /// On Unix the process gets its own process group and the whole group is
    /// signalled, so wrapper scripts take their children down with them.
    /// `None` or a zero duration disables the timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run the program and return its trimmed stdout.
    ///
    /// A non-zero exit or a termination signal is an error carrying the
    /// captured stdout and stderr.
    pub async fn run(&self, args: &[String]) -> Result<String> {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        {
            if self.timeout.is_some() {
                command.process_group(0);
            }
        }
        let mut child = command.spawn().map_err(|e| self.spawn_error(e))?;

        let stdout = tokio::spawn(read_all(child.stdout.take()));
        let stderr = tokio::spawn(read_all(child.stderr.take()));

        let mut grace = None;
        let status = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    tracing::warn!(
                        timeout_ms = limit.as_millis() as u64,
                        "npm timed out, terminating"
                    );
                    terminate(&mut child);
                    grace = Some(READER_GRACE);
                    child.wait().await
                }
            },
            None => child.wait().await,
        }
        .map_err(|e| self.spawn_error(e))?;

        // A terminated process may have left descendants holding the pipes.
        let stdout = join_output(stdout, grace).await;
        let stderr = join_output(stderr, grace).await;

        check_status(status, stdout, stderr)
    }

    fn spawn_error(&self, source: std::io::Error) -> Error {
        Error::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }
}

async fn read_all<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        // Whatever was read before an error is still useful for diagnostics.
        let _ = pipe.read_to_end(&mut buf).await;
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn join_output(mut reader: JoinHandle<String>, grace: Option<Duration>) -> String {
    let joined = match grace {
        Some(limit) => match tokio::time::timeout(limit, &mut reader).await {
            Ok(joined) => joined,
            Err(_) => {
                reader.abort();
                tracing::debug!("output pipe still open after termination, dropping it");
                return String::new();
            }
        },
        None => reader.await,
    };
    match joined {
        Ok(output) => output,
        Err(err) => {
            tracing::debug!(error = %err, "output reader failed");
            String::new()
        }
    }
}

fn check_status(status: ExitStatus, stdout: String, stderr: String) -> Result<String> {
    if status.success() {
        return Ok(stdout.trim().to_string());
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Err(Error::Signal {
                signal,
                stdout,
                stderr,
            });
        }
    }

    Err(Error::ExitStatus {
        code: status.code().unwrap_or(-1),
        stdout,
        stderr,
    })
}

#[cfg(unix)]
fn terminate(child: &mut Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    // `id()` is `None` once the child has been reaped.
    if let Some(pid) = child.id() {
        if let Err(err) = killpg(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            tracing::debug!(pid, error = %err, "failed to signal npm process group");
        }
    }
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) {
    let _ = child.start_kill();
}
