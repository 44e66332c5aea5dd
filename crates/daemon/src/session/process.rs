//! Child process handles for container sessions.
//!
//! A session owns exactly one spawned process: either an interactive shell
//! running on a pseudo-terminal inside the container, or a non-interactive
//! follow of the container's log output. Both variants push their output to
//! the bridge over an event channel and emit a single terminal event when
//! the process ends.

use std::io::{Read, Write};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot, Mutex};

use protocol::SessionKind;

/// Buffer size for reading process output.
const READ_BUFFER_SIZE: usize = 4096;

/// Event channel capacity per session.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// ANSI marker wrapped around stderr chunks so the terminal renders the
/// error stream distinctly.
const STDERR_PREFIX: &[u8] = b"\x1b[31m";
const STDERR_SUFFIX: &[u8] = b"\x1b[0m";

/// Errors that can occur during session process operations.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn the process.
    #[error("failed to spawn process: {0}")]
    Spawn(String),

    /// Failed to write to the process input.
    #[error("failed to write to process: {0}")]
    Write(String),

    /// Failed to resize the terminal.
    #[error("failed to resize terminal: {0}")]
    Resize(String),

    /// Failed to terminate the process.
    #[error("failed to terminate process: {0}")]
    Kill(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A notification pushed from a child process handle to its session bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// A chunk of process output, in arrival order.
    Data(Vec<u8>),
    /// The process terminated. Emitted exactly once, after all output.
    Exit {
        /// Exit code, when the process exited normally.
        code: Option<i32>,
    },
    /// The process failed at runtime, distinct from a normal exit.
    /// Emitted exactly once in place of `Exit`.
    Error(String),
}

/// Wraps a stderr chunk in the error-stream ANSI marker.
fn wrap_stderr(chunk: &[u8]) -> Vec<u8> {
    let mut wrapped = Vec::with_capacity(chunk.len() + STDERR_PREFIX.len() + STDERR_SUFFIX.len());
    wrapped.extend_from_slice(STDERR_PREFIX);
    wrapped.extend_from_slice(chunk);
    wrapped.extend_from_slice(STDERR_SUFFIX);
    wrapped
}

// ============================================================================
// Interactive variant
// ============================================================================

/// An interactive shell running on a pseudo-terminal.
///
/// Output chunks are opaque byte sequences: partial lines and control
/// sequences pass through unmodified, since the far end is a terminal
/// emulator.
pub struct InteractiveShell {
    /// Writer feeding the pseudo-terminal's input.
    writer: Box<dyn Write + Send>,

    /// The PTY master handle, kept for resize.
    master: Box<dyn MasterPty + Send>,

    /// The child process, shared with the read loop for reaping.
    child: Arc<Mutex<Box<dyn Child + Send + Sync>>>,

    /// Liveness flag; flips to true exactly once.
    exited: Arc<AtomicBool>,

    /// Current terminal size.
    cols: u16,
    rows: u16,

    /// Process ID.
    pid: Option<u32>,
}

impl InteractiveShell {
    /// Builds the command attaching an interactive shell to a running
    /// container.
    pub fn shell_command(engine: &str, container: &str, shell: &str) -> CommandBuilder {
        let mut cmd = CommandBuilder::new(engine);
        cmd.args(["exec", "-it", container, shell]);
        if let Some(home) = dirs::home_dir() {
            cmd.cwd(home);
        }
        cmd.env("TERM", "xterm-color");
        cmd
    }

    /// Spawns the command on a new pseudo-terminal of the given size.
    ///
    /// Returns the handle and the receiver for its event stream. Spawn
    /// failures are reported synchronously; no event will fire for them.
    pub fn spawn(
        cmd: CommandBuilder,
        cols: u16,
        rows: u16,
    ) -> Result<(Self, mpsc::Receiver<ProcessEvent>), ProcessError> {
        let pty_system = native_pty_system();

        let pair = pty_system
            .openpty(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| ProcessError::Spawn(e.to_string()))?;

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| ProcessError::Spawn(e.to_string()))?;
        let pid = child.process_id();

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| ProcessError::Spawn(e.to_string()))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| ProcessError::Spawn(e.to_string()))?;

        // The slave side is only needed for spawning.
        drop(pair.slave);

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let exited = Arc::new(AtomicBool::new(false));
        let child = Arc::new(Mutex::new(child));

        tokio::spawn(pty_read_loop(
            reader,
            tx,
            Arc::clone(&exited),
            Arc::clone(&child),
        ));

        Ok((
            Self {
                writer,
                master: pair.master,
                child,
                exited,
                cols,
                rows,
                pid,
            },
            rx,
        ))
    }

    /// Returns the process ID of the shell, if available.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Returns the current terminal size.
    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Returns whether the process has terminated.
    pub fn is_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    /// Forwards raw bytes to the pseudo-terminal's input.
    ///
    /// A write after the process has exited is ignored with a warning.
    pub fn write(&mut self, data: &[u8]) -> Result<(), ProcessError> {
        if self.is_exited() {
            tracing::warn!("Ignoring write to exited session process");
            return Ok(());
        }

        self.writer
            .write_all(data)
            .map_err(|e| ProcessError::Write(e.to_string()))?;
        self.writer
            .flush()
            .map_err(|e| ProcessError::Write(e.to_string()))?;
        Ok(())
    }

    /// Updates the pseudo-terminal's window size.
    ///
    /// Ignored once the process has exited.
    pub fn resize(&mut self, cols: u16, rows: u16) -> Result<(), ProcessError> {
        if self.is_exited() {
            tracing::warn!("Ignoring resize of exited session process");
            return Ok(());
        }

        self.master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| ProcessError::Resize(e.to_string()))?;

        self.cols = cols;
        self.rows = rows;
        tracing::debug!(cols, rows, "Resized session terminal");
        Ok(())
    }

    /// Terminates the process. Safe to call after exit; only the first call
    /// has any effect.
    pub async fn kill(&mut self) -> Result<(), ProcessError> {
        if self.exited.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let mut child = self.child.lock().await;
        child.kill().map_err(|e| ProcessError::Kill(e.to_string()))
    }

    #[cfg(test)]
    pub(crate) fn exited_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.exited)
    }
}

/// Reads PTY output until EOF, then reaps the child and emits the single
/// exit notification.
async fn pty_read_loop(
    reader: Box<dyn Read + Send>,
    tx: mpsc::Sender<ProcessEvent>,
    exited: Arc<AtomicBool>,
    child: Arc<Mutex<Box<dyn Child + Send + Sync>>>,
) {
    let reader = Arc::new(std::sync::Mutex::new(reader));

    loop {
        let reader = Arc::clone(&reader);

        // PTY readers are blocking; hand each read to the blocking pool.
        let result = tokio::task::spawn_blocking(move || {
            let mut buffer = vec![0u8; READ_BUFFER_SIZE];
            let mut reader = reader.lock().unwrap();
            match reader.read(&mut buffer) {
                Ok(0) => Ok(None),
                Ok(n) => {
                    buffer.truncate(n);
                    Ok(Some(buffer))
                }
                Err(e) => Err(e),
            }
        })
        .await;

        match result {
            Ok(Ok(Some(data))) => {
                if tx.send(ProcessEvent::Data(data)).await.is_err() {
                    tracing::debug!("Session receiver dropped; stopping PTY read loop");
                    break;
                }
            }
            Ok(Ok(None)) => {
                tracing::debug!("PTY EOF - process exited");
                break;
            }
            Ok(Err(e)) => {
                // On Linux the PTY read fails with EIO once the child is
                // gone; treat it the same as EOF.
                if !exited.load(Ordering::SeqCst) {
                    tracing::debug!(error = %e, "PTY read ended");
                }
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "PTY read task panicked");
                break;
            }
        }
    }

    let code = {
        let child = Arc::clone(&child);
        tokio::task::spawn_blocking(move || {
            let mut child = child.blocking_lock();
            child.wait().ok().map(|status| status.exit_code() as i32)
        })
        .await
        .ok()
        .flatten()
    };

    exited.store(true, Ordering::SeqCst);
    let _ = tx.send(ProcessEvent::Exit { code }).await;
}

// ============================================================================
// Log-follow variant
// ============================================================================

/// A non-interactive process continuously following a container's combined
/// output. Output-only: there is no input, write, or resize capability.
pub struct LogFollowProcess {
    /// Signal to the follow task to terminate the child.
    kill_tx: Option<oneshot::Sender<()>>,

    /// Liveness flag; flips to true exactly once.
    exited: Arc<AtomicBool>,

    /// Process ID.
    pid: Option<u32>,
}

impl LogFollowProcess {
    /// Builds the command following a container's logs.
    pub fn follow_command(engine: &str, container: &str) -> Command {
        let mut cmd = Command::new(engine);
        cmd.args(["logs", "-f", container]);
        cmd
    }

    /// Spawns the follow process with piped output.
    ///
    /// Returns the handle and the receiver for its event stream. Stdout
    /// chunks pass through as-is; stderr chunks are wrapped in a red ANSI
    /// marker. The terminal event is emitted only after both streams have
    /// drained.
    pub fn spawn(
        mut cmd: Command,
    ) -> Result<(Self, mpsc::Receiver<ProcessEvent>), ProcessError> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| ProcessError::Spawn(e.to_string()))?;
        let pid = child.id();

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ProcessError::Spawn("stdout not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ProcessError::Spawn("stderr not captured".to_string()))?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (kill_tx, kill_rx) = oneshot::channel();
        let exited = Arc::new(AtomicBool::new(false));

        tokio::spawn(follow_loop(
            child,
            stdout,
            stderr,
            tx,
            kill_rx,
            Arc::clone(&exited),
        ));

        Ok((
            Self {
                kill_tx: Some(kill_tx),
                exited,
                pid,
            },
            rx,
        ))
    }

    /// Returns the process ID, if available.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Returns whether the process has terminated.
    pub fn is_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    /// Requests termination of the follow process. No-op after exit.
    pub fn kill(&mut self) {
        if self.is_exited() {
            return;
        }
        if let Some(tx) = self.kill_tx.take() {
            let _ = tx.send(());
        }
    }

    #[cfg(test)]
    pub(crate) fn exited_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.exited)
    }
}

/// Drains stdout and stderr, then reaps the child and emits the single
/// terminal event.
async fn follow_loop(
    mut child: tokio::process::Child,
    mut stdout: tokio::process::ChildStdout,
    mut stderr: tokio::process::ChildStderr,
    tx: mpsc::Sender<ProcessEvent>,
    mut kill_rx: oneshot::Receiver<()>,
    exited: Arc<AtomicBool>,
) {
    let mut out_buf = vec![0u8; READ_BUFFER_SIZE];
    let mut err_buf = vec![0u8; READ_BUFFER_SIZE];
    let mut out_open = true;
    let mut err_open = true;
    let mut killed = false;

    while out_open || err_open {
        tokio::select! {
            read = stdout.read(&mut out_buf), if out_open => match read {
                Ok(0) => out_open = false,
                Ok(n) => {
                    if tx.send(ProcessEvent::Data(out_buf[..n].to_vec())).await.is_err() {
                        tracing::debug!("Session receiver dropped; stopping log follow");
                        out_open = false;
                        err_open = false;
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Log stdout read ended");
                    out_open = false;
                }
            },
            read = stderr.read(&mut err_buf), if err_open => match read {
                Ok(0) => err_open = false,
                Ok(n) => {
                    let _ = tx.send(ProcessEvent::Data(wrap_stderr(&err_buf[..n]))).await;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Log stderr read ended");
                    err_open = false;
                }
            },
            _ = &mut kill_rx, if !killed => {
                killed = true;
                if let Err(e) = child.start_kill() {
                    tracing::warn!(error = %e, "Failed to terminate log process");
                }
            },
        }
    }

    let status = if killed {
        child.wait().await
    } else {
        // Streams are drained but the child may still be running; keep
        // honoring a late termination request while waiting.
        let waited = tokio::select! {
            status = child.wait() => Some(status),
            _ = &mut kill_rx => None,
        };
        match waited {
            Some(status) => status,
            None => {
                if let Err(e) = child.start_kill() {
                    tracing::warn!(error = %e, "Failed to terminate log process");
                }
                child.wait().await
            }
        }
    };

    exited.store(true, Ordering::SeqCst);
    match status {
        Ok(status) => {
            let _ = tx
                .send(ProcessEvent::Exit {
                    code: status.code(),
                })
                .await;
        }
        Err(e) => {
            let _ = tx.send(ProcessEvent::Error(e.to_string())).await;
        }
    }
}

// ============================================================================
// Unified session process
// ============================================================================

/// A session's child process, unified across the two variants.
///
/// The variants differ only in capabilities: log-follow accepts no input and
/// no resize, so those operations degrade to a warning instead of an error.
pub enum SessionProcess {
    /// Interactive PTY shell.
    Interactive(InteractiveShell),
    /// Following log stream.
    LogFollow(LogFollowProcess),
}

impl SessionProcess {
    /// Returns which kind of session this process serves.
    pub fn kind(&self) -> SessionKind {
        match self {
            SessionProcess::Interactive(_) => SessionKind::Interactive,
            SessionProcess::LogFollow(_) => SessionKind::LogFollow,
        }
    }

    /// Returns whether the process has terminated.
    pub fn is_exited(&self) -> bool {
        match self {
            SessionProcess::Interactive(p) => p.is_exited(),
            SessionProcess::LogFollow(p) => p.is_exited(),
        }
    }

    /// Returns the terminal size for interactive sessions.
    pub fn size(&self) -> Option<(u16, u16)> {
        match self {
            SessionProcess::Interactive(p) => Some(p.size()),
            SessionProcess::LogFollow(_) => None,
        }
    }

    /// Forwards input to the process; log-follow sessions accept none.
    pub fn write(&mut self, data: &[u8]) -> Result<(), ProcessError> {
        match self {
            SessionProcess::Interactive(p) => p.write(data),
            SessionProcess::LogFollow(_) => {
                tracing::warn!(
                    bytes = data.len(),
                    "Log-follow sessions accept no input; dropping message"
                );
                Ok(())
            }
        }
    }

    /// Resizes the terminal; log-follow sessions have none.
    pub fn resize(&mut self, cols: u16, rows: u16) -> Result<(), ProcessError> {
        match self {
            SessionProcess::Interactive(p) => p.resize(cols, rows),
            SessionProcess::LogFollow(_) => {
                tracing::warn!("Log-follow sessions have no terminal; ignoring resize");
                Ok(())
            }
        }
    }

    /// Terminates the process, best-effort.
    pub async fn kill(&mut self) -> Result<(), ProcessError> {
        match self {
            SessionProcess::Interactive(p) => p.kill().await,
            SessionProcess::LogFollow(p) => {
                p.kill();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    /// Receives events until one matches, or panics on timeout.
    async fn recv_until<F>(rx: &mut mpsc::Receiver<ProcessEvent>, mut pred: F) -> ProcessEvent
    where
        F: FnMut(&ProcessEvent) -> bool,
    {
        for _ in 0..100 {
            let event = timeout(Duration::from_millis(200), rx.recv())
                .await
                .expect("timed out waiting for process event")
                .expect("event channel closed");
            if pred(&event) {
                return event;
            }
        }
        panic!("expected event never arrived");
    }

    #[test]
    fn test_wrap_stderr() {
        let wrapped = wrap_stderr(b"oops");
        assert_eq!(wrapped, b"\x1b[31moops\x1b[0m".to_vec());
    }

    #[test]
    fn test_follow_command_shape() {
        let cmd = LogFollowProcess::follow_command("docker", "web-1");
        let args: Vec<&str> = cmd
            .as_std()
            .get_args()
            .filter_map(|arg| arg.to_str())
            .collect();
        assert_eq!(args, ["logs", "-f", "web-1"]);
        assert_eq!(cmd.as_std().get_program().to_str(), Some("docker"));
    }

    #[tokio::test]
    async fn test_interactive_spawn_and_size() {
        let cmd = CommandBuilder::new("/bin/sh");
        let (mut shell, _rx) = InteractiveShell::spawn(cmd, 80, 24).unwrap();

        assert!(!shell.is_exited());
        assert_eq!(shell.size(), (80, 24));
        assert!(shell.pid().is_some());

        let _ = shell.kill().await;
    }

    #[tokio::test]
    async fn test_interactive_write_and_output() {
        let cmd = CommandBuilder::new("/bin/sh");
        let (mut shell, mut rx) = InteractiveShell::spawn(cmd, 80, 24).unwrap();

        shell.write(b"echo interactive_marker\n").unwrap();

        let event = recv_until(&mut rx, |e| match e {
            ProcessEvent::Data(data) => {
                String::from_utf8_lossy(data).contains("interactive_marker")
            }
            _ => false,
        })
        .await;
        assert!(matches!(event, ProcessEvent::Data(_)));

        let _ = shell.kill().await;
    }

    #[tokio::test]
    async fn test_interactive_resize() {
        let cmd = CommandBuilder::new("/bin/sh");
        let (mut shell, _rx) = InteractiveShell::spawn(cmd, 80, 24).unwrap();

        shell.resize(100, 40).unwrap();
        assert_eq!(shell.size(), (100, 40));

        let _ = shell.kill().await;
    }

    #[tokio::test]
    async fn test_interactive_exit_event_carries_code() {
        let cmd = CommandBuilder::new("/bin/sh");
        let (mut shell, mut rx) = InteractiveShell::spawn(cmd, 80, 24).unwrap();

        shell.write(b"exit 7\n").unwrap();

        let event = recv_until(&mut rx, |e| matches!(e, ProcessEvent::Exit { .. })).await;
        assert_eq!(event, ProcessEvent::Exit { code: Some(7) });
        assert!(shell.is_exited());
    }

    #[tokio::test]
    async fn test_interactive_write_after_exit_is_noop() {
        let cmd = CommandBuilder::new("/bin/sh");
        let (mut shell, mut rx) = InteractiveShell::spawn(cmd, 80, 24).unwrap();

        shell.write(b"exit\n").unwrap();
        recv_until(&mut rx, |e| matches!(e, ProcessEvent::Exit { .. })).await;

        assert!(shell.write(b"too late\n").is_ok());
        assert!(shell.resize(10, 10).is_ok());
        assert_eq!(shell.size(), (80, 24));
    }

    #[tokio::test]
    async fn test_interactive_kill_is_idempotent() {
        let cmd = CommandBuilder::new("/bin/sh");
        let (mut shell, _rx) = InteractiveShell::spawn(cmd, 80, 24).unwrap();

        assert!(shell.kill().await.is_ok());
        assert!(shell.is_exited());
        // Second kill is a no-op.
        assert!(shell.kill().await.is_ok());
    }

    #[tokio::test]
    async fn test_interactive_spawn_failure_is_synchronous() {
        let cmd = CommandBuilder::new("/nonexistent/binary/dockhand-test");
        match InteractiveShell::spawn(cmd, 80, 24) {
            // Some platforms report the failure at spawn time.
            Err(ProcessError::Spawn(_)) => {}
            // Others report it through an immediate exit of the PTY child.
            Ok((_shell, mut rx)) => {
                recv_until(&mut rx, |e| matches!(e, ProcessEvent::Exit { .. })).await;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_log_follow_output_then_exit() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "printf 'hello\\n'"]);
        let (follow, mut rx) = LogFollowProcess::spawn(cmd).unwrap();

        let mut output = Vec::new();
        loop {
            let event = timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("timed out")
                .expect("channel closed");
            match event {
                ProcessEvent::Data(chunk) => output.extend_from_slice(&chunk),
                ProcessEvent::Exit { code } => {
                    assert_eq!(code, Some(0));
                    break;
                }
                ProcessEvent::Error(e) => panic!("unexpected process error: {e}"),
            }
        }

        assert_eq!(output, b"hello\n");
        assert!(follow.is_exited());
    }

    #[tokio::test]
    async fn test_log_follow_nonzero_exit_code() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "exit 3"]);
        let (_follow, mut rx) = LogFollowProcess::spawn(cmd).unwrap();

        let event = recv_until(&mut rx, |e| matches!(e, ProcessEvent::Exit { .. })).await;
        assert_eq!(event, ProcessEvent::Exit { code: Some(3) });
    }

    #[tokio::test]
    async fn test_log_follow_stderr_is_marked() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "printf 'bad\\n' 1>&2"]);
        let (_follow, mut rx) = LogFollowProcess::spawn(cmd).unwrap();

        let event = recv_until(&mut rx, |e| matches!(e, ProcessEvent::Data(_))).await;
        let ProcessEvent::Data(chunk) = event else {
            unreachable!()
        };
        let text = String::from_utf8_lossy(&chunk);
        assert!(text.starts_with("\x1b[31m"), "missing marker: {text:?}");
        assert!(text.contains("bad"));
        assert!(text.ends_with("\x1b[0m"));
    }

    #[tokio::test]
    async fn test_log_follow_kill_terminates() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "sleep 30"]);
        let (mut follow, mut rx) = LogFollowProcess::spawn(cmd).unwrap();

        assert!(!follow.is_exited());
        follow.kill();

        let event = recv_until(&mut rx, |e| {
            matches!(e, ProcessEvent::Exit { .. } | ProcessEvent::Error(_))
        })
        .await;
        // Killed by signal, so there is no exit code.
        assert_eq!(event, ProcessEvent::Exit { code: None });
        assert!(follow.is_exited());
    }

    #[tokio::test]
    async fn test_log_follow_spawn_failure_is_synchronous() {
        let cmd = Command::new("/nonexistent/binary/dockhand-test");
        assert!(matches!(
            LogFollowProcess::spawn(cmd),
            Err(ProcessError::Spawn(_))
        ));
    }

    #[tokio::test]
    async fn test_session_process_log_follow_rejects_input() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "sleep 30"]);
        let (follow, _rx) = LogFollowProcess::spawn(cmd).unwrap();
        let mut process = SessionProcess::LogFollow(follow);

        assert_eq!(process.kind(), SessionKind::LogFollow);
        assert_eq!(process.size(), None);
        // Input and resize degrade to warnings, never errors.
        assert!(process.write(b"ignored").is_ok());
        assert!(process.resize(100, 40).is_ok());

        let _ = process.kill().await;
    }
}
