//! The session bridge: bidirectional forwarding between one WebSocket and
//! one child process.
//!
//! A bridge moves through `Connecting -> Active -> Closing -> Closed`. The
//! listener handles `Connecting` (spawn and construction); [`SessionBridge::run`]
//! covers the rest: it forwards frames in both directions until the first of
//! {process exit, process error, connection close, connection error} fires,
//! then performs teardown exactly once and returns the winning trigger.
//!
//! The bridge is generic over the split halves of the socket so the state
//! machine can be driven by in-memory channels in tests.

use std::fmt::Display;

use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;

use protocol::{ClientFrame, ServerFrame, SessionKind};

use super::process::{ProcessEvent, SessionProcess};

/// The trigger that ended a session, reported after teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The child process exited.
    ProcessExited(Option<i32>),
    /// The child process failed at runtime.
    ProcessFailed(String),
    /// The client closed the connection.
    ConnectionClosed,
    /// The connection failed.
    ConnectionError(String),
}

/// Bridges one connection and one child process for the lifetime of a
/// session.
pub struct SessionBridge {
    container: String,
    process: SessionProcess,
    events: mpsc::Receiver<ProcessEvent>,
}

impl SessionBridge {
    /// Creates a bridge over an already-spawned process.
    pub fn new(
        container: impl Into<String>,
        process: SessionProcess,
        events: mpsc::Receiver<ProcessEvent>,
    ) -> Self {
        Self {
            container: container.into(),
            process,
            events,
        }
    }

    /// Runs the session until either side terminates, then tears down the
    /// other side and returns the trigger.
    ///
    /// Process output is forwarded in arrival order, opaque and unmodified.
    /// Inbound frames are decoded as structured control messages with a
    /// raw-input fallback.
    pub async fn run<W, R, E>(self, mut write: W, mut read: R) -> CloseReason
    where
        W: Sink<Message> + Unpin,
        W::Error: Display,
        R: Stream<Item = Result<Message, E>> + Unpin,
        E: Display,
    {
        let Self {
            container,
            mut process,
            mut events,
        } = self;

        tracing::info!(container = %container, kind = %process.kind(), "Session active");

        let reason = loop {
            tokio::select! {
                inbound = read.next() => match inbound {
                    None => break CloseReason::ConnectionClosed,
                    Some(Ok(Message::Close(_))) => break CloseReason::ConnectionClosed,
                    Some(Ok(Message::Text(text))) => {
                        handle_client_payload(&container, &mut process, text.as_str().as_bytes());
                    }
                    Some(Ok(Message::Binary(data))) => {
                        handle_client_payload(&container, &mut process, &data);
                    }
                    // Ping/pong keepalives are answered by the transport.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break CloseReason::ConnectionError(e.to_string()),
                },
                event = events.recv() => match event {
                    Some(ProcessEvent::Data(chunk)) => {
                        if let Err(e) = write.send(Message::Binary(chunk.into())).await {
                            break CloseReason::ConnectionError(e.to_string());
                        }
                    }
                    Some(ProcessEvent::Exit { code }) => break CloseReason::ProcessExited(code),
                    Some(ProcessEvent::Error(message)) => break CloseReason::ProcessFailed(message),
                    None => break CloseReason::ProcessExited(None),
                },
            }
        };

        finish(&container, &mut process, &mut write, &reason).await;
        tracing::info!(container = %container, reason = ?reason, "Session closed");
        reason
    }
}

/// Dispatches one inbound payload to the process.
fn handle_client_payload(container: &str, process: &mut SessionProcess, payload: &[u8]) {
    match ClientFrame::decode(payload) {
        ClientFrame::Resize { cols, rows } => {
            if let Err(e) = process.resize(cols, rows) {
                tracing::warn!(container, error = %e, "Resize failed");
            }
        }
        ClientFrame::Input(data) => {
            if let Err(e) = process.write(data.as_bytes()) {
                tracing::warn!(container, error = %e, "Input write failed");
            }
        }
        ClientFrame::Raw(bytes) => {
            if let Err(e) = process.write(&bytes) {
                tracing::warn!(container, error = %e, "Raw input write failed");
            }
        }
    }
}

/// One-shot teardown. The trigger that was already terminal is left alone;
/// the other side is shut down.
async fn finish<W>(
    container: &str,
    process: &mut SessionProcess,
    write: &mut W,
    reason: &CloseReason,
) where
    W: Sink<Message> + Unpin,
    W::Error: Display,
{
    match reason {
        CloseReason::ProcessExited(code) => {
            send_final(write, ended_line(process.kind(), *code)).await;
        }
        CloseReason::ProcessFailed(message) => {
            send_final(write, failed_line(process.kind(), message)).await;
        }
        CloseReason::ConnectionClosed => {
            terminate(container, process).await;
        }
        CloseReason::ConnectionError(message) => {
            terminate(container, process).await;
            let frame = ServerFrame::error(format!("WebSocket error: {}", message));
            send_final(write, frame.to_json()).await;
        }
    }
}

/// Sends a final status payload and a close frame, tolerating a
/// half-closed connection.
async fn send_final<W>(write: &mut W, payload: String)
where
    W: Sink<Message> + Unpin,
    W::Error: Display,
{
    if let Err(e) = write.send(Message::Text(payload.into())).await {
        tracing::debug!(error = %e, "Connection already closed; dropping final status");
        return;
    }
    let _ = write.send(Message::Close(None)).await;
}

/// Best-effort child termination; failures are logged, not propagated.
async fn terminate(container: &str, process: &mut SessionProcess) {
    if let Err(e) = process.kill().await {
        tracing::error!(container, error = %e, "Failed to terminate session process");
    }
}

/// Status line for a normal process exit.
fn ended_line(kind: SessionKind, code: Option<i32>) -> String {
    match kind {
        SessionKind::Interactive => "\r\n\x1b[31mCLI session ended.\x1b[0m\r\n".to_string(),
        SessionKind::LogFollow => {
            let code = code.map_or_else(|| "unknown".to_string(), |c| c.to_string());
            format!(
                "\r\n\x1b[31mLog stream ended (process exited with code {}).\x1b[0m\r\n",
                code
            )
        }
    }
}

/// Status line for a process runtime failure.
fn failed_line(kind: SessionKind, message: &str) -> String {
    match kind {
        SessionKind::Interactive => "\r\n\x1b[31mCLI session ended.\x1b[0m\r\n".to_string(),
        SessionKind::LogFollow => {
            format!("\r\n\x1b[31mError in log stream: {}\x1b[0m\r\n", message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::process::{InteractiveShell, LogFollowProcess};

    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use futures::channel::mpsc as test_mpsc;
    use portable_pty::CommandBuilder;
    use tokio::process::Command;
    use tokio::time::timeout;

    type InboundTx = test_mpsc::UnboundedSender<Result<Message, std::io::Error>>;
    type InboundRx = test_mpsc::UnboundedReceiver<Result<Message, std::io::Error>>;
    type OutboundTx = test_mpsc::UnboundedSender<Message>;
    type OutboundRx = test_mpsc::UnboundedReceiver<Message>;

    fn socket_halves() -> ((InboundTx, InboundRx), (OutboundTx, OutboundRx)) {
        (test_mpsc::unbounded(), test_mpsc::unbounded())
    }

    fn spawn_log_bridge(script: &str) -> SessionBridge {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", script]);
        let (follow, events) = LogFollowProcess::spawn(cmd).unwrap();
        SessionBridge::new("test", SessionProcess::LogFollow(follow), events)
    }

    fn drain(mut out_rx: OutboundRx) -> Vec<Message> {
        let mut messages = Vec::new();
        while let Ok(Some(msg)) = out_rx.try_next() {
            messages.push(msg);
        }
        messages
    }

    fn concat_binary(messages: &[Message]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for msg in messages {
            if let Message::Binary(data) = msg {
                bytes.extend_from_slice(data);
            }
        }
        bytes
    }

    fn text_frames(messages: &[Message]) -> Vec<String> {
        messages
            .iter()
            .filter_map(|msg| match msg {
                Message::Text(text) => Some(text.to_string()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_log_follow_scenario_output_then_status_then_close() {
        let bridge = spawn_log_bridge("printf 'hello\\n'");
        let ((_in_tx, in_rx), (out_tx, out_rx)) = socket_halves();

        let reason = timeout(Duration::from_secs(10), bridge.run(out_tx, in_rx))
            .await
            .expect("bridge timed out");
        assert_eq!(reason, CloseReason::ProcessExited(Some(0)));

        let messages = drain(out_rx);
        assert_eq!(concat_binary(&messages), b"hello\n");

        let texts = text_frames(&messages);
        assert_eq!(texts.len(), 1, "expected exactly one status line");
        assert!(texts[0].contains("exited with code 0"), "{}", texts[0]);

        // Status line comes after all output, close frame comes last.
        assert!(matches!(messages.last(), Some(Message::Close(_))));
        let close_count = messages
            .iter()
            .filter(|m| matches!(m, Message::Close(_)))
            .count();
        assert_eq!(close_count, 1);
    }

    #[tokio::test]
    async fn test_log_follow_exit_code_one_status_line() {
        let bridge = spawn_log_bridge("exit 1");
        let ((_in_tx, in_rx), (out_tx, out_rx)) = socket_halves();

        let reason = timeout(Duration::from_secs(10), bridge.run(out_tx, in_rx))
            .await
            .expect("bridge timed out");
        assert_eq!(reason, CloseReason::ProcessExited(Some(1)));

        let texts = text_frames(&drain(out_rx));
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("exited with code 1"), "{}", texts[0]);
    }

    #[tokio::test]
    async fn test_log_follow_output_order_preserved() {
        let bridge = spawn_log_bridge("for i in 1 2 3 4 5 6 7 8 9 10; do printf \"line-$i\\n\"; done");
        let ((_in_tx, in_rx), (out_tx, out_rx)) = socket_halves();

        timeout(Duration::from_secs(10), bridge.run(out_tx, in_rx))
            .await
            .expect("bridge timed out");

        let output = concat_binary(&drain(out_rx));
        let expected: String = (1..=10).map(|i| format!("line-{}\n", i)).collect();
        assert_eq!(output, expected.as_bytes());
    }

    #[tokio::test]
    async fn test_log_follow_stderr_reaches_client_marked() {
        let bridge = spawn_log_bridge("printf 'bad\\n' 1>&2");
        let ((_in_tx, in_rx), (out_tx, out_rx)) = socket_halves();

        timeout(Duration::from_secs(10), bridge.run(out_tx, in_rx))
            .await
            .expect("bridge timed out");

        let output = concat_binary(&drain(out_rx));
        let text = String::from_utf8_lossy(&output);
        assert!(text.contains("\x1b[31mbad\n\x1b[0m"), "{text:?}");
    }

    #[tokio::test]
    async fn test_client_disconnect_kills_process() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "sleep 30"]);
        let (follow, events) = LogFollowProcess::spawn(cmd).unwrap();
        let exited = follow.exited_flag();
        let bridge = SessionBridge::new("test", SessionProcess::LogFollow(follow), events);

        let ((in_tx, in_rx), (out_tx, out_rx)) = socket_halves();
        // Client goes away immediately.
        drop(in_tx);

        let reason = timeout(Duration::from_secs(10), bridge.run(out_tx, in_rx))
            .await
            .expect("bridge timed out");
        assert_eq!(reason, CloseReason::ConnectionClosed);

        // Client disconnect sends no status line.
        let messages = drain(out_rx);
        assert!(text_frames(&messages).is_empty());

        // Termination propagates to the child.
        for _ in 0..50 {
            if exited.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(exited.load(Ordering::SeqCst), "child was not terminated");
    }

    #[tokio::test]
    async fn test_teardown_runs_once_when_triggers_race() {
        // The process exits and the client disconnects around the same
        // time; whichever wins, teardown output must not duplicate.
        let bridge = spawn_log_bridge("printf 'x'");
        let ((in_tx, in_rx), (out_tx, out_rx)) = socket_halves();
        drop(in_tx);

        timeout(Duration::from_secs(10), bridge.run(out_tx, in_rx))
            .await
            .expect("bridge timed out");

        let messages = drain(out_rx);
        let status_count = text_frames(&messages).len();
        let close_count = messages
            .iter()
            .filter(|m| matches!(m, Message::Close(_)))
            .count();
        assert!(status_count <= 1, "duplicate status lines: {status_count}");
        assert!(close_count <= 1, "duplicate close frames: {close_count}");
    }

    #[tokio::test]
    async fn test_interactive_raw_fallback_and_structured_input() {
        let cmd = CommandBuilder::new("/bin/sh");
        let (shell, events) = InteractiveShell::spawn(cmd, 80, 24).unwrap();
        let bridge = SessionBridge::new("test", SessionProcess::Interactive(shell), events);

        let ((in_tx, in_rx), (out_tx, out_rx)) = socket_halves();

        // A non-JSON payload must be written verbatim as input.
        in_tx
            .unbounded_send(Ok(Message::Text("echo raw_fallback_marker\n".into())))
            .unwrap();
        // A structured input frame takes the decoded path.
        in_tx
            .unbounded_send(Ok(Message::Text(
                r#"{"type":"input","data":"exit\n"}"#.into(),
            )))
            .unwrap();

        let reason = timeout(Duration::from_secs(10), bridge.run(out_tx, in_rx))
            .await
            .expect("bridge timed out");
        assert!(matches!(reason, CloseReason::ProcessExited(_)));

        let messages = drain(out_rx);
        let output = concat_binary(&messages);
        let text = String::from_utf8_lossy(&output);
        assert!(
            text.contains("raw_fallback_marker"),
            "raw input was dropped: {text:?}"
        );

        let texts = text_frames(&messages);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("CLI session ended."), "{}", texts[0]);
    }

    #[tokio::test]
    async fn test_resize_frame_applies_to_handle() {
        let cmd = CommandBuilder::new("/bin/sh");
        let (shell, _events) = InteractiveShell::spawn(cmd, 80, 24).unwrap();
        let mut process = SessionProcess::Interactive(shell);

        handle_client_payload(
            "test",
            &mut process,
            br#"{"type":"resize","cols":100,"rows":40}"#,
        );
        assert_eq!(process.size(), Some((100, 40)));

        let _ = process.kill().await;
    }

    #[tokio::test]
    async fn test_input_to_log_follow_is_ignored() {
        let bridge = spawn_log_bridge("printf 'hi\\n'");
        let ((in_tx, in_rx), (out_tx, out_rx)) = socket_halves();

        in_tx
            .unbounded_send(Ok(Message::Text("ls\n".into())))
            .unwrap();
        in_tx
            .unbounded_send(Ok(Message::Text(
                r#"{"type":"resize","cols":10,"rows":10}"#.into(),
            )))
            .unwrap();

        let reason = timeout(Duration::from_secs(10), bridge.run(out_tx, in_rx))
            .await
            .expect("bridge timed out");
        assert_eq!(reason, CloseReason::ProcessExited(Some(0)));

        let output = concat_binary(&drain(out_rx));
        assert_eq!(output, b"hi\n");
    }

    #[test]
    fn test_ended_line_texts() {
        assert_eq!(
            ended_line(SessionKind::Interactive, Some(0)),
            "\r\n\x1b[31mCLI session ended.\x1b[0m\r\n"
        );
        assert_eq!(
            ended_line(SessionKind::LogFollow, Some(137)),
            "\r\n\x1b[31mLog stream ended (process exited with code 137).\x1b[0m\r\n"
        );
        assert!(ended_line(SessionKind::LogFollow, None).contains("code unknown"));
    }

    #[test]
    fn test_failed_line_texts() {
        assert!(failed_line(SessionKind::LogFollow, "boom").contains("Error in log stream: boom"));
        assert!(failed_line(SessionKind::Interactive, "boom").contains("CLI session ended."));
    }
}
