//! WebSocket connection listener for container sessions.
//!
//! Extracts the container name and session kind from the request query
//! string, validates them, spawns the matching child process, and hands
//! both ends to a session bridge. Malformed requests are terminal for that
//! connection attempt: one structured error frame, then close, with no
//! process spawned.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures_util::StreamExt;
use serde::Deserialize;
use thiserror::Error;

use protocol::{ServerFrame, SessionKind};

use crate::session::{InteractiveShell, LogFollowProcess, SessionBridge, SessionProcess};

use super::AppState;

/// Session query parameters: `?cname=<container>&type=<cli|logs>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionQuery {
    /// Target container name.
    pub cname: Option<String>,
    /// Session kind discriminator.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Rejection reasons for a session connection attempt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionParamsError {
    #[error("Container name is required for CLI sessions.")]
    MissingNameInteractive,

    #[error("Container name is required for log streaming.")]
    MissingNameLogFollow,

    #[error("Invalid WebSocket connection type.")]
    InvalidKind,
}

/// Validates session parameters.
///
/// The kind is checked first so that a request with neither parameter is
/// reported as an invalid connection type, matching the route's dispatch
/// order.
pub fn parse_session_params(
    query: &SessionQuery,
) -> Result<(String, SessionKind), SessionParamsError> {
    let kind = query
        .kind
        .as_deref()
        .unwrap_or_default()
        .parse::<SessionKind>()
        .map_err(|_| SessionParamsError::InvalidKind)?;

    match query.cname.as_deref() {
        Some(name) if !name.is_empty() => Ok((name.to_string(), kind)),
        _ => Err(match kind {
            SessionKind::Interactive => SessionParamsError::MissingNameInteractive,
            SessionKind::LogFollow => SessionParamsError::MissingNameLogFollow,
        }),
    }
}

/// `GET /ws?cname=&type=` — upgrade to a container session.
pub async fn session_ws(
    ws: WebSocketUpgrade,
    Query(query): Query<SessionQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_session_socket(socket, query, state))
}

async fn handle_session_socket(socket: WebSocket, query: SessionQuery, state: AppState) {
    let (container, kind) = match parse_session_params(&query) {
        Ok(params) => params,
        Err(err) => {
            tracing::error!(error = %err, "Rejecting session connection");
            reject(socket, err.to_string()).await;
            return;
        }
    };

    let Some(_guard) = state.sessions.try_register(&container, kind) else {
        reject(socket, "Session limit reached; try again later.".to_string()).await;
        return;
    };

    let engine = state.engine.binary();
    let spawned = match kind {
        SessionKind::Interactive => {
            let cmd =
                InteractiveShell::shell_command(engine, &container, &state.config.session.shell);
            InteractiveShell::spawn(cmd, state.config.session.cols, state.config.session.rows)
                .map(|(shell, events)| (SessionProcess::Interactive(shell), events))
                .map_err(|err| (err, "Failed to open CLI"))
        }
        SessionKind::LogFollow => {
            let cmd = LogFollowProcess::follow_command(engine, &container);
            LogFollowProcess::spawn(cmd)
                .map(|(follow, events)| (SessionProcess::LogFollow(follow), events))
                .map_err(|err| (err, "Failed to open log stream"))
        }
    };

    let (process, events) = match spawned {
        Ok(spawned) => spawned,
        Err((err, context)) => {
            tracing::error!(container = %container, error = %err, "Session spawn failed");
            reject(socket, format!("{}: {}", context, err)).await;
            return;
        }
    };

    tracing::info!(container = %container, kind = %kind, "Client connected");

    let (write, read) = socket.split();
    let bridge = SessionBridge::new(container.clone(), process, events);
    let reason = bridge.run(write, read).await;

    tracing::info!(container = %container, reason = ?reason, "Client session finished");
}

/// Sends one structured error frame if the socket is still open, then
/// closes it.
async fn reject(mut socket: WebSocket, message: String) {
    let frame = ServerFrame::error(message);
    if socket
        .send(Message::Text(frame.to_json().into()))
        .await
        .is_err()
    {
        tracing::debug!("Connection closed before rejection could be sent");
        return;
    }
    let _ = socket.send(Message::Close(None)).await;
}
