//! Session protocol message definitions for Dockhand.
//!
//! This module defines the frames exchanged over a session WebSocket between
//! the browser terminal and the daemon. Inbound frames are decoded with a raw
//! fallback: anything that is not a recognized structured message is treated
//! as literal terminal input rather than rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// The kind of session a client may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    /// An interactive shell attached to a running container.
    #[serde(rename = "cli")]
    Interactive,
    /// A continuous follow of a container's combined log output.
    #[serde(rename = "logs")]
    LogFollow,
}

impl SessionKind {
    /// Returns the wire discriminator for this kind (`cli` or `logs`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Interactive => "cli",
            SessionKind::LogFollow => "logs",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cli" => Ok(SessionKind::Interactive),
            "logs" => Ok(SessionKind::LogFollow),
            other => Err(ProtocolError::UnknownKind(other.to_string())),
        }
    }
}

/// Structured wire form of client messages.
///
/// This is the shape actually sent by the browser terminal; it exists
/// separately from [`ClientFrame`] so that a failed parse can fall back to
/// raw input instead of surfacing a decode error.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireFrame {
    Resize { cols: u16, rows: u16 },
    Input { data: String },
}

/// A decoded inbound client frame.
///
/// `Raw` is the decode fallback, not an exceptional path: any payload that
/// fails structured parsing is forwarded verbatim as terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientFrame {
    /// Terminal resize request.
    Resize {
        /// New terminal columns.
        cols: u16,
        /// New terminal rows.
        rows: u16,
    },
    /// Keyboard input destined for the process.
    Input(String),
    /// Unstructured payload forwarded verbatim.
    Raw(Vec<u8>),
}

impl ClientFrame {
    /// Decodes an inbound payload.
    ///
    /// Never fails: unrecognized or malformed payloads decode to
    /// [`ClientFrame::Raw`] carrying the original bytes.
    pub fn decode(payload: &[u8]) -> Self {
        match serde_json::from_slice::<WireFrame>(payload) {
            Ok(WireFrame::Resize { cols, rows }) => ClientFrame::Resize { cols, rows },
            Ok(WireFrame::Input { data }) => ClientFrame::Input(data),
            Err(_) => ClientFrame::Raw(payload.to_vec()),
        }
    }
}

/// A structured server-to-client frame.
///
/// Regular terminal output is sent as raw bytes; this type covers the
/// protocol-level messages that must be distinguishable from output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    /// A protocol-level failure report.
    Error {
        /// Human-readable description of the failure.
        message: String,
    },
}

impl ServerFrame {
    /// Creates an error frame with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerFrame::Error {
            message: message.into(),
        }
    }

    /// Serializes the frame to its JSON wire form.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"type":"error","message":"internal serialization failure"}"#.to_string()
        })
    }
}
