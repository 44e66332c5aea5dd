//! # Dockhand Protocol Library
//!
//! This crate defines the wire types shared between the Dockhand daemon and
//! its browser client:
//!
//! - **Session frames**: the messages exchanged over a session WebSocket —
//!   structured client control messages with a raw-input fallback, and the
//!   structured error frame the server emits for protocol-level failures.
//! - **Control panel DTOs**: request and response bodies for the HTTP
//!   surface that wraps the container engine CLI (listings, launches,
//!   renames, stats).
//!
//! The session protocol is deliberately forgiving on the inbound side: a
//! payload that does not parse as a structured message is terminal input,
//! not an error. See [`messages::ClientFrame::decode`].

pub mod containers;
pub mod error;
pub mod messages;

pub use containers::{
    ContainerStatsEntry, ContainerSummary, EnvVar, ImageSummary, PortMapping, RenameRequest,
    RenameResponse, RunRequest, RunSummary, StatsRequest,
};
pub use error::{ProtocolError, Result};
pub use messages::{ClientFrame, ServerFrame, SessionKind};
