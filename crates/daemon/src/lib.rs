//! # Dockhand Daemon Library
//!
//! This crate provides the server side of Dockhand, a thin web control
//! panel over a local container engine (docker or podman).
//!
//! ## Overview
//!
//! The daemon exposes two surfaces over one listening socket:
//!
//! - **Engine facade**: HTTP routes that shell out to the engine CLI to
//!   list, launch, stop, remove, inspect and rename containers and images,
//!   and to sample resource stats.
//! - **Session bridge**: a WebSocket endpoint that multiplexes a browser
//!   terminal onto a spawned child process — an interactive PTY shell
//!   inside a container, or a continuous follow of a container's logs.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        axum Router                         │
//! ├───────────────────────────┬────────────────────────────────┤
//! │      Engine Facade        │      Connection Listener       │
//! │  (HTTP request/response)  │        (GET /ws upgrade)       │
//! └───────────┬───────────────┴───────────────┬────────────────┘
//!             │                               │
//!     ┌───────▼────────┐              ┌───────▼────────┐
//!     │  EngineClient  │              │ SessionBridge  │
//!     │  (engine CLI)  │              │  (one/session) │
//!     └────────────────┘              └───────┬────────┘
//!                                     ┌───────▼────────┐
//!                                     │ SessionProcess │
//!                                     │  (PTY | logs)  │
//!                                     └────────────────┘
//! ```
//!
//! Each accepted session owns its process and its connection exclusively;
//! the first of {process exit, connection close} to fire drives teardown of
//! the other, exactly once.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and defaults
//! - [`engine`]: Container engine command facade
//! - [`session`]: Child process handles, the session bridge, the registry
//! - [`server`]: Router, HTTP handlers, WebSocket listener

pub mod config;
pub mod engine;
pub mod server;
pub mod session;

// Re-export protocol for convenience
pub use protocol;

// Re-export config types for convenience
pub use config::Config;

// Re-export engine types for convenience
pub use engine::{EngineClient, EngineError, EngineResult, LaunchSpec};

// Re-export session types for convenience
pub use session::{
    CloseReason, InteractiveShell, LogFollowProcess, ProcessError, ProcessEvent, SessionBridge,
    SessionGuard, SessionInfo, SessionProcess, SessionRegistry,
};

// Re-export server types for convenience
pub use server::{build_router, AppState};
