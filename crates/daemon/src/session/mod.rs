//! Session bridging between WebSocket clients and container processes.
//!
//! A session pairs one connection with one spawned child process — an
//! interactive PTY shell or a following log stream — and lives until either
//! side terminates.

pub mod bridge;
pub mod process;
pub mod registry;

pub use bridge::{CloseReason, SessionBridge};
pub use process::{
    InteractiveShell, LogFollowProcess, ProcessError, ProcessEvent, SessionProcess,
};
pub use registry::{SessionGuard, SessionInfo, SessionRegistry};
