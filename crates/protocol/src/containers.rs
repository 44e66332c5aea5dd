//! Request and response types for the control panel HTTP surface.
//!
//! Field names follow the JSON casing the browser client sends and expects
//! (camelCase), independent of the Rust naming on this side.

use serde::{Deserialize, Serialize};

/// One row of the container listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    /// Container name.
    pub name: String,
    /// Image the container was created from.
    pub image: String,
    /// Engine-reported status string (e.g. "Up 5 minutes").
    pub status: String,
}

/// One row of the image listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    /// Image repository.
    pub repository: String,
    /// Image tag.
    pub tag: String,
}

/// An environment variable entry for container launch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    /// Variable name.
    #[serde(default)]
    pub key: String,
    /// Variable value.
    #[serde(default)]
    pub value: String,
}

/// A host-to-container port mapping for container launch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    /// Port on the host.
    #[serde(default)]
    pub host_port: u16,
    /// Port inside the container.
    #[serde(default)]
    pub container_port: u16,
}

/// Request body for launching containers.
///
/// The three leading fields are required; a missing one is rejected with a
/// 400 rather than a body-decode failure, so they are optional here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    /// Base container name; instances are named `<cname>-1..N`.
    pub cname: Option<String>,
    /// Image to launch.
    pub cimage: Option<String>,
    /// Number of containers to launch.
    pub num_containers: Option<u32>,
    /// Environment variables applied to every container.
    #[serde(default)]
    pub env_vars: Vec<EnvVar>,
    /// Port mappings applied to every container.
    #[serde(default)]
    pub port_mappings: Vec<PortMapping>,
}

/// Outcome summary of a launch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Human-readable overall outcome.
    pub message: String,
    /// Per-container result lines.
    pub details: Vec<String>,
    /// Whether every launch succeeded.
    pub success: bool,
}

/// Request body for renaming a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    /// Current container name.
    pub old_name: Option<String>,
    /// Desired container name.
    pub new_name: Option<String>,
}

/// Response body for a successful rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Raw engine output, if any.
    pub stdout: String,
}

/// Request body for the stats endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRequest {
    /// Names of the containers to sample.
    #[serde(default)]
    pub container_names: Vec<String>,
}

/// A single-container resource snapshot.
///
/// Field names mirror the engine's own JSON stats output so the values pass
/// through untransformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerStatsEntry {
    /// Short container id.
    #[serde(default, rename = "ID")]
    pub id: String,
    /// Container name.
    #[serde(default, rename = "Name")]
    pub name: String,
    /// CPU usage percentage (e.g. "0.13%").
    #[serde(default, rename = "CPUPerc")]
    pub cpu_perc: String,
    /// Memory usage over limit (e.g. "4.1MiB / 7.6GiB").
    #[serde(default, rename = "MemUsage")]
    pub mem_usage: String,
    /// Memory usage percentage.
    #[serde(default, rename = "MemPerc")]
    pub mem_perc: String,
    /// Network I/O totals.
    #[serde(default, rename = "NetIO")]
    pub net_io: String,
    /// Block I/O totals.
    #[serde(default, rename = "BlockIO")]
    pub block_io: String,
    /// Number of processes in the container.
    #[serde(default, rename = "PIDs")]
    pub pids: String,
}
