//! Container engine command facade.
//!
//! Provides an async interface to the container engine CLI (docker or
//! podman) for the non-interactive control panel operations: listing,
//! launching, stopping, removing, inspecting and renaming containers and
//! images, and sampling resource stats. Interactive sessions and log
//! follows are handled separately by the session module; this facade only
//! covers request/response commands.

mod error;
mod parse;

pub use error::{EngineError, EngineResult};
pub use parse::{validate_container_name, validate_env_var_key, validate_image_name};

use std::process::Stdio;

use futures_util::future::join_all;
use tokio::process::Command;

use protocol::{ContainerStatsEntry, ContainerSummary, ImageSummary, RunSummary};

use crate::config::EngineConfig;
use parse::{parse_container_list, parse_image_list, parse_stats_output};

/// A validated container launch request.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Base name; instances are named `<cname>-1..N`.
    pub cname: String,
    /// Image to launch.
    pub cimage: String,
    /// Number of containers to launch.
    pub count: u32,
    /// Environment variables applied to every container.
    pub env: Vec<(String, String)>,
    /// Host-to-container port mappings applied to every container.
    pub ports: Vec<(u16, u16)>,
}

impl LaunchSpec {
    /// Validates all engine-bound fields of the launch request.
    pub fn validate(&self) -> EngineResult<()> {
        validate_container_name(&self.cname)?;
        validate_image_name(&self.cimage)?;
        for (key, _) in &self.env {
            validate_env_var_key(key)?;
        }
        Ok(())
    }
}

/// Client for the container engine CLI.
#[derive(Debug, Clone)]
pub struct EngineClient {
    /// Path or name of the engine binary.
    binary: String,
}

impl EngineClient {
    /// Creates a client for a specific engine binary.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Creates a client from configuration, probing the PATH when no binary
    /// is configured.
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        match &config.binary {
            Some(binary) => Ok(Self::new(binary.clone())),
            None => Self::detect(),
        }
    }

    /// Probes the PATH for an engine binary, preferring docker over podman.
    pub fn detect() -> EngineResult<Self> {
        for candidate in ["docker", "podman"] {
            if which::which(candidate).is_ok() {
                tracing::info!(engine = candidate, "Detected container engine");
                return Ok(Self::new(candidate));
            }
        }
        Err(EngineError::NoEngineAvailable)
    }

    /// Returns the engine binary in use.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Runs an engine command and returns its stdout.
    async fn run(&self, command: &str, args: &[&str]) -> EngineResult<String> {
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| EngineError::CommandFailed {
                command: command.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::CommandFailed {
                command: command.to_string(),
                message: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Checks that the engine is reachable, returning its version report.
    pub async fn version(&self) -> EngineResult<String> {
        self.run("version", &["version", "--format", "json"]).await
    }

    /// Lists all containers, running and stopped.
    pub async fn list_containers(&self) -> EngineResult<Vec<ContainerSummary>> {
        let output = self
            .run(
                "ps",
                &["ps", "-a", "--format", "{{.Names}}\t{{.Image}}\t{{.Status}}"],
            )
            .await?;
        Ok(parse_container_list(&output))
    }

    /// Lists all local images.
    pub async fn list_images(&self) -> EngineResult<Vec<ImageSummary>> {
        let output = self
            .run(
                "images",
                &["images", "--format", "{{.Repository}}\t{{.Tag}}"],
            )
            .await?;
        Ok(parse_image_list(&output))
    }

    /// Launches `spec.count` detached containers named `<cname>-1..N`.
    ///
    /// Individual launch failures do not abort the batch; the summary
    /// carries one result line per container and an overall success flag.
    pub async fn launch_containers(&self, spec: &LaunchSpec) -> RunSummary {
        let launches = (1..=spec.count).map(|i| {
            let name = format!("{}-{}", spec.cname, i);
            async move {
                match self.launch_one(&name, spec).await {
                    Ok(stdout) => (
                        true,
                        format!("Successfully launched '{}': {}", name, stdout.trim()),
                    ),
                    Err(err) => (false, format!("Failed to launch '{}': {}", name, err)),
                }
            }
        });

        let results = join_all(launches).await;
        let success_count = results.iter().filter(|(ok, _)| *ok).count();
        let failure_count = results.len() - success_count;
        let details = results.into_iter().map(|(_, line)| line).collect();

        if failure_count > 0 {
            RunSummary {
                message: format!(
                    "Launch completed with {} successes and {} failures.",
                    success_count, failure_count
                ),
                details,
                success: false,
            }
        } else {
            RunSummary {
                message: format!("Successfully launched {} container(s).", success_count),
                details,
                success: true,
            }
        }
    }

    async fn launch_one(&self, name: &str, spec: &LaunchSpec) -> EngineResult<String> {
        let mut args: Vec<String> = vec![
            "run".to_string(),
            "-dit".to_string(),
            "--name".to_string(),
            name.to_string(),
        ];

        for (key, value) in &spec.env {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }

        for (host, container) in &spec.ports {
            args.push("-p".to_string());
            args.push(format!("{}:{}", host, container));
        }

        args.push(spec.cimage.clone());

        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run("run", &arg_refs).await
    }

    /// Pulls an image from its registry.
    pub async fn pull_image(&self, image: &str) -> EngineResult<String> {
        validate_image_name(image)?;
        self.run("pull", &["pull", image]).await
    }

    /// Force-removes an image.
    pub async fn remove_image(&self, image: &str) -> EngineResult<String> {
        validate_image_name(image)?;
        self.run("rmi", &["rmi", "-f", image]).await
    }

    /// Stops a running container.
    pub async fn stop_container(&self, name: &str) -> EngineResult<String> {
        validate_container_name(name)?;
        self.run("stop", &["stop", name]).await
    }

    /// Starts a stopped container.
    pub async fn start_container(&self, name: &str) -> EngineResult<String> {
        validate_container_name(name)?;
        self.run("start", &["start", name]).await
    }

    /// Force-removes a container.
    pub async fn remove_container(&self, name: &str) -> EngineResult<String> {
        validate_container_name(name)?;
        self.run("rm", &["rm", "-f", name]).await
    }

    /// Inspects a single container, returning the engine's full report.
    pub async fn inspect_container(&self, name: &str) -> EngineResult<serde_json::Value> {
        validate_container_name(name)?;

        let output = match self.run("inspect", &["inspect", name]).await {
            Ok(output) => output,
            Err(EngineError::CommandFailed { message, .. })
                if is_not_found_message(&message) =>
            {
                return Err(EngineError::NotFound(name.to_string()));
            }
            Err(err) => return Err(err),
        };

        let mut details: Vec<serde_json::Value> = serde_json::from_str(&output)
            .map_err(|e| EngineError::ParseError(e.to_string()))?;
        if details.is_empty() {
            return Err(EngineError::NotFound(name.to_string()));
        }
        Ok(details.remove(0))
    }

    /// Renames a container.
    pub async fn rename_container(&self, old_name: &str, new_name: &str) -> EngineResult<String> {
        validate_container_name(old_name)?;
        validate_container_name(new_name)?;
        self.run("rename", &["rename", old_name, new_name]).await
    }

    /// Takes a single resource snapshot of the named containers.
    pub async fn container_stats(
        &self,
        names: &[String],
    ) -> EngineResult<Vec<ContainerStatsEntry>> {
        for name in names {
            validate_container_name(name)?;
        }

        let mut args = vec!["stats", "--no-stream", "--format", "{{json .}}"];
        args.extend(names.iter().map(String::as_str));

        let output = self.run("stats", &args).await?;
        Ok(parse_stats_output(&output))
    }
}

/// Whether an engine error message indicates a missing container or image.
fn is_not_found_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("no such object")
        || lower.contains("no such container")
        || lower.contains("no such image")
}
