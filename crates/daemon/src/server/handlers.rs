//! HTTP handlers for the container engine facade.
//!
//! Every handler is a stateless request/parse/respond wrapper around one
//! engine CLI invocation. Listing endpoints return JSON, lifecycle
//! endpoints return plain text, and failures map to 400 (missing or invalid
//! parameters), 404 (unknown container or image) or 500 (engine failure).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use protocol::{
    ContainerStatsEntry, ContainerSummary, ImageSummary, RenameRequest, RenameResponse,
    RunRequest, StatsRequest,
};

use crate::engine::{EngineError, LaunchSpec};

use super::AppState;

/// An error response carrying an HTTP status and a human-readable message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// A 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// A 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Maps an engine error to a response, prefixing the given context.
    pub fn from_engine(context: &str, err: EngineError) -> Self {
        let status = match &err {
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: format!("{}: {}", context, err),
        }
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

/// Rejects a missing or empty required parameter with a 400.
fn require_param(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::bad_request(message)),
    }
}

/// Query string carrying an image name.
#[derive(Debug, Default, Deserialize)]
pub struct ImageQuery {
    pub imagename: Option<String>,
}

/// Query string carrying a container name.
#[derive(Debug, Default, Deserialize)]
pub struct ContainerQuery {
    pub cname: Option<String>,
}

/// `GET /ps-all` — all containers, running and stopped.
pub async fn list_containers(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContainerSummary>>, ApiError> {
    let containers = state
        .engine
        .list_containers()
        .await
        .map_err(|e| ApiError::from_engine("Error listing all containers", e))?;
    Ok(Json(containers))
}

/// `GET /images` — all local images.
pub async fn list_images(
    State(state): State<AppState>,
) -> Result<Json<Vec<ImageSummary>>, ApiError> {
    let images = state
        .engine
        .list_images()
        .await
        .map_err(|e| ApiError::from_engine("Error listing images", e))?;
    Ok(Json(images))
}

/// `POST /run` — launch N named containers.
pub async fn run_containers(
    State(state): State<AppState>,
    Json(req): Json<RunRequest>,
) -> Result<Response, ApiError> {
    let (cname, cimage, count) = match (req.cname, req.cimage, req.num_containers) {
        (Some(cname), Some(cimage), Some(count)) if !cname.is_empty() && !cimage.is_empty() => {
            (cname, cimage, count)
        }
        _ => {
            return Err(ApiError::bad_request(
                "Error: Container name, image, and number of containers are required.",
            ));
        }
    };

    let env = req
        .env_vars
        .into_iter()
        .filter(|var| !var.key.is_empty() && !var.value.is_empty())
        .map(|var| (var.key, var.value))
        .collect();
    let ports = req
        .port_mappings
        .into_iter()
        .filter(|pm| pm.host_port != 0 && pm.container_port != 0)
        .map(|pm| (pm.host_port, pm.container_port))
        .collect();

    let spec = LaunchSpec {
        cname,
        cimage,
        count,
        env,
        ports,
    };
    spec.validate()
        .map_err(|e| ApiError::from_engine("Error validating launch request", e))?;

    let summary = state.engine.launch_containers(&spec).await;
    let status = if summary.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((status, Json(summary)).into_response())
}

/// `GET /pull?imagename=` — pull an image.
pub async fn pull_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<String, ApiError> {
    let image = require_param(query.imagename, "Error: Image name is required to pull.")?;
    let output = state
        .engine
        .pull_image(&image)
        .await
        .map_err(|e| ApiError::from_engine("Error pulling image", e))?;
    Ok(format!(
        "Image '{}' pulled successfully: {}",
        image,
        output.trim()
    ))
}

/// `GET /rmi?imagename=` — force-remove an image.
pub async fn remove_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<String, ApiError> {
    let image = require_param(query.imagename, "Error: Image name is required to remove.")?;
    let output = state
        .engine
        .remove_image(&image)
        .await
        .map_err(|e| ApiError::from_engine("Error removing image", e))?;
    Ok(format!(
        "Image '{}' removed successfully: {}",
        image,
        output.trim()
    ))
}

/// `GET /stop?cname=` — stop a container.
pub async fn stop_container(
    State(state): State<AppState>,
    Query(query): Query<ContainerQuery>,
) -> Result<String, ApiError> {
    let name = require_param(query.cname, "Error: Container name is required to stop.")?;
    let output = state
        .engine
        .stop_container(&name)
        .await
        .map_err(|e| ApiError::from_engine("Error stopping container", e))?;
    Ok(format!(
        "Container '{}' stopped successfully: {}",
        name,
        output.trim()
    ))
}

/// `GET /start?cname=` — start a stopped container.
pub async fn start_container(
    State(state): State<AppState>,
    Query(query): Query<ContainerQuery>,
) -> Result<String, ApiError> {
    let name = require_param(query.cname, "Error: Container name is required to start.")?;
    let output = state
        .engine
        .start_container(&name)
        .await
        .map_err(|e| ApiError::from_engine("Error starting container", e))?;
    Ok(format!(
        "Container '{}' started successfully: {}",
        name,
        output.trim()
    ))
}

/// `GET /rm?cname=` — force-remove a container.
pub async fn remove_container(
    State(state): State<AppState>,
    Query(query): Query<ContainerQuery>,
) -> Result<String, ApiError> {
    let name = require_param(query.cname, "Error: Container name is required to remove.")?;
    let output = state
        .engine
        .remove_container(&name)
        .await
        .map_err(|e| ApiError::from_engine("Error removing container", e))?;
    Ok(format!(
        "Container '{}' removed successfully: {}",
        name,
        output.trim()
    ))
}

/// `GET /container-details?cname=` — full inspection report for one
/// container.
pub async fn container_details(
    State(state): State<AppState>,
    Query(query): Query<ContainerQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let name = require_param(query.cname, "Container name is required to get details.")?;
    let details = state
        .engine
        .inspect_container(&name)
        .await
        .map_err(|e| match e {
            EngineError::NotFound(_) => {
                ApiError::not_found(format!("Container '{}' not found.", name))
            }
            other => ApiError::from_engine("Error inspecting container", other),
        })?;
    Ok(Json(details))
}

/// `POST /rename-container` — rename a container.
pub async fn rename_container(
    State(state): State<AppState>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<RenameResponse>, ApiError> {
    let (old_name, new_name) = match (req.old_name, req.new_name) {
        (Some(old_name), Some(new_name)) if !old_name.is_empty() && !new_name.is_empty() => {
            (old_name, new_name)
        }
        _ => {
            return Err(ApiError::bad_request(
                "Both old and new container names are required for renaming.",
            ));
        }
    };

    let stdout = state
        .engine
        .rename_container(&old_name, &new_name)
        .await
        .map_err(|e| ApiError::from_engine("Error renaming container", e))?;

    Ok(Json(RenameResponse {
        message: format!(
            "Container '{}' successfully renamed to '{}'.",
            old_name, new_name
        ),
        stdout: stdout.trim().to_string(),
    }))
}

/// `POST /container-stats` — one resource snapshot per named container.
pub async fn container_stats(
    State(state): State<AppState>,
    Json(req): Json<StatsRequest>,
) -> Result<Json<Vec<ContainerStatsEntry>>, ApiError> {
    if req.container_names.is_empty() {
        return Err(ApiError::bad_request(
            "An array of container names is required to get stats.",
        ));
    }

    let stats = state
        .engine
        .container_stats(&req.container_names)
        .await
        .map_err(|e| ApiError::from_engine("Error fetching container stats", e))?;
    Ok(Json(stats))
}
