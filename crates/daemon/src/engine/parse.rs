//! Parsers for engine CLI output and validation of engine-bound inputs.
//!
//! Listings are requested with explicit `--format` templates (tab-separated
//! fields, or one JSON object per line for stats), so parsing stays
//! best-effort: a line that does not match the expected shape is skipped
//! with a warning rather than failing the whole request.

use protocol::{ContainerStatsEntry, ContainerSummary, ImageSummary};

use super::error::{EngineError, EngineResult};

/// Parses `ps --format "{{.Names}}\t{{.Image}}\t{{.Status}}"` output.
pub fn parse_container_list(output: &str) -> Vec<ContainerSummary> {
    let mut containers = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.splitn(3, '\t');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(name), Some(image), Some(status)) => containers.push(ContainerSummary {
                name: name.trim().to_string(),
                image: image.trim().to_string(),
                status: status.trim().to_string(),
            }),
            _ => {
                tracing::warn!(line, "Skipping malformed container listing line");
            }
        }
    }
    containers
}

/// Parses `images --format "{{.Repository}}\t{{.Tag}}"` output.
pub fn parse_image_list(output: &str) -> Vec<ImageSummary> {
    let mut images = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.splitn(2, '\t');
        match (fields.next(), fields.next()) {
            (Some(repository), Some(tag)) => images.push(ImageSummary {
                repository: repository.trim().to_string(),
                tag: tag.trim().to_string(),
            }),
            _ => {
                tracing::warn!(line, "Skipping malformed image listing line");
            }
        }
    }
    images
}

/// Parses `stats --no-stream --format "{{json .}}"` output.
///
/// Known limitation: a line the engine emits in an unexpected shape is
/// skipped, so the result may contain fewer entries than containers asked
/// about.
pub fn parse_stats_output(output: &str) -> Vec<ContainerStatsEntry> {
    let mut stats = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ContainerStatsEntry>(line) {
            Ok(entry) => stats.push(entry),
            Err(err) => {
                tracing::warn!(line, error = %err, "Skipping malformed stats line");
            }
        }
    }
    stats
}

/// Validate a container name.
///
/// Container names must be alphanumeric with hyphens and underscores, and
/// must start with an alphanumeric character or underscore.
pub fn validate_container_name(name: &str) -> EngineResult<()> {
    if name.is_empty() {
        return Err(EngineError::InvalidInput(
            "container name cannot be empty".to_string(),
        ));
    }

    if name.len() > 128 {
        return Err(EngineError::InvalidInput(
            "container name exceeds maximum length of 128 characters".to_string(),
        ));
    }

    let mut chars = name.chars();
    let first = chars.next().unwrap_or(' ');
    if !first.is_ascii_alphanumeric() && first != '_' {
        return Err(EngineError::InvalidInput(
            "container name must start with an alphanumeric character or underscore".to_string(),
        ));
    }

    let valid = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.';
    if !name.chars().all(valid) {
        return Err(EngineError::InvalidInput(format!(
            "container name '{}' contains invalid characters; only alphanumeric, '-', '_', '.' are allowed",
            name
        )));
    }

    Ok(())
}

/// Validate an image reference.
///
/// Image references follow the pattern
/// `[registry/][namespace/]name[:tag][@digest]`.
pub fn validate_image_name(image: &str) -> EngineResult<()> {
    if image.is_empty() {
        return Err(EngineError::InvalidInput(
            "image name cannot be empty".to_string(),
        ));
    }

    if image.len() > 256 {
        return Err(EngineError::InvalidInput(
            "image name exceeds maximum length of 256 characters".to_string(),
        ));
    }

    let valid = |c: char| {
        c.is_ascii_alphanumeric()
            || c == '.'
            || c == '-'
            || c == '_'
            || c == '/'
            || c == ':'
            || c == '@'
    };
    if !image.chars().all(valid) {
        return Err(EngineError::InvalidInput(format!(
            "image name '{}' contains invalid characters; only alphanumeric, '.', '-', '_', '/', ':', '@' are allowed",
            image
        )));
    }

    if image.contains("..") {
        return Err(EngineError::InvalidInput(
            "image name cannot contain '..'".to_string(),
        ));
    }

    Ok(())
}

/// Validate an environment variable key for container launch.
pub fn validate_env_var_key(key: &str) -> EngineResult<()> {
    if key.is_empty() {
        return Err(EngineError::InvalidInput(
            "environment variable key cannot be empty".to_string(),
        ));
    }

    let mut chars = key.chars();
    let first = chars.next().unwrap_or(' ');
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(EngineError::InvalidInput(format!(
            "environment variable key '{}' must start with a letter or underscore",
            key
        )));
    }

    let valid = |c: char| c.is_ascii_alphanumeric() || c == '_';
    if !key.chars().all(valid) {
        return Err(EngineError::InvalidInput(format!(
            "environment variable key '{}' contains invalid characters; only alphanumeric and '_' are allowed",
            key
        )));
    }

    Ok(())
}
