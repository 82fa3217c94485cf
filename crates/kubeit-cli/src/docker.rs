//! Image labels through the `docker` command line

use indexmap::IndexMap;
use kubeit_core::ImageLabelSource;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Reads image labels with `docker image inspect`, pulling missing images
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            program: std::env::var("KUBEIT_DOCKER").unwrap_or_else(|_| "docker".to_string()),
        }
    }

    fn inspect(&self, image: &str) -> Result<Option<IndexMap<String, String>>, String> {
        let output = Command::new(&self.program)
            .args(["image", "inspect", "--format", "{{json .Config.Labels}}", image])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| format!("failed to run {}: {}", self.program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("No such image") {
                return Ok(None);
            }
            return Err(format!("failed to inspect image: {}", stderr.trim()));
        }

        parse_labels(&String::from_utf8_lossy(&output.stdout)).map(Some)
    }

    fn pull(&self, image: &str) -> Result<(), String> {
        info!("Pulling Docker image {}", image);
        let status = Command::new(&self.program)
            .args(["pull", "--quiet", image])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|e| format!("failed to run {}: {}", self.program, e))?;

        if status.success() {
            info!("Docker image {} pulled successfully", image);
            Ok(())
        } else {
            Err(format!("failed to pull Docker image {}", image))
        }
    }
}

impl ImageLabelSource for DockerCli {
    fn labels(&self, image: &str) -> Result<IndexMap<String, String>, String> {
        if let Some(labels) = self.inspect(image)? {
            return Ok(labels);
        }

        debug!("Docker image {} not found locally", image);
        self.pull(image)?;

        self.inspect(image)?
            .ok_or_else(|| "failed to find image after pulling".to_string())
    }
}

/// Labels printed by `--format '{{json .Config.Labels}}'`; `null` means none
fn parse_labels(output: &str) -> Result<IndexMap<String, String>, String> {
    let labels: Option<IndexMap<String, String>> = serde_json::from_str(output.trim())
        .map_err(|e| format!("failed to parse image labels: {}", e))?;
    Ok(labels.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        let labels = parse_labels("{\"kubeit.io/version\":\"0.3.0\",\"a\":\"b\"}\n").unwrap();
        assert_eq!(labels["kubeit.io/version"], "0.3.0");
        assert_eq!(labels.len(), 2);

        assert!(parse_labels("null\n").unwrap().is_empty());
        assert!(parse_labels("not json").is_err());
    }
}
