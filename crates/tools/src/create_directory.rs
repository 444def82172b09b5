//! Create-directory tool — recursive create inside the sandbox.

use crate::sandbox::Sandbox;
use appforge_core::error::ToolError;
use appforge_core::tool::{Tool, ToolResult};
use async_trait::async_trait;
use tracing::{debug, warn};

pub struct CreateDirectoryTool {
    sandbox: Sandbox,
}

impl CreateDirectoryTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for CreateDirectoryTool {
    fn name(&self) -> &str {
        "create_directory"
    }

    fn description(&self) -> &str {
        "Create a directory (including parent dirs if missing). Succeeds if it already exists."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The directory path to create, relative to the project root"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let path = arguments["path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'path' argument".into()))?;

        let resolved = self.sandbox.resolve(path)?;

        match tokio::fs::create_dir_all(&resolved).await {
            Ok(()) => {
                debug!(path, "Created directory");
                Ok(ToolResult::ok(format!("Directory created: {path}")))
            }
            Err(e) => {
                warn!(path, error = %e, "Directory create failed");
                Ok(ToolResult::error(format!(
                    "Error creating directory {path}: {e}"
                )))
            }
        }
    }
}
