//! Read-file tool — read text content from a file inside the sandbox.

use crate::sandbox::Sandbox;
use appforge_core::error::ToolError;
use appforge_core::tool::{Tool, ToolResult};
use async_trait::async_trait;
use tracing::{debug, warn};

pub struct ReadFileTool {
    sandbox: Sandbox,
}

impl ReadFileTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read text content from a file. Paths are relative to the project root."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The file path to read, relative to the project root"
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

        match tokio::fs::read_to_string(&resolved).await {
            Ok(content) => {
                debug!(path, bytes = content.len(), "Read file");
                Ok(ToolResult::ok(content))
            }
            Err(e) => {
                warn!(path, error = %e, "File read failed");
                Ok(ToolResult::error(format!("Error reading file {path}: {e}")))
            }
        }
    }
}
