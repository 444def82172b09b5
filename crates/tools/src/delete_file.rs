//! Delete-file tool — remove a file inside the sandbox.

use crate::sandbox::Sandbox;
use appforge_core::error::ToolError;
use appforge_core::tool::{Tool, ToolResult};
use async_trait::async_trait;
use tracing::{debug, warn};

pub struct DeleteFileTool {
    sandbox: Sandbox,
}

impl DeleteFileTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for DeleteFileTool {
    fn name(&self) -> &str {
        "delete_file"
    }

    fn description(&self) -> &str {
        "Delete a file. Paths are relative to the project root."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The file path to delete, relative to the project root"
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

        match tokio::fs::remove_file(&resolved).await {
            Ok(()) => {
                debug!(path, "Deleted file");
                Ok(ToolResult::ok(format!("File deleted: {path}")))
            }
            Err(e) => {
                warn!(path, error = %e, "File delete failed");
                Ok(ToolResult::error(format!("Error deleting file {path}: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delete_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doomed.txt"), "bye").unwrap();
        let tool = DeleteFileTool::new(Sandbox::new(dir.path()));

        let result = tool
            .execute(serde_json::json!({ "path": "doomed.txt" }))
            .await
            .unwrap();

        assert!(result.success);
        assert!(!dir.path().join("doomed.txt").exists());
    }

    #[tokio::test]
    async fn delete_missing_file_is_error_data() {
        let dir = tempfile::tempdir().unwrap();
        let tool = DeleteFileTool::new(Sandbox::new(dir.path()));

        let result = tool
            .execute(serde_json::json!({ "path": "absent.txt" }))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.output.contains("Error deleting file"));
    }
}
