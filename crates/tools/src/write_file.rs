//! Write-file tool — create or overwrite a file inside the sandbox.

use crate::sandbox::Sandbox;
use appforge_core::error::ToolError;
use appforge_core::tool::{Tool, ToolResult};
use async_trait::async_trait;
use tracing::{debug, warn};

pub struct WriteFileTool {
    sandbox: Sandbox,
}

impl WriteFileTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write text into a file (overwrite if exists). Paths are relative to the project root."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The file path to write, relative to the project root"
                },
                "text": {
                    "type": "string",
                    "description": "The content to write"
                }
            },
            "required": ["path", "text"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let path = arguments["path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'path' argument".into()))?;
        let text = arguments["text"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'text' argument".into()))?;

        let resolved = self.sandbox.resolve(path)?;

        if let Some(parent) = resolved.parent()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            warn!(path, error = %e, "Failed to create parent directory");
            return Ok(ToolResult::error(format!(
                "Error writing file {path}: failed to create parent directory: {e}"
            )));
        }

        match tokio::fs::write(&resolved, text).await {
            Ok(()) => {
                debug!(path, bytes = text.len(), "Wrote file");
                Ok(ToolResult::ok(format!("File written: {path}")))
            }
            Err(e) => {
                warn!(path, error = %e, "File write failed");
                Ok(ToolResult::error(format!("Error writing file {path}: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_definition() {
        let tool = WriteFileTool::new(Sandbox::new("/tmp"));
        assert_eq!(tool.name(), "write_file");
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"], serde_json::json!(["path", "text"]));
    }

    #[tokio::test]
    async fn write_and_verify() {
        let dir = tempfile::tempdir().unwrap();
        let tool = WriteFileTool::new(Sandbox::new(dir.path()));

        let result = tool
            .execute(serde_json::json!({ "path": "out.txt", "text": "Hello from test!" }))
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("out.txt"));
        let content = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(content, "Hello from test!");
    }

    #[tokio::test]
    async fn write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let tool = WriteFileTool::new(Sandbox::new(dir.path()));

        let result = tool
            .execute(serde_json::json!({ "path": "nested/dir/file.txt", "text": "nested" }))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("nested/dir/file.txt")).unwrap(),
            "nested"
        );
    }

    #[tokio::test]
    async fn overwrite_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), "old content").unwrap();
        let tool = WriteFileTool::new(Sandbox::new(dir.path()));

        let result = tool
            .execute(serde_json::json!({ "path": "f.txt", "text": "new content" }))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("f.txt")).unwrap(),
            "new content"
        );
    }

    #[tokio::test]
    async fn missing_arguments_rejected() {
        let tool = WriteFileTool::new(Sandbox::new("/tmp"));
        assert!(tool.execute(serde_json::json!({ "text": "x" })).await.is_err());
        assert!(tool.execute(serde_json::json!({ "path": "a.txt" })).await.is_err());
    }

    #[tokio::test]
    async fn traversal_is_a_sandbox_violation() {
        let dir = tempfile::tempdir().unwrap();
        let tool = WriteFileTool::new(Sandbox::new(dir.path()));

        let err = tool
            .execute(serde_json::json!({ "path": "../escape.txt", "text": "nope" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::SandboxViolation { .. }));
    }
}
