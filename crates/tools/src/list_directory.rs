//! List-directory tool — newline-joined entry names inside the sandbox.

use crate::sandbox::Sandbox;
use appforge_core::error::ToolError;
use appforge_core::tool::{Tool, ToolResult};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Sentinel returned for a directory with no entries, so the model sees a
/// definite answer instead of an empty string.
pub const EMPTY_DIRECTORY: &str = "(empty directory)";

pub struct ListDirectoryTool {
    sandbox: Sandbox,
}

impl ListDirectoryTool {
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &str {
        "list_directory"
    }

    fn description(&self) -> &str {
        "List all files and directories inside a directory. Paths are relative to the project root."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The directory path to list, relative to the project root. Use \".\" for the root itself."
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

        let mut read_dir = match tokio::fs::read_dir(&resolved).await {
            Ok(rd) => rd,
            Err(e) => {
                warn!(path, error = %e, "Directory listing failed");
                return Ok(ToolResult::error(format!(
                    "Error listing directory {path}: {e}"
                )));
            }
        };

        let mut entries = Vec::new();
        loop {
            match read_dir.next_entry().await {
                Ok(Some(entry)) => entries.push(entry.file_name().to_string_lossy().into_owned()),
                Ok(None) => break,
                Err(e) => {
                    return Ok(ToolResult::error(format!(
                        "Error listing directory {path}: {e}"
                    )));
                }
            }
        }

        debug!(path, entries = entries.len(), "Listed directory");

        if entries.is_empty() {
            return Ok(ToolResult::ok(EMPTY_DIRECTORY));
        }

        entries.sort();
        Ok(ToolResult::ok(entries.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_sorted_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let tool = ListDirectoryTool::new(Sandbox::new(dir.path()));

        let result = tool.execute(serde_json::json!({ "path": "." })).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "a.txt\nb.txt\nsub");
    }

    #[tokio::test]
    async fn empty_directory_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ListDirectoryTool::new(Sandbox::new(dir.path()));

        let result = tool.execute(serde_json::json!({ "path": "." })).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, EMPTY_DIRECTORY);
    }

    #[tokio::test]
    async fn missing_directory_is_error_data() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ListDirectoryTool::new(Sandbox::new(dir.path()));

        let result = tool
            .execute(serde_json::json!({ "path": "nope" }))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.output.contains("Error listing directory"));
    }
}
