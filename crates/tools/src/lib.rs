//! Sandboxed file-system tools for the materialization agent.
//!
//! Five idempotent operations, each rooted under a single configured project
//! directory so no path may escape it. All five report their outcomes as
//! data (success marker or error text) rather than thrown faults — the
//! consumer is a model reasoning over text.

pub mod create_directory;
pub mod delete_file;
pub mod list_directory;
pub mod read_file;
pub mod sandbox;
pub mod write_file;

pub use create_directory::CreateDirectoryTool;
pub use delete_file::DeleteFileTool;
pub use list_directory::{EMPTY_DIRECTORY, ListDirectoryTool};
pub use read_file::ReadFileTool;
pub use sandbox::Sandbox;
pub use write_file::WriteFileTool;

use appforge_core::tool::ToolRegistry;
use std::path::Path;

/// Create the materialization tool registry, all five tools sharing one
/// sandbox rooted at the given project directory.
pub fn registry_for(project_root: impl AsRef<Path>) -> ToolRegistry {
    let sandbox = Sandbox::new(project_root.as_ref());
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(WriteFileTool::new(sandbox.clone())));
    registry.register(Box::new(ReadFileTool::new(sandbox.clone())));
    registry.register(Box::new(DeleteFileTool::new(sandbox.clone())));
    registry.register(Box::new(CreateDirectoryTool::new(sandbox.clone())));
    registry.register(Box::new(ListDirectoryTool::new(sandbox)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use appforge_core::tool::ToolCall;

    #[test]
    fn registry_exposes_all_five_tools() {
        let registry = registry_for("/tmp/project");
        let mut names = registry.names();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "create_directory",
                "delete_file",
                "list_directory",
                "read_file",
                "write_file"
            ]
        );
    }

    #[tokio::test]
    async fn write_read_delete_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_for(dir.path());

        let write = registry
            .execute(&ToolCall {
                id: "1".into(),
                name: "write_file".into(),
                arguments: serde_json::json!({ "path": "a/b.txt", "text": "hi" }),
            })
            .await
            .unwrap();
        assert!(write.success);

        let read = registry
            .execute(&ToolCall {
                id: "2".into(),
                name: "read_file".into(),
                arguments: serde_json::json!({ "path": "a/b.txt" }),
            })
            .await
            .unwrap();
        assert!(read.success);
        assert_eq!(read.output, "hi");

        let delete = registry
            .execute(&ToolCall {
                id: "3".into(),
                name: "delete_file".into(),
                arguments: serde_json::json!({ "path": "a/b.txt" }),
            })
            .await
            .unwrap();
        assert!(delete.success);

        // Reading the deleted file is an error marker, not an exception.
        let read_again = registry
            .execute(&ToolCall {
                id: "4".into(),
                name: "read_file".into(),
                arguments: serde_json::json!({ "path": "a/b.txt" }),
            })
            .await
            .unwrap();
        assert!(!read_again.success);
        assert!(read_again.output.contains("Error reading file"));
    }
}
