//! The codebase tree schema — the strict hierarchical target of structured
//! extraction.
//!
//! The grammar is strictly acyclic by construction: folders own their
//! subfolders, so no serialized input can express a cycle. Missing `folders`
//! or `files` arrays default to empty, but an entirely empty root fails
//! validation — an empty tree is a content-validity error, not a degenerate
//! success.

use serde::{Deserialize, Serialize};

/// A single generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// File name, including its extension
    pub name: String,

    /// File body. Must survive JSON round-trips without corruption of
    /// escape sequences.
    pub content: String,
}

/// A folder, possibly containing subfolders and files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder name
    pub name: String,

    /// Subfolders inside this folder
    #[serde(default)]
    pub folders: Vec<FolderNode>,

    /// Files inside this folder
    #[serde(default)]
    pub files: Vec<FileNode>,
}

/// The root of the generated codebase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodebaseTree {
    /// Top-level folders
    #[serde(default)]
    pub folders: Vec<FolderNode>,

    /// Top-level files
    #[serde(default)]
    pub files: Vec<FileNode>,
}

impl CodebaseTree {
    /// Validate the tree against the schema invariants.
    ///
    /// - the root must contain at least one folder or file
    /// - every folder and file name must be non-empty
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.folders.is_empty() && self.files.is_empty() {
            return Err("tree must contain at least one folder or file".into());
        }
        for file in &self.files {
            validate_file(file)?;
        }
        for folder in &self.folders {
            validate_folder(folder)?;
        }
        Ok(())
    }

    /// Total number of files in the tree.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.folders.iter().map(folder_file_count).sum::<usize>()
    }

    /// A human-readable schema description, embedded into generation and
    /// repair prompts so the model knows the exact target shape.
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "description": "Root of the generated codebase. Must contain at least one folder or file.",
            "properties": {
                "folders": {
                    "type": "array",
                    "items": { "$ref": "#/definitions/folder" },
                    "description": "Top-level folders"
                },
                "files": {
                    "type": "array",
                    "items": { "$ref": "#/definitions/file" },
                    "description": "Top-level files"
                }
            },
            "definitions": {
                "folder": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": { "type": "string", "description": "Folder name" },
                        "folders": {
                            "type": "array",
                            "items": { "$ref": "#/definitions/folder" },
                            "description": "Subfolders inside this folder"
                        },
                        "files": {
                            "type": "array",
                            "items": { "$ref": "#/definitions/file" },
                            "description": "Files inside this folder"
                        }
                    }
                },
                "file": {
                    "type": "object",
                    "required": ["name", "content"],
                    "properties": {
                        "name": { "type": "string", "description": "File name with extension" },
                        "content": {
                            "type": "string",
                            "description": "File body as a valid JSON string; special characters escaped"
                        }
                    }
                }
            }
        })
    }
}

fn validate_file(file: &FileNode) -> std::result::Result<(), String> {
    if file.name.trim().is_empty() {
        return Err("file with empty name".into());
    }
    Ok(())
}

fn validate_folder(folder: &FolderNode) -> std::result::Result<(), String> {
    if folder.name.trim().is_empty() {
        return Err("folder with empty name".into());
    }
    for file in &folder.files {
        validate_file(file)?;
    }
    for sub in &folder.folders {
        validate_folder(sub)?;
    }
    Ok(())
}

fn folder_file_count(folder: &FolderNode) -> usize {
    folder.files.len() + folder.folders.iter().map(folder_file_count).sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_fails_validation() {
        let tree = CodebaseTree::default();
        let err = tree.validate().unwrap_err();
        assert!(err.contains("at least one"));
    }

    #[test]
    fn missing_arrays_default_to_empty() {
        let tree: CodebaseTree = serde_json::from_str(r#"{"files":[{"name":"a.txt","content":"x"}]}"#).unwrap();
        assert!(tree.folders.is_empty());
        assert_eq!(tree.files.len(), 1);
        tree.validate().unwrap();
    }

    #[test]
    fn nested_empty_name_rejected() {
        let tree = CodebaseTree {
            folders: vec![FolderNode {
                name: "Sources".into(),
                folders: vec![FolderNode {
                    name: "  ".into(),
                    folders: vec![],
                    files: vec![],
                }],
                files: vec![],
            }],
            files: vec![],
        };
        assert!(tree.validate().is_err());
    }

    #[test]
    fn file_count_recurses() {
        let tree = CodebaseTree {
            folders: vec![FolderNode {
                name: "App".into(),
                folders: vec![FolderNode {
                    name: "Views".into(),
                    folders: vec![],
                    files: vec![
                        FileNode { name: "Main.swift".into(), content: String::new() },
                        FileNode { name: "Sidebar.swift".into(), content: String::new() },
                    ],
                }],
                files: vec![FileNode { name: "App.swift".into(), content: String::new() }],
            }],
            files: vec![FileNode { name: "README.md".into(), content: String::new() }],
        };
        assert_eq!(tree.file_count(), 4);
    }

    #[test]
    fn content_escape_sequences_round_trip() {
        let tree = CodebaseTree {
            folders: vec![],
            files: vec![FileNode {
                name: "main.rs".into(),
                content: "fn main() {\n    println!(\"hi\\n\");\n}\n".into(),
            }],
        };
        let json = serde_json::to_string(&tree).unwrap();
        let back: CodebaseTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
