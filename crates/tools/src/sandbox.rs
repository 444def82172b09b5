//! Path containment under a single project root.
//!
//! Every tool resolves its path argument through [`Sandbox::resolve`] before
//! touching the file system. Resolution is lexical — no component may be
//! absolute, and `..` may never climb above the root — so containment holds
//! even for paths that do not exist yet.

use appforge_core::error::ToolError;
use std::path::{Component, Path, PathBuf};

/// A project root that all tool paths must stay under.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The sandbox root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a caller-supplied relative path against the root, rejecting
    /// anything that would escape it.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, ToolError> {
        if path.trim().is_empty() {
            return Err(ToolError::InvalidArguments("path must not be empty".into()));
        }

        let candidate = Path::new(path);
        if candidate.is_absolute() {
            return Err(ToolError::SandboxViolation { path: path.into() });
        }

        let mut normalized: Vec<&std::ffi::OsStr> = Vec::new();
        for component in candidate.components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if normalized.pop().is_none() {
                        return Err(ToolError::SandboxViolation { path: path.into() });
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(ToolError::SandboxViolation { path: path.into() });
                }
            }
        }

        let mut resolved = self.root.clone();
        for part in normalized {
            resolved.push(part);
        }

        debug_assert!(resolved.starts_with(&self.root));
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox() -> Sandbox {
        Sandbox::new("/workspace/project")
    }

    #[test]
    fn plain_relative_path_resolves_under_root() {
        let resolved = sandbox().resolve("src/main.rs").unwrap();
        assert_eq!(resolved, PathBuf::from("/workspace/project/src/main.rs"));
    }

    #[test]
    fn cur_dir_components_collapse() {
        let resolved = sandbox().resolve("./src/./lib.rs").unwrap();
        assert_eq!(resolved, PathBuf::from("/workspace/project/src/lib.rs"));
    }

    #[test]
    fn parent_dir_within_bounds_is_allowed() {
        let resolved = sandbox().resolve("src/../docs/readme.md").unwrap();
        assert_eq!(resolved, PathBuf::from("/workspace/project/docs/readme.md"));
    }

    #[test]
    fn traversal_above_root_rejected() {
        let err = sandbox().resolve("../../../etc/passwd").unwrap_err();
        assert!(matches!(err, ToolError::SandboxViolation { .. }));
    }

    #[test]
    fn traversal_after_descent_rejected() {
        let err = sandbox().resolve("src/../../outside.txt").unwrap_err();
        assert!(matches!(err, ToolError::SandboxViolation { .. }));
    }

    #[test]
    fn absolute_path_rejected() {
        let err = sandbox().resolve("/etc/passwd").unwrap_err();
        assert!(matches!(err, ToolError::SandboxViolation { .. }));
    }

    #[test]
    fn empty_path_is_invalid_arguments() {
        let err = sandbox().resolve("  ").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
