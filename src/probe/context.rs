//! Per-ABI mutable state threaded through module resolution.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// State owned by one resolution run for one ABI.
///
/// Nothing here is shared between ABIs, so ABIs can be resolved in parallel.
#[derive(Debug, Default)]
pub struct ProbeContext {
    /// ABI being resolved; empty for single-ABI installations.
    pub abi: String,
    /// Linker-metadata files already found missing, so each is reported once.
    missing_metadata_files: HashSet<PathBuf>,
    /// Modules on the current dependency-traversal path.
    traversal: Vec<String>,
}

impl ProbeContext {
    pub fn new(abi: impl Into<String>) -> Self {
        ProbeContext {
            abi: abi.into(),
            missing_metadata_files: HashSet::new(),
            traversal: Vec::new(),
        }
    }

    /// Record a missing metadata file. Returns `true` the first time a path
    /// is seen.
    pub fn note_missing(&mut self, path: &Path) -> bool {
        self.missing_metadata_files.insert(path.to_path_buf())
    }

    /// Push `module` onto the traversal path. Returns `false` without pushing
    /// if it is already on the path.
    pub fn enter(&mut self, module: &str) -> bool {
        if self.traversal.iter().any(|m| m == module) {
            return false;
        }
        self.traversal.push(module.to_string());
        true
    }

    pub fn leave(&mut self) {
        self.traversal.pop();
    }

    pub fn traversal_depth(&self) -> usize {
        self.traversal.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reported_once() {
        let mut ctx = ProbeContext::new("arm64-v8a");
        let path = Path::new("/sdk/lib/libQt5Foo_arm64-v8a.prl");
        assert!(ctx.note_missing(path));
        assert!(!ctx.note_missing(path));
    }

    #[test]
    fn test_traversal_guard() {
        let mut ctx = ProbeContext::default();
        assert!(ctx.enter("core"));
        assert!(ctx.enter("gui"));
        assert!(!ctx.enter("core"));
        assert_eq!(ctx.traversal_depth(), 2);
        ctx.leave();
        ctx.leave();
        assert!(ctx.enter("core"));
    }
}
