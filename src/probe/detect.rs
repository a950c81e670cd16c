//! Locating query executables in `PATH`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Wrapper script some distributions install in place of the real tool.
const WRAPPER_NAME: &str = "qtchooser";

/// Find query executables named after any of `names` in the process `PATH`.
pub fn find_query_executables(names: &[String]) -> Vec<PathBuf> {
    tracing::info!("Detecting Qt installations...");
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let found = find_in_path(names, std::env::var_os("PATH"), &cwd);
    if found.is_empty() {
        tracing::warn!(
            "Could not find any qmake executables in PATH. Either make sure a qmake \
             executable is present in PATH or pass the path to one explicitly."
        );
    }
    found
}

/// Find executables in an explicit search path.
///
/// Every hit is canonicalized unless the canonical file is the version
/// selector wrapper, in which case the symlink is kept so the wrapper can
/// pick the right installation from the name it was invoked as. Duplicates
/// are dropped, keeping `PATH` order.
pub fn find_in_path(
    names: &[String],
    path_value: Option<impl AsRef<OsStr>>,
    cwd: &Path,
) -> Vec<PathBuf> {
    let Some(path_value) = path_value else {
        return Vec::new();
    };

    let mut found: Vec<PathBuf> = Vec::new();
    for name in names {
        let Ok(hits) = which::which_in_all(name, Some(path_value.as_ref()), cwd) else {
            continue;
        };
        for candidate in hits {
            let candidate = prefer_canonical(candidate);
            if !found.contains(&candidate) {
                tracing::info!("Found Qt at '{}'.", candidate.display());
                found.push(candidate);
            }
        }
    }
    found
}

fn prefer_canonical(candidate: PathBuf) -> PathBuf {
    match std::fs::canonicalize(&candidate) {
        Ok(canonical) if !is_wrapper(&canonical) => canonical,
        _ => candidate,
    }
}

fn is_wrapper(path: &Path) -> bool {
    path.file_stem().and_then(OsStr::to_str) == Some(WRAPPER_NAME)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::{symlink, PermissionsExt};
    use tempfile::TempDir;

    fn write_executable(path: &Path) {
        std::fs::write(path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_finds_and_canonicalizes() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("qt/bin");
        let link_dir = tmp.path().join("usr/bin");
        std::fs::create_dir_all(&real).unwrap();
        std::fs::create_dir_all(&link_dir).unwrap();
        write_executable(&real.join("qmake"));
        symlink(real.join("qmake"), link_dir.join("qmake")).unwrap();

        let path = std::env::join_paths([&link_dir, &real]).unwrap();
        let found = find_in_path(&["qmake".to_string()], Some(path), tmp.path());

        let canonical = std::fs::canonicalize(real.join("qmake")).unwrap();
        assert_eq!(found, vec![canonical]);
    }

    #[test]
    fn test_keeps_symlink_to_wrapper() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        write_executable(&tmp.path().join(WRAPPER_NAME));
        symlink(tmp.path().join(WRAPPER_NAME), bin.join("qmake")).unwrap();

        let found = find_in_path(&["qmake".to_string()], Some(bin.as_os_str()), tmp.path());
        assert_eq!(found, vec![bin.join("qmake")]);
    }

    #[test]
    fn test_nothing_found() {
        let tmp = TempDir::new().unwrap();
        let found = find_in_path(&["qmake".to_string()], Some(tmp.path().as_os_str()), tmp.path());
        assert!(found.is_empty());
        assert!(find_in_path(&["qmake".to_string()], None::<&OsStr>, tmp.path()).is_empty());
    }
}
