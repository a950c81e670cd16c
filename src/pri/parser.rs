//! Line-oriented `KEY = VALUE` / `KEY += VALUE` files with `include(...)`.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::core::{ProbeError, Result};

const INCLUDE_DIRECTIVE: &str = "include(";

/// Read `path` and splice in every `include(...)` it references, recursively.
///
/// Empty lines are dropped. Include paths are relative to the including file
/// unless absolute. A malformed directive or an unreadable nested include is
/// logged and skipped; an include that would re-enter a file already on the
/// include chain is skipped as well. Only failure to read `path` itself is an
/// error.
pub fn parse_lines(path: &Path) -> Result<Vec<String>> {
    let mut chain = Vec::new();
    read_recursive(path, &mut chain)
}

fn read_recursive(path: &Path, chain: &mut Vec<PathBuf>) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| ProbeError::io(path, e))?;
    chain.push(chain_key(path));

    let mut lines = Vec::new();
    for raw in content.lines().filter(|l| !l.is_empty()) {
        let Some(rest) = raw.trim().strip_prefix(INCLUDE_DIRECTIVE) else {
            lines.push(raw.to_string());
            continue;
        };
        let Some(close) = rest.find(')') else {
            tracing::warn!("Invalid include statement in '{}'", path.display());
            continue;
        };

        let included = resolve_include(path, &rest[..close]);
        if chain.contains(&chain_key(&included)) {
            tracing::warn!(
                "Recursive include of '{}' in '{}' ignored",
                included.display(),
                path.display()
            );
            continue;
        }

        match read_recursive(&included, chain) {
            Ok(included_lines) => lines.extend(included_lines),
            Err(e) => tracing::warn!("Skipping include in '{}': {}", path.display(), e),
        }
    }

    chain.pop();
    Ok(lines)
}

fn resolve_include(including: &Path, target: &str) -> PathBuf {
    let target = Path::new(target.trim());
    if target.is_absolute() {
        return target.to_path_buf();
    }
    including
        .parent()
        .map(|dir| dir.join(target))
        .unwrap_or_else(|| target.to_path_buf())
}

fn chain_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn assignment_regex(key: &str) -> Option<Regex> {
    Regex::new(&format!(r"^\s*{}\s*\+?=(.*)", regex::escape(key))).ok()
}

/// Value of the first line assigning `key`, trimmed.
///
/// Both `=` and `+=` match, and only the first matching line counts, so a
/// key appended to over several lines yields just its first chunk.
pub fn variable<S: AsRef<str>>(lines: &[S], key: &str) -> Option<String> {
    let re = assignment_regex(key)?;
    lines.iter().find_map(|line| {
        re.captures(line.as_ref())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    })
}

/// [`variable`] split on whitespace.
pub fn variable_items<S: AsRef<str>>(lines: &[S], key: &str) -> Vec<String> {
    variable(lines, key)
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Read a file and return its lines without resolving includes.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| ProbeError::io(path, e))?;
    Ok(content.lines().map(str::to_string).collect())
}
