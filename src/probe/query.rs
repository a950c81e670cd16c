//! Running `qmake -query` and parsing its `KEY:VALUE` output.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::{ProbeError, Result};
use crate::util::process::{stdout_text, ProcessBuilder};

pub const QUERY_FLAG: &str = "-query";

/// Key/value pairs reported by the query executable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    values: BTreeMap<String, String>,
}

impl QueryResult {
    /// Parse lines of the form `KEY:VALUE`. Lines without a colon are ignored;
    /// the key is everything before the first colon.
    pub fn parse(output: &str) -> Self {
        let values = output
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.to_string(), value.trim().to_string()))
            .collect();
        QueryResult { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// A path-valued key with native separators normalized to `/`.
    pub fn path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).map(|v| PathBuf::from(v.replace('\\', "/")))
    }

    /// The first of `keys` that is present.
    pub fn path_or(&self, keys: &[&str]) -> Option<PathBuf> {
        keys.iter().find_map(|key| self.path(key))
    }

    pub fn require(&self, key: &str, executable: &Path) -> Result<&str> {
        self.get(key).ok_or_else(|| ProbeError::MissingQueryKey {
            path: executable.to_path_buf(),
            key: key.to_string(),
        })
    }

    pub fn require_path(&self, key: &str, executable: &Path) -> Result<PathBuf> {
        self.require(key, executable)
            .map(|v| PathBuf::from(v.replace('\\', "/")))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Run `<executable> -query` to completion and parse its output.
pub fn query_tool(executable: &Path) -> Result<QueryResult> {
    if !executable.exists() {
        return Err(ProbeError::QueryToolNotFound {
            path: executable.to_path_buf(),
        });
    }

    let process = ProcessBuilder::new(executable).arg(QUERY_FLAG);
    let output = process
        .exec()
        .map_err(|e| ProbeError::ProcessStart {
            path: executable.to_path_buf(),
            message: format!("{:#}", e),
        })?;

    if !output.status.success() {
        return Err(ProbeError::ProcessFailed {
            path: executable.to_path_buf(),
            code: output.status.code(),
        });
    }

    let result = QueryResult::parse(&stdout_text(&output));
    tracing::debug!(
        "`{}` reported {} values",
        process.display_command(),
        result.len()
    );
    Ok(result)
}
