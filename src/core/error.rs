//! Probe error types.
//!
//! Every variant here is fatal for the installation being probed. Problems
//! that only degrade a single module are logged and never surface as errors.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error that aborts probing of one installation.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ProbeError {
    #[error("the query executable `{}` does not exist", .path.display())]
    #[diagnostic(
        code(qtprobe::probe::not_found),
        help("Pass the full path to a qmake executable or add its directory to PATH")
    )]
    QueryToolNotFound { path: PathBuf },

    #[error("failed to start `{}`: {message}", .path.display())]
    #[diagnostic(code(qtprobe::probe::spawn))]
    ProcessStart { path: PathBuf, message: String },

    #[error("the query executable `{}` failed with exit code {}", .path.display(), .code.map_or_else(|| "<signal>".to_string(), |c| c.to_string()))]
    #[diagnostic(code(qtprobe::probe::exit_code))]
    ProcessFailed { path: PathBuf, code: Option<i32> },

    #[error("`{}` did not report `{key}`", .path.display())]
    #[diagnostic(code(qtprobe::probe::missing_key))]
    MissingQueryKey { path: PathBuf, key: String },

    #[error("cannot extract the mkspecs directory `{}`", .path.display())]
    #[diagnostic(code(qtprobe::sdk::mkspecs))]
    MkspecsNotFound { path: PathBuf },

    #[error("SDK configuration file `{}` not found", .path.display())]
    #[diagnostic(
        code(qtprobe::sdk::config_not_found),
        help("The installation looks incomplete; reinstall the SDK or pick another qmake")
    )]
    ConfigNotFound { path: PathBuf },

    #[error("mkspec `{}` does not exist", .path.display())]
    #[diagnostic(code(qtprobe::sdk::spec_not_found))]
    SpecNotFound { path: PathBuf },

    #[error("the SDK {what} path `{}` does not exist", .path.display())]
    #[diagnostic(code(qtprobe::sdk::missing_path))]
    MissingPath { what: &'static str, path: PathBuf },

    #[error("could not determine whether the SDK is a static build")]
    #[diagnostic(
        code(qtprobe::sdk::build_kind),
        help("No core library file was found next to the SDK's libraries")
    )]
    AmbiguousBuildKind { dir: PathBuf },

    #[error("could not determine whether the SDK uses Cocoa or Carbon from `{}`", .path.display())]
    #[diagnostic(code(qtprobe::sdk::cocoa))]
    CocoaUndetermined { path: PathBuf },

    #[error("failed to read `{}`", .path.display())]
    #[diagnostic(code(qtprobe::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProbeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProbeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Convert to a user-friendly diagnostic carrying the installation path.
    pub fn to_diagnostic(&self, installation: &std::path::Path) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string()).with_location(installation);

        match self {
            ProbeError::QueryToolNotFound { .. } => {
                diag = diag.with_suggestion("Run `qtprobe detect` to list qmake executables in PATH");
            }
            ProbeError::ProcessFailed { .. } | ProbeError::ProcessStart { .. } => {
                diag = diag
                    .with_context(format!("command: {} -query", installation.display()))
                    .with_suggestion("Run the command by hand to see its error output");
            }
            ProbeError::ConfigNotFound { path } | ProbeError::SpecNotFound { path } => {
                diag = diag
                    .with_context(format!("looked in {}", path.display()))
                    .with_suggestion("Check that the SDK installation is complete");
            }
            ProbeError::AmbiguousBuildKind { dir } => {
                diag = diag.with_context(format!("no core library in {}", dir.display()));
            }
            ProbeError::Io { source, .. } => {
                diag = diag.with_context(source.to_string());
            }
            _ => {}
        }

        diag
    }
}

/// Result type for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failed_message() {
        let err = ProbeError::ProcessFailed {
            path: PathBuf::from("/opt/qt/bin/qmake"),
            code: Some(3),
        };
        let msg = err.to_string();
        assert!(msg.contains("/opt/qt/bin/qmake"));
        assert!(msg.contains("exit code 3"));
    }

    #[test]
    fn test_to_diagnostic_has_location() {
        let err = ProbeError::ConfigNotFound {
            path: PathBuf::from("/opt/qt/mkspecs/qconfig.pri"),
        };
        let diag = err.to_diagnostic(std::path::Path::new("/opt/qt/bin/qmake"));
        let output = diag.format(false);
        assert!(output.contains("error: SDK configuration file"));
        assert!(output.contains("--> /opt/qt/bin/qmake"));
        assert!(output.contains("looked in /opt/qt/mkspecs/qconfig.pri"));
    }
}
