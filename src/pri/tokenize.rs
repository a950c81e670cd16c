//! Value tokenization, path cleaning and placeholder substitution.

use std::path::Path;

use crate::core::sdk::{path_str, SdkProperties};

/// Split a right-hand side into tokens.
///
/// Tokens are separated by spaces or tabs; a token starting with `"` runs to
/// the next `"`. An unmatched quote drops the rest of the line with a
/// warning. `$$PWD` is replaced with the directory of `file_path`.
pub fn tokenize(rhs: &str, file_path: &Path) -> Vec<String> {
    let pwd = file_path.parent().map(path_str).unwrap_or_default();
    let is_space = |c: char| c == ' ' || c == '\t';

    let mut tokens = Vec::new();
    let mut rest = rhs;
    loop {
        rest = rest.trim_start_matches(is_space);
        if rest.is_empty() {
            break;
        }

        let (token, remainder) = if let Some(quoted) = rest.strip_prefix('"') {
            match quoted.find('"') {
                Some(end) => (&quoted[..end], &quoted[end + 1..]),
                None => {
                    tracing::warn!("Unmatched quote in file '{}'", file_path.display());
                    break;
                }
            }
        } else {
            let end = rest.find(is_space).unwrap_or(rest.len());
            (&rest[..end], &rest[end..])
        };

        if !token.is_empty() {
            tokens.push(token.replace("$$PWD", &pwd));
        }
        rest = remainder;
    }
    tokens
}

/// Lexically normalize a `/`-separated path: collapse separators, drop `.`
/// and resolve `..` against preceding components.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if !absolute => parts.push(".."),
                _ => {}
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// SDK path placeholders that appear in descriptor and metadata files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    InstallPrefix,
    InstallLibs,
    InstallLibsGet,
    InstallPlugins,
    InstallImports,
    InstallHeaders,
    ModuleIncludeBase,
    ModuleLibBase,
    ModuleHostLibBase,
}

impl Placeholder {
    pub const ALL: [Placeholder; 9] = [
        Placeholder::InstallPrefix,
        Placeholder::InstallLibs,
        Placeholder::InstallLibsGet,
        Placeholder::InstallPlugins,
        Placeholder::InstallImports,
        Placeholder::InstallHeaders,
        Placeholder::ModuleIncludeBase,
        Placeholder::ModuleLibBase,
        Placeholder::ModuleHostLibBase,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Placeholder::InstallPrefix => "$$[QT_INSTALL_PREFIX]",
            Placeholder::InstallLibs => "$$[QT_INSTALL_LIBS]",
            Placeholder::InstallLibsGet => "$$[QT_INSTALL_LIBS/get]",
            Placeholder::InstallPlugins => "$$[QT_INSTALL_PLUGINS]",
            Placeholder::InstallImports => "$$[QT_INSTALL_IMPORTS]",
            Placeholder::InstallHeaders => "$$[QT_INSTALL_HEADERS]",
            Placeholder::ModuleIncludeBase => "$$QT_MODULE_INCLUDE_BASE",
            Placeholder::ModuleLibBase => "$$QT_MODULE_LIB_BASE",
            Placeholder::ModuleHostLibBase => "$$QT_MODULE_HOST_LIB_BASE",
        }
    }

    pub fn value(self, sdk: &SdkProperties) -> Option<String> {
        match self {
            Placeholder::InstallPrefix => sdk.install_prefix_path.as_deref().map(path_str),
            Placeholder::InstallLibs | Placeholder::InstallLibsGet | Placeholder::ModuleLibBase => {
                Some(path_str(&sdk.library_path))
            }
            Placeholder::InstallPlugins => Some(path_str(&sdk.plugin_path)),
            Placeholder::InstallImports => sdk.qml_import_path.as_deref().map(path_str),
            Placeholder::InstallHeaders | Placeholder::ModuleIncludeBase => {
                Some(path_str(&sdk.include_path))
            }
            Placeholder::ModuleHostLibBase => Some(path_str(
                sdk.host_library_path.as_deref().unwrap_or(&sdk.library_path),
            )),
        }
    }
}

/// Replace every known placeholder in `text` with the SDK's path.
pub fn substitute_placeholders(text: &str, sdk: &SdkProperties) -> String {
    let mut result = text.to_string();
    for placeholder in Placeholder::ALL {
        if !result.contains(placeholder.token()) {
            continue;
        }
        if let Some(value) = placeholder.value(sdk) {
            result = result.replace(placeholder.token(), &value);
        }
    }
    result
}

/// Tokenize, substitute and clean in one go.
pub fn resolve_tokens(rhs: &str, file_path: &Path, sdk: &SdkProperties) -> Vec<String> {
    tokenize(rhs, file_path)
        .into_iter()
        .map(|t| clean_path(&substitute_placeholders(&t, sdk)))
        .collect()
}
