//! Module records: one per distributable module or plugin of an SDK.

use serde::{Deserialize, Serialize};

use super::variant::{BuildVariant, PerVariant};

/// Identifier of the root module every other module implicitly depends on.
pub const CORE_MODULE: &str = "core";

/// Link requirements of one module for one build variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantLinkage {
    pub static_libraries: Vec<String>,
    pub dynamic_libraries: Vec<String>,
    pub linker_flags: Vec<String>,
    pub frameworks: Vec<String>,
    pub framework_paths: Vec<String>,
    /// Resolved on-disk library file, if one was found.
    pub lib_file_path: Option<String>,
}

impl VariantLinkage {
    /// The list `-l` entries of this module land in.
    pub fn libraries_mut(&mut self, is_static: bool) -> &mut Vec<String> {
        if is_static {
            &mut self.static_libraries
        } else {
            &mut self.dynamic_libraries
        }
    }

    /// All library entries, dynamic first.
    pub fn libraries(&self) -> impl Iterator<Item = &String> {
        self.dynamic_libraries.iter().chain(&self.static_libraries)
    }
}

/// Plugin-only metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginData {
    /// Plugin type, which is also the plugin's subdirectory.
    pub plugin_type: Option<String>,
    pub extends: Vec<String>,
    pub class_name: Option<String>,
    /// Cleared when `.EXTENDS` contains `-`.
    pub auto_load: bool,
}

impl Default for PluginData {
    fn default() -> Self {
        PluginData {
            plugin_type: None,
            extends: Vec::new(),
            class_name: None,
            auto_load: true,
        }
    }
}

/// One discoverable module, plugin or external dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Header directory / descriptor `.name` (e.g. `QtNetwork`).
    pub name: String,
    /// Normalized identifier (e.g. `network`, `network-private`).
    pub qbs_name: String,
    /// `qbs_name`s of dependencies, `core` first.
    pub dependencies: Vec<String>,
    pub is_private: bool,
    pub has_library: bool,
    pub is_static_library: bool,
    pub is_plugin: bool,
    pub is_external: bool,
    /// Soft modules may be absent without a warning.
    pub must_exist: bool,
    /// Library name prefix; empty means the SDK's default prefix.
    pub module_prefix: String,
    pub version: Option<String>,
    pub include_paths: Vec<String>,
    pub compiler_defines: Vec<String>,
    pub library_paths: Vec<String>,
    /// Directory holding the library, when it differs from the SDK's.
    pub lib_dir: Option<String>,
    /// Tags from the linker-metadata config line.
    pub config: Vec<String>,
    pub supported_plugin_types: Vec<String>,
    pub plugin_data: Option<PluginData>,
    pub linkage: PerVariant<VariantLinkage>,
}

impl ModuleRecord {
    /// Create a record with `core` prepended to `deps` unless this is `core`.
    pub fn new(name: impl Into<String>, qbs_name: impl Into<String>, deps: &[&str]) -> Self {
        let qbs_name = qbs_name.into();
        let is_private = qbs_name.ends_with("-private");
        let mut module = ModuleRecord {
            name: name.into(),
            qbs_name,
            dependencies: Vec::new(),
            is_private,
            has_library: !is_private,
            is_static_library: false,
            is_plugin: false,
            is_external: false,
            must_exist: true,
            module_prefix: String::new(),
            version: None,
            include_paths: Vec::new(),
            compiler_defines: Vec::new(),
            library_paths: Vec::new(),
            lib_dir: None,
            config: Vec::new(),
            supported_plugin_types: Vec::new(),
            plugin_data: None,
            linkage: PerVariant::default(),
        };
        module.set_dependencies(deps.iter().map(|d| d.to_string()).collect());
        module
    }

    /// An empty record for the descriptor scan; the name is filled in later.
    pub fn unnamed() -> Self {
        ModuleRecord::new("", "", &[])
    }

    /// Replace the dependency list, keeping `core` first and dropping self-loops.
    pub fn set_dependencies(&mut self, deps: Vec<String>) {
        let mut deps: Vec<String> = deps.into_iter().filter(|d| *d != self.qbs_name).collect();
        if !self.qbs_name.is_empty()
            && self.qbs_name != CORE_MODULE
            && !deps.iter().any(|d| d == CORE_MODULE)
        {
            deps.insert(0, CORE_MODULE.to_string());
        }
        self.dependencies = deps;
    }

    pub fn variant(&self, variant: BuildVariant) -> &VariantLinkage {
        self.linkage.get(variant)
    }

    pub fn variant_mut(&mut self, variant: BuildVariant) -> &mut VariantLinkage {
        self.linkage.get_mut(variant)
    }

    pub fn lib_file_path(&self, variant: BuildVariant) -> Option<&str> {
        self.linkage.get(variant).lib_file_path.as_deref()
    }

    /// The identifier with any `-private` suffix removed.
    pub fn public_name(&self) -> &str {
        self.qbs_name
            .strip_suffix("-private")
            .unwrap_or(&self.qbs_name)
    }

    pub fn plugin_type(&self) -> Option<&str> {
        self.plugin_data.as_ref()?.plugin_type.as_deref()
    }

    pub fn plugin_data_mut(&mut self) -> &mut PluginData {
        self.plugin_data.get_or_insert_with(PluginData::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_prepended() {
        let m = ModuleRecord::new("QtNetwork", "network", &[]);
        assert_eq!(m.dependencies, vec!["core"]);

        let m = ModuleRecord::new("QtWidgets", "widgets", &["gui"]);
        assert_eq!(m.dependencies, vec!["core", "gui"]);

        let m = ModuleRecord::new("QtGui", "gui", &["xml", "core"]);
        assert_eq!(m.dependencies, vec!["xml", "core"]);
    }

    #[test]
    fn test_core_has_no_dependencies() {
        let m = ModuleRecord::new("QtCore", "core", &[]);
        assert!(m.dependencies.is_empty());
    }

    #[test]
    fn test_private_has_no_library() {
        let m = ModuleRecord::new("QtGui", "gui-private", &["gui"]);
        assert!(m.is_private);
        assert!(!m.has_library);
        assert_eq!(m.public_name(), "gui");
    }

    #[test]
    fn test_self_dependency_dropped() {
        let mut m = ModuleRecord::new("QtXml", "xml", &[]);
        m.set_dependencies(vec!["xml".into(), "core".into()]);
        assert_eq!(m.dependencies, vec!["core"]);
    }
}
