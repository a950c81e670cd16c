//! Module discovery from the descriptor files in `mkspecs/modules`.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::sdk::path_str;
use crate::core::{BuildVariant, ModuleRecord, SdkProperties};
use crate::link::naming::{framework_headers_path, is_framework};
use crate::pri::{self, resolve_tokens};

use super::{add_designer_components_module, add_test_module};

const DESCRIPTOR_SUFFIX: &str = ".pri";

/// Build machine library directory some installers leave in external
/// descriptors.
const BUILD_MACHINE_LIB_DIR: &str = "/home/qt/work/qt/qtbase/lib";

/// The three descriptor families, told apart by file name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Module,
    Plugin,
    External,
}

impl DescriptorKind {
    fn prefix(self) -> &'static str {
        match self {
            DescriptorKind::Module => "qt_lib_",
            DescriptorKind::Plugin => "qt_plugin_",
            DescriptorKind::External => "qt_ext_",
        }
    }

    /// Classify a file name, returning the kind and the identifier stem.
    pub fn classify(file_name: &str) -> Option<(Self, &str)> {
        let stem = file_name.strip_suffix(DESCRIPTOR_SUFFIX)?;
        [
            DescriptorKind::Module,
            DescriptorKind::Plugin,
            DescriptorKind::External,
        ]
        .into_iter()
        .find_map(|kind| stem.strip_prefix(kind.prefix()).map(|rest| (kind, rest)))
    }
}

/// Descriptor files in `modules_dir`, sorted by name.
pub fn descriptor_files(modules_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(modules_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

/// Scan `<mkspecs>/modules` and build one record per descriptor.
pub fn modules(sdk: &SdkProperties, abi: &str) -> Vec<ModuleRecord> {
    let modules_dir = sdk.mkspec_base_path.join("modules");
    if !modules_dir.is_dir() {
        tracing::warn!("No module directory at '{}'", modules_dir.display());
        return Vec::new();
    }

    let mut modules = Vec::new();
    for path in descriptor_files(&modules_dir) {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some((kind, stem)) = DescriptorKind::classify(file_name) else {
            continue;
        };

        let lines = match pri::parse_lines(&path) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!("Skipping module descriptor '{}': {}", path.display(), e);
                continue;
            }
        };

        let module = match kind {
            DescriptorKind::External => external_module(stem, &lines, sdk, abi),
            _ => descriptor_module(kind, stem, &lines, &path, sdk),
        };
        tracing::debug!("Found module '{}' in '{}'", module.qbs_name, file_name);

        let qbs_name = module.qbs_name.clone();
        modules.push(module);
        match qbs_name.as_str() {
            "testlib" => add_test_module(&mut modules),
            "designercomponents-private" => add_designer_components_module(&mut modules),
            _ => {}
        }
    }
    modules
}

fn private_to_qbs(name: &str) -> String {
    name.replacen("_private", "-private", 1)
}

/// `(key, value)` of a `KEY = VALUE` line, skipping empty values.
fn key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.trim().split_once('=')?;
    let value = value.trim();
    (!value.is_empty()).then(|| (key.trim(), value))
}

fn split_items(value: &str) -> Vec<String> {
    value.split(' ').filter(|s| !s.is_empty()).map(str::to_string).collect()
}

fn external_module(stem: &str, lines: &[String], sdk: &SdkProperties, abi: &str) -> ModuleRecord {
    let qbs_name = private_to_qbs(stem);
    let mut module = ModuleRecord::new(format!("qt{}", qbs_name), qbs_name, &[]);
    module.is_external = true;
    module.is_static_library = true;
    module.must_exist = false;

    let lib_dir = path_str(&sdk.library_path);
    let include_dir = path_str(&sdk.include_path);

    for line in lines {
        let Some((key, value)) = key_value(line) else {
            continue;
        };
        if !key.starts_with("QMAKE_") {
            continue;
        }
        let elements: Vec<&str> = key.split('_').collect();
        if elements.len() < 3 {
            continue;
        }
        match elements[1] {
            "LIBS" => {
                let value = value
                    .replacen(BUILD_MACHINE_LIB_DIR, &lib_dir, 1)
                    .replacen("$$[QT_INSTALL_LIBS]", &lib_dir, 1)
                    .replacen("$$[QT_INSTALL_LIBS/get]", &lib_dir, 1);
                // Architecture-suffixed keys; `x86_64` splits in two.
                let key_abi = match elements.len() {
                    4 => Some(elements[3].to_string()),
                    5 => Some(format!("{}_{}", elements[3], elements[4])),
                    _ => None,
                };
                if key_abi.map_or(true, |key_abi| key_abi == abi) {
                    for variant in BuildVariant::ALL {
                        module.variant_mut(variant).static_libraries.push(value.clone());
                    }
                }
            }
            "INCDIR" => module
                .include_paths
                .push(value.replacen("$$[QT_INSTALL_HEADERS]", &include_dir, 1)),
            _ => {}
        }
    }

    module
        .compiler_defines
        .push(format!("QT_{}_LIB", module.qbs_name.to_uppercase()));
    module
}

fn descriptor_module(
    kind: DescriptorKind,
    stem: &str,
    lines: &[String],
    path: &Path,
    sdk: &SdkProperties,
) -> ModuleRecord {
    let is_plugin = kind == DescriptorKind::Plugin;
    let key_prefix = format!("{}.{}.", if is_plugin { "QT_PLUGIN" } else { "QT" }, stem);

    let mut module = ModuleRecord::unnamed();
    module.qbs_name = private_to_qbs(stem);
    module.is_private = module.qbs_name.ends_with("-private");
    module.has_library = !module.is_private;
    module.is_plugin = is_plugin;
    if is_plugin {
        module.name = module.qbs_name.clone();
        module.is_static_library = true;
        module.plugin_data_mut();
    }

    let mut dependencies = Vec::new();
    let mut has_v2 = false;
    let mut has_module_entry = false;

    for line in lines {
        let Some((key, value)) = key_value(line) else {
            continue;
        };
        let Some(field) = key.strip_prefix(key_prefix.as_str()) else {
            continue;
        };
        match field {
            "name" => module.name = value.to_string(),
            "module" => has_module_entry = true,
            "depends" => {
                dependencies = split_items(value).iter().map(|d| private_to_qbs(d)).collect();
            }
            "module_config" => {
                for item in split_items(value) {
                    match item.as_str() {
                        "no_link" => module.has_library = false,
                        "staticlib" => module.is_static_library = true,
                        "internal_module" => module.is_private = true,
                        "v2" => has_v2 = true,
                        _ => {}
                    }
                }
            }
            "includes" => module.include_paths = resolve_tokens(value, path, sdk),
            "libs" => {
                let dirs = resolve_tokens(value, path, sdk);
                module.lib_dir = Some(match dirs.as_slice() {
                    [dir] => dir.clone(),
                    _ => path_str(&sdk.library_path),
                });
            }
            "DEFINES" => module.compiler_defines = split_items(value),
            "VERSION" => module.version = Some(value.to_string()),
            "plugin_types" => module.supported_plugin_types = split_items(value),
            "TYPE" => module.plugin_data_mut().plugin_type = Some(value.to_string()),
            "EXTENDS" => {
                let mut extends = split_items(value);
                let data = module.plugin_data_mut();
                if let Some(pos) = extends.iter().position(|e| e == "-") {
                    extends.remove(pos);
                    data.auto_load = false;
                }
                data.extends = extends;
            }
            "CLASS_NAME" => module.plugin_data_mut().class_name = Some(value.to_string()),
            _ => {}
        }
    }
    module.set_dependencies(dependencies);

    if has_v2 && !has_module_entry && !module.is_static_library {
        module.has_library = false;
    }

    // Descriptors of framework builds before the v2 format point at the
    // wrong header directories.
    if !has_v2 && is_framework(&module, sdk) {
        let headers = framework_headers_path(&module, sdk);
        module.include_paths = if module.is_private {
            let versioned = headers.join(module.version.as_deref().unwrap_or_default());
            vec![path_str(&versioned), path_str(&versioned.join(&module.name))]
        } else {
            vec![path_str(&headers)]
        };
    }

    module
}
