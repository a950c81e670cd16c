//! Properties of a probed SDK installation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::platform::{Mkspec, TargetPlatform};
use super::variant::{BuildVariant, PerVariant};
use super::version::SdkVersion;

/// Minimum target OS versions the SDK was built for.
///
/// A field is `None` when the SDK does not target that OS family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentTargets {
    pub windows: Option<String>,
    pub macos: Option<String>,
    pub ios: Option<String>,
    pub tvos: Option<String>,
    pub watchos: Option<String>,
    pub android: Option<String>,
}

/// Everything the probe learned about one installation.
///
/// Built once by [`crate::probe::properties::resolve`] and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkProperties {
    pub install_prefix_path: Option<PathBuf>,
    pub documentation_path: Option<PathBuf>,
    pub include_path: PathBuf,
    pub library_path: PathBuf,
    pub host_library_path: Option<PathBuf>,
    /// Host tools directory (host binaries take precedence when cross-compiling).
    pub binary_path: PathBuf,
    /// Target binaries directory as reported by the installation.
    pub install_path: Option<PathBuf>,
    pub plugin_path: PathBuf,
    pub qml_path: Option<PathBuf>,
    pub qml_import_path: Option<PathBuf>,
    pub lib_exec_path: Option<PathBuf>,
    pub qml_lib_exec_path: Option<PathBuf>,
    pub help_generator_lib_exec_path: Option<PathBuf>,
    pub mkspec_base_path: PathBuf,
    pub mkspec_path: PathBuf,
    pub mkspec_name: String,

    pub version: SdkVersion,
    pub namespace: Option<String>,
    pub lib_infix: String,
    pub architecture: String,
    /// `CONFIG` items from the base configuration file.
    pub config_items: Vec<String>,
    /// `QT_CONFIG` items from the base configuration file.
    pub sdk_config_items: Vec<String>,
    /// Target ABIs for SDKs that ship several in one tree.
    pub android_abis: Vec<String>,
    pub msvc_version: Option<String>,

    pub framework_build: bool,
    pub build_variants: Vec<BuildVariant>,
    pub static_build: bool,
    pub deployment: DeploymentTargets,
    pub entry_point_libs: PerVariant<Vec<String>>,
}

impl SdkProperties {
    pub fn mkspec(&self) -> Mkspec<'_> {
        Mkspec::new(&self.mkspec_name)
    }

    pub fn major(&self) -> u64 {
        self.version.major()
    }

    pub fn minor(&self) -> u64 {
        self.version.minor()
    }

    pub fn has_variant(&self, variant: BuildVariant) -> bool {
        self.build_variants.contains(&variant)
    }

    pub fn has_config(&self, item: &str) -> bool {
        self.config_items.iter().any(|c| c == item)
    }

    pub fn has_sdk_config(&self, item: &str) -> bool {
        self.sdk_config_items.iter().any(|c| c == item)
    }

    pub fn targets_android(&self) -> bool {
        path_contains(&self.mkspec_path, "android")
    }

    pub fn targets_macos_family(&self) -> bool {
        path_contains(&self.mkspec_path, "macx")
    }

    pub fn target_platform(&self) -> Option<TargetPlatform> {
        self.mkspec().target_platform()
    }

    /// Whether debug libraries carry a `d` suffix.
    ///
    /// MinGW builds stopped adding it in 5.14 unless built as
    /// `debug_and_release`.
    pub fn needs_d_suffix(&self) -> bool {
        !self.mkspec().is_mingw()
            || !self.version.at_least(5, 14, 0)
            || self.has_config("debug_and_release")
    }
}

fn path_contains(path: &Path, needle: &str) -> bool {
    path.to_string_lossy().contains(needle)
}

/// Render a path with forward slashes, the form used throughout module records.
pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
