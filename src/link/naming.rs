//! Library file naming rules.
//!
//! Pure functions from a module and the SDK's properties to the names its
//! library files carry on disk. Windows builds append `d` to debug
//! libraries, Apple builds append `_debug`, 4.x Windows DLLs carry the major
//! version, and framework builds use `<Name>.framework` bundles.

use std::path::PathBuf;

use crate::core::{BuildVariant, ModuleRecord, SdkProperties};

/// Modules that are plain libraries even in a framework build.
const NEVER_FRAMEWORKS: &[&str] = &[
    "bootstrap",
    "openglextensions",
    "platformsupport",
    "qmldevtools",
    "harfbuzzng",
];

/// Modules whose library name ignores the usual `Qt<major>` prefix.
const IRREGULAR_LIBRARY_NAMES: &[&str] = &["Enginio", "DataVisualization", "Phonon"];

/// Whether `module` is shipped as a framework bundle.
pub fn is_framework(module: &ModuleRecord, sdk: &SdkProperties) -> bool {
    if !sdk.framework_build || module.is_static_library {
        return false;
    }
    let name = module.qbs_name.as_str();
    if NEVER_FRAMEWORKS.contains(&name) {
        return false;
    }
    // uitools became a framework in 6.0.
    !(sdk.major() <= 5 && name == "uitools")
}

/// Apply the platform's variant and version decorations to `lib_name`.
pub fn lib_base_name(
    module: &ModuleRecord,
    lib_name: &str,
    variant: BuildVariant,
    sdk: &SdkProperties,
) -> String {
    let mkspec = sdk.mkspec();
    let mut name = lib_name.to_string();

    if mkspec.has_windows_naming() {
        if variant.is_debug() && sdk.needs_d_suffix() {
            name.push('d');
        }
        if !module.is_static_library && sdk.major() < 5 {
            name.push_str(&sdk.major().to_string());
        }
    }

    if mkspec.has_apple_naming()
        && !is_framework(module, sdk)
        && sdk.has_variant(BuildVariant::Debug)
        && (!sdk.has_variant(BuildVariant::Release) || variant.is_debug())
    {
        name.push_str("_debug");
    }

    name
}

/// The module name with its library prefix removed (`QtNetwork` becomes
/// `Network`).
pub fn module_name_without_prefix(module: &ModuleRecord) -> &str {
    if module.name == "Phonon" {
        return "phonon";
    }
    if module.module_prefix.is_empty() {
        if let Some(stripped) = module.name.strip_prefix("Qt") {
            return stripped;
        }
    }
    module
        .name
        .strip_prefix(module.module_prefix.as_str())
        .unwrap_or(&module.name)
}

/// Base name of the module's library file, without `lib` prefix or extension
/// (`Qt5Network`, `Qt5Networkd`, `QtNetwork_debug`, ...).
pub fn library_base_name(module: &ModuleRecord, sdk: &SdkProperties, variant: BuildVariant) -> String {
    if module.is_plugin {
        return lib_base_name(module, &module.name, variant, sdk);
    }

    let irregular = IRREGULAR_LIBRARY_NAMES.contains(&module.name.as_str());
    let mut lib_name = String::new();
    if !module.is_external {
        if module.module_prefix.is_empty() && !irregular {
            lib_name.push_str("Qt");
        } else {
            lib_name.push_str(&module.module_prefix);
        }
        if sdk.major() >= 5 && !is_framework(module, sdk) && !irregular {
            lib_name.push_str(&sdk.major().to_string());
        }
    }
    lib_name.push_str(module_name_without_prefix(module));
    if !module.is_external {
        lib_name.push_str(&sdk.lib_infix);
    }
    lib_base_name(module, &lib_name, variant, sdk)
}

/// Name other modules' linker metadata use to refer to this module's library,
/// or `None` if it has no library.
pub fn lib_name_for_linker(
    module: &ModuleRecord,
    sdk: &SdkProperties,
    variant: BuildVariant,
) -> Option<String> {
    if !module.has_library {
        return None;
    }
    let mut name = library_base_name(module, sdk, variant);
    if sdk.mkspec().uses_msvc_linker() {
        name.push_str(".lib");
    }
    Some(name)
}

/// `<libs>/<Name>.framework/Headers`
pub fn framework_headers_path(module: &ModuleRecord, sdk: &SdkProperties) -> PathBuf {
    sdk.library_path
        .join(format!("{}.framework", module.name))
        .join("Headers")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SdkVersion;
    use crate::test_support::sdk_at;
    use std::path::Path;

    fn sdk(mkspec: &str, version: SdkVersion, variants: &[BuildVariant]) -> SdkProperties {
        let mut sdk = sdk_at(Path::new("/opt/sdk"));
        sdk.mkspec_name = mkspec.to_string();
        sdk.version = version;
        sdk.build_variants = variants.to_vec();
        sdk
    }

    #[test]
    fn test_linux_names() {
        let sdk = sdk("linux-g++", SdkVersion::new(5, 15, 2), &[BuildVariant::Release]);
        let network = ModuleRecord::new("QtNetwork", "network", &[]);
        assert_eq!(library_base_name(&network, &sdk, BuildVariant::Release), "Qt5Network");
        assert_eq!(
            lib_name_for_linker(&network, &sdk, BuildVariant::Release).as_deref(),
            Some("Qt5Network")
        );
    }

    #[test]
    fn test_msvc_debug_suffix_and_lib_extension() {
        let sdk = sdk(
            "win32-msvc2019",
            SdkVersion::new(5, 15, 2),
            &[BuildVariant::Debug, BuildVariant::Release],
        );
        let core = ModuleRecord::new("QtCore", "core", &[]);
        assert_eq!(
            lib_name_for_linker(&core, &sdk, BuildVariant::Debug).as_deref(),
            Some("Qt5Cored.lib")
        );
        assert_eq!(
            lib_name_for_linker(&core, &sdk, BuildVariant::Release).as_deref(),
            Some("Qt5Core.lib")
        );
    }

    #[test]
    fn test_mingw_drops_d_suffix_from_5_14() {
        let variants = [BuildVariant::Debug, BuildVariant::Release];
        let core = ModuleRecord::new("QtCore", "core", &[]);

        let old = sdk("win32-g++", SdkVersion::new(5, 12, 0), &variants);
        assert_eq!(library_base_name(&core, &old, BuildVariant::Debug), "Qt5Cored");

        let new = sdk("win32-g++", SdkVersion::new(5, 15, 0), &variants);
        assert_eq!(library_base_name(&core, &new, BuildVariant::Debug), "Qt5Core");
    }

    #[test]
    fn test_legacy_windows_major_suffix() {
        let sdk = sdk("win32-msvc2008", SdkVersion::new(4, 8, 7), &[BuildVariant::Debug]);
        let gui = ModuleRecord::new("QtGui", "gui", &[]);
        assert_eq!(library_base_name(&gui, &sdk, BuildVariant::Debug), "QtGuid4");

        let mut ax = ModuleRecord::new("QAxServer", "axserver", &[]);
        ax.module_prefix = "Q".into();
        ax.is_static_library = true;
        assert_eq!(library_base_name(&ax, &sdk, BuildVariant::Debug), "QAxServerd");
    }

    #[test]
    fn test_apple_debug_and_frameworks() {
        let mut sdk = sdk(
            "macx-clang",
            SdkVersion::new(5, 15, 2),
            &[BuildVariant::Debug, BuildVariant::Release],
        );
        let widgets = ModuleRecord::new("QtWidgets", "widgets", &[]);
        assert_eq!(library_base_name(&widgets, &sdk, BuildVariant::Debug), "Qt5Widgets_debug");
        assert_eq!(library_base_name(&widgets, &sdk, BuildVariant::Release), "Qt5Widgets");

        sdk.framework_build = true;
        assert!(is_framework(&widgets, &sdk));
        assert_eq!(library_base_name(&widgets, &sdk, BuildVariant::Debug), "QtWidgets");

        let uitools = ModuleRecord::new("QtUiTools", "uitools", &[]);
        assert!(!is_framework(&uitools, &sdk));
        sdk.version = SdkVersion::new(6, 5, 0);
        assert!(is_framework(&uitools, &sdk));
    }

    #[test]
    fn test_irregular_and_prefixed_names() {
        let sdk = sdk("linux-g++", SdkVersion::new(5, 15, 2), &[BuildVariant::Release]);

        let phonon = ModuleRecord::new("Phonon", "phonon", &[]);
        assert_eq!(library_base_name(&phonon, &sdk, BuildVariant::Release), "phonon");

        let mut ext = ModuleRecord::new("qtharfbuzz", "harfbuzz", &[]);
        ext.is_external = true;
        assert_eq!(library_base_name(&ext, &sdk, BuildVariant::Release), "qtharfbuzz");

        let mut infixed = sdk.clone();
        infixed.lib_infix = "Custom".into();
        let xml = ModuleRecord::new("QtXml", "xml", &[]);
        assert_eq!(library_base_name(&xml, &infixed, BuildVariant::Release), "Qt5XmlCustom");
    }

    #[test]
    fn test_no_library_no_linker_name() {
        let sdk = sdk("linux-g++", SdkVersion::new(5, 15, 2), &[BuildVariant::Release]);
        let private = ModuleRecord::new("QtCore", "core-private", &["core"]);
        assert_eq!(lib_name_for_linker(&private, &sdk, BuildVariant::Release), None);
    }
}
