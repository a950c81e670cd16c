//! Building [`SdkProperties`] from `qmake -query` and the mkspecs tree.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::core::platform::AppleOs;
use crate::core::sdk::path_str;
use crate::core::{
    BuildVariant, DeploymentTargets, Mkspec, PerVariant, ProbeError, Result, SdkProperties,
    SdkVersion,
};
use crate::pri::{self, clean_path};

use super::binary::is_shared_library;
use super::query::{query_tool, QueryResult};

const BASE_CONFIG_FILE: &str = "qconfig.pri";
const DEVICE_CONFIG_FILE: &str = "qdevice.pri";
const MKSPEC_CONFIG_FILE: &str = "qmake.conf";
const DEFAULT_ARCHITECTURE: &str = "x86";

/// Probe the installation behind `executable`.
pub fn resolve(executable: &Path) -> Result<SdkProperties> {
    let query = query_tool(executable)?;
    resolve_from_query(executable, &query)
}

/// Build the properties from an already obtained query result.
pub fn resolve_from_query(executable: &Path, query: &QueryResult) -> Result<SdkProperties> {
    let reported_version = query.require("QT_VERSION", executable)?;
    let query_version =
        SdkVersion::parse(reported_version).ok_or_else(|| ProbeError::MissingQueryKey {
            path: executable.to_path_buf(),
            key: "QT_VERSION".to_string(),
        })?;

    let include_path = query.require_path("QT_INSTALL_HEADERS", executable)?;
    let library_path = query.require_path("QT_INSTALL_LIBS", executable)?;
    let binary_path = query
        .path_or(&["QT_HOST_BINS", "QT_INSTALL_BINS"])
        .ok_or_else(|| ProbeError::MissingQueryKey {
            path: executable.to_path_buf(),
            key: "QT_INSTALL_BINS".to_string(),
        })?;
    let plugin_path = query.require_path("QT_INSTALL_PLUGINS", executable)?;

    let (mkspec_base_path, mkspec_src_base_path) = if query_version.major() >= 5 {
        let host_data = query.require_path("QT_HOST_DATA", executable)?;
        let src = query.path("QT_HOST_DATA/src").map(|p| p.join("mkspecs"));
        (host_data.join("mkspecs"), src)
    } else {
        let data = query.require_path("QT_INSTALL_DATA", executable)?;
        (data.join("mkspecs"), None)
    };

    let lib_exec_path = if query_version.major() >= 6 {
        query.path_or(&["QT_HOST_LIBEXECS", "QT_INSTALL_LIBEXECS"])
    } else {
        None
    };
    // QML tools moved to libexec in 6.2, the help generator in 6.3.
    let qml_lib_exec_path = if query_version.at_least(6, 2, 0) {
        lib_exec_path.clone()
    } else {
        Some(binary_path.clone())
    };
    let help_generator_lib_exec_path = if query_version.at_least(6, 3, 0) {
        lib_exec_path.clone()
    } else {
        Some(binary_path.clone())
    };

    if !mkspec_base_path.exists() {
        return Err(ProbeError::MkspecsNotFound {
            path: mkspec_base_path,
        });
    }

    let qconfig_path = mkspec_base_path.join(BASE_CONFIG_FILE);
    if !qconfig_path.is_file() {
        return Err(ProbeError::ConfigNotFound { path: qconfig_path });
    }
    let qconfig = pri::read_lines(&qconfig_path)?;

    let version = config_version(&qconfig).unwrap_or(query_version);
    let architecture = pri::variable(&qconfig, "QT_TARGET_ARCH")
        .or_else(|| pri::variable(&qconfig, "QT_ARCH"))
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| DEFAULT_ARCHITECTURE.to_string());

    let (mkspec_path, mkspec_name) = if version.major() >= 5 {
        let name = query.require("QMAKE_XSPEC", executable)?.to_string();
        let mut path = mkspec_base_path.join(&name);
        if let Some(src_base) = mkspec_src_base_path.as_ref().filter(|_| !path.exists()) {
            path = src_base.join(&name);
        }
        (path, name)
    } else {
        let path = legacy_mkspec_path(&mkspec_base_path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (path, name)
    };
    if !mkspec_path.exists() {
        return Err(ProbeError::SpecNotFound { path: mkspec_path });
    }
    require_existing("library", &library_path)?;
    require_existing("include", &include_path)?;

    let mut sdk = SdkProperties {
        install_prefix_path: query.path("QT_INSTALL_PREFIX"),
        documentation_path: query.path("QT_INSTALL_DOCS"),
        include_path,
        library_path,
        host_library_path: query.path("QT_HOST_LIBS"),
        binary_path,
        install_path: query.path("QT_INSTALL_BINS"),
        plugin_path,
        qml_path: query.path("QT_INSTALL_QML"),
        qml_import_path: query.path("QT_INSTALL_IMPORTS"),
        lib_exec_path,
        qml_lib_exec_path,
        help_generator_lib_exec_path,
        mkspec_base_path,
        mkspec_path,
        mkspec_name,
        version,
        namespace: pri::variable(&qconfig, "QT_NAMESPACE").filter(|n| !n.is_empty()),
        lib_infix: pri::variable(&qconfig, "QT_LIBINFIX").unwrap_or_default(),
        architecture,
        config_items: pri::variable_items(&qconfig, "CONFIG"),
        sdk_config_items: pri::variable_items(&qconfig, "QT_CONFIG"),
        android_abis: Vec::new(),
        msvc_version: None,
        framework_build: false,
        build_variants: Vec::new(),
        static_build: false,
        deployment: DeploymentTargets::default(),
        entry_point_libs: PerVariant::default(),
    };

    if sdk.version.at_least(5, 14, 0) && sdk.targets_android() {
        let qdevice = pri::read_lines(&sdk.mkspec_base_path.join(DEVICE_CONFIG_FILE))?;
        sdk.android_abis = pri::variable_items(&qdevice, "DEFAULT_ANDROID_ABIS");
    }

    if sdk.mkspec().is_msvc() {
        sdk.msvc_version = msvc_version(&qconfig)
            .or_else(|| sdk.mkspec().msvc_compiler_version().map(str::to_string));
    }

    sdk.framework_build = sdk.targets_macos_family() && sdk.has_config("qt_framework");
    sdk.build_variants = BuildVariant::ALL
        .into_iter()
        .filter(|v| sdk.has_sdk_config(v.as_str()))
        .collect();
    sdk.static_build = check_static_build(&sdk)?;

    if sdk.static_build && sdk.has_sdk_config("c++11") {
        sdk.config_items.push("c++11".to_string());
    }

    fill_deployment_targets(&mut sdk)?;

    tracing::debug!(
        "SDK {} at '{}': mkspec {}, {}, variants {:?}",
        sdk.version,
        sdk.library_path.display(),
        sdk.mkspec_name,
        if sdk.static_build { "static" } else { "shared" },
        sdk.build_variants
    );
    Ok(sdk)
}

fn require_existing(what: &'static str, path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ProbeError::MissingPath {
            what,
            path: path.to_path_buf(),
        })
    }
}

fn config_version(qconfig: &[String]) -> Option<SdkVersion> {
    let component = |key: &str| pri::variable(qconfig, key)?.parse::<u64>().ok();
    Some(SdkVersion::new(
        component("QT_MAJOR_VERSION")?,
        component("QT_MINOR_VERSION")?,
        component("QT_PATCH_VERSION")?,
    ))
}

fn msvc_version(qconfig: &[String]) -> Option<String> {
    let major = pri::variable(qconfig, "QT_MSVC_MAJOR_VERSION")?;
    let minor = pri::variable(qconfig, "QT_MSVC_MINOR_VERSION")?;
    let patch = pri::variable(qconfig, "QT_MSVC_PATCH_VERSION")?;
    Some(format!("{}.{}.{}", major, minor, patch))
}

/// Resolve `mkspecs/default` of a 4.x installation to the real mkspec.
fn legacy_mkspec_path(mkspec_base_path: &Path) -> Result<PathBuf> {
    let default_dir = mkspec_base_path.join("default");

    let path = if cfg!(windows) {
        let conf_path = default_dir.join(MKSPEC_CONFIG_FILE);
        let conf = pri::read_lines(&conf_path)?;
        let original = pri::variable(&conf, "QMAKESPEC_ORIGINAL")
            .map(|p| PathBuf::from(p.replace('\\', "/")))
            .filter(|p| p.exists());
        match original {
            Some(p) => p,
            // MinGW packages carry a bogus QMAKESPEC_ORIGINAL; the include
            // directive names the real mkspec.
            None => included_mkspec(&conf, &default_dir).unwrap_or(default_dir),
        }
    } else {
        std::fs::canonicalize(&default_dir).unwrap_or(default_dir)
    };

    Ok(PathBuf::from(clean_path(&path_str(&path))))
}

fn included_mkspec(conf: &[String], default_dir: &Path) -> Option<PathBuf> {
    let re = Regex::new(r"\binclude\(([^)]+)/qmake\.conf\)").ok()?;
    conf.iter().find_map(|line| {
        let target = re.captures(line)?.get(1)?.as_str();
        Some(PathBuf::from(clean_path(&path_str(&default_dir.join(target)))))
    })
}

/// Static or shared SDK build.
///
/// From 5.0 on the SDK says so in its config; older ones are classified by
/// inspecting the core library binaries.
fn check_static_build(sdk: &SdkProperties) -> Result<bool> {
    if sdk.major() >= 5 {
        return Ok(sdk.has_sdk_config("static"));
    }
    if sdk.framework_build {
        return Ok(false);
    }

    let lib_dir = if sdk.mkspec().has_windows_naming() {
        &sdk.binary_path
    } else {
        &sdk.library_path
    };
    let mut core_files: Vec<PathBuf> = std::fs::read_dir(lib_dir)
        .map_err(|e| ProbeError::io(lib_dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .is_some_and(|n| n.to_string_lossy().contains("Core"))
        })
        .collect();
    core_files.sort();

    if core_files.is_empty() {
        return Err(ProbeError::AmbiguousBuildKind {
            dir: lib_dir.to_path_buf(),
        });
    }
    Ok(!core_files.iter().any(|f| is_shared_library(f)))
}

fn fill_deployment_targets(sdk: &mut SdkProperties) -> Result<()> {
    sdk.deployment.windows = minimum_windows_version(sdk);
    if sdk.deployment.windows.is_some() {
        for variant in BuildVariant::ALL {
            if sdk.has_variant(variant) {
                *sdk.entry_point_libs.get_mut(variant) = entry_point_libs(sdk, variant);
            }
        }
    } else if sdk.targets_macos_family() {
        fill_apple_targets(sdk)?;
    } else if sdk.targets_android() {
        sdk.deployment.android = if sdk.major() >= 5 {
            Some("2.3".to_string())
        } else if sdk.version.at_least(4, 8, 0) {
            Some("1.6".to_string())
        } else {
            None
        };
    }
    Ok(())
}

/// Oldest Windows version applications built against the SDK run on, or
/// `None` if the SDK does not target Windows.
pub fn minimum_windows_version(sdk: &SdkProperties) -> Option<String> {
    let mkspec = sdk.mkspec();
    let version = if mkspec.is_winrt() {
        "10.0"
    } else if !mkspec.is_desktop_windows() {
        return None;
    } else if sdk.major() >= 6 {
        "10.0"
    } else if sdk.architecture == "x86_64" || sdk.architecture == "ia64" {
        "5.2"
    } else if let Some(year) = msvc_year(mkspec) {
        if year < 2012 {
            "5.0"
        } else {
            "5.1"
        }
    } else if sdk.major() < 5 {
        "5.0"
    } else {
        "5.1"
    };
    Some(version.to_string())
}

fn msvc_year(mkspec: Mkspec<'_>) -> Option<u32> {
    let year = mkspec.name().strip_prefix("win32-msvc")?;
    if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}

/// Entry-point libraries a Windows GUI application links.
fn entry_point_libs(sdk: &SdkProperties, variant: BuildVariant) -> Vec<String> {
    let is_mingw = sdk.mkspec().is_mingw();

    // Some distributions rename the entry-point library.
    let mut candidates = vec!["qtmain"];
    if is_mingw && sdk.major() == 5 {
        candidates.push("qt5main");
    }
    if sdk.major() == 6 {
        candidates.push("Qt6EntryPoint");
    }

    let mut result = Vec::new();
    if !is_mingw && sdk.version.at_least(5, 4, 0) {
        result.push("Shell32.lib".to_string());
    }

    let found = candidates.iter().find_map(|candidate| {
        let mut file_name = String::new();
        if is_mingw {
            file_name.push_str("lib");
        }
        file_name.push_str(candidate);
        file_name.push_str(&sdk.lib_infix);
        if variant.is_debug() && sdk.needs_d_suffix() {
            file_name.push('d');
        }
        file_name.push_str(if is_mingw { ".a" } else { ".lib" });
        let path = sdk.library_path.join(file_name);
        path.exists().then(|| path_str(&path))
    });

    match found {
        Some(path) => result.push(path),
        None => tracing::warn!(
            "Could not find the qtmain library at '{}'. You will not be able to link Qt applications.",
            sdk.library_path.display()
        ),
    }
    result
}

fn fill_apple_targets(sdk: &mut SdkProperties) -> Result<()> {
    if sdk.major() >= 5 {
        let conf = pri::parse_lines(&sdk.mkspec_path.join(MKSPEC_CONFIG_FILE))?;
        let re = Regex::new(r"^QMAKE_(MACOSX|IOS|TVOS|WATCHOS)_DEPLOYMENT_TARGET\s*=\s*(.*?)\s*$")
            .ok();
        for line in &conf {
            let Some(caps) = re.as_ref().and_then(|re| re.captures(line.trim())) else {
                continue;
            };
            let (Some(os), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let value = Some(value.as_str().to_string());
            match AppleOs::from_deployment_key(os.as_str()) {
                Some(AppleOs::MacOs) => sdk.deployment.macos = value,
                Some(AppleOs::Ios) => sdk.deployment.ios = value,
                Some(AppleOs::Tvos) => sdk.deployment.tvos = value,
                Some(AppleOs::Watchos) => sdk.deployment.watchos = value,
                None => {}
            }
        }

        if !sdk.mkspec().is_apple_mobile() {
            // 5.0 kept the minimum elsewhere.
            let macos = sdk.deployment.macos.get_or_insert_with(|| "10.6".to_string());
            let below_10_7 = SdkVersion::parse(macos).is_some_and(|v| !v.at_least(10, 7, 0));
            if below_10_7 && sdk.sdk_config_items.iter().any(|c| c == "c++11") {
                *macos = "10.7".to_string();
            }
        }
    } else if sdk.major() == 4 && sdk.minor() >= 6 {
        let qconfig_dir = if sdk.framework_build {
            sdk.library_path.join("QtCore.framework").join("Headers")
        } else {
            sdk.include_path.join("Qt")
        };
        let header = qconfig_dir.join("qconfig.h");
        let lines =
            pri::read_lines(&header).map_err(|_| ProbeError::CocoaUndetermined { path: header })?;
        let cocoa = Regex::new(r"\s*#define\s+QT_MAC_USE_COCOA\s+1\s*")
            .map(|re| lines.iter().any(|l| re.is_match(l)))
            .unwrap_or(false);
        sdk.deployment.macos = Some(if cocoa { "10.5" } else { "10.4" }.to_string());
    }
    Ok(())
}
