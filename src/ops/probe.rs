//! Probing whole installations.
//!
//! For every requested query executable this resolves the SDK properties,
//! then runs discovery, link metadata resolution and deduplication once per
//! target ABI.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;

use crate::core::sdk::path_str;
use crate::core::{ModuleRecord, ProbeError, Result, SdkProperties};
use crate::discovery;
use crate::link;
use crate::pri::{self, clean_path};
use crate::probe::{self, ProbeContext};
use crate::util::hash::installation_id;

/// Options for [`probe_installation`].
#[derive(Debug, Clone, Default)]
pub struct ProbeOptions {
    /// Restrict multi-ABI installations to these ABIs. Empty means all.
    pub abis: Vec<String>,
    /// Resolve ABIs on the rayon pool.
    pub parallel_abis: bool,
}

/// Everything known about one target ABI of an installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbiInfo {
    /// Empty for single-ABI installations.
    pub abi: String,
    pub architecture: String,
    pub modules: BTreeMap<String, ModuleRecord>,
    /// Plugin names keyed by plugin type.
    pub plugins_by_type: BTreeMap<String, Vec<String>>,
    /// Plugins that are not loaded unless requested.
    pub non_essential_plugins: Vec<String>,
    /// Platform plugin picked when none is requested.
    pub default_qpa_plugin: Option<String>,
}

impl AbiInfo {
    pub fn module(&self, qbs_name: &str) -> Option<&ModuleRecord> {
        self.modules.get(qbs_name)
    }

    /// Modules as a list, in identifier order.
    pub fn module_list(&self) -> Vec<ModuleRecord> {
        self.modules.values().cloned().collect()
    }
}

/// A fully probed installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QtInstallation {
    pub query_executable: PathBuf,
    /// Short stable hash of the query executable path.
    pub installation_id: String,
    pub sdk: SdkProperties,
    pub abis: Vec<AbiInfo>,
}

impl QtInstallation {
    /// The ABI named `abi`, or the only ABI when `abi` is `None`.
    pub fn abi(&self, abi: Option<&str>) -> Option<&AbiInfo> {
        match abi {
            Some(abi) => self.abis.iter().find(|info| info.abi == abi),
            None => self.abis.first(),
        }
    }
}

/// Probe every installation, collecting one result per query executable.
pub fn probe_installations(
    executables: &[PathBuf],
    options: &ProbeOptions,
) -> Vec<(PathBuf, Result<QtInstallation>)> {
    executables
        .iter()
        .map(|exe| {
            let result = probe_installation(exe, options);
            if let Err(e) = &result {
                tracing::warn!("Error getting info about Qt for '{}': {}", exe.display(), e);
            }
            (exe.clone(), result)
        })
        .collect()
}

/// Probe the installation that `executable` belongs to.
pub fn probe_installation(executable: &Path, options: &ProbeOptions) -> Result<QtInstallation> {
    tracing::info!("Getting info about Qt at '{}'...", executable.display());
    if !executable.exists() {
        return Err(ProbeError::QueryToolNotFound {
            path: executable.to_path_buf(),
        });
    }

    let sdk = probe::resolve(executable)?;
    let abis = selected_abis(&sdk, &options.abis);
    if abis.len() > 1 {
        tracing::info!("Qt with multiple abi detected: '{}'", abis.join(","));
    }

    let abis: Vec<AbiInfo> = if options.parallel_abis && abis.len() > 1 {
        abis.par_iter().map(|abi| probe_abi(&sdk, abi)).collect()
    } else {
        abis.iter().map(|abi| probe_abi(&sdk, abi)).collect()
    };

    Ok(QtInstallation {
        query_executable: executable.to_path_buf(),
        installation_id: installation_id(executable),
        sdk,
        abis,
    })
}

/// ABIs to resolve: the installation's own list narrowed to `requested`, or
/// a single unnamed ABI.
fn selected_abis(sdk: &SdkProperties, requested: &[String]) -> Vec<String> {
    if sdk.android_abis.is_empty() {
        return vec![String::new()];
    }
    for abi in requested {
        if !sdk.android_abis.contains(abi) {
            tracing::warn!("The installation does not provide ABI '{}'", abi);
        }
    }
    sdk.android_abis
        .iter()
        .filter(|abi| requested.is_empty() || requested.contains(abi))
        .cloned()
        .collect()
}

/// Resolve the module set of one ABI.
pub fn probe_abi(sdk: &SdkProperties, abi: &str) -> AbiInfo {
    if !abi.is_empty() && sdk.android_abis.len() > 1 {
        tracing::info!("Found abi '{}'...", abi);
    }

    let mut ctx = ProbeContext::new(abi);
    let mut modules = discovery::discover(sdk, abi);
    link::resolve_link_info(&mut modules, sdk, &mut ctx);

    let default_qpa_plugin = modules
        .iter()
        .find(|m| m.qbs_name == "gui")
        .and_then(|gui| default_qpa_plugin(gui, sdk));

    let modules: BTreeMap<String, ModuleRecord> = modules
        .into_iter()
        .map(|m| (m.qbs_name.clone(), m))
        .collect();
    let (plugins_by_type, non_essential_plugins) = plugin_indices(&modules);

    let architecture = if abi.is_empty() {
        crate::core::platform::canonical_architecture(&sdk.architecture)
    } else {
        crate::core::platform::abi_to_architecture(abi)
    };

    AbiInfo {
        abi: abi.to_string(),
        architecture,
        modules,
        plugins_by_type,
        non_essential_plugins,
        default_qpa_plugin,
    }
}

type PluginIndices = (BTreeMap<String, Vec<String>>, Vec<String>);

fn plugin_indices(modules: &BTreeMap<String, ModuleRecord>) -> PluginIndices {
    let mut by_type: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut non_essential = Vec::new();
    for module in modules.values().filter(|m| m.is_plugin) {
        let Some(data) = &module.plugin_data else {
            continue;
        };
        by_type
            .entry(data.plugin_type.clone().unwrap_or_default())
            .or_default()
            .push(module.name.clone());
        if !data.auto_load {
            non_essential.push(module.name.clone());
        }
    }
    (by_type, non_essential)
}

/// The platform plugin `gui` loads by default.
pub fn default_qpa_plugin(gui: &ModuleRecord, sdk: &SdkProperties) -> Option<String> {
    if sdk.major() < 5 {
        return None;
    }

    let found = if sdk.major() == 5 && sdk.minor() < 8 {
        qpa_plugin_from_config(&sdk.mkspec_base_path.join("qconfig.pri"))
    } else {
        let headers = if sdk.framework_build {
            sdk.library_path.join("QtGui.framework").join("Headers")
        } else {
            sdk.include_path.join("QtGui")
        };
        qpa_plugin_from_headers(&headers.join("qtgui-config.h"))
    };

    if found.is_none() && gui.is_static_library {
        tracing::warn!("Could not determine default QPA plugin for static Qt.");
    }
    found
}

fn qpa_plugin_from_config(qconfig: &Path) -> Option<String> {
    const KEY: &str = "QT_DEFAULT_QPA_PLUGIN =";
    let lines = pri::read_lines(qconfig).ok()?;
    lines.iter().find_map(|line| {
        line.trim()
            .strip_prefix(KEY)
            .map(|value| value.trim().to_string())
    })
}

/// Follow the `#include "..."` chain starting at `header` looking for the
/// default platform name.
fn qpa_plugin_from_headers(header: &Path) -> Option<String> {
    let define = Regex::new(r#"^#define QT_QPA_DEFAULT_PLATFORM_NAME "(.+)".*$"#).ok()?;
    let include = Regex::new(r#"^#include "(.+)".*$"#).ok()?;

    let mut queue = vec![header.to_path_buf()];
    let mut seen = Vec::new();
    while !queue.is_empty() {
        let file = queue.remove(0);
        if seen.contains(&file) {
            continue;
        }
        seen.push(file.clone());

        let Ok(lines) = pri::read_lines(&file) else {
            tracing::debug!("Cannot read header '{}'", file.display());
            continue;
        };
        for line in &lines {
            let line = line.trim();
            if let Some(caps) = define.captures(line) {
                return Some(format!("q{}", &caps[1]));
            }
            if let Some(caps) = include.captures(line) {
                let included = Path::new(&caps[1]);
                if included.is_absolute() {
                    queue.push(included.to_path_buf());
                } else {
                    let dir = file.parent().unwrap_or(Path::new(""));
                    queue.push(PathBuf::from(clean_path(&path_str(&dir.join(included)))));
                }
            }
        }
    }
    None
}
