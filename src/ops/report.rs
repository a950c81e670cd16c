//! Human-readable summaries of probed installations.

use std::fmt;

use crate::core::{BuildVariant, ModuleRecord};

use super::probe::{AbiInfo, QtInstallation};

/// Text summary of one installation.
///
/// With `verbose`, every module is listed with its resolved library files.
pub struct InstallationReport<'a> {
    pub installation: &'a QtInstallation,
    pub verbose: bool,
}

impl<'a> InstallationReport<'a> {
    pub fn new(installation: &'a QtInstallation, verbose: bool) -> Self {
        InstallationReport {
            installation,
            verbose,
        }
    }
}

impl fmt::Display for InstallationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inst = self.installation;
        let sdk = &inst.sdk;

        writeln!(f, "Qt {} at {}", sdk.version, inst.query_executable.display())?;
        writeln!(f, "  id:        {}", inst.installation_id)?;
        writeln!(f, "  mkspec:    {}", sdk.mkspec_name)?;
        writeln!(
            f,
            "  build:     {}{}",
            if sdk.static_build { "static" } else { "shared" },
            if sdk.framework_build { ", frameworks" } else { "" }
        )?;
        let variants: Vec<&str> = sdk.build_variants.iter().map(|v| v.as_str()).collect();
        writeln!(f, "  variants:  {}", variants.join(", "))?;
        writeln!(f, "  libraries: {}", sdk.library_path.display())?;

        let deployment = [
            ("windows", &sdk.deployment.windows),
            ("macos", &sdk.deployment.macos),
            ("ios", &sdk.deployment.ios),
            ("tvos", &sdk.deployment.tvos),
            ("watchos", &sdk.deployment.watchos),
            ("android", &sdk.deployment.android),
        ];
        for (os, version) in deployment {
            if let Some(version) = version {
                writeln!(f, "  min {}: {}", os, version)?;
            }
        }

        for abi in &inst.abis {
            self.fmt_abi(f, abi)?;
        }
        Ok(())
    }
}

impl InstallationReport<'_> {
    fn fmt_abi(&self, f: &mut fmt::Formatter<'_>, abi: &AbiInfo) -> fmt::Result {
        writeln!(f)?;
        if abi.abi.is_empty() {
            writeln!(f, "  [{}]", abi.architecture)?;
        } else {
            writeln!(f, "  [{} ({})]", abi.abi, abi.architecture)?;
        }

        let (plugins, modules): (Vec<&ModuleRecord>, Vec<&ModuleRecord>) =
            abi.modules.values().partition(|m| m.is_plugin);
        let unresolved = modules
            .iter()
            .filter(|m| m.has_library && m.must_exist && !is_resolved(m))
            .count();
        writeln!(
            f,
            "  {} modules, {} plugins, {} unresolved",
            modules.len(),
            plugins.len(),
            unresolved
        )?;
        if let Some(qpa) = &abi.default_qpa_plugin {
            writeln!(f, "  default platform plugin: {}", qpa)?;
        }
        for (plugin_type, names) in &abi.plugins_by_type {
            writeln!(f, "  plugins/{}: {}", plugin_type, names.join(" "))?;
        }

        if self.verbose {
            for module in modules {
                let file = BuildVariant::ALL
                    .iter()
                    .rev()
                    .find_map(|v| module.lib_file_path(*v))
                    .unwrap_or("-");
                let marker = match (module.has_library, module.is_static_library) {
                    (false, _) => "      ",
                    (true, true) => "static",
                    (true, false) => "shared",
                };
                writeln!(f, "    {:<32} {} {}", module.qbs_name, marker, file)?;
            }
        }
        Ok(())
    }
}

fn is_resolved(module: &ModuleRecord) -> bool {
    BuildVariant::ALL
        .iter()
        .any(|v| module.lib_file_path(*v).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sdk_at;
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    fn installation() -> QtInstallation {
        let mut core = ModuleRecord::new("QtCore", "core", &[]);
        core.variant_mut(BuildVariant::Release).lib_file_path =
            Some("/opt/sdk/lib/libQt5Core.so.5.15.2".into());
        let network = ModuleRecord::new("QtNetwork", "network", &[]);
        let mut xcb = ModuleRecord::new("qxcb", "qxcb", &[]);
        xcb.is_plugin = true;

        let modules: BTreeMap<String, ModuleRecord> = [core, network, xcb]
            .into_iter()
            .map(|m| (m.qbs_name.clone(), m))
            .collect();
        QtInstallation {
            query_executable: PathBuf::from("/opt/sdk/bin/qmake"),
            installation_id: "0123456789abcdef".into(),
            sdk: sdk_at(Path::new("/opt/sdk")),
            abis: vec![AbiInfo {
                abi: String::new(),
                architecture: "x86_64".into(),
                modules,
                plugins_by_type: BTreeMap::from([("platforms".to_string(), vec!["qxcb".to_string()])]),
                non_essential_plugins: Vec::new(),
                default_qpa_plugin: Some("qxcb".into()),
            }],
        }
    }

    #[test]
    fn test_summary() {
        let inst = installation();
        let text = InstallationReport::new(&inst, false).to_string();
        assert!(text.starts_with("Qt 5.15.2 at /opt/sdk/bin/qmake\n"));
        assert!(text.contains("  mkspec:    linux-g++"));
        assert!(text.contains("  build:     shared\n"));
        assert!(text.contains("  2 modules, 1 plugins, 1 unresolved"));
        assert!(text.contains("  default platform plugin: qxcb"));
        assert!(text.contains("  plugins/platforms: qxcb"));
        assert!(!text.contains("libQt5Core"));
    }

    #[test]
    fn test_verbose_lists_modules() {
        let inst = installation();
        let text = InstallationReport::new(&inst, true).to_string();
        assert!(text.contains("/opt/sdk/lib/libQt5Core.so.5.15.2"));
        assert!(text.lines().any(|l| l.trim_start().starts_with("network") && l.ends_with(" -")));
    }
}
