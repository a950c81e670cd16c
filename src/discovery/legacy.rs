//! Fixed module registry for 4.x installations, which ship no module
//! descriptors.

use crate::core::sdk::path_str;
use crate::core::{ModuleRecord, SdkProperties};
use crate::link::naming::{framework_headers_path, is_framework};

use super::{add_designer_components_module, add_test_module};

/// Modules a 4.x build can be configured without.
const OPTIONAL_MODULES: &[&str] = &[
    "xmlpatterns",
    "multimedia",
    "phonon",
    "svg",
    "webkit",
    "script",
    "scripttools",
    "declarative",
    "gui",
    "dbus",
    "opengl",
    "openvg",
];

/// `(header dir, identifier, dependencies)` of the regular 4.x modules.
const REGISTRY: &[(&str, &str, &[&str])] = &[
    ("QtCore", "core-private", &["core"]),
    ("QtGui", "gui", &[]),
    ("QtGui", "gui-private", &["gui"]),
    ("QtMultimedia", "multimedia", &["gui", "network"]),
    ("QtMultimedia", "multimedia-private", &["multimedia"]),
    ("QtNetwork", "network", &[]),
    ("QtNetwork", "network-private", &["network"]),
    ("QtOpenGL", "opengl", &["gui"]),
    ("QtOpenGL", "opengl-private", &["opengl"]),
    ("QtOpenVG", "openvg", &["gui"]),
    ("QtScript", "script", &[]),
    ("QtScript", "script-private", &["script"]),
    ("QtScriptTools", "scripttools", &["script", "gui"]),
    ("QtScriptTools", "scripttools-private", &["scripttools"]),
    ("QtSql", "sql", &[]),
    ("QtSql", "sql-private", &["sql"]),
    ("QtSvg", "svg", &["gui"]),
    ("QtSvg", "svg-private", &["svg"]),
    ("QtWebKit", "webkit", &["gui", "network"]),
    ("QtWebKit", "webkit-private", &["webkit"]),
    ("QtXml", "xml", &[]),
    ("QtXml", "xml-private", &["xml"]),
    ("QtXmlPatterns", "xmlpatterns", &["network"]),
    ("QtXmlPatterns", "xmlpatterns-private", &["xmlpatterns"]),
    ("QtDeclarative", "declarative", &["gui", "script"]),
    ("QtDeclarative", "declarative-private", &["declarative"]),
    ("QtDesigner", "designer", &["gui", "xml"]),
    ("QtDesigner", "designer-private", &["designer"]),
    ("QtUiTools", "uitools", &[]),
    ("QtUiTools", "uitools-private", &["uitools"]),
    ("QtHelp", "help", &["network", "sql"]),
    ("QtHelp", "help-private", &["help"]),
    ("QtTest", "testlib", &[]),
    ("QtTest", "testlib-private", &["testlib"]),
];

/// Library-less modules that let projects name 5.x modules against 4.x.
const CONVENIENCE_MODULES: &[(&str, &[&str])] = &[
    ("widgets", &["core", "gui"]),
    ("quick", &["declarative"]),
    ("concurrent", &[]),
    ("printsupport", &["core", "gui"]),
];

/// Build the 4.x module set for `sdk`.
pub fn modules(sdk: &SdkProperties) -> Vec<ModuleRecord> {
    let mut core = ModuleRecord::new("QtCore", "core", &[]);
    core.compiler_defines.push("QT_CORE_LIB".to_string());
    if let Some(namespace) = sdk.namespace.as_deref().filter(|ns| !ns.is_empty()) {
        core.compiler_defines.push(format!("QT_NAMESPACE={}", namespace));
    }

    let mut modules = vec![core];
    modules.extend(
        REGISTRY
            .iter()
            .map(|(name, qbs_name, deps)| ModuleRecord::new(*name, *qbs_name, deps)),
    );

    if sdk.mkspec_name.starts_with("win") {
        let active_qt = path_str(&sdk.include_path.join("ActiveQt"));
        for (name, qbs_name) in [("QAxContainer", "axcontainer"), ("QAxServer", "axserver")] {
            let mut module = ModuleRecord::new(name, qbs_name, &[]);
            module.module_prefix = "Q".to_string();
            module.is_static_library = true;
            module.include_paths.push(active_qt.clone());
            if qbs_name == "axserver" {
                module.compiler_defines.push("QAXSERVER".to_string());
            }
            modules.push(module);
        }
    } else {
        modules.push(ModuleRecord::new("QtDBus", "dbus", &[]));
        modules.push(ModuleRecord::new("QtDBus", "dbus-private", &["dbus"]));
    }

    let mut designer_components = ModuleRecord::new(
        "QtDesignerComponents",
        "designercomponents-private",
        &["gui-private", "designer-private"],
    );
    designer_components.has_library = true;
    modules.push(designer_components);
    modules.push(ModuleRecord::new("Phonon", "phonon", &[]));

    for module in &mut modules {
        if module.include_paths.is_empty() {
            module.include_paths = default_include_paths(module, sdk);
        }
        if module.compiler_defines.is_empty() {
            module
                .compiler_defines
                .push(format!("QT_{}_LIB", module.qbs_name.to_uppercase()));
        }
    }

    for (qbs_name, deps) in CONVENIENCE_MODULES {
        let mut module = ModuleRecord::new("", *qbs_name, deps);
        module.has_library = false;
        modules.push(module);
    }
    add_test_module(&mut modules);
    add_designer_components_module(&mut modules);

    for module in &mut modules {
        if OPTIONAL_MODULES.contains(&module.public_name()) {
            module.must_exist = false;
        }
        if sdk.static_build {
            module.is_static_library = true;
        }
    }

    modules
}

fn default_include_paths(module: &ModuleRecord, sdk: &SdkProperties) -> Vec<String> {
    if is_framework(module, sdk) {
        vec![path_str(&framework_headers_path(module, sdk))]
    } else {
        vec![
            path_str(&sdk.include_path),
            path_str(&sdk.include_path.join(&module.name)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SdkVersion;
    use crate::test_support::sdk_at;
    use std::path::Path;

    fn legacy_sdk(mkspec: &str) -> SdkProperties {
        let mut sdk = sdk_at(Path::new("/opt/qt4"));
        sdk.version = SdkVersion::new(4, 8, 7);
        sdk.mkspec_name = mkspec.to_string();
        sdk
    }

    fn find<'a>(modules: &'a [ModuleRecord], qbs_name: &str) -> &'a ModuleRecord {
        modules
            .iter()
            .find(|m| m.qbs_name == qbs_name)
            .unwrap_or_else(|| panic!("module {} missing", qbs_name))
    }

    #[test]
    fn test_registry_basics() {
        let mut sdk = legacy_sdk("linux-g++");
        sdk.namespace = Some("MyNs".into());
        let modules = modules(&sdk);

        let core = find(&modules, "core");
        assert!(core.dependencies.is_empty());
        assert_eq!(core.compiler_defines, vec!["QT_CORE_LIB", "QT_NAMESPACE=MyNs"]);

        let gui = find(&modules, "gui");
        assert_eq!(gui.dependencies, vec!["core"]);
        assert_eq!(gui.include_paths, vec!["/opt/qt4/include", "/opt/qt4/include/QtGui"]);
        assert_eq!(gui.compiler_defines, vec!["QT_GUI_LIB"]);
        assert!(!gui.must_exist);

        let gui_private = find(&modules, "gui-private");
        assert!(!gui_private.has_library);
        assert!(!gui_private.must_exist);
        assert_eq!(gui_private.compiler_defines, vec!["QT_GUI-PRIVATE_LIB"]);

        assert!(find(&modules, "xml").must_exist);
        assert!(find(&modules, "dbus").has_library);
        assert!(modules.iter().all(|m| m.qbs_name != "axserver"));
    }

    #[test]
    fn test_windows_active_qt() {
        let modules = modules(&legacy_sdk("win32-msvc2008"));
        let axserver = find(&modules, "axserver");
        assert!(axserver.is_static_library);
        assert_eq!(axserver.module_prefix, "Q");
        assert_eq!(axserver.compiler_defines, vec!["QAXSERVER"]);
        assert_eq!(axserver.include_paths, vec!["/opt/qt4/include/ActiveQt"]);

        let axcontainer = find(&modules, "axcontainer");
        assert_eq!(axcontainer.compiler_defines, vec!["QT_AXCONTAINER_LIB"]);
        assert!(modules.iter().all(|m| m.qbs_name != "dbus"));
    }

    #[test]
    fn test_convenience_and_alias_modules() {
        let modules = modules(&legacy_sdk("linux-g++"));

        let widgets = find(&modules, "widgets");
        assert!(!widgets.has_library);
        assert_eq!(widgets.dependencies, vec!["core", "gui"]);
        assert!(widgets.include_paths.is_empty());

        let test = find(&modules, "test");
        assert!(!test.has_library);
        assert_eq!(test.dependencies, vec!["core", "testlib"]);

        let components = find(&modules, "designercomponents-private");
        assert!(components.has_library);
        let alias = find(&modules, "designercomponents");
        assert!(!alias.has_library);
        assert_eq!(alias.dependencies, vec!["core", "designercomponents-private"]);
    }

    #[test]
    fn test_static_build_marks_everything_static() {
        let mut sdk = legacy_sdk("linux-g++");
        sdk.static_build = true;
        assert!(modules(&sdk).iter().all(|m| m.is_static_library));
    }

    #[test]
    fn test_framework_include_paths() {
        let mut sdk = legacy_sdk("macx-g++");
        sdk.framework_build = true;
        let modules = modules(&sdk);
        assert_eq!(
            find(&modules, "gui").include_paths,
            vec!["/opt/qt4/lib/QtGui.framework/Headers"]
        );
    }
}
