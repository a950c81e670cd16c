//! Flattened link lines.

use std::collections::{HashMap, HashSet};

use crate::core::{BuildVariant, ModuleRecord};

/// Every link entry needed to use `root`, dependencies first.
///
/// Each module in the transitive closure contributes its library file, then
/// its dynamic and static libraries. An entry is emitted only the first time
/// it appears. Returns `None` if `root` is not in `modules`.
pub fn link_line(modules: &[ModuleRecord], root: &str, variant: BuildVariant) -> Option<Vec<String>> {
    let by_name: HashMap<&str, &ModuleRecord> =
        modules.iter().map(|m| (m.qbs_name.as_str(), m)).collect();
    let root = by_name.get(root).copied()?;

    let mut order = Vec::new();
    let mut visited = HashSet::new();
    visit(root, &by_name, &mut visited, &mut order);

    let mut seen = HashSet::new();
    let mut line = Vec::new();
    for module in order {
        let linkage = module.variant(variant);
        for entry in linkage.lib_file_path.iter().chain(linkage.libraries()) {
            if seen.insert(entry.as_str()) {
                line.push(entry.clone());
            }
        }
    }
    Some(line)
}

/// Post-order walk over declared dependencies.
fn visit<'a>(
    module: &'a ModuleRecord,
    by_name: &HashMap<&str, &'a ModuleRecord>,
    visited: &mut HashSet<&'a str>,
    order: &mut Vec<&'a ModuleRecord>,
) {
    if !visited.insert(module.qbs_name.as_str()) {
        return;
    }
    for dep in &module.dependencies {
        if let Some(dep) = by_name.get(dep.as_str()).copied() {
            visit(dep, by_name, visited, order);
        }
    }
    order.push(module);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(qbs_name: &str, deps: &[&str], file: &str, libs: &[&str]) -> ModuleRecord {
        let mut m = ModuleRecord::new(format!("Qt{}", qbs_name), qbs_name, deps);
        let release = m.variant_mut(BuildVariant::Release);
        release.lib_file_path = Some(file.to_string());
        release.dynamic_libraries = libs.iter().map(|s| s.to_string()).collect();
        m
    }

    #[test]
    fn test_dependencies_come_first() {
        let modules = vec![
            module("widgets", &["gui"], "/l/libQt5Widgets.so", &[]),
            module("gui", &[], "/l/libQt5Gui.so", &["GL"]),
            module("core", &[], "/l/libQt5Core.so", &["pthread"]),
        ];
        let line = link_line(&modules, "widgets", BuildVariant::Release).unwrap();
        assert_eq!(
            line,
            vec![
                "/l/libQt5Core.so",
                "pthread",
                "/l/libQt5Gui.so",
                "GL",
                "/l/libQt5Widgets.so",
            ]
        );
    }

    #[test]
    fn test_shared_entries_emitted_once() {
        let modules = vec![
            module("core", &[], "/l/libQt5Core.so", &["pthread"]),
            module("gui", &[], "/l/libQt5Gui.so", &["pthread", "GL"]),
            module("widgets", &["gui"], "/l/libQt5Widgets.so", &["GL", "/l/libQt5Core.so"]),
        ];
        let line = link_line(&modules, "widgets", BuildVariant::Release).unwrap();
        let unique: HashSet<_> = line.iter().collect();
        assert_eq!(unique.len(), line.len());
        assert_eq!(line.len(), 5);
    }

    #[test]
    fn test_unknown_root_and_cycles() {
        let modules = vec![
            module("core", &[], "/l/core", &[]),
            module("a", &["b"], "/l/a", &[]),
            module("b", &["a"], "/l/b", &[]),
        ];
        assert!(link_line(&modules, "nope", BuildVariant::Release).is_none());
        let line = link_line(&modules, "a", BuildVariant::Release).unwrap();
        assert_eq!(line, vec!["/l/core", "/l/b", "/l/a"]);
    }
}
