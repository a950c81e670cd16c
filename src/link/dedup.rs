//! Removal of link entries already supplied by a dependency.
//!
//! The graph is walked from the root modules (those without dependencies)
//! towards their dependents. Each walk carries the set of entries linked by
//! the modules on the current path; a module's own library lists lose every
//! entry in that set, and the survivors plus the module's library file are
//! added before descending. Debug and release are walked separately.

use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::core::{BuildVariant, ModuleRecord};
use crate::probe::ProbeContext;

/// Reverse dependency graph: an edge `a -> b` means `b` depends on `a`.
struct ReverseDeps {
    graph: DiGraph<usize, ()>,
    nodes: Vec<NodeIndex>,
}

impl ReverseDeps {
    fn build(modules: &[ModuleRecord]) -> Self {
        let mut graph = DiGraph::with_capacity(modules.len(), modules.len());
        let nodes: Vec<NodeIndex> = (0..modules.len()).map(|i| graph.add_node(i)).collect();

        let by_name: HashMap<&str, usize> = modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.qbs_name.as_str(), i))
            .collect();

        for (dependent, module) in modules.iter().enumerate() {
            for dep in &module.dependencies {
                // Optional modules may legitimately be absent.
                let Some(&dependency) = by_name.get(dep.as_str()) else {
                    continue;
                };
                graph.update_edge(nodes[dependency], nodes[dependent], ());
            }
        }

        ReverseDeps { graph, nodes }
    }

    /// Dependents of module `index`, in module order.
    fn dependents(&self, index: usize) -> Vec<usize> {
        let mut result: Vec<usize> = self
            .graph
            .neighbors_directed(self.nodes[index], Direction::Outgoing)
            .map(|n| self.graph[n])
            .collect();
        result.sort_unstable();
        result
    }
}

/// Strip every module's library lists of entries that a module closer to
/// the traversal root already links.
pub fn remove_duplicated_dependency_libs(modules: &mut [ModuleRecord], ctx: &mut ProbeContext) {
    let reverse = ReverseDeps::build(modules);
    let roots: Vec<usize> = modules
        .iter()
        .enumerate()
        .filter(|(_, m)| m.dependencies.is_empty())
        .map(|(i, _)| i)
        .collect();

    for variant in BuildVariant::ALL {
        for &root in &roots {
            traverse(modules, &reverse, root, &BTreeSet::new(), variant, ctx);
        }
    }
}

fn traverse(
    modules: &mut [ModuleRecord],
    reverse: &ReverseDeps,
    index: usize,
    linked: &BTreeSet<String>,
    variant: BuildVariant,
    ctx: &mut ProbeContext,
) {
    if !ctx.enter(&modules[index].qbs_name) {
        return;
    }

    let linkage = modules[index].variant_mut(variant);
    linkage.dynamic_libraries = without(&linkage.dynamic_libraries, linked);
    linkage.static_libraries = without(&linkage.static_libraries, linked);

    let mut path_linked = linked.clone();
    path_linked.extend(linkage.lib_file_path.iter().cloned());
    path_linked.extend(linkage.libraries().cloned());

    for dependent in reverse.dependents(index) {
        traverse(modules, reverse, dependent, &path_linked, variant, ctx);
    }

    ctx.leave();
}

fn without(list: &[String], linked: &BTreeSet<String>) -> Vec<String> {
    list.iter()
        .filter(|entry| !linked.contains(*entry))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::line::link_line;

    fn module(qbs_name: &str, deps: &[&str], libs: &[&str], file: Option<&str>) -> ModuleRecord {
        let mut m = ModuleRecord::new(format!("Qt{}", qbs_name), qbs_name, deps);
        let release = m.variant_mut(BuildVariant::Release);
        release.dynamic_libraries = libs.iter().map(|s| s.to_string()).collect();
        release.lib_file_path = file.map(str::to_string);
        m
    }

    fn release_libs(m: &ModuleRecord) -> Vec<&str> {
        m.variant(BuildVariant::Release)
            .dynamic_libraries
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn test_dependency_entry_removed_from_dependent() {
        let mut modules = vec![
            module("core", &[], &["pthread"], Some("/sdk/lib/libQt5Core.so")),
            module("network", &[], &["pthread", "/sdk/lib/libQt5Core.so", "ssl"], None),
        ];
        remove_duplicated_dependency_libs(&mut modules, &mut ProbeContext::default());
        assert_eq!(release_libs(&modules[0]), vec!["pthread"]);
        assert_eq!(release_libs(&modules[1]), vec!["ssl"]);
    }

    #[test]
    fn test_siblings_keep_their_own_entries() {
        let mut modules = vec![
            module("core", &[], &[], Some("/sdk/lib/libQt5Core.so")),
            module("network", &[], &["ssl"], Some("/sdk/lib/libQt5Network.so")),
            module("widgets", &["gui"], &["ssl"], Some("/sdk/lib/libQt5Widgets.so")),
        ];
        remove_duplicated_dependency_libs(&mut modules, &mut ProbeContext::default());

        // Neither sibling is on the other's path, so both keep `ssl` and a
        // program linking only one of them still gets it.
        assert_eq!(release_libs(&modules[1]), vec!["ssl"]);
        assert_eq!(release_libs(&modules[2]), vec!["ssl"]);

        let line = link_line(&modules, "widgets", BuildVariant::Release).unwrap();
        assert_eq!(line.iter().filter(|e| *e == "ssl").count(), 1);
    }

    #[test]
    fn test_network_and_widgets_through_gui() {
        let mut modules = vec![
            module("core", &[], &["pthread"], Some("/sdk/lib/libQt5Core.so")),
            module("gui", &[], &["GL", "pthread"], Some("/sdk/lib/libQt5Gui.so")),
            module("network", &[], &["ssl", "pthread"], Some("/sdk/lib/libQt5Network.so")),
            module(
                "widgets",
                &["gui"],
                &["/sdk/lib/libQt5Gui.so", "GL", "ssl", "pthread"],
                Some("/sdk/lib/libQt5Widgets.so"),
            ),
        ];
        remove_duplicated_dependency_libs(&mut modules, &mut ProbeContext::default());

        assert_eq!(release_libs(&modules[0]), vec!["pthread"]);
        assert_eq!(release_libs(&modules[1]), vec!["GL"]);
        // `network` is not on any path to `widgets`, so each keeps `ssl`.
        assert_eq!(release_libs(&modules[2]), vec!["ssl"]);
        assert_eq!(release_libs(&modules[3]), vec!["ssl"]);

        let line = link_line(&modules, "widgets", BuildVariant::Release).unwrap();
        assert_eq!(
            line,
            vec![
                "/sdk/lib/libQt5Core.so",
                "pthread",
                "/sdk/lib/libQt5Gui.so",
                "GL",
                "/sdk/lib/libQt5Widgets.so",
                "ssl",
            ]
        );
        let line = link_line(&modules, "network", BuildVariant::Release).unwrap();
        assert_eq!(line.iter().filter(|e| *e == "ssl").count(), 1);
    }

    #[test]
    fn test_only_root_closer_module_retains_shared_entry() {
        let mut modules = vec![
            module("core", &[], &[], Some("/sdk/lib/libQt5Core.so")),
            module("network", &[], &["ssl"], Some("/sdk/lib/libQt5Network.so")),
            module("widgets", &["network"], &["ssl", "GL"], Some("/sdk/lib/libQt5Widgets.so")),
        ];
        remove_duplicated_dependency_libs(&mut modules, &mut ProbeContext::default());

        assert_eq!(release_libs(&modules[1]), vec!["ssl"]);
        assert_eq!(release_libs(&modules[2]), vec!["GL"]);

        let line = link_line(&modules, "widgets", BuildVariant::Release).unwrap();
        let mut sorted = line.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), line.len());
        assert!(line.contains(&"ssl".to_string()));
    }

    #[test]
    fn test_variants_do_not_interact() {
        let mut core = module("core", &[], &["dl"], None);
        core.variant_mut(BuildVariant::Debug).dynamic_libraries = vec!["dl".into()];
        let mut gui = module("gui", &[], &[], None);
        gui.variant_mut(BuildVariant::Debug).dynamic_libraries = vec!["dl".into(), "GL".into()];
        let mut modules = vec![core, gui];

        remove_duplicated_dependency_libs(&mut modules, &mut ProbeContext::default());
        assert_eq!(modules[1].variant(BuildVariant::Debug).dynamic_libraries, vec!["GL"]);
        assert!(modules[1].variant(BuildVariant::Release).dynamic_libraries.is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        let mut modules = vec![
            module("core", &[], &["z"], None),
            module("a", &["b"], &["z", "x"], None),
            module("b", &["a"], &["x", "y"], None),
        ];
        let mut ctx = ProbeContext::default();
        remove_duplicated_dependency_libs(&mut modules, &mut ctx);

        assert_eq!(modules.len(), 3);
        assert_eq!(ctx.traversal_depth(), 0);
        assert_eq!(release_libs(&modules[1]), vec!["x"]);
        assert_eq!(release_libs(&modules[2]), vec!["y"]);
    }

    #[test]
    fn test_idempotent() {
        let build = || {
            vec![
                module("core", &[], &["pthread", "dl"], Some("/l/libQt5Core.so")),
                module("gui", &[], &["GL", "pthread"], Some("/l/libQt5Gui.so")),
                module("widgets", &["gui"], &["GL", "/l/libQt5Gui.so", "X11"], None),
            ]
        };
        let mut first = build();
        let mut second = build();
        remove_duplicated_dependency_libs(&mut first, &mut ProbeContext::default());
        remove_duplicated_dependency_libs(&mut second, &mut ProbeContext::default());
        assert_eq!(first, second);
        assert_eq!(release_libs(&first[2]), vec!["X11"]);

        // A second pass over already deduplicated lists changes nothing.
        let snapshot = first.clone();
        remove_duplicated_dependency_libs(&mut first, &mut ProbeContext::default());
        assert_eq!(first, snapshot);
    }
}
