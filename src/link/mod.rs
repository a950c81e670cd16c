//! Link information for discovered modules: library naming, linker
//! metadata, deduplication and flattened link lines.

pub mod dedup;
pub mod line;
pub mod naming;
pub mod prl;

use std::collections::HashMap;

use crate::core::{BuildVariant, ModuleRecord, SdkProperties};
use crate::probe::ProbeContext;

pub use dedup::remove_duplicated_dependency_libs;
pub use line::link_line;
pub use naming::lib_name_for_linker;

/// Replace bare library names that refer to SDK modules with the modules'
/// resolved library files.
pub fn replace_lib_names_with_file_paths(modules: &mut [ModuleRecord], sdk: &SdkProperties) {
    for variant in BuildVariant::ALL {
        let files: HashMap<String, String> = modules
            .iter()
            .filter_map(|m| {
                let name = lib_name_for_linker(m, sdk, variant)?;
                let file = m.lib_file_path(variant)?;
                Some((name, file.to_string()))
            })
            .collect();
        if files.is_empty() {
            continue;
        }

        for module in modules.iter_mut() {
            let linkage = module.variant_mut(variant);
            for entry in linkage
                .dynamic_libraries
                .iter_mut()
                .chain(linkage.static_libraries.iter_mut())
            {
                if let Some(file) = files.get(entry.as_str()) {
                    *entry = file.clone();
                }
            }
        }
    }
}

/// Resolve linker metadata for every module, then normalize the library
/// lists across the whole set.
pub fn resolve_link_info(modules: &mut [ModuleRecord], sdk: &SdkProperties, ctx: &mut ProbeContext) {
    for module in modules.iter_mut() {
        prl::resolve_all_variants(module, sdk, ctx);
    }
    replace_lib_names_with_file_paths(modules, sdk);
    remove_duplicated_dependency_libs(modules, ctx);
}
