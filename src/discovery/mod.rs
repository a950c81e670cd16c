//! Module discovery.
//!
//! 4.x installations get a fixed registry; later versions describe each
//! module, plugin and bundled third-party library in a descriptor file.

pub mod legacy;
pub mod scan;

use crate::core::{ModuleRecord, SdkProperties};

/// Discover the raw module set of `sdk` for `abi`.
pub fn discover(sdk: &SdkProperties, abi: &str) -> Vec<ModuleRecord> {
    if sdk.major() < 5 {
        legacy::modules(sdk)
    } else {
        scan::modules(sdk, abi)
    }
}

/// `test` was long used in place of `testlib`.
pub fn add_test_module(modules: &mut Vec<ModuleRecord>) {
    let mut module = ModuleRecord::new("QtTest", "test", &["testlib"]);
    module.has_library = false;
    modules.push(module);
}

/// Public name for the designer components, which only exist as a private
/// module.
pub fn add_designer_components_module(modules: &mut Vec<ModuleRecord>) {
    let mut module = ModuleRecord::new(
        "QtDesignerComponents",
        "designercomponents",
        &["designercomponents-private"],
    );
    module.has_library = false;
    modules.push(module);
}
