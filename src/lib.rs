//! qtprobe - introspection of qmake-based SDK installations
//!
//! This crate queries an SDK's `qmake` for its layout and configuration,
//! discovers the modules and plugins it ships, and resolves what linking
//! against each of them requires.

pub mod core;
pub mod discovery;
pub mod link;
pub mod ops;
pub mod pri;
pub mod probe;
pub mod util;

/// Fake SDK trees and fixture properties for unit tests.
#[cfg(test)]
pub mod test_support;

pub use core::{BuildVariant, ModuleRecord, ProbeError, SdkProperties, SdkVersion};
pub use ops::{probe_installation, probe_installations, AbiInfo, ProbeOptions, QtInstallation};
