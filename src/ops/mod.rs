//! High-level operations.
//!
//! This module contains the implementation of qtprobe commands.

pub mod probe;
pub mod report;

pub use probe::{
    default_qpa_plugin, probe_abi, probe_installation, probe_installations, AbiInfo, ProbeOptions,
    QtInstallation,
};
pub use report::InstallationReport;
