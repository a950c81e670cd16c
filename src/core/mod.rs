//! Core data model: SDK properties, module records and platform rules.

pub mod error;
pub mod module;
pub mod platform;
pub mod sdk;
pub mod variant;
pub mod version;

pub use error::{ProbeError, Result};
pub use module::{ModuleRecord, PluginData, VariantLinkage, CORE_MODULE};
pub use platform::{Mkspec, TargetPlatform};
pub use sdk::{DeploymentTargets, SdkProperties};
pub use variant::{BuildVariant, PerVariant};
pub use version::SdkVersion;
