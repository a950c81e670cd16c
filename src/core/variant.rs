//! Build variants and per-variant storage.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Debug or release configuration of a library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    Debug,
    Release,
}

impl BuildVariant {
    pub const ALL: [BuildVariant; 2] = [BuildVariant::Debug, BuildVariant::Release];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "debug",
            BuildVariant::Release => "release",
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, BuildVariant::Debug)
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per build variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerVariant<T> {
    pub debug: T,
    pub release: T,
}

impl<T> PerVariant<T> {
    pub fn get(&self, variant: BuildVariant) -> &T {
        match variant {
            BuildVariant::Debug => &self.debug,
            BuildVariant::Release => &self.release,
        }
    }

    pub fn get_mut(&mut self, variant: BuildVariant) -> &mut T {
        match variant {
            BuildVariant::Debug => &mut self.debug,
            BuildVariant::Release => &mut self.release,
        }
    }
}

impl<T: Clone> PerVariant<T> {
    /// The same value for both variants.
    pub fn splat(value: T) -> Self {
        PerVariant {
            debug: value.clone(),
            release: value,
        }
    }
}
