//! Probing an SDK installation through its query executable.

pub mod binary;
pub mod context;
pub mod detect;
pub mod properties;
pub mod query;

pub use context::ProbeContext;
pub use detect::find_query_executables;
pub use properties::resolve;
pub use query::{query_tool, QueryResult};
