//! Command implementations

pub mod detect;
pub mod link_line;
pub mod probe;

use std::path::PathBuf;

use qtprobe::util::config::{global_config_path, load_config, project_config_path};
use qtprobe::util::Config;

/// Configuration of the current directory merged over the global one.
pub fn current_config() -> anyhow::Result<Config> {
    let cwd = std::env::current_dir()?;
    let global = global_config_path();
    Ok(load_config(global.as_deref(), &project_config_path(&cwd)))
}

/// Query executables to probe: the given ones, else the configured ones,
/// else whatever is found in `PATH`.
pub fn query_executables(given: Vec<PathBuf>, config: &Config) -> Vec<PathBuf> {
    if !given.is_empty() {
        return given;
    }
    if !config.probe.qmake.is_empty() {
        return config.probe.qmake.clone();
    }
    qtprobe::probe::find_query_executables(&config.probe.executable_names)
}
