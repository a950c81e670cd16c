//! `qtprobe detect` command

use anyhow::Result;

use crate::cli::DetectArgs;
use qtprobe::probe::find_query_executables;

pub fn execute(args: DetectArgs) -> Result<()> {
    let config = super::current_config()?;
    let names = if args.names.is_empty() {
        config.probe.executable_names
    } else {
        args.names
    };

    for path in find_query_executables(&names) {
        println!("{}", path.display());
    }
    Ok(())
}
