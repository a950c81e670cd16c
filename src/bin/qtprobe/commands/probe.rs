//! `qtprobe probe` command

use anyhow::{bail, Result};

use crate::cli::ProbeArgs;
use qtprobe::ops::{probe_installations, InstallationReport, ProbeOptions};
use qtprobe::util::diagnostic::{emit, suggestions, Diagnostic};

pub fn execute(args: ProbeArgs, verbose: bool, color: bool) -> Result<()> {
    let config = super::current_config()?;
    let executables = super::query_executables(args.qmake, &config);
    if executables.is_empty() {
        emit(
            &Diagnostic::error("no qmake executable to probe").with_suggestion(suggestions::NO_QMAKE),
            color,
        );
        std::process::exit(1);
    }

    let options = ProbeOptions {
        abis: if args.abi.is_empty() {
            config.probe.abis
        } else {
            args.abi
        },
        parallel_abis: args.parallel_abis || config.probe.parallel_abis.unwrap_or(false),
    };

    let results = probe_installations(&executables, &options);
    let total = results.len();
    let mut installations = Vec::new();
    for (path, result) in results {
        match result {
            Ok(installation) => installations.push(installation),
            Err(e) => {
                let mut diag = e.to_diagnostic(&path);
                if !verbose {
                    diag = diag.with_suggestion(suggestions::VERBOSE);
                }
                emit(&diag, color);
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&installations)?);
    } else {
        for (i, installation) in installations.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print!("{}", InstallationReport::new(installation, verbose));
        }
    }

    if installations.is_empty() {
        bail!("all {} installation(s) failed to probe", total);
    }
    Ok(())
}
