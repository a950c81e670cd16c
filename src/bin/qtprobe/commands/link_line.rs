//! `qtprobe link-line` command

use anyhow::{anyhow, Result};

use crate::cli::LinkLineArgs;
use qtprobe::link::link_line;
use qtprobe::ops::{probe_installation, ProbeOptions};
use qtprobe::util::diagnostic::{emit, suggestions, Diagnostic};
use qtprobe::BuildVariant;

pub fn execute(args: LinkLineArgs, color: bool) -> Result<()> {
    let options = ProbeOptions {
        abis: args.abi.iter().cloned().collect(),
        parallel_abis: false,
    };
    let installation = match probe_installation(&args.qmake, &options) {
        Ok(installation) => installation,
        Err(e) => {
            emit(&e.to_diagnostic(&args.qmake), color);
            std::process::exit(1);
        }
    };

    let abi = installation.abi(args.abi.as_deref()).ok_or_else(|| {
        anyhow!(
            "the installation has no ABI `{}`",
            args.abi.as_deref().unwrap_or_default()
        )
    })?;

    let variant = if args.debug {
        BuildVariant::Debug
    } else {
        BuildVariant::Release
    };
    if !installation.sdk.has_variant(variant) {
        emit(
            &Diagnostic::warning(format!(
                "the installation was not built with the {} variant",
                variant
            ))
            .with_location(&args.qmake),
            color,
        );
    }

    let modules = abi.module_list();
    let Some(line) = link_line(&modules, &args.module, variant) else {
        emit(
            &Diagnostic::error(format!("unknown module `{}`", args.module))
                .with_location(&args.qmake)
                .with_suggestion(suggestions::UNKNOWN_MODULE),
            color,
        );
        std::process::exit(1);
    };

    for entry in line {
        println!("{}", entry);
    }
    Ok(())
}
