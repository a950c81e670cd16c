//! Linker-metadata (`.prl`) resolution.
//!
//! Every SDK library ships a `.prl` sidecar naming the real library file and
//! the libraries, search paths and frameworks it needs at link time. This
//! module finds the sidecar for a module, reads it, and fills in the
//! module's per-variant linkage. When there is no sidecar the library file
//! is guessed from common prefix/suffix combinations.

use std::path::{Path, PathBuf};

use crate::core::sdk::path_str;
use crate::core::{BuildVariant, ModuleRecord, SdkProperties, VariantLinkage};
use crate::pri::{self, resolve_tokens};
use crate::probe::ProbeContext;

use super::naming::{is_framework, lib_base_name, lib_name_for_linker, library_base_name};

pub const METADATA_EXTENSION: &str = "prl";

const TARGET_KEY: &str = "QMAKE_PRL_TARGET";
const CONFIG_KEY: &str = "QMAKE_PRL_CONFIG";
const LIBS_PREFIX: &str = "QMAKE_PRL_LIBS =";
const MSVC_LIBPATH: &str = "/LIBPATH:";

/// Modules that only exist as release builds.
const NEVER_DEBUG: &[&str] = &["bootstrap", "qmldevtools"];

/// Raw content of one linker-metadata file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMetadata {
    /// Value of the target line: the library file name.
    pub target: Option<String>,
    /// Tags of the config line.
    pub config: Option<Vec<String>>,
    /// Link tokens with placeholders substituted, in file order.
    pub libs: Vec<String>,
}

impl LinkMetadata {
    pub fn parse<S: AsRef<str>>(lines: &[S], file_path: &Path, sdk: &SdkProperties) -> Self {
        let mut metadata = LinkMetadata::default();
        for line in lines {
            let line = line.as_ref().trim();
            let Some((_, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if line.starts_with(TARGET_KEY) {
                metadata.target = Some(value.to_string());
            } else if line.starts_with(CONFIG_KEY) {
                metadata.config = Some(value.split_whitespace().map(str::to_string).collect());
            } else if line.starts_with(LIBS_PREFIX) {
                metadata
                    .libs
                    .extend(resolve_tokens(value, file_path, sdk));
            }
        }
        metadata
    }
}

/// Where a module's metadata file and library live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataLocation {
    pub metadata_file: PathBuf,
    pub lib_dir: PathBuf,
}

/// Resolve both variants of `module`.
pub fn resolve_all_variants(module: &mut ModuleRecord, sdk: &SdkProperties, ctx: &mut ProbeContext) {
    for variant in BuildVariant::ALL {
        resolve(module, sdk, variant, ctx);
    }
}

/// Fill in `module`'s linkage for `variant` from its metadata file.
pub fn resolve(
    module: &mut ModuleRecord,
    sdk: &SdkProperties,
    variant: BuildVariant,
    ctx: &mut ProbeContext,
) {
    if !should_resolve(module, sdk, variant) {
        return;
    }

    add_mobile_static_libs(module, sdk, variant);

    let location = metadata_location(module, sdk, variant, &ctx.abi);
    let lib_file_path = match pri::read_lines(&location.metadata_file) {
        Ok(lines) => {
            let metadata = LinkMetadata::parse(&lines, &location.metadata_file, sdk);
            apply_metadata(module, sdk, variant, &location, metadata)
        }
        Err(e) => fallback_lib_file(module, sdk, variant, &location, ctx, &e.to_string()),
    };

    module.variant_mut(variant).lib_file_path = lib_file_path.map(|p| path_str(&p));
}

fn should_resolve(module: &ModuleRecord, sdk: &SdkProperties, variant: BuildVariant) -> bool {
    if !module.has_library || !sdk.has_variant(variant) {
        return false;
    }
    !(variant.is_debug() && NEVER_DEBUG.contains(&module.public_name()))
}

/// Static libraries for iOS need zlib and libm, and the platform plugin is
/// force-loaded so its static initializers run.
fn add_mobile_static_libs(module: &mut ModuleRecord, sdk: &SdkProperties, variant: BuildVariant) {
    if !sdk.mkspec().is_ios() || !module.is_static_library {
        return;
    }

    let mut extra = vec!["z".to_string(), "m".to_string()];
    if sdk.major() == 5 && sdk.minor() < 8 {
        let platform_support = ModuleRecord::new("QtPlatformSupport", "platformsupport", &[]);
        extra.extend(lib_name_for_linker(&platform_support, sdk, variant));
    }

    let force_load = (module.name == "qios").then(|| {
        let file = format!("{}.a", lib_base_name(module, "libqios", variant, sdk));
        path_str(&sdk.plugin_path.join("platforms").join(file))
    });

    let is_static = module.is_static_library;
    let linkage = module.variant_mut(variant);
    linkage.libraries_mut(is_static).extend(extra);
    if let Some(path) = force_load {
        linkage.linker_flags.push("-force_load".to_string());
        linkage.linker_flags.push(path);
    }
}

/// Path of the metadata file for `module` and the directory its library is in.
pub fn metadata_location(
    module: &ModuleRecord,
    sdk: &SdkProperties,
    variant: BuildVariant,
    abi: &str,
) -> MetadataLocation {
    let mut dir = if module.is_plugin {
        match module.plugin_type() {
            Some(plugin_type) => sdk.plugin_path.join(plugin_type),
            None => sdk.plugin_path.clone(),
        }
    } else {
        module
            .lib_dir
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| sdk.library_path.clone())
    };
    let mut lib_dir = dir.clone();

    let framework = is_framework(module, sdk);
    if framework {
        dir = dir.join(format!(
            "{}.framework",
            library_base_name(module, sdk, BuildVariant::Release)
        ));
        lib_dir = dir.clone();
        if sdk.version.at_least(5, 14, 0) {
            dir = dir.join("Resources");
        }
    }

    let mut base_name = library_base_name(module, sdk, variant);
    if !sdk.mkspec().has_windows_naming() && !framework {
        base_name.insert_str(0, "lib");
    }
    // The metadata file of a 4.x DLL lacks the trailing major version.
    if is_shared_legacy_windows(module, sdk) {
        base_name.pop();
    }
    if !abi.is_empty() && carries_abi_suffix(module, sdk) {
        base_name.push('_');
        base_name.push_str(abi);
    }
    base_name.push('.');
    base_name.push_str(METADATA_EXTENSION);

    MetadataLocation {
        metadata_file: dir.join(base_name),
        lib_dir,
    }
}

fn is_shared_legacy_windows(module: &ModuleRecord, sdk: &SdkProperties) -> bool {
    sdk.mkspec().has_windows_naming() && !module.is_static_library && sdk.major() < 5
}

/// 6.0 and 6.1 dropped the ABI suffix; the bootstrap libraries never had it.
fn carries_abi_suffix(module: &ModuleRecord, sdk: &SdkProperties) -> bool {
    let in_6_0_or_6_1 = sdk.version.at_least(6, 0, 0) && !sdk.version.at_least(6, 2, 0);
    module.name != "QtBootstrap"
        && (module.name != "QtQmlDevTools" || sdk.version.at_least(6, 2, 0))
        && !in_6_0_or_6_1
}

fn apply_metadata(
    module: &mut ModuleRecord,
    sdk: &SdkProperties,
    variant: BuildVariant,
    location: &MetadataLocation,
    metadata: LinkMetadata,
) -> Option<PathBuf> {
    let lib_file_path = metadata
        .target
        .as_deref()
        .map(|target| target_file_path(module, sdk, &location.lib_dir, target));

    if let Some(config) = metadata.config {
        module.config = config;
    }

    let is_static = module.is_static_library;
    let drop_pthread = sdk.targets_android();
    let file = &location.metadata_file;
    let mut library_paths = Vec::new();
    let linkage: &mut VariantLinkage = module.variant_mut(variant);

    let mut tokens = metadata.libs.into_iter();
    while let Some(token) = tokens.next() {
        if let Some(lib) = token.strip_prefix("-l") {
            linkage.libraries_mut(is_static).push(lib.to_string());
        } else if let Some(path) = token.strip_prefix("-L") {
            library_paths.push(path.to_string());
        } else if let Some(path) = token.strip_prefix("-F") {
            linkage.framework_paths.push(path.to_string());
        } else if token == "-framework" {
            linkage.frameworks.extend(tokens.next());
        } else if token == "-pthread" {
            // Android's libc already contains pthreads.
            if !drop_pthread {
                linkage.libraries_mut(is_static).push("pthread".to_string());
            }
        } else if token.starts_with('-') {
            tracing::debug!(
                "QMAKE_PRL_LIBS contains non-library option '{}' in file '{}'",
                token,
                file.display()
            );
            linkage.linker_flags.push(token);
        } else if let Some(path) = token.strip_prefix(MSVC_LIBPATH) {
            library_paths.push(path.replace('\\', "/"));
        } else {
            linkage.libraries_mut(is_static).push(token.replace('\\', "/"));
        }
    }

    module.library_paths.extend(library_paths);
    lib_file_path
}

/// Turn the target line into a file path, correcting for toolchain quirks of
/// releases before 5.6.
fn target_file_path(module: &ModuleRecord, sdk: &SdkProperties, lib_dir: &Path, target: &str) -> PathBuf {
    let mkspec = sdk.mkspec();
    let is_mingw = mkspec.is_windows_gnu();
    let before_5_6 = !sdk.version.at_least(5, 6, 0);

    let mut file_name = String::new();
    // MinGW targets lack the `lib` prefix, except for static libraries.
    if before_5_6 && sdk.major() == 5 && is_mingw && !module.is_static_library {
        file_name.push_str("lib");
    }
    file_name.push_str(target);
    if is_shared_legacy_windows(module, sdk) {
        file_name.push('4');
    }
    if before_5_6 {
        if mkspec.uses_msvc_linker() {
            file_name.push_str(".lib");
        } else if is_mingw {
            file_name.push_str(".a");
            if !lib_dir.join(&file_name).exists() {
                file_name.truncate(file_name.len() - 2);
                file_name.push_str(".dll");
            }
        }
    }
    lib_dir.join(file_name)
}

fn fallback_lib_file(
    module: &ModuleRecord,
    sdk: &SdkProperties,
    variant: BuildVariant,
    location: &MetadataLocation,
    ctx: &mut ProbeContext,
    cause: &str,
) -> Option<PathBuf> {
    // External dependencies have no metadata; their descriptor names the file.
    let from_descriptor = module
        .is_external
        .then(|| module.variant(variant).static_libraries.first())
        .flatten()
        .map(PathBuf::from)
        .filter(|p| p.exists());

    let lib_file_path = from_descriptor
        .or_else(|| guess_library_file_path(&location.metadata_file, &location.lib_dir, sdk));

    if ctx.note_missing(&location.metadata_file) {
        if module.must_exist && lib_file_path.is_none() {
            tracing::warn!(
                "Could not open prl file '{}' for module '{}' ({}), and failed to deduce the \
                 library file path. This module will likely not be usable.",
                location.metadata_file.display(),
                module.name,
                cause
            );
        } else {
            tracing::debug!(
                "No prl file '{}' for module '{}'",
                location.metadata_file.display(),
                module.name
            );
        }
    }
    lib_file_path
}

/// Look for `<prefix><base>.<suffix>` in `lib_dir`, where `<base>` is the
/// metadata file name up to its first dot.
pub fn guess_library_file_path(metadata_file: &Path, lib_dir: &Path, sdk: &SdkProperties) -> Option<PathBuf> {
    let file_name = metadata_file.file_name()?.to_string_lossy();
    let base_name = file_name.split('.').next().unwrap_or(&file_name);

    let versioned = format!("so.{}", sdk.version);
    let suffixes = [versioned.as_str(), "so", "a", "lib", "dll.a"];
    ["", "lib"].iter().find_map(|prefix| {
        suffixes.iter().find_map(|suffix| {
            let candidate = lib_dir.join(format!("{}{}.{}", prefix, base_name, suffix));
            candidate.exists().then_some(candidate)
        })
    })
}
