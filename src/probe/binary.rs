//! Shared-versus-static classification of library files by their headers.

use std::path::Path;

use object::read::macho::{FatArch, MachOFatFile32, MachOFatFile64};
use object::{FileKind, Object, ObjectKind};

/// Whether `path` is a shared library (ELF `ET_DYN`, Mach-O dylib or a PE
/// DLL). Archives and anything unrecognized count as not shared; an
/// unreadable file is reported as not shared as well.
pub fn is_shared_library(path: &Path) -> bool {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!("Cannot inspect '{}': {}", path.display(), e);
            return false;
        }
    };
    classify(&data).unwrap_or_else(|e| {
        tracing::debug!("Cannot parse '{}': {}", path.display(), e);
        false
    })
}

fn classify(data: &[u8]) -> object::Result<bool> {
    match FileKind::parse(data)? {
        FileKind::Elf32
        | FileKind::Elf64
        | FileKind::MachO32
        | FileKind::MachO64
        | FileKind::Pe32
        | FileKind::Pe64 => Ok(object::File::parse(data)?.kind() == ObjectKind::Dynamic),
        // A universal binary is as shared as its first slice.
        FileKind::MachOFat32 => match MachOFatFile32::parse(data)?.arches().first() {
            Some(arch) => classify(arch.data(data)?),
            None => Ok(false),
        },
        FileKind::MachOFat64 => match MachOFatFile64::parse(data)?.arches().first() {
            Some(arch) => classify(arch.data(data)?),
            None => Ok(false),
        },
        _ => Ok(false),
    }
}
