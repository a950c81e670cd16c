//! Platform classification derived from mkspec names.
//!
//! qmake identifies a target by its mkspec (`linux-g++`, `win32-msvc2019`,
//! `macx-ios-clang`, ...). Everything platform-conditional in the probe is
//! keyed off these names; this module turns the string prefixes into
//! enumerations so that callers match exhaustively.

use std::fmt;

use serde::{Deserialize, Serialize};

const MSVC_PREFIX: &str = "win32-msvc";

/// Read-only view over an mkspec name with the classification predicates
/// the naming rules need.
#[derive(Debug, Clone, Copy)]
pub struct Mkspec<'a> {
    name: &'a str,
}

impl<'a> Mkspec<'a> {
    pub fn new(name: &'a str) -> Self {
        Mkspec { name }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The last path component, for mkspecs reported as paths.
    pub fn base_name(&self) -> &'a str {
        self.name.rsplit('/').next().unwrap_or(self.name)
    }

    pub fn is_msvc(&self) -> bool {
        self.name.starts_with(MSVC_PREFIX)
    }

    pub fn is_mingw(&self) -> bool {
        self.name.starts_with("win32-g++") || self.name.starts_with("mingw")
    }

    pub fn is_desktop_windows(&self) -> bool {
        self.name.starts_with("win32-") || self.is_mingw()
    }

    pub fn is_winrt(&self) -> bool {
        self.name.starts_with("winrt-")
    }

    /// Any Windows flavour, including winrt. Drives the `d` suffix and the
    /// absence of a `lib` prefix.
    pub fn has_windows_naming(&self) -> bool {
        self.name.starts_with("win")
    }

    /// MinGW as far as the linker-metadata target line is concerned.
    pub fn is_windows_gnu(&self) -> bool {
        self.has_windows_naming() && self.name.contains("g++")
    }

    /// Any mkspec that links through the MSVC linker.
    pub fn uses_msvc_linker(&self) -> bool {
        self.name.contains("msvc")
    }

    pub fn has_apple_naming(&self) -> bool {
        self.name.contains("macx") || self.name.contains("ios") || self.name.contains("darwin")
    }

    pub fn is_ios(&self) -> bool {
        self.name.contains("ios")
    }

    pub fn is_apple_mobile(&self) -> bool {
        matches!(
            self.name,
            "macx-ios-clang" | "macx-tvos-clang" | "macx-watchos-clang"
        )
    }

    /// MSVC compiler version implied by a `win32-msvcYYYY` mkspec.
    pub fn msvc_compiler_version(&self) -> Option<&'static str> {
        let year = self.name.strip_prefix(MSVC_PREFIX)?;
        MsvcYear::parse(year).map(MsvcYear::compiler_version)
    }

    pub fn target_platform(&self) -> Option<TargetPlatform> {
        TargetPlatform::from_mkspec(*self)
    }
}

/// Visual Studio release years that appear in legacy mkspec names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MsvcYear {
    Vs2005,
    Vs2008,
    Vs2010,
    Vs2012,
    Vs2013,
    Vs2015,
    Vs2017,
    Vs2019,
}

impl MsvcYear {
    pub fn parse(year: &str) -> Option<Self> {
        Some(match year {
            "2005" => MsvcYear::Vs2005,
            "2008" => MsvcYear::Vs2008,
            "2010" => MsvcYear::Vs2010,
            "2012" => MsvcYear::Vs2012,
            "2013" => MsvcYear::Vs2013,
            "2015" => MsvcYear::Vs2015,
            "2017" => MsvcYear::Vs2017,
            "2019" => MsvcYear::Vs2019,
            _ => return None,
        })
    }

    pub fn compiler_version(self) -> &'static str {
        match self {
            MsvcYear::Vs2005 => "14",
            MsvcYear::Vs2008 => "15",
            MsvcYear::Vs2010 => "16",
            MsvcYear::Vs2012 => "17",
            MsvcYear::Vs2013 => "18",
            MsvcYear::Vs2015 => "19",
            MsvcYear::Vs2017 => "19.1",
            MsvcYear::Vs2019 => "19.2",
        }
    }
}

/// Operating system a probed SDK targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    Aix,
    Android,
    Windows,
    MacOs,
    Ios,
    Tvos,
    Watchos,
    FreeBsd,
    Haiku,
    Hpux,
    Hurd,
    Integrity,
    Linux,
    NetBsd,
    OpenBsd,
    Qnx,
    Solaris,
    VxWorks,
}

impl TargetPlatform {
    const PREFIXES: &'static [(&'static str, TargetPlatform)] = &[
        ("aix-", TargetPlatform::Aix),
        ("android-", TargetPlatform::Android),
        ("cygwin-", TargetPlatform::Windows),
        ("darwin-", TargetPlatform::MacOs),
        ("freebsd-", TargetPlatform::FreeBsd),
        ("haiku-", TargetPlatform::Haiku),
        ("hpux-", TargetPlatform::Hpux),
        ("hpuxi-", TargetPlatform::Hpux),
        ("hurd-", TargetPlatform::Hurd),
        ("integrity-", TargetPlatform::Integrity),
        ("linux-", TargetPlatform::Linux),
        ("macx-ios-", TargetPlatform::Ios),
        ("macx-tvos-", TargetPlatform::Tvos),
        ("macx-watchos-", TargetPlatform::Watchos),
        ("macx-", TargetPlatform::MacOs),
        ("netbsd-", TargetPlatform::NetBsd),
        ("openbsd-", TargetPlatform::OpenBsd),
        ("qnx-", TargetPlatform::Qnx),
        ("solaris-", TargetPlatform::Solaris),
        ("vxworks-", TargetPlatform::VxWorks),
        ("winrt-", TargetPlatform::Windows),
    ];

    pub fn from_mkspec(mkspec: Mkspec<'_>) -> Option<Self> {
        let base = mkspec.base_name();
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| base.starts_with(prefix))
            .map(|(_, platform)| *platform)
            .or_else(|| {
                Mkspec::new(base)
                    .is_desktop_windows()
                    .then_some(TargetPlatform::Windows)
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Aix => "aix",
            TargetPlatform::Android => "android",
            TargetPlatform::Windows => "windows",
            TargetPlatform::MacOs => "macos",
            TargetPlatform::Ios => "ios",
            TargetPlatform::Tvos => "tvos",
            TargetPlatform::Watchos => "watchos",
            TargetPlatform::FreeBsd => "freebsd",
            TargetPlatform::Haiku => "haiku",
            TargetPlatform::Hpux => "hpux",
            TargetPlatform::Hurd => "hurd",
            TargetPlatform::Integrity => "integrity",
            TargetPlatform::Linux => "linux",
            TargetPlatform::NetBsd => "netbsd",
            TargetPlatform::OpenBsd => "openbsd",
            TargetPlatform::Qnx => "qnx",
            TargetPlatform::Solaris => "solaris",
            TargetPlatform::VxWorks => "vxworks",
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apple OS families whose deployment targets appear in `qmake.conf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppleOs {
    MacOs,
    Ios,
    Tvos,
    Watchos,
}

impl AppleOs {
    /// Map the `QMAKE_<KEY>_DEPLOYMENT_TARGET` infix.
    pub fn from_deployment_key(key: &str) -> Option<Self> {
        Some(match key {
            "MACOSX" => AppleOs::MacOs,
            "IOS" => AppleOs::Ios,
            "TVOS" => AppleOs::Tvos,
            "WATCHOS" => AppleOs::Watchos,
            _ => return None,
        })
    }
}

/// Canonical spelling of an architecture name.
pub fn canonical_architecture(arch: &str) -> String {
    let lower = arch.to_lowercase();
    let canonical = match lower.as_str() {
        "i386" | "i486" | "i586" | "i686" | "ia32" | "ia-32" | "x86_32" | "x86-32"
        | "intel32" | "mingw32" => "x86",
        "x86-64" | "x64" | "amd64" | "ia32e" | "em64t" | "intel64" | "mingw64" => "x86_64",
        "ia-64" | "itanium" => "ia64",
        "powerpc" => "ppc",
        "powerpc64" => "ppc64",
        _ => return arch.to_string(),
    };
    canonical.to_string()
}

/// Architecture for an Android ABI name.
pub fn abi_to_architecture(abi: &str) -> String {
    match abi {
        "armeabi-v7a" => "armv7a".to_string(),
        "arm64-v8a" => "arm64".to_string(),
        other => other.to_string(),
    }
}
