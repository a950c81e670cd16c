//! Test fixtures: SDK properties rooted in a directory and fake SDK trees
//! with a scripted query executable.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::{BuildVariant, DeploymentTargets, PerVariant, SdkProperties, SdkVersion};

/// Properties of a shared 5.15.2 linux-g++ release SDK installed at `root`.
///
/// Nothing is created on disk.
pub fn sdk_at(root: &Path) -> SdkProperties {
    SdkProperties {
        install_prefix_path: Some(root.to_path_buf()),
        documentation_path: None,
        include_path: root.join("include"),
        library_path: root.join("lib"),
        host_library_path: Some(root.join("lib")),
        binary_path: root.join("bin"),
        install_path: Some(root.join("bin")),
        plugin_path: root.join("plugins"),
        qml_path: None,
        qml_import_path: None,
        lib_exec_path: None,
        qml_lib_exec_path: Some(root.join("bin")),
        help_generator_lib_exec_path: Some(root.join("bin")),
        mkspec_base_path: root.join("mkspecs"),
        mkspec_path: root.join("mkspecs").join("linux-g++"),
        mkspec_name: "linux-g++".to_string(),
        version: SdkVersion::new(5, 15, 2),
        namespace: None,
        lib_infix: String::new(),
        architecture: "x86_64".to_string(),
        config_items: Vec::new(),
        sdk_config_items: vec!["release".to_string()],
        android_abis: Vec::new(),
        msvc_version: None,
        framework_build: false,
        build_variants: vec![BuildVariant::Release],
        static_build: false,
        deployment: DeploymentTargets::default(),
        entry_point_libs: PerVariant::default(),
    }
}

/// Builder for a fake SDK tree.
#[derive(Debug, Clone)]
pub struct FakeSdk {
    version: SdkVersion,
    mkspec: String,
    sdk_config: String,
    config: String,
    android_abis: Option<String>,
    descriptors: Vec<(String, String)>,
    libraries: Vec<(String, String)>,
}

/// A fake SDK on disk. The tree is removed when this is dropped.
#[derive(Debug)]
pub struct FakeInstallation {
    _dir: TempDir,
    pub root: PathBuf,
    pub qmake: PathBuf,
}

impl Default for FakeSdk {
    fn default() -> Self {
        FakeSdk::new()
    }
}

impl FakeSdk {
    pub fn new() -> Self {
        FakeSdk {
            version: SdkVersion::new(5, 15, 2),
            mkspec: "linux-g++".to_string(),
            sdk_config: "release".to_string(),
            config: String::new(),
            android_abis: None,
            descriptors: Vec::new(),
            libraries: Vec::new(),
        }
    }

    pub fn mkspec(mut self, mkspec: &str) -> Self {
        self.mkspec = mkspec.to_string();
        self
    }

    /// `QT_CONFIG` of the base configuration file.
    pub fn sdk_config(mut self, items: &str) -> Self {
        self.sdk_config = items.to_string();
        self
    }

    /// `CONFIG` of the base configuration file.
    pub fn config(mut self, items: &str) -> Self {
        self.config = items.to_string();
        self
    }

    pub fn android_abis(mut self, abis: &str) -> Self {
        self.android_abis = Some(abis.to_string());
        self
    }

    /// Add `mkspecs/modules/<file_name>`.
    pub fn descriptor(mut self, file_name: &str, content: &str) -> Self {
        self.descriptors
            .push((file_name.to_string(), content.to_string()));
        self
    }

    /// Add `lib/lib<base>.so.<version>` and its linker metadata file.
    pub fn library(mut self, base: &str, libs: &str) -> Self {
        self.libraries.push((base.to_string(), libs.to_string()));
        self
    }

    pub fn build(self) -> FakeInstallation {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        for sub in ["bin", "include", "lib", "plugins"] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }

        let mkspecs = root.join("mkspecs");
        fs::create_dir_all(mkspecs.join(&self.mkspec)).unwrap();
        fs::write(
            mkspecs.join(&self.mkspec).join("qmake.conf"),
            "MAKEFILE_GENERATOR = UNIX\n",
        )
        .unwrap();
        fs::write(
            mkspecs.join("qconfig.pri"),
            format!(
                "QT_ARCH = x86_64\n\
                 QT_CONFIG = {}\n\
                 CONFIG = {}\n\
                 QT_MAJOR_VERSION = {}\n\
                 QT_MINOR_VERSION = {}\n\
                 QT_PATCH_VERSION = {}\n",
                self.sdk_config,
                self.config,
                self.version.major(),
                self.version.minor(),
                self.version.patch()
            ),
        )
        .unwrap();
        if let Some(abis) = &self.android_abis {
            fs::write(
                mkspecs.join("qdevice.pri"),
                format!("DEFAULT_ANDROID_ABIS = {}\n", abis),
            )
            .unwrap();
        }

        if !self.descriptors.is_empty() {
            fs::create_dir_all(mkspecs.join("modules")).unwrap();
        }
        for (file_name, content) in &self.descriptors {
            fs::write(mkspecs.join("modules").join(file_name), content).unwrap();
        }

        for (base, libs) in &self.libraries {
            let target = format!("lib{}.so.{}", base, self.version);
            fs::write(root.join("lib").join(&target), "").unwrap();
            fs::write(
                root.join("lib").join(format!("lib{}.prl", base)),
                format!("QMAKE_PRL_TARGET = {}\nQMAKE_PRL_LIBS = {}\n", target, libs),
            )
            .unwrap();
        }

        let qmake = write_query_script(&root, &self.version, &self.mkspec);
        FakeInstallation {
            _dir: dir,
            root,
            qmake,
        }
    }
}

fn write_query_script(root: &Path, version: &SdkVersion, mkspec: &str) -> PathBuf {
    let r = root.display();
    let script = format!(
        "#!/bin/sh\n\
         cat <<'EOF'\n\
         QT_VERSION:{version}\n\
         QT_INSTALL_PREFIX:{r}\n\
         QT_INSTALL_HEADERS:{r}/include\n\
         QT_INSTALL_LIBS:{r}/lib\n\
         QT_INSTALL_BINS:{r}/bin\n\
         QT_INSTALL_PLUGINS:{r}/plugins\n\
         QT_HOST_BINS:{r}/bin\n\
         QT_HOST_LIBS:{r}/lib\n\
         QT_HOST_DATA:{r}\n\
         QT_HOST_DATA/src:{r}/src\n\
         QMAKE_XSPEC:{mkspec}\n\
         EOF\n"
    );
    let path = root.join("bin").join("qmake");
    fs::write(&path, script).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }
    path
}
