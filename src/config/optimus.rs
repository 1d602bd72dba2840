//! Optimus Manager daemon configuration
//!
//! Typed access to the system-wide INI file read by the daemon. The file
//! is picked once, when the store is opened: a temporary override named by
//! the daemon's pointer file wins over the permanent configuration.

use anyhow::Result;
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::os::unix::ffi::OsStringExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::ini_store::IniStore;
use crate::constants::{defaults, keys, paths};
use crate::types::{AccelMethod, Dri, Driver, NvidiaOptions, PciReset, SwitchingMethod, TearFree};

/// Which configuration file the daemon is currently using
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigType {
    Temporary,
    #[default]
    Permanent,
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigType::Temporary => write!(f, "temporary"),
            ConfigType::Permanent => write!(f, "permanent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigPath {
    pub path: PathBuf,
    pub kind: ConfigType,
}

pub fn permanent_config_path() -> PathBuf {
    PathBuf::from(paths::PERMANENT_CONFIG)
}

/// Resolve the active configuration file from the fixed system locations
pub fn detect_config_path() -> ConfigPath {
    detect_config_path_from(Path::new(paths::TEMP_CONFIG_POINTER), &permanent_config_path())
}

/// Resolve against explicit pointer and permanent paths
///
/// The pointer's bytes are taken as the path verbatim, minus surrounding
/// ASCII whitespace; they need not be UTF-8.
pub fn detect_config_path_from(pointer: &Path, permanent: &Path) -> ConfigPath {
    match fs::read(pointer) {
        Ok(contents) if !contents.trim_ascii().is_empty() => {
            let path = PathBuf::from(OsString::from_vec(contents.trim_ascii().to_vec()));
            debug!(pointer = %pointer.display(), path = %path.display(), "Using temporary config");
            ConfigPath { path, kind: ConfigType::Temporary }
        }
        _ => ConfigPath {
            path: permanent.to_path_buf(),
            kind: ConfigType::Permanent,
        },
    }
}

/// Every daemon option, read in one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimusSnapshot {
    pub switching_method: SwitchingMethod,
    pub pci_power_control: bool,
    pub pci_remove: bool,
    pub pci_reset: PciReset,
    pub auto_logout: bool,
    pub integrated_driver: Driver,
    pub intel_accel_method: AccelMethod,
    pub integrated_tear_free: TearFree,
    pub integrated_dri: Dri,
    pub integrated_modeset: bool,
    pub nvidia_modeset: bool,
    pub nvidia_pat: bool,
    pub nvidia_dpi: u32,
    pub nvidia_ignore_abi: bool,
    pub nvidia_allow_external_gpus: bool,
    pub nvidia_options: NvidiaOptions,
}

impl Default for OptimusSnapshot {
    fn default() -> Self {
        Self {
            switching_method: SwitchingMethod::default(),
            pci_power_control: defaults::PCI_POWER_CONTROL,
            pci_remove: defaults::PCI_REMOVE,
            pci_reset: PciReset::default(),
            auto_logout: defaults::AUTO_LOGOUT,
            integrated_driver: Driver::default(),
            intel_accel_method: AccelMethod::default(),
            integrated_tear_free: TearFree::default(),
            integrated_dri: Dri::default(),
            integrated_modeset: defaults::INTEGRATED_MODESET,
            nvidia_modeset: defaults::NVIDIA_MODESET,
            nvidia_pat: defaults::NVIDIA_PAT,
            nvidia_dpi: defaults::NVIDIA_DPI,
            nvidia_ignore_abi: defaults::NVIDIA_IGNORE_ABI,
            nvidia_allow_external_gpus: defaults::NVIDIA_ALLOW_EXTERNAL_GPUS,
            nvidia_options: NvidiaOptions::default(),
        }
    }
}

/// Typed view over the daemon configuration file
///
/// Getters never fail: a missing or unrecognized value reads as the
/// option's default. Setters only touch memory until [`save`](Self::save).
#[derive(Debug, Clone)]
pub struct OptimusSettings {
    store: IniStore,
    kind: ConfigType,
}

impl OptimusSettings {
    /// Open whichever configuration file the daemon is currently using
    pub fn open() -> Self {
        let ConfigPath { path, kind } = detect_config_path();
        info!(path = %path.display(), kind = %kind, "Opening optimus-manager config");
        Self {
            store: IniStore::load(path),
            kind,
        }
    }

    /// Open an explicit file, treated as permanent
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            store: IniStore::load(path),
            kind: ConfigType::Permanent,
        }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn config_type(&self) -> ConfigType {
        self.kind
    }

    pub fn save(&self) -> Result<()> {
        self.store.save()
    }

    pub fn switching_method(&self) -> SwitchingMethod {
        self.store.token_or(keys::SWITCHING, SwitchingMethod::default())
    }

    pub fn set_switching_method(&mut self, method: SwitchingMethod) {
        self.store.set_token(keys::SWITCHING, method);
    }

    pub fn is_pci_power_control_enabled(&self) -> bool {
        self.store.token_or(keys::PCI_POWER_CONTROL, defaults::PCI_POWER_CONTROL)
    }

    pub fn set_pci_power_control_enabled(&mut self, enable: bool) {
        self.store.set_token(keys::PCI_POWER_CONTROL, enable);
    }

    pub fn is_pci_remove_enabled(&self) -> bool {
        self.store.token_or(keys::PCI_REMOVE, defaults::PCI_REMOVE)
    }

    pub fn set_pci_remove_enabled(&mut self, enable: bool) {
        self.store.set_token(keys::PCI_REMOVE, enable);
    }

    pub fn pci_reset(&self) -> PciReset {
        self.store.token_or(keys::PCI_RESET, PciReset::default())
    }

    pub fn set_pci_reset(&mut self, reset: PciReset) {
        self.store.set_token(keys::PCI_RESET, reset);
    }

    /// Whether the daemon may terminate the session when switching
    pub fn is_auto_logout_enabled(&self) -> bool {
        self.store.token_or(keys::AUTO_LOGOUT, defaults::AUTO_LOGOUT)
    }

    pub fn set_auto_logout_enabled(&mut self, enable: bool) {
        self.store.set_token(keys::AUTO_LOGOUT, enable);
    }

    pub fn integrated_driver(&self) -> Driver {
        self.store.token_or(keys::INTEGRATED_DRIVER, Driver::default())
    }

    pub fn set_integrated_driver(&mut self, driver: Driver) {
        self.store.set_token(keys::INTEGRATED_DRIVER, driver);
    }

    pub fn intel_accel_method(&self) -> AccelMethod {
        self.store.token_or(keys::INTEL_ACCEL, AccelMethod::default())
    }

    pub fn set_intel_accel_method(&mut self, method: AccelMethod) {
        self.store.set_token(keys::INTEL_ACCEL, method);
    }

    pub fn integrated_tear_free(&self) -> TearFree {
        self.store.token_or(keys::INTEGRATED_TEAR_FREE, TearFree::default())
    }

    pub fn set_integrated_tear_free(&mut self, tear_free: TearFree) {
        self.store.set_token(keys::INTEGRATED_TEAR_FREE, tear_free);
    }

    pub fn integrated_dri(&self) -> Dri {
        self.store.token_or(keys::INTEGRATED_DRI, Dri::default())
    }

    pub fn set_integrated_dri(&mut self, dri: Dri) {
        self.store.set_token(keys::INTEGRATED_DRI, dri);
    }

    pub fn is_integrated_modeset_enabled(&self) -> bool {
        self.store.token_or(keys::INTEGRATED_MODESET, defaults::INTEGRATED_MODESET)
    }

    pub fn set_integrated_modeset_enabled(&mut self, enable: bool) {
        self.store.set_token(keys::INTEGRATED_MODESET, enable);
    }

    pub fn is_nvidia_modeset_enabled(&self) -> bool {
        self.store.token_or(keys::NVIDIA_MODESET, defaults::NVIDIA_MODESET)
    }

    pub fn set_nvidia_modeset_enabled(&mut self, enable: bool) {
        self.store.set_token(keys::NVIDIA_MODESET, enable);
    }

    pub fn is_nvidia_pat_enabled(&self) -> bool {
        self.store.token_or(keys::NVIDIA_PAT, defaults::NVIDIA_PAT)
    }

    pub fn set_nvidia_pat_enabled(&mut self, enable: bool) {
        self.store.set_token(keys::NVIDIA_PAT, enable);
    }

    pub fn nvidia_dpi(&self) -> u32 {
        self.store.parse_or(keys::NVIDIA_DPI, defaults::NVIDIA_DPI)
    }

    /// `0` clears the key so the daemon falls back to its default DPI
    pub fn set_nvidia_dpi(&mut self, dpi: u32) {
        if dpi == 0 {
            self.store.remove(keys::NVIDIA_DPI);
        } else {
            self.store.set_value(keys::NVIDIA_DPI, dpi.to_string());
        }
    }

    pub fn is_nvidia_ignore_abi(&self) -> bool {
        self.store.token_or(keys::NVIDIA_IGNORE_ABI, defaults::NVIDIA_IGNORE_ABI)
    }

    pub fn set_nvidia_ignore_abi(&mut self, ignore: bool) {
        self.store.set_token(keys::NVIDIA_IGNORE_ABI, ignore);
    }

    pub fn is_nvidia_allow_external_gpus(&self) -> bool {
        self.store
            .token_or(keys::NVIDIA_ALLOW_EXTERNAL_GPUS, defaults::NVIDIA_ALLOW_EXTERNAL_GPUS)
    }

    pub fn set_nvidia_allow_external_gpus(&mut self, allow: bool) {
        self.store.set_token(keys::NVIDIA_ALLOW_EXTERNAL_GPUS, allow);
    }

    pub fn nvidia_options(&self) -> NvidiaOptions {
        match self.store.list(keys::NVIDIA_OPTIONS) {
            Some(entries) => NvidiaOptions::from_tokens(entries.iter().map(String::as_str)),
            None => NvidiaOptions::default(),
        }
    }

    pub fn set_nvidia_options(&mut self, options: NvidiaOptions) {
        self.store.set_list(keys::NVIDIA_OPTIONS, &options.to_tokens());
    }

    pub fn snapshot(&self) -> OptimusSnapshot {
        OptimusSnapshot {
            switching_method: self.switching_method(),
            pci_power_control: self.is_pci_power_control_enabled(),
            pci_remove: self.is_pci_remove_enabled(),
            pci_reset: self.pci_reset(),
            auto_logout: self.is_auto_logout_enabled(),
            integrated_driver: self.integrated_driver(),
            intel_accel_method: self.intel_accel_method(),
            integrated_tear_free: self.integrated_tear_free(),
            integrated_dri: self.integrated_dri(),
            integrated_modeset: self.is_integrated_modeset_enabled(),
            nvidia_modeset: self.is_nvidia_modeset_enabled(),
            nvidia_pat: self.is_nvidia_pat_enabled(),
            nvidia_dpi: self.nvidia_dpi(),
            nvidia_ignore_abi: self.is_nvidia_ignore_abi(),
            nvidia_allow_external_gpus: self.is_nvidia_allow_external_gpus(),
            nvidia_options: self.nvidia_options(),
        }
    }
}
