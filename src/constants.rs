//! Application-wide constants
//!
//! Fixed filesystem locations, INI section/key names and default values,
//! kept in one place so the stores and the CLI agree on them.

/// Optimus Manager daemon configuration locations
pub mod paths {
    /// Permanent system-wide configuration file
    pub const PERMANENT_CONFIG: &str = "/etc/optimus-manager/optimus-manager.conf";

    /// Pointer file naming a temporary configuration override
    pub const TEMP_CONFIG_POINTER: &str = "/var/lib/optimus-manager/temp_conf_path";

    /// System application descriptor copied into the autostart directory
    pub const SYSTEM_DESKTOP_FILE: &str = "/usr/share/applications/optimus-manager.desktop";
}

/// Per-user application settings file
pub mod app {
    /// Directory under the XDG config dir
    pub const APP_DIR: &str = "optimus-manager-qt";

    /// Settings filename
    pub const FILENAME: &str = "optimus-manager-qt.conf";

    /// Autostart directory under the XDG config dir
    pub const AUTOSTART_DIR: &str = "autostart";

    /// Descriptor filename (same in the system and autostart directories)
    pub const DESKTOP_FILENAME: &str = "optimus-manager.desktop";

    /// Section used for top-level keys
    pub const SECTION: &str = "General";

    pub const LANGUAGE: &str = "Language";
    pub const CONFIRM_SWITCHING: &str = "ConfirmSwitching";
    pub const INTEGRATED_ICON: &str = "IntegratedIcon";
    pub const NVIDIA_ICON: &str = "NvidiaIcon";
    pub const HYBRID_ICON: &str = "HybridIcon";
}

/// Daemon configuration keys as `(section, key)` pairs
pub mod keys {
    pub type Key = (&'static str, &'static str);

    pub const SWITCHING: Key = ("optimus", "switching");
    pub const PCI_POWER_CONTROL: Key = ("optimus", "pci_power_control");
    pub const PCI_REMOVE: Key = ("optimus", "pci_remove");
    pub const PCI_RESET: Key = ("optimus", "pci_reset");
    pub const AUTO_LOGOUT: Key = ("optimus", "auto_logout");

    pub const INTEGRATED_DRIVER: Key = ("integrated", "driver");
    pub const INTEL_ACCEL: Key = ("intel", "accel");
    pub const INTEGRATED_TEAR_FREE: Key = ("integrated", "tearfree");
    pub const INTEGRATED_DRI: Key = ("integrated", "DRI");
    pub const INTEGRATED_MODESET: Key = ("integrated", "modeset");

    pub const NVIDIA_MODESET: Key = ("nvidia", "modeset");
    pub const NVIDIA_PAT: Key = ("nvidia", "PAT");
    pub const NVIDIA_DPI: Key = ("nvidia", "DPI");
    pub const NVIDIA_IGNORE_ABI: Key = ("nvidia", "ignore_abi");
    pub const NVIDIA_ALLOW_EXTERNAL_GPUS: Key = ("nvidia", "allow_external_gpus");
    pub const NVIDIA_OPTIONS: Key = ("nvidia", "options");
}

/// Default values for daemon options without an enum type
pub mod defaults {
    pub const PCI_POWER_CONTROL: bool = false;
    pub const PCI_REMOVE: bool = false;
    pub const AUTO_LOGOUT: bool = true;
    pub const INTEGRATED_MODESET: bool = true;
    pub const NVIDIA_MODESET: bool = true;
    pub const NVIDIA_PAT: bool = true;
    pub const NVIDIA_DPI: u32 = 96;
    pub const NVIDIA_IGNORE_ABI: bool = false;
    pub const NVIDIA_ALLOW_EXTERNAL_GPUS: bool = false;

    pub const CONFIRM_SWITCHING: bool = true;
}

/// Persisted boolean tokens
pub mod tokens {
    pub const YES: &str = "yes";
    pub const NO: &str = "no";

    /// Separator between entries of a token list
    pub const LIST_SEPARATOR: char = ',';
}

/// Localization catalogs
pub mod i18n {
    /// Catalog name prefix, followed by `_<locale>`
    pub const CATALOG_PREFIX: &str = "optimus-manager";

    /// Environment variables consulted for the system locale, in order
    pub const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];
}
