//! Command-line interface
//!
//! Every daemon option is addressed by its `section/key` name, so the
//! names on the command line match what ends up in the INI file.

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::OptimusSettings;
use crate::constants::keys::{self, Key};
use crate::types::{
    AccelMethod, Dri, Driver, Gpu, Language, NvidiaOption, NvidiaOptions, PciReset,
    SwitchingMethod, TearFree, TokenMap,
};

#[derive(Debug, Parser)]
#[command(name = "optimus-settings", version, about = "Edit Optimus Manager and front-end settings")]
pub struct Cli {
    /// Edit this file instead of the config the daemon is using
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every daemon option
    Show(ShowArgs),
    /// Print one daemon option
    Get {
        #[arg(value_enum)]
        option: OptionName,
    },
    /// Change one daemon option and save the file
    Set {
        #[arg(value_enum)]
        option: OptionName,
        /// New value; `0` for nvidia/DPI restores the default
        value: String,
    },
    /// Print the config file in use and whether it is temporary
    ConfigPath,
    /// Front-end preferences
    #[command(subcommand)]
    App(AppCommand),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum AppCommand {
    /// Print every preference
    Show(ShowArgs),
    /// Print or change the interface language
    Language {
        #[arg(value_enum)]
        language: Option<Language>,
    },
    /// Print or change autostart on login
    Autostart {
        #[arg(value_enum)]
        state: Option<Toggle>,
    },
    /// Print or change confirmation before switching GPUs
    ConfirmSwitching {
        #[arg(value_enum)]
        state: Option<Toggle>,
    },
    /// Print or change the tray icon shown for a GPU
    Icon {
        #[arg(value_enum)]
        gpu: Gpu,
        name: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> bool {
        toggle == Toggle::On
    }
}

pub fn toggle_label(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptionName {
    #[value(name = "optimus/switching")]
    Switching,
    #[value(name = "optimus/pci_power_control")]
    PciPowerControl,
    #[value(name = "optimus/pci_remove")]
    PciRemove,
    #[value(name = "optimus/pci_reset")]
    PciReset,
    #[value(name = "optimus/auto_logout")]
    AutoLogout,
    #[value(name = "integrated/driver")]
    IntegratedDriver,
    #[value(name = "intel/accel")]
    IntelAccel,
    #[value(name = "integrated/tearfree")]
    IntegratedTearFree,
    #[value(name = "integrated/DRI")]
    IntegratedDri,
    #[value(name = "integrated/modeset")]
    IntegratedModeset,
    #[value(name = "nvidia/modeset")]
    NvidiaModeset,
    #[value(name = "nvidia/PAT")]
    NvidiaPat,
    #[value(name = "nvidia/DPI")]
    NvidiaDpi,
    #[value(name = "nvidia/ignore_abi")]
    NvidiaIgnoreAbi,
    #[value(name = "nvidia/allow_external_gpus")]
    NvidiaAllowExternalGpus,
    #[value(name = "nvidia/options")]
    NvidiaOptions,
}

fn parse_enum<T: ValueEnum>(value: &str) -> Result<T> {
    T::from_str(value, true).map_err(|e| anyhow!(e))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "true" | "on" | "1" => Ok(true),
        "no" | "false" | "off" | "0" => Ok(false),
        _ => Err(anyhow!("expected yes or no, got '{value}'")),
    }
}

/// Strict parse of a comma-separated flag list; unknown entries are errors
fn parse_nvidia_options(value: &str) -> Result<NvidiaOptions> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_enum::<NvidiaOption>)
        .collect()
}

/// Display form of an enum value; the empty default sentinel shows as `default`
fn display_token<T: TokenMap>(value: T) -> String {
    match value.token() {
        "" => "default".to_string(),
        token => token.to_string(),
    }
}

impl OptionName {
    pub fn key(self) -> Key {
        match self {
            OptionName::Switching => keys::SWITCHING,
            OptionName::PciPowerControl => keys::PCI_POWER_CONTROL,
            OptionName::PciRemove => keys::PCI_REMOVE,
            OptionName::PciReset => keys::PCI_RESET,
            OptionName::AutoLogout => keys::AUTO_LOGOUT,
            OptionName::IntegratedDriver => keys::INTEGRATED_DRIVER,
            OptionName::IntelAccel => keys::INTEL_ACCEL,
            OptionName::IntegratedTearFree => keys::INTEGRATED_TEAR_FREE,
            OptionName::IntegratedDri => keys::INTEGRATED_DRI,
            OptionName::IntegratedModeset => keys::INTEGRATED_MODESET,
            OptionName::NvidiaModeset => keys::NVIDIA_MODESET,
            OptionName::NvidiaPat => keys::NVIDIA_PAT,
            OptionName::NvidiaDpi => keys::NVIDIA_DPI,
            OptionName::NvidiaIgnoreAbi => keys::NVIDIA_IGNORE_ABI,
            OptionName::NvidiaAllowExternalGpus => keys::NVIDIA_ALLOW_EXTERNAL_GPUS,
            OptionName::NvidiaOptions => keys::NVIDIA_OPTIONS,
        }
    }

    pub fn name(self) -> String {
        let (section, key) = self.key();
        format!("{section}/{key}")
    }

    /// Current value as it would be typed on the command line
    pub fn get(self, settings: &OptimusSettings) -> String {
        match self {
            OptionName::Switching => display_token(settings.switching_method()),
            OptionName::PciPowerControl => display_token(settings.is_pci_power_control_enabled()),
            OptionName::PciRemove => display_token(settings.is_pci_remove_enabled()),
            OptionName::PciReset => display_token(settings.pci_reset()),
            OptionName::AutoLogout => display_token(settings.is_auto_logout_enabled()),
            OptionName::IntegratedDriver => display_token(settings.integrated_driver()),
            OptionName::IntelAccel => display_token(settings.intel_accel_method()),
            OptionName::IntegratedTearFree => display_token(settings.integrated_tear_free()),
            OptionName::IntegratedDri => display_token(settings.integrated_dri()),
            OptionName::IntegratedModeset => display_token(settings.is_integrated_modeset_enabled()),
            OptionName::NvidiaModeset => display_token(settings.is_nvidia_modeset_enabled()),
            OptionName::NvidiaPat => display_token(settings.is_nvidia_pat_enabled()),
            OptionName::NvidiaDpi => settings.nvidia_dpi().to_string(),
            OptionName::NvidiaIgnoreAbi => display_token(settings.is_nvidia_ignore_abi()),
            OptionName::NvidiaAllowExternalGpus => display_token(settings.is_nvidia_allow_external_gpus()),
            OptionName::NvidiaOptions => settings.nvidia_options().to_string(),
        }
    }

    /// Parse `value` for this option and store it
    pub fn set(self, settings: &mut OptimusSettings, value: &str) -> Result<()> {
        let value = value.trim();
        match self {
            OptionName::Switching => settings.set_switching_method(parse_enum::<SwitchingMethod>(value)?),
            OptionName::PciPowerControl => settings.set_pci_power_control_enabled(parse_bool(value)?),
            OptionName::PciRemove => settings.set_pci_remove_enabled(parse_bool(value)?),
            OptionName::PciReset => settings.set_pci_reset(parse_enum::<PciReset>(value)?),
            OptionName::AutoLogout => settings.set_auto_logout_enabled(parse_bool(value)?),
            OptionName::IntegratedDriver => settings.set_integrated_driver(parse_enum::<Driver>(value)?),
            OptionName::IntelAccel => settings.set_intel_accel_method(parse_enum::<AccelMethod>(value)?),
            OptionName::IntegratedTearFree => settings.set_integrated_tear_free(parse_enum::<TearFree>(value)?),
            OptionName::IntegratedDri => settings.set_integrated_dri(parse_enum::<Dri>(value)?),
            OptionName::IntegratedModeset => settings.set_integrated_modeset_enabled(parse_bool(value)?),
            OptionName::NvidiaModeset => settings.set_nvidia_modeset_enabled(parse_bool(value)?),
            OptionName::NvidiaPat => settings.set_nvidia_pat_enabled(parse_bool(value)?),
            OptionName::NvidiaDpi => {
                let dpi = value
                    .parse()
                    .map_err(|e| anyhow!("invalid DPI '{value}': {e}"))?;
                settings.set_nvidia_dpi(dpi);
            }
            OptionName::NvidiaIgnoreAbi => settings.set_nvidia_ignore_abi(parse_bool(value)?),
            OptionName::NvidiaAllowExternalGpus => settings.set_nvidia_allow_external_gpus(parse_bool(value)?),
            OptionName::NvidiaOptions => settings.set_nvidia_options(parse_nvidia_options(value)?),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn settings() -> (tempfile::TempDir, OptimusSettings) {
        let dir = tempfile::tempdir().unwrap();
        let settings = OptimusSettings::with_path(dir.path().join("optimus-manager.conf"));
        (dir, settings)
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_option_names_match_keys() {
        for option in OptionName::value_variants() {
            let possible = option.to_possible_value().unwrap();
            assert_eq!(possible.get_name(), option.name());
        }
    }

    #[test]
    fn test_parse_set_command() {
        let cli = Cli::try_parse_from(["optimus-settings", "set", "optimus/switching", "acpi_call"]).unwrap();
        match cli.command {
            Command::Set { option, value } => {
                assert_eq!(option, OptionName::Switching);
                assert_eq!(value, "acpi_call");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_app_language() {
        let cli = Cli::try_parse_from(["optimus-settings", "app", "language", "zh_CN"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::App(AppCommand::Language { language: Some(Language::ChineseSimplified) })
        ));
    }

    #[test]
    fn test_set_then_get_uses_same_spelling() {
        let (_dir, mut settings) = settings();
        let cases = [
            (OptionName::Switching, "nouveau"),
            (OptionName::PciReset, "function_level"),
            (OptionName::IntegratedDriver, "integrated"),
            (OptionName::IntelAccel, "uxa"),
            (OptionName::IntelAccel, "default"),
            (OptionName::IntegratedTearFree, "yes"),
            (OptionName::IntegratedDri, "2"),
            (OptionName::NvidiaPat, "no"),
            (OptionName::NvidiaDpi, "144"),
            (OptionName::NvidiaOptions, "overclocking, triple_buffer"),
            (OptionName::NvidiaOptions, ""),
        ];

        for (option, value) in cases {
            option.set(&mut settings, value).unwrap();
            assert_eq!(option.get(&settings), value, "{}", option.name());
        }
    }

    #[test]
    fn test_set_accepts_boolean_aliases() {
        let (_dir, mut settings) = settings();
        OptionName::PciRemove.set(&mut settings, "on").unwrap();
        assert!(settings.is_pci_remove_enabled());
        OptionName::PciRemove.set(&mut settings, "false").unwrap();
        assert!(!settings.is_pci_remove_enabled());
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let (_dir, mut settings) = settings();
        assert!(OptionName::Switching.set(&mut settings, "bumblebee").is_err());
        assert!(OptionName::AutoLogout.set(&mut settings, "sometimes").is_err());
        assert!(OptionName::NvidiaDpi.set(&mut settings, "-5").is_err());
        assert!(OptionName::NvidiaOptions.set(&mut settings, "overclocking, sli").is_err());
        assert_eq!(settings.snapshot(), crate::config::OptimusSnapshot::default());
    }

    #[test]
    fn test_dpi_zero_restores_default() {
        let (_dir, mut settings) = settings();
        OptionName::NvidiaDpi.set(&mut settings, "120").unwrap();
        OptionName::NvidiaDpi.set(&mut settings, "0").unwrap();
        assert_eq!(OptionName::NvidiaDpi.get(&settings), "96");
    }
}
