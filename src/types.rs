//! Option types and their persisted tokens
//!
//! Each enumerated option is bound to a static table mapping every variant
//! to exactly one canonical token. Lookups in both directions go through
//! [`TokenMap`].

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use clap::ValueEnum;
use serde::Serialize;

use crate::constants::tokens;

/// Bidirectional variant ↔ token lookup backed by a static table
pub trait TokenMap: Copy + PartialEq + 'static {
    const TABLE: &'static [(Self, &'static str)];

    /// Canonical token for this variant
    fn token(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(variant, _)| *variant == self)
            .map(|(_, token)| *token)
            .unwrap_or_default()
    }

    /// Variant bound to `token`, if the table knows it
    fn from_token(token: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(_, candidate)| *candidate == token)
            .map(|(variant, _)| *variant)
    }
}

impl TokenMap for bool {
    const TABLE: &'static [(Self, &'static str)] = &[(false, tokens::NO), (true, tokens::YES)];
}

/// How the discrete GPU is powered off while unused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SwitchingMethod {
    #[default]
    None,
    Nouveau,
    Bbswitch,
    #[value(name = "acpi_call")]
    AcpiCall,
}

impl TokenMap for SwitchingMethod {
    const TABLE: &'static [(Self, &'static str)] = &[
        (SwitchingMethod::None, "none"),
        (SwitchingMethod::Nouveau, "nouveau"),
        (SwitchingMethod::Bbswitch, "bbswitch"),
        (SwitchingMethod::AcpiCall, "acpi_call"),
    ];
}

/// PCI reset performed on the discrete GPU after switching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PciReset {
    #[default]
    #[value(name = "no")]
    None,
    #[value(name = "function_level")]
    FunctionLevelReset,
    #[value(name = "hot_reset")]
    HotReset,
}

impl TokenMap for PciReset {
    const TABLE: &'static [(Self, &'static str)] = &[
        (PciReset::None, tokens::NO),
        (PciReset::FunctionLevelReset, "function_level"),
        (PciReset::HotReset, "hot_reset"),
    ];
}

/// Xorg driver for the integrated GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Driver {
    #[default]
    Modesetting,
    #[value(name = "integrated")]
    IntelDriver,
}

impl TokenMap for Driver {
    const TABLE: &'static [(Self, &'static str)] = &[
        (Driver::Modesetting, "modesetting"),
        (Driver::IntelDriver, "integrated"),
    ];
}

/// Acceleration method of the Intel Xorg driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AccelMethod {
    #[default]
    Default,
    Sna,
    Xna,
    Uxa,
}

impl TokenMap for AccelMethod {
    const TABLE: &'static [(Self, &'static str)] = &[
        (AccelMethod::Default, ""),
        (AccelMethod::Sna, "sna"),
        (AccelMethod::Xna, "xna"),
        (AccelMethod::Uxa, "uxa"),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TearFree {
    #[default]
    Default,
    #[value(name = "yes", alias = "enable")]
    Enable,
    #[value(name = "no", alias = "disable")]
    Disable,
}

impl TokenMap for TearFree {
    const TABLE: &'static [(Self, &'static str)] = &[
        (TearFree::Default, ""),
        (TearFree::Enable, tokens::YES),
        (TearFree::Disable, tokens::NO),
    ];
}

/// Direct Rendering Infrastructure version, stored as its number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
pub enum Dri {
    #[value(name = "2")]
    #[serde(rename = "2")]
    Dri2,
    #[default]
    #[value(name = "3")]
    #[serde(rename = "3")]
    Dri3,
}

impl TokenMap for Dri {
    const TABLE: &'static [(Self, &'static str)] = &[(Dri::Dri2, "2"), (Dri::Dri3, "3")];
}

/// Single NVIDIA feature flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NvidiaOption {
    Overclocking,
    #[value(name = "triple_buffer")]
    TripleBuffer,
}

impl NvidiaOption {
    fn bit(self) -> u8 {
        match self {
            NvidiaOption::Overclocking => 1 << 0,
            NvidiaOption::TripleBuffer => 1 << 1,
        }
    }
}

impl TokenMap for NvidiaOption {
    const TABLE: &'static [(Self, &'static str)] = &[
        (NvidiaOption::Overclocking, "overclocking"),
        (NvidiaOption::TripleBuffer, "triple_buffer"),
    ];
}

/// Set of [`NvidiaOption`] flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NvidiaOptions(u8);

impl NvidiaOptions {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, option: NvidiaOption) -> bool {
        self.0 & option.bit() != 0
    }

    pub fn insert(&mut self, option: NvidiaOption) {
        self.0 |= option.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set flags in table order
    pub fn iter(self) -> impl Iterator<Item = NvidiaOption> {
        NvidiaOption::TABLE
            .iter()
            .map(|(option, _)| *option)
            .filter(move |option| self.contains(*option))
    }

    /// One token per set flag, in table order
    pub fn to_tokens(self) -> Vec<&'static str> {
        self.iter().map(NvidiaOption::token).collect()
    }

    /// Collect known tokens; unrecognized entries are ignored
    pub fn from_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Self {
        tokens
            .into_iter()
            .filter_map(|token| NvidiaOption::from_token(token.trim()))
            .collect()
    }
}

impl Default for NvidiaOptions {
    fn default() -> Self {
        NvidiaOption::Overclocking.into()
    }
}

impl From<NvidiaOption> for NvidiaOptions {
    fn from(option: NvidiaOption) -> Self {
        Self(option.bit())
    }
}

impl BitOr for NvidiaOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<NvidiaOption> for NvidiaOptions {
    type Output = Self;

    fn bitor(self, rhs: NvidiaOption) -> Self {
        Self(self.0 | rhs.bit())
    }
}

impl BitOrAssign<NvidiaOption> for NvidiaOptions {
    fn bitor_assign(&mut self, rhs: NvidiaOption) {
        self.insert(rhs);
    }
}

impl FromIterator<NvidiaOption> for NvidiaOptions {
    fn from_iter<I: IntoIterator<Item = NvidiaOption>>(iter: I) -> Self {
        let mut options = Self::empty();
        for option in iter {
            options.insert(option);
        }
        options
    }
}

impl fmt::Display for NvidiaOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        write!(f, "{}", self.to_tokens().join(", "))
    }
}

impl Serialize for NvidiaOptions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

/// GPU mode as reported by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Gpu {
    Integrated,
    Nvidia,
    Hybrid,
}

impl Gpu {
    pub const ALL: [Gpu; 3] = [Gpu::Integrated, Gpu::Nvidia, Gpu::Hybrid];

    /// Themed icon shown in the tray while this GPU is active
    pub fn default_icon_name(self) -> &'static str {
        match self {
            Gpu::Integrated => "prime-integrated",
            Gpu::Nvidia => "prime-nvidia",
            Gpu::Hybrid => "prime-hybrid",
        }
    }
}

impl TokenMap for Gpu {
    const TABLE: &'static [(Self, &'static str)] = &[
        (Gpu::Integrated, "integrated"),
        (Gpu::Nvidia, "nvidia"),
        (Gpu::Hybrid, "hybrid"),
    ];
}

/// Interface language; `System` follows the user's locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    System,
    #[value(name = "en")]
    English,
    #[value(name = "fi")]
    Finnish,
    #[value(name = "zh_CN")]
    ChineseSimplified,
}

impl TokenMap for Language {
    const TABLE: &'static [(Self, &'static str)] = &[
        (Language::System, ""),
        (Language::English, "en"),
        (Language::Finnish, "fi"),
        (Language::ChineseSimplified, "zh_CN"),
    ];
}

impl Language {
    /// Numeric language codes as stored by the Qt front-end (`QLocale::Language`)
    const LOCALE_CODES: &'static [(Self, u32)] = &[
        (Language::System, 0),
        (Language::English, 31),
        (Language::Finnish, 36),
        (Language::ChineseSimplified, 25),
    ];

    pub fn locale_code(self) -> u32 {
        Self::LOCALE_CODES
            .iter()
            .find(|(language, _)| *language == self)
            .map_or(0, |(_, code)| *code)
    }

    pub fn from_locale_code(code: u32) -> Option<Self> {
        Self::LOCALE_CODES
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(language, _)| *language)
    }

    /// Parse a stored value: a numeric locale code or a language token
    pub fn from_stored(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.parse::<u32>() {
            Ok(code) => Self::from_locale_code(code),
            Err(_) => Self::from_token(raw),
        }
    }

    /// Match a POSIX locale such as `fi_FI.UTF-8` against the known languages
    pub fn from_locale(locale: &str) -> Option<Self> {
        let name = locale.split(['.', '@']).next().unwrap_or_default();
        if let Some(language) = Self::from_token(name).filter(|l| *l != Language::System) {
            return Some(language);
        }
        let base = name.split('_').next().unwrap_or_default();
        match base {
            "en" => Some(Language::English),
            "fi" => Some(Language::Finnish),
            "zh" => Some(Language::ChineseSimplified),
            _ => None,
        }
    }
}
