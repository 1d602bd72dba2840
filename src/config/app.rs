//! Per-user application preferences
//!
//! Stored in `~/.config/optimus-manager-qt/optimus-manager-qt.conf` under
//! the `[General]` section. Autostart is not kept in this file: it is the
//! presence of the autostart descriptor (see [`Autostart`]).

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::ini_store::IniStore;
use crate::autostart::Autostart;
use crate::constants::{app, defaults};
use crate::i18n;
use crate::types::{Gpu, Language};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppSnapshot {
    pub language: Language,
    pub autostart: bool,
    pub confirm_switching: bool,
    pub integrated_icon: String,
    pub nvidia_icon: String,
    pub hybrid_icon: String,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    store: IniStore,
    autostart: Autostart,
}

fn icon_key(gpu: Gpu) -> (&'static str, &'static str) {
    let key = match gpu {
        Gpu::Integrated => app::INTEGRATED_ICON,
        Gpu::Nvidia => app::NVIDIA_ICON,
        Gpu::Hybrid => app::HYBRID_ICON,
    };
    (app::SECTION, key)
}

/// Boolean as written by QSettings, also accepting the daemon's yes/no
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

impl AppSettings {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(app::APP_DIR);
        path.push(app::FILENAME);
        path
    }

    pub fn load() -> Self {
        Self::with_paths(Self::path(), Autostart::new())
    }

    pub fn with_paths(settings: impl Into<PathBuf>, autostart: Autostart) -> Self {
        Self {
            store: IniStore::load(settings),
            autostart,
        }
    }

    pub fn file(&self) -> &Path {
        self.store.path()
    }

    pub fn save(&self) -> Result<()> {
        self.store.save()
    }

    /// Load the translator for the stored language and install it process-wide
    pub fn setup_localization(&self) {
        i18n::load_language(self.language());
    }

    /// Stored language, either as a Qt locale code or as a token
    pub fn language(&self) -> Language {
        match self.store.value((app::SECTION, app::LANGUAGE)) {
            Some(raw) => Language::from_stored(&raw).unwrap_or_else(|| {
                debug!(value = %raw, "Unrecognized Language value, using system language");
                Language::default()
            }),
            None => Language::default(),
        }
    }

    /// Persist `language` and reload translations; unchanged languages are ignored
    ///
    /// Written as the Qt locale code so the Qt front-end reads the same file.
    pub fn set_language(&mut self, language: Language) {
        if language == self.language() {
            return;
        }
        self.store
            .set_value((app::SECTION, app::LANGUAGE), language.locale_code().to_string());
        i18n::load_language(language);
    }

    pub fn autostart_entry(&self) -> &Path {
        self.autostart.entry()
    }

    pub fn is_autostart_enabled(&self) -> bool {
        self.autostart.is_enabled()
    }

    pub fn set_autostart_enabled(&self, enabled: bool) {
        self.autostart.set_enabled(enabled);
    }

    pub fn is_confirm_switching(&self) -> bool {
        let key = (app::SECTION, app::CONFIRM_SWITCHING);
        match self.store.value(key) {
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                debug!(value = %raw, "Unrecognized ConfirmSwitching value, using default");
                defaults::CONFIRM_SWITCHING
            }),
            None => defaults::CONFIRM_SWITCHING,
        }
    }

    pub fn set_confirm_switching(&mut self, confirm: bool) {
        self.store
            .set_value((app::SECTION, app::CONFIRM_SWITCHING), confirm.to_string());
    }

    pub fn gpu_icon_name(&self, gpu: Gpu) -> String {
        self.store
            .value(icon_key(gpu))
            .unwrap_or_else(|| gpu.default_icon_name().to_string())
    }

    pub fn set_gpu_icon_name(&mut self, gpu: Gpu, name: &str) -> Result<()> {
        self.store.set_text(icon_key(gpu), name)
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            language: self.language(),
            autostart: self.is_autostart_enabled(),
            confirm_switching: self.is_confirm_switching(),
            integrated_icon: self.gpu_icon_name(Gpu::Integrated),
            nvidia_icon: self.gpu_icon_name(Gpu::Nvidia),
            hybrid_icon: self.gpu_icon_name(Gpu::Hybrid),
        }
    }
}
