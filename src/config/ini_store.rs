//! INI-backed key-value store shared by both settings files
//!
//! Values are addressed by `(section, key)`. Keys are case-sensitive and
//! their order is preserved when the file is written back.

use anyhow::{bail, Context, Result};
use configparser::ini::{Ini, IniDefault};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::constants::keys::Key;
use crate::constants::tokens;
use crate::types::TokenMap;

/// Case-sensitive keys; `#` and `;` only start comments at the beginning of a line
fn new_ini() -> Ini {
    let mut defaults = IniDefault::default();
    defaults.case_sensitive = true;
    defaults.enable_inline_comments = false;
    Ini::new_from_defaults(defaults)
}

/// Reject text that would break out of a single `key=value` line
fn validate_value(value: &str) -> Result<()> {
    if let Some(c) = value.chars().find(|c| c.is_control()) {
        bail!("Value contains control character {:?}", c);
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct IniStore {
    ini: Ini,
    path: PathBuf,
}

impl IniStore {
    /// Load the file at `path`; a missing or unparsable file yields an empty store
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut ini = new_ini();

        match fs::read_to_string(&path) {
            Ok(contents) => {
                if let Err(e) = ini.read(contents) {
                    warn!(path = %path.display(), error = %e, "Failed to parse settings file, using defaults");
                    ini = new_ini();
                } else {
                    info!(path = %path.display(), "Loaded settings");
                }
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Settings file not readable, using defaults");
            }
        }

        Self { ini, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw stored value; a key written without a value reads as empty
    pub fn value(&self, (section, key): Key) -> Option<String> {
        self.ini
            .get_map_ref()
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(|value| value.clone().unwrap_or_default())
    }

    pub fn set_value(&mut self, (section, key): Key, value: impl Into<String>) {
        self.ini.set(section, key, Some(value.into()));
    }

    /// Free-form value from outside the store, rejected if it spans lines
    pub fn set_text(&mut self, key: Key, value: &str) -> Result<()> {
        validate_value(value)?;
        self.set_value(key, value);
        Ok(())
    }

    /// Drop a key, keeping the order of the keys after it
    pub fn remove(&mut self, (section, key): Key) {
        if let Some(entries) = self.ini.get_mut_map().get_mut(section) {
            entries.shift_remove(key);
        }
    }

    /// Look the stored token up in `T`'s table, falling back to `default`
    pub fn token_or<T: TokenMap + std::fmt::Debug>(&self, key: Key, default: T) -> T {
        match self.value(key) {
            Some(token) => T::from_token(token.trim()).unwrap_or_else(|| {
                debug!(section = key.0, key = key.1, token = %token, fallback = ?default, "Unrecognized value, using default");
                default
            }),
            None => default,
        }
    }

    pub fn set_token<T: TokenMap>(&mut self, key: Key, value: T) {
        self.set_value(key, value.token());
    }

    /// Read a value as an integer, falling back to `default` if absent or malformed
    pub fn parse_or<T>(&self, key: Key, default: T) -> T
    where
        T: std::str::FromStr + std::fmt::Debug,
    {
        match self.value(key) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                debug!(section = key.0, key = key.1, value = %raw, fallback = ?default, "Unparsable value, using default");
                default
            }),
            None => default,
        }
    }

    /// Comma-separated list; `None` when the key is absent
    pub fn list(&self, key: Key) -> Option<Vec<String>> {
        self.value(key).map(|raw| {
            raw.split(tokens::LIST_SEPARATOR)
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_owned)
                .collect()
        })
    }

    pub fn set_list<S: AsRef<str>>(&mut self, key: Key, entries: &[S]) {
        let joined = entries
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ");
        self.set_value(key, joined);
    }

    /// Serialized INI text
    pub fn contents(&self) -> String {
        self.ini.writes()
    }

    /// Write the store back to its file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {:?}", parent))?;
        }

        fs::write(&self.path, self.contents())
            .with_context(|| format!("Failed to write settings to {:?}", self.path))?;

        info!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SwitchingMethod, TearFree};

    const SWITCHING: Key = ("optimus", "switching");
    const TEARFREE: Key = ("integrated", "tearfree");

    fn store_from(contents: &str) -> (tempfile::TempDir, IniStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.conf");
        fs::write(&path, contents).unwrap();
        let store = IniStore::load(&path);
        (dir, store)
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = IniStore::load(dir.path().join("absent.conf"));
        assert_eq!(store.value(SWITCHING), None);
        assert_eq!(store.token_or(SWITCHING, SwitchingMethod::None), SwitchingMethod::None);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let (_dir, store) = store_from("[nvidia]\nDPI=120\n");
        assert_eq!(store.value(("nvidia", "DPI")).as_deref(), Some("120"));
        assert_eq!(store.value(("nvidia", "dpi")), None);
    }

    #[test]
    fn test_token_or_falls_back_on_unknown() {
        let (_dir, store) = store_from("[optimus]\nswitching=bumblebee\n");
        assert_eq!(store.token_or(SWITCHING, SwitchingMethod::None), SwitchingMethod::None);
    }

    #[test]
    fn test_empty_value_maps_to_empty_token() {
        let (_dir, store) = store_from("[integrated]\ntearfree=\n");
        assert_eq!(store.value(TEARFREE).as_deref(), Some(""));
        assert_eq!(store.token_or(TEARFREE, TearFree::Enable), TearFree::Default);
    }

    #[test]
    fn test_parse_or() {
        let (_dir, store) = store_from("[nvidia]\nDPI=abc\n");
        assert_eq!(store.parse_or(("nvidia", "DPI"), 96u32), 96);
        assert_eq!(store.parse_or(("nvidia", "missing"), 7u32), 7);
    }

    #[test]
    fn test_list_distinguishes_absent_and_empty() {
        let (_dir, mut store) = store_from("[nvidia]\noptions=overclocking, triple_buffer\n");
        let key = ("nvidia", "options");
        assert_eq!(store.list(key), Some(vec!["overclocking".to_string(), "triple_buffer".to_string()]));

        store.set_list::<&str>(key, &[]);
        assert_eq!(store.list(key), Some(Vec::new()));

        store.remove(key);
        assert_eq!(store.list(key), None);
    }

    #[test]
    fn test_comment_characters_survive_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.conf");
        let key = ("General", "NvidiaIcon");

        let mut store = IniStore::load(&path);
        store.set_value(key, "/home/u/icons/gpu#2;dark.png");
        store.save().unwrap();

        let reloaded = IniStore::load(&path);
        assert_eq!(reloaded.value(key).as_deref(), Some("/home/u/icons/gpu#2;dark.png"));
    }

    #[test]
    fn test_full_line_comments_are_skipped() {
        let (_dir, store) = store_from("# header\n[optimus]\n; note\nswitching=bbswitch\n");
        assert_eq!(store.token_or(SWITCHING, SwitchingMethod::None), SwitchingMethod::Bbswitch);
    }

    #[test]
    fn test_remove_keeps_key_order() {
        let (dir, mut store) = store_from("[nvidia]\nmodeset=yes\nDPI=120\nPAT=yes\noptions=overclocking\n");
        store.remove(("nvidia", "DPI"));
        store.remove(("nvidia", "absent"));
        store.remove(("missing", "DPI"));
        store.save().unwrap();

        let written = fs::read_to_string(dir.path().join("test.conf")).unwrap();
        let keys: Vec<&str> = written
            .lines()
            .filter_map(|line| line.split_once('=').map(|(key, _)| key.trim()))
            .collect();
        assert_eq!(keys, ["modeset", "PAT", "options"]);
    }

    #[test]
    fn test_set_text_rejects_line_breaks() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = IniStore::load(dir.path().join("test.conf"));
        let key = ("General", "HybridIcon");

        assert!(store.set_text(key, "icon\n[optimus]\nswitching=none").is_err());
        assert!(store.set_text(key, "icon\rx").is_err());
        assert_eq!(store.value(key), None);

        store.set_text(key, "prime-hybrid-dark").unwrap();
        assert_eq!(store.value(key).as_deref(), Some("prime-hybrid-dark"));
    }

    #[test]
    fn test_save_creates_parent_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/test.conf");

        let mut store = IniStore::load(&path);
        store.set_token(SWITCHING, SwitchingMethod::AcpiCall);
        store.save().unwrap();

        let reloaded = IniStore::load(&path);
        assert_eq!(reloaded.token_or(SWITCHING, SwitchingMethod::None), SwitchingMethod::AcpiCall);
        assert!(fs::read_to_string(&path).unwrap().contains("acpi_call"));
    }
}
