//! Per-user autostart entry
//!
//! Autostart is on exactly when the descriptor exists in the user's XDG
//! autostart directory. Enabling copies the system application descriptor
//! there; disabling deletes it.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::constants::{app, paths};
use crate::i18n::tr;

#[derive(Debug, Clone)]
pub struct Autostart {
    template: PathBuf,
    entry: PathBuf,
}

impl Default for Autostart {
    fn default() -> Self {
        Self::new()
    }
}

impl Autostart {
    pub fn new() -> Self {
        Self::with_paths(paths::SYSTEM_DESKTOP_FILE, Self::entry_path())
    }

    pub fn with_paths(template: impl Into<PathBuf>, entry: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            entry: entry.into(),
        }
    }

    fn entry_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(app::AUTOSTART_DIR);
        path.push(app::DESKTOP_FILENAME);
        path
    }

    pub fn entry(&self) -> &Path {
        &self.entry
    }

    pub fn is_enabled(&self) -> bool {
        self.entry.exists()
    }

    /// Create or remove the autostart entry
    ///
    /// A failed copy is logged, never returned.
    pub fn set_enabled(&self, enabled: bool) {
        if enabled {
            if self.entry.exists() {
                return;
            }
            if let Err(e) = self.copy_template() {
                let template = self.template.display().to_string();
                let message = tr(
                    "AppSettings",
                    "Unable to create autorun file from '%1'",
                    &[template.as_str()],
                );
                error!(error = %e, "{message}");
                return;
            }
            info!(entry = %self.entry.display(), "Autostart enabled");
        } else if self.entry.exists() {
            match fs::remove_file(&self.entry) {
                Ok(()) => info!(entry = %self.entry.display(), "Autostart disabled"),
                Err(e) => warn!(entry = %self.entry.display(), error = %e, "Failed to remove autostart entry"),
            }
        }
    }

    fn copy_template(&self) -> std::io::Result<()> {
        if let Some(parent) = self.entry.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&self.template, &self.entry).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP: &str = "[Desktop Entry]\nType=Application\nName=Optimus Manager\nExec=optimus-manager-qt\n";

    fn fixture() -> (tempfile::TempDir, Autostart) {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("applications/optimus-manager.desktop");
        fs::create_dir_all(template.parent().unwrap()).unwrap();
        fs::write(&template, DESKTOP).unwrap();
        let autostart = Autostart::with_paths(&template, dir.path().join("config/autostart/optimus-manager.desktop"));
        (dir, autostart)
    }

    #[test]
    fn test_enable_copies_template() {
        let (_dir, autostart) = fixture();
        assert!(!autostart.is_enabled());

        autostart.set_enabled(true);
        assert!(autostart.is_enabled());
        assert_eq!(fs::read_to_string(autostart.entry()).unwrap(), DESKTOP);
    }

    #[test]
    fn test_enable_keeps_existing_entry() {
        let (_dir, autostart) = fixture();
        fs::create_dir_all(autostart.entry().parent().unwrap()).unwrap();
        fs::write(autostart.entry(), "custom").unwrap();

        autostart.set_enabled(true);
        assert_eq!(fs::read_to_string(autostart.entry()).unwrap(), "custom");
    }

    #[test]
    fn test_disable_removes_entry() {
        let (_dir, autostart) = fixture();
        autostart.set_enabled(true);
        autostart.set_enabled(false);
        assert!(!autostart.is_enabled());

        // Disabling again is a no-op
        autostart.set_enabled(false);
        assert!(!autostart.is_enabled());
    }

    #[test]
    fn test_missing_template_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let autostart = Autostart::with_paths(
            dir.path().join("missing.desktop"),
            dir.path().join("autostart/optimus-manager.desktop"),
        );

        autostart.set_enabled(true);
        assert!(!autostart.is_enabled());
    }
}
