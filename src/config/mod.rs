//! Configuration management for optimus-settings
//!
//! This module provides two stores over INI files:
//! - **optimus**: OptimusSettings, the daemon's system-wide configuration
//! - **app**: AppSettings, per-user preferences of the front-end

pub mod app;
pub mod ini_store;
pub mod optimus;

// Re-export commonly used types
pub use app::{AppSettings, AppSnapshot};
pub use optimus::{detect_config_path, ConfigPath, ConfigType, OptimusSettings, OptimusSnapshot};
