//! TOML-based configuration for the bridge.
//!
//! Configuration is optional: every field has a default matching the
//! stock device firmware, so the binary runs with no file at all. A file
//! is only needed to point at a different device or to retune the typing
//! cadence.
//!
//! # What is TOML? (for beginners)
//!
//! TOML (Tom's Obvious Minimal Language) is a configuration file format
//! designed to be easy to read and write.  It looks similar to INI files
//! but with more data types.  Example:
//!
//! ```toml
//! [device]
//! hostname = "espectrum.local"
//! udp_port = 4210
//!
//! [serial]
//! baud = 115200
//!
//! [typing]
//! key_delay_ms = 100
//! press_duration_ms = 100
//! ```
//!
//! The `serde` library provides automatic serialisation/deserialisation
//! between Rust structs and TOML text.  Fields annotated with
//! `#[serde(default = "some_fn")]` use the return value of `some_fn()`
//! when the field is absent from the file, so a partial config that only
//! overrides one value still works.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub typing: TypingConfig,
}

/// Where to find the device when sending over UDP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// Hostname the device announces on the local network.
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// UDP port the device firmware listens on.
    #[serde(default = "default_udp_port")]
    pub udp_port: u16,
}

/// Serial link parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerialConfig {
    /// Baud rate; must match the device firmware.
    #[serde(default = "default_baud")]
    pub baud: u32,
    /// Read timeout for the echo reader, in milliseconds. Also bounds how
    /// long closing the transport can take.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

/// Pacing of synthesized keystrokes.
///
/// The device polls its input at frame rate, so messages that arrive
/// faster than it scans are lost. Slower is safer; the defaults suit the
/// stock firmware.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypingConfig {
    /// Gap between consecutive strokes, in milliseconds.
    #[serde(default = "default_key_delay_ms")]
    pub key_delay_ms: u64,
    /// How long a key is held between its press and release, in milliseconds.
    #[serde(default = "default_press_duration_ms")]
    pub press_duration_ms: u64,
    /// Wait after opening a serial port before the first stroke, in
    /// milliseconds. Boards that reset on port-open need this.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_hostname() -> String {
    "espectrum.local".to_string()
}
fn default_udp_port() -> u16 {
    4210
}
fn default_baud() -> u32 {
    115_200
}
fn default_read_timeout_ms() -> u64 {
    100
}
fn default_key_delay_ms() -> u64 {
    100
}
fn default_press_duration_ms() -> u64 {
    100
}
fn default_settle_ms() -> u64 {
    2000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            serial: SerialConfig::default(),
            typing: TypingConfig::default(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            udp_port: default_udp_port(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud: default_baud(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            key_delay_ms: default_key_delay_ms(),
            press_duration_ms: default_press_duration_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl SerialConfig {
    /// Read timeout as a [`Duration`].
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl TypingConfig {
    /// Gap between consecutive strokes as a [`Duration`].
    pub fn key_delay(&self) -> Duration {
        Duration::from_millis(self.key_delay_ms)
    }

    /// Press-to-release hold time as a [`Duration`].
    pub fn press_duration(&self) -> Duration {
        Duration::from_millis(self.press_duration_ms)
    }

    /// Post-open settle time as a [`Duration`].
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Loads `AppConfig` from `path`, or returns the defaults when no path
/// was given.
///
/// A path the operator named explicitly must exist: a missing or
/// unreadable file is reported as [`ConfigError::Io`] rather than being
/// silently replaced with defaults.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        None => Ok(AppConfig::default()),
        Some(path) => {
            let content =
                std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
