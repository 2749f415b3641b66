//! linkqr runtime configuration handling
//!
//! Values come from, in increasing precedence: built-in defaults, a toml/yaml
//! file, `LINKQR_*` environment variables, and finally CLI flags (applied by
//! the binary).

use crate::error::{Error, Result};
use crate::export::DEFAULT_FILE_NAME;
use crate::qr::{DEFAULT_ENDPOINT, Dimensions, HexColor, RenderParams, parse_endpoint};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// File names looked up in the working directory, then under `$XDG_CONFIG_HOME/linkqr`
const CWD_CANDIDATES: [&str; 3] = ["linkqr.toml", "linkqr.yaml", "linkqr.yml"];
const XDG_CANDIDATES: [&str; 2] = ["config.toml", "config.yaml"];

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkqrConfig {
    /// Rendering service and UI timing
    pub service: ServiceOptions,
    /// Where downloads are written
    pub export: ExportOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl LinkqrConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults,
    /// then apply `LINKQR_*` environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover_file()?,
        };

        let mut config = match path {
            Some(path) => {
                tracing::info!("Using configuration file: {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        let xdg = env::var_os("XDG_CONFIG_HOME").map(|dir| PathBuf::from(dir).join("linkqr"));

        let found = CWD_CANDIDATES
            .iter()
            .map(|name| cwd.join(name))
            .chain(
                xdg.iter()
                    .flat_map(|base| XDG_CANDIDATES.iter().map(move |name| base.join(name))),
            )
            .find(|path| path.is_file());
        Ok(found)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let format = ConfigFormat::for_path(path)?;
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        format
            .parse(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Apply overrides resolved through `lookup` (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.service.apply_overrides(&lookup);
        self.export.apply_overrides(&lookup);
        self.logging.apply_overrides(&lookup);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    fn for_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(Error::Config(format!(
                "Unsupported config format '{other}', expected toml/yaml"
            ))),
        }
    }

    fn parse<T: DeserializeOwned>(self, contents: &str) -> std::result::Result<T, String> {
        match self {
            Self::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
        }
    }
}

/// Parse `key` through `lookup`, warning and keeping the old value when it is malformed
fn override_parsed<T, F>(lookup: &F, key: &str, slot: &mut T)
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(err) => tracing::warn!("Ignoring {key}={raw:?}: {err}"),
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Rendering service endpoint, fixed request parameters and flag timings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceOptions {
    /// Base URL of the QR rendering endpoint
    pub endpoint: String,
    /// Requested image size (`WxH`)
    pub size: Dimensions,
    /// Foreground color (`rrggbb`)
    pub color: HexColor,
    /// Background color (`rrggbb`)
    pub bgcolor: HexColor,
    /// How long the busy flag stays up after a generation, in milliseconds
    pub busy_ms: u64,
    /// How long the copy acknowledgement stays up, in milliseconds
    pub copy_ack_ms: u64,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        let params = RenderParams::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            size: params.size,
            color: params.color,
            bgcolor: params.bgcolor,
            busy_ms: 500,
            copy_ack_ms: 2000,
        }
    }
}

impl ServiceOptions {
    fn apply_overrides<F: Fn(&str) -> Option<String>>(&mut self, lookup: &F) {
        if let Some(endpoint) = lookup("LINKQR_ENDPOINT").filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        override_parsed(lookup, "LINKQR_SIZE", &mut self.size);
        override_parsed(lookup, "LINKQR_COLOR", &mut self.color);
        override_parsed(lookup, "LINKQR_BGCOLOR", &mut self.bgcolor);
        override_parsed(lookup, "LINKQR_BUSY_MS", &mut self.busy_ms);
        override_parsed(lookup, "LINKQR_COPY_ACK_MS", &mut self.copy_ack_ms);
    }

    /// Parsed and checked endpoint URL
    pub fn endpoint_url(&self) -> Result<Url> {
        parse_endpoint(&self.endpoint)
    }

    /// Fixed parameters sent with every request
    pub fn render_params(&self) -> RenderParams {
        RenderParams {
            size: self.size,
            color: self.color,
            bgcolor: self.bgcolor,
        }
    }

    /// Busy flag window
    pub fn busy_window(&self) -> Duration {
        Duration::from_millis(self.busy_ms)
    }

    /// Copy acknowledgement window
    pub fn copy_ack_window(&self) -> Duration {
        Duration::from_millis(self.copy_ack_ms)
    }
}

/// Download destination
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Directory downloads are written to
    pub output_dir: PathBuf,
    /// Filename downloads are saved under
    pub file_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl ExportOptions {
    fn apply_overrides<F: Fn(&str) -> Option<String>>(&mut self, lookup: &F) {
        if let Some(dir) = lookup("LINKQR_OUTPUT_DIR").filter(|d| !d.trim().is_empty()) {
            self.output_dir = PathBuf::from(dir);
        }
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `LINKQR_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stderr logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    fn apply_overrides<F: Fn(&str) -> Option<String>>(&mut self, lookup: &F) {
        if let Some(level) = lookup("LINKQR_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(file) = lookup("LINKQR_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Some(color) = lookup("LINKQR_LOG_COLOR").as_deref().and_then(parse_switch) {
            self.color = color;
        }
        if let Some(rotation) = lookup("LINKQR_LOG_ROTATION") {
            match rotation.parse() {
                Ok(parsed) => self.rotation = Some(parsed),
                Err(err) => tracing::warn!("Ignoring LINKQR_LOG_ROTATION: {err}"),
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl FromStr for LogRotation {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            other => Err(format!(
                "Unsupported rotation '{other}', expected 'hourly' or 'daily'"
            )),
        }
    }
}
