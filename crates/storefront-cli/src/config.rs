//! CLI settings: defaults, then `storefront.toml`, then environment.
//! Command-line flags are applied on top by `main`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "storefront.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// JSON catalog to load instead of the builtin menu
    pub catalog: Option<PathBuf>,
    pub currency_symbol: String,
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: None,
            currency_symbol: "$".into(),
            color: true,
        }
    }
}

/// Load settings from `path`, or from `storefront.toml` if it exists.
/// An explicitly given path must exist.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => read_settings_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_settings_file(default_path)?
            } else {
                Settings::default()
            }
        }
    };
    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let settings: Settings = toml::from_str(&raw)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(settings)
}

/// Apply `STOREFRONT_*` overrides. Unparseable booleans are ignored.
pub fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("STOREFRONT_CATALOG") {
        settings.catalog = Some(PathBuf::from(v));
    }
    if let Some(v) = lookup("STOREFRONT_CURRENCY") {
        settings.currency_symbol = v;
    }
    if let Some(v) = lookup("STOREFRONT_COLOR") {
        match parse_bool(&v) {
            Some(color) => settings.color = color,
            None => tracing::warn!(value = %v, "ignoring invalid STOREFRONT_COLOR"),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
