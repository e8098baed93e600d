//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the site root next to the registry; every key is optional and overrides
//! the stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! registry_file = "projects.json"  # Project registry, relative to the site root
//! tables_dir = "tables"            # Spreadsheets referenced by [TABLE:...] markers
//! assets_dir = "assets"            # Copied verbatim into the built site
//!
//! [navigation]
//! featured_count = 5               # Projects shown after Home in the nav bar
//! other_label = "More projects"    # Label of the collapsible group for the rest
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#1b1b1b"
//! text_muted = "#666666"
//! border = "#e0e0e0"
//! link = "#1f5fa8"
//! link_hover = "#0b3d75"
//!
//! [colors.dark]
//! background = "#121212"
//! text = "#eeeeee"
//! text_muted = "#9a9a9a"
//! border = "#333333"
//! link = "#8ab4f8"
//! link_hover = "#c6dafc"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file inside the site root.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Registry JSON file, relative to the site root.
    pub registry_file: String,
    /// Directory holding spreadsheets for `[TABLE:...]` markers.
    pub tables_dir: String,
    /// Static assets (images, favicon) copied into the output.
    pub assets_dir: String,
    pub navigation: NavigationConfig,
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            registry_file: "projects.json".to_string(),
            tables_dir: "tables".to_string(),
            assets_dir: "assets".to_string(),
            navigation: NavigationConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "registry_file must not be empty".into(),
            ));
        }
        if self.navigation.featured_count == 0 {
            return Err(ConfigError::Validation(
                "navigation.featured_count must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn registry_path(&self, root: &Path) -> PathBuf {
        root.join(&self.registry_file)
    }

    pub fn tables_path(&self, root: &Path) -> PathBuf {
        root.join(&self.tables_dir)
    }

    pub fn assets_path(&self, root: &Path) -> PathBuf {
        root.join(&self.assets_dir)
    }
}

/// Navigation bar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Projects listed directly after Home; the rest are grouped.
    pub featured_count: usize,
    /// Label of the collapsible group holding non-featured projects.
    pub other_label: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            featured_count: 5,
            other_label: "More projects".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Nav bar, footer, captions.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1b1b1b".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#1f5fa8".to_string(),
            link_hover: "#0b3d75".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121212".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#9a9a9a".to_string(),
            border: "#333333".to_string(),
            link: "#8ab4f8".to_string(),
            link_hover: "#c6dafc".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a TOML table, the base layer for user overrides.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `config.toml` from `root` as a raw TOML value, if present.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Merge an optional overlay onto `base`, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the site config for `root`, falling back to stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(root)?)
}

/// A fully commented stock `config.toml`. Printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# simple-folio configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys cause an error.

# Project registry, relative to the site root.
registry_file = "projects.json"

# Spreadsheets referenced by [TABLE:name.xlsx] markers and table_filename.
tables_dir = "tables"

# Copied verbatim into the built site under /assets/.
assets_dir = "assets"

# ---------------------------------------------------------------------------
# Navigation
# ---------------------------------------------------------------------------
[navigation]
# Projects listed right after Home in the nav bar. The rest go into a
# collapsible group.
featured_count = 5

# Label of the collapsible group.
other_label = "More projects"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#1b1b1b"
text_muted = "#666666"    # Nav, footer, captions
border = "#e0e0e0"
link = "#1f5fa8"
link_hover = "#0b3d75"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121212"
text = "#eeeeee"
text_muted = "#9a9a9a"
border = "#333333"
link = "#8ab4f8"
link_hover = "#c6dafc"
"##
}

/// CSS custom properties for both color schemes.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    let scheme = |s: &ColorScheme, indent: &str| {
        format!(
            "{indent}--color-bg: {};\n\
             {indent}--color-text: {};\n\
             {indent}--color-text-muted: {};\n\
             {indent}--color-border: {};\n\
             {indent}--color-link: {};\n\
             {indent}--color-link-hover: {};",
            s.background, s.text, s.text_muted, s.border, s.link, s.link_hover,
        )
    };
    format!(
        ":root {{\n{}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}\n    }}\n}}",
        scheme(&colors.light, "    "),
        scheme(&colors.dark, "        "),
    )
}
