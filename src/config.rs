use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};

use crate::date::StandardFormat;
use crate::error::{Result, VerlogError};

/// Represents the complete configuration for verlog.
///
/// Contains the date format lists used to read change dates and the layout
/// options used to render change entries.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub formats: FormatsConfig,

    #[serde(default)]
    pub render: RenderConfig,
}

/// Returns the default date templates, in order of decreasing precedence.
///
/// `%Y` is exactly four digits and `%y` exactly two; see [`crate::date::DateParser`].
fn default_date_formats() -> Vec<String> {
    [
        "%Y %b %d",
        "%Y-%b-%d",
        "%Y-%m-%d",
        "%Y %m %d",
        "%m-%d-%Y",
        "%m/%d/%Y",
        "%b %d, %Y",
        "%y %b %d",
        "%y-%b-%d",
        "%y-%m-%d",
        "%y %m %d",
        "%m-%d-%y",
        "%m/%d/%y",
        "%b %d, %y",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Returns the default time templates, in order of decreasing precedence.
fn default_time_formats() -> Vec<String> {
    [
        "%H:%M:%S",
        "%I:%M:%S%p",
        "%I:%M:%S %p",
        "%H:%M",
        "%I:%M%p",
        "%I:%M %p",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_standard_formats() -> Vec<StandardFormat> {
    StandardFormat::ALL.to_vec()
}

/// Ordered format lists consulted by [`crate::date::DateParser`].
///
/// Date and time entries are chrono `strftime` templates.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FormatsConfig {
    #[serde(default = "default_date_formats")]
    pub date: Vec<String>,

    #[serde(default = "default_time_formats")]
    pub time: Vec<String>,

    #[serde(default = "default_standard_formats")]
    pub standard: Vec<StandardFormat>,
}

impl Default for FormatsConfig {
    fn default() -> Self {
        FormatsConfig {
            date: default_date_formats(),
            time: default_time_formats(),
            standard: default_standard_formats(),
        }
    }
}

fn default_date_time_format() -> String {
    "%a, %d %b %Y %H:%M:%S %Z".to_string()
}

fn default_width() -> usize {
    80
}

/// U+2015 HORIZONTAL BAR: the documented report is drawn with it, and the
/// default output must reproduce that report byte for byte. Set `render.rule`
/// for another glyph (e.g. U+2501, the heavier box-drawing line).
fn default_rule() -> char {
    '\u{2015}'
}

fn default_title_indent() -> usize {
    1
}

fn default_description_indent() -> usize {
    2
}

/// Layout of a rendered change entry.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RenderConfig {
    /// Output template applied to every parsed change date (RFC 1123 style).
    #[serde(default = "default_date_time_format")]
    pub date_time_format: String,

    /// Total line width, in characters.
    #[serde(default = "default_width")]
    pub width: usize,

    /// Character repeated to draw the horizontal rules.
    #[serde(default = "default_rule")]
    pub rule: char,

    #[serde(default = "default_title_indent")]
    pub title_indent: usize,

    #[serde(default = "default_description_indent")]
    pub description_indent: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            date_time_format: default_date_time_format(),
            width: default_width(),
            rule: default_rule(),
            title_indent: default_title_indent(),
            description_indent: default_description_indent(),
        }
    }
}

impl Config {
    /// Checks settings that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        self.render.validate()
    }
}

impl RenderConfig {
    /// Rejects a `date_time_format` containing specifiers chrono cannot render.
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.date_time_format).any(|item| matches!(item, Item::Error)) {
            return Err(VerlogError::config(format!(
                "invalid date_time_format '{}'",
                self.date_time_format
            )));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `verlog.toml` in current directory
/// 3. `verlog/verlog.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./verlog.toml").exists() {
        fs::read_to_string("./verlog.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("verlog").join("verlog.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}
