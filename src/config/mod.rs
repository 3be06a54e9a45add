//! Application Configuration
//!
//! OCR credentials, badge appearance, and output naming, stored in TOML format.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `ocr.api_key`
pub const API_KEY_ENV: &str = "SCREEN_LABELER_API_KEY";
/// Environment variable overriding `ocr.secret_key`
pub const SECRET_KEY_ENV: &str = "SCREEN_LABELER_SECRET_KEY";

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// OCR service settings
    pub ocr: OcrSettings,
    /// Badge appearance
    pub badge: BadgeSettings,
    /// Where annotated images are written
    pub output: OutputSettings,
}

impl AppConfig {
    /// Replace credentials with values from the environment, when set
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            self.ocr.api_key = key;
        }
        if let Ok(secret) = std::env::var(SECRET_KEY_ENV) {
            self.ocr.secret_key = secret;
        }
    }
}

/// OCR service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// API key issued by the OCR provider
    pub api_key: String,
    /// Secret key issued by the OCR provider
    pub secret_key: String,
    /// Recognition endpoint
    pub endpoint: String,
    /// OAuth token endpoint
    pub token_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            endpoint: "https://aip.baidubce.com/rest/2.0/ocr/v1/accurate".to_string(),
            token_url: "https://aip.baidubce.com/oauth/2.0/token".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Badge appearance settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeSettings {
    /// Badge width in pixels
    pub width: u32,
    /// Badge height in pixels
    pub height: u32,
    /// Gradient color at the top row (`#RRGGBB`)
    pub fill_start: String,
    /// Gradient color at the bottom row (`#RRGGBB`)
    pub fill_end: String,
    /// Outline color (`#RRGGBB`)
    pub outline: String,
    /// Label text color (`#RRGGBB`)
    pub text_color: String,
    /// Outline corner radius
    pub corner_radius: u32,
    /// Outline stroke width
    pub stroke_width: u32,
    /// Label font size in pixels
    pub font_size: f32,
    /// Bold font candidates, tried in order
    pub font_paths: Vec<PathBuf>,
}

impl Default for BadgeSettings {
    fn default() -> Self {
        Self {
            width: 48,
            height: 24,
            fill_start: "#EFDD88".to_string(),
            fill_end: "#EBD872".to_string(),
            outline: "#EBD872".to_string(),
            text_color: "#000000".to_string(),
            corner_radius: 5,
            stroke_width: 2,
            font_size: 22.0,
            font_paths: default_font_paths(),
        }
    }
}

/// Platform default bold font first, then known alternates
fn default_font_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if cfg!(target_os = "windows") {
        paths.push(PathBuf::from(r"C:\Windows\Fonts\arialbd.ttf"));
    }
    paths.push(PathBuf::from("arialbd.ttf"));
    paths.push(PathBuf::from("/Library/Fonts/Arial Bold.ttf"));
    paths.push(PathBuf::from("/System/Library/Fonts/Supplemental/Arial Bold.ttf"));
    paths.push(PathBuf::from("/usr/share/fonts/truetype/msttcorefonts/Arial_Bold.ttf"));
    paths.push(PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"));
    paths.push(PathBuf::from("/usr/share/fonts/TTF/DejaVuSans-Bold.ttf"));
    paths.push(PathBuf::from("/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf"));
    paths.push(PathBuf::from("/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf"));

    paths
}

/// Output naming settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Prefix prepended to the input file name
    pub prefix: String,
    /// Output directory (current directory when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            prefix: "annotated_".to_string(),
            directory: None,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
