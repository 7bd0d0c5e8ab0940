//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Environment variable that selects the listening port in production
pub const PORT_ENV: &str = "PORT";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub keywords: Option<Vec<String>>,
    pub author: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub static_dir: String,

    // Listing
    pub per_page: usize,
    pub date_format: String,
    #[serde(default)]
    pub related: RelatedConfig,

    // Writing
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Server
    pub ip: String,
    pub port: u16,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "MatrixTools".to_string(),
            subtitle: String::new(),
            description: "Practical tools and in-depth tutorials".to_string(),
            keywords: None,
            author: "MatrixTools Team".to_string(),
            language: "zh-CN".to_string(),
            timezone: "Asia/Shanghai".to_string(),

            url: "https://matrixtools.me".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            per_page: 12,
            date_format: "YYYY-MM-DD".to_string(),
            related: RelatedConfig::default(),

            highlight: HighlightConfig::default(),

            ip: "0.0.0.0".to_string(),
            port: 3000,

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Apply the `PORT` override if one is set
    pub fn apply_port_override(&mut self, value: Option<&str>) -> Result<()> {
        if let Some(raw) = value {
            let raw = raw.trim();
            if !raw.is_empty() {
                self.port = raw
                    .parse()
                    .with_context(|| format!("Invalid {} value: {:?}", PORT_ENV, raw))?;
                tracing::debug!("Port overridden by {}: {}", PORT_ENV, self.port);
            }
        }
        Ok(())
    }

    /// Timezone used for displayed dates; `None` means UTC
    pub fn tz(&self) -> Option<Tz> {
        if self.timezone.is_empty() {
            return None;
        }
        match self.timezone.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                tracing::warn!("Unknown timezone {:?}, falling back to UTC", self.timezone);
                None
            }
        }
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
    pub line_number: bool,
    /// Guess the language of unlabelled code blocks from their first line
    pub auto_detect: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
            auto_detect: true,
        }
    }
}

/// How many related items detail pages show
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedConfig {
    pub tools: usize,
    pub tutorials: usize,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            tools: 3,
            tutorials: 4,
        }
    }
}
