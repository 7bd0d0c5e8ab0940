//! matrixtools: a tools directory and tutorial site
//!
//! Content (categories, tools and MDX tutorials) is loaded once into an
//! immutable catalog, tutorial bodies go through an ordered Markdown
//! pipeline, and the result is either served over HTTP or exported as
//! static files.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod markdown;
pub mod pages;
pub mod server;
pub mod templates;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// A site rooted at a directory with an optional `_config.yml`
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory (categories, tools, tutorials)
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Static assets copied or served as-is
    pub static_dir: PathBuf,
}

impl Site {
    /// Create a site from a directory with an optional `_config.yml`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Apply the `PORT` environment override to the listening port
    pub fn apply_port_env(&mut self) -> Result<()> {
        let port = std::env::var(config::PORT_ENV).ok();
        self.config.apply_port_override(port.as_deref())
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            static_dir,
        }
    }

    /// Load and validate all content, rendering every tutorial
    pub fn load_catalog(&self) -> Result<content::Catalog> {
        let renderer = markdown::MarkdownRenderer::from_config(&self.config.highlight)
            .context("Failed to set up the Markdown pipeline")?;
        let loader = content::ContentLoader::new(&self.content_dir, self.config.author.as_str());
        let catalog = loader
            .load(&renderer)
            .with_context(|| format!("Failed to load content from {:?}", self.content_dir))?;
        Ok(catalog)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new tutorial
    pub fn new_tutorial(
        &self,
        title: &str,
        category: Option<&str>,
        slug: Option<&str>,
    ) -> Result<PathBuf> {
        commands::new::run(self, title, category, slug)
    }
}
