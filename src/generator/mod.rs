//! Generator module - exports the whole site as static files

pub mod sitemap;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::Catalog;
use crate::helpers::{encode_url, strip_html};
use crate::pages::{Pages, ToolsQuery, TutorialsQuery};
use crate::Site;

/// One record of `search.json`
#[derive(Debug, Clone, Serialize)]
pub struct SearchEntry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub url: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// Static site generator
pub struct Generator<'a> {
    site: &'a Site,
    pages: Pages,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    ///
    /// Static listings cannot read a query string, so they hold every item on
    /// one page.
    pub fn new(site: &'a Site) -> Result<Self> {
        let pages = Pages::new(&site.config)?.with_per_page(usize::MAX);
        Ok(Self { site, pages })
    }

    /// Generate the entire site, returning the number of files written
    pub fn generate(&self, catalog: &Catalog) -> Result<usize> {
        let public_dir = &self.site.public_dir;
        fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create {:?}", public_dir))?;

        let mut written = self.copy_static_assets()?;

        self.write("index.html", &self.pages.home(catalog)?)?;
        self.write(
            "tools/index.html",
            &self.pages.tools(catalog, &ToolsQuery::default())?,
        )?;
        self.write(
            "tutorials/index.html",
            &self.pages.tutorials(catalog, &TutorialsQuery::default())?,
        )?;
        self.write("search/index.html", &self.pages.search(catalog, "")?)?;
        self.write("404.html", &self.pages.not_found(catalog, "/404.html")?)?;
        written += 5;

        for tool in catalog.tools() {
            let html = self.pages.tool(catalog, tool)?;
            self.write(&format!("tools/{}/index.html", tool.slug), &html)?;
            written += 1;
        }

        for tutorial in catalog.tutorials() {
            let html = self.pages.tutorial(catalog, tutorial)?;
            self.write(&format!("tutorials/{}/index.html", tutorial.slug), &html)?;
            written += 1;
        }

        for page in catalog.pages() {
            let html = self.pages.page(catalog, page)?;
            self.write(&format!("{}/index.html", page.slug), &html)?;
            written += 1;
        }

        self.write(
            "sitemap.xml",
            &sitemap::render(&self.site.config, catalog, Utc::now()),
        )?;
        tracing::info!("Generated sitemap.xml");

        let index = serde_json::to_string_pretty(&search_index(catalog))?;
        self.write("search.json", &index)?;
        tracing::info!("Generated search.json");
        written += 2;

        Ok(written)
    }

    fn write(&self, relative: &str, content: &str) -> Result<()> {
        let output_path = self.site.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, content)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Copy the static directory into the public directory
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = &self.site.static_dir;
        if !static_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir).follow_links(true) {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.site.public_dir.join(relative);
            copy_file(path, &dest)?;
            copied += 1;
        }

        tracing::debug!("Copied {} static files", copied);
        Ok(copied)
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).with_context(|| format!("Failed to copy {:?}", from))?;
    Ok(())
}

/// Client-side search index over tools and tutorials
pub fn search_index(catalog: &Catalog) -> Vec<SearchEntry> {
    let tools = catalog.tools().iter().map(|t| SearchEntry {
        kind: "tool",
        title: t.title.clone(),
        url: format!("/tools/{}", encode_url(&t.slug)),
        description: strip_html(&t.description),
        category: t.category.clone(),
        tags: t.tags.clone(),
    });
    let tutorials = catalog.tutorials().iter().map(|t| SearchEntry {
        kind: "tutorial",
        title: t.title.clone(),
        url: format!("/tutorials/{}", encode_url(&t.slug)),
        description: strip_html(&t.description),
        category: t.category.clone(),
        tags: t.tags.clone(),
    });

    tools.chain(tutorials).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::fixtures::catalog;
    use tempfile::TempDir;

    #[test]
    fn test_generate_writes_every_page() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("static/css")).unwrap();
        fs::write(dir.path().join("static/css/style.css"), "body {}").unwrap();

        let site = Site::with_config(dir.path().to_path_buf(), SiteConfig::default());
        let catalog = catalog();
        let written = Generator::new(&site).unwrap().generate(&catalog).unwrap();

        // 1 asset + 5 fixed pages + 4 tools + 3 tutorials + 2 pages + sitemap + search index
        assert_eq!(written, 17);

        let public = dir.path().join("public");
        for path in [
            "index.html",
            "css/style.css",
            "tools/index.html",
            "tools/figma/index.html",
            "tutorials/docker-intro/index.html",
            "about/index.html",
            "privacy/index.html",
            "404.html",
            "sitemap.xml",
            "search.json",
        ] {
            assert!(public.join(path).exists(), "missing {}", path);
        }

        // Static listings are not paginated
        let tools = fs::read_to_string(public.join("tools/index.html")).unwrap();
        assert!(tools.contains("共 4 个工具"));
        assert!(!tools.contains(r#"class="pager""#));
    }

    #[test]
    fn test_search_index() {
        let index = search_index(&catalog());
        assert_eq!(index.len(), 7);
        assert_eq!(index[0].kind, "tool");
        assert!(index
            .iter()
            .any(|e| e.kind == "tutorial" && e.url == "/tutorials/git-basics"));

        let json = serde_json::to_value(&index[0]).unwrap();
        assert_eq!(json["type"], "tool");
    }
}
