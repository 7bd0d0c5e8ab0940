//! Content loader - reads categories, tools, tutorials and pages from the content directory

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{Catalog, Category, ContentError, FrontMatter, Page, Tool, Tutorial};
use crate::helpers::{count_words, parse_date_string};
use crate::markdown::MarkdownRenderer;

/// Words read per minute for the read-time estimate
const WORDS_PER_MINUTE: usize = 200;

/// Sitemap priority of a page that does not set one
const DEFAULT_PAGE_PRIORITY: f32 = 0.5;

/// Loads content from a content directory
///
/// Layout: `categories.yml`, `tools.yml`, `tutorials/*.md|mdx` and
/// `pages/*.md|mdx`.
pub struct ContentLoader {
    content_dir: PathBuf,
    default_author: String,
}

impl ContentLoader {
    pub fn new<P: AsRef<Path>>(content_dir: P, default_author: impl Into<String>) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
            default_author: default_author.into(),
        }
    }

    /// Load, validate and render everything into a catalog
    pub fn load(&self, renderer: &MarkdownRenderer) -> Result<Catalog, ContentError> {
        let categories = self.load_categories()?;
        let tools = self.load_tools()?;
        let tutorials = self.load_tutorials()?;
        let pages = self.load_pages()?;
        Catalog::new(categories, tools, tutorials, pages, renderer)
    }

    pub fn load_categories(&self) -> Result<Vec<Category>, ContentError> {
        self.load_yaml_list("categories.yml")
    }

    pub fn load_tools(&self) -> Result<Vec<Tool>, ContentError> {
        self.load_yaml_list("tools.yml")
    }

    /// Load every tutorial file, in path order
    pub fn load_tutorials(&self) -> Result<Vec<Tutorial>, ContentError> {
        let tutorials = self
            .markdown_files("tutorials")?
            .iter()
            .map(|path| self.load_tutorial(path))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} tutorials", tutorials.len());
        Ok(tutorials)
    }

    /// Load every standalone page, in path order
    pub fn load_pages(&self) -> Result<Vec<Page>, ContentError> {
        let pages = self
            .markdown_files("pages")?
            .iter()
            .map(|path| self.load_page(path))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} pages", pages.len());
        Ok(pages)
    }

    /// Load a single tutorial file
    pub fn load_tutorial(&self, path: &Path) -> Result<Tutorial, ContentError> {
        let content = read(path)?;
        let (fm, body) = FrontMatter::parse(path, &content)?;

        let missing = |field: &str| ContentError::FrontMatter {
            path: path.to_path_buf(),
            message: format!("missing `{}`", field),
        };
        let invalid_date = |field: &str, value: &str| ContentError::FrontMatter {
            path: path.to_path_buf(),
            message: format!("invalid `{}` date {:?}", field, value),
        };

        let slug = match fm.slug {
            Some(slug) => slug,
            None => file_stem(path).ok_or_else(|| missing("slug"))?,
        };
        let id = fm.id.unwrap_or_else(|| slug.clone());
        let title = fm.title.ok_or_else(|| missing("title"))?;
        let category = fm.category.ok_or_else(|| missing("category"))?;

        let raw_date = fm.published_at.ok_or_else(|| missing("publishedAt"))?;
        let published_at =
            parse_date_string(&raw_date).ok_or_else(|| invalid_date("publishedAt", &raw_date))?;
        let updated_at = match fm.updated_at {
            Some(raw) => Some(parse_date_string(&raw).ok_or_else(|| invalid_date("updatedAt", &raw))?),
            None => None,
        };

        let read_time = fm.read_time.unwrap_or_else(|| estimate_read_time(body));

        Ok(Tutorial {
            id,
            title,
            description: fm.description.unwrap_or_default(),
            content: body.to_string(),
            category,
            tags: fm.tags,
            author: fm.author.unwrap_or_else(|| self.default_author.clone()),
            published_at,
            updated_at,
            read_time,
            difficulty: fm.difficulty,
            featured: fm.featured,
            slug,
            related_tools: fm.related_tools,
            prerequisites: fm.prerequisites,
        })
    }

    /// Load a single page file
    ///
    /// Unlike tutorials, pages need no category or publish date.
    pub fn load_page(&self, path: &Path) -> Result<Page, ContentError> {
        let content = read(path)?;
        let (fm, body) = FrontMatter::parse(path, &content)?;

        let slug = match fm.slug {
            Some(slug) => slug,
            None => file_stem(path).ok_or_else(|| ContentError::FrontMatter {
                path: path.to_path_buf(),
                message: "missing `slug`".to_string(),
            })?,
        };
        let title = fm.title.ok_or_else(|| ContentError::FrontMatter {
            path: path.to_path_buf(),
            message: "missing `title`".to_string(),
        })?;
        let updated_at = match fm.updated_at.or(fm.published_at) {
            Some(raw) => Some(parse_date_string(&raw).ok_or_else(|| ContentError::FrontMatter {
                path: path.to_path_buf(),
                message: format!("invalid `updatedAt` date {:?}", raw),
            })?),
            None => None,
        };

        Ok(Page {
            slug,
            title,
            description: fm.description.unwrap_or_default(),
            content: body.to_string(),
            updated_at,
            priority: fm.priority.unwrap_or(DEFAULT_PAGE_PRIORITY),
            changefreq: fm.changefreq.unwrap_or_default(),
        })
    }

    /// Markdown files under `content_dir/{dir}`, sorted by path; a missing
    /// directory has none
    fn markdown_files(&self, dir: &str) -> Result<Vec<PathBuf>, ContentError> {
        let root = self.content_dir.join(dir);
        if !root.exists() {
            tracing::debug!("No {} directory at {:?}", dir, root);
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| ContentError::Io {
                path: e.path().unwrap_or(&root).to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }

    /// Read a YAML list; a missing file is an empty list
    fn load_yaml_list<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, ContentError> {
        let path = self.content_dir.join(name);
        if !path.exists() {
            tracing::debug!("No {} in {:?}", name, self.content_dir);
            return Ok(Vec::new());
        }

        let content = read(&path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_yaml::from_str(&content).map_err(|source| ContentError::Yaml { path, source })
    }
}

/// Minutes to read `text`, rounded up, at least one
pub fn estimate_read_time(text: &str) -> u32 {
    let minutes = count_words(text).div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

fn read(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
}

fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "mdx" || e == "markdown")
        .unwrap_or(false)
}
