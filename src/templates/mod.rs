//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping stays on (with an
//! escaper that leaves `/` alone so URLs stay readable); rendered Markdown
//! is passed through the `safe` filter.

use anyhow::Result;
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

use crate::config::SiteConfig;
use crate::content::{Catalog, Category, Page, Tool, Tutorial};
use crate::helpers::{self, format_date, parse_date_string, Paginated};
use crate::markdown::TocEntry;

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a renderer with every template and filter registered
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();
        tera.set_escape_fn(helpers::html_escape);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("macros.html", include_str!("site/macros.html")),
            ("home.html", include_str!("site/home.html")),
            ("tools.html", include_str!("site/tools.html")),
            ("tool.html", include_str!("site/tool.html")),
            ("tutorials.html", include_str!("site/tutorials.html")),
            ("tutorial.html", include_str!("site/tutorial.html")),
            ("search.html", include_str!("site/search.html")),
            ("page.html", include_str!("site/page.html")),
            ("404.html", include_str!("site/404.html")),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        let date_format = config.date_format.clone();
        let tz = config.tz();
        tera.register_filter(
            "date_format",
            move |value: &Value, args: &HashMap<String, Value>| {
                date_format_filter(value, args, &date_format, tz)
            },
        );

        let url_config = config.clone();
        tera.register_function("url_for", move |args: &HashMap<String, Value>| {
            let path = match args.get("path") {
                Some(val) => tera::try_get_value!("url_for", "path", String, val),
                None => return Err(tera::Error::msg("url_for requires a `path` argument")),
            };
            Ok(Value::String(helpers::url_for(&url_config, &path)))
        });

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(Value::String(helpers::strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 120,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    Ok(Value::String(helpers::truncate(&s, length, Some(&omission))))
}

/// Tera filter: format an RFC 3339 timestamp in the site timezone
fn date_format_filter(
    value: &Value,
    args: &HashMap<String, Value>,
    default_format: &str,
    tz: Option<Tz>,
) -> tera::Result<Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => default_format.to_string(),
    };

    match parse_date_string(&s) {
        Some(date) => Ok(Value::String(format_date(&date, &format, tz))),
        None => Ok(Value::String(s)),
    }
}

// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub keywords: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

impl ConfigData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            keywords: config.keywords.clone().unwrap_or_default().join(","),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub slug: String,
    pub color: Option<String>,
    /// Number of tools in the category
    pub tool_count: usize,
}

impl CategoryData {
    pub fn new(category: &Category, catalog: &Catalog) -> Self {
        let tool_count = catalog
            .tools()
            .iter()
            .filter(|t| category.matches(&t.category))
            .count();
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            description: category.description.clone(),
            icon: category.icon.clone(),
            slug: category.slug.clone(),
            color: category.color.clone(),
            tool_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub path: String,
    pub url: String,
    pub image_url: Option<String>,
    pub category: String,
    pub category_name: String,
    pub tags: Vec<String>,
    pub rating: Option<f32>,
    pub is_free: bool,
    pub featured: bool,
}

impl ToolCard {
    pub fn new(tool: &Tool, catalog: &Catalog) -> Self {
        Self {
            id: tool.id.clone(),
            title: tool.title.clone(),
            description: tool.description.clone(),
            path: format!("/tools/{}", helpers::encode_url(&tool.slug)),
            url: tool.url.clone(),
            image_url: tool.image_url.clone(),
            category: tool.category.clone(),
            category_name: category_name(catalog, &tool.category),
            tags: tool.tags.clone(),
            rating: tool.rating,
            is_free: tool.is_free,
            featured: tool.featured,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TutorialCard {
    pub title: String,
    pub description: String,
    pub path: String,
    pub category: String,
    pub category_name: String,
    pub tags: Vec<String>,
    pub author: String,
    /// RFC 3339, formatted by the `date_format` filter
    pub published_at: String,
    pub read_time: u32,
    pub difficulty: Option<String>,
    pub featured: bool,
}

impl TutorialCard {
    pub fn new(tutorial: &Tutorial, catalog: &Catalog) -> Self {
        Self {
            title: tutorial.title.clone(),
            description: tutorial.description.clone(),
            path: format!("/tutorials/{}", helpers::encode_url(&tutorial.slug)),
            category: tutorial.category.clone(),
            category_name: category_name(catalog, &tutorial.category),
            tags: tutorial.tags.clone(),
            author: tutorial.author.clone(),
            published_at: tutorial.published_at.to_rfc3339(),
            read_time: tutorial.read_time,
            difficulty: tutorial.difficulty.map(|d| d.to_string()),
            featured: tutorial.featured,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TutorialData {
    #[serde(flatten)]
    pub card: TutorialCard,
    pub updated_at: Option<String>,
    pub content: String,
    pub toc: Vec<TocEntry>,
    pub prerequisites: Vec<String>,
}

/// Footer link to a standalone page
#[derive(Debug, Clone, Serialize)]
pub struct PageLink {
    pub title: String,
    pub path: String,
}

impl PageLink {
    pub fn new(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            path: format!("/{}", helpers::encode_url(&page.slug)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    #[serde(flatten)]
    pub link: PageLink,
    pub description: String,
    pub updated_at: Option<String>,
    pub content: String,
    pub toc: Vec<TocEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub current: usize,
    pub total: usize,
    pub total_items: usize,
    pub prev_link: String,
    pub next_link: String,
}

impl PaginationData {
    /// `link` builds the URL of a given page number
    pub fn new<T>(page: &Paginated<T>, link: impl Fn(usize) -> String) -> Self {
        Self {
            current: page.page,
            total: page.total_pages,
            total_items: page.total_items,
            prev_link: if page.has_prev() {
                link(page.page - 1)
            } else {
                String::new()
            },
            next_link: if page.has_next() {
                link(page.page + 1)
            } else {
                String::new()
            },
        }
    }
}

/// Display name of a category reference, or the reference itself
fn category_name(catalog: &Catalog, key: &str) -> String {
    catalog
        .category(key)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderer() -> TemplateRenderer {
        TemplateRenderer::new(&SiteConfig::default()).unwrap()
    }

    #[test]
    fn test_all_templates_parse() {
        let renderer = renderer();
        let names: Vec<_> = renderer.tera.get_template_names().collect();
        for name in ["layout.html", "home.html", "tool.html", "tutorial.html", "page.html", "404.html"] {
            assert!(names.contains(&name), "missing {}", name);
        }
    }

    #[test]
    fn test_truncate_chars_filter() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), json!(8));
        let value = truncate_chars_filter(&json!("A long description"), &args).unwrap();
        assert_eq!(value, json!("A lon..."));
    }

    #[test]
    fn test_strip_html_filter() {
        let value = strip_html_filter(&json!("<p>Hi <em>there</em></p>"), &HashMap::new()).unwrap();
        assert_eq!(value, json!("Hi there"));
    }

    #[test]
    fn test_date_format_filter_uses_timezone() {
        let tz: Option<Tz> = "Asia/Shanghai".parse().ok();
        let value = date_format_filter(
            &json!("2024-01-15T20:00:00+00:00"),
            &HashMap::new(),
            "YYYY-MM-DD",
            tz,
        )
        .unwrap();
        assert_eq!(value, json!("2024-01-16"));

        let untouched =
            date_format_filter(&json!("not a date"), &HashMap::new(), "YYYY", None).unwrap();
        assert_eq!(untouched, json!("not a date"));
    }

    #[test]
    fn test_pagination_links() {
        let page = helpers::paginate((1..=30).collect::<Vec<_>>(), 2, 12);
        let data = PaginationData::new(&page, |n| format!("/tools?page={}", n));
        assert_eq!(data.prev_link, "/tools?page=1");
        assert_eq!(data.next_link, "/tools?page=3");

        let last = helpers::paginate((1..=30).collect::<Vec<_>>(), 3, 12);
        assert_eq!(PaginationData::new(&last, |n| n.to_string()).next_link, "");
    }
}
