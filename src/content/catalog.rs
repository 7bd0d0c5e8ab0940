//! The in-memory catalog of categories, tools, tutorials and pages

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::model::{Category, Difficulty, Listed, Page, Tool, Tutorial};
use super::ContentError;
use crate::markdown::{MarkdownRenderer, RenderedContent};

lazy_static! {
    /// Lowercase letters, CJK and digits separated by single hyphens
    static ref SLUG: Regex = Regex::new(r"^[\p{Ll}\p{Lo}\p{Nd}]+(?:-[\p{Ll}\p{Lo}\p{Nd}]+)*$").unwrap();
}

/// First path segments owned by the built-in routes
const RESERVED_PAGE_SLUGS: &[&str] = &["api", "tools", "tutorials", "search", "css", "js", "images"];

/// Filter for tool listings; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolFilter {
    /// Category id or slug
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
    pub is_free: Option<bool>,
    pub query: Option<String>,
}

/// Filter for tutorial listings; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TutorialFilter {
    /// Category id or slug
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
    pub difficulty: Option<Difficulty>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults<'a> {
    pub tools: Vec<&'a Tool>,
    pub tutorials: Vec<&'a Tutorial>,
    pub total: usize,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Aggregate numbers about the site
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteStats {
    pub total_tools: usize,
    pub total_tutorials: usize,
    /// Tools and tutorials per category id, in category order
    pub category_counts: IndexMap<String, usize>,
    pub featured_count: usize,
    pub free_tools_count: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

/// Validated, pre-rendered content
///
/// Tools and tutorials are kept newest first; every listing and lookup reads
/// from these vectors, so results never depend on hash order.
#[derive(Debug)]
pub struct Catalog {
    categories: Vec<Category>,
    tools: Vec<Tool>,
    tutorials: Vec<Tutorial>,
    pages: Vec<Page>,
    tool_ids: HashMap<String, usize>,
    tool_slugs: HashMap<String, usize>,
    tutorial_slugs: HashMap<String, usize>,
    page_slugs: HashMap<String, usize>,
    rendered: HashMap<String, RenderedContent>,
    tool_details: HashMap<String, RenderedContent>,
    rendered_pages: HashMap<String, RenderedContent>,
}

impl Catalog {
    /// Validate content and render every tutorial, tool detail and page
    pub fn new(
        categories: Vec<Category>,
        mut tools: Vec<Tool>,
        mut tutorials: Vec<Tutorial>,
        pages: Vec<Page>,
        renderer: &MarkdownRenderer,
    ) -> Result<Self, ContentError> {
        validate_categories(&categories)?;

        for tool in &mut tools {
            if tool.slug.is_empty() {
                tool.slug = tool.id.clone();
            }
        }

        tools.sort_by(|a, b| newest_first(a.published_at, b.published_at));
        tutorials.sort_by(|a, b| newest_first(Some(a.published_at), Some(b.published_at)));

        let tool_ids = index_unique("tool", tools.iter().map(|t| t.id.as_str()), |kind, id| {
            ContentError::DuplicateId { kind, id }
        })?;
        let tool_slugs = index_slugs("tool", tools.iter().map(|t| t.slug.as_str()))?;
        index_unique("tutorial", tutorials.iter().map(|t| t.id.as_str()), |kind, id| {
            ContentError::DuplicateId { kind, id }
        })?;
        let tutorial_slugs = index_slugs("tutorial", tutorials.iter().map(|t| t.slug.as_str()))?;
        let page_slugs = index_slugs("page", pages.iter().map(|p| p.slug.as_str()))?;

        for tool in &tools {
            check_category(&categories, "tool", &tool.id, &tool.category)?;
            check_tags("tool", &tool.id, &tool.tags)?;
            if let Some(rating) = tool.rating {
                if !(0.0..=5.0).contains(&rating) {
                    return Err(ContentError::InvalidField {
                        kind: "tool",
                        id: tool.id.clone(),
                        message: format!("rating {} is outside 0-5", rating),
                    });
                }
            }
        }

        for tutorial in &tutorials {
            check_category(&categories, "tutorial", &tutorial.id, &tutorial.category)?;
            check_tags("tutorial", &tutorial.id, &tutorial.tags)?;
            if let Some(missing) = tutorial
                .related_tools
                .iter()
                .find(|id| !tool_ids.contains_key(id.as_str()))
            {
                return Err(ContentError::UnknownTool {
                    tutorial: tutorial.id.clone(),
                    tool: missing.clone(),
                });
            }
        }

        for page in &pages {
            if RESERVED_PAGE_SLUGS.contains(&page.slug.as_str()) {
                return Err(ContentError::InvalidField {
                    kind: "page",
                    id: page.slug.clone(),
                    message: "slug is taken by a built-in route".to_string(),
                });
            }
            if !(0.0..=1.0).contains(&page.priority) {
                return Err(ContentError::InvalidField {
                    kind: "page",
                    id: page.slug.clone(),
                    message: format!("priority {} is outside 0-1", page.priority),
                });
            }
        }

        let mut rendered = HashMap::with_capacity(tutorials.len());
        for tutorial in &tutorials {
            let output = renderer
                .render(&tutorial.content)
                .map_err(|source| ContentError::Render {
                    kind: "tutorial",
                    id: tutorial.id.clone(),
                    source,
                })?;
            rendered.insert(tutorial.slug.clone(), output);
        }

        let mut tool_details = HashMap::new();
        for tool in &tools {
            if let Some(detail) = &tool.detailed_content {
                let output = renderer.render(detail).map_err(|source| ContentError::Render {
                    kind: "tool",
                    id: tool.id.clone(),
                    source,
                })?;
                tool_details.insert(tool.id.clone(), output);
            }
        }

        let mut rendered_pages = HashMap::with_capacity(pages.len());
        for page in &pages {
            let output = renderer
                .render(&page.content)
                .map_err(|source| ContentError::Render {
                    kind: "page",
                    id: page.slug.clone(),
                    source,
                })?;
            rendered_pages.insert(page.slug.clone(), output);
        }

        tracing::info!(
            "Loaded {} categories, {} tools, {} tutorials, {} pages",
            categories.len(),
            tools.len(),
            tutorials.len(),
            pages.len()
        );

        Ok(Self {
            categories,
            tools,
            tutorials,
            pages,
            tool_ids,
            tool_slugs,
            tutorial_slugs,
            page_slugs,
            rendered,
            tool_details,
            rendered_pages,
        })
    }

    /// Categories in file order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All tools, newest first
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// All tutorials, newest first
    pub fn tutorials(&self) -> &[Tutorial] {
        &self.tutorials
    }

    /// Standalone pages in file order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, slug: &str) -> Option<&Page> {
        self.page_slugs.get(slug).map(|&i| &self.pages[i])
    }

    /// Pipeline output for a page
    pub fn rendered_page(&self, slug: &str) -> Option<&RenderedContent> {
        self.rendered_pages.get(slug)
    }

    pub fn tool_by_id(&self, id: &str) -> Option<&Tool> {
        self.tool_ids.get(id).map(|&i| &self.tools[i])
    }

    pub fn tool_by_slug(&self, slug: &str) -> Option<&Tool> {
        self.tool_slugs.get(slug).map(|&i| &self.tools[i])
    }

    /// Look a tool up by id, then by slug
    pub fn tool(&self, id_or_slug: &str) -> Option<&Tool> {
        self.tool_by_id(id_or_slug)
            .or_else(|| self.tool_by_slug(id_or_slug))
    }

    pub fn tutorial_by_slug(&self, slug: &str) -> Option<&Tutorial> {
        self.tutorial_slugs.get(slug).map(|&i| &self.tutorials[i])
    }

    pub fn category(&self, id_or_slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.matches(id_or_slug))
    }

    /// Pipeline output for a tutorial
    pub fn rendered(&self, slug: &str) -> Option<&RenderedContent> {
        self.rendered.get(slug)
    }

    /// Rendered `detailedContent` of a tool, if it has any
    pub fn tool_detail(&self, id: &str) -> Option<&RenderedContent> {
        self.tool_details.get(id)
    }

    pub fn list_tools(&self, filter: &ToolFilter) -> Vec<&Tool> {
        let query = normalize_query(filter.query.as_deref());
        self.tools
            .iter()
            .filter(|tool| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| self.same_category(&tool.category, c))
                    && filter.is_free.map_or(true, |free| tool.is_free == free)
                    && self.matches_common(*tool, filter.tag.as_deref(), filter.featured, &query)
            })
            .collect()
    }

    pub fn list_tutorials(&self, filter: &TutorialFilter) -> Vec<&Tutorial> {
        let query = normalize_query(filter.query.as_deref());
        self.tutorials
            .iter()
            .filter(|tutorial| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| self.same_category(&tutorial.category, c))
                    && filter
                        .difficulty
                        .map_or(true, |d| tutorial.difficulty == Some(d))
                    && self.matches_common(*tutorial, filter.tag.as_deref(), filter.featured, &query)
            })
            .collect()
    }

    /// Up to `n` other tools in the same category
    pub fn related_tools(&self, tool: &Tool, n: usize) -> Vec<&Tool> {
        self.tools
            .iter()
            .filter(|t| t.id != tool.id && self.same_category(&t.category, &tool.category))
            .take(n)
            .collect()
    }

    /// Up to `n` other tutorials in the same category
    pub fn related_tutorials(&self, tutorial: &Tutorial, n: usize) -> Vec<&Tutorial> {
        self.tutorials
            .iter()
            .filter(|t| {
                t.slug != tutorial.slug && self.same_category(&t.category, &tutorial.category)
            })
            .take(n)
            .collect()
    }

    /// Tools listed in a tutorial's `relatedTools`, in the order given
    pub fn tutorial_tools(&self, tutorial: &Tutorial) -> Vec<&Tool> {
        tutorial
            .related_tools
            .iter()
            .filter_map(|id| self.tool_by_id(id))
            .collect()
    }

    /// Case-insensitive search over titles, descriptions and tags
    pub fn search(&self, query: &str) -> SearchResults<'_> {
        let Some(needle) = normalize_query(Some(query)) else {
            return SearchResults {
                tools: Vec::new(),
                tutorials: Vec::new(),
                total: 0,
            };
        };

        let tools: Vec<_> = self
            .tools
            .iter()
            .filter(|t| t.matches_query(&needle))
            .collect();
        let tutorials: Vec<_> = self
            .tutorials
            .iter()
            .filter(|t| t.matches_query(&needle))
            .collect();
        let total = tools.len() + tutorials.len();

        SearchResults {
            tools,
            tutorials,
            total,
        }
    }

    pub fn stats(&self) -> SiteStats {
        let category_counts = self
            .categories
            .iter()
            .map(|c| {
                let tools = self.tools.iter().filter(|t| c.matches(&t.category)).count();
                let tutorials = self
                    .tutorials
                    .iter()
                    .filter(|t| c.matches(&t.category))
                    .count();
                (c.id.clone(), tools + tutorials)
            })
            .collect();

        let featured_count = self.tools.iter().filter(|t| t.featured).count()
            + self.tutorials.iter().filter(|t| t.featured).count();

        let last_updated = self
            .tools
            .iter()
            .filter_map(|t| t.published_at)
            .chain(
                self.tutorials
                    .iter()
                    .map(|t| t.updated_at.unwrap_or(t.published_at)),
            )
            .max();

        SiteStats {
            total_tools: self.tools.len(),
            total_tutorials: self.tutorials.len(),
            category_counts,
            featured_count,
            free_tools_count: self.tools.iter().filter(|t| t.is_free).count(),
            last_updated,
        }
    }

    /// Tag usage over tools and tutorials, most used first, then by name
    pub fn tags(&self) -> Vec<TagCount> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        let all_tags = self
            .tools
            .iter()
            .flat_map(|t| t.tags.iter())
            .chain(self.tutorials.iter().flat_map(|t| t.tags.iter()));
        for tag in all_tags {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }

        let mut tags: Vec<_> = counts
            .into_iter()
            .map(|(name, count)| TagCount {
                name: name.to_string(),
                count,
            })
            .collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        tags
    }

    /// Whether two category references name the same category
    fn same_category(&self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }
        match (self.category(a), self.category(b)) {
            (Some(x), Some(y)) => x.id == y.id,
            _ => false,
        }
    }

    fn matches_common<T: Listed>(
        &self,
        item: &T,
        tag: Option<&str>,
        featured: Option<bool>,
        query: &Option<String>,
    ) -> bool {
        tag.map_or(true, |tag| item.has_tag(tag))
            && featured.map_or(true, |f| item.featured() == f)
            && query.as_deref().map_or(true, |q| item.matches_query(q))
    }
}

/// Trimmed, lowercased query; blank queries become `None`
fn normalize_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

/// Dated items newest first, undated ones last
fn newest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn validate_categories(categories: &[Category]) -> Result<(), ContentError> {
    index_unique("category", categories.iter().map(|c| c.id.as_str()), |kind, id| {
        ContentError::DuplicateId { kind, id }
    })?;
    index_slugs("category", categories.iter().map(|c| c.slug.as_str()))?;
    Ok(())
}

fn index_unique<'a>(
    kind: &'static str,
    keys: impl Iterator<Item = &'a str>,
    duplicate: impl Fn(&'static str, String) -> ContentError,
) -> Result<HashMap<String, usize>, ContentError> {
    let mut index = HashMap::new();
    for (i, key) in keys.enumerate() {
        if index.insert(key.to_string(), i).is_some() {
            return Err(duplicate(kind, key.to_string()));
        }
    }
    Ok(index)
}

fn index_slugs<'a>(
    kind: &'static str,
    slugs: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, usize>, ContentError> {
    let slugs: Vec<&str> = slugs.collect();
    if let Some(bad) = slugs.iter().find(|s| !SLUG.is_match(s)) {
        return Err(ContentError::InvalidSlug {
            kind,
            slug: bad.to_string(),
        });
    }
    index_unique(kind, slugs.into_iter(), |kind, slug| {
        ContentError::DuplicateSlug { kind, slug }
    })
}

fn check_category(
    categories: &[Category],
    kind: &'static str,
    id: &str,
    category: &str,
) -> Result<(), ContentError> {
    if categories.iter().any(|c| c.matches(category)) {
        return Ok(());
    }
    Err(ContentError::UnknownCategory {
        kind,
        id: id.to_string(),
        category: category.to_string(),
    })
}

fn check_tags(kind: &'static str, id: &str, tags: &[String]) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for tag in tags {
        if !seen.insert(tag.as_str()) {
            return Err(ContentError::InvalidField {
                kind,
                id: id.to_string(),
                message: format!("duplicate tag {:?}", tag),
            });
        }
    }
    Ok(())
}
