//! Page assembly: catalog lookups turned into template contexts

use anyhow::{anyhow, Result};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use tera::Context;

use crate::config::SiteConfig;
use crate::content::{Catalog, Difficulty, Page, Tool, ToolFilter, Tutorial, TutorialFilter};
use crate::helpers::{encode_url, paginate, url_for};
use crate::templates::{
    CategoryData, ConfigData, PageData, PageLink, PaginationData, TemplateRenderer, ToolCard,
    TutorialCard, TutorialData,
};

const HOME_FEATURED_TOOLS: usize = 8;
const HOME_FEATURED_TUTORIALS: usize = 3;
const HOME_LATEST_TUTORIALS: usize = 6;

/// Query string of the tools listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolsQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
    pub free: Option<bool>,
    pub q: Option<String>,
    pub page: Option<usize>,
}

impl ToolsQuery {
    pub fn filter(&self) -> ToolFilter {
        ToolFilter {
            category: non_empty(&self.category),
            tag: non_empty(&self.tag),
            featured: self.featured,
            is_free: self.free,
            query: non_empty(&self.q),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_param(&mut params, "category", &self.category);
        push_param(&mut params, "tag", &self.tag);
        if let Some(featured) = self.featured {
            params.push(("featured", featured.to_string()));
        }
        if let Some(free) = self.free {
            params.push(("free", free.to_string()));
        }
        push_param(&mut params, "q", &self.q);
        params
    }
}

/// Query string of the tutorials listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TutorialsQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub featured: Option<bool>,
    /// Unknown values are ignored
    pub difficulty: Option<String>,
    pub q: Option<String>,
    pub page: Option<usize>,
}

impl TutorialsQuery {
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty.as_deref().and_then(|d| d.parse().ok())
    }

    pub fn filter(&self) -> TutorialFilter {
        TutorialFilter {
            category: non_empty(&self.category),
            tag: non_empty(&self.tag),
            featured: self.featured,
            difficulty: self.difficulty(),
            query: non_empty(&self.q),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_param(&mut params, "category", &self.category);
        push_param(&mut params, "tag", &self.tag);
        if let Some(featured) = self.featured {
            params.push(("featured", featured.to_string()));
        }
        if let Some(difficulty) = self.difficulty() {
            params.push(("difficulty", difficulty.to_string()));
        }
        push_param(&mut params, "q", &self.q);
        params
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Renders every HTML page of the site
pub struct Pages {
    config: SiteConfig,
    templates: TemplateRenderer,
    per_page: usize,
}

impl Pages {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            templates: TemplateRenderer::new(config)?,
            per_page: config.per_page,
        })
    }

    /// Override the listing page size
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Context shared by every page
    fn base_context(&self, catalog: &Catalog, current_path: &str, section: &str) -> Context {
        let year = match self.config.tz() {
            Some(tz) => Utc::now().with_timezone(&tz).year(),
            None => Utc::now().year(),
        };

        let mut context = Context::new();
        context.insert("config", &ConfigData::from_config(&self.config));
        context.insert("current_path", current_path);
        context.insert("section", section);
        context.insert("query", "");
        context.insert("current_year", &year);
        context.insert(
            "footer_pages",
            &catalog.pages().iter().map(PageLink::new).collect::<Vec<_>>(),
        );
        context
    }

    pub fn home(&self, catalog: &Catalog) -> Result<String> {
        let categories: Vec<_> = catalog
            .categories()
            .iter()
            .map(|c| CategoryData::new(c, catalog))
            .collect();
        let featured_tools = tool_cards(
            catalog,
            catalog
                .list_tools(&ToolFilter {
                    featured: Some(true),
                    ..ToolFilter::default()
                })
                .into_iter()
                .take(HOME_FEATURED_TOOLS),
        );
        let featured_tutorials = tutorial_cards(
            catalog,
            catalog
                .list_tutorials(&TutorialFilter {
                    featured: Some(true),
                    ..TutorialFilter::default()
                })
                .into_iter()
                .take(HOME_FEATURED_TUTORIALS),
        );
        let latest_tutorials = tutorial_cards(
            catalog,
            catalog.tutorials().iter().take(HOME_LATEST_TUTORIALS),
        );

        let mut context = self.base_context(catalog, "/", "home");
        context.insert("categories", &categories);
        context.insert("featured_tools", &featured_tools);
        context.insert("featured_tutorials", &featured_tutorials);
        context.insert("latest_tutorials", &latest_tutorials);
        context.insert("stats", &catalog.stats());

        self.templates.render("home.html", &context)
    }

    pub fn tools(&self, catalog: &Catalog, query: &ToolsQuery) -> Result<String> {
        let filter = query.filter();
        let page = paginate(
            catalog.list_tools(&filter),
            query.page.unwrap_or(1),
            self.per_page,
        );
        let params = query.params();
        let pagination = PaginationData::new(&page, |n| self.listing_link("/tools", &params, n));
        let category = filter
            .category
            .as_deref()
            .and_then(|c| catalog.category(c))
            .map(|c| CategoryData::new(c, catalog));
        let categories: Vec<_> = catalog
            .categories()
            .iter()
            .map(|c| CategoryData::new(c, catalog))
            .collect();

        let mut context = self.base_context(catalog, "/tools", "tools");
        context.insert("tools", &tool_cards(catalog, page.items.into_iter()));
        context.insert("pagination", &pagination);
        context.insert("category", &category);
        context.insert("categories", &categories);
        context.insert("query", &query.q.clone().unwrap_or_default());

        self.templates.render("tools.html", &context)
    }

    pub fn tool(&self, catalog: &Catalog, tool: &Tool) -> Result<String> {
        let detail = catalog.tool_detail(&tool.id).map(|r| r.html.as_str());
        let tutorials = tutorial_cards(
            catalog,
            catalog
                .tutorials()
                .iter()
                .filter(|t| t.related_tools.contains(&tool.id)),
        );
        let related = tool_cards(
            catalog,
            catalog
                .related_tools(tool, self.config.related.tools)
                .into_iter(),
        );

        let card = ToolCard::new(tool, catalog);
        let mut context = self.base_context(catalog, &card.path, "tools");
        context.insert("tool", &card);
        context.insert("detail", &detail);
        context.insert("tutorials", &tutorials);
        context.insert("related", &related);

        self.templates.render("tool.html", &context)
    }

    pub fn tutorials(&self, catalog: &Catalog, query: &TutorialsQuery) -> Result<String> {
        let filter = query.filter();
        let page = paginate(
            catalog.list_tutorials(&filter),
            query.page.unwrap_or(1),
            self.per_page,
        );
        let params = query.params();
        let pagination =
            PaginationData::new(&page, |n| self.listing_link("/tutorials", &params, n));
        let category = filter
            .category
            .as_deref()
            .and_then(|c| catalog.category(c))
            .map(|c| CategoryData::new(c, catalog));

        let mut context = self.base_context(catalog, "/tutorials", "tutorials");
        context.insert("tutorials", &tutorial_cards(catalog, page.items.into_iter()));
        context.insert("pagination", &pagination);
        context.insert("category", &category);
        context.insert(
            "difficulty",
            &filter.difficulty.map(|d| d.to_string()).unwrap_or_default(),
        );
        context.insert("query", &query.q.clone().unwrap_or_default());

        self.templates.render("tutorials.html", &context)
    }

    pub fn tutorial(&self, catalog: &Catalog, tutorial: &Tutorial) -> Result<String> {
        let rendered = catalog
            .rendered(&tutorial.slug)
            .ok_or_else(|| anyhow!("tutorial {:?} has no rendered content", tutorial.slug))?;

        let data = TutorialData {
            card: TutorialCard::new(tutorial, catalog),
            updated_at: tutorial.updated_at.map(|d| d.to_rfc3339()),
            content: rendered.html.clone(),
            toc: rendered.toc.clone(),
            prerequisites: tutorial.prerequisites.clone(),
        };
        let tools = tool_cards(catalog, catalog.tutorial_tools(tutorial).into_iter());
        let related = tutorial_cards(
            catalog,
            catalog
                .related_tutorials(tutorial, self.config.related.tutorials)
                .into_iter(),
        );

        let mut context = self.base_context(catalog, &data.card.path, "tutorials");
        context.insert("tutorial", &data);
        context.insert("tools", &tools);
        context.insert("related", &related);

        self.templates.render("tutorial.html", &context)
    }

    pub fn search(&self, catalog: &Catalog, query: &str) -> Result<String> {
        let results = catalog.search(query);

        let mut context = self.base_context(catalog, "/search", "search");
        context.insert("query", query.trim());
        context.insert("tools", &tool_cards(catalog, results.tools.into_iter()));
        context.insert(
            "tutorials",
            &tutorial_cards(catalog, results.tutorials.into_iter()),
        );
        context.insert("total", &results.total);

        self.templates.render("search.html", &context)
    }

    /// A standalone page such as `/about`
    pub fn page(&self, catalog: &Catalog, page: &Page) -> Result<String> {
        let rendered = catalog
            .rendered_page(&page.slug)
            .ok_or_else(|| anyhow!("page {:?} has no rendered content", page.slug))?;

        let data = PageData {
            link: PageLink::new(page),
            description: page.description.clone(),
            updated_at: page.updated_at.map(|d| d.to_rfc3339()),
            content: rendered.html.clone(),
            toc: rendered.toc.clone(),
        };

        let mut context = self.base_context(catalog, &data.link.path, "page");
        context.insert("page", &data);

        self.templates.render("page.html", &context)
    }

    pub fn not_found(&self, catalog: &Catalog, path: &str) -> Result<String> {
        let context = self.base_context(catalog, path, "");
        self.templates.render("404.html", &context)
    }

    /// Link to page `n` of a listing, keeping the active filters
    fn listing_link(&self, path: &str, params: &[(&str, String)], n: usize) -> String {
        let mut query: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, encode_url(value)))
            .collect();
        if n > 1 {
            query.push(format!("page={}", n));
        }

        let base = url_for(&self.config, path);
        if query.is_empty() {
            base
        } else {
            format!("{}?{}", base, query.join("&"))
        }
    }
}

fn tool_cards<'a>(catalog: &Catalog, tools: impl Iterator<Item = &'a Tool>) -> Vec<ToolCard> {
    tools.map(|t| ToolCard::new(t, catalog)).collect()
}

fn tutorial_cards<'a>(
    catalog: &Catalog,
    tutorials: impl Iterator<Item = &'a Tutorial>,
) -> Vec<TutorialCard> {
    tutorials.map(|t| TutorialCard::new(t, catalog)).collect()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn push_param(params: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<String>) {
    if let Some(value) = non_empty(value) {
        params.push((key, value));
    }
}
