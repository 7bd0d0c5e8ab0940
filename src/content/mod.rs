//! Content module - tools, tutorials, categories and pages

mod catalog;
mod error;
mod frontmatter;
mod loader;
mod model;

#[cfg(test)]
pub(crate) mod fixtures;

pub use catalog::{Catalog, SearchResults, SiteStats, TagCount, ToolFilter, TutorialFilter};
pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use loader::{estimate_read_time, ContentLoader};
pub use model::{Category, CategoryKind, ChangeFreq, Difficulty, Listed, Page, Tool, Tutorial};
