//! Tool, Tutorial, Category and Page models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::helpers::parse_date_string;

/// A third-party tool listed in the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: String,
    pub title: String,
    pub description: String,

    /// Category id or slug
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// External URL of the tool itself
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,

    #[serde(default)]
    pub is_free: bool,

    #[serde(default)]
    pub featured: bool,

    /// Route slug, defaults to the id
    #[serde(default)]
    pub slug: String,

    #[serde(
        default,
        deserialize_with = "optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<DateTime<Utc>>,

    /// Long-form Markdown description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_content: Option<String>,
}

/// A tutorial article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
    pub id: String,
    pub title: String,
    pub description: String,

    /// Raw MDX source
    pub content: String,

    pub category: String,
    pub tags: Vec<String>,
    pub author: String,
    pub published_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Estimated read time in minutes
    pub read_time: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,

    #[serde(default)]
    pub featured: bool,

    pub slug: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_tools: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,
}

/// A listing category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Icon reference (an emoji or an image path)
    #[serde(default)]
    pub icon: String,
    pub slug: String,
    #[serde(default, rename = "type")]
    pub kind: CategoryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Category {
    /// Whether `key` is this category's id or slug
    pub fn matches(&self, key: &str) -> bool {
        self.id == key || self.slug == key
    }
}

/// Which listings a category applies to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Tool,
    Tutorial,
    #[default]
    Both,
}

/// Tutorial difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        })
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty {:?}", other)),
        }
    }
}

/// A standalone informational page: about, contact, privacy and the like
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Route slug, served at `/{slug}`
    pub slug: String,
    pub title: String,
    pub description: String,

    /// Raw Markdown source
    pub content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Sitemap priority, 0.0 to 1.0
    pub priority: f32,
    pub changefreq: ChangeFreq,
}

/// Sitemap `<changefreq>` value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    #[default]
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by everything that appears in a listing
pub trait Listed {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn tags(&self) -> &[String];
    fn featured(&self) -> bool;

    fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t == tag)
    }

    /// Case-insensitive substring match on title, description and tags;
    /// `needle` must already be lowercase
    fn matches_query(&self, needle: &str) -> bool {
        self.title().to_lowercase().contains(needle)
            || self.description().to_lowercase().contains(needle)
            || self
                .tags()
                .iter()
                .any(|t| t.to_lowercase().contains(needle))
    }
}

impl Listed for Tool {
    fn title(&self) -> &str {
        &self.title
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn featured(&self) -> bool {
        self.featured
    }
}

impl Listed for Tutorial {
    fn title(&self) -> &str {
        &self.title
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn tags(&self) -> &[String] {
        &self.tags
    }
    fn featured(&self) -> bool {
        self.featured
    }
}

fn optional_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| {
        parse_date_string(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date {:?}", s)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool() {
        let yaml = r#"
id: vscode
title: Visual Studio Code
description: A lightweight code editor
category: development
tags: [editor, IDE]
url: https://code.visualstudio.com
rating: 4.8
isFree: true
publishedAt: 2024-03-01
"#;
        let tool: Tool = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(tool.id, "vscode");
        assert!(tool.is_free);
        assert!(!tool.featured);
        assert_eq!(tool.rating, Some(4.8));
        assert_eq!(tool.image_url, None);
        assert_eq!(
            tool.published_at.unwrap().format("%Y-%m-%d").to_string(),
            "2024-03-01"
        );
    }

    #[test]
    fn test_tool_bad_date() {
        let yaml = "id: a\ntitle: A\ndescription: d\ncategory: ai\nurl: x\npublishedAt: someday\n";
        assert!(serde_yaml::from_str::<Tool>(yaml).is_err());
    }

    #[test]
    fn test_parse_category() {
        let yaml = "id: ai\nname: AI\nicon: \"🤖\"\nslug: ai\ntype: tool\n";
        let category: Category = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(category.kind, CategoryKind::Tool);
        assert!(category.matches("ai"));
        assert!(!category.matches("design"));
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("Advanced".parse::<Difficulty>(), Ok(Difficulty::Advanced));
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Beginner.to_string(), "beginner");
    }

    #[test]
    fn test_query_matching() {
        let yaml = "id: figma\ntitle: Figma\ndescription: Collaborative design\ncategory: design\ntags: [UI]\nurl: x\n";
        let tool: Tool = serde_yaml::from_str(yaml).unwrap();
        assert!(tool.matches_query("figma"));
        assert!(tool.matches_query("collab"));
        assert!(tool.matches_query("ui"));
        assert!(!tool.matches_query("rust"));
        assert!(tool.has_tag("UI"));
        assert!(!tool.has_tag("ui"));
    }

    #[test]
    fn test_changefreq_names() {
        let freq: ChangeFreq = serde_yaml::from_str("monthly").unwrap();
        assert_eq!(freq, ChangeFreq::Monthly);
        assert_eq!(ChangeFreq::default().as_str(), "yearly");
        assert!(serde_yaml::from_str::<ChangeFreq>("sometimes").is_err());
    }
}
