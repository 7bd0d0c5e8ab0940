//! Create a new tutorial

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::ContentLoader;
use crate::Site;

/// Write `content/tutorials/{slug}.mdx` with a front matter template
///
/// Without `category` the first category of `categories.yml` is used.
pub fn run(site: &Site, title: &str, category: Option<&str>, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from {:?}, pass --slug", title);
    }

    let category = match category {
        Some(c) => c.to_string(),
        None => {
            let loader = ContentLoader::new(&site.content_dir, site.config.author.as_str());
            loader
                .load_categories()?
                .into_iter()
                .next()
                .map(|c| c.id)
                .context("No categories defined, pass --category")?
        }
    };

    let target_dir = site.content_dir.join("tutorials");
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.mdx", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let today = chrono::Utc::now().format("%Y-%m-%d");
    // JSON strings are valid YAML scalars, which keeps titles with `:` intact
    let content = format!(
        "---\ntitle: {title}\ndescription: \"\"\ncategory: {category}\ntags: []\npublishedAt: {today}\ndifficulty: beginner\n---\n\n# {raw}\n\n",
        title = serde_json::to_string(title)?,
        category = serde_json::to_string(&category)?,
        today = today,
        raw = title,
    );

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(file_path)
}
