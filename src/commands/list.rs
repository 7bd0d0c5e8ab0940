//! List site content

use anyhow::Result;

use crate::content::Catalog;
use crate::Site;

/// Print one kind of content from the loaded catalog
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let catalog = site.load_catalog()?;
    print!("{}", render(&catalog, content_type)?);
    Ok(())
}

fn render(catalog: &Catalog, content_type: &str) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "tool" | "tools" => {
            out.push_str(&format!("Tools ({}):\n", catalog.tools().len()));
            for tool in catalog.tools() {
                let free = if tool.is_free { " free" } else { "" };
                let featured = if tool.featured { " *" } else { "" };
                out.push_str(&format!(
                    "  {} - {} [{}]{}{}\n",
                    tool.id, tool.title, tool.category, free, featured
                ));
            }
        }
        "tutorial" | "tutorials" => {
            out.push_str(&format!("Tutorials ({}):\n", catalog.tutorials().len()));
            for tutorial in catalog.tutorials() {
                out.push_str(&format!(
                    "  {} - {} [{}] {} min\n",
                    tutorial.published_at.format("%Y-%m-%d"),
                    tutorial.title,
                    tutorial.slug,
                    tutorial.read_time
                ));
            }
        }
        "category" | "categories" => {
            let stats = catalog.stats();
            out.push_str(&format!("Categories ({}):\n", catalog.categories().len()));
            for category in catalog.categories() {
                let count = stats.category_counts.get(&category.id).copied().unwrap_or(0);
                out.push_str(&format!(
                    "  {} {} ({}) [{}]\n",
                    category.icon, category.name, count, category.slug
                ));
            }
        }
        "page" | "pages" => {
            out.push_str(&format!("Pages ({}):\n", catalog.pages().len()));
            for page in catalog.pages() {
                out.push_str(&format!(
                    "  /{} - {} ({} {:.1})\n",
                    page.slug, page.title, page.changefreq, page.priority
                ));
            }
        }
        "tag" | "tags" => {
            let tags = catalog.tags();
            out.push_str(&format!("Tags ({}):\n", tags.len()));
            for tag in tags {
                out.push_str(&format!("  {} ({})\n", tag.name, tag.count));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: tools, tutorials, categories, pages, tags",
                content_type
            );
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures::catalog;

    #[test]
    fn test_list_tools_newest_first() {
        let out = render(&catalog(), "tools").unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "Tools (4):");
        assert!(lines[1].starts_with("  chatgpt - ChatGPT [ai] free"));
        assert!(lines[3].contains("Visual Studio Code") && lines[3].ends_with('*'));
    }

    #[test]
    fn test_list_tutorials() {
        let out = render(&catalog(), "tutorials").unwrap();
        assert!(out.starts_with("Tutorials (3):\n  2024-06-01 - Prompt Basics [prompt-basics]"));
    }

    #[test]
    fn test_list_categories_with_counts() {
        let out = render(&catalog(), "categories").unwrap();
        // vscode plus two tutorials
        assert!(out.contains("💻 Development (3) [development]"));
        assert!(out.contains("🤖 AI (2) [ai-tools]"));
    }

    #[test]
    fn test_list_pages() {
        let out = render(&catalog(), "pages").unwrap();
        assert!(out.starts_with("Pages (2):\n  /about - 关于我们 (monthly 0.8)\n"));
        assert!(out.contains("  /privacy - 隐私政策 (yearly 0.5)"));
    }

    #[test]
    fn test_list_unknown_type() {
        assert!(render(&catalog(), "posts").is_err());
    }
}
