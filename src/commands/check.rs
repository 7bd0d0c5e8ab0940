//! Validate content without writing anything

use anyhow::Result;

use crate::content::SiteStats;
use crate::Site;

/// Load and render every piece of content, then print a summary
///
/// Any content error aborts with that error.
pub fn run(site: &Site) -> Result<SiteStats> {
    let catalog = site.load_catalog()?;
    let stats = catalog.stats();

    println!("Content OK");
    println!("  Tools:      {} ({} free)", stats.total_tools, stats.free_tools_count);
    println!("  Tutorials:  {}", stats.total_tutorials);
    println!("  Featured:   {}", stats.featured_count);
    println!("  Categories: {}", stats.category_counts.len());
    println!("  Pages:      {}", catalog.pages().len());
    if let Some(last) = stats.last_updated {
        println!("  Updated:    {}", last.format("%Y-%m-%d"));
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_content(dir: &TempDir, tools: &str) {
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();
        fs::write(
            content.join("categories.yml"),
            "- id: design\n  name: Design\n  slug: design\n",
        )
        .unwrap();
        fs::write(content.join("tools.yml"), tools).unwrap();
    }

    #[test]
    fn test_check_reports_stats() {
        let dir = TempDir::new().unwrap();
        write_content(
            &dir,
            "- id: figma\n  title: Figma\n  description: Design\n  category: design\n  url: https://figma.com\n  isFree: true\n",
        );

        let stats = run(&Site::new(dir.path()).unwrap()).unwrap();
        assert_eq!(stats.total_tools, 1);
        assert_eq!(stats.free_tools_count, 1);
        assert_eq!(stats.total_tutorials, 0);
    }

    #[test]
    fn test_check_rejects_unknown_category() {
        let dir = TempDir::new().unwrap();
        write_content(
            &dir,
            "- id: figma\n  title: Figma\n  description: Design\n  category: nowhere\n  url: https://figma.com\n",
        );

        let err = run(&Site::new(dir.path()).unwrap()).unwrap_err();
        assert!(format!("{:#}", err).contains("nowhere"));
    }
}
