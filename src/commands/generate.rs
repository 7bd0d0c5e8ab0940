//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Site;

/// Load every piece of content and export the site to the public directory
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let catalog = site.load_catalog()?;
    tracing::info!(
        "Loaded {} tools and {} tutorials",
        catalog.tools().len(),
        catalog.tutorials().len()
    );

    let generator = Generator::new(site)?;
    let written = generator.generate(&catalog)?;

    tracing::info!(
        "Generated {} files in {:.2}s",
        written,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_from_disk() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(content.join("tutorials")).unwrap();
        fs::write(
            content.join("categories.yml"),
            "- id: development\n  name: Development\n  description: Dev\n  icon: \"💻\"\n  slug: development\n",
        )
        .unwrap();
        fs::write(
            content.join("tools.yml"),
            "- id: vscode\n  title: VS Code\n  description: Editor\n  category: development\n  url: https://code.visualstudio.com\n",
        )
        .unwrap();
        fs::write(
            content.join("tutorials/hello.mdx"),
            "---\ntitle: Hello\ncategory: development\npublishedAt: 2024-01-01\n---\n\n# Hello\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        run(&site).unwrap();

        let public = dir.path().join("public");
        assert!(public.join("index.html").exists());
        assert!(public.join("tools/vscode/index.html").exists());
        assert!(public.join("tutorials/hello/index.html").exists());
        assert!(public.join("sitemap.xml").exists());
    }

    #[test]
    fn test_generate_fails_on_invalid_content() {
        let dir = TempDir::new().unwrap();
        let tutorials = dir.path().join("content/tutorials");
        fs::create_dir_all(&tutorials).unwrap();
        fs::write(tutorials.join("broken.mdx"), "# no front matter\n").unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert!(run(&site).is_err());
        assert!(!dir.path().join("public").exists());
    }
}
