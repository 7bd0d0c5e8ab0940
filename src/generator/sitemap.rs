//! sitemap.xml

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::{Catalog, CategoryKind};
use crate::helpers::{encode_url, escape_xml, full_url_for, iso_timestamp};

/// One `<url>` entry
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: DateTime<Utc>,
    pub changefreq: &'static str,
    pub priority: f32,
}

/// Every public URL of the site
///
/// `now` stands in for the modification time of pages that are not backed by
/// a dated record.
pub fn entries(config: &SiteConfig, catalog: &Catalog, now: DateTime<Utc>) -> Vec<SitemapEntry> {
    let entry = |path: &str, lastmod, changefreq, priority| SitemapEntry {
        loc: full_url_for(config, path),
        lastmod,
        changefreq,
        priority,
    };

    let mut entries = vec![
        entry("/", now, "daily", 1.0),
        entry("/tools", now, "daily", 0.9),
        entry("/tutorials", now, "daily", 0.9),
        entry("/search", now, "monthly", 0.6),
    ];

    for page in catalog.pages() {
        let path = format!("/{}", encode_url(&page.slug));
        entries.push(entry(
            &path,
            page.updated_at.unwrap_or(now),
            page.changefreq.as_str(),
            page.priority,
        ));
    }

    for category in catalog.categories() {
        if category.kind == CategoryKind::Tutorial {
            continue;
        }
        let path = format!("/tools?category={}", encode_url(&category.slug));
        entries.push(entry(&path, now, "weekly", 0.7));
    }

    for tool in catalog.tools() {
        let path = format!("/tools/{}", encode_url(&tool.slug));
        entries.push(entry(&path, tool.published_at.unwrap_or(now), "monthly", 0.6));
    }

    for tutorial in catalog.tutorials() {
        let path = format!("/tutorials/{}", encode_url(&tutorial.slug));
        let lastmod = tutorial.updated_at.unwrap_or(tutorial.published_at);
        entries.push(entry(&path, lastmod, "monthly", 0.8));
    }

    entries
}

/// Render the sitemap XML
pub fn render(config: &SiteConfig, catalog: &Catalog, now: DateTime<Utc>) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for entry in entries(config, catalog, now) {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            iso_timestamp(&entry.lastmod)
        ));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.changefreq
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures::catalog;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_sitemap_contains_every_tutorial() {
        let catalog = catalog();
        let xml = render(&SiteConfig::default(), &catalog, now());
        for tutorial in catalog.tutorials() {
            let loc = format!("<loc>https://matrixtools.me/tutorials/{}</loc>", tutorial.slug);
            assert!(xml.contains(&loc), "missing {}", loc);
        }
    }

    #[test]
    fn test_sitemap_priorities_and_lastmod() {
        let catalog = catalog();
        let entries = entries(&SiteConfig::default(), &catalog, now());

        assert_eq!(entries[0].loc, "https://matrixtools.me/");
        assert_eq!(entries[0].priority, 1.0);

        let tutorial = entries
            .iter()
            .find(|e| e.loc.ends_with("/tutorials/git-basics"))
            .unwrap();
        assert_eq!(tutorial.priority, 0.8);
        assert_eq!(iso_timestamp(&tutorial.lastmod), "2024-01-05T00:00:00.000Z");

        let undated = entries
            .iter()
            .find(|e| e.loc.ends_with("/tools/notion"))
            .unwrap();
        assert_eq!(undated.lastmod, now());
    }

    #[test]
    fn test_sitemap_lists_standalone_pages() {
        let entries = entries(&SiteConfig::default(), &catalog(), now());

        let about = entries
            .iter()
            .find(|e| e.loc == "https://matrixtools.me/about")
            .unwrap();
        assert_eq!(about.priority, 0.8);
        assert_eq!(about.changefreq, "monthly");
        assert_eq!(about.lastmod, now());

        let privacy = entries
            .iter()
            .find(|e| e.loc == "https://matrixtools.me/privacy")
            .unwrap();
        assert_eq!(privacy.priority, 0.5);
        assert_eq!(privacy.changefreq, "yearly");
        assert_eq!(iso_timestamp(&privacy.lastmod), "2024-04-01T00:00:00.000Z");
    }

    #[test]
    fn test_sitemap_escapes_category_urls() {
        let xml = render(&SiteConfig::default(), &catalog(), now());
        assert!(xml.contains("<loc>https://matrixtools.me/tools?category=ai-tools</loc>"));
        assert!(xml.contains("<priority>0.7</priority>"));
        assert!(xml.starts_with("<?xml"));
        assert!(xml.ends_with("</urlset>\n"));
    }
}
