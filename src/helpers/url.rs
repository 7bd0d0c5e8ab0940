//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment or query value
const COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/tools/figma") // -> "/site/tools/figma"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Percent-encode one path segment or query value
pub fn encode_url(component: &str) -> String {
    utf8_percent_encode(component, COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com/".to_string(),
            root: "/site/".to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/tools/figma"), "/site/tools/figma");
        assert_eq!(url_for(&config, "tutorials"), "/site/tutorials");
        assert_eq!(url_for(&config, "/"), "/site/");
        assert_eq!(url_for(&SiteConfig::default(), "/tools"), "/tools");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/tools"),
            "https://example.com/site/tools"
        );
        assert_eq!(
            full_url_for(&SiteConfig::default(), "/"),
            "https://matrixtools.me/"
        );
    }

    #[test]
    fn test_encode_url() {
        assert_eq!(encode_url("docker 入门"), "docker%20%E5%85%A5%E9%97%A8");
        assert_eq!(encode_url("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_url("plain-slug"), "plain-slug");
    }
}
