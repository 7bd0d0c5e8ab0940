//! Heading ids and heading anchors

use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use std::collections::{HashMap, HashSet};

use super::{heading_text, Document, PipelineError, Transform};
use crate::helpers::html_escape;

/// Slug used for heading ids: lowercase, runs of anything that is not a
/// letter or digit collapse to one hyphen, no leading or trailing hyphen.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Hands out page-unique ids
#[derive(Debug, Default)]
struct Slugger {
    seen: HashSet<String>,
    counters: HashMap<String, usize>,
}

impl Slugger {
    /// Claim an explicit id; false if it is already taken
    fn reserve(&mut self, id: &str) -> bool {
        self.seen.insert(id.to_string())
    }

    fn unique(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = "section".to_string();
        }
        if self.seen.insert(base.clone()) {
            return base;
        }

        let mut n = self.counters.get(&base).copied().unwrap_or(0);
        loop {
            n += 1;
            let candidate = format!("{}-{}", base, n);
            if self.seen.insert(candidate.clone()) {
                self.counters.insert(base, n);
                return candidate;
            }
        }
    }
}

/// Gives every heading an `id` derived from its text
pub struct HeadingIds;

impl Transform for HeadingIds {
    fn name(&self) -> &'static str {
        "heading-ids"
    }

    fn apply(&self, doc: Document) -> Result<Document, PipelineError> {
        let events = doc.into_events();
        let mut slugger = Slugger::default();

        // Explicit `{#id}` attributes win over generated ones and must be unique
        for event in &events {
            if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
                if !slugger.reserve(id) {
                    return Err(PipelineError::DuplicateHeadingId { id: id.to_string() });
                }
            }
        }

        let mut out: Vec<Event<'static>> = Vec::with_capacity(events.len());
        let mut pending: Option<usize> = None;
        let mut text = String::new();

        for event in events {
            match event {
                Event::Start(Tag::Heading { id: None, .. }) => {
                    pending = Some(out.len());
                    text.clear();
                    out.push(event);
                }
                Event::Text(ref t) | Event::Code(ref t) if pending.is_some() => {
                    text.push_str(t);
                    out.push(event);
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(start) = pending.take() {
                        let id = slugger.unique(&text);
                        if let Event::Start(Tag::Heading { id: slot, .. }) = &mut out[start] {
                            *slot = Some(CowStr::from(id));
                        }
                    }
                    out.push(event);
                }
                other => out.push(other),
            }
        }

        Ok(Document::new(out))
    }
}

/// Wraps each heading's content in a link to the heading itself
pub struct AutolinkHeadings;

impl Transform for AutolinkHeadings {
    fn name(&self) -> &'static str {
        "autolink-headings"
    }

    fn apply(&self, doc: Document) -> Result<Document, PipelineError> {
        let events = doc.into_events();

        for (idx, event) in events.iter().enumerate() {
            if let Event::Start(Tag::Heading { id: None, .. }) = event {
                return Err(PipelineError::MissingHeadingId {
                    heading: heading_text(&events[idx..]),
                });
            }
        }

        let mut out = Vec::with_capacity(events.len() + 2);
        for event in events {
            match event {
                Event::Start(Tag::Heading { ref id, .. }) => {
                    let open = format!(
                        r##"<a href="#{}">"##,
                        html_escape(id.as_deref().unwrap_or_default())
                    );
                    out.push(event);
                    out.push(Event::InlineHtml(CowStr::from(open)));
                }
                Event::End(TagEnd::Heading(_)) => {
                    out.push(Event::InlineHtml(CowStr::Borrowed("</a>")));
                    out.push(event);
                }
                other => out.push(other),
            }
        }

        Ok(Document::new(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse;

    fn ids(source: &str) -> Vec<String> {
        let doc = HeadingIds.apply(parse(source).unwrap()).unwrap();
        doc.outline().into_iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  What's new?  "), "what-s-new");
        assert_eq!(slugify("C++ & Rust -- 2024"), "c-rust-2024");
        assert_eq!(slugify("Docker 部署指南"), "docker-部署指南");
        assert_eq!(slugify("snake_case_name"), "snake-case-name");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_duplicate_suffixes() {
        assert_eq!(ids("# A\n# A\n# A"), vec!["a", "a-1", "a-2"]);
    }

    #[test]
    fn test_suffix_skips_taken_ids() {
        assert_eq!(ids("# A 1\n# A\n# A"), vec!["a-1", "a", "a-2"]);
    }

    #[test]
    fn test_explicit_id_is_kept_and_reserved() {
        assert_eq!(ids("# Intro\n# Other {#intro}"), vec!["intro-1", "intro"]);
    }

    #[test]
    fn test_repeated_explicit_id_rejected() {
        let err = HeadingIds
            .apply(parse("# A {#x}\n\n# B {#x}\n\n# x\n").unwrap())
            .unwrap_err();
        match err {
            PipelineError::DuplicateHeadingId { id } => assert_eq!(id, "x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_heading_text() {
        assert_eq!(ids("# ???\n# ..."), vec!["section", "section-1"]);
    }

    #[test]
    fn test_autolink_requires_ids() {
        let err = AutolinkHeadings.apply(parse("## Bare").unwrap()).unwrap_err();
        match err {
            PipelineError::MissingHeadingId { heading } => assert_eq!(heading, "Bare"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_autolink_wraps_heading_text() {
        let doc = HeadingIds.apply(parse("## Getting *started*").unwrap()).unwrap();
        let html = AutolinkHeadings.apply(doc).unwrap().to_html();
        assert_eq!(
            html,
            "<h2 id=\"getting-started\"><a href=\"#getting-started\">Getting <em>started</em></a></h2>\n"
        );
    }
}
