//! Markdown publishing pipeline
//!
//! Tutorial bodies are parsed once into a [`Document`] (the event list of the
//! Markdown tree) and then pass through an ordered list of [`Transform`]s:
//!
//! 1. GFM parsing with MDX validation ([`parse`])
//! 2. heading ids ([`HeadingIds`])
//! 3. anchors wrapping heading text ([`AutolinkHeadings`])
//! 4. code highlighting ([`Highlight`])
//!
//! Every stage is a pure function of its input, so rendering the same source
//! twice produces identical HTML.

mod headings;
mod highlight;
mod parse;

use pulldown_cmark::{html, Event, Tag, TagEnd};
use serde::Serialize;
use thiserror::Error;

use crate::config::HighlightConfig;

pub use headings::{slugify, AutolinkHeadings, HeadingIds};
pub use highlight::Highlight;
pub use parse::{gfm_options, parse};

/// Errors raised while rendering Markdown
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid MDX at line {line}: {message}")]
    Mdx { line: usize, message: String },

    #[error("heading {heading:?} has no id to link to")]
    MissingHeadingId { heading: String },

    #[error("heading id {id:?} is used more than once")]
    DuplicateHeadingId { id: String },

    #[error("failed to highlight `{lang}` code block: {source}")]
    Highlight {
        lang: String,
        #[source]
        source: syntect::Error,
    },

    #[error("unknown highlight theme: {0}")]
    UnknownTheme(String),
}

/// A parsed Markdown document shared by all pipeline stages
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    events: Vec<Event<'static>>,
}

impl Document {
    pub fn new(events: Vec<Event<'static>>) -> Self {
        Self { events }
    }

    pub fn into_events(self) -> Vec<Event<'static>> {
        self.events
    }

    /// Serialize the document to HTML
    pub fn to_html(&self) -> String {
        let mut output = String::new();
        html::push_html(&mut output, self.events.iter().cloned());
        output
    }

    /// Heading outline, in document order
    pub fn outline(&self) -> Vec<TocEntry> {
        self.events
            .iter()
            .enumerate()
            .filter_map(|(idx, event)| match event {
                Event::Start(Tag::Heading { level, id, .. }) => Some(TocEntry {
                    level: *level as u8,
                    id: id.as_deref().unwrap_or_default().to_string(),
                    text: heading_text(&self.events[idx..]),
                }),
                _ => None,
            })
            .collect()
    }
}

/// Plain text of the heading that starts at `events[0]`
pub(crate) fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events.iter().skip(1) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::End(TagEnd::Heading(_)) => break,
            _ => {}
        }
    }
    text
}

/// One entry of a page's table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// A single pipeline stage
pub trait Transform: Send + Sync {
    /// Stage name used in logs
    fn name(&self) -> &'static str;

    fn apply(&self, doc: Document) -> Result<Document, PipelineError>;
}

/// Ordered list of transforms applied after parsing
pub struct Pipeline {
    stages: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    /// A pipeline that only parses
    pub fn empty() -> Self {
        Self { stages: Vec::new() }
    }

    /// GFM → heading ids → heading anchors → highlighting
    pub fn standard(highlight: Highlight) -> Self {
        Self::empty()
            .with_stage(HeadingIds)
            .with_stage(AutolinkHeadings)
            .with_stage(highlight)
    }

    pub fn with_stage<T: Transform + 'static>(mut self, stage: T) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Parse `source` and run every stage in order
    pub fn run(&self, source: &str) -> Result<Document, PipelineError> {
        let mut doc = parse(source)?;
        for stage in &self.stages {
            tracing::trace!(stage = stage.name(), "applying transform");
            doc = stage.apply(doc)?;
        }
        Ok(doc)
    }
}

/// Output of the pipeline for one piece of content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedContent {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// Markdown renderer running the standard pipeline
pub struct MarkdownRenderer {
    pipeline: Pipeline,
}

impl MarkdownRenderer {
    /// Create a renderer with the default highlight settings
    pub fn new() -> Result<Self, PipelineError> {
        Self::from_config(&HighlightConfig::default())
    }

    pub fn from_config(config: &HighlightConfig) -> Result<Self, PipelineError> {
        let highlight = Highlight::new(&config.theme, config.line_number, config.auto_detect)?;
        Ok(Self {
            pipeline: Pipeline::standard(highlight),
        })
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Render markdown to HTML plus its table of contents
    pub fn render(&self, source: &str) -> Result<RenderedContent, PipelineError> {
        let doc = self.pipeline.run(source)?;
        Ok(RenderedContent {
            html: doc.to_html(),
            toc: doc.outline(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::new().unwrap()
    }

    #[test]
    fn test_stage_order() {
        let renderer = renderer();
        assert_eq!(
            renderer.pipeline().stage_names(),
            vec!["heading-ids", "autolink-headings", "highlight"]
        );
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = renderer()
            .render("# Hello World\n\nThis is a test.")
            .unwrap()
            .html;
        assert!(html.contains(r##"<h1 id="hello-world"><a href="#hello-world">Hello World</a></h1>"##));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_gfm_extensions() {
        let source = "\
| a | b |
|---|---|
| 1 | 2 |

~~gone~~

- [x] done
- [ ] todo
";
        let html = renderer().render(source).unwrap().html;
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains(r#"type="checkbox""#));
    }

    #[test]
    fn test_duplicate_headings_get_distinct_ids() {
        let rendered = renderer()
            .render("## Setup\n\ntext\n\n## Setup\n\nmore\n\n## Setup")
            .unwrap();
        let ids: Vec<_> = rendered.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "setup-1", "setup-2"]);
        assert!(rendered.html.contains(r##"<a href="#setup-1">Setup</a>"##));
    }

    #[test]
    fn test_repeated_explicit_id_is_an_error() {
        let err = renderer()
            .render("# A {#x}\n\n# B {#x}\n\n# x\n")
            .unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateHeadingId { id } if id == "x"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let source = "# Title\n\n```rust\nfn main() {}\n```\n\n## Title\n";
        let renderer = renderer();
        let first = renderer.render(source).unwrap();
        let second = renderer.render(source).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_code_block() {
        let html = renderer()
            .render("```rust\nfn main() {}\n```")
            .unwrap()
            .html;
        assert!(html.contains(r#"<code class="language-rust">"#));
        assert!(html.contains("<span"));
        assert!(!html.contains("```"));
    }

    #[test]
    fn test_toc_outline() {
        let rendered = renderer()
            .render("# Intro\n\n## Install `cargo`\n\n### 常见问题")
            .unwrap();
        assert_eq!(
            rendered.toc,
            vec![
                TocEntry {
                    level: 1,
                    id: "intro".to_string(),
                    text: "Intro".to_string()
                },
                TocEntry {
                    level: 2,
                    id: "install-cargo".to_string(),
                    text: "Install cargo".to_string()
                },
                TocEntry {
                    level: 3,
                    id: "常见问题".to_string(),
                    text: "常见问题".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_malformed_mdx_fails() {
        let err = renderer().render("# Title\n\nvalue is {open\n").unwrap_err();
        assert!(matches!(err, PipelineError::Mdx { line: 3, .. }));
    }

    #[test]
    fn test_unknown_theme() {
        let config = HighlightConfig {
            theme: "no-such-theme".to_string(),
            ..HighlightConfig::default()
        };
        assert!(matches!(
            MarkdownRenderer::from_config(&config),
            Err(PipelineError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_empty_pipeline_leaves_headings_bare() {
        let doc = Pipeline::empty().run("# Plain").unwrap();
        assert_eq!(doc.to_html(), "<h1>Plain</h1>\n");
    }
}
