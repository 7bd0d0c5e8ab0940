//! Code block highlighting with syntect

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::{Document, PipelineError, Transform};
use crate::helpers::html_escape;

/// Replaces fenced and indented code blocks with highlighted HTML
pub struct Highlight {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
    auto_detect: bool,
}

impl Highlight {
    pub fn new(theme: &str, line_numbers: bool, auto_detect: bool) -> Result<Self, PipelineError> {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(theme)
            .ok_or_else(|| PipelineError::UnknownTheme(theme.to_string()))?;

        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers,
            auto_detect,
        })
    }

    /// Declared language first, then first-line detection, then plain text
    fn find_syntax(&self, lang: Option<&str>, code: &str) -> (&SyntaxReference, String) {
        if let Some(lang) = lang {
            let syntax = self
                .syntax_set
                .find_syntax_by_token(lang)
                .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
            return (syntax, lang.to_string());
        }

        if self.auto_detect {
            let detected = code
                .lines()
                .next()
                .and_then(|first| self.syntax_set.find_syntax_by_first_line(first));
            if let Some(syntax) = detected {
                let label = syntax
                    .file_extensions
                    .first()
                    .cloned()
                    .unwrap_or_else(|| syntax.name.to_lowercase());
                return (syntax, label);
            }
        }

        (self.syntax_set.find_syntax_plain_text(), "text".to_string())
    }

    /// Highlight a code block
    pub fn highlight_code(&self, code: &str, lang: Option<&str>) -> Result<String, PipelineError> {
        let (syntax, label) = self.find_syntax(lang, code);
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut body = String::with_capacity(code.len() * 2);

        for line in LinesWithEndings::from(code) {
            let regions = highlighter
                .highlight_line(line, &self.syntax_set)
                .map_err(|source| PipelineError::Highlight {
                    lang: label.clone(),
                    source,
                })?;
            let html = styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)
                .map_err(|source| PipelineError::Highlight {
                    lang: label.clone(),
                    source,
                })?;
            body.push_str(&html);
        }

        let class = html_escape(&label);
        let background = self.background_style();

        if self.line_numbers {
            Ok(add_line_numbers(&body, code, &class, &background))
        } else {
            Ok(format!(
                r#"<pre class="highlight"{}><code class="language-{}">{}</code></pre>"#,
                background, class, body
            ))
        }
    }

    fn background_style(&self) -> String {
        self.theme
            .settings
            .background
            .map(|c| format!(r#" style="background-color:#{:02x}{:02x}{:02x};""#, c.r, c.g, c.b))
            .unwrap_or_default()
    }
}

/// Gutter plus code table, one line number per source line
fn add_line_numbers(body: &str, code: &str, class: &str, background: &str) -> String {
    let gutter = (1..=code.lines().count().max(1))
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {class}"><table><tr><td class="gutter"><pre>{gutter}</pre></td><td class="code"><pre{background}><code class="language-{class}">{body}</code></pre></td></tr></table></figure>"#
    )
}

impl Transform for Highlight {
    fn name(&self) -> &'static str {
        "highlight"
    }

    fn apply(&self, doc: Document) -> Result<Document, PipelineError> {
        let events = doc.into_events();
        let mut out = Vec::with_capacity(events.len());
        let mut block: Option<(Option<String>, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split(|c: char| c.is_whitespace() || c == ',')
                            .find(|s| !s.is_empty())
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = block.take() {
                        let html = self.highlight_code(&code, lang.as_deref())?;
                        out.push(Event::Html(CowStr::from(html)));
                    }
                }
                Event::Text(text) if block.is_some() => {
                    if let Some((_, code)) = block.as_mut() {
                        code.push_str(&text);
                    }
                }
                other => out.push(other),
            }
        }

        Ok(Document::new(out))
    }
}
