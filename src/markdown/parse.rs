//! GFM parsing and MDX validation

use lazy_static::lazy_static;
use pulldown_cmark::{Event, Options, Parser, Tag};
use regex::Regex;
use std::ops::Range;

use super::{Document, PipelineError};

lazy_static! {
    static ref ESM_STATEMENT: Regex = Regex::new(r"^(import|export)\s").unwrap();
}

/// Parser options: GitHub-flavored extensions plus `{#id}` heading attributes
pub fn gfm_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM
}

/// Validate MDX source and parse it into a document
pub fn parse(source: &str) -> Result<Document, PipelineError> {
    validate_mdx(source)?;
    let events = Parser::new_ext(source, gfm_options())
        .map(Event::into_static)
        .collect();
    Ok(Document::new(events))
}

/// Byte ranges of code blocks and code spans, in source order
fn code_ranges(source: &str) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Parser::new_ext(source, gfm_options())
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(_)) | Event::Code(_) => Some(range),
            _ => None,
        })
        .collect();
    ranges.sort_by_key(|r| r.start);
    ranges
}

/// Reject source an MDX compiler would refuse: unbalanced `{}` expressions
/// and ESM statements outside code.
///
/// Code is located by the Markdown parser itself, so fences nested in
/// blockquotes or list items are skipped like top-level ones.
fn validate_mdx(source: &str) -> Result<(), PipelineError> {
    let code = code_ranges(source);
    let mut code = code.iter().peekable();

    let mut depth = 0usize;
    let mut open_line = 0usize;
    let mut line_no = 1usize;
    let mut line_start = true;
    let mut chars = source.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c == '\n' {
            line_no += 1;
            line_start = true;
            continue;
        }

        while code.peek().is_some_and(|r| r.end <= offset) {
            code.next();
        }
        let in_code = code.peek().is_some_and(|r| r.start <= offset);
        let at_line_start = std::mem::replace(&mut line_start, false);
        if in_code {
            continue;
        }

        if at_line_start && depth == 0 && ESM_STATEMENT.is_match(&source[offset..]) {
            return Err(PipelineError::Mdx {
                line: line_no,
                message: "import/export statements are not supported".to_string(),
            });
        }

        match c {
            '\\' => {
                if chars.peek().is_some_and(|&(_, next)| next != '\n') {
                    chars.next();
                }
            }
            '{' => {
                if depth == 0 {
                    open_line = line_no;
                }
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    return Err(PipelineError::Mdx {
                        line: line_no,
                        message: "unexpected `}` outside an expression".to_string(),
                    });
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    if depth > 0 {
        return Err(PipelineError::Mdx {
            line: open_line,
            message: "unclosed `{` expression".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mdx_error_line(source: &str) -> Option<usize> {
        match validate_mdx(source) {
            Err(PipelineError::Mdx { line, .. }) => Some(line),
            _ => None,
        }
    }

    #[test]
    fn test_plain_markdown_is_valid() {
        assert!(validate_mdx("# Title\n\nSome *text* with a [link](https://example.com).").is_ok());
    }

    #[test]
    fn test_balanced_expression_is_valid() {
        assert!(validate_mdx("Year: {2024}\n\n{\n  nested: {a}\n}\n").is_ok());
    }

    #[test]
    fn test_unclosed_expression() {
        assert_eq!(mdx_error_line("line one\n\ntext {oops\nmore"), Some(3));
    }

    #[test]
    fn test_stray_closing_brace() {
        assert_eq!(mdx_error_line("fine\n\nbad }"), Some(3));
    }

    #[test]
    fn test_braces_in_code_are_ignored() {
        let source = "\
Use `{` to open.

```js
function f() {
```

    if (x) {

~~~
}
~~~
";
        assert!(validate_mdx(source).is_ok());
    }

    #[test]
    fn test_fence_in_blockquote_is_code() {
        let source = "> Example:\n>\n> ```js\n> function f() {\n> ```\n";
        assert!(validate_mdx(source).is_ok());
        assert!(parse(source).is_ok());
    }

    #[test]
    fn test_fence_in_list_item_is_code() {
        let source = "1. Run:\n    ```js\n    if (x) {\n    ```\n2. Done\n";
        assert!(validate_mdx(source).is_ok());
    }

    #[test]
    fn test_brace_after_list_code_still_checked() {
        let source = "- Step:\n  ```sh\n  echo {\n  ```\n\nThen {oops\n";
        assert_eq!(mdx_error_line(source), Some(6));
    }

    #[test]
    fn test_escaped_braces() {
        assert!(validate_mdx(r"Literal \{ brace").is_ok());
    }

    #[test]
    fn test_esm_rejected() {
        assert_eq!(mdx_error_line("# T\n\nimport X from 'y'\n"), Some(3));
        assert_eq!(mdx_error_line("export const a = 1\n"), Some(1));
    }

    #[test]
    fn test_esm_inside_code_fence_is_fine() {
        assert!(validate_mdx("```js\nimport x from 'y'\n```\n").is_ok());
    }

    #[test]
    fn test_parse_gfm() {
        let doc = parse("~~strike~~").unwrap();
        assert!(doc.to_html().contains("<del>strike</del>"));
    }
}
