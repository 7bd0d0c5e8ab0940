//! Content loading errors

use std::path::PathBuf;
use thiserror::Error;

use crate::markdown::PipelineError;

/// Errors raised while loading or validating content
///
/// Every variant is a content-authoring problem: loading stops at the first
/// one so a broken tutorial never reaches a page.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid front-matter in {path:?}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("duplicate {kind} id {id:?}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("duplicate {kind} slug {slug:?}")]
    DuplicateSlug { kind: &'static str, slug: String },

    #[error("{kind} slug {slug:?} is not URL-safe")]
    InvalidSlug { kind: &'static str, slug: String },

    #[error("{kind} {id:?} references unknown category {category:?}")]
    UnknownCategory {
        kind: &'static str,
        id: String,
        category: String,
    },

    #[error("tutorial {tutorial:?} references unknown tool {tool:?}")]
    UnknownTool { tutorial: String, tool: String },

    #[error("{kind} {id:?}: {message}")]
    InvalidField {
        kind: &'static str,
        id: String,
        message: String,
    },

    #[error("failed to render {kind} {id:?}: {source}")]
    Render {
        kind: &'static str,
        id: String,
        #[source]
        source: PipelineError,
    },
}
