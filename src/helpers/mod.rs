//! Helper functions shared by templates, pages and the generator

mod date;
mod html;
mod pagination;
mod url;

pub use date::*;
pub use html::*;
pub use pagination::*;
pub use url::*;
