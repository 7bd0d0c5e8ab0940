//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::RelatedConfig;
pub use site::SiteConfig;
pub use site::PORT_ENV;
