//! Tutorial and page front-matter parsing

use serde::{Deserialize, Deserializer};
use std::path::Path;

use super::model::{ChangeFreq, Difficulty};
use super::ContentError;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter of a tutorial or page file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrontMatter {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    pub author: Option<String>,
    #[serde(alias = "date")]
    pub published_at: Option<String>,
    #[serde(alias = "updated")]
    pub updated_at: Option<String>,
    pub read_time: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub featured: bool,
    pub slug: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub related_tools: Vec<String>,
    #[serde(deserialize_with = "string_or_vec", alias = "prerequisite")]
    pub prerequisites: Vec<String>,
    /// Sitemap priority of a standalone page
    pub priority: Option<f32>,
    pub changefreq: Option<ChangeFreq>,
}

impl FrontMatter {
    /// Split `content` into front-matter and body
    ///
    /// Tutorials and pages must open with a `---` delimited YAML block; anything else
    /// is an authoring error rather than body text.
    pub fn parse<'a>(path: &Path, content: &'a str) -> Result<(Self, &'a str), ContentError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let Some(rest) = content.strip_prefix("---") else {
            return Err(ContentError::FrontMatter {
                path: path.to_path_buf(),
                message: "missing `---` front-matter block".to_string(),
            });
        };
        let rest = rest.trim_start_matches(['\n', '\r']);

        // An empty block closes immediately
        let (yaml, body) = if let Some(body) = rest.strip_prefix("---") {
            ("", body)
        } else if let Some(end_pos) = rest.find("\n---") {
            (&rest[..end_pos], &rest[end_pos + 4..])
        } else {
            return Err(ContentError::FrontMatter {
                path: path.to_path_buf(),
                message: "unterminated front-matter block".to_string(),
            });
        };
        let body = body.trim_start_matches(['\n', '\r']);

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml).map_err(|source| ContentError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        Ok((fm, body))
    }
}
