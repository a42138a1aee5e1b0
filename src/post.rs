//! WordPress post model
//!
//! A [`Post`] wraps the JSON object returned by `/wp-json/wp/v2/posts/{id}`.
//! Known fields are exposed through typed accessors that project over the
//! JSON on every call; anything else is reachable through [`Post::raw_field`].

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Status value of a published post; every other status counts as a draft
pub const PUBLISHED_STATUS: &str = "publish";

/// A fetched WordPress post
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    raw: Map<String, Value>,
}

impl Post {
    /// Wrap a parsed post response
    ///
    /// # Errors
    /// Returns [`Error::InvalidPost`] if `value` is not a JSON object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(raw) => Ok(Self { raw }),
            other => Err(Error::InvalidPost(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Numeric post ID
    pub fn id(&self) -> Option<u64> {
        self.raw.get("id").and_then(Value::as_u64)
    }

    /// Rendered HTML title (`title.rendered`)
    pub fn title(&self) -> Option<&str> {
        self.str_at(&["title", "rendered"])
    }

    /// Publication date as sent by the API
    pub fn date(&self) -> Option<&str> {
        self.str_at(&["date"])
    }

    /// URL slug
    pub fn slug(&self) -> Option<&str> {
        self.str_at(&["slug"])
    }

    /// Publication status (`publish`, `draft`, `future`, ...)
    pub fn status(&self) -> Option<&str> {
        self.str_at(&["status"])
    }

    /// True unless the status is exactly `publish`
    pub fn is_draft(&self) -> bool {
        self.status() != Some(PUBLISHED_STATUS)
    }

    /// Draft flag as written to front matter
    pub fn draft(&self) -> &'static str {
        if self.is_draft() { "true" } else { "false" }
    }

    /// SEO description from Yoast metadata (`yoast_head_json.description`)
    pub fn description(&self) -> Option<&str> {
        self.str_at(&["yoast_head_json", "description"])
    }

    /// Featured image URL from Spectra/UAGB (`uagb_featured_image_src.large[0]`)
    pub fn image(&self) -> Option<&str> {
        self.value_at(&["uagb_featured_image_src", "large"])
            .and_then(Value::as_array)
            .and_then(|large| large.first())
            .and_then(Value::as_str)
    }

    /// Rendered HTML body (`content.rendered`), empty when absent
    pub fn content_html(&self) -> &str {
        self.str_at(&["content", "rendered"]).unwrap_or("")
    }

    /// Any top-level field of the post JSON, modeled or not
    pub fn raw_field(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    /// The whole post JSON object
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    fn value_at(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.raw.get(*first)?, |value, key| value.get(*key))
    }

    fn str_at(&self, path: &[&str]) -> Option<&str> {
        self.value_at(path).and_then(Value::as_str)
    }
}

impl TryFrom<Value> for Post {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Post::from_value(value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
