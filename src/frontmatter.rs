//! Front matter block written at the top of the Markdown file.

use crate::post::Post;
use std::fmt;

/// Delimiter line opening and closing the block
pub const DELIMITER: &str = "---";

/// Keys in output order
pub const KEYS: [&str; 6] = ["title", "date", "draft", "description", "image", "slug"];

/// Front matter derived from a post
///
/// Only keys with a non-empty value are kept. Values are emitted verbatim
/// between double quotes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrontMatter {
    entries: Vec<(&'static str, String)>,
}

impl FrontMatter {
    /// Derive the front matter of `post`
    pub fn from_post(post: &Post) -> Self {
        let values: [(&'static str, Option<&str>); KEYS.len()] = [
            ("title", post.title()),
            ("date", post.date()),
            ("draft", Some(post.draft())),
            ("description", post.description()),
            ("image", post.image()),
            ("slug", post.slug()),
        ];
        let mut fm = Self::default();
        for (key, value) in values {
            if let Some(value) = value {
                fm.push(key, value);
            }
        }
        fm
    }

    /// Append `key: "value"`, ignoring empty values
    pub fn push(&mut self, key: &'static str, value: &str) {
        if !value.is_empty() {
            self.entries.push((key, value.to_string()));
        }
    }

    /// Value recorded for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Recorded entries in output order
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Render the block, including both delimiter lines and a trailing newline
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FrontMatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{DELIMITER}")?;
        for (key, value) in &self.entries {
            writeln!(f, "{key}: \"{value}\"")?;
        }
        writeln!(f, "{DELIMITER}")
    }
}
