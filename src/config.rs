//! Configuration types for wp2md

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// API base used when the source is a bare post ID and none is given
pub const DEFAULT_API_BASE: &str = "https://outerbounds.com/wp-json/wp/v2/posts";

/// Where the post comes from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Public post URL; the API endpoint is discovered from the page
    Url(String),
    /// Numeric post ID, fetched from [`Config::api_base`]
    Id(u64),
}

impl Source {
    /// Classify a user-supplied locator
    ///
    /// A string made entirely of ASCII digits is a post ID, anything else is
    /// treated as a public URL.
    ///
    /// ```
    /// use wp2md::config::Source;
    ///
    /// assert_eq!(Source::parse("1234"), Source::Id(1234));
    /// assert_eq!(
    ///     Source::parse("https://example.com/blog/hello/"),
    ///     Source::Url("https://example.com/blog/hello/".to_string())
    /// );
    /// ```
    pub fn parse(locator: &str) -> Self {
        if !locator.is_empty() && locator.bytes().all(|b| b.is_ascii_digit()) {
            // digit strings too long for u64 cannot be post IDs either
            if let Ok(id) = locator.parse() {
                return Source::Id(id);
            }
        }
        Source::Url(locator.to_string())
    }
}

/// HTTP behavior shared by every request of a conversion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (None = wait indefinitely)
    #[serde(default, with = "optional_duration_serde")]
    pub timeout: Option<Duration>,

    /// Number of image downloads in flight at once (default: 1, sequential)
    #[serde(default = "default_image_concurrency")]
    pub image_concurrency: usize,

    /// Append the source file extension to `{index}_img` names
    #[serde(default)]
    pub keep_extensions: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout: None,
            image_concurrency: default_image_concurrency(),
            keep_extensions: false,
        }
    }
}

/// Everything one conversion needs
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Post to convert
    pub source: Source,

    /// Base URL of the posts collection, used only for [`Source::Id`]
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Output directory (default: ".")
    #[serde(default = "default_dest_dir")]
    pub dest_dir: PathBuf,

    /// Output file name (default: `{slug}.md`)
    #[serde(default)]
    pub dest_file: Option<String>,

    /// Download images and rewrite their links (default: true)
    #[serde(default = "default_true")]
    pub download_images: bool,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Config for `source` with every other setting at its default
    pub fn new(source: Source) -> Self {
        Self {
            source,
            api_base: default_api_base(),
            dest_dir: default_dest_dir(),
            dest_file: None,
            download_images: true,
            http: HttpConfig::default(),
        }
    }

    /// Check the settings before any network traffic happens
    pub fn validate(&self) -> Result<()> {
        match &self.source {
            Source::Url(url) => {
                let parsed = url::Url::parse(url)
                    .map_err(|e| Error::config("source", format!("invalid post URL '{url}': {e}")))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(Error::config(
                        "source",
                        format!("post URL must be http or https, got '{}'", parsed.scheme()),
                    ));
                }
            }
            Source::Id(_) => {
                if self.api_base.trim().is_empty() {
                    return Err(Error::config(
                        "api_base",
                        "an API base URL is required when converting by post ID",
                    ));
                }
                url::Url::parse(&self.api_base).map_err(|e| {
                    Error::config(
                        "api_base",
                        format!("invalid API base URL '{}': {e}", self.api_base),
                    )
                })?;
            }
        }

        if let Some(file) = &self.dest_file {
            if file.is_empty() {
                return Err(Error::config("dest_file", "destination file name is empty"));
            }
            if Path::new(file).file_name().and_then(|n| n.to_str()) != Some(file.as_str()) {
                return Err(Error::config(
                    "dest_file",
                    format!("destination file '{file}' must be a plain file name; use dest_dir for directories"),
                ));
            }
        }

        if self.http.image_concurrency == 0 {
            return Err(Error::config(
                "image_concurrency",
                "image_concurrency must be at least 1",
            ));
        }

        Ok(())
    }

    /// Path of the Markdown file to write
    ///
    /// Falls back to `{slug}.md` when no file name was configured.
    pub fn output_path(&self, slug: Option<&str>) -> Result<PathBuf> {
        output_path(&self.dest_dir, self.dest_file.as_deref(), slug)
    }
}

/// `dest_dir/dest_file`, with `dest_file` falling back to `{slug}.md`
///
/// Fails with [`Error::MissingField`] when neither a file name nor a
/// non-empty slug is available.
pub fn output_path(
    dest_dir: &Path,
    dest_file: Option<&str>,
    slug: Option<&str>,
) -> Result<PathBuf> {
    let file = match (dest_file, slug) {
        (Some(file), _) => file.to_string(),
        (None, Some(slug)) if !slug.is_empty() => format!("{slug}.md"),
        (None, _) => return Err(Error::MissingField("slug")),
    };
    Ok(dest_dir.join(file))
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_dest_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_image_concurrency() -> usize {
    1
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
