//! Image relocation: download the images a post references and point the
//! Markdown at the local copies.
//!
//! Images are numbered by their position among the image references of the
//! converted body (`0_img`, `1_img`, ...). Every position gets its own file,
//! so a URL referenced more than once is downloaded once per reference; the
//! map keeps the file of its first occurrence and every reference is
//! rewritten to that one.

use crate::config::HttpConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::markdown;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Longest file extension taken over from a source URL
const MAX_EXTENSION_LEN: usize = 5;

/// Ordered mapping from original image URL to local relative path
///
/// Keys are unique; iteration follows insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageMap {
    entries: Vec<(String, String)>,
}

impl ImageMap {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `url -> path`; returns false (and keeps the existing path) if
    /// `url` is already mapped
    pub fn insert(&mut self, url: impl Into<String>, path: impl Into<String>) -> bool {
        let url = url.into();
        if self.get(&url).is_some() {
            return false;
        }
        self.entries.push((url, path.into()));
        true
    }

    /// Local path recorded for `url`
    pub fn get(&self, url: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, p)| p.as_str())
    }

    /// Number of mapped URLs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no URL is mapped
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(url, path)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Rewrite the image references of `markdown` that point at mapped URLs
    ///
    /// Only the URL inside `![alt](url)` is replaced; the same text elsewhere
    /// (plain links, prose, longer URLs sharing a prefix) is left alone.
    /// Relocating already relocated Markdown is a no-op.
    pub fn relocate(&self, markdown: &str) -> String {
        if self.is_empty() {
            return markdown.to_string();
        }
        markdown::rewrite_image_urls(markdown, |url| self.get(url))
    }
}

/// Knobs of the download step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageOptions {
    /// Downloads in flight at once; at least 1
    pub concurrency: usize,
    /// Append the source extension to `{index}_img`
    pub keep_extensions: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            keep_extensions: false,
        }
    }
}

impl From<&HttpConfig> for ImageOptions {
    fn from(config: &HttpConfig) -> Self {
        Self {
            concurrency: config.image_concurrency.max(1),
            keep_extensions: config.keep_extensions,
        }
    }
}

/// Directory holding the images of the Markdown file at `output`:
/// `_{stem}_data` next to it
pub fn data_dir_for(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("_{stem}_data");
    match output.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Download every image in `urls` into `dest_dir` and map each URL to its
/// file's path relative to `reference_dir`
///
/// `urls` is the ordered list of image references (duplicates included);
/// file names are `{index}_img` by position in that list. Downloads run
/// `options.concurrency` at a time but the mapping never depends on
/// completion order. The first failed download aborts the whole step.
pub async fn download_images(
    client: &HttpClient,
    urls: &[String],
    dest_dir: &Path,
    reference_dir: &Path,
    options: ImageOptions,
) -> Result<ImageMap> {
    tokio::fs::create_dir_all(dest_dir).await.map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("failed to create image directory '{}': {e}", dest_dir.display()),
        ))
    })?;

    info!(
        count = urls.len(),
        dir = %dest_dir.display(),
        "downloading images"
    );

    let jobs = urls.iter().map(String::as_str).enumerate();
    let saved: Vec<(&str, PathBuf)> = stream::iter(jobs)
        .map(|(index, url)| async move {
            let download = client.get_bytes(url).await?;
            let name = image_file_name(
                index,
                url,
                download.content_type.as_deref(),
                options.keep_extensions,
            );
            let path = dest_dir.join(name);
            tokio::fs::write(&path, &download.bytes).await?;
            debug!(url, path = %path.display(), bytes = download.bytes.len(), "saved image");
            Ok::<_, Error>((url, path))
        })
        .buffered(options.concurrency.max(1))
        .try_collect()
        .await?;

    let mut map = ImageMap::new();
    for (url, path) in saved {
        map.insert(url, relative_path(&path, reference_dir)?);
    }
    Ok(map)
}

/// File name for the image at `index`
///
/// Plain `{index}_img` unless `keep_extension` is set, in which case the
/// extension comes from the URL path, then from the content type.
pub fn image_file_name(
    index: usize,
    url: &str,
    content_type: Option<&str>,
    keep_extension: bool,
) -> String {
    let base = format!("{index}_img");
    if !keep_extension {
        return base;
    }
    match extension_from_url(url).or_else(|| content_type.and_then(extension_from_mime)) {
        Some(ext) => format!("{base}.{ext}"),
        None => base,
    }
}

fn extension_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    let ext = Path::new(last).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn extension_from_mime(mime: &str) -> Option<String> {
    let ext = match mime {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/avif" => "avif",
        "image/bmp" => "bmp",
        "image/x-icon" | "image/vnd.microsoft.icon" => "ico",
        "image/tiff" => "tiff",
        _ => return None,
    };
    Some(ext.to_string())
}

/// `path` relative to `base`, always `/`-separated
fn relative_path(path: &Path, base: &Path) -> Result<String> {
    let rel = path.strip_prefix(base).map_err(|_| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "image path '{}' is not inside '{}'",
                path.display(),
                base.display()
            ),
        ))
    })?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}
