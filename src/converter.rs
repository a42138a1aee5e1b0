//! Post fetching and the post-to-Markdown pipeline.

use crate::config::{self, Config, Source};
use crate::error::Result;
use crate::frontmatter::FrontMatter;
use crate::http::HttpClient;
use crate::images::{self, ImageMap, ImageOptions};
use crate::markdown;
use crate::post::Post;
use crate::resolver;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Endpoint of post `id` under the posts collection `base`
///
/// Exactly one `/` separates the two, whatever the base ends with.
///
/// ```
/// use wp2md::converter::post_endpoint;
///
/// assert_eq!(
///     post_endpoint("https://example.com/wp-json/wp/v2/posts/", 42),
///     "https://example.com/wp-json/wp/v2/posts/42"
/// );
/// ```
pub fn post_endpoint(base: &str, id: u64) -> String {
    format!("{}/{id}", base.trim_end_matches('/'))
}

/// A fetched post and the state of its conversion
#[derive(Debug)]
pub struct WpPost {
    client: HttpClient,
    api_url: String,
    post: Post,
    image_map: ImageMap,
    image_options: ImageOptions,
}

impl WpPost {
    /// Fetch the post named by `source`
    ///
    /// URL sources go through endpoint discovery first; ID sources are joined
    /// onto `api_base`. One JSON request is made for the post itself.
    pub async fn fetch(client: HttpClient, source: &Source, api_base: &str) -> Result<Self> {
        let api_url = match source {
            Source::Url(url) => resolver::resolve_endpoint(&client, url).await?,
            Source::Id(id) => post_endpoint(api_base, *id),
        };
        debug!(api_url = %api_url, "fetching post");
        let value: Value = client.get_json(&api_url).await?;
        let post = Post::from_value(value)?;
        info!(
            api_url = %api_url,
            id = post.id(),
            slug = post.slug().unwrap_or_default(),
            "fetched post"
        );
        Ok(Self::new(client, api_url, post))
    }

    /// Wrap an already fetched post
    pub fn new(client: HttpClient, api_url: impl Into<String>, post: Post) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            post,
            image_map: ImageMap::new(),
            image_options: ImageOptions::default(),
        }
    }

    /// Set how images are downloaded
    pub fn with_image_options(mut self, options: ImageOptions) -> Self {
        self.image_options = options;
        self
    }

    /// Endpoint the post was fetched from
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// The fetched post
    pub fn post(&self) -> &Post {
        &self.post
    }

    /// Images downloaded so far
    pub fn image_map(&self) -> &ImageMap {
        &self.image_map
    }

    /// Post body converted to Markdown, with remote image URLs
    pub fn raw_markdown(&self) -> String {
        markdown::html_to_markdown(self.post.content_html())
    }

    /// Image URLs of the converted body in document order
    pub fn mdimages(&self) -> Vec<String> {
        markdown::image_urls(&self.raw_markdown())
    }

    /// Download the body's images into `dest_dir`, recording paths relative
    /// to `reference_dir`
    pub async fn save_images(&mut self, dest_dir: &Path, reference_dir: &Path) -> Result<()> {
        let urls = self.mdimages();
        let saved = images::download_images(
            &self.client,
            &urls,
            dest_dir,
            reference_dir,
            self.image_options,
        )
        .await?;
        for (url, path) in saved.iter() {
            self.image_map.insert(url, path);
        }
        Ok(())
    }

    /// Front matter block
    pub fn frontmatter(&self) -> String {
        FrontMatter::from_post(&self.post).render()
    }

    /// Front matter followed by the body, images relocated
    pub fn markdown(&self) -> String {
        let body = self.image_map.relocate(&self.raw_markdown());
        self.frontmatter() + &body
    }

    /// Write the post to `dest_dir/dest_file`
    ///
    /// `dest_file` defaults to `{slug}.md`. With `download` set, images go to
    /// `_{stem}_data/` beside the file. An existing file is overwritten.
    /// Returns the path written.
    pub async fn write_markdown(
        &mut self,
        dest_dir: &Path,
        dest_file: Option<&str>,
        download: bool,
    ) -> Result<PathBuf> {
        // resolved before any download so a missing slug leaves the disk alone
        let path = config::output_path(dest_dir, dest_file, self.post.slug())?;

        if download {
            let data_dir = images::data_dir_for(&path);
            self.save_images(&data_dir, dest_dir).await?;
        }

        info!(path = %path.display(), images = self.image_map.len(), "writing markdown");
        tokio::fs::write(&path, self.markdown()).await?;
        Ok(path)
    }
}

/// Run one conversion as described by `config`; returns the written path
pub async fn convert(config: &Config) -> Result<PathBuf> {
    config.validate()?;
    let client = HttpClient::new(&config.http)?;
    let mut post = WpPost::fetch(client, &config.source, &config.api_base)
        .await?
        .with_image_options(ImageOptions::from(&config.http));
    post.write_markdown(
        &config.dest_dir,
        config.dest_file.as_deref(),
        config.download_images,
    )
    .await
}
