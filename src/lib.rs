//! # wp2md
//!
//! Convert a single WordPress post into a Markdown file with front matter.
//!
//! The post is read from the site's public REST API (`/wp-json/wp/v2/posts`),
//! either by numeric ID or by discovering the API endpoint advertised in the
//! post's public page. The rendered HTML body is converted to Markdown, the
//! images it references can be downloaded next to the output file, and a
//! `---` front matter block (title, date, draft, description, image, slug) is
//! prepended.
//!
//! ## Quick Start
//!
//! ```no_run
//! use wp2md::{Config, Source};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::new(Source::parse("https://example.com/2024/01/hello/"));
//!     config.dest_dir = "content/posts".into();
//!
//!     let path = wp2md::convert(&config).await?;
//!     println!("Writing: {}", path.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Post fetching and the conversion pipeline
pub mod converter;
/// Error types
pub mod error;
/// Front matter derivation
pub mod frontmatter;
/// HTTP client wrapper
pub mod http;
/// Image download and link relocation
pub mod images;
/// HTML to Markdown conversion and image reference scanning
pub mod markdown;
/// WordPress post model
pub mod post;
/// API endpoint discovery from public pages
pub mod resolver;

// Re-export commonly used types
pub use config::{Config, HttpConfig, Source};
pub use converter::{WpPost, convert, post_endpoint};
pub use error::{Error, Result};
pub use frontmatter::FrontMatter;
pub use http::HttpClient;
pub use images::{ImageMap, ImageOptions};
pub use post::Post;
pub use resolver::{extract_endpoint, resolve_endpoint};
