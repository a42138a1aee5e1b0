//! Endpoint discovery from a public post page.
//!
//! WordPress advertises the REST representation of every post in the page
//! head:
//!
//! ```html
//! <link rel="alternate" type="application/json" href="https://example.com/wp-json/wp/v2/posts/42" />
//! ```
//!
//! The first such link is the endpoint the post is fetched from.

use crate::error::{Error, Result};
use crate::http::HttpClient;
use regex::Regex;
use std::sync::LazyLock;
use tracing::info;

#[allow(clippy::expect_used)]
static ENDPOINT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link rel="alternate" type="application/json" href="([^"\s]+)""#)
        .expect("endpoint link pattern is valid")
});

/// Return the href of the first alternate JSON link in `html`, verbatim.
pub fn extract_endpoint(html: &str) -> Option<&str> {
    ENDPOINT_LINK
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Fetch the public page at `url` and return the post's API endpoint.
///
/// # Errors
///
/// - [`Error::Resolution`] if the page has no alternate JSON link
/// - fetch errors from [`HttpClient::get_text`]
pub async fn resolve_endpoint(client: &HttpClient, url: &str) -> Result<String> {
    let page = client.get_text(url).await?;
    let endpoint = extract_endpoint(&page).ok_or_else(|| Error::Resolution {
        url: url.to_string(),
    })?;
    info!(url, endpoint, "resolved API endpoint");
    Ok(endpoint.to_string())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head>
<link rel="alternate" type="application/rss+xml" title="Feed" href="https://example.com/feed/" />
<link rel="https://api.w.org/" href="https://example.com/wp-json/" />
<link rel="alternate" type="application/json" href="https://example.com/wp-json/wp/v2/posts/1234" />
<link rel="alternate" type="application/json" href="https://example.com/wp-json/wp/v2/posts/9999" />
</head><body></body></html>"#;

    #[test]
    fn extracts_first_json_link() {
        assert_eq!(
            extract_endpoint(PAGE),
            Some("https://example.com/wp-json/wp/v2/posts/1234")
        );
    }

    #[test]
    fn href_is_returned_verbatim() {
        let html = r#"<link rel="alternate" type="application/json" href="HTTP://Example.com/wp-json/wp/v2/posts/7?x=1&amp;y=2">"#;
        assert_eq!(
            extract_endpoint(html),
            Some("HTTP://Example.com/wp-json/wp/v2/posts/7?x=1&amp;y=2")
        );
    }

    #[test]
    fn self_closing_tag_without_space() {
        let html = r#"<link rel="alternate" type="application/json" href="https://e.com/wp-json/wp/v2/posts/3"/>"#;
        assert_eq!(
            extract_endpoint(html),
            Some("https://e.com/wp-json/wp/v2/posts/3")
        );
    }

    #[test]
    fn pages_without_json_link_yield_none() {
        assert_eq!(extract_endpoint("<html><head></head></html>"), None);
        assert_eq!(
            extract_endpoint(
                r#"<link rel="alternate" type="application/rss+xml" href="https://e.com/feed/" />"#
            ),
            None
        );
    }

    #[tokio::test]
    async fn resolve_endpoint_fetches_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2024/01/hello/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(&HttpConfig::default()).unwrap();
        let endpoint = resolve_endpoint(&client, &format!("{}/2024/01/hello/", server.uri()))
            .await
            .unwrap();
        assert_eq!(endpoint, "https://example.com/wp-json/wp/v2/posts/1234");
    }

    #[tokio::test]
    async fn resolve_endpoint_fails_on_plain_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/about"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nothing</html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new(&HttpConfig::default()).unwrap();
        let url = format!("{}/about", server.uri());
        let err = resolve_endpoint(&client, &url).await.unwrap_err();
        match err {
            Error::Resolution { url: failed } => assert_eq!(failed, url),
            other => panic!("expected Resolution error, got {other:?}"),
        }
    }
}
