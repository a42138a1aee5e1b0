//! HTML to Markdown conversion and Markdown image reference scanning.

use html2md::common::get_tag_attr;
use html2md::containers::ContainerHandler;
use html2md::{Handle, StructuredPrinter, TagHandler, TagHandlerFactory};
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static IMAGE_REF: LazyLock<Regex> = LazyLock::new(|| {
    // URL: no whitespace, parentheses allowed one level deep
    Regex::new(r#"!\[.*?\]\(([^\s()]*(?:\([^\s()]*\)[^\s()]*)*)(?:\s+"[^"]*")?\)"#)
        .expect("image reference pattern is valid")
});

/// Convert rendered post HTML to Markdown
///
/// Uses the converter's default rules, except that every `<img>` becomes
/// `![alt](src "title")` even when it carries sizing attributes, and
/// `<figure>` is a block. Malformed HTML is handled best-effort.
pub fn html_to_markdown(html: &str) -> String {
    let mut handlers: HashMap<String, Box<dyn TagHandlerFactory>> = HashMap::new();
    handlers.insert("img".to_string(), Box::new(ImageHandler::default));
    handlers.insert("figure".to_string(), Box::new(ContainerHandler::default));
    html2md::parse_html_custom(html, &handlers)
}

/// Writes `<img>` as Markdown image syntax; images without `src` are dropped
#[derive(Default)]
struct ImageHandler;

impl TagHandler for ImageHandler {
    fn handle(&mut self, tag: &Handle, printer: &mut StructuredPrinter) {
        let Some(src) = get_tag_attr(tag, "src").filter(|src| !src.trim().is_empty()) else {
            return;
        };
        let alt = get_tag_attr(tag, "alt")
            .map(|alt| single_line(&alt).replace('[', "\\[").replace(']', "\\]"))
            .unwrap_or_default();
        let title = get_tag_attr(tag, "title")
            .map(|title| single_line(&title).replace('"', "'"))
            .filter(|title| !title.is_empty())
            .map(|title| format!(" \"{title}\""))
            .unwrap_or_default();
        let src = src.trim().replace(' ', "%20");
        printer.append_str(&format!("![{alt}]({src}{title})"));
    }

    fn after_handle(&mut self, _printer: &mut StructuredPrinter) {}
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One `![alt](url)` occurrence in a Markdown document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRef<'a> {
    /// Image URL exactly as written
    pub url: &'a str,
    /// Byte range of `url` within the document
    pub span: Range<usize>,
}

/// All image references of `markdown` in document order
pub fn image_refs(markdown: &str) -> Vec<ImageRef<'_>> {
    IMAGE_REF
        .captures_iter(markdown)
        .filter_map(|caps| caps.get(1))
        .filter(|m| !m.is_empty())
        .map(|m| ImageRef {
            url: m.as_str(),
            span: m.range(),
        })
        .collect()
}

/// Image URLs of `markdown` in document order, duplicates included
pub fn image_urls(markdown: &str) -> Vec<String> {
    image_refs(markdown)
        .into_iter()
        .map(|r| r.url.to_string())
        .collect()
}

/// Replace the URL of every image reference for which `replacement` returns
/// `Some`, leaving the rest of the document untouched.
pub fn rewrite_image_urls<'r, F>(markdown: &str, mut replacement: F) -> String
where
    F: FnMut(&str) -> Option<&'r str>,
{
    let mut out = String::with_capacity(markdown.len());
    let mut last = 0;
    for image in image_refs(markdown) {
        if let Some(new_url) = replacement(image.url) {
            out.push_str(&markdown[last..image.span.start]);
            out.push_str(new_url);
            last = image.span.end;
        }
    }
    out.push_str(&markdown[last..]);
    out
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_basic_html() {
        let md = html_to_markdown("<h2>Intro</h2><p>Some <em>text</em> with a <a href=\"https://x.com\">link</a>.</p>");
        assert!(md.contains("Intro"));
        assert!(md.contains("*text*"));
        assert!(md.contains("[link](https://x.com)"));
    }

    #[test]
    fn converted_images_keep_their_url() {
        let md = html_to_markdown("<p>Hi <img src='http://x/a.png'></p>");
        assert!(md.contains("Hi"));
        assert_eq!(image_urls(&md), vec!["http://x/a.png".to_string()]);
    }

    #[test]
    fn sized_images_become_markdown() {
        let html = r#"<p>Before</p><figure class="wp-block-image size-large"><img decoding="async" width="1024" height="576" src="https://x/wp-content/uploads/a-1024x576.png" alt="" class="wp-image-1"/></figure><p>After</p>"#;
        let md = html_to_markdown(html);
        assert!(!md.contains("<img"), "got:\n{md}");
        assert_eq!(
            image_urls(&md),
            vec!["https://x/wp-content/uploads/a-1024x576.png"]
        );
        // the figure is its own block
        assert!(md.contains("\n\n![](https://x/wp-content/uploads/a-1024x576.png)\n\n"), "got:\n{md}");
    }

    #[test]
    fn image_alt_and_title_are_kept() {
        let md = html_to_markdown(
            r#"<img src="http://x/cat.jpg" alt="a [small] cat" title="Say &quot;hi&quot;" align="left">"#,
        );
        assert_eq!(md, r#"![a \[small\] cat](http://x/cat.jpg "Say 'hi'")"#);
        assert_eq!(image_urls(&md), vec!["http://x/cat.jpg"]);
    }

    #[test]
    fn image_without_src_is_dropped() {
        let md = html_to_markdown("<p>text <img alt=\"nothing\"></p>");
        assert!(md.contains("text"));
        assert!(image_urls(&md).is_empty());
        assert!(!md.contains("nothing"));
    }

    #[test]
    fn finds_images_in_document_order_with_duplicates() {
        let md = "![a](http://x/1.png) text ![](http://x/2.png)\n\n![again](http://x/1.png)";
        assert_eq!(
            image_urls(md),
            vec!["http://x/1.png", "http://x/2.png", "http://x/1.png"]
        );
    }

    #[test]
    fn ignores_plain_links() {
        let md = "[not an image](http://x/page) and ![img](http://x/i.jpg)";
        assert_eq!(image_urls(md), vec!["http://x/i.jpg"]);
    }

    #[test]
    fn image_with_title() {
        let md = r#"![cat](http://x/cat.jpg "A cat")"#;
        let refs = image_refs(md);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].url, "http://x/cat.jpg");
        assert_eq!(&md[refs[0].span.clone()], "http://x/cat.jpg");
    }

    #[test]
    fn url_with_parentheses() {
        let md = "![w](http://x/File_(1).png)";
        assert_eq!(image_urls(md), vec!["http://x/File_(1).png"]);
    }

    #[test]
    fn adjacent_images_on_one_line() {
        let md = "![](http://x/a.png)![](http://x/b.png)";
        assert_eq!(image_urls(md), vec!["http://x/a.png", "http://x/b.png"]);
    }

    #[test]
    fn empty_url_is_not_an_image() {
        assert!(image_urls("![]() and ![x]( )").is_empty());
    }

    #[test]
    fn spans_cover_only_the_url() {
        let md = "intro ![alt](http://x/a.png) outro";
        let refs = image_refs(md);
        assert_eq!(&md[refs[0].span.clone()], "http://x/a.png");
        assert_eq!(refs[0].span.start, "intro ![alt](".len());
    }

    #[test]
    fn rewrite_touches_only_image_spans() {
        // second URL contains the first as a prefix, and the first appears as link text
        let md = "![](http://x/a.png) ![](http://x/a.png.webp) see http://x/a.png";
        let out = rewrite_image_urls(md, |url| match url {
            "http://x/a.png" => Some("_p_data/0_img"),
            _ => None,
        });
        assert_eq!(
            out,
            "![](_p_data/0_img) ![](http://x/a.png.webp) see http://x/a.png"
        );
    }

    #[test]
    fn rewrite_without_matches_is_identity() {
        let md = "# Title\n\n![x](http://x/a.png)\n";
        assert_eq!(rewrite_image_urls(md, |_| None), md);
        assert_eq!(rewrite_image_urls("", |_| Some("y")), "");
    }
}
