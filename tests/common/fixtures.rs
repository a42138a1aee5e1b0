//! WordPress page and post fixtures

use serde_json::{Value, json};

/// Route of the posts collection on the mock server
pub const POSTS_ROUTE: &str = "/wp-json/wp/v2/posts";

/// Minimal draft post with one inline image
pub fn hello_post(image_url: &str) -> Value {
    json!({
        "status": "draft",
        "slug": "hello",
        "title": {"rendered": "Hello"},
        "content": {"rendered": format!("<p>Hi <img src='{image_url}'></p>")},
        "date": "2024-01-01"
    })
}

/// Published post carrying every field that ends up in front matter, with
/// block-editor images (sized `<img>` inside `<figure>`)
pub fn full_post(base: &str) -> Value {
    json!({
        "id": 1234,
        "date": "2024-03-05T10:00:00",
        "slug": "full-post",
        "status": "publish",
        "link": format!("{base}/2024/03/full-post/"),
        "title": {"rendered": "A Full Post"},
        "content": {
            "rendered": format!(
                "<h2>Section</h2>\
                 <p>First</p>\
                 <figure class=\"wp-block-image size-large\"><img decoding=\"async\" width=\"1024\" height=\"576\" src=\"{base}/uploads/one.png\" alt=\"one\" class=\"wp-image-11\"/></figure>\
                 <p>Second <img loading=\"lazy\" width=\"300\" height=\"200\" src=\"{base}/uploads/two.jpg\" alt=\"two\"></p>\
                 <figure class=\"wp-block-image\"><img width=\"1024\" height=\"576\" src=\"{base}/uploads/one.png\" alt=\"one\"/><figcaption>First again</figcaption></figure>"
            ),
            "protected": false
        },
        "excerpt": {"rendered": "<p>Excerpt</p>"},
        "yoast_head_json": {"description": "Everything in one post"},
        "uagb_featured_image_src": {
            "large": [format!("{base}/uploads/cover-1024x768.png"), 1024, 768, true]
        }
    })
}

/// Public post page advertising `endpoint` the way WordPress themes do
pub fn post_page(endpoint: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en-US">
<head>
<meta charset="UTF-8" />
<title>A Full Post</title>
<link rel="https://api.w.org/" href="https://example.com/wp-json/" />
<link rel="alternate" type="application/json" href="{endpoint}" />
<link rel="EditURI" type="application/rsd+xml" title="RSD" href="https://example.com/xmlrpc.php?rsd" />
</head>
<body><article>...</article></body>
</html>"#
    )
}
