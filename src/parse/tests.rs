// Parse module tests.

use super::*;

fn base() -> Url {
    Url::parse("https://example.com/blog/post").unwrap()
}

fn parse(html: &str) -> ParsedDocument {
    ParsedDocument::parse(html, &base())
}

#[test]
fn test_title_collapses_whitespace() {
    let doc = parse("<html><head><title>\n   Test\n   Page  </title></head></html>");
    assert_eq!(doc.title.as_deref(), Some("Test Page"));
}

#[test]
fn test_title_with_html_entities() {
    let doc = parse("<html><head><title>Test &amp; Page</title></head></html>");
    assert_eq!(doc.title.as_deref(), Some("Test & Page"));
}

#[test]
fn test_empty_or_missing_title_is_none() {
    assert!(parse("<html><head><title>  </title></head></html>").title.is_none());
    assert!(parse("<html><head></head></html>").title.is_none());
}

#[test]
fn test_svg_title_is_not_the_document_title() {
    let doc = parse("<html><head></head><body><svg><title>Icon</title></svg></body></html>");
    assert!(doc.title.is_none());

    let doc = parse(
        "<html><head><title>Real</title></head><body><svg><title>Icon</title></svg></body></html>",
    );
    assert_eq!(doc.title.as_deref(), Some("Real"));

    let doc = parse("<html><body><svg><title>Icon</title></svg><title>Late</title></body></html>");
    assert_eq!(doc.title.as_deref(), Some("Late"));
}

#[test]
fn test_lang_from_root_element() {
    assert_eq!(parse(r#"<html lang="fr"><body></body></html>"#).lang.as_deref(), Some("fr"));
    assert!(parse(r#"<html lang=""><body></body></html>"#).lang.is_none());
    assert!(parse("<html><body></body></html>").lang.is_none());
}

#[test]
fn test_meta_keys_lowercased_last_one_wins() {
    let doc = parse(
        r#"<html><head>
        <meta charset="utf-8">
        <meta name="Description" content="first">
        <meta name="description" content="second">
        <meta property="og:Title" content="OG">
        <meta http-equiv="Content-Security-Policy" content="default-src 'self'">
        </head></html>"#,
    );
    assert_eq!(doc.meta("description"), Some("second"));
    assert_eq!(doc.meta("DESCRIPTION"), Some("second"));
    assert_eq!(doc.meta("og:title"), Some("OG"));
    assert_eq!(doc.meta("charset"), Some("utf-8"));
    assert_eq!(
        doc.http_equiv("content-security-policy"),
        Some("default-src 'self'")
    );
}

#[test]
fn test_viewport_accessor() {
    let doc = parse(
        r#"<html><head><meta name="viewport" content="width=device-width, initial-scale=1"></head></html>"#,
    );
    assert_eq!(doc.viewport(), Some("width=device-width, initial-scale=1"));
    assert!(parse("<html></html>").viewport().is_none());
}

#[test]
fn test_headings_in_document_order() {
    let doc = parse("<body><h2>Intro</h2><h1>Main <em>title</em></h1><h4>Deep</h4></body>");
    let levels: Vec<u8> = doc.headings.iter().map(|h| h.level).collect();
    assert_eq!(levels, vec![2, 1, 4]);
    assert_eq!(doc.headings[1].text, "Main title");
}

#[test]
fn test_images_alt_and_srcset() {
    let doc = parse(
        r#"<body>
        <img src="/a.png" alt="A">
        <img src="/b.png" alt="">
        <img src="/c.png">
        <picture><img src="/d.png" srcset="/d@2x.png 2x" alt="D"></picture>
        </body>"#,
    );
    assert_eq!(doc.images.len(), 4);
    let with_alt = doc.images.iter().filter(|i| i.has_alt()).count();
    assert_eq!(with_alt, 3);
    assert!(doc.images[3].has_srcset);
    assert!(doc.has_picture);
}

#[test]
fn test_links_are_classified() {
    let doc = parse(
        r##"<body>
        <a href="/about">About</a>
        <a href="https://www.example.com/contact">Contact</a>
        <a href="https://other.org/">Other</a>
        <a href="#top">Top</a>
        <a href="mailto:hi@example.com">Mail</a>
        <a href="javascript:void(0)">Click</a>
        <a href="">Empty</a>
        <a href="ftp://files.example.com/x" rel="nofollow noopener">FTP</a>
        </body>"##,
    );
    let kinds: Vec<LinkKind> = doc.links.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LinkKind::Internal,
            LinkKind::Internal,
            LinkKind::External,
            LinkKind::Fragment,
            LinkKind::Mail,
            LinkKind::Script,
            LinkKind::Other,
            LinkKind::Other,
        ]
    );
    assert!(doc.links[7].nofollow);
    assert!(!doc.links[0].nofollow);
}

#[test]
fn test_classify_link_relative_paths() {
    let base = base();
    assert_eq!(classify_link("../other", &base), LinkKind::Internal);
    assert_eq!(classify_link("//cdn.example.net/x.js", &base), LinkKind::External);
    assert_eq!(classify_link("tel:+33100000000", &base), LinkKind::Mail);
    assert_eq!(classify_link("   ", &base), LinkKind::Other);
}

#[test]
fn test_link_rels_and_stylesheets() {
    let doc = parse(
        r#"<html><head>
        <link rel="canonical" href="https://example.com/blog/post">
        <link rel="stylesheet" href="/main.css">
        <link rel="Stylesheet" href="/print.css" media="print">
        <link rel="preload" href="/font.woff2" as="font">
        </head></html>"#,
    );
    assert_eq!(
        doc.link_rel("canonical").and_then(|l| l.href.as_deref()),
        Some("https://example.com/blog/post")
    );
    assert_eq!(doc.stylesheets, vec!["/main.css", "/print.css"]);
    assert_eq!(doc.media_query_count(), 1);
}

#[test]
fn test_scripts_location_and_loading() {
    let doc = parse(
        r#"<html><head>
        <script src="/blocking.js"></script>
        <script src="/async.js" async></script>
        <script src="/defer.js" defer></script>
        <script type="module" src="/app.mjs"></script>
        <script type="application/ld+json">{"@type":"WebSite"}</script>
        </head><body><script src="/footer.js"></script></body></html>"#,
    );
    assert_eq!(doc.scripts.len(), 6);
    let blocking: Vec<_> = doc
        .scripts
        .iter()
        .filter(|s| s.is_render_blocking())
        .filter_map(|s| s.src.as_deref())
        .collect();
    assert_eq!(blocking, vec!["/blocking.js"]);
    assert!(!doc.scripts[5].in_head);
    assert!(!doc.scripts[4].is_javascript());
    assert_eq!(doc.json_ld, vec![r#"{"@type":"WebSite"}"#]);
}

#[test]
fn test_request_count() {
    let doc = parse(
        r#"<html><head><link rel="stylesheet" href="/a.css"><script src="/a.js"></script>
        <script>inline()</script></head><body><img src="/a.png"><img></body></html>"#,
    );
    assert_eq!(doc.request_count(), 3);
}

#[test]
fn test_subresources_resolved_against_base() {
    let doc = parse(
        r#"<html><head>
        <link rel="stylesheet" href="http://insecure.example.com/a.css">
        <link rel="canonical" href="http://example.com/">
        </head><body>
        <img src="img/photo.jpg">
        <img src="data:image/png;base64,AAAA">
        <iframe src="http://video.example.org/embed"></iframe>
        </body></html>"#,
    );
    let urls: Vec<&str> = doc.subresources.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "http://insecure.example.com/a.css",
            "https://example.com/blog/img/photo.jpg",
            "http://video.example.org/embed",
        ]
    );
}

#[test]
fn test_form_controls_label_association() {
    let doc = parse(
        r#"<body><form>
        <label for="email">Email</label><input id="email" type="email">
        <label>Name <input name="name"></label>
        <input aria-label="Search" type="search">
        <input placeholder="Phone" type="tel">
        <select id="country"></select>
        <textarea title="Message"></textarea>
        <input type="hidden" name="token">
        <input type="submit" value="Send">
        </form></body>"#,
    );
    let labelled: Vec<bool> = doc.controls.iter().map(|c| c.has_label).collect();
    assert_eq!(labelled, vec![true, true, true, false, false, true]);
    assert!(doc.controls[3].has_placeholder);
    assert_eq!(doc.controls[0].input_type.as_deref(), Some("email"));
    assert_eq!(doc.controls[1].input_type.as_deref(), Some("text"));
    assert_eq!(doc.controls[4].tag, "select");
}

#[test]
fn test_aria_roles_and_landmarks() {
    let doc = parse(
        r#"<body>
        <header>Top</header>
        <div role="navigation" aria-label="Primary">Nav</div>
        <main id="content">Body</main>
        <div role="contentinfo">Footer</div>
        <span role="Button" aria-pressed="false">Toggle</span>
        </body>"#,
    );
    assert!(doc.roles.contains(&"button".to_string()));
    assert_eq!(
        doc.landmarks.iter().copied().collect::<Vec<_>>(),
        vec!["banner", "contentinfo", "main", "navigation"]
    );
    assert!(doc
        .aria
        .iter()
        .any(|a| a.name == "aria-label" && a.value == "Primary"));
    assert!(doc.ids.contains("content"));
}

#[test]
fn test_interactive_accessible_names() {
    let doc = parse(
        r#"<body>
        <span id="lbl">Close dialog</span>
        <a href="/home">Home</a>
        <a href="/x"><img src="/x.png" alt="Profile"></a>
        <a href="/y"><img src="/y.png"></a>
        <button aria-labelledby="lbl"></button>
        <button aria-labelledby="missing"></button>
        <button title="Menu"></button>
        <input type="submit">
        <input type="button">
        </body>"#,
    );
    let named: Vec<bool> = doc.interactive.iter().map(|i| i.has_accessible_name).collect();
    assert_eq!(named, vec![true, true, false, true, false, true, true, false]);
}

#[test]
fn test_aria_hidden_focusable() {
    let doc = parse(
        r#"<body>
        <div aria-hidden="true"><a href="/x">Hidden link</a><span>text</span></div>
        <div aria-hidden="true"><button tabindex="-1">Skip</button></div>
        <div aria-hidden="false"><a href="/y">Visible</a></div>
        </body>"#,
    );
    assert_eq!(doc.aria_hidden_focusable, vec!["a"]);
}

#[test]
fn test_inline_css_and_style_attributes() {
    let doc = parse(
        r#"<html><head><style>
        body { font-size: 14px; }
        @media (max-width: 600px) { .col { width: 100%; } }
        </style></head>
        <body class="container main">
        <a href="/x" style="width: 30px; height: 30px" class="btn btn-primary">X</a>
        <p style="color: red">Text</p>
        </body></html>"#,
    );
    assert_eq!(doc.inline_css.len(), 1);
    assert_eq!(doc.media_query_count(), 1);
    assert_eq!(doc.style_attributes.len(), 2);
    assert!(doc.style_attributes[0].interactive);
    assert!(!doc.style_attributes[1].interactive);
    assert!(doc.class_tokens.contains("btn-primary"));
    assert!(doc.class_tokens.contains("container"));
}

#[test]
fn test_css_rules_flatten_media_blocks() {
    let parsed = css::rules(
        "/* reset */ @import url(base.css); html, Body { font-size: 62.5% !important; margin: 0 }
         @media (min-width: 40em) { body { font-size: 1rem } }",
    );
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].selectors, vec!["html", "body"]);
    assert_eq!(parsed[0].value("font-size"), Some("62.5%"));
    assert_eq!(parsed[1].selectors, vec!["body"]);
    assert_eq!(parsed[1].value("font-size"), Some("1rem"));
}

#[test]
fn test_css_lengths() {
    assert_eq!(css::length_px("44px"), Some(44.0));
    assert_eq!(css::length_px("2rem"), Some(32.0));
    assert_eq!(css::length_px("0"), Some(0.0));
    assert_eq!(css::length_px("12pt"), Some(16.0));
    assert_eq!(css::length_px("50%"), None);
    assert_eq!(css::length_px("calc(1px + 2em)"), None);
    assert_eq!(css::font_size_px("62.5%"), Some(10.0));
    assert_eq!(css::font_size_px("small"), Some(13.0));
    assert_eq!(css::font_shorthand_size_px("italic 14px/1.5 Arial"), Some(14.0));
}

#[test]
fn test_malformed_html_does_not_panic() {
    let inputs = [
        "",
        "<<<>>>",
        "<html><head><title>Unclosed",
        "<div><p><span></div></p>",
        "<a href=\"\u{0}\">x</a><img src=\"\u{1F600}\">",
        "<meta name=description>",
        "<style>body { font-size: </style>",
    ];
    for input in inputs {
        let doc = parse(input);
        assert!(doc.headings.len() <= 1);
    }
}

#[test]
fn test_parse_is_deterministic() {
    let html = r#"<html lang="en"><head><title>T</title><meta name="a" content="1"></head>
        <body><h1>T</h1><a href="/x">x</a><img src="/i.png" alt=""></body></html>"#;
    assert_eq!(parse(html), parse(html));
}
