//! SEO checklist.

use super::{percent, Analyzer, Check, PageContext, Rule, RuleResult};
use crate::models::Category;
use crate::parse::LinkKind;

/// Scores on-page search engine signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeoAnalyzer;

const OPEN_GRAPH_PROPERTIES: [&str; 4] = ["og:title", "og:description", "og:image", "og:url"];

const RULES: &[Rule] = &[
    Rule {
        key: "http_status",
        label: "HTTP status",
        weight: 15,
        check: http_status,
    },
    Rule {
        key: "title",
        label: "Title tag",
        weight: 15,
        check: title,
    },
    Rule {
        key: "meta_description",
        label: "Meta description",
        weight: 15,
        check: meta_description,
    },
    Rule {
        key: "h1",
        label: "Single H1",
        weight: 10,
        check: h1,
    },
    Rule {
        key: "heading_hierarchy",
        label: "Heading hierarchy",
        weight: 5,
        check: heading_hierarchy,
    },
    Rule {
        key: "image_alt",
        label: "Image alt text",
        weight: 10,
        check: image_alt,
    },
    Rule {
        key: "links",
        label: "Links",
        weight: 5,
        check: links,
    },
    Rule {
        key: "crawl_directives",
        label: "Robots and sitemap",
        weight: 5,
        check: crawl_directives,
    },
    Rule {
        key: "viewport",
        label: "Viewport meta",
        weight: 5,
        check: viewport,
    },
    Rule {
        key: "structured_data",
        label: "Structured data",
        weight: 5,
        check: structured_data,
    },
    Rule {
        key: "open_graph",
        label: "Open Graph",
        weight: 5,
        check: open_graph,
    },
    Rule {
        key: "canonical",
        label: "Canonical URL",
        weight: 5,
        check: canonical,
    },
];

impl Analyzer for SeoAnalyzer {
    fn category(&self) -> Category {
        Category::Seo
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }
}

fn http_status(ctx: &PageContext<'_>) -> RuleResult {
    let status = ctx.fetch.status;
    Ok(match status {
        200..=299 => Check::pass_with(format!("HTTP {status}")),
        300..=399 => Check::warn(format!("HTTP {status} after following redirects")),
        _ => Check::fail(format!("HTTP {status}; search engines will not index this page")),
    })
}

/// Checks copy length in characters against an inclusive range.
fn copy_length(text: &str, (min, max): (usize, usize), what: &str) -> Check {
    let length = text.chars().count();
    if length < min {
        Check::warn(format!("{what} is {length} characters; aim for {min}–{max}"))
    } else if length > max {
        Check::warn(format!(
            "{what} is {length} characters and may be truncated; aim for {min}–{max}"
        ))
    } else {
        Check::pass_with(format!("{what} is {length} characters"))
    }
}

fn title(ctx: &PageContext<'_>) -> RuleResult {
    Ok(match ctx.document.title.as_deref() {
        Some(title) => copy_length(title, ctx.thresholds.title_chars, "Title"),
        None => Check::fail("Missing <title> element"),
    })
}

fn meta_description(ctx: &PageContext<'_>) -> RuleResult {
    Ok(match ctx.document.meta("description").map(str::trim) {
        Some(description) if !description.is_empty() => copy_length(
            description,
            ctx.thresholds.description_chars,
            "Meta description",
        ),
        _ => Check::fail("Missing meta description"),
    })
}

fn h1(ctx: &PageContext<'_>) -> RuleResult {
    let count = ctx.document.headings.iter().filter(|h| h.level == 1).count();
    Ok(match count {
        0 => Check::fail("No <h1> heading"),
        1 => Check::pass(),
        n => Check::warn(format!("{n} <h1> headings; use exactly one")),
    })
}

/// The outline may open at h1 or h2 (a missing h1 is the `h1` rule's
/// finding); anything deeper skips levels from the top.
fn heading_hierarchy(ctx: &PageContext<'_>) -> RuleResult {
    let mut skips = Vec::new();
    let mut previous: Option<u8> = None;
    for heading in &ctx.document.headings {
        let parent = previous.unwrap_or(1);
        if heading.level > parent + 1 {
            skips.push(match previous {
                Some(level) => format!("h{level} → h{}", heading.level),
                None => format!("first heading is h{}", heading.level),
            });
        }
        previous = Some(heading.level);
    }
    Ok(if skips.is_empty() {
        Check::pass()
    } else {
        Check::fail(format!("Heading levels skipped: {}", skips.join(", ")))
    })
}

fn image_alt(ctx: &PageContext<'_>) -> RuleResult {
    let images = &ctx.document.images;
    if images.is_empty() {
        return Ok(Check::pass_with("No images"));
    }
    let with_alt = images.iter().filter(|image| image.has_alt()).count();
    let coverage = percent(with_alt, images.len());
    let detail = format!("{with_alt}/{} images have alt text", images.len());
    Ok(if coverage == 100 {
        Check::pass_with(detail)
    } else if coverage >= 50 {
        Check::warn(detail)
    } else {
        Check::fail(detail)
    })
}

fn links(ctx: &PageContext<'_>) -> RuleResult {
    let links = &ctx.document.links;
    if links.is_empty() {
        return Ok(Check::fail("No links on the page"));
    }
    let broken = links
        .iter()
        .filter(|link| link.href.is_empty() || link.kind == LinkKind::Script)
        .count();
    let internal = links.iter().filter(|l| l.kind == LinkKind::Internal).count();
    let external = links.iter().filter(|l| l.kind == LinkKind::External).count();
    Ok(if broken > 0 {
        Check::warn(format!("{broken} links have an empty or javascript: href"))
    } else {
        Check::pass_with(format!("{internal} internal, {external} external links"))
    })
}

fn crawl_directives(ctx: &PageContext<'_>) -> RuleResult {
    let robots_meta = ctx.document.meta("robots");
    let robots_header = ctx.fetch.header_str("x-robots-tag")?;
    let noindex = [robots_meta, robots_header]
        .into_iter()
        .flatten()
        .any(|value| value.to_ascii_lowercase().contains("noindex"));
    if noindex {
        return Ok(Check::fail("Page is marked noindex"));
    }
    let sitemap = ctx.document.link_rel("sitemap").is_some();
    Ok(match (robots_meta.is_some(), sitemap) {
        (true, true) => Check::pass_with("Robots meta and sitemap link present"),
        (true, false) => Check::pass_with("Robots meta present"),
        (false, true) => Check::pass_with("Sitemap link present"),
        (false, false) => Check::warn("No robots meta tag or sitemap reference"),
    })
}

fn viewport(ctx: &PageContext<'_>) -> RuleResult {
    Ok(match ctx.document.viewport() {
        Some(content) if !content.trim().is_empty() => Check::pass(),
        _ => Check::fail("Missing viewport meta tag"),
    })
}

fn structured_data(ctx: &PageContext<'_>) -> RuleResult {
    let blocks = &ctx.document.json_ld;
    if blocks.is_empty() {
        return Ok(Check::fail("No application/ld+json structured data"));
    }
    let mut types = Vec::new();
    let mut invalid = 0;
    for block in blocks {
        match serde_json::from_str::<serde_json::Value>(block) {
            Ok(value) => collect_types(&value, &mut types),
            Err(e) => {
                log::debug!("Invalid JSON-LD block: {e}");
                invalid += 1;
            }
        }
    }
    Ok(if invalid > 0 {
        Check::warn(format!(
            "{invalid} of {} JSON-LD blocks are not valid JSON",
            blocks.len()
        ))
    } else if types.is_empty() {
        Check::pass_with(format!("{} JSON-LD blocks", blocks.len()))
    } else {
        Check::pass_with(format!("Schema types: {}", types.join(", ")))
    })
}

fn collect_types(value: &serde_json::Value, types: &mut Vec<String>) {
    match value {
        serde_json::Value::Array(items) => {
            for item in items {
                collect_types(item, types);
            }
        }
        serde_json::Value::Object(object) => {
            match object.get("@type") {
                Some(serde_json::Value::String(t)) => types.push(t.clone()),
                Some(serde_json::Value::Array(ts)) => {
                    types.extend(ts.iter().filter_map(|t| t.as_str()).map(str::to_string))
                }
                _ => {}
            }
            if let Some(graph) = object.get("@graph") {
                collect_types(graph, types);
            }
        }
        _ => {}
    }
}

fn open_graph(ctx: &PageContext<'_>) -> RuleResult {
    let missing: Vec<&str> = OPEN_GRAPH_PROPERTIES
        .iter()
        .copied()
        .filter(|property| {
            ctx.document
                .meta(property)
                .map_or(true, |content| content.trim().is_empty())
        })
        .collect();
    Ok(match missing.len() {
        0 => Check::pass(),
        n if n == OPEN_GRAPH_PROPERTIES.len() => Check::fail("No Open Graph tags"),
        _ => Check::warn(format!("Missing Open Graph tags: {}", missing.join(", "))),
    })
}

fn canonical(ctx: &PageContext<'_>) -> RuleResult {
    let Some(href) = ctx
        .document
        .link_rel("canonical")
        .and_then(|link| link.href.as_deref())
    else {
        return Ok(Check::fail("No canonical link"));
    };
    Ok(match ctx.fetch.final_url.join(href) {
        Ok(url) if url.host_str() == ctx.fetch.final_url.host_str() => {
            Check::pass_with(format!("Canonical: {url}"))
        }
        Ok(url) => Check::warn(format!("Canonical points to another host: {url}")),
        Err(e) => Check::warn(format!("Canonical href '{href}' is not a valid URL: {e}")),
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{status_of, Fixture};
    use crate::models::{Category, ItemStatus};

    const COMPLETE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <title>Acme Widgets: handmade widgets since 1999</title>
  <meta name="description" content="Acme builds durable handmade widgets for homes and workshops, shipped worldwide.">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="robots" content="index, follow">
  <meta property="og:title" content="Acme Widgets">
  <meta property="og:description" content="Handmade widgets">
  <meta property="og:image" content="https://acme.example.com/og.png">
  <meta property="og:url" content="https://acme.example.com/">
  <link rel="canonical" href="https://acme.example.com/">
  <link rel="sitemap" href="/sitemap.xml">
  <script type="application/ld+json">{"@context":"https://schema.org","@type":"Organization","name":"Acme"}</script>
</head>
<body>
  <h1>Acme Widgets</h1>
  <h2>Catalogue</h2>
  <h3>Gears</h3>
  <h2>About</h2>
  <img src="/a.jpg" alt="A gear">
  <a href="/catalogue">Catalogue</a>
  <a href="https://partner.example.org/">Partner</a>
</body>
</html>"#;

    fn seo(html: &str) -> crate::models::CategoryResult {
        Fixture::new("https://acme.example.com/", html).run(Category::Seo)
    }

    #[test]
    fn test_complete_page_scores_100() {
        let result = seo(COMPLETE);
        assert_eq!(result.failed_keys(), Vec::<&str>::new());
        assert_eq!(result.keys_with_status(ItemStatus::Warning), Vec::<&str>::new());
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_missing_basics_flags_exactly_those_items() {
        let html = COMPLETE
            .replace("<title>Acme Widgets: handmade widgets since 1999</title>", "")
            .replace(
                r#"<meta name="description" content="Acme builds durable handmade widgets for homes and workshops, shipped worldwide.">"#,
                "",
            )
            .replace("<h1>Acme Widgets</h1>", "")
            .replace(r#" alt="A gear""#, "");
        let degraded = seo(&html);
        // removing the h1 leaves h2 first, which is not a skip
        assert_eq!(
            degraded.failed_keys(),
            vec!["title", "meta_description", "h1", "image_alt"]
        );
        assert!(degraded.score < seo(COMPLETE).score);
        assert_eq!(degraded.score, 100 - 15 - 15 - 10 - 10);
    }

    #[test]
    fn test_title_length_warning() {
        let html = COMPLETE.replace("Acme Widgets: handmade widgets since 1999", "Acme");
        assert_eq!(status_of(&seo(&html), "title"), ItemStatus::Warning);
        let long = "x".repeat(80);
        let html = COMPLETE.replace("Acme Widgets: handmade widgets since 1999", &long);
        assert_eq!(status_of(&seo(&html), "title"), ItemStatus::Warning);
    }

    #[test]
    fn test_multiple_h1_and_skipped_levels() {
        let html = COMPLETE.replace("<h3>Gears</h3>", "<h1>Again</h1><h4>Deep</h4>");
        let result = seo(&html);
        assert_eq!(status_of(&result, "h1"), ItemStatus::Warning);
        assert_eq!(status_of(&result, "heading_hierarchy"), ItemStatus::Fail);
        assert!(result
            .item("heading_hierarchy")
            .and_then(|i| i.detail.as_deref())
            .is_some_and(|d| d.contains("h1 → h4")));
    }

    #[test]
    fn test_outline_starting_deep_skips_levels() {
        let html = COMPLETE
            .replace("<h1>Acme Widgets</h1>", "")
            .replace("<h2>Catalogue</h2>", "")
            .replace("<h2>About</h2>", "");
        let result = seo(&html);
        assert_eq!(status_of(&result, "heading_hierarchy"), ItemStatus::Fail);
        assert!(result
            .item("heading_hierarchy")
            .and_then(|i| i.detail.as_deref())
            .is_some_and(|d| d.contains("first heading is h3")));
    }

    #[test]
    fn test_svg_title_does_not_count_as_page_title() {
        let html = COMPLETE
            .replace("<title>Acme Widgets: handmade widgets since 1999</title>", "")
            .replace("<h1>Acme Widgets</h1>", "<h1>Acme<svg><title>Logo</title></svg></h1>");
        assert_eq!(status_of(&seo(&html), "title"), ItemStatus::Fail);
    }

    #[test]
    fn test_image_alt_coverage_bands() {
        let imgs = r#"<img src="/1.png" alt="1"><img src="/2.png">"#;
        let html = COMPLETE.replace(r#"<img src="/a.jpg" alt="A gear">"#, imgs);
        assert_eq!(status_of(&seo(&html), "image_alt"), ItemStatus::Warning);

        let html = COMPLETE.replace(r#"<img src="/a.jpg" alt="A gear">"#, "");
        assert_eq!(status_of(&seo(&html), "image_alt"), ItemStatus::Pass);
    }

    #[test]
    fn test_links_sanity() {
        let html = COMPLETE.replace(
            r#"<a href="/catalogue">Catalogue</a>"#,
            r#"<a href="javascript:void(0)">Catalogue</a>"#,
        );
        assert_eq!(status_of(&seo(&html), "links"), ItemStatus::Warning);
    }

    #[test]
    fn test_noindex_fails_crawl_directives() {
        let html = COMPLETE.replace("index, follow", "noindex");
        assert_eq!(status_of(&seo(&html), "crawl_directives"), ItemStatus::Fail);

        let result = Fixture::new("https://acme.example.com/", COMPLETE)
            .header("X-Robots-Tag", "noindex, nofollow")
            .run(Category::Seo);
        assert_eq!(status_of(&result, "crawl_directives"), ItemStatus::Fail);
    }

    #[test]
    fn test_invalid_json_ld_warns() {
        let html = COMPLETE.replace(r#""name":"Acme"}"#, r#""name":"Acme""#);
        assert_eq!(status_of(&seo(&html), "structured_data"), ItemStatus::Warning);
    }

    #[test]
    fn test_partial_open_graph_warns() {
        let html = COMPLETE.replace(
            r#"<meta property="og:image" content="https://acme.example.com/og.png">"#,
            "",
        );
        let result = seo(&html);
        assert_eq!(status_of(&result, "open_graph"), ItemStatus::Warning);
        assert!(result
            .item("open_graph")
            .and_then(|i| i.detail.as_deref())
            .is_some_and(|d| d.contains("og:image")));
    }

    #[test]
    fn test_error_status_fails() {
        let result = Fixture::new("https://acme.example.com/", COMPLETE)
            .with_fetch(|f| f.status = 404)
            .run(Category::Seo);
        assert_eq!(status_of(&result, "http_status"), ItemStatus::Fail);
    }

    #[test]
    fn test_empty_page_fails_most_rules() {
        let result = seo("");
        for key in ["title", "meta_description", "h1", "links", "viewport", "canonical"] {
            assert_eq!(status_of(&result, key), ItemStatus::Fail, "{key}");
        }
        assert_eq!(status_of(&result, "heading_hierarchy"), ItemStatus::Pass);
    }
}
