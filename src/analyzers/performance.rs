//! Performance checklist: timing, payload and request weight.

use super::{Analyzer, Check, PageContext, Rule, RuleResult};
use crate::config::{CACHING_HEADERS, HEADER_CACHE_CONTROL, HEADER_CONTENT_ENCODING};
use crate::models::Category;

/// Scores load time, payload size, request count and transfer hygiene.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceAnalyzer;

const RULES: &[Rule] = &[
    Rule {
        key: "load_time",
        label: "Load time",
        weight: 25,
        check: load_time,
    },
    Rule {
        key: "page_size",
        label: "Page size",
        weight: 20,
        check: page_size,
    },
    Rule {
        key: "request_count",
        label: "Request count",
        weight: 20,
        check: request_count,
    },
    Rule {
        key: "compression",
        label: "Compression",
        weight: 20,
        check: compression,
    },
    Rule {
        key: "render_blocking_scripts",
        label: "Render-blocking scripts",
        weight: 10,
        check: render_blocking_scripts,
    },
    Rule {
        key: "caching",
        label: "Browser caching",
        weight: 5,
        check: caching,
    },
];

impl Analyzer for PerformanceAnalyzer {
    fn category(&self) -> Category {
        Category::Performance
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }
}

fn format_kb(bytes: usize) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

fn load_time(ctx: &PageContext<'_>) -> RuleResult {
    let elapsed = ctx.fetch.elapsed;
    let millis = elapsed.as_millis();
    Ok(if elapsed < ctx.thresholds.load_time_good {
        Check::pass_with(format!("Loaded in {millis} ms"))
    } else if elapsed < ctx.thresholds.load_time_acceptable {
        Check::warn(format!(
            "Loaded in {millis} ms; aim for under {} ms",
            ctx.thresholds.load_time_good.as_millis()
        ))
    } else {
        Check::fail(format!(
            "Loaded in {millis} ms, above the {} ms limit",
            ctx.thresholds.load_time_acceptable.as_millis()
        ))
    })
}

fn page_size(ctx: &PageContext<'_>) -> RuleResult {
    let size = ctx.fetch.transfer_size;
    let thresholds = ctx.thresholds;
    Ok(if ctx.fetch.truncated || size > thresholds.page_size_max_bytes {
        Check::fail(format!(
            "Document weighs {}, above the {} limit",
            format_kb(size),
            format_kb(thresholds.page_size_max_bytes)
        ))
    } else if size > thresholds.page_size_good_bytes {
        Check::warn(format!(
            "Document weighs {}; aim for under {}",
            format_kb(size),
            format_kb(thresholds.page_size_good_bytes)
        ))
    } else {
        Check::pass_with(format!("Document weighs {}", format_kb(size)))
    })
}

fn request_count(ctx: &PageContext<'_>) -> RuleResult {
    let count = ctx.document.request_count();
    let thresholds = ctx.thresholds;
    Ok(if count > thresholds.request_count_max {
        Check::fail(format!(
            "{count} scripts, stylesheets and images referenced (limit {})",
            thresholds.request_count_max
        ))
    } else if count > thresholds.request_count_good {
        Check::warn(format!(
            "{count} scripts, stylesheets and images referenced; aim for {} or fewer",
            thresholds.request_count_good
        ))
    } else {
        Check::pass_with(format!("{count} sub-resources referenced"))
    })
}

fn compression(ctx: &PageContext<'_>) -> RuleResult {
    let encoding = ctx.fetch.header_str(HEADER_CONTENT_ENCODING)?;
    Ok(match encoding {
        Some(encoding) if !encoding.eq_ignore_ascii_case("identity") => {
            Check::pass_with(format!("Served with {encoding}"))
        }
        _ => Check::fail("Response is not compressed (no gzip or brotli content-encoding)"),
    })
}

fn render_blocking_scripts(ctx: &PageContext<'_>) -> RuleResult {
    let blocking: Vec<&str> = ctx
        .document
        .scripts
        .iter()
        .filter(|script| script.is_render_blocking())
        .filter_map(|script| script.src.as_deref())
        .collect();
    Ok(match blocking.len() {
        0 => Check::pass(),
        1 | 2 => Check::warn(format!(
            "Synchronous scripts in <head>: {}; add async or defer",
            blocking.join(", ")
        )),
        n => Check::fail(format!(
            "{n} synchronous scripts in <head> block rendering; add async or defer"
        )),
    })
}

fn caching(ctx: &PageContext<'_>) -> RuleResult {
    if let Some(cache_control) = ctx.fetch.header_str(HEADER_CACHE_CONTROL)? {
        let lower = cache_control.to_ascii_lowercase();
        if lower.contains("no-store") {
            return Ok(Check::warn(format!(
                "cache-control: {cache_control} disables browser caching"
            )));
        }
        return Ok(Check::pass_with(format!("cache-control: {cache_control}")));
    }
    let validators: Vec<&str> = CACHING_HEADERS
        .iter()
        .copied()
        .filter(|name| ctx.fetch.has_header(name))
        .collect();
    Ok(if validators.is_empty() {
        Check::fail("No cache-control, etag, last-modified or expires header")
    } else {
        Check::pass_with(format!("Cache validators: {}", validators.join(", ")))
    })
}
