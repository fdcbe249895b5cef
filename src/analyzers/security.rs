//! Security checklist: transport and response header hardening.

use super::{Analyzer, Check, PageContext, Rule, RuleResult};
use crate::config::{
    HEADER_CONTENT_SECURITY_POLICY, HEADER_REFERRER_POLICY, HEADER_STRICT_TRANSPORT_SECURITY,
    HEADER_X_CONTENT_TYPE_OPTIONS, HEADER_X_FRAME_OPTIONS,
};
use crate::error_handling::RuleEvaluationError;
use crate::models::Category;

/// Scores HTTPS usage, security headers and mixed content.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityAnalyzer;

/// HSTS `max-age` below this (180 days) only warns.
const HSTS_MIN_MAX_AGE_SECS: u64 = 15_552_000;

const CSP_REPORT_ONLY: &str = "content-security-policy-report-only";

const RULES: &[Rule] = &[
    Rule {
        key: "https",
        label: "HTTPS",
        weight: 30,
        check: https,
    },
    Rule {
        key: "hsts",
        label: "Strict-Transport-Security",
        weight: 15,
        check: hsts,
    },
    Rule {
        key: "csp",
        label: "Content-Security-Policy",
        weight: 15,
        check: csp,
    },
    Rule {
        key: "x_frame_options",
        label: "X-Frame-Options",
        weight: 10,
        check: x_frame_options,
    },
    Rule {
        key: "x_content_type_options",
        label: "X-Content-Type-Options",
        weight: 10,
        check: x_content_type_options,
    },
    Rule {
        key: "mixed_content",
        label: "Mixed content",
        weight: 15,
        check: mixed_content,
    },
    Rule {
        key: "referrer_policy",
        label: "Referrer-Policy",
        weight: 5,
        check: referrer_policy,
    },
];

impl Analyzer for SecurityAnalyzer {
    fn category(&self) -> Category {
        Category::Security
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }
}

fn https(ctx: &PageContext<'_>) -> RuleResult {
    Ok(if ctx.fetch.is_https() {
        Check::pass()
    } else if ctx.target.is_https() {
        Check::fail(format!("Redirected from HTTPS to {}", ctx.fetch.final_url))
    } else {
        Check::fail("Page is served over plain HTTP")
    })
}

/// `max-age` directive of an HSTS value.
fn hsts_max_age(value: &str) -> Option<u64> {
    value.split(';').find_map(|directive| {
        let (name, age) = directive.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("max-age")
            .then(|| age.trim().trim_matches('"').parse().ok())
            .flatten()
    })
}

fn hsts(ctx: &PageContext<'_>) -> RuleResult {
    if !ctx.fetch.is_https() {
        return Ok(Check::fail("HSTS requires HTTPS"));
    }
    let Some(value) = ctx.fetch.header_str(HEADER_STRICT_TRANSPORT_SECURITY)? else {
        return Ok(Check::fail("Missing Strict-Transport-Security header"));
    };
    Ok(match hsts_max_age(value) {
        None | Some(0) => Check::warn(format!("HSTS has no effective max-age: {value}")),
        Some(age) if age < HSTS_MIN_MAX_AGE_SECS => Check::warn(format!(
            "HSTS max-age is {age}s; use at least {HSTS_MIN_MAX_AGE_SECS}s"
        )),
        Some(_) => Check::pass_with(value.to_string()),
    })
}

/// The enforced CSP, from the header or a `<meta http-equiv>` tag.
fn content_security_policy<'a>(
    ctx: &'a PageContext<'_>,
) -> Result<Option<&'a str>, RuleEvaluationError> {
    if let Some(value) = ctx.fetch.header_str(HEADER_CONTENT_SECURITY_POLICY)? {
        return Ok(Some(value));
    }
    Ok(ctx.document.http_equiv(HEADER_CONTENT_SECURITY_POLICY))
}

fn csp(ctx: &PageContext<'_>) -> RuleResult {
    if let Some(policy) = content_security_policy(ctx)? {
        return Ok(Check::pass_with(policy.to_string()));
    }
    Ok(if ctx.fetch.has_header(CSP_REPORT_ONLY) {
        Check::warn("Content-Security-Policy is report-only and not enforced")
    } else {
        Check::fail("Missing Content-Security-Policy header")
    })
}

fn x_frame_options(ctx: &PageContext<'_>) -> RuleResult {
    if let Some(value) = ctx.fetch.header_str(HEADER_X_FRAME_OPTIONS)? {
        return Ok(
            if value.eq_ignore_ascii_case("deny") || value.eq_ignore_ascii_case("sameorigin") {
                Check::pass_with(value.to_string())
            } else {
                Check::warn(format!("Unrecognised X-Frame-Options value: {value}"))
            },
        );
    }
    // Browsers ignore frame-ancestors delivered through <meta http-equiv>
    let frame_ancestors = ctx
        .fetch
        .header_str(HEADER_CONTENT_SECURITY_POLICY)?
        .is_some_and(|policy| {
            policy.split(';').any(|directive| {
                directive
                    .trim()
                    .to_ascii_lowercase()
                    .starts_with("frame-ancestors")
            })
        });
    Ok(if frame_ancestors {
        Check::pass_with("Framing restricted by CSP frame-ancestors")
    } else {
        Check::fail("Missing X-Frame-Options header")
    })
}

fn x_content_type_options(ctx: &PageContext<'_>) -> RuleResult {
    Ok(match ctx.fetch.header_str(HEADER_X_CONTENT_TYPE_OPTIONS)? {
        Some(value) if value.eq_ignore_ascii_case("nosniff") => Check::pass(),
        Some(value) => Check::fail(format!(
            "X-Content-Type-Options must be nosniff, got {value}"
        )),
        None => Check::fail("Missing X-Content-Type-Options header"),
    })
}

fn mixed_content(ctx: &PageContext<'_>) -> RuleResult {
    if !ctx.fetch.is_https() {
        return Ok(Check::pass_with("Not applicable: page is not served over HTTPS"));
    }
    let insecure: Vec<&str> = ctx
        .document
        .subresources
        .iter()
        .filter(|resource| resource.url.scheme() == "http")
        .map(|resource| resource.url.as_str())
        .collect();
    Ok(match insecure.as_slice() {
        [] => Check::pass(),
        [first, rest @ ..] => Check::fail(format!(
            "{} resources loaded over HTTP, e.g. {first}{}",
            insecure.len(),
            if rest.is_empty() { "" } else { " …" }
        )),
    })
}

fn referrer_policy(ctx: &PageContext<'_>) -> RuleResult {
    let policy = match ctx.fetch.header_str(HEADER_REFERRER_POLICY)? {
        Some(value) => Some(value),
        None => ctx.document.meta("referrer"),
    };
    Ok(match policy {
        Some(value) if value.to_ascii_lowercase().contains("unsafe-url") => {
            Check::warn("Referrer-Policy unsafe-url leaks full URLs to other sites")
        }
        Some(value) => Check::pass_with(value.to_string()),
        None => Check::fail("Missing Referrer-Policy header"),
    })
}
