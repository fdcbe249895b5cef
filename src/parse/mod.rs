//! HTML parsing and fact extraction.
//!
//! `ParsedDocument::parse` turns raw markup into plain owned data the
//! analyzers can read from any task:
//! - Head facts: title, language, meta tags, `<link rel>`, scripts, JSON-LD
//! - Content: headings, images, links, sub-resources
//! - Forms and ARIA: control labelling, roles, landmarks, accessible names
//! - Styling: `<style>` blocks, `style` attributes, class tokens
//!
//! Parsing is total: malformed markup yields whatever `scraper` recovers and
//! absent elements yield empty collections.

mod aria;
pub mod css;
mod document;
mod forms;
mod links;

use std::collections::{BTreeSet, HashMap, HashSet};

use scraper::Html;
use url::Url;

pub use links::{classify_link, LinkKind};

/// A heading element (`h1`–`h6`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,
    /// Whitespace-collapsed text content
    pub text: String,
}

/// An `<img>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// `src` attribute, if any
    pub src: Option<String>,
    /// `alt` attribute, if present (may be empty for decorative images)
    pub alt: Option<String>,
    /// Whether `srcset` or `sizes` is set
    pub has_srcset: bool,
}

impl Image {
    /// Whether the `alt` attribute is present.
    pub fn has_alt(&self) -> bool {
        self.alt.is_some()
    }
}

/// An `<a href>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Raw `href` value, trimmed
    pub href: String,
    /// Whitespace-collapsed link text
    pub text: String,
    /// Classification relative to the page URL
    pub kind: LinkKind,
    /// `rel` contains `nofollow`
    pub nofollow: bool,
}

/// A `<link rel=… href=…>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRel {
    /// Lowercased `rel` tokens
    pub rel: Vec<String>,
    /// `href` attribute
    pub href: Option<String>,
    /// `media` attribute
    pub media: Option<String>,
}

impl LinkRel {
    /// Whether `rel` includes `token` (case-insensitive).
    pub fn has_rel(&self, token: &str) -> bool {
        self.rel.iter().any(|r| r.eq_ignore_ascii_case(token))
    }
}

/// A `<script>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    /// `src` attribute, `None` for inline scripts
    pub src: Option<String>,
    /// Located inside `<head>`
    pub in_head: bool,
    /// `async` attribute present
    pub is_async: bool,
    /// `defer` attribute present
    pub is_defer: bool,
    /// `type="module"`
    pub is_module: bool,
    /// Lowercased `type` attribute
    pub script_type: Option<String>,
}

impl Script {
    /// Whether this is executable JavaScript (not a data block such as JSON-LD).
    pub fn is_javascript(&self) -> bool {
        match self.script_type.as_deref() {
            None | Some("") | Some("module") => true,
            Some(t) => t.contains("javascript") || t.contains("ecmascript"),
        }
    }

    /// External classic script that blocks rendering while it loads.
    pub fn is_render_blocking(&self) -> bool {
        self.in_head
            && self.src.is_some()
            && self.is_javascript()
            && !self.is_async
            && !self.is_defer
            && !self.is_module
    }
}

/// A resource the page loads (image, script, stylesheet, frame, media).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subresource {
    /// Element name
    pub element: String,
    /// Absolute URL, resolved against the page URL
    pub url: Url,
}

/// A labellable form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControl {
    /// `input`, `select` or `textarea`
    pub tag: String,
    /// Lowercased `type` for inputs
    pub input_type: Option<String>,
    /// `id` attribute
    pub id: Option<String>,
    /// Associated label: `label[for]`, wrapping label, `aria-label(ledby)` or `title`
    pub has_label: bool,
    /// `placeholder` set (not a substitute for a label)
    pub has_placeholder: bool,
}

/// One `aria-*` attribute occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AriaAttribute {
    /// Element name
    pub element: String,
    /// Attribute name (lowercase, `aria-` prefix included)
    pub name: String,
    /// Attribute value
    pub value: String,
}

/// A link, button or button-like control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interactive {
    /// Element name
    pub tag: String,
    /// Has text, `aria-label`, resolvable `aria-labelledby`, `title`, image alt or button value
    pub has_accessible_name: bool,
}

/// An element carrying a `style` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleAttribute {
    /// Element name
    pub element: String,
    /// Raw `style` value
    pub style: String,
    /// Element is a link, button or form control
    pub interactive: bool,
}

/// Facts extracted from one HTML document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// First `<title>` text, `None` when missing or empty
    pub title: Option<String>,
    /// `lang` attribute of the root element
    pub lang: Option<String>,
    /// Meta tags keyed by lowercased `name`/`property`, `http-equiv:<name>` or `charset`
    pub meta: HashMap<String, String>,
    /// Headings in document order
    pub headings: Vec<Heading>,
    /// Images in document order
    pub images: Vec<Image>,
    /// `<picture>` is used
    pub has_picture: bool,
    /// Anchors with an `href`
    pub links: Vec<Link>,
    /// `<link>` elements
    pub link_rels: Vec<LinkRel>,
    /// Scripts in document order
    pub scripts: Vec<Script>,
    /// Stylesheet hrefs
    pub stylesheets: Vec<String>,
    /// Raw text of `application/ld+json` blocks
    pub json_ld: Vec<String>,
    /// Loaded resources with a resolvable URL
    pub subresources: Vec<Subresource>,
    /// Form controls that need a label
    pub controls: Vec<FormControl>,
    /// `aria-*` attributes
    pub aria: Vec<AriaAttribute>,
    /// `role` tokens, lowercased
    pub roles: Vec<String>,
    /// Landmark roles present, from elements or explicit roles
    pub landmarks: BTreeSet<&'static str>,
    /// Element ids
    pub ids: HashSet<String>,
    /// Links and buttons
    pub interactive: Vec<Interactive>,
    /// Elements with `aria-hidden="true"` that can still take focus
    pub aria_hidden_focusable: Vec<String>,
    /// Text of every `<style>` block
    pub inline_css: Vec<String>,
    /// `style` attributes
    pub style_attributes: Vec<StyleAttribute>,
    /// Every class token used
    pub class_tokens: HashSet<String>,
}

impl ParsedDocument {
    /// Parses `html`, resolving relative URLs against `base`.
    pub fn parse(html: &str, base: &Url) -> Self {
        let document = Html::parse_document(html);
        if !document.errors.is_empty() {
            log::trace!("html5ever reported {} parse errors", document.errors.len());
        }

        let mut parsed = ParsedDocument {
            title: document::extract_title(&document),
            lang: document::extract_lang(&document),
            meta: document::extract_meta(&document),
            headings: document::extract_headings(&document),
            images: document::extract_images(&document),
            has_picture: document::has_picture(&document),
            links: links::extract_links(&document, base),
            link_rels: document::extract_link_rels(&document),
            scripts: document::extract_scripts(&document),
            json_ld: document::extract_json_ld(&document),
            subresources: document::extract_subresources(&document, base),
            ids: aria::extract_ids(&document),
            inline_css: css::extract_inline_css(&document),
            style_attributes: css::extract_style_attributes(&document),
            class_tokens: css::extract_class_tokens(&document),
            ..Default::default()
        };
        parsed.stylesheets = parsed
            .link_rels
            .iter()
            .filter(|link| link.has_rel("stylesheet"))
            .filter_map(|link| link.href.clone())
            .collect();
        parsed.controls = forms::extract_controls(&document);
        parsed.aria = aria::extract_aria_attributes(&document);
        parsed.roles = aria::extract_roles(&document);
        parsed.landmarks = aria::extract_landmarks(&document);
        parsed.interactive = aria::extract_interactive(&document, &parsed.ids);
        parsed.aria_hidden_focusable = aria::extract_aria_hidden_focusable(&document);

        log::debug!(
            "Parsed document: {} headings, {} images, {} links, {} scripts",
            parsed.headings.len(),
            parsed.images.len(),
            parsed.links.len(),
            parsed.scripts.len()
        );
        parsed
    }

    /// Meta content by key (keys are lowercase).
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    /// `<meta http-equiv=…>` content.
    pub fn http_equiv(&self, name: &str) -> Option<&str> {
        self.meta(&format!("http-equiv:{name}"))
    }

    /// Content of `<meta name="viewport">`.
    pub fn viewport(&self) -> Option<&str> {
        self.meta("viewport")
    }

    /// First `<link rel=…>` with the given token.
    pub fn link_rel(&self, token: &str) -> Option<&LinkRel> {
        self.link_rels.iter().find(|link| link.has_rel(token))
    }

    /// Resources the browser requests after the document itself.
    pub fn request_count(&self) -> usize {
        let scripts = self.scripts.iter().filter(|s| s.src.is_some()).count();
        let images = self.images.iter().filter(|i| i.src.is_some()).count();
        scripts + self.stylesheets.len() + images
    }

    /// Number of `@media` rules in `<style>` blocks plus `<link media>` stylesheets.
    pub fn media_query_count(&self) -> usize {
        let inline: usize = self
            .inline_css
            .iter()
            .map(|css| css::media_query_count(css))
            .sum();
        let linked = self
            .link_rels
            .iter()
            .filter(|link| link.has_rel("stylesheet"))
            .filter(|link| {
                link.media
                    .as_deref()
                    .is_some_and(|m| !m.trim().eq_ignore_ascii_case("all"))
            })
            .count();
        inline + linked
    }
}
