//! The new-tab placeholder page.
//!
//! Inline HTML documents (this page and the viewer pages) are loaded through
//! `data:` URLs. That scheme is reserved: such URLs are never recorded as visits
//! and never shown in the address bar.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::services::decorative_image::DecorativeImage;

/// Scheme prefix used for inline documents.
pub const RESERVED_DOCUMENT_SCHEME: &str = "data:";

/// Whether `url` points at an inline document rather than a real page.
pub fn is_reserved_document_url(url: &str) -> bool {
    url.get(..RESERVED_DOCUMENT_SCHEME.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(RESERVED_DOCUMENT_SCHEME))
}

/// Wraps an HTML document in a reserved-scheme URL.
pub fn to_document_url(html: &str) -> String {
    format!(
        "{}text/html;charset=utf-8;base64,{}",
        RESERVED_DOCUMENT_SCHEME,
        STANDARD.encode(html.as_bytes())
    )
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// State of the decorative image slot on the page.
#[derive(Debug, Clone, Copy)]
pub enum ImageSlot<'a> {
    /// Fetching is disabled; no image element.
    Omitted,
    /// A fetch is in flight.
    Loading,
    Ready(&'a DecorativeImage),
    /// The fetch failed; the element is left to the engine's broken-image rendering.
    Failed,
}

/// Renders the welcome page shown in new tabs.
#[derive(Debug, Clone)]
pub struct PlaceholderPage {
    title: String,
}

impl Default for PlaceholderPage {
    fn default() -> Self {
        Self::new("New Tab")
    }
}

impl PlaceholderPage {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn render(&self, image: ImageSlot<'_>) -> String {
        let figure = match image {
            ImageSlot::Omitted => String::new(),
            ImageSlot::Loading => "<figure class=\"hero loading\"></figure>".to_string(),
            ImageSlot::Ready(img) => {
                let credit = img
                    .credit
                    .as_deref()
                    .map(|c| format!("<figcaption>Photo by {}</figcaption>", escape_html(c)))
                    .unwrap_or_default();
                format!(
                    "<figure class=\"hero\"><img src=\"{}\" alt=\"{}\">{}</figure>",
                    escape_html(&img.url),
                    escape_html(&img.alt),
                    credit
                )
            }
            // An empty image payload renders as the engine's broken-image icon.
            ImageSlot::Failed => {
                "<figure class=\"hero\"><img src=\"data:image/png;base64,\" alt=\"Image unavailable\"></figure>"
                    .to_string()
            }
        };

        format!(
            "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><title>{title}</title><style>\
body{{margin:0;height:100vh;display:flex;flex-direction:column;align-items:center;justify-content:center;\
background:#222;color:#eee;font-family:-apple-system,\"Segoe UI\",Helvetica,Arial,sans-serif}}\
h1{{font-weight:300;margin:0 0 24px}}\
.hero{{margin:0;max-width:70vw;text-align:center}}\
.hero img{{max-width:70vw;max-height:60vh;border-radius:8px}}\
.hero.loading{{width:480px;height:320px;border-radius:8px;background:#333}}\
figcaption{{margin-top:8px;font-size:12px;color:#999}}\
</style></head><body><h1>Welcome</h1>{figure}</body></html>",
            title = escape_html(&self.title),
            figure = figure
        )
    }
}
