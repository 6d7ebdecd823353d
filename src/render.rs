//! Raw entry content to embeddable HTML.
//!
//! Markdown goes through pulldown-cmark; HTML entries pass through
//! byte-identical. Raw HTML is trusted as-is: only the authenticated admin
//! can author entries, and that trust boundary is deliberate. The closed
//! `RendererKind` enum means an unknown kind cannot reach this function;
//! unknown kinds are rejected where form input is parsed.

use maud::{Markup, PreEscaped};
use pulldown_cmark::{html, Options, Parser};

use crate::store::RendererKind;

/// Render raw content into markup safe to embed without further escaping.
///
/// Pure and side-effect free; the preview path calls it on content that was
/// never persisted.
pub fn render_html(renderer: RendererKind, raw: &str) -> Markup {
    match renderer {
        RendererKind::Markdown => {
            let mut options = Options::empty();
            options.insert(Options::ENABLE_TABLES);
            options.insert(Options::ENABLE_STRIKETHROUGH);
            options.insert(Options::ENABLE_TASKLISTS);

            let parser = Parser::new_ext(raw, options);
            let mut out = String::new();
            html::push_html(&mut out, parser);
            PreEscaped(out)
        }
        RendererKind::Html => PreEscaped(raw.to_string()),
    }
}
