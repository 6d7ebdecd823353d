//! Unauthenticated surface: health probe, root redirect, published entries.

use axum::extract::{Path, State};
use axum::response::Response;
use maud::Markup;

use crate::config::AppState;
use crate::error::{found, Result};
use crate::render::render_html;
use crate::store::RendererKind;
use crate::views::{self, format_time, EntryView};

/// GET /
pub async fn redirect_admin() -> Response {
    found("/admin")
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}

/// GET /{slug} — render and show a published entry.
pub async fn show_entry(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Markup> {
    let entry = state.store.get(&slug).await?;
    let html = render_html(entry.renderer, &entry.raw);

    Ok(views::entry_page(&EntryView {
        title: entry.slug.clone(),
        html,
        published_at: format_time(&entry.created_at),
        updated_at: format_time(&entry.updated_at),
        was_updated: entry.was_updated(),
        allow_theme_switch: entry.renderer == RendererKind::Markdown,
    }))
}
