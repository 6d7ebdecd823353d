//! Admin-gated handlers: editor, create/update/delete, preview, library.

use axum::extract::{Form, Path, Query, State};
use axum::response::Response;
use chrono::Utc;
use maud::Markup;
use serde::Deserialize;
use tracing::error;

use crate::config::AppState;
use crate::error::{found, AppError, Result};
use crate::render::render_html;
use crate::store::{Entry, RendererKind};
use crate::views::{
    self, format_time, EditorView, LibraryItem, LibraryView, PreviewView, SavedView,
};

/// Character budget for the library fallback description.
const SUMMARY_LIMIT: usize = 140;

#[derive(Debug, Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub renderer: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
}

impl EntryForm {
    /// Unknown renderer kinds are rejected here, before the store is touched.
    fn renderer(&self) -> Result<RendererKind> {
        Ok(self.renderer.parse::<RendererKind>()?)
    }
}

/// GET /admin
pub async fn show_editor() -> Markup {
    views::editor_page(&EditorView::create())
}

/// POST /admin
pub async fn create_entry(
    State(state): State<AppState>,
    Form(form): Form<EntryForm>,
) -> Result<Markup> {
    let renderer = form.renderer()?;
    let entry = state
        .store
        .create(renderer, form.content, form.description)
        .await
        .map_err(|err| {
            error!(error = %err, "create entry");
            AppError::from(err)
        })?;

    Ok(views::saved_page(&saved_view("Entry Saved", &entry)))
}

/// POST /admin/preview — renders transient content without persisting.
pub async fn preview_entry(Form(form): Form<EntryForm>) -> Result<Markup> {
    let renderer = form.renderer()?;
    let html = render_html(renderer, &form.content);

    Ok(views::preview_page(&PreviewView {
        html,
        generated_at: format_time(&Utc::now()),
        allow_theme_switch: renderer == RendererKind::Markdown,
    }))
}

/// GET /{slug}/edit
pub async fn show_edit(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Markup> {
    let entry = state.store.get(&slug).await?;
    Ok(views::editor_page(&EditorView::edit(&entry)))
}

/// POST /{slug}/edit
pub async fn update_entry(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(form): Form<EntryForm>,
) -> Result<Markup> {
    let renderer = form.renderer()?;
    let entry = state
        .store
        .update(&slug, renderer, form.content, form.description)
        .await
        .map_err(|err| {
            error!(slug = %slug, error = %err, "update entry");
            AppError::from(err)
        })?;

    Ok(views::saved_page(&saved_view("Entry Updated", &entry)))
}

/// POST /{slug}/delete
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response> {
    state.store.delete(&slug).await.map_err(|err| {
        error!(slug = %slug, error = %err, "delete entry");
        AppError::from(err)
    })?;
    Ok(found("/admin/library"))
}

#[derive(Debug, Deserialize)]
pub struct LibraryQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /admin/library — list entries with an optional substring search.
pub async fn show_library(
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
) -> Result<Markup> {
    let search = query.q.trim().to_string();
    let entries = state.store.list().await.map_err(|err| {
        error!(error = %err, "list entries");
        AppError::from(err)
    })?;

    let total = entries.len();
    let needle = search.to_lowercase();
    let items: Vec<LibraryItem> = entries
        .iter()
        .filter(|entry| needle.is_empty() || matches_search(entry, &needle))
        .map(library_item)
        .collect();

    let filtered = items.len();
    Ok(views::library_page(&LibraryView {
        items,
        search_term: search.clone(),
        total_entries: total,
        filtered_count: filtered,
        has_filter: !search.is_empty(),
    }))
}

fn saved_view(title: &str, entry: &Entry) -> SavedView {
    SavedView {
        title: title.to_string(),
        view_url: format!("/{}", entry.slug),
        edit_url: format!("/{}/edit", entry.slug),
        published_at: format_time(&entry.created_at),
        updated_at: format_time(&entry.updated_at),
        was_updated: entry.was_updated(),
    }
}

fn library_item(entry: &Entry) -> LibraryItem {
    let description = entry.description.trim();
    let description = if description.is_empty() {
        summarize(&entry.raw, SUMMARY_LIMIT)
    } else {
        description.to_string()
    };

    LibraryItem {
        slug: entry.slug.clone(),
        renderer: entry.renderer,
        description,
        published_at: format_time(&entry.created_at),
        updated_at: format_time(&entry.updated_at),
        was_updated: entry.was_updated(),
    }
}

/// Case-insensitive substring match over slug, raw content, and description.
/// `needle` must already be lowercased.
fn matches_search(entry: &Entry, needle: &str) -> bool {
    entry.slug.to_lowercase().contains(needle)
        || entry.raw.to_lowercase().contains(needle)
        || entry.description.to_lowercase().contains(needle)
}

/// Whitespace-collapsed prefix of `raw`, truncated to `limit` characters
/// (not bytes) with an ellipsis appended when cut short.
fn summarize(raw: &str, limit: usize) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= limit {
        return collapsed;
    }
    let mut out: String = collapsed.chars().take(limit).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(slug: &str, raw: &str, description: &str) -> Entry {
        let now = Utc::now();
        Entry {
            slug: slug.to_string(),
            renderer: RendererKind::Markdown,
            raw: raw.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn search_matches_slug_raw_and_description() {
        let e = entry("alpha123", "some body", "notes");
        assert!(matches_search(&e, "alpha"));
        assert!(matches_search(&e, "body"));
        assert!(matches_search(&e, "notes"));
        assert!(!matches_search(&e, "zulu"));
    }

    #[test]
    fn search_is_case_insensitive() {
        let e = entry("abc", "Hello ALPHA World", "");
        assert!(matches_search(&e, "alpha"));
    }

    #[test]
    fn summarize_collapses_whitespace() {
        assert_eq!(summarize("  foo \n\n bar\tbaz  ", 140), "foo bar baz");
    }

    #[test]
    fn summarize_truncates_by_characters_with_ellipsis() {
        let long = "word ".repeat(50);
        let summary = summarize(&long, 140);
        assert_eq!(summary.chars().count(), 141);
        assert!(summary.ends_with('…'));
    }

    #[test]
    fn summarize_is_multibyte_safe() {
        let raw = "é".repeat(200);
        let summary = summarize(&raw, 140);
        assert_eq!(summary.chars().count(), 141);
        assert!(summary.starts_with("ééé"));
    }

    #[test]
    fn library_item_falls_back_to_summary() {
        let e = entry("abc", "raw body here", "   ");
        assert_eq!(library_item(&e).description, "raw body here");

        let e = entry("abc", "raw body here", "explicit");
        assert_eq!(library_item(&e).description, "explicit");
    }
}
