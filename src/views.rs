//! Typed view-models and their maud markup.
//!
//! One struct per presentation view; handlers fill the struct and the
//! matching function turns it into a full page. All dynamic text is escaped
//! by maud except content that already went through the renderer.

use chrono::{DateTime, Utc};
use maud::{html, Markup, DOCTYPE};

use crate::store::RendererKind;

const BASE_CSS: &str = "\
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;\
max-width:820px;margin:40px auto;padding:0 20px;line-height:1.6;color:#1a1a1a}\
textarea{width:100%;min-height:280px;font-family:monospace}\
input[type=text],input[type=password],select{padding:4px 8px}\
table{border-collapse:collapse;width:100%}\
td,th{border-bottom:1px solid #ddd;padding:6px 8px;text-align:left}\
.error{color:#b00020}\
.meta{color:#666;font-size:0.9em}\
nav a{margin-right:12px}";

/// `YYYY-MM-DD HH:MM` in UTC, the display form used everywhere.
pub fn format_time(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M").to_string()
}

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " — snippub" }
                style { (maud::PreEscaped(BASE_CSS)) }
            }
            body {
                main { (body) }
            }
        }
    }
}

fn admin_nav() -> Markup {
    html! {
        nav {
            a href="/admin" { "New entry" }
            a href="/admin/library" { "Library" }
            form method="post" action="/logout" style="display:inline" {
                button type="submit" { "Log out" }
            }
        }
    }
}

pub struct LoginView {
    pub next: String,
    pub error: Option<String>,
}

pub fn login_page(view: &LoginView) -> Markup {
    layout(
        "Login",
        html! {
            h1 { "Login" }
            @if let Some(error) = &view.error {
                p class="error" { (error) }
            }
            form method="post" action="/login" {
                input type="hidden" name="next" value=(view.next);
                label for="password" { "Admin password" }
                br;
                input type="password" name="password" id="password" required;
                button type="submit" { "Sign in" }
            }
        },
    )
}

pub struct EditorView {
    pub title: String,
    pub action: String,
    pub content: String,
    pub renderer: RendererKind,
    pub description: String,
    pub published_at: String,
    pub updated_at: String,
    pub selected_slug: Option<String>,
}

impl EditorView {
    /// The blank create form.
    pub fn create() -> Self {
        Self {
            title: "Create New Entry".to_string(),
            action: "/admin".to_string(),
            content: String::new(),
            renderer: RendererKind::Markdown,
            description: String::new(),
            published_at: String::new(),
            updated_at: String::new(),
            selected_slug: None,
        }
    }

    pub fn edit(entry: &crate::store::Entry) -> Self {
        Self {
            title: format!("Edit {}", entry.slug),
            action: format!("/{}/edit", entry.slug),
            content: entry.raw.clone(),
            renderer: entry.renderer,
            description: entry.description.clone(),
            published_at: format_time(&entry.created_at),
            updated_at: format_time(&entry.updated_at),
            selected_slug: Some(entry.slug.clone()),
        }
    }
}

pub fn editor_page(view: &EditorView) -> Markup {
    layout(
        &view.title,
        html! {
            (admin_nav())
            h1 { (view.title) }
            @if let Some(slug) = &view.selected_slug {
                p class="meta" {
                    "Published " (view.published_at) " · last update " (view.updated_at)
                    " · " a href={ "/" (slug) } { "view" }
                }
            }
            form method="post" action=(view.action) {
                label for="renderer" { "Renderer" }
                select name="renderer" id="renderer" {
                    option value="markdown" selected[view.renderer == RendererKind::Markdown] { "Markdown" }
                    option value="html" selected[view.renderer == RendererKind::Html] { "HTML" }
                }
                br;
                label for="description" { "Description (optional)" }
                br;
                input type="text" name="description" id="description" value=(view.description);
                br;
                label for="content" { "Content" }
                br;
                textarea name="content" id="content" { (view.content) }
                br;
                button type="submit" { "Save" }
                button type="submit" formaction="/admin/preview" formtarget="_blank" { "Preview" }
            }
        },
    )
}

pub struct SavedView {
    pub title: String,
    pub view_url: String,
    pub edit_url: String,
    pub published_at: String,
    pub updated_at: String,
    pub was_updated: bool,
}

pub fn saved_page(view: &SavedView) -> Markup {
    layout(
        &view.title,
        html! {
            (admin_nav())
            h1 { (view.title) }
            p {
                a href=(view.view_url) { "View entry" }
                " · "
                a href=(view.edit_url) { "Keep editing" }
            }
            p class="meta" {
                "Published " (view.published_at)
                @if view.was_updated {
                    " · last update " (view.updated_at)
                }
            }
        },
    )
}

pub struct PreviewView {
    pub html: Markup,
    pub generated_at: String,
    pub allow_theme_switch: bool,
}

pub fn preview_page(view: &PreviewView) -> Markup {
    layout(
        "Preview",
        html! {
            p class="meta" {
                "Preview mode — content is not saved yet. Generated " (view.generated_at)
                @if view.allow_theme_switch { " · markdown" }
            }
            hr;
            article { (view.html) }
        },
    )
}

pub struct EntryView {
    pub title: String,
    pub html: Markup,
    pub published_at: String,
    pub updated_at: String,
    pub was_updated: bool,
    pub allow_theme_switch: bool,
}

pub fn entry_page(view: &EntryView) -> Markup {
    layout(
        &view.title,
        html! {
            article class=[view.allow_theme_switch.then_some("themed")] { (view.html) }
            hr;
            p class="meta" {
                "Published " (view.published_at)
                @if view.was_updated {
                    " · updated " (view.updated_at)
                }
            }
        },
    )
}

pub struct LibraryItem {
    pub slug: String,
    pub renderer: RendererKind,
    pub description: String,
    pub published_at: String,
    pub updated_at: String,
    pub was_updated: bool,
}

pub struct LibraryView {
    pub items: Vec<LibraryItem>,
    pub search_term: String,
    pub total_entries: usize,
    pub filtered_count: usize,
    pub has_filter: bool,
}

pub fn library_page(view: &LibraryView) -> Markup {
    layout(
        "Content Library",
        html! {
            (admin_nav())
            h1 { "Content Library" }
            form method="get" action="/admin/library" {
                input type="text" name="q" value=(view.search_term) placeholder="Search entries";
                button type="submit" { "Search" }
            }
            p class="meta" {
                @if view.has_filter {
                    (view.filtered_count) " of " (view.total_entries) " entries"
                } @else {
                    (view.total_entries) " entries"
                }
            }
            table {
                thead {
                    tr { th { "Slug" } th { "Renderer" } th { "Description" } th { "Published" } th {} }
                }
                tbody {
                    @for item in &view.items {
                        tr {
                            td { a href={ "/" (item.slug) } { (item.slug) } }
                            td { (item.renderer.as_str()) }
                            td { (item.description) }
                            td class="meta" {
                                (item.published_at)
                                @if item.was_updated { " · " (item.updated_at) }
                            }
                            td {
                                a href={ "/" (item.slug) "/edit" } { "edit" }
                                " "
                                form method="post" action={ "/" (item.slug) "/delete" } style="display:inline" {
                                    button type="submit" { "delete" }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn error_page(title: &str, message: &str) -> Markup {
    layout(
        title,
        html! {
            h1 { (title) }
            p { (message) }
            a href="/" { "Back to snippub" }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_carries_next_and_error() {
        let markup = login_page(&LoginView {
            next: "/admin/library".into(),
            error: Some("Incorrect password".into()),
        })
        .0;
        assert!(markup.contains("Incorrect password"));
        assert!(markup.contains(r#"value="/admin/library""#));
    }

    #[test]
    fn editor_page_preselects_renderer() {
        let mut view = EditorView::create();
        view.renderer = RendererKind::Html;
        let markup = editor_page(&view).0;
        assert!(markup.contains(r#"value="html" selected"#));
    }

    #[test]
    fn entry_page_embeds_rendered_html_unescaped() {
        let markup = entry_page(&EntryView {
            title: "abc".into(),
            html: maud::PreEscaped("<h1>Hi</h1>".into()),
            published_at: "2026-01-01 00:00".into(),
            updated_at: "2026-01-01 00:00".into(),
            was_updated: false,
            allow_theme_switch: true,
        })
        .0;
        assert!(markup.contains("<h1>Hi</h1>"));
    }

    #[test]
    fn time_formatting_is_minute_precision_utc() {
        let t = DateTime::parse_from_rfc3339("2026-08-29T13:37:42Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_time(&t), "2026-08-29 13:37");
    }
}
