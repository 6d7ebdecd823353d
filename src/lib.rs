//! snippub — a minimal self-hosted content publishing server.
//!
//! A single admin authenticates with a password, writes short entries
//! (markdown or trusted raw HTML) under random 8-character slugs, and
//! anyone can read the rendered result at `/{slug}`. Entries live as one
//! JSON file each under the content root, written atomically.

pub mod config;
pub mod error;
pub mod handlers;
pub mod render;
pub mod session;
pub mod slug;
pub mod store;
pub mod views;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::{AppState, Config};

use handlers::{admin, auth, public};
use session::SessionRegistry;
use store::EntryStore;

/// Build the full route table over injected state.
pub fn router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/logout", post(auth::logout))
        .route("/admin", get(admin::show_editor).post(admin::create_entry))
        .route("/admin/preview", post(admin::preview_entry))
        .route("/admin/library", get(admin::show_library))
        .route("/{slug}/edit", get(admin::show_edit).post(admin::update_entry))
        .route("/{slug}/delete", post(admin::delete_entry))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/", get(public::redirect_admin))
        .route("/healthz", get(public::healthz))
        .route("/login", get(auth::show_login).post(auth::handle_login))
        .route("/{slug}", get(public::show_entry))
        .merge(gated)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the store, assemble state, and serve until the process exits.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let store = Arc::new(EntryStore::open(config.content_dir.clone()).await?);
    let sessions = Arc::new(SessionRegistry::new());
    let bind_addr = config.bind_addr.clone();

    let state = AppState {
        config: Arc::new(config),
        store,
        sessions,
    };
    let app = router(state);

    info!(addr = %bind_addr, "starting server");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
