//! Login, logout, and the session-cookie auth guard.

use axum::extract::{Form, Query, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::AppState;
use crate::error::{found, AppError, Result};
use crate::views::{self, LoginView};

pub const SESSION_COOKIE: &str = "snippub_session";

/// Per-request auth context, inserted by [`require_auth`].
#[derive(Clone, Debug)]
pub struct Ctx {
    token: String,
}

impl Ctx {
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl<S> axum::extract::FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Ctx>()
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("auth context missing from request")))
    }
}

/// Middleware guarding admin routes: a missing or invalid session cookie
/// redirects to the login form, preserving the originally requested path.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .unwrap_or_default();

    if !state.sessions.validate(&token).await {
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());
        debug!(target = %target, "unauthenticated request to admin route");
        return Err(AppError::SessionInvalid { next: target });
    }

    req.extensions_mut().insert(Ctx { token });
    Ok(next.run(req).await)
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub next: String,
}

/// GET /login — an already authenticated admin skips straight to the editor.
pub async fn show_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if state.sessions.validate(cookie.value()).await {
            return found("/admin");
        }
    }

    views::login_page(&LoginView {
        next: query.next,
        error: None,
    })
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: String,
}

/// POST /login — compare against the configured admin secret; on success
/// mint a session and redirect to the requested target.
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if form.password != state.config.admin_password {
        warn!("failed admin login attempt");
        return Ok(views::login_page(&LoginView {
            next: form.next,
            error: Some("Incorrect password".to_string()),
        })
        .into_response());
    }

    let (token, _expires) = state
        .sessions
        .create()
        .await
        .map_err(|err| AppError::Internal(err.into()))?;

    let ttl_secs = state.sessions.ttl().num_seconds();
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(ttl_secs))
        .build();

    let target = if form.next.starts_with('/') {
        form.next
    } else {
        "/admin".to_string()
    };
    info!("admin logged in");
    Ok((jar.add(cookie), found(&target)).into_response())
}

/// POST /logout — invalidate the session and clear the cookie.
pub async fn logout(State(state): State<AppState>, jar: CookieJar, ctx: Ctx) -> Response {
    state.sessions.remove(ctx.token()).await;
    info!("admin logged out");
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, found("/login")).into_response()
}
