//! Login endpoint backed by the session collaborator.

use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use time::Duration;

use crate::{domain::session::SESSION_COOKIE, ui::state::AppState};

/// Where a successful login lands
pub const LOGIN_REDIRECT: &str = "/mapUser";

/// Lifetime of the session cookie
pub const SESSION_MAX_AGE: Duration = Duration::days(1);

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(rename = "loginName", default)]
    pub login_name: String,
}

/// Load or create the caller's session, mark it logged in and redirect.
///
/// `userId` is only recorded when the session is new.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, StatusCode> {
    let key = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string());

    let mut session = state
        .sessions
        .load_or_create(key.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Failed to load session: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if session.is_new() {
        tracing::info!("New session created");
        session.set("userId", form.login_name);
    } else {
        tracing::debug!("Existing session loaded");
    }
    session.set("isLoggedIn", "true");

    state.sessions.save(&session).await.map_err(|e| {
        tracing::error!("Session save error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let cookie = Cookie::build((SESSION_COOKIE, session.key().to_string()))
        .path("/")
        .http_only(true)
        .max_age(SESSION_MAX_AGE)
        .build();

    Ok((StatusCode::FOUND, jar.add(cookie), [(LOCATION, LOGIN_REDIRECT)]))
}
