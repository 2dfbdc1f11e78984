//! Session cookie and identity resolution.
//!
//! The session is a private cookie (encrypted and signed with the server key)
//! whose value is the user id. Nothing else is stored client-side.

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use time::Duration;

use crate::db::{QaStorage, User};
use crate::error::QaError;

pub const SESSION_COOKIE: &str = "qa_session";

/// Cookie attributes applied when a session starts.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub secure: bool,
    pub max_age: Option<Duration>,
}

/// Bind the client to `user_id`.
pub fn start(jar: PrivateCookieJar, user_id: i64, settings: SessionSettings) -> PrivateCookieJar {
    jar.add(build_cookie(user_id.to_string(), settings))
}

/// Forget the client's identity.
pub fn end(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie())
}

/// The user id carried by the session, if any.
pub fn session_user_id(jar: &PrivateCookieJar) -> Option<i64> {
    jar.get(SESSION_COOKIE)?.value().parse().ok()
}

/// Resolve the acting user. A session pointing at a missing row is anonymous.
pub async fn current_user(
    jar: &PrivateCookieJar,
    store: &mut QaStorage<'_>,
) -> Result<Option<User>, QaError> {
    match session_user_id(jar) {
        Some(id) => store.user_by_id(id).await,
        None => Ok(None),
    }
}

fn build_cookie(value: String, settings: SessionSettings) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .build();
    if let Some(max_age) = settings.max_age {
        cookie.set_max_age(max_age);
    }
    cookie
}

fn clear_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
