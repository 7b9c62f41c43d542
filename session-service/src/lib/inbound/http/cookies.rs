use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::CookieJar;
use chrono::Utc;

use crate::domain::auth::models::LoginResult;

pub const SESSION_COOKIE: &str = "session_token";
pub const CSRF_COOKIE: &str = "csrf_token";
pub const USERNAME_COOKIE: &str = "username";

/// Header the client must echo the CSRF token in on protected requests.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Attributes shared by every session cookie.
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
}

impl CookieSettings {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    /// Add the session, CSRF and username cookies for a fresh login.
    ///
    /// Only the session token is `HttpOnly`; the CSRF token has to be readable
    /// by the client so it can be sent back in [`CSRF_HEADER`]. Values are
    /// percent-encoded on the wire by the jar, so any UTF-8 username fits.
    pub fn issue(&self, jar: CookieJar, login: &LoginResult) -> CookieJar {
        let remaining = (login.expires_at - Utc::now()).num_seconds().max(0);
        let max_age = time::Duration::seconds(remaining);

        jar.add(self.cookie(SESSION_COOKIE, login.session_token.clone(), true, max_age))
            .add(self.cookie(CSRF_COOKIE, login.csrf_token.clone(), false, max_age))
            .add(self.cookie(
                USERNAME_COOKIE,
                login.username.to_string(),
                false,
                max_age,
            ))
    }

    /// Expire every cookie set by [`CookieSettings::issue`].
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        [SESSION_COOKIE, CSRF_COOKIE, USERNAME_COOKIE]
            .into_iter()
            .fold(jar, |jar, name| jar.remove(Cookie::build(name).path("/")))
    }

    fn cookie(
        &self,
        name: &'static str,
        value: String,
        http_only: bool,
        max_age: time::Duration,
    ) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(http_only)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .max_age(max_age)
            .build()
    }
}

/// Value of cookie `name`, empty when absent.
pub fn value_of(jar: &CookieJar, name: &str) -> String {
    jar.get(name)
        .map(|cookie| cookie.value().to_string())
        .unwrap_or_default()
}
