use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};

use crate::use_cases::sessions::SavedSession;

// Bearer token from the Authorization header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    // The auth scheme is case-insensitive.
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

// Value of the first cookie called `name` across all Cookie headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

// Set-Cookie value for a saved session.
pub fn session_cookie(saved: &SavedSession) -> String {
    match saved.max_age {
        age if age > 0 => format!(
            "{}={}; Path=/; Max-Age={age}; HttpOnly",
            saved.name, saved.id
        ),
        // Browser-session cookie.
        0 => format!("{}={}; Path=/; HttpOnly", saved.name, saved.id),
        // Deleted session: expire the cookie right away.
        _ => format!("{}=; Path=/; Max-Age=0; HttpOnly", saved.name),
    }
}
