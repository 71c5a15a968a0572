//! One-shot error messages carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

pub const FLASH_COOKIE: &str = "flash_errors";

fn encode(errors: &[String]) -> String {
    let payload = serde_json::to_vec(errors).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(payload)
}

fn decode(raw: &str) -> Vec<String> {
    URL_SAFE_NO_PAD
        .decode(raw)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Vec<String>>(&bytes).ok())
        .unwrap_or_default()
}

/// Stores `errors` for the next request that calls [`take_errors`].
pub fn with_errors(jar: CookieJar, errors: &[String]) -> CookieJar {
    let mut cookie = Cookie::new(FLASH_COOKIE, encode(errors));
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    jar.add(cookie)
}

/// Reads pending errors and clears the cookie.
pub fn take_errors(jar: CookieJar) -> (CookieJar, Vec<String>) {
    let Some(errors) = jar.get(FLASH_COOKIE).map(|c| decode(c.value())) else {
        return (jar, vec![]);
    };

    let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/"));
    (jar, errors)
}
