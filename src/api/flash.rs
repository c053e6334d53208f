//! One-shot notices carried across a redirect.
//!
//! Notices queue up in a signed cookie on the redirecting response and are
//! drained by the next page that renders them. Nothing is kept server-side.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha512};
use tracing::warn;

pub const FLASH_COOKIE: &str = "flash";

/// Derive the 64-byte cookie signing key from a configured secret.
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(&digest[..])
}

/// Queue a notice for the next rendered page.
pub fn push(jar: SignedCookieJar, message: impl Into<String>) -> SignedCookieJar {
    let mut messages = pending(&jar);
    messages.push(message.into());

    let value = match serde_json::to_string(&messages) {
        Ok(json) => URL_SAFE_NO_PAD.encode(json),
        Err(e) => {
            warn!(error = %e, "dropping flash notice");
            return jar;
        }
    };

    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Drain every queued notice.
///
/// The returned jar clears whatever flash cookie the request carried,
/// verified or not. Without one the response is left untouched.
pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Vec<String>) {
    let messages = pending(&jar);
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), messages)
}

/// Queued notices; a missing, forged or garbled cookie reads as empty.
fn pending(jar: &SignedCookieJar) -> Vec<String> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| decode(cookie.value()))
        .unwrap_or_default()
}

fn decode(value: &str) -> Option<Vec<String>> {
    let json = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&json).ok()
}
