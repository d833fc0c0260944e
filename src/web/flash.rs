//! Flash messages for the web layer.
//!
//! A flash is a one-shot status string carried in a cookie across the
//! redirect of a Post/Redirect/Get cycle. Rendering and clearing the
//! cookie is the front-end's concern; this module only sets it.

use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, CookieJar};

/// Name of the flash cookie.
pub const FLASH_COOKIE: &str = "cobbs_flash";

/// Flash message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// Cookie string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }
}

/// Build a flash cookie carrying `kind:message`, percent-encoded.
pub fn flash_cookie(kind: FlashKind, message: &str) -> Cookie<'static> {
    let value = urlencoding::encode(&format!("{}:{message}", kind.as_str())).into_owned();
    Cookie::build((FLASH_COOKIE, value)).path("/").build()
}

/// Decode a flash cookie value back into kind and message.
pub fn parse_flash(value: &str) -> Option<(FlashKind, String)> {
    let decoded = urlencoding::decode(value).ok()?;
    let (kind, message) = decoded.split_once(':')?;
    let kind = match kind {
        "success" => FlashKind::Success,
        "error" => FlashKind::Error,
        _ => return None,
    };
    Some((kind, message.to_string()))
}

/// Attach a flash message to the jar and redirect.
///
/// This is the standard response of every form endpoint: a user-visible
/// status plus a redirect back to the originating page.
pub fn flash_redirect(
    jar: CookieJar,
    kind: FlashKind,
    message: &str,
    location: &str,
) -> (CookieJar, Redirect) {
    (jar.add(flash_cookie(kind, message)), Redirect::to(location))
}
