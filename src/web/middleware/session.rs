//! Session cookie middleware and extractors.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::{Session, SessionStore};
use crate::web::flash::{flash_cookie, FlashKind};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "cobbs_session";

/// Middleware that makes the session store available to extractors.
pub async fn session_context(
    store: Arc<SessionStore>,
    mut req: Request,
    next: Next,
) -> Response {
    req.extensions_mut().insert(store);
    next.run(req).await
}

/// Build the session cookie for a freshly created session.
pub fn session_cookie(session: &Session) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Build an expired session cookie for logout.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .build()
}

/// Rejection for anonymous access to a protected operation.
///
/// Realized as a flash message plus a redirect to the entry page.
#[derive(Debug)]
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        let jar = CookieJar::new().add(flash_cookie(FlashKind::Error, "Please log in first."));
        (jar, Redirect::to("/")).into_response()
    }
}

/// Extractor for authenticated users.
///
/// Resolves the session cookie against the injected session store.
/// Handlers taking this extractor are only reachable with a live session;
/// anonymous requests are redirected to the entry page.
#[derive(Debug, Clone)]
pub struct SessionUser(pub Session);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let jar = CookieJar::from_headers(&parts.headers);
            let token = jar
                .get(SESSION_COOKIE)
                .map(|c| c.value().to_string())
                .ok_or(AuthRedirect)?;

            // Session store is injected by the session_context middleware
            let store = parts
                .extensions
                .get::<Arc<SessionStore>>()
                .ok_or(AuthRedirect)?;

            let session = store.resolve(&token).map_err(|e| {
                tracing::debug!("Session resolution failed: {}", e);
                AuthRedirect
            })?;

            Ok(SessionUser(session))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let session = Session {
            token: "abc-123".to_string(),
            user_id: 1,
            username: "alice".to_string(),
            created_at: chrono::Utc::now(),
            expires_at: chrono::Utc::now(),
        };

        let cookie = session_cookie(&session);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc-123");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_clear_session_cookie() {
        let cookie = clear_session_cookie();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert!(cookie.value().is_empty());
    }
}
