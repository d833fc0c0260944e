//! Middleware for the COBBS web layer.

mod session;

pub use session::{
    clear_session_cookie, session_context, session_cookie, AuthRedirect, SessionUser,
    SESSION_COOKIE,
};
