//! COBBS - Community Bulletin Board Service
//!
//! A small community bulletin board: lost & found items, complaints and
//! help requests, each optionally with an attached file.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod post;
pub mod upload;
pub mod web;

pub use auth::{
    authenticate, hash_password, register, validate_password, verify_password, AuthError,
    LimitResult, LoginLimiter, PasswordError, RegistrationError, RegistrationRequest, Session,
    SessionError, SessionStore, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{CobbsError, Result};
pub use post::{
    Category, Comment, ComplaintPost, FormError, HelpPost, ItemType, LostFoundPost, NewComplaint,
    NewHelp, NewLostFound, PostKind, PostRepository,
};
pub use upload::{
    derive_storage_name, sanitize_file_name, AcceptedUpload, UploadError, UploadPolicy,
    UploadStorage,
};
pub use web::WebServer;
