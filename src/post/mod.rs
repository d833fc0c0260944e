//! Post module for COBBS.
//!
//! Post models, form validation and persistence for the three post
//! kinds (lost & found, complaints, help requests) plus comments.

pub mod form;
mod repository;
mod types;

pub use form::{
    clean_text, validate_complaint, validate_help, validate_lost_found, Category, CleanComplaint,
    CleanHelp, CleanLostFound, FormError, ItemType, MAX_DESCRIPTION_LEN, MAX_ISSUE_LEN,
    MAX_ITEM_LEN, MAX_MESSAGE_LEN, MAX_NAME_LEN,
};
pub use repository::PostRepository;
pub use types::{
    Comment, ComplaintPost, HelpPost, LostFoundPost, NewComplaint, NewHelp, NewLostFound, PostKind,
};
