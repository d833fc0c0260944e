//! Form validation for post submissions.
//!
//! Fields are trimmed, rejected when empty, and truncated to a
//! per-field cap. Over-length input is truncated rather than rejected.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Maximum length of the poster name field.
pub const MAX_NAME_LEN: usize = 100;
/// Maximum length of the lost/found item field.
pub const MAX_ITEM_LEN: usize = 200;
/// Maximum length of the lost/found description field.
pub const MAX_DESCRIPTION_LEN: usize = 1000;
/// Maximum length of the complaint issue field.
pub const MAX_ISSUE_LEN: usize = 2000;
/// Maximum length of the help message field.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Form validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    /// A required field is missing or empty after trimming.
    #[error("field '{0}' is required")]
    MissingField(&'static str),

    /// The category value is not one of the allowed set.
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    /// The lost/found type value is not 'Lost' or 'Found'.
    #[error("invalid item type: {0}")]
    InvalidItemType(String),
}

/// Location categories for lost & found posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    School,
    College,
    Office,
    Hostel,
    Apartment,
}

impl Category {
    /// All allowed categories.
    pub const ALL: [Category; 5] = [
        Category::School,
        Category::College,
        Category::Office,
        Category::Hostel,
        Category::Apartment,
    ];

    /// Database / form string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::School => "School",
            Category::College => "College",
            Category::Office => "Office",
            Category::Hostel => "Hostel",
            Category::Apartment => "Apartment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "School" => Ok(Category::School),
            "College" => Ok(Category::College),
            "Office" => Ok(Category::Office),
            "Hostel" => Ok(Category::Hostel),
            "Apartment" => Ok(Category::Apartment),
            other => Err(FormError::InvalidCategory(other.to_string())),
        }
    }
}

/// Whether a lost & found post reports a lost or a found item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Lost,
    Found,
}

impl ItemType {
    /// Database / form string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Lost => "Lost",
            ItemType::Found => "Found",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Lost" => Ok(ItemType::Lost),
            "Found" => Ok(ItemType::Found),
            other => Err(FormError::InvalidItemType(other.to_string())),
        }
    }
}

/// Validated lost & found submission.
#[derive(Debug, Clone)]
pub struct CleanLostFound {
    pub name: String,
    pub category: Category,
    pub item_type: Option<ItemType>,
    pub item: String,
    pub description: String,
}

/// Validated complaint submission.
#[derive(Debug, Clone)]
pub struct CleanComplaint {
    pub name: String,
    pub issue: String,
}

/// Validated help request submission.
#[derive(Debug, Clone)]
pub struct CleanHelp {
    pub name: String,
    pub message: String,
}

/// Trim, truncate to `max_len` characters, and reject empty values.
///
/// Returns `None` for values that are empty after trimming. Values
/// longer than the cap are silently truncated, not rejected.
pub fn clean_text(value: &str, max_len: usize) -> Option<String> {
    let cleaned: String = value.trim().chars().take(max_len).collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn require(
    fields: &HashMap<String, String>,
    key: &'static str,
    max_len: usize,
) -> Result<String, FormError> {
    fields
        .get(key)
        .and_then(|v| clean_text(v, max_len))
        .ok_or(FormError::MissingField(key))
}

/// Validate a raw lost & found submission.
pub fn validate_lost_found(
    fields: &HashMap<String, String>,
) -> Result<CleanLostFound, FormError> {
    let name = require(fields, "name", MAX_NAME_LEN)?;
    let category_raw = require(fields, "category", MAX_NAME_LEN)?;
    let item = require(fields, "item", MAX_ITEM_LEN)?;
    let description = require(fields, "description", MAX_DESCRIPTION_LEN)?;

    let category = category_raw.parse::<Category>()?;

    let item_type = match fields.get("type").map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(raw) => Some(raw.parse::<ItemType>()?),
        None => None,
    };

    Ok(CleanLostFound {
        name,
        category,
        item_type,
        item,
        description,
    })
}

/// Validate a raw complaint submission.
pub fn validate_complaint(fields: &HashMap<String, String>) -> Result<CleanComplaint, FormError> {
    let name = require(fields, "name", MAX_NAME_LEN)?;
    let issue = require(fields, "issue", MAX_ISSUE_LEN)?;

    Ok(CleanComplaint { name, issue })
}

/// Validate a raw help request submission.
pub fn validate_help(fields: &HashMap<String, String>) -> Result<CleanHelp, FormError> {
    let name = require(fields, "name", MAX_NAME_LEN)?;
    let message = require(fields, "message", MAX_MESSAGE_LEN)?;

    Ok(CleanHelp { name, message })
}
