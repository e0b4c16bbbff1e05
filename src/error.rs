//! Errors returned by post store operations.
//!
//! The `Display` text of each variant is the `error` message sent to
//! clients; [`ToJson`] adds the variant-specific hint fields.

use std::collections::BTreeMap;

use rustc_serialize::json::{Json, ToJson};
use thiserror::Error;

use crate::query::{Direction, SortField};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid sort field.")]
    InvalidSortField(String),

    #[error("Invalid sort direction.")]
    InvalidDirection(String),

    /// Required post fields that were absent or empty, in `title`, `content` order.
    #[error("{}", missing_message(.0))]
    MissingFields(Vec<&'static str>),

    #[error("Request body must be a JSON object.")]
    MalformedBody,

    /// Carries the requested id as given, which may not be a number.
    #[error("Post not found.")]
    NotFound(String),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

fn missing_message(fields: &[&'static str]) -> &'static str {
    match fields {
        ["title"] => "Title is missing.",
        ["content"] => "Content is missing.",
        _ => "Both title and content are missing.",
    }
}

fn string_list(items: &[&str]) -> Json {
    Json::Array(items.iter().map(|item| Json::String(item.to_string())).collect())
}

impl ToJson for Error {
    fn to_json(&self) -> Json {
        let mut object = BTreeMap::new();
        object.insert("error".to_string(), Json::String(self.to_string()));
        match *self {
            Error::InvalidSortField(_) => {
                object.insert("valid_fields".to_string(), string_list(&SortField::NAMES));
            }
            Error::InvalidDirection(_) => {
                object.insert("valid_directions".to_string(), string_list(&Direction::NAMES));
            }
            Error::MissingFields(ref fields) => {
                object.insert("missing_fields".to_string(), string_list(fields));
            }
            Error::MalformedBody | Error::NotFound(_) => {}
        }
        Json::Object(object)
    }
}
