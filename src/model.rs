use std::collections::BTreeMap;

use rustc_serialize::json::{Json, ToJson};

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    id: u64,
    title: String,
    content: String,
}

impl Post {
    pub fn new(id: u64, title: &str, content: &str) -> Post {
        Post {
            id: id,
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn set_content(&mut self, content: &str) {
        self.content = content.to_string();
    }
}

impl ToJson for Post {
    fn to_json(&self) -> Json {
        let mut object = BTreeMap::new();
        object.insert("id".to_string(), self.id.to_json());
        object.insert("title".to_string(), self.title.to_json());
        object.insert("content".to_string(), self.content.to_json());
        Json::Object(object)
    }
}

/// The `title` and `content` members of a request body.
/// Members that are missing or not strings are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostFields {
    title: Option<String>,
    content: Option<String>,
}

impl PostFields {
    pub fn from_json_str(payload: &str) -> Result<PostFields> {
        let json = Json::from_str(payload).map_err(|_| Error::MalformedBody)?;
        if !json.is_object() {
            return Err(Error::MalformedBody);
        }

        let field = |name: &str| json.find(name).and_then(|v| v.as_string()).map(|s| s.to_string());
        Ok(PostFields {
            title: field("title"),
            content: field("content"),
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// Reply to a successful delete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    message: String,
}

impl Confirmation {
    pub fn deleted(id: u64) -> Confirmation {
        Confirmation { message: format!("Post with id {} has been deleted successfully.", id) }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ToJson for Confirmation {
    fn to_json(&self) -> Json {
        let mut object = BTreeMap::new();
        object.insert("message".to_string(), self.message.to_json());
        Json::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_serializes_to_wire_shape() {
        let post = Post::new(3, "Title", "Body");
        let json = post.to_json();

        assert_eq!(json.find("id").and_then(|v| v.as_u64()), Some(3));
        assert_eq!(json.find("title").and_then(|v| v.as_string()), Some("Title"));
        assert_eq!(json.find("content").and_then(|v| v.as_string()), Some("Body"));
        assert_eq!(json.as_object().map(|o| o.len()), Some(3));
    }

    #[test]
    fn fields_ignore_missing_and_non_string_members() {
        let fields = PostFields::from_json_str(r#"{"title": "Hello", "content": 42}"#).unwrap();
        assert_eq!(fields.title(), Some("Hello"));
        assert_eq!(fields.content(), None);

        let fields = PostFields::from_json_str("{}").unwrap();
        assert_eq!(fields, PostFields::default());
    }

    #[test]
    fn fields_reject_bodies_that_are_not_objects() {
        assert_eq!(PostFields::from_json_str(""), Err(Error::MalformedBody));
        assert_eq!(PostFields::from_json_str("[1, 2]"), Err(Error::MalformedBody));
        assert_eq!(PostFields::from_json_str("{\"title\":"), Err(Error::MalformedBody));
    }

    #[test]
    fn confirmation_names_the_deleted_id() {
        let confirmation = Confirmation::deleted(5);
        assert_eq!(confirmation.message(), "Post with id 5 has been deleted successfully.");
        assert_eq!(
            confirmation.to_json().find("message").and_then(|v| v.as_string()),
            Some("Post with id 5 has been deleted successfully.")
        );
    }
}
