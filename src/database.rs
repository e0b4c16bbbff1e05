use log::debug;

use crate::error::{Error, Result};
use crate::model::{Confirmation, Post};
use crate::query::{SearchQuery, SortOrder};

/// Posts present when the server starts, in insertion order.
const SEED_POSTS: [(&str, &str); 7] = [
    ("7First post", "1This is the first post."),
    ("6Second post", "2This is the second post."),
    ("5Third post", "3This is the third post."),
    ("4First post", "4This is the tenth post."),
    ("3Fifth post", "5This is the fifth post."),
    ("2Sixth post", "6This is the sixth post."),
    ("1First post", "7This is the aseventh post."),
];

/// Storage for posts.
///
/// A backend provides the four primitives (`posts`, `insert`, `post_mut`
/// and `remove`); the operations served over HTTP are built on top of
/// them so every backend validates input the same way.
pub trait PostStore: Send {
    /// All posts in insertion order.
    fn posts(&self) -> &[Post];

    /// Append a post, assigning it an id no other post has held.
    fn insert(&mut self, title: &str, content: &str) -> Post;

    fn post_mut(&mut self, id: u64) -> Option<&mut Post>;

    fn remove(&mut self, id: u64) -> Option<Post>;

    fn list(&self, sort: Option<&str>, direction: Option<&str>) -> Result<Vec<Post>> {
        let order = SortOrder::from_params(sort, direction)?;
        let mut posts = self.posts().to_vec();
        if let Some(order) = order {
            order.sort(&mut posts);
        }
        Ok(posts)
    }

    fn create(&mut self, title: Option<&str>, content: Option<&str>) -> Result<Post> {
        let title = title.filter(|t| !t.is_empty());
        let content = content.filter(|c| !c.is_empty());

        match (title, content) {
            (Some(title), Some(content)) => Ok(self.insert(title, content)),
            (title, _) => {
                let mut missing = Vec::new();
                if title.is_none() {
                    missing.push("title");
                }
                if content.is_none() {
                    missing.push("content");
                }
                Err(Error::MissingFields(missing))
            }
        }
    }

    /// Replace the fields that are given and non-empty; keep the rest.
    fn update(&mut self, id: u64, title: Option<&str>, content: Option<&str>) -> Result<Post> {
        let post = self.post_mut(id).ok_or_else(|| Error::NotFound(id.to_string()))?;
        if let Some(title) = title.filter(|t| !t.is_empty()) {
            post.set_title(title);
        }
        if let Some(content) = content.filter(|c| !c.is_empty()) {
            post.set_content(content);
        }
        Ok(post.clone())
    }

    fn delete(&mut self, id: u64) -> Result<Confirmation> {
        self.remove(id)
            .map(|post| Confirmation::deleted(post.id()))
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn search(&self, title: Option<&str>, content: Option<&str>) -> Vec<Post> {
        let query = SearchQuery::new(title, content);
        if query.is_empty() {
            return vec![];
        }
        self.posts().iter().filter(|post| query.matches(post)).cloned().collect()
    }
}

/// In-memory post store. Ids come from a counter that only grows, so a
/// deleted post's id is never handed out again.
#[derive(Clone, Debug)]
pub struct Database {
    posts: Vec<Post>,
    next_id: u64,
}

impl Database {
    pub fn new() -> Database {
        Database { posts: vec![], next_id: 1 }
    }

    pub fn seeded() -> Database {
        let mut database = Database::new();
        for &(title, content) in SEED_POSTS.iter() {
            database.insert(title, content);
        }
        database
    }
}

impl Default for Database {
    fn default() -> Database {
        Database::new()
    }
}

impl PostStore for Database {
    fn posts(&self) -> &[Post] {
        &self.posts
    }

    fn insert(&mut self, title: &str, content: &str) -> Post {
        let post = Post::new(self.next_id, title, content);
        self.next_id += 1;
        self.posts.push(post.clone());
        debug!("created post {}", post.id());
        post
    }

    fn post_mut(&mut self, id: u64) -> Option<&mut Post> {
        self.posts.iter_mut().find(|post| post.id() == id)
    }

    fn remove(&mut self, id: u64) -> Option<Post> {
        let index = self.posts.iter().position(|post| post.id() == id)?;
        debug!("deleted post {}", id);
        Some(self.posts.remove(index))
    }
}
