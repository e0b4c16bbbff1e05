//! Read-side parameters: sort order for listing and criteria for search.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::Post;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Title,
    Content,
}

impl SortField {
    pub const NAMES: [&'static str; 2] = ["title", "content"];

    fn key<'a>(&self, post: &'a Post) -> &'a str {
        match *self {
            SortField::Title => post.title(),
            SortField::Content => post.content(),
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<SortField> {
        match s {
            "title" => Ok(SortField::Title),
            "content" => Ok(SortField::Content),
            _ => Err(Error::InvalidSortField(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub const NAMES: [&'static str; 2] = ["asc", "desc"];
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Direction> {
        match s {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(Error::InvalidDirection(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: Direction,
}

impl SortOrder {
    /// Parse the optional `sort` and `direction` parameters.
    ///
    /// Empty values count as absent. The field is checked before the
    /// direction. Without a field there is nothing to sort by and the
    /// result is `None`; a field without a direction sorts ascending.
    pub fn from_params(sort: Option<&str>, direction: Option<&str>) -> Result<Option<SortOrder>> {
        let field = sort
            .filter(|s| !s.is_empty())
            .map(str::parse::<SortField>)
            .transpose()?;
        let direction = direction
            .filter(|d| !d.is_empty())
            .map(str::parse::<Direction>)
            .transpose()?;

        Ok(field.map(|field| SortOrder {
            field: field,
            direction: direction.unwrap_or(Direction::Asc),
        }))
    }

    /// Stable sort: posts with equal keys keep their relative order in
    /// either direction.
    pub fn sort(&self, posts: &mut [Post]) {
        posts.sort_by(|a, b| {
            let ordering: Ordering = self.field.key(a).cmp(self.field.key(b));
            match self.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        });
    }
}

/// Case-insensitive substring criteria. A post matches when either
/// criterion matches its field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    title: Option<String>,
    content: Option<String>,
}

impl SearchQuery {
    pub fn new(title: Option<&str>, content: Option<&str>) -> SearchQuery {
        let needle = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_lowercase);
        SearchQuery {
            title: needle(title),
            content: needle(content),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    pub fn matches(&self, post: &Post) -> bool {
        let contains = |needle: &Option<String>, haystack: &str| match *needle {
            Some(ref needle) => haystack.to_lowercase().contains(needle.as_str()),
            None => false,
        };
        contains(&self.title, post.title()) || contains(&self.content, post.content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.title()).collect()
    }

    #[test]
    fn no_parameters_means_no_sort() {
        assert_eq!(SortOrder::from_params(None, None), Ok(None));
        assert_eq!(SortOrder::from_params(Some(""), Some("")), Ok(None));
        assert_eq!(SortOrder::from_params(None, Some("desc")), Ok(None));
    }

    #[test]
    fn field_alone_sorts_ascending() {
        assert_eq!(
            SortOrder::from_params(Some("content"), None),
            Ok(Some(SortOrder {
                field: SortField::Content,
                direction: Direction::Asc,
            }))
        );
    }

    #[test]
    fn field_is_validated_before_direction() {
        assert_eq!(
            SortOrder::from_params(Some("author"), Some("up")),
            Err(Error::InvalidSortField("author".to_string()))
        );
        assert_eq!(
            SortOrder::from_params(Some("title"), Some("up")),
            Err(Error::InvalidDirection("up".to_string()))
        );
        assert_eq!(
            SortOrder::from_params(None, Some("up")),
            Err(Error::InvalidDirection("up".to_string()))
        );
    }

    #[test]
    fn sort_is_case_sensitive() {
        let mut posts = vec![Post::new(1, "apple", "x"), Post::new(2, "Banana", "y")];
        SortOrder { field: SortField::Title, direction: Direction::Asc }.sort(&mut posts);
        assert_eq!(titles(&posts), vec!["Banana", "apple"]);
    }

    #[test]
    fn ties_keep_insertion_order_in_both_directions() {
        let mut posts = vec![
            Post::new(1, "Same", "a"),
            Post::new(2, "Other", "b"),
            Post::new(3, "Same", "c"),
        ];
        SortOrder { field: SortField::Title, direction: Direction::Desc }.sort(&mut posts);
        let ids: Vec<u64> = posts.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        SortOrder { field: SortField::Title, direction: Direction::Asc }.sort(&mut posts);
        let ids: Vec<u64> = posts.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn search_matches_either_field_ignoring_case() {
        let post = Post::new(1, "Rust Notes", "Borrowing explained");
        assert!(SearchQuery::new(Some("rust"), None).matches(&post));
        assert!(SearchQuery::new(None, Some("BORROW")).matches(&post));
        assert!(SearchQuery::new(Some("python"), Some("borrow")).matches(&post));
        assert!(!SearchQuery::new(Some("python"), Some("lifetimes")).matches(&post));
    }

    #[test]
    fn empty_criteria_are_absent() {
        assert!(SearchQuery::new(None, None).is_empty());
        assert!(SearchQuery::new(Some(""), Some("")).is_empty());
        assert!(!SearchQuery::new(Some(""), Some("x")).is_empty());
    }
}
