//! Subreddit listing response model.
//!
//! Only the subset of the `/r/<name>.json` payload that gets persisted is
//! modelled here. Every other field in the payload is ignored on decode.
//!
//! Decoding is lenient about shape: a missing or `null` field takes its
//! default (empty string, empty list), so a post without a `url` is still
//! written with an empty URL line. Only malformed JSON or a field of the
//! wrong type is a decode error.

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level listing document returned by a subreddit JSON endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: ListingData,
}

/// The `data` object of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingData {
    /// Posts in the order the server returned them.
    #[serde(default, deserialize_with = "nullable_children")]
    pub children: Vec<Child>,
}

/// Wrapper around a single post (`{"kind": "t3", "data": {...}}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Post,
}

/// A single post as written to the output file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A `null` list is empty; a `null` entry is an empty post.
fn nullable_children<'de, D>(deserializer: D) -> Result<Vec<Child>, D::Error>
where
    D: Deserializer<'de>,
{
    let children = Option::<Vec<Option<Child>>>::deserialize(deserializer)?;
    Ok(children
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

impl Post {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Render the post as a `title`, `url`, blank line block.
    pub fn render(&self) -> String {
        format!("{}\n{}\n\n", self.title, self.url)
    }
}

impl Listing {
    /// Build a listing from posts, preserving their order.
    pub fn from_posts(posts: impl IntoIterator<Item = Post>) -> Self {
        Self {
            data: ListingData {
                children: posts.into_iter().map(|data| Child { data }).collect(),
            },
        }
    }

    /// Iterate the posts in source order.
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.data.children.iter().map(|child| &child.data)
    }

    pub fn len(&self) -> usize {
        self.data.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.children.is_empty()
    }
}
