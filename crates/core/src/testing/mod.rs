//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use subfetch_core::testing::{fixtures, MockFetcher};
//!
//! let fetcher = MockFetcher::with_posts(&[("Title", "https://example.com")]);
//! fetcher.set_next_error(FetcherError::UnexpectedStatus { code: 429 }).await;
//! ```

mod mock_fetcher;

pub use mock_fetcher::MockFetcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::listing::{Listing, Post};

    /// Build a listing JSON body shaped like a subreddit `.json` response.
    ///
    /// Extra fields the decoder ignores are included on purpose.
    pub fn listing_body(posts: &[(&str, &str)]) -> Value {
        let children: Vec<Value> = posts
            .iter()
            .enumerate()
            .map(|(i, (title, url))| {
                json!({
                    "kind": "t3",
                    "data": {
                        "title": title,
                        "url": url,
                        "name": format!("t3_{}", i),
                        "score": 100 - i as i64,
                        "stickied": false,
                    }
                })
            })
            .collect();

        json!({
            "kind": "Listing",
            "data": {
                "after": null,
                "dist": posts.len(),
                "modhash": "",
                "children": children,
            }
        })
    }

    /// Build a decoded listing from `(title, url)` pairs.
    pub fn listing(posts: &[(&str, &str)]) -> Listing {
        Listing::from_posts(posts.iter().map(|(title, url)| Post::new(*title, *url)))
    }

    /// Expected file content for the given posts.
    pub fn rendered(posts: &[(&str, &str)]) -> String {
        posts
            .iter()
            .map(|(title, url)| format!("{}\n{}\n\n", title, url))
            .collect()
    }

    /// `count` distinct posts tagged with `prefix`.
    pub fn numbered_posts(prefix: &str, count: usize) -> Vec<(String, String)> {
        (0..count)
            .map(|i| {
                (
                    format!("{} post {}", prefix, i),
                    format!("https://example.com/{}/{}", prefix, i),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures;
    use crate::listing::Listing;

    #[test]
    fn test_listing_body_decodes() {
        let body = fixtures::listing_body(&[("A", "http://a"), ("B", "http://b")]);
        let listing: Listing = serde_json::from_value(body).unwrap();
        assert_eq!(listing, fixtures::listing(&[("A", "http://a"), ("B", "http://b")]));
    }

    #[test]
    fn test_rendered() {
        assert_eq!(
            fixtures::rendered(&[("A", "http://a"), ("B", "http://b")]),
            "A\nhttp://a\n\nB\nhttp://b\n\n"
        );
    }
}
