use anyhow::Result;
use serde::Deserialize;

use super::{clean_text, SourceRecord, Sources, RESULTS_PER_SOURCE, SNIPPET_CHARS};

#[derive(Debug, Default, Deserialize)]
struct Listing {
    #[serde(default)]
    data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Default, Deserialize)]
struct Child {
    #[serde(default)]
    data: Post,
}

#[derive(Debug, Default, Deserialize)]
struct Post {
    title: Option<String>,
    selftext: Option<String>,
    permalink: Option<String>,
    url: Option<String>,
}

pub async fn search(sources: &Sources, query: &str) -> Result<Vec<SourceRecord>> {
    let req = sources
        .http
        .get(format!("{}/search.json", sources.endpoints.reddit))
        .query(&[
            ("q", query),
            ("limit", RESULTS_PER_SOURCE.to_string().as_str()),
            ("sort", "relevance"),
        ]);
    let listing: Listing = sources.get_json(req).await?;

    Ok(listing
        .data
        .children
        .into_iter()
        .map(|child| to_record(child.data))
        .collect())
}

fn to_record(post: Post) -> SourceRecord {
    let title = post.title.unwrap_or_default();
    let body = post
        .selftext
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| title.clone());
    let url = match post.permalink.filter(|p| !p.is_empty()) {
        Some(permalink) => format!("https://reddit.com{}", permalink),
        None => post.url.unwrap_or_default(),
    };

    SourceRecord {
        source: "Reddit".to_string(),
        snippet: clean_text(&body, SNIPPET_CHARS),
        title,
        url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::config_for;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_selftext_falls_back_to_title() {
        let record = to_record(Post {
            title: Some("Rust 2024 edition".to_string()),
            selftext: Some(String::new()),
            permalink: Some("/r/rust/comments/abc/rust_2024/".to_string()),
            url: None,
        });
        assert_eq!(record.snippet, "Rust 2024 edition");
        assert_eq!(record.url, "https://reddit.com/r/rust/comments/abc/rust_2024/");
    }

    #[test]
    fn test_external_link_without_permalink() {
        let record = to_record(Post {
            title: Some("Link post".to_string()),
            selftext: None,
            permalink: None,
            url: Some("https://example.com/post".to_string()),
        });
        assert_eq!(record.url, "https://example.com/post");
    }

    #[tokio::test]
    async fn test_search_maps_children() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "borrow checker"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "children": [
                    { "data": {
                        "title": "Fighting the borrow checker",
                        "selftext": "It  keeps\n\ncomplaining",
                        "permalink": "/r/rust/comments/1/fighting/"
                    } }
                ] }
            })))
            .mount(&server)
            .await;

        let sources = Sources::new(&config_for(&server.uri())).unwrap();
        let records = search(&sources, "borrow checker").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, "Reddit");
        assert_eq!(records[0].snippet, "It keeps complaining");
    }

    #[tokio::test]
    async fn test_search_non_success_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let sources = Sources::new(&config_for(&server.uri())).unwrap();
        assert!(search(&sources, "anything").await.is_err());
    }
}
