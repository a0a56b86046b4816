use anyhow::Result;
use serde::Deserialize;

use super::{clean_text, SourceRecord, Sources, RESULTS_PER_SOURCE, SNIPPET_CHARS};

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Default, Deserialize)]
struct Item {
    #[serde(default)]
    id: ItemId,
    #[serde(default)]
    snippet: ItemSnippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ItemSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

pub async fn search(sources: &Sources, api_key: &str, query: &str) -> Result<Vec<SourceRecord>> {
    let req = sources
        .http
        .get(format!("{}/youtube/v3/search", sources.endpoints.youtube))
        .query(&[
            ("part", "snippet"),
            ("q", query),
            ("maxResults", RESULTS_PER_SOURCE.to_string().as_str()),
            ("type", "video"),
            ("key", api_key),
        ]);
    let resp: SearchResponse = sources.get_json(req).await?;

    Ok(resp
        .items
        .into_iter()
        .map(|item| SourceRecord {
            source: "YouTube".to_string(),
            title: item.snippet.title,
            snippet: clean_text(&item.snippet.description, SNIPPET_CHARS),
            url: item
                .id
                .video_id
                .filter(|id| !id.is_empty())
                .map(|id| format!("https://www.youtube.com/watch?v={}", id))
                .unwrap_or_default(),
        })
        .collect())
}
