use anyhow::Result;
use serde::Deserialize;

use super::{clean_text, SourceRecord, Sources, RESULTS_PER_SOURCE, SNIPPET_CHARS};

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Default, Deserialize)]
struct Hit {
    title: Option<String>,
    url: Option<String>,
    story_text: Option<String>,
    #[serde(rename = "objectID")]
    object_id: Option<String>,
}

pub async fn search(sources: &Sources, query: &str) -> Result<Vec<SourceRecord>> {
    let req = sources
        .http
        .get(format!("{}/api/v1/search", sources.endpoints.hacker_news))
        .query(&[
            ("query", query),
            ("tags", "story"),
            ("hitsPerPage", RESULTS_PER_SOURCE.to_string().as_str()),
        ]);
    let resp: SearchResponse = sources.get_json(req).await?;

    Ok(resp.hits.into_iter().map(to_record).collect())
}

fn to_record(hit: Hit) -> SourceRecord {
    let non_empty = |s: &Option<String>| {
        s.as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
    };

    let snippet = non_empty(&hit.story_text)
        .or_else(|| non_empty(&hit.title))
        .or_else(|| non_empty(&hit.url))
        .unwrap_or_default();
    let url = non_empty(&hit.url)
        .or_else(|| {
            non_empty(&hit.object_id)
                .map(|id| format!("https://news.ycombinator.com/item?id={}", id))
        })
        .unwrap_or_default();

    SourceRecord {
        source: "Hacker News".to_string(),
        title: hit.title.unwrap_or_default(),
        snippet: clean_text(&snippet, SNIPPET_CHARS),
        url,
    }
}
