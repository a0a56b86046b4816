use anyhow::Result;
use serde::Deserialize;
use url::Url;

use super::{clean_text, html_to_text, SourceRecord, Sources, RESULTS_PER_SOURCE, SNIPPET_CHARS};

const ARTICLE_BASE: &str = "https://en.wikipedia.org/wiki/";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: QueryBlock,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBlock {
    #[serde(default)]
    search: Vec<Hit>,
}

#[derive(Debug, Default, Deserialize)]
struct Hit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

pub async fn search(sources: &Sources, query: &str) -> Result<Vec<SourceRecord>> {
    let req = sources
        .http
        .get(format!("{}/w/api.php", sources.endpoints.wikipedia))
        .query(&[
            ("action", "query"),
            ("list", "search"),
            ("srsearch", query),
            ("format", "json"),
        ]);
    let resp: SearchResponse = sources.get_json(req).await?;

    Ok(resp
        .query
        .search
        .into_iter()
        .take(RESULTS_PER_SOURCE)
        .map(|hit| SourceRecord {
            source: "Wikipedia".to_string(),
            snippet: clean_text(&html_to_text(&hit.snippet), SNIPPET_CHARS),
            url: article_url(&hit.title),
            title: hit.title,
        })
        .collect())
}

/// Canonical article link for a page title.
fn article_url(title: &str) -> String {
    if title.trim().is_empty() {
        return String::new();
    }
    let Ok(mut url) = Url::parse(ARTICLE_BASE) else {
        return String::new();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&title.replace(' ', "_"));
    }
    url.to_string()
}
