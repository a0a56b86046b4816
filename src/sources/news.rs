use anyhow::Result;
use serde::Deserialize;

use super::{clean_text, SourceRecord, Sources, RESULTS_PER_SOURCE, SNIPPET_CHARS};

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Default, Deserialize)]
struct Article {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
}

pub async fn search(sources: &Sources, api_key: &str, query: &str) -> Result<Vec<SourceRecord>> {
    let req = sources
        .http
        .get(format!("{}/v2/everything", sources.endpoints.news))
        .header("X-Api-Key", api_key)
        .query(&[
            ("q", query),
            ("pageSize", RESULTS_PER_SOURCE.to_string().as_str()),
            ("sortBy", "publishedAt"),
            ("language", "en"),
        ]);
    let resp: SearchResponse = sources.get_json(req).await?;

    Ok(resp.articles.into_iter().map(to_record).collect())
}

fn to_record(article: Article) -> SourceRecord {
    let body = [&article.description, &article.content, &article.title]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .cloned()
        .unwrap_or_default();

    SourceRecord {
        source: "News".to_string(),
        title: article.title.unwrap_or_default(),
        snippet: clean_text(&body, SNIPPET_CHARS),
        url: article.url.unwrap_or_default(),
    }
}
