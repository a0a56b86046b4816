use anyhow::Result;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{calendar_day, clean_text, SourceRecord, Sources, PROFILE_CHARS, RESULTS_PER_SOURCE};

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    name: String,
    about: Option<String>,
    fan_count: Option<u64>,
    followers_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Posts {
    #[serde(default)]
    data: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    message: String,
    #[serde(default)]
    created_time: String,
}

fn page_slug(url: &Url) -> Option<String> {
    url.path_segments()?
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Public page metadata and recent posts through the Graph API.
pub async fn lookup(sources: &Sources, token: &str, url: &Url) -> Result<Option<SourceRecord>> {
    let Some(slug) = page_slug(url) else {
        return Ok(None);
    };
    let page_url = graph_url(&sources.endpoints.facebook, &[slug.as_str()])?;
    let posts_url = graph_url(&sources.endpoints.facebook, &[slug.as_str(), "posts"])?;

    let page_req = sources.http.get(page_url).query(&[
        ("fields", "name,about,fan_count,followers_count,link"),
        ("access_token", token),
    ]);
    let page: Page = sources.get_json(page_req).await?;

    let posts_req = sources.http.get(posts_url).query(&[
        ("fields", "message,created_time,permalink_url"),
        ("limit", RESULTS_PER_SOURCE.to_string().as_str()),
        ("access_token", token),
    ]);
    let posts = match sources.get_json::<Posts>(posts_req).await {
        Ok(posts) => posts.data,
        Err(e) => {
            debug!(slug = %slug, error = %e, "page posts unavailable");
            Vec::new()
        }
    };

    let recent = posts
        .iter()
        .map(|p| {
            format!(
                "- {}: {}",
                calendar_day(&p.created_time),
                clean_text(&p.message, PROFILE_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let followers = page
        .followers_count
        .or(page.fan_count)
        .map(|n| n.to_string())
        .unwrap_or_default();
    let snippet = format!(
        "Name: {}\nFollowers: {}\nAbout: {}\nRecent Posts:\n{}",
        page.name,
        followers,
        page.about.unwrap_or_default(),
        recent
    );

    Ok(Some(SourceRecord {
        source: "Facebook".to_string(),
        title: format!("Facebook Page {}", page.name),
        snippet: clean_text(&snippet, PROFILE_CHARS),
        url: url.to_string(),
    }))
}

/// Append percent-encoded path segments to the Graph API base.
fn graph_url(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("graph base cannot carry a path: {}", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
