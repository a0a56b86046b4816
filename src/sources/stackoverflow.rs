use anyhow::Result;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{clean_text, SourceRecord, Sources, PROFILE_CHARS, RESULTS_PER_SOURCE};

#[derive(Debug, Deserialize)]
struct Wrapper<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
struct User {
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    reputation: i64,
    #[serde(default)]
    badge_counts: BadgeCounts,
    location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BadgeCounts {
    #[serde(default)]
    gold: i64,
    #[serde(default)]
    silver: i64,
    #[serde(default)]
    bronze: i64,
}

#[derive(Debug, Default, Deserialize)]
struct Answer {
    #[serde(default)]
    score: i64,
}

/// `/users/<numeric id>/...` on stackoverflow.com.
fn user_id(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    if segments.next()? != "users" {
        return None;
    }
    let id = segments.next()?;
    (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then(|| id.to_string())
}

/// Profile plus top-voted answers. The Stack Exchange key only raises quota,
/// so it is optional.
pub async fn lookup(
    sources: &Sources,
    key: Option<&str>,
    url: &Url,
) -> Result<Option<SourceRecord>> {
    let Some(id) = user_id(url) else {
        return Ok(None);
    };
    let base = &sources.endpoints.stack_exchange;

    let mut user_req = sources
        .http
        .get(format!("{}/users/{}", base, id))
        .query(&[("site", "stackoverflow")]);
    if let Some(key) = key {
        user_req = user_req.query(&[("key", key)]);
    }
    let users: Wrapper<User> = sources.get_json(user_req).await?;
    let Some(user) = users.items.into_iter().next() else {
        return Ok(None);
    };

    let mut answers_req = sources
        .http
        .get(format!("{}/users/{}/answers", base, id))
        .query(&[
            ("order", "desc"),
            ("sort", "votes"),
            ("pagesize", RESULTS_PER_SOURCE.to_string().as_str()),
            ("site", "stackoverflow"),
        ]);
    if let Some(key) = key {
        answers_req = answers_req.query(&[("key", key)]);
    }
    let answers = match sources.get_json::<Wrapper<Answer>>(answers_req).await {
        Ok(w) => w.items,
        Err(e) => {
            debug!(user_id = %id, error = %e, "answer listing unavailable");
            Vec::new()
        }
    };

    let top_answers = answers
        .iter()
        .enumerate()
        .map(|(i, a)| format!("- Top Answer #{} (score: {})", i + 1, a.score))
        .collect::<Vec<_>>()
        .join("\n");
    let snippet = format!(
        "Display Name: {}\nReputation: {}\nBadges: gold {}, silver {}, bronze {}\nLocation: {}\nTop Answers:\n{}",
        user.display_name,
        user.reputation,
        user.badge_counts.gold,
        user.badge_counts.silver,
        user.badge_counts.bronze,
        user.location.unwrap_or_default(),
        top_answers
    );

    Ok(Some(SourceRecord {
        source: "StackOverflow".to_string(),
        title: format!("StackOverflow Profile of {}", user.display_name),
        snippet: clean_text(&snippet, PROFILE_CHARS),
        url: url.to_string(),
    }))
}
