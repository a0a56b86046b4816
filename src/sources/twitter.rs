use anyhow::Result;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{calendar_day, clean_text, SourceRecord, Sources, PROFILE_CHARS, RESULTS_PER_SOURCE};

/// Path segments that are app routes rather than handles.
const RESERVED_PATHS: &[&str] = &["i", "home"];

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct User {
    id: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    description: String,
    location: Option<String>,
    #[serde(default)]
    verified: bool,
    #[serde(default)]
    public_metrics: UserMetrics,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetrics {
    #[serde(default)]
    followers_count: u64,
    #[serde(default)]
    following_count: u64,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    #[serde(default)]
    text: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    public_metrics: TweetMetrics,
}

#[derive(Debug, Default, Deserialize)]
struct TweetMetrics {
    #[serde(default)]
    like_count: u64,
}

fn username(url: &Url) -> Option<String> {
    let handle = url.path_segments()?.find(|s| !s.is_empty())?;
    if RESERVED_PATHS.contains(&handle.to_lowercase().as_str()) {
        return None;
    }
    Some(handle.to_string())
}

pub async fn lookup(sources: &Sources, bearer: &str, url: &Url) -> Result<Option<SourceRecord>> {
    let Some(handle) = username(url) else {
        return Ok(None);
    };
    let base = &sources.endpoints.twitter;

    let user_req = sources
        .http
        .get(format!("{}/users/by/username/{}", base, handle))
        .bearer_auth(bearer)
        .query(&[("user.fields", "public_metrics,description,location,verified")]);
    let envelope: Envelope<User> = sources.get_json(user_req).await?;
    let Some(user) = envelope.data else {
        return Ok(None);
    };

    let tweets_req = sources
        .http
        .get(format!("{}/users/{}/tweets", base, user.id))
        .bearer_auth(bearer)
        .query(&[
            ("max_results", RESULTS_PER_SOURCE.to_string().as_str()),
            ("tweet.fields", "public_metrics,created_at"),
        ]);
    let tweets = match sources.get_json::<Envelope<Vec<Tweet>>>(tweets_req).await {
        Ok(envelope) => envelope.data.unwrap_or_default(),
        Err(e) => {
            debug!(handle = %handle, error = %e, "timeline unavailable");
            Vec::new()
        }
    };

    let timeline = tweets
        .iter()
        .map(|t| {
            format!(
                "- {} ({} likes): {}",
                calendar_day(&t.created_at),
                t.public_metrics.like_count,
                clean_text(&t.text, PROFILE_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let snippet = format!(
        "Name: @{}{}\nBio: {}\nLocation: {}\nFollowers: {}, Following: {}\nRecent Tweets:\n{}",
        user.username,
        if user.verified { " (verified)" } else { "" },
        user.description,
        user.location.unwrap_or_default(),
        user.public_metrics.followers_count,
        user.public_metrics.following_count,
        timeline
    );

    Ok(Some(SourceRecord {
        source: "Twitter".to_string(),
        title: format!("Twitter Profile @{}", user.username),
        snippet: clean_text(&snippet, PROFILE_CHARS),
        url: url.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::config_for;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_username_skips_app_routes() {
        let profile = Url::parse("https://x.com/rustlang").unwrap();
        assert_eq!(username(&profile).as_deref(), Some("rustlang"));

        let status = Url::parse("https://twitter.com/rustlang/status/123").unwrap();
        assert_eq!(username(&status).as_deref(), Some("rustlang"));

        assert!(username(&Url::parse("https://x.com/home").unwrap()).is_none());
        assert!(username(&Url::parse("https://x.com/i/flow/login").unwrap()).is_none());
        assert!(username(&Url::parse("https://x.com/").unwrap()).is_none());
    }

    #[tokio::test]
    async fn test_lookup_with_timeline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/by/username/rustlang"))
            .and(header("Authorization", "Bearer tw-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "id": "165262096",
                    "username": "rustlang",
                    "description": "Empowering everyone\nto build reliable software.",
                    "verified": true,
                    "public_metrics": { "followers_count": 150000, "following_count": 10 }
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/165262096/tweets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "text": "Rust 1.80 is out!",
                    "created_at": "2024-07-25T15:00:00.000Z",
                    "public_metrics": { "like_count": 900 }
                }]
            })))
            .mount(&server)
            .await;

        let sources = Sources::new(&config_for(&server.uri())).unwrap();
        let url = Url::parse("https://x.com/rustlang").unwrap();
        let record = lookup(&sources, "tw-token", &url).await.unwrap().unwrap();

        assert_eq!(record.title, "Twitter Profile @rustlang");
        assert!(record.snippet.starts_with("Name: @rustlang (verified) Bio: Empowering everyone to build"));
        assert!(record.snippet.contains("- 2024-07-25 (900 likes): Rust 1.80 is out!"));
    }

    #[tokio::test]
    async fn test_unknown_user_is_no_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errors": [{ "detail": "Could not find user" }]
            })))
            .mount(&server)
            .await;

        let sources = Sources::new(&config_for(&server.uri())).unwrap();
        let url = Url::parse("https://twitter.com/nobody_here").unwrap();
        assert!(lookup(&sources, "tw-token", &url).await.unwrap().is_none());
    }
}
