pub mod facebook;
pub mod hacker_news;
pub mod news;
pub mod reader;
pub mod reddit;
pub mod stackoverflow;
pub mod twitter;
pub mod urls;
pub mod wikipedia;
pub mod youtube;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::config::{Config, Credentials, Endpoints};

/// Per-source result cap for the topic searches.
pub const RESULTS_PER_SOURCE: usize = 5;
/// Snippet length for plain search hits.
pub const SNIPPET_CHARS: usize = 500;
/// Snippet length for profile and page-content records.
pub const PROFILE_CHARS: usize = 1200;

const USER_AGENT: &str = concat!("research-relay/", env!("CARGO_PKG_VERSION"));

/// The uniform unit every adapter produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    pub source: String,
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl SourceRecord {
    /// Records without a title or a link never reach the corpus.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.url.trim().is_empty()
    }
}

/// Collapse all whitespace (newlines included) to single spaces, trim, and cap
/// the result at `limit` characters.
pub fn clean_text(text: &str, limit: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= limit {
        collapsed
    } else {
        collapsed.chars().take(limit).collect()
    }
}

/// Render an HTML fragment to plain text. Falls back to tag stripping if the
/// renderer rejects the input.
pub fn html_to_text(html: &str) -> String {
    html2text::from_read(html.as_bytes(), 10_000).unwrap_or_else(|_| {
        let tags = regex::Regex::new(r"<[^>]+>").map(|re| re.replace_all(html, "").into_owned());
        tags.unwrap_or_else(|_| html.to_string())
    })
}

/// UTC calendar day (`YYYY-MM-DD`) of an API timestamp. Accepts RFC 3339 and
/// the Graph API's `+0000` offset form; anything else keeps its first ten chars.
pub fn calendar_day(timestamp: &str) -> String {
    let parsed = chrono::DateTime::parse_from_rfc3339(timestamp)
        .or_else(|_| chrono::DateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%z"));
    match parsed {
        Ok(dt) => dt.with_timezone(&chrono::Utc).date_naive().to_string(),
        Err(_) => timestamp.chars().take(10).collect(),
    }
}

/// What one adapter call contributed. Errors are folded in here so nothing
/// downstream of an adapter can fail because of it.
#[derive(Debug)]
pub enum Contribution {
    Records(Vec<SourceRecord>),
    /// The adapter needs a credential that is not configured.
    Disabled,
    /// The adapter errored. The reason is logged when settling.
    Failed,
}

impl Contribution {
    fn settle(label: &str, result: Result<Vec<SourceRecord>>) -> Self {
        match result {
            Ok(records) => {
                debug!(source = label, records = records.len(), "adapter finished");
                Self::Records(records)
            }
            Err(e) => {
                debug!(source = label, reason = %format!("{:#}", e), "adapter failed");
                Self::Failed
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Records(records) => records.len(),
            Self::Disabled | Self::Failed => 0,
        }
    }

    pub fn into_records(self) -> Vec<SourceRecord> {
        match self {
            Self::Records(records) => records,
            Self::Disabled | Self::Failed => Vec::new(),
        }
    }
}

/// The topic searches, in corpus priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicSource {
    Reddit,
    HackerNews,
    Wikipedia,
    YouTube,
    News,
}

impl TopicSource {
    pub const PRIORITY: [TopicSource; 5] = [
        TopicSource::Reddit,
        TopicSource::HackerNews,
        TopicSource::Wikipedia,
        TopicSource::YouTube,
        TopicSource::News,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TopicSource::Reddit => "Reddit",
            TopicSource::HackerNews => "Hacker News",
            TopicSource::Wikipedia => "Wikipedia",
            TopicSource::YouTube => "YouTube",
            TopicSource::News => "News",
        }
    }
}

/// Shared handle for every adapter: one HTTP client plus the read-only
/// credential and endpoint tables.
pub struct Sources {
    http: reqwest::Client,
    credentials: Credentials,
    endpoints: Endpoints,
}

impl Sources {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.source_timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create source HTTP client")?;

        Ok(Self {
            http,
            credentials: config.credentials.clone(),
            endpoints: config.endpoints.clone(),
        })
    }

    /// Run one topic search against the literal query. Never fails.
    pub async fn search(&self, topic: TopicSource, query: &str) -> Contribution {
        let result = match topic {
            TopicSource::Reddit => reddit::search(self, query).await,
            TopicSource::HackerNews => hacker_news::search(self, query).await,
            TopicSource::Wikipedia => wikipedia::search(self, query).await,
            TopicSource::YouTube => match &self.credentials.youtube {
                Some(key) => youtube::search(self, key, query).await,
                None => return Contribution::Disabled,
            },
            TopicSource::News => match &self.credentials.news {
                Some(key) => news::search(self, key, query).await,
                None => return Contribution::Disabled,
            },
        };
        Contribution::settle(topic.label(), result)
    }

    /// GET a JSON document, treating any non-2xx as an error. Request URLs
    /// can carry API keys, so they are stripped from transport errors.
    async fn get_json<T>(&self, req: reqwest::RequestBuilder) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let resp = req
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("request failed")?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("upstream returned {}", status);
        }
        resp.json::<T>()
            .await
            .map_err(reqwest::Error::without_url)
            .context("malformed response body")
    }
}
