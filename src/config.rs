use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Outbound base URLs. Production defaults; tests point these at a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub reddit: String,
    pub hacker_news: String,
    pub wikipedia: String,
    pub youtube: String,
    pub news: String,
    pub stack_exchange: String,
    pub twitter: String,
    pub facebook: String,
    /// Readability proxy used for URLs without a dedicated adapter.
    pub reader: String,
    pub llm: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            reddit: "https://www.reddit.com".to_string(),
            hacker_news: "https://hn.algolia.com".to_string(),
            wikipedia: "https://en.wikipedia.org".to_string(),
            youtube: "https://www.googleapis.com".to_string(),
            news: "https://newsapi.org".to_string(),
            stack_exchange: "https://api.stackexchange.com/2.3".to_string(),
            twitter: "https://api.twitter.com/2".to_string(),
            facebook: "https://graph.facebook.com/v19.0".to_string(),
            reader: "https://r.jina.ai".to_string(),
            llm: "https://api.groq.com/openai/v1".to_string(),
        }
    }
}

/// Named credentials. Only `llm` is required, and only once a query arrives.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub llm: Option<String>,
    pub youtube: Option<String>,
    pub news: Option<String>,
    pub stack_exchange: Option<String>,
    pub twitter_bearer: Option<String>,
    pub facebook_graph: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub model: String,
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    /// Applied to every adapter request.
    pub source_timeout: Duration,
    /// Applied to the completion call, which is much slower than a search.
    pub llm_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            model: "llama3-70b-8192".to_string(),
            credentials: Credentials::default(),
            endpoints: Endpoints::default(),
            source_timeout: Duration::from_secs(20),
            llm_timeout: Duration::from_secs(120),
        }
    }
}

impl Config {
    /// Build the process configuration. Call once, after `dotenv::dotenv()`.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bind = match var("RELAY_BIND") {
            Some(raw) => raw
                .parse::<SocketAddr>()
                .with_context(|| format!("RELAY_BIND is not a socket address: {}", raw))?,
            None => defaults.bind,
        };

        let source_timeout = var("HTTP_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.source_timeout);

        let endpoints = Endpoints {
            llm: var("LLM_BASE_URL").unwrap_or(defaults.endpoints.llm.clone()),
            ..defaults.endpoints
        };

        let credentials = Credentials {
            llm: var("LLM_API_KEY").or_else(|| var("GROQ_API_KEY")),
            youtube: var("YOUTUBE_API_KEY"),
            news: var("NEWS_API_KEY"),
            stack_exchange: var("STACKEXCHANGE_KEY"),
            twitter_bearer: var("X_BEARER_TOKEN"),
            facebook_graph: var("FB_GRAPH_TOKEN"),
        };

        Ok(Self {
            bind,
            model: var("LLM_MODEL").unwrap_or(defaults.model),
            credentials,
            endpoints,
            source_timeout,
            llm_timeout: defaults.llm_timeout,
        })
    }
}

/// Read an env var, treating blank values as unset.
fn var(key: &str) -> Option<String> {
    dotenv::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
