use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use super::{facebook, reader, stackoverflow, twitter, Contribution, SourceRecord, Sources};

/// Punctuation that usually closes a sentence rather than a link.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ']', '\'', '"'];

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)https?://[^\s)]+").expect("static URL pattern"))
}

/// Absolute http(s) URLs found in free text, deduplicated by exact string,
/// in order of first appearance. Candidates are not validated here.
/// Dedup happens before normalization, so `https://a.com` and `https://a.com/`
/// are both kept and resolve to records with the same normalized `url`.
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    url_pattern()
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(TRAILING_PUNCTUATION).to_string())
        .filter(|candidate| seen.insert(candidate.clone()))
        .collect()
}

/// True when `url`'s host is `domain` or one of its subdomains.
fn host_is(url: &Url, domain: &str) -> bool {
    url.host_str().is_some_and(|host| {
        let host = host.to_ascii_lowercase();
        host == domain || host.ends_with(&format!(".{}", domain))
    })
}

/// Platforms with a dedicated profile adapter, tried in this order before the
/// generic reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    StackOverflow,
    Twitter,
    Facebook,
}

impl ProfileSource {
    pub const PRIORITY: [ProfileSource; 3] = [
        ProfileSource::StackOverflow,
        ProfileSource::Twitter,
        ProfileSource::Facebook,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProfileSource::StackOverflow => "StackOverflow",
            ProfileSource::Twitter => "Twitter",
            ProfileSource::Facebook => "Facebook",
        }
    }

    pub fn claims(self, url: &Url) -> bool {
        match self {
            ProfileSource::StackOverflow => host_is(url, "stackoverflow.com"),
            ProfileSource::Twitter => host_is(url, "twitter.com") || host_is(url, "x.com"),
            ProfileSource::Facebook => host_is(url, "facebook.com"),
        }
    }
}

impl Sources {
    /// Run one profile adapter. A missing credential disables it.
    pub async fn profile(&self, profile: ProfileSource, url: &Url) -> Contribution {
        let result = match profile {
            ProfileSource::StackOverflow => {
                stackoverflow::lookup(self, self.credentials.stack_exchange.as_deref(), url).await
            }
            ProfileSource::Twitter => match &self.credentials.twitter_bearer {
                Some(token) => twitter::lookup(self, token, url).await,
                None => return Contribution::Disabled,
            },
            ProfileSource::Facebook => match &self.credentials.facebook_graph {
                Some(token) => facebook::lookup(self, token, url).await,
                None => return Contribution::Disabled,
            },
        };
        Contribution::settle(profile.label(), result.map(|r| r.into_iter().collect()))
    }

    /// Resolve one URL from the query to at most one record: the first
    /// claiming profile adapter that produces something, else the generic
    /// reader. Unparseable URLs resolve to nothing.
    pub async fn resolve_url(&self, raw: &str) -> Option<SourceRecord> {
        let url = Url::parse(raw).ok()?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return None;
        }

        for profile in ProfileSource::PRIORITY {
            if !profile.claims(&url) {
                continue;
            }
            if let Some(record) = self.profile(profile, &url).await.into_records().pop() {
                return Some(record);
            }
        }

        let result = reader::read(self, &url).await;
        Contribution::settle("reader", result.map(|r| r.into_iter().collect()))
            .into_records()
            .pop()
    }
}
