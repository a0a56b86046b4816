pub mod corpus;
pub mod prompts;
pub mod sanitize;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::llm::{LlmClient, SynthesisError};
use crate::sources::urls::extract_urls;
use crate::sources::{SourceRecord, Sources, TopicSource};

use corpus::CORPUS_CAP;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Missing query")]
    EmptyQuery,

    #[error("Completion API key not configured. Set LLM_API_KEY (or GROQ_API_KEY) in the environment")]
    NotConfigured,

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

/// Raw per-adapter sizes, plus the number of usable records before the cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCounts {
    pub reddit: usize,
    pub hacker_news: usize,
    pub wikipedia: usize,
    pub youtube: usize,
    pub news: usize,
    pub total: usize,
}

impl SourceCounts {
    fn record(&mut self, topic: TopicSource, n: usize) {
        match topic {
            TopicSource::Reddit => self.reddit = n,
            TopicSource::HackerNews => self.hacker_news = n,
            TopicSource::Wikipedia => self.wikipedia = n,
            TopicSource::YouTube => self.youtube = n,
            TopicSource::News => self.news = n,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisResult {
    pub result: String,
    pub sources: Vec<SourceRecord>,
    pub counts: SourceCounts,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub model: String,
}

/// Output of the fan-out: the capped corpus and the counts.
#[derive(Debug)]
pub struct Gathered {
    pub corpus: Vec<SourceRecord>,
    pub counts: SourceCounts,
}

pub struct Pipeline {
    sources: Sources,
    llm: LlmClient,
}

impl Pipeline {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            sources: Sources::new(config)?,
            llm: LlmClient::new(config)?,
        })
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_configured()
    }

    /// Query every source concurrently and merge the results: URL-derived
    /// records first, then topic results in priority order. Incomplete records
    /// are dropped before the cap is applied.
    pub async fn gather(&self, query: &str) -> Gathered {
        let urls = extract_urls(query);

        let direct = join_all(urls.iter().map(|url| self.sources.resolve_url(url)));
        let topical = join_all(
            TopicSource::PRIORITY
                .iter()
                .map(|topic| self.sources.search(*topic, query)),
        );
        let (direct, topical) = tokio::join!(direct, topical);

        let mut counts = SourceCounts::default();
        let mut merged: Vec<SourceRecord> = direct.into_iter().flatten().collect();
        for (topic, contribution) in TopicSource::PRIORITY.iter().zip(topical) {
            counts.record(*topic, contribution.len());
            merged.extend(contribution.into_records());
        }

        merged.retain(SourceRecord::is_complete);
        counts.total = merged.len();
        merged.truncate(CORPUS_CAP);

        info!(
            urls = urls.len(),
            reddit = counts.reddit,
            hacker_news = counts.hacker_news,
            wikipedia = counts.wikipedia,
            youtube = counts.youtube,
            news = counts.news,
            total = counts.total,
            corpus = merged.len(),
            "sources gathered"
        );

        Gathered {
            corpus: merged,
            counts,
        }
    }

    /// Full request: validate, gather, synthesize, sanitize.
    pub async fn run(&self, query: &str) -> Result<SynthesisResult, PipelineError> {
        if query.trim().is_empty() {
            return Err(PipelineError::EmptyQuery);
        }
        if !self.llm.is_configured() {
            return Err(PipelineError::NotConfigured);
        }

        // Adapters and the prompt see the query exactly as submitted.
        info!(query, "research request started");
        let gathered = self.gather(query).await;

        let notes = corpus::render(&gathered.corpus);
        let raw = self.llm.chat(&prompts::messages(query, &notes)).await?;
        let result = sanitize::sanitize(&raw);

        info!(
            raw_len = raw.len(),
            answer_len = result.len(),
            sources = gathered.corpus.len(),
            "research request complete"
        );

        Ok(SynthesisResult {
            result,
            sources: gathered.corpus,
            counts: gathered.counts,
            query: query.to_string(),
            timestamp: Utc::now(),
            model: self.llm.model().to_string(),
        })
    }
}
