use anyhow::{Context, Result};
use url::Url;

use super::{clean_text, html_to_text, SourceRecord, Sources, PROFILE_CHARS};

/// Fetch a page through the readability proxy and reduce it to a short text
/// record labelled with the page's hostname.
pub async fn read(sources: &Sources, url: &Url) -> Result<Option<SourceRecord>> {
    let proxied = format!("{}/{}", sources.endpoints.reader.trim_end_matches('/'), url);
    let resp = sources
        .http
        .get(proxied)
        .send()
        .await
        .map_err(reqwest::Error::without_url)
        .context("reader request failed")?;

    let status = resp.status();
    if !status.is_success() {
        anyhow::bail!("reader returned {}", status);
    }

    let is_html = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("html"));
    let body = resp.text().await.context("failed to read reader body")?;

    let text = if is_html { html_to_text(&body) } else { body };
    let snippet = clean_text(&text, PROFILE_CHARS);
    if snippet.is_empty() {
        return Ok(None);
    }

    let host = url.host_str().unwrap_or("link").to_string();
    Ok(Some(SourceRecord {
        title: format!("Content from {}", host),
        source: host,
        snippet,
        url: url.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::config_for;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_read_labels_with_hostname() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/https://blog.example.org/posts/async"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "text/plain")
                    .set_body_string("Title: Async\n\n\nMarkdown   Content:\nSome words."),
            )
            .mount(&server)
            .await;

        let sources = Sources::new(&config_for(&server.uri())).unwrap();
        let url = Url::parse("https://blog.example.org/posts/async").unwrap();
        let record = read(&sources, &url).await.unwrap().unwrap();

        assert_eq!(record.source, "blog.example.org");
        assert_eq!(record.title, "Content from blog.example.org");
        assert_eq!(record.snippet, "Title: Async Markdown Content: Some words.");
        assert_eq!(record.url, "https://blog.example.org/posts/async");
    }

    #[tokio::test]
    async fn test_read_renders_html_and_caps_length() {
        let server = MockServer::start().await;
        let html = format!("<html><body><p>{}</p></body></html>", "word ".repeat(1000));
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let sources = Sources::new(&config_for(&server.uri())).unwrap();
        let url = Url::parse("https://example.com/").unwrap();
        let record = read(&sources, &url).await.unwrap().unwrap();
        assert!(!record.snippet.contains('<'));
        assert_eq!(record.snippet.chars().count(), PROFILE_CHARS);
    }

    #[tokio::test]
    async fn test_read_empty_body_is_no_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  \n "))
            .mount(&server)
            .await;

        let sources = Sources::new(&config_for(&server.uri())).unwrap();
        let url = Url::parse("https://example.com/empty").unwrap();
        assert!(read(&sources, &url).await.unwrap().is_none());
    }
}
