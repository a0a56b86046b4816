use crate::sources::SourceRecord;

/// Maximum number of records that reach the prompt and the response.
pub const CORPUS_CAP: usize = 25;

/// Render records as prompt notes: a dash header with source and title, then
/// indented snippet and link lines, blocks separated by a blank line.
pub fn render(records: &[SourceRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "- ({}) {}\n  {}\n  Link: {}",
                r.source, r.title, r.snippet, r.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: &str, title: &str, snippet: &str, url: &str) -> SourceRecord {
        SourceRecord {
            source: source.to_string(),
            title: title.to_string(),
            snippet: snippet.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_render_blocks() {
        let records = vec![
            record(
                "Wikipedia",
                "Climate change policy",
                "Policies to reduce emissions.",
                "https://en.wikipedia.org/wiki/Climate_change_policy",
            ),
            record("Reddit", "Carbon tax?", "", "https://reddit.com/r/x"),
        ];
        assert_eq!(
            render(&records),
            "- (Wikipedia) Climate change policy\n  Policies to reduce emissions.\n  Link: https://en.wikipedia.org/wiki/Climate_change_policy\n\n\
             - (Reddit) Carbon tax?\n  \n  Link: https://reddit.com/r/x"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "");
    }
}
