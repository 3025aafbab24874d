//! Gathers the comment texts one analysis runs on.

use futures::stream::{BoxStream, StreamExt};
use tracing::{debug, info, warn};

use crate::config::{AnalysisOptions, SortOrder};
use crate::extract::YoutubeError;
use crate::models::CommentRecord;

/// Anything that can list a video's comments, most relevant first.
pub trait CommentSource: Send + Sync {
    fn comments(
        &self,
        url: &str,
        sort: SortOrder,
    ) -> BoxStream<'static, Result<CommentRecord, YoutubeError>>;
}

/// Outcome of one collection pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Collection {
    /// Trimmed, non-empty texts, at most `max_comments` of them.
    pub comments: Vec<String>,
    /// Why collection stopped early, if it failed.
    pub failure: Option<String>,
}

/// Pulls comments until the source runs dry or the cap is reached.
///
/// A source failure discards whatever was gathered and is reported through
/// [`Collection::failure`]; it never aborts the caller.
pub async fn collect_comments(
    source: &dyn CommentSource,
    url: &str,
    options: &AnalysisOptions,
) -> Collection {
    let mut collection = Collection::default();
    if options.max_comments == 0 {
        return collection;
    }

    let mut stream = source.comments(url, options.sort_order);

    while let Some(item) = stream.next().await {
        match item {
            Ok(record) => {
                let text = record.text.trim();
                if text.is_empty() {
                    debug!(comment_id = %record.comment_id, "skipping empty comment");
                    continue;
                }
                collection.comments.push(text.to_string());
                if collection.comments.len() >= options.max_comments {
                    break;
                }
            }
            Err(e) => {
                warn!(url, error = %e, "comment collection failed");
                collection.comments.clear();
                collection.failure = Some(e.to_string());
                break;
            }
        }
    }

    info!(url, collected = collection.comments.len(), "comment collection finished");
    collection
}


#[cfg(test)]
mod tests {
    use super::test_support::FakeSource;
    use super::*;

    fn options(max_comments: usize) -> AnalysisOptions {
        AnalysisOptions {
            max_comments,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_trims_and_drops_blank_comments() {
        let source = FakeSource::texts(&["  hello  ", "", "   \n\t", "안녕하세요"]);
        let collection = collect_comments(&source, "url", &options(300)).await;
        assert_eq!(collection.comments, vec!["hello", "안녕하세요"]);
        assert!(collection.failure.is_none());
    }

    #[tokio::test]
    async fn test_stops_at_cap() {
        let texts: Vec<String> = (0..500).map(|i| format!("comment {i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let source = FakeSource::texts(&refs);

        let collection = collect_comments(&source, "url", &AnalysisOptions::default()).await;
        assert_eq!(collection.comments.len(), 300);
        assert_eq!(collection.comments[299], "comment 299");
    }

    #[tokio::test]
    async fn test_blank_comments_do_not_count_towards_cap() {
        let source = FakeSource::texts(&[" ", "a", " ", "b", "c"]);
        let collection = collect_comments(&source, "url", &options(2)).await;
        assert_eq!(collection.comments, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_failure_discards_partial_results() {
        let source = FakeSource {
            items: vec![
                Ok("first".to_string()),
                Err("blocked".to_string()),
                Ok("never reached".to_string()),
            ],
        };
        let collection = collect_comments(&source, "url", &options(300)).await;
        assert!(collection.comments.is_empty());
        assert_eq!(
            collection.failure.as_deref(),
            Some("error returned from server: blocked")
        );
    }

    #[tokio::test]
    async fn test_zero_cap_collects_nothing() {
        let source = FakeSource::texts(&["a"]);
        let collection = collect_comments(&source, "url", &options(0)).await;
        assert!(collection.comments.is_empty());
    }
}
