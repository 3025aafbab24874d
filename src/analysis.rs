//! One analysis run: URL in, language report (or the reason there is none) out.
//!
//! Runs share nothing; every call starts from the URL alone.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::collector::{collect_comments, CommentSource};
use crate::config::AnalysisOptions;
use crate::language::{classify_comments, DetectError, LanguageDetector};
use crate::report::{LanguageTally, Report};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Please enter a video URL.")]
    EmptyUrl,

    #[error("Comment collection failed or the video has no comments.")]
    NoComments { collection_error: Option<String> },

    #[error("No comment had a detectable language.")]
    NoClassifiableComments,

    #[error(transparent)]
    Detection(#[from] DetectError),
}

impl AnalysisError {
    /// Input problems are shown as warnings rather than errors.
    pub fn is_warning(&self) -> bool {
        matches!(self, AnalysisError::EmptyUrl)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub report: Report,
    /// Non-empty comments fed to the detector.
    pub collected: usize,
    /// Comments the detector could label.
    pub classified: usize,
}

pub async fn analyze(
    source: &dyn CommentSource,
    detector: &dyn LanguageDetector,
    url: &str,
    options: &AnalysisOptions,
) -> Result<Analysis, AnalysisError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AnalysisError::EmptyUrl);
    }

    info!(url, max_comments = options.max_comments, sort = ?options.sort_order, "starting analysis");

    let collection = collect_comments(source, url, options).await;
    if collection.comments.is_empty() {
        return Err(AnalysisError::NoComments {
            collection_error: collection.failure,
        });
    }

    let labels = classify_comments(detector, &collection.comments)?;
    if labels.is_empty() {
        return Err(AnalysisError::NoClassifiableComments);
    }

    let classified = labels.len();
    let report = labels.into_iter().collect::<LanguageTally>().into_report();
    info!(languages = report.rows().len(), classified, "analysis complete");

    Ok(Analysis {
        report,
        collected: collection.comments.len(),
        classified,
    })
}
