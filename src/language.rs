//! Language detection for individual comments.
//!
//! A detector answers `Ok(None)` when a text carries no usable signal; such
//! comments are left out of the tally. `Err` is reserved for the detector
//! itself breaking, which ends the run.

use thiserror::Error;
use tracing::{debug, info};
use whatlang::{Detector, Lang};

use crate::models::LanguageLabel;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("language detector failed: {0}")]
    Backend(String),
}

pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Result<Option<LanguageLabel>, DetectError>;
}

/// Trigram detector backed by whatlang.
pub struct WhatlangDetector {
    detector: Detector,
    min_confidence: f64,
}

impl WhatlangDetector {
    pub fn new() -> Self {
        Self::with_min_confidence(0.0)
    }

    pub fn with_min_confidence(min_confidence: f64) -> Self {
        info!(min_confidence, "initializing whatlang language detector");
        Self {
            detector: Detector::new(),
            min_confidence,
        }
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<Option<LanguageLabel>, DetectError> {
        // emoji, digits and punctuation alone say nothing about the language
        if !text.chars().any(char::is_alphabetic) {
            return Ok(None);
        }

        let Some(info) = self.detector.detect(text) else {
            return Ok(None);
        };

        if info.confidence() < self.min_confidence {
            return Ok(None);
        }

        Ok(Some(LanguageLabel::new(language_code(info.lang()))))
    }
}

/// ISO 639-1 code where one exists, whatlang's 639-3 code otherwise.
pub fn language_code(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Kor => "ko",
        Lang::Jpn => "ja",
        Lang::Cmn => "zh",
        Lang::Spa => "es",
        Lang::Por => "pt",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Rus => "ru",
        Lang::Ukr => "uk",
        Lang::Pol => "pl",
        Lang::Nld => "nl",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Fin => "fi",
        Lang::Tur => "tr",
        Lang::Ara => "ar",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Ben => "bn",
        Lang::Tha => "th",
        Lang::Vie => "vi",
        Lang::Ind => "id",
        Lang::Tgl => "tl",
        Lang::Ell => "el",
        Lang::Ces => "cs",
        Lang::Hun => "hu",
        Lang::Ron => "ro",
        Lang::Bul => "bg",
        Lang::Hrv => "hr",
        Lang::Srp => "sr",
        Lang::Pes => "fa",
        Lang::Urd => "ur",
        Lang::Tam => "ta",
        l => l.code(),
    }
}

/// Labels every comment the detector can place; the rest are dropped.
pub fn classify_comments(
    detector: &dyn LanguageDetector,
    comments: &[String],
) -> Result<Vec<LanguageLabel>, DetectError> {
    let mut labels = Vec::with_capacity(comments.len());

    for comment in comments {
        match detector.detect(comment)? {
            Some(label) => labels.push(label),
            None => debug!(comment = %comment, "language not detectable, skipping"),
        }
    }

    info!(
        classified = labels.len(),
        skipped = comments.len() - labels.len(),
        "classification finished"
    );
    Ok(labels)
}
