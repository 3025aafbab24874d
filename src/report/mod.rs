//! Turning detected labels into the language distribution report.

mod chart;
mod export;
mod table;

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::models::LanguageLabel;

pub use chart::{render_pie_svg, CHART_TITLE};
pub use export::{csv_data_uri, to_csv, CSV_FILE_NAME, CSV_MIME};
pub use table::render_table;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to render chart: {0}")]
    Chart(String),
}

/// Count of comments per detected language.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LanguageTally {
    counts: HashMap<LanguageLabel, usize>,
}

impl LanguageTally {
    pub fn add(&mut self, label: LanguageLabel) {
        *self.counts.entry(label).or_insert(0) += 1;
    }

    pub fn count(&self, code: &str) -> usize {
        self.counts.get(code).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn into_report(self) -> Report {
        let total = self.total();
        let mut rows: Vec<ReportRow> = self
            .counts
            .into_iter()
            .map(|(language, count)| ReportRow {
                percentage: round_percentage(count, total),
                language,
                count,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.language.cmp(&b.language))
        });

        Report { rows }
    }
}

impl FromIterator<LanguageLabel> for LanguageTally {
    fn from_iter<I: IntoIterator<Item = LanguageLabel>>(labels: I) -> Self {
        let mut tally = LanguageTally::default();
        for label in labels {
            tally.add(label);
        }
        tally
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub language: LanguageLabel,
    pub count: usize,
    /// Share of all classified comments, one decimal place.
    pub percentage: f64,
}

/// Rows sorted by count, largest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of classified comments behind the report.
    pub fn total(&self) -> usize {
        self.rows.iter().map(|row| row.count).sum()
    }
}

/// `count / total * 100` to one decimal, exact halves going to the even digit.
pub fn round_percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 100.0 * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(codes: &[&str]) -> Vec<LanguageLabel> {
        codes.iter().map(|c| LanguageLabel::from(*c)).collect()
    }

    #[test]
    fn test_tally_counts_each_label() {
        let tally: LanguageTally = labels(&["en", "ko", "en", "ja", "en"]).into_iter().collect();
        assert_eq!(tally.count("en"), 3);
        assert_eq!(tally.count("ko"), 1);
        assert_eq!(tally.count("fr"), 0);
        assert_eq!(tally.total(), 5);
        assert_eq!(tally.len(), 3);
    }

    #[test]
    fn test_report_for_two_languages() {
        let report = labels(&["en", "ko", "en"])
            .into_iter()
            .collect::<LanguageTally>()
            .into_report();

        let rows = report.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].language.as_str(), rows[0].count, rows[0].percentage), ("en", 2, 66.7));
        assert_eq!((rows[1].language.as_str(), rows[1].count, rows[1].percentage), ("ko", 1, 33.3));
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn test_rows_sorted_by_count_descending() {
        let report = labels(&["fr", "en", "en", "ko", "ko", "ko", "de"])
            .into_iter()
            .collect::<LanguageTally>()
            .into_report();
        let counts: Vec<usize> = report.rows().iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![3, 2, 1, 1]);
        assert!(report.rows().iter().all(|r| r.count >= 1));
    }

    #[test]
    fn test_percentages_sum_to_hundred_within_rounding() {
        let codes: Vec<&str> = ["en"; 7]
            .into_iter()
            .chain(["ko"; 5])
            .chain(["ja"; 3])
            .chain(["es"; 1])
            .chain(["pt"; 13])
            .collect();
        let report = labels(&codes).into_iter().collect::<LanguageTally>().into_report();

        let sum: f64 = report.rows().iter().map(|r| r.percentage).sum();
        let tolerance = 0.1 * report.rows().len() as f64;
        assert!((sum - 100.0).abs() <= tolerance, "sum was {sum}");
        assert_eq!(report.total(), codes.len());
    }

    #[test]
    fn test_single_language_is_hundred_percent() {
        let report = labels(&["ko", "ko"]).into_iter().collect::<LanguageTally>().into_report();
        assert_eq!(report.rows()[0].percentage, 100.0);
    }

    #[test]
    fn test_empty_tally_gives_empty_report() {
        let tally = LanguageTally::default();
        assert!(tally.is_empty());
        assert!(tally.into_report().is_empty());
    }

    #[test]
    fn test_round_percentage() {
        assert_eq!(round_percentage(1, 3), 33.3);
        assert_eq!(round_percentage(1, 8), 12.5);
        assert_eq!(round_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_round_percentage_halves_go_to_even() {
        let sixteenths: Vec<f64> = [1, 5, 3].iter().map(|c| round_percentage(*c, 16)).collect();
        assert_eq!(sixteenths, vec![6.2, 31.2, 18.8]);
    }

    #[test]
    fn test_report_rounds_sixteenths_to_even() {
        let codes: Vec<&str> = ["en"; 11].into_iter().chain(["ko"; 5]).collect();
        let report = labels(&codes).into_iter().collect::<LanguageTally>().into_report();
        assert_eq!(report.rows()[0].percentage, 68.8);
        assert_eq!(report.rows()[1].percentage, 31.2);
    }
}
