use base64::{engine::general_purpose, Engine as _};

use super::{Report, ReportError};

pub const CSV_FILE_NAME: &str = "comment_language_result.csv";

pub const CSV_MIME: &str = "text/csv";

const CSV_HEADER: [&str; 3] = ["Language", "Count", "Percentage"];

/// UTF-8 CSV of the report, header first, no index column.
pub fn to_csv(report: &Report) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for row in report.rows() {
        let count = row.count.to_string();
        let percentage = format!("{:.1}", row.percentage);
        writer.write_record([row.language.as_str(), count.as_str(), percentage.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))
}

/// Data URI a browser can download the CSV from without another request.
pub fn csv_data_uri(csv: &[u8]) -> String {
    format!(
        "data:{CSV_MIME};charset=utf-8;base64,{}",
        general_purpose::STANDARD.encode(csv)
    )
}
