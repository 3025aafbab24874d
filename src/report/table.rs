use super::Report;

/// Plain-text table for terminal output.
pub fn render_table(report: &Report) -> String {
    let width = report
        .rows()
        .iter()
        .map(|row| row.language.as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max("Language".len());

    let mut out = format!("{:<width$}  {:>7}  {:>10}\n", "Language", "Count", "Percentage");
    out.push_str(&format!("{}  {}  {}\n", "-".repeat(width), "-".repeat(7), "-".repeat(10)));

    for row in report.rows() {
        out.push_str(&format!(
            "{:<width$}  {:>7}  {:>9.1}%\n",
            row.language.as_str(),
            row.count,
            row.percentage
        ));
    }

    out
}
