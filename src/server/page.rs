//! HTML for the analyzer page.

use crate::analysis::{Analysis, AnalysisError};
use crate::report::{csv_data_uri, render_pie_svg, to_csv, CSV_FILE_NAME};

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; color: #222; }
form { display: flex; gap: .5rem; margin: 1rem 0 2rem; }
input[type=text] { flex: 1; padding: .5rem; }
button, a.download { padding: .5rem 1rem; }
.box { padding: .75rem 1rem; border-radius: 4px; margin: 1rem 0; }
.warning { background: #fff4ce; }
.error { background: #fde2e1; }
.success { background: #dff5e3; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border-bottom: 1px solid #ddd; padding: .4rem .6rem; text-align: left; }
th { cursor: pointer; user-select: none; }
td.num { text-align: right; }
"#;

const SORT_SCRIPT: &str = r#"
document.querySelectorAll('table.sortable th').forEach(function (th, col) {
  th.addEventListener('click', function () {
    var body = th.closest('table').tBodies[0];
    var asc = th.dataset.order !== 'asc';
    th.dataset.order = asc ? 'asc' : 'desc';
    var rows = Array.from(body.rows);
    rows.sort(function (a, b) {
      var x = a.cells[col].dataset.value, y = b.cells[col].dataset.value;
      var nx = parseFloat(x), ny = parseFloat(y);
      var cmp = isNaN(nx) || isNaN(ny) ? x.localeCompare(y) : nx - ny;
      return asc ? cmp : -cmp;
    });
    rows.forEach(function (r) { body.appendChild(r); });
  });
});
"#;

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn message_box(class: &str, message: &str) -> String {
    format!("<div class=\"box {class}\">{}</div>\n", escape_html(message))
}

fn render_error(error: &AnalysisError) -> String {
    let mut html = String::new();
    match error {
        AnalysisError::EmptyUrl => html.push_str(&message_box("warning", &error.to_string())),
        AnalysisError::NoComments { collection_error } => {
            if let Some(cause) = collection_error {
                html.push_str(&message_box(
                    "error",
                    &format!("Error while collecting comments: {cause}"),
                ));
            }
            html.push_str(&message_box("error", &error.to_string()));
        }
        _ => html.push_str(&message_box("error", &error.to_string())),
    }
    html
}

fn render_analysis(analysis: &Analysis) -> String {
    let report = &analysis.report;
    let mut html = message_box(
        "success",
        &format!(
            "Analysis complete: {} of {} comments classified.",
            analysis.classified, analysis.collected
        ),
    );

    html.push_str("<table class=\"sortable\">\n<thead><tr><th>Language</th><th>Count</th><th>Percentage</th></tr></thead>\n<tbody>\n");
    for row in report.rows() {
        let language = escape_html(row.language.as_str());
        html.push_str(&format!(
            "<tr><td data-value=\"{language}\">{language}</td><td class=\"num\" data-value=\"{count}\">{count}</td><td class=\"num\" data-value=\"{pct:.1}\">{pct:.1}%</td></tr>\n",
            count = row.count,
            pct = row.percentage,
        ));
    }
    html.push_str("</tbody>\n</table>\n");

    match render_pie_svg(report) {
        Ok(svg) => {
            html.push_str("<div class=\"chart\">\n");
            html.push_str(&svg);
            html.push_str("</div>\n");
        }
        Err(e) => html.push_str(&message_box("error", &e.to_string())),
    }

    match to_csv(report) {
        Ok(csv) => html.push_str(&format!(
            "<p><a class=\"download\" download=\"{CSV_FILE_NAME}\" href=\"{}\">Download results as CSV</a></p>\n",
            csv_data_uri(&csv)
        )),
        Err(e) => html.push_str(&message_box("error", &e.to_string())),
    }

    html
}

/// The whole page: the form, prefilled with `url`, and the outcome if a run happened.
pub fn render_page(url: &str, outcome: Option<&Result<Analysis, AnalysisError>>) -> String {
    let body = match outcome {
        None => String::new(),
        Some(Ok(analysis)) => render_analysis(analysis),
        Some(Err(error)) => render_error(error),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>YouTube Comment Language Analyzer</title>
<style>{STYLE}</style>
</head>
<body>
<h1>YouTube Comment Language Analyzer</h1>
<p>Enter a YouTube video URL to collect its comments and see which languages they are written in.</p>
<form method="post" action="/analyze">
<input type="text" name="url" value="{url}" placeholder="e.g. https://www.youtube.com/watch?v=abcd1234">
<button type="submit">Collect comments and analyze</button>
</form>
{body}<script>{SORT_SCRIPT}</script>
</body>
</html>
"#,
        url = escape_html(url),
    )
}
