//! HTML Export functionality
//!
//! Renders a standalone, styled report page. Clicking a column header sorts
//! the table by that column index; date-like cells sort chronologically and
//! everything else sorts case-insensitively.

use chrono::{DateTime, Utc};
use std::io::Write;

use super::csv::{row_cells, COLUMNS};
use crate::error::{AuditError, AuditResult};
use crate::models::{DateRange, SignInRecord};

/// Header metadata shown above the table
#[derive(Debug, Clone)]
pub struct HtmlReportMeta<'a> {
    pub title: &'a str,
    pub range: DateRange,
    pub user_filter: Option<&'a str>,
    pub generated_at: DateTime<Utc>,
}

const STYLE: &str = r#"
        body { font-family: "Segoe UI", Helvetica, Arial, sans-serif; margin: 24px; color: #1f2328; background: #f6f8fa; }
        h1 { font-size: 22px; margin-bottom: 4px; }
        .meta { color: #57606a; font-size: 13px; margin-bottom: 16px; }
        .meta span { margin-right: 18px; }
        table { border-collapse: collapse; width: 100%; background: #ffffff; font-size: 13px; }
        th, td { border: 1px solid #d0d7de; padding: 6px 10px; text-align: left; white-space: nowrap; }
        th { background: #0b5cad; color: #ffffff; cursor: pointer; user-select: none; position: sticky; top: 0; }
        th:hover { background: #094a8c; }
        th.asc::after { content: " \25B2"; }
        th.desc::after { content: " \25BC"; }
        tr:nth-child(even) td { background: #f3f6f9; }
        td.success { color: #1a7f37; font-weight: 600; }
        td.failure { color: #cf222e; font-weight: 600; }
"#;

const SORT_SCRIPT: &str = r#"
        const DATE_LIKE = /^\d{4}-\d{2}-\d{2}/;

        function cellValue(row, index) {
            return row.cells[index].textContent.trim();
        }

        function compareCells(a, b) {
            if (DATE_LIKE.test(a) && DATE_LIKE.test(b)) {
                const da = Date.parse(a.replace(" ", "T"));
                const db = Date.parse(b.replace(" ", "T"));
                if (!isNaN(da) && !isNaN(db)) {
                    return da - db;
                }
            }
            return a.toLowerCase().localeCompare(b.toLowerCase());
        }

        function sortTable(index) {
            const table = document.getElementById("signins");
            const header = table.tHead.rows[0].cells[index];
            const ascending = !header.classList.contains("asc");
            const body = table.tBodies[0];
            const rows = Array.from(body.rows);

            rows.sort(function (ra, rb) {
                const order = compareCells(cellValue(ra, index), cellValue(rb, index));
                return ascending ? order : -order;
            });
            rows.forEach(function (row) { body.appendChild(row); });

            Array.from(table.tHead.rows[0].cells).forEach(function (cell) {
                cell.classList.remove("asc", "desc");
            });
            header.classList.add(ascending ? "asc" : "desc");
        }
"#;

/// Render the full HTML document
pub fn render_sign_ins_html(records: &[SignInRecord], meta: &HtmlReportMeta<'_>) -> String {
    let mut html = String::with_capacity(4096 + records.len() * 512);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"utf-8\">\n");
    html.push_str(&format!("    <title>{}</title>\n", html_escape(meta.title)));
    html.push_str(&format!("    <style>{}    </style>\n", STYLE));
    html.push_str("</head>\n<body>\n");

    html.push_str(&format!("    <h1>{}</h1>\n", html_escape(meta.title)));
    html.push_str("    <div class=\"meta\">\n");
    html.push_str(&format!(
        "        <span>Range: {}</span>\n",
        html_escape(&meta.range.to_string())
    ));
    if let Some(filter) = meta.user_filter.map(str::trim).filter(|f| !f.is_empty()) {
        html.push_str(&format!(
            "        <span>User filter: {}</span>\n",
            html_escape(filter)
        ));
    }
    html.push_str(&format!("        <span>Records: {}</span>\n", records.len()));
    html.push_str(&format!(
        "        <span>Generated: {}</span>\n",
        meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("    </div>\n");

    html.push_str("    <table id=\"signins\">\n        <thead>\n            <tr>\n");
    for (index, column) in COLUMNS.iter().enumerate() {
        html.push_str(&format!(
            "                <th onclick=\"sortTable({})\">{}</th>\n",
            index, column
        ));
    }
    html.push_str("            </tr>\n        </thead>\n        <tbody>\n");

    for record in records {
        html.push_str("            <tr>");
        for (index, cell) in row_cells(record).iter().enumerate() {
            if COLUMNS[index] == "Status" {
                let class = if record.status.is_success() { "success" } else { "failure" };
                html.push_str(&format!("<td class=\"{}\">{}</td>", class, html_escape(cell)));
            } else {
                html.push_str(&format!("<td>{}</td>", html_escape(cell)));
            }
        }
        html.push_str("</tr>\n");
    }

    html.push_str("        </tbody>\n    </table>\n");
    html.push_str(&format!("    <script>{}    </script>\n", SORT_SCRIPT));
    html.push_str("</body>\n</html>\n");

    html
}

/// Export sign-in rows to an HTML document
pub fn export_sign_ins_html<W: Write>(
    records: &[SignInRecord],
    meta: &HtmlReportMeta<'_>,
    writer: &mut W,
) -> AuditResult<()> {
    writer
        .write_all(render_sign_ins_html(records, meta).as_bytes())
        .map_err(|e| AuditError::Export(format!("Failed to write HTML report: {}", e)))?;
    writer
        .flush()
        .map_err(|e| AuditError::Export(format!("Failed to flush HTML report: {}", e)))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignInStatus;
    use chrono::{NaiveDate, TimeZone};

    fn meta(filter: Option<&str>) -> HtmlReportMeta<'_> {
        HtmlReportMeta {
            title: "Legacy Sign-In Report",
            range: DateRange::new(
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            ),
            user_filter: filter,
            generated_at: Utc.with_ymd_and_hms(2025, 2, 1, 6, 0, 0).unwrap(),
        }
    }

    fn record(user: &str, status: SignInStatus) -> SignInRecord {
        SignInRecord {
            user_principal_name: user.into(),
            app_display_name: "Azure Active Directory PowerShell".into(),
            ip_address: "203.0.113.7".into(),
            location: "Redmond, Washington, US".into(),
            sign_in_time: Utc.with_ymd_and_hms(2025, 1, 10, 14, 2, 11).unwrap(),
            status,
            risk_level: "none".into(),
            correlation_id: "d79f5bee-5860-4832-928f-3133e22ae912".into(),
        }
    }

    #[test]
    fn test_one_body_row_per_record() {
        let records = vec![
            record("a@contoso.com", SignInStatus::Success),
            record("b@contoso.com", SignInStatus::Failure),
            record("c@contoso.com", SignInStatus::Success),
        ];
        let html = render_sign_ins_html(&records, &meta(None));

        assert_eq!(html.matches("            <tr><td>").count(), 3);
        assert!(html.contains("<td class=\"failure\">Failure</td>"));
        assert!(html.contains("<span>Records: 3</span>"));
    }

    #[test]
    fn test_headers_sort_by_index() {
        let html = render_sign_ins_html(&[], &meta(None));
        for (index, column) in COLUMNS.iter().enumerate() {
            assert!(html.contains(&format!("<th onclick=\"sortTable({})\">{}</th>", index, column)));
        }
        assert!(html.contains("function sortTable(index)"));
        assert!(html.contains("DATE_LIKE"));
    }

    #[test]
    fn test_cells_escaped() {
        let records = vec![record("<script>alert('x')</script>", SignInStatus::Success)];
        let html = render_sign_ins_html(&records, &meta(Some("<b>")));

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("User filter: &lt;b&gt;"));
    }

    #[test]
    fn test_blank_filter_not_shown() {
        let html = render_sign_ins_html(&[], &meta(Some("  ")));
        assert!(!html.contains("User filter"));
    }
}
