//! HTML reporter: renders a report as an HTML fragment or a standalone page
//!
//! The fragment is what `POST /submit` returns for the client form to insert;
//! the standalone page wraps the same fragment in a minimal styled document
//! for `posture --html`.

use crate::{format_score, format_timestamp, Finding, Report, RiskMatrix};
use std::fmt::Write;

/// Escapes text for HTML element content and attribute values
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reporter that generates the HTML report
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlReporter {
    /// Wrap the fragment in a full HTML document
    standalone: bool,
}

impl HtmlReporter {
    pub fn new() -> Self {
        Self { standalone: false }
    }

    /// Produce a complete `<!DOCTYPE html>` document instead of a fragment
    pub fn standalone(mut self) -> Self {
        self.standalone = true;
        self
    }

    /// Generate the HTML report
    pub fn report(&self, report: &Report) -> String {
        let fragment = self.fragment(report);
        if !self.standalone {
            return fragment;
        }

        let mut html = String::with_capacity(fragment.len() + 2048);
        html.push_str(Self::template_head());
        html.push_str("<title>SOC 2 Readiness Report – ");
        html.push_str(&escape_html(&report.client.business_name));
        html.push_str("</title>\n</head>\n<body>\n<main>\n<h1>SOC 2 Readiness Report</h1>\n");
        html.push_str(&fragment);
        html.push_str("</main>\n</body>\n</html>\n");
        html
    }

    fn fragment(&self, report: &Report) -> String {
        let mut html = String::with_capacity(8192);
        // Writing into a String cannot fail
        let _ = self.write_sections(&mut html, report);
        html
    }

    fn write_sections(&self, html: &mut String, report: &Report) -> std::fmt::Result {
        let client = &report.client;
        writeln!(html, "<h2>Client Information</h2>")?;
        writeln!(
            html,
            "<p><strong>Business Name:</strong> {}</p>",
            escape_html(&client.business_name)
        )?;
        writeln!(html, "<p><strong>Email:</strong> {}</p>", escape_html(&client.email))?;
        writeln!(
            html,
            "<p><strong>Submission Date/Time:</strong> {}</p>",
            format_timestamp(&client.submitted_at)
        )?;
        writeln!(
            html,
            "<p><strong>Report Generated:</strong> {}</p>",
            format_timestamp(&client.generated_at)
        )?;

        writeln!(html, "\n<h2>Security Control Posture Overview</h2>")?;
        writeln!(
            html,
            "<p>Your organization's SOC 2 compliance maturity is assessed across Security, \
             Availability, Processing Integrity, Confidentiality, and Privacy. Based on your \
             responses, your overall maturity is {}, with specific areas of strength and \
             opportunities for enhancement.</p>",
            report.maturity
        )?;

        writeln!(html, "\n<h2>Key Strengths</h2>")?;
        Self::write_findings(html, &report.strengths)?;

        writeln!(html, "\n<h2>Identified Gaps or Risks</h2>")?;
        Self::write_findings(html, &report.gaps)?;

        writeln!(html, "\n<h2>Compliance Alignment with SOC 2 TSC</h2>")?;
        writeln!(
            html,
            "<p>Your alignment with SOC 2 Trust Services Criteria is summarized below:</p>"
        )?;
        writeln!(html, "<ul>")?;
        for (category, score) in report.category_scores.iter() {
            writeln!(
                html,
                "<li><strong>{}:</strong> Maturity Level {}/4</li>",
                category,
                format_score(score)
            )?;
        }
        writeln!(html, "</ul>")?;

        writeln!(html, "\n<h2>Strategic Recommendations</h2>")?;
        writeln!(html, "<ul>")?;
        for rec in &report.recommendations {
            writeln!(html, "<li>{}</li>", escape_html(rec))?;
        }
        writeln!(html, "</ul>")?;

        writeln!(html, "\n<h2>Risk Matrix</h2>")?;
        Self::write_risk_matrix(html, &report.risk_matrix)?;

        writeln!(html, "\n<h2>Summary Conclusion</h2>")?;
        writeln!(
            html,
            "<p>{} <strong>Next Steps:</strong> {}</p>",
            escape_html(&report.conclusion.summary),
            escape_html(&report.conclusion.next_steps)
        )?;
        Ok(())
    }

    fn write_findings(html: &mut String, findings: &[Finding]) -> std::fmt::Result {
        write!(html, "<ul>")?;
        if findings.is_empty() {
            write!(html, "<li>None identified</li>")?;
        }
        for finding in findings {
            write!(html, "<li>{}</li>", escape_html(&finding.message))?;
        }
        writeln!(html, "</ul>")
    }

    fn write_risk_matrix(html: &mut String, matrix: &RiskMatrix) -> std::fmt::Result {
        writeln!(html, "<table>")?;
        write!(html, "<tr>")?;
        for header in RiskMatrix::HEADERS {
            write!(html, "<th>{}</th>", header)?;
        }
        writeln!(html, "</tr>")?;
        for row in &matrix.rows {
            writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&row.risk),
                row.likelihood,
                row.impact,
                escape_html(&row.mitigation)
            )?;
        }
        writeln!(html, "</table>")
    }

    // ─── HTML template pieces ────────────────────────────────────────────

    fn template_head() -> &'static str {
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<style>
:root{--bg:#ffffff;--text:#1f2937;--muted:#6b7280;--border:#e5e7eb;--accent:#1d4ed8;--radius:6px}
*{box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Oxygen,sans-serif;background:var(--bg);color:var(--text);line-height:1.55;margin:0}
main{max-width:860px;margin:0 auto;padding:2rem 1.5rem}
h1{font-size:1.5rem;margin:0 0 1.5rem}
h2{font-size:1.125rem;margin:2rem 0 .75rem;padding-bottom:.375rem;border-bottom:1px solid var(--border);color:var(--accent)}
ul{padding-left:1.25rem}
table{border-collapse:collapse;width:100%;font-size:.9rem}
th,td{border:1px solid var(--border);padding:.5rem .625rem;text-align:left;vertical-align:top}
th{background:#f9fafb}
@media print{main{padding:0}h2{break-after:avoid}}
</style>
"##
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssessmentEngine, Responses, Submission};
    use chrono::Local;

    fn report_for(responses: Responses, name: &str) -> Report {
        let submission = Submission {
            business_name: name.to_string(),
            email: "ops@acme.io".to_string(),
            responses,
        };
        let now = Local::now();
        AssessmentEngine::new().assess_at(&submission, now, now)
    }

    fn position(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("missing {:?}", needle))
    }

    #[test]
    fn test_sections_in_order() {
        let html = HtmlReporter::new().report(&report_for(Responses::uniform(2.5), "Acme"));
        let sections = [
            "<h2>Client Information</h2>",
            "<h2>Security Control Posture Overview</h2>",
            "<h2>Key Strengths</h2>",
            "<h2>Identified Gaps or Risks</h2>",
            "<h2>Compliance Alignment with SOC 2 TSC</h2>",
            "<h2>Strategic Recommendations</h2>",
            "<h2>Risk Matrix</h2>",
            "<h2>Summary Conclusion</h2>",
        ];
        let positions: Vec<usize> = sections.iter().map(|s| position(&html, s)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_lists_say_none_identified() {
        let html = HtmlReporter::new().report(&report_for(Responses::uniform(2.5), "Acme"));
        assert_eq!(html.matches("<li>None identified</li>").count(), 2);
        assert!(html.contains("overall maturity is moderate"));
    }

    #[test]
    fn test_scores_rendered_to_one_decimal() {
        let mut values = [4.0; 18];
        // Security = (0 + 4 * 4) / 5 = 3.2; Availability = 2/3 rounds to 0.7
        values[0] = 0.0;
        values[5] = 0.0;
        values[6] = 0.0;
        values[7] = 2.0;
        let html = HtmlReporter::new().report(&report_for(Responses::from_array(values), "Acme"));
        assert!(html.contains("<li><strong>Security:</strong> Maturity Level 3.2/4</li>"));
        assert!(html.contains("<li><strong>Availability:</strong> Maturity Level 0.7/4</li>"));
        assert!(html.contains("<li><strong>Processing Integrity:</strong> Maturity Level 4.0/4</li>"));
    }

    #[test]
    fn test_score_ties_round_up() {
        let mut values = [2.0; 18];
        // Privacy = (3 + 2 + 2 + 2) / 4 = 2.25; Security = (1 + 0 + 0 + 0 + 0.25) / 5 = 0.25
        values[14] = 3.0;
        values[0] = 1.0;
        values[1] = 0.0;
        values[2] = 0.0;
        values[3] = 0.0;
        values[4] = 0.25;
        let html = HtmlReporter::new().report(&report_for(Responses::from_array(values), "Acme"));
        assert!(html.contains("<li><strong>Privacy:</strong> Maturity Level 2.3/4</li>"));
        assert!(html.contains("<li><strong>Security:</strong> Maturity Level 0.3/4</li>"));
    }

    #[test]
    fn test_recommendations_embed_gap_text_verbatim() {
        let html = HtmlReporter::new().report(&report_for(Responses::uniform(0.0), "Acme"));
        assert!(html.contains(
            "<li>Address weak security controls, including governance and monitoring. by implementing specific controls (e.g., MFA, encryption, DRP testing).</li>"
        ));
        assert!(html.contains(
            "(e.g., Weak security controls, including governance and monitoring., Inadequate disaster recovery"
        ));
    }

    #[test]
    fn test_risk_matrix_header_only_without_gaps() {
        let html = HtmlReporter::new().report(&report_for(Responses::uniform(4.0), "Acme"));
        assert!(html.contains(
            "<tr><th>Risk</th><th>Likelihood</th><th>Impact</th><th>Mitigation</th></tr>"
        ));
        assert!(!html.contains("<td>"));
        assert!(html.contains("<li>Maintain current controls and pursue continuous improvement.</li>"));
    }

    #[test]
    fn test_risk_rows_for_gaps() {
        let html = HtmlReporter::new().report(&report_for(Responses::uniform(0.0), "Acme"));
        assert_eq!(html.matches("<td>High</td><td>High</td>").count(), 5);
        assert_eq!(
            html.matches("<td>Implement controls and training</td>").count(),
            5
        );
    }

    #[test]
    fn test_user_input_is_escaped() {
        let html = HtmlReporter::new().report(&report_for(
            Responses::uniform(2.0),
            "<script>alert('x')</script> & Co",
        ));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; Co"));
    }

    #[test]
    fn test_fragment_has_no_document_wrapper() {
        let html = HtmlReporter::new().report(&report_for(Responses::uniform(2.0), "Acme"));
        assert!(!html.contains("<!DOCTYPE html>"));
        assert!(html.starts_with("<h2>Client Information</h2>"));
    }

    #[test]
    fn test_standalone_wraps_fragment() {
        let report = report_for(Responses::uniform(2.0), "Acme");
        let page = HtmlReporter::new().standalone().report(&report);
        let fragment = HtmlReporter::new().report(&report);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>SOC 2 Readiness Report – Acme</title>"));
        assert!(page.contains(&fragment));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c\"'"), "a&lt;b&gt;&amp;&quot;c&quot;&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
