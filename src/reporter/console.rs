//! Console reporter with colored output

use crate::assessment::{AggregateStats, ScoreCalculator};
use crate::{format_score, format_timestamp, Finding, Maturity, Report, RATING_MAX};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output (all recommendations and the conclusion)
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single assessment
    pub fn report(&self, report: &Report) {
        print!("{}", self.render(report));
    }

    /// Report multiple assessments with summary
    pub fn report_many(&self, reports: &[Report], stats: &AggregateStats) {
        for report in reports {
            self.report(report);
            println!("{}", "─".repeat(60));
        }
        print!("{}", self.render_summary(stats));
    }

    /// Report in quiet mode (one line per submission)
    pub fn report_quiet(&self, report: &Report) {
        println!("{}", self.render_quiet(report));
    }

    /// Render one line: business name, overall score, maturity
    pub fn render_quiet(&self, report: &Report) -> String {
        format!(
            "{}: {}/4 ({})",
            report.client.business_name,
            format_score(report.overall_score),
            self.colorize_maturity(report.maturity)
        )
    }

    /// Render the full report as terminal text
    pub fn render(&self, report: &Report) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_report(&mut out, report);
        out
    }

    fn write_report(&self, out: &mut String, report: &Report) -> std::fmt::Result {
        let client = &report.client;
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            self.bold(&format!("🛡  SOC 2 Readiness: {}", client.business_name))
        )?;
        writeln!(
            out,
            "   Contact: {} | Submitted: {} | Generated: {}",
            client.email,
            format_timestamp(&client.submitted_at),
            format_timestamp(&client.generated_at)
        )?;
        writeln!(out)?;

        let bar = self.create_score_bar(report.overall_score);
        writeln!(
            out,
            "   Overall: {} {}",
            bar,
            self.colorize_maturity(report.maturity)
        )?;
        writeln!(
            out,
            "   {}",
            self.dimmed(ScoreCalculator::maturity_description(report.maturity))
        )?;
        writeln!(out)?;

        writeln!(out, "   {}", self.bold("Compliance Alignment:"))?;
        for (category, score) in report.category_scores.iter() {
            let mini = self.create_mini_bar(score);
            let text = format!("{}/4", format_score(score));
            writeln!(out, "   {} {} {}", mini, self.score_color(&text, score), category)?;
        }
        writeln!(out)?;

        self.write_findings(out, "Key Strengths:", &report.strengths, "✓")?;
        self.write_findings(out, "Identified Gaps or Risks:", &report.gaps, "✗")?;

        if !report.risk_matrix.is_empty() {
            writeln!(out, "   {}", self.bold("Risk Matrix:"))?;
            for row in &report.risk_matrix.rows {
                writeln!(
                    out,
                    "   {} {} likelihood, {} impact: {} → {}",
                    self.red("!"),
                    row.likelihood,
                    row.impact,
                    row.category,
                    row.mitigation
                )?;
            }
            writeln!(out)?;
        }

        writeln!(out, "   {}", self.bold("Recommendations:"))?;
        let shown = if self.verbose {
            report.recommendations.len()
        } else {
            3
        };
        for rec in report.recommendations.iter().take(shown) {
            writeln!(out, "   {} {}", self.cyan("→"), rec)?;
        }
        let hidden = report.recommendations.len().saturating_sub(shown);
        if hidden > 0 {
            writeln!(
                out,
                "   {} {} more (use --verbose to show)",
                self.dimmed("ℹ"),
                hidden
            )?;
        }

        if self.verbose {
            writeln!(out)?;
            writeln!(out, "   {}", self.bold("Summary Conclusion:"))?;
            writeln!(out, "   {}", report.conclusion.summary)?;
            writeln!(
                out,
                "   {} {}",
                self.bold("Next Steps:"),
                report.conclusion.next_steps
            )?;
        }
        writeln!(out)
    }

    fn write_findings(
        &self,
        out: &mut String,
        title: &str,
        findings: &[Finding],
        icon: &str,
    ) -> std::fmt::Result {
        writeln!(out, "   {}", self.bold(title))?;
        if findings.is_empty() {
            writeln!(out, "   {}", self.dimmed("None identified"))?;
        }
        for finding in findings {
            writeln!(out, "   {} {}", icon, finding.message)?;
        }
        writeln!(out)
    }

    /// Render aggregate statistics for a batch of submissions
    pub fn render_summary(&self, stats: &AggregateStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "{}", self.bold("Summary"));
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(
            out,
            "   Submissions assessed: {}",
            self.bold(&stats.submissions_assessed.to_string())
        );
        let _ = writeln!(
            out,
            "   Average score:        {}",
            self.bold(&format!("{:.2}/4", stats.average_score))
        );
        let _ = writeln!(
            out,
            "   Strong / Moderate / Needs improvement: {} / {} / {}",
            stats.strong, stats.moderate, stats.needs_improvement
        );
        let _ = writeln!(out, "   Total gaps:           {}", stats.total_gaps);
        let _ = writeln!(out);
        out
    }

    fn colorize_maturity(&self, maturity: Maturity) -> String {
        let s = maturity.to_string();
        if !self.use_colors {
            return s;
        }
        let colored: ColoredString = match maturity {
            Maturity::Strong => s.green().bold(),
            Maturity::Moderate => s.yellow(),
            Maturity::NeedsImprovement => s.red().bold(),
        };
        colored.to_string()
    }

    fn score_color(&self, text: &str, score: f64) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        if score >= 3.0 {
            text.green().to_string()
        } else if score >= 2.0 {
            text.yellow().to_string()
        } else {
            text.red().to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.use_colors {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn red(&self, text: &str) -> String {
        if self.use_colors {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    fn cyan(&self, text: &str) -> String {
        if self.use_colors {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn create_score_bar(&self, score: f64) -> String {
        let filled = Self::filled_cells(score, 20);
        let empty = 20 - filled;

        let bar = format!(
            "[{}{}] {}/4",
            "█".repeat(filled),
            "░".repeat(empty),
            format_score(score)
        );
        self.score_color(&bar, score)
    }

    fn create_mini_bar(&self, score: f64) -> String {
        let filled = Self::filled_cells(score, 10);
        let empty = 10 - filled;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(empty))
    }

    fn filled_cells(score: f64, width: usize) -> usize {
        let ratio = (score / RATING_MAX).clamp(0.0, 1.0);
        ((ratio * width as f64).round() as usize).min(width)
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
