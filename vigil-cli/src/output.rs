//! Output formatting abstraction for text vs JSON rendering
//!
//! The final summary flows through [`OutputWriter`] which handles format
//! switching. Real-time alerts go to stderr (see [`crate::alert`]); only the
//! summary and the JSON report use stdout.

use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use vigil_core::types::ValidationStatus;
use vigil_validator::ValidationReport;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// How many of the most recent violations the text summary lists.
const SUMMARY_VIOLATION_LINES: usize = 5;

/// Abstraction for writing CLI output in different formats.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a payload to stdout.
    ///
    /// For `Text` format, delegates to `Render::render_text()`.
    /// For `Json` format, serialises via `serde_json`.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        match self.format {
            OutputFormat::Text => {
                payload.render_text(&mut handle)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut handle, payload)?;
                writeln!(handle)?;
            }
        }
        Ok(())
    }
}

/// Trait for human-readable text rendering.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

impl Render for ValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{}", "═".repeat(52))?;
        writeln!(w, " VALIDATION SUMMARY")?;
        writeln!(w, "{}", "═".repeat(52))?;

        let failed = if self.summary.failed > 0 {
            self.summary.failed.to_string().red().bold().to_string()
        } else {
            self.summary.failed.to_string()
        };
        writeln!(
            w,
            " Entries:    {} total, {} passed, {} failed",
            self.summary.total_entries.to_string().bold(),
            self.summary.passed.to_string().green(),
            failed,
        )?;
        writeln!(w, " Pass rate:  {:.1}%", self.summary.pass_rate * 100.0)?;

        if !self.robots.is_empty() {
            writeln!(w, "{}", "─".repeat(52))?;
            writeln!(w, " Robots:")?;
            for (robot_id, robot) in &self.robots {
                let status = match robot.status {
                    ValidationStatus::Pass => "PASS".green(),
                    ValidationStatus::Fail => "FAIL".red().bold(),
                };
                writeln!(
                    w,
                    "   {:<16} {}  ({} violations / {} entries)",
                    robot_id, status, robot.violations, robot.total_entries,
                )?;
            }
        }

        if !self.violations_by_severity.is_empty() {
            writeln!(w, "{}", "─".repeat(52))?;
            writeln!(w, " Violations by severity:")?;
            for (severity, count) in &self.violations_by_severity {
                writeln!(w, "   {:<10} {}", severity, count)?;
            }
            writeln!(w, " Violations by rule:")?;
            for (rule_id, count) in &self.violations_by_rule {
                writeln!(w, "   {:<24} {}", rule_id, count)?;
            }
        }

        if !self.violations.is_empty() {
            writeln!(w, "{}", "─".repeat(52))?;
            writeln!(
                w,
                " Last {} violations:",
                SUMMARY_VIOLATION_LINES.min(self.violations.len())
            )?;
            for violation in self.violations.iter().rev().take(SUMMARY_VIOLATION_LINES).rev() {
                writeln!(w, "   {}", violation)?;
            }
        }

        writeln!(w, "{}", "═".repeat(52))?;
        Ok(())
    }
}
