//! Console alert sink -- prints each violation to stderr as it occurs
//!
//! Alerts go to stderr so they interleave cleanly with a JSON summary on
//! stdout. Suppressed alerts (quiet mode, `--max-violations` cap) are still
//! counted by the validator; only printing is skipped.

use colored::Colorize;
use vigil_core::types::{Severity, Violation};
use vigil_validator::AlertSink;

/// Alert sink that renders violations to stderr with severity colors.
pub struct ConsoleAlertSink {
    verbose: bool,
    quiet: bool,
    limit: Option<usize>,
    printed: usize,
}

impl ConsoleAlertSink {
    /// Create a sink with display options from the CLI flags.
    pub fn new(verbose: bool, quiet: bool, limit: Option<usize>) -> Self {
        Self {
            verbose,
            quiet,
            limit,
            printed: 0,
        }
    }

    /// Number of alerts actually printed.
    pub fn printed(&self) -> usize {
        self.printed
    }

    fn severity_tag(severity: Severity) -> String {
        let label = format!("[{}]", severity.as_str().to_uppercase());
        match severity {
            Severity::Medium => label.yellow().to_string(),
            Severity::High => label.red().to_string(),
            Severity::Critical => label.red().bold().to_string(),
        }
    }
}

impl AlertSink for ConsoleAlertSink {
    fn notify(&mut self, violation: &Violation) {
        if self.quiet {
            return;
        }
        if let Some(limit) = self.limit {
            if self.printed == limit {
                eprintln!("... further alerts suppressed (--max-violations {limit})");
                self.printed += 1;
                return;
            }
            if self.printed > limit {
                return;
            }
        }

        eprintln!(
            "{} {} {} entry #{}: {}",
            Self::severity_tag(violation.severity),
            violation.robot_id.bold(),
            violation.rule_name,
            violation.log_index,
            violation.message,
        );

        if self.verbose {
            let actual = violation
                .actual
                .as_ref()
                .map_or_else(|| "<missing>".to_owned(), ToString::to_string);
            eprintln!(
                "    field={} actual={} expected={} at={}",
                violation.field, actual, violation.expected, violation.timestamp,
            );
        }

        self.printed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::types::FieldValue;

    fn violation(rule_id: &str) -> Violation {
        Violation {
            rule_id: rule_id.to_owned(),
            rule_name: rule_id.to_owned(),
            severity: Severity::Critical,
            message: "too fast".to_owned(),
            robot_id: "agv-1".to_owned(),
            timestamp: "2026-01-01T00:00:00Z".to_owned(),
            field: "speed".to_owned(),
            actual: Some(FieldValue::Number(4.0)),
            expected: "<= 2".to_owned(),
            log_index: 0,
        }
    }

    #[test]
    fn test_quiet_sink_prints_nothing() {
        let mut sink = ConsoleAlertSink::new(false, true, None);
        sink.notify(&violation("a"));
        assert_eq!(sink.printed(), 0);
    }

    #[test]
    fn test_limit_caps_printed_alerts() {
        let mut sink = ConsoleAlertSink::new(false, false, Some(2));
        for i in 0..5 {
            sink.notify(&violation(&format!("r{i}")));
        }
        // 2 alerts + 1 suppression notice
        assert_eq!(sink.printed(), 3);
    }

    #[test]
    fn test_unlimited_sink_prints_everything() {
        let mut sink = ConsoleAlertSink::new(true, false, None);
        for i in 0..4 {
            sink.notify(&violation(&format!("r{i}")));
        }
        assert_eq!(sink.printed(), 4);
    }
}
