//! Human-readable run report on stdout.

use std::fmt;
use std::io::{self, Write};

use rebrand::discover::TargetFiles;
use rebrand::patch::{PatchResult, Reporter, RunReport};
use rebrand::rules::{RuleKind, RuleTable};
use rebrand::{Error, Result};

const RULE_WIDTH: usize = 60;

/// Streams the report as files are processed.
pub struct TextReporter<W: Write> {
    out: W,
}

impl TextReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments) -> Result<()> {
        match writeln!(self.out, "{}", args) {
            Ok(()) => Ok(()),
            // Reader went away (e.g. `| head`); keep patching quietly
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
            Err(e) => Err(Error::internal_io(
                e.to_string(),
                Some("write stdout".to_string()),
            )),
        }
    }

    pub fn summary(&mut self, report: &RunReport) -> Result<()> {
        self.line(format_args!("\n{}", "=".repeat(RULE_WIDTH)))?;
        self.line(format_args!(
            "Done. {} total replacements across {} file(s).",
            report.total_replacements, report.patched_files
        ))?;
        if report.dry_run {
            self.line(format_args!("Dry run: no files were written."))?;
        }
        Ok(())
    }

    /// Print the active table, one rule per line, in application order.
    pub fn rules(&mut self, table: &RuleTable) -> Result<()> {
        for (index, rule) in table.summaries().iter().enumerate() {
            let kind = match rule.kind {
                RuleKind::Literal => "literal",
                RuleKind::Pattern => "pattern",
            };
            self.line(format_args!(
                "{:>3}. {:30} [{}] {:?} -> {:?}",
                index + 1,
                rule.label,
                kind,
                rule.find,
                rule.replace
            ))?;
            if let Some(class) = rule.not_preceded_by {
                self.line(format_args!("       not preceded by {}", class.as_str()))?;
            }
            if let Some(class) = rule.not_followed_by {
                self.line(format_args!("       not followed by {}", class.as_str()))?;
            }
        }
        if !table.markers().is_empty() {
            self.line(format_args!("verify: {}", table.markers().join(", ")))?;
        }
        Ok(())
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn discovered(&mut self, targets: &TargetFiles) -> Result<()> {
        self.line(format_args!("Console root: {}", targets.root.display()))?;
        self.line(format_args!("JS directory: {}", targets.directory.display()))?;
        self.line(format_args!("Found {} JS file(s):", targets.len()))?;
        for file in &targets.files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            self.line(format_args!("  {}", name))?;
        }
        Ok(())
    }

    fn patched(&mut self, result: &PatchResult) -> Result<()> {
        self.line(format_args!("\n--- Patching: {}", result.file.display()))?;

        for m in &result.matches {
            self.line(format_args!("  {:30} : {:5} replacements", m.label, m.count))?;
        }

        if !result.changed() {
            return self.line(format_args!("  (no replacements needed)"));
        }

        self.line(format_args!(
            "  Total: {} replacements, delta: {} bytes",
            result.replacements,
            format_delta(result.delta())
        ))?;
        if !result.written {
            self.line(format_args!("  (dry run, not written)"))?;
        }

        for residual in &result.residuals {
            self.line(format_args!(
                "  WARNING: {} '{}' references remain",
                residual.count, residual.marker
            ))?;
        }
        Ok(())
    }
}

/// Print the active table to stdout.
pub fn print_rules(table: &RuleTable) -> Result<()> {
    TextReporter::new(io::stdout().lock()).rules(table)
}

/// Signed byte delta with thousands separators, e.g. `+1,234` or `-56`.
pub fn format_delta(delta: i64) -> String {
    let sign = if delta < 0 { '-' } else { '+' };
    let digits = delta.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}{}", sign, grouped)
}
