//! Patch bundles in place and aggregate the outcome.
//!
//! `run` is the whole pipeline: discover the target files, rewrite each one
//! with the table in sorted order, and total the counts. Discovery failures
//! abort before any file is read. An I/O failure on one file aborts the rest
//! of the run with an error naming that file.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::discover::{self, TargetFiles};
use crate::error::Result;
use crate::io::{read_file, write_file_atomic};
use crate::rewrite::{self, count_literal, RuleMatch};
use crate::rules::RuleTable;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct PatchOptions {
    /// Compute everything but leave files on disk untouched.
    pub dry_run: bool,
}

/// Verification marker still present after patching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Residual {
    pub marker: String,
    pub count: usize,
}

/// Outcome for one file.
#[derive(Debug, Clone, Serialize)]
pub struct PatchResult {
    pub file: PathBuf,
    pub replacements: usize,
    pub matches: Vec<RuleMatch>,
    pub original_bytes: usize,
    pub new_bytes: usize,
    pub written: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub residuals: Vec<Residual>,
}

impl PatchResult {
    /// New length minus original length, in bytes.
    pub fn delta(&self) -> i64 {
        self.new_bytes as i64 - self.original_bytes as i64
    }

    pub fn changed(&self) -> bool {
        self.replacements > 0
    }
}

/// Aggregate of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub directory: PathBuf,
    pub dry_run: bool,
    pub files: Vec<PatchResult>,
    pub total_replacements: usize,
    pub patched_files: usize,
}

impl RunReport {
    fn new(targets: &TargetFiles, options: PatchOptions) -> Self {
        RunReport {
            root: targets.root.clone(),
            directory: targets.directory.clone(),
            dry_run: options.dry_run,
            files: Vec::with_capacity(targets.len()),
            total_replacements: 0,
            patched_files: 0,
        }
    }

    fn record(&mut self, result: PatchResult) {
        self.total_replacements += result.replacements;
        if result.changed() {
            self.patched_files += 1;
        }
        self.files.push(result);
    }

    pub fn residual_warnings(&self) -> usize {
        self.files.iter().map(|f| f.residuals.len()).sum()
    }
}

/// Progress callbacks for a run, called in processing order.
///
/// An error from a callback aborts the run before the next file is touched.
pub trait Reporter {
    fn discovered(&mut self, _targets: &TargetFiles) -> Result<()> {
        Ok(())
    }

    fn patched(&mut self, _result: &PatchResult) -> Result<()> {
        Ok(())
    }
}

/// Reporter that stays quiet, for machine-readable output.
pub struct Silent;

impl Reporter for Silent {}

// ============================================================================
// Operations
// ============================================================================

/// Rewrite one file with `table`.
///
/// A file with no matches is not written at all, so its timestamp is left
/// alone. Residual markers are counted on the content as written.
pub fn patch_file(path: &Path, table: &RuleTable, options: PatchOptions) -> Result<PatchResult> {
    let original = read_file(path)?;
    let rewritten = rewrite::apply(&original, table);

    let written = rewritten.total > 0 && !options.dry_run;
    if written {
        write_file_atomic(path, &rewritten.content)?;
    }

    let residuals = if rewritten.total > 0 {
        find_residuals(&rewritten.content, table.markers())
    } else {
        Vec::new()
    };

    Ok(PatchResult {
        file: path.to_path_buf(),
        replacements: rewritten.total,
        matches: rewritten.matches,
        original_bytes: original.len(),
        new_bytes: rewritten.content.len(),
        written,
        residuals,
    })
}

/// Count each marker in `content`, keeping only those still present.
pub fn find_residuals(content: &str, markers: &[String]) -> Vec<Residual> {
    markers
        .iter()
        .map(|marker| Residual {
            marker: marker.clone(),
            count: count_literal(content, marker),
        })
        .filter(|r| r.count > 0)
        .collect()
}

/// Discover and patch every target file below `root`.
pub fn run(
    root: &Path,
    table: &RuleTable,
    options: PatchOptions,
    reporter: &mut dyn Reporter,
) -> Result<RunReport> {
    let targets = discover::discover(root)?;
    reporter.discovered(&targets)?;

    let mut report = RunReport::new(&targets, options);
    for path in &targets.files {
        let result = patch_file(path, table, options)?;
        reporter.patched(&result)?;
        report.record(result);
    }

    Ok(report)
}

// ============================================================================
// Tests
// ============================================================================
