//! Substitution rules and the ordered table they live in.
//!
//! A table is applied front to back over the same buffer, so the order of the
//! rules is part of their meaning: long, specific phrases come first and the
//! bare brand/domain catch-alls come last. [`RuleTable::new`] rejects tables
//! where a specific literal can never fire because an earlier, more general
//! literal already consumed its text.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// Character class a pattern guard refuses on one side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryClass {
    /// `[a-zA-Z]`
    Letter,
    /// `[a-zA-Z_]`
    LetterOrUnderscore,
}

impl BoundaryClass {
    pub fn contains(&self, c: char) -> bool {
        match self {
            BoundaryClass::Letter => c.is_ascii_alphabetic(),
            BoundaryClass::LetterOrUnderscore => c.is_ascii_alphabetic() || c == '_',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryClass::Letter => "letter",
            BoundaryClass::LetterOrUnderscore => "letter_or_underscore",
        }
    }
}

/// A regex plus zero-width guards on the characters around each match.
///
/// The `regex` crate has no look-around, so `(?<![a-zA-Z])X(?![a-zA-Z_])` is
/// expressed as the pattern `X` with `not_preceded_by: Letter` and
/// `not_followed_by: LetterOrUnderscore`. When the longest match at a start
/// fails the trailing guard, shorter spans that `X` also matches in full are
/// tried before giving up on that start.
#[derive(Debug, Clone)]
pub struct BoundedPattern {
    pub regex: Regex,
    anchored: Regex,
    pub not_preceded_by: Option<BoundaryClass>,
    pub not_followed_by: Option<BoundaryClass>,
}

impl BoundedPattern {
    pub fn new(
        pattern: &str,
        not_preceded_by: Option<BoundaryClass>,
        not_followed_by: Option<BoundaryClass>,
    ) -> Result<Self> {
        let invalid = |e: regex::Error| {
            Error::config_invalid_value(
                "find",
                Some(pattern.to_string()),
                format!("invalid pattern '{}': {}", pattern, e),
            )
        };
        let regex = Regex::new(pattern).map_err(invalid)?;
        let anchored = Regex::new(&format!("^(?:{})$", pattern)).map_err(invalid)?;

        Ok(Self {
            regex,
            anchored,
            not_preceded_by,
            not_followed_by,
        })
    }

    fn preceding_ok(&self, text: &str, start: usize) -> bool {
        match (self.not_preceded_by, text[..start].chars().next_back()) {
            (Some(class), Some(c)) => !class.contains(c),
            _ => true,
        }
    }

    fn following_ok(&self, text: &str, end: usize) -> bool {
        match (self.not_followed_by, text[end..].chars().next()) {
            (Some(class), Some(c)) => !class.contains(c),
            _ => true,
        }
    }

    /// Whether the guards accept a match spanning `start..end` of `text`.
    pub fn guards_hold(&self, text: &str, start: usize, end: usize) -> bool {
        self.preceding_ok(text, start) && self.following_ok(text, end)
    }

    /// End of the longest non-empty span starting at `start` that the pattern
    /// matches in full and the guards accept, given the regex's own match
    /// ended at `longest`.
    pub fn guarded_end(&self, text: &str, start: usize, longest: usize) -> Option<usize> {
        if !self.preceding_ok(text, start) {
            return None;
        }
        if longest > start && self.following_ok(text, longest) {
            return Some(longest);
        }
        text[start..longest]
            .char_indices()
            .rev()
            .map(|(offset, _)| start + offset)
            .filter(|&end| end > start)
            .find(|&end| self.following_ok(text, end) && self.anchored.is_match(&text[start..end]))
    }
}

#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exact substring, every non-overlapping occurrence.
    Literal(String),
    /// Boundary-guarded regular expression.
    Pattern(BoundedPattern),
}

impl Matcher {
    /// Source text of the matcher, as written in the table.
    pub fn source(&self) -> &str {
        match self {
            Matcher::Literal(s) => s,
            Matcher::Pattern(p) => p.regex.as_str(),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Matcher::Literal(_) => RuleKind::Literal,
            Matcher::Pattern(_) => RuleKind::Pattern,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    #[default]
    Literal,
    Pattern,
}

/// One entry of the substitution table.
#[derive(Debug, Clone)]
pub struct Rule {
    pub label: String,
    pub matcher: Matcher,
    pub replacement: String,
}

impl Rule {
    pub fn literal(label: &str, find: &str, replace: &str) -> Self {
        Rule {
            label: label.to_string(),
            matcher: Matcher::Literal(find.to_string()),
            replacement: replace.to_string(),
        }
    }

    pub fn pattern(label: &str, pattern: BoundedPattern, replace: &str) -> Self {
        Rule {
            label: label.to_string(),
            matcher: Matcher::Pattern(pattern),
            replacement: replace.to_string(),
        }
    }
}

/// Serializable view of a rule, used by `--list-rules` and the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSummary {
    pub label: String,
    pub kind: RuleKind,
    pub find: String,
    pub replace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_preceded_by: Option<BoundaryClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_followed_by: Option<BoundaryClass>,
}

impl From<&Rule> for RuleSummary {
    fn from(rule: &Rule) -> Self {
        let (not_preceded_by, not_followed_by) = match &rule.matcher {
            Matcher::Literal(_) => (None, None),
            Matcher::Pattern(p) => (p.not_preceded_by, p.not_followed_by),
        };
        RuleSummary {
            label: rule.label.clone(),
            kind: rule.matcher.kind(),
            find: rule.matcher.source().to_string(),
            replace: rule.replacement.clone(),
            not_preceded_by,
            not_followed_by,
        }
    }
}

/// Ordered, validated substitution table plus the catch-all markers that
/// are checked for leftovers after a file is patched.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    markers: Vec<String>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>, markers: Vec<String>) -> Result<Self> {
        validate(&rules, &markers)?;
        Ok(RuleTable { rules, markers })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn summaries(&self) -> Vec<RuleSummary> {
        self.rules.iter().map(RuleSummary::from).collect()
    }
}

// ============================================================================
// Built-in table
// ============================================================================

/// Catch-all terms that should not survive a patch.
pub const VERIFY_MARKERS: &[&str] = &["MinIO", "min.io"];

/// Literal rules that precede the standalone SUBNET pattern.
const BRAND_PHRASES: &[(&str, &str)] = &[
    ("MinIO Object Store", "Hanzo Space"),
    ("MinIO Subscription", "Hanzo Subscription"),
    ("MinIO SUBNET", "Hanzo Support"),
    ("MinIO Console", "Hanzo Space"),
    ("MinIO Browser", "Hanzo Space"),
    ("MinIO Operator", "Hanzo Operator"),
    ("MinIO, Inc.", "Hanzo AI"),
    ("MinIO Inc.", "Hanzo AI"),
];

/// Subdomains first, then paths on the apex domain.
const URLS: &[(&str, &str)] = &[
    ("docs.min.io", "docs.hanzo.ai/storage"),
    ("blog.min.io", "hanzo.ai/blog"),
    ("subnet.min.io", "hanzo.ai/support"),
    ("dl.min.io", "hanzo.space"),
    ("play.min.io", "hanzo.space"),
    ("min.io/product/subnet", "hanzo.ai/support"),
    ("min.io/downloads", "hanzo.ai/downloads"),
    ("min.io/signup", "hanzo.ai/signup"),
    ("min.io/pricing", "hanzo.ai/pricing"),
    ("min.io/community", "hanzo.ai/community"),
];

const LOWERCASE_PHRASES: &[(&str, &str)] = &[
    ("minio console", "hanzo space"),
    ("minio server", "hanzo server"),
    ("minio object", "hanzo object"),
];

/// The MinIO → Hanzo table.
pub fn builtin_table() -> Result<RuleTable> {
    let mut rules = Vec::new();

    for (find, replace) in BRAND_PHRASES {
        rules.push(Rule::literal(find, find, replace));
    }

    // SUBNET only as its own token, never inside SUBNETS / mySUBNET / SUBNET_ID
    rules.push(Rule::pattern(
        "SUBNET (standalone)",
        BoundedPattern::new(
            "SUBNET",
            Some(BoundaryClass::Letter),
            Some(BoundaryClass::LetterOrUnderscore),
        )?,
        "Support",
    ));

    for (find, replace) in URLS {
        rules.push(Rule::literal(find, find, replace));
    }

    rules.push(Rule::literal("min.io (catch-all)", "min.io", "hanzo.ai"));
    rules.push(Rule::literal("MinIO (catch-all)", "MinIO", "Hanzo Space"));

    for (find, replace) in LOWERCASE_PHRASES {
        rules.push(Rule::literal(find, find, replace));
    }

    RuleTable::new(
        rules,
        VERIFY_MARKERS.iter().map(|m| m.to_string()).collect(),
    )
}

// ============================================================================
// Validation
// ============================================================================

fn validate(rules: &[Rule], markers: &[String]) -> Result<()> {
    let mut labels = HashSet::new();

    for (index, rule) in rules.iter().enumerate() {
        let key = format!("rule[{}]", index);

        if rule.label.trim().is_empty() {
            return Err(Error::config_invalid_value(
                format!("{}.label", key),
                None,
                format!("{} has an empty label", key),
            ));
        }
        if !labels.insert(rule.label.as_str()) {
            return Err(Error::config_invalid_value(
                format!("{}.label", key),
                Some(rule.label.clone()),
                format!("duplicate label '{}'", rule.label),
            ));
        }

        match &rule.matcher {
            Matcher::Literal(find) if find.is_empty() => {
                return Err(Error::config_invalid_value(
                    format!("{}.find", key),
                    None,
                    format!("rule '{}' has an empty matcher", rule.label),
                ));
            }
            Matcher::Pattern(p) if p.regex.is_match("") => {
                return Err(Error::config_invalid_value(
                    format!("{}.find", key),
                    Some(p.regex.as_str().to_string()),
                    format!("pattern of rule '{}' matches the empty string", rule.label),
                ));
            }
            _ => {}
        }

        if let Some(earlier) = shadowing_rule(&rules[..index], rule) {
            return Err(Error::config_invalid_value(
                format!("{}.find", key),
                Some(rule.matcher.source().to_string()),
                format!(
                    "rule '{}' is shadowed by earlier, more general rule '{}'",
                    rule.label, earlier.label
                ),
            ));
        }
    }

    if let Some(marker) = markers.iter().find(|m| m.is_empty()) {
        return Err(Error::config_invalid_value(
            "verify",
            Some(marker.clone()),
            "verification markers must not be empty",
        ));
    }

    Ok(())
}

/// First earlier literal whose text sits inside `rule`'s literal text.
fn shadowing_rule<'a>(earlier: &'a [Rule], rule: &Rule) -> Option<&'a Rule> {
    let Matcher::Literal(find) = &rule.matcher else {
        return None;
    };

    earlier.iter().find(|prev| match &prev.matcher {
        Matcher::Literal(prev_find) => find.contains(prev_find.as_str()),
        Matcher::Pattern(_) => false,
    })
}

// ============================================================================
// Tests
// ============================================================================
