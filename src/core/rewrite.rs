//! The substitution fold: every rule, in table order, over one buffer.

use serde::Serialize;

use crate::rules::{BoundedPattern, Matcher, RuleTable};

/// How many times one rule fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMatch {
    pub label: String,
    pub count: usize,
}

/// Output of [`apply`].
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub content: String,
    /// Rules with at least one match, in table order.
    pub matches: Vec<RuleMatch>,
    pub total: usize,
}

impl Rewrite {
    /// Matches for `label`, zero when the rule never fired.
    pub fn count_for(&self, label: &str) -> usize {
        self.matches
            .iter()
            .find(|m| m.label == label)
            .map(|m| m.count)
            .unwrap_or(0)
    }
}

/// Apply `table` to `content`.
///
/// Each rule sees the output of the rule before it, never the original text.
pub fn apply(content: &str, table: &RuleTable) -> Rewrite {
    let mut data = content.to_string();
    let mut matches = Vec::new();
    let mut total = 0;

    for rule in table.rules() {
        let (next, count) = match &rule.matcher {
            Matcher::Literal(find) => replace_literal(&data, find, &rule.replacement),
            Matcher::Pattern(pattern) => replace_pattern(&data, pattern, &rule.replacement),
        };

        if count > 0 {
            data = next;
            total += count;
            matches.push(RuleMatch {
                label: rule.label.clone(),
                count,
            });
        }
    }

    Rewrite {
        content: data,
        matches,
        total,
    }
}

/// Non-overlapping occurrences of `needle`, scanning left to right.
pub fn count_literal(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

fn replace_literal(text: &str, find: &str, replacement: &str) -> (String, usize) {
    let count = count_literal(text, find);
    if count == 0 {
        return (String::new(), 0);
    }
    (text.replace(find, replacement), count)
}

fn replace_pattern(text: &str, pattern: &BoundedPattern, replacement: &str) -> (String, usize) {
    let mut out = String::new();
    let mut last = 0;
    let mut pos = 0;
    let mut count = 0;

    while pos < text.len() {
        let Some(m) = pattern.regex.find_at(text, pos) else {
            break;
        };

        if let Some(end) = pattern.guarded_end(text, m.start(), m.end()) {
            out.push_str(&text[last..m.start()]);
            out.push_str(replacement);
            last = end;
            pos = end;
            count += 1;
        } else {
            // A rejected candidate consumes nothing; retry one char later
            pos = m.start()
                + text[m.start()..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(1);
        }
    }

    if count == 0 {
        return (String::new(), 0);
    }

    out.push_str(&text[last..]);
    (out, count)
}
