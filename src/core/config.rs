//! Substitution tables loaded from TOML rules files.
//!
//! ```toml
//! verify = ["MinIO", "min.io"]
//!
//! [[rule]]
//! label = "MinIO Console"
//! find = "MinIO Console"
//! replace = "Hanzo Space"
//!
//! [[rule]]
//! label = "SUBNET (standalone)"
//! kind = "pattern"
//! find = "SUBNET"
//! replace = "Support"
//! not_preceded_by = "letter"
//! not_followed_by = "letter_or_underscore"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::io::read_file;
use crate::rules::{BoundaryClass, BoundedPattern, Rule, RuleKind, RuleTable};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesFile {
    #[serde(default)]
    pub verify: Vec<String>,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub label: String,
    #[serde(default)]
    pub kind: RuleKind,
    pub find: String,
    pub replace: String,
    pub not_preceded_by: Option<BoundaryClass>,
    pub not_followed_by: Option<BoundaryClass>,
}

impl RuleConfig {
    fn into_rule(self, index: usize) -> Result<Rule> {
        match self.kind {
            RuleKind::Literal => {
                if self.not_preceded_by.is_some() || self.not_followed_by.is_some() {
                    return Err(Error::config_invalid_value(
                        format!("rule[{}]", index),
                        Some(self.label),
                        "boundary guards are only allowed on pattern rules",
                    ));
                }
                Ok(Rule::literal(&self.label, &self.find, &self.replace))
            }
            RuleKind::Pattern => {
                let pattern =
                    BoundedPattern::new(&self.find, self.not_preceded_by, self.not_followed_by)?;
                Ok(Rule::pattern(&self.label, pattern, &self.replace))
            }
        }
    }
}

pub fn parse_rules(content: &str, source: &str) -> Result<RuleTable> {
    let file: RulesFile =
        toml::from_str(content).map_err(|e| Error::config_invalid_toml(source, e))?;

    if file.rules.is_empty() {
        return Err(Error::config_invalid_value(
            "rule",
            None,
            format!("{} defines no rules", source),
        ));
    }

    let rules = file
        .rules
        .into_iter()
        .enumerate()
        .map(|(index, rule)| rule.into_rule(index))
        .collect::<Result<Vec<_>>>()?;

    RuleTable::new(rules, file.verify)
}

pub fn load_rules(path: &Path) -> Result<RuleTable> {
    let content = read_file(path)?;
    parse_rules(&content, &path.display().to_string())
}
