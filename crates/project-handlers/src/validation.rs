//! Entry validation from declared validation properties
//!
//! A validation property names a `source` inside an entry's JSON form and an
//! optional `match`. Sources may list alternatives separated by `|` (the first
//! one present is used) and descend into nested objects with `:`, so
//! `Git:CloneLocation|Location` reads `entry.Git.CloneLocation` and falls back
//! to `entry.Location`.

use project_fs::Entry;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// One validation rule as declared by a handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationProperty {
    pub source: String,
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_match_position: Option<String>,
}

impl ValidationProperty {
    /// Require `source` to be present and truthy.
    pub fn present(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            match_value: None,
            variable_name: None,
            variable_match_position: None,
        }
    }

    /// Require `source` to match `value`: a regular expression for strings,
    /// equality otherwise.
    pub fn matching(source: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            match_value: Some(value.into()),
            ..Self::present(source)
        }
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Present,
    Pattern(Regex),
    Equals(Value),
}

#[derive(Debug, Clone)]
struct Rule {
    /// Alternatives, each a path of nested keys.
    alternatives: Vec<Vec<String>>,
    matcher: Matcher,
}

/// Compiled set of validation properties.
///
/// A validator with no rules accepts every entry.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: Vec<Rule>,
}

impl Validator {
    pub fn new(properties: &[ValidationProperty]) -> Result<Self> {
        let rules = properties
            .iter()
            .map(compile_rule)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether every rule passes for `entry`.
    pub fn accepts(&self, entry: &Entry) -> bool {
        match serde_json::to_value(entry) {
            Ok(value) => self.accepts_value(&value),
            Err(e) => {
                tracing::warn!(location = %entry.location, "Entry could not be inspected: {}", e);
                false
            }
        }
    }

    /// Whether every rule passes for an arbitrary JSON item.
    pub fn accepts_value(&self, item: &Value) -> bool {
        self.rules.iter().all(|rule| rule_passes(rule, item))
    }
}

fn compile_rule(property: &ValidationProperty) -> Result<Rule> {
    let alternatives: Vec<Vec<String>> = property
        .source
        .split('|')
        .map(|alt| {
            alt.split(':')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .filter(|path| !path.is_empty())
        .collect();
    if alternatives.is_empty() {
        return Err(Error::EmptySource);
    }

    let matcher = match &property.match_value {
        None => Matcher::Present,
        Some(Value::String(pattern)) => {
            let regex = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
                source_path: property.source.clone(),
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            Matcher::Pattern(regex)
        }
        Some(other) => Matcher::Equals(other.clone()),
    };

    Ok(Rule {
        alternatives,
        matcher,
    })
}

fn resolve<'a>(item: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(item, |current, key| current.get(key.as_str()))
}

fn rule_passes(rule: &Rule, item: &Value) -> bool {
    let value = rule
        .alternatives
        .iter()
        .find_map(|path| resolve(item, path).filter(|v| !v.is_null()));

    match (&rule.matcher, value) {
        (_, None) => false,
        (Matcher::Present, Some(value)) => !matches!(value, Value::Bool(false)),
        (Matcher::Pattern(regex), Some(Value::String(text))) => regex.is_match(text),
        (Matcher::Pattern(_), Some(_)) => false,
        (Matcher::Equals(expected), Some(value)) => value == expected,
    }
}
