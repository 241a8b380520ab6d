//! Option override table
//!
//! Overrides are written as `<pattern>:<key>: value`, where the pattern
//! selects packages by name:
//!
//! - `glad` matches exactly the package `glad`
//! - `glad*` matches every package whose name starts with `glad`
//! - `*` matches every package
//!
//! [`OptionTable::options_for`] is the lookup used by the resolver. When
//! several entries set the same key for one package, the most specific
//! pattern wins (exact, then longer prefix); equally specific entries are
//! decided by declaration order, the later one winning. A key chosen by a
//! wildcard only reaches packages that declare it; see
//! [`OptionTable::wildcard_keys_for`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, config};

/// A normalized option value
///
/// YAML booleans become `True`/`False` and numbers keep their textual
/// form, so `no_loader: false` and `no_loader: "False"` are the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionValue(String);

impl OptionValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value from a command-line assignment, with booleans normalized
    /// like their YAML spelling
    pub fn from_assignment(value: &str) -> Self {
        match value.trim() {
            "true" => Self::new("True"),
            "false" => Self::new("False"),
            other => Self::new(other),
        }
    }

    fn from_yaml(value: &serde_yaml::Value) -> std::result::Result<Self, String> {
        match value {
            serde_yaml::Value::Bool(true) => Ok(Self::new("True")),
            serde_yaml::Value::Bool(false) => Ok(Self::new("False")),
            serde_yaml::Value::Number(n) => Ok(Self::new(n.to_string())),
            serde_yaml::Value::String(s) => Ok(Self::new(s.clone())),
            other => Err(format!("option values must be scalars, got {other:?}")),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for OptionValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OptionValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_yaml::Value::deserialize(deserializer)?;
        Self::from_yaml(&value).map_err(serde::de::Error::custom)
    }
}

/// Package selector of an override entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionPattern {
    /// Matches one package name
    Exact(String),
    /// Matches every name starting with the prefix (`*` is the empty prefix)
    Prefix(String),
}

impl OptionPattern {
    /// Parse a package pattern
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for an empty pattern or a `*` anywhere but
    /// at the end.
    pub fn parse(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(config::invalid("option pattern is empty"));
        }

        match pattern.strip_suffix('*') {
            Some(prefix) if !prefix.contains('*') => Ok(Self::Prefix(prefix.to_string())),
            Some(_) => Err(config::invalid(format!(
                "option pattern '{pattern}' may only use '*' as a trailing wildcard"
            ))),
            None if pattern.contains('*') => Err(config::invalid(format!(
                "option pattern '{pattern}' may only use '*' as a trailing wildcard"
            ))),
            None => Ok(Self::Exact(pattern.to_string())),
        }
    }

    pub fn matches(&self, package: &str) -> bool {
        match self {
            Self::Exact(name) => name == package,
            Self::Prefix(prefix) => package.starts_with(prefix.as_str()),
        }
    }

    /// Higher is more specific
    pub fn specificity(&self) -> usize {
        match self {
            Self::Exact(_) => usize::MAX,
            Self::Prefix(prefix) => prefix.len(),
        }
    }
}

impl fmt::Display for OptionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => f.write_str(name),
            Self::Prefix(prefix) => write!(f, "{prefix}*"),
        }
    }
}

/// One `pattern:key = value` override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionOverride {
    pub pattern: OptionPattern,
    pub key: String,
    pub value: OptionValue,
}

impl OptionOverride {
    /// Parse the `pattern:key` half of an override
    pub fn parse(qualified_key: &str, value: OptionValue) -> Result<Self> {
        let (pattern, key) = qualified_key.split_once(':').ok_or_else(|| {
            config::invalid(format!(
                "option '{qualified_key}' must have the form <pattern>:<key>"
            ))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(config::invalid(format!(
                "option '{qualified_key}' has an empty key"
            )));
        }
        Ok(Self {
            pattern: OptionPattern::parse(pattern)?,
            key: key.to_string(),
            value,
        })
    }
}

/// Ordered table of option overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionTable {
    entries: Vec<OptionOverride>,
}

impl OptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: OptionOverride) {
        self.entries.push(entry);
    }

    /// Add an override from a `pattern:key=value` command-line assignment
    pub fn push_assignment(&mut self, assignment: &str) -> Result<()> {
        let (qualified_key, value) = assignment.split_once('=').ok_or_else(|| {
            config::invalid(format!(
                "option '{assignment}' must have the form <pattern>:<key>=<value>"
            ))
        })?;
        self.push(OptionOverride::parse(
            qualified_key,
            OptionValue::from_assignment(value),
        )?);
        Ok(())
    }

    pub fn entries(&self) -> &[OptionOverride] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merged option set this table assigns to one package name
    pub fn options_for(&self, package: &str) -> BTreeMap<String, OptionValue> {
        self.selected(package)
            .into_iter()
            .map(|(key, entry)| (key.to_string(), entry.value.clone()))
            .collect()
    }

    /// Keys of [`Self::options_for`] whose winning entry is a wildcard pattern
    ///
    /// A wildcard only applies to packages that declare the option, so the
    /// resolver drops these keys instead of rejecting them.
    pub fn wildcard_keys_for(&self, package: &str) -> BTreeSet<String> {
        self.selected(package)
            .into_iter()
            .filter(|(_, entry)| matches!(entry.pattern, OptionPattern::Prefix(_)))
            .map(|(key, _)| key.to_string())
            .collect()
    }

    /// Winning entry per key for one package
    fn selected(&self, package: &str) -> BTreeMap<&str, &OptionOverride> {
        let mut chosen: BTreeMap<&str, &OptionOverride> = BTreeMap::new();

        for entry in self.entries.iter().filter(|e| e.pattern.matches(package)) {
            let specificity = entry.pattern.specificity();
            let replace = chosen
                .get(entry.key.as_str())
                .is_none_or(|current| specificity >= current.pattern.specificity());
            if replace {
                chosen.insert(entry.key.as_str(), entry);
            }
        }

        chosen
    }

    /// Patterns that match none of the given package names
    pub fn unmatched_patterns<'a>(&self, packages: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let packages: Vec<&str> = packages.into_iter().collect();
        let mut unmatched: Vec<String> = self
            .entries
            .iter()
            .filter(|e| !packages.iter().any(|p| e.pattern.matches(p)))
            .map(|e| format!("{}:{}", e.pattern, e.key))
            .collect();
        unmatched.dedup();
        unmatched
    }
}

impl<'de> Deserialize<'de> for OptionTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Mapping keeps insertion order, which decides ties
        let mapping = serde_yaml::Mapping::deserialize(deserializer)?;
        let mut table = OptionTable::new();
        for (key, value) in &mapping {
            let key = key
                .as_str()
                .ok_or_else(|| serde::de::Error::custom("option keys must be strings"))?;
            let value = OptionValue::from_yaml(value).map_err(serde::de::Error::custom)?;
            let entry = OptionOverride::parse(key, value).map_err(serde::de::Error::custom)?;
            table.push(entry);
        }
        Ok(table)
    }
}

impl Serialize for OptionTable {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&format!("{}:{}", entry.pattern, entry.key), &entry.value)?;
        }
        map.end()
    }
}

/// Overlay `layer` onto `base`, layer values winning
pub fn overlay(
    base: &mut BTreeMap<String, OptionValue>,
    layer: BTreeMap<String, OptionValue>,
) {
    base.extend(layer);
}
