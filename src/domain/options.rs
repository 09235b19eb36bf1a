//! Normalized option bag handed to collaborators

use std::collections::BTreeMap;
use std::fmt;


/// Option names a collaborator may ever receive.
///
/// Anything a parser produces outside this list is dropped during
/// normalization, never forwarded.
pub const OPTION_WHITELIST: &[&str] = &[
    "project",
    "spec",
    "reporter",
    "reporterOptions",
    "path",
    "destination",
    "port",
    "env",
    "cypressVersion",
    "binaryVersion",
    "config",
    "record",
    "key",
    "browser",
    "detached",
    "headed",
    "global",
    "dev",
    "force",
    "exit",
    "cachePath",
    "cacheList",
    "cacheClear",
    "parallel",
    "group",
    "ciBuildId",
];

/// Returns true if `key` may appear in an [`OptionBag`].
pub fn is_whitelisted(key: &str) -> bool {
    OPTION_WHITELIST.contains(&key)
}

/// Coerce the value of a `[bool]` option.
///
/// Only the literal `"false"` turns the flag off; any other value, and a
/// missing value, turns it on.
pub fn coerce_false(value: Option<&str>) -> bool {
    value != Some("false")
}

/// A single parsed option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl OptionValue {
    /// Truthiness as a collaborator sees it: `false` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            OptionValue::Bool(b) => *b,
            OptionValue::Str(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Str(value)
    }
}

/// Raw parser output: any key, any value.
pub type ParsedOptions = BTreeMap<String, OptionValue>;

/// Whitelisted, coerced options for one collaborator call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionBag(BTreeMap<String, OptionValue>);

impl OptionBag {
    /// Build a bag from parser output.
    ///
    /// Keys outside [`OPTION_WHITELIST`] are dropped. A falsy `exit` is removed
    /// entirely: collaborators treat absence of `exit` as "close when done".
    pub fn from_parsed(parsed: ParsedOptions) -> Self {
        let mut bag: BTreeMap<String, OptionValue> = parsed
            .into_iter()
            .filter(|(k, _)| is_whitelisted(k))
            .collect();

        if bag.get("exit").is_some_and(|v| !v.is_truthy()) {
            bag.remove("exit");
        }

        tracing::debug!(options = ?bag, "parsed cli options");
        Self(bag)
    }

    /// Set a whitelisted key. Returns false (and leaves the bag unchanged) for
    /// any other key.
    pub fn set(&mut self, key: &str, value: impl Into<OptionValue>) -> bool {
        if !is_whitelisted(key) {
            return false;
        }
        self.0.insert(key.to_string(), value.into());
        true
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// True if the key is present and truthy.
    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(OptionValue::is_truthy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
