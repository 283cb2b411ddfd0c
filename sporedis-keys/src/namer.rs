//! Key and field name construction.

use crate::{KeyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: &str = ":";

/// Prefix and separator applied to every generated key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Namespace prepended to keys (not fields). Empty means no prefix.
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            separator: default_separator(),
        }
    }
}

/// Builds composite key names from ordered parts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyNamer {
    config: KeyConfig,
}

impl KeyNamer {
    /// Creates a namer, rejecting an empty separator.
    pub fn new(config: KeyConfig) -> Result<Self> {
        if config.separator.is_empty() {
            return Err(KeyError::EmptySeparator);
        }
        Ok(Self { config })
    }

    /// Shorthand for a namer with the given prefix and the default separator.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            config: KeyConfig {
                prefix: prefix.into(),
                separator: default_separator(),
            },
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.config.prefix
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.config.separator
    }

    #[must_use]
    pub fn config(&self) -> &KeyConfig {
        &self.config
    }

    /// Joins `parts` with the separator, prefixed with `prefix + separator`
    /// when the prefix is non-empty.
    ///
    /// ```
    /// use sporedis_keys::KeyNamer;
    ///
    /// let namer = KeyNamer::default();
    /// assert_eq!(namer.make_key(["event", "123-ABC-723"]), "event:123-ABC-723");
    /// ```
    pub fn make_key<I>(&self, parts: I) -> String
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let mut key = String::new();
        if !self.config.prefix.is_empty() {
            key.push_str(&self.config.prefix);
            key.push_str(&self.config.separator);
        }
        self.join_into(&mut key, parts);
        key
    }

    /// Joins `parts` with the separator and never adds the prefix.
    ///
    /// Used for names that live inside an already-prefixed key, such as hash
    /// fields.
    pub fn make_field<I>(&self, parts: I) -> String
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let mut field = String::new();
        self.join_into(&mut field, parts);
        field
    }

    fn join_into<I>(&self, out: &mut String, parts: I)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                out.push_str(&self.config.separator);
            }
            // Writing into a String cannot fail.
            let _ = write!(out, "{part}");
        }
    }
}
