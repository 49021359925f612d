//! Options for comparing values

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tf_core::Value;

use crate::Registry;

/// Options for a single comparison
///
/// The flag subset can be deserialized, so a suite can keep shared defaults
/// in a JSON or YAML file. Registries and comparer arguments are runtime
/// only.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// Require both values to have exactly the same type name
    pub strict: bool,
    /// Render whitespace and line terminators escaped in text diffs
    pub show_whitespace: bool,
    /// When false, whitespace-only lines are ignored in text comparisons
    pub blanklines: bool,
    /// When false, trailing whitespace on each line is ignored
    pub trailing_whitespace: bool,
    /// Text prepended to the failure message as `"<prefix>: "`
    pub prefix: Option<String>,
    /// Label for the first value in reports
    pub first_label: Option<String>,
    /// Label for the second value in reports
    pub second_label: Option<String>,
    /// Call-scoped comparers used instead of the process-wide registry
    #[serde(skip)]
    pub registry: Option<Arc<Registry>>,
    /// Comparer-specific arguments forwarded verbatim
    #[serde(skip)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            strict: false,
            show_whitespace: false,
            blanklines: true,
            trailing_whitespace: true,
            prefix: None,
            first_label: None,
            second_label: None,
            registry: None,
            extra: BTreeMap::new(),
        }
    }
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load flag defaults from environment variables
    ///
    /// Reads `TF_COMPARE_STRICT`, `TF_COMPARE_SHOW_WHITESPACE`,
    /// `TF_COMPARE_BLANKLINES` and `TF_COMPARE_TRAILING_WHITESPACE`.
    /// Unset or unparseable variables keep the default.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        let flag = |name: &str| env::var(name).ok().and_then(|v| parse_flag(&v));

        if let Some(strict) = flag("TF_COMPARE_STRICT") {
            opts.strict = strict;
        }
        if let Some(show) = flag("TF_COMPARE_SHOW_WHITESPACE") {
            opts.show_whitespace = show;
        }
        if let Some(blanklines) = flag("TF_COMPARE_BLANKLINES") {
            opts.blanklines = blanklines;
        }
        if let Some(trailing) = flag("TF_COMPARE_TRAILING_WHITESPACE") {
            opts.trailing_whitespace = trailing;
        }
        opts
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn show_whitespace(mut self) -> Self {
        self.show_whitespace = true;
        self
    }

    pub fn ignore_blank_lines(mut self) -> Self {
        self.blanklines = false;
        self
    }

    pub fn ignore_trailing_whitespace(mut self) -> Self {
        self.trailing_whitespace = false;
        self
    }

    /// Use `registry` instead of the process-wide one for this call
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_labels(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.first_label = Some(first.into());
        self.second_label = Some(second.into());
        self
    }

    /// Forward an argument to whichever comparer handles the values
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub(crate) fn apply_prefix(&self, message: String) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}: {}", prefix, message),
            None => message,
        }
    }
}

impl fmt::Debug for CompareOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompareOptions")
            .field("strict", &self.strict)
            .field("show_whitespace", &self.show_whitespace)
            .field("blanklines", &self.blanklines)
            .field("trailing_whitespace", &self.trailing_whitespace)
            .field("prefix", &self.prefix)
            .field("first_label", &self.first_label)
            .field("second_label", &self.second_label)
            .field("registry", &self.registry.is_some())
            .field("extra", &self.extra)
            .finish()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
