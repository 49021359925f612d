//! Per-call comparison context handed to every comparer

use std::fmt;
use std::sync::Arc;

use tf_core::Value;

use crate::engine;
use crate::{default_registry, CompareOptions, CompareResult, Registry};

/// Verdict returned by a comparer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The values match
    Equal,
    /// The values differ; the text explains how
    Differ(String),
}

impl Outcome {
    pub fn differ(message: impl Into<String>) -> Self {
        Outcome::Differ(message.into())
    }

    pub fn is_equal(&self) -> bool {
        matches!(self, Outcome::Equal)
    }
}

/// Options and registry in effect for one top-level comparison
///
/// Comparers use the context to compare nested values, so registered
/// comparers, strictness and placeholders apply at every depth.
pub struct Context<'a> {
    options: &'a CompareOptions,
    registry: Arc<Registry>,
}

impl<'a> Context<'a> {
    /// Create a context, resolving the call-scoped or process-wide registry
    pub fn new(options: &'a CompareOptions) -> Self {
        let registry = options
            .registry
            .clone()
            .unwrap_or_else(default_registry);
        Self { options, registry }
    }

    pub fn options(&self) -> &CompareOptions {
        self.options
    }

    pub fn strict(&self) -> bool {
        self.options.strict
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// A comparer-specific argument passed through [`CompareOptions::with_option`]
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.extra.get(name)
    }

    /// Compare two nested values with the full dispatch rules
    pub fn compare(&self, first: &Value, second: &Value) -> CompareResult<Outcome> {
        engine::dispatch(self, first, second)
    }

    /// Whether two nested values differ
    pub fn different(&self, first: &Value, second: &Value) -> CompareResult<bool> {
        Ok(!self.compare(first, second)?.is_equal())
    }

    /// Name used for the first value in section headers
    pub fn first_name(&self) -> &str {
        self.options.first_label.as_deref().unwrap_or("first")
    }

    /// Name used for the second value in section headers
    pub fn second_name(&self) -> &str {
        self.options.second_label.as_deref().unwrap_or("second")
    }

    /// Render `text` for the first value, appending its label if one is set
    pub fn label_first(&self, text: impl fmt::Display) -> String {
        labelled(text, self.options.first_label.as_deref())
    }

    /// Render `text` for the second value, appending its label if one is set
    pub fn label_second(&self, text: impl fmt::Display) -> String {
        labelled(text, self.options.second_label.as_deref())
    }
}

fn labelled(text: impl fmt::Display, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("{} ({})", text, label),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let options = CompareOptions::default();
        let ctx = Context::new(&options);
        assert_eq!(ctx.first_name(), "first");
        assert_eq!(ctx.second_name(), "second");
        assert_eq!(ctx.label_first(1), "1");
    }

    #[test]
    fn test_labels() {
        let options = CompareOptions::new().with_labels("expected", "actual");
        let ctx = Context::new(&options);
        assert_eq!(ctx.first_name(), "expected");
        assert_eq!(ctx.label_second("2"), "2 (actual)");
    }

    #[test]
    fn test_scoped_registry_replaces_default() {
        let scoped = Arc::new(Registry::new());
        let options = CompareOptions::new().with_registry(scoped.clone());
        let ctx = Context::new(&options);
        assert!(ctx.registry().is_empty());
    }

    #[test]
    fn test_option_lookup() {
        let options = CompareOptions::new().with_option("places", 3);
        let ctx = Context::new(&options);
        assert_eq!(ctx.option("places"), Some(&Value::Int(3)));
        assert_eq!(ctx.option("missing"), None);
    }
}
