//! Registry mapping type names to comparers

use std::fmt;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tf_core::{types, Value};
use tracing::{debug, instrument};

use crate::comparers;
use crate::{CompareResult, Context, Outcome};

/// Comparer function type
///
/// Returns [`Outcome::Equal`] when the values match, otherwise an
/// [`Outcome::Differ`] carrying the explanation shown to the test author.
pub type Comparer = Arc<dyn Fn(&Value, &Value, &Context<'_>) -> CompareResult<Outcome> + Send + Sync>;

static DEFAULT_REGISTRY: OnceLock<Arc<Registry>> = OnceLock::new();

/// Maps type names to the comparer used for values of that type
///
/// Lookup is by exact type name. A registry passed in
/// [`crate::CompareOptions::registry`] replaces the process-wide registry
/// for that call rather than being merged with it.
pub struct Registry {
    /// Comparers indexed by type name
    comparers: DashMap<String, Comparer>,
}

impl Registry {
    /// Create an empty registry
    ///
    /// Values with no registered comparer still get the category-based
    /// defaults.
    pub fn new() -> Self {
        Self {
            comparers: DashMap::new(),
        }
    }

    /// Create a registry with the builtin comparers bound to the builtin
    /// type names
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(types::SET, comparers::compare_set);
        registry.register(types::DICT, comparers::compare_dict);
        registry.register(types::LIST, comparers::compare_sequence);
        registry.register(types::TUPLE, comparers::compare_sequence);
        registry.register(types::STR, comparers::compare_text);
        registry.register(types::GENERATOR, comparers::compare_generator);
        registry
    }

    /// Register a comparer for `type_name`, replacing any existing one
    #[instrument(skip(self, type_name, comparer))]
    pub fn register<F>(&self, type_name: impl Into<String>, comparer: F)
    where
        F: Fn(&Value, &Value, &Context<'_>) -> CompareResult<Outcome> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        debug!(type_name = %type_name, "Registering comparer");
        self.comparers.insert(type_name, Arc::new(comparer));
    }

    /// Get the comparer registered for exactly `type_name`
    pub fn get(&self, type_name: &str) -> Option<Comparer> {
        self.comparers.get(type_name).map(|c| c.value().clone())
    }

    /// Check if a comparer is registered for `type_name`
    pub fn contains(&self, type_name: &str) -> bool {
        self.comparers.contains_key(type_name)
    }

    /// Remove the comparer for `type_name`
    #[instrument(skip(self))]
    pub fn unregister(&self, type_name: &str) -> bool {
        let removed = self.comparers.remove(type_name).is_some();

        if removed {
            debug!(type_name = %type_name, "Unregistered comparer");
        }

        removed
    }

    /// All type names with a registered comparer, sorted
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.comparers.iter().map(|c| c.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.comparers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparers.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("type_names", &self.type_names())
            .finish()
    }
}

/// The process-wide registry, created with the builtin bindings on first use
pub fn default_registry() -> Arc<Registry> {
    DEFAULT_REGISTRY
        .get_or_init(|| Arc::new(Registry::with_defaults()))
        .clone()
}

/// Register a comparer in the process-wide registry
///
/// Intended for test setup; every later comparison whose first value has
/// type `type_name` uses it unless a call-scoped registry is given.
pub fn register<F>(type_name: impl Into<String>, comparer: F)
where
    F: Fn(&Value, &Value, &Context<'_>) -> CompareResult<Outcome> + Send + Sync + 'static,
{
    default_registry().register(type_name, comparer);
}
