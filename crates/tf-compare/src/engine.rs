//! Comparer selection and the top-level `compare` entry point

use tf_core::{Category, Value};
use tracing::{instrument, trace};

use crate::comparers;
use crate::{CompareError, CompareOptions, CompareResult, Context, Outcome};

type BuiltinComparer = fn(&Value, &Value, &Context<'_>) -> CompareResult<Outcome>;

/// Compare two values, returning the rendered explanation on mismatch
///
/// # Errors
///
/// [`CompareError::NotEqual`] when the values differ. Usage errors (a
/// strict placeholder against an opaque object, a failing comparer) are
/// returned as their own variants.
#[instrument(skip_all, fields(first = %first.type_name(), second = %second.type_name()))]
pub fn compare(first: &Value, second: &Value, options: &CompareOptions) -> CompareResult<()> {
    let ctx = Context::new(options);
    match ctx.compare(first, second)? {
        Outcome::Equal => Ok(()),
        Outcome::Differ(message) => Err(CompareError::NotEqual {
            message: options.apply_prefix(message),
        }),
    }
}

/// Compare two values with default options
pub fn compare_values(first: impl Into<Value>, second: impl Into<Value>) -> CompareResult<()> {
    compare(&first.into(), &second.into(), &CompareOptions::default())
}

/// Select and run the comparer for one pair of values
pub(crate) fn dispatch(ctx: &Context<'_>, first: &Value, second: &Value) -> CompareResult<Outcome> {
    if let Value::Placeholder(placeholder) = first {
        return comparers::compare_placeholder(placeholder.as_ref(), second, ctx);
    }

    if ctx.strict() && first.type_name() != second.type_name() {
        trace!(
            first = %first.type_name(),
            second = %second.type_name(),
            "Strict type mismatch"
        );
        return Ok(comparers::compare_with_type(first, second, ctx));
    }

    if let Some(comparer) = registered(ctx, first) {
        return comparer(first, second, ctx);
    }

    let builtin = builtin_comparer(first, second);
    builtin(first, second, ctx)
}

fn registered(ctx: &Context<'_>, first: &Value) -> Option<crate::Comparer> {
    let registry = ctx.registry();

    if let Some(comparer) = registry.get(first.type_name()) {
        trace!(type_name = %first.type_name(), "Using registered comparer");
        return Some(comparer);
    }

    if ctx.strict() {
        return None;
    }

    first.base_type_names().into_iter().find_map(|name| {
        let comparer = registry.get(name)?;
        trace!(type_name = %name, "Using comparer registered for base type");
        Some(comparer)
    })
}

/// Fallback by structural category, probed in fixed precedence order
fn builtin_comparer(first: &Value, second: &Value) -> BuiltinComparer {
    if first.is_generator() {
        return comparers::compare_generator;
    }

    match (first.category(), second.category()) {
        (Category::Set, Category::Set) => comparers::compare_set,
        (Category::Mapping, Category::Mapping) => comparers::compare_dict,
        (Category::Sequence, Category::Sequence) => comparers::compare_sequence,
        (Category::Text, Category::Text) => comparers::compare_text,
        _ => comparers::compare_simple,
    }
}
