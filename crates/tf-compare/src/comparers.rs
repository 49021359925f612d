//! Builtin comparers
//!
//! Each comparer returns [`Outcome::Equal`] or an [`Outcome::Differ`] whose
//! text is shown to the test author as-is. Nested elements go back through
//! [`Context::compare`], so registered comparers apply at every depth.

use std::borrow::Cow;

use tf_core::{Placeholder, Value};
use tracing::trace;

use crate::comparison::Comparison;
use crate::diff::unified_diff;
use crate::{CompareResult, Context, Outcome};

/// Strings longer than this (in characters) get the long-text rendering
const SHORT_TEXT: usize = 10;

/// `repr(first) != repr(second)`
pub fn compare_simple(first: &Value, second: &Value, ctx: &Context<'_>) -> CompareResult<Outcome> {
    if simple_equal(first, second, ctx)? {
        return Ok(Outcome::Equal);
    }

    let (first_repr, second_repr) = (first.to_string(), second.to_string());
    if first_repr == second_repr {
        return Ok(Outcome::differ(format!(
            "both {} and {} appear as {}, but are not equal!",
            ctx.first_name(),
            ctx.second_name(),
            first_repr
        )));
    }

    Ok(Outcome::differ(format!(
        "{} != {}",
        ctx.label_first(first_repr),
        ctx.label_second(second_repr)
    )))
}

/// Report used when strict mode finds two different type names
pub fn compare_with_type(first: &Value, second: &Value, ctx: &Context<'_>) -> Outcome {
    Outcome::differ(format!(
        "{} != {}",
        ctx.label_first(format!("{} ({})", first, first.type_name())),
        ctx.label_second(format!("{} ({})", second, second.type_name()))
    ))
}

/// Elements of each set missing from the other
pub fn compare_set(first: &Value, second: &Value, ctx: &Context<'_>) -> CompareResult<Outcome> {
    let (Value::Set(a), Value::Set(b)) = (first.base(), second.base()) else {
        return compare_simple(first, second, ctx);
    };

    let mut first_only: Vec<&Value> = Vec::new();
    'first: for x in a {
        for y in b {
            if !ctx.different(x, y)? {
                continue 'first;
            }
        }
        first_only.push(x);
    }

    let mut second_only: Vec<&Value> = Vec::new();
    'second: for y in b {
        for x in a {
            if !ctx.different(x, y)? {
                continue 'second;
            }
        }
        second_only.push(y);
    }

    if first_only.is_empty() && second_only.is_empty() {
        return Ok(Outcome::Equal);
    }

    Value::sort_if_orderable(&mut first_only);
    Value::sort_if_orderable(&mut second_only);

    let mut sections = vec![format!("{} not as expected:", first.type_name())];
    if !first_only.is_empty() {
        sections.push(format!(
            "in {} but not {}:\n{}",
            ctx.first_name(),
            ctx.second_name(),
            Value::list(first_only.into_iter().cloned())
        ));
    }
    if !second_only.is_empty() {
        sections.push(format!(
            "in {} but not {}:\n{}",
            ctx.second_name(),
            ctx.first_name(),
            Value::list(second_only.into_iter().cloned())
        ));
    }

    Ok(Outcome::differ(sections.join("\n\n")))
}

/// Keys partitioned into same, one-sided and differing values
pub fn compare_dict(first: &Value, second: &Value, ctx: &Context<'_>) -> CompareResult<Outcome> {
    let (Value::Dict(a), Value::Dict(b)) = (first.base(), second.base()) else {
        return compare_simple(first, second, ctx);
    };

    let mut first_entries: Vec<&(Value, Value)> = a.iter().collect();
    sort_entries(&mut first_entries);

    let mut second_only: Vec<&(Value, Value)> = Vec::new();
    for entry in b {
        if find_key(a, &entry.0, Side::Second, ctx)?.is_none() {
            second_only.push(entry);
        }
    }
    sort_entries(&mut second_only);

    let mut same = Vec::new();
    let mut first_only = Vec::new();
    let mut differ = Vec::new();
    for (key, first_value) in first_entries {
        match find_key(b, key, Side::First, ctx)? {
            Some(second_value) => {
                if ctx.different(first_value, second_value)? {
                    differ.push((key, first_value, second_value));
                } else {
                    same.push(key);
                }
            }
            None => first_only.push((key, first_value)),
        }
    }

    if first_only.is_empty() && second_only.is_empty() && differ.is_empty() {
        return Ok(Outcome::Equal);
    }

    let mut sections = vec![format!("{} not as expected:", first.type_name())];
    if !same.is_empty() {
        sections.push(format!("same:\n{}", Value::list(same.into_iter().cloned())));
    }
    if !first_only.is_empty() {
        let lines: Vec<String> = first_only
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        sections.push(format!(
            "in {} but not {}:\n{}",
            ctx.first_name(),
            ctx.second_name(),
            lines.join("\n")
        ));
    }
    if !second_only.is_empty() {
        let lines: Vec<String> = second_only
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        sections.push(format!(
            "in {} but not {}:\n{}",
            ctx.second_name(),
            ctx.first_name(),
            lines.join("\n")
        ));
    }
    if !differ.is_empty() {
        let lines: Vec<String> = differ
            .iter()
            .map(|(k, x, y)| format!("{}: {} != {}", k, x, y))
            .collect();
        sections.push(format!("values differ:\n{}", lines.join("\n")));
    }

    Ok(Outcome::differ(sections.join("\n\n")))
}

/// Longest common prefix, then what remains of each side
pub fn compare_sequence(
    first: &Value,
    second: &Value,
    ctx: &Context<'_>,
) -> CompareResult<Outcome> {
    if !same_container(first, second) {
        return compare_simple(first, second, ctx);
    }
    let (Some(a), Some(b)) = (sequence_items(first), sequence_items(second)) else {
        return compare_simple(first, second, ctx);
    };

    let mut same = 0;
    while same < a.len() && same < b.len() {
        if ctx.different(&a[same], &b[same])? {
            break;
        }
        same += 1;
    }

    if same == a.len() && same == b.len() {
        return Ok(Outcome::Equal);
    }

    let render = |items: &[Value]| -> Value {
        match first.base() {
            Value::List(_) => Value::list(items.iter().cloned()),
            _ => Value::tuple(items.iter().cloned()),
        }
    };

    Ok(Outcome::differ(format!(
        "sequence not as expected:\n\nsame:\n{}\n\n{}:\n{}\n\n{}:\n{}",
        render(&a[..same]),
        ctx.first_name(),
        render(&a[same..]),
        ctx.second_name(),
        render(&b[same..])
    )))
}

/// Drain the generator and compare against whatever the second value yields
///
/// The second value is drained too when it is a generator, or iterated when
/// it is a collection; both sides are then compared as tuples.
pub fn compare_generator(
    first: &Value,
    second: &Value,
    ctx: &Context<'_>,
) -> CompareResult<Outcome> {
    let first_items = first.iter_items().unwrap_or_default();
    trace!(items = first_items.len(), "Drained generator");

    match second.iter_items() {
        Some(second_items) => {
            compare_sequence(&Value::Tuple(first_items), &Value::Tuple(second_items), ctx)
        }
        None => compare_simple(first, second, ctx),
    }
}

/// Text comparison honoring the whitespace options
pub fn compare_text(first: &Value, second: &Value, ctx: &Context<'_>) -> CompareResult<Outcome> {
    let (Some(a), Some(b)) = (first.as_str(), second.as_str()) else {
        return compare_simple(first, second, ctx);
    };

    let options = ctx.options();
    let a = normalize(a, options.blanklines, options.trailing_whitespace);
    let b = normalize(b, options.blanklines, options.trailing_whitespace);
    if a == b {
        return Ok(Outcome::Equal);
    }

    let multiline = a.contains('\n') || b.contains('\n');
    let long = a.chars().count() > SHORT_TEXT || b.chars().count() > SHORT_TEXT;

    let message = if multiline {
        if options.show_whitespace {
            unified_diff(
                &split_repr(&a),
                &split_repr(&b),
                ctx.first_name(),
                ctx.second_name(),
            )
        } else {
            unified_diff(&a, &b, ctx.first_name(), ctx.second_name())
        }
    } else if long {
        format!(
            "{}\n!=\n{}",
            ctx.label_first(format!("{:?}", a)),
            ctx.label_second(format!("{:?}", b))
        )
    } else {
        format!(
            "{} != {}",
            ctx.label_first(format!("{:?}", a)),
            ctx.label_second(format!("{:?}", b))
        )
    };

    Ok(Outcome::differ(message))
}

/// Let the placeholder decide, then render it with its recorded failures
pub fn compare_placeholder(
    placeholder: &dyn Placeholder,
    second: &Value,
    ctx: &Context<'_>,
) -> CompareResult<Outcome> {
    let matched = match placeholder.as_any().downcast_ref::<Comparison>() {
        Some(comparison) => comparison.matches(second, ctx)?,
        None => placeholder.matches_value(second),
    };

    if matched {
        return Ok(Outcome::Equal);
    }

    Ok(Outcome::differ(format!(
        "{} != {}",
        ctx.label_first(placeholder),
        ctx.label_second(second)
    )))
}

fn sequence_items(value: &Value) -> Option<Cow<'_, [Value]>> {
    match value.base() {
        Value::List(items) | Value::Tuple(items) => Some(Cow::Borrowed(items.as_slice())),
        Value::Generator(generator) => Some(Cow::Owned(generator.drain())),
        _ => None,
    }
}

/// Only a generator on the first side stands in for the other container
fn same_container(first: &Value, second: &Value) -> bool {
    matches!(
        (first.base(), second.base()),
        (Value::List(_), Value::List(_))
            | (Value::Tuple(_), Value::Tuple(_))
            | (Value::Generator(_), Value::List(_) | Value::Tuple(_) | Value::Generator(_))
    )
}

/// `==`, except that object attributes go back through the engine
fn simple_equal(first: &Value, second: &Value, ctx: &Context<'_>) -> CompareResult<bool> {
    match (first.as_object(), second.as_object()) {
        (Some(a), Some(b)) => a.try_eq_by(b, |x, y| Ok(!ctx.different(x, y)?)),
        _ => Ok(first == second),
    }
}

/// Which argument of the comparison a dict key came from
#[derive(Debug, Clone, Copy)]
enum Side {
    First,
    Second,
}

/// Value stored under the entry whose key compares equal to `key`
fn find_key<'a>(
    entries: &'a [(Value, Value)],
    key: &Value,
    side: Side,
    ctx: &Context<'_>,
) -> CompareResult<Option<&'a Value>> {
    for (candidate, value) in entries {
        let different = match side {
            Side::First => ctx.different(key, candidate)?,
            Side::Second => ctx.different(candidate, key)?,
        };
        if !different {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn sort_entries(entries: &mut [&(Value, Value)]) {
    let mut keys: Vec<&Value> = entries.iter().map(|(k, _)| k).collect();
    if Value::sort_if_orderable(&mut keys) {
        entries.sort_by(|(x, _), (y, _)| x.try_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    }
}

fn normalize(text: &str, blanklines: bool, trailing_whitespace: bool) -> String {
    if blanklines && trailing_whitespace {
        return text.to_string();
    }

    text.split('\n')
        .map(|line| {
            if trailing_whitespace {
                line
            } else {
                line.trim_end()
            }
        })
        .filter(|line| blanklines || !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Each line escaped together with its terminator, one per output line
fn split_repr(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| format!("{:?}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
