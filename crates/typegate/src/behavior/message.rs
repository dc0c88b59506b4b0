//! Error Message Composer.
//!
//! [`TypeBehavior::explain`] walks the behavior tree in lock-step with
//! [`TypeBehavior::is_valid`]. Leaves produce one `Expected ...` sentence;
//! sequences and keyed structures list the failing parts underneath a header;
//! combinators join their children with a connective.

use itertools::Itertools;

use super::{
    evaluate::{entries_for, repeated_keys, same_key_set},
    TypeBehavior,
};
use crate::value::Value;

const INDENT: &str = "  ";

impl TypeBehavior {
    /// Explain why `value` does not satisfy this behavior.
    ///
    /// Only meaningful for a failing value; for a passing one the text still
    /// describes the expectation but lists no failing parts.
    pub fn explain(&self, value: &Value) -> String {
        match self {
            Self::Class(class) => format!("Expected {value} to be a {class}"),
            Self::Capability(method) => format!("Expected {value} to respond to :{method}"),
            Self::Pattern(regex) => {
                format!("Expected stringified {value} to match regexp /{regex}/")
            }
            Self::Range(range) => format!("Expected {value} to be included in range {range}"),
            Self::True => format!("Expected {value} to be a truthy value"),
            Self::False => format!("Expected {value} to be a falsy value"),
            Self::Nil => format!("Expected {value} to be nil"),
            Self::Predicate(predicate) => format!(
                "Expected {value} to return a truthy value for proc {}",
                predicate.label()
            ),
            Self::Sequence(elements) => explain_sequence(elements, value),
            Self::Keyed(mapping) => explain_keyed(mapping, value),
            Self::Any => format!("Expected {value} to be anything"),
            Self::And(behaviors) => join(behaviors, value, "\nAND "),
            Self::Or(behaviors) => join(behaviors, value, "\nOR "),
            Self::Xor(behaviors) => join(behaviors, value, "\nXOR "),
            Self::Not(behaviors) => behaviors
                .iter()
                .map(|behavior| format!("NOT {}", behavior.explain(value)))
                .join("\nAND "),
            Self::Nilable(inner) => {
                format!("{}\nOR {}", inner.explain(value), Self::Nil.explain(value))
            }
            Self::TypedSequence(element) => explain_typed_sequence(element, value),
        }
    }
}

fn join(behaviors: &[TypeBehavior], value: &Value, connective: &str) -> String {
    behaviors
        .iter()
        .map(|behavior| behavior.explain(value))
        .join(connective)
}

/// One `- <label> : <explanation>` line; structural children go in braces.
fn nested_line(label: &str, behavior: &TypeBehavior, value: &Value) -> String {
    let explanation = behavior.explain(value);
    if behavior.is_structural() {
        let body = explanation
            .lines()
            .map(|line| format!("{INDENT}{line}"))
            .join("\n");
        format!("- {label} : {{\n{body}\n}}")
    } else {
        format!("- {label} : {explanation}")
    }
}

fn with_details(header: String, details: &[String]) -> String {
    if details.is_empty() {
        header
    } else {
        format!("{header}:\n{}", details.join("\n"))
    }
}

fn explain_sequence(elements: &[TypeBehavior], value: &Value) -> String {
    let Some(items) = value.as_array() else {
        return format!("Expected {value} to be an array");
    };
    let header = format!(
        "Expected {value} to be an array with {} elements",
        elements.len()
    );
    if items.len() != elements.len() {
        return header;
    }

    let details: Vec<String> = elements
        .iter()
        .zip(items)
        .enumerate()
        .filter(|(_, (behavior, item))| !behavior.is_valid(item))
        .map(|(index, (behavior, item))| nested_line(&format!("[{index}] index"), behavior, item))
        .collect();
    with_details(header, &details)
}

fn explain_keyed(mapping: &[(Value, TypeBehavior)], value: &Value) -> String {
    let Some(entries) = value.as_hash() else {
        return format!("Expected {value} to be a hash");
    };
    let header = format!(
        "Expected {value} to be a hash with {} elements",
        mapping.len()
    );

    if !same_key_set(mapping, entries) {
        let missing = mapping
            .iter()
            .filter(|(key, _)| value.get(key).is_none())
            .map(|(key, _)| format!("- missing key {key}"));
        let unexpected = entries
            .iter()
            .filter(|(key, _)| !mapping.iter().any(|(declared, _)| declared == key))
            .map(|(key, _)| format!("- unexpected key {key}"));
        let repeated = repeated_keys(entries).map(|key| format!("- duplicate key {key}"));
        let details: Vec<String> = missing.chain(unexpected).chain(repeated).collect();
        return with_details(header, &details);
    }

    let details: Vec<String> = mapping
        .iter()
        .flat_map(|(key, behavior)| {
            entries_for(entries, key)
                .filter(|item| !behavior.is_valid(item))
                .map(move |item| nested_line(&key.to_s(), behavior, item))
        })
        .collect();
    with_details(header, &details)
}

fn explain_typed_sequence(element: &TypeBehavior, value: &Value) -> String {
    let header = format!("Expected {value} to be an array with type {element}");
    let Some(items) = value.as_array() else {
        return header;
    };

    let details: Vec<String> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| !element.is_valid(item))
        .map(|(index, item)| nested_line(&format!("[{index}] index"), element, item))
        .collect();
    with_details(header, &details)
}
