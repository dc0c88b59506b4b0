//! Recursive matcher.
//!
//! Evaluation is pure: no allocation beyond what nested checks need, no
//! side effects besides running user predicates.

use super::TypeBehavior;
use crate::value::Value;

impl TypeBehavior {
    /// Whether `value` satisfies this behavior.
    pub fn is_valid(&self, value: &Value) -> bool {
        match self {
            Self::Class(class) => value.is_kind_of(class),
            Self::Capability(method) => value.responds_to(method),
            Self::Pattern(regex) => regex.is_match(&value.to_s()),
            Self::Range(range) => range.contains(value),
            Self::True => value.is_truthy(),
            Self::False => !value.is_truthy(),
            Self::Nil => value.is_nil(),
            Self::Predicate(predicate) => predicate.test(value),
            Self::Sequence(elements) => value.as_array().is_some_and(|items| {
                items.len() == elements.len()
                    && elements
                        .iter()
                        .zip(items)
                        .all(|(behavior, item)| behavior.is_valid(item))
            }),
            Self::Keyed(mapping) => value.as_hash().is_some_and(|entries| {
                same_key_set(mapping, entries)
                    && mapping.iter().all(|(key, behavior)| {
                        entries_for(entries, key).all(|item| behavior.is_valid(item))
                    })
            }),
            Self::Any => true,
            Self::And(behaviors) => behaviors.iter().all(|behavior| behavior.is_valid(value)),
            Self::Or(behaviors) => behaviors.iter().any(|behavior| behavior.is_valid(value)),
            Self::Xor(behaviors) => {
                behaviors
                    .iter()
                    .filter(|behavior| behavior.is_valid(value))
                    .count()
                    == 1
            }
            Self::Not(behaviors) => behaviors.iter().all(|behavior| !behavior.is_valid(value)),
            Self::Nilable(inner) => value.is_nil() || inner.is_valid(value),
            Self::TypedSequence(element) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|item| element.is_valid(item))),
        }
    }
}

/// Exact key-set equality, independent of order. A hash that repeats a key
/// never matches.
pub(super) fn same_key_set(mapping: &[(Value, TypeBehavior)], entries: &[(Value, Value)]) -> bool {
    entries.len() == mapping.len()
        && mapping
            .iter()
            .all(|(key, _)| entries.iter().any(|(candidate, _)| candidate == key))
        && entries
            .iter()
            .all(|(key, _)| mapping.iter().any(|(candidate, _)| candidate == key))
}

/// Every value stored under `key`.
pub(super) fn entries_for<'a>(
    entries: &'a [(Value, Value)],
    key: &'a Value,
) -> impl Iterator<Item = &'a Value> {
    entries
        .iter()
        .filter(move |(candidate, _)| candidate == key)
        .map(|(_, item)| item)
}

/// Keys that occur again after their first entry.
pub(super) fn repeated_keys(entries: &[(Value, Value)]) -> impl Iterator<Item = &Value> {
    entries
        .iter()
        .enumerate()
        .filter(move |(index, (key, _))| {
            entries[..*index].iter().any(|(earlier, _)| earlier == key)
        })
        .map(|(_, (key, _))| key)
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;
    use crate::{
        behavior::{Predicate, RangeBound},
        class::{builtins, Class},
        value::Object,
    };

    fn class(class: crate::class::ClassRef) -> TypeBehavior {
        TypeBehavior::Class(class)
    }

    fn int() -> TypeBehavior {
        class(builtins::integer())
    }

    fn string() -> TypeBehavior {
        class(builtins::string())
    }

    #[test]
    fn test_class_tag() {
        assert!(string().is_valid(&Value::from("hi")));
        assert!(!string().is_valid(&Value::from(42)));
        assert!(class(builtins::numeric()).is_valid(&Value::from(1.5)));
        assert!(class(builtins::boolean()).is_valid(&Value::Bool(false)));
    }

    #[test]
    fn test_class_tag_with_user_class() {
        let shape = Class::define("Shape").build();
        let circle = Class::define("Circle").superclass(shape.clone()).build();
        let value = Value::from(Object::new(circle));
        assert!(class(shape).is_valid(&value));
        assert!(class(builtins::object()).is_valid(&value));
        assert!(!int().is_valid(&value));
    }

    #[test]
    fn test_capability_tag() {
        let to_i = TypeBehavior::Capability("to_i".into());
        assert!(to_i.is_valid(&Value::from(1)));
        assert!(to_i.is_valid(&Value::from("12")));
        assert!(to_i.is_valid(&Value::Nil));
        assert!(!to_i.is_valid(&Value::Bool(true)));
    }

    #[test]
    fn test_pattern_tag_uses_stringified_value() -> Result<(), regex::Error> {
        let digits = TypeBehavior::Pattern(Regex::new("^\\d+$")?);
        assert!(digits.is_valid(&Value::from("123")));
        assert!(digits.is_valid(&Value::from(123)));
        assert!(!digits.is_valid(&Value::from("12a")));
        assert!(!digits.is_valid(&Value::Nil));

        let name = TypeBehavior::Pattern(Regex::new("^to_")?);
        assert!(name.is_valid(&Value::sym("to_s")));
        Ok(())
    }

    #[test]
    fn test_range_tag() {
        let range = TypeBehavior::Range(RangeBound::from(1..=10));
        assert!(range.is_valid(&Value::from(3)));
        assert!(!range.is_valid(&Value::from(0)));
        assert!(!range.is_valid(&Value::from("3")));
    }

    #[test]
    fn test_literals_use_truthiness() {
        assert!(TypeBehavior::True.is_valid(&Value::from(0)));
        assert!(TypeBehavior::True.is_valid(&Value::from("")));
        assert!(!TypeBehavior::True.is_valid(&Value::Nil));
        assert!(TypeBehavior::False.is_valid(&Value::Nil));
        assert!(TypeBehavior::False.is_valid(&Value::Bool(false)));
        assert!(!TypeBehavior::False.is_valid(&Value::from(0)));
        assert!(TypeBehavior::Nil.is_valid(&Value::Nil));
        assert!(!TypeBehavior::Nil.is_valid(&Value::Bool(false)));
    }

    #[test]
    fn test_predicate_tag() {
        let even = TypeBehavior::Predicate(Predicate::new("even", |value| {
            matches!(value, Value::Int(n) if n % 2 == 0)
        }));
        assert!(even.is_valid(&Value::from(4)));
        assert!(!even.is_valid(&Value::from(3)));
        assert!(!even.is_valid(&Value::from("4")));
    }

    #[test]
    fn test_sequence_is_positional() {
        let pair = TypeBehavior::Sequence(vec![int(), int()]);
        assert!(pair.is_valid(&Value::array([1, 2])));
        assert!(!pair.is_valid(&Value::array([1, 2, 3])));
        assert!(!pair.is_valid(&Value::array([1])));
        assert!(!pair.is_valid(&Value::array([Value::from(1), Value::from("a")])));
        assert!(!pair.is_valid(&Value::from(1)));

        let mixed = TypeBehavior::Sequence(vec![int(), string()]);
        assert!(mixed.is_valid(&Value::array([Value::from(1), Value::from("a")])));
        assert!(!mixed.is_valid(&Value::array([Value::from("a"), Value::from(1)])));

        let empty = TypeBehavior::Sequence(Vec::new());
        assert!(empty.is_valid(&Value::array(Vec::<Value>::new())));
    }

    #[test]
    fn test_keyed_requires_exact_key_set() {
        let keyed = TypeBehavior::Keyed(vec![(Value::sym("a"), int())]);
        assert!(keyed.is_valid(&Value::hash([(Value::sym("a"), 1)])));
        assert!(!keyed.is_valid(&Value::hash([(Value::sym("a"), 1), (Value::sym("b"), 2)])));
        assert!(!keyed.is_valid(&Value::Hash(Vec::new())));
        assert!(!keyed.is_valid(&Value::hash([(Value::sym("a"), "1")])));
        assert!(!keyed.is_valid(&Value::hash([(Value::from("a"), 1)])));
        assert!(!keyed.is_valid(&Value::array([1])));
    }

    #[test]
    fn test_keyed_rejects_repeated_keys() {
        let keyed = TypeBehavior::Keyed(vec![(Value::sym("a"), int())]);
        let repeated = Value::Hash(vec![
            (Value::sym("a"), Value::from(1)),
            (Value::sym("a"), Value::from("x")),
        ]);
        assert!(!keyed.is_valid(&repeated));

        let both_valid = Value::Hash(vec![
            (Value::sym("a"), Value::from(1)),
            (Value::sym("a"), Value::from(2)),
        ]);
        assert!(!keyed.is_valid(&both_valid));
    }

    #[test]
    fn test_keyed_ignores_key_order() {
        let keyed = TypeBehavior::Keyed(vec![(Value::sym("a"), int()), (Value::sym("b"), string())]);
        let value = Value::hash([(Value::sym("b"), Value::from("x")), (Value::sym("a"), Value::from(1))]);
        assert!(keyed.is_valid(&value));
    }

    #[test]
    fn test_any() {
        for value in [Value::Nil, Value::from(1), Value::array([1]), Value::Hash(Vec::new())] {
            assert!(TypeBehavior::Any.is_valid(&value));
        }
    }

    #[test]
    fn test_and_or() {
        let numeric_int = TypeBehavior::And(vec![class(builtins::numeric()), int()]);
        assert!(numeric_int.is_valid(&Value::from(1)));
        assert!(!numeric_int.is_valid(&Value::from(1.0)));

        let int_or_string = TypeBehavior::Or(vec![int(), string()]);
        assert!(int_or_string.is_valid(&Value::from(1)));
        assert!(int_or_string.is_valid(&Value::from("1")));
        assert!(!int_or_string.is_valid(&Value::from(1.0)));
    }

    #[test]
    fn test_xor_counts_exactly_one() {
        let xor = TypeBehavior::Xor(vec![TypeBehavior::Capability("to_i".into()), string()]);
        assert!(xor.is_valid(&Value::from(123)));
        // A string responds to :to_i and is a String.
        assert!(!xor.is_valid(&Value::from("abc")));
        assert!(!xor.is_valid(&Value::Bool(true)));

        let exclusive = TypeBehavior::Xor(vec![int(), string()]);
        assert!(exclusive.is_valid(&Value::from("abc")));
        assert!(exclusive.is_valid(&Value::from(1)));
        assert!(!exclusive.is_valid(&Value::Nil));
    }

    #[test]
    fn test_not_is_joint_negation() {
        let not_string = TypeBehavior::Not(vec![string()]);
        assert!(not_string.is_valid(&Value::from(123)));
        assert!(!not_string.is_valid(&Value::from("abc")));

        let neither = TypeBehavior::Not(vec![string(), int()]);
        assert!(neither.is_valid(&Value::from(1.5)));
        assert!(!neither.is_valid(&Value::from(1)));
    }

    #[test]
    fn test_nilable() {
        let maybe_int = TypeBehavior::Nilable(Box::new(int()));
        assert!(maybe_int.is_valid(&Value::Nil));
        assert!(maybe_int.is_valid(&Value::from(1)));
        assert!(!maybe_int.is_valid(&Value::from("1")));
    }

    #[test]
    fn test_typed_sequence() {
        let ints = TypeBehavior::TypedSequence(Box::new(int()));
        assert!(ints.is_valid(&Value::array(Vec::<Value>::new())));
        assert!(ints.is_valid(&Value::array([1, 2, 3, 4])));
        assert!(!ints.is_valid(&Value::array([Value::from(1), Value::from("2")])));
        assert!(!ints.is_valid(&Value::from(1)));
    }
}
