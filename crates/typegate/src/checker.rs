//! Argument and Return Checkers.
//!
//! Positional checking is permissive at the tail: only the first
//! `min(expected, actual)` positions are checked. Keyword checking only looks
//! at names that are both declared and passed. Arity and required keywords
//! are the caller's concern. Checking stops at the first failure.

use crate::{
    behavior::TypeBehavior,
    error::{ArgumentPosition, ArgumentTypeError, ReturnTypeError},
    signature::MethodSignature,
    value::Value,
};

/// Keyword arguments of a call, in the order they were passed.
pub type Keywords = [(String, Value)];

/// English ordinal for a 1-based position: `1st`, `2nd`, `11th`, `23rd`.
pub fn ordinalize(number: usize) -> String {
    let suffix = match (number % 10, number % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{number}{suffix}")
}

/// Check positional arguments against their declared behaviors.
///
/// # Errors
///
/// Returns an [`ArgumentTypeError`] for the first failing position.
pub fn check_arguments(expected: &[TypeBehavior], args: &[Value]) -> Result<(), ArgumentTypeError> {
    expected
        .iter()
        .zip(args)
        .enumerate()
        .find(|(_, (behavior, arg))| !behavior.is_valid(arg))
        .map_or(Ok(()), |(index, (behavior, arg))| {
            Err(ArgumentTypeError::new(
                ArgumentPosition::Positional(index + 1),
                behavior.explain(arg),
            ))
        })
}

/// Check keyword arguments, in declaration order. Undeclared keywords are
/// ignored; declared but absent keywords are not checked.
///
/// # Errors
///
/// Returns an [`ArgumentTypeError`] naming the first failing keyword.
pub fn check_keywords(
    expected: &[(String, TypeBehavior)],
    kwargs: &Keywords,
) -> Result<(), ArgumentTypeError> {
    for (name, behavior) in expected {
        let passed = kwargs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value);
        if let Some(value) = passed.filter(|value| !behavior.is_valid(value)) {
            return Err(ArgumentTypeError::new(
                ArgumentPosition::Keyword(name.clone()),
                behavior.explain(value),
            ));
        }
    }
    Ok(())
}

/// Positional arguments first, then keywords.
///
/// # Errors
///
/// Returns the first [`ArgumentTypeError`] found.
pub fn check_arguments_with_keywords(
    expected_args: &[TypeBehavior],
    args: &[Value],
    expected_kwargs: &[(String, TypeBehavior)],
    kwargs: &Keywords,
) -> Result<(), ArgumentTypeError> {
    check_arguments(expected_args, args)?;
    check_keywords(expected_kwargs, kwargs)
}

/// Check a whole call's arguments against a signature.
///
/// # Errors
///
/// Returns the first [`ArgumentTypeError`] found.
pub fn check_call(
    signature: &MethodSignature,
    args: &[Value],
    kwargs: &Keywords,
) -> Result<(), ArgumentTypeError> {
    check_arguments_with_keywords(signature.positional(), args, signature.keywords(), kwargs)
}

/// Check a call result. A declared `nil` return accepts only nil.
///
/// # Errors
///
/// Returns a [`ReturnTypeError`] when `result` fails `expected`.
pub fn check_return(expected: &TypeBehavior, result: &Value) -> Result<(), ReturnTypeError> {
    if expected.is_valid(result) {
        Ok(())
    } else {
        Err(ReturnTypeError::new(expected.explain(result)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::builtins;

    fn int() -> TypeBehavior {
        TypeBehavior::Class(builtins::integer())
    }

    fn string() -> TypeBehavior {
        TypeBehavior::Class(builtins::string())
    }

    fn kwargs(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_ordinalize() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (22, "22nd"),
            (101, "101st"),
            (111, "111th"),
            (112, "112th"),
        ];
        for (number, expected) in cases {
            assert_eq!(ordinalize(number), expected);
        }
    }

    #[test]
    fn test_arguments_pass() {
        let expected = [int(), string()];
        let args = [Value::from(1), Value::from("a")];
        assert!(check_arguments(&expected, &args).is_ok());
    }

    #[test]
    fn test_permissive_tail() {
        let expected = [int()];
        let args = [Value::from(1), Value::from("extra"), Value::Nil];
        assert!(check_arguments(&expected, &args).is_ok());
    }

    #[test]
    fn test_missing_positions_are_skipped() {
        let expected = [int(), string(), string()];
        assert!(check_arguments(&expected, &[Value::from(1)]).is_ok());
        assert!(check_arguments(&expected, &[]).is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        let expected = [int(), int()];
        let args = [Value::from("a"), Value::from("b")];
        let err = check_arguments(&expected, &args).err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("for 1st argument:\nExpected \"a\" to be a Integer")
        );
    }

    #[test]
    fn test_positional_position_is_one_based() {
        let expected = [int(), int(), int()];
        let args = [Value::from(1), Value::from(2), Value::from(3.0)];
        let err = check_arguments(&expected, &args).err();
        assert_eq!(
            err.as_ref().map(ArgumentTypeError::position),
            Some(&ArgumentPosition::Positional(3))
        );
    }

    #[test]
    fn test_keywords() {
        let expected = vec![("a".to_string(), int()), ("b".to_string(), string())];

        let ok = kwargs(&[("a", Value::from(1)), ("unknown", Value::Nil)]);
        assert!(check_keywords(&expected, &ok).is_ok());

        let bad = kwargs(&[("b", Value::from(2)), ("a", Value::from("x"))]);
        let err = check_keywords(&expected, &bad).err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("for 'a' argument:\nExpected \"x\" to be a Integer")
        );
    }

    #[test]
    fn test_positional_checked_before_keywords() {
        let expected_kwargs = vec![("a".to_string(), int())];
        let err = check_arguments_with_keywords(
            &[string()],
            &[Value::from(1)],
            &expected_kwargs,
            &kwargs(&[("a", Value::from("x"))]),
        )
        .err();
        assert_eq!(
            err.as_ref().map(ArgumentTypeError::position),
            Some(&ArgumentPosition::Positional(1))
        );
    }

    #[test]
    fn test_return() {
        assert!(check_return(&int(), &Value::from(1)).is_ok());
        assert!(check_return(&TypeBehavior::Nil, &Value::Nil).is_ok());

        let err = check_return(&TypeBehavior::Nil, &Value::from(0)).err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("for return:\nExpected 0 to be nil")
        );
        assert!(check_return(&TypeBehavior::Any, &Value::Nil).is_ok());
    }
}
