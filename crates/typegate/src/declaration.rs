//! Raw signature declarations.
//!
//! A [`Decl`] is what users write: a tree mirroring the literal notation of
//! the host runtime (`[Integer, {name: String}] => Any`). It is deliberately
//! looser than [`TypeBehavior`](crate::behavior::TypeBehavior): numbers and
//! strings are representable so that a mistaken declaration can be expressed
//! and then rejected by [`canonicalize`](crate::signature::canonicalize).
//!
//! # Example
//!
//! ```
//! use typegate::{builtins, Decl};
//!
//! // [Integer, {name: String}] => Integer
//! let decl = Decl::signature(
//!     vec![
//!         Decl::from(builtins::integer()),
//!         Decl::map([(Decl::sym("name"), Decl::from(builtins::string()))]),
//!     ],
//!     builtins::integer(),
//! );
//! assert_eq!(decl.to_string(), "{[Integer, {name: String}] => Integer}");
//! ```

use std::{
    fmt,
    ops::{Not, Range, RangeFrom, RangeInclusive, RangeTo, RangeToInclusive},
};

use itertools::Itertools;
use regex::Regex;

use crate::{
    behavior::{Predicate, RangeBound},
    class::ClassRef,
    value::{fmt_symbol, is_plain_symbol, Value},
};

#[derive(Debug, Clone)]
pub enum Decl {
    Nil,
    Bool(bool),
    /// Never a legal behavior
    Int(i64),
    /// Never a legal behavior
    Float(f64),
    /// Never a legal behavior
    Str(String),
    Symbol(String),
    Class(ClassRef),
    Pattern(Regex),
    Range(RangeBound),
    Proc(Predicate),
    Any,
    List(Vec<Decl>),
    Map(Vec<(Decl, Decl)>),
    And(Vec<Decl>),
    Or(Vec<Decl>),
    Xor(Vec<Decl>),
    Not(Vec<Decl>),
    Nilable(Box<Decl>),
    ArrayOf(Box<Decl>),
}

impl Decl {
    pub fn sym(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn list<I, D>(items: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a map. Unlike [`Value::hash`], repeated keys are kept so that
    /// canonicalization can reject them.
    pub fn map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Self>,
        V: Into<Self>,
    {
        Self::Map(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// A whole method declaration: `arguments => returns`.
    pub fn signature(arguments: impl Into<Self>, returns: impl Into<Self>) -> Self {
        Self::Map(vec![(arguments.into(), returns.into())])
    }

    /// All of `declarations` must hold.
    pub fn comb<I, D>(declarations: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Self>,
    {
        Self::And(declarations.into_iter().map(Into::into).collect())
    }

    /// At least one of `declarations` must hold.
    pub fn or<I, D>(declarations: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Self>,
    {
        Self::Or(declarations.into_iter().map(Into::into).collect())
    }

    /// None of `declarations` may hold.
    pub fn none_of<I, D>(declarations: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Self>,
    {
        Self::Not(declarations.into_iter().map(Into::into).collect())
    }

    /// An array of any length whose elements all satisfy `element`.
    pub fn array_of(element: impl Into<Self>) -> Self {
        Self::ArrayOf(Box::new(element.into()))
    }

    #[must_use]
    pub fn and<I, D>(self, others: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Self>,
    {
        Self::And(std::iter::once(self).chain(others.into_iter().map(Into::into)).collect())
    }

    #[must_use]
    pub fn xor<I, D>(self, others: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Self>,
    {
        Self::Xor(std::iter::once(self).chain(others.into_iter().map(Into::into)).collect())
    }

    #[must_use]
    pub fn nilable(self) -> Self {
        Self::Nilable(Box::new(self))
    }

    #[must_use]
    pub fn or_nil(self) -> Self {
        self.nilable()
    }

    /// The plain value this declaration denotes when used as a hash key.
    pub(crate) fn as_key(&self) -> Option<Value> {
        match self {
            Self::Nil => Some(Value::Nil),
            Self::Bool(flag) => Some(Value::Bool(*flag)),
            Self::Int(number) => Some(Value::Int(*number)),
            Self::Float(number) => Some(Value::Float(*number)),
            Self::Str(text) => Some(Value::Str(text.clone())),
            Self::Symbol(name) => Some(Value::Symbol(name.clone())),
            _ => None,
        }
    }
}

impl Not for Decl {
    type Output = Self;

    fn not(self) -> Self {
        Self::Not(vec![self])
    }
}

fn fmt_list(f: &mut fmt::Formatter<'_>, name: &str, declarations: &[Decl]) -> fmt::Result {
    write!(f, "{name}({})", declarations.iter().join(", "))
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(number) => write!(f, "{}", Value::Int(*number)),
            Self::Float(number) => write!(f, "{}", Value::Float(*number)),
            Self::Str(text) => write!(f, "{text:?}"),
            Self::Symbol(name) => fmt_symbol(f, name),
            Self::Class(class) => f.write_str(class.name()),
            Self::Pattern(regex) => write!(f, "/{regex}/"),
            Self::Range(range) => write!(f, "{range}"),
            Self::Proc(predicate) => write!(f, "{predicate}"),
            Self::Any => f.write_str("Any"),
            Self::List(items) => write!(f, "[{}]", items.iter().join(", ")),
            Self::Map(entries) => {
                f.write_str("{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    match key {
                        Self::Symbol(name) if is_plain_symbol(name) => write!(f, "{name}: ")?,
                        other => write!(f, "{other} => ")?,
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("}")
            }
            Self::And(items) => fmt_list(f, "and", items),
            Self::Or(items) => fmt_list(f, "or", items),
            Self::Xor(items) => fmt_list(f, "xor", items),
            Self::Not(items) => fmt_list(f, "not", items),
            Self::Nilable(inner) => write!(f, "nilable({inner})"),
            Self::ArrayOf(inner) => write!(f, "Array.of({inner})"),
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<ClassRef> for Decl {
    fn from(class: ClassRef) -> Self {
        Self::Class(class)
    }
}

impl From<bool> for Decl {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i32> for Decl {
    fn from(number: i32) -> Self {
        Self::Int(i64::from(number))
    }
}

impl From<i64> for Decl {
    fn from(number: i64) -> Self {
        Self::Int(number)
    }
}

impl From<f64> for Decl {
    fn from(number: f64) -> Self {
        Self::Float(number)
    }
}

impl From<&str> for Decl {
    fn from(text: &str) -> Self {
        Self::Str(text.to_string())
    }
}

impl From<String> for Decl {
    fn from(text: String) -> Self {
        Self::Str(text)
    }
}

impl From<Regex> for Decl {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

impl From<Predicate> for Decl {
    fn from(predicate: Predicate) -> Self {
        Self::Proc(predicate)
    }
}

impl From<RangeBound> for Decl {
    fn from(range: RangeBound) -> Self {
        Self::Range(range)
    }
}

impl From<Vec<Self>> for Decl {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl<T: Into<Self>> From<Option<T>> for Decl {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}

macro_rules! decl_from_range {
    ($($t:ty),*) => {$(
        impl From<RangeInclusive<$t>> for Decl {
            fn from(range: RangeInclusive<$t>) -> Self {
                Self::Range(range.into())
            }
        }

        impl From<Range<$t>> for Decl {
            fn from(range: Range<$t>) -> Self {
                Self::Range(range.into())
            }
        }

        impl From<RangeFrom<$t>> for Decl {
            fn from(range: RangeFrom<$t>) -> Self {
                Self::Range(range.into())
            }
        }

        impl From<RangeTo<$t>> for Decl {
            fn from(range: RangeTo<$t>) -> Self {
                Self::Range(range.into())
            }
        }

        impl From<RangeToInclusive<$t>> for Decl {
            fn from(range: RangeToInclusive<$t>) -> Self {
                Self::Range(range.into())
            }
        }
    )*};
}

decl_from_range!(i32, i64, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::builtins;

    #[test]
    fn test_display_matches_literal_notation() -> Result<(), regex::Error> {
        let decl = Decl::signature(
            vec![
                Decl::from(builtins::integer()),
                Decl::sym("to_s"),
                Decl::from(Regex::new("^a")?),
                Decl::from(1..=5),
                Decl::map([(Decl::sym("flag"), Decl::Bool(true))]),
            ],
            Decl::Nil,
        );
        assert_eq!(
            decl.to_string(),
            "{[Integer, :to_s, /^a/, 1..5, {flag: true}] => nil}"
        );
        Ok(())
    }

    #[test]
    fn test_string_keys_render_with_arrow() {
        let decl = Decl::map([("name", Decl::from(builtins::string()))]);
        assert_eq!(decl.to_string(), "{\"name\" => String}");
    }

    #[test]
    fn test_combinator_sugar() {
        let int = || Decl::from(builtins::integer());
        let string = || Decl::from(builtins::string());

        assert_eq!(int().and([Decl::sym("to_i")]).to_string(), "and(Integer, :to_i)");
        assert_eq!(int().xor([string()]).to_string(), "xor(Integer, String)");
        assert_eq!((!string()).to_string(), "not(String)");
        assert_eq!(int().or_nil().to_string(), "nilable(Integer)");
        assert_eq!(Decl::or([int(), string()]).to_string(), "or(Integer, String)");
        assert_eq!(Decl::comb([int(), string()]).to_string(), "and(Integer, String)");
        assert_eq!(Decl::none_of([int(), string()]).to_string(), "not(Integer, String)");
        assert_eq!(Decl::array_of(int()).to_string(), "Array.of(Integer)");
    }

    #[test]
    fn test_keys() {
        assert_eq!(Decl::sym("a").as_key(), Some(Value::sym("a")));
        assert_eq!(Decl::from("a").as_key(), Some(Value::from("a")));
        assert_eq!(Decl::from(1).as_key(), Some(Value::from(1)));
        assert!(Decl::Any.as_key().is_none());
        assert!(Decl::from(builtins::integer()).as_key().is_none());
    }

    #[test]
    fn test_option_conversion() {
        assert!(matches!(Decl::from(None::<i64>), Decl::Nil));
        assert!(matches!(Decl::from(Some(builtins::string())), Decl::Class(_)));
    }
}
