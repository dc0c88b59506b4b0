//! Canonical type behaviors
//!
//! A [`TypeBehavior`] describes what is acceptable for one argument, keyword
//! or return position. Behaviors nest: sequences, keyed structures and the
//! boolean combinators own their children, so a signature is a plain tree.
//!
//! ## Architecture
//!
//! - **mod.rs**: the behavior enum, predicates and ranges
//! - **evaluate.rs**: [`TypeBehavior::is_valid`], the recursive matcher
//! - **message.rs**: [`TypeBehavior::explain`], the structural explanation that
//!   walks the same tree as the matcher
//! - **numeric.rs**: ready-made numeric comparison predicates (`Int > 2`)
//!
//! Behaviors are only produced by canonicalizing a
//! [`Decl`](crate::declaration::Decl), so every variant here is legal.

use std::{
    fmt,
    ops::{Range, RangeFrom, RangeInclusive, RangeTo, RangeToInclusive},
    sync::Arc,
};

use itertools::Itertools;
use regex::Regex;
use serde::Serialize;
use strum::{Display, EnumString};

use crate::{
    class::ClassRef,
    value::{fmt_hash_key, fmt_symbol, Value},
};

mod evaluate;
mod message;
pub mod numeric;

pub use numeric::{Comparison, NumericKind};

#[derive(Debug, Clone)]
pub enum TypeBehavior {
    /// Value is an instance of the class or includes the module
    Class(ClassRef),
    /// Value supports the named operation
    Capability(String),
    /// Stringified value matches the regex
    Pattern(Regex),
    Range(RangeBound),
    /// Value is truthy
    True,
    /// Value is falsy
    False,
    /// Value is nil
    Nil,
    Predicate(Predicate),
    /// Fixed-length array, element `i` checked against behavior `i`
    Sequence(Vec<TypeBehavior>),
    /// Hash with exactly these keys, each value checked against its behavior
    Keyed(Vec<(Value, TypeBehavior)>),
    Any,
    And(Vec<TypeBehavior>),
    Or(Vec<TypeBehavior>),
    /// Exactly one nested behavior holds
    Xor(Vec<TypeBehavior>),
    /// None of the nested behaviors holds
    Not(Vec<TypeBehavior>),
    Nilable(Box<TypeBehavior>),
    /// Array of any length whose elements all satisfy the behavior
    TypedSequence(Box<TypeBehavior>),
}

/// Variant tag of a [`TypeBehavior`], for introspection and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    Class,
    Capability,
    Pattern,
    Range,
    True,
    False,
    Nil,
    Predicate,
    Sequence,
    Keyed,
    Any,
    And,
    Or,
    Xor,
    Not,
    Nilable,
    TypedSequence,
}

impl TypeBehavior {
    pub const fn kind(&self) -> BehaviorKind {
        match self {
            Self::Class(_) => BehaviorKind::Class,
            Self::Capability(_) => BehaviorKind::Capability,
            Self::Pattern(_) => BehaviorKind::Pattern,
            Self::Range(_) => BehaviorKind::Range,
            Self::True => BehaviorKind::True,
            Self::False => BehaviorKind::False,
            Self::Nil => BehaviorKind::Nil,
            Self::Predicate(_) => BehaviorKind::Predicate,
            Self::Sequence(_) => BehaviorKind::Sequence,
            Self::Keyed(_) => BehaviorKind::Keyed,
            Self::Any => BehaviorKind::Any,
            Self::And(_) => BehaviorKind::And,
            Self::Or(_) => BehaviorKind::Or,
            Self::Xor(_) => BehaviorKind::Xor,
            Self::Not(_) => BehaviorKind::Not,
            Self::Nilable(_) => BehaviorKind::Nilable,
            Self::TypedSequence(_) => BehaviorKind::TypedSequence,
        }
    }

    /// Sequences and keyed structures explain themselves over several
    /// lines, so enclosing explanations wrap them in braces.
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Sequence(_) | Self::Keyed(_) | Self::TypedSequence(_)
        )
    }
}

fn fmt_list(f: &mut fmt::Formatter<'_>, name: &str, behaviors: &[TypeBehavior]) -> fmt::Result {
    write!(f, "{name}({})", behaviors.iter().join(", "))
}

impl fmt::Display for TypeBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(class) => f.write_str(class.name()),
            Self::Capability(method) => fmt_symbol(f, method),
            Self::Pattern(regex) => write!(f, "/{regex}/"),
            Self::Range(range) => write!(f, "{range}"),
            Self::True => f.write_str("true"),
            Self::False => f.write_str("false"),
            Self::Nil => f.write_str("nil"),
            Self::Predicate(predicate) => write!(f, "{predicate}"),
            Self::Sequence(elements) => write!(f, "[{}]", elements.iter().join(", ")),
            Self::Keyed(mapping) => {
                f.write_str("{")?;
                for (index, (key, behavior)) in mapping.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    fmt_hash_key(f, key)?;
                    write!(f, "{behavior}")?;
                }
                f.write_str("}")
            }
            Self::Any => f.write_str("Any"),
            Self::And(behaviors) => fmt_list(f, "and", behaviors),
            Self::Or(behaviors) => fmt_list(f, "or", behaviors),
            Self::Xor(behaviors) => fmt_list(f, "xor", behaviors),
            Self::Not(behaviors) => fmt_list(f, "not", behaviors),
            Self::Nilable(inner) => write!(f, "nilable({inner})"),
            Self::TypedSequence(element) => write!(f, "Array.of({element})"),
        }
    }
}

// ============================================================================
// PREDICATES
// ============================================================================

/// A user-supplied one-argument check, labelled for messages.
#[derive(Clone)]
pub struct Predicate {
    label: String,
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Predicate {
    pub fn new<F>(label: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            check: Arc::new(check),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn test(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proc({})", self.label)
    }
}

// ============================================================================
// RANGES
// ============================================================================

/// An ordered range of values. Either end may be open.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBound {
    start: Option<Value>,
    end: Option<Value>,
    exclusive: bool,
}

impl RangeBound {
    pub const fn new(start: Option<Value>, end: Option<Value>, exclusive: bool) -> Self {
        Self {
            start,
            end,
            exclusive,
        }
    }

    pub const fn start(&self) -> Option<&Value> {
        self.start.as_ref()
    }

    pub const fn end(&self) -> Option<&Value> {
        self.end.as_ref()
    }

    pub const fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Cover semantics: `start <= value` and `value <= end` (or `<` when
    /// exclusive). A value incomparable with a present bound is outside.
    pub fn contains(&self, value: &Value) -> bool {
        use std::cmp::Ordering::{Equal, Less};

        let above_start = self
            .start
            .as_ref()
            .map_or(true, |start| matches!(start.compare(value), Some(Less | Equal)));
        let below_end = self.end.as_ref().map_or(true, |end| match value.compare(end) {
            Some(Less) => true,
            Some(Equal) => !self.exclusive,
            _ => false,
        });
        above_start && below_end
    }
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = &self.start {
            write!(f, "{start}")?;
        }
        f.write_str(if self.exclusive { "..." } else { ".." })?;
        if let Some(end) = &self.end {
            write!(f, "{end}")?;
        }
        Ok(())
    }
}

macro_rules! range_bound_from {
    ($($t:ty),*) => {$(
        impl From<RangeInclusive<$t>> for RangeBound {
            fn from(range: RangeInclusive<$t>) -> Self {
                let (start, end) = range.into_inner();
                Self::new(Some(start.into()), Some(end.into()), false)
            }
        }

        impl From<Range<$t>> for RangeBound {
            fn from(range: Range<$t>) -> Self {
                Self::new(Some(range.start.into()), Some(range.end.into()), true)
            }
        }

        impl From<RangeFrom<$t>> for RangeBound {
            fn from(range: RangeFrom<$t>) -> Self {
                Self::new(Some(range.start.into()), None, false)
            }
        }

        impl From<RangeTo<$t>> for RangeBound {
            fn from(range: RangeTo<$t>) -> Self {
                Self::new(None, Some(range.end.into()), true)
            }
        }

        impl From<RangeToInclusive<$t>> for RangeBound {
            fn from(range: RangeToInclusive<$t>) -> Self {
                Self::new(None, Some(range.end.into()), false)
            }
        }
    )*};
}

range_bound_from!(i32, i64, f64);

impl From<RangeInclusive<&str>> for RangeBound {
    fn from(range: RangeInclusive<&str>) -> Self {
        let (start, end) = range.into_inner();
        Self::new(Some(start.into()), Some(end.into()), false)
    }
}
