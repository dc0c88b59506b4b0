//! Numeric comparison predicates.
//!
//! `NumericKind::Int.gt(2)` builds a predicate labelled `Int > 2` that
//! accepts integers strictly above two and rejects everything else,
//! including floats and non-numeric values.

use std::cmp::Ordering;

use strum::{Display, EnumString};

use super::Predicate;
use crate::value::Value;

/// Which numeric values a comparison accepts at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum NumericKind {
    /// Integers and floats
    Num,
    Int,
    Flo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Comparison {
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = "==")]
    Eq,
}

impl Comparison {
    const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Ge => matches!(ordering, Ordering::Greater | Ordering::Equal),
            Self::Lt => matches!(ordering, Ordering::Less),
            Self::Le => matches!(ordering, Ordering::Less | Ordering::Equal),
            Self::Eq => matches!(ordering, Ordering::Equal),
        }
    }
}

impl NumericKind {
    const fn admits(self, value: &Value) -> bool {
        match self {
            Self::Num => matches!(value, Value::Int(_) | Value::Float(_)),
            Self::Int => matches!(value, Value::Int(_)),
            Self::Flo => matches!(value, Value::Float(_)),
        }
    }

    /// Predicate accepting values of this kind that compare to `bound` as
    /// `comparison` says. A NaN on either side never compares.
    pub fn compare(self, comparison: Comparison, bound: impl Into<Value>) -> Predicate {
        let bound = bound.into();
        let label = format!("{self} {comparison} {bound}");
        Predicate::new(label, move |value| {
            self.admits(value)
                && value
                    .compare(&bound)
                    .is_some_and(|ordering| comparison.accepts(ordering))
        })
    }

    pub fn gt(self, bound: impl Into<Value>) -> Predicate {
        self.compare(Comparison::Gt, bound)
    }

    pub fn ge(self, bound: impl Into<Value>) -> Predicate {
        self.compare(Comparison::Ge, bound)
    }

    pub fn lt(self, bound: impl Into<Value>) -> Predicate {
        self.compare(Comparison::Lt, bound)
    }

    pub fn le(self, bound: impl Into<Value>) -> Predicate {
        self.compare(Comparison::Le, bound)
    }

    pub fn eq(self, bound: impl Into<Value>) -> Predicate {
        self.compare(Comparison::Eq, bound)
    }
}
