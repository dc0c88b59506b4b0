//! Host values that signatures are checked against.
//!
//! [`Value`] mirrors the dynamic values of the host runtime: primitives,
//! arrays, insertion-ordered hashes and instances of user-defined classes.
//! Its `Display` is the runtime's `inspect` form, which is what error
//! messages quote.

use std::{cmp::Ordering, fmt, num::FpCategory};

use itertools::Itertools;

use crate::class::{builtins, Class, ClassRef};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(String),
    Array(Vec<Value>),
    /// Insertion ordered key/value pairs with unique keys
    Hash(Vec<(Value, Value)>),
    Object(Object),
}

impl Value {
    pub fn sym(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    pub fn str(text: impl Into<String>) -> Self {
        Self::Str(text.into())
    }

    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// Build a hash. A repeated key replaces the earlier value in place.
    pub fn hash<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Self>,
        V: Into<Self>,
    {
        let entries = pairs
            .into_iter()
            .fold(Vec::<(Self, Self)>::new(), |mut entries, (key, value)| {
                let key = key.into();
                let value = value.into();
                match entries.iter_mut().find(|(existing, _)| *existing == key) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key, value)),
                }
                entries
            });
        Self::Hash(entries)
    }

    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Only `nil` and `false` are falsy.
    pub const fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&[(Self, Self)]> {
        match self {
            Self::Hash(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up `key` when `self` is a hash.
    pub fn get(&self, key: &Self) -> Option<&Self> {
        self.as_hash()?
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    pub fn class_of(&self) -> ClassRef {
        match self {
            Self::Nil => builtins::nil_class(),
            Self::Bool(true) => builtins::true_class(),
            Self::Bool(false) => builtins::false_class(),
            Self::Int(_) => builtins::integer(),
            Self::Float(_) => builtins::float(),
            Self::Str(_) => builtins::string(),
            Self::Symbol(_) => builtins::symbol(),
            Self::Array(_) => builtins::array(),
            Self::Hash(_) => builtins::hash(),
            Self::Object(object) => object.class.clone(),
        }
    }

    pub fn is_kind_of(&self, class: &Class) -> bool {
        self.class_of().is_kind_of(class)
    }

    pub fn responds_to(&self, method: &str) -> bool {
        self.class_of().responds_to(method)
    }

    /// The `inspect` form, as quoted in error messages.
    pub fn inspect(&self) -> String {
        self.to_string()
    }

    /// The stringified form that patterns are matched against.
    pub fn to_s(&self) -> String {
        match self {
            Self::Nil => String::new(),
            Self::Str(text) => text.clone(),
            Self::Symbol(name) => name.clone(),
            other => other.inspect(),
        }
    }

    /// Ordering used by range containment. Mixed integer/float pairs compare
    /// numerically; anything else across kinds is incomparable.
    #[allow(clippy::cast_precision_loss)]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Str(a), Self::Str(b)) | (Self::Symbol(a), Self::Symbol(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Symbols that can be written bare (`:name`, `name:`) without quoting.
pub(crate) fn is_plain_symbol(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && name
            .trim_end_matches(|c: char| matches!(c, '?' | '!' | '='))
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_')
}

pub(crate) fn fmt_symbol(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if is_plain_symbol(name) {
        write!(f, ":{name}")
    } else {
        write!(f, ":{name:?}")
    }
}

/// Writes a hash key with its separator (`name: ` or `key => `).
pub(crate) fn fmt_hash_key(f: &mut fmt::Formatter<'_>, key: &Value) -> fmt::Result {
    match key {
        Value::Symbol(name) if is_plain_symbol(name) => write!(f, "{name}: "),
        Value::Symbol(name) => write!(f, "{name:?}: "),
        other => write!(f, "{other} => "),
    }
}

/// Fixed notation for magnitudes in `1e-4..1e16`, otherwise `1.0e+20` style
/// with a signed, two-digit exponent.
fn fmt_float(f: &mut fmt::Formatter<'_>, number: f64) -> fmt::Result {
    let magnitude = number.abs();
    if number.classify() == FpCategory::Zero || (1e-4..1e16).contains(&magnitude) {
        return write!(f, "{number:?}");
    }
    let scientific = format!("{number:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let fraction = if mantissa.contains('.') { "" } else { ".0" };
    let sign = if exponent < 0 { '-' } else { '+' };
    write!(f, "{mantissa}{fraction}e{sign}{:02}", exponent.abs())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(number) => write!(f, "{number}"),
            Self::Float(number) if number.is_nan() => f.write_str("NaN"),
            Self::Float(number) if number.is_infinite() => {
                f.write_str(if *number > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::Float(number) => fmt_float(f, *number),
            Self::Str(text) => write!(f, "{text:?}"),
            Self::Symbol(name) => fmt_symbol(f, name),
            Self::Array(items) => write!(f, "[{}]", items.iter().join(", ")),
            Self::Hash(entries) => {
                f.write_str("{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    fmt_hash_key(f, key)?;
                    write!(f, "{value}")?;
                }
                f.write_str("}")
            }
            Self::Object(object) => write!(f, "{object}"),
        }
    }
}

/// An instance of a user-defined class.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    class: ClassRef,
    fields: Vec<(String, Value)>,
}

impl Object {
    pub const fn new(class: ClassRef) -> Self {
        Self {
            class,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub const fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return write!(f, "#<{}>", self.class.name());
        }
        let fields = self
            .fields
            .iter()
            .map(|(name, value)| format!("@{name}={value}"))
            .join(", ");
        write!(f, "#<{} {fields}>", self.class.name())
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Self::Int(i64::from(number))
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Self::Int(number)
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Float(number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Str(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Str(text)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::Array(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Self::Object(object)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}
