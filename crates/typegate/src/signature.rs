//! Signature Validator.
//!
//! [`canonicalize`] turns a raw [`Decl`] into an immutable [`MethodSignature`]
//! or fails with a [`TypeSignatureError`]. Every leaf is checked here, once,
//! at definition time; call-time evaluation never meets an illegal behavior.
//!
//! Shape rules:
//!
//! - the declaration is a map with exactly one `arguments => returns` entry
//! - `arguments` is a list (a trailing map becomes the keyword map) or a map
//!   (keywords only)
//! - keyword keys are symbols, without duplicates
//! - a bare `nil` is legal in return position and nested, never as a
//!   top-level positional or keyword behavior

use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    behavior::{BehaviorKind, TypeBehavior},
    declaration::Decl,
    error::{Result, TypeSignatureError},
    value::{fmt_hash_key, Value},
};

/// Canonical form of one method's declaration.
#[derive(Debug, Clone)]
pub struct MethodSignature {
    positional: Vec<TypeBehavior>,
    keywords: Vec<(String, TypeBehavior)>,
    returns: TypeBehavior,
}

impl MethodSignature {
    pub fn positional(&self) -> &[TypeBehavior] {
        &self.positional
    }

    /// Keyword behaviors in declaration order.
    pub fn keywords(&self) -> &[(String, TypeBehavior)] {
        &self.keywords
    }

    pub const fn returns(&self) -> &TypeBehavior {
        &self.returns
    }

    pub fn keyword(&self, name: &str) -> Option<&TypeBehavior> {
        self.keywords
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, behavior)| behavior)
    }

    pub fn info(&self) -> SignatureInfo {
        SignatureInfo {
            signature: self.to_string(),
            positional: self.positional.iter().map(BehaviorInfo::from).collect(),
            keywords: self
                .keywords
                .iter()
                .map(|(name, behavior)| KeywordInfo {
                    name: name.clone(),
                    behavior: BehaviorInfo::from(behavior),
                })
                .collect(),
            returns: BehaviorInfo::from(&self.returns),
        }
    }

    fn fmt_keywords(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, (name, behavior)) in self.keywords.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            fmt_hash_key(f, &Value::sym(name.as_str()))?;
            write!(f, "{behavior}")?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positional.is_empty() && !self.keywords.is_empty() {
            self.fmt_keywords(f)?;
        } else {
            write!(f, "[{}", self.positional.iter().join(", "))?;
            // A trailing keyed behavior would read back as the keyword map.
            let keyed_last = matches!(self.positional.last(), Some(TypeBehavior::Keyed(_)));
            if !self.keywords.is_empty() || keyed_last {
                if !self.positional.is_empty() {
                    f.write_str(", ")?;
                }
                self.fmt_keywords(f)?;
            }
            f.write_str("]")?;
        }
        write!(f, " => {}", self.returns)
    }
}

// ============================================================================
// INTROSPECTION
// ============================================================================

/// Serializable description of a signature, for tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureInfo {
    /// The whole signature in declaration notation
    pub signature: String,
    pub positional: Vec<BehaviorInfo>,
    pub keywords: Vec<KeywordInfo>,
    pub returns: BehaviorInfo,
}

impl SignatureInfo {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BehaviorInfo {
    pub kind: BehaviorKind,
    pub behavior: String,
}

impl From<&TypeBehavior> for BehaviorInfo {
    fn from(behavior: &TypeBehavior) -> Self {
        Self {
            kind: behavior.kind(),
            behavior: behavior.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordInfo {
    pub name: String,
    #[serde(flatten)]
    pub behavior: BehaviorInfo,
}

// ============================================================================
// CANONICALIZATION
// ============================================================================

/// Validate a whole method declaration and produce its canonical form.
///
/// # Errors
///
/// Returns [`TypeSignatureError`] when the declaration has the wrong shape,
/// a keyword key is not a symbol, or any leaf is not a legal behavior.
pub fn canonicalize(declaration: &Decl) -> std::result::Result<MethodSignature, TypeSignatureError> {
    let Decl::Map(entries) = declaration else {
        return Err(TypeSignatureError::new("type signature is not hash"));
    };
    let (arguments, returns) = match entries.as_slice() {
        [] => return Err(TypeSignatureError::new("type signature is empty hash")),
        [(arguments, returns)] => (arguments, returns),
        _ => return Err(TypeSignatureError::new("type signature has multiple entries")),
    };

    let (positional, keywords): (&[Decl], &[(Decl, Decl)]) = match arguments {
        Decl::List(items) => match items.split_last() {
            Some((Decl::Map(keywords), rest)) => (rest, keywords.as_slice()),
            _ => (items.as_slice(), &[][..]),
        },
        Decl::Map(keywords) => (&[][..], keywords.as_slice()),
        _ => {
            return Err(TypeSignatureError::new(
                "arguments type signature is neither array nor hash",
            ))
        }
    };

    Ok(MethodSignature {
        positional: positional
            .iter()
            .map(argument_behavior)
            .collect::<std::result::Result<_, _>>()?,
        keywords: keyword_behaviors(keywords)?,
        returns: canonicalize_behavior(returns)?,
    })
}

/// Canonicalize a single behavior, wherever it may appear.
///
/// # Errors
///
/// Returns [`TypeSignatureError`] for leaves that are not behaviors (numbers,
/// strings, empty maps) and for maps with non-value or duplicate keys.
pub fn canonicalize_behavior(declaration: &Decl) -> std::result::Result<TypeBehavior, TypeSignatureError> {
    Ok(match declaration {
        Decl::Nil => TypeBehavior::Nil,
        Decl::Bool(true) => TypeBehavior::True,
        Decl::Bool(false) => TypeBehavior::False,
        Decl::Symbol(name) => TypeBehavior::Capability(name.clone()),
        Decl::Class(class) => TypeBehavior::Class(class.clone()),
        Decl::Pattern(regex) => TypeBehavior::Pattern(regex.clone()),
        Decl::Range(range) => TypeBehavior::Range(range.clone()),
        Decl::Proc(predicate) => TypeBehavior::Predicate(predicate.clone()),
        Decl::Any => TypeBehavior::Any,
        Decl::List(items) => TypeBehavior::Sequence(canonicalize_all(items)?),
        Decl::Map(entries) if entries.is_empty() => {
            return Err(TypeSignatureError::unknown_behavior(declaration));
        }
        Decl::Map(entries) => TypeBehavior::Keyed(keyed_behaviors(entries)?),
        Decl::And(items) => TypeBehavior::And(canonicalize_all(items)?),
        Decl::Or(items) => TypeBehavior::Or(canonicalize_all(items)?),
        Decl::Xor(items) => TypeBehavior::Xor(canonicalize_all(items)?),
        Decl::Not(items) => TypeBehavior::Not(canonicalize_all(items)?),
        Decl::Nilable(inner) => TypeBehavior::Nilable(Box::new(canonicalize_behavior(inner)?)),
        Decl::ArrayOf(inner) => TypeBehavior::TypedSequence(Box::new(canonicalize_behavior(inner)?)),
        Decl::Int(_) | Decl::Float(_) | Decl::Str(_) => {
            return Err(TypeSignatureError::unknown_behavior(declaration));
        }
    })
}

impl TryFrom<&Decl> for TypeBehavior {
    type Error = TypeSignatureError;

    fn try_from(declaration: &Decl) -> std::result::Result<Self, Self::Error> {
        canonicalize_behavior(declaration)
    }
}

/// Check `value` against a single behavior declaration.
///
/// # Errors
///
/// Returns [`Error::TypeSignature`](crate::Error::TypeSignature) if the
/// declaration is not a legal behavior.
pub fn valid(declaration: &Decl, value: &Value) -> Result<bool> {
    Ok(canonicalize_behavior(declaration)?.is_valid(value))
}

fn canonicalize_all(items: &[Decl]) -> std::result::Result<Vec<TypeBehavior>, TypeSignatureError> {
    items.iter().map(canonicalize_behavior).collect()
}

fn argument_behavior(declaration: &Decl) -> std::result::Result<TypeBehavior, TypeSignatureError> {
    if matches!(declaration, Decl::Nil) {
        return Err(TypeSignatureError::new(
            "nil is only allowed as return type behavior",
        ));
    }
    canonicalize_behavior(declaration)
}

fn keyword_behaviors(
    entries: &[(Decl, Decl)],
) -> std::result::Result<Vec<(String, TypeBehavior)>, TypeSignatureError> {
    let names = entries
        .iter()
        .map(|(key, _)| match key {
            Decl::Symbol(name) => Ok(name.clone()),
            _ => Err(TypeSignatureError::new(
                "keyword arguments contain non-symbol key",
            )),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if let Some(duplicate) = names.iter().duplicates().next() {
        return Err(TypeSignatureError::new(format!(
            "keyword arguments contain duplicate key :{duplicate}"
        )));
    }

    names
        .into_iter()
        .zip(entries)
        .map(|(name, (_, declaration))| Ok((name, argument_behavior(declaration)?)))
        .collect()
}

fn keyed_behaviors(
    entries: &[(Decl, Decl)],
) -> std::result::Result<Vec<(Value, TypeBehavior)>, TypeSignatureError> {
    let mut keyed: Vec<(Value, TypeBehavior)> = Vec::with_capacity(entries.len());
    for (key, declaration) in entries {
        let key = key.as_key().ok_or_else(|| {
            TypeSignatureError::new(format!("hash key {key} is not a plain value"))
        })?;
        if keyed.iter().any(|(existing, _)| *existing == key) {
            return Err(TypeSignatureError::new(format!(
                "hash contains duplicate key {key}"
            )));
        }
        keyed.push((key, canonicalize_behavior(declaration)?));
    }
    Ok(keyed)
}
