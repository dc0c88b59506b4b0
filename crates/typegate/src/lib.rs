//! # typegate
//!
//! Runtime argument and return-value validation driven by declarative
//! signatures. A signature such as `[Integer, {name: String}] => Integer` is
//! validated once when it is defined, then checked against actual call values
//! with precise, structural error messages on mismatch.
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, Error>`. Declaration mistakes
//! surface as [`TypeSignatureError`] when a signature is defined; call-time
//! mismatches as [`ArgumentTypeError`] or [`ReturnTypeError`].

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod behavior;
pub mod checker;
pub mod class;
pub mod config;
pub mod declaration;
mod error;
pub mod registry;
pub mod signature;
pub mod value;

pub use behavior::{
    BehaviorKind, Comparison, NumericKind, Predicate, RangeBound, TypeBehavior,
};
pub use checker::{
    check_arguments, check_arguments_with_keywords, check_call, check_keywords, check_return,
    ordinalize, Keywords,
};
pub use class::{builtins, Class, ClassBuilder, ClassKind, ClassRef};
pub use config::{load_config, Config, FailureLog};
pub use declaration::Decl;
pub use error::{
    ArgumentPosition, ArgumentTypeError, Error, Result, ReturnTypeError, TypeSignatureError,
};
pub use registry::{MethodKey, SignatureMap, Signatures};
pub use signature::{
    canonicalize, canonicalize_behavior, valid, BehaviorInfo, KeywordInfo, MethodSignature,
    SignatureInfo,
};
pub use value::{Object, Value};
