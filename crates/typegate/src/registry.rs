//! Signature registry
//!
//! [`Signatures`] maps `(owner, method)` to an immutable [`MethodSignature`].
//! Writers replace an entry wholesale under the write lock; readers clone an
//! `Arc` out from under a read lock, so a check never holds the lock while it
//! evaluates. [`Signatures::snapshot`] hands out a persistent copy of the map.
//!
//! # Example
//!
//! ```
//! use typegate::{builtins, Decl, Signatures, Value};
//!
//! let signatures = Signatures::new();
//! signatures.define(
//!     "Calculator",
//!     "double",
//!     &Decl::signature(vec![Decl::from(builtins::integer())], builtins::integer()),
//! )?;
//!
//! let doubled = signatures.call("Calculator", "double", &[Value::from(21)], &[], |args, _| {
//!     match args {
//!         [Value::Int(n)] => Value::Int(n * 2),
//!         _ => Value::Nil,
//!     }
//! })?;
//! assert_eq!(doubled, Value::from(42));
//!
//! let err = signatures.check_arguments("Calculator", "double", &[Value::from("21")], &[]);
//! assert!(err.is_err());
//! # Ok::<(), typegate::Error>(())
//! ```

use std::{
    fmt,
    sync::{Arc, LazyLock, RwLock},
};

use tracing::{debug, warn};

use crate::{
    checker::{self, Keywords},
    config::{load_config, Config, FailureLog},
    declaration::Decl,
    signature::{canonicalize, MethodSignature, SignatureInfo},
    value::Value,
    Error, Result,
};

/// Registry key: owner name plus method name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodKey {
    owner: String,
    method: String,
}

impl MethodKey {
    /// # Errors
    ///
    /// Returns `InvalidArgument` if either name is empty.
    pub fn new(owner: impl Into<String>, method: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let method = method.into();
        if owner.trim().is_empty() {
            return Err(Error::InvalidArgument("owner name cannot be empty".to_string()));
        }
        if method.trim().is_empty() {
            return Err(Error::InvalidArgument("method name cannot be empty".to_string()));
        }
        Ok(Self { owner, method })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.owner, self.method)
    }
}

/// Persistent map of every registered signature.
pub type SignatureMap = im::HashMap<MethodKey, Arc<MethodSignature>>;

static GLOBAL: LazyLock<Signatures> = LazyLock::new(|| {
    let config = load_config(None).unwrap_or_else(|err| {
        warn!(error = %err, "invalid typegate configuration, using defaults");
        Config::default()
    });
    Signatures::with_config(config)
});

/// The signature registry service.
#[derive(Debug, Default)]
pub struct Signatures {
    entries: RwLock<SignatureMap>,
    config: Config,
}

impl Signatures {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            entries: RwLock::default(),
            config,
        }
    }

    /// Process-wide registry, configured from the environment on first use.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    // ═══════════════════════════════════════════════════════════════════════
    // DEFINITION
    // ═══════════════════════════════════════════════════════════════════════

    /// Validate `declaration` and register it, replacing any earlier entry.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for empty names
    /// - `TypeSignature` if the declaration is malformed; nothing is registered
    /// - `Registry` if the lock is poisoned
    pub fn define(
        &self,
        owner: &str,
        method: &str,
        declaration: &Decl,
    ) -> Result<Arc<MethodSignature>> {
        let key = MethodKey::new(owner, method)?;
        let signature = Arc::new(canonicalize(declaration)?);
        self.insert(key, Arc::clone(&signature))?;
        Ok(signature)
    }

    /// Register a typed reader `name` (`[] => behavior`) and writer `name=`
    /// (`[behavior] => Any`). Both declarations are validated before either
    /// is registered.
    ///
    /// # Errors
    ///
    /// Same as [`Signatures::define`].
    pub fn define_accessor(&self, owner: &str, name: &str, behavior: &Decl) -> Result<()> {
        let getter_key = MethodKey::new(owner, name)?;
        let setter_key = MethodKey::new(owner, format!("{name}="))?;
        let getter = canonicalize(&Decl::signature(Vec::<Decl>::new(), behavior.clone()))?;
        let setter = canonicalize(&Decl::signature(vec![behavior.clone()], Decl::Any))?;

        debug!(owner, name, behavior = %behavior, "defining typed accessor");
        self.insert(getter_key, Arc::new(getter))?;
        self.insert(setter_key, Arc::new(setter))
    }

    fn insert(&self, key: MethodKey, signature: Arc<MethodSignature>) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let rendered = signature.to_string();
        let replaced = entries.insert(key.clone(), signature).is_some();
        drop(entries);

        debug!(method = %key, signature = %rendered, replaced, "registered signature");
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // INTROSPECTION
    // ═══════════════════════════════════════════════════════════════════════

    /// # Errors
    ///
    /// `InvalidArgument` for empty names, `Registry` if the lock is poisoned.
    pub fn get(&self, owner: &str, method: &str) -> Result<Option<Arc<MethodSignature>>> {
        let key = MethodKey::new(owner, method)?;
        self.lookup(&key)
    }

    fn lookup(&self, key: &MethodKey) -> Result<Option<Arc<MethodSignature>>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    /// # Errors
    ///
    /// Same as [`Signatures::get`].
    pub fn is_typed(&self, owner: &str, method: &str) -> Result<bool> {
        Ok(self.get(owner, method)?.is_some())
    }

    /// Describe a method's contract for tooling.
    ///
    /// # Errors
    ///
    /// Same as [`Signatures::get`].
    pub fn describe(&self, owner: &str, method: &str) -> Result<Option<SignatureInfo>> {
        Ok(self.get(owner, method)?.map(|signature| signature.info()))
    }

    /// A point-in-time copy of every registration. Later definitions do not
    /// show up in it.
    ///
    /// # Errors
    ///
    /// Returns `Registry` if the lock is poisoned.
    pub fn snapshot(&self) -> Result<SignatureMap> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.clone())
    }

    /// # Errors
    ///
    /// Returns `Registry` if the lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.len())
    }

    /// # Errors
    ///
    /// Returns `Registry` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CALL-TIME CHECKS
    // ═══════════════════════════════════════════════════════════════════════

    /// Check a call's arguments. Unregistered methods pass.
    ///
    /// # Errors
    ///
    /// `ArgumentType` for the first failing argument, plus the lookup errors
    /// of [`Signatures::get`].
    pub fn check_arguments(
        &self,
        owner: &str,
        method: &str,
        args: &[Value],
        kwargs: &Keywords,
    ) -> Result<()> {
        match self.get(owner, method)? {
            Some(signature) => Ok(checker::check_call(&signature, args, kwargs)?),
            None => Ok(()),
        }
    }

    /// Check a call's result. Unregistered methods pass.
    ///
    /// # Errors
    ///
    /// `ReturnType` if the result fails, plus the lookup errors of
    /// [`Signatures::get`].
    pub fn check_return(&self, owner: &str, method: &str, result: &Value) -> Result<()> {
        match self.get(owner, method)? {
            Some(signature) => Ok(checker::check_return(signature.returns(), result)?),
            None => Ok(()),
        }
    }

    /// Guard a call: check arguments, run `body`, check its result. Which
    /// checks run is governed by the configuration.
    ///
    /// # Errors
    ///
    /// `ArgumentType` before `body` runs, `ReturnType` after, plus the lookup
    /// errors of [`Signatures::get`].
    pub fn call<F>(
        &self,
        owner: &str,
        method: &str,
        args: &[Value],
        kwargs: &Keywords,
        body: F,
    ) -> Result<Value>
    where
        F: FnOnce(&[Value], &Keywords) -> Value,
    {
        let key = MethodKey::new(owner, method)?;
        let signature = if self.config.enabled {
            self.lookup(&key)?
        } else {
            None
        };

        let Some(signature) = signature else {
            return Ok(body(args, kwargs));
        };

        if self.config.guards_arguments() {
            checker::check_call(&signature, args, kwargs)
                .map_err(|err| self.rejected(&key, err.into()))?;
        }
        let result = body(args, kwargs);
        if self.config.guards_return() {
            checker::check_return(signature.returns(), &result)
                .map_err(|err| self.rejected(&key, err.into()))?;
        }
        Ok(result)
    }

    fn rejected(&self, key: &MethodKey, err: Error) -> Error {
        match self.config.failure_log {
            FailureLog::Off => {}
            FailureLog::Debug => debug!(method = %key, error = %err, "rejected call"),
            FailureLog::Warn => warn!(method = %key, error = %err, "rejected call"),
        }
        err
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> Error {
    Error::Registry(format!("signature registry lock poisoned: {err}"))
}
