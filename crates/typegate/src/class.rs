//! Class and module hierarchy used by class and capability checks.
//!
//! A [`Class`] knows its superclass, the modules it includes and the
//! methods it defines itself. Two queries drive validation:
//!
//! - [`Class::is_kind_of`]: the other class or module is among the ancestors
//! - [`Class::responds_to`]: some ancestor defines the method
//!
//! Ancestor order follows the host runtime: the class itself, its included
//! modules (last included first), then the superclass chain.
//!
//! Classes compare by identity: two separately built classes are distinct
//! even when they share a name. Builtins are shared through one table, so
//! every `builtins::integer()` handle is the same class.

use std::{collections::BTreeSet, fmt, sync::Arc};

use strum::{Display, EnumString};

pub mod builtins;

/// Shared handle to a class definition.
pub type ClassRef = Arc<Class>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ClassKind {
    Class,
    Module,
}

/// A class or module definition.
#[derive(Debug, Clone)]
pub struct Class {
    name: String,
    kind: ClassKind,
    superclass: Option<ClassRef>,
    includes: Vec<ClassRef>,
    methods: BTreeSet<String>,
}

impl Class {
    /// Start defining a class. The superclass defaults to `Object`.
    pub fn define(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name, ClassKind::Class)
    }

    /// Start defining a module. Modules have no superclass.
    pub fn module(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name, ClassKind::Module)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn kind(&self) -> ClassKind {
        self.kind
    }

    pub const fn superclass(&self) -> Option<&ClassRef> {
        self.superclass.as_ref()
    }

    pub fn includes(&self) -> &[ClassRef] {
        &self.includes
    }

    /// Methods defined directly on this class, not inherited ones.
    pub const fn own_methods(&self) -> &BTreeSet<String> {
        &self.methods
    }

    /// Linearized ancestors, starting with `self`, without duplicates.
    pub fn ancestors(&self) -> Vec<&Self> {
        let mut ancestors = vec![self];
        let inherited = self
            .includes
            .iter()
            .rev()
            .flat_map(|module| module.ancestors())
            .chain(
                self.superclass
                    .iter()
                    .flat_map(|superclass| superclass.ancestors()),
            );
        for ancestor in inherited {
            if !ancestors.iter().any(|known| known.same_as(ancestor)) {
                ancestors.push(ancestor);
            }
        }
        ancestors
    }

    /// Whether instances of `self` are instances of `other`.
    pub fn is_kind_of(&self, other: &Self) -> bool {
        self.ancestors()
            .iter()
            .any(|ancestor| ancestor.same_as(other))
    }

    fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }

    /// Whether instances of `self` support the operation `method`.
    pub fn responds_to(&self, method: &str) -> bool {
        self.ancestors()
            .iter()
            .any(|ancestor| ancestor.methods.contains(method))
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Class {}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Fluent builder for [`Class`] definitions.
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    name: String,
    kind: ClassKind,
    superclass: Option<ClassRef>,
    includes: Vec<ClassRef>,
    methods: BTreeSet<String>,
}

impl ClassBuilder {
    fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            superclass: None,
            includes: Vec::new(),
            methods: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn superclass(mut self, superclass: ClassRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    #[must_use]
    pub fn include(mut self, module: ClassRef) -> Self {
        self.includes.push(module);
        self
    }

    #[must_use]
    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.methods.insert(name.into());
        self
    }

    #[must_use]
    pub fn methods<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods.extend(names.into_iter().map(Into::into));
        self
    }

    /// Adds a reader `name` and a writer `name=`.
    #[must_use]
    pub fn attr_accessor(self, name: &str) -> Self {
        self.method(name).method(format!("{name}="))
    }

    pub fn build(self) -> ClassRef {
        let superclass = match self.kind {
            ClassKind::Class => self.superclass.or_else(|| Some(builtins::object())),
            ClassKind::Module => None,
        };
        Arc::new(Class {
            name: self.name,
            kind: self.kind,
            superclass,
            includes: self.includes,
            methods: self.methods,
        })
    }

    /// Build without the implicit `Object` superclass. Used for the root of
    /// the builtin hierarchy.
    pub(crate) fn build_root(self) -> ClassRef {
        Arc::new(Class {
            name: self.name,
            kind: self.kind,
            superclass: self.superclass,
            includes: self.includes,
            methods: self.methods,
        })
    }
}
