use crate::capability::RawInstance;
use crate::scanner::{Candidate, Factory};
use decl_domain::descriptor::TypeDescriptor;
use fxhash::FxHashMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

type Constructor = Box<dyn Fn(&str, &Candidate<'_>) -> Option<RawInstance> + Send + Sync>;

/// Constructors for object entries, looked up by entry name first and by declared type second.
///
/// A named constructor always wins over a default one, so a single entry can be specialised
/// while every other field of the same type keeps the default.
#[derive(Default)]
pub struct FactoryRegistry {
    named: FxHashMap<String, Constructor>,
    defaults: FxHashMap<TypeId, (TypeDescriptor, Constructor)>,
}

impl FactoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the entry `name` with `ctor`, whatever type its field declares.
    #[must_use]
    pub fn named<T, C>(mut self, name: impl Into<String>, ctor: C) -> Self
    where
        T: Any + Send + Sync,
        C: Fn() -> T + Send + Sync + 'static,
    {
        self.named.insert(name.into(), Box::new(move |_, _| Some(Arc::new(ctor()) as RawInstance)));
        self
    }

    /// Builds every field declaring `T` that has no named constructor.
    #[must_use]
    pub fn default_for<T, C>(mut self, ctor: C) -> Self
    where
        T: Any + Send + Sync,
        C: Fn(&str) -> T + Send + Sync + 'static,
    {
        self.defaults.insert(
            TypeId::of::<T>(),
            (
                TypeDescriptor::of::<T>(),
                Box::new(move |name, _| Some(Arc::new(ctor(name)) as RawInstance)),
            ),
        );
        self
    }

    /// Registers a raw constructor that may decline by returning `None`.
    #[must_use]
    pub fn with<C>(mut self, name: impl Into<String>, ctor: C) -> Self
    where
        C: Fn(&str, &Candidate<'_>) -> Option<RawInstance> + Send + Sync + 'static,
    {
        self.named.insert(name.into(), Box::new(ctor));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.named.len() + self.defaults.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.defaults.is_empty()
    }
}

impl Factory<RawInstance> for FactoryRegistry {
    fn construct(&self, name: &str, candidate: &Candidate<'_>) -> Option<RawInstance> {
        if let Some(ctor) = self.named.get(name) {
            trace!(entry = name, "Using named constructor");
            return ctor(name, candidate);
        }

        let (_, ctor) = self.defaults.get(&candidate.declared.id())?;
        trace!(entry = name, declared = %candidate.declared, "Using default constructor");
        ctor(name, candidate)
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut named: Vec<_> = self.named.keys().map(String::as_str).collect();
        named.sort_unstable();
        let mut defaults: Vec<_> = self.defaults.values().map(|(declared, _)| declared.name()).collect();
        defaults.sort_unstable();
        f.debug_struct("FactoryRegistry")
            .field("named", &named)
            .field("defaults", &defaults)
            .finish()
    }
}
