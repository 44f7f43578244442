//! Object registration: holder fields tagged `#[entry(...)]` or `#[compound(...)]` are
//! constructed by a factory, bound into their field and handed to a registration target.
//!
//! Simple entries are registered under `namespace.name`. Compound entries are registered under
//! `namespace_name`, together with an optional companion type, an associated record type, a
//! post-construction hook and nested sub-entries.

mod compound;
mod simple;

use crate::error::ExternalError;
use crate::gate::FeatureGate;
use decl_domain::descriptor::TypeDescriptor;
use decl_domain::tags::DisplayName;
use std::fmt;
use std::sync::Arc;

pub use compound::CompoundProcessor;
pub use simple::EntryProcessor;

/// A simple registrable object.
pub trait Entry: Send + Sync {
    fn set_display_name(&self, name: &str);
}

/// A compound registrable object.
pub trait Compound: Entry {
    /// The post-construction hook, if this object has one.
    fn setup_hook(&self) -> Option<&dyn CompoundSetup> {
        None
    }
}

/// What a compound's post-construction hook is told about its registration.
#[derive(Debug, Clone, Copy)]
pub struct SetupContext<'a> {
    pub namespace: &'a str,
    pub name: &'a str,
    pub record: Option<TypeDescriptor>,
    pub companion: Option<TypeDescriptor>,
}

pub trait CompoundSetup {
    fn setup(&self, context: &SetupContext<'_>);
}

/// The host registry simple entries end up in.
pub trait EntryTarget<E: ?Sized> {
    /// # Errors
    /// Whatever the host rejects the registration with.
    fn register_entry(&mut self, id: &str, entry: Arc<E>) -> Result<(), ExternalError>;
}

/// The host registry compound entries and their records end up in.
pub trait CompoundTarget<E: ?Sized> {
    /// # Errors
    /// Whatever the host rejects the registration with.
    fn register_compound(
        &mut self,
        id: &str,
        compound: Arc<E>,
        companion: Option<TypeDescriptor>,
    ) -> Result<(), ExternalError>;

    /// # Errors
    /// Whatever the host rejects the registration with.
    fn register_record(&mut self, record: TypeDescriptor, id: &str) -> Result<(), ExternalError>;
}

/// Registers the object entries of one namespace.
///
/// # Example
/// ```rust
/// use decl_registry::entries::{dotted, underscored};
///
/// assert_eq!(dotted("tools", "pickaxe"), "tools.pickaxe");
/// assert_eq!(underscored("tools", "furnace"), "tools_furnace");
/// ```
#[derive(Clone)]
pub struct Registrar {
    namespace: String,
    gate: Arc<dyn FeatureGate>,
}

impl Registrar {
    pub fn new(namespace: impl Into<String>, gate: impl FeatureGate + 'static) -> Self {
        Self { namespace: namespace.into(), gate: Arc::new(gate) }
    }

    #[must_use]
    pub fn with_shared_gate(namespace: impl Into<String>, gate: Arc<dyn FeatureGate>) -> Self {
        Self { namespace: namespace.into(), gate }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub(crate) fn gate(&self) -> &dyn FeatureGate {
        self.gate.as_ref()
    }
}

impl fmt::Debug for Registrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registrar").field("namespace", &self.namespace).finish_non_exhaustive()
    }
}

/// `namespace.name`
#[must_use]
pub fn dotted(namespace: &str, name: &str) -> String {
    format!("{namespace}.{name}")
}

/// `namespace_name`
#[must_use]
pub fn underscored(namespace: &str, name: &str) -> String {
    format!("{namespace}_{name}")
}

/// The display name to apply, or `None` to leave the object's own name alone.
#[must_use]
pub fn display_name(namespace: &str, name: &str, display: DisplayName) -> Option<String> {
    match display {
        DisplayName::None => None,
        DisplayName::Default => Some(dotted(namespace, name)),
        DisplayName::Explicit(explicit) => Some(dotted(namespace, explicit)),
    }
}
