//! # Declarative Registry
//!
//! Turns annotated holder structs into registrations. A holder's public fields are scanned once,
//! each tagged field is resolved against a feature gate, built by a factory, written back into
//! the field and handed to a processor that registers it somewhere else.
//!
//! ## Overview
//!
//! * [`scanner`]: the generic scan, parameterised by an [`ElementKind`] (which fields are
//!   candidates and how values are written), a [`Factory`] and a [`Processor`].
//! * [`entries`]: object registration. Simple entries go to an [`entries::EntryTarget`] under
//!   `namespace.name`; compound entries go to an [`entries::CompoundTarget`] under
//!   `namespace_name` with their records, setup hook and sub-entries.
//! * [`config`]: configuration binding. Each namespace binds a holder to a [`ConfigStore`]
//!   and exposes a case-insensitive property table.
//!
//! ## Example
//!
//! ```rust
//! use decl_derive::Holder;
//! use decl_registry::{MemoryStore, NamespaceRegistry};
//!
//! #[derive(Holder)]
//! pub struct Settings {
//!     #[property(category = "general", name = "maxSize", comment = "Largest stack")]
//!     pub max_size: i32,
//! }
//!
//! # fn main() -> Result<(), decl_registry::RegistryError> {
//! let registry = NamespaceRegistry::new();
//! let config = registry.register("tools", MemoryStore::new(), Settings { max_size: 64 })?;
//!
//! let size = config.property("GENERAL", "maxsize").map(|binding| binding.value());
//! assert_eq!(size, Some(decl_domain::PropertyValue::Int(64)));
//! assert!(config.save()?);
//! # Ok(())
//! # }
//! ```

mod bind;
mod capability;
mod error;
mod factory;
mod gate;
mod store;

pub mod config;
pub mod entries;
pub mod scanner;

pub use bind::{BindError, BindErrorExt};
pub use capability::{Capability, RawInstance};
pub use config::{NamespaceConfig, NamespaceRegistry, PropertyBinding};
pub use entries::{Compound, CompoundSetup, Entry, Registrar, SetupContext};
pub use error::{ExternalError, RegistryError, RegistryErrorExt};
pub use factory::FactoryRegistry;
pub use gate::{AllowAll, FeatureGate};
pub use scanner::{Candidate, ElementKind, Factory, Processor, ScanReport};
pub use store::{ConfigStore, MemoryStore, StoredValue};
