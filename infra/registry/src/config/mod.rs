//! Configuration binding: holder fields tagged `#[property(...)]` are bound to a persisted store,
//! one namespace per holder.

mod namespace;
mod property;
mod registry;
mod table;
mod values;

pub use namespace::NamespaceConfig;
pub use property::{PropertyBinding, PropertyKey};
pub use registry::NamespaceRegistry;
pub use table::PropertyTable;
pub use values::{ConfigValues, Seed, SeedFactory, ValueAccessor};
