//! # Declaration Models
//!
//! This crate contains the pure data every registration scan works on: the slots a holder
//! exposes, the tags attached to them, runtime type descriptors and configuration values.
//! Keep it lean: no I/O, logging or engine logic, just data and simple helpers.
//!
//! Holder implementations are normally generated with `#[derive(Holder)]` from `decl-derive`,
//! which emits code against the paths of this crate.

pub mod descriptor;
pub mod features;
pub mod holder;
pub mod tags;
pub mod value;

pub use descriptor::TypeDescriptor;
pub use features::FeatureKind;
pub use holder::{Field, FieldFlags, Holder};
pub use tags::{
    CompoundTag, DisplayName, EntryTag, FieldTag, NoRecord, PropertyTag, SubEntryTag, Tag,
};
pub use value::{ConfigValue, PropertyValue, ValueKind};
