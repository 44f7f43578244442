//! Slot descriptions of a holder type.
//!
//! A holder is any struct whose public fields are registration targets. Instead of runtime
//! reflection, the holder lists its own fields through [`Holder::fields`], normally generated by
//! `#[derive(Holder)]`. Each [`Field`] is a named, typed, mutable view of one slot together with
//! the tags declared on it.

use crate::descriptor::TypeDescriptor;
use crate::tags::{FieldTag, Tag};
use bitflags::bitflags;
use std::any::Any;
use std::fmt;

bitflags! {
    /// Markers declared on a field next to its tags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        /// The field is never considered by a scan, whatever its type or tags.
        const IGNORED = 1 << 0;
        /// The field can be inspected but not written.
        const FROZEN = 1 << 1;
    }
}

/// A type whose public fields can be scanned.
pub trait Holder: Any + Send + Sync {
    /// Lists the public fields in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// The concrete holder type, also available through `dyn Holder`.
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }
}

/// A mutable view of one public field of a [`Holder`].
pub struct Field<'h> {
    name: &'static str,
    slot_type: TypeDescriptor,
    flags: FieldFlags,
    tags: Vec<Tag>,
    slot: &'h mut (dyn Any + 'static),
}

impl<'h> Field<'h> {
    pub fn new<S: Any>(name: &'static str, slot: &'h mut S) -> Self {
        Self {
            name,
            slot_type: TypeDescriptor::of::<S>(),
            flags: FieldFlags::empty(),
            tags: Vec::new(),
            slot,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<Tag>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The declared type of the slot itself (e.g. `Option<Arc<T>>` or `i32`).
    #[must_use]
    pub const fn slot_type(&self) -> TypeDescriptor {
        self.slot_type
    }

    #[must_use]
    pub const fn flags(&self) -> FieldFlags {
        self.flags
    }

    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        self.flags.contains(FieldFlags::IGNORED)
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.flags.contains(FieldFlags::FROZEN)
    }

    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Returns the first tag of kind `T`, if declared.
    #[must_use]
    pub fn tag<T: FieldTag>(&self) -> Option<&T> {
        self.tags.iter().find_map(T::select)
    }

    /// Read access to the current slot value.
    #[must_use]
    pub fn slot(&self) -> &(dyn Any + 'static) {
        &*self.slot
    }

    /// Write access to the slot; `None` when the field is frozen.
    pub fn slot_mut(&mut self) -> Option<&mut (dyn Any + 'static)> {
        if self.is_frozen() { None } else { Some(&mut *self.slot) }
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("slot_type", &self.slot_type)
            .field("flags", &self.flags)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}
