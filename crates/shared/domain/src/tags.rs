//! Metadata tags attached to holder fields.
//!
//! Tags are immutable and describe how a field is resolved: object tags ([`EntryTag`],
//! [`CompoundTag`]) name a constructed entry, a [`PropertyTag`] binds the field to a persisted
//! configuration value.

use crate::descriptor::TypeDescriptor;

/// Sentinel record type meaning "no associated record".
///
/// A [`CompoundTag`] whose record is `NoRecord` is treated exactly like one without a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NoRecord;

/// Display-name override of an object entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayName {
    /// Leave the display name of the instance untouched.
    None,
    /// Derive it from the namespace and the entry name.
    #[default]
    Default,
    /// Use this name, prefixed with the namespace.
    Explicit(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTag {
    pub name: &'static str,
    pub display_name: DisplayName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubEntryTag {
    pub name: &'static str,
    pub record: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundTag {
    pub name: &'static str,
    pub display_name: DisplayName,
    pub companion: Option<TypeDescriptor>,
    pub record: Option<TypeDescriptor>,
    pub sub_entries: Vec<SubEntryTag>,
}

impl CompoundTag {
    /// The associated record type, with the [`NoRecord`] sentinel folded into `None`.
    #[must_use]
    pub fn record(&self) -> Option<TypeDescriptor> {
        self.record.filter(|record| !record.is::<NoRecord>())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyTag {
    pub category: &'static str,
    pub name: &'static str,
    pub comment: &'static str,
}

/// Any tag a field may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Entry(EntryTag),
    Compound(CompoundTag),
    Property(PropertyTag),
}

/// A tag kind a scan can require.
pub trait FieldTag: Clone + Sized {
    /// Human readable kind, used in diagnostics.
    const KIND: &'static str;

    fn select(tag: &Tag) -> Option<&Self>;
}

macro_rules! field_tag {
    ($ty:ident, $variant:ident, $kind:literal) => {
        impl FieldTag for $ty {
            const KIND: &'static str = $kind;

            fn select(tag: &Tag) -> Option<&Self> {
                match tag {
                    Tag::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Tag {
            fn from(tag: $ty) -> Self {
                Self::$variant(tag)
            }
        }
    };
}

field_tag!(EntryTag, Entry, "entry");
field_tag!(CompoundTag, Compound, "compound");
field_tag!(PropertyTag, Property, "property");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_record_sentinel_is_folded() {
        let mut tag = CompoundTag {
            name: "furnace",
            display_name: DisplayName::Default,
            companion: None,
            record: Some(TypeDescriptor::of::<NoRecord>()),
            sub_entries: Vec::new(),
        };
        assert_eq!(tag.record(), None);

        tag.record = Some(TypeDescriptor::of::<String>());
        assert_eq!(tag.record(), Some(TypeDescriptor::of::<String>()));
    }

    #[test]
    fn select_matches_only_its_variant() {
        let tag = Tag::from(EntryTag { name: "pickaxe", display_name: DisplayName::None });
        assert!(EntryTag::select(&tag).is_some());
        assert!(CompoundTag::select(&tag).is_none());
        assert!(PropertyTag::select(&tag).is_none());
    }
}
