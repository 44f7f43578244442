use crate::bind::BindError;
use crate::scanner::{Candidate, ElementKind, Factory};
use decl_domain::descriptor::TypeDescriptor;
use decl_domain::holder::Field;
use decl_domain::value::{ConfigValue, PropertyValue, ValueKind};
use fxhash::FxHashMap;
use std::any::{Any, TypeId};
use std::fmt;

/// Type-erased read/write access to one configuration field type.
#[derive(Clone, Copy)]
pub struct ValueAccessor {
    kind: ValueKind,
    declared: TypeDescriptor,
    read: fn(&(dyn Any + 'static)) -> Option<PropertyValue>,
    normalize: fn(&PropertyValue) -> Option<PropertyValue>,
    write: fn(&mut (dyn Any + 'static), &PropertyValue) -> bool,
}

impl ValueAccessor {
    #[must_use]
    pub fn of<T: ConfigValue>() -> Self {
        Self {
            kind: T::KIND,
            declared: TypeDescriptor::of::<T>(),
            read: |slot| slot.downcast_ref::<T>().map(ConfigValue::to_value),
            normalize: |value| T::from_value(value).map(|typed| typed.to_value()),
            write: |slot, value| match (slot.downcast_mut::<T>(), T::from_value(value)) {
                (Some(slot), Some(typed)) => {
                    *slot = typed;
                    true
                },
                _ => false,
            },
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    #[must_use]
    pub const fn declared(&self) -> TypeDescriptor {
        self.declared
    }

    /// Reads the current field value.
    #[must_use]
    pub fn read(&self, slot: &(dyn Any + 'static)) -> Option<PropertyValue> {
        (self.read)(slot)
    }

    /// Converts `value` into the canonical form the field type would hold, or `None` if the
    /// field type cannot represent it.
    #[must_use]
    pub fn normalize(&self, value: &PropertyValue) -> Option<PropertyValue> {
        (self.normalize)(value)
    }

    /// Writes `value` into the field and returns what the field now holds.
    ///
    /// # Errors
    /// [`BindError::ReadOnly`] for frozen fields, [`BindError::SlotMismatch`] when the field does
    /// not have this accessor's type or cannot represent the value.
    pub fn write(&self, field: &mut Field<'_>, value: &PropertyValue) -> Result<PropertyValue, BindError> {
        let name = field.name();
        let slot = field
            .slot_mut()
            .ok_or_else(|| BindError::ReadOnly { message: name.into(), context: None })?;

        if !(self.write)(slot, value) {
            return Err(BindError::SlotMismatch {
                message: format!("{} cannot hold {value}", self.declared).into(),
                context: Some(name.into()),
            });
        }

        self.read(field.slot()).ok_or_else(|| BindError::SlotMismatch {
            message: self.declared.name().into(),
            context: Some(name.into()),
        })
    }
}

impl fmt::Debug for ValueAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueAccessor")
            .field("kind", &self.kind)
            .field("declared", &self.declared)
            .finish_non_exhaustive()
    }
}

/// The configuration capability: the field types a property can be bound to.
#[derive(Clone)]
pub struct ConfigValues {
    accessors: FxHashMap<TypeId, ValueAccessor>,
}

impl ConfigValues {
    /// No accepted types at all.
    #[must_use]
    pub fn empty() -> Self {
        Self { accessors: FxHashMap::default() }
    }

    /// Scalars, text and lists of both.
    #[must_use]
    pub fn standard() -> Self {
        Self::empty()
            .admit::<bool>()
            .admit::<i32>()
            .admit::<i64>()
            .admit::<u32>()
            .admit::<f64>()
            .admit::<String>()
            .admit::<Vec<bool>>()
            .admit::<Vec<i32>>()
            .admit::<Vec<f64>>()
            .admit::<Vec<String>>()
    }

    #[must_use]
    pub fn admit<T: ConfigValue>(mut self) -> Self {
        self.accessors.insert(TypeId::of::<T>(), ValueAccessor::of::<T>());
        self
    }

    #[must_use]
    pub fn accessor(&self, declared: TypeDescriptor) -> Option<ValueAccessor> {
        self.accessors.get(&declared.id()).copied()
    }
}

impl Default for ConfigValues {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for ConfigValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.accessors.values().map(|a| a.declared.name()).collect();
        types.sort_unstable();
        f.debug_struct("ConfigValues").field("accepted", &types).finish()
    }
}

/// A configuration field's initial value, captured before the store is consulted.
#[derive(Debug, Clone)]
pub struct Seed {
    pub value: PropertyValue,
    pub accessor: ValueAccessor,
}

impl ElementKind for ConfigValues {
    type Raw = PropertyValue;
    type Instance = Seed;

    fn describe(&self) -> &str {
        "configuration value"
    }

    fn declared(&self, field: &Field<'_>) -> Option<TypeDescriptor> {
        self.accessors.contains_key(&field.slot_type().id()).then_some(field.slot_type())
    }

    fn bind(&self, field: &mut Field<'_>, raw: PropertyValue) -> Result<Seed, BindError> {
        let accessor = self.accessor(field.slot_type()).ok_or_else(|| BindError::SlotMismatch {
            message: field.slot_type().name().into(),
            context: Some("not a configuration value".into()),
        })?;
        let value = accessor.write(field, &raw)?;
        Ok(Seed { value, accessor })
    }
}

/// The configuration factory: every field is "constructed" from the value it already holds.
#[derive(Debug, Clone, Copy)]
pub struct SeedFactory<'v> {
    values: &'v ConfigValues,
}

impl<'v> SeedFactory<'v> {
    #[must_use]
    pub const fn new(values: &'v ConfigValues) -> Self {
        Self { values }
    }
}

impl Factory<PropertyValue> for SeedFactory<'_> {
    fn construct(&self, _name: &str, candidate: &Candidate<'_>) -> Option<PropertyValue> {
        self.values.accessor(candidate.declared)?.read(candidate.current_any())
    }
}
