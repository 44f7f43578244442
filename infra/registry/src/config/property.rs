use crate::config::values::ValueAccessor;
use decl_domain::value::{PropertyValue, ValueKind};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Lookup key of a property inside one namespace: category and name, lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyKey {
    category: String,
    name: String,
}

impl PropertyKey {
    #[must_use]
    pub fn new(category: &str, name: &str) -> Self {
        Self { category: category.to_lowercase(), name: name.to_lowercase() }
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

struct BindingInner {
    namespace: String,
    category: String,
    name: String,
    key: PropertyKey,
    field: &'static str,
    accessor: ValueAccessor,
    default: PropertyValue,
    comment: String,
    value: RwLock<PropertyValue>,
}

/// A configuration field bound to its persisted value.
///
/// Identity and field attachment are fixed at creation; only the current value changes.
/// Clones share the same binding, and equality is identity.
#[derive(Clone)]
pub struct PropertyBinding {
    inner: Arc<BindingInner>,
}

impl PropertyBinding {
    pub(crate) fn new(
        namespace: &str,
        category: &str,
        name: &str,
        field: &'static str,
        accessor: ValueAccessor,
        default: PropertyValue,
        comment: &str,
    ) -> Self {
        Self {
            inner: Arc::new(BindingInner {
                namespace: namespace.to_owned(),
                category: category.to_owned(),
                name: name.to_owned(),
                key: PropertyKey::new(category, name),
                field,
                accessor,
                value: RwLock::new(default.clone()),
                default,
                comment: comment.to_owned(),
            }),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// The category as declared on the field.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.inner.category
    }

    /// The name as declared on the field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn key(&self) -> &PropertyKey {
        &self.inner.key
    }

    /// The holder field this property writes into.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.inner.field
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.inner.accessor.kind()
    }

    /// The field's initial value, used when the store has nothing usable.
    #[must_use]
    pub fn default_value(&self) -> &PropertyValue {
        &self.inner.default
    }

    #[must_use]
    pub fn comment(&self) -> &str {
        &self.inner.comment
    }

    #[must_use]
    pub fn value(&self) -> PropertyValue {
        self.inner.value.read().clone()
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        *self.inner.value.read() == self.inner.default
    }

    pub(crate) fn accessor(&self) -> ValueAccessor {
        self.inner.accessor
    }

    pub(crate) fn set(&self, value: PropertyValue) {
        *self.inner.value.write() = value;
    }
}

impl PartialEq for PropertyBinding {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for PropertyBinding {}

impl fmt::Debug for PropertyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBinding")
            .field("namespace", &self.inner.namespace)
            .field("category", &self.inner.category)
            .field("name", &self.inner.name)
            .field("field", &self.inner.field)
            .field("value", &*self.inner.value.read())
            .finish_non_exhaustive()
    }
}
