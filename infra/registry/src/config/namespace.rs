use crate::config::property::PropertyBinding;
use crate::config::table::PropertyTable;
use crate::config::values::{ConfigValues, Seed, SeedFactory};
use crate::error::{RegistryError, RegistryErrorExt};
use crate::scanner::{self, Processor, ScanReport};
use crate::store::ConfigStore;
use decl_domain::descriptor::TypeDescriptor;
use decl_domain::holder::{Field, Holder};
use decl_domain::tags::PropertyTag;
use decl_domain::value::PropertyValue;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

struct NamespaceState {
    store: Box<dyn ConfigStore>,
    holder: Box<dyn Holder>,
}

struct NamespaceInner {
    id: String,
    holder_type: TypeDescriptor,
    table: PropertyTable,
    state: RwLock<NamespaceState>,
}

/// One registered configuration namespace: its store, its holder and the property table built
/// from the holder's fields.
///
/// The handle is cheap to clone; all clones refer to the same namespace.
#[derive(Clone)]
pub struct NamespaceConfig {
    inner: Arc<NamespaceInner>,
}

impl NamespaceConfig {
    /// Scans `holder`, resolves every property against `store` and builds the table.
    pub(crate) fn build(
        namespace: &str,
        mut store: Box<dyn ConfigStore>,
        mut holder: Box<dyn Holder>,
        values: &ConfigValues,
    ) -> Result<(Self, ScanReport), RegistryError> {
        let holder_type = holder.descriptor();

        let mut processor = ConfigProcessor::new(namespace, store.as_mut());
        let report = scanner::scan(holder.as_mut(), values, &SeedFactory::new(values), &mut processor)?;
        let table = processor.into_table();

        let config = Self {
            inner: Arc::new(NamespaceInner {
                id: namespace.to_owned(),
                holder_type,
                table,
                state: RwLock::new(NamespaceState { store, holder }),
            }),
        };
        Ok((config, report))
    }

    /// The namespace id as it was registered.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    #[must_use]
    pub fn holder_type(&self) -> TypeDescriptor {
        self.inner.holder_type
    }

    /// Flushes the store if it reports unsaved changes.
    ///
    /// Returns whether a flush happened.
    ///
    /// # Errors
    /// Returns [`RegistryError::External`] if the store fails to flush.
    pub fn save(&self) -> Result<bool, RegistryError> {
        let mut state = self.inner.state.write();
        if !state.store.has_unsaved_changes() {
            trace!(namespace = %self.inner.id, "Nothing to save");
            return Ok(false);
        }

        state.store.flush().context(format!("flushing namespace {}", self.inner.id))?;
        debug!(namespace = %self.inner.id, "Configuration saved");
        Ok(true)
    }

    /// Categories in first-declared order and case.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.inner.table.categories().map(str::to_owned).collect()
    }

    /// Property names of `category` (matched case-insensitively), in declaration order.
    #[must_use]
    pub fn names(&self, category: &str) -> Vec<String> {
        self.inner.table.names(category).map(str::to_owned).collect()
    }

    /// Looks a property up by category and name, ignoring case.
    #[must_use]
    pub fn property(&self, category: &str, name: &str) -> Option<PropertyBinding> {
        let found = self.inner.table.get(category, name).cloned();
        trace!(namespace = %self.inner.id, category, name, found = found.is_some(), "Property lookup");
        found
    }

    #[must_use]
    pub fn properties(&self) -> Vec<PropertyBinding> {
        self.inner.table.iter().cloned().collect()
    }

    /// Re-reads every property from the store and writes the result into the holder.
    ///
    /// # Errors
    /// Returns [`RegistryError::FieldBinding`] if a field can no longer be written.
    pub fn reload(&self) -> Result<(), RegistryError> {
        let bindings: FxHashMap<&str, &PropertyBinding> =
            self.inner.table.iter().map(|binding| (binding.field(), binding)).collect();

        let mut guard = self.inner.state.write();
        let NamespaceState { store, holder } = &mut *guard;
        for mut field in holder.fields() {
            let Some(binding) = bindings.get(field.name()) else { continue };
            let value = resolve(store.as_mut(), binding);
            apply(&mut field, binding, &value)?;
        }

        debug!(namespace = %self.inner.id, properties = bindings.len(), "Configuration reloaded");
        Ok(())
    }

    /// Re-reads one property from the store and returns its new value.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownProperty`] for an unknown key, or
    /// [`RegistryError::FieldBinding`] if the field can no longer be written.
    pub fn reload_property(&self, category: &str, name: &str) -> Result<PropertyValue, RegistryError> {
        let binding = self.binding(category, name)?;
        self.with_field(&binding, |field, store| {
            let value = resolve(store, &binding);
            apply(field, &binding, &value)?;
            Ok(binding.value())
        })
    }

    /// Updates a property: the holder field, the binding and the store.
    ///
    /// The value is converted to what the field type holds (e.g. integers for a `f64` field)
    /// and the converted value is returned.
    ///
    /// # Errors
    /// [`RegistryError::UnknownProperty`] for an unknown key, [`RegistryError::InvalidValue`] if
    /// the field type cannot represent `value`.
    pub fn set_value(
        &self,
        category: &str,
        name: &str,
        value: PropertyValue,
    ) -> Result<PropertyValue, RegistryError> {
        let binding = self.binding(category, name)?;
        let normalized =
            binding.accessor().normalize(&value).ok_or_else(|| RegistryError::InvalidValue {
                message: format!("{value} does not fit {:?}", binding.kind()).into(),
                context: Some(format!("{}.{}", binding.category(), binding.name()).into()),
            })?;

        self.with_field(&binding, |field, store| {
            apply(field, &binding, &normalized)?;
            let current = binding.value();
            store.store(binding.category(), binding.name(), current.clone());
            debug!(namespace = %self.inner.id, category, name, value = %current, "Property updated");
            Ok(current)
        })
    }

    /// Parses textual input according to the property's kind, then behaves like
    /// [`Self::set_value`].
    ///
    /// # Errors
    /// As [`Self::set_value`]; unparsable input is [`RegistryError::InvalidValue`].
    pub fn set_text(&self, category: &str, name: &str, raw: &[&str]) -> Result<PropertyValue, RegistryError> {
        let binding = self.binding(category, name)?;
        let value = binding.kind().parse(raw).ok_or_else(|| RegistryError::InvalidValue {
            message: format!("cannot parse {raw:?} as {:?}", binding.kind()).into(),
            context: Some(format!("{}.{}", binding.category(), binding.name()).into()),
        })?;
        self.set_value(category, name, value)
    }

    /// Typed read access to the bound holder; `None` if it is not an `H`.
    pub fn read<H: Holder, R>(&self, f: impl FnOnce(&H) -> R) -> Option<R> {
        let state = self.inner.state.read();
        let holder: &dyn Any = &*state.holder;
        holder.downcast_ref::<H>().map(f)
    }

    fn binding(&self, category: &str, name: &str) -> Result<PropertyBinding, RegistryError> {
        self.inner.table.get(category, name).cloned().ok_or_else(|| RegistryError::UnknownProperty {
            message: format!("{category}.{name}").into(),
            context: Some(format!("namespace {}", self.inner.id).into()),
        })
    }

    fn with_field<R>(
        &self,
        binding: &PropertyBinding,
        f: impl FnOnce(&mut Field<'_>, &mut dyn ConfigStore) -> Result<R, RegistryError>,
    ) -> Result<R, RegistryError> {
        let mut guard = self.inner.state.write();
        let NamespaceState { store, holder } = &mut *guard;
        let mut fields = holder.fields();
        let field = fields.iter_mut().find(|field| field.name() == binding.field()).ok_or_else(|| {
            RegistryError::Internal {
                message: format!("field {} is no longer listed", binding.field()).into(),
                context: Some(self.inner.holder_type.name().into()),
            }
        })?;
        f(field, store.as_mut())
    }
}

impl fmt::Debug for NamespaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceConfig")
            .field("id", &self.inner.id)
            .field("holder_type", &self.inner.holder_type)
            .field("properties", &self.inner.table.len())
            .finish_non_exhaustive()
    }
}

/// Loads a binding's value, falling back to the default when the stored one does not fit.
fn resolve(store: &mut dyn ConfigStore, binding: &PropertyBinding) -> PropertyValue {
    let stored =
        store.load(binding.category(), binding.name(), binding.default_value(), binding.comment());

    binding.accessor().normalize(&stored).unwrap_or_else(|| {
        warn!(
            namespace = binding.namespace(),
            category = binding.category(),
            name = binding.name(),
            stored = %stored,
            "Stored value does not fit the field, using default"
        );
        binding.default_value().clone()
    })
}

/// Writes `value` into the field and records what the field ended up holding.
fn apply(field: &mut Field<'_>, binding: &PropertyBinding, value: &PropertyValue) -> Result<(), RegistryError> {
    let current = binding.accessor().write(field, value).map_err(|source| RegistryError::FieldBinding {
        source,
        context: Some(format!("{}.{}", binding.namespace(), binding.field()).into()),
    })?;
    binding.set(current);
    Ok(())
}

/// Builds the property table of one namespace during its scan.
struct ConfigProcessor<'a> {
    namespace: &'a str,
    store: &'a mut dyn ConfigStore,
    table: PropertyTable,
}

impl<'a> ConfigProcessor<'a> {
    fn new(namespace: &'a str, store: &'a mut dyn ConfigStore) -> Self {
        Self { namespace, store, table: PropertyTable::new() }
    }

    fn into_table(self) -> PropertyTable {
        self.table
    }
}

impl Processor for ConfigProcessor<'_> {
    type Instance = Seed;
    type Tag = PropertyTag;

    fn warn_untagged(&self) -> bool {
        false
    }

    fn entry_name(&self, tag: &PropertyTag) -> String {
        format!("{}.{}", tag.category, tag.name)
    }

    fn is_enabled(&self, _name: &str) -> bool {
        true
    }

    fn on_constructed(
        &mut self,
        seed: Seed,
        tag: &PropertyTag,
        field: &mut Field<'_>,
    ) -> Result<(), RegistryError> {
        let binding = PropertyBinding::new(
            self.namespace,
            tag.category,
            tag.name,
            field.name(),
            seed.accessor,
            seed.value,
            tag.comment,
        );
        if self.table.contains(binding.key()) {
            return Err(duplicate(self.namespace, tag));
        }

        let value = resolve(&mut *self.store, &binding);
        apply(field, &binding, &value)?;
        debug!(
            namespace = self.namespace,
            category = tag.category,
            name = tag.name,
            value = %binding.value(),
            "Property bound"
        );

        self.table.insert(binding).map_err(|_| duplicate(self.namespace, tag))
    }
}

fn duplicate(namespace: &str, tag: &PropertyTag) -> RegistryError {
    RegistryError::DuplicateProperty {
        message: format!("{}.{}", tag.category, tag.name).into(),
        context: Some(format!("namespace {namespace}").into()),
    }
}
