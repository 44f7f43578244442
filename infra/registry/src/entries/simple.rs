use crate::capability::{Capability, RawInstance};
use crate::entries::{Entry, EntryTarget, Registrar, display_name, dotted};
use crate::error::{RegistryError, RegistryErrorExt};
use crate::gate::FeatureGate;
use crate::scanner::{self, Factory, Processor, ScanReport};
use decl_domain::features::FeatureKind;
use decl_domain::holder::{Field, Holder};
use decl_domain::tags::EntryTag;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Registers each constructed simple entry under `namespace.name`, then applies its display
/// name.
pub struct EntryProcessor<'r, E: ?Sized, T: ?Sized> {
    namespace: &'r str,
    gate: &'r dyn FeatureGate,
    target: &'r mut T,
    _entry: PhantomData<fn(Arc<E>)>,
}

impl<'r, E: ?Sized, T: ?Sized> EntryProcessor<'r, E, T> {
    pub fn new(namespace: &'r str, gate: &'r dyn FeatureGate, target: &'r mut T) -> Self {
        Self { namespace, gate, target, _entry: PhantomData }
    }
}

impl<E, T> Processor for EntryProcessor<'_, E, T>
where
    E: Entry + ?Sized,
    T: EntryTarget<E> + ?Sized,
{
    type Instance = Arc<E>;
    type Tag = EntryTag;

    fn entry_name(&self, tag: &EntryTag) -> String {
        tag.name.to_owned()
    }

    fn is_enabled(&self, name: &str) -> bool {
        self.gate.is_enabled(FeatureKind::Entry, name)
    }

    fn on_constructed(
        &mut self,
        entry: Arc<E>,
        tag: &EntryTag,
        field: &mut Field<'_>,
    ) -> Result<(), RegistryError> {
        let id = dotted(self.namespace, tag.name);
        self.target
            .register_entry(&id, Arc::clone(&entry))
            .context(format!("registering entry {id}"))?;

        if let Some(display) = display_name(self.namespace, tag.name, tag.display_name) {
            entry.set_display_name(&display);
        }

        debug!(id = %id, field = field.name(), "Entry registered");
        Ok(())
    }
}

impl<E: ?Sized, T: ?Sized> fmt::Debug for EntryProcessor<'_, E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryProcessor").field("namespace", &self.namespace).finish_non_exhaustive()
    }
}

impl Registrar {
    /// Scans `holder` for simple entries and registers every enabled one with `target`.
    ///
    /// # Errors
    /// Returns [`RegistryError::FieldBinding`] if a constructed entry cannot be written into its
    /// field, or [`RegistryError::External`] if `target` rejects a registration. Either stops the
    /// scan.
    pub fn register_entries<E, F, T>(
        &self,
        holder: &mut dyn Holder,
        capability: &Capability<E>,
        factory: &F,
        target: &mut T,
    ) -> Result<ScanReport, RegistryError>
    where
        E: Entry + ?Sized + 'static,
        F: Factory<RawInstance> + ?Sized,
        T: EntryTarget<E> + ?Sized,
    {
        let mut processor = EntryProcessor::<E, T>::new(&self.namespace, self.gate(), target);
        scanner::scan(holder, capability, factory, &mut processor)
    }
}
