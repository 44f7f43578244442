use crate::capability::{Capability, RawInstance};
use crate::entries::{Compound, CompoundTarget, Registrar, SetupContext, display_name, underscored};
use crate::error::{RegistryError, RegistryErrorExt};
use crate::gate::FeatureGate;
use crate::scanner::{self, Factory, Processor, ScanReport};
use decl_domain::features::FeatureKind;
use decl_domain::holder::{Field, Holder};
use decl_domain::tags::CompoundTag;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Registers each constructed compound under `namespace_name`, followed by its display name,
/// its record, its setup hook and the records of its sub-entries.
pub struct CompoundProcessor<'r, E: ?Sized, T: ?Sized> {
    namespace: &'r str,
    gate: &'r dyn FeatureGate,
    target: &'r mut T,
    _compound: PhantomData<fn(Arc<E>)>,
}

impl<'r, E: ?Sized, T: ?Sized> CompoundProcessor<'r, E, T> {
    pub fn new(namespace: &'r str, gate: &'r dyn FeatureGate, target: &'r mut T) -> Self {
        Self { namespace, gate, target, _compound: PhantomData }
    }
}

impl<E, T> Processor for CompoundProcessor<'_, E, T>
where
    E: Compound + ?Sized,
    T: CompoundTarget<E> + ?Sized,
{
    type Instance = Arc<E>;
    type Tag = CompoundTag;

    fn entry_name(&self, tag: &CompoundTag) -> String {
        tag.name.to_owned()
    }

    fn is_enabled(&self, name: &str) -> bool {
        self.gate.is_enabled(FeatureKind::Compound, name)
    }

    fn on_constructed(
        &mut self,
        compound: Arc<E>,
        tag: &CompoundTag,
        field: &mut Field<'_>,
    ) -> Result<(), RegistryError> {
        let id = underscored(self.namespace, tag.name);
        self.target
            .register_compound(&id, Arc::clone(&compound), tag.companion)
            .context(format!("registering compound {id}"))?;

        if let Some(display) = display_name(self.namespace, tag.name, tag.display_name) {
            compound.set_display_name(&display);
        }

        let record = tag.record();
        if let Some(record) = record {
            self.target
                .register_record(record, &id)
                .context(format!("registering record {record} of {id}"))?;
        }

        if let Some(hook) = compound.setup_hook() {
            hook.setup(&SetupContext {
                namespace: self.namespace,
                name: tag.name,
                record,
                companion: tag.companion,
            });
        }

        for sub in &tag.sub_entries {
            let sub_id = underscored(self.namespace, sub.name);
            self.target
                .register_record(sub.record, &sub_id)
                .context(format!("registering sub-entry {sub_id} of {id}"))?;
        }

        debug!(
            id = %id,
            field = field.name(),
            record = record.map(|record| record.name()),
            sub_entries = tag.sub_entries.len(),
            "Compound registered"
        );
        Ok(())
    }
}

impl<E: ?Sized, T: ?Sized> fmt::Debug for CompoundProcessor<'_, E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompoundProcessor").field("namespace", &self.namespace).finish_non_exhaustive()
    }
}

impl Registrar {
    /// Scans `holder` for compound entries and registers every enabled one with `target`.
    ///
    /// Sub-entries are not gated and not constructed; only their records are registered.
    ///
    /// # Errors
    /// Returns [`RegistryError::FieldBinding`] if a constructed compound cannot be written into
    /// its field, or [`RegistryError::External`] if `target` rejects a registration. Either stops
    /// the scan.
    pub fn register_compounds<E, F, T>(
        &self,
        holder: &mut dyn Holder,
        capability: &Capability<E>,
        factory: &F,
        target: &mut T,
    ) -> Result<ScanReport, RegistryError>
    where
        E: Compound + ?Sized + 'static,
        F: Factory<RawInstance> + ?Sized,
        T: CompoundTarget<E> + ?Sized,
    {
        let mut processor = CompoundProcessor::<E, T>::new(&self.namespace, self.gate(), target);
        scanner::scan(holder, capability, factory, &mut processor)
    }
}
