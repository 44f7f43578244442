//! A small workshop: two gadgets, one machine with a sub-entry and a few settings.

use decl_derive::Holder;
use decl_domain::descriptor::TypeDescriptor;
use decl_registry::entries::{CompoundTarget, EntryTarget};
use decl_registry::{
    Capability, Compound, CompoundSetup, Entry, ExternalError, FactoryRegistry, SetupContext,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

pub trait Gadget: Entry {}
pub trait Machine: Compound {}

#[derive(Debug, Default)]
pub struct Lamp {
    label: RwLock<String>,
}

#[derive(Debug, Default)]
pub struct Torch {
    label: RwLock<String>,
}

#[derive(Debug, Default)]
pub struct Smelter {
    label: RwLock<String>,
}

macro_rules! labelled {
    ($($ty:ty),*) => {$(
        impl Entry for $ty {
            fn set_display_name(&self, name: &str) {
                name.clone_into(&mut self.label.write());
            }
        }

        impl $ty {
            pub fn label(&self) -> String {
                self.label.read().clone()
            }
        }
    )*};
}

labelled!(Lamp, Torch, Smelter);

impl Gadget for Lamp {}
impl Gadget for Torch {}

impl CompoundSetup for Smelter {
    fn setup(&self, context: &SetupContext<'_>) {
        info!(
            namespace = context.namespace,
            name = context.name,
            record = context.record.map(|record| record.name()),
            "Smelter setup"
        );
    }
}

impl Compound for Smelter {
    fn setup_hook(&self) -> Option<&dyn CompoundSetup> {
        Some(self)
    }
}

impl Machine for Smelter {}

pub struct SmelterState;
pub struct CrucibleState;
pub struct SmelterItem;

#[derive(Holder, Default)]
pub struct Gadgets {
    #[entry(name = "lamp")]
    pub lamp: Option<Arc<Lamp>>,

    #[entry(name = "torch", display_name = "handTorch")]
    pub torch: Option<Arc<Torch>>,
}

#[derive(Holder, Default)]
pub struct Machines {
    #[compound(
        name = "smelter",
        companion = SmelterItem,
        record = SmelterState,
        sub_entry(name = "crucible", record = CrucibleState)
    )]
    pub smelter: Option<Arc<Smelter>>,
}

#[derive(Holder)]
pub struct WorkshopSettings {
    #[property(category = "general", name = "maxSize", comment = "Largest stack size")]
    pub max_size: i32,

    #[property(category = "general", name = "smeltRatio")]
    pub smelt_ratio: f64,

    #[property(category = "client", name = "greetings", comment = "Shown on startup")]
    pub greetings: Vec<String>,
}

impl Default for WorkshopSettings {
    fn default() -> Self {
        Self { max_size: 64, smelt_ratio: 1.5, greetings: vec!["welcome".to_owned()] }
    }
}

pub fn gadgets() -> Capability<dyn Gadget> {
    Capability::<dyn Gadget>::new("Gadget")
        .admit::<Lamp>(|lamp| lamp as Arc<dyn Gadget>)
        .admit::<Torch>(|torch| torch as Arc<dyn Gadget>)
}

pub fn machines() -> Capability<dyn Machine> {
    Capability::<dyn Machine>::new("Machine").admit::<Smelter>(|smelter| smelter as Arc<dyn Machine>)
}

pub fn factory() -> FactoryRegistry {
    FactoryRegistry::new()
        .default_for::<Lamp, _>(|_| Lamp::default())
        .default_for::<Torch, _>(|_| Torch::default())
        .default_for::<Smelter, _>(|_| Smelter::default())
}

/// Logs every registration instead of keeping it.
#[derive(Debug, Default)]
pub struct LoggingTarget {
    pub registered: usize,
}

impl<E: ?Sized> EntryTarget<E> for LoggingTarget {
    fn register_entry(&mut self, id: &str, _entry: Arc<E>) -> Result<(), ExternalError> {
        self.registered += 1;
        info!(id, "Entry registered with host");
        Ok(())
    }
}

impl<E: ?Sized> CompoundTarget<E> for LoggingTarget {
    fn register_compound(
        &mut self,
        id: &str,
        _compound: Arc<E>,
        companion: Option<TypeDescriptor>,
    ) -> Result<(), ExternalError> {
        self.registered += 1;
        info!(id, companion = companion.map(|companion| companion.name()), "Compound registered with host");
        Ok(())
    }

    fn register_record(&mut self, record: TypeDescriptor, id: &str) -> Result<(), ExternalError> {
        info!(id, record = record.name(), "Record registered with host");
        Ok(())
    }
}
