#![allow(dead_code)]

use decl_derive::Holder;
use decl_domain::descriptor::TypeDescriptor;
use decl_domain::tags::NoRecord;
use decl_registry::entries::{CompoundTarget, EntryTarget};
use decl_registry::{
    Capability, Compound, CompoundSetup, Entry, ExternalError, FactoryRegistry, SetupContext,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Display name storage shared by every fixture object.
#[derive(Debug, Default)]
pub struct Label(Mutex<Option<String>>);

impl Label {
    pub fn get(&self) -> Option<String> {
        self.0.lock().clone()
    }

    fn set(&self, name: &str) {
        *self.0.lock() = Some(name.to_owned());
    }
}

pub trait Item: Entry {}

#[derive(Debug, Default)]
pub struct Pickaxe {
    pub label: Label,
}

#[derive(Debug, Default)]
pub struct Shovel {
    pub label: Label,
}

impl Entry for Pickaxe {
    fn set_display_name(&self, name: &str) {
        self.label.set(name);
    }
}

impl Entry for Shovel {
    fn set_display_name(&self, name: &str) {
        self.label.set(name);
    }
}

impl Item for Pickaxe {}
impl Item for Shovel {}

pub trait Block: Compound {}

#[derive(Debug, Default)]
pub struct Furnace {
    pub label: Label,
    pub setup: Mutex<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct Chest {
    pub label: Label,
}

impl Entry for Furnace {
    fn set_display_name(&self, name: &str) {
        self.label.set(name);
    }
}

impl Entry for Chest {
    fn set_display_name(&self, name: &str) {
        self.label.set(name);
    }
}

impl CompoundSetup for Furnace {
    fn setup(&self, context: &SetupContext<'_>) {
        self.setup.lock().push(format!(
            "{}:{}:{}:{}",
            context.namespace,
            context.name,
            context.record.map_or("-", |record| record.name()),
            context.companion.map_or("-", |companion| companion.name()),
        ));
    }
}

impl Compound for Furnace {
    fn setup_hook(&self) -> Option<&dyn CompoundSetup> {
        Some(self)
    }
}

impl Compound for Chest {}

impl Block for Furnace {}
impl Block for Chest {}

pub struct FurnaceState;
pub struct CoreState;
pub struct FurnaceItem;

#[derive(Holder, Default)]
pub struct Tools {
    #[entry(name = "pickaxe")]
    pub pickaxe: Option<Arc<Pickaxe>>,

    #[entry(name = "shovel", display_name = "spade")]
    pub shovel: Option<Arc<Shovel>>,

    #[entry(name = "silent", no_display_name)]
    pub silent: Option<Arc<Pickaxe>>,

    #[holder(ignore)]
    #[entry(name = "ignored")]
    pub ignored: Option<Arc<Pickaxe>>,

    pub untagged: Option<Arc<Pickaxe>>,

    #[entry(name = "hidden")]
    hidden: Option<Arc<Pickaxe>>,

    pub motto: String,
}

impl Tools {
    pub const fn hidden(&self) -> Option<&Arc<Pickaxe>> {
        self.hidden.as_ref()
    }
}

#[derive(Holder, Default)]
pub struct Frozen {
    #[holder(frozen)]
    #[entry(name = "locked")]
    pub locked: Option<Arc<Pickaxe>>,
}

#[derive(Holder, Default)]
pub struct Blocks {
    #[compound(
        name = "furnace",
        companion = FurnaceItem,
        record = FurnaceState,
        sub_entry(name = "core", record = CoreState)
    )]
    pub furnace: Option<Arc<Furnace>>,

    #[compound(name = "chest", display_name = "box", record = NoRecord)]
    pub chest: Option<Arc<Chest>>,
}

pub fn items() -> Capability<dyn Item> {
    Capability::<dyn Item>::new("Item")
        .admit::<Pickaxe>(|item| item as Arc<dyn Item>)
        .admit::<Shovel>(|item| item as Arc<dyn Item>)
}

pub fn blocks() -> Capability<dyn Block> {
    Capability::<dyn Block>::new("Block")
        .admit::<Furnace>(|block| block as Arc<dyn Block>)
        .admit::<Chest>(|block| block as Arc<dyn Block>)
}

pub fn item_factory() -> FactoryRegistry {
    FactoryRegistry::new()
        .default_for::<Pickaxe, _>(|_| Pickaxe::default())
        .default_for::<Shovel, _>(|_| Shovel::default())
}

pub fn block_factory() -> FactoryRegistry {
    FactoryRegistry::new()
        .default_for::<Furnace, _>(|_| Furnace::default())
        .default_for::<Chest, _>(|_| Chest::default())
}

/// Records every registration it receives, optionally rejecting one id.
pub struct RecordingTarget<E: ?Sized> {
    pub entries: Vec<(String, Arc<E>)>,
    pub companions: Vec<(String, Option<TypeDescriptor>)>,
    pub records: Vec<(TypeDescriptor, String)>,
    pub reject: Option<&'static str>,
}

impl<E: ?Sized> Default for RecordingTarget<E> {
    fn default() -> Self {
        Self { entries: Vec::new(), companions: Vec::new(), records: Vec::new(), reject: None }
    }
}

impl<E: ?Sized> RecordingTarget<E> {
    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn record_ids(&self) -> Vec<(&'static str, &str)> {
        self.records.iter().map(|(record, id)| (record.name(), id.as_str())).collect()
    }

    fn check(&self, id: &str) -> Result<(), ExternalError> {
        if self.reject == Some(id) {
            return Err(format!("{id} is already taken").into());
        }
        Ok(())
    }
}

impl<E: ?Sized> EntryTarget<E> for RecordingTarget<E> {
    fn register_entry(&mut self, id: &str, entry: Arc<E>) -> Result<(), ExternalError> {
        self.check(id)?;
        self.entries.push((id.to_owned(), entry));
        Ok(())
    }
}

impl<E: ?Sized> CompoundTarget<E> for RecordingTarget<E> {
    fn register_compound(
        &mut self,
        id: &str,
        compound: Arc<E>,
        companion: Option<TypeDescriptor>,
    ) -> Result<(), ExternalError> {
        self.check(id)?;
        self.entries.push((id.to_owned(), compound));
        self.companions.push((id.to_owned(), companion));
        Ok(())
    }

    fn register_record(&mut self, record: TypeDescriptor, id: &str) -> Result<(), ExternalError> {
        self.records.push((record, id.to_owned()));
        Ok(())
    }
}
