use decl_derive::Holder;
use decl_domain::holder::Holder as _;
use decl_domain::tags::NoRecord;
use std::sync::Arc;

pub struct Furnace;
pub struct FurnaceItem;
pub struct CoreState;

#[derive(Holder, Default)]
pub struct Blocks {
    #[compound(
        name = "furnace",
        companion = FurnaceItem,
        record = NoRecord,
        sub_entry(name = "core", record = CoreState),
    )]
    pub furnace: Option<Arc<Furnace>>,

    #[property(category = "general")]
    pub limit: i32,

    #[holder(ignore)]
    pub skipped: Option<Arc<Furnace>>,

    hidden: u8,
}

fn main() {
    let mut blocks = Blocks::default();
    assert_eq!(blocks.fields().len(), 3);
    let _ = blocks.hidden;
}
