pub mod fixtures;

use decl_domain::descriptor::TypeDescriptor;
use decl_domain::features::FeatureKind;
use decl_registry::{AllowAll, Entry, Registrar, RegistryError};
use fixtures::*;
use std::sync::Arc;

#[test]
fn simple_entries_use_dotted_ids_and_display_names() {
    let mut tools = Tools::default();
    let mut target = RecordingTarget::default();

    let report = Registrar::new("mymod", AllowAll)
        .register_entries(&mut tools, &items(), &item_factory(), &mut target)
        .unwrap();

    assert_eq!(target.ids(), ["mymod.pickaxe", "mymod.shovel", "mymod.silent"]);
    assert_eq!(report.constructed, ["pickaxe", "shovel", "silent"]);

    let pickaxe = tools.pickaxe.as_ref().expect("pickaxe bound");
    assert_eq!(pickaxe.label.get().as_deref(), Some("mymod.pickaxe"));

    let shovel = tools.shovel.as_ref().expect("shovel bound");
    assert_eq!(shovel.label.get().as_deref(), Some("mymod.spade"));

    let silent = tools.silent.as_ref().expect("silent bound");
    assert_eq!(silent.label.get(), None);
}

#[test]
fn bound_field_and_registered_instance_are_the_same_object() {
    let mut tools = Tools::default();
    let mut target = RecordingTarget::default();

    Registrar::new("mymod", AllowAll)
        .register_entries(&mut tools, &items(), &item_factory(), &mut target)
        .unwrap();

    let (_, registered) = &target.entries[0];
    let bound = tools.pickaxe.clone().expect("pickaxe bound");
    assert!(std::ptr::addr_eq(Arc::as_ptr(registered), Arc::as_ptr(&bound)));
}

#[test]
fn ignored_untagged_and_private_fields_are_left_alone() {
    let mut tools = Tools::default();
    let mut target = RecordingTarget::default();

    let report = Registrar::new("mymod", AllowAll)
        .register_entries(&mut tools, &items(), &item_factory(), &mut target)
        .unwrap();

    assert!(tools.ignored.is_none());
    assert!(tools.untagged.is_none());
    assert!(tools.hidden().is_none());
    assert_eq!(report.ignored, ["ignored"]);
    assert_eq!(report.untagged, ["untagged"]);
    assert!(!target.ids().contains(&"mymod.ignored"));
    assert!(!target.ids().contains(&"mymod.hidden"));
}

#[test]
fn gate_sees_bare_names_and_entry_kind() {
    let mut tools = Tools::default();
    let mut target = RecordingTarget::default();
    let gate = |kind: FeatureKind, name: &str| kind == FeatureKind::Entry && name != "shovel";

    let report = Registrar::new("mymod", gate)
        .register_entries(&mut tools, &items(), &item_factory(), &mut target)
        .unwrap();

    assert!(tools.shovel.is_none());
    assert_eq!(report.disabled, ["shovel"]);
    assert_eq!(target.ids(), ["mymod.pickaxe", "mymod.silent"]);
}

#[test]
fn compound_registration_covers_records_hook_and_sub_entries() {
    let mut holder = Blocks::default();
    let mut target = RecordingTarget::default();

    Registrar::new("mymod", AllowAll)
        .register_compounds(&mut holder, &blocks(), &block_factory(), &mut target)
        .unwrap();

    assert_eq!(target.ids(), ["mymod_furnace", "mymod_chest"]);
    assert_eq!(
        target.companions,
        [
            ("mymod_furnace".to_owned(), Some(TypeDescriptor::of::<FurnaceItem>())),
            ("mymod_chest".to_owned(), None),
        ]
    );
    assert_eq!(
        target.records,
        [
            (TypeDescriptor::of::<FurnaceState>(), "mymod_furnace".to_owned()),
            (TypeDescriptor::of::<CoreState>(), "mymod_core".to_owned()),
        ]
    );

    let furnace = holder.furnace.as_ref().expect("furnace bound");
    assert_eq!(furnace.label.get().as_deref(), Some("mymod.furnace"));

    let setup = furnace.setup.lock().clone();
    assert_eq!(setup.len(), 1);
    assert!(setup[0].starts_with("mymod:furnace:"));
    assert!(setup[0].contains("FurnaceState"));
    assert!(setup[0].ends_with("FurnaceItem"));

    let chest = holder.chest.as_ref().expect("chest bound");
    assert_eq!(chest.label.get().as_deref(), Some("mymod.box"));
}

#[test]
fn disabled_compound_skips_sub_entries_too() {
    let mut holder = Blocks::default();
    let mut target = RecordingTarget::default();
    let gate = |kind: FeatureKind, name: &str| kind == FeatureKind::Compound && name != "furnace";

    let report = Registrar::new("mymod", gate)
        .register_compounds(&mut holder, &blocks(), &block_factory(), &mut target)
        .unwrap();

    assert!(holder.furnace.is_none());
    assert_eq!(report.disabled, ["furnace"]);
    assert_eq!(target.ids(), ["mymod_chest"]);
    assert!(target.records.is_empty());
}

#[test]
fn rejected_registration_stops_the_scan() {
    let mut tools = Tools::default();
    let mut target = RecordingTarget { reject: Some("mymod.shovel"), ..Default::default() };

    let result = Registrar::new("mymod", AllowAll).register_entries(
        &mut tools,
        &items(),
        &item_factory(),
        &mut target,
    );

    match result {
        Err(RegistryError::External { context, source }) => {
            assert_eq!(context.as_deref(), Some("registering entry mymod.shovel"));
            assert!(source.to_string().contains("already taken"));
        },
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(target.ids(), ["mymod.pickaxe"]);
    assert!(tools.silent.is_none());
}

#[test]
fn named_constructor_overrides_default() {
    let mut tools = Tools::default();
    let mut target = RecordingTarget::default();
    let factory = item_factory()
        .named("silent", || {
            let pickaxe = Pickaxe::default();
            pickaxe.set_display_name("forged");
            pickaxe
        })
        .with("shovel", |_, _| None);

    let report = Registrar::new("mymod", AllowAll)
        .register_entries(&mut tools, &items(), &factory, &mut target)
        .unwrap();

    let silent = tools.silent.as_ref().expect("silent bound");
    assert_eq!(silent.label.get().as_deref(), Some("forged"));
    assert!(tools.shovel.is_none());
    assert_eq!(report.declined, ["shovel"]);
    assert_eq!(target.ids(), ["mymod.pickaxe", "mymod.silent"]);
}
