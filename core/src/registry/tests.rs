//! Tests for debug registry

#![cfg(test)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::{DebugRegistry, LifecycleEvent};
use crate::attributes::{DebugClass, DebugMethod, DebugProperty};
use crate::catalog::{
    FieldDescriptor, MethodDescriptor, ModuleTypes, ParameterDescriptor, PropertyDescriptor,
    StaticCatalog, TypeCatalog, TypeDescriptor,
};
use crate::config::RegistryConfig;
use crate::error::AccessError;
use crate::model::MemberKind;
use crate::types::{DebugData, DebugValue};

struct Sword {
    damage: i32,
    sharpness: f32,
}

struct Shield {
    block: f32,
}

struct Scenery;

struct Unrelated {
    hidden: bool,
}

fn sword_damage(sword: &Sword) -> i32 {
    sword.damage
}

fn set_sword_damage(sword: &mut Sword, damage: i32) {
    sword.damage = damage;
}

fn sword_swing(sword: &mut Sword, args: &[DebugValue]) -> Result<DebugValue, AccessError> {
    let times = crate::accessors::argument::<i32>(args, 0)?;
    Ok((sword.damage * times).to_debug_value())
}

fn sword_type() -> TypeDescriptor {
    TypeDescriptor::of::<Sword>("Sword")
        .with_tag(DebugClass::new().category("Combat").order(2))
        .with_property(
            PropertyDescriptor::new::<Sword, i32>("damage")
                .with_getter::<Sword, i32>(sword_damage)
                .with_setter::<Sword, i32>(set_sword_damage)
                .with_tag(DebugProperty::new().read_only()),
        )
        .with_field(
            FieldDescriptor::new::<Sword, f32>("sharpness", |s| &s.sharpness, |s| {
                &mut s.sharpness
            })
            .with_tag(DebugProperty::new().display_name("Edge").category("Stats")),
        )
        .with_method(
            MethodDescriptor::new::<Sword, i32>("swing")
                .with_parameter(ParameterDescriptor::new::<i32>("times").with_default(2i32))
                .with_invoker::<Sword>(sword_swing)
                .with_tag(DebugMethod::new()),
        )
}

fn shield_type() -> TypeDescriptor {
    TypeDescriptor::of::<Shield>("Shield")
        .with_tag(DebugClass::new().category("Combat").order(1))
        .with_field(
            FieldDescriptor::new::<Shield, f32>("block", |s| &s.block, |s| &mut s.block)
                .with_tag(DebugProperty::new()),
        )
}

fn scenery_type() -> TypeDescriptor {
    TypeDescriptor::of::<Scenery>("Scenery").with_tag(DebugClass::new().display_name("   "))
}

fn unrelated_type() -> TypeDescriptor {
    TypeDescriptor::of::<Unrelated>("Unrelated").with_field(
        FieldDescriptor::new::<Unrelated, bool>("hidden", |u| &u.hidden, |u| &mut u.hidden)
            .with_tag(DebugProperty::new()),
    )
}

fn game_module() -> ModuleTypes {
    ModuleTypes::loaded(
        "game",
        vec![sword_type(), shield_type(), scenery_type(), unrelated_type()],
    )
}

fn names(registry: &DebugRegistry) -> Vec<String> {
    registry
        .classes()
        .iter()
        .map(|class| class.display_name.clone())
        .collect()
}

#[test]
fn test_registry_ordering() {
    let registry = DebugRegistry::new(StaticCatalog::new(vec![game_module()]));
    assert_eq!(names(&registry), ["Scenery", "Shield", "Sword"]);
}

#[test]
fn test_untagged_types_skipped() {
    let registry = DebugRegistry::new(StaticCatalog::new(vec![game_module()]));
    assert!(registry.class_of::<Unrelated>().is_none());
}

#[test]
fn test_abstract_types_skipped() {
    let catalog = StaticCatalog::new(vec![ModuleTypes::loaded(
        "game",
        vec![shield_type().abstract_type()],
    )]);
    let registry = DebugRegistry::new(catalog);
    assert!(registry.classes().is_empty());
}

#[test]
fn test_display_name_fallback() {
    let registry = DebugRegistry::new(StaticCatalog::new(vec![game_module()]));
    let scenery = registry.class_of::<Scenery>().unwrap();
    assert_eq!(scenery.display_name, "Scenery");
    assert_eq!(scenery.category, None);

    let sword = registry.class_of::<Sword>().unwrap();
    let edge = sword.member("sharpness", MemberKind::Field).unwrap();
    assert_eq!(edge.display_name, "Edge");
    assert_eq!(edge.category.as_deref(), Some("Stats"));
}

#[test]
fn test_read_only_property_has_no_setter() {
    let registry = DebugRegistry::new(StaticCatalog::new(vec![game_module()]));
    let sword = registry.class_of::<Sword>().unwrap();
    let damage = sword.member("damage", MemberKind::Property).unwrap();

    assert!(damage.read_only);
    assert!(damage.is_readable());
    assert!(!damage.is_writable());

    let mut instance = Sword {
        damage: 4,
        sharpness: 0.5,
    };
    assert_eq!(damage.get(&instance), Ok(DebugValue::I32(4)));
    assert_eq!(
        damage.set(&mut instance, DebugValue::I32(9)),
        Err(AccessError::NotWritable("damage".to_string()))
    );
    assert_eq!(instance.damage, 4);
}

#[test]
fn test_property_without_setter_is_read_only() {
    let catalog = StaticCatalog::new(vec![ModuleTypes::loaded(
        "game",
        vec![
            TypeDescriptor::of::<Sword>("Sword")
                .with_tag(DebugClass::new())
                .with_property(
                    PropertyDescriptor::new::<Sword, i32>("damage")
                        .with_getter::<Sword, i32>(sword_damage)
                        .with_tag(DebugProperty::new()),
                ),
        ],
    )]);
    let registry = DebugRegistry::new(catalog);
    let sword = registry.class_of::<Sword>().unwrap();
    assert!(sword.members[0].read_only);
}

#[test]
fn test_init_only_field_is_read_only() {
    let catalog = StaticCatalog::new(vec![ModuleTypes::loaded(
        "game",
        vec![
            TypeDescriptor::of::<Shield>("Shield")
                .with_tag(DebugClass::new())
                .with_field(
                    FieldDescriptor::new::<Shield, f32>("block", |s| &s.block, |s| &mut s.block)
                        .with_tag(DebugProperty::new())
                        .init_only(),
                ),
        ],
    )]);
    let registry = DebugRegistry::new(catalog);
    let block = &registry.class_of::<Shield>().unwrap().members[0];
    assert!(block.read_only);
    assert!(!block.is_writable());
    assert!(block.is_readable());
}

#[test]
fn test_method_member() {
    let registry = DebugRegistry::new(StaticCatalog::new(vec![game_module()]));
    let sword = registry.class_of::<Sword>().unwrap();
    let swing = sword.member("swing", MemberKind::Method).unwrap();

    assert!(swing.is_invokable());
    assert_eq!(swing.parameters().len(), 1);
    assert_eq!(swing.default_arguments(), vec![DebugValue::I32(2)]);

    let mut instance = Sword {
        damage: 3,
        sharpness: 0.0,
    };
    let args = swing.default_arguments();
    assert_eq!(swing.invoke(&mut instance, &args), Ok(DebugValue::I32(6)));
}

#[test]
fn test_member_ordering() {
    let registry = DebugRegistry::new(StaticCatalog::new(vec![game_module()]));
    let sword = registry.class_of::<Sword>().unwrap();
    let order: Vec<&str> = sword.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(order, ["damage", "swing", "sharpness"]);
}

mod north {
    pub struct Crate;
}

mod south {
    pub struct Crate;
}

fn crate_paths(modules: Vec<ModuleTypes>) -> Vec<&'static str> {
    DebugRegistry::new(StaticCatalog::new(modules))
        .classes()
        .iter()
        .map(|class| class.type_key.path())
        .collect()
}

#[test]
fn test_class_ties_ignore_discovery_order() {
    let north = || TypeDescriptor::of::<north::Crate>("Crate").with_tag(DebugClass::new());
    let south = || TypeDescriptor::of::<south::Crate>("Crate").with_tag(DebugClass::new());

    let forward = crate_paths(vec![
        ModuleTypes::loaded("north", vec![north()]),
        ModuleTypes::loaded("south", vec![south()]),
    ]);
    let reversed = crate_paths(vec![
        ModuleTypes::loaded("south", vec![south()]),
        ModuleTypes::loaded("north", vec![north()]),
    ]);

    assert_eq!(forward, reversed);
    assert_eq!(
        forward,
        [
            std::any::type_name::<north::Crate>(),
            std::any::type_name::<south::Crate>()
        ]
    );
}

#[test]
fn test_member_ties_ignore_declaration_order() {
    let block = || {
        FieldDescriptor::new::<Shield, f32>("block", |s| &s.block, |s| &mut s.block)
            .with_tag(DebugProperty::new().display_name("Guard"))
    };
    let parry = || {
        FieldDescriptor::new::<Shield, f32>("parry", |s| &s.block, |s| &mut s.block)
            .with_tag(DebugProperty::new().display_name("Guard"))
    };
    let member_names = |ty: TypeDescriptor| -> Vec<String> {
        let registry =
            DebugRegistry::new(StaticCatalog::new(vec![ModuleTypes::loaded("game", vec![ty])]));
        let shield = registry.class_of::<Shield>().unwrap();
        shield.members.iter().map(|m| m.name.clone()).collect()
    };

    let shield = || TypeDescriptor::of::<Shield>("Shield").with_tag(DebugClass::new());
    let forward = member_names(shield().with_field(block()).with_field(parry()));
    let reversed = member_names(shield().with_field(parry()).with_field(block()));

    assert_eq!(forward, reversed);
    assert_eq!(forward, ["block", "parry"]);
}

#[test]
fn test_member_without_declaring_type_skipped() {
    let catalog = StaticCatalog::new(vec![ModuleTypes::loaded(
        "game",
        vec![
            shield_type().with_field(
                FieldDescriptor::new::<Shield, f32>("ghost", |s| &s.block, |s| &mut s.block)
                    .with_tag(DebugProperty::new())
                    .without_declaring_type(),
            ),
        ],
    )]);
    let registry = DebugRegistry::new(catalog);
    let shield = registry.class_of::<Shield>().unwrap();
    assert_eq!(shield.members.len(), 1);
    assert_eq!(shield.members[0].name, "block");
}

#[test]
fn test_member_from_other_type_skipped() {
    let catalog = StaticCatalog::new(vec![ModuleTypes::loaded(
        "game",
        vec![shield_type().with_field(
            FieldDescriptor::new::<Unrelated, bool>("hidden", |u| &u.hidden, |u| &mut u.hidden)
                .with_tag(DebugProperty::new()),
        )],
    )]);
    let registry = DebugRegistry::new(catalog);
    assert_eq!(registry.class_of::<Shield>().unwrap().members.len(), 1);
}

#[test]
fn test_duplicate_member_skipped() {
    let catalog = StaticCatalog::new(vec![ModuleTypes::loaded(
        "game",
        vec![shield_type().with_field(
            FieldDescriptor::new::<Shield, f32>("block", |s| &s.block, |s| &mut s.block)
                .with_tag(DebugProperty::new().order(-5)),
        )],
    )]);
    let registry = DebugRegistry::new(catalog);
    let shield = registry.class_of::<Shield>().unwrap();
    assert_eq!(shield.members.len(), 1);
    assert_eq!(shield.members[0].order, 0);
}

#[test]
fn test_partial_module_contributes_loaded_types() {
    let catalog = StaticCatalog::new(vec![
        ModuleTypes::partial("broken", vec![shield_type()], "missing dependency"),
        ModuleTypes::loaded("game", vec![scenery_type()]),
    ]);
    let registry = DebugRegistry::new(catalog);
    assert_eq!(names(&registry), ["Scenery", "Shield"]);
}

#[test]
fn test_lazy_scan_and_invalidate() {
    let registry = DebugRegistry::new(StaticCatalog::new(vec![game_module()]));
    assert!(!registry.is_valid());
    assert_eq!(registry.generation(), 0);

    registry.classes();
    registry.classes();
    assert!(registry.is_valid());
    assert_eq!(registry.generation(), 1);

    registry.invalidate();
    assert!(!registry.is_valid());
    assert_eq!(registry.generation(), 1);

    assert_eq!(registry.classes().len(), 3);
    assert_eq!(registry.generation(), 2);
}

/// Catalog whose module list can change between scans
#[derive(Clone, Default)]
struct SharedCatalog(Arc<StaticCatalog>);

impl TypeCatalog for SharedCatalog {
    fn modules(&self) -> Vec<ModuleTypes> {
        self.0.modules()
    }
}

#[test]
fn test_rescan_reflects_current_modules() {
    let catalog = SharedCatalog::default();
    catalog
        .0
        .load_module(ModuleTypes::loaded("game", vec![shield_type()]));

    let registry = DebugRegistry::new(catalog.clone());
    assert_eq!(names(&registry), ["Shield"]);

    catalog
        .0
        .load_module(ModuleTypes::loaded("scenery", vec![scenery_type()]));
    assert_eq!(names(&registry), ["Shield"]);

    registry.invalidate();
    assert_eq!(names(&registry), ["Scenery", "Shield"]);

    catalog.0.unload_module("game");
    registry.refresh();
    assert_eq!(names(&registry), ["Scenery"]);
}

#[test]
fn test_listeners_notified_in_order() {
    let registry = DebugRegistry::new(StaticCatalog::new(vec![game_module()]));
    let calls = Arc::new(Mutex::new(Vec::new()));

    let first = calls.clone();
    registry.subscribe(move |update| first.lock().push(("first", update.generation)));
    let second = calls.clone();
    registry.subscribe(move |update| second.lock().push(("second", update.generation)));

    registry.refresh();
    assert_eq!(*calls.lock(), [("first", 1), ("second", 1)]);

    // Invalidate never notifies; the rebuild on the next read does
    registry.invalidate();
    assert_eq!(calls.lock().len(), 2);
    registry.classes();
    assert_eq!(calls.lock().len(), 4);

    // A valid cache is served without a rebuild
    registry.classes();
    assert_eq!(calls.lock().len(), 4);
}

#[test]
fn test_snapshot_pairs_generation_with_classes() {
    let registry = DebugRegistry::new(StaticCatalog::new(vec![game_module()]));

    let first = registry.snapshot();
    assert_eq!(first.generation, 1);
    assert_eq!(first.classes.len(), 3);

    registry.refresh();
    let second = registry.snapshot();
    assert_eq!(second.generation, 2);
    assert!(!Arc::ptr_eq(&first.classes, &second.classes));
    assert!(Arc::ptr_eq(&second.classes, &registry.classes()));
}

#[test]
fn test_superseded_update_not_delivered() {
    let registry = DebugRegistry::new(StaticCatalog::new(vec![game_module()]));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let recorder = seen.clone();
    registry.subscribe(move |update| recorder.lock().push(update.generation));

    let stale = registry.snapshot();
    registry.refresh();
    assert_eq!(*seen.lock(), [1, 2]);

    // A slower rebuild finishing late must not roll listeners back
    registry.notify(&stale);
    assert_eq!(*seen.lock(), [1, 2]);
}

#[test]
fn test_unsubscribe() {
    let registry = DebugRegistry::new(StaticCatalog::new(vec![game_module()]));
    let count = Arc::new(AtomicUsize::new(0));

    let counter = count.clone();
    let id = registry.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    registry.refresh();
    assert!(registry.unsubscribe(id));
    assert!(!registry.unsubscribe(id));
    registry.refresh();

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_listener_can_read_registry() {
    let registry = Arc::new(DebugRegistry::new(StaticCatalog::new(vec![game_module()])));
    let seen = Arc::new(AtomicUsize::new(0));

    let inner = registry.clone();
    let counter = seen.clone();
    registry.subscribe(move |update| {
        assert_eq!(inner.classes().len(), update.classes.len());
        counter.store(update.classes.len(), Ordering::SeqCst);
    });

    registry.refresh();
    assert_eq!(seen.load(Ordering::SeqCst), 3);
}

#[test]
fn test_concurrent_reads_see_complete_snapshots() {
    let registry = Arc::new(DebugRegistry::new(StaticCatalog::new(vec![game_module()])));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    if i % 2 == 0 {
                        registry.refresh();
                    } else {
                        registry.invalidate();
                    }
                    assert_eq!(registry.classes().len(), 3);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert!(registry.generation() >= 200);
}

#[test]
fn test_lifecycle_policy() {
    let registry = DebugRegistry::new(StaticCatalog::new(vec![game_module()]));

    assert!(registry.on_lifecycle(LifecycleEvent::ModulesReloaded));
    assert!(registry.on_lifecycle(LifecycleEvent::EnteredPlayMode));
    assert!(registry.on_lifecycle(LifecycleEvent::ExitingPlayMode));
    assert!(registry.on_lifecycle(LifecycleEvent::EnteredEditMode));
    assert!(!registry.on_lifecycle(LifecycleEvent::ExitingEditMode));
    assert_eq!(registry.generation(), 4);
}

#[test]
fn test_lifecycle_policy_disabled() {
    let config = RegistryConfig {
        refresh_on_reload: true,
        refresh_on_play_mode: false,
    };
    let registry = DebugRegistry::with_config(StaticCatalog::new(vec![game_module()]), config);

    assert!(!registry.on_lifecycle(LifecycleEvent::EnteredPlayMode));
    assert!(registry.on_lifecycle(LifecycleEvent::ModulesReloaded));
    assert_eq!(registry.generation(), 1);
}
