mod common;

use std::sync::Arc;

use common::*;
use game_content::{
    HostUnlocks, ItemDef, KillScore, NoHostUnlocks, PlacedIcon, SpawnOutcome, TokenGate,
    UnlockDescriptor, Visibility,
};
use game_core::{EntityId, PhysobType, SaveSlot, TypeIdentifier, WorldCoordinate};

fn registered() -> game_content::ContentContext {
    let mut cx = context();
    cx.register(&batch([lantern(), glowworm()])).unwrap();
    cx
}

#[test]
fn unlock_lookup_and_reverse_lookup_are_inverse() {
    let cx = registered();
    let host = NoHostUnlocks;

    assert_eq!(cx.sandbox().unlocks().len(), 3);
    for unlock in cx.sandbox().unlocks() {
        let symbol = cx.symbol_for_unlock(unlock.id, &host).unwrap();
        assert_eq!(symbol, (unlock.owner, unlock.key()));
        assert_eq!(cx.unlock_for_symbol(symbol.0, symbol.1, &host), Some(unlock.id));
        assert_eq!(cx.lookup_unlock(symbol.0, symbol.1).map(|u| u.id), Some(unlock.id));
    }
}

#[test]
fn unlock_ids_follow_host_unlocks() {
    let cx = registered();
    let ids: Vec<_> = cx.types().unlocks.content_types().collect();

    assert_eq!(
        ids,
        [
            (TypeIdentifier(2), "GlowLantern"),
            (TypeIdentifier(3), "RedGlowLantern"),
            (TypeIdentifier(4), "Glowworm"),
        ]
    );
}

#[test]
fn missing_key_resolves_to_nothing() {
    let cx = registered();
    let lantern = PhysobType::Object(TypeIdentifier(RESERVED_OBJECTS));

    assert!(cx.lookup_unlock(lantern, 7).is_none());
    assert_eq!(cx.unlock_for_symbol(lantern, 7, &NoHostUnlocks), None);
}

struct Vanilla;

impl HostUnlocks for Vanilla {
    fn unlock_for_symbol(&self, ty: PhysobType, key: i32) -> Option<TypeIdentifier> {
        (ty == PhysobType::Object(TypeIdentifier(0)) && key == 0).then_some(TypeIdentifier(0))
    }

    fn symbol_for_unlock(&self, unlock: TypeIdentifier) -> Option<(PhysobType, i32)> {
        (unlock == TypeIdentifier(0)).then_some((PhysobType::Object(TypeIdentifier(0)), 0))
    }

    fn is_unlocked(&self, unlock: TypeIdentifier, _slot: &SaveSlot) -> bool {
        unlock == TypeIdentifier(0)
    }
}

#[test]
fn host_unlocks_stay_resolvable() {
    let cx = registered();
    let rock = PhysobType::Object(TypeIdentifier(0));

    assert_eq!(cx.symbol_for_unlock(TypeIdentifier(0), &Vanilla), Some((rock, 0)));
    assert_eq!(cx.unlock_for_symbol(rock, 0, &Vanilla), Some(TypeIdentifier(0)));
    assert!(cx.is_unlocked(TypeIdentifier(0), &SaveSlot::default(), &Vanilla));
    assert!(!cx.is_unlocked(TypeIdentifier(1), &SaveSlot::default(), &Vanilla));
}

#[test]
fn gated_unlocks_follow_the_save_slot() {
    let mut cx = context();
    cx.register(&batch([Arc::new(
        ItemDef::new("glowstick", Lantern)
            .with_unlock(
                UnlockDescriptor::new("GlowStick", 0).with_gate(TokenGate::new("glowstick")),
            )
            .with_unlock(
                UnlockDescriptor::new("BlueGlowStick", 1)
                    .with_gate(TokenGate::new("blue").hidden_until_unlocked()),
            ),
    )]))
    .unwrap();

    let stick = PhysobType::Object(TypeIdentifier(RESERVED_OBJECTS));
    let plain = cx.lookup_unlock(stick, 0).unwrap().id;
    let blue = cx.lookup_unlock(stick, 1).unwrap().id;

    let slot = SaveSlot::default();
    assert!(!cx.is_unlocked(plain, &slot, &NoHostUnlocks));
    assert_eq!(cx.visible_unlocks(&slot), [(plain, Visibility::Locked)]);

    let slot = slot.with_unlocked("glowstick").with_unlocked("blue");
    assert!(cx.is_unlocked(plain, &slot, &NoHostUnlocks));
    assert_eq!(
        cx.visible_unlocks(&slot),
        [(plain, Visibility::Unlocked), (blue, Visibility::Unlocked)]
    );
}

#[test]
fn duplicate_keys_under_one_type_are_rejected() {
    let mut cx = context();
    let err = cx
        .register(&batch([Arc::new(
            ItemDef::new("glowstick", Lantern)
                .with_unlock(UnlockDescriptor::new("GlowStick", 0))
                .with_unlock(UnlockDescriptor::new("OtherGlowStick", 0)),
        )]))
        .unwrap_err();

    assert_eq!(
        err,
        game_core::RegistrationError::DuplicateUnlockKey {
            content: "glowstick".into(),
            key: 0
        }
    );
    assert!(cx.items().is_empty());
}

#[test]
fn only_creature_unlocks_report_kill_scores() {
    let mut cx = context();
    cx.register(&batch([
        lantern(),
        Arc::new(
            game_content::CreatureDef::new("glowworm", Glowworm).with_unlock(
                UnlockDescriptor::new("Glowworm", 0).with_kill_score(KillScore::new(3, false)),
            ),
        ),
    ]))
    .unwrap();

    assert_eq!(
        cx.default_kill_scores(),
        [(TypeIdentifier(4), KillScore::new(3, false))]
    );
}

#[test]
fn spawning_an_item_uses_tile_coordinates_and_unlock_key() {
    let cx = registered();
    let mut world = TestWorld::default();
    let ty = PhysobType::Object(TypeIdentifier(RESERVED_OBJECTS));

    let outcome = cx.spawn(&mut world, &PlacedIcon::new(ty, 1, (205.0, 49.0)));

    assert_eq!(outcome, SpawnOutcome::Spawned(EntityId::new(-1, 1)));
    let (room, entity) = &world.spawned[0];
    assert_eq!(*room, 0);
    assert_eq!(entity.pos, WorldCoordinate::new(0, 10, 2, -1));
    assert_eq!(entity.data, "1");
}

#[test]
fn spawning_a_creature_appends_sandbox_data() {
    let cx = registered();
    let mut world = TestWorld::default();
    let ty = cx.creatures().iter().next().unwrap().ty().unwrap();

    let placed =
        PlacedIcon::new(ty, 0, (0.0, 0.0)).carried_over(EntityId::new(3, 9), "HP<cC>1<cB>");
    let outcome = cx.spawn(&mut world, &placed);

    assert_eq!(outcome, SpawnOutcome::Spawned(EntityId::new(3, 9)));
    assert_eq!(world.spawned[0].1.data, "HP<cC>1<cB>SandboxData<cC>0<cB>");
}

#[test]
fn unknown_key_and_failing_parser_spawn_nothing() {
    let mut cx = context();
    cx.register(&batch([
        lantern(),
        Arc::new(ItemDef::new("cursed", Broken).with_unlock(UnlockDescriptor::new("Cursed", 0))),
    ]))
    .unwrap();
    let mut world = TestWorld::default();

    let lantern = PhysobType::Object(TypeIdentifier(RESERVED_OBJECTS));
    let cursed = PhysobType::Object(TypeIdentifier(RESERVED_OBJECTS + 1));
    assert_eq!(
        cx.spawn(&mut world, &PlacedIcon::new(lantern, 9, (0.0, 0.0))),
        SpawnOutcome::Skipped
    );
    assert_eq!(
        cx.spawn(&mut world, &PlacedIcon::new(cursed, 0, (0.0, 0.0))),
        SpawnOutcome::Skipped
    );
    assert!(world.spawned.is_empty());
}

#[test]
fn host_types_fall_through_to_host_spawn() {
    let cx = registered();
    let mut world = TestWorld::default();
    let rock = PhysobType::Object(TypeIdentifier(0));

    assert_eq!(
        cx.spawn(&mut world, &PlacedIcon::new(rock, 0, (0.0, 0.0))),
        SpawnOutcome::Fallthrough
    );
}
