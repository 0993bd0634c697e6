mod common;

use std::sync::Arc;

use common::*;
use game_content::{Grabability, ItemBehavior, ItemDef, ItemProperties, UnlockDescriptor};
use game_core::{
    AbstractEntity, EntityId, EntityRecord, PhysobType, TypeIdentifier, World, WorldCoordinate,
};

/// Heavy and dangerous, held with both hands.
struct TorchProperties;

impl ItemProperties for TorchProperties {
    fn grabability(&self, grabability: &mut Grabability) {
        *grabability = Grabability::TwoHands;
    }

    fn lethal_weapon(&self, lethal: &mut bool) {
        *lethal = true;
    }
}

struct Torch;

impl ItemBehavior for Torch {
    fn parse(
        &self,
        world: &dyn World,
        record: &EntityRecord,
        unlock: Option<&UnlockDescriptor>,
    ) -> anyhow::Result<Option<AbstractEntity>> {
        Lantern.parse(world, record, unlock)
    }

    fn properties(&self, _entity: &AbstractEntity) -> Option<Arc<dyn ItemProperties>> {
        Some(Arc::new(TorchProperties))
    }
}

fn object(ty: u32) -> AbstractEntity {
    AbstractEntity::new(
        PhysobType::Object(TypeIdentifier(ty)),
        EntityId::new(0, 1),
        WorldCoordinate::new(0, 0, 0, 0),
    )
}

#[test]
fn content_items_answer_with_their_own_properties() {
    let mut cx = context();
    cx.register(&batch([Arc::new(ItemDef::new("torch", Torch)), lantern()]))
        .unwrap();
    let torch = object(RESERVED_OBJECTS);

    let properties = cx.item_properties(&torch).unwrap();
    let mut grabability = Grabability::default();
    let mut lethal = false;
    let mut throwable = true;
    properties.grabability(&mut grabability);
    properties.lethal_weapon(&mut lethal);
    properties.can_throw(&mut throwable);

    assert_eq!(grabability, Grabability::TwoHands);
    assert!(lethal);
    // Untouched answers keep the host's value.
    assert!(throwable);
}

#[test]
fn items_without_overrides_and_host_items_have_none() {
    let mut cx = context();
    cx.register(&batch([Arc::new(ItemDef::new("torch", Torch)), lantern()]))
        .unwrap();

    assert!(cx.item_properties(&object(RESERVED_OBJECTS + 1)).is_none());
    assert!(cx.item_properties(&object(0)).is_none());
    assert_eq!(cx.properties().len(), 2);
}

#[test]
fn nothing_is_answered_before_registration() {
    let cx = context();

    assert!(cx.item_properties(&object(RESERVED_OBJECTS)).is_none());
}
