#![allow(dead_code)]

use std::sync::Arc;

use game_content::{
    Content, ContentContext, CreatureBehavior, CreatureDef, ItemBehavior, ItemDef,
    UnlockDescriptor,
};
use game_core::{
    AbstractEntity, CreatureCatalog, CreatureTemplate, EntityId, EntityRecord, HostCatalog,
    PhysobType, RelationKind, Relationship, TypeIdentifier, World,
};

pub const RESERVED_OBJECTS: u32 = 50;

pub fn host() -> HostCatalog {
    HostCatalog::new(
        (0..RESERVED_OBJECTS).map(|i| format!("Builtin{i}")),
        ["Slugcat", "GreenLizard"],
        ["Rock", "Spear"],
    )
}

pub fn context() -> ContentContext {
    ContentContext::new(&host())
}

#[derive(Default)]
pub struct TestWorld {
    pub next_id: i32,
    pub spawned: Vec<(i32, AbstractEntity)>,
}

impl World for TestWorld {
    fn new_entity_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId::new(-1, self.next_id)
    }

    fn add_entity(&mut self, room: i32, entity: AbstractEntity) {
        self.spawned.push((room, entity));
    }
}

/// Stores the payload, or the unlock key when spawned from the sandbox.
pub struct Lantern;

impl ItemBehavior for Lantern {
    fn parse(
        &self,
        _world: &dyn World,
        record: &EntityRecord,
        unlock: Option<&UnlockDescriptor>,
    ) -> anyhow::Result<Option<AbstractEntity>> {
        let data = match unlock {
            Some(unlock) => unlock.key().to_string(),
            None => record.payload().to_string(),
        };
        Ok(Some(
            AbstractEntity::new(
                PhysobType::Object(record.type_id()),
                record.id(),
                record.pos(),
            )
            .with_data(data),
        ))
    }
}

/// Always fails to parse.
pub struct Broken;

impl ItemBehavior for Broken {
    fn parse(
        &self,
        _world: &dyn World,
        _record: &EntityRecord,
        _unlock: Option<&UnlockDescriptor>,
    ) -> anyhow::Result<Option<AbstractEntity>> {
        anyhow::bail!("broken parser")
    }
}

pub fn lantern() -> Arc<ItemDef> {
    Arc::new(
        ItemDef::new("glowlantern", Lantern)
            .with_unlock(UnlockDescriptor::new("GlowLantern", 0))
            .with_unlock(UnlockDescriptor::new("RedGlowLantern", 1)),
    )
}

/// Fears slugcats; variants descend from the base type.
pub struct Glowworm;

pub const FEAR: Relationship = Relationship::new(RelationKind::Afraid, 0.8);

impl CreatureBehavior for Glowworm {
    fn templates(
        &self,
        ty: TypeIdentifier,
        variants: &[TypeIdentifier],
    ) -> anyhow::Result<Vec<CreatureTemplate>> {
        let mut templates = vec![CreatureTemplate::new(ty, "Glowworm").with_ai(true)];
        templates.extend(
            variants
                .iter()
                .map(|&variant| CreatureTemplate::new(variant, "Variant").with_ancestor(ty)),
        );
        Ok(templates)
    }

    fn establish_relationships(
        &self,
        ty: TypeIdentifier,
        catalog: &mut CreatureCatalog,
    ) -> anyhow::Result<()> {
        catalog.set_relationship(ty, TypeIdentifier(0), FEAR)?;
        Ok(())
    }

    fn kills_matter(&self, _ty: TypeIdentifier, earns: &mut bool) {
        *earns = true;
    }
}

pub fn glowworm() -> Arc<CreatureDef> {
    Arc::new(
        CreatureDef::new("glowworm", Glowworm)
            .with_variant("redglowworm")
            .with_unlock(UnlockDescriptor::new("Glowworm", 0)),
    )
}

pub fn batch<const N: usize>(items: [Arc<dyn Content>; N]) -> Vec<Arc<dyn Content>> {
    items.into()
}
