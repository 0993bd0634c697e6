//! Per-entity gameplay properties the host asks content about.
//!
//! Every method receives the host's current answer and may overwrite it.
//! The defaults leave it unchanged.

use std::collections::BTreeMap;
use std::sync::Arc;

use game_core::{AbstractEntity, PhysobType, RegistrationError};

use crate::content::{Content, RegistryId, downcast};
use crate::creatures::CreatureDef;
use crate::hooks::{HookPoint, HookSet};
use crate::items::ItemDef;
use crate::registry::{RegisterCx, Registry};

/// How a player can hold an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Grabability {
    CantGrab,
    #[default]
    OneHand,
    BigOneHand,
    TwoHands,
    Drag,
}

#[allow(unused_variables)]
pub trait ItemProperties: Send + Sync {
    fn scav_collectible_score(&self, score: &mut i32) {}

    fn scav_weapon_pickup_score(&self, score: &mut i32) {}

    fn scav_weapon_use_score(&self, score: &mut i32) {}

    fn lethal_weapon(&self, lethal: &mut bool) {}

    fn grabability(&self, grabability: &mut Grabability) {}

    fn can_throw(&self, throwable: &mut bool) {}

    fn can_be_eaten(&self, edible: &mut bool) {}
}

#[derive(Clone)]
enum Source {
    Item(Arc<ItemDef>),
    Creature(Arc<CreatureDef>),
}

/// Resolves property overrides for content entities.
#[derive(Default)]
pub struct PropertyRegistry {
    sources: BTreeMap<PhysobType, Source>,
}

impl PropertyRegistry {
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Properties of `entity`, if its type is content-owned and overrides any.
    pub fn properties(&self, entity: &AbstractEntity) -> Option<Arc<dyn ItemProperties>> {
        match self.sources.get(&entity.kind)? {
            Source::Item(def) => def.behavior().properties(entity),
            Source::Creature(def) => def.behavior().properties(entity),
        }
    }
}

impl Registry for PropertyRegistry {
    fn id(&self) -> RegistryId {
        RegistryId::PROPERTIES
    }

    fn initialize(&mut self, hooks: &mut HookSet) {
        hooks.subscribe(HookPoint::ItemProperties, self.id());
    }

    fn process(
        &mut self,
        content: &[Arc<dyn Content>],
        _cx: &mut RegisterCx<'_>,
    ) -> Result<(), RegistrationError> {
        let mut resolved = Vec::with_capacity(content.len());
        for item in content {
            let (ty, source) = if let Some(def) = downcast::<ItemDef>(item) {
                (def.ty(), Source::Item(def))
            } else if let Some(def) = downcast::<CreatureDef>(item) {
                (def.ty(), Source::Creature(def))
            } else {
                continue;
            };

            let ty = ty.ok_or_else(|| RegistrationError::Malformed {
                content: item.id().to_string(),
                reason: "properties requested before a type was allocated".into(),
            })?;
            resolved.push((ty, source));
        }
        self.sources.extend(resolved);
        Ok(())
    }
}
