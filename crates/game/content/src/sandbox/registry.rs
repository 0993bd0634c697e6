use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use game_core::{
    AbstractEntity, CreatureCatalog, EntityRecord, PhysobType, RegistrationError, SaveSlot,
    TypeIdentifier, TypeTables, World, WorldCoordinate,
};
use tracing::{debug, error};

use crate::content::{Content, RegistryId, downcast};
use crate::creatures::CreatureDef;
use crate::hooks::{HookPoint, HookSet};
use crate::items::ItemDef;
use crate::registry::{RegisterCx, Registry};
use crate::sandbox::{KillScore, PlacedIcon, SpawnOutcome, Unlock, UnlockDescriptor, Visibility};

/// Editor pixels per world tile.
const TILE_SIZE: f32 = 20.0;

/// A content type that can be placed from the sandbox.
#[derive(Clone, Debug)]
pub enum SandboxDef {
    Item(Arc<ItemDef>),
    Creature(Arc<CreatureDef>),
}

impl SandboxDef {
    fn from_content(content: &Arc<dyn Content>) -> Option<Self> {
        downcast::<ItemDef>(content)
            .map(Self::Item)
            .or_else(|| downcast::<CreatureDef>(content).map(Self::Creature))
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Item(def) => def.id(),
            Self::Creature(def) => def.id(),
        }
    }

    pub fn ty(&self) -> Option<PhysobType> {
        match self {
            Self::Item(def) => def.ty(),
            Self::Creature(def) => def.ty(),
        }
    }

    pub fn unlocks(&self) -> &[UnlockDescriptor] {
        match self {
            Self::Item(def) => def.unlocks(),
            Self::Creature(def) => def.unlocks(),
        }
    }

    /// Builds the entity for a placed icon.
    ///
    /// Creatures receive the unlock key as a `SandboxData` section appended
    /// to their state payload.
    fn parse_from_sandbox(
        &self,
        world: &dyn World,
        record: &EntityRecord,
        unlock: &UnlockDescriptor,
    ) -> anyhow::Result<Option<AbstractEntity>> {
        match self {
            Self::Item(def) => def.behavior().parse(world, record, Some(unlock)),
            Self::Creature(def) => {
                let state = format!("{}SandboxData<cC>{}<cB>", record.payload(), unlock.key());
                let record = record.with_payload(state)?;
                let entity = def.behavior().parse(world, &record, Some(unlock))?;
                Ok(entity.map(|entity| AbstractEntity {
                    pos: record.pos(),
                    ..entity
                }))
            }
        }
    }
}

/// Indexes content unlocks and spawns content entities in the sandbox.
#[derive(Debug, Default)]
pub struct SandboxRegistry {
    handlers: BTreeMap<PhysobType, SandboxDef>,
    unlocks: Vec<Unlock>,
    by_symbol: HashMap<(PhysobType, i32), usize>,
    by_id: HashMap<TypeIdentifier, usize>,
}

impl SandboxRegistry {
    /// Registered unlocks in allocation order.
    pub fn unlocks(&self) -> &[Unlock] {
        &self.unlocks
    }

    pub fn handler(&self, ty: PhysobType) -> Option<&SandboxDef> {
        self.handlers.get(&ty)
    }

    /// The unlock of `ty` whose variant key is `key`.
    pub fn lookup(&self, ty: PhysobType, key: i32) -> Option<&Unlock> {
        self.by_symbol.get(&(ty, key)).map(|&i| &self.unlocks[i])
    }

    pub fn unlock(&self, id: TypeIdentifier) -> Option<&Unlock> {
        self.by_id.get(&id).map(|&i| &self.unlocks[i])
    }

    pub fn unlock_for_symbol(&self, ty: PhysobType, key: i32) -> Option<TypeIdentifier> {
        self.lookup(ty, key).map(|unlock| unlock.id)
    }

    pub fn symbol_for_unlock(&self, id: TypeIdentifier) -> Option<(PhysobType, i32)> {
        self.unlock(id).map(|unlock| (unlock.owner, unlock.key()))
    }

    /// `None` when `id` is not a content unlock.
    pub fn is_unlocked(&self, id: TypeIdentifier, slot: &SaveSlot) -> Option<bool> {
        self.unlock(id).map(|unlock| unlock.is_unlocked(slot))
    }

    /// How every content unlock appears for `slot`, hidden ones excluded.
    pub fn visible_unlocks(&self, slot: &SaveSlot) -> Vec<(TypeIdentifier, Visibility)> {
        self.unlocks
            .iter()
            .map(|unlock| (unlock.id, unlock.descriptor.visibility(slot)))
            .filter(|(_, visibility)| *visibility != Visibility::Hidden)
            .collect()
    }

    /// Kill scores of creature unlocks.
    pub fn default_kill_scores(&self) -> Vec<(TypeIdentifier, KillScore)> {
        self.unlocks
            .iter()
            .filter(|unlock| matches!(unlock.owner, PhysobType::Creature(_)))
            .map(|unlock| (unlock.id, unlock.descriptor.kill_score()))
            .collect()
    }

    /// Spawns a placed icon into room 0 of `world`.
    pub fn spawn(&self, world: &mut dyn World, placed: &PlacedIcon) -> SpawnOutcome {
        let Some(handler) = self.handlers.get(&placed.ty) else {
            return SpawnOutcome::Fallthrough;
        };
        let Some(unlock) = self.lookup(placed.ty, placed.key) else {
            error!(
                target: "game_content::sandbox",
                content = handler.id(),
                key = placed.key,
                "no sandbox unlock with this key"
            );
            return SpawnOutcome::Skipped;
        };

        let id = match placed.id {
            Some(id) => id,
            None => world.new_entity_id(),
        };
        let pos = WorldCoordinate::new(
            0,
            (placed.pos.0 / TILE_SIZE).round() as i32,
            (placed.pos.1 / TILE_SIZE).round() as i32,
            -1,
        );
        let payload = match &placed.saved_state {
            Some(state) if matches!(placed.ty, PhysobType::Creature(_)) => state.as_str(),
            _ => "",
        };
        let record = match EntityRecord::new(placed.ty.id(), id, pos, payload) {
            Ok(record) => record,
            Err(err) => {
                error!(
                    target: "game_content::sandbox",
                    content = handler.id(),
                    error = %err,
                    "carried-over state is not a valid payload"
                );
                return SpawnOutcome::Skipped;
            }
        };

        match handler.parse_from_sandbox(&*world, &record, &unlock.descriptor) {
            Ok(Some(entity)) => {
                let id = entity.id;
                world.add_entity(0, entity);
                debug!(
                    target: "game_content::sandbox",
                    unlock = %unlock.id,
                    %id,
                    "sandbox entity spawned"
                );
                SpawnOutcome::Spawned(id)
            }
            Ok(None) => {
                error!(
                    target: "game_content::sandbox",
                    content = handler.id(),
                    unlock = unlock.descriptor.name(),
                    "sandbox parser returned nothing"
                );
                SpawnOutcome::Skipped
            }
            Err(err) => {
                error!(
                    target: "game_content::sandbox",
                    content = handler.id(),
                    unlock = unlock.descriptor.name(),
                    error = %err,
                    "sandbox parser failed"
                );
                SpawnOutcome::Skipped
            }
        }
    }
}

fn duplicate_key(def: &SandboxDef) -> Option<i32> {
    let unlocks = def.unlocks();
    unlocks
        .iter()
        .enumerate()
        .find(|(i, u)| unlocks[..*i].iter().any(|prev| prev.key() == u.key()))
        .map(|(_, u)| u.key())
}

impl Registry for SandboxRegistry {
    fn id(&self) -> RegistryId {
        RegistryId::SANDBOX
    }

    fn initialize(&mut self, hooks: &mut HookSet) {
        for point in [
            HookPoint::SandboxSpawn,
            HookPoint::SandboxItemUnlocked,
            HookPoint::UnlockForSymbol,
            HookPoint::SymbolForUnlock,
            HookPoint::DefaultKillScores,
        ] {
            hooks.subscribe(point, self.id());
        }
    }

    fn validate(
        &self,
        content: &[Arc<dyn Content>],
        types: &TypeTables,
        _creatures: &CreatureCatalog,
    ) -> Result<(), RegistrationError> {
        let defs: Vec<SandboxDef> = content.iter().filter_map(SandboxDef::from_content).collect();
        for def in &defs {
            if let Some(key) = duplicate_key(def) {
                return Err(RegistrationError::DuplicateUnlockKey {
                    content: def.id().to_string(),
                    key,
                });
            }
        }
        let names: Vec<&str> = defs
            .iter()
            .flat_map(|def| def.unlocks().iter().map(UnlockDescriptor::name))
            .collect();
        types.unlocks.validate(&names)
    }

    fn process(
        &mut self,
        content: &[Arc<dyn Content>],
        cx: &mut RegisterCx<'_>,
    ) -> Result<(), RegistrationError> {
        self.validate(content, cx.types, cx.creatures)?;

        let mut owned = Vec::new();
        for item in content {
            let Some(def) = SandboxDef::from_content(item) else {
                continue;
            };
            let ty = def.ty().ok_or_else(|| RegistrationError::Malformed {
                content: def.id().to_string(),
                reason: "no allocated type; it must also target its item or creature registry"
                    .into(),
            })?;
            if self.handlers.contains_key(&ty) {
                return Err(RegistrationError::AlreadyAllocated {
                    content: def.id().to_string(),
                });
            }
            owned.push((ty, def));
        }

        let names: Vec<&str> = owned
            .iter()
            .flat_map(|(_, def)| def.unlocks().iter().map(UnlockDescriptor::name))
            .collect();
        let mut ids = cx.types.unlocks.allocate(&names)?.into_iter();

        for (ty, def) in owned {
            for descriptor in def.unlocks() {
                let Some(id) = ids.next() else { break };
                let index = self.unlocks.len();
                self.by_symbol.insert((ty, descriptor.key()), index);
                self.by_id.insert(id, index);
                self.unlocks.push(Unlock {
                    id,
                    owner: ty,
                    descriptor: descriptor.clone(),
                });
                debug!(
                    target: "game_content::sandbox",
                    content = def.id(),
                    unlock = descriptor.name(),
                    key = descriptor.key(),
                    %id,
                    "unlock registered"
                );
            }
            self.handlers.insert(ty, def);
        }
        Ok(())
    }
}
