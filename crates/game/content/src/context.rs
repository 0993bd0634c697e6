//! The registry context: content dispatch and every host-facing lookup.
//!
//! One [`ContentContext`] is built at startup from the host's catalog and
//! threaded through every call that touches content. Registration happens
//! during startup; afterwards the context is read-only.

use std::sync::Arc;

use game_core::{
    AbstractEntity, ContentError, CreatureCatalog, CreatureTemplate, HostCatalog, PhysobType,
    RegistrationError, Relationship, SaveSlot, TypeIdentifier, TypeTables, World,
};
use tracing::{debug, error, info, warn};

use crate::content::{Content, RegistryId, ResourceLoader};
use crate::creatures::CreatureRegistry;
use crate::hooks::{HookOutcome, HookPoint, HookSet};
use crate::items::ItemRegistry;
use crate::persist::SaveError;
use crate::properties::{ItemProperties, PropertyRegistry};
use crate::registry::{RegisterCx, Registry, RegistrySlot};
use crate::sandbox::{
    HostUnlocks, KillScore, PlacedIcon, SandboxRegistry, SpawnOutcome, Unlock, Visibility,
};

/// Host tables plus every registry content can target.
pub struct ContentContext {
    types: TypeTables,
    catalog: CreatureCatalog,
    hooks: HookSet,
    items: RegistrySlot<ItemRegistry>,
    creatures: RegistrySlot<CreatureRegistry>,
    properties: RegistrySlot<PropertyRegistry>,
    sandbox: RegistrySlot<SandboxRegistry>,
    extra: Vec<Box<RegistrySlot<dyn Registry>>>,
}

impl ContentContext {
    /// Seeds the tables from the host's built-ins. Built-in creatures get a
    /// plain template each and neutral relationships.
    pub fn new(host: &HostCatalog) -> Self {
        let templates = host
            .creatures
            .iter()
            .enumerate()
            .map(|(value, name)| CreatureTemplate::new(TypeIdentifier(value as u32), name))
            .collect();

        Self {
            types: host.type_tables(),
            catalog: CreatureCatalog::from_builtins(templates, Relationship::default()),
            hooks: HookSet::new(),
            items: RegistrySlot::new(ItemRegistry::default()),
            creatures: RegistrySlot::new(CreatureRegistry::default()),
            properties: RegistrySlot::new(PropertyRegistry::default()),
            sandbox: RegistrySlot::new(SandboxRegistry::default()),
            extra: Vec::new(),
        }
    }

    /// Replaces the seeded creature catalog with one carrying the host's real
    /// templates and relationships. Must cover every built-in creature value.
    #[must_use]
    pub fn with_creature_catalog(mut self, catalog: CreatureCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Adds a registry dispatched after the built-in ones.
    ///
    /// Returns false if a registry with the same id is already present.
    pub fn add_registry<R: Registry + 'static>(&mut self, registry: R) -> bool {
        let id = registry.id();
        if self.registry_ids().contains(&id) {
            return false;
        }
        self.extra.push(Box::new(RegistrySlot::new(registry)));
        true
    }

    pub fn types(&self) -> &TypeTables {
        &self.types
    }

    pub fn creature_catalog(&self) -> &CreatureCatalog {
        &self.catalog
    }

    pub fn hooks(&self) -> &HookSet {
        &self.hooks
    }

    pub fn items(&self) -> &ItemRegistry {
        self.items.registry()
    }

    pub fn creatures(&self) -> &CreatureRegistry {
        self.creatures.registry()
    }

    pub fn properties(&self) -> &PropertyRegistry {
        self.properties.registry()
    }

    pub fn sandbox(&self) -> &SandboxRegistry {
        self.sandbox.registry()
    }

    /// Dispatch order: items, creatures, properties, sandbox, then extras in
    /// the order they were added.
    pub fn registry_ids(&self) -> Vec<RegistryId> {
        [
            self.items.id(),
            self.creatures.id(),
            self.properties.id(),
            self.sandbox.id(),
        ]
        .into_iter()
        .chain(self.extra.iter().map(|slot| slot.id()))
        .collect()
    }

    /// Registers a batch of content.
    ///
    /// Every targeted registry is initialized, then validates the batch, then
    /// processes it. The first error aborts the batch and is returned;
    /// initialized registries stay initialized.
    pub fn register(&mut self, content: &[Arc<dyn Content>]) -> Result<(), RegistrationError> {
        match self.dispatch(content) {
            Ok(()) => {
                info!(
                    target: "game_content::dispatch",
                    count = content.len(),
                    "content registered"
                );
                Ok(())
            }
            Err(err) => {
                let severity = err.severity();
                if severity.is_fatal() {
                    error!(
                        target: "game_content::dispatch",
                        error = %err,
                        code = err.error_code(),
                        "host cannot take this content"
                    );
                } else {
                    warn!(
                        target: "game_content::dispatch",
                        error = %err,
                        code = err.error_code(),
                        severity = severity.as_str(),
                        "content rejected"
                    );
                }
                Err(err)
            }
        }
    }

    /// Groups content by target registry, aligned with `registry_ids`.
    fn route(
        &self,
        content: &[Arc<dyn Content>],
    ) -> Result<Vec<Vec<Arc<dyn Content>>>, RegistrationError> {
        let ids = self.registry_ids();
        let mut groups = vec![Vec::new(); ids.len()];

        for item in content {
            let targets = item.registries();
            if targets.is_empty() {
                debug!(
                    target: "game_content::dispatch",
                    content = item.id(),
                    "content targets no registry"
                );
            }
            for target in targets {
                let index = ids.iter().position(|id| *id == target).ok_or_else(|| {
                    RegistrationError::UnknownRegistry {
                        content: item.id().to_string(),
                        registry: target.to_string(),
                    }
                })?;
                groups[index].push(Arc::clone(item));
            }
        }
        Ok(groups)
    }

    fn dispatch(&mut self, content: &[Arc<dyn Content>]) -> Result<(), RegistrationError> {
        let groups = self.route(content)?;

        let Self {
            types,
            catalog,
            hooks,
            items,
            creatures,
            properties,
            sandbox,
            extra,
        } = self;
        let mut slots: Vec<&mut RegistrySlot<dyn Registry>> = vec![
            items as &mut RegistrySlot<dyn Registry>,
            creatures as &mut RegistrySlot<dyn Registry>,
            properties as &mut RegistrySlot<dyn Registry>,
            sandbox as &mut RegistrySlot<dyn Registry>,
        ];
        slots.extend(extra.iter_mut().map(|slot| &mut **slot));

        let mut active: Vec<_> = slots
            .into_iter()
            .zip(groups)
            .filter(|(_, batch)| !batch.is_empty())
            .collect();

        for (slot, batch) in &mut active {
            slot.initialize(hooks);
            debug!(
                target: "game_content::dispatch",
                registry = %slot.id(),
                count = batch.len(),
                "dispatching batch"
            );
        }
        for (slot, batch) in &active {
            slot.validate(batch, types, catalog)?;
        }

        let mut cx = RegisterCx {
            types,
            creatures: catalog,
            hooks,
        };
        for (slot, batch) in active {
            slot.process(&batch, &mut cx)?;
        }
        Ok(())
    }

    /// Decodes an object save string, or falls through if no content owns it.
    pub fn object_from_string(
        &self,
        world: &dyn World,
        raw: &str,
    ) -> HookOutcome<Option<AbstractEntity>> {
        if !self
            .hooks
            .is_subscribed(HookPoint::ObjectFromString, RegistryId::ITEMS)
        {
            return HookOutcome::Fallthrough;
        }
        self.items
            .registry()
            .entity_from_string(world, raw, &self.types.objects)
    }

    /// Decodes a creature save string, or falls through if no content owns it.
    pub fn creature_from_string(
        &self,
        world: &dyn World,
        raw: &str,
    ) -> HookOutcome<Option<AbstractEntity>> {
        if !self
            .hooks
            .is_subscribed(HookPoint::CreatureFromString, RegistryId::CREATURES)
        {
            return HookOutcome::Fallthrough;
        }
        self.creatures
            .registry()
            .entity_from_string(world, raw, &self.types.creatures, &self.catalog)
    }

    /// Tries the object space first, then the creature space.
    pub fn entity_from_string(
        &self,
        world: &dyn World,
        raw: &str,
    ) -> HookOutcome<Option<AbstractEntity>> {
        match self.object_from_string(world, raw) {
            HookOutcome::Fallthrough => self.creature_from_string(world, raw),
            handled => handled,
        }
    }

    /// Encodes a content entity; host entities fall through.
    pub fn entity_to_string(
        &self,
        entity: &AbstractEntity,
    ) -> HookOutcome<Result<String, SaveError>> {
        let outcome = match entity.kind {
            PhysobType::Object(_)
                if self
                    .hooks
                    .is_subscribed(HookPoint::EntityToString, RegistryId::ITEMS) =>
            {
                self.items
                    .registry()
                    .entity_to_string(entity, &self.types.objects)
            }
            PhysobType::Creature(_)
                if self
                    .hooks
                    .is_subscribed(HookPoint::EntityToString, RegistryId::CREATURES) =>
            {
                self.creatures
                    .registry()
                    .entity_to_string(entity, &self.types.creatures, &self.catalog)
            }
            _ => HookOutcome::Fallthrough,
        };

        if let HookOutcome::Handled(Err(err)) = &outcome {
            error!(
                target: "game_content::persist",
                entity = %entity.id,
                kind = %entity.kind,
                error = %err,
                "content entity could not be saved"
            );
        }
        outcome
    }

    /// Spawns a placed sandbox icon.
    pub fn spawn(&self, world: &mut dyn World, placed: &PlacedIcon) -> SpawnOutcome {
        if !self
            .hooks
            .is_subscribed(HookPoint::SandboxSpawn, RegistryId::SANDBOX)
        {
            return SpawnOutcome::Fallthrough;
        }
        self.sandbox.registry().spawn(world, placed)
    }

    pub fn lookup_unlock(&self, ty: PhysobType, key: i32) -> Option<&Unlock> {
        self.sandbox.registry().lookup(ty, key)
    }

    pub fn unlock_for_symbol(
        &self,
        ty: PhysobType,
        key: i32,
        host: &dyn HostUnlocks,
    ) -> Option<TypeIdentifier> {
        let content = self
            .hooks
            .is_subscribed(HookPoint::UnlockForSymbol, RegistryId::SANDBOX)
            .then(|| self.sandbox.registry().unlock_for_symbol(ty, key))
            .flatten();
        content.or_else(|| host.unlock_for_symbol(ty, key))
    }

    /// The host resolves its own unlocks first; content unlocks answer the rest.
    pub fn symbol_for_unlock(
        &self,
        unlock: TypeIdentifier,
        host: &dyn HostUnlocks,
    ) -> Option<(PhysobType, i32)> {
        host.symbol_for_unlock(unlock).or_else(|| {
            self.hooks
                .is_subscribed(HookPoint::SymbolForUnlock, RegistryId::SANDBOX)
                .then(|| self.sandbox.registry().symbol_for_unlock(unlock))
                .flatten()
        })
    }

    /// Whether `unlock` is usable for `slot`, content unlocks first.
    pub fn is_unlocked(
        &self,
        unlock: TypeIdentifier,
        slot: &SaveSlot,
        host: &dyn HostUnlocks,
    ) -> bool {
        if self
            .hooks
            .is_subscribed(HookPoint::SandboxItemUnlocked, RegistryId::SANDBOX)
            && let Some(unlocked) = self.sandbox.registry().is_unlocked(unlock, slot)
        {
            return unlocked;
        }
        host.is_unlocked(unlock, slot)
    }

    pub fn visible_unlocks(&self, slot: &SaveSlot) -> Vec<(TypeIdentifier, Visibility)> {
        self.sandbox.registry().visible_unlocks(slot)
    }

    pub fn default_kill_scores(&self) -> Vec<(TypeIdentifier, KillScore)> {
        if !self
            .hooks
            .is_subscribed(HookPoint::DefaultKillScores, RegistryId::SANDBOX)
        {
            return Vec::new();
        }
        self.sandbox.registry().default_kill_scores()
    }

    /// Whether killing a creature of `ty` earns a trophy.
    pub fn kills_matter(&self, ty: TypeIdentifier, host_default: bool) -> bool {
        if !self
            .hooks
            .is_subscribed(HookPoint::KillsMatter, RegistryId::CREATURES)
        {
            return host_default;
        }
        self.creatures
            .registry()
            .kills_matter(ty, &self.catalog, host_default)
            .handled()
            .unwrap_or(host_default)
    }

    pub fn item_properties(&self, entity: &AbstractEntity) -> Option<Arc<dyn ItemProperties>> {
        if !self
            .hooks
            .is_subscribed(HookPoint::ItemProperties, RegistryId::PROPERTIES)
        {
            return None;
        }
        self.properties.registry().properties(entity)
    }

    /// Runs every definition's resource loader. Failures are logged.
    pub fn load_resources(&self, resources: &mut dyn ResourceLoader) {
        if self
            .hooks
            .is_subscribed(HookPoint::LoadResources, RegistryId::ITEMS)
        {
            self.items.registry().load_resources(resources);
        }
        if self
            .hooks
            .is_subscribed(HookPoint::LoadResources, RegistryId::CREATURES)
        {
            self.creatures.registry().load_resources(resources);
        }
    }
}
