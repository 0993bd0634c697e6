//! Content-defined items: definitions and the registry allocating them.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use game_core::{
    AbstractEntity, CreatureCatalog, EntityRecord, PhysobType, RegistrationError, TypeIdentifier,
    TypeTable, TypeTables, World,
};
use tracing::{debug, error};

use crate::content::{Content, RegistryId, ResourceLoader, downcast};
use crate::hooks::{HookOutcome, HookPoint, HookSet};
use crate::persist::{self, SaveError};
use crate::properties::ItemProperties;
use crate::registry::{RegisterCx, Registry};
use crate::sandbox::UnlockDescriptor;

/// Callbacks an item type supplies to the host.
#[allow(unused_variables)]
pub trait ItemBehavior: Send + Sync {
    /// Rebuilds an entity from its record.
    ///
    /// `unlock` is set when spawning from the sandbox; its key replaces any
    /// variant data the payload would carry.
    fn parse(
        &self,
        world: &dyn World,
        record: &EntityRecord,
        unlock: Option<&UnlockDescriptor>,
    ) -> anyhow::Result<Option<AbstractEntity>>;

    /// Payload persisted for `entity`. Must not contain the record delimiter.
    fn save(&self, entity: &AbstractEntity) -> String {
        entity.data.clone()
    }

    fn properties(&self, entity: &AbstractEntity) -> Option<Arc<dyn ItemProperties>> {
        None
    }

    fn load_resources(&self, resources: &mut dyn ResourceLoader) -> anyhow::Result<()> {
        Ok(())
    }
}

/// An item type contributed by content.
///
/// The type value is allocated the first time the definition is registered;
/// registering the same definition again fails.
pub struct ItemDef {
    id: String,
    ty: OnceLock<TypeIdentifier>,
    unlocks: Vec<UnlockDescriptor>,
    behavior: Box<dyn ItemBehavior>,
}

impl ItemDef {
    /// `id` becomes the object type name.
    pub fn new(id: impl Into<String>, behavior: impl ItemBehavior + 'static) -> Self {
        Self {
            id: id.into(),
            ty: OnceLock::new(),
            unlocks: Vec::new(),
            behavior: Box::new(behavior),
        }
    }

    #[must_use]
    pub fn with_unlock(mut self, unlock: UnlockDescriptor) -> Self {
        self.unlocks.push(unlock);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Allocated type, once registered.
    pub fn ty(&self) -> Option<PhysobType> {
        self.ty.get().copied().map(PhysobType::Object)
    }

    pub fn unlocks(&self) -> &[UnlockDescriptor] {
        &self.unlocks
    }

    pub fn behavior(&self) -> &dyn ItemBehavior {
        self.behavior.as_ref()
    }
}

impl fmt::Debug for ItemDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemDef")
            .field("id", &self.id)
            .field("ty", &self.ty.get())
            .field("unlocks", &self.unlocks)
            .finish_non_exhaustive()
    }
}

impl Content for ItemDef {
    fn id(&self) -> &str {
        &self.id
    }

    fn registries(&self) -> Vec<RegistryId> {
        vec![RegistryId::ITEMS, RegistryId::PROPERTIES, RegistryId::SANDBOX]
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Allocates object types for [`ItemDef`]s and serves their save strings.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    items: BTreeMap<TypeIdentifier, Arc<ItemDef>>,
}

impl ItemRegistry {
    pub fn get(&self, ty: TypeIdentifier) -> Option<&Arc<ItemDef>> {
        self.items.get(&ty)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ItemDef>> + '_ {
        self.items.values()
    }

    pub(crate) fn entity_from_string(
        &self,
        world: &dyn World,
        raw: &str,
        table: &TypeTable,
    ) -> HookOutcome<Option<AbstractEntity>> {
        let record = match persist::decode_owned(raw, table, |ty| self.items.contains_key(&ty)) {
            HookOutcome::Handled(Some(record)) => record,
            HookOutcome::Handled(None) => return HookOutcome::Handled(None),
            HookOutcome::Fallthrough => return HookOutcome::Fallthrough,
        };
        let Some(def) = self.items.get(&record.type_id()) else {
            return HookOutcome::Fallthrough;
        };

        match def.behavior().parse(world, &record, None) {
            Ok(entity) => HookOutcome::Handled(entity),
            Err(err) => {
                error!(
                    target: "game_content::items",
                    content = def.id(),
                    error = %err,
                    "item parser failed"
                );
                HookOutcome::Handled(None)
            }
        }
    }

    pub(crate) fn entity_to_string(
        &self,
        entity: &AbstractEntity,
        table: &TypeTable,
    ) -> HookOutcome<Result<String, SaveError>> {
        let PhysobType::Object(ty) = entity.kind else {
            return HookOutcome::Fallthrough;
        };
        match self.items.get(&ty) {
            Some(def) => {
                HookOutcome::Handled(persist::encode(table, entity, def.behavior().save(entity)))
            }
            None => HookOutcome::Fallthrough,
        }
    }

    pub(crate) fn load_resources(&self, resources: &mut dyn ResourceLoader) {
        for def in self.items.values() {
            if let Err(err) = def.behavior().load_resources(resources) {
                error!(
                    target: "game_content::items",
                    content = def.id(),
                    error = %err,
                    "failed to load item resources"
                );
            }
        }
    }
}

fn definitions(content: &[Arc<dyn Content>]) -> Vec<Arc<ItemDef>> {
    content.iter().filter_map(downcast::<ItemDef>).collect()
}

impl Registry for ItemRegistry {
    fn id(&self) -> RegistryId {
        RegistryId::ITEMS
    }

    fn initialize(&mut self, hooks: &mut HookSet) {
        for point in [
            HookPoint::ObjectFromString,
            HookPoint::EntityToString,
            HookPoint::LoadResources,
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
        let defs = definitions(content);
        if let Some(def) = defs.iter().find(|def| def.ty.get().is_some()) {
            return Err(RegistrationError::AlreadyAllocated {
                content: def.id.clone(),
            });
        }
        let names: Vec<&str> = defs.iter().map(|def| def.id()).collect();
        types.objects.validate(&names)
    }

    fn process(
        &mut self,
        content: &[Arc<dyn Content>],
        cx: &mut RegisterCx<'_>,
    ) -> Result<(), RegistrationError> {
        self.validate(content, cx.types, cx.creatures)?;

        let defs = definitions(content);
        let names: Vec<&str> = defs.iter().map(|def| def.id()).collect();
        let ids = cx.types.objects.allocate(&names)?;

        for (def, ty) in defs.into_iter().zip(ids) {
            def.ty
                .set(ty)
                .map_err(|_| RegistrationError::AlreadyAllocated {
                    content: def.id.clone(),
                })?;
            debug!(target: "game_content::items", content = def.id(), %ty, "item registered");
            self.items.insert(ty, def);
        }
        Ok(())
    }
}
