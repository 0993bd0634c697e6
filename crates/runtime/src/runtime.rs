//! Host-facing facade over the content context and the save slots.

use std::sync::Arc;

use game_content::{
    CatalogLoader, Content, ContentContext, HookOutcome, HostUnlocks, PlacedIcon, ResourceLoader,
    SaveError, SpawnOutcome, Unlock, Visibility,
};
use game_core::{AbstractEntity, HostCatalog, PhysobType, SaveFile, SaveSlot, TypeIdentifier, World};
use tracing::{error, info};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::lifecycle::{ListenerId, ReadyNotifier};
use crate::repository::{FileSaveRepository, SaveRepository, read_or_create};

type Batch = Vec<Arc<dyn Content>>;

/// What happened to a batch handed to [`ContentRuntime::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    Registered,
    /// Queued until [`ContentRuntime::host_started`].
    Deferred(ListenerId),
}

/// Owns the content context, the pending-registration queue and the current
/// save snapshot.
pub struct ContentRuntime<R: SaveRepository> {
    context: ContentContext,
    ready: ReadyNotifier<Batch>,
    repository: R,
    save: SaveFile,
    slot: String,
}

impl ContentRuntime<FileSaveRepository> {
    /// Builds a runtime from configuration: host catalog from TOML (if set)
    /// and the profile's save file on disk.
    pub fn from_config(config: &RuntimeConfig) -> anyhow::Result<Self> {
        let host = match &config.host_catalog {
            Some(path) => CatalogLoader::load(path)?,
            None => HostCatalog::default(),
        };
        let repository = FileSaveRepository::new(&config.save_dir, &config.profile)?;
        Ok(Self::new(&host, repository, &config.slot))
    }
}

impl<R: SaveRepository> ContentRuntime<R> {
    /// Reads (or creates) the save file and seeds an empty context.
    pub fn new(host: &HostCatalog, repository: R, slot: &str) -> Self {
        let save = read_or_create(&repository);
        Self {
            context: ContentContext::new(host),
            ready: ReadyNotifier::new(),
            repository,
            save,
            slot: slot.to_string(),
        }
    }

    pub fn context(&self) -> &ContentContext {
        &self.context
    }

    /// Mutable access for adding registries before content arrives.
    pub fn context_mut(&mut self) -> &mut ContentContext {
        &mut self.context
    }

    pub fn is_started(&self) -> bool {
        self.ready.is_fired()
    }

    /// Registers content now if the host has started, otherwise defers it.
    pub fn register(&mut self, content: Batch) -> Result<Registration> {
        match self.ready.subscribe(content) {
            Ok(id) => Ok(Registration::Deferred(id)),
            Err(content) => {
                self.context.register(&content)?;
                Ok(Registration::Registered)
            }
        }
    }

    /// Drops a deferred batch before it is registered.
    pub fn cancel(&mut self, id: ListenerId) -> bool {
        self.ready.unsubscribe(id).is_some()
    }

    /// Called once the host finished its own initialization.
    ///
    /// Registers every deferred batch in the order it arrived. A failing
    /// batch does not stop later ones; the first error is returned.
    pub fn host_started(&mut self) -> Result<()> {
        if self.ready.is_fired() {
            return Err(RuntimeError::AlreadyStarted);
        }

        let batches = self.ready.fire();
        info!(target: "runtime::lifecycle", batches = batches.len(), "host started");

        let mut first_error = None;
        for batch in batches {
            if let Err(err) = self.context.register(&batch) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    pub fn save_file(&self) -> &SaveFile {
        &self.save
    }

    pub fn active_slot(&self) -> SaveSlot {
        self.save.slot(&self.slot)
    }

    /// Unlocks `token` in the active slot and flushes the new snapshot.
    ///
    /// The in-memory snapshot only changes once the write succeeded.
    pub fn unlock(&mut self, token: &str) -> Result<()> {
        let updated = self.save.unlock(&self.slot, token);
        if updated == self.save {
            return Ok(());
        }
        if let Err(err) = self.repository.save(&updated) {
            error!(target: "runtime::repository", token, error = %err, "failed to persist unlock");
            return Err(err.into());
        }
        self.save = updated;
        info!(target: "runtime::repository", slot = %self.slot, token, "unlocked");
        Ok(())
    }

    pub fn entity_from_string(
        &self,
        world: &dyn World,
        raw: &str,
    ) -> HookOutcome<Option<AbstractEntity>> {
        self.context.entity_from_string(world, raw)
    }

    pub fn entity_to_string(
        &self,
        entity: &AbstractEntity,
    ) -> HookOutcome<std::result::Result<String, SaveError>> {
        self.context.entity_to_string(entity)
    }

    pub fn spawn(&self, world: &mut dyn World, placed: &PlacedIcon) -> SpawnOutcome {
        self.context.spawn(world, placed)
    }

    pub fn lookup_unlock(&self, ty: PhysobType, key: i32) -> Option<&Unlock> {
        self.context.lookup_unlock(ty, key)
    }

    /// Whether `unlock` is usable in the active slot.
    pub fn is_unlocked(&self, unlock: TypeIdentifier, host: &dyn HostUnlocks) -> bool {
        self.context.is_unlocked(unlock, &self.active_slot(), host)
    }

    pub fn visible_unlocks(&self) -> Vec<(TypeIdentifier, Visibility)> {
        self.context.visible_unlocks(&self.active_slot())
    }

    pub fn load_resources(&self, resources: &mut dyn ResourceLoader) {
        self.context.load_resources(resources)
    }
}
