//! Registry base: one-time initialization and batch processing.

use std::sync::Arc;

use game_core::{CreatureCatalog, RegistrationError, TypeTables};
use tracing::debug;

use crate::content::{Content, RegistryId};
use crate::hooks::HookSet;

/// Mutable host state a registry may extend while processing content.
pub struct RegisterCx<'a> {
    pub types: &'a mut TypeTables,
    pub creatures: &'a mut CreatureCatalog,
    pub hooks: &'a mut HookSet,
}

/// A content consumer that installs its hooks once and then processes every
/// batch routed to it.
pub trait Registry: Send + Sync {
    fn id(&self) -> RegistryId;

    /// Subscribes this registry's hook points. Runs at most once.
    fn initialize(&mut self, hooks: &mut HookSet);

    /// Checks a batch against current host state without changing anything.
    ///
    /// Runs for every targeted registry before any of them processes, so a
    /// batch that fails here leaves every table untouched.
    fn validate(
        &self,
        _content: &[Arc<dyn Content>],
        _types: &TypeTables,
        _creatures: &CreatureCatalog,
    ) -> Result<(), RegistrationError> {
        Ok(())
    }

    /// Consumes the batch, allocating and indexing whatever it owns.
    fn process(
        &mut self,
        content: &[Arc<dyn Content>],
        cx: &mut RegisterCx<'_>,
    ) -> Result<(), RegistrationError>;
}

/// Wraps a registry and guarantees `initialize` runs exactly once, before
/// the first `process`.
///
/// Unsizes to `RegistrySlot<dyn Registry>` so built-in and extra registries
/// can be driven uniformly.
pub struct RegistrySlot<R: ?Sized> {
    initialized: bool,
    registry: R,
}

impl<R: Registry> RegistrySlot<R> {
    pub fn new(registry: R) -> Self {
        Self {
            initialized: false,
            registry,
        }
    }
}

impl<R: Registry + ?Sized> RegistrySlot<R> {
    pub fn id(&self) -> RegistryId {
        self.registry.id()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Runs the registry's initialization if it has not run yet.
    ///
    /// Returns true if this call performed it.
    pub fn initialize(&mut self, hooks: &mut HookSet) -> bool {
        if self.initialized {
            return false;
        }
        self.registry.initialize(hooks);
        self.initialized = true;
        debug!(target: "game_content::registry", registry = %self.id(), "registry initialized");
        true
    }

    pub fn validate(
        &self,
        content: &[Arc<dyn Content>],
        types: &TypeTables,
        creatures: &CreatureCatalog,
    ) -> Result<(), RegistrationError> {
        self.registry.validate(content, types, creatures)
    }

    pub fn process(
        &mut self,
        content: &[Arc<dyn Content>],
        cx: &mut RegisterCx<'_>,
    ) -> Result<(), RegistrationError> {
        self.initialize(cx.hooks);
        self.registry.process(content, cx)?;
        debug!(
            target: "game_content::registry",
            registry = %self.id(),
            count = content.len(),
            "batch processed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookPoint;

    #[derive(Default)]
    struct Counting {
        initialized: usize,
        processed: usize,
    }

    impl Registry for Counting {
        fn id(&self) -> RegistryId {
            RegistryId("counting")
        }

        fn initialize(&mut self, hooks: &mut HookSet) {
            self.initialized += 1;
            hooks.subscribe(HookPoint::LoadResources, self.id());
        }

        fn process(
            &mut self,
            content: &[Arc<dyn Content>],
            _cx: &mut RegisterCx<'_>,
        ) -> Result<(), RegistrationError> {
            self.processed += content.len();
            Ok(())
        }
    }

    #[test]
    fn initialize_runs_once() {
        let mut hooks = HookSet::new();
        let mut slot = RegistrySlot::new(Counting::default());

        assert!(slot.initialize(&mut hooks));
        assert!(!slot.initialize(&mut hooks));
        assert!(!slot.initialize(&mut hooks));

        assert_eq!(slot.registry().initialized, 1);
        assert_eq!(hooks.len(), 1);
    }

    #[test]
    fn process_initializes_first() {
        let host = game_core::HostCatalog::new(["Rock"], ["Slugcat"], ["Rock"]);
        let mut types = host.type_tables();
        let mut creatures = CreatureCatalog::from_builtins(Vec::new(), Default::default());
        let mut hooks = HookSet::new();
        let mut slot = RegistrySlot::new(Counting::default());

        let mut cx = RegisterCx {
            types: &mut types,
            creatures: &mut creatures,
            hooks: &mut hooks,
        };
        slot.process(&[], &mut cx).unwrap();
        slot.process(&[], &mut cx).unwrap();

        assert!(slot.is_initialized());
        assert_eq!(slot.registry().initialized, 1);
        assert!(hooks.is_subscribed(HookPoint::LoadResources, RegistryId("counting")));
    }
}
