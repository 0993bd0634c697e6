//! Named host hook points and the registries subscribed to them.
//!
//! The host calls into the content context at fixed points (decoding a save
//! string, spawning from the sandbox, ...). A registry only intercepts a
//! point after subscribing to it during initialization; until then every
//! call falls through to the host's own behavior.

use std::collections::BTreeMap;

use strum::{Display, EnumIter, IntoStaticStr};
use tracing::debug;

use crate::content::RegistryId;

/// Host call sites the content layer can intercept.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum HookPoint {
    ObjectFromString,
    CreatureFromString,
    EntityToString,
    LoadResources,
    ApplyCreatureTemplates,
    KillsMatter,
    ItemProperties,
    SandboxSpawn,
    SandboxItemUnlocked,
    UnlockForSymbol,
    SymbolForUnlock,
    DefaultKillScores,
}

/// Outcome of an intercepted hook call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookOutcome<T> {
    /// Content handled the call.
    Handled(T),
    /// Not ours; the host should run its own behavior.
    Fallthrough,
}

impl<T> HookOutcome<T> {
    pub fn handled(self) -> Option<T> {
        match self {
            Self::Handled(value) => Some(value),
            Self::Fallthrough => None,
        }
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> HookOutcome<U> {
        match self {
            Self::Handled(value) => HookOutcome::Handled(f(value)),
            Self::Fallthrough => HookOutcome::Fallthrough,
        }
    }
}

/// Subscriptions from hook points to registries.
#[derive(Clone, Debug, Default)]
pub struct HookSet {
    subscriptions: BTreeMap<HookPoint, Vec<RegistryId>>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `registry` to `point`. Returns false if it already was.
    pub fn subscribe(&mut self, point: HookPoint, registry: RegistryId) -> bool {
        let subscribers = self.subscriptions.entry(point).or_default();
        if subscribers.contains(&registry) {
            return false;
        }
        subscribers.push(registry);
        debug!(target: "game_content::hooks", %point, %registry, "hook subscribed");
        true
    }

    /// Removes a subscription. Returns false if there was none.
    pub fn unsubscribe(&mut self, point: HookPoint, registry: RegistryId) -> bool {
        let Some(subscribers) = self.subscriptions.get_mut(&point) else {
            return false;
        };
        let before = subscribers.len();
        subscribers.retain(|r| *r != registry);
        let removed = subscribers.len() != before;
        if subscribers.is_empty() {
            self.subscriptions.remove(&point);
        }
        removed
    }

    pub fn is_subscribed(&self, point: HookPoint, registry: RegistryId) -> bool {
        self.subscribers(point).contains(&registry)
    }

    pub fn subscribers(&self, point: HookPoint) -> &[RegistryId] {
        self.subscriptions
            .get(&point)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of subscriptions across all points.
    pub fn len(&self) -> usize {
        self.subscriptions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
