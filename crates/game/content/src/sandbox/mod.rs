//! Sandbox unlocks: descriptors, visibility gates and the resolver registry.
//!
//! Each content type may declare any number of unlocks, one per variant
//! key. Registration allocates an unlock identifier for each and indexes it
//! both ways so the host can go from a placed icon to an unlock and back.

mod registry;

use std::fmt;
use std::sync::Arc;

use game_core::{EntityId, PhysobType, SaveSlot, TypeIdentifier};

pub use registry::{SandboxDef, SandboxRegistry};

/// Score awarded for killing a creature in sandbox mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KillScore {
    pub value: i32,
    /// Hidden scores are not shown in the sandbox settings menu.
    pub hidden: bool,
}

impl KillScore {
    pub const fn new(value: i32, hidden: bool) -> Self {
        Self { value, hidden }
    }
}

impl Default for KillScore {
    fn default() -> Self {
        Self::new(0, true)
    }
}

/// How an unlock is presented in sandbox mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    /// Not listed at all.
    Hidden,
    /// Listed but unusable.
    Locked,
    Unlocked,
}

impl Visibility {
    pub fn is_unlocked(self) -> bool {
        self == Self::Unlocked
    }
}

/// Decides whether an unlock is available for a save slot.
pub trait UnlockGate: Send + Sync {
    fn visibility(&self, slot: &SaveSlot) -> Visibility;
}

/// Unlocked once a named token is present in the slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenGate {
    token: String,
    hide_when_locked: bool,
}

impl TokenGate {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            hide_when_locked: false,
        }
    }

    /// Reports [`Visibility::Hidden`] instead of `Locked` while locked.
    #[must_use]
    pub fn hidden_until_unlocked(mut self) -> Self {
        self.hide_when_locked = true;
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl UnlockGate for TokenGate {
    fn visibility(&self, slot: &SaveSlot) -> Visibility {
        if slot.is_unlocked(&self.token) {
            Visibility::Unlocked
        } else if self.hide_when_locked {
            Visibility::Hidden
        } else {
            Visibility::Locked
        }
    }
}

/// An unlock as declared by content, before an identifier is allocated.
#[derive(Clone)]
pub struct UnlockDescriptor {
    name: String,
    key: i32,
    kill_score: KillScore,
    gate: Option<Arc<dyn UnlockGate>>,
}

impl UnlockDescriptor {
    /// `name` becomes the unlock identifier; `key` selects the variant.
    pub fn new(name: impl Into<String>, key: i32) -> Self {
        Self {
            name: name.into(),
            key,
            kill_score: KillScore::default(),
            gate: None,
        }
    }

    /// Ignored for items.
    #[must_use]
    pub fn with_kill_score(mut self, kill_score: KillScore) -> Self {
        self.kill_score = kill_score;
        self
    }

    #[must_use]
    pub fn with_gate(mut self, gate: impl UnlockGate + 'static) -> Self {
        self.gate = Some(Arc::new(gate));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> i32 {
        self.key
    }

    pub fn kill_score(&self) -> KillScore {
        self.kill_score
    }

    /// Ungated unlocks are always available.
    pub fn visibility(&self, slot: &SaveSlot) -> Visibility {
        self.gate
            .as_ref()
            .map_or(Visibility::Unlocked, |gate| gate.visibility(slot))
    }
}

impl fmt::Debug for UnlockDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnlockDescriptor")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("kill_score", &self.kill_score)
            .field("gated", &self.gate.is_some())
            .finish()
    }
}

/// A registered unlock: its allocated identifier and owning type.
#[derive(Clone, Debug)]
pub struct Unlock {
    pub id: TypeIdentifier,
    pub owner: PhysobType,
    pub descriptor: UnlockDescriptor,
}

impl Unlock {
    pub fn key(&self) -> i32 {
        self.descriptor.key()
    }

    pub fn is_unlocked(&self, slot: &SaveSlot) -> bool {
        self.descriptor.visibility(slot).is_unlocked()
    }
}

/// Unlock lookups the host answers for its own built-in unlocks.
pub trait HostUnlocks {
    fn unlock_for_symbol(&self, ty: PhysobType, key: i32) -> Option<TypeIdentifier>;

    fn symbol_for_unlock(&self, unlock: TypeIdentifier) -> Option<(PhysobType, i32)>;

    fn is_unlocked(&self, unlock: TypeIdentifier, slot: &SaveSlot) -> bool;
}

/// Host with no built-in unlocks.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHostUnlocks;

impl HostUnlocks for NoHostUnlocks {
    fn unlock_for_symbol(&self, _ty: PhysobType, _key: i32) -> Option<TypeIdentifier> {
        None
    }

    fn symbol_for_unlock(&self, _unlock: TypeIdentifier) -> Option<(PhysobType, i32)> {
        None
    }

    fn is_unlocked(&self, _unlock: TypeIdentifier, _slot: &SaveSlot) -> bool {
        false
    }
}

/// An icon placed in the sandbox editor.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedIcon {
    pub ty: PhysobType,
    pub key: i32,
    /// Editor position in pixels.
    pub pos: (f32, f32),
    /// Id kept from the previous round, if creatures are being carried over.
    pub id: Option<EntityId>,
    /// Saved state of a carried-over creature.
    pub saved_state: Option<String>,
}

impl PlacedIcon {
    pub fn new(ty: PhysobType, key: i32, pos: (f32, f32)) -> Self {
        Self {
            ty,
            key,
            pos,
            id: None,
            saved_state: None,
        }
    }

    #[must_use]
    pub fn carried_over(mut self, id: EntityId, saved_state: impl Into<String>) -> Self {
        self.id = Some(id);
        self.saved_state = Some(saved_state.into());
        self
    }
}

/// Result of a sandbox spawn request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(EntityId),
    /// The type is content-owned but nothing was spawned; details are logged.
    Skipped,
    /// Not a content type; the host spawns it.
    Fallthrough,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_kill_score_is_hidden_zero() {
        assert_eq!(KillScore::default(), KillScore::new(0, true));
    }

    #[test]
    fn ungated_unlock_is_always_available() {
        let unlock = UnlockDescriptor::new("GlowLantern", 0);
        assert_eq!(unlock.visibility(&SaveSlot::default()), Visibility::Unlocked);
    }

    #[test]
    fn token_gate_follows_slot() {
        let gate = TokenGate::new("glowlantern");
        let locked = SaveSlot::default();
        let unlocked = locked.with_unlocked("glowlantern");

        assert_eq!(gate.visibility(&locked), Visibility::Locked);
        assert_eq!(gate.visibility(&unlocked), Visibility::Unlocked);
        assert_eq!(
            gate.clone().hidden_until_unlocked().visibility(&locked),
            Visibility::Hidden
        );
    }
}
