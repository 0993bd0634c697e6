//! Immutable save-slot snapshots.
//!
//! Unlock progress is stored per slot as an ordered set of tokens. Every
//! mutation produces a new [`SaveFile`]; callers hold the current snapshot
//! and hand it to the persistence layer.

use std::collections::BTreeMap;

/// Unlock tokens of one save slot, most recent first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SaveSlot {
    tokens: Vec<String>,
}

impl SaveSlot {
    /// Builds a slot, dropping repeated tokens while keeping first positions.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slot = Self::default();
        for token in tokens {
            let token = token.into();
            if !slot.tokens.contains(&token) {
                slot.tokens.push(token);
            }
        }
        slot
    }

    pub fn is_unlocked(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns a copy with `token` unlocked (newest first).
    pub fn with_unlocked(&self, token: &str) -> Self {
        if self.is_unlocked(token) {
            return self.clone();
        }
        let mut tokens = Vec::with_capacity(self.tokens.len() + 1);
        tokens.push(token.to_string());
        tokens.extend(self.tokens.iter().cloned());
        Self { tokens }
    }
}

/// Every slot of one save profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SaveFile {
    slots: BTreeMap<String, SaveSlot>,
}

impl SaveFile {
    pub fn new(slots: BTreeMap<String, SaveSlot>) -> Self {
        Self { slots }
    }

    /// Returns the named slot, or an empty one if it was never written.
    pub fn slot(&self, name: &str) -> SaveSlot {
        self.slots.get(name).cloned().unwrap_or_default()
    }

    pub fn slots(&self) -> &BTreeMap<String, SaveSlot> {
        &self.slots
    }

    /// Returns a new snapshot with `token` unlocked in `slot`.
    #[must_use]
    pub fn unlock(&self, slot: &str, token: &str) -> Self {
        let mut slots = self.slots.clone();
        let updated = self.slot(slot).with_unlocked(token);
        slots.insert(slot.to_string(), updated);
        Self { slots }
    }
}
