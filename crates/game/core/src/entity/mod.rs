//! Entity values exchanged with the host and their persisted form.
//!
//! An entity's save state is a flat [`EntityRecord`] (id, type, position,
//! payload). [`EntityCodec`] turns records into the host's delimiter-based
//! save strings and back.

mod codec;
mod record;

use std::fmt;
use std::str::FromStr;

pub use codec::{CodecError, DELIMITER, EntityCodec};
pub use record::{EntityRecord, PayloadError};

use crate::types::PhysobType;

/// Identifier of one entity, unique per save.
///
/// Canonical form is `<spawner>.<number>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId {
    pub spawner: i32,
    pub number: i32,
}

impl EntityId {
    pub const fn new(spawner: i32, number: i32) -> Self {
        Self { spawner, number }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.spawner, self.number)
    }
}

/// Error returned when a canonical entity or coordinate string is malformed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} dot-separated integers, got \"{raw}\"")]
pub struct ParseFieldsError {
    pub expected: usize,
    pub raw: String,
}

impl FromStr for EntityId {
    type Err = ParseFieldsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [spawner, number] = parse_ints::<2>(s)?;
        Ok(Self { spawner, number })
    }
}

/// Location of an entity: room, tile x/y and abstract node (`-1` for none).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldCoordinate {
    pub room: i32,
    pub x: i32,
    pub y: i32,
    pub node: i32,
}

impl WorldCoordinate {
    pub const fn new(room: i32, x: i32, y: i32, node: i32) -> Self {
        Self { room, x, y, node }
    }
}

impl fmt::Display for WorldCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.room, self.x, self.y, self.node)
    }
}

impl FromStr for WorldCoordinate {
    type Err = ParseFieldsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [room, x, y, node] = parse_ints::<4>(s)?;
        Ok(Self { room, x, y, node })
    }
}

fn parse_ints<const N: usize>(s: &str) -> Result<[i32; N], ParseFieldsError> {
    let err = || ParseFieldsError {
        expected: N,
        raw: s.to_string(),
    };

    let mut values = [0; N];
    let mut parts = s.split('.');
    for value in values.iter_mut() {
        *value = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
    }
    if parts.next().is_some() {
        return Err(err());
    }
    Ok(values)
}

/// Host-side abstract entity produced by content parsers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbstractEntity {
    pub kind: PhysobType,
    pub id: EntityId,
    pub pos: WorldCoordinate,
    /// Content-defined state, persisted as the record payload.
    pub data: String,
}

impl AbstractEntity {
    pub fn new(kind: PhysobType, id: EntityId, pos: WorldCoordinate) -> Self {
        Self {
            kind,
            id,
            pos,
            data: String::new(),
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }
}

/// The host world content callbacks run against.
pub trait World {
    /// Returns a fresh, never-used entity id.
    fn new_entity_id(&mut self) -> EntityId;

    /// Places an abstract entity in `room`.
    fn add_entity(&mut self, room: i32, entity: AbstractEntity);
}
