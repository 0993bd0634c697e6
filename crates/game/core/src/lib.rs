//! Host-facing value types shared by content registries and the runtime.
//!
//! `game-core` defines the open type tables content extends, the entity
//! record and its save-string codec, creature templates, and the immutable
//! save-slot snapshots. It performs no I/O; loaders and repositories in
//! other crates depend on the types re-exported here.
pub mod config;
pub mod creature;
pub mod entity;
pub mod error;
pub mod save;
pub mod types;

pub use config::HostCatalog;
pub use creature::{
    CatalogError, CreatureCatalog, CreatureTemplate, RelationKind, Relationship, top_ancestor,
};
pub use entity::{
    AbstractEntity, CodecError, DELIMITER, EntityCodec, EntityId, EntityRecord, ParseFieldsError,
    PayloadError, World, WorldCoordinate,
};
pub use error::{ContentError, ErrorSeverity};
pub use save::{SaveFile, SaveSlot};
pub use types::{PhysobType, RegistrationError, TypeIdentifier, TypeSpace, TypeTable, TypeTables};
