//! Content registration and dispatch.
//!
//! Third-party content declares which registries it targets; a
//! [`ContentContext`] routes each batch to those registries, which allocate
//! type values, index the content and subscribe to the host hook points they
//! intercept. Host calls then go through the context:
//! - save strings for content entities (items and creatures)
//! - sandbox spawning and unlock resolution
//! - per-entity properties and resource loading
//!
//! Content callbacks return `anyhow::Result`; their failures are logged and
//! never abort the host.

pub mod content;
pub mod context;
pub mod creatures;
pub mod hooks;
pub mod items;
pub mod properties;
pub mod registry;
pub mod sandbox;

mod persist;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use content::{Content, RegistryId, ResourceLoader, downcast};
pub use context::ContentContext;
pub use creatures::{CreatureBehavior, CreatureDef, CreatureRegistry};
pub use hooks::{HookOutcome, HookPoint, HookSet};
pub use items::{ItemBehavior, ItemDef, ItemRegistry};
pub use persist::SaveError;
pub use properties::{Grabability, ItemProperties, PropertyRegistry};
pub use registry::{RegisterCx, Registry, RegistrySlot};
pub use sandbox::{
    HostUnlocks, KillScore, NoHostUnlocks, PlacedIcon, SandboxDef, SandboxRegistry, SpawnOutcome,
    TokenGate, Unlock, UnlockDescriptor, UnlockGate, Visibility,
};

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, LoadResult};
