//! Content items and the registries they target.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Name of a registry a content item can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegistryId(pub &'static str);

impl RegistryId {
    pub const ITEMS: Self = Self("items");
    pub const CREATURES: Self = Self("creatures");
    pub const PROPERTIES: Self = Self("properties");
    pub const SANDBOX: Self = Self("sandbox");

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for RegistryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A unit of third-party data and behavior plugged into one or more registries.
///
/// Registries receive every item that targets them and pick out the concrete
/// types they understand through [`Content::into_any`].
pub trait Content: Send + Sync + 'static {
    /// Identifier used in logs and, for allocating registries, as the type name.
    fn id(&self) -> &str;

    /// Registries this item participates in. May be empty.
    fn registries(&self) -> Vec<RegistryId>;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Downcasts a content item to a concrete definition type.
pub fn downcast<T: Any + Send + Sync>(content: &Arc<dyn Content>) -> Option<Arc<T>> {
    Arc::clone(content).into_any().downcast::<T>().ok()
}

/// Host asset loader handed to content when the host loads its resources.
pub trait ResourceLoader {
    /// Loads a sprite atlas by name. Returns false if the host has no such atlas.
    fn load_atlas(&mut self, name: &str) -> bool;
}
