//! Open type-identifier tables shared between host built-ins and content.
//!
//! The host defines closed enumerations (object types, creature types,
//! sandbox unlock ids). Content extends them at startup through an explicit
//! [`TypeTable`]: a bidirectional name↔value map seeded with the host's
//! built-ins and append-only afterwards.

mod error;
mod table;

use std::fmt;

pub use error::RegistrationError;
pub use table::TypeTable;

/// Integer tag distinguishing entity kinds inside one value space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeIdentifier(pub u32);

impl TypeIdentifier {
    /// Returns the value as a table index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The host value space a [`TypeTable`] extends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeSpace {
    /// Abstract physical object types (items).
    Objects,
    /// Creature template types.
    Creatures,
    /// Sandbox unlock identifiers.
    Unlocks,
}

impl TypeSpace {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Objects => "object",
            Self::Creatures => "creature",
            Self::Unlocks => "unlock",
        }
    }
}

impl fmt::Display for TypeSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content type in either physical value space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhysobType {
    Object(TypeIdentifier),
    Creature(TypeIdentifier),
}

impl PhysobType {
    /// Returns the raw identifier regardless of space.
    pub const fn id(self) -> TypeIdentifier {
        match self {
            Self::Object(id) | Self::Creature(id) => id,
        }
    }

    pub const fn space(self) -> TypeSpace {
        match self {
            Self::Object(_) => TypeSpace::Objects,
            Self::Creature(_) => TypeSpace::Creatures,
        }
    }
}

impl fmt::Display for PhysobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.space(), self.id())
    }
}

/// The three host tables content may extend.
#[derive(Clone, Debug)]
pub struct TypeTables {
    pub objects: TypeTable,
    pub creatures: TypeTable,
    pub unlocks: TypeTable,
}

impl TypeTables {
    pub fn new(objects: TypeTable, creatures: TypeTable, unlocks: TypeTable) -> Self {
        Self {
            objects,
            creatures,
            unlocks,
        }
    }

    /// Returns the table backing `space`.
    pub fn table(&self, space: TypeSpace) -> &TypeTable {
        match space {
            TypeSpace::Objects => &self.objects,
            TypeSpace::Creatures => &self.creatures,
            TypeSpace::Unlocks => &self.unlocks,
        }
    }

    /// Returns the name a physical type was registered under.
    pub fn name_of(&self, ty: PhysobType) -> Option<&str> {
        self.table(ty.space()).name_of(ty.id())
    }
}
