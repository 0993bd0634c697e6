use crate::types::{TypeSpace, TypeTable, TypeTables};

/// Names the host reserves in each value space, in value order.
///
/// Loaded once at startup; seeds the [`TypeTables`] content extends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HostCatalog {
    pub objects: Vec<String>,
    pub creatures: Vec<String>,
    pub unlocks: Vec<String>,
    /// Upper bound shared by every value space, built-ins included.
    pub max_types: Option<u32>,
}

impl HostCatalog {
    pub fn new(
        objects: impl IntoIterator<Item = impl Into<String>>,
        creatures: impl IntoIterator<Item = impl Into<String>>,
        unlocks: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            objects: objects.into_iter().map(Into::into).collect(),
            creatures: creatures.into_iter().map(Into::into).collect(),
            unlocks: unlocks.into_iter().map(Into::into).collect(),
            max_types: None,
        }
    }

    #[must_use]
    pub fn with_max_types(mut self, max_types: u32) -> Self {
        self.max_types = Some(max_types);
        self
    }

    /// Builds fresh tables with only the host's values allocated.
    pub fn type_tables(&self) -> TypeTables {
        let table = |space, names: &[String]| {
            let table = TypeTable::new(space, names.iter().cloned());
            match self.max_types {
                Some(limit) => table.with_limit(limit),
                None => table,
            }
        };

        TypeTables::new(
            table(TypeSpace::Objects, &self.objects),
            table(TypeSpace::Creatures, &self.creatures),
            table(TypeSpace::Unlocks, &self.unlocks),
        )
    }
}
