//! Append-only name↔value allocator for one host value space.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{RegistrationError, TypeIdentifier, TypeSpace};

/// Bidirectional map between case-insensitive names and integer values.
///
/// Values `[0, reserved_max)` belong to the host's built-ins and are never
/// handed out. Content values start at `reserved_max`, are assigned in the
/// order they were proposed, and are never reused.
#[derive(Clone, Debug)]
pub struct TypeTable {
    space: TypeSpace,
    /// Canonical names, indexed by value.
    names: Vec<String>,
    /// Lowercased name → value.
    by_name: HashMap<String, TypeIdentifier>,
    reserved_max: u32,
    limit: Option<u32>,
}

impl TypeTable {
    /// Creates a table whose reserved range is exactly `builtins`, in value order.
    pub fn new<I, S>(space: TypeSpace, builtins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = builtins.into_iter().map(Into::into).collect();
        let mut by_name = HashMap::with_capacity(names.len());
        for (value, name) in names.iter().enumerate() {
            by_name
                .entry(name.to_lowercase())
                .or_insert(TypeIdentifier(value as u32));
        }

        Self {
            space,
            reserved_max: names.len() as u32,
            names,
            by_name,
            limit: None,
        }
    }

    /// Caps the value space at `limit` values (built-ins included).
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn space(&self) -> TypeSpace {
        self.space
    }

    /// First value past the host-owned range.
    pub fn reserved_max(&self) -> u32 {
        self.reserved_max
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Total number of values, built-ins included.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns true if `id` belongs to the host's built-in range.
    pub fn is_reserved(&self, id: TypeIdentifier) -> bool {
        id.0 < self.reserved_max
    }

    /// Returns true if `id` was allocated to content.
    pub fn is_content(&self, id: TypeIdentifier) -> bool {
        !self.is_reserved(id) && id.index() < self.names.len()
    }

    /// Case-insensitive lookup by name.
    pub fn lookup(&self, name: &str) -> Option<TypeIdentifier> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    /// Returns the canonical name of a value.
    pub fn name_of(&self, id: TypeIdentifier) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Iterates over values allocated to content, in allocation order.
    pub fn content_types(&self) -> impl Iterator<Item = (TypeIdentifier, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .skip(self.reserved_max as usize)
            .map(|(value, name)| (TypeIdentifier(value as u32), name.as_str()))
    }

    /// Checks a batch of proposals without allocating anything.
    pub fn validate<S: AsRef<str>>(&self, proposals: &[S]) -> Result<(), RegistrationError> {
        let mut batch: Vec<String> = Vec::with_capacity(proposals.len());

        for proposal in proposals {
            let name = proposal.as_ref();
            check_name(self.space, name)?;

            let key = name.to_lowercase();
            if let Some(existing) = self.by_name.get(&key) {
                return Err(if self.is_reserved(*existing) {
                    RegistrationError::ReservedName {
                        space: self.space,
                        name: name.to_string(),
                    }
                } else {
                    RegistrationError::DuplicateName {
                        space: self.space,
                        name: name.to_string(),
                    }
                });
            }
            if batch.contains(&key) {
                return Err(RegistrationError::DuplicateName {
                    space: self.space,
                    name: name.to_string(),
                });
            }
            batch.push(key);
        }

        if let Some(limit) = self.limit
            && self.names.len() + proposals.len() > limit as usize
        {
            return Err(RegistrationError::CapacityExceeded {
                space: self.space,
                requested: proposals.len(),
                used: self.names.len(),
                limit,
            });
        }

        Ok(())
    }

    /// Validates the whole batch, then assigns contiguous values in order.
    ///
    /// On error nothing is committed.
    pub fn allocate<S: AsRef<str>>(
        &mut self,
        proposals: &[S],
    ) -> Result<Vec<TypeIdentifier>, RegistrationError> {
        self.validate(proposals)?;

        let mut allocated = Vec::with_capacity(proposals.len());
        for proposal in proposals {
            let name = proposal.as_ref();
            let id = TypeIdentifier(self.names.len() as u32);
            self.names.push(name.to_string());
            self.by_name.insert(name.to_lowercase(), id);
            allocated.push(id);

            debug!(
                target: "game_core::types",
                space = %self.space,
                name,
                value = id.0,
                "allocated type"
            );
        }

        Ok(allocated)
    }
}

fn check_name(space: TypeSpace, name: &str) -> Result<(), RegistrationError> {
    let reason = if name.is_empty() {
        "identifier cannot be empty"
    } else if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        "identifier must only consist of ASCII letters, digits and _"
    } else {
        return Ok(());
    };

    Err(RegistrationError::InvalidName {
        space,
        name: name.to_string(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtins(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("Builtin{i}")).collect()
    }

    fn table() -> TypeTable {
        TypeTable::new(TypeSpace::Objects, builtins(50))
    }

    #[test]
    fn first_allocation_lands_past_reserved_range() {
        let mut table = table();
        let ids = table.allocate(&["glowlantern"]).unwrap();

        assert_eq!(ids, vec![TypeIdentifier(50)]);
        assert_eq!(table.name_of(ids[0]), Some("glowlantern"));
        assert_eq!(table.lookup("GlowLantern"), Some(TypeIdentifier(50)));
        assert!(table.is_content(ids[0]));
        assert!(!table.is_reserved(ids[0]));
    }

    #[test]
    fn reserved_name_is_rejected_case_insensitively() {
        let mut table = table();
        let err = table.allocate(&["builtin7"]).unwrap_err();

        assert!(matches!(err, RegistrationError::ReservedName { .. }));
        assert_eq!(table.len(), 50);
    }

    #[test]
    fn duplicate_allocation_fails_and_keeps_single_entry() {
        let mut table = table();
        table.allocate(&["glowlantern"]).unwrap();
        let err = table.allocate(&["GLOWLANTERN"]).unwrap_err();

        assert!(matches!(err, RegistrationError::DuplicateName { .. }));
        assert_eq!(table.content_types().count(), 1);
    }

    #[test]
    fn failed_batch_commits_nothing() {
        let mut table = table();
        let err = table
            .allocate(&["first", "second", "Builtin3"])
            .unwrap_err();

        assert!(matches!(err, RegistrationError::ReservedName { .. }));
        assert_eq!(table.lookup("first"), None);
        assert_eq!(table.len(), 50);
    }

    #[test]
    fn duplicate_inside_one_batch_is_rejected() {
        let mut table = table();
        let err = table.allocate(&["lantern", "Lantern"]).unwrap_err();

        assert!(matches!(err, RegistrationError::DuplicateName { .. }));
        assert_eq!(table.len(), 50);
    }

    #[test]
    fn invalid_characters_are_rejected() {
        let table = table();

        for bad in ["", "glow.lantern", "glow<oA>lantern", "glow lantern"] {
            let err = table.validate(&[bad]).unwrap_err();
            assert!(
                matches!(err, RegistrationError::InvalidName { .. }),
                "{bad:?} should be invalid"
            );
        }
    }

    #[test]
    fn thousand_allocations_are_contiguous() {
        let mut table = table();
        let names: Vec<String> = (0..1000).map(|i| format!("content_{i}")).collect();

        let mut ids = Vec::new();
        for name in &names {
            ids.extend(table.allocate(&[name]).unwrap());
        }

        for (offset, id) in ids.iter().enumerate() {
            assert_eq!(id.0, 50 + offset as u32);
            assert_eq!(table.name_of(*id), Some(names[offset].as_str()));
            assert_eq!(table.lookup(&names[offset]), Some(*id));
        }
    }

    #[test]
    fn limit_is_enforced_before_commit() {
        let mut table = TypeTable::new(TypeSpace::Creatures, builtins(3)).with_limit(5);
        table.allocate(&["one"]).unwrap();

        let err = table.allocate(&["two", "three"]).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::CapacityExceeded {
                requested: 2,
                used: 4,
                limit: 5,
                ..
            }
        ));
        assert_eq!(table.len(), 4);

        table.allocate(&["two"]).unwrap();
        assert_eq!(table.len(), 5);
    }
}
