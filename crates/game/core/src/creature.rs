//! Creature templates and the relationship table kept parallel to the
//! creature value space.
//!
//! Every creature value, built-in or allocated, owns exactly one template
//! slot and one row/column in the relationship table. Growing the value
//! space must grow both before any lookup happens.

use crate::error::{ContentError, ErrorSeverity};
use crate::types::TypeIdentifier;

/// How one creature type reacts to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelationKind {
    #[default]
    Ignores,
    Eats,
    Afraid,
    Attacks,
    Uncomfortable,
    PlaysWith,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relationship {
    pub kind: RelationKind,
    /// 0.0 to 1.0.
    pub intensity: f32,
}

impl Relationship {
    pub const fn new(kind: RelationKind, intensity: f32) -> Self {
        Self { kind, intensity }
    }
}

/// Static description of one creature type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureTemplate {
    pub ty: TypeIdentifier,
    pub name: String,
    /// Parent template this one derives from.
    pub ancestor: Option<TypeIdentifier>,
    /// Whether realized creatures of this type run an AI.
    pub ai: bool,
}

impl CreatureTemplate {
    pub fn new(ty: TypeIdentifier, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
            ancestor: None,
            ai: false,
        }
    }

    #[must_use]
    pub fn with_ancestor(mut self, ancestor: TypeIdentifier) -> Self {
        self.ancestor = Some(ancestor);
        self
    }

    #[must_use]
    pub fn with_ai(mut self, ai: bool) -> Self {
        self.ai = ai;
        self
    }
}

/// Errors raised while installing templates into the catalog.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("template type {ty} would overwrite a built-in (built-ins end at {reserved})")]
    OverwritesBuiltin { ty: TypeIdentifier, reserved: usize },

    #[error("template type {ty} is outside the catalog (length {len})")]
    OutOfRange { ty: TypeIdentifier, len: usize },

    #[error("template slot {index} was left unset")]
    UnsetSlot { index: usize },

    #[error("ancestor chain of {ty} is cyclic or refers to a missing template")]
    BrokenAncestry { ty: TypeIdentifier },
}

impl ContentError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }
}

/// Creature templates indexed by value, plus the square relationship table.
#[derive(Clone, Debug)]
pub struct CreatureCatalog {
    templates: Vec<Option<CreatureTemplate>>,
    relationships: Vec<Vec<Relationship>>,
    reserved: usize,
    default_relationship: Relationship,
}

impl CreatureCatalog {
    /// Seeds the catalog with the host's templates, one per built-in value.
    pub fn from_builtins(templates: Vec<CreatureTemplate>, default: Relationship) -> Self {
        let len = templates.len();
        Self {
            templates: templates.into_iter().map(Some).collect(),
            relationships: vec![vec![default; len]; len],
            reserved: len,
            default_relationship: default,
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn template(&self, ty: TypeIdentifier) -> Option<&CreatureTemplate> {
        self.templates.get(ty.index()).and_then(Option::as_ref)
    }

    /// Installs content templates after the value space grew to `len`.
    ///
    /// Existing rows gain columns filled with their own first entry; new rows
    /// start from the catalog default. Fails if any slot stays unset.
    pub fn install(
        &mut self,
        templates: Vec<CreatureTemplate>,
        len: usize,
    ) -> Result<(), CatalogError> {
        let mut grown = self.templates.clone();
        if grown.len() < len {
            grown.resize(len, None);
        }

        for template in templates {
            let index = template.ty.index();
            if index < self.reserved {
                return Err(CatalogError::OverwritesBuiltin {
                    ty: template.ty,
                    reserved: self.reserved,
                });
            }
            if index >= grown.len() {
                return Err(CatalogError::OutOfRange {
                    ty: template.ty,
                    len: grown.len(),
                });
            }
            grown[index] = Some(template);
        }

        if let Some(index) = grown.iter().position(Option::is_none) {
            return Err(CatalogError::UnsetSlot { index });
        }

        let new_len = grown.len();
        for row in &mut self.relationships {
            let fill = row.first().copied().unwrap_or(self.default_relationship);
            row.resize(new_len, fill);
        }
        self.relationships
            .resize(new_len, vec![self.default_relationship; new_len]);
        self.templates = grown;

        Ok(())
    }

    /// Follows ancestors until a template without one.
    pub fn top_ancestor(&self, ty: TypeIdentifier) -> Result<TypeIdentifier, CatalogError> {
        top_ancestor(ty, |t| self.template(t))
    }

    pub fn relationship(&self, from: TypeIdentifier, to: TypeIdentifier) -> Option<Relationship> {
        self.relationships
            .get(from.index())
            .and_then(|row| row.get(to.index()))
            .copied()
    }

    pub fn set_relationship(
        &mut self,
        from: TypeIdentifier,
        to: TypeIdentifier,
        relationship: Relationship,
    ) -> Result<(), CatalogError> {
        let len = self.relationships.len();
        let cell = self
            .relationships
            .get_mut(from.index())
            .and_then(|row| row.get_mut(to.index()))
            .ok_or(CatalogError::OutOfRange {
                ty: if from.index() >= len { from } else { to },
                len,
            })?;
        *cell = relationship;
        Ok(())
    }
}

/// Walks the ancestor chain of `ty` using `get` to resolve templates.
pub fn top_ancestor<'a, F>(ty: TypeIdentifier, get: F) -> Result<TypeIdentifier, CatalogError>
where
    F: Fn(TypeIdentifier) -> Option<&'a CreatureTemplate>,
{
    let mut current = ty;
    // A chain longer than this has to revisit a template.
    for _ in 0..=u16::MAX {
        let template = get(current).ok_or(CatalogError::BrokenAncestry { ty })?;
        match template.ancestor {
            Some(parent) => current = parent,
            None => return Ok(current),
        }
    }
    Err(CatalogError::BrokenAncestry { ty })
}
