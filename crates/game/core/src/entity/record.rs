use crate::entity::{DELIMITER, EntityId, WorldCoordinate};
use crate::error::{ContentError, ErrorSeverity};
use crate::types::TypeIdentifier;

/// Rejected payload passed to [`EntityRecord::new`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("entity payload cannot contain the record delimiter \"<oA>\"")]
pub struct PayloadError;

impl ContentError for PayloadError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "RECORD_PAYLOAD_CONTAINS_DELIMITER"
    }
}

/// Persisted save state of one entity.
///
/// Read-only once built. The payload is free-form content data that never
/// contains [`DELIMITER`]; it may be empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityRecord {
    type_id: TypeIdentifier,
    id: EntityId,
    pos: WorldCoordinate,
    payload: String,
}

impl EntityRecord {
    /// Builds a record, rejecting payloads that contain the delimiter.
    pub fn new(
        type_id: TypeIdentifier,
        id: EntityId,
        pos: WorldCoordinate,
        payload: impl Into<String>,
    ) -> Result<Self, PayloadError> {
        let payload = payload.into();
        if payload.contains(DELIMITER) {
            return Err(PayloadError);
        }
        Ok(Self {
            type_id,
            id,
            pos,
            payload,
        })
    }

    /// Record with an empty payload.
    pub fn bare(type_id: TypeIdentifier, id: EntityId, pos: WorldCoordinate) -> Self {
        Self {
            type_id,
            id,
            pos,
            payload: String::new(),
        }
    }

    /// Copy of this record carrying a different payload.
    pub fn with_payload(&self, payload: impl Into<String>) -> Result<Self, PayloadError> {
        Self::new(self.type_id, self.id, self.pos, payload)
    }

    pub fn type_id(&self) -> TypeIdentifier {
        self.type_id
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn pos(&self) -> WorldCoordinate {
        self.pos
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}
