//! Delimiter-based entity save strings.
//!
//! # Wire Format
//!
//! ```text
//! <entity-id><oA><type-name><oA><room>.<x>.<y>.<node>[<oA><payload>]
//! ```
//!
//! The payload section is omitted when empty. A trailing empty payload
//! section is also accepted and decodes to an empty payload.

use crate::entity::{EntityId, EntityRecord, WorldCoordinate};
use crate::error::{ContentError, ErrorSeverity};
use crate::types::{TypeIdentifier, TypeTable};

/// Field separator reserved for entity save strings.
pub const DELIMITER: &str = "<oA>";

const MIN_PARTS: usize = 3;
const MAX_PARTS: usize = 4;

/// Structural corruption found while encoding or decoding a save string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("expected at least 3 fields, found {found}")]
    MissingFields { found: usize },

    /// The payload carried an unescaped delimiter.
    #[error("expected at most 4 fields, found {found}")]
    ExcessParts { found: usize },

    #[error("unknown type \"{name}\"")]
    UnknownType { name: String },

    #[error("type value {0} has no name in the table")]
    UnknownTypeId(TypeIdentifier),

    #[error("corrupt entity id \"{raw}\"")]
    CorruptEntityId { raw: String },

    #[error("corrupt world coordinate \"{raw}\"")]
    CorruptCoordinate { raw: String },
}

impl ContentError for CodecError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        use CodecError::*;
        match self {
            MissingFields { .. } => "CODEC_MISSING_FIELDS",
            ExcessParts { .. } => "CODEC_EXCESS_PARTS",
            UnknownType { .. } => "CODEC_UNKNOWN_TYPE",
            UnknownTypeId(_) => "CODEC_UNKNOWN_TYPE_ID",
            CorruptEntityId { .. } => "CODEC_CORRUPT_ENTITY_ID",
            CorruptCoordinate { .. } => "CODEC_CORRUPT_COORDINATE",
        }
    }
}

/// Encodes and decodes [`EntityRecord`]s against one type table.
///
/// Type values are written by canonical name and read back
/// case-insensitively, so `decode(encode(r)) == r` for every record.
#[derive(Clone, Copy, Debug)]
pub struct EntityCodec<'a> {
    types: &'a TypeTable,
}

impl<'a> EntityCodec<'a> {
    pub fn new(types: &'a TypeTable) -> Self {
        Self { types }
    }

    pub fn types(&self) -> &'a TypeTable {
        self.types
    }

    pub fn encode(&self, record: &EntityRecord) -> Result<String, CodecError> {
        let name = self
            .types
            .name_of(record.type_id())
            .ok_or(CodecError::UnknownTypeId(record.type_id()))?;

        let mut out = format!(
            "{id}{DELIMITER}{name}{DELIMITER}{pos}",
            id = record.id(),
            pos = record.pos()
        );
        if !record.payload().is_empty() {
            out.push_str(DELIMITER);
            out.push_str(record.payload());
        }
        Ok(out)
    }

    /// Decodes a save string. Never panics on malformed input.
    pub fn decode(&self, raw: &str) -> Result<EntityRecord, CodecError> {
        let parts: Vec<&str> = raw.split(DELIMITER).collect();
        if parts.len() < MIN_PARTS {
            return Err(CodecError::MissingFields { found: parts.len() });
        }
        if parts.len() > MAX_PARTS {
            return Err(CodecError::ExcessParts { found: parts.len() });
        }

        let type_id = self
            .types
            .lookup(parts[1])
            .ok_or_else(|| CodecError::UnknownType {
                name: parts[1].to_string(),
            })?;
        let id: EntityId = parts[0].parse().map_err(|_| CodecError::CorruptEntityId {
            raw: parts[0].to_string(),
        })?;
        let pos: WorldCoordinate =
            parts[2]
                .parse()
                .map_err(|_| CodecError::CorruptCoordinate {
                    raw: parts[2].to_string(),
                })?;
        let payload = parts.get(3).copied().unwrap_or_default();

        // `payload` came from a split on the delimiter, so it cannot contain it.
        EntityRecord::new(type_id, id, pos, payload).map_err(|_| CodecError::ExcessParts {
            found: parts.len(),
        })
    }
}
