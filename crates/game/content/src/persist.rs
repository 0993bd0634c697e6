//! Save-string interception shared by the item and creature registries.

use game_core::{
    AbstractEntity, CodecError, ContentError, DELIMITER, EntityCodec, EntityRecord, PayloadError,
    TypeIdentifier, TypeTable,
};
use tracing::{error, warn};

use crate::hooks::HookOutcome;

/// Errors raised while saving a content entity.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Decodes `raw` if its type field names a type `owns` accepts.
///
/// Strings for other types fall through untouched. Corrupt strings for an
/// owned type are logged and yield `Handled(None)` so the host skips them.
pub(crate) fn decode_owned(
    raw: &str,
    table: &TypeTable,
    owns: impl Fn(TypeIdentifier) -> bool,
) -> HookOutcome<Option<EntityRecord>> {
    let owned = raw
        .split(DELIMITER)
        .nth(1)
        .and_then(|name| table.lookup(name))
        .is_some_and(&owns);
    if !owned {
        return HookOutcome::Fallthrough;
    }

    match EntityCodec::new(table).decode(raw) {
        Ok(record) => HookOutcome::Handled(Some(record)),
        Err(error) if error.severity().is_recoverable() => {
            warn!(
                target: "game_content::persist",
                %error,
                code = error.error_code(),
                space = %table.space(),
                raw,
                "skipping corrupt entity save string"
            );
            HookOutcome::Handled(None)
        }
        Err(error) => {
            error!(
                target: "game_content::persist",
                %error,
                code = error.error_code(),
                space = %table.space(),
                raw,
                "entity save string could not be read"
            );
            HookOutcome::Handled(None)
        }
    }
}

/// Encodes a content entity with the payload its behavior produced.
pub(crate) fn encode(
    table: &TypeTable,
    entity: &AbstractEntity,
    payload: String,
) -> Result<String, SaveError> {
    let record = EntityRecord::new(entity.kind.id(), entity.id, entity.pos, payload)?;
    Ok(EntityCodec::new(table).encode(&record)?)
}
