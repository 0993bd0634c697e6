//! Repository contract for the save-slot file.

use game_core::SaveFile;
use tracing::{info, warn};

use crate::repository::Result;

/// Persists the whole save-slot snapshot of one profile.
///
/// Every write replaces the stored snapshot wholesale.
pub trait SaveRepository: Send + Sync {
    /// Returns `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<SaveFile>>;

    fn save(&self, file: &SaveFile) -> Result<()>;
}

/// Loads the stored snapshot, or starts from an empty one.
///
/// Missing or unreadable files never fail the caller: the problem is logged
/// and an empty snapshot is written in its place.
pub fn read_or_create(repository: &dyn SaveRepository) -> SaveFile {
    let reason = match repository.load() {
        Ok(Some(file)) => return file,
        Ok(None) => None,
        Err(err) => Some(err),
    };

    match &reason {
        None => info!(target: "runtime::repository", "no save file found; creating one"),
        Some(err) => warn!(
            target: "runtime::repository",
            error = %err,
            "save file unreadable; replacing it with an empty one"
        ),
    }

    let file = SaveFile::default();
    if let Err(err) = repository.save(&file) {
        warn!(target: "runtime::repository", error = %err, "failed to write empty save file");
    }
    file
}
