//! In-memory SaveRepository for tests and hosts without persistence.

use std::sync::RwLock;

use game_core::SaveFile;

use crate::repository::{RepositoryError, Result, SaveRepository};

#[derive(Debug, Default)]
pub struct InMemorySaveRepository {
    file: RwLock<Option<SaveFile>>,
}

impl InMemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(file: SaveFile) -> Self {
        Self {
            file: RwLock::new(Some(file)),
        }
    }
}

impl SaveRepository for InMemorySaveRepository {
    fn load(&self) -> Result<Option<SaveFile>> {
        let file = self.file.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(file.clone())
    }

    fn save(&self, file: &SaveFile) -> Result<()> {
        let mut stored = self
            .file
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *stored = Some(file.clone());
        Ok(())
    }
}
