//! File-backed SaveRepository.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use game_core::{SaveFile, SaveSlot};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::repository::{RepositoryError, Result, SaveRepository};

/// Stores one profile's save slots as a JSON file.
///
/// # File Format
///
/// ```json
/// {
///   "checksum": "<hex sha256 of the serialized slots>",
///   "slots": { "sav": ["glowlantern", "rock"] }
/// }
/// ```
///
/// Writes go to a temp file that is renamed over the old one.
#[derive(Debug, Clone)]
pub struct FileSaveRepository {
    path: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    checksum: String,
    slots: BTreeMap<String, SaveSlot>,
}

fn checksum(slots: &BTreeMap<String, SaveSlot>) -> Result<String> {
    let bytes = serde_json::to_vec(slots).map_err(|e| RepositoryError::Json(e.to_string()))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

impl FileSaveRepository {
    /// Uses `<dir>/<profile>.json`, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>, profile: &str) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(RepositoryError::Io)?;
        Ok(Self {
            path: dir.join(format!("{profile}.json")),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveRepository for FileSaveRepository {
    fn load(&self) -> Result<Option<SaveFile>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path).map_err(RepositoryError::Io)?;
        let envelope: Envelope =
            serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Json(e.to_string()))?;

        let expected = checksum(&envelope.slots)?;
        if expected != envelope.checksum {
            return Err(RepositoryError::CorruptedData(format!(
                "checksum mismatch in {}: stored {}, computed {}",
                self.path.display(),
                envelope.checksum,
                expected
            )));
        }

        tracing::debug!(
            target: "runtime::repository",
            path = %self.path.display(),
            slots = envelope.slots.len(),
            "loaded save file"
        );
        Ok(Some(SaveFile::new(envelope.slots)))
    }

    fn save(&self, file: &SaveFile) -> Result<()> {
        let slots = file.slots().clone();
        let envelope = Envelope {
            checksum: checksum(&slots)?,
            slots,
        };
        let bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| RepositoryError::Json(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &self.path).map_err(RepositoryError::Io)?;

        tracing::debug!(
            target: "runtime::repository",
            path = %self.path.display(),
            "saved save file"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::read_or_create;

    #[test]
    fn save_then_load_returns_same_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path(), "default").unwrap();
        let file = SaveFile::default()
            .unlock("sav", "glowlantern")
            .unlock("sav", "glowworm")
            .unlock("sav_2", "rock");

        repo.save(&file).unwrap();

        assert_eq!(repo.load().unwrap(), Some(file));
        assert!(!repo.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path().join("nested"), "default").unwrap();

        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn tampered_file_fails_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path(), "default").unwrap();
        repo.save(&SaveFile::default().unlock("sav", "glowlantern"))
            .unwrap();

        let text = fs::read_to_string(repo.path()).unwrap();
        fs::write(repo.path(), text.replace("glowlantern", "everything")).unwrap();

        assert!(matches!(
            repo.load(),
            Err(RepositoryError::CorruptedData(_))
        ));
    }

    #[test]
    fn read_or_create_replaces_garbage_with_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path(), "default").unwrap();
        fs::write(repo.path(), "not json").unwrap();

        let file = read_or_create(&repo);

        assert_eq!(file, SaveFile::default());
        assert_eq!(repo.load().unwrap(), Some(SaveFile::default()));
    }
}
