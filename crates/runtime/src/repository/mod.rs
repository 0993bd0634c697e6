//! Persistence for the save-slot file.
//!
//! The save-slot file is the only long-lived mutable state. Callers hold the
//! current [`SaveFile`](game_core::SaveFile) snapshot themselves; repositories
//! only read it at startup and rewrite it wholesale on every change.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSaveRepository;
pub use memory::InMemorySaveRepository;
pub use traits::{SaveRepository, read_or_create};
