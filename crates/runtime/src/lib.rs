//! Host integration for content registration.
//!
//! [`ContentRuntime`] defers registration until the host reports it has
//! started, routes host hook calls into the [`ContentContext`], and keeps
//! the save-slot snapshot in sync with its repository.
//!
//! - [`lifecycle`] provides the one-shot ready notification
//! - [`repository`] persists the save-slot file
//! - [`config`] reads [`RuntimeConfig`] from the environment
//!
//! [`ContentContext`]: game_content::ContentContext
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod repository;
pub mod runtime;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use lifecycle::{ListenerId, ReadyNotifier};
pub use repository::{
    FileSaveRepository, InMemorySaveRepository, RepositoryError, SaveRepository, read_or_create,
};
pub use runtime::{ContentRuntime, Registration};
