//! File persistence for the territory repository.
//!
//! The whole repository is one snapshot file (see [`file_header`]) that is
//! rewritten atomically on every committed call.

mod atomic_write;
pub mod file_header;
pub mod file_repository;
mod save_error;
mod save_plugin;
pub mod snapshot;

pub use atomic_write::atomic_write;
pub use file_repository::{open_file_repository, read_tables, FileRepository, FileSink};
pub use save_error::SaveError;
pub use save_plugin::{SavePlugin, SaveStatus};
