use std::path::PathBuf;
use std::sync::Arc;

use bevy::prelude::*;
use territory::DomainsContext;

use crate::file_repository::open_file_repository;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Where the installed context persists to, or why it does not.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Persistent(PathBuf),
    /// The snapshot could not be opened; the context is in-memory only and
    /// the file was left untouched.
    Unavailable { path: PathBuf, reason: String },
}

impl SaveStatus {
    pub fn is_persistent(&self) -> bool {
        matches!(self, SaveStatus::Persistent(_))
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Installs a [`DomainsContext`] backed by the snapshot file at `path`,
/// replacing any context added before it.
pub struct SavePlugin {
    pub path: PathBuf,
    pub compress: bool,
}

impl SavePlugin {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            compress: true,
        }
    }
}

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        match open_file_repository(self.path.clone(), self.compress) {
            Ok(repository) => {
                app.insert_resource(DomainsContext::new(Arc::new(repository)))
                    .insert_resource(SaveStatus::Persistent(self.path.clone()));
            }
            Err(e) => {
                error!(
                    "domains will not be saved: {} could not be opened ({e})",
                    self.path.display()
                );
                app.insert_resource(DomainsContext::in_memory())
                    .insert_resource(SaveStatus::Unavailable {
                        path: self.path.clone(),
                        reason: e.to_string(),
                    });
            }
        }
    }
}
