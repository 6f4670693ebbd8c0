use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bevy::log::{debug, error, info};
use territory::error::PersistenceFailure;
use territory::repository::{CommitSink, RepositoryTables, TableRepository};

use crate::atomic_write::atomic_write;
use crate::save_error::SaveError;
use crate::snapshot::{decode_snapshot, encode_snapshot};

/// Writes every committed state of the tables to one snapshot file.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    compress: bool,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>, compress: bool) -> Self {
        Self {
            path: path.into(),
            compress,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommitSink for FileSink {
    fn commit(&self, tables: &RepositoryTables) -> Result<(), PersistenceFailure> {
        let bytes = encode_snapshot(tables, self.compress);
        match atomic_write(&self.path, &bytes) {
            Ok(()) => {
                debug!(
                    "wrote {} bytes of domain snapshot to {}",
                    bytes.len(),
                    self.path.display()
                );
                Ok(())
            }
            Err(e) => {
                error!("failed to write {}: {e}", self.path.display());
                Err(PersistenceFailure::with_source(
                    format!("writing {}", self.path.display()),
                    e,
                ))
            }
        }
    }
}

/// A repository whose every committed call is persisted to a snapshot file.
pub type FileRepository = TableRepository<FileSink>;

/// Tables stored at `path`, or empty tables when there is no file yet.
pub fn read_tables(path: &Path) -> Result<RepositoryTables, SaveError> {
    match fs::read(path) {
        Ok(bytes) => decode_snapshot(&bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(RepositoryTables::default()),
        Err(e) => Err(SaveError::Io(e)),
    }
}

/// Open the snapshot at `path` as a repository. A missing file starts empty
/// and is created by the first commit.
pub fn open_file_repository(
    path: impl Into<PathBuf>,
    compress: bool,
) -> Result<FileRepository, SaveError> {
    let sink = FileSink::new(path, compress);
    let tables = match read_tables(sink.path()) {
        Ok(tables) => tables,
        Err(e) => {
            error!("failed to open {}: {e}", sink.path().display());
            return Err(e);
        }
    };
    info!(
        "opened {}: {} domains, {} titles, {} claimed tiles",
        sink.path().display(),
        tables.domains.len(),
        tables.titles.len(),
        tables.claims.len()
    );
    Ok(TableRepository::with_sink(tables, sink))
}
