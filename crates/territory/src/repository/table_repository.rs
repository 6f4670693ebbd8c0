use std::sync::{Arc, Mutex, PoisonError, RwLock};

use bevy::log::warn;

use super::tables::RepositoryTables;
use super::Repository;
use crate::claims::{ClaimState, ColumnClaims};
use crate::coords::{ActorId, TileCoord};
use crate::domain::{Domain, Title};
use crate::error::{CorruptRecord, PersistenceFailure, RepositoryError};
use crate::key::Key;

/// Durable destination for committed tables.
///
/// `commit` receives the complete post-transaction state. Returning an error
/// aborts the transaction: the repository keeps its previous tables.
pub trait CommitSink: Send + Sync {
    fn commit(&self, tables: &RepositoryTables) -> Result<(), PersistenceFailure>;
}

/// No durability: every commit succeeds.
impl CommitSink for () {
    fn commit(&self, _tables: &RepositoryTables) -> Result<(), PersistenceFailure> {
        Ok(())
    }
}

/// A [`Repository`] over [`RepositoryTables`] held in memory.
///
/// A write clones the committed tables, applies the change to the copy,
/// hands the copy to the sink and publishes it only after the sink accepted
/// it. Writers queue on their own lock; readers take the published tables
/// and never wait for a commit in progress.
pub struct TableRepository<C: CommitSink = ()> {
    committed: RwLock<Arc<RepositoryTables>>,
    writer: Mutex<()>,
    sink: C,
}

pub type MemoryRepository = TableRepository<()>;

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::with_sink(RepositoryTables::default(), ())
    }
}

impl<C: CommitSink> TableRepository<C> {
    pub fn with_sink(tables: RepositoryTables, sink: C) -> Self {
        Self {
            committed: RwLock::new(Arc::new(tables)),
            writer: Mutex::new(()),
            sink,
        }
    }

    pub fn sink(&self) -> &C {
        &self.sink
    }

    /// Copy of the committed tables.
    pub fn snapshot(&self) -> RepositoryTables {
        self.current().as_ref().clone()
    }

    fn current(&self) -> Arc<RepositoryTables> {
        self.committed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn read<T>(
        &self,
        f: impl FnOnce(&RepositoryTables) -> Result<T, CorruptRecord>,
    ) -> Result<T, RepositoryError> {
        Ok(f(&self.current())?)
    }

    fn write(
        &self,
        operation: &str,
        f: impl FnOnce(&mut RepositoryTables),
    ) -> Result<(), RepositoryError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = self.current().as_ref().clone();
        f(&mut next);
        if let Err(e) = self.sink.commit(&next) {
            warn!("{operation} rolled back: {e}");
            return Err(e.into());
        }
        *self.committed.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
        Ok(())
    }
}

impl<C: CommitSink> Repository for TableRepository<C> {
    fn load_domain(&self, key: &Key) -> Result<Option<Domain>, RepositoryError> {
        self.read(|t| t.domain(key))
    }

    fn save_domain(&self, domain: &Domain) -> Result<(), RepositoryError> {
        self.write("save_domain", |t| t.put_domain(domain))
    }

    fn delete_domain(&self, key: &Key) -> Result<(), RepositoryError> {
        self.write("delete_domain", |t| t.remove_domain(key))
    }

    fn rename_domain(&self, from: &Key, to: &Key) -> Result<(), RepositoryError> {
        self.write("rename_domain", |t| t.rename_domain(from, to))
    }

    fn integrate_domain(&self, from: &Key, into: &Key) -> Result<(), RepositoryError> {
        self.write("integrate_domain", |t| t.integrate_domain(from, into))
    }

    fn list_domains(&self) -> Result<Vec<Key>, RepositoryError> {
        self.read(RepositoryTables::domain_keys)
    }

    fn load_claim_state(&self, tile: TileCoord) -> Result<ClaimState, RepositoryError> {
        self.read(|t| t.claim_state(tile))
    }

    fn save_exclusive_claim(&self, tile: TileCoord, owner: &Key) -> Result<(), RepositoryError> {
        self.write("save_exclusive_claim", |t| t.put_exclusive(tile, owner))
    }

    fn save_partitioned_claim(
        &self,
        tile: TileCoord,
        columns: &ColumnClaims,
    ) -> Result<(), RepositoryError> {
        self.write("save_partitioned_claim", |t| t.put_partitioned(tile, columns))
    }

    fn delete_claim(&self, tile: TileCoord) -> Result<(), RepositoryError> {
        self.write("delete_claim", |t| t.remove_claim(tile))
    }

    fn load_titles_for_domain(&self, key: &Key) -> Result<Vec<Title>, RepositoryError> {
        self.read(|t| t.titles_for_domain(key))
    }

    fn load_titles_for_actor(&self, actor: ActorId) -> Result<Vec<Title>, RepositoryError> {
        self.read(|t| t.titles_for_actor(actor))
    }
}
