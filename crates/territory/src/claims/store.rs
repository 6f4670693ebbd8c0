use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use bevy::log::debug;

use super::revisions::ClaimRevisions;
use super::types::{ClaimState, ColumnClaims};
use crate::coords::{ColumnIndex, ColumnPos, TileCoord};
use crate::error::{ClaimConflict, DomainsError};
use crate::key::Key;
use crate::repository::Repository;

type TileLock = Arc<Mutex<()>>;

/// Per-tile claim state machine on top of a [`Repository`].
///
/// Each mutation reads the stored state, checks its precondition and writes
/// the new state while holding a lock for that tile, so two annexations of
/// the same vacant tile or column cannot both succeed. Operations on
/// different tiles proceed in parallel. Annexing requires the owner domain
/// to be stored.
///
/// Operations that rewrite claims of many tiles at once (see
/// [`ClaimStore::with_all_tiles`]) exclude every per-tile operation while they
/// run.
pub struct ClaimStore {
    repository: Arc<dyn Repository>,
    locks: Mutex<HashMap<TileCoord, TileLock>>,
    gate: RwLock<()>,
    revisions: ClaimRevisions,
}

impl ClaimStore {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self {
            repository,
            locks: Mutex::new(HashMap::new()),
            gate: RwLock::new(()),
            revisions: ClaimRevisions::new(),
        }
    }

    pub fn revisions(&self) -> &ClaimRevisions {
        &self.revisions
    }

    pub fn revision(&self, tile: TileCoord) -> u64 {
        self.revisions.revision(tile)
    }

    /// Run `f` while holding the lock of `tile`. Lock entries are dropped
    /// again once no other caller waits on them.
    fn with_tile_lock<T>(&self, tile: TileCoord, f: impl FnOnce() -> T) -> T {
        let _gate = self.gate.read().unwrap_or_else(PoisonError::into_inner);
        let lock = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(tile)
            .or_default()
            .clone();
        let result = {
            let _held = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        drop(lock);
        // Clones are only taken under the table lock, so a count of one means
        // the table holds the last reference.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks.get(&tile).is_some_and(|entry| Arc::strong_count(entry) == 1) {
            locks.remove(&tile);
        }
        result
    }

    #[cfg(test)]
    pub(super) fn held_tile_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Run a repository call that may rewrite claims of any tile, excluding
    /// all per-tile operations. On success every tile's revision advances.
    pub fn with_all_tiles<T>(
        &self,
        f: impl FnOnce(&dyn Repository) -> Result<T, DomainsError>,
    ) -> Result<T, DomainsError> {
        let _gate = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        let result = f(self.repository.as_ref())?;
        self.revisions.bump_epoch();
        Ok(result)
    }

    pub fn claim_at(&self, tile: TileCoord) -> Result<ClaimState, DomainsError> {
        Ok(self.repository.load_claim_state(tile)?)
    }

    pub fn owner_at(&self, pos: ColumnPos) -> Result<Option<Key>, DomainsError> {
        Ok(self.claim_at(pos.tile())?.owner(pos.column()).cloned())
    }

    /// Claims may only name a stored domain. Called under the gate, so the
    /// domain cannot be deleted or renamed before the claim is written.
    fn require_domain(&self, owner: &Key) -> Result<(), DomainsError> {
        match self.repository.load_domain(owner)? {
            Some(_) => Ok(()),
            None => Err(DomainsError::UnknownDomain(owner.clone())),
        }
    }

    /// Claim a whole vacant tile for `owner`.
    pub fn annex_exclusive(&self, tile: TileCoord, owner: &Key) -> Result<(), DomainsError> {
        self.with_tile_lock(tile, || -> Result<(), DomainsError> {
            self.require_domain(owner)?;
            match self.repository.load_claim_state(tile)? {
                ClaimState::Unclaimed => {}
                ClaimState::Exclusive(current) => {
                    return Err(ClaimConflict::AlreadyExclusive { owner: current }.into())
                }
                ClaimState::Partitioned(_) => return Err(ClaimConflict::AlreadyPartitioned.into()),
            }
            self.repository.save_exclusive_claim(tile, owner)?;
            let revision = self.revisions.bump(tile);
            debug!("annexed {tile} for {owner} (revision {revision})");
            Ok(())
        })
    }

    /// Claim one vacant column. An unclaimed tile becomes partitioned.
    pub fn annex_column(
        &self,
        tile: TileCoord,
        column: ColumnIndex,
        owner: &Key,
    ) -> Result<(), DomainsError> {
        self.with_tile_lock(tile, || -> Result<(), DomainsError> {
            self.require_domain(owner)?;
            let mut columns = match self.repository.load_claim_state(tile)? {
                ClaimState::Unclaimed => ColumnClaims::new(),
                ClaimState::Exclusive(current) => {
                    return Err(ClaimConflict::TileFullyClaimed { owner: current }.into())
                }
                ClaimState::Partitioned(columns) => columns,
            };
            if let Some(current) = columns.get(column) {
                return Err(ClaimConflict::ColumnOccupied {
                    owner: current.clone(),
                }
                .into());
            }
            columns.set(column, owner.clone());
            self.repository.save_partitioned_claim(tile, &columns)?;
            let revision = self.revisions.bump(tile);
            debug!(
                "annexed column ({}, {}) of {tile} for {owner} (revision {revision})",
                column.i(),
                column.k()
            );
            Ok(())
        })
    }

    /// Release a whole-tile claim, returning its former owner.
    pub fn release_exclusive(&self, tile: TileCoord) -> Result<Key, DomainsError> {
        self.with_tile_lock(tile, || -> Result<Key, DomainsError> {
            let ClaimState::Exclusive(owner) = self.repository.load_claim_state(tile)? else {
                return Err(ClaimConflict::NotExclusive.into());
            };
            self.repository.delete_claim(tile)?;
            self.revisions.bump(tile);
            debug!("released {tile} from {owner}");
            Ok(owner)
        })
    }

    /// Release one column, returning its former owner. Releasing the last
    /// occupied column leaves the tile unclaimed.
    pub fn release_column(
        &self,
        tile: TileCoord,
        column: ColumnIndex,
    ) -> Result<Key, DomainsError> {
        self.with_tile_lock(tile, || -> Result<Key, DomainsError> {
            let mut columns = match self.repository.load_claim_state(tile)? {
                ClaimState::Unclaimed => return Err(ClaimConflict::ColumnVacant.into()),
                // A whole-tile claim is released as a whole.
                ClaimState::Exclusive(owner) => {
                    return Err(ClaimConflict::TileFullyClaimed { owner }.into())
                }
                ClaimState::Partitioned(columns) => columns,
            };
            let Some(owner) = columns.clear(column) else {
                return Err(ClaimConflict::ColumnVacant.into());
            };
            if columns.is_empty() {
                self.repository.delete_claim(tile)?;
            } else {
                self.repository.save_partitioned_claim(tile, &columns)?;
            }
            self.revisions.bump(tile);
            debug!(
                "released column ({}, {}) of {tile} from {owner}",
                column.i(),
                column.k()
            );
            Ok(owner)
        })
    }
}
