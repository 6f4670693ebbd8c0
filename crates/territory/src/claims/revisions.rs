use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::coords::TileCoord;

/// Tiles with an individual stamp before the table is folded into the epoch.
pub const DEFAULT_TRACKED_TILES: usize = 1 << 16;

/// Monotonic change stamps for tile claims.
///
/// Every committed mutation of a tile draws a fresh value from one shared
/// clock. Operations that touch claims of unknown tiles (domain deletion,
/// rename, integration) advance the epoch instead, which counts as a change
/// to every tile at once.
///
/// Advancing the epoch makes every individual stamp redundant, so the table
/// is cleared. When it reaches its limit it is folded the same way. A tile's
/// revision therefore never decreases.
#[derive(Debug)]
pub struct ClaimRevisions {
    clock: AtomicU64,
    epoch: AtomicU64,
    tiles: Mutex<HashMap<TileCoord, u64>>,
    limit: usize,
}

impl Default for ClaimRevisions {
    fn default() -> Self {
        Self::with_limit(DEFAULT_TRACKED_TILES)
    }
}

impl ClaimRevisions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            clock: AtomicU64::new(0),
            epoch: AtomicU64::new(0),
            tiles: Mutex::new(HashMap::new()),
            limit: limit.max(1),
        }
    }

    fn tiles(&self) -> MutexGuard<'_, HashMap<TileCoord, u64>> {
        self.tiles.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Raise the epoch to a fresh stamp and drop the stamps it supersedes.
    fn fold(&self, tiles: &mut HashMap<TileCoord, u64>) -> u64 {
        let revision = self.next();
        self.epoch.fetch_max(revision, Ordering::SeqCst);
        tiles.clear();
        revision
    }

    /// Record a change to `tile` and return its new revision.
    pub fn bump(&self, tile: TileCoord) -> u64 {
        let mut tiles = self.tiles();
        if tiles.len() >= self.limit && !tiles.contains_key(&tile) {
            return self.fold(&mut tiles);
        }
        let revision = self.next();
        tiles.insert(tile, revision);
        revision
    }

    /// Record a change that may affect any tile.
    pub fn bump_epoch(&self) -> u64 {
        let mut tiles = self.tiles();
        self.fold(&mut tiles)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Tiles currently holding an individual stamp.
    pub fn tracked_tiles(&self) -> usize {
        self.tiles().len()
    }

    /// Latest change affecting `tile`; 0 when it never changed.
    pub fn revision(&self, tile: TileCoord) -> u64 {
        let tiles = self.tiles();
        tiles.get(&tile).copied().unwrap_or(0).max(self.epoch())
    }

    /// Latest change affecting `tile` or one of its lateral neighbours.
    /// Borders of a tile depend on the owners across its edges as well.
    pub fn neighborhood_revision(&self, tile: TileCoord) -> u64 {
        let tiles = self.tiles();
        std::iter::once(tile)
            .chain(tile.lateral_neighbors())
            .filter_map(|t| tiles.get(&t).copied())
            .max()
            .unwrap_or(0)
            .max(self.epoch())
    }
}
