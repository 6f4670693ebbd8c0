// ---------------------------------------------------------------------------
// BorderCache – computed borders of the tiles near observers
// ---------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};

use bevy::log::{debug, warn};
use bevy::math::Vec3;
use territory::{ClaimStore, TileCoord};

use crate::elevation::SurfaceHeight;
use crate::geometry::BorderGeometryEngine;

/// Border vertices of one tile and the claim revision they were built from.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderCacheEntry {
    pub vertices: Vec<Vec3>,
    pub stamp: u64,
}

/// What one [`BorderCache::refresh`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    /// Tiles that entered the window and were computed.
    pub computed: usize,
    /// Tiles that left the window.
    pub evicted: usize,
    /// Cached tiles recomputed because a claim in or next to them changed.
    pub rebuilt: usize,
}

impl RefreshStats {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Borders of every tile within `radius` (Chebyshev distance) of an origin.
///
/// `refresh` reconciles the cached set with the window: tiles entering it
/// are computed, tiles leaving it are dropped, and tiles whose stamp is
/// older than the current claim revision around them are rebuilt. Entries
/// are replaced whole, never edited in place.
#[derive(Debug)]
pub struct BorderCache {
    engine: BorderGeometryEngine,
    radius: u32,
    entries: HashMap<TileCoord, BorderCacheEntry>,
}

impl BorderCache {
    pub fn new(engine: BorderGeometryEngine, radius: u32) -> Self {
        Self {
            engine,
            radius,
            entries: HashMap::new(),
        }
    }

    pub fn engine(&self) -> &BorderGeometryEngine {
        &self.engine
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, tile: TileCoord) -> bool {
        self.entries.contains_key(&tile)
    }

    pub fn get(&self, tile: TileCoord) -> Option<&BorderCacheEntry> {
        self.entries.get(&tile)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&TileCoord, &BorderCacheEntry)> {
        self.entries.iter()
    }

    /// Total number of cached vertices.
    pub fn vertex_count(&self) -> usize {
        self.entries.values().map(|e| e.vertices.len()).sum()
    }

    /// Tiles within the radius of any origin.
    pub fn window(&self, origins: impl IntoIterator<Item = TileCoord>) -> HashSet<TileCoord> {
        let r = self.radius as i32;
        let mut window = HashSet::new();
        for origin in origins {
            for dx in -r..=r {
                for dz in -r..=r {
                    window.insert(origin.offset(dx, dz));
                }
            }
        }
        window
    }

    pub fn refresh(
        &mut self,
        origins: impl IntoIterator<Item = TileCoord>,
        claims: &ClaimStore,
        elevation: &dyn SurfaceHeight,
    ) -> RefreshStats {
        let window = self.window(origins);
        let mut stats = RefreshStats::default();

        let before = self.entries.len();
        self.entries.retain(|tile, _| window.contains(tile));
        stats.evicted = before - self.entries.len();

        for tile in window {
            // Read the stamp before the claims so a concurrent change is
            // picked up by the next refresh.
            let stamp = claims.revisions().neighborhood_revision(tile);
            let cached = self.entries.get(&tile).map(|e| e.stamp);
            if cached.is_some_and(|s| s >= stamp) {
                continue;
            }
            let vertices = match self.engine.compute(claims, tile, elevation) {
                Ok(vertices) => vertices,
                Err(e) => {
                    warn!("border of {tile} not computed: {e}");
                    continue;
                }
            };
            self.entries.insert(tile, BorderCacheEntry { vertices, stamp });
            if cached.is_some() {
                stats.rebuilt += 1;
            } else {
                stats.computed += 1;
            }
        }

        if !stats.is_noop() {
            debug!(
                "border cache: {} computed, {} rebuilt, {} evicted, {} cached",
                stats.computed,
                stats.rebuilt,
                stats.evicted,
                self.entries.len()
            );
        }
        stats
    }

    /// Force a tile to be recomputed on the next refresh, e.g. after the
    /// terrain under it changed.
    pub fn invalidate(&mut self, tile: TileCoord) -> bool {
        self.entries.remove(&tile).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevation::FlatTerrain;
    use std::sync::Arc;
    use territory::{ColumnIndex, Domain, Key, MemoryRepository, Repository, Role, WorldId};
    use uuid::Uuid;

    fn world() -> WorldId {
        WorldId(Uuid::from_u128(5))
    }

    fn tile(x: i32, z: i32) -> TileCoord {
        TileCoord::new(world(), x, z)
    }

    fn setup() -> (ClaimStore, BorderCache) {
        let repository = MemoryRepository::new();
        repository
            .save_domain(&Domain::new(Key::parse("no").unwrap(), Role::Outsider, None))
            .unwrap();
        let claims = ClaimStore::new(Arc::new(repository));
        (claims, BorderCache::new(BorderGeometryEngine::new(4), 1))
    }

    #[test]
    fn test_window_is_chebyshev_square() {
        let (_, cache) = setup();
        let window = cache.window([tile(0, 0)]);
        assert_eq!(window.len(), 9);
        assert!(window.iter().all(|t| t.chebyshev_distance(tile(0, 0)) <= Some(1)));
        // Overlapping windows are merged.
        assert_eq!(cache.window([tile(0, 0), tile(1, 0)]).len(), 12);
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let (claims, mut cache) = setup();
        let flat = FlatTerrain(10);
        let first = cache.refresh([tile(0, 0)], &claims, &flat);
        assert_eq!(first.computed, 9);
        let second = cache.refresh([tile(0, 0)], &claims, &flat);
        assert!(second.is_noop(), "{second:?}");
        assert_eq!(cache.len(), 9);
    }

    #[test]
    fn test_moving_origin_computes_and_evicts_difference() {
        let (claims, mut cache) = setup();
        let flat = FlatTerrain(10);
        cache.refresh([tile(0, 0)], &claims, &flat);
        let stats = cache.refresh([tile(1, 0)], &claims, &flat);
        assert_eq!(stats.computed, 3);
        assert_eq!(stats.evicted, 3);
        assert!(!cache.contains(tile(-1, 0)));
        assert!(cache.contains(tile(2, 1)));
        let stats = cache.refresh(std::iter::empty(), &claims, &flat);
        assert_eq!(stats.evicted, 9);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_claim_change_rebuilds_tile_and_neighbours() {
        let (claims, mut cache) = setup();
        let flat = FlatTerrain(10);
        cache.refresh([tile(0, 0)], &claims, &flat);
        assert_eq!(cache.vertex_count(), 0);

        let column = ColumnIndex::new(0, 0).unwrap();
        claims
            .annex_column(tile(0, 0), column, &Key::parse("no").unwrap())
            .unwrap();
        let stats = cache.refresh([tile(0, 0)], &claims, &flat);
        // The tile itself and its four lateral neighbours are stale.
        assert_eq!(stats.rebuilt, 5);
        assert_eq!(stats.computed, 0);
        assert_eq!(cache.get(tile(0, 0)).unwrap().vertices.len(), 4 * 4);
        assert!(cache.refresh([tile(0, 0)], &claims, &flat).is_noop());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let (claims, mut cache) = setup();
        let flat = FlatTerrain(10);
        cache.refresh([tile(0, 0)], &claims, &flat);
        assert!(cache.invalidate(tile(1, 1)));
        assert!(!cache.invalidate(tile(7, 7)));
        assert_eq!(cache.refresh([tile(0, 0)], &claims, &flat).computed, 1);
        cache.clear();
        assert_eq!(cache.refresh([tile(0, 0)], &claims, &flat).computed, 9);
    }
}
