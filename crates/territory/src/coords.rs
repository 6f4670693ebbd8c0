//! World, actor and spatial coordinates.
//!
//! A world is divided into tiles of 16 x 16 block columns. Block coordinates
//! map to tiles with euclidean division so negative coordinates land in the
//! tile that actually contains them (`-1` is column 15 of tile `-1`).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{COLUMNS_PER_TILE, TILE_SIZE};

/// Identifier of a world (dimension) holding tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub Uuid);

impl WorldId {
    pub fn parse(text: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(text).map(Self)
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of an actor (player) that can hold titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn parse(text: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(text).map(Self)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A tile: the unit of exclusive claims and of border caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub world: WorldId,
    pub x: i32,
    pub z: i32,
}

impl TileCoord {
    pub const fn new(world: WorldId, x: i32, z: i32) -> Self {
        Self { world, x, z }
    }

    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.world, self.x + dx, self.z + dz)
    }

    /// North, east, south and west neighbours, in that order.
    pub fn lateral_neighbors(self) -> [TileCoord; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }

    /// Chessboard distance to another tile. Tiles in different worlds are
    /// never near each other.
    pub fn chebyshev_distance(self, other: TileCoord) -> Option<u32> {
        if self.world != other.world {
            return None;
        }
        Some(self.x.abs_diff(other.x).max(self.z.abs_diff(other.z)))
    }

    /// Block coordinates of the tile's north-west column.
    pub fn block_origin(self) -> (i32, i32) {
        (self.x * TILE_SIZE, self.z * TILE_SIZE)
    }

    pub fn column_pos(self, column: ColumnIndex) -> ColumnPos {
        let (x0, z0) = self.block_origin();
        ColumnPos::new(
            self.world,
            x0 + i32::from(column.i()),
            z0 + i32::from(column.k()),
        )
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@({}, {})", self.world, self.x, self.z)
    }
}

/// One of the 256 unit columns of a tile. The index is `i * 16 + k` where
/// `i` is the column's x offset and `k` its z offset within the tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnIndex(u8);

impl ColumnIndex {
    pub fn new(i: u8, k: u8) -> Option<Self> {
        let size = TILE_SIZE as u8;
        if i >= size || k >= size {
            return None;
        }
        Some(Self(i * size + k))
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= COLUMNS_PER_TILE {
            return None;
        }
        Some(Self(index as u8))
    }

    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    #[inline]
    pub fn i(self) -> u8 {
        self.0 / TILE_SIZE as u8
    }

    #[inline]
    pub fn k(self) -> u8 {
        self.0 % TILE_SIZE as u8
    }

    /// All columns of a tile in index order.
    pub fn all() -> impl Iterator<Item = ColumnIndex> {
        (0..=u8::MAX).map(ColumnIndex)
    }
}

/// A single block column in a world, addressed by block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnPos {
    pub world: WorldId,
    pub x: i32,
    pub z: i32,
}

impl ColumnPos {
    pub const fn new(world: WorldId, x: i32, z: i32) -> Self {
        Self { world, x, z }
    }

    /// Column containing a continuous world position.
    pub fn from_world_position(world: WorldId, x: f32, z: f32) -> Self {
        Self::new(world, x.floor() as i32, z.floor() as i32)
    }

    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.world, self.x + dx, self.z + dz)
    }

    pub fn tile(self) -> TileCoord {
        TileCoord::new(
            self.world,
            self.x.div_euclid(TILE_SIZE),
            self.z.div_euclid(TILE_SIZE),
        )
    }

    pub fn column(self) -> ColumnIndex {
        let i = self.x.rem_euclid(TILE_SIZE) as u8;
        let k = self.z.rem_euclid(TILE_SIZE) as u8;
        ColumnIndex(i * TILE_SIZE as u8 + k)
    }
}
