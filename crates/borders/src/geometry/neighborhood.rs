use territory::{ClaimState, ClaimStore, ColumnPos, DomainsError, Key, TileCoord};

/// Claim states of a tile and its four lateral neighbours, read once so a
/// geometry pass sees one consistent picture without further store access.
#[derive(Debug, Clone)]
pub struct ClaimNeighborhood {
    center: TileCoord,
    /// Center first, then north, east, south and west.
    states: [ClaimState; 5],
}

impl ClaimNeighborhood {
    pub fn read(claims: &ClaimStore, tile: TileCoord) -> Result<Self, DomainsError> {
        let [north, east, south, west] = tile.lateral_neighbors();
        Ok(Self {
            center: tile,
            states: [
                claims.claim_at(tile)?,
                claims.claim_at(north)?,
                claims.claim_at(east)?,
                claims.claim_at(south)?,
                claims.claim_at(west)?,
            ],
        })
    }

    /// Build from known states, in center, north, east, south, west order.
    pub fn from_states(tile: TileCoord, states: [ClaimState; 5]) -> Self {
        Self {
            center: tile,
            states,
        }
    }

    pub fn tile(&self) -> TileCoord {
        self.center
    }

    /// Owner of a column in the tile or in one of its lateral neighbours.
    /// Columns of diagonal or farther tiles read as unclaimed.
    pub fn owner(&self, pos: ColumnPos) -> Option<&Key> {
        let center = self.center;
        let tile = pos.tile();
        if tile.world != center.world {
            return None;
        }
        let slot = match (tile.x - center.x, tile.z - center.z) {
            (0, 0) => 0,
            (0, -1) => 1,
            (1, 0) => 2,
            (0, 1) => 3,
            (-1, 0) => 4,
            _ => return None,
        };
        self.states[slot].owner(pos.column())
    }

    pub fn center_state(&self) -> &ClaimState {
        &self.states[0]
    }
}
