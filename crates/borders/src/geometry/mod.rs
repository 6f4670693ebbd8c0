//! Border vertices of a tile.
//!
//! Every claimed column whose lateral neighbour has a different owner (or
//! none) gets a strip along the shared edge, on its own side of it. The
//! geometry only depends on the claim states of the tile and its lateral
//! neighbours plus terrain heights.

mod edge;
mod neighborhood;
mod strips;

pub use edge::Edge;
pub use neighborhood::ClaimNeighborhood;
pub use strips::StripTracer;

use bevy::math::Vec3;
use territory::{ClaimStore, ColumnIndex, DomainsError, TileCoord};

use crate::elevation::SurfaceHeight;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderGeometryEngine {
    tracer: StripTracer,
}

impl BorderGeometryEngine {
    pub fn new(vertices_per_block: u32) -> Self {
        Self {
            tracer: StripTracer::new(vertices_per_block),
        }
    }

    pub fn vertices_per_block(&self) -> u32 {
        self.tracer.vertices_per_block
    }

    /// Read the tile's neighbourhood from `claims` and compute its border.
    pub fn compute(
        &self,
        claims: &ClaimStore,
        tile: TileCoord,
        elevation: &dyn SurfaceHeight,
    ) -> Result<Vec<Vec3>, DomainsError> {
        let neighborhood = ClaimNeighborhood::read(claims, tile)?;
        Ok(self.compute_in(&neighborhood, elevation))
    }

    /// Border of the neighbourhood's center tile. Columns are visited in
    /// index order and each edge is emitted as one contiguous run.
    pub fn compute_in(
        &self,
        neighborhood: &ClaimNeighborhood,
        elevation: &dyn SurfaceHeight,
    ) -> Vec<Vec3> {
        let tile = neighborhood.tile();
        let world = tile.world;
        let surface = |x: i32, z: i32| elevation.surface_height(world, x, z) + 1;
        let mut out = Vec::new();
        if neighborhood.center_state().is_unclaimed() {
            return out;
        }

        for column in ColumnIndex::all() {
            let pos = tile.column_pos(column);
            let Some(owner) = neighborhood.owner(pos) else {
                continue;
            };
            let y = surface(pos.x, pos.z);
            for edge in Edge::ALL {
                let (ax, az) = edge.across();
                if neighborhood.owner(pos.offset(ax, az)) == Some(owner) {
                    continue;
                }
                let (px, pz) = edge.previous();
                let (nx, nz) = edge.next();
                self.tracer.trace_edge(
                    &mut out,
                    (pos.x, pos.z),
                    y,
                    edge,
                    surface(pos.x + px, pos.z + pz),
                    surface(pos.x + nx, pos.z + nz),
                );
            }
        }
        out
    }
}
