use bevy::prelude::Resource;
use territory::WorldId;

/// Read-only terrain lookup: the y coordinate of the highest solid block of
/// a column.
pub trait SurfaceHeight {
    fn surface_height(&self, world: WorldId, x: i32, z: i32) -> i32;
}

impl<F> SurfaceHeight for F
where
    F: Fn(WorldId, i32, i32) -> i32,
{
    fn surface_height(&self, world: WorldId, x: i32, z: i32) -> i32 {
        self(world, x, z)
    }
}

/// The same height everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlatTerrain(pub i32);

impl SurfaceHeight for FlatTerrain {
    fn surface_height(&self, _world: WorldId, _x: i32, _z: i32) -> i32 {
        self.0
    }
}

/// Host-provided elevation used by the border systems.
#[derive(Resource)]
pub struct TerrainElevation(pub Box<dyn SurfaceHeight + Send + Sync>);

impl TerrainElevation {
    pub fn new(source: impl SurfaceHeight + Send + Sync + 'static) -> Self {
        Self(Box::new(source))
    }

    pub fn flat(height: i32) -> Self {
        Self::new(FlatTerrain(height))
    }
}

impl Default for TerrainElevation {
    fn default() -> Self {
        Self::flat(0)
    }
}

impl SurfaceHeight for TerrainElevation {
    fn surface_height(&self, world: WorldId, x: i32, z: i32) -> i32 {
        self.0.surface_height(world, x, z)
    }
}
