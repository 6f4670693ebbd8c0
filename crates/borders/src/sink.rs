use bevy::prelude::*;
use territory::WorldId;

/// Write-only destination of border vertices. Emission is fire-and-forget.
pub trait BorderSink {
    fn emit(&mut self, world: WorldId, point: Vec3, color: Color);
}

/// Discards everything.
impl BorderSink for () {
    fn emit(&mut self, _world: WorldId, _point: Vec3, _color: Color) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmittedPoint {
    pub world: WorldId,
    pub point: Vec3,
    pub color: Color,
}

/// Vertices emitted by the most recent draw, for renderers or network
/// layers to pick up.
#[derive(Resource, Debug, Default)]
pub struct BorderEmissions {
    pub points: Vec<EmittedPoint>,
    /// Number of draws so far.
    pub draws: u64,
}

impl BorderSink for BorderEmissions {
    fn emit(&mut self, world: WorldId, point: Vec3, color: Color) {
        self.points.push(EmittedPoint {
            world,
            point,
            color,
        });
    }
}

impl BorderSink for Vec<EmittedPoint> {
    fn emit(&mut self, world: WorldId, point: Vec3, color: Color) {
        self.push(EmittedPoint {
            world,
            point,
            color,
        });
    }
}
