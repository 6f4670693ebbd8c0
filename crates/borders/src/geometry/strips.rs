use bevy::math::Vec3;

use super::edge::Edge;

/// Emits the vertex strips of one column edge.
///
/// Vertices are `stride = 1 / vertices_per_block` apart and sit
/// `inset = stride / 2` inside the column, so neither strips of adjacent
/// owners nor the strips of one column's edges coincide with block lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripTracer {
    pub vertices_per_block: u32,
    pub stride: f32,
    pub inset: f32,
}

impl StripTracer {
    pub fn new(vertices_per_block: u32) -> Self {
        let vertices_per_block = vertices_per_block.max(1);
        let stride = 1.0 / vertices_per_block as f32;
        Self {
            vertices_per_block,
            stride,
            inset: stride / 2.0,
        }
    }

    /// Trace one edge of the column whose north-west corner is `(x, z)`.
    ///
    /// `y` is the height the strip runs at; `previous_y` and `next_y` are the
    /// heights of the columns before and after the edge. A taller previous
    /// column gets a strip descending from its height to the start corner,
    /// a taller next column a strip ascending from the end corner, so the
    /// loop stays closed across steps in the terrain.
    pub fn trace_edge(
        &self,
        out: &mut Vec<Vec3>,
        (x, z): (i32, i32),
        y: i32,
        edge: Edge,
        previous_y: i32,
        next_y: i32,
    ) {
        let (sx, sz) = edge.start(self.inset);
        let (dx, dz) = edge.step();
        let start = (x as f32 + sx, z as f32 + sz);
        let along = self.stride * (self.vertices_per_block - 1) as f32;
        let end = (start.0 + dx * along, start.1 + dz * along);

        self.vertical(out, start, y, previous_y, true);
        let height = y as f32;
        out.extend((0..self.vertices_per_block).map(|n| {
            let t = self.stride * n as f32;
            Vec3::new(start.0 + dx * t, height, start.1 + dz * t)
        }));
        self.vertical(out, end, y, next_y, false);
    }

    /// Vertical strip at `(px, pz)` between `y` and a taller `top`; nothing
    /// when `top` is not above `y`. Descending strips run top to bottom.
    fn vertical(
        &self,
        out: &mut Vec<Vec3>,
        (px, pz): (f32, f32),
        y: i32,
        top: i32,
        descending: bool,
    ) {
        let count = (top - y).max(0) as u32 * self.vertices_per_block;
        let point = |n: u32| Vec3::new(px, y as f32 + self.inset + self.stride * n as f32, pz);
        if descending {
            out.extend((0..count).rev().map(point));
        } else {
            out.extend((0..count).map(point));
        }
    }
}
