/// The four lateral edges of a block column.
///
/// Strips are traced clockwise seen from above (north is -z, east is +x), so
/// the strips of one column join into a closed loop. "Previous" and "next"
/// are the columns before the start and after the end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    North,
    East,
    South,
    West,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::North, Edge::East, Edge::South, Edge::West];

    /// Offset of the column across this edge.
    pub fn across(self) -> (i32, i32) {
        match self {
            Edge::North => (0, -1),
            Edge::East => (1, 0),
            Edge::South => (0, 1),
            Edge::West => (-1, 0),
        }
    }

    /// Unit step along the edge in tracing direction.
    pub fn step(self) -> (f32, f32) {
        match self {
            Edge::North => (1.0, 0.0),
            Edge::East => (0.0, 1.0),
            Edge::South => (-1.0, 0.0),
            Edge::West => (0.0, -1.0),
        }
    }

    /// Local start point inside the column, `inset` away from both the
    /// edge and the corner it starts at.
    pub fn start(self, inset: f32) -> (f32, f32) {
        match self {
            Edge::North => (inset, inset),
            Edge::East => (1.0 - inset, inset),
            Edge::South => (1.0 - inset, 1.0 - inset),
            Edge::West => (inset, 1.0 - inset),
        }
    }

    /// Offset of the column lateral to this one before the start corner.
    pub fn previous(self) -> (i32, i32) {
        let (dx, dz) = self.step();
        (-(dx as i32), -(dz as i32))
    }

    /// Offset of the column lateral to this one after the end corner.
    pub fn next(self) -> (i32, i32) {
        let (dx, dz) = self.step();
        (dx as i32, dz as i32)
    }
}
