use bevy::prelude::Color;

use crate::cache::BorderCache;
use crate::settings::BorderSettings;
use crate::sink::BorderSink;

/// Draws cached borders a fraction at a time with a travelling colour
/// pattern.
///
/// Vertex `n` of a tile's border belongs to class `n % vertices_per_block`.
/// Each tick emits a single class, so a full border takes
/// `vertices_per_block` ticks. Colours repeat in bands of
/// `vertices_per_block` vertices and the band boundaries shift by `speed`
/// vertices per tick.
#[derive(Debug, Clone)]
pub struct AnimationScheduler {
    classes: usize,
    speed: usize,
    colors: Vec<Color>,
    class_current: usize,
    color_position: usize,
}

impl AnimationScheduler {
    /// Expects settings that went through [`BorderSettings::validated`].
    pub fn new(settings: &BorderSettings) -> Self {
        let colors = settings.colors();
        Self {
            classes: settings.vertices_per_block.max(1) as usize,
            speed: settings.speed.max(1) as usize,
            colors: if colors.is_empty() {
                vec![Color::WHITE]
            } else {
                colors
            },
            class_current: 0,
            color_position: 0,
        }
    }

    pub fn class_current(&self) -> usize {
        self.class_current
    }

    pub fn color_position(&self) -> usize {
        self.color_position
    }

    /// Period of the colour pattern, in vertices.
    pub fn color_stride(&self) -> usize {
        self.classes * self.colors.len()
    }

    /// Colour of vertex `n` of a border with `len` vertices.
    pub fn color_of(&self, n: usize, len: usize) -> Color {
        let offset = (n as i64 - self.color_position as i64).rem_euclid(len as i64) as usize;
        self.colors[(offset / self.classes) % self.colors.len()]
    }

    /// Emit the current class of every cached border, then advance.
    /// Returns the number of vertices emitted.
    pub fn tick(&mut self, cache: &BorderCache, sink: &mut impl BorderSink) -> usize {
        let mut emitted = 0;
        for (tile, entry) in cache.entries() {
            let len = entry.vertices.len();
            for n in (self.class_current..len).step_by(self.classes) {
                sink.emit(tile.world, entry.vertices[n], self.color_of(n, len));
                emitted += 1;
            }
        }
        self.color_position = (self.color_position + self.speed) % self.color_stride();
        self.class_current = (self.class_current + self.speed) % self.classes;
        emitted
    }
}
