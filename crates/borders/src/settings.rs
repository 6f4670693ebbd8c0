use bevy::log::warn;
use bevy::prelude::{Color, Resource};
use serde::{Deserialize, Serialize};

/// Tunables of the border overlay.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSettings {
    /// Vertices per block of border, horizontally and vertically.
    pub vertices_per_block: u32,
    /// Chebyshev radius, in tiles, cached around each observer.
    pub cache_radius: u32,
    /// Vertices the colour pattern and the drawn class advance per draw.
    pub speed: u32,
    /// Colours of the travelling pattern as sRGB triples.
    pub palette: Vec<[f32; 3]>,
    /// Suggested marker size for sinks that draw points.
    pub point_size: f32,
    /// Fixed ticks between two draws.
    pub ticks_per_draw: u32,
}

impl Default for BorderSettings {
    fn default() -> Self {
        Self {
            vertices_per_block: 24,
            cache_radius: 1,
            speed: 1,
            palette: vec![[1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
            point_size: 0.75,
            ticks_per_draw: 2,
        }
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

impl BorderSettings {
    /// Replace unusable values with working ones.
    ///
    /// `speed` must share no factor with `vertices_per_block`, otherwise some
    /// vertex classes would never be drawn.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if self.vertices_per_block == 0 {
            warn!(
                "vertices_per_block must be positive, using {}",
                defaults.vertices_per_block
            );
            self.vertices_per_block = defaults.vertices_per_block;
        }
        if self.palette.is_empty() {
            warn!("border palette is empty, using the default palette");
            self.palette = defaults.palette;
        }
        if self.ticks_per_draw == 0 {
            warn!("ticks_per_draw must be positive, drawing every tick");
            self.ticks_per_draw = 1;
        }
        if self.speed == 0 || gcd(self.speed, self.vertices_per_block) != 1 {
            warn!(
                "border speed {} shares a factor with {} vertices per block, using 1",
                self.speed, self.vertices_per_block
            );
            self.speed = 1;
        }
        self
    }

    pub fn colors(&self) -> Vec<Color> {
        self.palette
            .iter()
            .map(|&[r, g, b]| Color::srgb(r, g, b))
            .collect()
    }
}
