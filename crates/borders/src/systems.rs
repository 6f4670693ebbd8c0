use bevy::prelude::*;
use territory::{ColumnPos, DomainsContext, TileCoord, WorldId};

use crate::animation::AnimationScheduler;
use crate::cache::BorderCache;
use crate::elevation::TerrainElevation;
use crate::geometry::BorderGeometryEngine;
use crate::settings::BorderSettings;
use crate::sink::BorderEmissions;

/// Marks an entity whose surroundings get borders drawn, typically a player.
/// Its `Transform` translation is read as block coordinates in `world`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderObserver {
    pub world: WorldId,
}

impl BorderObserver {
    pub fn tile(&self, transform: &Transform) -> TileCoord {
        let t = transform.translation;
        ColumnPos::from_world_position(self.world, t.x, t.z).tile()
    }
}

/// Cache and animation state of the border overlay.
#[derive(Resource, Debug)]
pub struct BorderOverlay {
    pub cache: BorderCache,
    pub scheduler: AnimationScheduler,
}

impl BorderOverlay {
    pub fn new(settings: &BorderSettings) -> Self {
        Self {
            cache: BorderCache::new(
                BorderGeometryEngine::new(settings.vertices_per_block),
                settings.cache_radius,
            ),
            scheduler: AnimationScheduler::new(settings),
        }
    }
}

/// Counts fixed ticks; the overlay draws every `ticks_per_draw` of them.
#[derive(Resource, Debug, Default)]
pub struct BorderTickTimer {
    pub counter: u32,
}

impl BorderTickTimer {
    pub fn tick(&mut self) {
        self.counter = self.counter.wrapping_add(1);
    }

    pub fn should_run(&self, ticks_per_draw: u32) -> bool {
        self.counter % ticks_per_draw.max(1) == 0
    }
}

/// Rebuild the overlay when its settings or the claim context were replaced.
/// Revisions of a new context are unrelated to the cached stamps.
pub fn apply_border_settings(
    mut settings: ResMut<BorderSettings>,
    context: Res<DomainsContext>,
    mut overlay: ResMut<BorderOverlay>,
) {
    if !settings.is_changed() && !context.is_changed() {
        return;
    }
    if settings.is_changed() {
        let validated = settings.clone().validated();
        if *settings != validated {
            *settings = validated;
        }
    }
    *overlay = BorderOverlay::new(&settings);
}

/// Refresh the cache around all observers, then draw one animation step.
pub fn draw_borders(
    settings: Res<BorderSettings>,
    context: Res<DomainsContext>,
    elevation: Res<TerrainElevation>,
    observers: Query<(&BorderObserver, &Transform)>,
    mut timer: ResMut<BorderTickTimer>,
    mut overlay: ResMut<BorderOverlay>,
    mut emissions: ResMut<BorderEmissions>,
) {
    timer.tick();
    if !timer.should_run(settings.ticks_per_draw) {
        return;
    }
    let origins: Vec<TileCoord> = observers
        .iter()
        .map(|(observer, transform)| observer.tile(transform))
        .collect();

    let overlay = &mut *overlay;
    overlay.cache.refresh(origins, &context.claims, &*elevation);

    emissions.points.clear();
    emissions.draws += 1;
    overlay.scheduler.tick(&overlay.cache, &mut *emissions);
}
