use bevy::prelude::*;

pub mod animation;
pub mod cache;
pub mod elevation;
pub mod geometry;
pub mod gizmo_sink;
pub mod settings;
pub mod sink;
pub mod systems;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use animation::AnimationScheduler;
pub use cache::{BorderCache, BorderCacheEntry, RefreshStats};
pub use elevation::{FlatTerrain, SurfaceHeight, TerrainElevation};
pub use geometry::BorderGeometryEngine;
pub use gizmo_sink::BorderGizmoPlugin;
pub use settings::BorderSettings;
pub use sink::{BorderEmissions, BorderSink, EmittedPoint};
pub use systems::{BorderObserver, BorderOverlay, BorderTickTimer};

/// Ordering of the border systems within `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct BorderSet;

/// Animated claim borders around [`BorderObserver`]s.
///
/// Requires a `territory::DomainsContext`, normally from
/// `territory::TerritoryPlugin`. Settings and elevation inserted before the
/// plugin are kept; otherwise defaults are used.
pub struct BorderPlugin;

impl Plugin for BorderPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<BorderSettings>()
            .cloned()
            .unwrap_or_default()
            .validated();
        app.insert_resource(systems::BorderOverlay::new(&settings))
            .insert_resource(settings)
            .init_resource::<TerrainElevation>()
            .init_resource::<BorderEmissions>()
            .init_resource::<BorderTickTimer>()
            .add_systems(
                FixedUpdate,
                (systems::apply_border_settings, systems::draw_borders)
                    .chain()
                    .in_set(BorderSet),
            );
    }
}
