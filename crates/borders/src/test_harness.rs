//! # TestWorld: headless harness for the border overlay
//!
//! Wraps a `bevy::app::App` with `TerritoryPlugin` and `BorderPlugin` so
//! tests can claim territory, move observers and advance fixed ticks without
//! a window or renderer.

use bevy::app::App;
use bevy::prelude::*;
use territory::{DomainsContext, Key, Role, TerritoryPlugin, TileCoord, WorldId};

use crate::elevation::{SurfaceHeight, TerrainElevation};
use crate::settings::BorderSettings;
use crate::sink::BorderEmissions;
use crate::systems::{BorderObserver, BorderOverlay};
use crate::BorderPlugin;

const HARNESS_WORLD: &str = "00000000-0000-0000-0000-000000d03a15";

pub struct TestWorld {
    app: App,
    world: WorldId,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Empty world with default settings on flat terrain at height 0.
    pub fn new() -> Self {
        Self::with_settings(BorderSettings::default())
    }

    pub fn with_settings(settings: BorderSettings) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        // Inserted before BorderPlugin so the plugin picks it up.
        app.insert_resource(settings);
        app.add_plugins((TerritoryPlugin, BorderPlugin));
        app.update();
        Self {
            app,
            world: WorldId::parse(HARNESS_WORLD).expect("harness world id parses"),
        }
    }

    pub fn with_elevation(mut self, source: impl SurfaceHeight + Send + Sync + 'static) -> Self {
        self.app.insert_resource(TerrainElevation::new(source));
        self
    }

    /// Create domains in the given order; superdomains must come first.
    pub fn with_domains(self, keys: &[&str]) -> Self {
        for text in keys {
            let key = Key::parse(text).expect("harness domain key parses");
            self.context()
                .registry
                .create_domain(key, Role::Outsider, None)
                .expect("harness domain is created");
        }
        self
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    pub fn world_id(&self) -> WorldId {
        self.world
    }

    pub fn tile(&self, x: i32, z: i32) -> TileCoord {
        TileCoord::new(self.world, x, z)
    }

    pub fn context(&self) -> &DomainsContext {
        self.app.world().resource::<DomainsContext>()
    }

    /// Spawn an observer standing on block `(x, z)`.
    pub fn spawn_observer(&mut self, x: f32, z: f32) -> Entity {
        let world = self.world;
        self.app
            .world_mut()
            .spawn((BorderObserver { world }, Transform::from_xyz(x, 64.0, z)))
            .id()
    }

    pub fn move_observer(&mut self, observer: Entity, x: f32, z: f32) {
        if let Some(mut transform) = self.app.world_mut().get_mut::<Transform>(observer) {
            transform.translation.x = x;
            transform.translation.z = z;
        }
    }

    pub fn despawn(&mut self, entity: Entity) {
        self.app.world_mut().despawn(entity);
    }

    pub fn settings_mut(&mut self) -> Mut<'_, BorderSettings> {
        self.app.world_mut().resource_mut::<BorderSettings>()
    }

    // -----------------------------------------------------------------------
    // Running
    // -----------------------------------------------------------------------

    /// Run `n` fixed ticks.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    /// Run fixed ticks until `n` draws have happened.
    pub fn draw(&mut self, n: u32) {
        let target = self.emissions().draws + u64::from(n);
        while self.emissions().draws < target {
            self.tick(1);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn overlay(&self) -> &BorderOverlay {
        self.app.world().resource::<BorderOverlay>()
    }

    pub fn emissions(&self) -> &BorderEmissions {
        self.app.world().resource::<BorderEmissions>()
    }

    pub fn settings(&self) -> &BorderSettings {
        self.app.world().resource::<BorderSettings>()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
