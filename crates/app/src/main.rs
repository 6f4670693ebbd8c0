//! Headless domains server.
//!
//! Reads `ServerConfig` from the file named by `DOMAINS_CONFIG` (defaults when
//! unset), opens the snapshot repository and drives the border overlay on the
//! fixed schedule. Build with `--features preview` for a window that draws
//! the overlay with gizmos.

mod config;
#[cfg(feature = "preview")]
mod preview;

use bevy::prelude::*;
use borders::{BorderPlugin, TerrainElevation};
use save::{SavePlugin, SaveStatus};
use territory::TerritoryPlugin;

use config::ServerConfig;

#[cfg(not(feature = "preview"))]
fn add_base_plugins(app: &mut App) {
    use std::time::Duration;

    use bevy::app::ScheduleRunnerPlugin;
    use bevy::log::LogPlugin;

    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
    )
    .add_plugins(LogPlugin::default());
}

#[cfg(feature = "preview")]
fn add_base_plugins(app: &mut App) {
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Domains".to_string(),
            resolution: (1280.0, 720.0).into(),
            ..default()
        }),
        ..default()
    }));
}

fn main() -> AppExit {
    let mut app = App::new();
    // Logging is up from here on.
    add_base_plugins(&mut app);

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return AppExit::from_code(2);
        }
    };
    info!(
        "repository {}, {} fixed ticks per second",
        config.repository_path.display(),
        config.tick_hz
    );

    app.insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
        .insert_resource(config.borders.clone())
        .add_plugins((
            SavePlugin {
                path: config.repository_path.clone(),
                compress: config.compress,
            },
            TerritoryPlugin,
            BorderPlugin,
        ))
        .insert_resource(TerrainElevation::flat(config.default_surface_height));

    if !app.world().resource::<SaveStatus>().is_persistent() {
        warn!("running without persistence, claims will be lost on exit");
    }

    #[cfg(feature = "preview")]
    preview::install(&mut app, config.preview_world);

    app.run()
}
