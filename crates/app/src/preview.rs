//! Window with a fixed camera over one observer, drawing its borders.

use bevy::prelude::*;
use borders::{BorderGizmoPlugin, BorderObserver};
use territory::WorldId;

#[derive(Resource)]
struct PreviewWorld(WorldId);

pub fn install(app: &mut App, world: WorldId) {
    app.insert_resource(PreviewWorld(world))
        .add_plugins(BorderGizmoPlugin)
        .add_systems(Startup, spawn_preview);
}

fn spawn_preview(mut commands: Commands, world: Res<PreviewWorld>) {
    let focus = Vec3::new(8.0, 64.0, 8.0);
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-24.0, 96.0, -24.0).looking_at(focus, Vec3::Y),
    ));
    commands.spawn((
        BorderObserver { world: world.0 },
        Transform::from_translation(focus),
    ));
}
