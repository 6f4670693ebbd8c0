use bevy::prelude::*;

use crate::settings::BorderSettings;
use crate::sink::BorderEmissions;

/// Draws the most recently emitted border vertices as small crosses.
/// Needs a renderer with gizmo support; headless servers leave it out.
pub struct BorderGizmoPlugin;

impl Plugin for BorderGizmoPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_border_gizmos);
    }
}

pub fn draw_border_gizmos(
    emissions: Res<BorderEmissions>,
    settings: Res<BorderSettings>,
    mut gizmos: Gizmos,
) {
    if emissions.points.is_empty() {
        return;
    }
    let half = settings.point_size * 0.1;
    for emitted in &emissions.points {
        let p = emitted.point;
        gizmos.line(p - Vec3::X * half, p + Vec3::X * half, emitted.color);
        gizmos.line(p - Vec3::Z * half, p + Vec3::Z * half, emitted.color);
    }
}
