//! Box vs player hit test
//!
//! Two independent interval overlaps (depth and height). The player interval
//! is shrunk by the hit-play margin so grazing a box's visual edge is not a
//! hit, and the obstacle's depth is sampled one step back so a box that moved
//! through the player plane this tick is still seen there.

use glam::Vec3;

/// Closed 1D interval overlap between two centred extents
///
/// Touching edges count as overlap. Symmetric in its two operands.
#[inline]
pub fn axis_overlap(a_center: f32, a_half: f32, b_center: f32, b_half: f32) -> bool {
    a_center + a_half >= b_center - b_half && a_center - a_half <= b_center + b_half
}

/// Check whether an obstacle hits the player this tick
///
/// `movement_this_tick` is how far the obstacle advanced in +z during the
/// tick; the z test uses the pre-step position.
pub fn check_hit(
    player_pos: Vec3,
    player_half: f32,
    obstacle_pos: Vec3,
    obstacle_half: f32,
    movement_this_tick: f32,
    hit_play_margin: f32,
) -> bool {
    let player_reach = player_half - hit_play_margin;

    let depth = axis_overlap(
        obstacle_pos.z - movement_this_tick,
        obstacle_half,
        player_pos.z,
        player_reach,
    );
    let height = axis_overlap(obstacle_pos.y, obstacle_half, player_pos.y, player_reach);

    depth && height
}
