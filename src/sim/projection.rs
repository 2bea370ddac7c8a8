//! Screen to world mapping
//!
//! The pointer moves over a flat canvas, the player moves on a plane closer
//! to the camera than the origin the camera looks at. A fixed magnification
//! makes the two agree.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which magnification formula to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CalibrationMode {
    /// cos(θ0 − fov/2) / cos(θ1), θ0/θ1 the camera angles to origin and player plane
    #[default]
    HalfFovTrig,
    /// Look-window height at the focus plane over look-window height at the player plane
    LookWindowRatio,
}

/// Normalize a raw client coordinate to the logical surface resolution
///
/// `rect_start`/`rect_extent` describe the surface's bounding rectangle in
/// client space. A collapsed rectangle maps everything to the centre.
#[inline]
pub fn surface_coordinate(client: f32, rect_start: f32, rect_extent: f32, logical_extent: f32) -> f32 {
    if rect_extent <= 0.0 || !rect_extent.is_finite() {
        return logical_extent / 2.0;
    }
    (client - rect_start) * (logical_extent / rect_extent)
}

/// Map a screen y coordinate to a world-space vertical offset
///
/// Screen centre maps to 0, the top edge to `+field_limit`, the bottom edge to
/// `-field_limit`. Coordinates off the surface are clamped to it.
pub fn map_pointer_to_world_y(screen_y: f32, canvas_height: f32, field_limit: f32) -> f32 {
    if canvas_height <= 0.0 || !canvas_height.is_finite() || screen_y.is_nan() {
        return 0.0;
    }
    let screen_y = screen_y.clamp(0.0, canvas_height);
    ((canvas_height / 2.0) - screen_y) * (field_limit * 2.0 / canvas_height)
}

/// Height of the visible window at `distance` from a camera with the given vertical fov
#[inline]
fn look_window_height(distance: f32, fov_radians: f32) -> f32 {
    2.0 * distance * (fov_radians / 2.0).tan()
}

/// Compute the pointer-to-player magnification
///
/// Pure: identical inputs always produce the identical value.
pub fn calibrate(
    camera_x: f32,
    camera_z: f32,
    player_z: f32,
    fov_degrees: f32,
    mode: CalibrationMode,
) -> Result<f32, ConfigError> {
    for (field, value) in [
        ("camera_x", camera_x),
        ("camera_z", camera_z),
        ("player_z", player_z),
        ("camera_fov_degrees", fov_degrees),
    ] {
        if !value.is_finite() {
            return Err(ConfigError::NonFinite { field, value });
        }
    }
    if camera_x == 0.0 {
        return Err(ConfigError::ZeroDistance { field: "camera_x" });
    }
    if fov_degrees <= 0.0 || fov_degrees >= 180.0 {
        return Err(ConfigError::FieldOfView(fov_degrees));
    }

    let fov = fov_degrees.to_radians();
    let magnification = match mode {
        CalibrationMode::HalfFovTrig => {
            let theta0 = (camera_z / camera_x).atan();
            let theta1 = ((camera_z - player_z) / camera_x).atan();
            let theta2 = theta0 - fov / 2.0;
            theta2.cos() / theta1.cos()
        }
        CalibrationMode::LookWindowRatio => {
            let focus_distance = camera_x.hypot(camera_z);
            let player_distance = camera_x.hypot(camera_z - player_z);
            look_window_height(focus_distance, fov) / look_window_height(player_distance, fov)
        }
    };

    if magnification.is_finite() && magnification > 0.0 {
        Ok(magnification)
    } else {
        Err(ConfigError::DegenerateCalibration(magnification))
    }
}
