//! Perspective camera
//!
//! Fixed at (camera_x, 0, camera_z), looking at the origin, y up. Projects
//! world points straight to normalized device coordinates.

use glam::{Mat4, Vec2, Vec3};

use crate::config::GameConfig;

/// A projected point: NDC position plus view depth (distance along the view axis)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub ndc: Vec2,
    pub depth: f32,
}

#[derive(Debug, Clone)]
pub struct SceneCamera {
    eye: Vec3,
    view_proj: Mat4,
    aspect: f32,
    near: f32,
    far: f32,
}

impl SceneCamera {
    pub fn new(eye: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(fov_degrees.to_radians(), aspect, near, far);
        Self {
            eye,
            view_proj: proj * view,
            aspect,
            near,
            far,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            Vec3::new(config.camera_x, 0.0, config.camera_z),
            config.camera_fov_degrees,
            config.display_width / config.display_height,
            config.camera_near,
            config.camera_far,
        )
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Project a world point; `None` if it is behind the near plane
    pub fn project(&self, world: Vec3) -> Option<Projected> {
        let clip = self.view_proj * world.extend(1.0);
        if clip.w <= self.near {
            return None;
        }
        Some(Projected {
            ndc: Vec2::new(clip.x / clip.w, clip.y / clip.w),
            depth: clip.w,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_centre() {
        let camera = SceneCamera::from_config(&GameConfig::default());
        let p = camera.project(Vec3::ZERO).expect("origin in front");
        assert!(p.ndc.length() < 1e-4);
        assert!((p.depth - Vec3::new(500.0, 0.0, 1000.0).length()).abs() < 1e-1);
    }

    #[test]
    fn test_point_behind_camera_is_culled() {
        let camera = SceneCamera::from_config(&GameConfig::default());
        assert!(camera.project(Vec3::new(1000.0, 0.0, 2000.0)).is_none());
    }

    #[test]
    fn test_up_is_up() {
        let camera = SceneCamera::from_config(&GameConfig::default());
        let high = camera.project(Vec3::new(0.0, 200.0, 0.0)).expect("in front");
        let low = camera.project(Vec3::new(0.0, -200.0, 0.0)).expect("in front");
        assert!(high.ndc.y > 0.0 && low.ndc.y < 0.0);
    }
}
