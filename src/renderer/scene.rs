//! Scene assembly
//!
//! Turns a `FrameSnapshot` into a painted vertex list: the roof and floor
//! slabs first, then boxes and the player sorted by depth.

use glam::Vec3;

use super::RenderError;
use super::camera::SceneCamera;
use super::pipeline::RenderState;
use super::shapes::{Face, cuboid, normal_color, paint, sphere};
use super::vertex::{Vertex, colors};
use crate::config::GameConfig;
use crate::presentation::{FrameSnapshot, Presenter};
use crate::sim::SessionPhase;

/// Roof/floor slab footprint
const SLAB_HALF_WIDTH: f32 = 200.0;
const SLAB_HALF_DEPTH: f32 = 4000.0;
const SLAB_CENTER_Z: f32 = -3000.0;

fn slab_color(normal: Vec3) -> [f32; 4] {
    let shade = 0.55 + 0.45 * normal.y.abs();
    let [r, g, b, a] = colors::SLAB;
    [r * shade, g * shade, b * shade, a]
}

/// Camera plus the static scenery around the play field
#[derive(Debug, Clone)]
pub struct SceneLayout {
    camera: SceneCamera,
    slabs: [(Vec3, Vec3); 2],
}

impl SceneLayout {
    pub fn from_config(config: &GameConfig) -> Self {
        let limit = config.field_limit;
        let half = Vec3::new(SLAB_HALF_WIDTH, limit, SLAB_HALF_DEPTH);
        Self {
            camera: SceneCamera::from_config(config),
            slabs: [
                (Vec3::new(0.0, limit * 2.0, SLAB_CENTER_Z), half),
                (Vec3::new(0.0, -limit * 2.0, SLAB_CENTER_Z), half),
            ],
        }
    }

    /// Build the frame's triangles in paint order
    pub fn vertices(&self, frame: &FrameSnapshot) -> Vec<Vertex> {
        let scenery: Vec<Face> = self
            .slabs
            .iter()
            .flat_map(|(center, half)| cuboid(*center, *half, &self.camera, slab_color))
            .collect();

        let mut actors: Vec<Face> = frame
            .visible_obstacles()
            .filter(|o| {
                self.camera
                    .project(o.pos)
                    .is_some_and(|p| p.depth <= self.camera.far())
            })
            .flat_map(|o| cuboid(o.pos, Vec3::splat(o.half_size), &self.camera, normal_color))
            .collect();

        let player_color = if frame.phase == SessionPhase::Ended {
            colors::PLAYER_HIT
        } else {
            colors::PLAYER
        };
        actors.extend(sphere(
            frame.player_pos,
            frame.player_half_size,
            &self.camera,
            player_color,
            colors::PLAYER_HIGHLIGHT,
        ));

        let mut vertices = paint(scenery);
        vertices.extend(paint(actors));
        vertices
    }
}

/// wgpu presenter for the game scene
pub struct SceneRenderer {
    gpu: RenderState,
    layout: SceneLayout,
}

impl SceneRenderer {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        config: &GameConfig,
    ) -> Result<Self, RenderError> {
        let gpu = RenderState::new(surface, adapter, width, height).await?;
        Ok(Self {
            gpu,
            layout: SceneLayout::from_config(config),
        })
    }

    pub fn size(&self) -> (u32, u32) {
        self.gpu.size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }
}

impl Presenter for SceneRenderer {
    type Error = wgpu::SurfaceError;

    fn present(&mut self, frame: &FrameSnapshot) -> Result<(), Self::Error> {
        let vertices = self.layout.vertices(frame);
        self.gpu.render(&vertices)
    }
}
