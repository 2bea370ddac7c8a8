//! WebGPU rendering module
//!
//! Projects the scene on the CPU and draws flat-colored triangles.

pub mod camera;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use camera::SceneCamera;
pub use scene::{SceneLayout, SceneRenderer};

use thiserror::Error;

/// Failures while bringing up the GPU
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no usable texture format")]
    UnsupportedSurface,
}
