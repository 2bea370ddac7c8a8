//! Shape generation for projected primitives
//!
//! Everything is flattened to NDC triangles on the CPU. Faces carry a view
//! depth so the scene can be painted back to front.

use glam::{Vec2, Vec3};
use std::f32::consts::PI;

use super::camera::SceneCamera;
use super::vertex::Vertex;

/// Two triangles and the depth they are sorted by
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub depth: f32,
    pub vertices: Vec<Vertex>,
}

/// Color a face by its normal, like a normal-material cube
pub fn normal_color(normal: Vec3) -> [f32; 4] {
    let c = normal * 0.5 + Vec3::splat(0.5);
    [c.x, c.y, c.z, 1.0]
}

/// Generate vertices for a filled quad (corners in winding order)
pub fn quad(corners: [Vec2; 4], color: [f32; 4]) -> Vec<Vertex> {
    let [a, b, c, d] = corners;
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
        Vertex::new(a.x, a.y, color),
    ]
}

/// Generate vertices for a filled ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Face normals with their corner offsets (unit cube, counter-clockwise from outside)
const CUBE_FACES: [(Vec3, [Vec3; 4]); 6] = [
    (
        Vec3::X,
        [
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ],
    ),
    (
        Vec3::NEG_X,
        [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
        ],
    ),
    (
        Vec3::Y,
        [
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
        ],
    ),
    (
        Vec3::NEG_Y,
        [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ],
    ),
    (
        Vec3::Z,
        [
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ],
    ),
    (
        Vec3::NEG_Z,
        [
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
        ],
    ),
];

/// Camera-facing faces of an axis-aligned box
///
/// `color` picks the face color from its normal. Faces with a corner behind
/// the near plane are dropped.
pub fn cuboid<F>(center: Vec3, half: Vec3, camera: &SceneCamera, color: F) -> Vec<Face>
where
    F: Fn(Vec3) -> [f32; 4],
{
    let mut faces = Vec::with_capacity(3);

    for (normal, offsets) in CUBE_FACES.iter() {
        let face_center = center + *normal * half;
        // Back-face cull
        if (face_center - camera.eye()).dot(*normal) >= 0.0 {
            continue;
        }

        let mut corners = [Vec2::ZERO; 4];
        let mut depth = 0.0;
        let mut clipped = false;
        for (corner, offset) in corners.iter_mut().zip(offsets.iter()) {
            match camera.project(center + *offset * half) {
                Some(p) => {
                    *corner = p.ndc;
                    depth += p.depth / 4.0;
                }
                None => {
                    clipped = true;
                    break;
                }
            }
        }
        if clipped {
            continue;
        }

        faces.push(Face {
            depth,
            vertices: quad(corners, color(*normal)),
        });
    }

    faces
}

/// A shaded sphere seen from the camera (filled disc plus highlight)
pub fn sphere(
    center: Vec3,
    radius: f32,
    camera: &SceneCamera,
    color: [f32; 4],
    highlight: [f32; 4],
) -> Option<Face> {
    let middle = camera.project(center)?;
    let top = camera.project(center + Vec3::Y * radius)?;
    let ry = (top.ndc.y - middle.ndc.y).abs();
    let radii = Vec2::new(ry / camera.aspect(), ry);

    let mut vertices = ellipse(middle.ndc, radii, color, 32);
    vertices.extend(ellipse(
        middle.ndc + radii * Vec2::new(-0.3, 0.3),
        radii * 0.35,
        highlight,
        16,
    ));

    Some(Face {
        depth: middle.depth,
        vertices,
    })
}

/// Flatten faces back to front
pub fn paint(mut faces: Vec<Face>) -> Vec<Vertex> {
    faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    faces.into_iter().flat_map(|f| f.vertices).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_cube_shows_at_most_three_faces() {
        let camera = SceneCamera::from_config(&GameConfig::default());
        let faces = cuboid(Vec3::new(0.0, 0.0, 0.0), Vec3::splat(100.0), &camera, normal_color);
        assert!(!faces.is_empty() && faces.len() <= 3);
        assert!(faces.iter().all(|f| f.vertices.len() == 6));
    }

    #[test]
    fn test_paint_orders_far_first() {
        let near = Face {
            depth: 10.0,
            vertices: quad([Vec2::ZERO; 4], [1.0; 4]),
        };
        let far = Face {
            depth: 100.0,
            vertices: quad([Vec2::ONE; 4], [0.0; 4]),
        };
        let vertices = paint(vec![near, far]);
        assert_eq!(vertices[0].color, [0.0; 4]);
        assert_eq!(vertices[6].color, [1.0; 4]);
    }

    #[test]
    fn test_sphere_is_round_on_screen() {
        let camera = SceneCamera::from_config(&GameConfig::default());
        let face = sphere(Vec3::new(0.0, 0.0, 500.0), 35.0, &camera, [1.0; 4], [1.0; 4])
            .expect("player in front of camera");
        assert_eq!(face.vertices.len(), (32 + 16) * 3);
    }

    #[test]
    fn test_ellipse_vertex_count() {
        let vertices = ellipse(Vec2::ZERO, Vec2::ONE, [1.0; 4], 8);
        assert_eq!(vertices.len(), 24);
    }
}
