//! Debug rendering: collider wireframes drawn by the host's line shader.
//!
//! The runner calls `debug_draw_colliders()` after each frame when debug
//! drawing is on. Each line is two `DebugVertex` records.

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};

use crate::core::physics::{ColliderDesc, PhysicsWorld};
use crate::core::scene::Scene;

const CIRCLE_SEGMENTS: usize = 24;

/// One line endpoint: position and RGB color (6 floats).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DebugVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl DebugVertex {
    pub const FLOATS: usize = 6;

    fn new(p: Vec3, color: Vec3) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: p.z,
            r: color.x,
            g: color.y,
            b: color.z,
        }
    }
}

/// Line-list buffer for the debug pass.
pub struct DebugLines {
    vertices: Vec<DebugVertex>,
    max_vertices: usize,
}

impl DebugLines {
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    pub fn with_capacity(max_vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(max_vertices),
            max_vertices,
        }
    }

    /// Append a line segment. Segments that do not fit are dropped whole.
    pub fn add_line(&mut self, from: Vec3, to: Vec3, color: Vec3) {
        if self.vertices.len() + 2 > self.max_vertices {
            return;
        }
        self.vertices.push(DebugVertex::new(from, color));
        self.vertices.push(DebugVertex::new(to, color));
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn vertices(&self) -> &[DebugVertex] {
        &self.vertices
    }

    pub fn vertices_ptr(&self) -> *const f32 {
        self.vertices.as_ptr() as *const f32
    }
}

impl Default for DebugLines {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw wireframes for all physics colliders in the scene.
///
/// Clears previous debug lines and rebuilds them from scratch, using each
/// collider's world pose (including its offset from the body).
pub fn debug_draw_colliders(
    scene: &Scene,
    physics: &PhysicsWorld,
    lines: &mut DebugLines,
    color: Vec3,
) {
    lines.clear();
    for entity in scene.iter() {
        if !entity.active {
            continue;
        }
        let body = match &entity.body {
            Some(b) => b,
            None => continue,
        };
        let (shape, (pos, rot)) = match (physics.collider_shape(body), physics.collider_pose(body)) {
            (Some(s), Some(p)) => (s, p),
            _ => continue,
        };
        for [a, b] in collider_segments(&shape) {
            lines.add_line(pos + rot * a, pos + rot * b, color);
        }
    }
}

/// Local-space line segments outlining a collider shape.
fn collider_segments(shape: &ColliderDesc) -> Vec<[Vec3; 2]> {
    match *shape {
        ColliderDesc::Ball { radius } => {
            let mut segments = Vec::with_capacity(CIRCLE_SEGMENTS * 3);
            // Great circles in the XY, XZ and YZ planes.
            for axis in [Vec3::Z, Vec3::Y, Vec3::X] {
                segments.extend(ring(axis, radius, Vec3::ZERO));
            }
            segments
        }
        ColliderDesc::Cuboid { half_extents: h } => {
            let corner = |sx: f32, sy: f32, sz: f32| Vec3::new(sx * h.x, sy * h.y, sz * h.z);
            let mut segments = Vec::with_capacity(12);
            for s in [-1.0, 1.0] {
                for t in [-1.0, 1.0] {
                    segments.push([corner(-1.0, s, t), corner(1.0, s, t)]);
                    segments.push([corner(s, -1.0, t), corner(s, 1.0, t)]);
                    segments.push([corner(s, t, -1.0), corner(s, t, 1.0)]);
                }
            }
            segments
        }
        ColliderDesc::Cylinder { half_height, radius } => {
            let top = Vec3::new(0.0, half_height, 0.0);
            let mut segments = Vec::with_capacity(CIRCLE_SEGMENTS * 2 + 4);
            segments.extend(ring(Vec3::Y, radius, top));
            segments.extend(ring(Vec3::Y, radius, -top));
            for dir in [Vec3::X, Vec3::Z, Vec3::NEG_X, Vec3::NEG_Z] {
                segments.push([dir * radius - top, dir * radius + top]);
            }
            segments
        }
    }
}

/// Circle of `radius` around `center`, perpendicular to `axis`.
fn ring(axis: Vec3, radius: f32, center: Vec3) -> Vec<[Vec3; 2]> {
    let tilt = Quat::from_rotation_arc(Vec3::Y, axis);
    let point = |i: usize| {
        let angle = (i as f32 / CIRCLE_SEGMENTS as f32) * std::f32::consts::TAU;
        center + tilt * Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
    };
    (0..CIRCLE_SEGMENTS).map(|i| [point(i), point(i + 1)]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::entity::Entity;
    use crate::core::physics::{BodyDesc, ColliderMaterial};

    fn spawn(scene: &mut Scene, physics: &mut PhysicsWorld, id: u32, desc: BodyDesc) {
        let id = EntityId(id);
        let body = physics.create_body(id, &desc, ColliderMaterial::default());
        scene.spawn(Entity::new(id).with_body(body));
    }

    #[test]
    fn debug_vertex_is_6_floats() {
        assert_eq!(std::mem::size_of::<DebugVertex>(), DebugVertex::FLOATS * 4);
    }

    #[test]
    fn segment_counts_per_shape() {
        assert_eq!(collider_segments(&ColliderDesc::Ball { radius: 0.5 }).len(), 72);
        assert_eq!(
            collider_segments(&ColliderDesc::Cuboid { half_extents: Vec3::ONE }).len(),
            12
        );
        assert_eq!(
            collider_segments(&ColliderDesc::Cylinder { half_height: 0.2, radius: 0.09 }).len(),
            52
        );
    }

    #[test]
    fn ball_outline_lies_on_sphere() {
        for [a, b] in collider_segments(&ColliderDesc::Ball { radius: 0.5 }) {
            assert!((a.length() - 0.5).abs() < 1e-4);
            assert!((b.length() - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn debug_draw_populates_lines_at_world_pose() {
        let mut scene = Scene::new();
        let mut physics = PhysicsWorld::new(Vec3::ZERO);
        let mut lines = DebugLines::new();

        spawn(
            &mut scene,
            &mut physics,
            1,
            BodyDesc::fixed(ColliderDesc::Cuboid { half_extents: Vec3::new(12.3, 0.1, 5.5) })
                .with_position(Vec3::new(0.0, 6.02, 0.0)),
        );

        debug_draw_colliders(&scene, &physics, &mut lines, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(lines.vertex_count(), 24);
        for v in lines.vertices() {
            assert!((v.y - 6.12).abs() < 1e-4 || (v.y - 5.92).abs() < 1e-4, "y={}", v.y);
            assert_eq!(v.g, 1.0);
        }

        // Rebuilding replaces the previous frame's lines.
        debug_draw_colliders(&scene, &physics, &mut lines, Vec3::ONE);
        assert_eq!(lines.vertex_count(), 24);
    }

    #[test]
    fn inactive_entities_are_skipped() {
        let mut scene = Scene::new();
        let mut physics = PhysicsWorld::new(Vec3::ZERO);
        spawn(&mut scene, &mut physics, 1, BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 }));
        if let Some(e) = scene.get_mut(EntityId(1)) {
            e.active = false;
        }
        let mut lines = DebugLines::new();
        debug_draw_colliders(&scene, &physics, &mut lines, Vec3::ONE);
        assert_eq!(lines.vertex_count(), 0);
    }

    #[test]
    fn capacity_drops_whole_segments() {
        let mut lines = DebugLines::with_capacity(3);
        lines.add_line(Vec3::ZERO, Vec3::X, Vec3::ONE);
        lines.add_line(Vec3::ZERO, Vec3::Y, Vec3::ONE);
        assert_eq!(lines.vertex_count(), 2);
        lines.clear();
        assert_eq!(lines.vertex_count(), 0);
    }
}
