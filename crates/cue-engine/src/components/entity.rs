use glam::{Quat, Vec3};
use crate::api::types::EntityId;
use crate::components::mesh::MeshComponent;
use crate::core::physics::PhysicsBody;

/// Fat Entity: a single struct with optional components.
/// Balls, pins, cushions and the table slab are all entities.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// Position in world space. Synced from the body after each physics step.
    pub pos: Vec3,
    /// Orientation in world space. Synced from the body after each physics step.
    pub rotation: Quat,
    /// Per-axis scale applied to the mesh (not to the collider).
    pub scale: Vec3,
    /// Visible model (entities without a mesh are invisible, e.g. cushions).
    pub mesh: Option<MeshComponent>,
    /// Rigid body handles.
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            pos: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            mesh: None,
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Uniform scale shorthand.
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    /// World up axis of this entity (its local +Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}
