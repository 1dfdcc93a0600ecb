use glam::{BVec3, Quat, Vec3};
use rapier3d::prelude::*;
use std::sync::Mutex;

use crate::api::types::EntityId;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam to nalgebra
// ---------------------------------------------------------------------------

fn vec3_to_na(v: Vec3) -> nalgebra::Vector3<f32> {
    nalgebra::Vector3::new(v.x, v.y, v.z)
}

fn na_to_vec3(v: &nalgebra::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn quat_to_na(q: Quat) -> nalgebra::UnitQuaternion<f32> {
    nalgebra::UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
}

fn na_to_quat(q: &nalgebra::UnitQuaternion<f32>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

fn pose_to_na(pos: Vec3, rot: Quat) -> nalgebra::Isometry3<f32> {
    nalgebra::Isometry3::from_parts(
        nalgebra::Translation3::new(pos.x, pos.y, pos.z),
        quat_to_na(rot),
    )
}

fn na_iso_to_pose(iso: &nalgebra::Isometry3<f32>) -> (Vec3, Quat) {
    let pos = na_to_vec3(&iso.translation.vector);
    let rot = na_to_quat(&iso.rotation);
    (pos, rot)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    /// Box given by its half extents along each local axis.
    Cuboid { half_extents: Vec3 },
    /// Upright cylinder along the local Y axis.
    Cylinder { half_height: f32, radius: f32 },
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ColliderDesc::Cylinder { half_height, radius } => {
                ColliderBuilder::cylinder(half_height, radius)
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
    /// Explicit mass. Overrides `density` when set.
    pub mass: Option<f32>,
}

impl ColliderMaterial {
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            restitution,
            friction,
            ..Default::default()
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = Some(mass);
        self
    }
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
            mass: None,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub gravity_scale: f32,
    /// Per-axis translation freedom. A `false` axis is locked.
    pub enabled_translations: BVec3,
    pub fixed_rotation: bool,
    pub ccd: bool,
    pub collider: ColliderDesc,
    /// Collider offset in body space.
    pub collider_offset: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            gravity_scale: 1.0,
            enabled_translations: BVec3::TRUE,
            fixed_rotation: false,
            ccd: false,
            collider,
            collider_offset: Vec3::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            gravity_scale: 0.0,
            enabled_translations: BVec3::TRUE,
            fixed_rotation: true,
            ccd: false,
            collider,
            collider_offset: Vec3::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    pub fn with_position(mut self, pos: Vec3) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, vel: Vec3) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Restrict translation to the enabled axes, e.g. `BVec3::new(true, false, true)`
    /// keeps a ball on the table plane.
    pub fn with_enabled_translations(mut self, axes: BVec3) -> Self {
        self.enabled_translations = axes;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Shift the collider away from the body origin (body space).
    pub fn with_collider_offset(mut self, offset: Vec3) -> Self {
        self.collider_offset = offset;
        self
    }

    /// Set the linear damping (velocity decay). Higher values slow the body faster.
    /// Stands in for rolling resistance on the table cloth.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Set the angular damping (rotation decay). Higher values slow rotation faster.
    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }

    fn locked_axes(&self) -> LockedAxes {
        let mut locked = LockedAxes::empty();
        if !self.enabled_translations.x {
            locked |= LockedAxes::TRANSLATION_LOCKED_X;
        }
        if !self.enabled_translations.y {
            locked |= LockedAxes::TRANSLATION_LOCKED_Y;
        }
        if !self.enabled_translations.z {
            locked |= LockedAxes::TRANSLATION_LOCKED_Z;
        }
        if self.fixed_rotation {
            locked |= LockedAxes::ROTATION_LOCKED;
        }
        locked
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A collision event between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    /// `true` when the collision just started, `false` when it ended.
    pub started: bool,
}

impl CollisionPair {
    /// Whether this pair involves the given entity.
    pub fn involves(&self, id: EntityId) -> bool {
        self.entity_a == id || self.entity_b == id
    }

    /// The entity on the other side of the pair, if `id` is part of it.
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.entity_a == id {
            Some(self.entity_b)
        } else if self.entity_b == id {
            Some(self.entity_a)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        match self.collisions.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.collisions.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier3D boilerplate into a single, easy-to-use struct.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector3<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    /// Y is up, so Earth-like gravity is `Vec3::new(0.0, -9.82, 0.0)`.
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: vec3_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = vec3_to_na(gravity);
    }

    pub fn gravity(&self) -> Vec3 {
        na_to_vec3(&self.gravity)
    }

    /// Create a rigid body + collider and return handles.
    /// The EntityId is stored in the body's `user_data` for collision lookups.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .position(pose_to_na(desc.position, desc.rotation))
            .linvel(vec3_to_na(desc.velocity))
            .gravity_scale(desc.gravity_scale)
            .locked_axes(desc.locked_axes())
            .ccd_enabled(desc.ccd)
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .user_data(entity_id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let builder = desc
            .collider
            .build_collider()
            .translation(vec3_to_na(desc.collider_offset))
            .restitution(material.restitution)
            .friction(material.friction)
            .active_events(ActiveEvents::COLLISION_EVENTS);
        let builder = match material.mass {
            Some(mass) => builder.mass(mass),
            None => builder.density(material.density),
        };

        let collider_handle =
            self.colliders
                .insert_with_parent(builder.build(), body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Step the simulation and collect collision events into the provided Vec.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        // Resolve collider handles → body handles → entity IDs
        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            let entity_a = self.collider_to_entity(h1);
            let entity_b = self.collider_to_entity(h2);

            if let (Some(a), Some(b)) = (entity_a, entity_b) {
                collision_events.push(CollisionPair {
                    entity_a: a,
                    entity_b: b,
                    started,
                });
            }
        }
    }

    /// Apply a force to a body (continuous, call every step).
    pub fn apply_force(&mut self, body: &PhysicsBody, force: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.add_force(vec3_to_na(force), true);
        }
    }

    /// Apply an instantaneous impulse at the body's center of mass. Wakes the body.
    pub fn apply_impulse(&mut self, body: &PhysicsBody, impulse: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.apply_impulse(vec3_to_na(impulse), true);
        }
    }

    /// Apply an instantaneous impulse at a world-space point, adding spin
    /// when the point is off the center of mass.
    pub fn apply_impulse_at_point(&mut self, body: &PhysicsBody, impulse: Vec3, point: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.apply_impulse_at_point(
                vec3_to_na(impulse),
                nalgebra::Point3::new(point.x, point.y, point.z),
                true,
            );
        }
    }

    /// Set the linear velocity of a body directly.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec3) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_linvel(vec3_to_na(vel), true);
        }
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec3 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec3(rb.linvel()))
            .unwrap_or(Vec3::ZERO)
    }

    /// Get the current angular velocity of a body (axis × rad/s).
    pub fn angular_velocity(&self, body: &PhysicsBody) -> Vec3 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec3(rb.angvel()))
            .unwrap_or(Vec3::ZERO)
    }

    /// Teleport a body and stop it. Wakes the body so it settles again.
    pub fn set_pose(&mut self, body: &PhysicsBody, pos: Vec3, rot: Quat) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_position(pose_to_na(pos, rot), true);
            rb.set_linvel(nalgebra::Vector3::zeros(), true);
            rb.set_angvel(nalgebra::Vector3::zeros(), true);
        }
    }

    /// Get the current position and rotation of a body.
    pub fn body_pose(&self, body: &PhysicsBody) -> (Vec3, Quat) {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_iso_to_pose(rb.position()))
            .unwrap_or((Vec3::ZERO, Quat::IDENTITY))
    }

    /// Whether the solver has put the body to sleep.
    pub fn is_sleeping(&self, body: &PhysicsBody) -> bool {
        self.bodies
            .get(body.body_handle)
            .map(|rb| rb.is_sleeping())
            .unwrap_or(true)
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Query the collider shape of a physics body.
    /// Returns `None` if the collider no longer exists or has an unsupported shape.
    pub fn collider_shape(&self, body: &PhysicsBody) -> Option<ColliderDesc> {
        let collider = self.colliders.get(body.collider_handle)?;
        let shape = collider.shape();
        if let Some(ball) = shape.as_ball() {
            Some(ColliderDesc::Ball { radius: ball.radius })
        } else if let Some(cuboid) = shape.as_cuboid() {
            Some(ColliderDesc::Cuboid {
                half_extents: na_to_vec3(&cuboid.half_extents),
            })
        } else if let Some(cylinder) = shape.as_cylinder() {
            Some(ColliderDesc::Cylinder {
                half_height: cylinder.half_height,
                radius: cylinder.radius,
            })
        } else {
            None
        }
    }

    /// World-space pose of a body's collider, including its offset from the body.
    pub fn collider_pose(&self, body: &PhysicsBody) -> Option<(Vec3, Quat)> {
        let collider = self.colliders.get(body.collider_handle)?;
        let rb = self.bodies.get(body.body_handle)?;
        let local = collider
            .position_wrt_parent()
            .copied()
            .unwrap_or_else(nalgebra::Isometry3::identity);
        Some(na_iso_to_pose(&(rb.position() * local)))
    }

    // -- private helpers --

    fn collider_to_entity(&self, collider_handle: ColliderHandle) -> Option<EntityId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(EntityId(body.user_data as u32))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
