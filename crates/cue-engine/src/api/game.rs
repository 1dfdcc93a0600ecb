use glam::{Quat, Vec3};

use crate::core::scene::Scene;
use crate::api::types::{EntityId, SoundEvent, GameEvent};
use crate::assets::manifest::SceneManifest;
use crate::assets::registry::{ModelId, ModelRegistry};
use crate::components::entity::Entity;
use crate::core::physics::{PhysicsWorld, BodyDesc, ColliderMaterial, CollisionPair};
use crate::input::queue::InputQueue;
use crate::renderer::camera::OrbitCamera;
use crate::renderer::instance::RenderBuffer;
use crate::systems::debug::DebugLines;
use crate::systems::lighting::LightState;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Maximum fixed steps per frame (default: 10).
    pub max_substeps: u32,
    /// Gravity vector for the physics simulation. Y is up.
    pub gravity: Vec3,
    /// Initial canvas width in pixels.
    pub viewport_width: f32,
    /// Initial canvas height in pixels.
    pub viewport_height: f32,
    /// Background clear color (RGB).
    pub clear_color: [f32; 3],
    /// Whether collider wireframes are drawn from the first frame.
    pub debug_draw: bool,
    /// Maximum number of render instances (default: 64).
    pub max_instances: usize,
    /// Maximum number of debug line vertices (default: 4096).
    pub max_debug_vertices: usize,
    /// Maximum number of lights (default: 4).
    pub max_lights: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_substeps: 10,
            gravity: Vec3::new(0.0, -9.82, 0.0),
            viewport_width: 1280.0,
            viewport_height: 720.0,
            clear_color: [0.31, 0.76, 0.92],
            debug_draw: false,
            max_instances: 64,
            max_debug_vertices: 4096,
            max_lights: 4,
            max_sounds: 32,
            max_events: 32,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step of game logic, run before the physics step.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Optional read-only render pass for custom render commands.
    fn render(&self, _ctx: &mut RenderContext) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub physics: PhysicsWorld,
    pub camera: OrbitCamera,
    pub lights: LightState,
    pub debug_lines: DebugLines,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    pub models: ModelRegistry,
    manifest: Option<SceneManifest>,
    collision_events: Vec<CollisionPair>,
    next_id: u32,
    debug_draw: bool,
    quit_requested: bool,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    /// Create an EngineContext sized and configured from a GameConfig.
    pub fn with_config(config: &GameConfig) -> Self {
        let mut physics = PhysicsWorld::new(config.gravity);
        physics.set_dt(config.fixed_dt);
        Self {
            scene: Scene::new(),
            physics,
            camera: OrbitCamera::new(config.viewport_width, config.viewport_height),
            lights: LightState::with_capacity(config.max_lights),
            debug_lines: DebugLines::with_capacity(config.max_debug_vertices),
            sounds: Vec::with_capacity(config.max_sounds),
            events: Vec::with_capacity(config.max_events),
            models: ModelRegistry::new(),
            manifest: None,
            collision_events: Vec::new(),
            next_id: 1,
            debug_draw: config.debug_draw,
            quit_requested: false,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a sound event to be forwarded to the host.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (sounds, events).
    /// Collision events are replaced by each physics step instead, so the
    /// first update of a frame still sees the last step of the previous one.
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }

    // -- Assets --

    /// Install a manifest and rebuild the model registry from it.
    pub fn load_manifest(&mut self, manifest: SceneManifest) {
        self.models = ModelRegistry::from_manifest(&manifest);
        self.manifest = Some(manifest);
    }

    pub fn manifest(&self) -> Option<&SceneManifest> {
        self.manifest.as_ref()
    }

    /// Look up a model by manifest name.
    pub fn model(&self, name: &str) -> Option<ModelId> {
        self.models.get(name)
    }

    // -- Flags --

    /// Flip collider wireframe drawing. Returns the new state.
    pub fn toggle_debug_draw(&mut self) -> bool {
        self.debug_draw = !self.debug_draw;
        if !self.debug_draw {
            self.debug_lines.clear();
        }
        log::info!("debug draw {}", if self.debug_draw { "on" } else { "off" });
        self.debug_draw
    }

    pub fn set_debug_draw(&mut self, enabled: bool) {
        self.debug_draw = enabled;
        if !enabled {
            self.debug_lines.clear();
        }
    }

    pub fn debug_draw(&self) -> bool {
        self.debug_draw
    }

    /// Ask the host to stop the game loop.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body. Returns the EntityId.
    /// The entity's pose is set from the BodyDesc.
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity
            .with_pos(desc.position)
            .with_rotation(desc.rotation)
            .with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Despawn an entity, cleaning up its physics body if present.
    pub fn despawn(&mut self, id: EntityId) {
        if let Some(entity) = self.scene.despawn(id) {
            if let Some(body) = &entity.body {
                self.physics.remove_body(body);
            }
        }
    }

    /// Apply an instantaneous impulse at the center of an entity's body.
    pub fn apply_impulse(&mut self, id: EntityId, impulse: Vec3) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.apply_impulse(&body, impulse);
        }
    }

    /// Apply an instantaneous impulse at a world-space point.
    pub fn apply_impulse_at_point(&mut self, id: EntityId, impulse: Vec3, point: Vec3) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.apply_impulse_at_point(&body, impulse, point);
        }
    }

    /// Set the linear velocity of an entity's physics body.
    pub fn set_velocity(&mut self, id: EntityId, vel: Vec3) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.set_velocity(&body, vel);
        }
    }

    /// Whether the entity's body is asleep. Entities without a body count as asleep.
    pub fn is_sleeping(&self, id: EntityId) -> bool {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map_or(true, |body| self.physics.is_sleeping(body))
    }

    /// Get the linear velocity of an entity's physics body.
    pub fn velocity(&self, id: EntityId) -> Vec3 {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.velocity(body))
            .unwrap_or(Vec3::ZERO)
    }

    /// Move an entity and its body to a new pose and stop it.
    pub fn teleport(&mut self, id: EntityId, pos: Vec3, rotation: Quat) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.pos = pos;
            entity.rotation = rotation;
            if let Some(body) = &entity.body {
                self.physics.set_pose(body, pos, rotation);
            }
        }
    }

    /// Get collision events from the most recent physics step.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Step the physics simulation and sync poses back to entities.
    /// Called automatically by the game runner after `Game::update()`.
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);

        for entity in self.scene.with_bodies_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_pose(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context for optional custom render commands.
pub struct RenderContext<'a> {
    pub render_buffer: &'a mut RenderBuffer,
    pub debug_lines: &'a mut DebugLines,
}

#[cfg(test)]
mod physics_tests {
    use super::*;
    use crate::core::physics::ColliderDesc;

    fn ball_desc(pos: Vec3) -> BodyDesc {
        BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 }).with_position(pos)
    }

    #[test]
    fn ids_start_at_one() {
        let mut ctx = EngineContext::new();
        assert_eq!(ctx.next_id(), EntityId(1));
        assert_eq!(ctx.next_id(), EntityId(2));
    }

    #[test]
    fn moving_body_is_awake_and_bodyless_entity_counts_as_asleep() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        ctx.spawn_with_body(
            Entity::new(id),
            ball_desc(Vec3::ZERO).with_velocity(Vec3::new(3.0, 0.0, 0.0)),
            ColliderMaterial::default(),
        );
        ctx.step_physics();
        assert!(!ctx.is_sleeping(id));

        let visual = ctx.next_id();
        ctx.scene.spawn(Entity::new(visual));
        assert!(ctx.is_sleeping(visual));
    }

    #[test]
    fn spawn_with_body_creates_entity_and_physics() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        let pos = Vec3::new(-5.5, 6.62, -2.2);

        ctx.spawn_with_body(Entity::new(id), ball_desc(pos), ColliderMaterial::default());

        assert_eq!(ctx.scene.len(), 1);
        assert_eq!(ctx.physics.body_count(), 1);
        let entity = ctx.scene.get(id).unwrap();
        assert!(entity.body.is_some());
        assert_eq!(entity.pos, pos);
    }

    #[test]
    fn despawn_cleans_up_physics() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        ctx.spawn_with_body(Entity::new(id), ball_desc(Vec3::ZERO), ColliderMaterial::default());
        assert_eq!(ctx.physics.body_count(), 1);

        ctx.despawn(id);
        assert_eq!(ctx.scene.len(), 0);
        assert_eq!(ctx.physics.body_count(), 0);
        assert_eq!(ctx.velocity(id), Vec3::ZERO);
    }

    #[test]
    fn step_physics_syncs_positions() {
        let mut ctx = EngineContext::new();

        let id = ctx.next_id();
        ctx.spawn_with_body(Entity::new(id), ball_desc(Vec3::new(0.0, 10.0, 0.0)), ColliderMaterial::default());

        for _ in 0..10 {
            ctx.step_physics();
        }

        let entity = ctx.scene.get(id).unwrap();
        assert!(entity.pos.y < 10.0, "Entity should have fallen: y={}", entity.pos.y);
    }

    #[test]
    fn teleport_moves_entity_and_body() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        ctx.spawn_with_body(Entity::new(id), ball_desc(Vec3::ZERO), ColliderMaterial::default());
        ctx.set_velocity(id, Vec3::new(1.0, 0.0, 0.0));

        ctx.teleport(id, Vec3::new(5.5, 6.62, 0.0), Quat::IDENTITY);
        assert_eq!(ctx.scene.get(id).unwrap().pos, Vec3::new(5.5, 6.62, 0.0));
        assert_eq!(ctx.velocity(id), Vec3::ZERO);
        let (pos, _) = ctx.physics.body_pose(&ctx.scene.get(id).unwrap().body.unwrap());
        assert!((pos - Vec3::new(5.5, 6.62, 0.0)).length() < 1e-4);
    }

    #[test]
    fn collisions_survive_frame_clear() {
        let mut ctx = EngineContext::with_config(&GameConfig {
            gravity: Vec3::ZERO,
            ..Default::default()
        });
        let a = ctx.next_id();
        let b = ctx.next_id();
        ctx.spawn_with_body(Entity::new(a), ball_desc(Vec3::ZERO), ColliderMaterial::default());
        ctx.spawn_with_body(Entity::new(b), ball_desc(Vec3::new(0.8, 0.0, 0.0)), ColliderMaterial::default());

        ctx.step_physics();
        assert!(!ctx.collisions().is_empty());
        ctx.clear_frame_data();
        assert!(!ctx.collisions().is_empty());
    }

    #[test]
    fn frame_data_clears_sounds_and_events() {
        let mut ctx = EngineContext::new();
        ctx.emit_sound(SoundEvent(1));
        ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
        ctx.clear_frame_data();
        assert!(ctx.sounds.is_empty());
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn manifest_drives_model_lookup() {
        let mut ctx = EngineContext::new();
        assert!(ctx.model("ball").is_none());
        ctx.load_manifest(SceneManifest::goriziana_default());
        assert_eq!(ctx.model("ball"), Some(ModelId(0)));
        assert!(ctx.model("table").is_some());
        assert!(ctx.manifest().is_some());
    }

    #[test]
    fn flags_toggle() {
        let mut ctx = EngineContext::new();
        assert!(!ctx.debug_draw());
        assert!(ctx.toggle_debug_draw());
        assert!(!ctx.toggle_debug_draw());
        assert!(!ctx.quit_requested());
        ctx.request_quit();
        assert!(ctx.quit_requested());
    }
}
