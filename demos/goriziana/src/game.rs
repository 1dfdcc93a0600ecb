//! Goriziana - five-pin billiards on a 3D table with Rapier3D physics.
//! Two players take turns shooting their own ball at the opponent's ball,
//! trying to drive it (or the red ball) into the pins.

use glam::{Quat, Vec3};
use cue_engine::api::game::GameConfig;
use cue_engine::api::types::EntityId;
use cue_engine::components::entity::Entity;
use cue_engine::input::queue::{keys, InputEvent, InputQueue, BUTTON_LEFT};
use cue_engine::renderer::camera::{Ray, DEFAULT_OFFSET};
use cue_engine::{
    CollisionPair, DirectionalLight, EngineContext, Game, GameEvent, MeshComponent, ModelId, SceneManifest,
    SoundEvent,
};

use crate::scoring::{pin_is_down, score_shot, FirstHit, ShotContacts, ShotOutcome};
use crate::table::{self, BallKind, CENTER_PIN, CUSHIONS, PIN_SPOTS};

/// Seconds a shot rolls before it may be judged settled.
const MIN_ROLL_TIME: f32 = 0.1;

/// Custom event kinds from the UI
mod events {
    pub const RESET: u32 = 1;
}

/// Game event kinds to the host
pub mod game_events {
    pub const TURN: f32 = 1.0;
    pub const SCORE: f32 = 2.0;
    pub const SHOT: f32 = 3.0;
    pub const PINS_DOWN: f32 = 4.0;
    pub const FOUL: f32 = 5.0;
    pub const GAME_OVER: f32 = 6.0;
    pub const DEBUG_DRAW: f32 = 7.0;
}

/// Sound ids
pub mod sounds {
    pub const BALL_BALL: u32 = 1;
    pub const PIN: u32 = 2;
    pub const CUSHION: u32 = 3;
}

/// Tunables for the game rules and controls.
#[derive(Debug, Clone)]
pub struct GorizianaConfig {
    /// Impulse magnitude of a shot.
    pub shot_impulse: f32,
    /// A body is idle when every velocity component is below this.
    pub idle_threshold: f32,
    /// A shot is forced to settle after this many seconds.
    pub settle_timeout: f32,
    /// First player to reach this wins.
    pub target_score: u32,
    /// Camera orbit radians per pixel of mouse motion.
    pub sensitivity: f32,
}

impl Default for GorizianaConfig {
    fn default() -> Self {
        Self {
            shot_impulse: 20.0,
            idle_threshold: 0.01,
            settle_timeout: 15.0,
            target_score: 50,
            sensitivity: 0.005,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Aiming,
    Rolling { elapsed: f32 },
    GameOver { winner: usize },
}

/// What an entity is on the table, for collision bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Ball(BallKind),
    Pin,
    Cushion,
    Table,
}

struct PinEntity {
    id: EntityId,
    spot: Vec3,
}

/// Mesh ids currently attached to entities: (table, ball, pin).
type AttachedModels = (ModelId, ModelId, ModelId);

pub struct GorizianaGame {
    config: GorizianaConfig,
    phase: Phase,
    /// 0 (white) or 1 (yellow).
    active_player: usize,
    scores: [u32; 2],
    /// Indexed by `BallKind::index()`.
    balls: Vec<EntityId>,
    pins: Vec<PinEntity>,
    cushions: Vec<EntityId>,
    slab: Option<EntityId>,
    table_model: Option<EntityId>,
    attached_models: Option<AttachedModels>,
    contacts: ShotContacts,
    last_pointer: Option<(f32, f32)>,
}

impl GorizianaGame {
    pub fn new() -> Self {
        Self::with_config(GorizianaConfig::default())
    }

    pub fn with_config(config: GorizianaConfig) -> Self {
        Self {
            config,
            phase: Phase::Aiming,
            active_player: 0,
            scores: [0, 0],
            balls: Vec::with_capacity(3),
            pins: Vec::with_capacity(PIN_SPOTS.len()),
            cushions: Vec::with_capacity(CUSHIONS.len()),
            slab: None,
            table_model: None,
            attached_models: None,
            contacts: ShotContacts::default(),
            last_pointer: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_player(&self) -> usize {
        self.active_player
    }

    pub fn scores(&self) -> [u32; 2] {
        self.scores
    }

    pub fn ball_id(&self, kind: BallKind) -> Option<EntityId> {
        self.balls.get(kind.index()).copied()
    }

    fn active_ball(&self) -> Option<EntityId> {
        self.ball_id(BallKind::of_player(self.active_player))
    }

    // -- Setup --

    fn build_table(&mut self, ctx: &mut EngineContext) {
        let id = ctx.next_id();
        ctx.spawn_with_body(
            Entity::new(id).with_tag("table"),
            table::slab_body_desc(),
            table::slab_collider_material(),
        );
        self.slab = Some(id);

        for (center, half_extents) in CUSHIONS {
            let id = ctx.next_id();
            ctx.spawn_with_body(
                Entity::new(id).with_tag("cushion"),
                table::cushion_body_desc(center, half_extents),
                table::cushion_collider_material(),
            );
            self.cushions.push(id);
        }

        // Visual only: the table model carries its own transform.
        let id = ctx.next_id();
        ctx.scene.spawn(
            Entity::new(id)
                .with_tag("table_model")
                .with_pos(table::TABLE_MODEL_POS)
                .with_uniform_scale(table::TABLE_MODEL_SCALE),
        );
        self.table_model = Some(id);
    }

    fn spawn_balls(&mut self, ctx: &mut EngineContext) {
        for kind in BallKind::ALL {
            let id = ctx.next_id();
            ctx.spawn_with_body(
                Entity::new(id).with_tag(kind.tag()),
                kind.body_desc(),
                table::ball_collider_material(),
            );
            self.balls.push(id);
        }
    }

    fn spawn_pins(&mut self, ctx: &mut EngineContext) {
        for (i, spot) in PIN_SPOTS.iter().enumerate() {
            let id = ctx.next_id();
            ctx.spawn_with_body(
                Entity::new(id)
                    .with_tag(if i == CENTER_PIN { "pin_center" } else { "pin" })
                    .with_uniform_scale(table::PIN_MODEL_SCALE),
                table::pin_body_desc(*spot),
                table::pin_collider_material(),
            );
            self.pins.push(PinEntity { id, spot: *spot });
        }
    }

    fn setup_lights(ctx: &mut EngineContext) {
        ctx.lights.clear();
        ctx.lights.set_ambient(0.2, 0.2, 0.2);
        ctx.lights.add(DirectionalLight::new(Vec3::new(-6.0, 10.0, -9.0)));
        ctx.lights.add(DirectionalLight::new(Vec3::new(10.0, 10.0, 10.0)));
    }

    /// Attach meshes once the manifest's models are known, and again whenever
    /// a newly loaded manifest changes their ids.
    fn sync_meshes(&mut self, ctx: &mut EngineContext) {
        let models = match (ctx.model("table"), ctx.model("ball"), ctx.model("pin")) {
            (Some(t), Some(b), Some(p)) => (t, b, p),
            _ => return,
        };
        if self.attached_models == Some(models) {
            return;
        }
        let (table_model, ball_model, pin_model) = models;

        if let Some(e) = self.table_model.and_then(|id| ctx.scene.get_mut(id)) {
            e.mesh = Some(MeshComponent::new(table_model, table::table_material()));
        }
        for kind in BallKind::ALL {
            if let Some(e) = self.ball_id(kind).and_then(|id| ctx.scene.get_mut(id)) {
                e.mesh = Some(MeshComponent::new(ball_model, kind.material()));
            }
        }
        for pin in &self.pins {
            if let Some(e) = ctx.scene.get_mut(pin.id) {
                e.mesh = Some(
                    MeshComponent::new(pin_model, table::pin_material())
                        .with_offset(table::PIN_MODEL_OFFSET),
                );
            }
        }
        self.attached_models = Some(models);
        log::info!("meshes attached: table={:?} ball={:?} pin={:?}", table_model, ball_model, pin_model);
    }

    /// Put balls and pins back on their spots and start a fresh match.
    fn reset(&mut self, ctx: &mut EngineContext) {
        for kind in BallKind::ALL {
            if let Some(id) = self.ball_id(kind) {
                ctx.teleport(id, kind.start(), Quat::IDENTITY);
            }
        }
        for pin in &self.pins {
            ctx.teleport(pin.id, pin.spot, Quat::IDENTITY);
        }
        self.scores = [0, 0];
        self.active_player = 0;
        self.phase = Phase::Aiming;
        self.contacts = ShotContacts::default();
        ctx.camera.offset = DEFAULT_OFFSET;
        ctx.camera.move_to(BallKind::White.start());
        log::info!("match reset");
        self.emit_score(ctx);
        ctx.emit_event(GameEvent::new(game_events::TURN, 0.0, 0.0, 0.0));
    }

    // -- Input --

    fn handle_input(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::Custom { kind, .. } if kind == events::RESET => {
                    self.reset(ctx);
                }
                InputEvent::KeyDown { key_code } if key_code == keys::ESCAPE => {
                    log::info!("quit requested");
                    ctx.request_quit();
                }
                InputEvent::KeyDown { key_code } if key_code == keys::D => {
                    let on = ctx.toggle_debug_draw();
                    ctx.emit_event(GameEvent::new(
                        game_events::DEBUG_DRAW,
                        if on { 1.0 } else { 0.0 },
                        0.0,
                        0.0,
                    ));
                }
                InputEvent::PointerMove { x, y } => {
                    if let Some((last_x, _)) = self.last_pointer {
                        ctx.camera.rotate_around_target(x - last_x);
                    }
                    self.last_pointer = Some((x, y));
                }
                InputEvent::PointerDown { x, y, button } if button == BUTTON_LEFT => {
                    if self.phase == Phase::Aiming {
                        self.shoot(ctx, x, y);
                    }
                }
                _ => {}
            }
        }
    }

    /// Fire the active ball toward the table point under the cursor.
    fn shoot(&mut self, ctx: &mut EngineContext, x: f32, y: f32) {
        let ball = match self.active_ball() {
            Some(id) => id,
            None => return,
        };
        let ball_pos = match ctx.scene.get(ball) {
            Some(e) => e.pos,
            None => return,
        };
        let dir = match ctx
            .camera
            .screen_to_ray(x, y)
            .and_then(|ray| aim_direction(&ray, ball_pos))
        {
            Some(d) => d,
            None => {
                log::debug!("shot ignored: no aim direction at ({}, {})", x, y);
                return;
            }
        };

        let impulse = dir * self.config.shot_impulse;
        ctx.apply_impulse(ball, impulse);
        log::info!("player {} shoots: impulse {:?}", self.active_player + 1, impulse);
        ctx.emit_event(GameEvent::new(game_events::SHOT, impulse.x, impulse.y, impulse.z));

        self.contacts = ShotContacts::default();
        self.phase = Phase::Rolling { elapsed: 0.0 };
    }

    // -- Collisions --

    fn role(&self, id: EntityId) -> Option<Role> {
        if let Some(kind) = BallKind::ALL.into_iter().find(|k| self.ball_id(*k) == Some(id)) {
            return Some(Role::Ball(kind));
        }
        if self.pins.iter().any(|p| p.id == id) {
            return Some(Role::Pin);
        }
        if self.cushions.contains(&id) {
            return Some(Role::Cushion);
        }
        if self.slab == Some(id) {
            return Some(Role::Table);
        }
        None
    }

    fn process_collisions(&mut self, ctx: &mut EngineContext) {
        let pairs: Vec<CollisionPair> = ctx.collisions().to_vec();
        self.record_contacts(ctx, &pairs);
    }

    /// Emit contact sounds and, while rolling, record the shot's contacts.
    fn record_contacts(&mut self, ctx: &mut EngineContext, pairs: &[CollisionPair]) {
        let rolling = matches!(self.phase, Phase::Rolling { .. });
        let active = BallKind::of_player(self.active_player);
        let opponent = BallKind::of_player(1 - self.active_player);

        let roles: Vec<(Role, Role)> = pairs
            .iter()
            .filter(|c| c.started)
            .filter_map(|c| Some((self.role(c.entity_a)?, self.role(c.entity_b)?)))
            .collect();

        for (a, b) in roles {
            if let Some(sound) = contact_sound(a, b) {
                ctx.emit_sound(SoundEvent(sound));
            }
            if !rolling {
                continue;
            }
            for (this, other) in [(a, b), (b, a)] {
                match (this, other) {
                    (Role::Ball(k), Role::Ball(o)) if k == active => {
                        if o == opponent {
                            self.contacts.active_hit(FirstHit::OpponentBall);
                        } else {
                            self.contacts.active_hit(FirstHit::RedBall);
                        }
                    }
                    (Role::Ball(k), Role::Pin) if k == active => {
                        self.contacts.active_hit(FirstHit::Pin);
                    }
                    (Role::Ball(k), Role::Ball(BallKind::Red)) if k == opponent => {
                        self.contacts.opponent_hit_red();
                    }
                    _ => {}
                }
            }
        }
    }

    // -- Settling --

    fn is_idle(&self, ctx: &EngineContext, id: EntityId) -> bool {
        if ctx.is_sleeping(id) {
            return true;
        }
        let v = ctx.velocity(id);
        let t = self.config.idle_threshold;
        v.x.abs() < t && v.y.abs() < t && v.z.abs() < t
    }

    /// Every ball and pin has stopped.
    fn everything_idle(&self, ctx: &EngineContext) -> bool {
        self.balls.iter().all(|id| self.is_idle(ctx, *id))
            && self.pins.iter().all(|p| self.is_idle(ctx, p.id))
    }

    fn pins_down(&self, ctx: &EngineContext) -> Vec<bool> {
        self.pins
            .iter()
            .map(|p| {
                ctx.scene
                    .get(p.id)
                    .map_or(false, |e| pin_is_down(p.spot, e.pos, e.rotation))
            })
            .collect()
    }

    fn finish_shot(&mut self, ctx: &mut EngineContext) {
        let down = self.pins_down(ctx);
        let outcome = score_shot(self.active_player, &self.contacts, &down, CENTER_PIN);
        self.apply_outcome(ctx, &outcome);

        for (pin, is_down) in self.pins.iter().zip(&down) {
            if *is_down {
                ctx.teleport(pin.id, pin.spot, Quat::IDENTITY);
            }
        }
        self.contacts = ShotContacts::default();

        if let Some(winner) = (0..2).find(|p| self.scores[*p] >= self.config.target_score) {
            log::info!("player {} wins {}-{}", winner + 1, self.scores[0], self.scores[1]);
            self.phase = Phase::GameOver { winner };
            ctx.emit_event(GameEvent::new(game_events::GAME_OVER, winner as f32, 0.0, 0.0));
            return;
        }

        self.active_player = 1 - self.active_player;
        if let Some(pos) = self.active_ball().and_then(|id| ctx.scene.get(id)).map(|e| e.pos) {
            ctx.camera.move_to(pos);
        }
        self.phase = Phase::Aiming;
        log::info!("turn: player {}", self.active_player + 1);
        ctx.emit_event(GameEvent::new(game_events::TURN, self.active_player as f32, 0.0, 0.0));
    }

    fn apply_outcome(&mut self, ctx: &mut EngineContext, outcome: &ShotOutcome) {
        if outcome.foul {
            log::info!(
                "foul by player {}: {} points to player {}",
                self.active_player + 1,
                outcome.points,
                outcome.receiver + 1
            );
            ctx.emit_event(GameEvent::new(game_events::FOUL, self.active_player as f32, 0.0, 0.0));
        }
        if outcome.pins_down > 0 {
            ctx.emit_event(GameEvent::new(
                game_events::PINS_DOWN,
                outcome.pins_down as f32,
                outcome.pin_points as f32,
                outcome.receiver as f32,
            ));
        }
        if outcome.points > 0 {
            self.scores[outcome.receiver] += outcome.points;
            log::info!("score {}-{}", self.scores[0], self.scores[1]);
        }
        self.emit_score(ctx);
    }

    fn emit_score(&self, ctx: &mut EngineContext) {
        ctx.emit_event(GameEvent::new(
            game_events::SCORE,
            self.scores[0] as f32,
            self.scores[1] as f32,
            0.0,
        ));
    }
}

impl Default for GorizianaGame {
    fn default() -> Self {
        Self::new()
    }
}

/// Horizontal unit direction from the ball toward where `ray` meets the
/// ball's plane, or along the ray itself when it misses the plane.
pub fn aim_direction(ray: &Ray, ball_pos: Vec3) -> Option<Vec3> {
    let flat = |v: Vec3| Vec3::new(v.x, 0.0, v.z).try_normalize();
    ray.intersect_horizontal_plane(ball_pos.y)
        .and_then(|hit| flat(hit - ball_pos))
        .or_else(|| flat(ray.dir))
}

fn contact_sound(a: Role, b: Role) -> Option<u32> {
    match (a, b) {
        (Role::Ball(_), Role::Ball(_)) => Some(sounds::BALL_BALL),
        (Role::Pin, Role::Ball(_)) | (Role::Ball(_), Role::Pin) | (Role::Pin, Role::Pin) => {
            Some(sounds::PIN)
        }
        (Role::Cushion, Role::Ball(_)) | (Role::Ball(_), Role::Cushion) => Some(sounds::CUSHION),
        _ => None,
    }
}

impl Game for GorizianaGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            max_instances: 16,
            debug_draw: true,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        if ctx.manifest().is_none() {
            ctx.load_manifest(SceneManifest::goriziana_default());
        }
        self.build_table(ctx);
        self.spawn_balls(ctx);
        self.spawn_pins(ctx);
        Self::setup_lights(ctx);
        self.sync_meshes(ctx);

        ctx.camera.sensitivity = self.config.sensitivity;
        ctx.camera.move_to(BallKind::White.start());
        log::info!(
            "goriziana: {} balls, {} pins, first to {}",
            self.balls.len(),
            self.pins.len(),
            self.config.target_score
        );
        ctx.emit_event(GameEvent::new(game_events::TURN, 0.0, 0.0, 0.0));
        self.emit_score(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        self.sync_meshes(ctx);
        self.process_collisions(ctx);
        self.handle_input(ctx, input);

        if let Phase::Rolling { elapsed } = self.phase {
            let elapsed = elapsed + ctx.physics.dt();
            self.phase = Phase::Rolling { elapsed };
            if elapsed >= self.config.settle_timeout {
                log::warn!("shot did not settle after {:.1}s, forcing turn end", elapsed);
                self.finish_shot(ctx);
            } else if elapsed > MIN_ROLL_TIME && self.everything_idle(ctx) {
                self.finish_shot(ctx);
            }
        }
    }
}
