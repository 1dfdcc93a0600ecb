use cue_engine::{
    Game, GameConfig, EngineContext, RenderContext,
    InputEvent, InputQueue, RenderBuffer, CameraUniform,
    FixedTimestep, ProtocolLayout, SceneManifest,
};
use cue_engine::systems::debug::debug_draw_colliders;
use cue_engine::systems::render::build_render_buffer;
use glam::Vec3;

/// Color of collider wireframes.
const DEBUG_COLOR: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    camera_uniform: CameraUniform,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    frame_counter: u64,
    /// Flat buffer of sound event IDs for shared-buffer reads.
    sound_buffer: Vec<u8>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::with_max_steps(config.fixed_dt, config.max_substeps);
        let layout = ProtocolLayout::from_config(&config);
        let ctx = EngineContext::with_config(&config);
        let camera_uniform = ctx.camera.uniform();

        Self {
            game,
            ctx,
            input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            camera_uniform,
            timestep,
            sound_buffer: Vec::with_capacity(config.max_sounds),
            layout,
            config,
            initialized: false,
            frame_counter: 0,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.layout = ProtocolLayout::from_config(&self.config);
        self.timestep = FixedTimestep::with_max_steps(self.config.fixed_dt, self.config.max_substeps);
        self.ctx.physics.set_dt(self.config.fixed_dt);
        self.ctx.physics.set_gravity(self.config.gravity);
        self.ctx
            .camera
            .resize(self.config.viewport_width, self.config.viewport_height);
        self.ctx.set_debug_draw(self.config.debug_draw);

        self.game.init(&mut self.ctx);
        self.camera_uniform = self.ctx.camera.uniform();
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        if let InputEvent::Resize { width, height } = event {
            self.ctx.camera.resize(width, height);
        }
        self.input.push(event);
    }

    /// Parse a scene manifest and hand it to the engine.
    /// A malformed manifest is logged and the previous one kept.
    pub fn load_manifest(&mut self, json: &str) {
        match SceneManifest::from_json(json) {
            Ok(manifest) => {
                if let Err(problems) = manifest.validate() {
                    for problem in &problems {
                        log::warn!("manifest: {}", problem);
                    }
                }
                log::info!(
                    "manifest loaded: {} models, {} textures",
                    manifest.models.len(),
                    manifest.textures.len()
                );
                self.ctx.load_manifest(manifest);
            }
            Err(e) => log::error!("failed to parse manifest: {}", e),
        }
    }

    /// Run one frame tick: fixed steps of update + physics, then rebuild
    /// every buffer the host reads.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        // Fixed timestep accumulation
        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            // Input is seen by the first step only.
            self.input.drain();
            self.ctx.step_physics();
        }

        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer);

        if self.ctx.debug_draw() {
            debug_draw_colliders(
                &self.ctx.scene,
                &self.ctx.physics,
                &mut self.ctx.debug_lines,
                DEBUG_COLOR,
            );
        } else {
            self.ctx.debug_lines.clear();
        }

        self.camera_uniform = self.ctx.camera.uniform();

        // Allow game to add custom render commands
        {
            let mut render_ctx = RenderContext {
                render_buffer: &mut self.render_buffer,
                debug_lines: &mut self.ctx.debug_lines,
            };
            self.game.render(&mut render_ctx);
        }

        // Pack sound events into flat buffer
        self.sound_buffer.clear();
        for sound in self.ctx.sounds.iter().take(self.layout.max_sounds) {
            self.sound_buffer.push(sound.0 as u8);
        }
        self.ctx.events.truncate(self.layout.max_events);

        self.frame_counter += 1;
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn should_quit(&self) -> bool {
        self.ctx.quit_requested()
    }

    // ---- Pointer accessors for shared-buffer reads ----

    pub fn camera_ptr(&self) -> *const f32 {
        &self.camera_uniform as *const CameraUniform as *const f32
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn textured_split(&self) -> u32 {
        self.render_buffer.textured_split
    }

    pub fn debug_vertices_ptr(&self) -> *const f32 {
        self.ctx.debug_lines.vertices_ptr()
    }

    pub fn debug_vertex_count(&self) -> u32 {
        self.ctx.debug_lines.vertex_count()
    }

    pub fn lights_ptr(&self) -> *const f32 {
        self.ctx.lights.buffer_ptr()
    }

    pub fn light_count(&self) -> u32 {
        self.ctx.lights.count() as u32
    }

    pub fn ambient(&self) -> [f32; 3] {
        self.ctx.lights.ambient()
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn viewport_width(&self) -> f32 {
        self.ctx.camera.viewport_width
    }

    pub fn viewport_height(&self) -> f32 {
        self.ctx.camera.viewport_height
    }

    pub fn clear_color(&self) -> [f32; 3] {
        self.config.clear_color
    }

    // ---- Capacity accessors (read by the host via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_debug_vertices(&self) -> u32 {
        self.layout.max_debug_vertices as u32
    }

    pub fn max_lights(&self) -> u32 {
        self.layout.max_lights as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cue_engine::{
        BodyDesc, ColliderDesc, ColliderMaterial, Entity, EntityId, GameEvent, SoundEvent,
    };

    /// Minimal game: one falling ball, counts updates and the input it saw.
    #[derive(Default)]
    struct Probe {
        ball: Option<EntityId>,
        updates: u32,
        inputs_seen: usize,
    }

    impl Game for Probe {
        fn init(&mut self, ctx: &mut EngineContext) {
            let id = ctx.next_id();
            let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 0.5 })
                .with_position(Vec3::new(0.0, 10.0, 0.0));
            self.ball = Some(ctx.spawn_with_body(Entity::new(id), desc, ColliderMaterial::default()));
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            self.inputs_seen += input.len();
            for event in input.iter() {
                if let InputEvent::KeyDown { key_code: 27 } = event {
                    ctx.request_quit();
                }
            }
            ctx.emit_sound(SoundEvent(2));
            ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
        }
    }

    fn runner() -> GameRunner<Probe> {
        let mut r = GameRunner::new(Probe::default());
        r.init();
        r
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut r = GameRunner::new(Probe::default());
        r.tick(1.0 / 60.0);
        assert_eq!(r.game().updates, 0);
        assert_eq!(r.frame_counter(), 0);
    }

    #[test]
    fn tick_steps_and_syncs() {
        let mut r = runner();
        for _ in 0..30 {
            r.tick(1.0 / 60.0);
        }
        let ball = r.game().ball.unwrap();
        assert!(r.context().scene.get(ball).unwrap().pos.y < 10.0);
        assert!(r.game().updates >= 29);
    }

    #[test]
    fn input_reaches_only_first_step() {
        let mut r = runner();
        r.push_input(InputEvent::KeyDown { key_code: 27 });
        r.tick(3.0 / 60.0 + 0.001);
        assert_eq!(r.game().updates, 3);
        assert_eq!(r.game().inputs_seen, 1);
        assert!(r.should_quit());
    }

    #[test]
    fn resize_updates_camera() {
        let mut r = runner();
        r.push_input(InputEvent::Resize { width: 800.0, height: 600.0 });
        assert_eq!(r.viewport_width(), 800.0);
        assert_eq!(r.viewport_height(), 600.0);
    }

    #[test]
    fn sounds_and_events_are_per_frame() {
        let mut r = runner();
        r.tick(2.0 / 60.0 + 0.001);
        assert_eq!(r.sound_events_len(), 2);
        assert_eq!(r.game_events_len(), 2);
        r.tick(0.0);
        assert_eq!(r.sound_events_len(), 0);
        assert_eq!(r.game_events_len(), 0);
    }

    #[test]
    fn debug_lines_follow_flag() {
        let mut r = runner();
        r.tick(1.0 / 60.0);
        assert_eq!(r.debug_vertex_count(), 0);
        r.ctx.toggle_debug_draw();
        r.tick(1.0 / 60.0);
        assert_eq!(r.debug_vertex_count(), 144);
    }

    #[test]
    fn manifest_errors_keep_previous() {
        let mut r = runner();
        r.load_manifest(r#"{ "models": { "ball": { "path": "models/ball/ball.obj" } } }"#);
        assert!(r.context().model("ball").is_some());
        r.load_manifest("not json");
        assert!(r.context().model("ball").is_some());
    }

    #[test]
    fn capacities_come_from_config() {
        let r = runner();
        let config = GameConfig::default();
        assert_eq!(r.max_instances() as usize, config.max_instances);
        assert_eq!(r.max_debug_vertices() as usize, config.max_debug_vertices);
        assert_eq!(r.max_lights() as usize, config.max_lights);
        assert_eq!(r.clear_color(), [0.31, 0.76, 0.92]);
        assert!(r.buffer_total_floats() > 0);
    }
}
