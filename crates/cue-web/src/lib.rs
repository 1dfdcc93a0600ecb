pub mod runner;

pub use runner::GameRunner;

#[doc(hidden)]
pub use cue_engine;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::MyGame;
///
/// cue_web::export_game!(MyGame, "my-game");
/// ```
///
/// The game type must provide `fn new() -> Self`.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        /// Runs `f` against the runner. Calls made before `game_init()` get `default`.
        fn with_runner<R>(default: R, f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
                Some(runner) => f(runner),
                None => {
                    log::warn!("{}: called before game_init()", $game_name);
                    default
                }
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner((), |r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner((), |r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32, button: u32) {
            with_runner((), |r| r.push_input($crate::cue_engine::InputEvent::PointerDown { x, y, button }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32, button: u32) {
            with_runner((), |r| r.push_input($crate::cue_engine::InputEvent::PointerUp { x, y, button }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner((), |r| r.push_input($crate::cue_engine::InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner((), |r| r.push_input($crate::cue_engine::InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            with_runner((), |r| r.push_input($crate::cue_engine::InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_resize(width: f32, height: f32) {
            with_runner((), |r| r.push_input($crate::cue_engine::InputEvent::Resize { width, height }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner((), |r| r.push_input($crate::cue_engine::InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_load_manifest(json: &str) {
            with_runner((), |r| r.load_manifest(json));
        }

        #[wasm_bindgen]
        pub fn game_should_quit() -> bool {
            with_runner(false, |r| r.should_quit())
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_camera_ptr() -> *const f32 {
            with_runner(std::ptr::null(), |r| r.camera_ptr())
        }

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(std::ptr::null(), |r| r.instances_ptr())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(0, |r| r.instance_count())
        }

        #[wasm_bindgen]
        pub fn get_textured_split() -> u32 {
            with_runner(0, |r| r.textured_split())
        }

        #[wasm_bindgen]
        pub fn get_debug_vertices_ptr() -> *const f32 {
            with_runner(std::ptr::null(), |r| r.debug_vertices_ptr())
        }

        #[wasm_bindgen]
        pub fn get_debug_vertex_count() -> u32 {
            with_runner(0, |r| r.debug_vertex_count())
        }

        #[wasm_bindgen]
        pub fn get_lights_ptr() -> *const f32 {
            with_runner(std::ptr::null(), |r| r.lights_ptr())
        }

        #[wasm_bindgen]
        pub fn get_light_count() -> u32 {
            with_runner(0, |r| r.light_count())
        }

        #[wasm_bindgen]
        pub fn get_ambient_r() -> f32 {
            with_runner(0.0, |r| r.ambient()[0])
        }

        #[wasm_bindgen]
        pub fn get_ambient_g() -> f32 {
            with_runner(0.0, |r| r.ambient()[1])
        }

        #[wasm_bindgen]
        pub fn get_ambient_b() -> f32 {
            with_runner(0.0, |r| r.ambient()[2])
        }

        #[wasm_bindgen]
        pub fn get_sound_events_ptr() -> *const u8 {
            with_runner(std::ptr::null(), |r| r.sound_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_len() -> u32 {
            with_runner(0, |r| r.sound_events_len())
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(std::ptr::null(), |r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(0, |r| r.game_events_len())
        }

        #[wasm_bindgen]
        pub fn get_viewport_width() -> f32 {
            with_runner(0.0, |r| r.viewport_width())
        }

        #[wasm_bindgen]
        pub fn get_viewport_height() -> f32 {
            with_runner(0.0, |r| r.viewport_height())
        }

        #[wasm_bindgen]
        pub fn get_clear_color_r() -> f32 {
            with_runner(0.0, |r| r.clear_color()[0])
        }

        #[wasm_bindgen]
        pub fn get_clear_color_g() -> f32 {
            with_runner(0.0, |r| r.clear_color()[1])
        }

        #[wasm_bindgen]
        pub fn get_clear_color_b() -> f32 {
            with_runner(0.0, |r| r.clear_color()[2])
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(0, |r| r.max_instances())
        }

        #[wasm_bindgen]
        pub fn get_max_debug_vertices() -> u32 {
            with_runner(0, |r| r.max_debug_vertices())
        }

        #[wasm_bindgen]
        pub fn get_max_lights() -> u32 {
            with_runner(0, |r| r.max_lights())
        }

        #[wasm_bindgen]
        pub fn get_max_sounds() -> u32 {
            with_runner(0, |r| r.max_sounds())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(0, |r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(0, |r| r.buffer_total_floats())
        }
    };
}
