pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext, RenderContext};
pub use api::types::{EntityId, SoundEvent, GameEvent};
pub use components::entity::Entity;
pub use components::mesh::{MeshComponent, Material};
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType,
    ColliderDesc, ColliderMaterial, CollisionPair,
};
pub use renderer::instance::{RenderInstance, RenderBuffer};
pub use renderer::camera::{OrbitCamera, CameraUniform, Ray};
pub use input::queue::{InputEvent, InputQueue, keys, BUTTON_LEFT};
pub use assets::manifest::SceneManifest;
pub use assets::registry::{ModelId, ModelRegistry};
pub use bridge::protocol::ProtocolLayout;
pub use systems::debug::{debug_draw_colliders, DebugLines, DebugVertex};
pub use systems::lighting::{DirectionalLight, LightState};
pub use systems::render::build_render_buffer;
