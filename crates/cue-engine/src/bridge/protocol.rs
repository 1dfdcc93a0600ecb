/// Shared buffer layout.
/// Must stay in sync with the host's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Camera: 52 floats]
/// [Instances: max_instances × 24 floats]
/// [Debug lines: max_debug_vertices × 6 floats]
/// [Lights: max_lights × 8 floats]
/// [Sounds: max_sounds × 1 float]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// The host reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_INSTANCES: usize = 2;
pub const HEADER_INSTANCE_COUNT: usize = 3;
pub const HEADER_TEXTURED_SPLIT: usize = 4;
pub const HEADER_MAX_DEBUG_VERTICES: usize = 5;
pub const HEADER_DEBUG_VERTEX_COUNT: usize = 6;
pub const HEADER_VIEWPORT_WIDTH: usize = 7;
pub const HEADER_VIEWPORT_HEIGHT: usize = 8;
pub const HEADER_MAX_SOUNDS: usize = 9;
pub const HEADER_SOUND_COUNT: usize = 10;
pub const HEADER_MAX_EVENTS: usize = 11;
pub const HEADER_EVENT_COUNT: usize = 12;
pub const HEADER_PROTOCOL_VERSION: usize = 13;
pub const HEADER_MAX_LIGHTS: usize = 14;
pub const HEADER_LIGHT_COUNT: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats in the camera block: view, projection, skybox view, eye.
pub const CAMERA_FLOATS: usize = 52;

/// Floats per render instance (fixed wire format).
pub const INSTANCE_FLOATS: usize = 24;

/// Floats per debug vertex: x, y, z, r, g, b.
pub const DEBUG_VERTEX_FLOATS: usize = 6;

/// Floats per directional light.
pub const LIGHT_FLOATS: usize = 8;

/// Floats per game event: kind, a, b, c.
pub const EVENT_FLOATS: usize = 4;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_instances: usize,
    pub max_debug_vertices: usize,
    pub max_lights: usize,
    pub max_sounds: usize,
    pub max_events: usize,

    pub instance_data_floats: usize,
    pub debug_data_floats: usize,
    pub light_data_floats: usize,
    pub sound_data_floats: usize,
    pub event_data_floats: usize,

    /// Offset (in floats) where the camera block begins.
    pub camera_offset: usize,
    pub instance_data_offset: usize,
    pub debug_data_offset: usize,
    pub light_data_offset: usize,
    pub sound_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(
        max_instances: usize,
        max_debug_vertices: usize,
        max_lights: usize,
        max_sounds: usize,
        max_events: usize,
    ) -> Self {
        let instance_data_floats = max_instances * INSTANCE_FLOATS;
        let debug_data_floats = max_debug_vertices * DEBUG_VERTEX_FLOATS;
        let light_data_floats = max_lights * LIGHT_FLOATS;
        let sound_data_floats = max_sounds;
        let event_data_floats = max_events * EVENT_FLOATS;

        let camera_offset = HEADER_FLOATS;
        let instance_data_offset = camera_offset + CAMERA_FLOATS;
        let debug_data_offset = instance_data_offset + instance_data_floats;
        let light_data_offset = debug_data_offset + debug_data_floats;
        let sound_data_offset = light_data_offset + light_data_floats;
        let event_data_offset = sound_data_offset + sound_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_instances,
            max_debug_vertices,
            max_lights,
            max_sounds,
            max_events,
            instance_data_floats,
            debug_data_floats,
            light_data_floats,
            sound_data_floats,
            event_data_floats,
            camera_offset,
            instance_data_offset,
            debug_data_offset,
            light_data_offset,
            sound_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.max_instances,
            config.max_debug_vertices,
            config.max_lights,
            config.max_sounds,
            config.max_events,
        )
    }
}
