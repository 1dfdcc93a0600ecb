/// Directional light system for the Cook-Torrance shading pass.
///
/// Lights are persistent and stay until explicitly removed.
/// Each frame, the engine exposes active lights to the host
/// for the renderer's lighting pass.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A directional light.
///
/// Wire format (8 floats / 32 bytes):
/// `[dx, dy, dz, r, g, b, intensity, pad]`
/// The direction points from the surface toward the light.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct DirectionalLight {
    pub dx: f32,
    pub dy: f32,
    pub dz: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub intensity: f32,
    _pad: f32,
}

impl DirectionalLight {
    /// Create a white light of unit intensity toward `direction` (normalized; zero stays zero).
    pub fn new(direction: Vec3) -> Self {
        let d = direction.normalize_or_zero();
        Self {
            dx: d.x,
            dy: d.y,
            dz: d.z,
            r: 1.0,
            g: 1.0,
            b: 1.0,
            intensity: 1.0,
            _pad: 0.0,
        }
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.r = color[0];
        self.g = color[1];
        self.b = color[2];
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn direction(&self) -> Vec3 {
        Vec3::new(self.dx, self.dy, self.dz)
    }
}

/// Manages active lights and ambient color for the scene.
pub struct LightState {
    lights: Vec<DirectionalLight>,
    ambient: [f32; 3],
    max_lights: usize,
}

impl LightState {
    pub fn new() -> Self {
        Self::with_capacity(8)
    }

    /// Create a LightState holding at most `max_lights` lights.
    pub fn with_capacity(max_lights: usize) -> Self {
        Self {
            lights: Vec::with_capacity(max_lights),
            ambient: [0.1, 0.1, 0.1],
            max_lights,
        }
    }

    /// Add a light. Lights beyond the capacity are ignored.
    pub fn add(&mut self, light: DirectionalLight) {
        if self.lights.len() < self.max_lights {
            self.lights.push(light);
        } else {
            log::warn!("light capacity {} reached, light dropped", self.max_lights);
        }
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &DirectionalLight> {
        self.lights.iter()
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }

    pub fn set_ambient(&mut self, r: f32, g: f32, b: f32) {
        self.ambient = [r, g, b];
    }

    pub fn ambient(&self) -> [f32; 3] {
        self.ambient
    }

    /// Pointer to the lights data for shared-buffer reads.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.lights.as_ptr() as *const f32
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::protocol::LIGHT_FLOATS;

    #[test]
    fn light_is_8_floats() {
        assert_eq!(std::mem::size_of::<DirectionalLight>(), LIGHT_FLOATS * 4);
    }

    #[test]
    fn direction_is_normalized() {
        let light = DirectionalLight::new(Vec3::new(10.0, 10.0, 10.0));
        assert!((light.direction().length() - 1.0).abs() < 1e-5);
        assert_eq!(light.intensity, 1.0);
        assert_eq!(DirectionalLight::new(Vec3::ZERO).direction(), Vec3::ZERO);
    }

    #[test]
    fn add_clear_and_capacity() {
        let mut state = LightState::with_capacity(2);
        state.add(DirectionalLight::new(Vec3::new(-6.0, 10.0, -9.0)));
        state.add(DirectionalLight::new(Vec3::new(10.0, 10.0, 10.0)));
        state.add(DirectionalLight::new(Vec3::Y));
        assert_eq!(state.count(), 2);
        state.clear();
        assert_eq!(state.count(), 0);
    }

    #[test]
    fn ambient_round_trip() {
        let mut state = LightState::new();
        state.set_ambient(0.2, 0.2, 0.25);
        assert_eq!(state.ambient(), [0.2, 0.2, 0.25]);
    }

    #[test]
    fn builder_sets_color() {
        let light = DirectionalLight::new(Vec3::Y)
            .with_color([1.0, 0.5, 0.0])
            .with_intensity(2.0);
        assert_eq!((light.r, light.g, light.b), (1.0, 0.5, 0.0));
        assert_eq!(light.intensity, 2.0);
    }
}
