use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Per-instance render data written to the shared buffer for the host renderer.
/// Must match the host protocol: 24 floats = 96 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct RenderInstance {
    /// Column-major model matrix.
    pub model: [f32; 16],
    /// Diffuse RGB.
    pub color: [f32; 3],
    /// ModelId as float.
    pub model_id: f32,
    /// Cook-Torrance roughness `m`.
    pub roughness: f32,
    /// Fresnel reflectance at normal incidence.
    pub f0: f32,
    /// Diffuse weight.
    pub kd: f32,
    /// Texture coordinate repeat.
    pub repeat: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 24;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_cols_array(&self.model)
    }
}

/// Render buffer containing all model instances and metadata.
pub struct RenderBuffer {
    /// Instances to be rendered: textured first, then untextured after `textured_split`.
    pub instances: Vec<RenderInstance>,
    /// Instances [0..textured_split) use the textured program,
    /// instances [textured_split..] the untextured one.
    pub textured_split: u32,
    max_instances: usize,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    /// Create a buffer that holds at most `max_instances` instances.
    pub fn with_capacity(max_instances: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max_instances),
            textured_split: 0,
            max_instances,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.textured_split = 0;
    }

    /// Append an instance. Instances beyond the capacity are dropped.
    pub fn push(&mut self, instance: RenderInstance) {
        if self.instances.len() < self.max_instances {
            self.instances.push(instance);
        }
    }

    pub fn set_textured_split(&mut self, split: u32) {
        self.textured_split = split;
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn capacity(&self) -> usize {
        self.max_instances
    }

    /// Raw pointer to instance data for shared-buffer reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_instance_is_24_floats() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), 96);
        assert_eq!(RenderInstance::STRIDE_BYTES, 96);
    }

    #[test]
    fn render_buffer_push_and_count() {
        let mut buf = RenderBuffer::new();
        buf.push(RenderInstance::default());
        buf.push(RenderInstance::default());
        assert_eq!(buf.instance_count(), 2);
        buf.clear();
        assert_eq!(buf.instance_count(), 0);
    }

    #[test]
    fn push_beyond_capacity_is_dropped() {
        let mut buf = RenderBuffer::with_capacity(1);
        buf.push(RenderInstance::default());
        buf.push(RenderInstance::default());
        assert_eq!(buf.instance_count(), 1);
    }
}
