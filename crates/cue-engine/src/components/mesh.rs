use glam::{Mat4, Vec3};

use crate::assets::registry::ModelId;

/// Surface parameters for the Cook-Torrance shading used by the host renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse RGB color (0..1). Ignored by the host when `textured` is set.
    pub color: Vec3,
    /// Microfacet roughness `m`.
    pub roughness: f32,
    /// Fresnel reflectance at normal incidence.
    pub f0: f32,
    /// Diffuse weight.
    pub kd: f32,
    /// Texture coordinate repeat factor.
    pub repeat: f32,
    /// Drawn with the textured program when true.
    pub textured: bool,
}

impl Material {
    pub fn new(color: Vec3) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_cook_torrance(mut self, roughness: f32, f0: f32, kd: f32) -> Self {
        self.roughness = roughness;
        self.f0 = f0;
        self.kd = kd;
        self
    }

    pub fn textured(mut self, repeat: f32) -> Self {
        self.textured = true;
        self.repeat = repeat;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::splat(0.8),
            roughness: 0.3,
            f0: 2.0,
            kd: 0.7,
            repeat: 1.0,
            textured: false,
        }
    }
}

/// A loaded model drawn at the entity's transform.
#[derive(Debug, Clone, Copy)]
pub struct MeshComponent {
    pub model: ModelId,
    pub material: Material,
    /// Local transform applied before the entity scale (body space).
    pub offset: Mat4,
}

impl MeshComponent {
    pub fn new(model: ModelId, material: Material) -> Self {
        Self {
            model,
            material,
            offset: Mat4::IDENTITY,
        }
    }

    /// Shift the model relative to the body origin.
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = Mat4::from_translation(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_builder() {
        let m = Material::new(Vec3::new(1.0, 0.0, 0.0))
            .with_cook_torrance(0.6, 4.0, 1.0)
            .textured(10.0);
        assert!(m.textured);
        assert_eq!(m.repeat, 10.0);
        assert_eq!(m.roughness, 0.6);
        assert_eq!(m.f0, 4.0);
        assert_eq!(m.kd, 1.0);
    }

    #[test]
    fn mesh_offset_is_translation() {
        let mesh = MeshComponent::new(ModelId(2), Material::default())
            .with_offset(Vec3::new(0.0, -0.1, 0.0));
        let p = mesh.offset.transform_point3(Vec3::ZERO);
        assert!((p.y + 0.1).abs() < 1e-6);
    }
}
