use glam::Mat4;

use crate::components::entity::Entity;
use crate::components::mesh::MeshComponent;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Model matrix for an entity's mesh: translate · rotate · mesh offset · scale.
pub fn model_matrix(entity: &Entity, mesh: &MeshComponent) -> Mat4 {
    Mat4::from_translation(entity.pos)
        * Mat4::from_quat(entity.rotation)
        * mesh.offset
        * Mat4::from_scale(entity.scale)
}

fn instance_for(entity: &Entity, mesh: &MeshComponent) -> RenderInstance {
    let mat = &mesh.material;
    RenderInstance {
        model: model_matrix(entity, mesh).to_cols_array(),
        color: mat.color.to_array(),
        model_id: mesh.model.0 as f32,
        roughness: mat.roughness,
        f0: mat.f0,
        kd: mat.kd,
        repeat: mat.repeat,
    }
}

/// Build the render buffer from a set of entities.
/// Textured meshes first, then untextured; `textured_split` marks the boundary.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    let mut untextured: Vec<RenderInstance> = Vec::new();

    for entity in entities {
        if !entity.active {
            continue;
        }

        let mesh = match &entity.mesh {
            Some(m) => m,
            None => continue,
        };

        let instance = instance_for(entity, mesh);
        if mesh.material.textured {
            buffer.push(instance);
        } else {
            untextured.push(instance);
        }
    }

    buffer.set_textured_split(buffer.instance_count());
    for inst in untextured {
        buffer.push(inst);
    }
}
