use glam::{Mat4, Vec3};
use morphic_assets::{PrimitiveSource, SceneData};

use crate::{error::ModelError, mesh::MorphPushParameters};

/// Where one primitive's deltas landed in the packed morph buffer.
/// All offsets are in vector units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MorphLayout {
    pub buffer_offset: u32,
    pub normal_offset: u32,
    pub tangent_offset: u32,
    pub vertex_stride: u32,
}

impl MorphLayout {
    /// Copies the offsets into a push block, leaving its weights alone.
    pub fn apply_to(&self, push: &mut MorphPushParameters) {
        push.buffer_offset = self.buffer_offset;
        push.normal_offset = self.normal_offset;
        push.tangent_offset = self.tangent_offset;
        push.vertex_stride = self.vertex_stride;
    }

    pub fn same_offsets(&self, push: &MorphPushParameters) -> bool {
        self.normal_offset == push.normal_offset
            && self.tangent_offset == push.tangent_offset
            && self.vertex_stride == push.vertex_stride
    }
}

/// Packs every morph delta of `source` into `morph_data`.
///
/// Deltas are gathered across all targets, positions first, then normals, then
/// tangents, and written vertex-major: for each vertex, one vector per gathered
/// delta stream. Vectors are oriented by `rs` (no translation), positions are
/// scaled by `global_scale`, normals and tangents are re-normalized, and Y is
/// flipped on everything.
pub fn pack_primitive(
    scene: &SceneData,
    source: &PrimitiveSource,
    rs: &Mat4,
    global_scale: f32,
    morph_data: &mut Vec<[f32; 3]>,
) -> Result<MorphLayout, ModelError> {
    let buffer_offset = morph_data.len() as u32;

    let mut streams: Vec<Vec<Vec3>> = Vec::new();
    for accessor in source.targets.iter().filter_map(|t| t.positions) {
        streams.push(scene.read_vec3s(accessor)?);
    }
    let normal_offset = streams.len();

    for accessor in source.targets.iter().filter_map(|t| t.normals) {
        streams.push(scene.read_vec3s(accessor)?);
    }
    let tangent_offset = streams.len();

    for accessor in source.targets.iter().filter_map(|t| t.tangents) {
        streams.push(scene.read_vec3s(accessor)?);
    }
    let vertex_stride = streams.len();

    let vertex_count = streams.iter().map(Vec::len).min().unwrap_or(0);
    if streams.iter().any(|s| s.len() != vertex_count) {
        log::warn!(
            "Morph target streams disagree on vertex count, packing the first {}",
            vertex_count
        );
    }

    morph_data.reserve(vertex_count * vertex_stride);
    for vertex in 0..vertex_count {
        for (stream_index, stream) in streams.iter().enumerate() {
            let mut delta = rs.transform_vector3(stream[vertex]);
            if stream_index < normal_offset {
                delta *= global_scale;
            } else {
                // Zero deltas are legal and must not become NaN.
                delta = delta.normalize_or_zero();
            }
            delta.y = -delta.y;
            morph_data.push(delta.to_array());
        }
    }

    Ok(MorphLayout {
        buffer_offset,
        normal_offset: normal_offset as u32,
        tangent_offset: tangent_offset as u32,
        vertex_stride: vertex_stride as u32,
    })
}
