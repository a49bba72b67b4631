use glam::{Mat3, Vec3};
use morphic_assets::{PrimitiveSource, SceneData};
use morphic_core::GlobalTransform;

use crate::{
    error::ModelError,
    mesh::{Primitive, Vertex},
};

/// Selects one of the two vertex/index buffer pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshGroup {
    Normal,
    Morph,
}

/// Client-side geometry accumulated during a load, before upload.
#[derive(Clone, Debug, Default)]
pub struct GeometryBuffers {
    pub normal_vertices: Vec<Vertex>,
    /// Global indices: already biased by each primitive's vertex start.
    pub normal_indices: Vec<u32>,
    pub morph_vertices: Vec<Vertex>,
    /// Zero-based per primitive; `Primitive::base_vertex` supplies the bias.
    pub morph_indices: Vec<u32>,
    /// Packed morph deltas, one entry per vector.
    pub morph_data: Vec<[f32; 3]>,
}

impl GeometryBuffers {
    pub fn vertices(&self, group: MeshGroup) -> &[Vertex] {
        match group {
            MeshGroup::Normal => &self.normal_vertices,
            MeshGroup::Morph => &self.morph_vertices,
        }
    }

    pub fn indices(&self, group: MeshGroup) -> &[u32] {
        match group {
            MeshGroup::Normal => &self.normal_indices,
            MeshGroup::Morph => &self.morph_indices,
        }
    }

    fn group_mut(&mut self, group: MeshGroup) -> (&mut Vec<Vertex>, &mut Vec<u32>) {
        match group {
            MeshGroup::Normal => (&mut self.normal_vertices, &mut self.normal_indices),
            MeshGroup::Morph => (&mut self.morph_vertices, &mut self.morph_indices),
        }
    }

    /// Drops every client-side copy once the data lives on the GPU.
    pub fn release(&mut self) {
        *self = GeometryBuffers::default();
    }
}

/// Result of appending one primitive to a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmittedPrimitive {
    pub primitive: Primitive,
    /// Vertex index in the group's buffer where this primitive begins.
    pub vertex_start: u32,
}

/// Whether a primitive carries enough data to be drawn.
pub fn is_drawable(source: &PrimitiveSource) -> bool {
    source.indices.is_some() && source.positions.is_some()
}

/// Appends a primitive's vertices and indices to `group`.
///
/// Positions are placed in model space with `world.trs` and `global_scale`,
/// normals go through the inverse-transpose of that matrix. Both get their Y
/// flipped. Returns `None` when the primitive has no indices or positions.
/// An index past the primitive's own vertices is an error, and nothing is
/// appended in that case.
pub fn emit_primitive(
    scene: &SceneData,
    source: &PrimitiveSource,
    world: &GlobalTransform,
    global_scale: f32,
    group: MeshGroup,
    geometry: &mut GeometryBuffers,
) -> Result<Option<EmittedPrimitive>, ModelError> {
    let (Some(index_accessor), Some(position_accessor)) = (source.indices, source.positions) else {
        log::debug!("Skipping primitive without indices or positions");
        return Ok(None);
    };

    let positions = scene.read_vec3s(position_accessor)?;
    let normals = match source.normals {
        Some(accessor) => scene.read_vec3s(accessor)?,
        None => Vec::new(),
    };
    let indices = scene.read_indices(index_accessor).inspect_err(|e| {
        log::error!("Cannot read index accessor {}: {}", index_accessor, e);
    })?;

    let vertex_count =
        u32::try_from(positions.len()).map_err(|_| ModelError::TooManyVertices(group))?;
    if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
        return Err(ModelError::IndexOutOfRange {
            accessor: index_accessor,
            index,
            vertex_count,
        });
    }

    let normal_matrix = normal_matrix(world);
    let (vertices, index_buffer) = geometry.group_mut(group);

    // Every biased index stays below the group's new vertex total.
    let vertex_start = u32::try_from(vertices.len())
        .ok()
        .filter(|start| start.checked_add(vertex_count).is_some())
        .ok_or(ModelError::TooManyVertices(group))?;

    vertices.extend(positions.iter().enumerate().map(|(i, &p)| {
        let mut position = world.trs.transform_point3(p) * global_scale;
        position.y = -position.y;

        let n = normals.get(i).copied().unwrap_or(Vec3::ZERO);
        let mut normal = (normal_matrix * n).normalize_or_zero();
        normal.y = -normal.y;

        Vertex {
            position: position.to_array(),
            normal: normal.to_array(),
            tangent: [0.0; 3],
        }
    }));

    let first_index = index_buffer.len() as u32;
    match group {
        MeshGroup::Normal => index_buffer.extend(indices.iter().map(|&i| i + vertex_start)),
        MeshGroup::Morph => index_buffer.extend_from_slice(&indices),
    }

    Ok(Some(EmittedPrimitive {
        primitive: Primitive {
            first_index,
            index_count: indices.len() as u32,
            base_vertex: 0,
            material: source.material,
        },
        vertex_start,
    }))
}

/// Inverse-transpose of the upper 3x3, or the 3x3 itself when singular.
fn normal_matrix(world: &GlobalTransform) -> Mat3 {
    let linear = Mat3::from_mat4(world.trs);
    if linear.determinant().abs() > f32::EPSILON {
        linear.inverse().transpose()
    } else {
        linear
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};
    use morphic_core::{NodeTransform, Transform};

    use super::*;

    fn triangle(scene: &mut SceneData) -> PrimitiveSource {
        PrimitiveSource {
            positions: Some(scene.push_vec3s(&[Vec3::ZERO, Vec3::X, Vec3::Y])),
            normals: Some(scene.push_vec3s(&[Vec3::Z; 3])),
            indices: Some(scene.push_indices_u16(&[0, 1, 2])),
            material: Some(0),
            targets: Vec::new(),
        }
    }

    #[test]
    fn normal_group_indices_are_biased_by_vertex_start() {
        let mut scene = SceneData::default();
        let source = triangle(&mut scene);
        let mut geometry = GeometryBuffers::default();
        let world = GlobalTransform::IDENTITY;

        for _ in 0..2 {
            emit_primitive(&scene, &source, &world, 1.0, MeshGroup::Normal, &mut geometry)
                .unwrap()
                .unwrap();
        }

        assert_eq!(geometry.normal_indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(geometry.normal_vertices.len(), 6);
    }

    #[test]
    fn morph_group_indices_stay_zero_based() {
        let mut scene = SceneData::default();
        let source = triangle(&mut scene);
        let mut geometry = GeometryBuffers::default();
        let world = GlobalTransform::IDENTITY;

        emit_primitive(&scene, &source, &world, 1.0, MeshGroup::Morph, &mut geometry).unwrap();
        let second = emit_primitive(&scene, &source, &world, 1.0, MeshGroup::Morph, &mut geometry)
            .unwrap()
            .unwrap();

        assert_eq!(geometry.morph_indices, vec![0, 1, 2, 0, 1, 2]);
        assert_eq!(second.vertex_start, 3);
        assert_eq!(second.primitive.first_index, 3);
        assert!(geometry.normal_vertices.is_empty());
    }

    #[test]
    fn vertices_are_scaled_transformed_and_flipped() {
        let mut scene = SceneData::default();
        let source = triangle(&mut scene);
        let mut geometry = GeometryBuffers::default();
        let world = GlobalTransform::IDENTITY.child(&NodeTransform::Decomposed(Transform {
            translation: Vec3::new(0.0, 1.0, 0.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::new(1.0, 1.0, 4.0),
        }));

        emit_primitive(&scene, &source, &world, 2.0, MeshGroup::Normal, &mut geometry).unwrap();

        let v = &geometry.normal_vertices;
        assert_eq!(v[0].position, [0.0, -2.0, 0.0]);
        assert_eq!(v[1].position, [2.0, -2.0, 0.0]);
        assert_eq!(v[2].position, [0.0, -4.0, 0.0]);
        // Non-uniform scale on Z must not stretch the normal.
        let normal = Vec3::from_array(v[0].normal);
        assert!(normal.abs_diff_eq(Vec3::Z, 1e-6));
        assert_eq!(v[0].tangent, [0.0; 3]);
    }

    #[test]
    fn missing_normals_become_zero() {
        let mut scene = SceneData::default();
        let mut source = triangle(&mut scene);
        source.normals = None;
        let mut geometry = GeometryBuffers::default();

        let world = GlobalTransform::IDENTITY;
        emit_primitive(&scene, &source, &world, 1.0, MeshGroup::Normal, &mut geometry).unwrap();

        assert!(geometry.normal_vertices.iter().all(|v| v.normal == [0.0; 3]));
    }

    #[test]
    fn primitive_without_indices_is_skipped() {
        let mut scene = SceneData::default();
        let mut source = triangle(&mut scene);
        source.indices = None;
        let mut geometry = GeometryBuffers::default();

        let world = GlobalTransform::IDENTITY;
        let emitted =
            emit_primitive(&scene, &source, &world, 1.0, MeshGroup::Normal, &mut geometry).unwrap();

        assert!(emitted.is_none());
        assert!(geometry.normal_vertices.is_empty());
    }

    #[test]
    fn index_past_the_primitive_is_rejected() {
        let mut scene = SceneData::default();
        let first = triangle(&mut scene);
        let mut broken = triangle(&mut scene);
        broken.indices = Some(scene.push_indices_u32(&[0, 1, u32::MAX]));
        let mut geometry = GeometryBuffers::default();
        let world = GlobalTransform::IDENTITY;

        emit_primitive(&scene, &first, &world, 1.0, MeshGroup::Normal, &mut geometry).unwrap();
        let err = emit_primitive(&scene, &broken, &world, 1.0, MeshGroup::Normal, &mut geometry)
            .unwrap_err();

        assert!(matches!(
            err,
            ModelError::IndexOutOfRange {
                index: u32::MAX,
                vertex_count: 3,
                ..
            }
        ));
        assert_eq!(geometry.normal_vertices.len(), 3);
        assert_eq!(geometry.normal_indices, vec![0, 1, 2]);
    }

    #[test]
    fn morph_index_equal_to_vertex_count_is_rejected() {
        let mut scene = SceneData::default();
        let mut source = triangle(&mut scene);
        source.indices = Some(scene.push_indices_u16(&[0, 1, 3]));
        let mut geometry = GeometryBuffers::default();

        let world = GlobalTransform::IDENTITY;
        let err = emit_primitive(&scene, &source, &world, 1.0, MeshGroup::Morph, &mut geometry)
            .unwrap_err();

        assert!(matches!(err, ModelError::IndexOutOfRange { index: 3, .. }));
        assert!(geometry.morph_vertices.is_empty());
    }

    #[test]
    fn float_indices_are_fatal() {
        let mut scene = SceneData::default();
        let mut source = triangle(&mut scene);
        source.indices = Some(scene.push_floats(&[0.0, 1.0, 2.0]));
        let mut geometry = GeometryBuffers::default();

        let world = GlobalTransform::IDENTITY;
        let err = emit_primitive(&scene, &source, &world, 1.0, MeshGroup::Normal, &mut geometry)
            .unwrap_err();

        assert!(matches!(
            err,
            ModelError::Asset(morphic_assets::AssetError::UnsupportedIndexFormat { .. })
        ));
    }
}
