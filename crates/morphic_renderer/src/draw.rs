use std::ops::Range;

use crate::{
    geometry::MeshGroup,
    mesh::{MorphMesh, MorphPushParameters, NormalMesh},
};

/// The slice of a command encoder the dispatcher needs.
///
/// `RenderPassCommands` records into a wgpu render pass; tests record calls.
pub trait DrawCommands {
    fn bind_vertex_buffer(&mut self, group: MeshGroup, byte_offset: u64);
    fn bind_index_buffer(&mut self, group: MeshGroup);
    fn push_morph_parameters(&mut self, parameters: &MorphPushParameters);
    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32);
}

/// Binds the shared static buffers once, then draws every primitive.
pub fn draw_normal(meshes: &[NormalMesh], commands: &mut impl DrawCommands) {
    if meshes.is_empty() {
        return;
    }

    commands.bind_vertex_buffer(MeshGroup::Normal, 0);
    commands.bind_index_buffer(MeshGroup::Normal);
    for primitive in meshes.iter().flat_map(|mesh| &mesh.primitives) {
        let start = primitive.first_index;
        commands.draw_indexed(start..start + primitive.index_count, primitive.base_vertex);
    }
}

/// Each morph mesh binds its own vertex block and pushes its own parameters.
///
/// A mesh whose primitives were all skipped owns no vertices, so its offset
/// may sit at the end of the buffer and must not be bound.
pub fn draw_morph(meshes: &[MorphMesh], commands: &mut impl DrawCommands) {
    for mesh in meshes.iter().filter(|mesh| !mesh.primitives.is_empty()) {
        commands.bind_vertex_buffer(MeshGroup::Morph, mesh.morph_vertex_offset);
        commands.bind_index_buffer(MeshGroup::Morph);
        commands.push_morph_parameters(&mesh.push);

        for primitive in &mesh.primitives {
            let start = primitive.first_index;
            commands.draw_indexed(start..start + primitive.index_count, primitive.base_vertex);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Primitive;

    #[derive(Debug, PartialEq)]
    enum Call {
        Vertex(MeshGroup, u64),
        Index(MeshGroup),
        Push(u32),
        Draw(Range<u32>, i32),
    }

    #[derive(Default)]
    struct Recorder(Vec<Call>);

    impl DrawCommands for Recorder {
        fn bind_vertex_buffer(&mut self, group: MeshGroup, byte_offset: u64) {
            self.0.push(Call::Vertex(group, byte_offset));
        }
        fn bind_index_buffer(&mut self, group: MeshGroup) {
            self.0.push(Call::Index(group));
        }
        fn push_morph_parameters(&mut self, parameters: &MorphPushParameters) {
            self.0.push(Call::Push(parameters.buffer_offset));
        }
        fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32) {
            self.0.push(Call::Draw(indices, base_vertex));
        }
    }

    fn primitive(first_index: u32, index_count: u32, base_vertex: i32) -> Primitive {
        Primitive {
            first_index,
            index_count,
            base_vertex,
            material: None,
        }
    }

    #[test]
    fn normal_meshes_share_one_binding() {
        let meshes = vec![
            NormalMesh {
                primitives: vec![primitive(0, 6, 0)],
                ..Default::default()
            },
            NormalMesh {
                primitives: vec![primitive(6, 6, 0)],
                ..Default::default()
            },
        ];

        let mut recorder = Recorder::default();
        draw_normal(&meshes, &mut recorder);

        assert_eq!(
            recorder.0,
            vec![
                Call::Vertex(MeshGroup::Normal, 0),
                Call::Index(MeshGroup::Normal),
                Call::Draw(0..6, 0),
                Call::Draw(6..12, 0),
            ]
        );
    }

    #[test]
    fn morph_meshes_rebind_per_mesh() {
        let a = MorphMesh {
            morph_vertex_offset: 0,
            primitives: vec![primitive(0, 3, 0), primitive(3, 3, 3)],
            ..Default::default()
        };
        let mut b = MorphMesh {
            morph_vertex_offset: 216,
            primitives: vec![primitive(6, 3, 0)],
            ..Default::default()
        };
        b.push.buffer_offset = 12;

        let mut recorder = Recorder::default();
        draw_morph(&[a, b], &mut recorder);

        assert_eq!(
            recorder.0,
            vec![
                Call::Vertex(MeshGroup::Morph, 0),
                Call::Index(MeshGroup::Morph),
                Call::Push(0),
                Call::Draw(0..3, 0),
                Call::Draw(3..6, 3),
                Call::Vertex(MeshGroup::Morph, 216),
                Call::Index(MeshGroup::Morph),
                Call::Push(12),
                Call::Draw(6..9, 0),
            ]
        );
    }

    #[test]
    fn empty_groups_record_nothing() {
        let mut recorder = Recorder::default();
        draw_normal(&[], &mut recorder);
        draw_morph(&[], &mut recorder);
        assert!(recorder.0.is_empty());
    }

    #[test]
    fn morph_mesh_without_primitives_is_not_bound() {
        let drawn = MorphMesh {
            primitives: vec![primitive(0, 3, 0)],
            ..Default::default()
        };
        // Offset equals the end of a three-vertex buffer.
        let skipped = MorphMesh {
            morph_vertex_offset: 108,
            ..Default::default()
        };

        let mut recorder = Recorder::default();
        draw_morph(&[drawn, skipped], &mut recorder);

        assert_eq!(
            recorder.0,
            vec![
                Call::Vertex(MeshGroup::Morph, 0),
                Call::Index(MeshGroup::Morph),
                Call::Push(0),
                Call::Draw(0..3, 0),
            ]
        );
    }
}
