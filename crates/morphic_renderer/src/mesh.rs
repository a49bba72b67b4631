use std::mem;

use bytemuck::{Pod, Zeroable};
use morphic_assets::MeshSource;
use morphic_core::MAX_WEIGHTS;

// #[repr(C)] ensures the compiler doesn't reorder fields.
// Pod (Plain Old Data) and Zeroable allow us to cast this struct to raw bytes safely.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3], // model space, Y already flipped
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
}

impl Vertex {
    pub const SIZE: u64 = mem::size_of::<Vertex>() as u64;

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0, // @location(0) in shader
                    format: wgpu::VertexFormat::Float32x3, // position
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: (mem::size_of::<[f32; 3]>() * 2) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// The per-draw block handed to the vertex stage as push constants.
///
/// Offsets are in vector units of the packed morph delta buffer. A zeroed
/// block (`vertex_stride == 0`) means "no morph blending".
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MorphPushParameters {
    pub buffer_offset: u32,
    pub normal_offset: u32,
    pub tangent_offset: u32,
    pub vertex_stride: u32,
    pub weights: [f32; MAX_WEIGHTS],
}

impl MorphPushParameters {
    pub const SIZE: u32 = mem::size_of::<MorphPushParameters>() as u32;

    /// Range a pipeline layout must declare for this block.
    pub fn push_constant_range() -> wgpu::PushConstantRange {
        wgpu::PushConstantRange {
            stages: wgpu::ShaderStages::VERTEX,
            range: 0..Self::SIZE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Primitive {
    /// Offset into the owning group's index buffer.
    pub first_index: u32,
    pub index_count: u32,
    /// Added to every index at draw time. Always 0 for normal meshes, whose
    /// indices are already global; for morph meshes it is this primitive's
    /// vertex start relative to the mesh's vertex block.
    pub base_vertex: i32,
    /// Index into `Model::materials`.
    pub material: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
    CubicSpline,
}

impl Interpolation {
    /// Unknown or missing modes fall back to linear.
    pub fn from_mode(mode: Option<&str>) -> Self {
        match mode {
            Some("STEP") => Interpolation::Step,
            Some("CUBICSPLINE") => Interpolation::CubicSpline,
            _ => Interpolation::Linear,
        }
    }
}

/// Where a morph mesh's weights come from in the scene's animations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightSampler {
    pub animation: usize,
    pub sampler: usize,
    pub input: usize,
    pub output: usize,
}

#[derive(Clone, Debug, Default)]
pub struct NormalMesh {
    pub name: String,
    pub primitives: Vec<Primitive>,
    pub current_index: usize,
}

#[derive(Clone, Debug, Default)]
pub struct MorphMesh {
    pub name: String,
    pub primitives: Vec<Primitive>,
    /// Keyframe segment used by the last weight update.
    pub current_index: usize,

    pub sampler: Option<WeightSampler>,
    pub interpolation: Interpolation,
    /// Number of morph targets the mesh declares (may exceed `MAX_WEIGHTS`).
    pub target_count: usize,
    pub weights_init: Vec<f32>,
    pub weights_time: Vec<f32>,
    /// Keyframe-major weight values, `target_count` per keyframe
    /// (three times that for cubic splines).
    pub weights_data: Vec<f32>,

    /// Byte offset of this mesh's vertex block in the morph vertex buffer.
    pub morph_vertex_offset: u64,
    pub push: MorphPushParameters,
}

impl MorphMesh {
    pub fn from_source(source: &MeshSource) -> Self {
        let weights_init: Vec<f32> = source.weights.iter().copied().take(MAX_WEIGHTS).collect();

        let mut push = MorphPushParameters::default();
        push.weights[..weights_init.len()].copy_from_slice(&weights_init);

        Self {
            name: source.name.clone(),
            target_count: source.weights.len(),
            weights_init,
            push,
            ..Default::default()
        }
    }
}

/// A mesh is either static or carries morph targets; the two never share fields.
#[derive(Clone, Debug)]
pub enum Mesh {
    Normal(NormalMesh),
    MorphTarget(MorphMesh),
}

impl Mesh {
    /// Meshes declaring no default weights are static.
    pub fn classify(source: &MeshSource) -> Mesh {
        if source.weights.is_empty() {
            Mesh::Normal(NormalMesh {
                name: source.name.clone(),
                ..Default::default()
            })
        } else {
            Mesh::MorphTarget(MorphMesh::from_source(source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(weights: Vec<f32>) -> MeshSource {
        MeshSource {
            name: "m".to_string(),
            weights,
            primitives: Vec::new(),
        }
    }

    #[test]
    fn gpu_struct_sizes() {
        assert_eq!(Vertex::SIZE, 36);
        assert_eq!(MorphPushParameters::SIZE, 48);
    }

    #[test]
    fn classification_is_stable() {
        let static_source = source(Vec::new());
        let morph_source = source(vec![0.25, 0.75]);

        for _ in 0..3 {
            assert!(matches!(Mesh::classify(&static_source), Mesh::Normal(_)));
            assert!(matches!(Mesh::classify(&morph_source), Mesh::MorphTarget(_)));
        }
    }

    #[test]
    fn initial_weights_are_capped() {
        let mesh = MorphMesh::from_source(&source((0..10).map(|i| i as f32).collect()));

        assert_eq!(mesh.target_count, 10);
        assert_eq!(mesh.weights_init.len(), MAX_WEIGHTS);
        assert_eq!(mesh.push.weights, [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn interpolation_defaults_to_linear() {
        assert_eq!(Interpolation::from_mode(Some("STEP")), Interpolation::Step);
        assert_eq!(Interpolation::from_mode(Some("CUBICSPLINE")), Interpolation::CubicSpline);
        assert_eq!(Interpolation::from_mode(Some("SMOOTH")), Interpolation::Linear);
        assert_eq!(Interpolation::from_mode(None), Interpolation::Linear);
    }
}
