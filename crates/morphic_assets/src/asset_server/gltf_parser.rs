use std::path::Path;

use glam::{Mat4, Quat, Vec3};
use morphic_core::transform::{NodeTransform, Transform};

use crate::{
    accessor::{AccessorData, BufferViewData},
    animation::{AnimationData, ChannelData, SamplerData, TargetPath},
    error::AssetError,
    material::MaterialData,
    scene::{MeshSource, MorphTargetSource, PrimitiveSource, SceneData, SceneNode},
};

pub fn parse_gltf(path: &Path) -> Result<SceneData, AssetError> {
    let base_path = path.parent().unwrap_or(Path::new("./"));

    // A. Load Document & Buffers (images stay encoded, we never touch them)
    let gltf::Gltf { document, blob } = gltf::Gltf::open(path)?;
    let buffers = gltf::import_buffers(&document, Some(base_path), blob)?;

    Ok(build_scene(&document, buffers))
}

pub fn parse_gltf_slice(bytes: &[u8]) -> Result<SceneData, AssetError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&document, None, blob)?;

    Ok(build_scene(&document, buffers))
}

fn build_scene(document: &gltf::Document, buffers: Vec<gltf::buffer::Data>) -> SceneData {
    let buffers: Vec<Vec<u8>> = buffers.into_iter().map(|data| data.0).collect();

    // --- STEP 1: ACCESSORS ---
    let accessors = document
        .accessors()
        .map(|accessor| {
            if accessor.sparse().is_some() {
                log::warn!(
                    "Accessor {} is sparse; only its dense base values are read",
                    accessor.index()
                );
            }

            AccessorData {
                view: accessor.view().map(|view| BufferViewData {
                    buffer: view.buffer().index(),
                    byte_offset: view.offset(),
                    byte_length: view.length(),
                    byte_stride: view.stride(),
                }),
                byte_offset: accessor.offset(),
                count: accessor.count(),
                component_type: accessor.data_type().into(),
                components: accessor.dimensions().multiplicity(),
            }
        })
        .collect();

    // --- STEP 2: MATERIALS ---
    let materials = document
        .materials()
        .map(|mat| {
            let pbr = mat.pbr_metallic_roughness();
            MaterialData {
                name: mat.name().unwrap_or("Material").to_string(),
                base_color: pbr.base_color_factor(),
                metallic: pbr.metallic_factor(),
                roughness: pbr.roughness_factor(),
                alpha_mode: mat.alpha_mode().into(),
                alpha_cutoff: mat.alpha_cutoff().unwrap_or(0.5),
            }
        })
        .collect();

    // --- STEP 3: MESHES ---
    let meshes = document
        .meshes()
        .map(|mesh| {
            let primitives = mesh
                .primitives()
                .map(|primitive| {
                    if primitive.mode() != gltf::mesh::Mode::Triangles {
                        log::debug!(
                            "Mesh {} has a {:?} primitive, drawn as a triangle list",
                            mesh.index(),
                            primitive.mode()
                        );
                    }

                    PrimitiveSource {
                        positions: primitive.get(&gltf::Semantic::Positions).map(|a| a.index()),
                        normals: primitive.get(&gltf::Semantic::Normals).map(|a| a.index()),
                        indices: primitive.indices().map(|a| a.index()),
                        material: primitive.material().index(),
                        targets: primitive
                            .morph_targets()
                            .map(|target| MorphTargetSource {
                                positions: target.positions().map(|a| a.index()),
                                normals: target.normals().map(|a| a.index()),
                                tangents: target.tangents().map(|a| a.index()),
                            })
                            .collect(),
                    }
                })
                .collect();

            MeshSource {
                name: mesh.name().unwrap_or("Mesh").to_string(),
                weights: mesh.weights().map(|w| w.to_vec()).unwrap_or_default(),
                primitives,
            }
        })
        .collect();

    // --- STEP 4: NODES (The Hierarchy) ---
    let nodes = document
        .nodes()
        .map(|node| {
            let transform = match node.transform() {
                gltf::scene::Transform::Matrix { matrix } => {
                    NodeTransform::Matrix(Mat4::from_cols_array_2d(&matrix))
                }
                gltf::scene::Transform::Decomposed {
                    translation,
                    rotation,
                    scale,
                } => NodeTransform::Decomposed(Transform {
                    translation: Vec3::from(translation),
                    rotation: Quat::from_array(rotation),
                    scale: Vec3::from(scale),
                }),
            };

            SceneNode {
                name: node.name().unwrap_or("Node").to_string(),
                transform,
                mesh: node.mesh().map(|m| m.index()),
                children: node.children().map(|c| c.index()).collect(),
            }
        })
        .collect();

    // --- STEP 5: ANIMATIONS ---
    let animations = document
        .animations()
        .map(|animation| AnimationData {
            name: animation.name().map(String::from),
            channels: animation
                .channels()
                .map(|channel| ChannelData {
                    node: channel.target().node().index(),
                    path: TargetPath::from(channel.target().property()),
                    sampler: channel.sampler().index(),
                })
                .collect(),
            samplers: animation
                .samplers()
                .map(|sampler| SamplerData {
                    input: sampler.input().index(),
                    output: sampler.output().index(),
                    interpolation: Some(interpolation_name(sampler.interpolation()).to_string()),
                })
                .collect(),
        })
        .collect();

    let scenes = document
        .scenes()
        .map(|scene| scene.nodes().map(|n| n.index()).collect())
        .collect();

    SceneData {
        buffers,
        accessors,
        nodes,
        meshes,
        materials,
        animations,
        scenes,
        default_scene: document.default_scene().map(|s| s.index()),
    }
}

fn interpolation_name(interpolation: gltf::animation::Interpolation) -> &'static str {
    match interpolation {
        gltf::animation::Interpolation::Linear => "LINEAR",
        gltf::animation::Interpolation::Step => "STEP",
        gltf::animation::Interpolation::CubicSpline => "CUBICSPLINE",
    }
}
