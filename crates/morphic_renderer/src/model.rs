use std::path::Path;

use morphic_assets::{SceneData, material::MaterialData};
use morphic_core::{GlobalTransform, LoadSettings};

use crate::{
    draw::{self, DrawCommands},
    error::ModelError,
    geometry::{self, GeometryBuffers, MeshGroup},
    mesh::{Mesh, MorphMesh, NormalMesh, Vertex},
    morph,
};

/// A loaded scene, flattened into two mesh groups ready for upload and drawing.
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub normal_meshes: Vec<NormalMesh>,
    pub morph_meshes: Vec<MorphMesh>,
    pub materials: Vec<MaterialData>,
    /// Client-side buffers. Emptied by `GpuModel::upload`.
    pub geometry: GeometryBuffers,

    /// Length of the longest weight track, in seconds.
    pub animation_max_time: f32,
    pub current_time: f32,
    pub loop_animation: bool,
}

impl Model {
    pub fn load(path: impl AsRef<Path>, settings: &LoadSettings) -> Result<Self, ModelError> {
        let scene = morphic_assets::load_scene(path)?;
        Self::from_scene(&scene, settings)
    }

    /// Walks the scene from its roots and builds every mesh it reaches.
    pub fn from_scene(scene: &SceneData, settings: &LoadSettings) -> Result<Self, ModelError> {
        let mut model = Model {
            materials: scene.materials.clone(),
            loop_animation: settings.loop_animation,
            ..Default::default()
        };

        let mut loader = NodeLoader {
            scene,
            global_scale: settings.global_scale,
            model: &mut model,
        };
        for root in scene.roots(settings.scene)? {
            loader.load_node(root, &GlobalTransform::IDENTITY, 0)?;
        }

        log::info!(
            "Model loaded: {} static meshes, {} morph meshes, {} morph vectors, animation {:.2}s",
            model.normal_meshes.len(),
            model.morph_meshes.len(),
            model.geometry.morph_data.len(),
            model.animation_max_time
        );
        Ok(model)
    }

    /// Advances the model clock and resamples every morph mesh's weights.
    pub fn advance(&mut self, delta: f32) {
        self.current_time += delta;
        if self.loop_animation && self.animation_max_time > 0.0 {
            self.current_time = self.current_time.rem_euclid(self.animation_max_time);
        }

        let time = self.current_time;
        for mesh in &mut self.morph_meshes {
            mesh.update_weights(time);
        }
    }

    pub fn draw_normal(&self, commands: &mut impl DrawCommands) {
        draw::draw_normal(&self.normal_meshes, commands);
    }

    pub fn draw_morph(&self, commands: &mut impl DrawCommands) {
        draw::draw_morph(&self.morph_meshes, commands);
    }

    /// Hands the packed morph deltas over, leaving the model without them.
    pub fn take_morph_data(&mut self) -> Vec<[f32; 3]> {
        std::mem::take(&mut self.geometry.morph_data)
    }
}

struct NodeLoader<'a> {
    scene: &'a SceneData,
    global_scale: f32,
    model: &'a mut Model,
}

impl NodeLoader<'_> {
    /// Depth-first: children are visited before this node's own mesh.
    fn load_node(
        &mut self,
        index: usize,
        parent: &GlobalTransform,
        depth: usize,
    ) -> Result<(), ModelError> {
        if depth > self.scene.nodes.len() {
            return Err(ModelError::NodeCycle(index));
        }
        let scene = self.scene;
        let node = scene.nodes.get(index).ok_or(ModelError::MissingNode(index))?;
        let world = parent.child(&node.transform);

        for &child in &node.children {
            self.load_node(child, &world, depth + 1)?;
        }

        if let Some(mesh) = node.mesh {
            self.load_mesh(index, mesh, &world)?;
        }
        Ok(())
    }

    fn load_mesh(
        &mut self,
        node: usize,
        mesh_index: usize,
        world: &GlobalTransform,
    ) -> Result<(), ModelError> {
        let scene = self.scene;
        let source = scene
            .meshes
            .get(mesh_index)
            .ok_or(ModelError::MissingMesh { node, mesh: mesh_index })?;

        match Mesh::classify(source) {
            Mesh::Normal(mut mesh) => {
                for primitive in &source.primitives {
                    if let Some(emitted) = geometry::emit_primitive(
                        scene,
                        primitive,
                        world,
                        self.global_scale,
                        MeshGroup::Normal,
                        &mut self.model.geometry,
                    )? {
                        mesh.primitives.push(emitted.primitive);
                    }
                }
                log::debug!("Static mesh '{}' ({} primitives)", mesh.name, mesh.primitives.len());
                self.model.normal_meshes.push(mesh);
            }
            Mesh::MorphTarget(mut mesh) => {
                if let Some(end) = mesh.attach_weight_track(scene, node)? {
                    self.model.animation_max_time = self.model.animation_max_time.max(end);
                }

                let mesh_start = self.model.geometry.morph_vertices.len() as u32;
                mesh.morph_vertex_offset = u64::from(mesh_start) * Vertex::SIZE;

                let mut first = true;
                for primitive in &source.primitives {
                    if !geometry::is_drawable(primitive) {
                        log::debug!("Skipping undrawable primitive in '{}'", mesh.name);
                        continue;
                    }

                    let layout = morph::pack_primitive(
                        scene,
                        primitive,
                        &world.rs,
                        self.global_scale,
                        &mut self.model.geometry.morph_data,
                    )?;
                    if first {
                        layout.apply_to(&mut mesh.push);
                        first = false;
                    } else if !layout.same_offsets(&mesh.push) {
                        // One push block per mesh, so these deltas could never be addressed.
                        self.model
                            .geometry
                            .morph_data
                            .truncate(layout.buffer_offset as usize);
                        log::warn!(
                            "Primitives of '{}' disagree on morph layout, dropping the deltas of \
                             a later primitive",
                            mesh.name
                        );
                    }

                    if let Some(emitted) = geometry::emit_primitive(
                        scene,
                        primitive,
                        world,
                        self.global_scale,
                        MeshGroup::Morph,
                        &mut self.model.geometry,
                    )? {
                        let mut primitive = emitted.primitive;
                        primitive.base_vertex = (emitted.vertex_start - mesh_start) as i32;
                        mesh.primitives.push(primitive);
                    }
                }
                log::debug!(
                    "Morph mesh '{}' ({} primitives, {} targets, stride {})",
                    mesh.name,
                    mesh.primitives.len(),
                    mesh.target_count,
                    mesh.push.vertex_stride
                );
                self.model.morph_meshes.push(mesh);
            }
        }
        Ok(())
    }
}
