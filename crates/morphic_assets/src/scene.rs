use morphic_core::transform::NodeTransform;

use crate::{
    accessor::AccessorData, animation::AnimationData, error::AssetError, material::MaterialData,
};

/// An already-parsed scene, as handed to the model loader. Read-only.
#[derive(Clone, Debug, Default)]
pub struct SceneData {
    pub buffers: Vec<Vec<u8>>,
    pub accessors: Vec<AccessorData>,

    // The Nodes (hierarchy)
    pub nodes: Vec<SceneNode>,
    pub meshes: Vec<MeshSource>,
    pub materials: Vec<MaterialData>,
    pub animations: Vec<AnimationData>,

    /// Root node lists, one per scene.
    pub scenes: Vec<Vec<usize>>,
    pub default_scene: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct SceneNode {
    pub name: String,
    pub transform: NodeTransform,
    pub mesh: Option<usize>, // Index into the meshes list above
    pub children: Vec<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct MeshSource {
    pub name: String,
    /// Declared default morph weights. Empty means a static mesh.
    pub weights: Vec<f32>,
    pub primitives: Vec<PrimitiveSource>,
}

#[derive(Clone, Debug, Default)]
pub struct PrimitiveSource {
    pub positions: Option<usize>,
    pub normals: Option<usize>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
    pub targets: Vec<MorphTargetSource>,
}

/// Delta accessors of one morph target. Every attribute is optional.
#[derive(Clone, Debug, Default)]
pub struct MorphTargetSource {
    pub positions: Option<usize>,
    pub normals: Option<usize>,
    pub tangents: Option<usize>,
}

impl SceneData {
    /// Root nodes to traverse.
    ///
    /// An explicit scene wins, then the declared default scene, then the first
    /// scene. A document without scenes falls back to every parentless node.
    pub fn roots(&self, scene: Option<usize>) -> Result<Vec<usize>, AssetError> {
        if let Some(index) = scene {
            return self
                .scenes
                .get(index)
                .cloned()
                .ok_or(AssetError::MissingScene(index));
        }

        if let Some(roots) = self
            .default_scene
            .and_then(|index| self.scenes.get(index))
            .or_else(|| self.scenes.first())
        {
            return Ok(roots.clone());
        }

        let mut has_parent = vec![false; self.nodes.len()];
        for node in &self.nodes {
            for &child in &node.children {
                if let Some(flag) = has_parent.get_mut(child) {
                    *flag = true;
                }
            }
        }
        Ok((0..self.nodes.len()).filter(|&i| !has_parent[i]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_of_nodes() -> SceneData {
        SceneData {
            nodes: vec![
                SceneNode {
                    children: vec![1],
                    ..Default::default()
                },
                SceneNode::default(),
                SceneNode::default(),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn without_scenes_roots_are_parentless_nodes() {
        let scene = chain_of_nodes();
        assert_eq!(scene.roots(None).unwrap(), vec![0, 2]);
    }

    #[test]
    fn default_scene_is_preferred_over_first() {
        let mut scene = chain_of_nodes();
        scene.scenes = vec![vec![0], vec![2]];
        scene.default_scene = Some(1);
        assert_eq!(scene.roots(None).unwrap(), vec![2]);
        assert_eq!(scene.roots(Some(0)).unwrap(), vec![0]);
    }

    #[test]
    fn unknown_scene_is_an_error() {
        let scene = chain_of_nodes();
        assert!(matches!(scene.roots(Some(3)), Err(AssetError::MissingScene(3))));
    }
}
