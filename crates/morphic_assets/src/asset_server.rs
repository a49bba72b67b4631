use std::path::Path;

use crate::{error::AssetError, scene::SceneData};

pub mod gltf_parser;

/// Parses a `.gltf`/`.glb` file into a scene description.
/// Referenced buffers are resolved relative to the file; images are not decoded.
pub fn load_scene(path: impl AsRef<Path>) -> Result<SceneData, AssetError> {
    let path = path.as_ref();
    log::info!("Loading scene: {}", path.display());
    gltf_parser::parse_gltf(path)
}

/// Parses an in-memory glTF (JSON with data URIs, or GLB).
pub fn load_scene_from_slice(bytes: &[u8]) -> Result<SceneData, AssetError> {
    gltf_parser::parse_gltf_slice(bytes)
}
