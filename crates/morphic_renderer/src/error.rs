use morphic_assets::AssetError;
use thiserror::Error;

use crate::geometry::MeshGroup;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("node {0} does not exist")]
    MissingNode(usize),
    #[error("mesh {mesh} referenced by node {node} does not exist")]
    MissingMesh { node: usize, mesh: usize },
    #[error("node {0} appears among its own ancestors")]
    NodeCycle(usize),
    #[error("index {index} in accessor {accessor} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        accessor: usize,
        index: u32,
        vertex_count: u32,
    },
    #[error("{0:?} vertex buffer exceeds the 32-bit index range")]
    TooManyVertices(MeshGroup),
}
