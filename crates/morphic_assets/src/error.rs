use thiserror::Error;

use crate::accessor::ComponentType;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to import glTF: {0}")]
    Import(#[from] gltf::Error),
    #[error("accessor {0} does not exist")]
    MissingAccessor(usize),
    #[error("buffer {0} does not exist")]
    MissingBuffer(usize),
    #[error("scene {0} does not exist")]
    MissingScene(usize),
    #[error("accessor {accessor} reads past the end of its buffer ({end} > {len} bytes)")]
    AccessorOutOfBounds {
        accessor: usize,
        end: usize,
        len: usize,
    },
    #[error("accessor {accessor} holds {found}, expected {expected}")]
    UnexpectedAccessorType {
        accessor: usize,
        expected: &'static str,
        found: String,
    },
    #[error("index accessor {accessor} has unsupported component type {component_type:?}")]
    UnsupportedIndexFormat {
        accessor: usize,
        component_type: ComponentType,
    },
}
