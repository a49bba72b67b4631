pub mod accessor;
pub mod animation;
pub mod asset_server;
mod builder;
mod error;
pub mod material;
pub mod scene;

pub use accessor::{AccessorData, BufferViewData, ComponentType};
pub use asset_server::{load_scene, load_scene_from_slice};
pub use error::AssetError;
pub use scene::{MeshSource, MorphTargetSource, PrimitiveSource, SceneData, SceneNode};
