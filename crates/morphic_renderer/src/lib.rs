pub mod animation;
pub mod draw;
mod error;
pub mod geometry;
pub mod gpu;
pub mod mesh;
pub mod model;
pub mod morph;

pub use draw::DrawCommands;
pub use error::ModelError;
pub use geometry::{GeometryBuffers, MeshGroup};
pub use gpu::{GpuGeometry, GpuModel, RenderPassCommands};
pub use mesh::{
    Interpolation, Mesh, MorphMesh, MorphPushParameters, NormalMesh, Primitive, Vertex,
    WeightSampler,
};
pub use model::Model;
