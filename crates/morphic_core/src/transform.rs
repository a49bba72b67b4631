use glam::{Mat4, Quat, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vec3::new(x, y, z),
            ..Default::default()
        }
    }

    // --- Matrices ---

    /// T * R * S, the full local matrix.
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// R * S only. Morph deltas are offsets, so translation must never reach them.
    pub fn compute_rs_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, Vec3::ZERO)
    }
}

/// A node's local transform as the scene authored it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeTransform {
    Decomposed(Transform),
    Matrix(Mat4),
}

impl Default for NodeTransform {
    fn default() -> Self {
        NodeTransform::Decomposed(Transform::default())
    }
}

impl NodeTransform {
    /// Builds the local (TRS, RS) pair for this node.
    ///
    /// An explicit matrix is used verbatim for TRS. For RS its translation
    /// column is cleared, so a matrix carrying translation still yields
    /// correct morph deltas.
    pub fn local_matrices(&self) -> GlobalTransform {
        match self {
            NodeTransform::Decomposed(transform) => GlobalTransform {
                trs: transform.compute_matrix(),
                rs: transform.compute_rs_matrix(),
            },
            NodeTransform::Matrix(matrix) => {
                let mut rs = *matrix;
                rs.w_axis = Vec4::W;
                GlobalTransform { trs: *matrix, rs }
            }
        }
    }
}

/// The two accumulated matrices carried down the node hierarchy.
///
/// `trs` places static vertices in model space; `rs` orients morph deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalTransform {
    pub trs: Mat4,
    pub rs: Mat4,
}

impl Default for GlobalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl GlobalTransform {
    pub const IDENTITY: Self = Self {
        trs: Mat4::IDENTITY,
        rs: Mat4::IDENTITY,
    };

    /// Composes a child's local pair under this (parent) pair: parent * local.
    pub fn mul_local(&self, local: &GlobalTransform) -> GlobalTransform {
        GlobalTransform {
            trs: self.trs * local.trs,
            rs: self.rs * local.rs,
        }
    }

    /// Accumulated pair for a child node whose local transform is `node`.
    pub fn child(&self, node: &NodeTransform) -> GlobalTransform {
        self.mul_local(&node.local_matrices())
    }
}
