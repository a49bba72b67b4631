pub use glam;

pub mod settings;
pub mod time;
pub mod transform;

pub use settings::{LoadSettings, SettingsError};
pub use transform::{GlobalTransform, NodeTransform, Transform};

/// Upper bound on simultaneously blended morph targets.
/// The per-draw parameter block carries exactly this many weights.
pub const MAX_WEIGHTS: usize = 8;
