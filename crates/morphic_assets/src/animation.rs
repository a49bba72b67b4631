/// Animated property of a channel target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetPath {
    Translation,
    Rotation,
    Scale,
    Weights,
}

impl From<gltf::animation::Property> for TargetPath {
    fn from(property: gltf::animation::Property) -> Self {
        use gltf::animation::Property;
        match property {
            Property::Translation => TargetPath::Translation,
            Property::Rotation => TargetPath::Rotation,
            Property::Scale => TargetPath::Scale,
            Property::MorphTargetWeights => TargetPath::Weights,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChannelData {
    pub node: usize,
    pub path: TargetPath,
    pub sampler: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SamplerData {
    /// Keyframe times accessor.
    pub input: usize,
    /// Keyframe values accessor.
    pub output: usize,
    /// Declared interpolation mode string ("LINEAR", "STEP", "CUBICSPLINE").
    pub interpolation: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationData {
    pub name: Option<String>,
    pub channels: Vec<ChannelData>,
    pub samplers: Vec<SamplerData>,
}
