use morphic_assets::{SceneData, animation::TargetPath};
use morphic_core::MAX_WEIGHTS;

use crate::{
    error::ModelError,
    mesh::{Interpolation, MorphMesh, WeightSampler},
};

/// Finds the first channel animating `node`'s morph weights.
pub fn find_weight_sampler(
    scene: &SceneData,
    node: usize,
) -> Option<(WeightSampler, Interpolation)> {
    for (animation_index, animation) in scene.animations.iter().enumerate() {
        for channel in &animation.channels {
            if channel.node != node || channel.path != TargetPath::Weights {
                continue;
            }

            let Some(sampler) = animation.samplers.get(channel.sampler) else {
                log::warn!(
                    "Animation {} has a weights channel with missing sampler {}",
                    animation_index,
                    channel.sampler
                );
                continue;
            };

            let found = WeightSampler {
                animation: animation_index,
                sampler: channel.sampler,
                input: sampler.input,
                output: sampler.output,
            };
            return Some((found, Interpolation::from_mode(sampler.interpolation.as_deref())));
        }
    }
    None
}

impl MorphMesh {
    /// Resolves and copies the weight track for `node`, if any.
    ///
    /// Returns the last keyframe time, the mesh's contribution to the model's
    /// animation length.
    pub fn attach_weight_track(
        &mut self,
        scene: &SceneData,
        node: usize,
    ) -> Result<Option<f32>, ModelError> {
        let Some((sampler, interpolation)) = find_weight_sampler(scene, node) else {
            return Ok(None);
        };

        self.weights_time = scene.read_floats(sampler.input)?;
        self.weights_data = scene.read_floats(sampler.output)?;
        self.interpolation = interpolation;
        self.sampler = Some(sampler);

        let expected = self.weights_time.len() * self.values_per_keyframe();
        if self.weights_data.len() != expected {
            log::warn!(
                "Mesh '{}' weight track holds {} values, expected {} ({} keyframes x {} targets); \
                 sampling only whole keyframes",
                self.name,
                self.weights_data.len(),
                expected,
                self.weights_time.len(),
                self.target_count
            );
        }

        Ok(self.weights_time.last().copied())
    }

    fn values_per_keyframe(&self) -> usize {
        match self.interpolation {
            Interpolation::CubicSpline => self.target_count * 3,
            Interpolation::Linear | Interpolation::Step => self.target_count,
        }
    }

    /// Keyframes for which both a time and a full set of values exist.
    fn keyframe_count(&self) -> usize {
        let per_keyframe = self.values_per_keyframe();
        if per_keyframe == 0 {
            return 0;
        }
        self.weights_time.len().min(self.weights_data.len() / per_keyframe)
    }

    /// Samples the weight track at `time` into the push block.
    ///
    /// Meshes without a track keep their initial weights. Times outside the
    /// track clamp to the first or last keyframe.
    pub fn update_weights(&mut self, time: f32) {
        let keyframes = self.keyframe_count();
        if keyframes == 0 {
            return;
        }

        let times = &self.weights_time[..keyframes];
        let active = self.target_count.min(MAX_WEIGHTS);

        if keyframes == 1 || time <= times[0] {
            self.current_index = 0;
            for target in 0..active {
                self.push.weights[target] = self.keyframe_value(0, target);
            }
            return;
        }
        if time >= times[keyframes - 1] {
            self.current_index = keyframes - 1;
            for target in 0..active {
                self.push.weights[target] = self.keyframe_value(keyframes - 1, target);
            }
            return;
        }

        // Time usually moves forward, so resume the search at the cached segment.
        let mut segment = if times[self.current_index.min(keyframes - 1)] <= time {
            self.current_index.min(keyframes - 2)
        } else {
            0
        };
        while times[segment + 1] <= time {
            segment += 1;
        }
        self.current_index = segment;

        let (t0, t1) = (times[segment], times[segment + 1]);
        let dt = t1 - t0;
        let s = if dt > 0.0 { (time - t0) / dt } else { 0.0 };

        for target in 0..active {
            self.push.weights[target] = match self.interpolation {
                Interpolation::Step => self.keyframe_value(segment, target),
                Interpolation::Linear => {
                    let a = self.keyframe_value(segment, target);
                    let b = self.keyframe_value(segment + 1, target);
                    a + (b - a) * s
                }
                Interpolation::CubicSpline => {
                    let p0 = self.keyframe_value(segment, target);
                    let m0 = self.spline_tangent(segment, target, 2) * dt;
                    let p1 = self.keyframe_value(segment + 1, target);
                    let m1 = self.spline_tangent(segment + 1, target, 0) * dt;
                    hermite(p0, m0, p1, m1, s)
                }
            };
        }
    }

    fn keyframe_value(&self, keyframe: usize, target: usize) -> f32 {
        match self.interpolation {
            Interpolation::CubicSpline => self.spline_tangent(keyframe, target, 1),
            Interpolation::Linear | Interpolation::Step => {
                self.weights_data[keyframe * self.target_count + target]
            }
        }
    }

    // Cubic keyframes are laid out [in-tangents, values, out-tangents].
    fn spline_tangent(&self, keyframe: usize, target: usize, part: usize) -> f32 {
        let n = self.target_count;
        self.weights_data[keyframe * n * 3 + part * n + target]
    }
}

fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, s: f32) -> f32 {
    let s2 = s * s;
    let s3 = s2 * s;
    (2.0 * s3 - 3.0 * s2 + 1.0) * p0
        + (s3 - 2.0 * s2 + s) * m0
        + (-2.0 * s3 + 3.0 * s2) * p1
        + (s3 - s2) * m1
}
