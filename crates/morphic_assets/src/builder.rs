use glam::Vec3;

use crate::{
    accessor::{AccessorData, BufferViewData, ComponentType},
    scene::SceneData,
};

// Procedural authoring. Every call appends one tightly packed buffer and
// returns the index of the accessor that reads it.
impl SceneData {
    pub fn push_accessor(
        &mut self,
        bytes: Vec<u8>,
        count: usize,
        component_type: ComponentType,
        components: usize,
    ) -> usize {
        let buffer = self.buffers.len();
        let byte_length = bytes.len();
        self.buffers.push(bytes);

        self.accessors.push(AccessorData {
            view: Some(BufferViewData {
                buffer,
                byte_offset: 0,
                byte_length,
                byte_stride: None,
            }),
            byte_offset: 0,
            count,
            component_type,
            components,
        });
        self.accessors.len() - 1
    }

    pub fn push_vec3s(&mut self, values: &[Vec3]) -> usize {
        let bytes = values
            .iter()
            .flat_map(|v| v.to_array())
            .flat_map(f32::to_le_bytes)
            .collect();
        self.push_accessor(bytes, values.len(), ComponentType::F32, 3)
    }

    pub fn push_floats(&mut self, values: &[f32]) -> usize {
        let bytes = values.iter().copied().flat_map(f32::to_le_bytes).collect();
        self.push_accessor(bytes, values.len(), ComponentType::F32, 1)
    }

    pub fn push_indices_u16(&mut self, indices: &[u16]) -> usize {
        let bytes = indices.iter().copied().flat_map(u16::to_le_bytes).collect();
        self.push_accessor(bytes, indices.len(), ComponentType::U16, 1)
    }

    pub fn push_indices_u32(&mut self, indices: &[u32]) -> usize {
        let bytes = indices.iter().copied().flat_map(u32::to_le_bytes).collect();
        self.push_accessor(bytes, indices.len(), ComponentType::U32, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_accessors_read_back() {
        let mut scene = SceneData::default();
        let positions = scene.push_vec3s(&[Vec3::X, Vec3::new(1.0, 2.0, 3.0)]);
        let times = scene.push_floats(&[0.0, 0.5]);
        let indices = scene.push_indices_u16(&[2, 1, 0]);

        assert_eq!((positions, times, indices), (0, 1, 2));
        assert_eq!(scene.buffers.len(), 3);
        assert_eq!(
            scene.read_vec3s(positions).unwrap(),
            vec![Vec3::X, Vec3::new(1.0, 2.0, 3.0)]
        );
        assert_eq!(scene.read_floats(times).unwrap(), vec![0.0, 0.5]);
        assert_eq!(scene.read_indices(indices).unwrap(), vec![2, 1, 0]);
    }
}
