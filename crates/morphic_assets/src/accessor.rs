use glam::Vec3;

use crate::{error::AssetError, scene::SceneData};

/// Component encoding of an accessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            ComponentType::I8 | ComponentType::U8 => 1,
            ComponentType::I16 | ComponentType::U16 => 2,
            ComponentType::U32 | ComponentType::F32 => 4,
        }
    }
}

impl From<gltf::accessor::DataType> for ComponentType {
    fn from(data_type: gltf::accessor::DataType) -> Self {
        use gltf::accessor::DataType;
        match data_type {
            DataType::I8 => ComponentType::I8,
            DataType::U8 => ComponentType::U8,
            DataType::I16 => ComponentType::I16,
            DataType::U16 => ComponentType::U16,
            DataType::U32 => ComponentType::U32,
            DataType::F32 => ComponentType::F32,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BufferViewData {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    /// `None` means tightly packed.
    pub byte_stride: Option<usize>,
}

/// A typed, strided window into one of the scene's raw buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct AccessorData {
    /// Accessors without a view read as zeros.
    pub view: Option<BufferViewData>,
    pub byte_offset: usize,
    pub count: usize,
    pub component_type: ComponentType,
    /// Components per element: 1 for scalars, 3 for VEC3, ...
    pub components: usize,
}

impl AccessorData {
    pub fn element_size(&self) -> usize {
        self.component_type.size() * self.components
    }

    fn describe(&self) -> String {
        format!("{}x{:?}", self.components, self.component_type)
    }
}

impl SceneData {
    pub fn accessor(&self, index: usize) -> Result<&AccessorData, AssetError> {
        self.accessors
            .get(index)
            .ok_or(AssetError::MissingAccessor(index))
    }

    /// Reads a float accessor, flattened (`count * components` values).
    pub fn read_floats(&self, index: usize) -> Result<Vec<f32>, AssetError> {
        let accessor = self.accessor(index)?;
        if accessor.component_type != ComponentType::F32 {
            return Err(AssetError::UnexpectedAccessorType {
                accessor: index,
                expected: "float components",
                found: accessor.describe(),
            });
        }

        let mut values = Vec::with_capacity(accessor.count * accessor.components);
        self.visit_elements(index, accessor, |element| {
            values.extend(element.chunks_exact(4).map(read_f32));
        })?;
        Ok(values)
    }

    /// Reads a VEC3 float accessor (positions, normals, morph deltas).
    pub fn read_vec3s(&self, index: usize) -> Result<Vec<Vec3>, AssetError> {
        let accessor = self.accessor(index)?;
        if accessor.component_type != ComponentType::F32 || accessor.components < 3 {
            return Err(AssetError::UnexpectedAccessorType {
                accessor: index,
                expected: "3x F32",
                found: accessor.describe(),
            });
        }

        let mut values = Vec::with_capacity(accessor.count);
        self.visit_elements(index, accessor, |element| {
            values.push(Vec3::new(
                read_f32(&element[0..4]),
                read_f32(&element[4..8]),
                read_f32(&element[8..12]),
            ));
        })?;
        Ok(values)
    }

    /// Reads an index accessor, widening 8/16/32-bit unsigned values to u32.
    /// Any other component type is a fatal load error.
    pub fn read_indices(&self, index: usize) -> Result<Vec<u32>, AssetError> {
        let accessor = self.accessor(index)?;
        let read: fn(&[u8]) -> u32 = match accessor.component_type {
            ComponentType::U8 => |b: &[u8]| b[0] as u32,
            ComponentType::U16 => |b: &[u8]| u16::from_le_bytes([b[0], b[1]]) as u32,
            ComponentType::U32 => |b: &[u8]| u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            component_type => {
                return Err(AssetError::UnsupportedIndexFormat {
                    accessor: index,
                    component_type,
                });
            }
        };

        let mut values = Vec::with_capacity(accessor.count);
        self.visit_elements(index, accessor, |element| values.push(read(element)))?;
        Ok(values)
    }

    fn visit_elements(
        &self,
        index: usize,
        accessor: &AccessorData,
        mut visit: impl FnMut(&[u8]),
    ) -> Result<(), AssetError> {
        let element_size = accessor.element_size();

        let Some(view) = &accessor.view else {
            let zeros = vec![0u8; element_size];
            for _ in 0..accessor.count {
                visit(&zeros);
            }
            return Ok(());
        };

        if accessor.count == 0 {
            return Ok(());
        }

        let buffer = self
            .buffers
            .get(view.buffer)
            .ok_or(AssetError::MissingBuffer(view.buffer))?;

        let stride = view.byte_stride.unwrap_or(element_size);
        let start = view.byte_offset + accessor.byte_offset;
        let end = start + stride * (accessor.count - 1) + element_size;
        let limit = buffer.len().min(view.byte_offset + view.byte_length);
        if end > limit {
            return Err(AssetError::AccessorOutOfBounds {
                accessor: index,
                end,
                len: limit,
            });
        }

        for i in 0..accessor.count {
            let offset = start + i * stride;
            visit(&buffer[offset..offset + element_size]);
        }
        Ok(())
    }
}

fn read_f32(bytes: &[u8]) -> f32 {
    f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
