// transform.rs
//
// Per-frame list of model transforms. The list only records matrices in push
// order; the vertex shader applies them first-pushed-first:
//
//     p' = M[n-1] * ... * M[1] * M[0] * p
//
// Matrices are stored row-major (`RowMajor`). The only place they are turned
// into column-major data for the GPU is `TransformUniform::from_list`.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use crate::{config::TRANSFORM_CAPACITY, error::TransformError};

/// A 4x4 matrix laid out row by row: element `(row, col)` lives at `row * 4 + col`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMajor(pub [f32; 16]);

impl RowMajor {
    pub const IDENTITY: RowMajor = RowMajor([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.0[row * 4 + col]
    }

    /// Column-major `glam` matrix with the same meaning.
    pub fn to_mat4(&self) -> Mat4 {
        // Reading rows as columns yields the transpose
        Mat4::from_cols_array(&self.0).transpose()
    }
}

#[derive(Debug, Clone)]
pub struct TransformList {
    transforms: Vec<RowMajor>,
}

impl TransformList {
    pub fn new() -> Self {
        Self { transforms: Vec::with_capacity(TRANSFORM_CAPACITY) }
    }

    pub fn push(&mut self, matrix: RowMajor) -> Result<(), TransformError> {
        if self.transforms.len() >= TRANSFORM_CAPACITY {
            return Err(TransformError::Full { capacity: TRANSFORM_CAPACITY });
        }
        self.transforms.push(matrix);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.transforms.clear();
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RowMajor> {
        self.transforms.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowMajor> {
        self.transforms.iter()
    }

    pub fn as_slice(&self) -> &[RowMajor] {
        &self.transforms
    }

    /// CPU-side product in the order the shader applies the list.
    pub fn compose(&self) -> Mat4 {
        self.transforms
            .iter()
            .fold(Mat4::IDENTITY, |acc, m| m.to_mat4() * acc)
    }
}

impl Default for TransformList {
    fn default() -> Self {
        Self::new()
    }
}

pub fn rotate_cw_x(list: &mut TransformList, angle: f32) -> Result<(), TransformError> {
    let (s, c) = (angle.sin(), angle.cos());
    list.push(RowMajor([
        1.0, 0.0, 0.0, 0.0,
        0.0, c,   -s,  0.0,
        0.0, s,   c,   0.0,
        0.0, 0.0, 0.0, 1.0,
    ]))
}

pub fn rotate_ccw_x(list: &mut TransformList, angle: f32) -> Result<(), TransformError> {
    rotate_cw_x(list, -angle)
}

pub fn rotate_cw_y(list: &mut TransformList, angle: f32) -> Result<(), TransformError> {
    let (s, c) = (angle.sin(), angle.cos());
    list.push(RowMajor([
        c,   0.0, s,   0.0,
        0.0, 1.0, 0.0, 0.0,
        -s,  0.0, c,   0.0,
        0.0, 0.0, 0.0, 1.0,
    ]))
}

pub fn rotate_ccw_y(list: &mut TransformList, angle: f32) -> Result<(), TransformError> {
    rotate_cw_y(list, -angle)
}

pub fn rotate_cw_z(list: &mut TransformList, angle: f32) -> Result<(), TransformError> {
    let (s, c) = (angle.sin(), angle.cos());
    list.push(RowMajor([
        c,   -s,  0.0, 0.0,
        s,   c,   0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]))
}

pub fn rotate_ccw_z(list: &mut TransformList, angle: f32) -> Result<(), TransformError> {
    rotate_cw_z(list, -angle)
}

pub fn scale(list: &mut TransformList, x: f32, y: f32, z: f32) -> Result<(), TransformError> {
    list.push(RowMajor([
        x,   0.0, 0.0, 0.0,
        0.0, y,   0.0, 0.0,
        0.0, 0.0, z,   0.0,
        0.0, 0.0, 0.0, 1.0,
    ]))
}

pub fn translate(list: &mut TransformList, x: f32, y: f32, z: f32) -> Result<(), TransformError> {
    list.push(RowMajor([
        1.0, 0.0, 0.0, x,
        0.0, 1.0, 0.0, y,
        0.0, 0.0, 1.0, z,
        0.0, 0.0, 0.0, 1.0,
    ]))
}

/// Uniform block matching `Transforms` in `shaders/vertex.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct TransformUniform {
    pub view_proj: [[f32; 4]; 4],
    pub models: [[[f32; 4]; 4]; TRANSFORM_CAPACITY],
    pub count: [u32; 4], // x = number of valid `models`, rest is padding
}

impl TransformUniform {
    pub fn from_list(view_proj: Mat4, list: &TransformList) -> Self {
        let mut models = [Mat4::IDENTITY.to_cols_array_2d(); TRANSFORM_CAPACITY];
        for (slot, matrix) in models.iter_mut().zip(list.iter()) {
            *slot = matrix.to_mat4().to_cols_array_2d();
        }
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            models,
            count: [list.len() as u32, 0, 0, 0],
        }
    }
}
