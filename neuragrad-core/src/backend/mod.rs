//! # Array backend (`backend`)
//!
//! Raw, graph-agnostic arrays consumed by leaf construction and by every
//! [`Op::compute`](crate::autograd::Op::compute). An [`NdArray`] is a shape plus a
//! shared host buffer; cloning it never copies element data.
//!
//! - [`kernels`]: element-wise, broadcasting and reduction primitives used by the
//!   operation catalogue.
//! - [`utils`]: stride and broadcasting helpers.

pub mod kernels;
pub mod utils;

use std::fmt::Debug;
use std::sync::Arc;

use num_traits::Float;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::buffer::{Buffer, CpuBuffer};
use crate::error::{NeuraGradError, Result};
use crate::types::DType;

/// Host element types an [`NdArray`] can be built from.
pub trait Element: Float + Debug + Send + Sync + 'static {
    const DTYPE: DType;

    fn into_cpu_buffer(data: Vec<Self>) -> CpuBuffer;

    /// Borrows the buffer's data if it holds this element type.
    fn slice_of(buffer: &CpuBuffer) -> Option<&[Self]>;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    fn into_cpu_buffer(data: Vec<Self>) -> CpuBuffer {
        CpuBuffer::F32(data)
    }

    fn slice_of(buffer: &CpuBuffer) -> Option<&[Self]> {
        match buffer {
            CpuBuffer::F32(data) => Some(data.as_slice()),
            _ => None,
        }
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    fn into_cpu_buffer(data: Vec<Self>) -> CpuBuffer {
        CpuBuffer::F64(data)
    }

    fn slice_of(buffer: &CpuBuffer) -> Option<&[Self]> {
        match buffer {
            CpuBuffer::F64(data) => Some(data.as_slice()),
            _ => None,
        }
    }
}

/// A dense, contiguous, row-major array living in host memory.
#[derive(Debug, Clone)]
pub struct NdArray {
    buffer: Arc<Buffer>,
    shape: Vec<usize>,
}

impl NdArray {
    /// Copies host data into a new array.
    ///
    /// # Errors
    /// Returns `TensorCreationError` if `data.len()` does not match the number of
    /// elements described by `shape`.
    pub fn from_vec<T: Element>(data: Vec<T>, shape: Vec<usize>) -> Result<Self> {
        let numel: usize = shape.iter().product();
        if data.len() != numel {
            return Err(NeuraGradError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        Ok(Self::from_cpu_buffer(T::into_cpu_buffer(data), shape))
    }

    /// Builds an array of the requested dtype from `f64` values.
    pub fn from_f64_vec(data: Vec<f64>, shape: Vec<usize>, dtype: DType) -> Result<Self> {
        match dtype {
            DType::F32 => Self::from_vec(data.into_iter().map(|v| v as f32).collect(), shape),
            DType::F64 => Self::from_vec(data, shape),
        }
    }

    /// Wraps a buffer whose length is already known to match `shape`.
    pub(crate) fn from_cpu_buffer(buffer: CpuBuffer, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            match &buffer {
                CpuBuffer::F32(d) => d.len(),
                CpuBuffer::F64(d) => d.len(),
            },
            shape.iter().product::<usize>()
        );
        NdArray {
            buffer: Arc::new(Buffer::Cpu(buffer)),
            shape,
        }
    }

    /// A zero-dimensional array holding `value`.
    pub fn scalar<T: Element>(value: T) -> Self {
        Self::from_cpu_buffer(T::into_cpu_buffer(vec![value]), vec![])
    }

    /// Allocates a zero-filled array.
    pub fn allocate(shape: &[usize], dtype: DType) -> Self {
        Self::full(shape, 0.0, dtype)
    }

    /// Creates an array filled with `value`.
    pub fn full(shape: &[usize], value: f64, dtype: DType) -> Self {
        let numel = shape.iter().product();
        let buffer = match dtype {
            DType::F32 => CpuBuffer::F32(vec![value as f32; numel]),
            DType::F64 => CpuBuffer::F64(vec![value; numel]),
        };
        Self::from_cpu_buffer(buffer, shape.to_vec())
    }

    pub fn zeros_like(&self) -> Self {
        Self::full(&self.shape, 0.0, self.dtype())
    }

    pub fn ones_like(&self) -> Self {
        Self::full(&self.shape, 1.0, self.dtype())
    }

    /// Samples from the uniform distribution on `[0, 1)`.
    pub fn rand(shape: &[usize], dtype: DType) -> Self {
        let mut rng = rand::thread_rng();
        let numel: usize = shape.iter().product();
        let data: Vec<f64> = (0..numel).map(|_| rng.gen::<f64>()).collect();
        Self::from_sampled(data, shape, dtype)
    }

    /// Samples from the standard normal distribution.
    pub fn randn(shape: &[usize], dtype: DType) -> Self {
        let mut rng = rand::thread_rng();
        let numel: usize = shape.iter().product();
        let data: Vec<f64> = (0..numel).map(|_| rng.sample(StandardNormal)).collect();
        Self::from_sampled(data, shape, dtype)
    }

    fn from_sampled(data: Vec<f64>, shape: &[usize], dtype: DType) -> Self {
        let buffer = match dtype {
            DType::F32 => CpuBuffer::F32(data.into_iter().map(|v| v as f32).collect()),
            DType::F64 => CpuBuffer::F64(data),
        };
        Self::from_cpu_buffer(buffer, shape.to_vec())
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn dtype(&self) -> DType {
        self.buffer.dtype()
    }

    pub fn buffer(&self) -> &Arc<Buffer> {
        &self.buffer
    }

    /// Borrows the elements as `T`.
    ///
    /// # Errors
    /// Returns `DTypeMismatch` if the array does not hold `T` elements.
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        T::slice_of(self.buffer.cpu()).ok_or_else(|| NeuraGradError::DTypeMismatch {
            expected: T::DTYPE,
            actual: self.dtype(),
            operation: "as_slice".to_string(),
        })
    }

    /// Copies the elements out, widened to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self.buffer.cpu() {
            CpuBuffer::F32(data) => data.iter().map(|&v| v as f64).collect(),
            CpuBuffer::F64(data) => data.clone(),
        }
    }

    /// Returns the single element of a one-element array.
    pub fn item(&self) -> Result<f64> {
        if self.numel() != 1 {
            return Err(NeuraGradError::NotAScalar {
                shape: self.shape.clone(),
            });
        }
        Ok(self.to_f64_vec()[0])
    }

    /// True when both arrays read the same underlying buffer.
    pub fn shares_buffer_with(&self, other: &NdArray) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }
}
