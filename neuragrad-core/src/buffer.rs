use crate::types::DType;

/// Enum representing different buffer types based on device.
/// Only host memory exists for now; `NdArray` shares a `Buffer` through an `Arc`.
#[derive(Debug, Clone)]
pub enum Buffer {
    /// Data resides on the CPU.
    Cpu(CpuBuffer),
}

/// Enum for CPU-specific buffer types.
#[derive(Debug, Clone, PartialEq)]
pub enum CpuBuffer {
    /// Buffer holding f32 data on the CPU.
    F32(Vec<f32>),
    /// Buffer holding f64 data on the CPU.
    F64(Vec<f64>),
}

impl Buffer {
    /// Returns the element type stored in the buffer.
    pub fn dtype(&self) -> DType {
        match self {
            Buffer::Cpu(CpuBuffer::F32(_)) => DType::F32,
            Buffer::Cpu(CpuBuffer::F64(_)) => DType::F64,
        }
    }

    /// Number of elements held by the buffer.
    pub fn len(&self) -> usize {
        match self {
            Buffer::Cpu(CpuBuffer::F32(data)) => data.len(),
            Buffer::Cpu(CpuBuffer::F64(data)) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Host view of the buffer.
    pub fn cpu(&self) -> &CpuBuffer {
        match self {
            Buffer::Cpu(cpu) => cpu,
        }
    }
}
