//! CPU compute kernels over [`NdArray`].
//!
//! Every kernel is pure: it reads its inputs and allocates a fresh output array.
//! Binary kernels follow NumPy broadcasting and require both operands to share a dtype.

use std::ops::AddAssign;

use crate::backend::utils::{
    broadcast_shapes, broadcast_source_index, calculate_strides, index_to_coord,
};
use crate::backend::{Element, NdArray};
use crate::buffer::CpuBuffer;
use crate::error::{NeuraGradError, Result};

/// Applies a binary element-wise operation with broadcasting.
///
/// Handles DType dispatch (F32, F64) and output allocation. `op_f32` and `op_f64`
/// define the operation for each element type.
fn binary<F32Op, F64Op>(
    a: &NdArray,
    b: &NdArray,
    op_name: &str,
    op_f32: F32Op,
    op_f64: F64Op,
) -> Result<NdArray>
where
    F32Op: Fn(f32, f32) -> f32,
    F64Op: Fn(f64, f64) -> f64,
{
    let output_shape = broadcast_shapes(a.shape(), b.shape())?;
    let buffer = match (a.buffer().cpu(), b.buffer().cpu()) {
        (CpuBuffer::F32(lhs), CpuBuffer::F32(rhs)) => CpuBuffer::F32(zip_broadcast(
            lhs,
            a.shape(),
            rhs,
            b.shape(),
            &output_shape,
            op_f32,
        )),
        (CpuBuffer::F64(lhs), CpuBuffer::F64(rhs)) => CpuBuffer::F64(zip_broadcast(
            lhs,
            a.shape(),
            rhs,
            b.shape(),
            &output_shape,
            op_f64,
        )),
        _ => {
            return Err(NeuraGradError::DTypeMismatch {
                expected: a.dtype(),
                actual: b.dtype(),
                operation: op_name.to_string(),
            })
        }
    };
    Ok(NdArray::from_cpu_buffer(buffer, output_shape))
}

fn zip_broadcast<T: Copy>(
    a: &[T],
    a_shape: &[usize],
    b: &[T],
    b_shape: &[usize],
    output_shape: &[usize],
    op: impl Fn(T, T) -> T,
) -> Vec<T> {
    if a_shape == b_shape {
        return a.iter().zip(b).map(|(&x, &y)| op(x, y)).collect();
    }
    let numel: usize = output_shape.iter().product();
    let output_strides = calculate_strides(output_shape);
    let a_strides = calculate_strides(a_shape);
    let b_strides = calculate_strides(b_shape);
    (0..numel)
        .map(|i| {
            let coord = index_to_coord(i, &output_strides, output_shape);
            let x = a[broadcast_source_index(&coord, a_shape, &a_strides)];
            let y = b[broadcast_source_index(&coord, b_shape, &b_strides)];
            op(x, y)
        })
        .collect()
}

/// Applies a unary element-wise operation, keeping shape and dtype.
fn unary<F32Op, F64Op>(a: &NdArray, op_f32: F32Op, op_f64: F64Op) -> NdArray
where
    F32Op: Fn(f32) -> f32,
    F64Op: Fn(f64) -> f64,
{
    let buffer = match a.buffer().cpu() {
        CpuBuffer::F32(data) => CpuBuffer::F32(data.iter().map(|&v| op_f32(v)).collect()),
        CpuBuffer::F64(data) => CpuBuffer::F64(data.iter().map(|&v| op_f64(v)).collect()),
    };
    NdArray::from_cpu_buffer(buffer, a.shape().to_vec())
}

pub fn add(a: &NdArray, b: &NdArray) -> Result<NdArray> {
    binary(a, b, "add", |x, y| x + y, |x, y| x + y)
}

pub fn sub(a: &NdArray, b: &NdArray) -> Result<NdArray> {
    binary(a, b, "sub", |x, y| x - y, |x, y| x - y)
}

pub fn mul(a: &NdArray, b: &NdArray) -> Result<NdArray> {
    binary(a, b, "mul", |x, y| x * y, |x, y| x * y)
}

/// Element-wise division. Division by zero follows IEEE semantics (inf/NaN).
pub fn div(a: &NdArray, b: &NdArray) -> Result<NdArray> {
    binary(a, b, "div", |x, y| x / y, |x, y| x / y)
}

pub fn neg(a: &NdArray) -> NdArray {
    unary(a, |x| -x, |x| -x)
}

pub fn exp(a: &NdArray) -> NdArray {
    unary(a, f32::exp, f64::exp)
}

/// Natural logarithm.
pub fn ln(a: &NdArray) -> NdArray {
    unary(a, f32::ln, f64::ln)
}

pub fn add_scalar(a: &NdArray, scalar: f64) -> NdArray {
    let scalar_f32 = scalar as f32;
    unary(a, move |x| x + scalar_f32, move |x| x + scalar)
}

pub fn mul_scalar(a: &NdArray, scalar: f64) -> NdArray {
    let scalar_f32 = scalar as f32;
    unary(a, move |x| x * scalar_f32, move |x| x * scalar)
}

pub fn pow_scalar(a: &NdArray, exponent: f64) -> NdArray {
    let exponent_f32 = exponent as f32;
    unary(a, move |x| x.powf(exponent_f32), move |x| x.powf(exponent))
}

/// Sums every element into a zero-dimensional array.
pub fn sum_all(a: &NdArray) -> NdArray {
    let buffer = match a.buffer().cpu() {
        CpuBuffer::F32(data) => CpuBuffer::F32(vec![data.iter().copied().sum()]),
        CpuBuffer::F64(data) => CpuBuffer::F64(vec![data.iter().copied().sum()]),
    };
    NdArray::from_cpu_buffer(buffer, vec![])
}

/// Repeats `a` along broadcast dimensions to produce an array of `shape`.
///
/// # Errors
/// Returns `BroadcastError` if `a` cannot be broadcast to exactly `shape`.
pub fn broadcast_to(a: &NdArray, shape: &[usize]) -> Result<NdArray> {
    let broadcast = broadcast_shapes(a.shape(), shape)?;
    if broadcast != shape {
        return Err(NeuraGradError::BroadcastError {
            shape1: a.shape().to_vec(),
            shape2: shape.to_vec(),
        });
    }
    let buffer = match a.buffer().cpu() {
        CpuBuffer::F32(data) => CpuBuffer::F32(expand(data, a.shape(), shape)),
        CpuBuffer::F64(data) => CpuBuffer::F64(expand(data, a.shape(), shape)),
    };
    Ok(NdArray::from_cpu_buffer(buffer, shape.to_vec()))
}

fn expand<T: Copy>(data: &[T], source_shape: &[usize], target_shape: &[usize]) -> Vec<T> {
    let numel: usize = target_shape.iter().product();
    let target_strides = calculate_strides(target_shape);
    let source_strides = calculate_strides(source_shape);
    (0..numel)
        .map(|i| {
            let coord = index_to_coord(i, &target_strides, target_shape);
            data[broadcast_source_index(&coord, source_shape, &source_strides)]
        })
        .collect()
}

/// Sums `a` over its broadcast dimensions so that the result has `shape`.
/// This is the adjoint of [`broadcast_to`].
///
/// # Errors
/// Returns `BroadcastError` if `shape` does not broadcast to `a`'s shape.
pub fn sum_to_shape(a: &NdArray, shape: &[usize]) -> Result<NdArray> {
    let broadcast = broadcast_shapes(shape, a.shape())?;
    if broadcast != a.shape() {
        return Err(NeuraGradError::BroadcastError {
            shape1: a.shape().to_vec(),
            shape2: shape.to_vec(),
        });
    }
    let buffer = match a.buffer().cpu() {
        CpuBuffer::F32(data) => CpuBuffer::F32(reduce_into(data, a.shape(), shape)),
        CpuBuffer::F64(data) => CpuBuffer::F64(reduce_into(data, a.shape(), shape)),
    };
    Ok(NdArray::from_cpu_buffer(buffer, shape.to_vec()))
}

fn reduce_into<T: Element + AddAssign>(
    data: &[T],
    source_shape: &[usize],
    target_shape: &[usize],
) -> Vec<T> {
    let mut output = vec![T::zero(); target_shape.iter().product()];
    let source_strides = calculate_strides(source_shape);
    let target_strides = calculate_strides(target_shape);
    for (i, &value) in data.iter().enumerate() {
        let coord = index_to_coord(i, &source_strides, source_shape);
        output[broadcast_source_index(&coord, target_shape, &target_strides)] += value;
    }
    output
}
