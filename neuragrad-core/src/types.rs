/// Defines the possible data types for array elements.
///
/// The engine handles arrays of different floating-point types dynamically;
/// binary kernels require both operands to share one `DType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating-point type.
    F32,
    /// 64-bit floating-point type.
    F64,
}
