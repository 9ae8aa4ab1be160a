// Element-wise arithmetic operations
pub mod add;
pub mod div;
pub mod mul;
pub mod neg;
pub mod pow;
pub mod scalar;
pub mod sub;

pub use add::{add_op, EWiseAdd};
pub use div::{div_op, EWiseDiv};
pub use mul::{mul_op, EWiseMul};
pub use neg::{neg_op, Negate};
pub use pow::{pow_scalar_op, PowerScalar};
pub use scalar::{add_scalar_op, mul_scalar_op, AddScalar, MulScalar};
pub use sub::{sub_op, EWiseSub};
