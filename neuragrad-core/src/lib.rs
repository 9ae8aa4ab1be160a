//! # NeuraGrad
//!
//! A small reverse-mode automatic-differentiation engine over a dynamic, eagerly
//! evaluated computation graph.
//!
//! A [`Graph`] owns every tensor of a session. Leaves are created from host data,
//! operations from [`ops`] compute their value immediately and record edges to
//! their inputs, and [`Graph::backward`] writes the gradient of a result into every
//! upstream tensor that requires grad.
//!
//! ```
//! use neuragrad_core::{ops, Graph};
//!
//! let mut graph = Graph::new();
//! let x = graph.scalar(3.0f64, true);
//! let y = ops::mul_op(&mut graph, x, x)?;
//! y.backward(&mut graph, None)?;
//! let grad = x.grad(&graph).expect("x requires grad");
//! assert_eq!(grad.item(&graph)?, 6.0);
//! # Ok::<(), neuragrad_core::NeuraGradError>(())
//! ```

pub mod autograd;
pub mod backend;
pub mod buffer;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod tensor_data;
pub mod types;
pub mod utils;

pub use autograd::{Gradients, Graph, Op};
pub use backend::{Element, NdArray};
pub use error::{NeuraGradError, Result};
pub use tensor::{NodeId, Tensor};
pub use tensor_data::{NodeKind, TensorData};
pub use types::DType;

// Re-export traits required by public functions/structs
pub use num_traits;
