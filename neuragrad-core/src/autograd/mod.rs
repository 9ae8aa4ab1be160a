//! # Automatic differentiation (`autograd`)
//!
//! - [`Graph`]: the arena that owns every tensor of a session and records the
//!   edges between them as operations are applied.
//! - [`Op`]: the capability every differentiable operation implements.
//! - [`backward`]: reverse-mode gradient accumulation over a graph.
//! - [`grad_check`]: numerical verification of analytical gradients.

pub mod backward;
pub mod grad_check;
pub mod graph;
pub mod op;

pub use graph::{Graph, GraphId};
pub use op::{Gradients, Op};
