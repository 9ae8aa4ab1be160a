use std::fmt::Debug;

use crate::autograd::Graph;
use crate::backend::NdArray;
use crate::error::{NeuraGradError, Result};
use crate::tensor::Tensor;

/// Partial adjoints returned by [`Op::gradient`], one per input.
#[derive(Debug, Clone, PartialEq)]
pub enum Gradients {
    Single(Tensor),
    Tuple(Vec<Tensor>),
}

impl Gradients {
    pub fn into_vec(self) -> Vec<Tensor> {
        match self {
            Gradients::Single(t) => vec![t],
            Gradients::Tuple(ts) => ts,
        }
    }
}

impl From<Tensor> for Gradients {
    fn from(t: Tensor) -> Self {
        Gradients::Single(t)
    }
}

impl From<Vec<Tensor>> for Gradients {
    fn from(ts: Vec<Tensor>) -> Self {
        Gradients::Tuple(ts)
    }
}

impl From<(Tensor, Tensor)> for Gradients {
    fn from((a, b): (Tensor, Tensor)) -> Self {
        Gradients::Tuple(vec![a, b])
    }
}

/// Defines the interface of a differentiable operation.
///
/// An `Op` value is created for a single application and carries its own parameters
/// (e.g. a scalar operand). The graph calls [`compute`](Op::compute) once to obtain
/// the node's value, and the backward pass calls [`gradient`](Op::gradient) to
/// propagate the adjoint to the node's inputs.
///
/// Gradients are built as Tensors in the same [`Graph`], so backward rules are
/// themselves differentiable.
///
/// Both `compute` and `gradient` default to returning
/// [`NeuraGradError::UnimplementedOperation`]: an Op that does not supply a rule
/// fails on first use instead of producing a silently wrong value.
pub trait Op: Debug + Send + Sync {
    /// Name used in error messages and logs.
    fn name(&self) -> &str;

    /// Computes the output array from the input arrays, in input order.
    fn compute(&self, inputs: &[&NdArray]) -> Result<NdArray> {
        let _ = inputs;
        Err(NeuraGradError::UnimplementedOperation {
            op: self.name().to_string(),
            capability: "compute",
        })
    }

    /// Computes the partial adjoint for each input of `node`, given the adjoint
    /// `out_grad` of `node` itself.
    ///
    /// The returned tensors must follow the order of `node`'s inputs and each must
    /// match the shape of the corresponding input.
    fn gradient(&self, graph: &mut Graph, out_grad: Tensor, node: Tensor) -> Result<Gradients> {
        let _ = (graph, out_grad, node);
        Err(NeuraGradError::UnimplementedOperation {
            op: self.name().to_string(),
            capability: "gradient",
        })
    }

    /// [`gradient`](Op::gradient), normalized to a vector.
    fn gradient_as_tuple(
        &self,
        graph: &mut Graph,
        out_grad: Tensor,
        node: Tensor,
    ) -> Result<Vec<Tensor>> {
        Ok(self.gradient(graph, out_grad, node)?.into_vec())
    }

    fn num_outputs(&self) -> usize {
        1
    }
}
