use std::sync::Arc;

use crate::autograd::Op;
use crate::backend::NdArray;
use crate::tensor::Tensor;

/// How a node entered the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Built from host data, or the short-circuited result of an Op that needs no grad.
    Leaf,
    /// Produced by an Op and connected to its inputs.
    Computed,
    /// A snapshot created by `detach`; never tracked.
    Detached,
}

/// Internal storage and metadata for a Tensor.
///
/// Records live in the [`Graph`](crate::autograd::Graph) arena and are addressed by
/// [`Tensor`] handles. Every handle in `inputs` names a record with a smaller index.
#[derive(Debug, Clone)]
pub struct TensorData {
    /// The computed array value. Cloning it shares the buffer.
    pub(crate) value: NdArray,
    /// The Op that produced this node, `None` for leaves.
    pub(crate) op: Option<Arc<dyn Op>>,
    /// Ordered input handles; empty whenever `op` is `None`.
    pub(crate) inputs: Vec<Tensor>,
    pub(crate) requires_grad: bool,
    /// Adjoint written by the backward pass, same shape and dtype as `value`.
    pub(crate) grad: Option<Tensor>,
    pub(crate) num_outputs: usize,
    pub(crate) kind: NodeKind,
}

impl TensorData {
    pub(crate) fn leaf(value: NdArray, requires_grad: bool) -> Self {
        TensorData {
            value,
            op: None,
            inputs: Vec::new(),
            requires_grad,
            grad: None,
            num_outputs: 1,
            kind: NodeKind::Leaf,
        }
    }

    pub(crate) fn computed(value: NdArray, op: Arc<dyn Op>, inputs: Vec<Tensor>) -> Self {
        let num_outputs = op.num_outputs();
        TensorData {
            value,
            op: Some(op),
            inputs,
            requires_grad: true,
            grad: None,
            num_outputs,
            kind: NodeKind::Computed,
        }
    }

    pub(crate) fn detached(value: NdArray) -> Self {
        TensorData {
            kind: NodeKind::Detached,
            ..Self::leaf(value, false)
        }
    }

    pub fn value(&self) -> &NdArray {
        &self.value
    }

    pub fn op(&self) -> Option<&Arc<dyn Op>> {
        self.op.as_ref()
    }

    pub fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    pub fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    pub fn grad(&self) -> Option<Tensor> {
        self.grad
    }

    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// True for any node without a producing Op.
    pub fn is_leaf(&self) -> bool {
        self.op.is_none()
    }
}
