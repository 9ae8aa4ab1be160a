//! # Tensor handles
//!
//! A [`Tensor`] is a lightweight, `Copy` handle naming one record in a
//! [`Graph`]. All data lives in the graph; handle methods take the graph they
//! belong to as an argument.
//!
//! Read accessors panic when the handle does not belong to the graph passed in,
//! or was issued before the graph was cleared, just like out-of-bounds slice
//! indexing. Use [`Graph::get`] for the fallible form.

use std::fmt;

use crate::autograd::{Graph, GraphId};
use crate::backend::NdArray;
use crate::error::Result;
use crate::tensor_data::NodeKind;
use crate::types::DType;

/// Index of a record in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a node of a [`Graph`].
///
/// Two handles are equal iff they name the same node of the same graph
/// generation; array values are never compared for identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tensor {
    graph: GraphId,
    id: NodeId,
}

impl Tensor {
    pub(crate) fn new(graph: GraphId, index: usize) -> Self {
        Tensor {
            graph,
            id: NodeId(index),
        }
    }

    pub fn id(self) -> NodeId {
        self.id
    }

    /// The graph generation that issued this handle.
    pub fn graph_id(self) -> GraphId {
        self.graph
    }

    pub(crate) fn index(self) -> usize {
        self.id.0
    }

    // --- Accessors ---

    pub fn value(self, graph: &Graph) -> &NdArray {
        &graph[self].value
    }

    pub fn shape(self, graph: &Graph) -> Vec<usize> {
        graph[self].value.shape().to_vec()
    }

    pub fn dtype(self, graph: &Graph) -> DType {
        graph[self].value.dtype()
    }

    pub fn numel(self, graph: &Graph) -> usize {
        graph[self].value.numel()
    }

    pub fn requires_grad(self, graph: &Graph) -> bool {
        graph[self].requires_grad
    }

    pub fn is_leaf(self, graph: &Graph) -> bool {
        graph[self].is_leaf()
    }

    pub fn kind(self, graph: &Graph) -> NodeKind {
        graph[self].kind
    }

    /// The adjoint written by the last backward pass, if any.
    pub fn grad(self, graph: &Graph) -> Option<Tensor> {
        graph[self].grad
    }

    pub fn inputs(self, graph: &Graph) -> &[Tensor] {
        &graph[self].inputs
    }

    /// Name of the producing Op, `None` for leaves.
    pub fn op_name(self, graph: &Graph) -> Option<&str> {
        graph[self].op.as_deref().map(|op| op.name())
    }

    /// Copies the value out as `f64`s.
    pub fn to_f64_vec(self, graph: &Graph) -> Vec<f64> {
        graph[self].value.to_f64_vec()
    }

    /// The value of a one-element tensor.
    pub fn item(self, graph: &Graph) -> Result<f64> {
        graph.get(self)?.value.item()
    }

    // --- Graph operations ---

    /// See [`Graph::detach`].
    pub fn detach(self, graph: &mut Graph) -> Result<Tensor> {
        graph.detach(self)
    }

    /// See [`Graph::backward`].
    pub fn backward(self, graph: &mut Graph, seed: Option<Tensor>) -> Result<()> {
        graph.backward(self, seed)
    }

    /// See [`Graph::set_data`].
    pub fn set_data(self, graph: &mut Graph, value: NdArray) -> Result<()> {
        graph.set_data(self, value)
    }

    /// Clears this tensor's grad.
    pub fn zero_grad(self, graph: &mut Graph) -> Result<()> {
        graph.get_mut(self)?.grad = None;
        Ok(())
    }
}
