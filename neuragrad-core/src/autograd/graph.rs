use std::collections::HashSet;
use std::ops::Index;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, trace};

use crate::autograd::{backward, Op};
use crate::backend::{Element, NdArray};
use crate::error::{NeuraGradError, Result};
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;

static NEXT_GRAPH_ID: AtomicUsize = AtomicUsize::new(0);

/// Identifies one graph generation. A fresh id is taken on construction and on
/// every [`Graph::clear`], so handles never outlive the records they name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(usize);

impl GraphId {
    fn next() -> Self {
        GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Arena owning every tensor record of one forward/backward session.
///
/// Nodes are appended and never removed individually, so an input always has a
/// smaller index than any node that consumes it and the input relation cannot
/// form a cycle. All storage is released when the graph is dropped or cleared.
#[derive(Debug)]
pub struct Graph {
    id: GraphId,
    nodes: Vec<TensorData>,
}

impl Default for Graph {
    fn default() -> Self {
        Graph {
            id: GraphId::next(),
            nodes: Vec::new(),
        }
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Number of live tensors in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every record. Handles issued before the call become invalid.
    pub fn clear(&mut self) {
        debug!("Clearing graph with {} tensors", self.nodes.len());
        self.nodes.clear();
        self.id = GraphId::next();
    }

    fn push(&mut self, data: TensorData) -> Tensor {
        let handle = Tensor::new(self.id, self.nodes.len());
        self.nodes.push(data);
        handle
    }

    fn check_handle(&self, t: Tensor) -> Result<usize> {
        if t.graph_id() != self.id {
            return Err(NeuraGradError::ForeignTensor { index: t.index() });
        }
        if t.index() >= self.nodes.len() {
            return Err(NeuraGradError::InvalidTensor {
                index: t.index(),
                len: self.nodes.len(),
            });
        }
        Ok(t.index())
    }

    /// Looks up a record.
    ///
    /// # Errors
    /// Returns `ForeignTensor` if the handle was issued by another graph or before
    /// the last [`clear`](Graph::clear), and `InvalidTensor` if it is out of range.
    pub fn get(&self, t: Tensor) -> Result<&TensorData> {
        let index = self.check_handle(t)?;
        Ok(&self.nodes[index])
    }

    pub(crate) fn get_mut(&mut self, t: Tensor) -> Result<&mut TensorData> {
        let index = self.check_handle(t)?;
        Ok(&mut self.nodes[index])
    }

    // --- Construction ---

    /// Creates a leaf from an existing array.
    pub fn leaf(&mut self, value: NdArray, requires_grad: bool) -> Tensor {
        self.push(TensorData::leaf(value, requires_grad))
    }

    /// Creates a leaf by copying host data.
    ///
    /// # Errors
    /// Returns `TensorCreationError` if `data.len()` does not match `shape`.
    pub fn tensor<T: Element>(
        &mut self,
        data: Vec<T>,
        shape: Vec<usize>,
        requires_grad: bool,
    ) -> Result<Tensor> {
        let value = NdArray::from_vec(data, shape)?;
        Ok(self.leaf(value, requires_grad))
    }

    /// Creates a zero-dimensional leaf.
    pub fn scalar<T: Element>(&mut self, value: T, requires_grad: bool) -> Tensor {
        self.leaf(NdArray::scalar(value), requires_grad)
    }

    /// Applies `op` to `inputs`. The result requires grad iff any input does.
    pub fn apply<O: Op + 'static>(&mut self, op: O, inputs: &[Tensor]) -> Result<Tensor> {
        let requires_grad = inputs
            .iter()
            .map(|&t| self.get(t).map(|d| d.requires_grad))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .any(|rg| rg);
        self.apply_with_requires_grad(op, inputs, requires_grad)
    }

    /// Applies `op` to `inputs` with an explicit `requires_grad` flag.
    ///
    /// The value is computed immediately. When the result does not require grad it
    /// is stored as a plain leaf with no input edges.
    pub fn apply_with_requires_grad<O: Op + 'static>(
        &mut self,
        op: O,
        inputs: &[Tensor],
        requires_grad: bool,
    ) -> Result<Tensor> {
        let value = {
            let values = inputs
                .iter()
                .map(|&t| self.get(t).map(|d| &d.value))
                .collect::<Result<Vec<_>>>()?;
            op.compute(&values)?
        };
        if !requires_grad {
            debug!(
                "'{}' does not require grad, storing result as a leaf",
                op.name()
            );
            return Ok(self.push(TensorData::leaf(value, false)));
        }
        let op: Arc<dyn Op> = Arc::new(op);
        Ok(self.push(TensorData::computed(value, op, inputs.to_vec())))
    }

    /// Returns a new untracked tensor sharing `t`'s buffer.
    pub fn detach(&mut self, t: Tensor) -> Result<Tensor> {
        let value = self.get(t)?.value.clone();
        Ok(self.push(TensorData::detached(value)))
    }

    /// Replaces the value of `t`.
    ///
    /// The shape may change only while `t` holds no grad, so a stored grad always
    /// matches its owner.
    ///
    /// # Errors
    /// Returns `DTypeMismatch` if `value` does not have the current dtype, and
    /// `ShapeMismatch` if the shape changes while `t` has a grad.
    pub fn set_data(&mut self, t: Tensor, value: NdArray) -> Result<()> {
        let data = self.get_mut(t)?;
        if data.value.dtype() != value.dtype() {
            return Err(NeuraGradError::DTypeMismatch {
                expected: data.value.dtype(),
                actual: value.dtype(),
                operation: "set_data".to_string(),
            });
        }
        if data.grad.is_some() && data.value.shape() != value.shape() {
            return Err(NeuraGradError::ShapeMismatch {
                expected: data.value.shape().to_vec(),
                actual: value.shape().to_vec(),
                operation: "set_data".to_string(),
            });
        }
        data.value = value;
        Ok(())
    }

    // --- Autograd ---

    /// Clears the grad of every tensor in the graph.
    pub fn zero_grad(&mut self) {
        for data in &mut self.nodes {
            data.grad = None;
        }
    }

    /// Runs the backward pass from `root`, writing `grad` on every reachable tensor
    /// that requires grad.
    ///
    /// Without a `seed`, a tensor of ones shaped like `root` is used. Grads left by
    /// a previous call are added to, not replaced; call [`zero_grad`](Graph::zero_grad)
    /// between passes to start fresh.
    ///
    /// The seed, the accumulation sums and every partial adjoint are appended to
    /// this graph and stay there until [`clear`](Graph::clear). A loop of
    /// `backward` and `zero_grad` on one graph therefore grows it on every
    /// iteration; rebuild or clear the graph between steps.
    ///
    /// # Errors
    /// Returns `RequiresGradNotMet` if `root` does not require grad, and
    /// `ShapeMismatch` or `DTypeMismatch` if `seed` does not match `root`.
    pub fn backward(&mut self, root: Tensor, seed: Option<Tensor>) -> Result<()> {
        backward::compute_gradients(self, root, seed)
    }

    /// Orders every node reachable from `roots` so that each node appears once,
    /// after all of its inputs.
    pub fn topological_sort(&self, roots: &[Tensor]) -> Result<Vec<Tensor>> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<(Tensor, bool)> = roots.iter().rev().map(|&t| (t, false)).collect();

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                trace!("[topological_sort] Emitting node {}", node.id());
                order.push(node);
                continue;
            }
            if !visited.insert(node) {
                continue;
            }
            stack.push((node, true));
            for &input in self.get(node)?.inputs.iter().rev() {
                if !visited.contains(&input) {
                    stack.push((input, false));
                }
            }
        }
        Ok(order)
    }
}

impl Index<Tensor> for Graph {
    type Output = TensorData;

    /// # Panics
    /// Panics if the handle does not belong to this graph.
    fn index(&self, t: Tensor) -> &TensorData {
        match self.get(t) {
            Ok(data) => data,
            Err(err) => panic!("{err}"),
        }
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
