use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace};

use crate::autograd::Graph;
use crate::error::{NeuraGradError, Result};
use crate::ops::add_op;
use crate::tensor::Tensor;

/// Reverse-mode gradient accumulation from `output`.
///
/// Walks the nodes reachable from `output` in reverse topological order. Each
/// node's adjoint is the left-fold sum of the partial adjoints contributed by its
/// consumers, and is passed to the node's Op to produce the partials for its inputs.
/// Leaves stop the propagation; inputs that do not require grad are skipped.
///
/// On error the grads written so far are left in place and should be cleared
/// with [`Graph::zero_grad`].
pub fn compute_gradients(graph: &mut Graph, output: Tensor, seed: Option<Tensor>) -> Result<()> {
    if !graph.get(output)?.requires_grad {
        return Err(NeuraGradError::RequiresGradNotMet);
    }
    let seed = match seed {
        Some(seed) => {
            check_same_layout(graph, seed, output, "backward seed")?;
            seed
        }
        None => {
            let ones = graph[output].value.ones_like();
            graph.leaf(ones, false)
        }
    };

    let order = graph.topological_sort(&[output])?;
    debug!(
        "Starting backward pass from {} over {} nodes",
        output.id(),
        order.len()
    );

    let mut contributions: HashMap<Tensor, Vec<Tensor>> = HashMap::new();
    contributions.insert(output, vec![seed]);

    for &node in order.iter().rev() {
        let Some(partials) = contributions.remove(&node) else {
            continue;
        };
        trace!(
            "[backward] Node {} receives {} contribution(s)",
            node.id(),
            partials.len()
        );
        let adjoint = sum_node_list(graph, partials)?;
        store_grad(graph, node, adjoint)?;

        let (op, inputs) = {
            let data = graph.get(node)?;
            match &data.op {
                Some(op) => (Arc::clone(op), data.inputs.clone()),
                None => continue,
            }
        };

        let partials = op.gradient_as_tuple(graph, adjoint, node)?;
        if partials.len() != inputs.len() {
            return Err(NeuraGradError::GradientArityMismatch {
                op: op.name().to_string(),
                expected: inputs.len(),
                actual: partials.len(),
            });
        }
        for (input, partial) in inputs.into_iter().zip(partials) {
            if !graph.get(input)?.requires_grad {
                continue;
            }
            contributions.entry(input).or_default().push(partial);
        }
    }

    debug!("Backward pass from {} finished", output.id());
    Ok(())
}

/// Sums a non-empty list of tensors left to right with `add_op`.
pub(crate) fn sum_node_list(graph: &mut Graph, nodes: Vec<Tensor>) -> Result<Tensor> {
    let mut iter = nodes.into_iter();
    let first = iter.next().ok_or_else(|| {
        NeuraGradError::InternalError("sum_node_list called with no tensors".to_string())
    })?;
    iter.try_fold(first, |acc, t| add_op(graph, acc, t))
}

/// Writes `adjoint` into `node.grad`, adding it to any grad already present.
fn store_grad(graph: &mut Graph, node: Tensor, adjoint: Tensor) -> Result<()> {
    check_same_layout(graph, adjoint, node, "store_grad")?;
    let grad = match graph.get(node)?.grad {
        Some(existing) => add_op(graph, existing, adjoint)?,
        None => adjoint,
    };
    graph.get_mut(node)?.grad = Some(grad);
    Ok(())
}

fn check_same_layout(
    graph: &Graph,
    actual: Tensor,
    expected: Tensor,
    operation: &str,
) -> Result<()> {
    let actual = &graph.get(actual)?.value;
    let expected = &graph.get(expected)?.value;
    if actual.shape() != expected.shape() {
        return Err(NeuraGradError::ShapeMismatch {
            expected: expected.shape().to_vec(),
            actual: actual.shape().to_vec(),
            operation: operation.to_string(),
        });
    }
    if actual.dtype() != expected.dtype() {
        return Err(NeuraGradError::DTypeMismatch {
            expected: expected.dtype(),
            actual: actual.dtype(),
            operation: operation.to_string(),
        });
    }
    Ok(())
}
