use approx::relative_eq;
use log::debug;
use thiserror::Error;

use crate::autograd::Graph;
use crate::backend::NdArray;
use crate::error::NeuraGradError;
use crate::tensor::Tensor;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input tensor at index {input_index}, element index {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(NeuraGradError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(NeuraGradError),
    #[error("Output gradient shape {actual:?} does not match output shape {expected:?}")]
    OutputGradShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("Input tensor {input_index} requires grad but has no gradient after backward pass.")]
    MissingAnalyticalGrad { input_index: usize },
    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Function did not propagate requires_grad correctly.")]
    RequiresGradPropagationError,
    #[error("Tensor error during intermediate calculation: {0}")]
    TensorError(NeuraGradError),
}

impl From<NeuraGradError> for GradCheckError {
    fn from(err: NeuraGradError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// Tunables for [`check_grad`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradCheckConfig {
    /// Perturbation used for the central difference.
    pub epsilon: f64,
    /// Absolute and relative tolerance between analytical and numerical gradients.
    pub tolerance: f64,
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        GradCheckConfig {
            epsilon: 1e-6,
            tolerance: 1e-4,
        }
    }
}

/// Checks analytical gradients against numerical gradients using finite differences.
///
/// Every entry of `inputs` becomes a leaf requiring grad in a fresh [`Graph`]; `func`
/// builds the output from them. The scalar loss is `Σ output ⊙ output_grad`
/// (`output_grad` defaults to ones), so the analytical gradient is obtained by a
/// backward pass seeded with `output_grad`, and each numerical gradient element is
/// `(L(x + ε) - L(x - ε)) / 2ε`.
///
/// Use `F64` inputs: the default epsilon is too small for `F32` round-off.
pub fn check_grad<F>(
    func: F,
    inputs: &[NdArray],
    output_grad: Option<NdArray>,
    config: &GradCheckConfig,
) -> Result<(), GradCheckError>
where
    F: Fn(&mut Graph, &[Tensor]) -> Result<Tensor, NeuraGradError>,
{
    // --- 1. Analytical gradients ---
    let mut graph = Graph::new();
    let leaves: Vec<Tensor> = inputs
        .iter()
        .map(|value| graph.leaf(value.clone(), true))
        .collect();
    let output = func(&mut graph, &leaves).map_err(GradCheckError::ForwardPassError)?;
    if !output.requires_grad(&graph) {
        return Err(GradCheckError::RequiresGradPropagationError);
    }

    let output_value = output.value(&graph).clone();
    let output_grad = output_grad.unwrap_or_else(|| output_value.ones_like());
    if output_grad.shape() != output_value.shape() {
        return Err(GradCheckError::OutputGradShapeMismatch {
            expected: output_value.shape().to_vec(),
            actual: output_grad.shape().to_vec(),
        });
    }
    let weights = output_grad.to_f64_vec();
    let seed = graph.leaf(output_grad, false);
    graph
        .backward(output, Some(seed))
        .map_err(GradCheckError::BackwardPassError)?;

    // --- 2. Numerical gradients, element by element ---
    for (input_index, (input, &leaf)) in inputs.iter().zip(&leaves).enumerate() {
        let analytical = leaf
            .grad(&graph)
            .ok_or(GradCheckError::MissingAnalyticalGrad { input_index })?
            .to_f64_vec(&graph);
        let original = input.to_f64_vec();

        for element_index in 0..original.len() {
            let loss_at = |delta: f64| -> Result<f64, GradCheckError> {
                let mut data = original.clone();
                data[element_index] += delta;
                let perturbed = NdArray::from_f64_vec(data, input.shape().to_vec(), input.dtype())?;
                let mut perturbed_inputs = inputs.to_vec();
                perturbed_inputs[input_index] = perturbed;
                evaluate_loss(&func, &perturbed_inputs, &weights)
            };
            let loss_plus = loss_at(config.epsilon)?;
            let loss_minus = loss_at(-config.epsilon)?;
            let numerical = (loss_plus - loss_minus) / (2.0 * config.epsilon);
            if !numerical.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index,
                    element_index,
                    loss_plus,
                    loss_minus,
                });
            }

            let analytical_grad = analytical[element_index];
            if !relative_eq!(
                analytical_grad,
                numerical,
                epsilon = config.tolerance,
                max_relative = config.tolerance
            ) {
                return Err(GradCheckError::GradientMismatch {
                    input_index,
                    element_index,
                    analytical_grad,
                    numerical_grad: numerical,
                    difference: (analytical_grad - numerical).abs(),
                });
            }
        }
        debug!(
            "Gradient check passed for input {} ({} elements)",
            input_index,
            original.len()
        );
    }
    Ok(())
}

/// Runs `func` in a fresh untracked graph and returns `Σ output ⊙ weights`.
fn evaluate_loss<F>(func: &F, inputs: &[NdArray], weights: &[f64]) -> Result<f64, GradCheckError>
where
    F: Fn(&mut Graph, &[Tensor]) -> Result<Tensor, NeuraGradError>,
{
    let mut graph = Graph::new();
    let leaves: Vec<Tensor> = inputs
        .iter()
        .map(|value| graph.leaf(value.clone(), false))
        .collect();
    let output = func(&mut graph, &leaves).map_err(GradCheckError::ForwardPassError)?;
    Ok(output
        .to_f64_vec(&graph)
        .iter()
        .zip(weights)
        .map(|(o, w)| o * w)
        .sum())
}
