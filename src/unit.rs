//! A single computational unit of a network.

use crate::activation::Activation;
use crate::utils;

use rand::Rng;
use rblas::vector::ops::{Axpy, Dot};

/// A single computational node of a feedforward network.
///
/// A unit owns one weight per input and retains the inputs, output, and error
/// left behind by the most recent forward and backward pass, which is exactly
/// the state a later weight adjustment needs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Unit {
    /// The index of the layer this unit belongs to; layer 0 is the input
    /// layer and is a pass-through.
    layer: usize,
    activation: Activation,
    weights: Vec<f64>,
    /// The input vector seen by the most recent query.
    inputs: Vec<f64>,
    output: f64,
    error: f64,
}

impl Unit {
    /// Creates a new unit with zeroed weights and state.
    ///
    /// Arguments:
    ///
    ///  * `layer` - the index of the layer the unit is placed in.
    ///  * `num_inputs` - the number of inputs (and weights) of the unit.
    pub fn new(layer: usize, num_inputs: usize) -> Self {
        Unit {
            layer,
            activation: if layer == 0 {
                Activation::Identity
            } else {
                Activation::Sigmoid
            },
            weights: vec![0.0; num_inputs],
            inputs: vec![0.0; num_inputs],
            output: 0.0,
            error: 0.0,
        }
    }

    /// Resets all input weights.
    ///
    /// Input-layer units keep their single weight fixed at `1.0`. All other
    /// units draw each weight independently and uniformly from
    /// `[-1/sqrt(num_inputs), +1/sqrt(num_inputs)]`, which keeps the initial
    /// weighted sums near zero regardless of fan-in.
    pub fn randomize_weights<R: Rng>(&mut self, rng: &mut R) {
        let bound = 1.0 / (self.weights.len() as f64).sqrt();
        for weight in &mut self.weights {
            *weight = if self.layer == 0 {
                1.0
            } else {
                utils::random_value(rng, -bound, bound)
            };
        }
    }

    /// Feeds an input vector to the unit and computes its output.
    ///
    /// The output is the activation of the weighted input sum and can be read
    /// back with [`output`](Unit::output). The inputs are cached for a later
    /// [`adjust_weights`](Unit::adjust_weights).
    ///
    /// Returns false, leaving all state untouched, if the vector's length
    /// does not match the unit's input count.
    pub fn query(&mut self, input: &[f64]) -> bool {
        if input.len() != self.inputs.len() {
            return false;
        }
        self.inputs.copy_from_slice(input);
        let v = f64::dot(&self.weights[..], &self.inputs[..]);
        self.output = self.activation.f(v);
        true
    }

    /// Convenience form of [`query`](Unit::query) for the single-input case,
    /// i.e. for input-layer units.
    pub fn query_value(&mut self, v: f64) -> bool {
        self.query(&[v])
    }

    /// Stores the unit's error, either injected directly at the output layer
    /// or backpropagated from the layer downstream.
    pub fn set_error(&mut self, e: f64) {
        self.error = e;
    }

    /// Returns the most recently stored error.
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Returns the output of the most recent query.
    pub fn output(&self) -> f64 {
        self.output
    }

    /// Returns the `n`th input weight, or `NAN` for an out-of-range index.
    pub fn weight(&self, n: usize) -> f64 {
        match self.weights.get(n) {
            Some(&w) => w,
            None => f64::NAN,
        }
    }

    /// Overwrites the `n`th input weight, for deterministic initialization.
    ///
    /// Returns false for an out-of-range index.
    pub fn set_weight(&mut self, n: usize, w: f64) -> bool {
        match self.weights.get_mut(n) {
            Some(slot) => {
                *slot = w;
                true
            }
            None => false,
        }
    }

    /// Returns the number of inputs of this unit.
    pub fn num_inputs(&self) -> usize {
        self.weights.len()
    }

    /// Applies one gradient-descent step to the input weights.
    ///
    /// Call after a query and after the error has been set. Each weight moves
    /// by `alpha * error * output * (1 - output) * input`, with the
    /// derivative factor taken from the unit's own activation at its cached
    /// output. Input-layer units are never asked to adjust.
    pub fn adjust_weights(&mut self, alpha: f64) {
        let step = alpha * self.error * self.activation.fprime(self.output);
        f64::axpy(&step, &self.inputs[..], &mut self.weights[..]);
    }
}
