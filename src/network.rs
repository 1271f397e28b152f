//! A [Feedforward neural network]
//! (https://en.wikipedia.org/wiki/Feedforward_neural_network) built from
//! scalar units, trained one sample at a time.
//!
//! # Example
//!
//! Let's nudge a small network toward a fixed target for a fixed input:
//!
//! ```
//! use rand::{SeedableRng, StdRng};
//! use unitnet::network::Network;
//!
//! let seed: &[_] = &[42];
//! let mut rng: StdRng = SeedableRng::from_seed(seed);
//!
//! // Two inputs, three hidden units, one output.
//! let mut network = Network::new(&[2, 3, 1], &mut rng);
//!
//! for _ in 0..500 {
//!     network.train(&[0.5, 0.9], &[0.8], 0.5);
//! }
//!
//! assert!(network.query(&[0.5, 0.9]));
//! assert!((network.output()[0] - 0.8).abs() < 0.1);
//! ```

use crate::unit::Unit;
use crate::utils::{Back, Front};

use itertools::multizip;
use rand::Rng;

/// A feedforward network: an ordered sequence of layers, each an ordered
/// sequence of [`Unit`]s.
///
/// Layer 0 is the pass-through input layer, with one single-input unit per
/// network input. Every unit of a deeper layer takes the full output vector
/// of the previous layer as its input.
#[derive(Debug)]
pub struct Network {
    layers: Vec<Vec<Unit>>,
}

impl Network {
    /// Creates a new network and randomizes all of its weights.
    ///
    /// Arguments:
    ///  * `layer_sizes` - the number of units in each layer, from the input
    ///                    layer on the left to the output layer on the right.
    ///  * `rng` - the generator used to randomize the initial weights.
    pub fn new<R: Rng>(layer_sizes: &[usize], rng: &mut R) -> Self {
        let mut layers: Vec<Vec<Unit>> = Vec::with_capacity(layer_sizes.len());
        for (i, &size) in layer_sizes.iter().enumerate() {
            let num_inputs = if i == 0 { 1 } else { layers[i - 1].len() };
            let mut layer = Vec::with_capacity(size);
            for _ in 0..size {
                layer.push(Unit::new(i, num_inputs));
            }
            layers.push(layer);
        }

        let mut network = Network { layers };
        network.randomize_weights(rng);
        network
    }

    /// Returns the number of layers of this network.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Returns the size of the input layer.
    ///
    /// Panics if the network has no layers.
    pub fn input_len(&self) -> usize {
        self.layers.front().len()
    }

    /// Returns the size of the output layer.
    ///
    /// Panics if the network has no layers.
    pub fn output_len(&self) -> usize {
        self.layers.back().len()
    }

    /// Returns the unit at the given layer and position, if there is one.
    pub fn unit(&self, layer: usize, index: usize) -> Option<&Unit> {
        self.layers.get(layer).and_then(|units| units.get(index))
    }

    /// Mutable form of [`unit`](Network::unit), for inspection and
    /// deterministic weight injection.
    pub fn unit_mut(&mut self, layer: usize, index: usize) -> Option<&mut Unit> {
        self.layers
            .get_mut(layer)
            .and_then(|units| units.get_mut(index))
    }

    /// Re-randomizes the weights of every unit in place.
    pub fn randomize_weights<R: Rng>(&mut self, rng: &mut R) {
        for layer in &mut self.layers {
            for unit in layer {
                unit.randomize_weights(rng);
            }
        }
    }

    /// Feeds an input vector through the network.
    ///
    /// After a successful query, [`output`](Network::output) yields the
    /// resulting output-layer vector.
    ///
    /// Fails if the network has no layers, if the input layer is empty, or if
    /// the input length does not match the input layer. Past the input layer,
    /// per-unit results are not checked.
    pub fn query(&mut self, input: &[f64]) -> bool {
        if self.layers.is_empty() {
            return false;
        }
        if self.layers[0].len() != input.len() || self.layers[0].is_empty() {
            return false;
        }

        // Each input-layer unit takes one scalar of the input vector.
        for (unit, &v) in self.layers[0].iter_mut().zip(input) {
            if !unit.query_value(v) {
                return false;
            }
        }

        for i in 1..self.layers.len() {
            let carried = self.layer_output(i - 1);
            for unit in &mut self.layers[i] {
                unit.query(&carried);
            }
        }

        true
    }

    /// Returns the output vector of the last layer.
    pub fn output(&self) -> Vec<f64> {
        self.layer_output(self.layers.len().saturating_sub(1))
    }

    /// Returns the output vector of a specific layer, or an empty vector for
    /// an out-of-range index.
    pub fn layer_output(&self, layer: usize) -> Vec<f64> {
        match self.layers.get(layer) {
            Some(units) => units.iter().map(Unit::output).collect(),
            None => Vec::new(),
        }
    }

    /// Trains the network on a single labelled sample.
    ///
    /// Queries the network with `input`, seeds the output layer with the
    /// error `expected - actual`, backpropagates it down to the first hidden
    /// layer, and then adjusts the weights of every layer but the input layer
    /// using the learning rate `alpha`.
    ///
    /// Does nothing if the length of `expected` does not match the output
    /// layer.
    pub fn train(&mut self, input: &[f64], expected: &[f64], alpha: f64) {
        self.query(input);
        let result = self.output();
        if result.len() != expected.len() {
            return;
        }

        // The output layer's error is the plain difference between the
        // expected and the actual response.
        if !expected.is_empty() {
            let last = self.layers.mut_back();
            for (unit, &want, &got) in
                multizip((last.iter_mut(), expected.iter(), result.iter()))
            {
                unit.set_error(want - got);
            }
        }

        // Walk the error back towards the first hidden layer. The input
        // layer has no trainable weights and never receives an error.
        for layer in (2..self.num_layers()).rev() {
            self.back_propagate_error(layer);
        }

        for layer in (1..self.num_layers()).rev() {
            for unit in &mut self.layers[layer] {
                unit.adjust_weights(alpha);
            }
        }
    }

    /// Propagates the error vector of `layer` to the layer before it.
    ///
    /// Each unit `i` of the previous layer receives the sum over the units of
    /// `layer` of `error * weight(i)`, i.e. the raw downstream errors scaled
    /// by the weights attached to unit `i`'s output. The activation
    /// derivative is applied later, per unit, during the weight update.
    fn back_propagate_error(&mut self, layer: usize) {
        if layer >= self.num_layers() || layer < 2 {
            return;
        }
        let prev = layer - 1;

        for i in 0..self.layers[prev].len() {
            let error: f64 = self.layers[layer]
                .iter()
                .map(|unit| unit.error() * unit.weight(i))
                .sum();
            self.layers[prev][i].set_error(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, StdRng};

    fn rng() -> StdRng {
        let seed: &[_] = &[99];
        SeedableRng::from_seed(seed)
    }

    fn squared_error(actual: &[f64], expected: &[f64]) -> f64 {
        actual
            .iter()
            .zip(expected)
            .map(|(a, e)| (a - e) * (a - e))
            .sum()
    }

    #[test]
    fn construction_builds_requested_topology() {
        let network = Network::new(&[3, 4, 2], &mut rng());
        assert_eq!(network.num_layers(), 3);
        assert_eq!(network.input_len(), 3);
        assert_eq!(network.output_len(), 2);

        for i in 0..3 {
            let unit = network.unit(0, i).unwrap();
            assert_eq!(unit.num_inputs(), 1);
            assert_eq!(unit.weight(0), 1.0);
        }
        for i in 0..4 {
            assert_eq!(network.unit(1, i).unwrap().num_inputs(), 3);
        }
        for i in 0..2 {
            assert_eq!(network.unit(2, i).unwrap().num_inputs(), 4);
        }
        assert!(network.unit(2, 2).is_none());
        assert!(network.unit(3, 0).is_none());
    }

    #[test]
    fn query_fails_on_degenerate_networks() {
        let mut empty = Network::new(&[], &mut rng());
        assert!(!empty.query(&[]));
        assert!(empty.output().is_empty());

        let mut headless = Network::new(&[0, 2], &mut rng());
        assert!(!headless.query(&[]));
    }

    #[test]
    fn query_rejects_wrong_input_length_without_side_effects() {
        let mut network = Network::new(&[2, 2, 1], &mut rng());
        assert!(network.query(&[0.25, 0.75]));
        let before: Vec<Vec<f64>> =
            (0..3).map(|i| network.layer_output(i)).collect();

        assert!(!network.query(&[0.25, 0.75, 0.5]));
        assert!(!network.query(&[0.25]));
        for (i, outputs) in before.iter().enumerate() {
            assert_eq!(network.layer_output(i), *outputs);
        }
    }

    #[test]
    fn single_layer_network_is_a_pass_through() {
        let mut network = Network::new(&[3], &mut rng());
        assert!(network.query(&[0.2, -0.4, 0.6]));
        assert_eq!(network.output(), vec![0.2, -0.4, 0.6]);
    }

    #[test]
    fn forced_weight_forward_pass_is_exact() {
        let mut network = Network::new(&[1, 1], &mut rng());
        assert!(network.unit_mut(1, 0).unwrap().set_weight(0, 0.7));

        assert!(network.query(&[0.3]));
        let expected = 1.0 / (1.0 + (-(0.7f64 * 0.3)).exp());
        assert_eq!(network.output(), vec![expected]);
    }

    #[test]
    fn hand_computed_two_two_one_forward_pass() {
        let mut network = Network::new(&[2, 2, 1], &mut rng());
        let weights = [
            (1, 0, vec![0.9, 0.3]),
            (1, 1, vec![0.2, 0.8]),
            (2, 0, vec![0.3, 0.5]),
        ];
        for &(layer, index, ref values) in &weights {
            let unit = network.unit_mut(layer, index).unwrap();
            for (n, &w) in values.iter().enumerate() {
                assert!(unit.set_weight(n, w));
            }
        }

        assert!(network.query(&[1.0, 0.0]));
        // h0 = sigmoid(0.9), h1 = sigmoid(0.2),
        // out = sigmoid(0.3 * h0 + 0.5 * h1)
        assert!((network.output()[0] - 0.6196827426340635).abs() < 1e-9);
    }

    #[test]
    fn layer_output_is_empty_out_of_range() {
        let mut network = Network::new(&[2, 1], &mut rng());
        assert!(network.query(&[0.1, 0.2]));
        assert_eq!(network.layer_output(0).len(), 2);
        assert_eq!(network.layer_output(1).len(), 1);
        assert!(network.layer_output(2).is_empty());
        assert!(network.layer_output(usize::MAX).is_empty());
    }

    #[test]
    fn train_is_a_no_op_on_output_length_mismatch() {
        let mut network = Network::new(&[1, 2], &mut rng());
        let before: Vec<f64> = (0..2)
            .map(|i| network.unit(1, i).unwrap().weight(0))
            .collect();

        network.train(&[0.5], &[0.9], 0.5);

        for i in 0..2 {
            let unit = network.unit(1, i).unwrap();
            assert_eq!(unit.weight(0), before[i]);
            assert_eq!(unit.error(), 0.0);
        }
    }

    #[test]
    fn back_propagation_sums_downstream_errors() {
        let mut network = Network::new(&[1, 2, 1], &mut rng());
        let out = network.unit_mut(2, 0).unwrap();
        assert!(out.set_weight(0, 0.4));
        assert!(out.set_weight(1, -0.6));
        out.set_error(0.5);

        network.back_propagate_error(2);
        assert!((network.unit(1, 0).unwrap().error() - 0.5 * 0.4).abs() < 1e-15);
        assert!((network.unit(1, 1).unwrap().error() - 0.5 * -0.6).abs() < 1e-15);
    }

    #[test]
    fn back_propagation_guards_its_range() {
        let mut network = Network::new(&[1, 2, 1], &mut rng());
        network.unit_mut(2, 0).unwrap().set_error(1.0);

        network.back_propagate_error(0);
        network.back_propagate_error(1);
        network.back_propagate_error(3);
        assert_eq!(network.unit(1, 0).unwrap().error(), 0.0);
        assert_eq!(network.unit(1, 1).unwrap().error(), 0.0);
    }

    #[test]
    fn repeated_training_decreases_squared_error() {
        let mut network = Network::new(&[1, 2, 1], &mut rng());
        let input = [0.5];
        let expected = [0.8];

        let mut previous = {
            network.query(&input);
            squared_error(&network.output(), &expected)
        };
        for _ in 0..30 {
            network.train(&input, &expected, 0.05);
            network.query(&input);
            let current = squared_error(&network.output(), &expected);
            assert!(current < previous);
            previous = current;
        }
    }

    #[test]
    fn rerandomizing_changes_trainable_weights() {
        let mut network = Network::new(&[1, 2], &mut rng());
        let before: Vec<f64> = (0..2)
            .map(|i| network.unit(1, i).unwrap().weight(0))
            .collect();

        let seed: &[_] = &[1234];
        let mut other: StdRng = SeedableRng::from_seed(seed);
        network.randomize_weights(&mut other);

        let after: Vec<f64> = (0..2)
            .map(|i| network.unit(1, i).unwrap().weight(0))
            .collect();
        assert_ne!(before, after);
        assert_eq!(network.unit(0, 0).unwrap().weight(0), 1.0);
    }
}
