//! Utilities for training networks against labelled examples.

use crate::network::Network;

use std::error;
use std::fmt;
use std::time::{Duration, Instant};

/// Reasons a training run is rejected before it starts.
#[derive(Clone, Debug, PartialEq)]
pub enum TrainError {
    /// The network needs an input layer and at least one trainable layer.
    TooFewLayers,
    /// There is nothing to train on.
    NoExamples,
    /// An example's input length does not match the input layer.
    BadInputLength { example: usize, expected: usize },
    /// An example's expected output length does not match the output layer.
    BadOutputLength { example: usize, expected: usize },
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::TooFewLayers => {
                write!(f, "the network has fewer than two layers")
            }
            TrainError::NoExamples => write!(f, "no training examples"),
            TrainError::BadInputLength { example, expected } => write!(
                f,
                "example {} input length does not match the input layer ({})",
                example, expected
            ),
            TrainError::BadOutputLength { example, expected } => write!(
                f,
                "example {} output length does not match the output layer ({})",
                example, expected
            ),
        }
    }
}

impl error::Error for TrainError {}

/// Logging frequency to use during training
#[derive(Copy, Clone, Debug)]
pub enum Logging {
    /// No logs will be printed
    Silent,
    /// A summary will be printed at completion
    Completion,
    /// A summary will be printed after every `n` training passes
    Iterations(usize),
    /// A progress line will be printed after every `n` samples of a pass
    Samples(usize),
}

impl Logging {
    /// Performs logging for the `n`th sample within the current pass.
    fn sample(&self, n: usize) {
        if let &Logging::Samples(freq) = self {
            if freq > 0 && n % freq == 0 {
                println!("{}..", n);
            }
        }
    }

    /// Performs logging at the current `iteration` of training.
    fn iteration(&self, iteration: usize, training_error: f64) {
        if let &Logging::Iterations(freq) = self {
            if freq > 0 && iteration % freq == 0 {
                println!("Iteration {}:\tMSE={}", iteration, training_error);
            }
        }
    }

    /// Performs logging at the end of training.
    fn completion(
        &self,
        iterations: usize,
        training_error: f64,
        start_time: Instant,
    ) {
        if let &Logging::Silent = self {
            return;
        }
        println!(
            "Ran {} passes in {} seconds.",
            iterations,
            start_time.elapsed().as_secs()
        );
        println!("Final MSE: {}", training_error);
    }
}

/// When to stop training
#[derive(Copy, Clone, Debug)]
pub enum StopCondition {
    /// Stops after the provided number of full passes over the examples
    Iterations(usize),
    /// Stops when the training error drops below the provided threshold
    ErrorThreshold(f64),
    /// Stops after the provided duration
    Duration(Duration),
}

impl From<Duration> for StopCondition {
    fn from(duration: Duration) -> StopCondition {
        StopCondition::Duration(duration)
    }
}

impl StopCondition {
    /// Returns true if training is complete.
    fn should_stop(
        &self,
        iteration: usize,
        training_error: f64,
        start_time: Instant,
    ) -> bool {
        match self {
            &StopCondition::Iterations(iterations) => iteration >= iterations,
            &StopCondition::ErrorThreshold(threshold) => {
                training_error < threshold
            }
            &StopCondition::Duration(duration) => {
                start_time.elapsed() > duration
            }
        }
    }
}

/// Drives sample-by-sample training of a [`Network`].
///
/// Each pass feeds every example through [`Network::train`] in order,
/// adjusting the weights after every single sample.
#[derive(Debug)]
pub struct Trainer {
    network: Network,
    learning_rate: f64,
    logging: Logging,
    stop_condition: StopCondition,
}

impl Trainer {
    /// Creates a new Trainer instance around a constructed network.
    ///
    /// The trainer is initialized with some default values. These defaults
    /// are:
    ///
    /// * A learning rate of 0.1.
    /// * Stops after 1000 training passes.
    /// * Logs on training completion.
    pub fn new(network: Network) -> Self {
        Trainer {
            network,
            learning_rate: 0.1,
            logging: Logging::Completion,
            stop_condition: StopCondition::Iterations(1000),
        }
    }

    /// Sets the learning rate to use during gradient descent.
    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Sets the type of logging to be emitted during training.
    pub fn logging(mut self, logging: Logging) -> Self {
        self.logging = logging;
        self
    }

    /// Sets the condition to finish training.
    pub fn stop_condition<C>(mut self, condition: C) -> Self
    where
        C: Into<StopCondition>,
    {
        self.stop_condition = condition.into();
        self
    }

    /// Trains the network using the provided labelled data.
    ///
    /// The provided `examples` should be a list of labelled data, where each
    /// element takes the form `(network input, expected output)`.
    ///
    /// Returns:
    ///   The trained network, or an error if the examples do not fit the
    ///   network.
    pub fn train<I, O>(
        mut self,
        examples: &[(I, O)],
    ) -> Result<Network, TrainError>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        self.validate(examples)?;

        let start_time = Instant::now();
        let mut iteration = 0;
        let mut training_error;
        loop {
            training_error = 0.0;
            for (n, &(ref input, ref expected)) in examples.iter().enumerate()
            {
                self.network.train(
                    input.as_ref(),
                    expected.as_ref(),
                    self.learning_rate,
                );
                training_error += mean_square_error(
                    &self.network.output(),
                    expected.as_ref(),
                );
                self.logging.sample(n);
            }
            training_error /= 2.0 * examples.len() as f64;
            iteration += 1;

            self.logging.iteration(iteration, training_error);
            if self.stop_condition.should_stop(
                iteration,
                training_error,
                start_time,
            ) {
                break;
            }
        }
        self.logging
            .completion(iteration, training_error, start_time);
        Ok(self.network)
    }

    /// Verifies that the provided examples fit the network.
    fn validate<I, O>(&self, examples: &[(I, O)]) -> Result<(), TrainError>
    where
        I: AsRef<[f64]>,
        O: AsRef<[f64]>,
    {
        if self.network.num_layers() < 2 {
            return Err(TrainError::TooFewLayers);
        }
        if examples.is_empty() {
            return Err(TrainError::NoExamples);
        }
        let input_len = self.network.input_len();
        let output_len = self.network.output_len();
        for (n, &(ref input, ref expected)) in examples.iter().enumerate() {
            if input.as_ref().len() != input_len {
                return Err(TrainError::BadInputLength {
                    example: n,
                    expected: input_len,
                });
            }
            if expected.as_ref().len() != output_len {
                return Err(TrainError::BadOutputLength {
                    example: n,
                    expected: output_len,
                });
            }
        }
        Ok(())
    }
}

/// Computes the mean squared error between `actual` and `expected`.
pub fn mean_square_error(actual: &[f64], expected: &[f64]) -> f64 {
    assert_eq!(actual.len(), expected.len());
    let mut error = 0.0;
    for (&a, e) in actual.iter().zip(expected) {
        error += (a - e) * (a - e);
    }
    error / (actual.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, StdRng};

    fn network(layer_sizes: &[usize]) -> Network {
        let seed: &[_] = &[3];
        let mut rng: StdRng = SeedableRng::from_seed(seed);
        Network::new(layer_sizes, &mut rng)
    }

    #[test]
    fn too_few_layers() {
        let examples = [(vec![0.0], vec![0.0])];
        let result = Trainer::new(network(&[1])).train(&examples[..]);
        assert_eq!(result.unwrap_err(), TrainError::TooFewLayers);
    }

    #[test]
    fn no_examples() {
        let examples: Vec<(Vec<f64>, Vec<f64>)> = Vec::new();
        let result = Trainer::new(network(&[1, 1])).train(&examples[..]);
        assert_eq!(result.unwrap_err(), TrainError::NoExamples);
    }

    #[test]
    fn wrong_input_size() {
        let examples = [(vec![0.0, 0.0], vec![0.0])];
        let result = Trainer::new(network(&[1, 1])).train(&examples[..]);
        assert_eq!(
            result.unwrap_err(),
            TrainError::BadInputLength { example: 0, expected: 1 }
        );
    }

    #[test]
    fn wrong_output_size() {
        let examples = [(vec![0.0], vec![0.0, 0.0])];
        let result = Trainer::new(network(&[1, 1])).train(&examples[..]);
        assert_eq!(
            result.unwrap_err(),
            TrainError::BadOutputLength { example: 0, expected: 1 }
        );
    }

    #[test]
    fn trains_toward_a_fixed_target() {
        let examples = [(vec![0.5], vec![0.8])];
        let trained = Trainer::new(network(&[1, 2, 1]))
            .learning_rate(0.5)
            .logging(Logging::Silent)
            .stop_condition(StopCondition::Iterations(500))
            .train(&examples[..]);

        let mut trained = trained.unwrap();
        assert!(trained.query(&[0.5]));
        assert!((trained.output()[0] - 0.8).abs() < 0.1);
    }

    #[test]
    fn error_threshold_stops_training() {
        let examples = [(vec![0.5], vec![0.8])];
        let trained = Trainer::new(network(&[1, 2, 1]))
            .learning_rate(0.5)
            .logging(Logging::Silent)
            .stop_condition(StopCondition::ErrorThreshold(0.01))
            .train(&examples[..])
            .unwrap();

        let mut trained = trained;
        trained.query(&[0.5]);
        let mse = mean_square_error(&trained.output(), &[0.8]);
        assert!(mse / 2.0 < 0.01);
    }

    #[test]
    fn mean_square_error_averages() {
        assert_eq!(mean_square_error(&[1.0, 3.0], &[0.0, 1.0]), 2.5);
        assert_eq!(mean_square_error(&[0.5], &[0.5]), 0.0);
    }
}
