//! Activation function types.

/// [Activation function](https://en.wikipedia.org/wiki/Activation_function)
/// types.
///
/// Input-layer units pass their weighted sum through unchanged; every other
/// unit squashes it with the logistic sigmoid.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Activation {
    /// Identity pass-through, used by the input layer.
    Identity,
    /// Logistic sigmoid function
    Sigmoid,
}

impl Activation {
    /// Evaluates `f(x)` for the selected activation function.
    pub fn f(&self, x: f64) -> f64 {
        match self {
            Activation::Identity => x,
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }

    /// Evaluates the derivative `f'(x)`, where `x = f^{-1}(y)`.
    ///
    /// Note that this function takes in the *output* of the activation
    /// function, rather than the input. This is an optimization that means we
    /// don't have to store the intermediate results before activation.
    pub fn fprime(&self, y: f64) -> f64 {
        match self {
            Activation::Identity => 1.0,
            Activation::Sigmoid => y * (1.0 - y),
        }
    }
}
