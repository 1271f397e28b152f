use rand::distributions::{IndependentSample, Range};
use rand::Rng;

/// A trait that provides easy access to the first element of a slice.
pub trait Front<T> {
    fn front(&self) -> &T;
}

/// A trait that provides easy access to the last element of a slice.
pub trait Back<T> {
    fn back(&self) -> &T;
    fn mut_back(&mut self) -> &mut T;
}

impl<T> Front<T> for [T] {
    #[inline(always)]
    fn front(&self) -> &T {
        &self[0]
    }
}

impl<T> Back<T> for [T] {
    #[inline(always)]
    fn back(&self) -> &T {
        &self[self.len() - 1]
    }
    #[inline(always)]
    fn mut_back(&mut self) -> &mut T {
        let i = self.len() - 1;
        &mut self[i]
    }
}

/// Draws a uniform random value from `[min, max]`.
///
/// A reversed range is treated as `[max, min]`.
pub fn random_value<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min == max {
        return min;
    }
    let (low, high) = if max < min { (max, min) } else { (min, max) };
    Range::new(low, high).ind_sample(rng)
}
