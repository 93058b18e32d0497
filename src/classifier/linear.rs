//! Fully connected layer

use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView2};
use rand::Rng;

/// `y = x Wᵀ + b` with `W` of shape `[out_features, in_features]`
#[derive(Clone, Debug, PartialEq)]
pub struct Linear {
    weight: Array2<f32>,
    bias: Array1<f32>,
}

impl Linear {
    /// Uniform init in `[-k, k]`, `k = 1 / sqrt(in_features)`
    pub fn new<R: Rng>(in_features: usize, out_features: usize, rng: &mut R) -> Self {
        let k = 1.0 / (in_features.max(1) as f32).sqrt();
        let weight = Array2::from_shape_fn((out_features, in_features), |_| rng.random_range(-k..=k));
        let bias = Array1::from_shape_fn(out_features, |_| rng.random_range(-k..=k));
        Self { weight, bias }
    }

    /// Layer with explicit parameters
    pub fn from_parts(weight: Array2<f32>, bias: Array1<f32>) -> Result<Self> {
        if weight.nrows() != bias.len() {
            return Err(Error::shape("linear bias", &[weight.nrows()], &[bias.len()]));
        }
        Ok(Self { weight, bias })
    }

    /// Input width
    pub fn in_features(&self) -> usize {
        self.weight.ncols()
    }

    /// Output width
    pub fn out_features(&self) -> usize {
        self.weight.nrows()
    }

    /// Apply to `[batch, in_features]`
    pub fn forward(&self, x: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        if x.ncols() != self.in_features() {
            return Err(Error::shape("linear input", &[x.nrows(), self.in_features()], x.shape()));
        }
        Ok(x.dot(&self.weight.t()) + &self.bias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    #[test]
    fn test_init_within_bound() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let layer = Linear::new(16, 3, &mut rng);
        assert_eq!(layer.in_features(), 16);
        assert_eq!(layer.out_features(), 3);
        assert!(layer.weight.iter().chain(layer.bias.iter()).all(|w| w.abs() <= 0.25));
    }

    #[test]
    fn test_seeded_init_is_reproducible() {
        let a = Linear::new(4, 2, &mut rand::rngs::StdRng::seed_from_u64(1));
        let b = Linear::new(4, 2, &mut rand::rngs::StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_forward() {
        let layer = Linear::from_parts(array![[1.0, 0.0], [1.0, 1.0]], array![0.5, -1.0]).unwrap();
        let y = layer.forward(array![[2.0, 3.0]].view()).unwrap();
        assert_eq!(y, array![[2.5, 4.0]]);
    }

    #[test]
    fn test_forward_wrong_width() {
        let layer = Linear::from_parts(array![[1.0, 0.0]], array![0.0]).unwrap();
        assert!(matches!(layer.forward(array![[1.0]].view()), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_from_parts_bias_mismatch() {
        assert!(Linear::from_parts(array![[1.0, 0.0]], array![0.0, 1.0]).is_err());
    }
}
