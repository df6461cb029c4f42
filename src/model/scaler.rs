//! Per-feature standardization fit on the training rows only.

use super::ModelError;
use ndarray::{Array1, Array2, ArrayView2, Axis};

#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Population mean/std per column. Constant columns get scale 1 so they
    /// map to 0 instead of dividing by zero. `None` when `x` has no rows.
    pub fn fit(x: ArrayView2<'_, f64>) -> Option<Self> {
        let mean = x.mean_axis(Axis(0))?;
        let std = x.std_axis(Axis(0), 0.0);
        let scale = std
            .iter()
            .zip(mean.iter())
            .map(|(&s, &m)| {
                if s.is_finite() && s > 1e-12 * (1.0 + m.abs()) {
                    s
                } else {
                    1.0
                }
            })
            .collect();
        Some(Self { mean, scale })
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
        if x.ncols() != self.dim() {
            return Err(ModelError::ShapeMismatch {
                expected: self.dim(),
                got: x.ncols(),
            });
        }
        Ok((&x - &self.mean) / &self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn standardizes_columns() {
        let x = array![[1.0, 10.0], [3.0, 10.0]];
        let scaler = StandardScaler::fit(x.view()).unwrap();
        let z = scaler.transform(x.view()).unwrap();
        assert_eq!(z, array![[-1.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn uses_training_statistics_for_unseen_rows() {
        let train = array![[0.0], [2.0]];
        let scaler = StandardScaler::fit(train.view()).unwrap();
        let z = scaler.transform(array![[5.0]].view()).unwrap();
        assert!((z[[0, 0]] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn empty_fit_is_none() {
        let x = Array2::<f64>::zeros((0, 3));
        assert!(StandardScaler::fit(x.view()).is_none());
    }
}
