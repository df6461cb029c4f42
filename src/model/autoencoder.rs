//! Fully connected encoder–decoder: dim → hidden → bottleneck → hidden → dim,
//! ReLU on every layer but the last, trained full-batch with Adam on MSE.

use super::ModelError;
use ndarray::{Array, Array1, Array2, ArrayView2, Axis, Dimension, Zip};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const BETA1: f64 = 0.9;
const BETA2: f64 = 0.999;
const ADAM_EPS: f64 = 1e-8;

#[derive(Debug, Clone)]
struct Dense {
    /// [in, out]
    w: Array2<f64>,
    b: Array1<f64>,
    m_w: Array2<f64>,
    v_w: Array2<f64>,
    m_b: Array1<f64>,
    v_b: Array1<f64>,
}

impl Dense {
    fn new(inputs: usize, outputs: usize, rng: &mut StdRng) -> Self {
        let bound = 1.0 / (inputs as f64).sqrt();
        Self {
            w: Array2::from_shape_fn((inputs, outputs), |_| rng.gen_range(-bound..bound)),
            b: Array1::from_shape_fn(outputs, |_| rng.gen_range(-bound..bound)),
            m_w: Array2::zeros((inputs, outputs)),
            v_w: Array2::zeros((inputs, outputs)),
            m_b: Array1::zeros(outputs),
            v_b: Array1::zeros(outputs),
        }
    }

    fn forward(&self, x: &Array2<f64>) -> Array2<f64> {
        x.dot(&self.w) + &self.b
    }
}

fn adam_update<D: Dimension>(
    param: &mut Array<f64, D>,
    grad: &Array<f64, D>,
    m: &mut Array<f64, D>,
    v: &mut Array<f64, D>,
    lr: f64,
    step: i32,
) {
    let bc1 = 1.0 - BETA1.powi(step);
    let bc2 = 1.0 - BETA2.powi(step);
    Zip::from(param)
        .and(grad)
        .and(m)
        .and(v)
        .for_each(|p, &g, m, v| {
            *m = BETA1 * *m + (1.0 - BETA1) * g;
            *v = BETA2 * *v + (1.0 - BETA2) * g * g;
            let m_hat = *m / bc1;
            let v_hat = *v / bc2;
            *p -= lr * m_hat / (v_hat.sqrt() + ADAM_EPS);
        });
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub epochs: usize,
    pub initial_loss: f64,
    pub final_loss: f64,
}

#[derive(Debug, Clone)]
pub struct Autoencoder {
    layers: Vec<Dense>,
    input_dim: usize,
}

impl Autoencoder {
    pub fn new(
        input_dim: usize,
        hidden_dim: usize,
        bottleneck_dim: usize,
        seed: u64,
    ) -> Result<Self, ModelError> {
        if input_dim == 0 || hidden_dim == 0 || bottleneck_dim == 0 {
            return Err(ModelError::InvalidParameter(format!(
                "layer sizes must be non-zero, got {input_dim}/{hidden_dim}/{bottleneck_dim}"
            )));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let sizes = [input_dim, hidden_dim, bottleneck_dim, hidden_dim, input_dim];
        let layers = sizes
            .windows(2)
            .map(|pair| Dense::new(pair[0], pair[1], &mut rng))
            .collect();
        Ok(Self { layers, input_dim })
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Returns (pre-activations, activations); `activations[0]` is the input.
    fn forward_cached(&self, x: &Array2<f64>) -> (Vec<Array2<f64>>, Vec<Array2<f64>>) {
        let last = self.layers.len() - 1;
        let mut pre = Vec::with_capacity(self.layers.len());
        let mut act = Vec::with_capacity(self.layers.len() + 1);
        act.push(x.clone());
        for (i, layer) in self.layers.iter().enumerate() {
            let z = layer.forward(&act[i]);
            let a = if i < last { z.mapv(|v| v.max(0.0)) } else { z.clone() };
            pre.push(z);
            act.push(a);
        }
        (pre, act)
    }

    pub fn reconstruct(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
        self.check_dim(x.ncols())?;
        let (_, mut act) = self.forward_cached(&x.to_owned());
        Ok(act.pop().unwrap_or_else(|| x.to_owned()))
    }

    /// Mean squared error per row.
    pub fn reconstruction_errors(&self, x: ArrayView2<'_, f64>) -> Result<Vec<f64>, ModelError> {
        let recon = self.reconstruct(x)?;
        let diff = &recon - &x;
        Ok(diff
            .rows()
            .into_iter()
            .map(|row| {
                if row.is_empty() {
                    0.0
                } else {
                    row.mapv(|d| d * d).sum() / row.len() as f64
                }
            })
            .collect())
    }

    /// Full-batch training on `x` for a fixed number of epochs; no early stopping.
    pub fn fit(
        &mut self,
        x: ArrayView2<'_, f64>,
        epochs: usize,
        learning_rate: f64,
    ) -> Result<TrainingSummary, ModelError> {
        self.check_dim(x.ncols())?;
        let x = x.to_owned();
        let cells = (x.nrows() * x.ncols()).max(1) as f64;
        let last = self.layers.len() - 1;

        let mut initial_loss = f64::NAN;
        let mut final_loss = f64::NAN;
        for epoch in 0..epochs {
            let (pre, act) = self.forward_cached(&x);
            let residual = &act[self.layers.len()] - &x;
            let loss = residual.mapv(|d| d * d).sum() / cells;
            if epoch == 0 {
                initial_loss = loss;
            }
            final_loss = loss;

            let mut delta = residual * (2.0 / cells);
            let mut grads: Vec<(Array2<f64>, Array1<f64>)> = Vec::with_capacity(self.layers.len());
            for i in (0..self.layers.len()).rev() {
                if i < last {
                    delta = delta * pre[i].mapv(|z| if z > 0.0 { 1.0 } else { 0.0 });
                }
                let grad_w = act[i].t().dot(&delta);
                let grad_b = delta.sum_axis(Axis(0));
                let upstream = delta.dot(&self.layers[i].w.t());
                grads.push((grad_w, grad_b));
                delta = upstream;
            }
            grads.reverse();

            let step = (epoch + 1).min(i32::MAX as usize) as i32;
            for (layer, (grad_w, grad_b)) in self.layers.iter_mut().zip(grads) {
                let lr = learning_rate;
                adam_update(&mut layer.w, &grad_w, &mut layer.m_w, &mut layer.v_w, lr, step);
                adam_update(&mut layer.b, &grad_b, &mut layer.m_b, &mut layer.v_b, lr, step);
            }
        }

        Ok(TrainingSummary {
            epochs,
            initial_loss,
            final_loss,
        })
    }

    fn check_dim(&self, got: usize) -> Result<(), ModelError> {
        if got != self.input_dim {
            return Err(ModelError::ShapeMismatch {
                expected: self.input_dim,
                got,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn toy_data() -> Array2<f64> {
        Array2::from_shape_fn((32, 6), |(r, c)| ((r as f64) * 0.3 + c as f64).sin())
    }

    #[test]
    fn training_reduces_loss() {
        let x = toy_data();
        let mut model = Autoencoder::new(6, 8, 4, 1).unwrap();
        let summary = model.fit(x.view(), 200, 0.01).unwrap();
        assert!(summary.final_loss < summary.initial_loss);
    }

    #[test]
    fn same_seed_same_errors() {
        let x = toy_data();
        let mut a = Autoencoder::new(6, 8, 4, 11).unwrap();
        let mut b = Autoencoder::new(6, 8, 4, 11).unwrap();
        a.fit(x.view(), 50, 0.01).unwrap();
        b.fit(x.view(), 50, 0.01).unwrap();
        assert_eq!(
            a.reconstruction_errors(x.view()).unwrap(),
            b.reconstruction_errors(x.view()).unwrap()
        );
    }

    #[test]
    fn errors_are_non_negative_per_row() {
        let x = toy_data();
        let model = Autoencoder::new(6, 8, 4, 3).unwrap();
        let errors = model.reconstruction_errors(x.view()).unwrap();
        assert_eq!(errors.len(), 32);
        assert!(errors.iter().all(|e| *e >= 0.0));
    }

    #[test]
    fn rejects_wrong_width() {
        let model = Autoencoder::new(6, 8, 4, 3).unwrap();
        let x = Array2::<f64>::zeros((2, 5));
        assert!(matches!(
            model.reconstruction_errors(x.view()),
            Err(ModelError::ShapeMismatch { expected: 6, got: 5 })
        ));
    }

    #[test]
    fn zero_width_layer_is_rejected() {
        assert!(matches!(
            Autoencoder::new(6, 0, 4, 3),
            Err(ModelError::InvalidParameter(_))
        ));
        assert!(matches!(
            Autoencoder::new(6, 8, 0, 3),
            Err(ModelError::InvalidParameter(_))
        ));
    }
}
