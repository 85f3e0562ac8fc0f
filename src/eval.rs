//! Tensor-network evaluation and Born-rule measurement
//!
//! Evaluation is the matrix-valued functor: every wire becomes a qubit
//! dimension and every box contributes its dense payload. Measurement
//! exhaustively enumerates computational-basis transitions, so its cost is
//! exponential in the total width; it is meant for small verification
//! circuits only.

use ndarray::{ArrayD, IxDyn};
use rayon::prelude::*;

use crate::circuit::boxes::CircuitBox;
use crate::circuit::diagram::Circuit;
use crate::circuit::functor::CircuitFunctor;
use crate::error::{Error, Result};
use crate::matrix::{Matrix, MatrixCategory};

/// The bits of `index`, most significant first.
pub(crate) fn index_bits(index: usize, length: usize) -> Vec<bool> {
    (0..length)
        .map(|k| (index >> (length - 1 - k)) & 1 == 1)
        .collect()
}

impl Circuit {
    /// Evaluate the circuit as a matrix by contracting the tensor network
    /// layer by layer.
    pub fn eval(&self) -> Result<Matrix> {
        let functor: CircuitFunctor<MatrixCategory> =
            CircuitFunctor::new(|n| 1usize << n, |b: &CircuitBox| b.matrix());
        functor.apply(&MatrixCategory, self)
    }

    /// Apply the Born rule and return the joint input/output probability
    /// array, of shape `[2; dom + cod]`.
    ///
    /// Entry `[x..., y...]` is the squared magnitude of the transition
    /// amplitude from basis state x to basis state y.
    pub fn measure(&self) -> Result<ArrayD<f64>> {
        let n_in = self.dom().len();
        let n_out = self.cod().len();
        let process = self.eval()?;

        let flat: Vec<f64> = (0..1usize << n_in)
            .into_par_iter()
            .map(|i| {
                let state = CircuitBox::ket(&index_bits(i, n_in)).matrix()?;
                let through = state
                    .compose(&process)
                    .ok_or(Error::TypeMismatch(state.cod(), process.dom()))?;
                (0..1usize << n_out)
                    .map(|j| {
                        let effect = CircuitBox::bra(&index_bits(j, n_out)).matrix()?;
                        let amplitude = through
                            .compose(&effect)
                            .and_then(|m| m.scalar_value())
                            .ok_or(Error::TypeMismatch(through.cod(), effect.dom()))?;
                        Ok(amplitude.norm_sqr())
                    })
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<Vec<f64>>>>()?
            .into_iter()
            .flatten()
            .collect();

        let shape: Vec<usize> = vec![2; n_in + n_out];
        ArrayD::from_shape_vec(IxDyn(&shape), flat)
            .map_err(|_| Error::TypeMismatch(n_in, n_out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_cx_twice_is_identity() {
        let cx = Circuit::from_box(CircuitBox::cx());
        let twice = cx.compose(&cx).unwrap();
        assert_eq!(twice.eval().unwrap(), Matrix::id(4));
    }

    #[test]
    fn test_opposite_rotations_cancel() {
        let c = Circuit::from_box(CircuitBox::rz(0.3))
            .compose(&Circuit::from_box(CircuitBox::rz(-0.3)))
            .unwrap();
        assert_eq!(c.eval().unwrap(), Matrix::id(2));
    }

    #[test]
    fn test_state_effect_adjunction() {
        for i in 0..8 {
            let bits = index_bits(i, 3);
            let braket = Circuit::from_box(CircuitBox::ket(&bits))
                .compose(&Circuit::from_box(CircuitBox::bra(&bits)))
                .unwrap();
            let value = braket.eval().unwrap().scalar_value().unwrap();
            assert!((value - Complex64::new(1.0, 0.0)).norm() < 1e-10);
        }
    }

    #[test]
    fn test_measure_x_gate() {
        let m = Circuit::from_box(CircuitBox::x()).measure().unwrap();
        assert_eq!(m.shape(), &[2, 2]);
        // |0> goes to |1> with certainty
        assert!((m[[0, 1]] - 1.0).abs() < 1e-10);
        assert!(m[[0, 0]].abs() < 1e-10);
    }

    #[test]
    fn test_measure_probability_conservation() {
        let h = Circuit::from_box(CircuitBox::h());
        let bell = Circuit::from_box(CircuitBox::ket(&[false, false]))
            .compose(&h.tensor(&Circuit::id(1)))
            .unwrap()
            .compose(&Circuit::from_box(CircuitBox::cx()))
            .unwrap();
        let m = bell.measure().unwrap();
        assert_eq!(m.shape(), &[2, 2]);
        let total: f64 = m.iter().sum();
        assert!((total - 1.0).abs() < 1e-10);
        // Bell state: only 00 and 11 outcomes
        assert!((m[[0, 0]] - 0.5).abs() < 1e-10);
        assert!((m[[1, 1]] - 0.5).abs() < 1e-10);
    }
}
