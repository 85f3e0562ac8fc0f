//! Dense matrix backend
//!
//! This module defines the numeric value type that circuits evaluate into:
//! a complex matrix with explicit domain and codomain dimensions, supporting
//! sequential composition (contraction) and Kronecker tensor product.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::category::prelude::*;

/// Tolerance used when comparing matrices for equality
pub const EPSILON: f64 = 1e-10;

/// A linear map between two computational-basis spaces.
///
/// Rows are indexed by the input basis, columns by the output basis, so
/// `compose` is a plain matrix product in diagram order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Matrix {
    dom: usize,
    cod: usize,
    array: Array2<Complex64>,
}

impl Matrix {
    /// Create a matrix from its dimensions and a flat row-major buffer.
    ///
    /// Returns None when the buffer length disagrees with dom * cod.
    pub fn new(dom: usize, cod: usize, buffer: Vec<Complex64>) -> Option<Self> {
        let array = Array2::from_shape_vec((dom, cod), buffer).ok()?;
        Some(Matrix { dom, cod, array })
    }

    /// Wrap an already-shaped array.
    pub fn from_array(array: Array2<Complex64>) -> Self {
        let (dom, cod) = array.dim();
        Matrix { dom, cod, array }
    }

    /// The identity map on a space of the given dimension.
    pub fn id(dim: usize) -> Self {
        let mut array = Array2::zeros((dim, dim));
        for i in 0..dim {
            array[[i, i]] = Complex64::new(1.0, 0.0);
        }
        Matrix { dom: dim, cod: dim, array }
    }

    /// A 1x1 matrix holding a bare scalar.
    pub fn scalar(value: Complex64) -> Self {
        Matrix {
            dom: 1,
            cod: 1,
            array: Array2::from_elem((1, 1), value),
        }
    }

    /// Input dimension.
    pub fn dom(&self) -> usize {
        self.dom
    }

    /// Output dimension.
    pub fn cod(&self) -> usize {
        self.cod
    }

    /// The underlying array.
    pub fn array(&self) -> &Array2<Complex64> {
        &self.array
    }

    /// The single entry of a 1x1 matrix, if this is one.
    pub fn scalar_value(&self) -> Option<Complex64> {
        (self.dom == 1 && self.cod == 1).then(|| self.array[[0, 0]])
    }

    /// Sequential composition: first `self`, then `other`.
    ///
    /// Returns None when the shared dimension disagrees.
    pub fn compose(&self, other: &Matrix) -> Option<Matrix> {
        if self.cod != other.dom {
            return None;
        }
        Some(Matrix {
            dom: self.dom,
            cod: other.cod,
            array: self.array.dot(&other.array),
        })
    }

    /// Kronecker tensor product.
    pub fn tensor(&self, other: &Matrix) -> Matrix {
        let dom = self.dom * other.dom;
        let cod = self.cod * other.cod;
        let mut array = Array2::zeros((dom, cod));
        for i1 in 0..self.dom {
            for j1 in 0..self.cod {
                let a = self.array[[i1, j1]];
                for i2 in 0..other.dom {
                    for j2 in 0..other.cod {
                        array[[i1 * other.dom + i2, j1 * other.cod + j2]] =
                            a * other.array[[i2, j2]];
                    }
                }
            }
        }
        Matrix { dom, cod, array }
    }

    /// Conjugate transpose, swapping domain and codomain.
    pub fn dagger(&self) -> Matrix {
        let mut array = Array2::zeros((self.cod, self.dom));
        for i in 0..self.dom {
            for j in 0..self.cod {
                array[[j, i]] = self.array[[i, j]].conj();
            }
        }
        Matrix {
            dom: self.cod,
            cod: self.dom,
            array,
        }
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        if self.dom != other.dom || self.cod != other.cod {
            return false;
        }
        // Compare elementwise with tolerance for floating point
        self.array
            .iter()
            .zip(other.array.iter())
            .all(|(a, b)| (a - b).norm() < EPSILON)
    }
}

/// The category of computational-basis spaces and linear maps.
///
/// Objects are dimensions, morphisms are matrices. This is the target of
/// tensor-network evaluation.
#[derive(Clone, Debug, Default)]
pub struct MatrixCategory;

impl Category for MatrixCategory {
    type Object = usize; // Hilbert-space dimension
    type Morphism = Matrix;

    fn domain(&self, f: &Self::Morphism) -> Self::Object {
        f.dom
    }

    fn codomain(&self, f: &Self::Morphism) -> Self::Object {
        f.cod
    }

    fn identity(&self, obj: &Self::Object) -> Self::Morphism {
        Matrix::id(*obj)
    }

    fn compose(&self, f: &Self::Morphism, g: &Self::Morphism) -> Option<Self::Morphism> {
        f.compose(g)
    }
}

impl MonoidalCategory for MatrixCategory {
    fn unit(&self) -> Self::Object {
        1 // the scalars
    }

    fn tensor_objects(&self, a: &Self::Object, b: &Self::Object) -> Self::Object {
        a * b
    }

    fn tensor_morphisms(&self, f: &Self::Morphism, g: &Self::Morphism) -> Self::Morphism {
        f.tensor(g)
    }
}

impl SymmetricMonoidalCategory for MatrixCategory {
    fn braiding(&self, a: &Self::Object, b: &Self::Object) -> Self::Morphism {
        // Permutation matrix sending basis vector i ⊗ j to j ⊗ i
        let dim = a * b;
        let mut array = Array2::zeros((dim, dim));
        for i in 0..*a {
            for j in 0..*b {
                array[[i * b + j, j * a + i]] = Complex64::new(1.0, 0.0);
            }
        }
        Matrix { dom: dim, cod: dim, array }
    }
}

impl DaggerCategory for MatrixCategory {
    fn dagger(&self, f: &Self::Morphism) -> Self::Morphism {
        f.dagger()
    }
}
