//! The gate and state box family
//!
//! Boxes are the atomic morphisms circuits are built from. Each box is a
//! closed tagged union over the fixed instruction kinds, carrying a dagger
//! orientation so that adjoints never need a separate subtype.

use std::f64::consts::PI;
use std::fmt;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::circuit::pro::Pro;

/// The two physical register kinds a wire can be realized by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireKind {
    Qubit,
    Bit,
}

/// Dagger orientation of a box.
///
/// SelfInverse boxes are never distinguished from their dagger in equality
/// or display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dagger {
    Forward,
    Reversed,
    SelfInverse,
}

/// Rotation family, parametrized by a phase measured in turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationAxis {
    /// Single-wire rotation about x
    Rx,
    /// Single-wire rotation about z
    Rz,
    /// Two-wire controlled rotation about z
    CRz,
}

impl RotationAxis {
    fn width(&self) -> usize {
        match self {
            RotationAxis::Rx | RotationAxis::Rz => 1,
            RotationAxis::CRz => 2,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            RotationAxis::Rx => "Rx",
            RotationAxis::Rz => "Rz",
            RotationAxis::CRz => "CRz",
        }
    }
}

/// The closed set of box kinds the rest of the crate dispatches on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoxKind {
    /// A named box with explicit input/output widths and an optional dense
    /// payload of shape (2^dom, 2^cod). Generators without a payload can be
    /// composed and mapped by functors but not evaluated.
    Gate {
        name: String,
        dom: usize,
        cod: usize,
        array: Option<Array2<Complex64>>,
    },

    /// A rotation whose payload is computed on demand from its phase.
    Rotation { axis: RotationAxis, phase: f64 },

    /// State preparation for a computational-basis bitstring.
    Ket(Vec<bool>),

    /// Post-selected effect for a computational-basis bitstring.
    Bra(Vec<bool>),

    /// Destructive measurement turning one qubit wire into one bit wire.
    Measure,

    /// Dropping a wire without reading it.
    Discard,

    /// Crossing of two wires of the given kinds.
    Swap(WireKind, WireKind),

    /// A bare scalar factor on zero wires.
    Scalar(Complex64),
}

/// An atomic morphism: a box kind plus its dagger orientation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircuitBox {
    kind: BoxKind,
    dagger: Dagger,
}

const SQRT_2_INV: f64 = std::f64::consts::FRAC_1_SQRT_2;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn square_array(width: usize, buffer: Vec<Complex64>) -> Array2<Complex64> {
    let dim = 1 << width;
    debug_assert_eq!(buffer.len(), dim * dim);
    Array2::from_shape_vec((dim, dim), buffer).expect("gate buffer length")
}

impl CircuitBox {
    /// A named square gate with an explicit dense payload.
    pub fn gate(
        name: impl Into<String>,
        width: usize,
        buffer: Vec<Complex64>,
        dagger: Dagger,
    ) -> Self {
        CircuitBox {
            kind: BoxKind::Gate {
                name: name.into(),
                dom: width,
                cod: width,
                array: Some(square_array(width, buffer)),
            },
            dagger,
        }
    }

    /// An abstract generator box with no payload.
    pub fn generator(name: impl Into<String>, dom: usize, cod: usize) -> Self {
        CircuitBox {
            kind: BoxKind::Gate {
                name: name.into(),
                dom,
                cod,
                array: None,
            },
            dagger: Dagger::Forward,
        }
    }

    pub fn x() -> Self {
        Self::gate(
            "X",
            1,
            vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)],
            Dagger::SelfInverse,
        )
    }

    pub fn y() -> Self {
        Self::gate(
            "Y",
            1,
            vec![c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0)],
            Dagger::Forward,
        )
    }

    pub fn z() -> Self {
        Self::gate(
            "Z",
            1,
            vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(-1.0, 0.0)],
            Dagger::SelfInverse,
        )
    }

    pub fn h() -> Self {
        Self::gate(
            "H",
            1,
            vec![
                c(SQRT_2_INV, 0.0),
                c(SQRT_2_INV, 0.0),
                c(SQRT_2_INV, 0.0),
                c(-SQRT_2_INV, 0.0),
            ],
            Dagger::SelfInverse,
        )
    }

    pub fn s() -> Self {
        Self::gate(
            "S",
            1,
            vec![c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 1.0)],
            Dagger::Forward,
        )
    }

    pub fn t() -> Self {
        Self::gate(
            "T",
            1,
            vec![
                c(1.0, 0.0),
                c(0.0, 0.0),
                c(0.0, 0.0),
                c(SQRT_2_INV, SQRT_2_INV),
            ],
            Dagger::Forward,
        )
    }

    pub fn cx() -> Self {
        let o = c(0.0, 0.0);
        let l = c(1.0, 0.0);
        Self::gate(
            "CX",
            2,
            vec![
                l, o, o, o, //
                o, l, o, o, //
                o, o, o, l, //
                o, o, l, o,
            ],
            Dagger::SelfInverse,
        )
    }

    pub fn cz() -> Self {
        let o = c(0.0, 0.0);
        let l = c(1.0, 0.0);
        Self::gate(
            "CZ",
            2,
            vec![
                l, o, o, o, //
                o, l, o, o, //
                o, o, l, o, //
                o, o, o, c(-1.0, 0.0),
            ],
            Dagger::SelfInverse,
        )
    }

    /// The two-qubit wire crossing.
    pub fn swap() -> Self {
        CircuitBox {
            kind: BoxKind::Swap(WireKind::Qubit, WireKind::Qubit),
            dagger: Dagger::SelfInverse,
        }
    }

    /// A crossing of wires with explicit register kinds.
    pub fn swap_of(a: WireKind, b: WireKind) -> Self {
        CircuitBox {
            kind: BoxKind::Swap(a, b),
            dagger: Dagger::SelfInverse,
        }
    }

    pub fn rx(phase: f64) -> Self {
        CircuitBox {
            kind: BoxKind::Rotation { axis: RotationAxis::Rx, phase },
            dagger: Dagger::Forward,
        }
    }

    pub fn rz(phase: f64) -> Self {
        CircuitBox {
            kind: BoxKind::Rotation { axis: RotationAxis::Rz, phase },
            dagger: Dagger::Forward,
        }
    }

    pub fn crz(phase: f64) -> Self {
        CircuitBox {
            kind: BoxKind::Rotation { axis: RotationAxis::CRz, phase },
            dagger: Dagger::Forward,
        }
    }

    pub fn ket(bits: &[bool]) -> Self {
        CircuitBox {
            kind: BoxKind::Ket(bits.to_vec()),
            dagger: Dagger::Forward,
        }
    }

    pub fn bra(bits: &[bool]) -> Self {
        CircuitBox {
            kind: BoxKind::Bra(bits.to_vec()),
            dagger: Dagger::Forward,
        }
    }

    pub fn measure() -> Self {
        CircuitBox {
            kind: BoxKind::Measure,
            dagger: Dagger::Forward,
        }
    }

    pub fn discard() -> Self {
        CircuitBox {
            kind: BoxKind::Discard,
            dagger: Dagger::Forward,
        }
    }

    pub fn scalar(value: Complex64) -> Self {
        CircuitBox {
            kind: BoxKind::Scalar(value),
            dagger: Dagger::SelfInverse,
        }
    }

    /// The zero-wire box holding sqrt(r), used to balance normal forms.
    pub fn sqrt(value: f64) -> Self {
        Self::scalar(c(value.sqrt(), 0.0))
    }

    pub fn kind(&self) -> &BoxKind {
        &self.kind
    }

    pub fn orientation(&self) -> Dagger {
        self.dagger
    }

    fn base_dom(&self) -> usize {
        match &self.kind {
            BoxKind::Gate { dom, .. } => *dom,
            BoxKind::Rotation { axis, .. } => axis.width(),
            BoxKind::Ket(_) => 0,
            BoxKind::Bra(bits) => bits.len(),
            BoxKind::Measure => 1,
            BoxKind::Discard => 1,
            BoxKind::Swap(_, _) => 2,
            BoxKind::Scalar(_) => 0,
        }
    }

    fn base_cod(&self) -> usize {
        match &self.kind {
            BoxKind::Gate { cod, .. } => *cod,
            BoxKind::Rotation { axis, .. } => axis.width(),
            BoxKind::Ket(bits) => bits.len(),
            BoxKind::Bra(_) => 0,
            BoxKind::Measure => 1,
            BoxKind::Discard => 0,
            BoxKind::Swap(_, _) => 2,
            BoxKind::Scalar(_) => 0,
        }
    }

    /// Input width, accounting for orientation.
    pub fn dom(&self) -> Pro {
        match self.dagger {
            Dagger::Reversed => Pro(self.base_cod()),
            _ => Pro(self.base_dom()),
        }
    }

    /// Output width, accounting for orientation.
    pub fn cod(&self) -> Pro {
        match self.dagger {
            Dagger::Reversed => Pro(self.base_dom()),
            _ => Pro(self.base_cod()),
        }
    }

    /// Display name of the box.
    pub fn name(&self) -> String {
        let base = match &self.kind {
            BoxKind::Gate { name, .. } => name.clone(),
            BoxKind::Rotation { axis, phase } => format!("{}({})", axis.label(), phase),
            BoxKind::Ket(bits) => format!("Ket({})", bitstring(bits)),
            BoxKind::Bra(bits) => format!("Bra({})", bitstring(bits)),
            BoxKind::Measure => "Measure".to_string(),
            BoxKind::Discard => "Discard".to_string(),
            BoxKind::Swap(WireKind::Qubit, WireKind::Qubit) => "SWAP".to_string(),
            BoxKind::Swap(a, b) => format!("Swap({:?}, {:?})", a, b),
            BoxKind::Scalar(value) => format!("scalar({})", value),
        };
        match self.dagger {
            Dagger::Reversed => format!("{}†", base),
            _ => base,
        }
    }

    /// The dense payload of this box as a matrix, when it has one.
    ///
    /// Classical boxes (measurement, discard) have no linear-map payload and
    /// fail with UnsupportedGate, as do generators without arrays.
    pub fn matrix(&self) -> Result<Matrix> {
        let base = match &self.kind {
            BoxKind::Gate { name, dom, cod, array } => match array {
                Some(array) => {
                    debug_assert_eq!(array.dim(), (1 << dom, 1 << cod));
                    Matrix::from_array(array.clone())
                }
                None => return Err(Error::UnsupportedGate(name.clone())),
            },
            BoxKind::Rotation { axis, phase } => rotation_matrix(*axis, *phase),
            BoxKind::Ket(bits) => basis_matrix(bits),
            BoxKind::Bra(bits) => basis_matrix(bits).dagger(),
            BoxKind::Measure | BoxKind::Discard => {
                return Err(Error::UnsupportedGate(self.name()))
            }
            BoxKind::Swap(_, _) => {
                let o = c(0.0, 0.0);
                let l = c(1.0, 0.0);
                Matrix::new(
                    4,
                    4,
                    vec![
                        l, o, o, o, //
                        o, o, l, o, //
                        o, l, o, o, //
                        o, o, o, l,
                    ],
                )
                .expect("swap buffer length")
            }
            BoxKind::Scalar(value) => Matrix::scalar(*value),
        };
        Ok(match self.dagger {
            Dagger::Reversed => base.dagger(),
            _ => base,
        })
    }

    /// The numeric value of a zero-width box, if this is one.
    pub fn scalar_value(&self) -> Option<Complex64> {
        match &self.kind {
            BoxKind::Scalar(value) => Some(*value),
            BoxKind::Gate { dom: 0, cod: 0, array: Some(array), .. } => Some(array[[0, 0]]),
            _ => None,
        }
    }

    pub fn is_ket(&self) -> bool {
        matches!(self.kind, BoxKind::Ket(_))
    }

    pub fn is_bra(&self) -> bool {
        matches!(self.kind, BoxKind::Bra(_))
    }

    /// The adjoint of this box.
    ///
    /// Kets and bras map into each other, rotations negate their phase,
    /// scalars conjugate, and self-inverse boxes are returned unchanged.
    pub fn dagger_box(&self) -> CircuitBox {
        match (&self.kind, self.dagger) {
            (_, Dagger::SelfInverse) => match &self.kind {
                BoxKind::Scalar(value) => Self::scalar(value.conj()),
                _ => self.clone(),
            },
            (BoxKind::Rotation { axis, phase }, _) => CircuitBox {
                kind: BoxKind::Rotation { axis: *axis, phase: -phase },
                dagger: Dagger::Forward,
            },
            (BoxKind::Ket(bits), _) => Self::bra(bits),
            (BoxKind::Bra(bits), _) => Self::ket(bits),
            (_, Dagger::Forward) => CircuitBox {
                kind: self.kind.clone(),
                dagger: Dagger::Reversed,
            },
            (_, Dagger::Reversed) => CircuitBox {
                kind: self.kind.clone(),
                dagger: Dagger::Forward,
            },
        }
    }
}

fn bitstring(bits: &[bool]) -> String {
    bits.iter()
        .map(|b| if *b { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Iterated product of one-wire basis vectors.
fn basis_matrix(bits: &[bool]) -> Matrix {
    let mut matrix = Matrix::scalar(c(1.0, 0.0));
    for bit in bits {
        let vector = if *bit {
            Matrix::new(1, 2, vec![c(0.0, 0.0), c(1.0, 0.0)])
        } else {
            Matrix::new(1, 2, vec![c(1.0, 0.0), c(0.0, 0.0)])
        }
        .expect("basis vector length");
        matrix = matrix.tensor(&vector);
    }
    matrix
}

/// Closed-form payloads for the rotation family, with phases in turns.
fn rotation_matrix(axis: RotationAxis, phase: f64) -> Matrix {
    match axis {
        RotationAxis::Rx => {
            let half_theta = PI * phase;
            let global = Complex64::from_polar(1.0, half_theta);
            let (sin, cos) = half_theta.sin_cos();
            let buffer = vec![
                global * c(cos, 0.0),
                global * c(0.0, -sin),
                global * c(0.0, -sin),
                global * c(cos, 0.0),
            ];
            Matrix::new(2, 2, buffer).expect("rotation buffer length")
        }
        RotationAxis::Rz => {
            let theta = 2.0 * PI * phase;
            let buffer = vec![
                c(1.0, 0.0),
                c(0.0, 0.0),
                c(0.0, 0.0),
                Complex64::from_polar(1.0, theta),
            ];
            Matrix::new(2, 2, buffer).expect("rotation buffer length")
        }
        RotationAxis::CRz => {
            let theta = 2.0 * PI * phase;
            let o = c(0.0, 0.0);
            let l = c(1.0, 0.0);
            let buffer = vec![
                l, o, o, o, //
                o, l, o, o, //
                o, o, l, o, //
                o, o, o, Complex64::from_polar(1.0, theta),
            ];
            Matrix::new(4, 4, buffer).expect("rotation buffer length")
        }
    }
}

impl fmt::Display for CircuitBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
