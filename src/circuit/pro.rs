//! Wire-count objects
//!
//! Objects of the circuit category are natural numbers of indistinguishable
//! unit wires. They are self-dual: the left and right adjoint of a
//! wire-count object is itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A non-negative number of unit wires.
///
/// Tensoring two wire counts adds their widths; equality is by width only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pro(pub usize);

impl Pro {
    /// The number of wires.
    pub fn len(&self) -> usize {
        self.0
    }

    /// True for the monoidal unit.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Tensor product of wire counts.
    pub fn tensor(&self, other: &Pro) -> Pro {
        Pro(self.0 + other.0)
    }

    /// The sub-width covering wires `start..end`, clamped to this width.
    pub fn slice(&self, start: usize, end: usize) -> Pro {
        let end = end.min(self.0);
        let start = start.min(end);
        Pro(end - start)
    }

    /// Wire counts are self-dual.
    pub fn dual(&self) -> Pro {
        *self
    }
}

impl From<usize> for Pro {
    fn from(n: usize) -> Self {
        Pro(n)
    }
}

impl fmt::Display for Pro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
