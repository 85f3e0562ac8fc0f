//! Diagrammatic Quantum Circuits
//!
//! This crate models quantum circuits as morphisms of a dagger monoidal
//! category: diagrams built from elementary gates composed sequentially and
//! in parallel. Circuits evaluate as tensor networks through circuit-valued
//! functors, normalize under the interchange law, and translate to and from
//! a register-based physical gate-list representation.

pub mod category;
pub mod circuit;
pub mod error;
pub mod eval;
pub mod matrix;
pub mod normalize;
pub mod physical;
pub mod simulators;

pub use error::{Error, Result};

// Create a prelude module for convenient imports
pub mod prelude {
    pub use crate::category::prelude::*;
    pub use crate::circuit::{
        BoxKind, Circuit, CircuitBox, CircuitCategory, CircuitFunctor, Dagger, GateSpec, Layer,
        Pro, RotationAxis, WireKind,
    };
    pub use crate::error::{Error, Result};
    pub use crate::matrix::{Matrix, MatrixCategory};
    pub use crate::normalize::Normalizer;
    pub use crate::physical::{
        get_counts, Backend, Command, CountOptions, PhysicalCircuit, PhysicalOp,
    };
    pub use crate::simulators::SamplingBackend;
}

// Version and crate information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
