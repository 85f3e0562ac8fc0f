//! Quantum circuits as layered diagrams
//!
//! This module defines the circuit data model: wire-count objects, the
//! gate/state box family, layered diagrams with their algebra, and
//! circuit-valued functors.

pub mod boxes;
pub mod diagram;
pub mod functor;
pub mod pro;
pub mod random;

pub use boxes::{BoxKind, CircuitBox, Dagger, RotationAxis, WireKind};
pub use diagram::{Circuit, CircuitCategory, Layer};
pub use functor::CircuitFunctor;
pub use pro::Pro;
pub use random::GateSpec;
