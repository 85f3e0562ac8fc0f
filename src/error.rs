//! Crate-wide error type
//!
//! Every fallible operation in the crate fails synchronously with one of
//! these kinds; nothing is retried internally.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Domain/codomain widths disagree in a composition or application.
    #[error("type mismatch: cannot plug {0} output wire(s) into {1} input wire(s)")]
    TypeMismatch(usize, usize),

    /// An adjacent-layer interchange was attempted on overlapping boxes.
    #[error("interchange error: layers {0} and {1} act on overlapping wires")]
    InterchangeError(usize, usize),

    /// An arrow-map image's boundary disagrees with the declared object map.
    #[error("functor type error: image of '{name}' has boundary {found}, object map requires {expected}")]
    FunctorTypeError {
        name: String,
        expected: String,
        found: String,
    },

    /// A box with no physical counterpart was met during translation.
    #[error("unsupported gate: '{0}' has no physical instruction")]
    UnsupportedGate(String),

    /// A backend returned no outcome counts.
    #[error("backend returned no outcome counts")]
    EmptyResult,
}

pub type Result<T> = std::result::Result<T, Error>;
