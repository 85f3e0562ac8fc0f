//! Category theory abstractions for quantum circuits
//!
//! This module provides the categorical structures that the circuit and
//! matrix types implement: categories, monoidal categories and dagger
//! categories, together with law-verification helpers used by the tests.

pub mod monoidal;

pub use monoidal::{
    Category, DaggerCategory, MonoidalCategory, SymmetricMonoidalCategory,
};

/// Module for verification of category theory laws
pub mod laws {
    pub use super::monoidal::laws::{
        verify_bifunctoriality, verify_category_laws, verify_dagger_laws,
    };
}

/// Re-export commonly used types and traits
pub mod prelude {
    pub use super::{Category, DaggerCategory, MonoidalCategory, SymmetricMonoidalCategory};
}
