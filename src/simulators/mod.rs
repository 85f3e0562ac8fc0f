//! Simulation backends for physical circuits

pub mod statevector;

pub use statevector::SamplingBackend;
