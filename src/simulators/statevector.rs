//! Statevector sampling backend
//!
//! Runs a physical circuit by exact statevector simulation and samples
//! outcome bitstrings from the Born distribution. Measurements are
//! deferred: translated circuits never reuse a measured qubit, so reading
//! all bound qubits at the end gives the same distribution.

use std::collections::HashMap;

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::circuit::boxes::CircuitBox;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::physical::{Backend, PhysicalCircuit, PhysicalOp};

/// An exact, seedable sampling backend for small circuits.
///
/// Exponential in the qubit count by construction; meant for verification,
/// not scale.
#[derive(Clone, Debug)]
pub struct SamplingBackend {
    seed: u64,
}

impl SamplingBackend {
    pub fn new(seed: u64) -> Self {
        SamplingBackend { seed }
    }
}

impl Backend for SamplingBackend {
    fn get_counts(
        &self,
        circuit: &PhysicalCircuit,
        n_shots: u64,
    ) -> Result<HashMap<Vec<bool>, u64>> {
        let n = circuit.n_qubits();
        let dim = 1usize << n;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dim];
        amplitudes[0] = Complex64::new(1.0, 0.0);

        // Which qubit each classical bit reads, tracked through bit swaps.
        let mut bit_source: Vec<Option<usize>> = vec![None; circuit.n_bits()];

        for command in circuit.commands() {
            match &command.op {
                PhysicalOp::Measure => {
                    if let Some(slot) = bit_source.get_mut(command.bits[0]) {
                        *slot = Some(command.qubits[0]);
                    }
                }
                PhysicalOp::SwapBits => {
                    bit_source.swap(command.bits[0], command.bits[1]);
                }
                op => {
                    let gate = op_matrix(op)?;
                    amplitudes = apply_to_targets(&amplitudes, n, &command.qubits, &gate);
                }
            }
        }

        // Joint Born distribution over the classical register.
        let n_bits = circuit.n_bits();
        let mut distribution: HashMap<Vec<bool>, f64> = HashMap::new();
        for (index, amplitude) in amplitudes.iter().enumerate() {
            let probability = amplitude.norm_sqr();
            if probability == 0.0 {
                continue;
            }
            let outcome: Vec<bool> = (0..n_bits)
                .map(|b| {
                    bit_source[b]
                        .map(|q| (index >> (n - 1 - q)) & 1 == 1)
                        .unwrap_or(false)
                })
                .collect();
            *distribution.entry(outcome).or_insert(0.0) += probability;
        }

        let outcomes: Vec<(Vec<bool>, f64)> = distribution.into_iter().collect();
        let total: f64 = outcomes.iter().map(|(_, p)| p).sum();
        if outcomes.is_empty() || total <= 0.0 {
            return Err(Error::EmptyResult);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut counts: HashMap<Vec<bool>, u64> = HashMap::new();
        for _ in 0..n_shots {
            let mut draw = rng.gen::<f64>() * total;
            let mut picked = &outcomes[outcomes.len() - 1].0;
            for (outcome, probability) in &outcomes {
                draw -= probability;
                if draw <= 0.0 {
                    picked = outcome;
                    break;
                }
            }
            *counts.entry(picked.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

/// The unitary payload of a physical instruction.
fn op_matrix(op: &PhysicalOp) -> Result<Matrix> {
    let boxed = match op {
        PhysicalOp::X => CircuitBox::x(),
        PhysicalOp::Y => CircuitBox::y(),
        PhysicalOp::Z => CircuitBox::z(),
        PhysicalOp::H => CircuitBox::h(),
        PhysicalOp::S => CircuitBox::s(),
        PhysicalOp::T => CircuitBox::t(),
        PhysicalOp::CX => CircuitBox::cx(),
        PhysicalOp::CZ => CircuitBox::cz(),
        PhysicalOp::Swap => CircuitBox::swap(),
        PhysicalOp::Rx(half_turns) => CircuitBox::rx(half_turns / 2.0),
        PhysicalOp::Rz(half_turns) => CircuitBox::rz(half_turns / 2.0),
        PhysicalOp::CRz(half_turns) => CircuitBox::crz(half_turns / 2.0),
        PhysicalOp::Measure | PhysicalOp::SwapBits => {
            return Err(Error::UnsupportedGate("Measure".to_string()))
        }
    };
    boxed.matrix()
}

/// Apply a gate to the given target qubits of a full statevector.
///
/// Qubit 0 is the most significant position of the basis index; the first
/// target is the most significant wire of the gate.
fn apply_to_targets(
    amplitudes: &[Complex64],
    n_qubits: usize,
    targets: &[usize],
    gate: &Matrix,
) -> Vec<Complex64> {
    let dim = amplitudes.len();
    let k = targets.len();
    let sub_dim = 1usize << k;
    let mut result = vec![Complex64::new(0.0, 0.0); dim];

    for (j, out) in result.iter_mut().enumerate() {
        let sub_j: usize = targets.iter().enumerate().fold(0, |acc, (t, q)| {
            acc | (((j >> (n_qubits - 1 - q)) & 1) << (k - 1 - t))
        });
        for sub_i in 0..sub_dim {
            // The source index agrees with j outside the targets.
            let mut i = j;
            for (t, q) in targets.iter().enumerate() {
                let bit = (sub_i >> (k - 1 - t)) & 1;
                let shift = n_qubits - 1 - q;
                i = (i & !(1 << shift)) | (bit << shift);
            }
            let weight = gate.array()[[sub_i, sub_j]];
            if weight != Complex64::new(0.0, 0.0) {
                *out += amplitudes[i] * weight;
            }
        }
    }
    result
}
