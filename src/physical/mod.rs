//! Register-based physical circuits
//!
//! The translation target: a gate list over separately indexed qubit and
//! classical-bit registers, with post-selection bookkeeping and a global
//! scalar. This mirrors the command model of hardware-facing SDKs; the
//! diagrammatic layer compiles into it and decompiles back out of it.

use std::collections::{BTreeMap, HashMap};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::circuit::diagram::Circuit;
use crate::error::{Error, Result};

mod convert;

/// A physical instruction kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PhysicalOp {
    X,
    Y,
    Z,
    H,
    S,
    T,
    CX,
    CZ,
    /// Exchange of two qubit register positions.
    Swap,
    /// Exchange of two classical-bit register positions.
    SwapBits,
    /// x-rotation; the parameter is in half-turns (multiples of pi).
    Rx(f64),
    /// z-rotation; the parameter is in half-turns.
    Rz(f64),
    /// Controlled z-rotation; the parameter is in half-turns.
    CRz(f64),
    /// Read a qubit into a classical bit.
    Measure,
}

/// One instruction with its register operands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub op: PhysicalOp,
    pub qubits: Vec<usize>,
    pub bits: Vec<usize>,
}

/// A physical circuit: ordered commands over growable registers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalCircuit {
    n_qubits: usize,
    n_bits: usize,
    commands: Vec<Command>,
    post_selection: BTreeMap<usize, bool>,
    scalar: Complex64,
}

impl PhysicalCircuit {
    pub fn new(n_qubits: usize, n_bits: usize) -> Self {
        PhysicalCircuit {
            n_qubits,
            n_bits,
            commands: Vec::new(),
            post_selection: BTreeMap::new(),
            scalar: Complex64::new(1.0, 0.0),
        }
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn n_bits(&self) -> usize {
        self.n_bits
    }

    /// Ordered command access, for round-tripping.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Expected classical values keyed by bit index.
    pub fn post_selection(&self) -> &BTreeMap<usize, bool> {
        &self.post_selection
    }

    pub fn scalar(&self) -> Complex64 {
        self.scalar
    }

    fn push(&mut self, op: PhysicalOp, qubits: &[usize], bits: &[usize]) {
        self.commands.push(Command {
            op,
            qubits: qubits.to_vec(),
            bits: bits.to_vec(),
        });
    }

    pub fn x(&mut self, q: usize) {
        self.push(PhysicalOp::X, &[q], &[]);
    }

    pub fn y(&mut self, q: usize) {
        self.push(PhysicalOp::Y, &[q], &[]);
    }

    pub fn z(&mut self, q: usize) {
        self.push(PhysicalOp::Z, &[q], &[]);
    }

    pub fn h(&mut self, q: usize) {
        self.push(PhysicalOp::H, &[q], &[]);
    }

    pub fn s(&mut self, q: usize) {
        self.push(PhysicalOp::S, &[q], &[]);
    }

    pub fn t(&mut self, q: usize) {
        self.push(PhysicalOp::T, &[q], &[]);
    }

    pub fn cx(&mut self, control: usize, target: usize) {
        self.push(PhysicalOp::CX, &[control, target], &[]);
    }

    pub fn cz(&mut self, control: usize, target: usize) {
        self.push(PhysicalOp::CZ, &[control, target], &[]);
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.push(PhysicalOp::Swap, &[a, b], &[]);
    }

    pub fn swap_bits(&mut self, a: usize, b: usize) {
        self.push(PhysicalOp::SwapBits, &[], &[a, b]);
    }

    pub fn rx(&mut self, q: usize, half_turns: f64) {
        self.push(PhysicalOp::Rx(half_turns), &[q], &[]);
    }

    pub fn rz(&mut self, q: usize, half_turns: f64) {
        self.push(PhysicalOp::Rz(half_turns), &[q], &[]);
    }

    pub fn crz(&mut self, control: usize, target: usize, half_turns: f64) {
        self.push(PhysicalOp::CRz(half_turns), &[control, target], &[]);
    }

    pub fn measure(&mut self, q: usize, b: usize) {
        self.push(PhysicalOp::Measure, &[q], &[b]);
    }

    /// Grow the qubit register by `n` fresh positions at the top end.
    pub fn add_blank_qubits(&mut self, n: usize) {
        self.n_qubits += n;
    }

    /// Allocate a fresh classical bit and return its index.
    pub fn add_bit(&mut self) -> usize {
        let index = self.n_bits;
        self.n_bits += 1;
        index
    }

    pub fn post_select(&mut self, bit: usize, value: bool) {
        self.post_selection.insert(bit, value);
    }

    pub fn scale(&mut self, value: Complex64) {
        self.scalar *= value;
    }

    /// A copy of this circuit with qubit indices sent through the remap
    /// table. Indices absent from the table are unchanged. The receiver is
    /// consumed; no shared state is mutated.
    pub fn renamed_qubits(self, remap: &BTreeMap<usize, usize>) -> Self {
        let rename = |q: usize| remap.get(&q).copied().unwrap_or(q);
        let PhysicalCircuit { n_qubits, n_bits, commands, post_selection, scalar } = self;
        PhysicalCircuit {
            n_qubits,
            n_bits,
            commands: commands
                .into_iter()
                .map(|c| Command {
                    op: c.op,
                    qubits: c.qubits.into_iter().map(rename).collect(),
                    bits: c.bits,
                })
                .collect(),
            post_selection,
            scalar,
        }
    }

    /// A copy of this circuit with classical-bit indices sent through the
    /// remap table, including the post-selection keys.
    pub fn renamed_bits(self, remap: &BTreeMap<usize, usize>) -> Self {
        let rename = |b: usize| remap.get(&b).copied().unwrap_or(b);
        let PhysicalCircuit { n_qubits, n_bits, commands, post_selection, scalar } = self;
        PhysicalCircuit {
            n_qubits,
            n_bits,
            commands: commands
                .into_iter()
                .map(|c| Command {
                    op: c.op,
                    qubits: c.qubits,
                    bits: c.bits.into_iter().map(rename).collect(),
                })
                .collect(),
            post_selection: post_selection
                .into_iter()
                .map(|(b, v)| (rename(b), v))
                .collect(),
            scalar,
        }
    }
}

/// An outcome source: anything able to run a physical circuit and report
/// counts of classical-bit readouts.
pub trait Backend {
    fn get_counts(
        &self,
        circuit: &PhysicalCircuit,
        n_shots: u64,
    ) -> Result<HashMap<Vec<bool>, u64>>;
}

/// Options for [`get_counts`].
#[derive(Clone, Debug)]
pub struct CountOptions {
    pub n_shots: u64,
    /// Turn counts into probabilities.
    pub normalize: bool,
    /// Filter by the circuit's post-selection and drop the selected bits.
    pub post_select: bool,
    /// Rescale by the squared magnitude of the circuit scalar.
    pub scale: bool,
}

impl Default for CountOptions {
    fn default() -> Self {
        CountOptions {
            n_shots: 1 << 10,
            normalize: true,
            post_select: true,
            scale: true,
        }
    }
}

/// Compile a circuit, run it on a backend and post-process the outcome
/// counts.
pub fn get_counts(
    circuit: &Circuit,
    backend: &dyn Backend,
    options: &CountOptions,
) -> Result<HashMap<Vec<bool>, f64>> {
    let physical = circuit.to_physical()?;
    let raw = backend.get_counts(&physical, options.n_shots)?;
    if raw.is_empty() {
        return Err(Error::EmptyResult);
    }

    let total: f64 = raw.values().sum::<u64>() as f64;
    let mut counts: HashMap<Vec<bool>, f64> = raw
        .into_iter()
        .map(|(bits, count)| {
            let value = if options.normalize {
                count as f64 / total
            } else {
                count as f64
            };
            (bits, value)
        })
        .collect();

    if options.post_select {
        let selection = physical.post_selection();
        counts = counts
            .into_iter()
            .filter(|(bits, _)| {
                selection
                    .iter()
                    .all(|(index, value)| bits.get(*index) == Some(value))
            })
            .map(|(bits, count)| {
                let kept: Vec<bool> = bits
                    .iter()
                    .enumerate()
                    .filter(|(index, _)| !selection.contains_key(index))
                    .map(|(_, bit)| *bit)
                    .collect();
                (kept, count)
            })
            .collect();
    }

    if options.scale {
        let weight = physical.scalar().norm_sqr();
        for value in counts.values_mut() {
            *value *= weight;
        }
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods_record_commands() {
        let mut circuit = PhysicalCircuit::new(2, 0);
        circuit.h(0);
        circuit.cx(0, 1);
        let bit = circuit.add_bit();
        circuit.measure(1, bit);
        assert_eq!(circuit.commands().len(), 3);
        assert_eq!(circuit.commands()[1].op, PhysicalOp::CX);
        assert_eq!(circuit.n_bits(), 1);
    }

    #[test]
    fn test_renaming_is_pure_and_total() {
        let mut circuit = PhysicalCircuit::new(2, 1);
        circuit.cx(0, 1);
        circuit.measure(0, 0);
        circuit.post_select(0, true);

        let remap: BTreeMap<usize, usize> = [(0, 2), (1, 0)].into_iter().collect();
        let renamed = circuit.clone().renamed_qubits(&remap);
        assert_eq!(renamed.commands()[0].qubits, vec![2, 0]);
        // Bits untouched by qubit renaming
        assert_eq!(renamed.commands()[1].bits, vec![0]);

        let bit_remap: BTreeMap<usize, usize> = [(0, 3)].into_iter().collect();
        let renamed = circuit.renamed_bits(&bit_remap);
        assert_eq!(renamed.commands()[1].bits, vec![3]);
        assert_eq!(renamed.post_selection().get(&3), Some(&true));
    }
}
