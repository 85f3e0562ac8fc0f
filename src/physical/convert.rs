//! Translation between diagrams and physical circuits
//!
//! `to_physical` walks a circuit's layers left to right, threading a
//! register state that records which physical resource currently realizes
//! each logical wire. `from_physical` rebuilds a diagram from a command
//! list, bridging non-adjacent operands with synthesized crossings so that
//! every logical box acts on adjacent wires.

use std::collections::BTreeMap;

use num_complex::Complex64;
use tracing::debug;

use crate::circuit::boxes::{BoxKind, CircuitBox, Dagger, RotationAxis, WireKind};
use crate::circuit::diagram::Circuit;
use crate::error::{Error, Result};
use crate::physical::{PhysicalCircuit, PhysicalOp};

/// Which physical index realizes each wire of the current cut. Created at
/// the start of a translation pass and discarded at its end.
struct RegisterState {
    kinds: Vec<WireKind>,
    qubits: Vec<usize>,
    bits: Vec<usize>,
}

impl RegisterState {
    fn fresh(n_qubits: usize) -> Self {
        RegisterState {
            kinds: vec![WireKind::Qubit; n_qubits],
            qubits: (0..n_qubits).collect(),
            bits: Vec::new(),
        }
    }

    /// How many wires of the given kind sit strictly left of `position`.
    fn count_before(&self, position: usize, kind: WireKind) -> usize {
        self.kinds[..position].iter().filter(|k| **k == kind).count()
    }

    fn qubit(&self, index: usize) -> Result<usize> {
        self.qubits
            .get(index)
            .copied()
            .ok_or(Error::TypeMismatch(index, self.qubits.len()))
    }
}

impl Circuit {
    /// Compile this circuit into a register-based physical circuit.
    ///
    /// Domain wires are realized by qubit registers 0..dom allocated up
    /// front; the physical model starts from an all-zero register, so state
    /// boxes allocate fresh positions and flip every 1 bit explicitly.
    pub fn to_physical(&self) -> Result<PhysicalCircuit> {
        let n = self.dom().len();
        let mut physical = PhysicalCircuit::new(n, 0);
        let mut state = RegisterState::fresh(n);

        for layer in self.layers() {
            let left = layer.left();
            let boxed = layer.boxed();
            let left_q = state.count_before(left, WireKind::Qubit);
            let left_b = left - left_q;

            match boxed.kind() {
                BoxKind::Ket(bits) => {
                    let width = bits.len();
                    // Fresh positions open just after the nearest qubit on
                    // the left, or at the top of the register when there is
                    // none; everything above shifts up by the new width.
                    let start = if left_q > 0 {
                        state.qubit(left_q - 1)? + 1
                    } else {
                        physical.n_qubits()
                    };
                    let remap: BTreeMap<usize, usize> = (start..physical.n_qubits())
                        .map(|i| (i, i + width))
                        .collect();
                    physical = physical.renamed_qubits(&remap);
                    physical.add_blank_qubits(width);
                    for q in state.qubits.iter_mut() {
                        if *q >= start {
                            *q += width;
                        }
                    }
                    for (j, bit) in bits.iter().enumerate() {
                        state.qubits.insert(left_q + j, start + j);
                        state.kinds.insert(left + j, WireKind::Qubit);
                        if *bit {
                            physical.x(start + j);
                        }
                    }
                    debug!(width, start, "state box allocated");
                }
                BoxKind::Bra(bits) => {
                    for (j, value) in bits.iter().enumerate() {
                        let bit_index = physical.add_bit();
                        physical.measure(state.qubit(left_q + j)?, bit_index);
                        physical.post_select(bit_index, *value);
                    }
                    for _ in 0..bits.len() {
                        state.qubits.remove(left_q);
                        state.kinds.remove(left);
                    }
                }
                BoxKind::Measure => {
                    let bit_index = physical.add_bit();
                    physical.measure(state.qubit(left_q)?, bit_index);
                    state.qubits.remove(left_q);
                    state.bits.insert(left_b, bit_index);
                    state.kinds[left] = WireKind::Bit;
                }
                BoxKind::Discard => {
                    match state.kinds[left] {
                        WireKind::Qubit => {
                            state.qubits.remove(left_q);
                        }
                        WireKind::Bit => {
                            state.bits.remove(left_b);
                        }
                    }
                    state.kinds.remove(left);
                }
                BoxKind::Swap(_, _) => match (state.kinds[left], state.kinds[left + 1]) {
                    (WireKind::Qubit, WireKind::Qubit) => {
                        physical.swap(state.qubit(left_q)?, state.qubit(left_q + 1)?);
                    }
                    (WireKind::Bit, WireKind::Bit) => {
                        physical.swap_bits(state.bits[left_b], state.bits[left_b + 1]);
                    }
                    // The two register kinds are physically disjoint, so a
                    // cross-kind swap only reorders the bookkeeping.
                    _ => state.kinds.swap(left, left + 1),
                },
                BoxKind::Scalar(value) => physical.scale(*value),
                BoxKind::Rotation { axis, phase } => {
                    // Turn convention here, half-turn convention there.
                    let half_turns = 2.0 * phase;
                    match axis {
                        RotationAxis::Rx => physical.rx(state.qubit(left_q)?, half_turns),
                        RotationAxis::Rz => physical.rz(state.qubit(left_q)?, half_turns),
                        RotationAxis::CRz => physical.crz(
                            state.qubit(left_q)?,
                            state.qubit(left_q + 1)?,
                            half_turns,
                        ),
                    }
                }
                BoxKind::Gate { name, .. } => {
                    if let Some(value) = boxed.scalar_value() {
                        physical.scale(value);
                        continue;
                    }
                    if boxed.orientation() == Dagger::Reversed {
                        return Err(Error::UnsupportedGate(boxed.name()));
                    }
                    match name.as_str() {
                        "X" => physical.x(state.qubit(left_q)?),
                        "Y" => physical.y(state.qubit(left_q)?),
                        "Z" => physical.z(state.qubit(left_q)?),
                        "H" => physical.h(state.qubit(left_q)?),
                        "S" => physical.s(state.qubit(left_q)?),
                        "T" => physical.t(state.qubit(left_q)?),
                        "CX" => physical.cx(state.qubit(left_q)?, state.qubit(left_q + 1)?),
                        "CZ" => physical.cz(state.qubit(left_q)?, state.qubit(left_q + 1)?),
                        _ => return Err(Error::UnsupportedGate(name.clone())),
                    }
                }
            }
        }
        Ok(physical)
    }

    /// Decompile a physical circuit back into a diagram.
    pub fn from_physical(physical: &PhysicalCircuit) -> Result<Circuit> {
        let n = physical.n_qubits();
        let mut circuit = Circuit::id(n);
        let mut kinds: Vec<WireKind> = vec![WireKind::Qubit; n];
        // Logical position currently carrying each physical index, or None
        // once the wire has been closed.
        let mut qubit_pos: Vec<Option<usize>> = (0..n).map(Some).collect();
        let mut bit_pos: Vec<Option<usize>> = vec![None; physical.n_bits()];

        for command in physical.commands() {
            match &command.op {
                PhysicalOp::Measure => {
                    let q = command.qubits[0];
                    let b = command.bits[0];
                    let position = resolve(&qubit_pos, q, "Measure")?;
                    if let Some(value) = physical.post_selection().get(&b) {
                        // A constrained measurement closes the wire with the
                        // recorded literal value.
                        let effect = CircuitBox::bra(&[*value]);
                        circuit = circuit.compose(&wire_layer(kinds.len(), position, effect))?;
                        kinds.remove(position);
                        qubit_pos[q] = None;
                        shift_down(&mut qubit_pos, position);
                        shift_down(&mut bit_pos, position);
                    } else {
                        circuit = circuit
                            .compose(&wire_layer(kinds.len(), position, CircuitBox::measure()))?;
                        kinds[position] = WireKind::Bit;
                        qubit_pos[q] = None;
                        if let Some(slot) = bit_pos.get_mut(b) {
                            *slot = Some(position);
                        }
                    }
                }
                PhysicalOp::SwapBits => {
                    let pa = resolve(&bit_pos, command.bits[0], "SwapBits")?;
                    let pb = resolve(&bit_pos, command.bits[1], "SwapBits")?;
                    circuit = insert_bridged(
                        circuit,
                        &kinds,
                        CircuitBox::swap_of(WireKind::Bit, WireKind::Bit),
                        pa,
                        pb,
                    )?;
                }
                PhysicalOp::Rx(half_turns) => {
                    let position = resolve(&qubit_pos, command.qubits[0], "Rx")?;
                    circuit = circuit.compose(&wire_layer(
                        kinds.len(),
                        position,
                        CircuitBox::rx(half_turns / 2.0),
                    ))?;
                }
                PhysicalOp::Rz(half_turns) => {
                    let position = resolve(&qubit_pos, command.qubits[0], "Rz")?;
                    circuit = circuit.compose(&wire_layer(
                        kinds.len(),
                        position,
                        CircuitBox::rz(half_turns / 2.0),
                    ))?;
                }
                PhysicalOp::CRz(half_turns) => {
                    let pa = resolve(&qubit_pos, command.qubits[0], "CRz")?;
                    let pb = resolve(&qubit_pos, command.qubits[1], "CRz")?;
                    circuit = insert_bridged(
                        circuit,
                        &kinds,
                        CircuitBox::crz(half_turns / 2.0),
                        pa,
                        pb,
                    )?;
                }
                PhysicalOp::Swap => {
                    let pa = resolve(&qubit_pos, command.qubits[0], "Swap")?;
                    let pb = resolve(&qubit_pos, command.qubits[1], "Swap")?;
                    circuit = insert_bridged(circuit, &kinds, CircuitBox::swap(), pa, pb)?;
                }
                PhysicalOp::CX | PhysicalOp::CZ => {
                    let name = op_name(&command.op);
                    let boxed = if matches!(command.op, PhysicalOp::CX) {
                        CircuitBox::cx()
                    } else {
                        CircuitBox::cz()
                    };
                    let pa = resolve(&qubit_pos, command.qubits[0], name)?;
                    let pb = resolve(&qubit_pos, command.qubits[1], name)?;
                    circuit = insert_bridged(circuit, &kinds, boxed, pa, pb)?;
                }
                op => {
                    let boxed = match op {
                        PhysicalOp::X => CircuitBox::x(),
                        PhysicalOp::Y => CircuitBox::y(),
                        PhysicalOp::Z => CircuitBox::z(),
                        PhysicalOp::H => CircuitBox::h(),
                        PhysicalOp::S => CircuitBox::s(),
                        PhysicalOp::T => CircuitBox::t(),
                        _ => return Err(Error::UnsupportedGate(op_name(op).to_string())),
                    };
                    let position = resolve(&qubit_pos, command.qubits[0], op_name(op))?;
                    circuit = circuit.compose(&wire_layer(kinds.len(), position, boxed))?;
                }
            }
        }

        if physical.scalar() != Complex64::new(1.0, 0.0) {
            // An instruction-level scalar lowers to a trailing zero-width box.
            circuit = circuit.tensor(&Circuit::from_box(CircuitBox::scalar(physical.scalar())));
        }
        Ok(circuit)
    }
}

fn op_name(op: &PhysicalOp) -> &'static str {
    match op {
        PhysicalOp::X => "X",
        PhysicalOp::Y => "Y",
        PhysicalOp::Z => "Z",
        PhysicalOp::H => "H",
        PhysicalOp::S => "S",
        PhysicalOp::T => "T",
        PhysicalOp::CX => "CX",
        PhysicalOp::CZ => "CZ",
        PhysicalOp::Swap => "SWAP",
        PhysicalOp::SwapBits => "SwapBits",
        PhysicalOp::Rx(_) => "Rx",
        PhysicalOp::Rz(_) => "Rz",
        PhysicalOp::CRz(_) => "CRz",
        PhysicalOp::Measure => "Measure",
    }
}

fn resolve(positions: &[Option<usize>], index: usize, name: &str) -> Result<usize> {
    positions
        .get(index)
        .copied()
        .flatten()
        .ok_or_else(|| Error::UnsupportedGate(name.to_string()))
}

/// Decrement every recorded position above a removed wire.
fn shift_down(positions: &mut [Option<usize>], removed: usize) {
    for slot in positions.iter_mut() {
        if let Some(p) = slot {
            if *p > removed {
                *p -= 1;
            }
        }
    }
}

/// A single box on the wire at `position` inside a cut of `width` wires.
fn wire_layer(width: usize, position: usize, boxed: CircuitBox) -> Circuit {
    let span = boxed.dom().len();
    Circuit::id(position)
        .tensor(&Circuit::from_box(boxed))
        .tensor(&Circuit::id(width - position - span))
}

/// Insert a two-wire box acting on positions (pa, pb), synthesizing
/// bridging crossings before it and their exact inverses after when the
/// operands are not adjacent.
fn insert_bridged(
    circuit: Circuit,
    kinds: &[WireKind],
    boxed: CircuitBox,
    pa: usize,
    pb: usize,
) -> Result<Circuit> {
    let width = kinds.len();
    let mut swaps = Circuit::id(width);
    let mut order: Vec<WireKind> = kinds.to_vec();

    let offset = if pb == pa + 1 {
        pa
    } else if pb > pa + 1 {
        // Bubble the second operand up until it sits just below the first.
        for k in (pa + 1..pb).rev() {
            swaps = swaps.compose(&crossing_layer(&order, k))?;
            order.swap(k, k + 1);
        }
        pa
    } else if pb < pa {
        // Second operand above the first: bubble it down past the first,
        // which shifts the first operand up by one. Symmetric counterpart
        // of the case above.
        for k in pb..pa {
            swaps = swaps.compose(&crossing_layer(&order, k))?;
            order.swap(k, k + 1);
        }
        pa - 1
    } else {
        return Err(Error::UnsupportedGate(boxed.name()));
    };

    debug!(pa, pb, offset, swaps = swaps.layers().len(), "bridged insertion");
    let layer = Circuit::id(offset)
        .tensor(&Circuit::from_box(boxed))
        .tensor(&Circuit::id(width - offset - 2));
    circuit
        .compose(&swaps)?
        .compose(&layer)?
        .compose(&swaps.dagger())
}

/// A crossing of the wires at positions k and k+1, kinds taken from the
/// current order.
fn crossing_layer(order: &[WireKind], k: usize) -> Circuit {
    Circuit::id(k)
        .tensor(&Circuit::from_box(CircuitBox::swap_of(order[k], order[k + 1])))
        .tensor(&Circuit::id(order.len() - k - 2))
}
