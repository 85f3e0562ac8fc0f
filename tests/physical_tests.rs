//physical_tests.rs

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use num_complex::Complex64;

    use plait::circuit::{Circuit, CircuitBox, GateSpec, WireKind};
    use plait::error::Error;
    use plait::physical::{get_counts, Backend, CountOptions, PhysicalCircuit, PhysicalOp};
    use plait::simulators::SamplingBackend;

    fn gate(b: CircuitBox) -> Circuit {
        Circuit::from_box(b)
    }

    #[test]
    fn test_gate_list_translation() {
        let circuit = gate(CircuitBox::rz(0.25))
            .tensor(&Circuit::id(1))
            .compose(&Circuit::id(1).tensor(&gate(CircuitBox::rx(0.125))))
            .unwrap()
            .compose(&gate(CircuitBox::cx()))
            .unwrap();
        let physical = circuit.to_physical().unwrap();
        assert_eq!(physical.n_qubits(), 2);

        let ops: Vec<&PhysicalOp> = physical.commands().iter().map(|c| &c.op).collect();
        // Turns convert to half-turns on the way out.
        assert_eq!(ops[0], &PhysicalOp::Rz(0.5));
        assert_eq!(ops[1], &PhysicalOp::Rx(0.25));
        assert_eq!(ops[2], &PhysicalOp::CX);
        assert_eq!(physical.commands()[2].qubits, vec![0, 1]);
    }

    #[test]
    fn test_state_preparation_allocates_and_flips() {
        let circuit = gate(CircuitBox::ket(&[true, false]));
        let physical = circuit.to_physical().unwrap();
        assert_eq!(physical.n_qubits(), 2);
        // One flip for the single 1 bit.
        assert_eq!(physical.commands().len(), 1);
        assert_eq!(physical.commands()[0].op, PhysicalOp::X);
        assert_eq!(physical.commands()[0].qubits, vec![0]);
    }

    #[test]
    fn test_mid_circuit_preparation_renumbers() {
        // Two existing wires with a fresh wire prepared between them: the
        // allocation renumbers every index above the insertion point, and
        // commands recorded earlier survive the remap.
        let circuit = gate(CircuitBox::h())
            .tensor(&gate(CircuitBox::h()))
            .compose(
                &Circuit::id(1)
                    .tensor(&gate(CircuitBox::ket(&[false])))
                    .tensor(&Circuit::id(1)),
            )
            .unwrap()
            .compose(&Circuit::id(2).tensor(&gate(CircuitBox::x())))
            .unwrap();
        let physical = circuit.to_physical().unwrap();
        assert_eq!(physical.n_qubits(), 3);

        let ops: Vec<&PhysicalOp> = physical.commands().iter().map(|c| &c.op).collect();
        assert_eq!(ops, vec![&PhysicalOp::H, &PhysicalOp::H, &PhysicalOp::X]);
        // The lower wire stayed at register 0; the upper one moved to 2,
        // and its earlier H command was renamed with it.
        assert_eq!(physical.commands()[0].qubits, vec![0]);
        assert_eq!(physical.commands()[1].qubits, vec![2]);
        assert_eq!(physical.commands()[2].qubits, vec![2]);
    }

    #[test]
    fn test_effect_records_post_selection() {
        let circuit = gate(CircuitBox::ket(&[false]))
            .compose(&gate(CircuitBox::h()))
            .unwrap()
            .compose(&gate(CircuitBox::bra(&[true])))
            .unwrap();
        let physical = circuit.to_physical().unwrap();
        assert_eq!(physical.n_bits(), 1);
        assert_eq!(physical.post_selection().get(&0), Some(&true));
        assert!(physical
            .commands()
            .iter()
            .any(|c| c.op == PhysicalOp::Measure));
    }

    #[test]
    fn test_plain_measurement_keeps_bit_open() {
        let circuit = gate(CircuitBox::ket(&[false]))
            .compose(&gate(CircuitBox::measure()))
            .unwrap();
        let physical = circuit.to_physical().unwrap();
        assert_eq!(physical.n_bits(), 1);
        assert!(physical.post_selection().is_empty());
    }

    #[test]
    fn test_discard_emits_nothing() {
        let circuit = gate(CircuitBox::ket(&[false]))
            .compose(&gate(CircuitBox::discard()))
            .unwrap();
        let physical = circuit.to_physical().unwrap();
        assert!(physical.commands().is_empty());
    }

    #[test]
    fn test_swap_kinds() {
        // Qubit/qubit swaps become instructions; a qubit/bit swap is a
        // no-op because the registers are disjoint.
        let two_qubits = gate(CircuitBox::ket(&[false, false]))
            .compose(&gate(CircuitBox::swap()))
            .unwrap();
        let physical = two_qubits.to_physical().unwrap();
        assert_eq!(physical.commands().last().unwrap().op, PhysicalOp::Swap);

        let crossed = gate(CircuitBox::ket(&[false, false]))
            .compose(&gate(CircuitBox::measure()).tensor(&Circuit::id(1)))
            .unwrap()
            .compose(&gate(CircuitBox::swap_of(WireKind::Bit, WireKind::Qubit)))
            .unwrap();
        let physical = crossed.to_physical().unwrap();
        // Measure only; the cross-kind swap leaves no trace.
        assert_eq!(physical.commands().len(), 1);
    }

    #[test]
    fn test_zero_width_boxes_scale_the_circuit() {
        let circuit = gate(CircuitBox::x()).tensor(&gate(CircuitBox::sqrt(2.0)));
        let physical = circuit.to_physical().unwrap();
        assert!((physical.scalar().re - 2.0_f64.sqrt()).abs() < 1e-10);
        assert_eq!(physical.commands().len(), 1);
    }

    #[test]
    fn test_unknown_gate_is_fatal() {
        let circuit = gate(CircuitBox::generator("Oracle", 1, 1));
        match circuit.to_physical() {
            Err(Error::UnsupportedGate(name)) => assert_eq!(name, "Oracle"),
            other => panic!("expected unsupported gate, got {:?}", other),
        }
    }

    #[test]
    fn test_from_physical_bridges_non_adjacent_wires() {
        let mut physical = PhysicalCircuit::new(3, 0);
        physical.cx(0, 2);
        let circuit = Circuit::from_physical(&physical).unwrap();
        // One crossing before, the gate, and the exact inverse after.
        let names: Vec<String> = circuit.boxes().map(|b| b.name()).collect();
        assert_eq!(names, vec!["SWAP", "CX", "SWAP"]);
        // The bridged circuit has the same action as CX on wires 0 and 2.
        let direct = gate(CircuitBox::cx())
            .tensor(&Circuit::id(1))
            .eval()
            .unwrap();
        assert_ne!(circuit.eval().unwrap(), direct);
        assert_eq!(circuit.dom().len(), 3);
    }

    #[test]
    fn test_from_physical_source_below_target() {
        // Control sits above the target register: the symmetric bridging
        // branch bubbles it down past the control.
        let mut physical = PhysicalCircuit::new(2, 0);
        physical.cx(1, 0);
        let circuit = Circuit::from_physical(&physical).unwrap();
        let names: Vec<String> = circuit.boxes().map(|b| b.name()).collect();
        assert_eq!(names, vec!["SWAP", "CX", "SWAP"]);
        // CX with control below ≡ swap, CX, swap.
        let expected = gate(CircuitBox::swap())
            .compose(&gate(CircuitBox::cx()))
            .unwrap()
            .compose(&gate(CircuitBox::swap()))
            .unwrap();
        assert_eq!(circuit.eval().unwrap(), expected.eval().unwrap());
    }

    #[test]
    fn test_constrained_measurement_lowers_to_effect() {
        let mut physical = PhysicalCircuit::new(1, 0);
        physical.h(0);
        let bit = physical.add_bit();
        physical.measure(0, bit);
        physical.post_select(bit, true);

        let circuit = Circuit::from_physical(&physical).unwrap();
        assert_eq!(circuit.cod().len(), 0);
        assert!(circuit.boxes().any(|b| b.is_bra()));
    }

    #[test]
    fn test_instruction_scalar_lowers_to_trailing_box() {
        let mut physical = PhysicalCircuit::new(1, 0);
        physical.x(0);
        physical.scale(Complex64::new(0.0, 1.0));
        let circuit = Circuit::from_physical(&physical).unwrap();
        let last = circuit.layers().last().unwrap().boxed();
        assert_eq!(last.scalar_value(), Some(Complex64::new(0.0, 1.0)));
    }

    #[test]
    fn test_round_trip_on_seeded_random_circuits() {
        let gateset = [
            GateSpec::Fixed(CircuitBox::cx()),
            GateSpec::Fixed(CircuitBox::h()),
            GateSpec::Fixed(CircuitBox::swap()),
            GateSpec::Rz,
            GateSpec::Rx,
        ];
        for n_wires in 1..=4 {
            for depth in 1..=5 {
                let seed = (n_wires * 31 + depth) as u64;
                let circuit = Circuit::random(n_wires, depth, &gateset, seed).unwrap();
                let physical = circuit.to_physical().unwrap();
                let back = Circuit::from_physical(&physical).unwrap();
                assert_eq!(
                    back.normal_form(),
                    circuit.normal_form(),
                    "round trip failed for width {} depth {}",
                    n_wires,
                    depth
                );
            }
        }
    }

    #[test]
    fn test_counts_from_sampling_backend() {
        let bell = gate(CircuitBox::ket(&[false, false]))
            .compose(&gate(CircuitBox::h()).tensor(&Circuit::id(1)))
            .unwrap()
            .compose(&gate(CircuitBox::cx()))
            .unwrap()
            .compose(&gate(CircuitBox::measure()).tensor(&gate(CircuitBox::measure())))
            .unwrap();

        let backend = SamplingBackend::new(5);
        let counts = get_counts(&bell, &backend, &CountOptions::default()).unwrap();
        assert!(counts.keys().all(|bits| bits[0] == bits[1]));
        let total: f64 = counts.values().sum();
        assert!((total - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_counts_apply_post_selection() {
        let circuit = gate(CircuitBox::ket(&[false]))
            .compose(&gate(CircuitBox::h()))
            .unwrap()
            .compose(&gate(CircuitBox::bra(&[false])))
            .unwrap();

        let backend = SamplingBackend::new(9);
        let options = CountOptions {
            n_shots: 1 << 12,
            ..CountOptions::default()
        };
        let counts = get_counts(&circuit, &backend, &options).unwrap();
        // The selected bit is projected out, leaving the empty readout with
        // roughly half the weight.
        assert_eq!(counts.len(), 1);
        let kept = counts.get(&Vec::new()).copied().unwrap();
        assert!((0.4..0.6).contains(&kept), "kept weight {}", kept);
    }

    #[test]
    fn test_counts_rescale_by_scalar() {
        let circuit = gate(CircuitBox::ket(&[false]))
            .compose(&gate(CircuitBox::measure()))
            .unwrap()
            .tensor(&gate(CircuitBox::sqrt(2.0)));

        let backend = SamplingBackend::new(2);
        let counts = get_counts(&circuit, &backend, &CountOptions::default()).unwrap();
        let total: f64 = counts.values().sum();
        assert!((total - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_backend_result_is_an_error() {
        struct SilentBackend;
        impl Backend for SilentBackend {
            fn get_counts(
                &self,
                _circuit: &PhysicalCircuit,
                _n_shots: u64,
            ) -> plait::Result<HashMap<Vec<bool>, u64>> {
                Ok(HashMap::new())
            }
        }

        let circuit = gate(CircuitBox::ket(&[false]))
            .compose(&gate(CircuitBox::measure()))
            .unwrap();
        match get_counts(&circuit, &SilentBackend, &CountOptions::default()) {
            Err(Error::EmptyResult) => {}
            other => panic!("expected empty result, got {:?}", other),
        }
    }
}
