//normalize_tests.rs

#[cfg(test)]
mod tests {
    use num_complex::Complex64;

    use plait::circuit::{Circuit, CircuitBox};

    fn gate(b: CircuitBox) -> Circuit {
        Circuit::from_box(b)
    }

    fn scalar(re: f64) -> Circuit {
        gate(CircuitBox::scalar(Complex64::new(re, 0.0)))
    }

    #[test]
    fn test_scalar_only_diagram_reduces_to_empty() {
        let circuit = scalar(2.0).tensor(&scalar(3.0)).tensor(&scalar(0.5));
        let steps: Vec<_> = circuit.normalize().collect();
        assert_eq!(steps.len(), 3);

        // Intermediate scalars accumulate as factors are removed.
        assert_eq!(steps[0].1, Complex64::new(2.0, 0.0));
        assert_eq!(steps[1].1, Complex64::new(6.0, 0.0));
        assert_eq!(steps[2].1, Complex64::new(3.0, 0.0));

        let (reduced, factor) = steps.last().unwrap().clone();
        assert!(reduced.layers().is_empty());
        assert_eq!(factor, Complex64::new(3.0, 0.0));
    }

    #[test]
    fn test_scalar_extraction_is_idempotent() {
        let circuit = scalar(2.0).tensor(&scalar(5.0));
        let (form, factor) = circuit.normal_form();
        assert!(form.layers().is_empty());
        let (again, factor_again) = form.normal_form();
        assert!(again.layers().is_empty());
        assert_eq!(factor_again, Complex64::new(1.0, 0.0));
        assert_eq!(factor, Complex64::new(10.0, 0.0));
    }

    #[test]
    fn test_scalars_inside_wider_diagram() {
        let circuit = gate(CircuitBox::h())
            .tensor(&scalar(2.0))
            .compose(&gate(CircuitBox::x()).tensor(&scalar(3.0)))
            .unwrap();
        let (form, factor) = circuit.normal_form();
        assert_eq!(factor, Complex64::new(6.0, 0.0));
        assert!(form.boxes().all(|b| b.scalar_value().is_none()));
        assert_eq!(form.layers().len(), 2);
    }

    #[test]
    fn test_each_pull_recomputes_from_start() {
        let circuit = scalar(2.0).tensor(&scalar(3.0));
        let mut first = circuit.normalize();
        let mut second = circuit.normalize();
        // Two independent iterators over the same circuit agree step by
        // step; consuming one does not advance the other.
        assert_eq!(first.next(), second.next());
        assert_eq!(first.next(), second.next());
        assert_eq!(first.next(), None);
        assert_eq!(second.next(), None);
    }

    #[test]
    fn test_ket_migrates_to_input_boundary() {
        // A gate on an existing wire followed by a fresh prepared wire: the
        // preparation commutes to the front.
        let circuit = gate(CircuitBox::h())
            .compose(&Circuit::id(1).tensor(&gate(CircuitBox::ket(&[true]))))
            .unwrap();
        let (form, _) = circuit.normal_form();
        assert!(form.layers()[0].boxed().is_ket());
        // Meaning is preserved.
        assert_eq!(form.eval().unwrap(), circuit.eval().unwrap());
    }

    #[test]
    fn test_blocked_ket_crosses_past_entangler() {
        // The ket lands strictly inside the entangler's wire range, so the
        // engine inserts a crossing before it can commute.
        let circuit = gate(CircuitBox::cx())
            .compose(
                &Circuit::id(1)
                    .tensor(&gate(CircuitBox::ket(&[false])))
                    .tensor(&Circuit::id(1)),
            )
            .unwrap();
        let steps: Vec<_> = circuit.normalize().collect();
        assert!(steps.len() >= 2);
        let (form, _) = steps.last().unwrap().clone();
        assert!(form.layers()[0].boxed().is_ket());
        assert_eq!(form.eval().unwrap(), circuit.eval().unwrap());
    }

    #[test]
    fn test_mixed_scalars_and_kets() {
        let circuit = gate(CircuitBox::x())
            .tensor(&scalar(2.0))
            .compose(&Circuit::id(1).tensor(&gate(CircuitBox::ket(&[false]))))
            .unwrap();
        let (form, factor) = circuit.normal_form();
        assert_eq!(factor, Complex64::new(2.0, 0.0));
        assert!(form.layers()[0].boxed().is_ket());
    }

    #[test]
    fn test_unitary_diagram_yields_no_steps() {
        let circuit = gate(CircuitBox::h())
            .tensor(&Circuit::id(1))
            .compose(&gate(CircuitBox::cx()))
            .unwrap();
        assert_eq!(circuit.normalize().count(), 0);
    }
}
