//! Diagram normalization
//!
//! A pull-based rewriting engine over a circuit's layer sequence. Phase one
//! strips bare scalar boxes into a running factor; phase two migrates state
//! boxes toward the input boundary under the interchange law, synthesizing
//! a crossing whenever a blocking box shares a wire. Each pull recomputes
//! the next canonical step; the sequence restarts only from its beginning.
//!
//! The symmetric pass for effect boxes (migration toward the output
//! boundary) is future work.

use num_complex::Complex64;
use tracing::debug;

use crate::circuit::boxes::CircuitBox;
use crate::circuit::diagram::{Circuit, Layer};

enum Stage {
    Scalars,
    Kets,
    Done,
}

/// Lazy normalization steps: each item is the rewritten diagram together
/// with the scalar accumulated so far.
pub struct Normalizer {
    diagram: Circuit,
    scalar: Complex64,
    stage: Stage,
}

impl Circuit {
    /// Start a fresh normalization pass over this circuit.
    pub fn normalize(&self) -> Normalizer {
        Normalizer {
            diagram: self.clone(),
            scalar: Complex64::new(1.0, 0.0),
            stage: Stage::Scalars,
        }
    }

    /// Run normalization to completion, returning the final diagram and the
    /// accumulated scalar.
    pub fn normal_form(&self) -> (Circuit, Complex64) {
        let mut result = (self.clone(), Complex64::new(1.0, 0.0));
        for step in self.normalize() {
            result = step;
        }
        result
    }
}

impl Normalizer {
    /// Index and value of the first bare scalar box, if any.
    fn find_scalar(&self) -> Option<(usize, Complex64)> {
        self.diagram.layers().iter().enumerate().find_map(|(i, layer)| {
            let boxed = layer.boxed();
            (boxed.dom().is_empty() && boxed.cod().is_empty())
                .then(|| boxed.scalar_value())
                .flatten()
                .map(|value| (i, value))
        })
    }

    /// Move the ket at layer `i` one step toward the input boundary.
    ///
    /// Returns the rewritten diagram, or None when neither an interchange
    /// nor a synthesized crossing is possible.
    fn move_ket(&self, i: usize) -> Option<Circuit> {
        if let Ok(moved) = self.diagram.interchange(i, i - 1) {
            debug!(layer = i, "ket interchanged toward boundary");
            return Some(moved);
        }
        let layer = &self.diagram.layers()[i];
        let boxed = layer.boxed();
        // Blocked: pull one identity wire from the left block under the ket
        // and cross them, which is algebraically the same placement but
        // eligible for interchange on the next step. Only a one-wire ket
        // fits the two-wire crossing.
        if boxed.cod().len() != 1 || layer.left() == 0 {
            return None;
        }
        let mut layers = self.diagram.layers().to_vec();
        let (left, right) = (layer.left(), layer.right());
        layers[i] = Layer::new(left - 1, boxed.clone(), right + 1);
        layers.insert(i + 1, Layer::new(left - 1, CircuitBox::swap(), right));
        debug!(layer = i, "ket blocked, crossing synthesized");
        Circuit::from_layers(self.diagram.dom(), layers).ok()
    }

    /// The earliest ket that still has a non-ket layer before it.
    fn find_candidate(&self) -> Option<usize> {
        let layers = self.diagram.layers();
        let settled = layers.iter().take_while(|l| l.boxed().is_ket()).count();
        (settled..layers.len()).find(|&i| layers[i].boxed().is_ket())
    }
}

impl Iterator for Normalizer {
    type Item = (Circuit, Complex64);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stage {
                Stage::Scalars => {
                    if let Some((index, value)) = self.find_scalar() {
                        let mut layers = self.diagram.layers().to_vec();
                        layers.remove(index);
                        // A zero-width box contributes no wires, so the
                        // remaining offsets still line up.
                        if let Ok(reduced) = Circuit::from_layers(self.diagram.dom(), layers) {
                            self.diagram = reduced;
                        }
                        self.scalar *= value;
                        debug!(%value, "scalar extracted");
                        return Some((self.diagram.clone(), self.scalar));
                    }
                    self.stage = Stage::Kets;
                }
                Stage::Kets => {
                    // Earliest blocking box first; a ket that can no longer
                    // move is skipped for the ones behind it.
                    let mut candidate = self.find_candidate();
                    while let Some(i) = candidate {
                        if let Some(moved) = self.move_ket(i) {
                            self.diagram = moved;
                            return Some((self.diagram.clone(), self.scalar));
                        }
                        candidate = self
                            .diagram
                            .layers()
                            .iter()
                            .enumerate()
                            .skip(i + 1)
                            .find(|(_, l)| l.boxed().is_ket())
                            .map(|(j, _)| j);
                    }
                    self.stage = Stage::Done;
                }
                Stage::Done => return None,
            }
        }
    }
}
