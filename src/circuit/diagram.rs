//! Circuits as layered diagrams
//!
//! A circuit is an ordered sequence of layers, each placing one box at a
//! horizontal offset between two blocks of identity wires. Composition,
//! tensor and dagger always produce new circuits; values are immutable
//! once built.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::prelude::*;
use crate::circuit::boxes::{BoxKind, CircuitBox};
use crate::circuit::pro::Pro;
use crate::error::{Error, Result};

/// One box at an offset inside a wider diagram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    left: usize,
    boxed: CircuitBox,
    right: usize,
}

impl Layer {
    pub fn new(left: usize, boxed: CircuitBox, right: usize) -> Self {
        Layer { left, boxed, right }
    }

    /// Width of the identity block left of the box.
    pub fn left(&self) -> usize {
        self.left
    }

    /// Width of the identity block right of the box.
    pub fn right(&self) -> usize {
        self.right
    }

    pub fn boxed(&self) -> &CircuitBox {
        &self.boxed
    }

    /// Total width entering this layer.
    pub fn width_in(&self) -> usize {
        self.left + self.boxed.dom().len() + self.right
    }

    /// Total width leaving this layer.
    pub fn width_out(&self) -> usize {
        self.left + self.boxed.cod().len() + self.right
    }

    fn dagger(&self) -> Layer {
        Layer {
            left: self.left,
            boxed: self.boxed.dagger_box(),
            right: self.right,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.left > 0 {
            parts.push(format!("Id({})", self.left));
        }
        parts.push(self.boxed.name());
        if self.right > 0 {
            parts.push(format!("Id({})", self.right));
        }
        write!(f, "{}", parts.join(" @ "))
    }
}

/// A quantum circuit: a morphism of the wire-count category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    dom: Pro,
    cod: Pro,
    layers: Vec<Layer>,
}

impl Circuit {
    /// The identity circuit on n wires.
    pub fn id(n: usize) -> Self {
        Circuit {
            dom: Pro(n),
            cod: Pro(n),
            layers: Vec::new(),
        }
    }

    /// The one-layer circuit holding a single box.
    pub fn from_box(boxed: CircuitBox) -> Self {
        Circuit {
            dom: boxed.dom(),
            cod: boxed.cod(),
            layers: vec![Layer::new(0, boxed, 0)],
        }
    }

    /// Rebuild a circuit from raw parts, checking the width invariant of
    /// every layer against its running total.
    pub fn from_layers(dom: Pro, layers: Vec<Layer>) -> Result<Self> {
        let mut width = dom.len();
        for layer in &layers {
            if layer.width_in() != width {
                return Err(Error::TypeMismatch(width, layer.width_in()));
            }
            width = layer.width_out();
        }
        Ok(Circuit { dom, cod: Pro(width), layers })
    }

    pub fn dom(&self) -> Pro {
        self.dom
    }

    pub fn cod(&self) -> Pro {
        self.cod
    }

    /// Ordered access to the layer sequence.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The boxes of this circuit in layer order.
    pub fn boxes(&self) -> impl Iterator<Item = &CircuitBox> {
        self.layers.iter().map(Layer::boxed)
    }

    /// When this circuit is exactly one box spanning its full width, expose
    /// the box-level view.
    pub fn as_box(&self) -> Option<&CircuitBox> {
        match self.layers.as_slice() {
            [layer] if layer.left() == 0 && layer.right() == 0 => Some(layer.boxed()),
            _ => None,
        }
    }

    /// Sequential composition: first `self`, then `other`.
    pub fn compose(&self, other: &Circuit) -> Result<Circuit> {
        if self.cod != other.dom {
            return Err(Error::TypeMismatch(self.cod.len(), other.dom.len()));
        }
        let mut layers = self.layers.clone();
        layers.extend(other.layers.iter().cloned());
        Ok(Circuit {
            dom: self.dom,
            cod: other.cod,
            layers,
        })
    }

    /// Parallel composition. Always legal; the second operand's offsets are
    /// shifted past this circuit's codomain.
    ///
    /// Two bare basis boxes of the same orientation fuse into one wider
    /// basis box with the concatenated bitstring.
    pub fn tensor(&self, other: &Circuit) -> Circuit {
        if let (Some(a), Some(b)) = (self.as_box(), other.as_box()) {
            match (a.kind(), b.kind()) {
                (BoxKind::Ket(x), BoxKind::Ket(y)) => {
                    let bits: Vec<bool> = x.iter().chain(y.iter()).copied().collect();
                    return Circuit::from_box(CircuitBox::ket(&bits));
                }
                (BoxKind::Bra(x), BoxKind::Bra(y)) => {
                    let bits: Vec<bool> = x.iter().chain(y.iter()).copied().collect();
                    return Circuit::from_box(CircuitBox::bra(&bits));
                }
                _ => {}
            }
        }

        let mut layers: Vec<Layer> = self
            .layers
            .iter()
            .map(|layer| Layer::new(layer.left(), layer.boxed().clone(), layer.right() + other.dom.len()))
            .collect();
        layers.extend(other.layers.iter().map(|layer| {
            Layer::new(layer.left() + self.cod.len(), layer.boxed().clone(), layer.right())
        }));
        Circuit {
            dom: self.dom.tensor(&other.dom),
            cod: self.cod.tensor(&other.cod),
            layers,
        }
    }

    /// The adjoint circuit: layers reversed, every box daggered, domain and
    /// codomain swapped.
    pub fn dagger(&self) -> Circuit {
        Circuit {
            dom: self.cod,
            cod: self.dom,
            layers: self.layers.iter().rev().map(Layer::dagger).collect(),
        }
    }

    /// Exchange the adjacent layers i and j (j = i ± 1).
    ///
    /// Succeeds only when the two boxes occupy disjoint wire ranges; fails
    /// with InterchangeError when they share a wire.
    pub fn interchange(&self, i: usize, j: usize) -> Result<Circuit> {
        if !(j == i + 1 || i == j + 1) || i.max(j) >= self.layers.len() {
            return Err(Error::InterchangeError(i, j));
        }
        let m = i.min(j);
        let a = &self.layers[m];
        let b = &self.layers[m + 1];

        let (la, ra) = (a.left(), a.right());
        let (dom_a, cod_a) = (a.boxed().dom().len(), a.boxed().cod().len());
        let lb = b.left();
        let (dom_b, cod_b) = (b.boxed().dom().len(), b.boxed().cod().len());
        let width_in = a.width_in();

        let (first, second) = if lb + dom_b <= la {
            // b lies entirely left of a
            let first = Layer::new(lb, b.boxed().clone(), width_in - lb - dom_b);
            let second = Layer::new(la - dom_b + cod_b, a.boxed().clone(), ra);
            (first, second)
        } else if lb >= la + cod_a {
            // b lies entirely right of a
            let first = Layer::new(lb - cod_a + dom_a, b.boxed().clone(), b.right());
            let second = Layer::new(la, a.boxed().clone(), ra - dom_b + cod_b);
            (first, second)
        } else {
            return Err(Error::InterchangeError(i, j));
        };

        let mut layers = self.layers.clone();
        layers[m] = first;
        layers[m + 1] = second;
        Ok(Circuit {
            dom: self.dom,
            cod: self.cod,
            layers,
        })
    }

    /// Decompose the circuit into maximal slices in which no two boxes
    /// overlap wires. Composing the slices in order gives back the circuit.
    pub fn foliation(&self) -> Vec<Circuit> {
        let mut slices: Vec<Circuit> = Vec::new();
        let mut current: Vec<Layer> = Vec::new();
        let mut occupied: Vec<(usize, usize)> = Vec::new();
        let mut slice_dom = self.dom;
        let mut width = self.dom.len();

        let flush = |current: &mut Vec<Layer>, slice_dom: &mut Pro, width: usize, slices: &mut Vec<Circuit>| {
            if !current.is_empty() {
                slices.push(Circuit {
                    dom: *slice_dom,
                    cod: Pro(width),
                    layers: std::mem::take(current),
                });
                *slice_dom = Pro(width);
            }
        };

        for layer in &self.layers {
            let boxed = layer.boxed();
            let span = boxed.dom().len().max(boxed.cod().len()).max(1);
            let interval = (layer.left(), layer.left() + span);
            let overlaps = occupied
                .iter()
                .any(|(lo, hi)| interval.0 < *hi && *lo < interval.1);
            // A shape-changing box shifts every later offset, so it closes
            // its slice.
            let square = boxed.dom() == boxed.cod();
            if overlaps {
                flush(&mut current, &mut slice_dom, width, &mut slices);
                occupied.clear();
            }
            occupied.push(interval);
            width = layer.width_out();
            current.push(layer.clone());
            if !square {
                flush(&mut current, &mut slice_dom, width, &mut slices);
                occupied.clear();
            }
        }
        flush(&mut current, &mut slice_dom, width, &mut slices);
        slices
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.layers.is_empty() {
            return write!(f, "Id({})", self.dom.len());
        }
        let rendered: Vec<String> = self.layers.iter().map(|l| l.to_string()).collect();
        write!(f, "{}", rendered.join(" >> "))
    }
}

/// The dagger monoidal category of wire counts and circuits.
#[derive(Clone, Debug, Default)]
pub struct CircuitCategory;

impl Category for CircuitCategory {
    type Object = Pro;
    type Morphism = Circuit;

    fn domain(&self, f: &Self::Morphism) -> Self::Object {
        f.dom()
    }

    fn codomain(&self, f: &Self::Morphism) -> Self::Object {
        f.cod()
    }

    fn identity(&self, obj: &Self::Object) -> Self::Morphism {
        Circuit::id(obj.len())
    }

    fn compose(&self, f: &Self::Morphism, g: &Self::Morphism) -> Option<Self::Morphism> {
        f.compose(g).ok()
    }
}

impl MonoidalCategory for CircuitCategory {
    fn unit(&self) -> Self::Object {
        Pro(0)
    }

    fn tensor_objects(&self, a: &Self::Object, b: &Self::Object) -> Self::Object {
        a.tensor(b)
    }

    fn tensor_morphisms(&self, f: &Self::Morphism, g: &Self::Morphism) -> Self::Morphism {
        f.tensor(g)
    }
}

impl SymmetricMonoidalCategory for CircuitCategory {
    fn braiding(&self, a: &Self::Object, b: &Self::Object) -> Self::Morphism {
        // Crossings built from adjacent swaps, moving the a-block past the
        // b-block one wire at a time.
        let mut result = Circuit::id(a.len() + b.len());
        for i in (0..a.len()).rev() {
            for j in 0..b.len() {
                let offset = i + j;
                let layer = Circuit::id(offset)
                    .tensor(&Circuit::from_box(CircuitBox::swap()))
                    .tensor(&Circuit::id(a.len() + b.len() - offset - 2));
                result = match result.compose(&layer) {
                    Ok(c) => c,
                    Err(_) => return result, // widths always align here
                };
            }
        }
        result
    }
}

impl DaggerCategory for CircuitCategory {
    fn dagger(&self, f: &Self::Morphism) -> Self::Morphism {
        f.dagger()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(b: CircuitBox) -> Circuit {
        Circuit::from_box(b)
    }

    #[test]
    fn test_compose_width_mismatch() {
        let h = gate(CircuitBox::h());
        let cx = gate(CircuitBox::cx());
        assert!(matches!(h.compose(&cx), Err(Error::TypeMismatch(1, 2))));
    }

    #[test]
    fn test_tensor_offsets() {
        let h = gate(CircuitBox::h());
        let x = gate(CircuitBox::x());
        let hx = h.tensor(&x);
        assert_eq!(hx.dom(), Pro(2));
        assert_eq!(hx.layers()[0].left(), 0);
        assert_eq!(hx.layers()[0].right(), 1);
        assert_eq!(hx.layers()[1].left(), 1);
        assert_eq!(hx.layers()[1].right(), 0);
    }

    #[test]
    fn test_ket_fusion() {
        let k0 = gate(CircuitBox::ket(&[false]));
        let k1 = gate(CircuitBox::ket(&[true]));
        let fused = k0.tensor(&k1);
        assert_eq!(fused.as_box(), Some(&CircuitBox::ket(&[false, true])));

        let b = gate(CircuitBox::bra(&[true])).tensor(&gate(CircuitBox::bra(&[false])));
        assert_eq!(b.as_box(), Some(&CircuitBox::bra(&[true, false])));
    }

    #[test]
    fn test_no_fusion_across_orientations() {
        let k = gate(CircuitBox::ket(&[false]));
        let b = gate(CircuitBox::bra(&[false]));
        let kb = k.tensor(&b);
        assert_eq!(kb.layers().len(), 2);
    }

    #[test]
    fn test_dagger_reverses_layers() {
        let c = gate(CircuitBox::s())
            .compose(&gate(CircuitBox::t()))
            .unwrap();
        let d = c.dagger();
        assert_eq!(d.layers()[0].boxed().name(), "T†");
        assert_eq!(d.layers()[1].boxed().name(), "S†");
        assert_eq!(d.dagger(), c);
    }

    #[test]
    fn test_interchange_disjoint() {
        // H on wire 0, X on wire 1: disjoint, so the layers commute.
        let c = gate(CircuitBox::h())
            .tensor(&Circuit::id(1))
            .compose(&Circuit::id(1).tensor(&gate(CircuitBox::x())))
            .unwrap();
        let swapped = c.interchange(0, 1).unwrap();
        assert_eq!(swapped.layers()[0].boxed().name(), "X");
        assert_eq!(swapped.layers()[1].boxed().name(), "H");
        // Interchanging back restores the original
        assert_eq!(swapped.interchange(1, 0).unwrap(), c);
    }

    #[test]
    fn test_interchange_overlap_fails() {
        let c = gate(CircuitBox::h())
            .compose(&gate(CircuitBox::x()))
            .unwrap();
        assert!(matches!(c.interchange(0, 1), Err(Error::InterchangeError(0, 1))));
    }

    #[test]
    fn test_foliation_groups_disjoint_boxes() {
        let h_x = gate(CircuitBox::h()).tensor(&gate(CircuitBox::x()));
        let z_top = gate(CircuitBox::z()).tensor(&Circuit::id(1));
        let c = h_x.compose(&z_top).unwrap();
        let slices = c.foliation();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].layers().len(), 2);
        assert_eq!(slices[1].layers().len(), 1);
        // Slices compose back to the original
        let rebuilt = slices
            .iter()
            .skip(1)
            .fold(slices[0].clone(), |acc, s| acc.compose(s).unwrap());
        assert_eq!(rebuilt, c);
    }

    #[test]
    fn test_as_box_requires_full_span() {
        let h = gate(CircuitBox::h());
        assert!(h.as_box().is_some());
        assert!(h.tensor(&Circuit::id(1)).as_box().is_none());
        assert!(Circuit::id(1).as_box().is_none());
    }
}
