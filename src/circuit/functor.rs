//! Circuit-valued monoidal functors
//!
//! A functor is a pair of mappings: an object map from wire counts to the
//! objects of a target category, and an arrow map from boxes to morphisms
//! of that category. Applying it walks the layer structure recursively:
//! identities map to identities, composites to composites, tensors to
//! tensors, and each generator box through the arrow map.

use tracing::trace;

use crate::category::prelude::*;
use crate::circuit::boxes::CircuitBox;
use crate::circuit::diagram::Circuit;
use crate::error::{Error, Result};

/// A functor out of the circuit category.
///
/// The functor owns its two mappings; circuits are read, never mutated, so
/// one functor can be applied any number of times. The arrow map is a rule
/// invoked per box, which covers both table-backed maps and computed ones.
pub struct CircuitFunctor<D: MonoidalCategory> {
    ob: Box<dyn Fn(usize) -> D::Object>,
    ar: Box<dyn Fn(&CircuitBox) -> Result<D::Morphism>>,
}

impl<D: MonoidalCategory> CircuitFunctor<D> {
    pub fn new(
        ob: impl Fn(usize) -> D::Object + 'static,
        ar: impl Fn(&CircuitBox) -> Result<D::Morphism> + 'static,
    ) -> Self {
        CircuitFunctor {
            ob: Box::new(ob),
            ar: Box::new(ar),
        }
    }

    /// Map a wire count through the object map.
    pub fn map_object(&self, width: usize) -> D::Object {
        (self.ob)(width)
    }

    /// Map a single box through the arrow map, checking that the image's
    /// boundary agrees with the object map.
    ///
    /// Generators are discovered lazily while walking a diagram, so this
    /// check happens at application time rather than construction time.
    pub fn map_box(&self, target: &D, boxed: &CircuitBox) -> Result<D::Morphism> {
        let image = (self.ar)(boxed)?;
        let expected_dom = self.map_object(boxed.dom().len());
        let expected_cod = self.map_object(boxed.cod().len());
        let found_dom = target.domain(&image);
        let found_cod = target.codomain(&image);
        if found_dom != expected_dom || found_cod != expected_cod {
            return Err(Error::FunctorTypeError {
                name: boxed.name(),
                expected: format!("{:?} -> {:?}", expected_dom, expected_cod),
                found: format!("{:?} -> {:?}", found_dom, found_cod),
            });
        }
        Ok(image)
    }

    /// Apply the functor to a circuit.
    pub fn apply(&self, target: &D, circuit: &Circuit) -> Result<D::Morphism> {
        let mut result = target.identity(&self.map_object(circuit.dom().len()));
        for (index, layer) in circuit.layers().iter().enumerate() {
            let image = self.map_box(target, layer.boxed())?;
            let slice = target.tensor_morphisms(
                &target.tensor_morphisms(
                    &target.identity(&self.map_object(layer.left())),
                    &image,
                ),
                &target.identity(&self.map_object(layer.right())),
            );
            trace!(layer = index, box_name = %layer.boxed().name(), "functor layer");
            result = target.compose(&result, &slice).ok_or_else(|| {
                // The object map failed to respect tensoring of widths.
                Error::FunctorTypeError {
                    name: layer.boxed().name(),
                    expected: format!("{:?}", target.codomain(&result)),
                    found: format!("{:?}", target.domain(&slice)),
                }
            })?;
        }
        Ok(result)
    }
}
