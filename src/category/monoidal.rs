//! Monoidal category structures
//!
//! This module implements traits for categories, monoidal categories and
//! dagger categories, which form the foundation for treating quantum
//! circuits as morphisms.

use std::fmt::Debug;

/// A category consists of objects and morphisms between them.
///
/// In this crate, objects are wire counts (or Hilbert-space dimensions)
/// and morphisms are circuits (or matrices).
pub trait Category {
    /// The type representing objects in this category
    type Object: Clone + Debug + PartialEq;

    /// The type representing morphisms between objects
    ///
    /// We require PartialEq for morphisms to properly verify category laws
    type Morphism: Clone + Debug + PartialEq;

    /// The domain (source) of a morphism
    fn domain(&self, f: &Self::Morphism) -> Self::Object;

    /// The codomain (target) of a morphism
    fn codomain(&self, f: &Self::Morphism) -> Self::Object;

    /// The identity morphism for a given object
    fn identity(&self, obj: &Self::Object) -> Self::Morphism;

    /// Composition of morphisms f and g, where f goes from A to B, and g goes from B to C.
    /// The result is a morphism from A to C.
    ///
    /// Returns None if the morphisms cannot be composed (i.e., if codomain of f ≠ domain of g)
    fn compose(&self, f: &Self::Morphism, g: &Self::Morphism) -> Option<Self::Morphism>;

    /// Helper function to verify objects are equal for composition
    fn can_compose(&self, f: &Self::Morphism, g: &Self::Morphism) -> bool {
        self.codomain(f) == self.domain(g)
    }
}

/// A monoidal category extends a category with a tensor product operation.
///
/// The tensor product represents the combination of quantum systems and the
/// parallel application of quantum operations.
pub trait MonoidalCategory: Category {
    /// The monoidal unit (I)
    fn unit(&self) -> Self::Object;

    /// Tensor product of objects
    fn tensor_objects(&self, a: &Self::Object, b: &Self::Object) -> Self::Object;

    /// Tensor product of morphisms
    fn tensor_morphisms(&self, f: &Self::Morphism, g: &Self::Morphism) -> Self::Morphism;
}

/// A symmetric monoidal category is a monoidal category with an isomorphism
/// that swaps objects in a tensor product.
pub trait SymmetricMonoidalCategory: MonoidalCategory {
    /// Braiding/symmetry isomorphism: σ_{A,B}: A ⊗ B → B ⊗ A
    fn braiding(&self, a: &Self::Object, b: &Self::Object) -> Self::Morphism;
}

/// A dagger category is a category with an involutive contravariant endofunctor
/// that is the identity on objects.
///
/// In quantum mechanics, the dagger operation corresponds to the adjoint of
/// a linear operator, ensuring unitarity of quantum operations.
pub trait DaggerCategory: Category {
    /// The dagger (adjoint) of a morphism
    fn dagger(&self, f: &Self::Morphism) -> Self::Morphism;
}

/// Implementation of common category laws verification
pub mod laws {
    use super::*;

    /// Verify the category laws for a given category and collection of test objects and morphisms
    pub fn verify_category_laws<C: Category>(
        category: &C,
        test_objects: &[C::Object],
        test_morphisms: &[(C::Morphism, usize, usize)], // morphism, source_idx, target_idx
    ) -> bool {
        // Identity law: id_B ∘ f = f = f ∘ id_A for f: A → B
        let identity_law = test_morphisms.iter().all(|(f, src_idx, tgt_idx)| {
            let src = &test_objects[*src_idx];
            let tgt = &test_objects[*tgt_idx];

            let id_src = category.identity(src);
            let id_tgt = category.identity(tgt);

            if let Some(f_id_tgt) = category.compose(f, &id_tgt) {
                if let Some(id_src_f) = category.compose(&id_src, f) {
                    return f_id_tgt == *f && id_src_f == *f;
                }
            }
            false
        });

        // Generate composable morphism triples for associativity test
        let mut composable_triples = Vec::new();
        for (f, _f_src, f_tgt) in test_morphisms.iter() {
            for (g, g_src, g_tgt) in test_morphisms.iter() {
                for (h, h_src, _h_tgt) in test_morphisms.iter() {
                    // Check if f, g, h can be composed: f -> g -> h
                    if test_objects[*f_tgt] == test_objects[*g_src]
                        && test_objects[*g_tgt] == test_objects[*h_src]
                    {
                        composable_triples.push((f, g, h));
                    }
                }
            }
        }

        // Associativity law: (f ∘ g) ∘ h = f ∘ (g ∘ h)
        let associativity_law = composable_triples.iter().all(|(f, g, h)| {
            if let Some(f_g) = category.compose(f, g) {
                if let Some(g_h) = category.compose(g, h) {
                    if let Some(lhs) = category.compose(&f_g, h) {
                        if let Some(rhs) = category.compose(f, &g_h) {
                            return lhs == rhs;
                        }
                    }
                }
            }
            // If we can't compose any of these, the test is inconclusive
            true
        });

        identity_law && associativity_law
    }

    /// Verify that tensor and composition satisfy the bifunctoriality law:
    /// (f ⊗ g) ∘ (h ⊗ k) = (f ∘ h) ⊗ (g ∘ k) whenever the widths align.
    pub fn verify_bifunctoriality<C: MonoidalCategory>(
        category: &C,
        pairs: &[(C::Morphism, C::Morphism)], // composable pairs (f, h)
    ) -> bool {
        pairs.iter().all(|(f, h)| {
            pairs.iter().all(|(g, k)| {
                let f_tensor_g = category.tensor_morphisms(f, g);
                let h_tensor_k = category.tensor_morphisms(h, k);

                let fh = category.compose(f, h);
                let gk = category.compose(g, k);

                match (category.compose(&f_tensor_g, &h_tensor_k), fh, gk) {
                    (Some(lhs), Some(fh), Some(gk)) => lhs == category.tensor_morphisms(&fh, &gk),
                    _ => true, // nothing composable to check
                }
            })
        })
    }

    /// Verify dagger category laws
    pub fn verify_dagger_laws<C: DaggerCategory>(
        category: &C,
        test_morphisms: &[C::Morphism],
    ) -> bool {
        if test_morphisms.is_empty() {
            return false;
        }

        // 1. Involutive: (f†)† = f
        let involutive_law = test_morphisms.iter().all(|f| {
            let dagger_f = category.dagger(f);
            let dagger_dagger_f = category.dagger(&dagger_f);
            dagger_dagger_f == *f
        });

        // 2. Contravariant: (f ∘ g)† = g† ∘ f†
        let contravariant_law = test_morphisms.iter().all(|f| {
            test_morphisms.iter().all(|g| {
                if let Some(f_comp_g) = category.compose(f, g) {
                    let dagger_f_comp_g = category.dagger(&f_comp_g);

                    let dagger_f = category.dagger(f);
                    let dagger_g = category.dagger(g);

                    if let Some(dagger_g_comp_dagger_f) = category.compose(&dagger_g, &dagger_f) {
                        dagger_f_comp_g == dagger_g_comp_dagger_f
                    } else {
                        false
                    }
                } else {
                    // If we can't compose, consider it valid (vacuously true)
                    true
                }
            })
        });

        involutive_law && contravariant_law
    }
}
