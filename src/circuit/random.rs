//! Seeded random circuit generation
//!
//! Used by the round-trip tests: single-wire circuits get a random Euler
//! decomposition, wider ones a random tiling of the given gate set.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::circuit::boxes::CircuitBox;
use crate::circuit::diagram::Circuit;
use crate::error::Result;

/// One entry of a random gate set.
#[derive(Clone, Debug)]
pub enum GateSpec {
    /// A fixed box drawn as-is.
    Fixed(CircuitBox),
    /// An x-rotation with a fresh random phase per draw.
    Rx,
    /// A z-rotation with a fresh random phase per draw.
    Rz,
}

impl GateSpec {
    fn width(&self) -> usize {
        match self {
            GateSpec::Fixed(b) => b.dom().len(),
            GateSpec::Rx | GateSpec::Rz => 1,
        }
    }

    fn draw(&self, rng: &mut StdRng) -> CircuitBox {
        match self {
            GateSpec::Fixed(b) => b.clone(),
            GateSpec::Rx => CircuitBox::rx(rng.gen::<f64>()),
            GateSpec::Rz => CircuitBox::rz(rng.gen::<f64>()),
        }
    }
}

impl Circuit {
    /// A random circuit of the given width and depth.
    ///
    /// A single wire gets an Euler decomposition `Rx >> Rz >> Rx`; otherwise
    /// each of `depth` lines is tiled left to right with draws from the gate
    /// set until the full width is covered.
    pub fn random(n_wires: usize, depth: usize, gateset: &[GateSpec], seed: u64) -> Result<Circuit> {
        let mut rng = StdRng::seed_from_u64(seed);
        if n_wires == 1 {
            return Circuit::from_box(CircuitBox::rx(rng.gen::<f64>()))
                .compose(&Circuit::from_box(CircuitBox::rz(rng.gen::<f64>())))?
                .compose(&Circuit::from_box(CircuitBox::rx(rng.gen::<f64>())));
        }
        let mut result = Circuit::id(n_wires);
        for _ in 0..depth {
            let mut line = Circuit::id(0);
            let mut n_affected = 0;
            while n_affected < n_wires {
                let remaining = n_wires - n_affected;
                let fitting: Vec<&GateSpec> =
                    gateset.iter().filter(|g| g.width() <= remaining).collect();
                if fitting.is_empty() {
                    line = line.tensor(&Circuit::id(remaining));
                    break;
                }
                let choice = fitting[rng.gen_range(0..fitting.len())];
                let boxed = choice.draw(&mut rng);
                n_affected += boxed.dom().len();
                line = line.tensor(&Circuit::from_box(boxed));
            }
            result = result.compose(&line)?;
        }
        Ok(result)
    }
}
