//! Ready-made systolic algorithms.
//!
//! Each constructor returns a [`Preset`]: the descriptor spec, the boundary
//! values to queue, an optional output probe and the transition rules in
//! readable form. Hand one to [`Simulation::from_preset`](crate::Simulation::from_preset).

use crate::descriptor::{DescriptorSpec, Direction, Position, RegisterSpec, WireSpec};
use crate::input::interleave_delays;
use crate::simulation::Probe;

/// Values queued on one boundary lane of a wire.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetInput {
    pub wire: String,
    pub lane: usize,
    pub values: Vec<f64>,
}

impl PresetInput {
    pub fn new(wire: impl Into<String>, values: Vec<f64>) -> Self {
        Self::on_lane(wire, 0, values)
    }

    pub fn on_lane(wire: impl Into<String>, lane: usize, values: Vec<f64>) -> Self {
        Self {
            wire: wire.into(),
            lane,
            values,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Preset {
    pub name: &'static str,
    pub spec: DescriptorSpec,
    pub inputs: Vec<PresetInput>,
    pub probe: Option<Probe>,
    pub transition_text: &'static str,
}

fn coefficient_at(coeffs: &[f64]) -> impl Fn(Position) -> f64 + Send + Sync + 'static {
    let coeffs = coeffs.to_vec();
    move |p: Position| coeffs.get(p.column).copied().unwrap_or(0.0)
}

/// Horner evaluation of a polynomial, highest-degree coefficient first.
///
/// `p` and `x` travel left to right together; the value for the k-th input
/// leaves the last column `coeffs.len()` steps after it was fed.
pub fn polynomial(coeffs: &[f64], inputs: &[f64]) -> Preset {
    let columns = coeffs.len();
    let spec = DescriptorSpec::grid(1, columns)
        .register(RegisterSpec::new("a").init_with(coefficient_at(coeffs)))
        .wire(WireSpec::new("p").transition_with(|v, _| v["p"] * v["x"] + v["a"]))
        .wire(WireSpec::new("x"));

    Preset {
        name: "polynomial",
        spec,
        inputs: vec![PresetInput::new("x", inputs.to_vec())],
        probe: Some(Probe::new(
            "p",
            "p",
            Position::new(0, columns.saturating_sub(1)),
        )),
        transition_text: "p' = p * x + a\nx' = x",
    }
}

/// FIR filter with inputs and partial sums moving in opposite directions.
///
/// Inputs are spaced by one idle step so every partial sum meets each input
/// once; results leave the first column on every other step.
pub fn fir_bidirectional(coeffs: &[f64], inputs: &[f64]) -> Preset {
    let spec = DescriptorSpec::grid(1, coeffs.len())
        .register(RegisterSpec::new("a").init_with(coefficient_at(coeffs)))
        .wire(
            WireSpec::new("y")
                .direction(Direction::RightLeft)
                .transition_with(|v, _| v["y"] + v["a"] * v["x"]),
        )
        .wire(WireSpec::new("x"));

    Preset {
        name: "fir_bidirectional",
        spec,
        inputs: vec![PresetInput::new("x", interleave_delays(inputs, 1))],
        probe: Some(Probe::new("y", "y", Position::new(0, 0))),
        transition_text: "x' = x\ny' = y + a * x",
    }
}

/// Matrix-vector product on a single column of cells.
///
/// Row `r` of `matrix` enters from the right on lane `r`, staggered so each
/// coefficient meets the matching vector element rising from the bottom.
/// After `rows + cols - 1` steps register `v` of row `r` holds `(matrix * vector)[r]`.
pub fn matrix_vector(matrix: &[Vec<f64>], vector: &[f64]) -> Preset {
    let rows = matrix.len();
    let spec = DescriptorSpec::grid(rows, 1)
        .start_index(1)
        .register(RegisterSpec::new("v").transition_with(|v, _| v["v"] + v["a"] * v["u"]))
        .wire(WireSpec::new("a").direction(Direction::RightLeft))
        .wire(WireSpec::new("u").direction(Direction::BottomUp));

    let mut inputs: Vec<PresetInput> = matrix
        .iter()
        .enumerate()
        .map(|(row, coefficients)| {
            let mut values = vec![0.0; rows - 1 - row];
            values.extend_from_slice(coefficients);
            PresetInput::on_lane("a", row, values)
        })
        .collect();
    inputs.push(PresetInput::new("u", vector.to_vec()));

    Preset {
        name: "matrix_vector",
        spec,
        inputs,
        probe: None,
        transition_text: "v' = v + a * u\nu' = u",
    }
}

/// Prime sieve over `2..=upto`.
///
/// The first positive value to reach an empty cell becomes that cell's prime
/// and travels on negated; multiples are zeroed and everything else passes.
pub fn prime_sieve(columns: usize, upto: u32) -> Preset {
    let spec = DescriptorSpec::grid(1, columns)
        .start_index(1)
        .register(
            RegisterSpec::new("p")
                .init(0.0)
                .transition_with(|v, _| if v["a"] > 0.0 && v["p"] == 0.0 { v["a"] } else { v["p"] }),
        )
        .wire(WireSpec::new("a").transition_with(|v, _| {
            let (a, p) = (v["a"], v["p"]);
            if a <= 0.0 {
                a
            } else if p == 0.0 {
                -a
            } else if a % p != 0.0 {
                a
            } else {
                0.0
            }
        }));

    Preset {
        name: "prime_sieve",
        spec,
        inputs: vec![PresetInput::new("a", (2..=upto).map(f64::from).collect())],
        probe: None,
        transition_text: "if a <= 0 then\n  a' = a\nelse if p == 0 then\n  p = a\n  a' = -a\nelse if a % p == 0 then\n  a' = 0\nelse\n  a' = a",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Simulation, SimulationConfig};

    fn run(preset: Preset, steps: usize) -> Simulation {
        let mut sim = Simulation::from_preset(preset, SimulationConfig::default()).unwrap();
        sim.run(steps);
        sim
    }

    #[test]
    fn polynomial_uses_horner_order() {
        // x^2 + 2x + 3
        let sim = run(polynomial(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0, 5.0]), 7);
        assert_eq!(&sim.outputs("p")[2..], &[6.0, 11.0, 18.0, 27.0, 38.0]);
    }

    #[test]
    fn fir_emits_on_alternate_steps() {
        // y[n] = x[n] + 2 x[n-1]
        let sim = run(fir_bidirectional(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 7);
        assert_eq!(sim.outputs("y"), &[1.0, 0.0, 4.0, 0.0, 7.0, 0.0, 6.0]);
    }

    #[test]
    fn matrix_vector_accumulates_rows() {
        let matrix = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let sim = run(matrix_vector(&matrix, &[5.0, 6.0]), 3);
        let state = sim.state();
        assert_eq!(state.register(Position::new(0, 0), "v"), Some(17.0));
        assert_eq!(state.register(Position::new(1, 0), "v"), Some(39.0));
        assert_eq!(state.descriptor().start_index(), 1);
    }

    #[test]
    fn prime_sieve_collects_first_primes() {
        let sim = run(prime_sieve(7, 24), 40);
        assert_eq!(
            sim.state().register_row(0, "p"),
            vec![2.0, 3.0, 5.0, 7.0, 11.0, 13.0, 17.0]
        );
    }

    #[test]
    fn empty_coefficients_fail_on_creation() {
        let err = Simulation::from_preset(polynomial(&[], &[1.0]), SimulationConfig::default());
        assert!(err.is_err());
    }

    #[test]
    fn transition_text_is_line_based() {
        assert_eq!(polynomial(&[1.0], &[]).transition_text.lines().count(), 2);
        assert!(prime_sieve(3, 10).transition_text.starts_with("if a <= 0"));
    }
}
