//! One-dimensional elementary cellular automaton with wrap-around edges.

use std::collections::VecDeque;
use std::fmt;

use crate::error::{Error, Result};

/// Rolling window of generations of an elementary CA.
///
/// Stepping is pure: [`ElementaryCa::step`] returns a new automaton holding
/// at most `gens_count` generations, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementaryCa {
    gen_size: usize,
    gens_count: usize,
    ruleset: u8,
    current: u64,
    generations: VecDeque<Vec<bool>>,
}

impl ElementaryCa {
    /// Seed generation is all dead except the cell at `gen_size / 2`.
    pub fn new(gen_size: usize, gens_count: usize, ruleset: u8) -> Result<Self> {
        if gen_size == 0 {
            return Err(Error::InvalidAutomaton(
                "generation size must be at least 1".to_string(),
            ));
        }
        if gens_count == 0 {
            return Err(Error::InvalidAutomaton(
                "generation count must be at least 1".to_string(),
            ));
        }

        let mut seed = vec![false; gen_size];
        seed[gen_size / 2] = true;
        Ok(Self {
            gen_size,
            gens_count,
            ruleset,
            current: 1,
            generations: VecDeque::from([seed]),
        })
    }

    pub fn gen_size(&self) -> usize {
        self.gen_size
    }

    pub fn gens_count(&self) -> usize {
        self.gens_count
    }

    pub fn ruleset(&self) -> u8 {
        self.ruleset
    }

    /// Number of generations produced so far, including the seed.
    pub fn current(&self) -> u64 {
        self.current
    }

    /// Generation number of the oldest generation still held.
    pub fn first_index(&self) -> u64 {
        self.current - self.generations.len() as u64
    }

    pub fn generations(&self) -> impl Iterator<Item = &[bool]> {
        self.generations.iter().map(Vec::as_slice)
    }

    pub fn latest(&self) -> &[bool] {
        self.generations.back().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn step(&self) -> Self {
        let next = self.next_generation();
        let mut generations = self.generations.clone();
        if generations.len() == self.gens_count {
            generations.pop_front();
        }
        generations.push_back(next);
        Self {
            current: self.current + 1,
            generations,
            ..*self
        }
    }

    fn next_generation(&self) -> Vec<bool> {
        let cells = self.latest();
        let size = self.gen_size;
        (0..size)
            .map(|i| {
                let left = cells[(i + size - 1) % size] as u8;
                let centre = cells[i] as u8;
                let right = cells[(i + 1) % size] as u8;
                let neighbourhood = (left << 2) | (centre << 1) | right;
                (self.ruleset >> neighbourhood) & 1 == 1
            })
            .collect()
    }
}

impl fmt::Display for ElementaryCa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, generation) in self.generations.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for &alive in generation {
                f.write_str(if alive { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_single_live_cell() {
        let ca = ElementaryCa::new(7, 4, 30).unwrap();
        assert_eq!(ca.to_string(), "...#...");
        assert_eq!(ca.current(), 1);
        assert_eq!(ca.first_index(), 0);
    }

    #[test]
    fn rule_90_draws_sierpinski_rows() {
        let ca = ElementaryCa::new(7, 4, 90).unwrap().step().step().step();
        assert_eq!(ca.to_string(), "...#...\n..#.#..\n.#...#.\n#.#.#.#");
    }

    #[test]
    fn rule_30_grows_from_seed() {
        let ca = ElementaryCa::new(7, 8, 30).unwrap().step();
        assert_eq!(ca.latest(), &[false, false, true, true, true, false, false]);
    }

    #[test]
    fn window_drops_oldest_generation() {
        let mut ca = ElementaryCa::new(9, 3, 30).unwrap();
        for _ in 0..5 {
            ca = ca.step();
        }
        assert_eq!(ca.current(), 6);
        assert_eq!(ca.generations().count(), 3);
        assert_eq!(ca.first_index(), 3);
    }

    #[test]
    fn step_is_pure() {
        let ca = ElementaryCa::new(5, 5, 110).unwrap();
        let next = ca.step();
        assert_eq!(ca.current(), 1);
        assert_eq!(next.current(), 2);
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            ElementaryCa::new(0, 5, 30),
            Err(Error::InvalidAutomaton(_))
        ));
        assert!(matches!(
            ElementaryCa::new(5, 0, 30),
            Err(Error::InvalidAutomaton(_))
        ));
    }
}
