//! Rolling a handful of dice with the session RNG.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Die;

/// Dice to be rolled together, e.g. 3d20.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DicePool {
    dice: Vec<Die>,
}

impl DicePool {
    /// `count` dice of one size.
    pub fn of(die: Die, count: usize) -> Self {
        Self {
            dice: vec![die; count],
        }
    }

    /// Roll every die once.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> RollResult {
        RollResult {
            dice: self
                .dice
                .iter()
                .map(|&die| DieResult {
                    die,
                    value: rng.random_range(1..=die.sides()),
                })
                .collect(),
        }
    }
}

impl fmt::Display for DicePool {
    /// Runs of equal dice are grouped: "3d20", "2d6 + 1d4".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups: Vec<String> = self
            .dice
            .chunk_by(|a, b| a == b)
            .map(|run| format!("{}{}", run.len(), run[0]))
            .collect();
        write!(f, "{}", groups.join(" + "))
    }
}

/// One rolled die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// Size rolled.
    pub die: Die,
    /// Face shown, 1..=sides.
    pub value: u32,
}

/// Every die of a pool after rolling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Results in pool order.
    pub dice: Vec<DieResult>,
}

impl RollResult {
    /// Sum of the faces.
    pub fn total(&self) -> u32 {
        self.dice.iter().map(|d| d.value).sum()
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.dice.iter().map(|d| d.value.to_string()).collect();
        write!(f, "[{}] = {}", faces.join(", "), self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn pool_display_groups_runs() {
        assert_eq!(DicePool::of(Die::D20, 3).to_string(), "3d20");
        let mixed = DicePool {
            dice: vec![Die::D6, Die::D6, Die::D4],
        };
        assert_eq!(mixed.to_string(), "2d6 + 1d4");
        assert_eq!(DicePool::default().to_string(), "");
    }

    #[test]
    fn gold_roll_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = DicePool::of(Die::D20, 3);
        for _ in 0..200 {
            let result = pool.roll(&mut rng);
            assert_eq!(result.dice.len(), 3);
            assert!(result.dice.iter().all(|d| (1..=20).contains(&d.value)));
            assert!((3..=60).contains(&result.total()));
        }
    }

    #[test]
    fn seeded_rolls_repeat() {
        let pool = DicePool::of(Die::D20, 3);
        let a = pool.roll(&mut StdRng::seed_from_u64(99));
        let b = pool.roll(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn result_display() {
        let result = RollResult {
            dice: vec![
                DieResult { die: Die::D20, value: 3 },
                DieResult { die: Die::D20, value: 17 },
            ],
        };
        assert_eq!(result.to_string(), "[3, 17] = 20");
    }
}
