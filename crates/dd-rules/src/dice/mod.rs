//! Die sizes, the dice-chain ladder, and rolling.
//!
//! A dice chain climbs the ladder d4, d6, d8, d10, d12 one link at a time.
//! The d20 never sits on the ladder; it is only rolled (starting gold is
//! 3d20).

pub mod roll;

pub use roll::{DicePool, DieResult, RollResult};

use std::fmt;

use serde::{Deserialize, Serialize};

/// A polyhedral die size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Die {
    /// d4, the bottom of every chain.
    D4,
    /// d6.
    D6,
    /// d8.
    D8,
    /// d10.
    D10,
    /// d12, the top of every chain.
    D12,
    /// d20, rolled for gold.
    D20,
}

/// Chain rungs from level 0 upward.
pub const CHAIN_LADDER: [Die; 5] = [Die::D4, Die::D6, Die::D8, Die::D10, Die::D12];

/// Level of the top rung.
pub const MAX_CHAIN_LEVEL: u8 = 4;

impl Die {
    /// Faces on the die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
        }
    }

    /// The rung at a chain level, or `None` above [`MAX_CHAIN_LEVEL`].
    pub fn at_chain_level(level: u8) -> Option<Self> {
        CHAIN_LADDER.get(usize::from(level)).copied()
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("d{}", self.sides()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_tops_out_at_max_level() {
        assert_eq!(CHAIN_LADDER.len(), usize::from(MAX_CHAIN_LEVEL) + 1);
        assert_eq!(Die::at_chain_level(0), Some(Die::D4));
        assert_eq!(Die::at_chain_level(2), Some(Die::D8));
        assert_eq!(Die::at_chain_level(MAX_CHAIN_LEVEL), Some(Die::D12));
        assert_eq!(Die::at_chain_level(MAX_CHAIN_LEVEL + 1), None);
    }

    #[test]
    fn ladder_grows_by_two_faces() {
        for pair in CHAIN_LADDER.windows(2) {
            assert_eq!(pair[1].sides(), pair[0].sides() + 2);
        }
        assert!(!CHAIN_LADDER.contains(&Die::D20));
    }

    #[test]
    fn display_and_padding() {
        assert_eq!(Die::D10.to_string(), "d10");
        assert_eq!(format!("{:<4}|", Die::D6), "d6  |");
        assert_eq!(serde_json::to_string(&Die::D12).unwrap(), "\"d12\"");
    }
}
