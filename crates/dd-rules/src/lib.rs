//! Character rules engine for Dzintaru Dziesmas.
//!
//! Provides the reference tables, the character record with its single
//! mutation path, derived stat formulas, dice chain resolution, the
//! eight-step creation wizard and the printable character sheet. Ships
//! with the standard rulebook; alternatives can be loaded from JSON.

pub mod chains;
pub mod character;
pub mod derived;
pub mod dice;
pub mod error;
pub mod reference;
pub mod sheet;
pub mod validate;
pub mod wizard;

pub use chains::{ChainKey, ChainSource, Chains, chain_sources, sync_chains};
pub use character::{
    Abilities, Applied, CartEntry, CartEntryId, Character, CharacterId, ConceptField, Delta,
    Mutation, Rejection, Spell,
};
pub use derived::{ArmorClass, DerivedStats};
pub use dice::{DicePool, Die, DieResult, RollResult};
pub use error::{RulesError, RulesResult};
pub use reference::{Ability, RuleBook};
pub use sheet::{CharacterSheet, spell_warning};
pub use validate::{ValidationIssue, validate_rulebook};
pub use wizard::{CreatorConfig, Step, Wizard, can_advance};
