//! The character record built up by the creation wizard.
//!
//! A [`Character`] is only ever changed through [`Character::apply`], which
//! takes a closed [`Mutation`] and either applies it with its cascades or
//! rejects it without touching the record.

pub mod mutation;

pub use mutation::{Applied, Delta, Mutation, Rejection};

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chains::{self, ChainKey, Chains};
use crate::reference::{Ability, AgeConfig, EquipmentItem, RuleBook};

/// Lowest allowed ability score (and the starting value).
pub const ABILITY_MIN: i32 = -2;
/// Highest allowed ability score.
pub const ABILITY_MAX: i32 = 5;
/// Number of talents a finished character has.
pub const TALENT_PICKS: usize = 2;
/// School selected before the player picks one.
pub const DEFAULT_SCHOOL: &str = "Arcane";

/// Unique identifier for a character created in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    /// Generate a new random character ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// The five ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    /// Strength.
    pub str: i32,
    /// Dexterity.
    pub dex: i32,
    /// Intellect.
    pub int: i32,
    /// Willpower.
    pub wil: i32,
    /// Charisma.
    pub cha: i32,
}

impl Abilities {
    /// Get a score by ability.
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.str,
            Ability::Dex => self.dex,
            Ability::Int => self.int,
            Ability::Wil => self.wil,
            Ability::Cha => self.cha,
        }
    }

    fn get_mut(&mut self, ability: Ability) -> &mut i32 {
        match ability {
            Ability::Str => &mut self.str,
            Ability::Dex => &mut self.dex,
            Ability::Int => &mut self.int,
            Ability::Wil => &mut self.wil,
            Ability::Cha => &mut self.cha,
        }
    }

    /// Points spent above the starting value of every ability.
    pub fn spent(&self) -> i32 {
        Ability::ALL
            .iter()
            .map(|&a| self.get(a) - ABILITY_MIN)
            .sum()
    }
}

impl Default for Abilities {
    fn default() -> Self {
        Self {
            str: ABILITY_MIN,
            dex: ABILITY_MIN,
            int: ABILITY_MIN,
            wil: ABILITY_MIN,
            cha: ABILITY_MIN,
        }
    }
}

/// The starting spell granted by Spellcasting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    /// Spell name.
    pub name: String,
    /// School the spell belongs to.
    pub school: String,
}

/// Identifier of one purchase, stable for the life of the cart entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CartEntryId(pub u32);

impl fmt::Display for CartEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One purchased item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Purchase identifier.
    pub id: CartEntryId,
    /// The item bought, copied from the rulebook.
    pub item: EquipmentItem,
}

/// Free-text identity fields set on the Concept step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConceptField {
    /// Hero name.
    Name,
    /// Two-to-three word descriptor.
    Descriptor,
    /// Optional background.
    Roots,
    /// Belief that drives the hero.
    Conviction,
}

/// A character under construction.
#[derive(Debug, Clone)]
pub struct Character {
    pub(crate) id: CharacterId,
    pub(crate) name: String,
    pub(crate) descriptor: String,
    pub(crate) roots: String,
    pub(crate) conviction: String,
    pub(crate) age: Option<String>,
    pub(crate) abilities: Abilities,
    pub(crate) skills: Vec<String>,
    pub(crate) talents: Vec<String>,
    pub(crate) spell: Option<Spell>,
    pub(crate) spell_school: String,
    pub(crate) gold: u32,
    pub(crate) cart: Vec<CartEntry>,
    pub(crate) chains: Chains,
    next_entry: u32,
}

impl Character {
    /// Create a blank character with every ability at -2 and no gold.
    pub fn new() -> Self {
        Self {
            id: CharacterId::new(),
            name: String::new(),
            descriptor: String::new(),
            roots: String::new(),
            conviction: String::new(),
            age: None,
            abilities: Abilities::default(),
            skills: Vec::new(),
            talents: Vec::new(),
            spell: None,
            spell_school: DEFAULT_SCHOOL.to_string(),
            gold: 0,
            cart: Vec::new(),
            chains: Chains::new(),
            next_entry: 1,
        }
    }

    /// Session identifier of this character.
    pub fn id(&self) -> CharacterId {
        self.id
    }

    /// Hero name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hero descriptor.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Optional roots text.
    pub fn roots(&self) -> &str {
        &self.roots
    }

    /// Hero conviction.
    pub fn conviction(&self) -> &str {
        &self.conviction
    }

    /// Text of a concept field.
    pub fn concept(&self, field: ConceptField) -> &str {
        match field {
            ConceptField::Name => &self.name,
            ConceptField::Descriptor => &self.descriptor,
            ConceptField::Roots => &self.roots,
            ConceptField::Conviction => &self.conviction,
        }
    }

    /// Name of the selected age, if any.
    pub fn age(&self) -> Option<&str> {
        self.age.as_deref()
    }

    /// Budgets of the selected age, if any.
    pub fn age_config<'b>(&self, book: &'b RuleBook) -> Option<&'b AgeConfig> {
        self.age.as_deref().and_then(|name| book.age(name))
    }

    /// Ability scores.
    pub fn abilities(&self) -> &Abilities {
        &self.abilities
    }

    /// Chosen skills, in selection order.
    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    /// Chosen talent ids, in selection order.
    pub fn talents(&self) -> &[String] {
        &self.talents
    }

    /// Returns true if the talent id is chosen.
    pub fn has_talent(&self, id: &str) -> bool {
        self.talents.iter().any(|t| t == id)
    }

    /// The starting spell, if chosen.
    pub fn spell(&self) -> Option<&Spell> {
        self.spell.as_ref()
    }

    /// Last school browsed for spells.
    pub fn spell_school(&self) -> &str {
        &self.spell_school
    }

    /// Starting gold.
    pub fn gold(&self) -> u32 {
        self.gold
    }

    /// Purchased equipment, in purchase order.
    pub fn cart(&self) -> &[CartEntry] {
        &self.cart
    }

    /// Chain levels by source key.
    pub fn chains(&self) -> &Chains {
        &self.chains
    }

    /// Level of one chain (0 if the key has no entry).
    pub fn chain_level(&self, key: &ChainKey) -> u8 {
        self.chains.get(key).copied().unwrap_or(0)
    }

    /// Reconcile chain levels with the sources the character currently has.
    pub fn sync_chains(&mut self, book: &RuleBook) {
        self.chains = chains::sync_chains(
            &self.chains,
            &self.cart,
            self.spell.as_ref(),
            &self.talents,
            book,
        );
    }
}

impl Default for Character {
    fn default() -> Self {
        Self::new()
    }
}
