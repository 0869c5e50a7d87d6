//! Reference tables: abilities, ages, skills, talents, spells, equipment.
//!
//! A [`RuleBook`] is immutable configuration. Build one at startup, either
//! from [`RuleBook::standard`] or from a JSON file, and pass it by
//! reference into every rules function.

pub mod standard;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};
use crate::validate::validate_rulebook;

/// Talent that allows a starting spell.
pub const TALENT_SPELLCAST: &str = "spellcast";
/// Talent that memorizes the starting spell instead of carrying it.
pub const TALENT_CANTRIPS: &str = "cantrips";
/// Talent granting +5 hit points.
pub const TALENT_TOUGH: &str = "tough";
/// Talent raising base supply from 5 to 10.
pub const TALENT_RESOURCEFUL: &str = "resourceful";
/// Talent granting base armor 2 when no armor is worn.
pub const TALENT_IRON_SKIN: &str = "iron_skin";

/// One of the five ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Ability {
    /// Strength: melee attacks, hit points, item slots.
    Str,
    /// Dexterity: ranged attacks.
    Dex,
    /// Intellect: supply, arcane spells.
    Int,
    /// Willpower: hit points, primal magic.
    Wil,
    /// Charisma: divine miracles.
    Cha,
}

impl Ability {
    /// All abilities in sheet order.
    pub const ALL: [Ability; 5] = [Self::Str, Self::Dex, Self::Int, Self::Wil, Self::Cha];

    /// The three-letter code, e.g. "STR".
    pub fn code(self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Dex => "DEX",
            Self::Int => "INT",
            Self::Wil => "WIL",
            Self::Cha => "CHA",
        }
    }

    /// Parse an ability from its code, case-insensitively.
    pub fn from_code(code: &str) -> RulesResult<Self> {
        let upper = code.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|a| a.code() == upper)
            .ok_or_else(|| RulesError::UnknownAbility(code.to_string()))
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Descriptive data for an ability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityInfo {
    /// Which ability this describes.
    pub ability: Ability,
    /// Full name (e.g., "Strength").
    pub name: String,
    /// What the ability governs.
    pub description: String,
    /// Condition suffered when the ability is taxed (e.g., "EXHAUSTED").
    pub condition: String,
}

/// Budgets fixed by an age tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeConfig {
    /// Age name (e.g., "Adult").
    pub name: String,
    /// Ability points to distribute.
    pub points: i32,
    /// Number of skills to choose.
    pub skills: usize,
    /// Dice-chain links to spend.
    pub links: i32,
}

/// Talent grouping used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TalentCategory {
    /// Improves attacks.
    Offensive,
    /// Improves survival.
    Defensive,
    /// Out-of-combat tools.
    Utility,
    /// Magic and the uncanny.
    Mystique,
}

impl std::fmt::Display for TalentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offensive => write!(f, "Offensive"),
            Self::Defensive => write!(f, "Defensive"),
            Self::Utility => write!(f, "Utility"),
            Self::Mystique => write!(f, "Mystique"),
        }
    }
}

/// A selectable talent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalentInfo {
    /// Stable identifier (e.g., "spellcast").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Filter category.
    pub category: TalentCategory,
    /// Rules text.
    pub description: String,
    /// Label of the dice chain this talent grants, if any.
    #[serde(default)]
    pub chain: Option<String>,
}

/// A single spell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellInfo {
    /// Spell name.
    pub name: String,
    /// Power tier label.
    pub tier: String,
    /// Rules text.
    pub description: String,
}

/// A school of magic and its spells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellSchool {
    /// School name (e.g., "Arcane").
    pub name: String,
    /// Ability used to cast spells of this school.
    pub ability: Ability,
    /// Spells in the school.
    pub spells: Vec<SpellInfo>,
}

/// Armor weight class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorWeight {
    /// Light armor.
    Light,
    /// Medium armor.
    Medium,
    /// Heavy armor.
    Heavy,
}

impl ArmorWeight {
    /// Armor class base granted by this weight.
    pub fn base_ac(self) -> i32 {
        match self {
            Self::Light => 2,
            Self::Medium => 4,
            Self::Heavy => 6,
        }
    }
}

/// A purchasable piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    /// Item name.
    pub name: String,
    /// Short property text (damage, tags).
    #[serde(default)]
    pub properties: String,
    /// Inventory slots occupied.
    pub slots: u32,
    /// Price in gold.
    pub cost: u32,
    /// Whether the item can be chained as a weapon.
    #[serde(default)]
    pub weapon: bool,
    /// Armor weight, if the item is armor.
    #[serde(default)]
    pub armor: Option<ArmorWeight>,
    /// Whether the item can be chained as a shield.
    #[serde(default)]
    pub shield: bool,
}

/// A named group of equipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentCategory {
    /// Category name (e.g., "Weapons").
    pub name: String,
    /// Items in this category.
    pub items: Vec<EquipmentItem>,
}

/// The complete set of reference tables for character creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleBook {
    /// Rulebook name, shown on the sheet.
    pub name: String,
    /// Ability descriptions.
    pub abilities: Vec<AbilityInfo>,
    /// Age tiers, in display order.
    pub ages: Vec<AgeConfig>,
    /// Skill names, in display order.
    pub skills: Vec<String>,
    /// Talents, in display order.
    pub talents: Vec<TalentInfo>,
    /// Spell schools, in display order.
    pub spells: Vec<SpellSchool>,
    /// Equipment categories, in display order.
    pub equipment: Vec<EquipmentCategory>,
}

impl RuleBook {
    /// The rulebook shipped with the game.
    pub fn standard() -> Self {
        standard::standard()
    }

    /// Parse and validate a rulebook from JSON.
    pub fn from_json_str(json: &str) -> RulesResult<Self> {
        let book: Self = serde_json::from_str(json)?;
        let errors: Vec<String> = validate_rulebook(&book)
            .into_iter()
            .filter(|issue| issue.is_error)
            .map(|issue| issue.to_string())
            .collect();
        if !errors.is_empty() {
            return Err(RulesError::InvalidRulebook(errors.join("; ")));
        }
        tracing::debug!(name = %book.name, ages = book.ages.len(), "loaded rulebook");
        Ok(book)
    }

    /// Read, parse and validate a rulebook JSON file.
    pub fn from_path(path: &Path) -> RulesResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Look up an age by name, case-insensitively.
    pub fn age(&self, name: &str) -> Option<&AgeConfig> {
        self.ages.iter().find(|a| a.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Look up a skill by name, case-insensitively, returning its canonical name.
    pub fn skill(&self, name: &str) -> Option<&str> {
        self.skills
            .iter()
            .find(|s| s.eq_ignore_ascii_case(name.trim()))
            .map(String::as_str)
    }

    /// Look up a talent by id or display name, case-insensitively.
    pub fn talent(&self, id_or_name: &str) -> Option<&TalentInfo> {
        let needle = id_or_name.trim();
        self.talents
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(needle) || t.name.eq_ignore_ascii_case(needle))
    }

    /// Look up a spell school by name, case-insensitively.
    pub fn school(&self, name: &str) -> Option<&SpellSchool> {
        self.spells
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Look up a spell within a school.
    pub fn spell(&self, school: &str, name: &str) -> Option<(&SpellSchool, &SpellInfo)> {
        let school = self.school(school)?;
        school
            .spells
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
            .map(|spell| (school, spell))
    }

    /// Look up an equipment item in any category, case-insensitively.
    pub fn item(&self, name: &str) -> Option<&EquipmentItem> {
        self.equipment
            .iter()
            .flat_map(|c| c.items.iter())
            .find(|i| i.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Descriptive data for an ability, if the table defines it.
    pub fn ability_info(&self, ability: Ability) -> Option<&AbilityInfo> {
        self.abilities.iter().find(|a| a.ability == ability)
    }
}
