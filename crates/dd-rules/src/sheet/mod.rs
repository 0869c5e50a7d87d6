//! The finished character sheet.
//!
//! A [`CharacterSheet`] is a flat, printable snapshot of a character: every
//! value is already resolved against the rulebook, so the sheet can be
//! serialized or rendered without further lookups.

mod render;

use serde::{Deserialize, Serialize};

use crate::chains::{chain_sources, die_for_level};
use crate::character::{Character, CharacterId};
use crate::derived::{DerivedStats, signed};
use crate::dice::{CHAIN_LADDER, Die};
use crate::reference::{Ability, RuleBook, TALENT_CANTRIPS, TALENT_SPELLCAST};

/// Minimum number of inventory rows printed on a sheet.
pub const INVENTORY_ROWS: usize = 20;

/// Conditions every hero can suffer, printed as checkboxes.
pub const CONDITIONS: [&str; 4] = ["Hindered", "Inspired", "Lost Spirit", "Vulnerable"];

/// Questions answered at the end of each session to award XP.
pub const EOS_QUESTIONS: [&str; 9] = [
    "Did you attend the session?",
    "Did you finish a quest?",
    "Did you obtain treasure?",
    "Did you uphold your Conviction?",
    "Did you discover a location?",
    "Did you roll a Death Save?",
    "Did you roll a Natural 20?",
    "Did you roll a Natural 1?",
    "Did you Aid another Hero?",
];

/// One ability box on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityLine {
    /// Which ability.
    pub ability: Ability,
    /// Raw score.
    pub score: i32,
    /// Score with an explicit sign.
    pub formatted: String,
    /// Condition suffered when the ability is drained.
    pub condition: String,
}

/// One vital statistic with the formula printed beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    /// Stat name.
    pub label: String,
    /// Displayed value.
    pub value: String,
    /// How the value is computed.
    pub formula: String,
}

/// A printable character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    /// Session identifier of the character.
    pub id: CharacterId,
    /// Rulebook the character was built with.
    pub rulebook: String,
    /// Hero name.
    pub name: String,
    /// Hero descriptor.
    pub descriptor: String,
    /// Optional roots text.
    pub roots: String,
    /// Hero conviction.
    pub conviction: String,
    /// Selected age.
    pub age: Option<String>,
    /// Ability boxes in canonical order.
    pub abilities: Vec<AbilityLine>,
    /// Hit points, armor class and supply.
    pub vitals: Vec<StatLine>,
    /// Inventory capacity.
    pub item_slots: i32,
    /// Chosen skills.
    pub skills: Vec<String>,
    /// Talent names, with the starting spell noted on Spellcasting.
    pub talents: Vec<String>,
    /// Items carried, without padding.
    pub inventory: Vec<String>,
    /// One "label: die" line per chain source.
    pub chains: Vec<String>,
    /// The hero dice ladder.
    pub hero_dice: Vec<Die>,
    /// Gold not spent on equipment.
    pub gold_left: u32,
}

impl CharacterSheet {
    /// Assemble the sheet for a character.
    pub fn build(character: &Character, book: &RuleBook) -> Self {
        let stats = DerivedStats::compute(character, book);

        let abilities = Ability::ALL
            .iter()
            .map(|&ability| {
                let score = character.abilities().get(ability);
                AbilityLine {
                    ability,
                    score,
                    formatted: signed(score),
                    condition: book
                        .ability_info(ability)
                        .map(|info| info.condition.clone())
                        .unwrap_or_default(),
                }
            })
            .collect();

        let vitals = vec![
            stat("Hit Points", stats.hit_points.to_string(), "10+STR+WIL"),
            stat("Armor Class", stats.armor_class.to_string(), "Armor + Shield"),
            stat("Supply", stats.supply.to_string(), "5+INT"),
        ];

        let cantrips = character.has_talent(TALENT_CANTRIPS);
        let talents = character
            .talents()
            .iter()
            .filter_map(|id| book.talent(id))
            .map(|talent| match character.spell() {
                Some(spell) if talent.id == TALENT_SPELLCAST && cantrips => {
                    format!("{} [Memorized: {}]", talent.name, spell.name)
                }
                Some(spell) if talent.id == TALENT_SPELLCAST => {
                    format!("{} [Starting Spell: {}]", talent.name, spell.name)
                }
                _ => talent.name.clone(),
            })
            .collect();

        let mut inventory = Vec::new();
        if let Some(spell) = character.spell().filter(|_| !cantrips) {
            inventory.push(format!("{} (Spell)", spell.name));
        }
        inventory.extend(character.cart().iter().map(|e| e.item.name.clone()));

        let chains = chain_sources(character.cart(), character.spell(), character.talents(), book)
            .into_iter()
            .map(|source| {
                let die = die_for_level(character.chain_level(&source.key));
                format!("{}: {die}", source.label)
            })
            .collect();

        Self {
            id: character.id(),
            rulebook: book.name.clone(),
            name: character.name().to_string(),
            descriptor: character.descriptor().to_string(),
            roots: character.roots().to_string(),
            conviction: character.conviction().to_string(),
            age: character.age().map(str::to_string),
            abilities,
            vitals,
            item_slots: stats.item_slots,
            skills: character.skills().to_vec(),
            talents,
            inventory,
            chains,
            hero_dice: CHAIN_LADDER.to_vec(),
            gold_left: stats.gold_left,
        }
    }

    /// Inventory padded with blank rows to at least [`INVENTORY_ROWS`].
    pub fn inventory_rows(&self) -> Vec<String> {
        let rows = self.inventory.len().max(INVENTORY_ROWS);
        let mut padded = self.inventory.clone();
        padded.resize(rows, String::new());
        padded
    }
}

fn stat(label: &str, value: String, formula: &str) -> StatLine {
    StatLine {
        label: label.to_string(),
        value,
        formula: formula.to_string(),
    }
}

/// The casting ability of a school and its value, when that value is
/// negative and casting may be difficult.
pub fn spell_warning(character: &Character, school: &str, book: &RuleBook) -> Option<(Ability, i32)> {
    let ability = book.school(school)?.ability;
    let value = character.abilities().get(ability);
    (value < 0).then_some((ability, value))
}
