//! The eight-step creation wizard.
//!
//! A [`Wizard`] owns the rulebook, the character under construction, the
//! current [`Step`] and a seeded RNG for the gold roll. Forward movement is
//! gated by [`can_advance`]; moving back or jumping to an earlier step
//! never is.

pub mod config;

pub use config::CreatorConfig;

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::chains::ChainSource;
use crate::character::{Applied, Character, Mutation};
use crate::derived::{DerivedStats, points_left};
use crate::dice::{DicePool, Die, RollResult};
use crate::error::{RulesError, RulesResult};
use crate::reference::{RuleBook, TALENT_SPELLCAST};
use crate::sheet::CharacterSheet;

/// Number of d20s rolled for starting gold.
pub const GOLD_DICE: usize = 3;

/// A wizard step, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    /// Name, descriptor, roots and conviction.
    Concept,
    /// Choose an age.
    Age,
    /// Spend ability points.
    Abilities,
    /// Choose skills.
    Skills,
    /// Choose talents and a starting spell.
    Talents,
    /// Set gold and buy equipment.
    Equipment,
    /// Spend chain links.
    DiceChains,
    /// The finished sheet.
    Sheet,
}

impl Step {
    /// All steps, in order.
    pub const ALL: [Step; 8] = [
        Self::Concept,
        Self::Age,
        Self::Abilities,
        Self::Skills,
        Self::Talents,
        Self::Equipment,
        Self::DiceChains,
        Self::Sheet,
    ];

    /// Zero-based position of the step.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The following step, or `None` at the sheet.
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The preceding step, or `None` at the concept.
    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Display name of the step.
    pub fn name(self) -> &'static str {
        match self {
            Self::Concept => "Concept",
            Self::Age => "Age",
            Self::Abilities => "Abilities",
            Self::Skills => "Skills",
            Self::Talents => "Talents",
            Self::Equipment => "Equipment",
            Self::DiceChains => "Dice Chains",
            Self::Sheet => "Character Sheet",
        }
    }

    /// Parse a step from its name (ignoring case and spaces) or its
    /// 1-based number.
    pub fn from_name(s: &str) -> RulesResult<Self> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| Self::ALL.get(i).copied())
                .ok_or_else(|| RulesError::UnknownStep(trimmed.to_string()));
        }
        let compact: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match compact.as_str() {
            "concept" => Ok(Self::Concept),
            "age" => Ok(Self::Age),
            "abilities" => Ok(Self::Abilities),
            "skills" => Ok(Self::Skills),
            "talents" => Ok(Self::Talents),
            "equipment" => Ok(Self::Equipment),
            "dicechains" | "chains" => Ok(Self::DiceChains),
            "sheet" | "charactersheet" => Ok(Self::Sheet),
            _ => Err(RulesError::UnknownStep(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Whether the character satisfies the gate for leaving `step` forward.
pub fn can_advance(step: Step, character: &Character, book: &RuleBook) -> bool {
    let age = character.age_config(book);
    match step {
        Step::Concept => {
            !character.name().trim().is_empty()
                && !character.descriptor().trim().is_empty()
                && !character.conviction().trim().is_empty()
        }
        Step::Age => age.is_some(),
        Step::Abilities => age.is_some() && points_left(character.abilities(), age) == 0,
        Step::Skills => age.is_some_and(|a| character.skills().len() == a.skills),
        Step::Talents => {
            character.talents().len() == crate::character::TALENT_PICKS
                && (!character.has_talent(TALENT_SPELLCAST) || character.spell().is_some())
        }
        Step::Equipment => character.gold() > 0,
        Step::DiceChains => true,
        Step::Sheet => false,
    }
}

/// An interactive character creation session.
pub struct Wizard {
    book: RuleBook,
    step: Step,
    character: Character,
    rng: StdRng,
}

impl Wizard {
    /// Start a session at the concept step with a blank character.
    pub fn new(book: RuleBook, config: &CreatorConfig) -> Self {
        let character = Character::new();
        tracing::info!(character = %character.id(), seed = config.seed, "creation started");
        Self {
            book,
            step: Step::Concept,
            character,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// The rulebook in use.
    pub fn book(&self) -> &RuleBook {
        &self.book
    }

    /// The current step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// The character under construction.
    pub fn character(&self) -> &Character {
        &self.character
    }

    /// Whether the current step's gate is satisfied.
    pub fn ready(&self) -> bool {
        can_advance(self.step, &self.character, &self.book)
    }

    /// Whether the session is on the final sheet.
    pub fn is_last_step(&self) -> bool {
        self.step == Step::Sheet
    }

    /// Steps before the current one.
    pub fn completed_steps(&self) -> &'static [Step] {
        &Step::ALL[..self.step.index()]
    }

    /// Move forward if the current gate allows it.
    ///
    /// Chains are reconciled with the cart, spell and talents before the
    /// dice chain step becomes active.
    pub fn advance(&mut self) -> bool {
        if !self.ready() {
            tracing::debug!(step = %self.step, "advance blocked");
            return false;
        }
        let Some(next) = self.step.next() else {
            return false;
        };
        if self.step == Step::Equipment {
            self.character.sync_chains(&self.book);
        }
        tracing::info!(character = %self.character.id(), from = %self.step, to = %next, "step advanced");
        self.step = next;
        true
    }

    /// Move back one step. Returns false on the first step.
    pub fn back(&mut self) -> bool {
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    /// Jump to a strictly earlier step without re-validating.
    pub fn jump_to(&mut self, step: Step) -> bool {
        if step >= self.step {
            return false;
        }
        tracing::info!(character = %self.character.id(), from = %self.step, to = %step, "jumped back");
        self.step = step;
        true
    }

    /// Apply a mutation to the character.
    pub fn update(&mut self, mutation: Mutation) -> Applied {
        self.character.apply(mutation, &self.book)
    }

    /// Roll 3d20 for starting gold and set it.
    pub fn roll_gold(&mut self) -> (RollResult, Applied) {
        let pool = DicePool::of(Die::D20, GOLD_DICE);
        let roll = pool.roll(&mut self.rng);
        let applied = self.update(Mutation::SetGold(i64::from(roll.total())));
        tracing::debug!(pool = %pool, roll = %roll, "rolled starting gold");
        (roll, applied)
    }

    /// Discard the character and return to the first step.
    pub fn restart(&mut self) {
        self.character = Character::new();
        self.step = Step::Concept;
        tracing::info!(character = %self.character.id(), "creation restarted");
    }

    /// Derived stats of the current character.
    pub fn derived(&self) -> DerivedStats {
        DerivedStats::compute(&self.character, &self.book)
    }

    /// Current chain sources in display order.
    pub fn chain_sources(&self) -> Vec<ChainSource> {
        crate::chains::chain_sources(
            self.character.cart(),
            self.character.spell(),
            self.character.talents(),
            &self.book,
        )
    }

    /// Assemble the character sheet.
    pub fn sheet(&self) -> CharacterSheet {
        CharacterSheet::build(&self.character, &self.book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::ChainKey;
    use crate::character::{ConceptField, Delta};
    use crate::reference::Ability;

    fn wizard() -> Wizard {
        Wizard::new(RuleBook::standard(), &CreatorConfig::default())
    }

    fn concept(w: &mut Wizard, field: ConceptField, value: &str) {
        w.update(Mutation::SetConcept {
            field,
            value: value.to_string(),
        });
    }

    fn raise(w: &mut Wizard, ability: Ability, times: usize) {
        for _ in 0..times {
            w.update(Mutation::AdjustAbility {
                ability,
                delta: Delta::Up,
            });
        }
    }

    #[test]
    fn step_navigation() {
        assert_eq!(Step::Concept.next(), Some(Step::Age));
        assert_eq!(Step::Sheet.next(), None);
        assert_eq!(Step::Concept.prev(), None);
        assert_eq!(Step::Sheet.prev(), Some(Step::DiceChains));
        assert_eq!(Step::DiceChains.index(), 6);
    }

    #[test]
    fn step_from_name() {
        assert_eq!(Step::from_name("dice chains").unwrap(), Step::DiceChains);
        assert_eq!(Step::from_name("Abilities").unwrap(), Step::Abilities);
        assert_eq!(Step::from_name("1").unwrap(), Step::Concept);
        assert_eq!(Step::from_name("8").unwrap(), Step::Sheet);
        assert!(Step::from_name("0").is_err());
        assert!(Step::from_name("9").is_err());
        assert!(Step::from_name("inventory").is_err());
    }

    #[test]
    fn concept_gate_ignores_roots() {
        let mut w = wizard();
        assert!(!w.advance());
        concept(&mut w, ConceptField::Name, "Laima");
        concept(&mut w, ConceptField::Descriptor, "  ");
        concept(&mut w, ConceptField::Conviction, "The river remembers.");
        assert!(!w.ready());
        concept(&mut w, ConceptField::Descriptor, "Wandering kokle player");
        assert!(w.ready());
        assert!(w.advance());
        assert_eq!(w.step(), Step::Age);
    }

    #[test]
    fn abilities_gate_needs_exact_budget() {
        let book = RuleBook::standard();
        let mut c = Character::new();
        c.apply(Mutation::SetAge("Adult".to_string()), &book);
        let up = |ability| Mutation::AdjustAbility {
            ability,
            delta: Delta::Up,
        };
        for _ in 0..7 {
            c.apply(up(Ability::Int), &book);
        }
        assert!(!can_advance(Step::Abilities, &c, &book));
        c.apply(up(Ability::Cha), &book);
        assert!(can_advance(Step::Abilities, &c, &book));
    }

    #[test]
    fn abilities_gate_fails_after_age_downgrade() {
        let book = RuleBook::standard();
        let mut c = Character::new();
        c.apply(Mutation::SetAge("Elder".to_string()), &book);
        for _ in 0..5 {
            c.apply(
                Mutation::AdjustAbility {
                    ability: Ability::Str,
                    delta: Delta::Up,
                },
                &book,
            );
        }
        for _ in 0..5 {
            c.apply(
                Mutation::AdjustAbility {
                    ability: Ability::Dex,
                    delta: Delta::Up,
                },
                &book,
            );
        }
        assert!(can_advance(Step::Abilities, &c, &book));
        c.apply(Mutation::SetAge("Adult".to_string()), &book);
        assert!(!can_advance(Step::Abilities, &c, &book));
    }

    #[test]
    fn skills_and_talents_gates() {
        let book = RuleBook::standard();
        let mut c = Character::new();
        assert!(!can_advance(Step::Skills, &c, &book));
        c.apply(Mutation::SetAge("Youth".to_string()), &book);
        for skill in ["Lore", "Stealth"] {
            c.apply(Mutation::ToggleSkill(skill.to_string()), &book);
        }
        assert!(!can_advance(Step::Skills, &c, &book));
        c.apply(Mutation::ToggleSkill("Tracking".to_string()), &book);
        assert!(can_advance(Step::Skills, &c, &book));

        c.apply(Mutation::ToggleTalent("spellcast".to_string()), &book);
        c.apply(Mutation::ToggleTalent("cantrips".to_string()), &book);
        assert!(!can_advance(Step::Talents, &c, &book));
        c.apply(
            Mutation::SetSpell {
                school: "Divine".to_string(),
                name: "Mend".to_string(),
            },
            &book,
        );
        assert!(can_advance(Step::Talents, &c, &book));
    }

    #[test]
    fn equipment_gate_needs_gold() {
        let book = RuleBook::standard();
        let mut c = Character::new();
        assert!(!can_advance(Step::Equipment, &c, &book));
        c.apply(Mutation::SetGold(1), &book);
        assert!(can_advance(Step::Equipment, &c, &book));
        assert!(can_advance(Step::DiceChains, &c, &book));
        assert!(!can_advance(Step::Sheet, &c, &book));
    }

    #[test]
    fn back_and_jump() {
        let mut w = wizard();
        assert!(!w.back());
        concept(&mut w, ConceptField::Name, "Laima");
        concept(&mut w, ConceptField::Descriptor, "Kokle player");
        concept(&mut w, ConceptField::Conviction, "Song outlives stone.");
        w.advance();
        w.update(Mutation::SetAge("Youth".to_string()));
        w.advance();
        assert_eq!(w.step(), Step::Abilities);
        assert_eq!(w.completed_steps(), [Step::Concept, Step::Age]);

        assert!(!w.jump_to(Step::Abilities));
        assert!(!w.jump_to(Step::Skills));
        assert!(w.jump_to(Step::Concept));
        assert_eq!(w.step(), Step::Concept);

        // Back never re-validates.
        w.advance();
        concept(&mut w, ConceptField::Name, "");
        assert!(w.back());
        assert_eq!(w.step(), Step::Concept);
        assert!(!w.ready());
    }

    #[test]
    fn gold_roll_is_seeded() {
        let mut a = wizard();
        let mut b = wizard();
        let (roll_a, applied) = a.roll_gold();
        let (roll_b, _) = b.roll_gold();
        assert!(applied.is_changed());
        assert_eq!(roll_a, roll_b);
        assert_eq!(roll_a.dice.len(), 3);
        assert!((3..=60).contains(&roll_a.total()));
        assert_eq!(a.character().gold(), roll_a.total());
    }

    #[test]
    fn full_walkthrough_reaches_sheet() {
        let mut w = wizard();
        concept(&mut w, ConceptField::Name, "Laima");
        concept(&mut w, ConceptField::Descriptor, "Wandering kokle player");
        concept(&mut w, ConceptField::Conviction, "The river remembers.");
        assert!(w.advance());

        w.update(Mutation::SetAge("Adult".to_string()));
        assert!(w.advance());

        raise(&mut w, Ability::Str, 5);
        raise(&mut w, Ability::Dex, 3);
        assert!(w.advance());

        for skill in ["Athletics", "Lore", "Survival", "Insight"] {
            w.update(Mutation::ToggleSkill(skill.to_string()));
        }
        assert!(w.advance());

        w.update(Mutation::ToggleTalent("tough".to_string()));
        w.update(Mutation::ToggleTalent("brawler".to_string()));
        assert!(w.advance());

        w.update(Mutation::SetGold(30));
        w.update(Mutation::AddCartItem("Sword".to_string()));
        assert!(w.advance());
        assert_eq!(w.step(), Step::DiceChains);

        let keys: Vec<String> = w.chain_sources().iter().map(|s| s.key.to_string()).collect();
        assert_eq!(keys, ["cart-1", "brawler"]);
        let applied = w.update(Mutation::AdjustChain {
            key: ChainKey::Talent("brawler".to_string()),
            delta: Delta::Up,
        });
        assert!(applied.is_changed());
        assert_eq!(w.derived().links_left, 2);

        assert!(w.advance());
        assert!(w.is_last_step());
        assert!(!w.advance());
        assert_eq!(w.derived().hit_points, 10 + 3 - 2 + 5);
    }

    #[test]
    fn restart_resets_everything() {
        let mut w = wizard();
        let first = w.character().id();
        concept(&mut w, ConceptField::Name, "Laima");
        w.update(Mutation::SetGold(12));
        w.restart();
        assert_eq!(w.step(), Step::Concept);
        assert_eq!(w.character().name(), "");
        assert_eq!(w.character().gold(), 0);
        assert_ne!(w.character().id(), first);
    }
}
