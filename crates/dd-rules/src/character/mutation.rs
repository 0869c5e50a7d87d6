//! The single mutation path for a [`Character`].
//!
//! Each [`Mutation`] variant carries its own cascade: changing the age
//! clears skills and chains, dropping Spellcasting clears the spell, and
//! lowering gold prunes the cart. A mutation that would break an invariant
//! is rejected and leaves the character untouched.

use std::fmt;

use crate::chains::{ChainKey, chain_sources};
use crate::derived::{links_left, points_left, total_spent};
use crate::dice::MAX_CHAIN_LEVEL;
use crate::reference::{Ability, RuleBook, TALENT_SPELLCAST};

use super::{
    ABILITY_MAX, ABILITY_MIN, CartEntry, CartEntryId, Character, ConceptField, Spell,
    TALENT_PICKS,
};

/// A single-step adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delta {
    /// One step up.
    Up,
    /// One step down.
    Down,
}

impl Delta {
    /// The signed step.
    pub fn value(self) -> i32 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

/// Every way a character can be changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Set a free-text identity field.
    SetConcept {
        /// Which field.
        field: ConceptField,
        /// New text.
        value: String,
    },
    /// Select an age by name. Always clears skills and chains.
    SetAge(String),
    /// Raise or lower one ability by a single point.
    AdjustAbility {
        /// Which ability.
        ability: Ability,
        /// Direction.
        delta: Delta,
    },
    /// Select or deselect a skill by name.
    ToggleSkill(String),
    /// Select or deselect a talent by id or name.
    ToggleTalent(String),
    /// Browse a spell school.
    SelectSchool(String),
    /// Choose the starting spell.
    SetSpell {
        /// School name.
        school: String,
        /// Spell name.
        name: String,
    },
    /// Set starting gold. Negative amounts become 0.
    SetGold(i64),
    /// Buy an item by name.
    AddCartItem(String),
    /// Return a purchase.
    RemoveCartItem(CartEntryId),
    /// Move a chain one rung up or down.
    AdjustChain {
        /// Source key.
        key: ChainKey,
        /// Direction.
        delta: Delta,
    },
}

/// Why a mutation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No age with this name.
    UnknownAge(String),
    /// No skill with this name.
    UnknownSkill(String),
    /// No talent with this id or name.
    UnknownTalent(String),
    /// No spell school with this name.
    UnknownSchool(String),
    /// No such spell in the school.
    UnknownSpell {
        /// School searched.
        school: String,
        /// Spell requested.
        name: String,
    },
    /// No equipment with this name.
    UnknownItem(String),
    /// No purchase with this id.
    UnknownCartEntry(CartEntryId),
    /// The key is not one of the character's current chain sources.
    UnknownChain(ChainKey),
    /// The ability would leave [-2, 5].
    AbilityOutOfRange(Ability),
    /// No ability points left to spend.
    NoPointsLeft,
    /// The step needs an age first.
    NoAge,
    /// All skill picks for the age are used.
    SkillQuotaFull(usize),
    /// Two talents are already chosen.
    TalentLimit,
    /// A spell needs the Spellcasting talent.
    SpellcastRequired,
    /// Not enough gold left.
    CannotAfford {
        /// Item requested.
        item: String,
        /// Its price.
        cost: u32,
        /// Gold remaining.
        gold_left: u32,
    },
    /// The chain would leave the d4..d12 ladder.
    ChainOutOfRange(ChainKey),
    /// No links left to spend.
    NoLinksLeft,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAge(name) => write!(f, "unknown age: {name}"),
            Self::UnknownSkill(name) => write!(f, "unknown skill: {name}"),
            Self::UnknownTalent(name) => write!(f, "unknown talent: {name}"),
            Self::UnknownSchool(name) => write!(f, "unknown spell school: {name}"),
            Self::UnknownSpell { school, name } => {
                write!(f, "no spell '{name}' in the {school} school")
            }
            Self::UnknownItem(name) => write!(f, "unknown item: {name}"),
            Self::UnknownCartEntry(id) => write!(f, "no purchase #{id} in the cart"),
            Self::UnknownChain(key) => write!(f, "'{key}' is not a chain source"),
            Self::AbilityOutOfRange(ability) => {
                write!(f, "{ability} must stay between {ABILITY_MIN:+} and {ABILITY_MAX:+}")
            }
            Self::NoPointsLeft => write!(f, "no ability points left"),
            Self::NoAge => write!(f, "choose an age first"),
            Self::SkillQuotaFull(quota) => write!(f, "already chose {quota} skills"),
            Self::TalentLimit => write!(f, "already chose {TALENT_PICKS} talents"),
            Self::SpellcastRequired => write!(f, "a starting spell requires Spellcasting"),
            Self::CannotAfford {
                item,
                cost,
                gold_left,
            } => write!(f, "{item} costs {cost} gp but only {gold_left} gp left"),
            Self::ChainOutOfRange(key) => write!(f, "chain '{key}' must stay between d4 and d12"),
            Self::NoLinksLeft => write!(f, "no chain links left"),
        }
    }
}

/// Outcome of applying a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The character was updated.
    Changed,
    /// The character is unchanged.
    Rejected(Rejection),
}

impl Applied {
    /// Returns true if the mutation took effect.
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed)
    }
}

type Outcome = Result<(), Rejection>;

impl Character {
    /// Apply a mutation with its cascades, or reject it as a no-op.
    pub fn apply(&mut self, mutation: Mutation, book: &RuleBook) -> Applied {
        let touches_sources = matches!(
            mutation,
            Mutation::ToggleTalent(_)
                | Mutation::SetSpell { .. }
                | Mutation::SetGold(_)
                | Mutation::AddCartItem(_)
                | Mutation::RemoveCartItem(_)
        );

        let outcome = match mutation {
            Mutation::SetConcept { field, value } => {
                self.set_concept(field, value);
                Ok(())
            }
            Mutation::SetAge(name) => self.set_age(&name, book),
            Mutation::AdjustAbility { ability, delta } => {
                self.adjust_ability(ability, delta, book)
            }
            Mutation::ToggleSkill(name) => self.toggle_skill(&name, book),
            Mutation::ToggleTalent(name) => self.toggle_talent(&name, book),
            Mutation::SelectSchool(name) => self.select_school(&name, book),
            Mutation::SetSpell { school, name } => self.set_spell(&school, &name, book),
            Mutation::SetGold(amount) => {
                self.set_gold(amount);
                Ok(())
            }
            Mutation::AddCartItem(name) => self.add_cart_item(&name, book),
            Mutation::RemoveCartItem(id) => self.remove_cart_item(id),
            Mutation::AdjustChain { key, delta } => self.adjust_chain(key, delta, book),
        };

        match outcome {
            Ok(()) => {
                if touches_sources {
                    self.sync_chains(book);
                }
                Applied::Changed
            }
            Err(reason) => {
                tracing::debug!(character = %self.id, %reason, "mutation rejected");
                Applied::Rejected(reason)
            }
        }
    }

    fn set_concept(&mut self, field: ConceptField, value: String) {
        let slot = match field {
            ConceptField::Name => &mut self.name,
            ConceptField::Descriptor => &mut self.descriptor,
            ConceptField::Roots => &mut self.roots,
            ConceptField::Conviction => &mut self.conviction,
        };
        *slot = value;
    }

    fn set_age(&mut self, name: &str, book: &RuleBook) -> Outcome {
        let age = book
            .age(name)
            .ok_or_else(|| Rejection::UnknownAge(name.to_string()))?;
        self.age = Some(age.name.clone());
        // Quotas and link budgets belong to the age.
        self.skills.clear();
        self.chains.clear();
        Ok(())
    }

    fn adjust_ability(&mut self, ability: Ability, delta: Delta, book: &RuleBook) -> Outcome {
        let next = self.abilities.get(ability) + delta.value();
        if !(ABILITY_MIN..=ABILITY_MAX).contains(&next) {
            return Err(Rejection::AbilityOutOfRange(ability));
        }
        if delta == Delta::Up && points_left(&self.abilities, self.age_config(book)) <= 0 {
            return Err(Rejection::NoPointsLeft);
        }
        *self.abilities.get_mut(ability) = next;
        Ok(())
    }

    fn toggle_skill(&mut self, name: &str, book: &RuleBook) -> Outcome {
        let skill = book
            .skill(name)
            .ok_or_else(|| Rejection::UnknownSkill(name.to_string()))?;
        let quota = self.age_config(book).ok_or(Rejection::NoAge)?.skills;

        if let Some(pos) = self.skills.iter().position(|s| s == skill) {
            self.skills.remove(pos);
        } else if self.skills.len() >= quota {
            return Err(Rejection::SkillQuotaFull(quota));
        } else {
            self.skills.push(skill.to_string());
        }
        Ok(())
    }

    fn toggle_talent(&mut self, name: &str, book: &RuleBook) -> Outcome {
        let talent = book
            .talent(name)
            .ok_or_else(|| Rejection::UnknownTalent(name.to_string()))?;

        if let Some(pos) = self.talents.iter().position(|t| *t == talent.id) {
            self.talents.remove(pos);
            if talent.id == TALENT_SPELLCAST {
                self.spell = None;
            }
        } else if self.talents.len() >= TALENT_PICKS {
            return Err(Rejection::TalentLimit);
        } else {
            self.talents.push(talent.id.clone());
        }
        Ok(())
    }

    fn select_school(&mut self, name: &str, book: &RuleBook) -> Outcome {
        let school = book
            .school(name)
            .ok_or_else(|| Rejection::UnknownSchool(name.to_string()))?;
        self.spell_school = school.name.clone();
        Ok(())
    }

    fn set_spell(&mut self, school: &str, name: &str, book: &RuleBook) -> Outcome {
        if !self.has_talent(TALENT_SPELLCAST) {
            return Err(Rejection::SpellcastRequired);
        }
        let (school_info, spell) =
            book.spell(school, name)
                .ok_or_else(|| Rejection::UnknownSpell {
                    school: school.to_string(),
                    name: name.to_string(),
                })?;
        self.spell_school = school_info.name.clone();
        self.spell = Some(Spell {
            name: spell.name.clone(),
            school: school_info.name.clone(),
        });
        Ok(())
    }

    fn set_gold(&mut self, amount: i64) {
        let gold = u32::try_from(amount.max(0)).unwrap_or(u32::MAX);
        self.gold = gold;

        // Keep purchases in order while they still fit.
        let mut running: u64 = 0;
        self.cart.retain(|entry| {
            let next = running + u64::from(entry.item.cost);
            if next <= u64::from(gold) {
                running = next;
                true
            } else {
                false
            }
        });
    }

    fn add_cart_item(&mut self, name: &str, book: &RuleBook) -> Outcome {
        let item = book
            .item(name)
            .ok_or_else(|| Rejection::UnknownItem(name.to_string()))?;
        let gold_left = self.gold.saturating_sub(total_spent(&self.cart));
        if item.cost > gold_left {
            return Err(Rejection::CannotAfford {
                item: item.name.clone(),
                cost: item.cost,
                gold_left,
            });
        }
        let id = CartEntryId(self.next_entry);
        self.next_entry += 1;
        self.cart.push(CartEntry {
            id,
            item: item.clone(),
        });
        Ok(())
    }

    fn remove_cart_item(&mut self, id: CartEntryId) -> Outcome {
        let pos = self
            .cart
            .iter()
            .position(|e| e.id == id)
            .ok_or(Rejection::UnknownCartEntry(id))?;
        self.cart.remove(pos);
        Ok(())
    }

    fn adjust_chain(&mut self, key: ChainKey, delta: Delta, book: &RuleBook) -> Outcome {
        let is_source = chain_sources(&self.cart, self.spell.as_ref(), &self.talents, book)
            .iter()
            .any(|s| s.key == key);
        if !is_source {
            return Err(Rejection::UnknownChain(key));
        }

        let level = self.chain_level(&key);
        let next = match delta {
            Delta::Up => {
                if level >= MAX_CHAIN_LEVEL {
                    return Err(Rejection::ChainOutOfRange(key));
                }
                if links_left(&self.chains, self.age_config(book)) <= 0 {
                    return Err(Rejection::NoLinksLeft);
                }
                level + 1
            }
            Delta::Down => match level.checked_sub(1) {
                Some(next) => next,
                None => return Err(Rejection::ChainOutOfRange(key)),
            },
        };
        self.chains.insert(key, next);
        Ok(())
    }
}
