//! Derived statistics.
//!
//! Pure functions of ability scores, talents, the cart and the age budgets.
//! Nothing here is stored; stats are recomputed whenever they are shown.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::character::{Abilities, CartEntry, Character};
use crate::chains::Chains;
use crate::reference::{
    AgeConfig, RuleBook, TALENT_IRON_SKIN, TALENT_RESOURCEFUL, TALENT_TOUGH,
};

/// Base armor granted by Iron Skin when no armor is worn.
const IRON_SKIN_BASE: i32 = 2;
/// Armor added by carrying a shield.
const SHIELD_BONUS: i32 = 1;

fn has(talents: &[String], id: &str) -> bool {
    talents.iter().any(|t| t == id)
}

/// Hit points: 10 + STR + WIL, plus 5 for Tough.
pub fn hit_points(abilities: &Abilities, talents: &[String]) -> i32 {
    let tough = if has(talents, TALENT_TOUGH) { 5 } else { 0 };
    10 + abilities.str + abilities.wil + tough
}

/// Supply: INT + 5, or INT + 10 for Resourceful.
pub fn supply(abilities: &Abilities, talents: &[String]) -> i32 {
    let base = if has(talents, TALENT_RESOURCEFUL) { 10 } else { 5 };
    base + abilities.int
}

/// Item slots: 15 + STR.
pub fn item_slots(abilities: &Abilities) -> i32 {
    15 + abilities.str
}

/// Ability points still to distribute (0 without an age).
///
/// Negative only if the age was changed to a smaller budget after points
/// were spent.
pub fn points_left(abilities: &Abilities, age: Option<&AgeConfig>) -> i32 {
    match age {
        Some(age) => age.points - abilities.spent(),
        None => 0,
    }
}

/// Chain links still to spend (0 without an age).
pub fn links_left(chains: &Chains, age: Option<&AgeConfig>) -> i32 {
    match age {
        Some(age) => age.links - chains.values().map(|&l| i32::from(l)).sum::<i32>(),
        None => 0,
    }
}

/// Gold spent on the cart.
pub fn total_spent(cart: &[CartEntry]) -> u32 {
    cart.iter().map(|e| e.item.cost).sum()
}

/// Armor class as a base to which INT is added at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorClass {
    /// Base armor, or `None` when no armor source applies.
    pub base: Option<i32>,
}

impl ArmorClass {
    /// Determine armor from the first armor and shield in the cart.
    ///
    /// Worn armor sets the base; without it Iron Skin gives 2. A shield
    /// adds 1 on top of either, or stands alone as base 1.
    pub fn from_cart(cart: &[CartEntry], talents: &[String]) -> Self {
        let armor = cart.iter().find_map(|e| e.item.armor);
        let shield = cart.iter().any(|e| e.item.shield);

        let base = match armor {
            Some(weight) => Some(weight.base_ac()),
            None if has(talents, TALENT_IRON_SKIN) => Some(IRON_SKIN_BASE),
            None => None,
        };
        let base = match (base, shield) {
            (Some(b), true) => Some(b + SHIELD_BONUS),
            (None, true) => Some(SHIELD_BONUS),
            (b, false) => b,
        };
        Self { base }
    }
}

impl fmt::Display for ArmorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.base {
            Some(base) => write!(f, "{base} + INT"),
            None => write!(f, "—"),
        }
    }
}

/// Everything the sheet and the steps display about a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedStats {
    /// Maximum hit points.
    pub hit_points: i32,
    /// Supply.
    pub supply: i32,
    /// Inventory capacity.
    pub item_slots: i32,
    /// Armor class formula.
    pub armor_class: ArmorClass,
    /// Ability points left to distribute.
    pub points_left: i32,
    /// Chain links left to spend.
    pub links_left: i32,
    /// Gold spent on equipment.
    pub total_spent: u32,
    /// Gold not yet spent.
    pub gold_left: u32,
}

impl DerivedStats {
    /// Compute all derived stats for a character.
    pub fn compute(character: &Character, book: &RuleBook) -> Self {
        let age = character.age_config(book);
        let abilities = character.abilities();
        let talents = character.talents();
        let total_spent = total_spent(character.cart());
        Self {
            hit_points: hit_points(abilities, talents),
            supply: supply(abilities, talents),
            item_slots: item_slots(abilities),
            armor_class: ArmorClass::from_cart(character.cart(), talents),
            points_left: points_left(abilities, age),
            links_left: links_left(character.chains(), age),
            total_spent,
            gold_left: character.gold().saturating_sub(total_spent),
        }
    }
}

/// Format a score with an explicit sign, e.g. "+3" or "-2".
pub fn signed(n: i32) -> String {
    format!("{n:+}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CartEntryId;
    use crate::chains::ChainKey;
    use crate::reference::ArmorWeight;
    use proptest::prelude::*;

    fn talents(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn adult() -> AgeConfig {
        AgeConfig {
            name: "Adult".to_string(),
            points: 8,
            skills: 4,
            links: 3,
        }
    }

    fn cart_of(items: &[&str]) -> Vec<CartEntry> {
        let book = RuleBook::standard();
        items
            .iter()
            .zip(1..)
            .map(|(name, id)| CartEntry {
                id: CartEntryId(id),
                item: book.item(name).unwrap().clone(),
            })
            .collect()
    }

    #[test]
    fn hit_points_formula() {
        let abilities = Abilities {
            str: 3,
            wil: 1,
            ..Abilities::default()
        };
        assert_eq!(hit_points(&abilities, &[]), 14);
        assert_eq!(hit_points(&abilities, &talents(&["tough"])), 19);
        assert_eq!(hit_points(&Abilities::default(), &[]), 6);
    }

    #[test]
    fn supply_formula() {
        let abilities = Abilities {
            int: 2,
            ..Abilities::default()
        };
        assert_eq!(supply(&abilities, &[]), 7);
        assert_eq!(supply(&abilities, &talents(&["resourceful"])), 12);
    }

    #[test]
    fn item_slots_formula() {
        assert_eq!(item_slots(&Abilities::default()), 13);
        let strong = Abilities {
            str: 5,
            ..Abilities::default()
        };
        assert_eq!(item_slots(&strong), 20);
    }

    #[test]
    fn points_left_needs_age() {
        let abilities = Abilities {
            str: 3,
            dex: 1,
            ..Abilities::default()
        };
        assert_eq!(points_left(&abilities, None), 0);
        assert_eq!(points_left(&abilities, Some(&adult())), 0);
        assert_eq!(points_left(&Abilities::default(), Some(&adult())), 8);
    }

    #[test]
    fn links_left_counts_levels() {
        let mut chains = Chains::new();
        assert_eq!(links_left(&chains, None), 0);
        assert_eq!(links_left(&chains, Some(&adult())), 3);
        chains.insert(ChainKey::Weapon(CartEntryId(1)), 2);
        chains.insert(ChainKey::Talent("brawler".to_string()), 1);
        assert_eq!(links_left(&chains, Some(&adult())), 0);
    }

    #[test]
    fn total_spent_sums_costs() {
        assert_eq!(total_spent(&cart_of(&["Sword", "Dagger", "Torch"])), 13);
        assert_eq!(total_spent(&[]), 0);
    }

    fn ac(items: &[&str], ts: &[&str]) -> String {
        ArmorClass::from_cart(&cart_of(items), &talents(ts)).to_string()
    }

    #[test]
    fn armor_class_table() {
        assert_eq!(ac(&[], &[]), "—");
        assert_eq!(ac(&["Light Armor"], &[]), "2 + INT");
        assert_eq!(ac(&["Medium Armor"], &[]), "4 + INT");
        assert_eq!(ac(&["Heavy Armor", "Buckler"], &[]), "7 + INT");
        assert_eq!(ac(&[], &["iron_skin"]), "2 + INT");
        assert_eq!(ac(&["Buckler"], &["iron_skin"]), "3 + INT");
        assert_eq!(ac(&["Buckler"], &[]), "1 + INT");
        assert_eq!(ac(&["Light Armor"], &["iron_skin"]), "2 + INT");
        assert_eq!(ac(&["Sword", "Torch"], &["tough"]), "—");
    }

    #[test]
    fn first_armor_wins() {
        let armor = ArmorClass::from_cart(&cart_of(&["Light Armor", "Heavy Armor"]), &[]);
        assert_eq!(armor.base, Some(ArmorWeight::Light.base_ac()));
    }

    #[test]
    fn signed_format() {
        assert_eq!(signed(3), "+3");
        assert_eq!(signed(0), "+0");
        assert_eq!(signed(-2), "-2");
    }

    #[test]
    fn compute_for_fresh_character() {
        let book = RuleBook::standard();
        let stats = DerivedStats::compute(&Character::new(), &book);
        assert_eq!(stats.hit_points, 6);
        assert_eq!(stats.supply, 3);
        assert_eq!(stats.item_slots, 13);
        assert_eq!(stats.armor_class.base, None);
        assert_eq!(stats.points_left, 0);
        assert_eq!(stats.links_left, 0);
        assert_eq!(stats.total_spent, 0);
        assert_eq!(stats.gold_left, 0);
    }

    fn arb_abilities() -> impl Strategy<Value = Abilities> {
        prop::array::uniform5(-2i32..=5).prop_map(|[str, dex, int, wil, cha]| Abilities {
            str,
            dex,
            int,
            wil,
            cha,
        })
    }

    proptest! {
        #[test]
        fn points_left_is_budget_minus_spend(abilities in arb_abilities()) {
            let spend: i32 = [abilities.str, abilities.dex, abilities.int, abilities.wil, abilities.cha]
                .iter()
                .map(|v| v + 2)
                .sum();
            prop_assert_eq!(points_left(&abilities, Some(&adult())), 8 - spend);
            prop_assert_eq!(points_left(&abilities, None), 0);
        }

        #[test]
        fn hit_points_grow_with_tough(abilities in arb_abilities()) {
            let plain = hit_points(&abilities, &[]);
            prop_assert_eq!(hit_points(&abilities, &talents(&["tough"])), plain + 5);
        }
    }
}
