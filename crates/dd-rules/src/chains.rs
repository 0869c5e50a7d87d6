//! Dice-chain sources and level reconciliation.
//!
//! Every weapon, shield, starting spell and chain-granting talent the
//! character holds is a chain source. Each source has a level on the
//! [`CHAIN_LADDER`](crate::dice::CHAIN_LADDER); levels are kept in a
//! [`Chains`] map that must be re-synced whenever the sources change.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::character::{CartEntry, CartEntryId, Spell};
use crate::dice::Die;
use crate::error::RulesError;
use crate::reference::RuleBook;

/// Chain levels keyed by source.
pub type Chains = BTreeMap<ChainKey, u8>;

/// Identity of a chain source.
///
/// Cart-derived keys use the purchase id rather than the item name, so two
/// identical purchases are two independent chains.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChainKey {
    /// A cart entry flagged as a weapon.
    Weapon(CartEntryId),
    /// A cart entry flagged as a shield.
    Shield(CartEntryId),
    /// The starting spell, by name.
    Spell(String),
    /// A chain-granting talent, by id.
    Talent(String),
}

impl fmt::Display for ChainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weapon(id) => write!(f, "cart-{id}"),
            Self::Shield(id) => write!(f, "cart-{id}-shield"),
            Self::Spell(name) => write!(f, "spell-{name}"),
            Self::Talent(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for ChainKey {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RulesError::InvalidChainKey(s.to_string()));
        }
        if let Some(name) = s.strip_prefix("spell-") {
            return Ok(Self::Spell(name.to_string()));
        }
        if let Some(rest) = s.strip_prefix("cart-") {
            let (number, shield) = match rest.strip_suffix("-shield") {
                Some(number) => (number, true),
                None => (rest, false),
            };
            let id = number
                .parse::<u32>()
                .map(CartEntryId)
                .map_err(|_| RulesError::InvalidChainKey(s.to_string()))?;
            return Ok(if shield {
                Self::Shield(id)
            } else {
                Self::Weapon(id)
            });
        }
        Ok(Self::Talent(s.to_string()))
    }
}

impl Serialize for ChainKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChainKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A chain source eligible for links, with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSource {
    /// Key into the chain levels.
    pub key: ChainKey,
    /// Label shown to the player (e.g., "Sword", "Spark (Spell)").
    pub label: String,
}

/// Collect chain sources in canonical order.
///
/// Cart sources come first in cart order (weapon before shield for the
/// same entry), then the spell, then talents in selection order.
pub fn chain_sources(
    cart: &[CartEntry],
    spell: Option<&Spell>,
    talents: &[String],
    book: &RuleBook,
) -> Vec<ChainSource> {
    let mut sources = Vec::new();

    for entry in cart {
        if entry.item.weapon {
            sources.push(ChainSource {
                key: ChainKey::Weapon(entry.id),
                label: entry.item.name.clone(),
            });
        }
        if entry.item.shield {
            sources.push(ChainSource {
                key: ChainKey::Shield(entry.id),
                label: format!("{} (Shield)", entry.item.name),
            });
        }
    }

    if let Some(spell) = spell {
        sources.push(ChainSource {
            key: ChainKey::Spell(spell.name.clone()),
            label: format!("{} (Spell)", spell.name),
        });
    }

    for id in talents {
        if let Some(label) = book.talent(id).and_then(|t| t.chain.as_ref()) {
            sources.push(ChainSource {
                key: ChainKey::Talent(id.clone()),
                label: label.clone(),
            });
        }
    }

    sources
}

/// Rebuild chain levels for the current sources.
///
/// Keys that are still sources keep their level, new sources start at 0,
/// and keys with no source are dropped.
pub fn sync_chains(
    chains: &Chains,
    cart: &[CartEntry],
    spell: Option<&Spell>,
    talents: &[String],
    book: &RuleBook,
) -> Chains {
    chain_sources(cart, spell, talents, book)
        .into_iter()
        .map(|source| {
            let level = chains.get(&source.key).copied().unwrap_or(0);
            (source.key, level)
        })
        .collect()
}

/// Die currently reached by a chain level.
pub fn die_for_level(level: u8) -> Die {
    Die::at_chain_level(level).unwrap_or(Die::D12)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;
    use crate::reference::EquipmentItem;

    fn entry(id: u32, name: &str, weapon: bool, shield: bool) -> CartEntry {
        CartEntry {
            id: CartEntryId(id),
            item: EquipmentItem {
                name: name.to_string(),
                properties: String::new(),
                slots: 1,
                cost: 1,
                weapon,
                armor: None,
                shield,
            },
        }
    }

    fn spark() -> Spell {
        Spell {
            name: "Spark".to_string(),
            school: "Arcane".to_string(),
        }
    }

    fn talents(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn key_display_and_parse() {
        let keys = [
            ChainKey::Weapon(CartEntryId(3)),
            ChainKey::Shield(CartEntryId(3)),
            ChainKey::Spell("Frost Needle".to_string()),
            ChainKey::Talent("brawler".to_string()),
        ];
        let shown: Vec<String> = keys.iter().map(ChainKey::to_string).collect();
        assert_eq!(shown, ["cart-3", "cart-3-shield", "spell-Frost Needle", "brawler"]);
        for key in keys {
            assert_eq!(key.to_string().parse::<ChainKey>().unwrap(), key);
        }
    }

    #[test]
    fn key_parse_rejects_bad_cart_id() {
        assert!("cart-x".parse::<ChainKey>().is_err());
        assert!("".parse::<ChainKey>().is_err());
    }

    #[test]
    fn sources_in_canonical_order() {
        let book = RuleBook::standard();
        let cart = vec![
            entry(1, "Rope", false, false),
            entry(2, "Spiked Shield", true, true),
            entry(3, "Sword", true, false),
        ];
        let spell = spark();
        let sources = chain_sources(
            &cart,
            Some(&spell),
            &talents(&["spellcast", "brawler"]),
            &book,
        );
        let labels: Vec<&str> = sources.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Spiked Shield",
                "Spiked Shield (Shield)",
                "Sword",
                "Spark (Spell)",
                "Unarmed Strikes"
            ]
        );
        assert_eq!(sources[3].key.to_string(), "spell-Spark");
    }

    #[test]
    fn spell_source_between_cart_and_talents() {
        let book = RuleBook::standard();
        let cart = vec![entry(1, "Sword", true, false)];
        let spell = spark();
        let sources = chain_sources(
            &cart,
            Some(&spell),
            &talents(&["spellcast", "cantrips"]),
            &book,
        );
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].key, ChainKey::Spell("Spark".to_string()));
        assert_eq!(sources[1].label, "Spark (Spell)");
    }

    #[test]
    fn identical_items_are_separate_sources() {
        let book = RuleBook::standard();
        let cart = vec![entry(1, "Dagger", true, false), entry(2, "Dagger", true, false)];
        let sources = chain_sources(&cart, None, &[], &book);
        assert_eq!(sources.len(), 2);
        assert_ne!(sources[0].key, sources[1].key);
    }

    #[test]
    fn sync_keeps_levels_and_adds_new_keys() {
        let book = RuleBook::standard();
        let cart = vec![entry(1, "Sword", true, false), entry(2, "Buckler", false, true)];
        let mut previous = Chains::new();
        previous.insert(ChainKey::Weapon(CartEntryId(1)), 2);
        previous.insert(ChainKey::Talent("berserker".to_string()), 1);

        let synced = sync_chains(&previous, &cart, None, &talents(&["brawler"]), &book);
        assert_eq!(synced.len(), 3);
        assert_eq!(synced[&ChainKey::Weapon(CartEntryId(1))], 2);
        assert_eq!(synced[&ChainKey::Shield(CartEntryId(2))], 0);
        assert_eq!(synced[&ChainKey::Talent("brawler".to_string())], 0);
        assert!(!synced.contains_key(&ChainKey::Talent("berserker".to_string())));
    }

    #[test]
    fn removing_weapon_drops_its_key() {
        let book = RuleBook::standard();
        let cart = vec![entry(1, "Sword", true, false), entry(2, "Spear", true, false)];
        let synced = sync_chains(&Chains::new(), &cart, None, &[], &book);
        assert_eq!(synced.len(), 2);

        let synced = sync_chains(&synced, &cart[1..], None, &[], &book);
        assert_eq!(synced.len(), 1);
        assert!(!synced.contains_key(&ChainKey::Weapon(CartEntryId(1))));
    }

    #[test]
    fn sync_is_idempotent() {
        let book = RuleBook::standard();
        let cart = vec![entry(1, "Sword", true, true)];
        let spell = spark();
        let ts = talents(&["spellcast", "rune_singer"]);
        let mut start = Chains::new();
        start.insert(ChainKey::Spell("Spark".to_string()), 3);
        start.insert(ChainKey::Weapon(CartEntryId(9)), 4);

        let once = sync_chains(&start, &cart, Some(&spell), &ts, &book);
        let twice = sync_chains(&once, &cart, Some(&spell), &ts, &book);
        assert_eq!(once, twice);
    }

    #[test]
    fn chains_serialize_with_string_keys() {
        let mut chains = Chains::new();
        chains.insert(ChainKey::Shield(CartEntryId(4)), 2);
        let json = serde_json::to_string(&chains).unwrap();
        assert_eq!(json, r#"{"cart-4-shield":2}"#);
        let back: Chains = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chains);
    }

    fn standard_items(book: &RuleBook) -> Vec<EquipmentItem> {
        book.equipment
            .iter()
            .flat_map(|c| c.items.iter().cloned())
            .collect()
    }

    fn standard_spells(book: &RuleBook) -> Vec<Spell> {
        book.spells
            .iter()
            .flat_map(|school| {
                school.spells.iter().map(|s| Spell {
                    name: s.name.clone(),
                    school: school.name.clone(),
                })
            })
            .collect()
    }

    proptest! {
        #[test]
        fn sync_is_stable_for_any_sources(
            picks in prop::collection::vec(0usize..64, 0..8),
            spell_pick in prop::option::of(0usize..64),
            talent_picks in prop::collection::btree_set(0usize..64, 0..=2),
            prior in prop::collection::vec((0u32..12, 0u8..4, 0u8..=4), 0..10),
        ) {
            let book = RuleBook::standard();
            let items = standard_items(&book);
            let spells = standard_spells(&book);

            let cart: Vec<CartEntry> = picks
                .iter()
                .enumerate()
                .map(|(n, &i)| CartEntry {
                    id: CartEntryId(n as u32 + 1),
                    item: items[i % items.len()].clone(),
                })
                .collect();
            let spell = spell_pick.map(|i| spells[i % spells.len()].clone());
            let mut chosen: Vec<String> = Vec::new();
            for i in talent_picks {
                let id = book.talents[i % book.talents.len()].id.clone();
                if !chosen.contains(&id) {
                    chosen.push(id);
                }
            }
            let start: Chains = prior
                .into_iter()
                .map(|(n, kind, level)| {
                    let key = match kind {
                        0 => ChainKey::Weapon(CartEntryId(n)),
                        1 => ChainKey::Shield(CartEntryId(n)),
                        2 => ChainKey::Spell(spells[n as usize % spells.len()].name.clone()),
                        _ => ChainKey::Talent(book.talents[n as usize % book.talents.len()].id.clone()),
                    };
                    (key, level)
                })
                .collect();

            let once = sync_chains(&start, &cart, spell.as_ref(), &chosen, &book);
            let twice = sync_chains(&once, &cart, spell.as_ref(), &chosen, &book);
            prop_assert_eq!(&once, &twice);

            let source_keys: BTreeSet<ChainKey> = chain_sources(&cart, spell.as_ref(), &chosen, &book)
                .into_iter()
                .map(|s| s.key)
                .collect();
            let synced_keys: BTreeSet<ChainKey> = once.keys().cloned().collect();
            prop_assert_eq!(&synced_keys, &source_keys);

            for (key, level) in &once {
                match start.get(key) {
                    Some(prior_level) => {
                        prop_assert_eq!(level, prior_level);
                    }
                    None => {
                        prop_assert_eq!(*level, 0);
                    }
                }
            }
        }
    }

    #[test]
    fn dice_for_levels() {
        assert_eq!(die_for_level(0), Die::D4);
        assert_eq!(die_for_level(4), Die::D12);
    }
}
