//! The rulebook shipped with the game.
//!
//! Produces the same [`RuleBook`] that the equivalent JSON file would,
//! without requiring one on disk.

use super::{
    Ability, AbilityInfo, AgeConfig, ArmorWeight, EquipmentCategory, EquipmentItem, RuleBook,
    SpellInfo, SpellSchool, TalentCategory, TalentInfo,
};

/// Standard Dzintaru Dziesmas tables.
pub fn standard() -> RuleBook {
    RuleBook {
        name: "Dzintaru Dziesmas".to_string(),
        abilities: abilities(),
        ages: vec![
            age("Youth", 6, 3, 5),
            age("Adult", 8, 4, 3),
            age("Elder", 10, 5, 1),
        ],
        skills: [
            "Athletics",
            "Acrobatics",
            "Stealth",
            "Sleight of Hand",
            "Lore",
            "Herbalism",
            "Survival",
            "Tracking",
            "Perception",
            "Insight",
            "Persuasion",
            "Intimidation",
            "Performance",
            "Crafting",
            "Medicine",
            "Navigation",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
        talents: talents(),
        spells: spells(),
        equipment: equipment(),
    }
}

fn abilities() -> Vec<AbilityInfo> {
    [
        (Ability::Str, "Strength", "Melee attacks, HP, Item Slots", "EXHAUSTED"),
        (Ability::Dex, "Dexterity", "Ranged attacks", "DAZED"),
        (Ability::Int, "Intellect", "Supply, Arcane Spells", "AGITATED"),
        (Ability::Wil, "Willpower", "HP, Primal Magic", "HOLLOW"),
        (Ability::Cha, "Charisma", "Divine Miracles", "INSECURE"),
    ]
    .into_iter()
    .map(|(ability, name, description, condition)| AbilityInfo {
        ability,
        name: name.to_string(),
        description: description.to_string(),
        condition: condition.to_string(),
    })
    .collect()
}

fn age(name: &str, points: i32, skills: usize, links: i32) -> AgeConfig {
    AgeConfig {
        name: name.to_string(),
        points,
        skills,
        links,
    }
}

fn talent(
    id: &str,
    name: &str,
    category: TalentCategory,
    description: &str,
    chain: Option<&str>,
) -> TalentInfo {
    TalentInfo {
        id: id.to_string(),
        name: name.to_string(),
        category,
        description: description.to_string(),
        chain: chain.map(String::from),
    }
}

fn talents() -> Vec<TalentInfo> {
    use TalentCategory::*;
    vec![
        talent(
            "brawler",
            "Brawler",
            Offensive,
            "Your fists are weapons. Unarmed strikes use their own dice chain.",
            Some("Unarmed Strikes"),
        ),
        talent(
            "duelist",
            "Duelist",
            Offensive,
            "When fighting a single foe, reroll the first missed attack each round.",
            None,
        ),
        talent(
            "berserker",
            "Berserker",
            Offensive,
            "Enter a rage when wounded, adding your Rage Die to melee damage.",
            Some("Rage Die"),
        ),
        talent(
            "tough",
            "Tough",
            Defensive,
            "Gain +5 maximum Hit Points.",
            None,
        ),
        talent(
            "iron_skin",
            "Iron Skin",
            Defensive,
            "While wearing no armor, your base Armor Class is 2.",
            None,
        ),
        talent(
            "parry",
            "Parry",
            Defensive,
            "Once per round, reduce melee damage taken by your weapon die.",
            None,
        ),
        talent(
            "resourceful",
            "Resourceful",
            Utility,
            "Your base Supply is 10 instead of 5.",
            None,
        ),
        talent(
            "scout",
            "Scout",
            Utility,
            "You always act first when exploring and cannot be surprised in the wild.",
            None,
        ),
        talent(
            "beastmaster",
            "Beastmaster",
            Utility,
            "A loyal animal companion fights at your side with its own dice chain.",
            Some("Companion"),
        ),
        talent(
            "spellcast",
            "Spellcasting",
            Mystique,
            "You begin play knowing one spell, which occupies an Inventory Slot.",
            None,
        ),
        talent(
            "cantrips",
            "Cantrips",
            Mystique,
            "Your starting spell is memorized and occupies no Inventory Slot.",
            None,
        ),
        talent(
            "rune_singer",
            "Rune Singer",
            Mystique,
            "Sing the old dainas to bless allies, rolling your Runesong die.",
            Some("Runesong"),
        ),
    ]
}

fn spell(name: &str, tier: &str, description: &str) -> SpellInfo {
    SpellInfo {
        name: name.to_string(),
        tier: tier.to_string(),
        description: description.to_string(),
    }
}

fn spells() -> Vec<SpellSchool> {
    vec![
        SpellSchool {
            name: "Arcane".to_string(),
            ability: Ability::Int,
            spells: vec![
                spell("Spark", "I", "A crackling bolt leaps to a target within sight."),
                spell("Frost Needle", "I", "A shard of ice pierces a foe and slows it."),
                spell("Veil of Mist", "II", "A thick fog fills the area around you."),
                spell("Arcane Lock", "II", "Seal a door or container with a word."),
            ],
        },
        SpellSchool {
            name: "Primal".to_string(),
            ability: Ability::Wil,
            spells: vec![
                spell("Thornwhip", "I", "A lash of thorns pulls a foe toward you."),
                spell("Bark Skin", "I", "Your skin hardens like old oak for a scene."),
                spell("Call the Wind", "II", "A gale knocks back everything before you."),
            ],
        },
        SpellSchool {
            name: "Divine".to_string(),
            ability: Ability::Cha,
            spells: vec![
                spell("Mend", "I", "Close a wound, restoring Hit Points."),
                spell("Sacred Flame", "I", "Radiant fire falls upon a foe."),
                spell("Ward", "II", "A circle of light keeps spirits at bay."),
            ],
        },
    ]
}

fn item(name: &str, properties: &str, slots: u32, cost: u32) -> EquipmentItem {
    EquipmentItem {
        name: name.to_string(),
        properties: properties.to_string(),
        slots,
        cost,
        weapon: false,
        armor: None,
        shield: false,
    }
}

fn weapon(name: &str, properties: &str, slots: u32, cost: u32) -> EquipmentItem {
    EquipmentItem {
        weapon: true,
        ..item(name, properties, slots, cost)
    }
}

fn armor(name: &str, weight: ArmorWeight, slots: u32, cost: u32) -> EquipmentItem {
    EquipmentItem {
        armor: Some(weight),
        ..item(name, &format!("Armor {}", weight.base_ac()), slots, cost)
    }
}

fn shield(name: &str, properties: &str, slots: u32, cost: u32) -> EquipmentItem {
    EquipmentItem {
        shield: true,
        ..item(name, properties, slots, cost)
    }
}

fn equipment() -> Vec<EquipmentCategory> {
    vec![
        EquipmentCategory {
            name: "Weapons".to_string(),
            items: vec![
                weapon("Dagger", "Finesse, Thrown", 1, 2),
                weapon("Sword", "Versatile", 1, 10),
                weapon("Spear", "Reach, Thrown", 2, 5),
                weapon("Battle Axe", "Two-handed", 2, 15),
                weapon("Shortbow", "Ranged, Two-handed", 2, 8),
                weapon("Sling", "Ranged", 1, 1),
            ],
        },
        EquipmentCategory {
            name: "Armor".to_string(),
            items: vec![
                armor("Light Armor", ArmorWeight::Light, 2, 10),
                armor("Medium Armor", ArmorWeight::Medium, 3, 20),
                armor("Heavy Armor", ArmorWeight::Heavy, 4, 40),
            ],
        },
        EquipmentCategory {
            name: "Shields".to_string(),
            items: vec![
                shield("Buckler", "+1 Armor", 1, 5),
                shield("Tower Shield", "+1 Armor, Cover", 3, 12),
                EquipmentItem {
                    weapon: true,
                    ..shield("Spiked Shield", "+1 Armor, Bash", 2, 15)
                },
            ],
        },
        EquipmentCategory {
            name: "Gear".to_string(),
            items: vec![
                item("Rope (50 ft)", "", 1, 1),
                item("Torch", "Light", 1, 1),
                item("Rations", "3 days", 1, 2),
                item("Lantern", "Light, Oil", 1, 5),
                item("Healer's Kit", "3 uses", 1, 10),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_rulebook;

    #[test]
    fn standard_book_is_valid() {
        let book = standard();
        let issues = validate_rulebook(&book);
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn covers_all_abilities() {
        let book = standard();
        for ability in Ability::ALL {
            assert!(book.ability_info(ability).is_some(), "{ability} missing");
        }
        assert_eq!(book.ability_info(Ability::Dex).unwrap().condition, "DAZED");
    }

    #[test]
    fn adult_budgets() {
        let book = standard();
        let adult = book.age("Adult").unwrap();
        assert_eq!((adult.points, adult.skills, adult.links), (8, 4, 3));
    }

    #[test]
    fn chain_talents_have_labels() {
        let book = standard();
        let chained: Vec<&str> = book
            .talents
            .iter()
            .filter_map(|t| t.chain.as_deref())
            .collect();
        assert_eq!(chained, ["Unarmed Strikes", "Rage Die", "Companion", "Runesong"]);
    }

    #[test]
    fn spiked_shield_is_weapon_and_shield() {
        let book = standard();
        let spiked = book.item("Spiked Shield").unwrap();
        assert!(spiked.weapon && spiked.shield);
        assert_eq!(spiked.armor, None);
    }
}
