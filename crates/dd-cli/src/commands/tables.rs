use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use dd_rules::RuleBook;

const KINDS: [&str; 6] = ["abilities", "ages", "skills", "talents", "spells", "equipment"];

pub fn run(kind: Option<&str>, rules: Option<&Path>) -> Result<(), String> {
    let (_, book) = super::load(0, rules)?;

    let kinds: Vec<&str> = match kind {
        Some(k) => {
            let k = k.trim().to_lowercase();
            let found = KINDS
                .iter()
                .copied()
                .find(|known| *known == k)
                .ok_or_else(|| format!("unknown table '{k}' (expected one of: {})", KINDS.join(", ")))?;
            vec![found]
        }
        None => KINDS.to_vec(),
    };

    println!("  {}\n", book.name);
    for kind in kinds {
        let table = match kind {
            "abilities" => abilities(&book),
            "ages" => ages(&book),
            "skills" => skills(&book),
            "talents" => talents(&book),
            "spells" => spells(&book),
            _ => equipment(&book),
        };
        println!("{table}\n");
    }

    Ok(())
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn abilities(book: &RuleBook) -> Table {
    let mut t = table(vec!["Ability", "Name", "Condition", "Description"]);
    for info in &book.abilities {
        t.add_row(vec![
            info.ability.code(),
            info.name.as_str(),
            info.condition.as_str(),
            info.description.as_str(),
        ]);
    }
    t
}

fn ages(book: &RuleBook) -> Table {
    let mut t = table(vec!["Age", "Ability Points", "Skills", "Links"]);
    for age in &book.ages {
        t.add_row(vec![
            age.name.clone(),
            age.points.to_string(),
            age.skills.to_string(),
            age.links.to_string(),
        ]);
    }
    t
}

fn skills(book: &RuleBook) -> Table {
    let mut t = table(vec!["#", "Skill"]);
    for (i, skill) in book.skills.iter().enumerate() {
        t.add_row(vec![(i + 1).to_string(), skill.clone()]);
    }
    t
}

fn talents(book: &RuleBook) -> Table {
    let mut t = table(vec!["Id", "Talent", "Category", "Chain", "Description"]);
    for talent in &book.talents {
        t.add_row(vec![
            talent.id.clone(),
            talent.name.clone(),
            talent.category.to_string(),
            talent.chain.clone().unwrap_or_else(|| "—".to_string()),
            talent.description.clone(),
        ]);
    }
    t
}

fn spells(book: &RuleBook) -> Table {
    let mut t = table(vec!["School", "Ability", "Spell", "Tier", "Description"]);
    for school in &book.spells {
        for spell in &school.spells {
            t.add_row(vec![
                school.name.as_str(),
                school.ability.code(),
                spell.name.as_str(),
                spell.tier.as_str(),
                spell.description.as_str(),
            ]);
        }
    }
    t
}

fn equipment(book: &RuleBook) -> Table {
    let mut t = table(vec!["Category", "Item", "Cost", "Slots", "Properties"]);
    for category in &book.equipment {
        for item in &category.items {
            t.add_row(vec![
                category.name.clone(),
                item.name.clone(),
                format!("{} gp", item.cost),
                item.slots.to_string(),
                item.properties.clone(),
            ]);
        }
    }
    t
}
