//! Plain-text rendering of a character sheet.

use std::fmt;

use super::{CONDITIONS, CharacterSheet, EOS_QUESTIONS};

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "== {title} ==")
}

fn or_blank(s: &str) -> &str {
    if s.trim().is_empty() { "-" } else { s }
}

impl fmt::Display for CharacterSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - Character Sheet", self.rulebook)?;
        writeln!(f, "Name:       {}", or_blank(&self.name))?;
        writeln!(f, "Descriptor: {}", or_blank(&self.descriptor))?;
        writeln!(f, "Age:        {}", self.age.as_deref().unwrap_or("-"))?;
        if !self.roots.trim().is_empty() {
            writeln!(f, "Roots:      {}", self.roots)?;
        }

        heading(f, "Abilities")?;
        for line in &self.abilities {
            writeln!(f, "{:<4}{:>3}  ({})", line.ability.code(), line.formatted, line.condition)?;
        }

        heading(f, "Vitals")?;
        for stat in &self.vitals {
            writeln!(f, "{:<12}{:<10}[{}]", stat.label, stat.value, stat.formula)?;
        }

        heading(f, "Hero Dice")?;
        let ladder: Vec<String> = self.hero_dice.iter().map(ToString::to_string).collect();
        writeln!(f, "{}", ladder.join(" "))?;

        heading(f, "Conditions")?;
        writeln!(f, "{}", CONDITIONS.map(|c| format!("[ ] {c}")).join("  "))?;

        heading(f, "Dice Chains")?;
        if self.chains.is_empty() {
            writeln!(f, "No chains bolstered")?;
        }
        for line in &self.chains {
            writeln!(f, "{line}")?;
        }

        heading(f, "Skills")?;
        for skill in &self.skills {
            writeln!(f, "{skill}")?;
        }

        heading(f, "Conviction")?;
        if !self.conviction.trim().is_empty() {
            writeln!(f, "\"{}\"", self.conviction)?;
        }

        heading(f, "Talents & Other Notes")?;
        for talent in &self.talents {
            writeln!(f, "{talent}")?;
        }

        heading(f, &format!("Inventory (Max Item Slots: {})", self.item_slots))?;
        for (i, item) in self.inventory_rows().iter().enumerate() {
            writeln!(f, "{:>2}. {item}", i + 1)?;
        }
        writeln!(f, "Gold left: {}", self.gold_left)?;

        heading(f, "End of Session Questions")?;
        for question in EOS_QUESTIONS {
            writeln!(f, "[ ] {question}")?;
        }
        Ok(())
    }
}
