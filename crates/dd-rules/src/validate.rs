//! Consistency checks for a [`RuleBook`].
//!
//! A rulebook loaded from JSON must be able to drive every wizard step:
//! at least one age, enough skills to fill each quota, all five abilities
//! described, and unique names wherever names are used as keys.

use std::collections::HashSet;

use crate::reference::{Ability, RuleBook};

/// A warning or error found while validating a rulebook.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// The table where the issue was found (e.g., "ages", "talents").
    pub table: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl ValidationIssue {
    fn error(table: &str, message: String) -> Self {
        Self {
            table: table.to_string(),
            message,
            is_error: true,
        }
    }

    fn warning(table: &str, message: String) -> Self {
        Self {
            table: table.to_string(),
            message,
            is_error: false,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.table, self.message)
    }
}

/// Validate a rulebook, returning every issue found.
pub fn validate_rulebook(book: &RuleBook) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    validate_abilities(book, &mut issues);
    validate_ages(book, &mut issues);
    validate_talents(book, &mut issues);
    validate_spells(book, &mut issues);
    validate_equipment(book, &mut issues);
    issues
}

fn validate_abilities(book: &RuleBook, issues: &mut Vec<ValidationIssue>) {
    for ability in Ability::ALL {
        if book.ability_info(ability).is_none() {
            issues.push(ValidationIssue::error(
                "abilities",
                format!("ability {ability} is not described"),
            ));
        }
    }
}

fn validate_ages(book: &RuleBook, issues: &mut Vec<ValidationIssue>) {
    if book.ages.is_empty() {
        issues.push(ValidationIssue::error("ages", "no ages defined".to_string()));
    }

    report_duplicates("ages", book.ages.iter().map(|a| a.name.as_str()), issues);
    report_duplicates("skills", book.skills.iter().map(String::as_str), issues);

    for age in &book.ages {
        if age.points < 0 || age.links < 0 {
            issues.push(ValidationIssue::error(
                "ages",
                format!("age '{}' has a negative budget", age.name),
            ));
        }
        // All five abilities start at -2 and cap at +5.
        let max_spend = 7 * Ability::ALL.len() as i32;
        if age.points > max_spend {
            issues.push(ValidationIssue::error(
                "ages",
                format!(
                    "age '{}' grants {} points but at most {max_spend} can be spent",
                    age.name, age.points
                ),
            ));
        }
        if age.skills > book.skills.len() {
            issues.push(ValidationIssue::error(
                "ages",
                format!(
                    "age '{}' requires {} skills but only {} exist",
                    age.name,
                    age.skills,
                    book.skills.len()
                ),
            ));
        }
        if age.links == 0 {
            issues.push(ValidationIssue::warning(
                "ages",
                format!("age '{}' has no chain links to spend", age.name),
            ));
        }
    }
}

fn validate_talents(book: &RuleBook, issues: &mut Vec<ValidationIssue>) {
    if book.talents.len() < 2 {
        issues.push(ValidationIssue::error(
            "talents",
            format!("two talents must be chosen but only {} exist", book.talents.len()),
        ));
    }
    report_duplicates("talents", book.talents.iter().map(|t| t.id.as_str()), issues);

    for talent in &book.talents {
        if ["spell-", "cart-"]
            .iter()
            .any(|prefix| talent.id.starts_with(prefix))
        {
            issues.push(ValidationIssue::error(
                "talents",
                format!(
                    "talent id '{}' collides with spell and cart chain keys",
                    talent.id
                ),
            ));
        }
        if talent.chain.as_deref().is_some_and(|c| c.trim().is_empty()) {
            issues.push(ValidationIssue::error(
                "talents",
                format!("talent '{}' has an empty chain label", talent.id),
            ));
        }
    }
}

fn validate_spells(book: &RuleBook, issues: &mut Vec<ValidationIssue>) {
    report_duplicates("spells", book.spells.iter().map(|s| s.name.as_str()), issues);
    for school in &book.spells {
        if school.spells.is_empty() {
            issues.push(ValidationIssue::warning(
                "spells",
                format!("school '{}' has no spells", school.name),
            ));
        }
        report_duplicates(
            "spells",
            school.spells.iter().map(|s| s.name.as_str()),
            issues,
        );
    }
}

fn validate_equipment(book: &RuleBook, issues: &mut Vec<ValidationIssue>) {
    report_duplicates(
        "equipment",
        book.equipment
            .iter()
            .flat_map(|c| c.items.iter())
            .map(|i| i.name.as_str()),
        issues,
    );
    for item in book.equipment.iter().flat_map(|c| c.items.iter()) {
        if item.armor.is_some() && item.shield {
            issues.push(ValidationIssue::warning(
                "equipment",
                format!("'{}' is both armor and a shield", item.name),
            ));
        }
    }
}

fn report_duplicates<'a>(
    table: &str,
    names: impl Iterator<Item = &'a str>,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.to_lowercase()) {
            issues.push(ValidationIssue::error(
                table,
                format!("duplicate entry '{name}'"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{AgeConfig, TalentCategory, TalentInfo};

    fn has_error(issues: &[ValidationIssue], needle: &str) -> bool {
        issues
            .iter()
            .any(|i| i.is_error && i.message.contains(needle))
    }

    #[test]
    fn missing_ability_errors() {
        let mut book = RuleBook::standard();
        book.abilities.retain(|a| a.ability != Ability::Cha);
        let issues = validate_rulebook(&book);
        assert!(has_error(&issues, "ability CHA is not described"));
    }

    #[test]
    fn negative_budget_errors() {
        let mut book = RuleBook::standard();
        book.ages.push(AgeConfig {
            name: "Cursed".to_string(),
            points: -1,
            skills: 1,
            links: 1,
        });
        let issues = validate_rulebook(&book);
        assert!(has_error(&issues, "negative budget"));
    }

    #[test]
    fn unspendable_points_error() {
        let mut book = RuleBook::standard();
        book.ages[0].points = 40;
        let issues = validate_rulebook(&book);
        assert!(has_error(&issues, "at most 35 can be spent"));
    }

    #[test]
    fn skill_quota_beyond_table_errors() {
        let mut book = RuleBook::standard();
        book.skills.truncate(2);
        let issues = validate_rulebook(&book);
        assert!(has_error(&issues, "requires 3 skills but only 2 exist"));
    }

    #[test]
    fn duplicate_talent_errors() {
        let mut book = RuleBook::standard();
        book.talents.push(TalentInfo {
            id: "Tough".to_string(),
            name: "Tough Again".to_string(),
            category: TalentCategory::Defensive,
            description: String::new(),
            chain: None,
        });
        let issues = validate_rulebook(&book);
        assert!(has_error(&issues, "duplicate entry 'Tough'"));
    }

    #[test]
    fn reserved_talent_prefix_errors() {
        let mut book = RuleBook::standard();
        book.talents.push(TalentInfo {
            id: "spell-ward".to_string(),
            name: "Spell Ward".to_string(),
            category: TalentCategory::Defensive,
            description: String::new(),
            chain: Some("Warding".to_string()),
        });
        let issues = validate_rulebook(&book);
        assert!(has_error(
            &issues,
            "talent id 'spell-ward' collides with spell and cart chain keys"
        ));

        book.talents.last_mut().unwrap().id = "cart-ward".to_string();
        assert!(has_error(&validate_rulebook(&book), "'cart-ward' collides"));

        book.talents.last_mut().unwrap().id = "ward".to_string();
        assert!(validate_rulebook(&book).iter().all(|i| !i.is_error));
    }

    #[test]
    fn zero_links_only_warns() {
        let mut book = RuleBook::standard();
        book.ages[0].links = 0;
        let issues = validate_rulebook(&book);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error);
        assert_eq!(
            issues[0].to_string(),
            "warning: ages: age 'Youth' has no chain links to spend"
        );
    }
}
