pub mod create;
pub mod tables;

use std::path::Path;

use dd_rules::{CreatorConfig, RuleBook};

/// Build the session config and load its rulebook.
fn load(seed: u64, rules: Option<&Path>) -> Result<(CreatorConfig, RuleBook), String> {
    let mut config = CreatorConfig::default().with_seed(seed);
    if let Some(path) = rules {
        config = config.with_rules(path);
    }
    let book = config.load_rulebook().map_err(|e| e.to_string())?;
    Ok((config, book))
}
