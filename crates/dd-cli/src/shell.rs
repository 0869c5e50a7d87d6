//! Line commands driving a creation session.
//!
//! Every command maps onto one wizard operation and returns the text to
//! print. Rejected choices come back as `Err` with the reason.

use comfy_table::{ContentArrangement, Table};

use dd_rules::chains::die_for_level;
use dd_rules::derived::signed;
use dd_rules::{
    Ability, Applied, CartEntryId, ChainKey, ConceptField, Delta, Mutation, Step, Wizard,
    spell_warning,
};

const HELP: &str = "\
Concept:     name <text> | descriptor <text> | roots <text> | conviction <text>
Age:         age <name>
Abilities:   inc <STR|DEX|INT|WIL|CHA> [n] | dec <ability> [n]
Skills:      skill <name>            (toggles)
Talents:     talent <id or name>     (toggles)
             school <name> | spell <name> | spell <school>/<name>
Equipment:   gold <n> | roll | buy <item> | sell <#id>
Dice chains: chain+ <source> | chain- <source> | sources
Navigation:  next | back | goto <step> | status | sheet | restart | quit";

/// An interactive creation session driven by text commands.
pub struct Shell {
    wizard: Wizard,
    finished: bool,
}

impl Shell {
    pub fn new(wizard: Wizard) -> Self {
        Self {
            wizard,
            finished: false,
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    /// Whether a quit command has ended the session.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Short prompt prefix naming the active step.
    pub fn prompt(&self) -> String {
        let step = self.wizard.step();
        format!("[{}/{} {}]", step.index() + 1, Step::ALL.len(), step.name())
    }

    /// Heading for the active step.
    pub fn step_line(&self) -> String {
        let step = self.wizard.step();
        format!("Step {}/{}: {}", step.index() + 1, Step::ALL.len(), step.name())
    }

    /// Process a line of user input and return a response.
    pub fn process(&mut self, input: &str) -> Result<String, String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        let (cmd, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (trimmed.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "name" => self.do_concept(ConceptField::Name, "name", rest),
            "descriptor" => self.do_concept(ConceptField::Descriptor, "descriptor", rest),
            "roots" => self.do_concept(ConceptField::Roots, "roots", rest),
            "conviction" => self.do_concept(ConceptField::Conviction, "conviction", rest),
            "age" => self.do_age(rest),
            "inc" => self.do_ability(rest, Delta::Up),
            "dec" => self.do_ability(rest, Delta::Down),
            "skill" => self.do_skill(rest),
            "talent" => self.do_talent(rest),
            "school" => self.do_school(rest),
            "spell" => self.do_spell(rest),
            "gold" => self.do_gold(rest),
            "roll" => Ok(self.do_roll()),
            "buy" => self.do_buy(rest),
            "sell" => self.do_sell(rest),
            "chain+" => self.do_chain(rest, Delta::Up),
            "chain-" => self.do_chain(rest, Delta::Down),
            "sources" => Ok(self.sources()),
            "next" => self.do_next(),
            "back" => self.do_back(),
            "goto" => self.do_goto(rest),
            "status" => Ok(self.status()),
            "sheet" => Ok(self.wizard.sheet().to_string()),
            "restart" => {
                self.wizard.restart();
                Ok(format!("Started over.\n{}", self.step_line()))
            }
            "help" => Ok(HELP.to_string()),
            "quit" | "q" => {
                self.finished = true;
                Ok("Goodbye!".to_string())
            }
            _ => Err(format!("unknown command '{cmd}' (type 'help')")),
        }
    }

    fn apply(&mut self, mutation: Mutation) -> Result<(), String> {
        match self.wizard.update(mutation) {
            Applied::Changed => Ok(()),
            Applied::Rejected(reason) => Err(reason.to_string()),
        }
    }

    fn do_concept(&mut self, field: ConceptField, label: &str, text: &str) -> Result<String, String> {
        if text.is_empty() && field != ConceptField::Roots {
            return Err(format!("usage: {label} <text>"));
        }
        self.apply(Mutation::SetConcept {
            field,
            value: text.to_string(),
        })?;
        Ok(format!(
            "{label}: {}",
            self.wizard.character().concept(field)
        ))
    }

    fn do_age(&mut self, name: &str) -> Result<String, String> {
        if name.is_empty() {
            let names: Vec<&str> = self.wizard.book().ages.iter().map(|a| a.name.as_str()).collect();
            return Err(format!("usage: age <{}>", names.join("|")));
        }
        self.apply(Mutation::SetAge(name.to_string()))?;
        let character = self.wizard.character();
        match character.age_config(self.wizard.book()) {
            Some(age) => Ok(format!(
                "Age: {} ({} ability points, {} skills, {} links)",
                age.name, age.points, age.skills, age.links
            )),
            None => Ok(String::new()),
        }
    }

    fn do_ability(&mut self, rest: &str, delta: Delta) -> Result<String, String> {
        let mut parts = rest.split_whitespace();
        let code = parts.next().ok_or("usage: inc|dec <ability> [n]")?;
        let ability = Ability::from_code(code).map_err(|e| e.to_string())?;
        let times = match parts.next() {
            Some(n) => n.parse::<u32>().map_err(|_| format!("not a number: {n}"))?,
            None => 1,
        };

        let mut stopped = None;
        for i in 0..times {
            if let Err(reason) = self.apply(Mutation::AdjustAbility { ability, delta }) {
                if i == 0 {
                    return Err(reason);
                }
                stopped = Some(reason);
                break;
            }
        }

        let score = self.wizard.character().abilities().get(ability);
        let mut out = format!(
            "{ability} {} ({} points left)",
            signed(score),
            self.wizard.derived().points_left
        );
        if let Some(reason) = stopped {
            out.push_str(&format!("\nstopped early: {reason}"));
        }
        Ok(out)
    }

    fn do_skill(&mut self, name: &str) -> Result<String, String> {
        if name.is_empty() {
            return Err("usage: skill <name>".to_string());
        }
        self.apply(Mutation::ToggleSkill(name.to_string()))?;
        let character = self.wizard.character();
        let quota = character
            .age_config(self.wizard.book())
            .map_or(0, |a| a.skills);
        Ok(format!(
            "Skills ({}/{quota}): {}",
            character.skills().len(),
            character.skills().join(", ")
        ))
    }

    fn do_talent(&mut self, name: &str) -> Result<String, String> {
        if name.is_empty() {
            return Err("usage: talent <id or name>".to_string());
        }
        self.apply(Mutation::ToggleTalent(name.to_string()))?;
        let book = self.wizard.book();
        let character = self.wizard.character();
        let names: Vec<&str> = character
            .talents()
            .iter()
            .filter_map(|id| book.talent(id))
            .map(|t| t.name.as_str())
            .collect();
        let mut out = format!("Talents ({}/2): {}", names.len(), names.join(", "));
        if character.has_talent(dd_rules::reference::TALENT_SPELLCAST) && character.spell().is_none() {
            out.push_str("\nChoose a starting spell with 'spell <name>'.");
        }
        Ok(out)
    }

    fn do_school(&mut self, name: &str) -> Result<String, String> {
        if name.is_empty() {
            return Err("usage: school <name>".to_string());
        }
        self.apply(Mutation::SelectSchool(name.to_string()))?;
        let book = self.wizard.book();
        let current = self.wizard.character().spell_school();
        let Some(school) = book.school(current) else {
            return Ok(String::new());
        };
        let spells: Vec<&str> = school.spells.iter().map(|s| s.name.as_str()).collect();
        let mut out = format!("{} ({}): {}", school.name, school.ability, spells.join(", "));
        if let Some(warning) = self.casting_warning(current) {
            out.push('\n');
            out.push_str(&warning);
        }
        Ok(out)
    }

    fn do_spell(&mut self, rest: &str) -> Result<String, String> {
        if rest.is_empty() {
            return Err("usage: spell <name> | spell <school>/<name>".to_string());
        }
        let (school, name) = match rest.split_once('/') {
            Some((school, name)) => (school.trim().to_string(), name.trim().to_string()),
            None => (self.wizard.character().spell_school().to_string(), rest.to_string()),
        };
        self.apply(Mutation::SetSpell { school, name })?;
        let Some(spell) = self.wizard.character().spell() else {
            return Ok(String::new());
        };
        let mut out = format!("Starting spell: {} ({})", spell.name, spell.school);
        if let Some(warning) = self.casting_warning(&spell.school) {
            out.push('\n');
            out.push_str(&warning);
        }
        Ok(out)
    }

    fn casting_warning(&self, school: &str) -> Option<String> {
        let (ability, value) = spell_warning(self.wizard.character(), school, self.wizard.book())?;
        Some(format!(
            "Warning: your {ability} is {}, so {school} spells may be difficult to cast effectively.",
            signed(value)
        ))
    }

    fn do_gold(&mut self, amount: &str) -> Result<String, String> {
        let amount: i64 = amount
            .parse()
            .map_err(|_| "usage: gold <amount>".to_string())?;
        let before = self.wizard.character().cart().len();
        self.apply(Mutation::SetGold(amount))?;
        let after = self.wizard.character().cart().len();
        let mut out = self.gold_line();
        if after < before {
            out.push_str(&format!("\n{} purchase(s) returned", before - after));
        }
        Ok(out)
    }

    fn do_roll(&mut self) -> String {
        let (roll, _) = self.wizard.roll_gold();
        format!("Rolled 3d20: {roll}\n{}", self.gold_line())
    }

    fn gold_line(&self) -> String {
        let stats = self.wizard.derived();
        format!(
            "Gold: {} ({} spent, {} left)",
            self.wizard.character().gold(),
            stats.total_spent,
            stats.gold_left
        )
    }

    fn do_buy(&mut self, item: &str) -> Result<String, String> {
        if item.is_empty() {
            return Err("usage: buy <item>".to_string());
        }
        self.apply(Mutation::AddCartItem(item.to_string()))?;
        let Some(entry) = self.wizard.character().cart().last() else {
            return Ok(String::new());
        };
        Ok(format!(
            "Bought #{} {} ({} gp left)",
            entry.id,
            entry.item.name,
            self.wizard.derived().gold_left
        ))
    }

    fn do_sell(&mut self, id: &str) -> Result<String, String> {
        let id: u32 = id
            .trim_start_matches('#')
            .parse()
            .map_err(|_| "usage: sell <#id>".to_string())?;
        let id = CartEntryId(id);
        let name = self
            .wizard
            .character()
            .cart()
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.item.name.clone());
        self.apply(Mutation::RemoveCartItem(id))?;
        Ok(format!(
            "Returned #{id} {} ({} gp left)",
            name.unwrap_or_default(),
            self.wizard.derived().gold_left
        ))
    }

    /// Resolve a chain by key ("cart-1", "spell-Spark", "brawler") or label.
    fn resolve_chain(&self, needle: &str) -> Result<(ChainKey, String), String> {
        let sources = self.wizard.chain_sources();
        if let Some(source) = sources.iter().find(|s| {
            s.key.to_string().eq_ignore_ascii_case(needle) || s.label.eq_ignore_ascii_case(needle)
        }) {
            return Ok((source.key.clone(), source.label.clone()));
        }
        let key: ChainKey = needle.parse().map_err(|_| format!("no chain source '{needle}'"))?;
        Ok((key, needle.to_string()))
    }

    fn do_chain(&mut self, needle: &str, delta: Delta) -> Result<String, String> {
        if needle.is_empty() {
            return Err("usage: chain+|chain- <source>".to_string());
        }
        let (key, label) = self.resolve_chain(needle)?;
        self.apply(Mutation::AdjustChain {
            key: key.clone(),
            delta,
        })?;
        let level = self.wizard.character().chain_level(&key);
        Ok(format!(
            "{label}: {} ({} links left)",
            die_for_level(level),
            self.wizard.derived().links_left
        ))
    }

    fn sources(&self) -> String {
        let sources = self.wizard.chain_sources();
        if sources.is_empty() {
            return "No chain sources. Buy a weapon or shield, choose a spell, or take a chain talent."
                .to_string();
        }
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Key", "Source", "Die"]);
        for source in &sources {
            let level = self.wizard.character().chain_level(&source.key);
            table.add_row(vec![
                source.key.to_string(),
                source.label.clone(),
                die_for_level(level).to_string(),
            ]);
        }
        format!("{table}\n{} links left", self.wizard.derived().links_left)
    }

    fn gate_hint(&self) -> String {
        let character = self.wizard.character();
        let age = character.age_config(self.wizard.book());
        match self.wizard.step() {
            Step::Concept => "name, descriptor and conviction are required".to_string(),
            Step::Age => "choose an age".to_string(),
            Step::Abilities if age.is_none() => "choose an age first".to_string(),
            Step::Abilities => format!(
                "spend exactly all ability points ({} left)",
                self.wizard.derived().points_left
            ),
            Step::Skills => match age {
                Some(age) => format!(
                    "choose {} skills ({} chosen)",
                    age.skills,
                    character.skills().len()
                ),
                None => "choose an age first".to_string(),
            },
            Step::Talents => "choose 2 talents, and a starting spell with Spellcasting".to_string(),
            Step::Equipment => "set or roll starting gold".to_string(),
            Step::DiceChains | Step::Sheet => "already at the character sheet".to_string(),
        }
    }

    fn do_next(&mut self) -> Result<String, String> {
        if self.wizard.is_last_step() {
            return Err("already at the character sheet".to_string());
        }
        if !self.wizard.advance() {
            return Err(format!("cannot continue: {}", self.gate_hint()));
        }
        let mut out = self.step_line();
        match self.wizard.step() {
            Step::DiceChains => {
                out.push('\n');
                out.push_str(&self.sources());
            }
            Step::Sheet => {
                out.push('\n');
                out.push_str(&self.wizard.sheet().to_string());
            }
            _ => {}
        }
        Ok(out)
    }

    fn do_back(&mut self) -> Result<String, String> {
        if self.wizard.back() {
            Ok(self.step_line())
        } else {
            Err("already at the first step".to_string())
        }
    }

    fn do_goto(&mut self, name: &str) -> Result<String, String> {
        let step = Step::from_name(name).map_err(|e| e.to_string())?;
        if self.wizard.jump_to(step) {
            Ok(self.step_line())
        } else {
            Err(format!(
                "can only jump back to an earlier step (currently at {})",
                self.wizard.step()
            ))
        }
    }

    fn status(&self) -> String {
        let character = self.wizard.character();
        let stats = self.wizard.derived();
        let abilities: Vec<String> = Ability::ALL
            .iter()
            .map(|&a| format!("{a} {}", signed(character.abilities().get(a))))
            .collect();
        let ready = if self.wizard.ready() { "ready" } else { "not ready" };
        let mut lines = vec![
            format!("{} ({ready})", self.step_line()),
            format!(
                "Hero: {} | {} | Age: {}",
                character.name(),
                character.descriptor(),
                character.age().unwrap_or("-")
            ),
            abilities.join("  "),
            format!(
                "HP {}  AC {}  Supply {}  Slots {}",
                stats.hit_points, stats.armor_class, stats.supply, stats.item_slots
            ),
            format!(
                "Points left {}  Links left {}",
                stats.points_left, stats.links_left
            ),
            self.gold_line(),
        ];
        if !character.skills().is_empty() {
            lines.push(format!("Skills: {}", character.skills().join(", ")));
        }
        if !character.cart().is_empty() {
            let cart: Vec<String> = character
                .cart()
                .iter()
                .map(|e| format!("#{} {}", e.id, e.item.name))
                .collect();
            lines.push(format!("Cart: {}", cart.join(", ")));
        }
        lines.join("\n")
    }
}
