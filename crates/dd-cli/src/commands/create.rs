use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use dd_rules::Wizard;

use crate::shell::Shell;

pub fn run(seed: u64, rules: Option<&Path>, json: bool) -> Result<(), String> {
    let (config, book) = super::load(seed, rules)?;
    let mut shell = Shell::new(Wizard::new(book, &config));

    println!("  {} {}", "Creating a hero:".bold(), shell.wizard().book().name);
    println!("  Seed: {seed}");
    println!("  Type 'help' for commands, 'quit' to exit.\n");
    println!("{}\n", shell.step_line().bold());

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("{} > ", shell.prompt());
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match shell.process(input) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if shell.finished() {
                    break;
                }
            }
            Err(e) => {
                println!("{}\n", e.yellow());
            }
        }
    }

    tracing::info!(
        character = %shell.wizard().character().id(),
        step = %shell.wizard().step(),
        "session ended"
    );

    if json {
        let sheet = shell.wizard().sheet();
        let out = serde_json::to_string_pretty(&sheet).map_err(|e| e.to_string())?;
        println!("{out}");
    }

    Ok(())
}
