//! Interactive chat session

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use sessionstore::SessionStore;

use crate::pipeline::TurnEngine;

/// Greeting shown when a chat session starts
const WELCOME: &str = "I can help you plan your travel. Please answer these questions:\n\
                       - What is the start location (address / location name / city)?\n\
                       - Which places are you visiting?\n\
                       - What are your time constraints?\n\
                       - How many hours can you drive per day?\n\
                       - How many minutes or hours per day can you walk?";

/// Interactive chat session over a single session store
pub struct ChatSession {
    engine: TurnEngine,
    session: SessionStore,
}

enum SlashResult {
    Continue,
    Quit,
}

impl ChatSession {
    /// Create a new chat session with an empty store
    pub fn new(engine: TurnEngine) -> Self {
        Self {
            engine,
            session: SessionStore::new(),
        }
    }

    /// Run the chat main loop until EOF or /quit
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    }

                    let reply = self.engine.run_turn(&mut self.session, input).await;
                    println!("{} {}", "assistant:".bright_cyan(), reply);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Safe travels!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Wayfinder".bright_cyan().bold());
        println!("{}", WELCOME);
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        match input.split_whitespace().next().unwrap_or("") {
            "/help" | "/h" => {
                println!("  {}  show accumulated trip facts", "/trip".yellow());
                println!("  {}  start a fresh session", "/clear".yellow());
                println!("  {}  quit", "/quit".yellow());
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/clear" | "/c" => {
                self.session = SessionStore::new();
                println!("{}", "Session cleared.".dimmed());
                SlashResult::Continue
            }
            "/trip" => {
                match serde_json::to_string_pretty(self.session.trip()) {
                    Ok(json) => println!("{}", json),
                    Err(e) => println!("{} {}", "?".yellow(), e),
                }
                SlashResult::Continue
            }
            other => {
                println!("{} Unknown command: {}", "?".yellow(), other);
                SlashResult::Continue
            }
        }
    }
}
