//! Line-oriented conversation loop.

use std::io::{self, BufRead, Write};

use clap::Args;
use nightduty_core::{Assistant, Config, Database, KvStore};

use super::ask::print_reply;
use super::open_assistant;

#[derive(Args)]
pub struct ChatArgs {
    /// Keep the conversation in memory only
    #[arg(long)]
    pub ephemeral: bool,
}

pub fn run(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    if args.ephemeral {
        let policy = Config::load_or_default().policy;
        let assistant = Assistant::new(policy, Database::open_memory()?);
        converse(&assistant, stdin.lock())
    } else {
        converse(&open_assistant()?, stdin.lock())
    }
}

fn converse<S: KvStore>(
    assistant: &Assistant<S>,
    input: impl BufRead,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Escribe tu consulta ('exit' para salir).");
    let mut out = io::stdout();
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let text = line.trim();
        match text {
            "" => {}
            "exit" | "quit" => break,
            _ => {
                let reply = assistant.handle_utterance(text);
                print_reply(&reply);
                println!();
            }
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    println!();
    Ok(())
}
