use clap::Args;
use nightduty_core::Reply;

use super::open_assistant;

#[derive(Args)]
pub struct AskArgs {
    /// Question, e.g. "Valida 22:10–06:40 SCL–MIA"
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
    /// Print the full reply record as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: AskArgs) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = open_assistant()?;
    let reply = assistant.handle_utterance(&args.text.join(" "));
    if args.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        print_reply(&reply);
    }
    Ok(())
}

/// Reply text, followed by the suggestions when the fallback answered.
pub fn print_reply(reply: &Reply) {
    println!("{}", reply.text);
    if !reply.suggestions.is_empty() {
        println!();
        println!("Sugerencias:");
        for s in &reply.suggestions {
            println!("  - {s}");
        }
    }
}
