use nightduty_core::fallback::suggestions;
use nightduty_core::QUICK_PROMPTS;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    for prompt in QUICK_PROMPTS {
        println!("{}:\n  {}", prompt.label, prompt.text);
    }
    Ok(())
}

pub fn suggest() -> Result<(), Box<dyn std::error::Error>> {
    for s in suggestions() {
        println!("- {s}");
    }
    Ok(())
}
