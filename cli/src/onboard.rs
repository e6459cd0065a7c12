use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Select};
use quill_core::config::Config;

const BANNER: &str = r"
    -------------------------------------

      quill  ::  invoice processing agent

    -------------------------------------
";

const PROVIDERS: [&str; 2] = ["gemini", "openai"];

fn print_step(step: usize, total: usize, title: &str) {
    println!();
    println!(
        "{}",
        style(format!("[{}/{}] {}", step, total, title))
            .cyan()
            .bold()
    );
    println!();
}

fn setup_provider() -> Result<&'static str> {
    let selection = Select::new()
        .with_prompt("Select your model provider")
        .items(&PROVIDERS)
        .default(0)
        .interact()
        .context("Failed to select provider")?;

    Ok(PROVIDERS[selection])
}

fn setup_api_key(provider: &str) -> Result<String> {
    let api_key: String = Input::new()
        .with_prompt(format!("Enter your {} API key", provider))
        .interact_text()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        return Err(anyhow::anyhow!("API key cannot be empty"));
    }

    Ok(api_key.trim().to_string())
}

fn setup_model(provider: &str) -> Result<String> {
    let models: &[&str] = match provider {
        "openai" => &["gpt-4o", "gpt-4o-mini", "gpt-4.1"],
        _ => &["gemini-2.0-flash", "gemini-2.5-flash", "gemini-2.5-pro"],
    };

    let selection = Select::new()
        .with_prompt("Select your model")
        .items(models)
        .default(0)
        .interact()
        .context("Failed to select model")?;

    Ok(models[selection].to_string())
}

pub fn run_onboard() -> Result<Config> {
    println!("{}", style(BANNER).cyan().bold());

    println!("  {}", style("Welcome to quill!").white().bold());
    println!(
        "  {}",
        style("This wizard connects the invoice agent to a model provider.").dim()
    );
    println!();

    print_step(1, 3, "Provider");
    let provider = setup_provider()?;

    print_step(2, 3, "API Key Setup");
    let api_key = setup_api_key(provider)?;

    print_step(3, 3, "Model Selection");
    let model = setup_model(provider)?;

    let config = Config {
        provider: Some(provider.to_string()),
        api_key,
        model: Some(model),
        ..Default::default()
    };

    println!();
    println!("  {} Configuration complete!", style("✓").green().bold());
    println!(
        "  {} Config saved to {}",
        style("→").green(),
        style(quill_core::config::get_config_path().display()).cyan()
    );
    println!();
    println!(
        "  {} You can now run: {} or {}",
        style("→").green(),
        style("quill process").cyan().bold(),
        style("quill serve").cyan().bold()
    );
    println!();

    Ok(config)
}
