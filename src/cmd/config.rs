use std::io::{self, Write};
use std::str::FromStr;

use clap::{Args, Subcommand};

use crate::config::{
    DEFAULT_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, StoredConfig,
    config_file_path,
};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring storygen.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Without an API key, tickets are generated from local templates.");
    println!();

    apply_prompt("OpenAI API key", &mut cfg.openai_api_key, true)?;
    apply_prompt("Model", &mut cfg.openai_model, false)?;
    apply_prompt("Chat completion URL", &mut cfg.openai_api_url, false)?;
    apply_parsed_prompt("Max tokens", &mut cfg.max_tokens)?;
    apply_parsed_prompt("Temperature", &mut cfg.temperature)?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("OpenAI API key: {}", mask_secret(&cfg.openai_api_key));
    println!("Model: {}", display_value(&cfg.openai_model, DEFAULT_MODEL));
    println!(
        "Chat completion URL: {}",
        display_value(&cfg.openai_api_url, DEFAULT_API_URL)
    );
    println!("Max tokens: {}", cfg.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS));
    println!("Temperature: {}", cfg.temperature.unwrap_or(DEFAULT_TEMPERATURE));

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn apply_parsed_prompt<T>(field: &str, target: &mut Option<T>) -> AppResult<()>
where
    T: FromStr + ToString,
{
    loop {
        let current = target.as_ref().map(ToString::to_string);
        match prompt(field, current.as_deref(), false)? {
            PromptAction::Keep => return Ok(()),
            PromptAction::Clear => {
                *target = None;
                return Ok(());
            }
            PromptAction::Set(value) => match value.parse::<T>() {
                Ok(parsed) => {
                    *target = Some(parsed);
                    return Ok(());
                }
                Err(_) => println!("'{value}' is not a valid value, try again."),
            },
        }
    }
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::from_input(&input))
}

fn display_value(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| format!("{default} (default)"))
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token)
            if token.len() > 6
                && token.is_char_boundary(3)
                && token.is_char_boundary(token.len() - 3) =>
        {
            let prefix = &token[..3];
            let suffix = &token[token.len() - 3..];
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_long_and_short_secrets() {
        assert_eq!(mask_secret(&Some("sk-abcdef123".to_string())), "sk-***123");
        assert_eq!(mask_secret(&Some("short".to_string())), "***");
        assert_eq!(mask_secret(&None), "<not set>");
    }

    #[test]
    fn interprets_prompt_input() {
        assert_eq!(PromptAction::from_input("\n"), PromptAction::Keep);
        assert_eq!(PromptAction::from_input(" - \n"), PromptAction::Clear);
        assert_eq!(PromptAction::from_input("gpt-4o\n"), PromptAction::Set("gpt-4o".to_string()));
    }

    #[test]
    fn shows_default_for_unset_values() {
        assert_eq!(display_value(&None, "gpt-3.5-turbo"), "gpt-3.5-turbo (default)");
        assert_eq!(display_value(&Some("gpt-4o".to_string()), "x"), "gpt-4o");
    }
}
