//! Interactive input with environment-variable overrides.
//!
//! Secrets come from the environment first so that scripts and tests can
//! drive the CLI without a terminal.

use std::io::{self, IsTerminal, Read};

use dialoguer::{Input, Password};
use secrecy::SecretString;

/// Account password override.
pub const PASSWORD_ENV: &str = "CIPHERMAIL_PASSWORD";

/// Message key override. An empty value is a valid key.
pub const MESSAGE_KEY_ENV: &str = "CIPHERMAIL_MESSAGE_KEY";

fn password_from_env() -> Option<SecretString> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

/// Prompt for an account password (hidden input).
pub fn prompt_password() -> anyhow::Result<SecretString> {
    if let Some(value) = password_from_env() {
        return Ok(value);
    }
    Password::new()
        .with_prompt("Password")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Prompt for a new account password with confirmation.
pub fn prompt_new_password() -> anyhow::Result<SecretString> {
    if let Some(value) = password_from_env() {
        return Ok(value);
    }
    Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Prompt for a message key (hidden input, may be empty).
pub fn prompt_message_key(prompt: &str) -> anyhow::Result<SecretString> {
    if let Ok(value) = std::env::var(MESSAGE_KEY_ENV) {
        return Ok(SecretString::from(value));
    }
    Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read key: {}", e))
}

/// Prompt for a line of visible text.
pub fn prompt_text(prompt: &str) -> anyhow::Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .map(|value| value.trim().to_string())
        .map_err(|e| anyhow::anyhow!("Failed to read input: {}", e))
}

/// Use `value` if given, otherwise prompt for it.
pub fn value_or_prompt(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => prompt_text(prompt),
    }
}

/// Read the message body from `--message`, piped stdin, or a prompt.
pub fn read_message_body(message: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = message {
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(buffer.trim_end_matches(['\r', '\n']).to_string());
    }

    Input::<String>::new()
        .with_prompt("Message")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read message: {}", e))
}

/// Wait for Enter.
pub fn pause() -> anyhow::Result<()> {
    Input::<String>::new()
        .with_prompt("Press Enter to continue")
        .allow_empty(true)
        .interact_text()
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!("Failed to read input: {}", e))
}
