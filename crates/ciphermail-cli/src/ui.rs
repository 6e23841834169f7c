//! Terminal rendering: banner, menus, status lines, inbox table.

use std::io::IsTerminal;

use chrono::{DateTime, Local, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use owo_colors::{AnsiColors, OwoColorize};

use ciphermail_core::Message;

const RULE_WIDTH: usize = 70;

const BANNER: &str = r#"
  ____ _       _               __  __       _ _
 / ___(_)_ __ | |__   ___ _ __|  \/  | __ _(_) |
| |   | | '_ \| '_ \ / _ \ '__| |\/| |/ _` | | |
| |___| | |_) | | | |  __/ |  | |  | | (_| | | |
 \____|_| .__/|_| |_|\___|_|  |_|  |_|\__,_|_|_|
        |_|
"#;

/// Output settings shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Ui {
    color: bool,
    quiet: bool,
}

impl Ui {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }

    /// Color only when stdout is a terminal and nothing disables it.
    pub fn detect(color_enabled: bool, quiet: bool) -> Self {
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        let color =
            color_enabled && std::io::stdout().is_terminal() && !term_is_dumb && !no_color_env;
        Self::new(color, quiet)
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    fn paint(&self, text: &str, color: AnsiColors) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn rule(&self, ch: char, color: AnsiColors) -> String {
        self.paint(&ch.to_string().repeat(RULE_WIDTH), color)
    }

    pub fn banner(&self) {
        if self.quiet {
            return;
        }
        println!("{}", self.paint(BANNER, AnsiColors::Cyan));
        println!(
            "        {}",
            self.paint("[ ENCRYPTED • PASSPHRASE-PROTECTED ]", AnsiColors::Red)
        );
    }

    pub fn section(&self, title: &str) {
        if self.quiet {
            return;
        }
        println!();
        println!("{}", self.rule('═', AnsiColors::Cyan));
        println!("{}", self.paint(&format!("▶ {}", title), AnsiColors::Yellow));
        println!("{}", self.rule('═', AnsiColors::Cyan));
    }

    pub fn menu_option(&self, key: &str, text: &str) {
        println!("{} {}", self.paint(&format!("[{}]", key), AnsiColors::Green), text);
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{}", self.paint(&format!("✓ {}", message), AnsiColors::Green));
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{}", self.paint(&format!("ℹ {}", message), AnsiColors::Cyan));
        }
    }

    pub fn error(&self, message: &str) {
        eprintln!("{}", self.paint(&format!("✗ {}", message), AnsiColors::Red));
    }

    pub fn user_status(&self, username: &str) {
        println!();
        println!("{}", self.rule('━', AnsiColors::Magenta));
        println!(
            "{} {}",
            self.paint("LOGGED IN AS:", AnsiColors::Yellow),
            self.paint(&format!("@{}", username), AnsiColors::Green)
        );
        println!("{}", self.rule('━', AnsiColors::Magenta));
    }

    /// Print a decrypted message. The body is printed even in quiet mode.
    pub fn message(&self, sender: &str, sent_at: &DateTime<Utc>, body: &str) {
        if !self.quiet {
            println!("{}", self.rule('═', AnsiColors::Cyan));
            println!("{} @{}", self.paint("FROM:", AnsiColors::Green), sender);
            println!(
                "{} {}",
                self.paint("DATE:", AnsiColors::Green),
                format_datetime(sent_at)
            );
            println!("{}", self.rule('═', AnsiColors::Cyan));
        }
        println!("{}", body);
        if !self.quiet {
            println!("{}", self.rule('═', AnsiColors::Cyan));
        }
    }

    pub fn goodbye(&self, username: Option<&str>) {
        if self.quiet {
            return;
        }
        let text = match username {
            Some(name) => format!("◈ Goodbye, @{}! Stay secure! ◈", name),
            None => "◈ Connection terminated. Stay anonymous! ◈".to_string(),
        };
        println!("{}", self.paint(&text, AnsiColors::Cyan));
    }
}

/// Local wall-clock time, as shown in the inbox.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Render unread messages as a numbered table.
pub fn inbox_table(messages: &[Message]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "FROM", "SENT", "ID"]);

    for (index, message) in messages.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(format!("@{}", message.sender)),
            Cell::new(format_datetime(&message.created_at)),
            Cell::new(message.id),
        ]);
    }

    table.to_string()
}

/// JSON view of an unread message. The token is left out.
pub fn message_json(index: usize, message: &Message) -> serde_json::Value {
    serde_json::json!({
        "index": index,
        "id": message.id,
        "sender": message.sender,
        "recipient": message.recipient,
        "created_at": message.created_at,
        "read": message.read,
    })
}
