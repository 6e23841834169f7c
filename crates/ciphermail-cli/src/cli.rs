use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

use ciphermail_core::VERSION;

/// CipherMail - passphrase-encrypted messages between registered users
#[derive(Parser)]
#[command(name = "ciphermail")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the message database
    #[arg(short, long, global = true, env = "CIPHERMAIL_DB")]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log to stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Where to create the database (default: XDG data dir)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `register` command
#[derive(Args)]
pub struct RegisterArgs {
    /// Username for the new account
    #[arg(value_name = "USERNAME")]
    pub username: Option<String>,
}

/// Arguments for the `send` command
#[derive(Args)]
pub struct SendArgs {
    /// Account to send from
    #[arg(short, long, env = "CIPHERMAIL_USER")]
    pub user: Option<String>,

    /// Recipient (@username)
    #[arg(short, long, value_name = "RECIPIENT")]
    pub to: String,

    /// Message text (overrides stdin/prompt)
    #[arg(short, long)]
    pub message: Option<String>,
}

/// Arguments for the `inbox` command
#[derive(Args)]
pub struct InboxArgs {
    /// Account whose inbox to list
    #[arg(short, long, env = "CIPHERMAIL_USER")]
    pub user: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `read` command
#[derive(Args)]
pub struct ReadArgs {
    /// Account whose inbox to read from
    #[arg(short, long, env = "CIPHERMAIL_USER")]
    pub user: Option<String>,

    /// Inbox number (as shown by `inbox`) or message ID
    #[arg(value_name = "MESSAGE")]
    pub message: String,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file and create the database
    Init(InitArgs),

    /// Create a new account
    Register(RegisterArgs),

    /// Encrypt and send a message
    Send(SendArgs),

    /// List unread messages
    Inbox(InboxArgs),

    /// Decrypt a message and mark it read
    Read(ReadArgs),

    /// Interactive menu (default)
    Shell,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
