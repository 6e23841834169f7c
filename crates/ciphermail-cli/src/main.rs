//! CipherMail CLI - passphrase-encrypted messages between local accounts
//!
//! Every subcommand is a thin layer over `ciphermail-core`; with no
//! subcommand the interactive menu starts.

mod app;
mod cli;
mod commands;
mod config;
mod errors;
mod logging;
mod prompt;
mod ui;

use clap::Parser;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{inbox, init, misc, read, register, send, shell};
use crate::errors::CliError;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        tracing::debug!(error = ?e, "command failed");
        let code = match e.downcast_ref::<CliError>() {
            Some(cli_error) => cli_error.exit_code(),
            None => 1,
        };
        match ctx.ui() {
            Ok(ui) => ui.error(&format!("Error: {}", e)),
            Err(_) => eprintln!("Error: {}", e),
        }
        std::process::exit(code);
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => init::handle_init(ctx, args),
        Some(Commands::Register(args)) => register::handle_register(ctx, args),
        Some(Commands::Send(args)) => send::handle_send(ctx, args),
        Some(Commands::Inbox(args)) => inbox::handle_inbox(ctx, args),
        Some(Commands::Read(args)) => read::handle_read(ctx, args),
        Some(Commands::Completions(args)) => misc::handle_completions(args.shell),
        Some(Commands::Shell) | None => shell::handle_shell(ctx),
    }
}
