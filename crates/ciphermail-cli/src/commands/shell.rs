//! Interactive menu loop.
//!
//! Two menus: one before login (login, register, exit) and one after
//! (send, read, logout). Expected failures are reported and the loop goes
//! on; anything else ends the session.

use secrecy::ExposeSecret;

use ciphermail_core::{Accounts, CipherMailError, Mailbox, SqliteStore, User};

use crate::app::{login, AppContext};
use crate::errors::{core_error, CliError};
use crate::prompt::{pause, prompt_message_key, prompt_new_password, prompt_text};
use crate::ui::{inbox_table, Ui};

use super::read::select_message;
use super::send::deliver;

/// What the loop does after a menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

struct Session {
    store: SqliteStore,
    ui: Ui,
    user: Option<User>,
}

type Handler = fn(&mut Session) -> anyhow::Result<Flow>;

struct MenuItem {
    key: &'static str,
    label: &'static str,
    handler: Handler,
}

const AUTH_MENU: &[MenuItem] = &[
    MenuItem {
        key: "1",
        label: "Login",
        handler: login_action,
    },
    MenuItem {
        key: "2",
        label: "Register",
        handler: register_action,
    },
    MenuItem {
        key: "3",
        label: "Exit",
        handler: exit_action,
    },
];

const MAIN_MENU: &[MenuItem] = &[
    MenuItem {
        key: "1",
        label: "Send Encrypted Message",
        handler: send_action,
    },
    MenuItem {
        key: "2",
        label: "Read Messages",
        handler: read_action,
    },
    MenuItem {
        key: "3",
        label: "Logout",
        handler: logout_action,
    },
];

pub fn handle_shell(ctx: &AppContext) -> anyhow::Result<()> {
    let mut session = Session {
        store: ctx.open_store()?,
        ui: ctx.ui()?,
        user: None,
    };
    session.ui.banner();

    loop {
        let menu = match &session.user {
            Some(user) => {
                session.ui.user_status(&user.username);
                session.ui.section("MAIN MENU");
                MAIN_MENU
            }
            None => {
                session.ui.section("AUTHENTICATION");
                AUTH_MENU
            }
        };
        for item in menu {
            session.ui.menu_option(item.key, item.label);
        }

        let choice = prompt_text("Select option")?;
        let Some(item) = find_item(menu, &choice) else {
            session.ui.error("Invalid option!");
            continue;
        };

        match (item.handler)(&mut session) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(err) => match recoverable_message(&err) {
                Some(message) => session.ui.error(&message),
                None => return Err(err),
            },
        }
    }

    tracing::debug!("shell closed");
    Ok(())
}

fn find_item<'m>(menu: &'m [MenuItem], choice: &str) -> Option<&'m MenuItem> {
    let choice = choice.trim();
    menu.iter().find(|item| item.key == choice)
}

/// The message to show for an error the session survives, if it is one.
fn recoverable_message(err: &anyhow::Error) -> Option<String> {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return Some(cli.to_string());
    }
    match err.downcast_ref::<CipherMailError>() {
        Some(core) if core.is_recoverable() => Some(core.to_string()),
        _ => None,
    }
}

fn login_action(session: &mut Session) -> anyhow::Result<Flow> {
    let user = login(&session.store, None)?;
    session
        .ui
        .success(&format!("Welcome back, @{}!", user.username));
    session.user = Some(user);
    Ok(Flow::Continue)
}

fn register_action(session: &mut Session) -> anyhow::Result<Flow> {
    let username = prompt_text("Username")?;
    let password = prompt_new_password()?;
    let user = Accounts::new(&session.store)
        .register(&username, password.expose_secret())
        .map_err(core_error)?;
    session.ui.success(&format!(
        "Account @{} created successfully! You can now log in.",
        user.username
    ));
    Ok(Flow::Continue)
}

fn exit_action(session: &mut Session) -> anyhow::Result<Flow> {
    session.ui.goodbye(None);
    Ok(Flow::Exit)
}

fn logout_action(session: &mut Session) -> anyhow::Result<Flow> {
    if let Some(user) = session.user.take() {
        session.ui.goodbye(Some(&user.username));
    }
    Ok(Flow::Continue)
}

fn current_user(session: &Session) -> anyhow::Result<&User> {
    session
        .user
        .as_ref()
        .ok_or_else(|| CliError::auth_failed("Not logged in.").into())
}

fn send_action(session: &mut Session) -> anyhow::Result<Flow> {
    let sender = current_user(session)?.username.clone();
    session.ui.section("COMPOSE ENCRYPTED MESSAGE");

    let to = prompt_text("Recipient username")?;
    let body = prompt_text("Message")?;
    let key = prompt_message_key("Encryption key")?;

    let (_, recipient) = deliver(&session.store, &sender, &to, &body, key.expose_secret())?;
    session
        .ui
        .success(&format!("Message encrypted and sent to @{}!", recipient));
    Ok(Flow::Continue)
}

fn read_action(session: &mut Session) -> anyhow::Result<Flow> {
    let username = current_user(session)?.username.clone();
    let mailbox = Mailbox::new(&session.store);
    session.ui.section("INBOX");

    let unread = mailbox.list_unread(&username).map_err(core_error)?;
    if unread.is_empty() {
        session.ui.info("No new messages. Your inbox is empty.");
        return Ok(Flow::Continue);
    }
    println!("{}", inbox_table(&unread));

    let choice = prompt_text("Enter message number to read (0 to cancel)")?;
    if choice.trim() == "0" {
        return Ok(Flow::Continue);
    }
    let selected = select_message(&unread, &choice)?;
    let key = prompt_message_key("Enter decryption key")?;

    let body = mailbox
        .read_message(&selected.id, key.expose_secret())
        .map_err(core_error)?;
    session
        .ui
        .message(&selected.sender, &selected.created_at, &body);
    pause()?;
    Ok(Flow::Continue)
}
