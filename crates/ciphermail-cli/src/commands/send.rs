use secrecy::ExposeSecret;
use uuid::Uuid;

use ciphermail_core::{normalize_username, Mailbox, MailStore};

use crate::app::{login, AppContext};
use crate::cli::SendArgs;
use crate::errors::core_error;
use crate::prompt::{prompt_message_key, read_message_body};

pub fn handle_send(ctx: &AppContext, args: &SendArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let user = login(&store, args.user.clone())?;

    let body = read_message_body(args.message.clone())?;
    let key = prompt_message_key("Encryption key")?;

    let (id, recipient) = deliver(&store, &user.username, &args.to, &body, key.expose_secret())?;

    let ui = ctx.ui()?;
    if ui.quiet() {
        println!("{}", id);
    } else {
        ui.success(&format!("Message encrypted and sent to @{}! ({})", recipient, id));
    }
    Ok(())
}

/// Send `body` to the user named by `to`, as typed (`bob` or `@bob`).
///
/// Returns the message ID and the normalized recipient.
pub fn deliver<'t, S: MailStore + ?Sized>(
    store: &S,
    sender: &str,
    to: &'t str,
    body: &str,
    key: &str,
) -> anyhow::Result<(Uuid, &'t str)> {
    let recipient = normalize_username(to);
    let id = Mailbox::new(store)
        .send_message(sender, recipient, body, key)
        .map_err(core_error)?;
    Ok((id, recipient))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{exit_codes, CliError};
    use ciphermail_core::{Accounts, SqliteStore};

    fn store_with_users(names: &[&str]) -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        for name in names {
            Accounts::new(&store).register(name, "pw").unwrap();
        }
        store
    }

    #[test]
    fn test_deliver_strips_at_sign() {
        let store = store_with_users(&["alice", "bob"]);

        let (id, recipient) = deliver(&store, "alice", " @bob", "hi", "k").unwrap();
        assert_eq!(recipient, "bob");

        let mailbox = Mailbox::new(&store);
        assert_eq!(mailbox.list_unread("bob").unwrap()[0].id, id);
        assert_eq!(mailbox.read_message(&id, "k").unwrap(), "hi");
    }

    #[test]
    fn test_deliver_unknown_recipient() {
        let store = store_with_users(&["alice"]);

        let err = deliver(&store, "alice", "@ghost", "hi", "k").unwrap_err();
        let cli = err.downcast_ref::<CliError>().unwrap();
        assert_eq!(cli.exit_code(), exit_codes::NOT_FOUND);
        assert!(cli.to_string().contains("@ghost"));
    }
}
