use secrecy::ExposeSecret;
use uuid::Uuid;

use ciphermail_core::{Mailbox, Message};

use crate::app::{login, AppContext};
use crate::cli::ReadArgs;
use crate::errors::{core_error, CliError};
use crate::prompt::prompt_message_key;

pub fn handle_read(ctx: &AppContext, args: &ReadArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let user = login(&store, args.user.clone())?;
    let mailbox = Mailbox::new(&store);

    let unread = mailbox.list_unread(&user.username).map_err(core_error)?;
    let selected = select_message(&unread, &args.message)?;
    let key = prompt_message_key("Decryption key")?;

    let body = mailbox
        .read_message(&selected.id, key.expose_secret())
        .map_err(core_error)?;

    ctx.ui()?
        .message(&selected.sender, &selected.created_at, &body);
    Ok(())
}

/// Pick a message from the user's unread list by 1-based number or ID.
///
/// Only messages in the list can be selected, so one user cannot read
/// another user's mail by guessing an ID.
pub fn select_message<'m>(unread: &'m [Message], selector: &str) -> Result<&'m Message, CliError> {
    let selector = selector.trim();

    if let Ok(number) = selector.parse::<usize>() {
        return match number.checked_sub(1).and_then(|i| unread.get(i)) {
            Some(message) => Ok(message),
            None => Err(CliError::invalid_input(format!(
                "Invalid message number: {} (inbox has {} unread)",
                number,
                unread.len()
            ))),
        };
    }

    let id = Uuid::parse_str(selector).map_err(|_| {
        CliError::invalid_input(format!(
            "Expected an inbox number or message ID, got \"{}\"",
            selector
        ))
    })?;
    unread.iter().find(|message| message.id == id).ok_or_else(|| {
        CliError::not_found(
            format!("No unread message {} in your inbox.", id),
            "Run `ciphermail inbox` to list your unread messages.",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::exit_codes;
    use chrono::Utc;

    fn inbox() -> Vec<Message> {
        ["alice", "carol"]
            .iter()
            .map(|sender| Message {
                id: Uuid::now_v7(),
                sender: sender.to_string(),
                recipient: "bob".to_string(),
                ciphertext: String::new(),
                created_at: Utc::now(),
                read: false,
            })
            .collect()
    }

    #[test]
    fn test_select_by_number() {
        let unread = inbox();
        assert_eq!(select_message(&unread, "1").unwrap().sender, "alice");
        assert_eq!(select_message(&unread, " 2 ").unwrap().sender, "carol");
    }

    #[test]
    fn test_select_out_of_range() {
        let unread = inbox();
        for selector in ["0", "3"] {
            let err = select_message(&unread, selector).unwrap_err();
            assert_eq!(err.exit_code(), exit_codes::INVALID_INPUT);
        }
    }

    #[test]
    fn test_select_by_id() {
        let unread = inbox();
        let id = unread[1].id.to_string();
        assert_eq!(select_message(&unread, &id).unwrap().sender, "carol");
    }

    #[test]
    fn test_select_foreign_id_not_found() {
        let unread = inbox();
        let err = select_message(&unread, &Uuid::new_v4().to_string()).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::NOT_FOUND);
    }

    #[test]
    fn test_select_garbage() {
        let unread = inbox();
        let err = select_message(&unread, "latest").unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::INVALID_INPUT);
    }
}
