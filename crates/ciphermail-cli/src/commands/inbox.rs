use ciphermail_core::Mailbox;

use crate::app::{login, AppContext};
use crate::cli::InboxArgs;
use crate::errors::core_error;
use crate::ui::{inbox_table, message_json};

pub fn handle_inbox(ctx: &AppContext, args: &InboxArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let user = login(&store, args.user.clone())?;
    let messages = Mailbox::new(&store)
        .list_unread(&user.username)
        .map_err(core_error)?;

    if args.json {
        let values: Vec<serde_json::Value> = messages
            .iter()
            .enumerate()
            .map(|(i, message)| message_json(i + 1, message))
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    let ui = ctx.ui()?;
    if messages.is_empty() {
        ui.info("No new messages. Your inbox is empty.");
        return Ok(());
    }

    println!("{}", inbox_table(&messages));
    Ok(())
}
