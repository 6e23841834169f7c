use secrecy::ExposeSecret;

use ciphermail_core::Accounts;

use crate::app::AppContext;
use crate::cli::RegisterArgs;
use crate::errors::core_error;
use crate::prompt::{prompt_new_password, value_or_prompt};

pub fn handle_register(ctx: &AppContext, args: &RegisterArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let username = value_or_prompt(args.username.clone(), "Username")?;
    let password = prompt_new_password()?;

    let user = Accounts::new(&store)
        .register(&username, password.expose_secret())
        .map_err(core_error)?;

    ctx.ui()?.success(&format!(
        "Account @{} created successfully! You can now log in.",
        user.username
    ));
    Ok(())
}
