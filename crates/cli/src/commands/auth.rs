//! Login and logout.

use ptt_admin::api::auth;
use ptt_admin::views::LoginForm;
use ptt_admin::views::login::LOGIN_FAILED;
use secrecy::SecretString;

use super::output::print_line;
use super::{CliError, Context};

/// `login -u <username> [-p <password>]`
pub async fn login(ctx: &Context, username: &str, password: Option<String>) -> Result<(), CliError> {
    let password = password
        .filter(|p| !p.is_empty())
        .ok_or(CliError::MissingPassword)?;

    let mut form = LoginForm::new(username, SecretString::from(password));
    if form.submit(ctx.client()).await {
        print_line(&format!("Logged in as {}.", username.trim()))?;
        Ok(())
    } else {
        Err(CliError::LoginFailed(
            form.error().unwrap_or(LOGIN_FAILED).to_owned(),
        ))
    }
}

/// `logout`
pub async fn logout(ctx: &Context) -> Result<(), CliError> {
    auth::logout(ctx.client()).await?;
    print_line("Logged out.")?;
    Ok(())
}
