//! User commands.

use ptt_admin_core::{ChannelId, User, UserId, UserRole};
use secrecy::SecretString;

use super::output::TableRow;
use super::records::{apply_assignment, mount, save};
use super::{CliError, Context};

impl TableRow for User {
    const HEADERS: &'static [&'static str] = &["ID", "USERNAME", "ROLE", "ACTIVE", "CHANNELS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.role.label().to_owned(),
            if self.active { "yes" } else { "no" }.to_owned(),
            self.channels.len().to_string(),
        ]
    }
}

/// Fields of `users create`.
pub struct NewUser {
    pub username: String,
    pub password: SecretString,
    pub role: UserRole,
    pub active: bool,
    pub channels: Vec<ChannelId>,
}

/// Optional field changes of `users edit`.
pub struct UserChanges {
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub role: Option<UserRole>,
    pub active: Option<bool>,
}

/// `users create --username <u> --password <p> [--role r] [--inactive] [--channel <id>]...`
pub async fn create(ctx: &Context, user: NewUser) -> Result<(), CliError> {
    let mut screen = mount::<User>(ctx).await?;
    let draft = &mut screen.open_create().draft;
    draft.username = user.username;
    draft.password = user.password;
    draft.role = user.role;
    draft.active = user.active;
    apply_assignment(&mut screen, &user.channels, &[])?;
    save(&mut screen, "Created").await
}

/// `users edit <id> [--username u] [--password p] [--role r] [--active bool] [--add <id>]... [--remove <id>]...`
pub async fn edit(
    ctx: &Context,
    id: UserId,
    changes: UserChanges,
    add: &[ChannelId],
    remove: &[ChannelId],
) -> Result<(), CliError> {
    let mut screen = mount::<User>(ctx).await?;
    let draft = &mut screen.open_edit(id)?.draft;
    if let Some(username) = changes.username {
        draft.username = username;
    }
    if let Some(password) = changes.password {
        draft.password = password;
    }
    if let Some(role) = changes.role {
        draft.role = role;
    }
    if let Some(active) = changes.active {
        draft.active = active;
    }
    apply_assignment(&mut screen, add, remove)?;
    save(&mut screen, "Updated").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_row() {
        let user = User {
            id: UserId::new(3),
            username: "alice".to_owned(),
            active: false,
            role: UserRole::Senior,
            channels: vec![ChannelId::new(7)],
        };
        assert_eq!(user.cells(), vec!["3", "alice", "Senior user", "no", "1"]);
    }
}
