//! Channel commands.

use ptt_admin_core::{Channel, ChannelId, Entity, UserId};

use super::CliError;
use super::Context;
use super::output::TableRow;
use super::records::{apply_assignment, mount, save};

impl TableRow for Channel {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "CODE", "USERS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.label().into_owned(),
            self.channel_id.clone().unwrap_or_else(|| "-".to_owned()),
            self.authorized_users.len().to_string(),
        ]
    }
}

/// `channels create --name <name> [--user <id>]...`
pub async fn create(ctx: &Context, name: String, users: Vec<UserId>) -> Result<(), CliError> {
    let mut screen = mount::<Channel>(ctx).await?;
    screen.open_create().draft.name = name;
    apply_assignment(&mut screen, &users, &[])?;
    save(&mut screen, "Created").await
}

/// `channels edit <id> [--name <name>] [--add <id>]... [--remove <id>]...`
pub async fn edit(
    ctx: &Context,
    id: ChannelId,
    name: Option<String>,
    add: &[UserId],
    remove: &[UserId],
) -> Result<(), CliError> {
    let mut screen = mount::<Channel>(ctx).await?;
    let dialog = screen.open_edit(id)?;
    if let Some(name) = name {
        dialog.draft.name = name;
    }
    apply_assignment(&mut screen, add, remove)?;
    save(&mut screen, "Updated").await
}
