//! List, show and delete, shared by channels and users.

use ptt_admin::{ManagementScreen, ScreenError};
use ptt_admin::screens::ManagedEntity;
use ptt_admin::views::{EntityList, ListState, Pane, Transfer};
use ptt_admin_core::Entity;

use super::output::{TableRow, confirm, print_line, print_table};
use super::{CliError, Context};

/// Turn a failed list load into an error.
fn check_loaded<T: Entity>(list: &EntityList<T>) -> Result<(), CliError> {
    match (list.error(), list.failure()) {
        (Some(message), Some(source)) => Err(CliError::Load {
            message,
            source: source.clone(),
        }),
        _ => Ok(()),
    }
}

/// Load the records and the related records, failing if either load failed.
pub async fn mount<E: ManagedEntity>(ctx: &Context) -> Result<ManagementScreen<E>, CliError> {
    let mut screen = ManagementScreen::<E>::new(ctx.client().clone());
    screen.mount().await;
    check_loaded(&screen.list)?;
    check_loaded(&screen.related)?;
    Ok(screen)
}

/// `<kind>s list [-s query]`
pub async fn list<E>(ctx: &Context, search: Option<String>) -> Result<(), CliError>
where
    E: ManagedEntity + TableRow,
{
    let mut screen = ManagementScreen::<E>::new(ctx.client().clone());
    screen.refresh().await;
    check_loaded(&screen.list)?;

    if let Some(query) = search {
        screen.list.set_query(query);
    }
    match screen.list.state() {
        ListState::Populated(rows) => print_table(&rows)?,
        ListState::Empty | ListState::Loading => print_line(&format!("No {}s found.", E::KIND))?,
    }
    Ok(())
}

/// `<kind>s show <id>`: the record, then both assignment panes.
pub async fn show<E>(
    ctx: &Context,
    id: E::Id,
    available_search: Option<String>,
    allowed_search: Option<String>,
) -> Result<(), CliError>
where
    E: ManagedEntity + TableRow,
    E::Related: TableRow,
{
    let mut screen = mount::<E>(ctx).await?;
    let dialog = screen.open_edit(id)?;
    if let Some(query) = available_search {
        dialog.assignment.set_search(Pane::Available, query);
    }
    if let Some(query) = allowed_search {
        dialog.assignment.set_search(Pane::Allowed, query);
    }

    if let Some(record) = screen.list.get(id) {
        print_table(&[record])?;
    }
    for (pane, title) in [(Pane::Allowed, "Allowed"), (Pane::Available, "Available")] {
        print_line("")?;
        let rows = screen.pane(pane);
        print_line(&format!("{title} {}s ({}):", <E::Related as Entity>::KIND, rows.len()))?;
        if !rows.is_empty() {
            print_table(&rows)?;
        }
    }
    Ok(())
}

/// `<kind>s delete <id> [--yes]`
pub async fn delete<E: ManagedEntity>(ctx: &Context, id: E::Id, yes: bool) -> Result<(), CliError> {
    let mut screen = ManagementScreen::<E>::new(ctx.client().clone());
    screen.request_delete(id);

    if !yes && !confirm(&format!("Delete {} {id}?", E::KIND))? {
        screen.cancel_delete();
        print_line("Cancelled.")?;
        return Ok(());
    }

    if screen.confirm_delete().await?.is_some() {
        print_line(&format!("Deleted {} {id}.", E::KIND))?;
    }
    Ok(())
}

/// Apply `--add`/`--remove` ids to the open dialog through the assignment
/// editor, the same way a user would: select in one pane, then transfer.
pub fn apply_assignment<E: ManagedEntity>(
    screen: &mut ManagementScreen<E>,
    add: &[<E::Related as Entity>::Id],
    remove: &[<E::Related as Entity>::Id],
) -> Result<(), CliError> {
    if let Some(&id) = add
        .iter()
        .chain(remove)
        .find(|&&id| screen.related.get(id).is_none())
    {
        return Err(CliError::UnknownRelated {
            kind: <E::Related as Entity>::KIND,
            id: id.to_string(),
        });
    }

    if screen.dialog().is_none() {
        return Err(ScreenError::NoDialog.into());
    }

    // Select only ids not already on the target side or selected
    for &id in add {
        if screen.dialog().is_some_and(|d| {
            !d.assignment.assigned().contains(&id) && !d.assignment.is_selected(Pane::Available, id)
        }) {
            screen.toggle_select(Pane::Available, id);
        }
    }
    transfer(screen, Transfer::Right);

    for &id in remove {
        if screen.dialog().is_some_and(|d| {
            d.assignment.assigned().contains(&id) && !d.assignment.is_selected(Pane::Allowed, id)
        }) {
            screen.toggle_select(Pane::Allowed, id);
        }
    }
    transfer(screen, Transfer::Left);
    Ok(())
}

fn transfer<E: ManagedEntity>(screen: &mut ManagementScreen<E>, direction: Transfer) {
    if let Some(dialog) = screen.dialog_mut() {
        dialog.assignment.transfer(direction);
    }
}

/// Submit the open dialog and report the result.
pub async fn save<E: ManagedEntity>(
    screen: &mut ManagementScreen<E>,
    verb: &str,
) -> Result<(), CliError> {
    screen.submit().await?;
    print_line(&format!("{verb} {}.", E::KIND))?;
    Ok(())
}
