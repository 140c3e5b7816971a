//! Generic list + dialog + delete screen.

use ptt_admin_core::Entity;
use tracing::{debug, info, instrument, warn};

use super::ManagedEntity;
use crate::api::{ApiClient, resource};
use crate::error::ScreenError;
use crate::views::{DeleteConfirmation, EntityList, FormDialog, FormMode, Pane};

/// State and actions of one management screen.
///
/// Owns all of its state; actions take `&mut self`, so there is no locking
/// and no request de-duplication.
#[derive(Debug)]
pub struct ManagementScreen<E: ManagedEntity> {
    client: ApiClient,
    /// The managed records.
    pub list: EntityList<E>,
    /// Related records offered by the assignment editor.
    pub related: EntityList<E::Related>,
    /// Delete confirmation for rows of `list`.
    pub delete: DeleteConfirmation<E::Id>,
    dialog: Option<FormDialog<E::Draft>>,
}

impl<E: ManagedEntity> ManagementScreen<E> {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            list: EntityList::new(),
            related: EntityList::new(),
            delete: DeleteConfirmation::new(),
            dialog: None,
        }
    }

    /// Load the records and the related records concurrently.
    ///
    /// Each list tracks its own loading flag and error.
    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn mount(&mut self) {
        self.list.begin_load();
        self.related.begin_load();
        let (records, related) = tokio::join!(
            resource::list::<E>(&self.client),
            resource::list::<E::Related>(&self.client),
        );
        self.list.finish_load(records);
        self.related.finish_load(related);
    }

    /// Re-fetch the managed records.
    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn refresh(&mut self) {
        self.list.begin_load();
        let records = resource::list::<E>(&self.client).await;
        self.list.finish_load(records);
    }

    /// Re-fetch the related records.
    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn refresh_related(&mut self) {
        self.related.begin_load();
        let related = resource::list::<E::Related>(&self.client).await;
        self.related.finish_load(related);
    }

    /// The open dialog, if any.
    #[must_use]
    pub const fn dialog(&self) -> Option<&FormDialog<E::Draft>> {
        self.dialog.as_ref()
    }

    /// The open dialog, for editing its fields.
    pub const fn dialog_mut(&mut self) -> Option<&mut FormDialog<E::Draft>> {
        self.dialog.as_mut()
    }

    /// Open a blank dialog, replacing any open one.
    pub fn open_create(&mut self) -> &mut FormDialog<E::Draft> {
        self.dialog.insert(FormDialog::create())
    }

    /// Open a dialog seeded from the loaded record `id`.
    ///
    /// # Errors
    ///
    /// Returns `ScreenError::UnknownRecord` if `id` is not in the list.
    pub fn open_edit(&mut self, id: E::Id) -> Result<&mut FormDialog<E::Draft>, ScreenError> {
        let record = self.list.get(id).ok_or_else(|| ScreenError::UnknownRecord {
            kind: E::KIND,
            id: id.to_string(),
        })?;
        let dialog = FormDialog::edit(record);
        Ok(self.dialog.insert(dialog))
    }

    /// Close the dialog and discard its draft.
    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    /// Records in one pane of the open dialog's assignment editor.
    #[must_use]
    pub fn pane(&self, pane: Pane) -> Vec<&E::Related> {
        self.dialog.as_ref().map_or_else(Vec::new, |dialog| {
            dialog.assignment.pane(pane, self.related.items())
        })
    }

    /// Flip the selection of a related record in one pane of the open
    /// dialog.
    ///
    /// Only rows the pane currently shows can be selected. Returns whether
    /// the selection changed; `false` when no dialog is open.
    pub fn toggle_select(&mut self, pane: Pane, id: <E::Related as Entity>::Id) -> bool {
        let related = self.related.items();
        self.dialog
            .as_mut()
            .is_some_and(|dialog| dialog.assignment.toggle_select(pane, id, related))
    }

    /// Create or update from the open dialog.
    ///
    /// On success the list is re-fetched and the dialog closed. On failure
    /// the dialog stays open with the error inline and its draft intact.
    ///
    /// # Errors
    ///
    /// - `ScreenError::NoDialog` if no dialog is open
    /// - `ScreenError::Validation` if the draft cannot be submitted; nothing is sent
    /// - `ScreenError::Api` if the call fails
    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn submit(&mut self) -> Result<(), ScreenError> {
        let dialog = self.dialog.as_mut().ok_or(ScreenError::NoDialog)?;
        let payload = dialog.payload()?;
        let mode = dialog.mode();
        dialog.begin_submit();

        let result = match mode {
            FormMode::Create => resource::create::<E>(&self.client, &payload).await,
            FormMode::Edit(id) => resource::update::<E>(&self.client, id, &payload).await,
        };

        match result {
            Ok(_) => {
                info!(mode = ?mode, "Saved {}", E::KIND);
                self.dialog = None;
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Save failed");
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.fail_submit(e.to_string());
                }
                Err(e.into())
            }
        }
    }

    /// Ask to delete `id`. Nothing is sent until [`ManagementScreen::confirm_delete`].
    pub fn request_delete(&mut self, id: E::Id) {
        debug!(id = %id, "Delete requested");
        self.delete.request(id);
    }

    /// Drop the pending delete without a network call.
    pub fn cancel_delete(&mut self) {
        self.delete.cancel();
    }

    /// Delete the pending candidate.
    ///
    /// The confirmation closes whatever the outcome. On success the list is
    /// re-fetched; on failure the delete error is set and the list is left
    /// as it was.
    ///
    /// Returns the deleted id, or `None` if nothing was pending.
    ///
    /// # Errors
    ///
    /// Returns `ScreenError::Api` if the call fails.
    #[instrument(skip(self), fields(kind = E::KIND))]
    pub async fn confirm_delete(&mut self) -> Result<Option<E::Id>, ScreenError> {
        let Some(id) = self.delete.begin() else {
            return Ok(None);
        };

        match resource::delete::<E>(&self.client, id).await {
            Ok(()) => {
                self.delete.finish(Ok(()));
                info!(id = %id, "Deleted {}", E::KIND);
                self.refresh().await;
                Ok(Some(id))
            }
            Err(e) => {
                warn!(id = %id, error = %e, "Delete failed");
                self.delete.finish(Err(e.to_string()));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use ptt_admin_core::{Channel, ChannelId, User, UserId, UserRole};
    use url::Url;

    use super::*;
    use crate::api::SessionJar;
    use crate::config::ConsoleConfig;
    use crate::views::{Transfer, ValidationError};

    // Port 9 is discard; nothing in these tests may reach the network.
    fn offline_client() -> ApiClient {
        let config = ConsoleConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        ApiClient::new(&config, Arc::new(SessionJar::new())).unwrap()
    }

    #[tokio::test]
    async fn test_submit_without_dialog() {
        let mut screen = ManagementScreen::<Channel>::new(offline_client());
        assert!(matches!(screen.submit().await, Err(ScreenError::NoDialog)));
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_sent() {
        let mut screen = ManagementScreen::<User>::new(offline_client());
        let dialog = screen.open_create();
        assert!(!dialog.can_submit());

        let err = screen.submit().await.unwrap_err();
        assert!(matches!(err, ScreenError::Validation(ValidationError::Name(_))));
        let dialog = screen.dialog().unwrap();
        assert!(!dialog.is_submitting());
        assert!(dialog.error().is_none());
    }

    #[test]
    fn test_open_edit_unknown_id() {
        let mut screen = ManagementScreen::<Channel>::new(offline_client());
        let err = screen.open_edit(ChannelId::new(42)).unwrap_err();
        assert_eq!(err.to_string(), "No channel with id 42");
        assert!(screen.dialog().is_none());
    }

    #[tokio::test]
    async fn test_cancel_delete_sends_nothing() {
        let mut screen = ManagementScreen::<Channel>::new(offline_client());
        screen.request_delete(ChannelId::new(7));
        screen.cancel_delete();
        assert_eq!(screen.confirm_delete().await.unwrap(), None);
        assert!(screen.delete.error().is_none());
    }

    #[test]
    fn test_toggle_select_only_accepts_shown_rows() {
        let mut screen = ManagementScreen::<Channel>::new(offline_client());
        assert!(!screen.toggle_select(Pane::Available, UserId::new(1)));

        screen.related.finish_load(Ok(vec![User {
            id: UserId::new(1),
            username: "alice".to_owned(),
            active: true,
            role: UserRole::Regular,
            channels: Vec::new(),
        }]));
        screen.open_create();

        assert!(!screen.toggle_select(Pane::Available, UserId::new(99)));
        assert!(!screen.toggle_select(Pane::Allowed, UserId::new(1)));
        assert!(screen.toggle_select(Pane::Available, UserId::new(1)));

        let dialog = screen.dialog_mut().unwrap();
        assert!(dialog.assignment.transfer(Transfer::Right));
        assert_eq!(dialog.assignment.assigned_ids(), vec![UserId::new(1)]);
    }

    #[test]
    fn test_pane_without_dialog_is_empty() {
        let screen = ManagementScreen::<Channel>::new(offline_client());
        assert!(screen.pane(Pane::Available).is_empty());
    }
}
