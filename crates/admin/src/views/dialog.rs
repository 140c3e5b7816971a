//! Create/edit form dialog.
//!
//! A [`FormDialog`] holds one transient draft of a record plus its
//! assignment editor. The draft is never partially saved: it becomes a
//! payload on submit and is dropped when the dialog closes.

use std::fmt;

use ptt_admin_core::{
    Channel, ChannelId, ChannelPayload, Entity, NameError, RequiredName, User, UserId,
    UserPayload, UserRole,
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use super::assignment::AssignmentEditor;

/// Reasons a draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The channel name or username is blank.
    #[error(transparent)]
    Name(#[from] NameError),

    /// A new user was drafted without a password.
    #[error("password is required for a new user")]
    PasswordRequired,
}

/// Whether a dialog creates a new record or edits an existing one.
///
/// Fixed for the lifetime of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode<Id> {
    /// Blank form; submit creates a record.
    Create,
    /// Form seeded from the record with this id; submit replaces it.
    Edit(Id),
}

/// Scalar fields of a record being edited.
pub trait Draft: Clone + Default + fmt::Debug {
    /// The record this draft edits.
    type Record: Entity;
    /// Id type of the related records in the assignment editor.
    type RelatedId: Ord + Copy + fmt::Debug;
    /// Body sent to the API.
    type Payload;

    /// Seed a draft from an existing record.
    fn from_record(record: &Self::Record) -> Self;

    /// The record's current relation, used to seed the assignment editor.
    fn assigned(record: &Self::Record) -> Vec<Self::RelatedId>;

    /// Check the draft and build the payload with the full assignment set.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a required field is empty.
    fn to_payload(
        &self,
        creating: bool,
        related: Vec<Self::RelatedId>,
    ) -> Result<Self::Payload, ValidationError>;
}

/// Draft of a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelDraft {
    pub name: String,
}

impl Draft for ChannelDraft {
    type Record = Channel;
    type RelatedId = UserId;
    type Payload = ChannelPayload;

    fn from_record(record: &Channel) -> Self {
        Self {
            name: record.name.clone(),
        }
    }

    fn assigned(record: &Channel) -> Vec<UserId> {
        record.authorized_users.clone()
    }

    fn to_payload(
        &self,
        _creating: bool,
        related: Vec<UserId>,
    ) -> Result<ChannelPayload, ValidationError> {
        Ok(ChannelPayload {
            name: RequiredName::parse(&self.name)?.into_inner(),
            authorized_users: related,
        })
    }
}

/// Draft of a user.
///
/// The password always starts empty; an empty password on edit leaves the
/// stored one unchanged.
#[derive(Clone)]
pub struct UserDraft {
    pub username: String,
    pub password: SecretString,
    pub role: UserRole,
    pub active: bool,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: SecretString::from(""),
            role: UserRole::default(),
            active: true,
        }
    }
}

impl fmt::Debug for UserDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDraft")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("active", &self.active)
            .finish()
    }
}

impl UserDraft {
    fn has_password(&self) -> bool {
        !self.password.expose_secret().is_empty()
    }
}

impl Draft for UserDraft {
    type Record = User;
    type RelatedId = ChannelId;
    type Payload = UserPayload;

    fn from_record(record: &User) -> Self {
        Self {
            username: record.username.clone(),
            role: record.role.clone(),
            active: record.active,
            ..Self::default()
        }
    }

    fn assigned(record: &User) -> Vec<ChannelId> {
        record.channels.clone()
    }

    fn to_payload(
        &self,
        creating: bool,
        related: Vec<ChannelId>,
    ) -> Result<UserPayload, ValidationError> {
        let username = RequiredName::parse(&self.username)?.into_inner();
        if creating && !self.has_password() {
            return Err(ValidationError::PasswordRequired);
        }
        Ok(UserPayload {
            username,
            role: self.role.clone(),
            active: self.active,
            channels: related,
            password: self.has_password().then(|| self.password.clone()),
        })
    }
}

/// An open create/edit dialog.
#[derive(Debug, Clone)]
pub struct FormDialog<D: Draft> {
    mode: FormMode<<D::Record as Entity>::Id>,
    /// Scalar fields.
    pub draft: D,
    /// Relation being edited.
    pub assignment: AssignmentEditor<D::RelatedId>,
    error: Option<String>,
    submitting: bool,
}

impl<D: Draft> FormDialog<D> {
    /// A blank dialog for a new record.
    #[must_use]
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            draft: D::default(),
            assignment: AssignmentEditor::default(),
            error: None,
            submitting: false,
        }
    }

    /// A dialog seeded from `record`.
    #[must_use]
    pub fn edit(record: &D::Record) -> Self {
        Self {
            mode: FormMode::Edit(record.id()),
            draft: D::from_record(record),
            assignment: AssignmentEditor::new(D::assigned(record)),
            error: None,
            submitting: false,
        }
    }

    /// Create or edit, as chosen when the dialog opened.
    #[must_use]
    pub const fn mode(&self) -> FormMode<<D::Record as Entity>::Id> {
        self.mode
    }

    /// Whether submitting creates a new record.
    #[must_use]
    pub const fn is_create(&self) -> bool {
        matches!(self.mode, FormMode::Create)
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.payload().is_ok()
    }

    /// Build the payload from the draft and the full assignment set.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a required field is empty.
    pub fn payload(&self) -> Result<D::Payload, ValidationError> {
        self.draft
            .to_payload(self.is_create(), self.assignment.assigned_ids())
    }

    /// Inline error from the last failed submit.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a submit is in flight.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Mark a submit as started.
    pub fn begin_submit(&mut self) {
        self.submitting = true;
        self.error = None;
    }

    /// Record a failed submit; the draft is kept for a retry.
    pub fn fail_submit(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.error = Some(message.into());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::views::{Pane, Transfer};

    fn ops_channel() -> Channel {
        Channel {
            id: ChannelId::new(7),
            name: "ops".to_owned(),
            channel_id: Some("4518220".to_owned()),
            authorized_users: vec![UserId::new(2), UserId::new(1)],
        }
    }

    fn alice() -> User {
        User {
            id: UserId::new(3),
            username: "alice".to_owned(),
            active: false,
            role: UserRole::Senior,
            channels: vec![ChannelId::new(7)],
        }
    }

    #[test]
    fn test_create_user_requires_username() {
        let mut dialog = FormDialog::<UserDraft>::create();
        dialog.draft.password = SecretString::from("hunter22");
        assert!(!dialog.can_submit());
        assert_eq!(
            dialog.payload().unwrap_err(),
            ValidationError::Name(NameError::Empty)
        );

        dialog.draft.username = "   ".to_owned();
        assert!(!dialog.can_submit());

        dialog.draft.username = "bob".to_owned();
        assert!(dialog.can_submit());
    }

    #[test]
    fn test_create_user_requires_password() {
        let mut dialog = FormDialog::<UserDraft>::create();
        dialog.draft.username = "bob".to_owned();
        assert_eq!(dialog.payload().unwrap_err(), ValidationError::PasswordRequired);
    }

    #[test]
    fn test_edit_user_seeds_fields_but_not_password() {
        let dialog = FormDialog::<UserDraft>::edit(&alice());
        assert_eq!(dialog.mode(), FormMode::Edit(UserId::new(3)));
        assert_eq!(dialog.draft.username, "alice");
        assert_eq!(dialog.draft.role, UserRole::Senior);
        assert!(!dialog.draft.active);
        assert!(dialog.draft.password.expose_secret().is_empty());
        assert_eq!(dialog.assignment.assigned_ids(), vec![ChannelId::new(7)]);
        assert!(dialog.can_submit());
    }

    #[test]
    fn test_edit_user_without_password_omits_it() {
        let dialog = FormDialog::<UserDraft>::edit(&alice());
        let value = serde_json::to_value(dialog.payload().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"username": "alice", "role": "senior", "active": false, "channels": [7]})
        );
    }

    #[test]
    fn test_channel_payload_is_full_replacement() {
        let mut dialog = FormDialog::<ChannelDraft>::edit(&ops_channel());
        dialog
            .assignment
            .toggle_select(Pane::Available, UserId::new(3), &[alice()]);
        dialog.assignment.transfer(Transfer::Right);

        let value = serde_json::to_value(dialog.payload().unwrap()).unwrap();
        assert_eq!(value, json!({"name": "ops", "authorized_users": [1, 2, 3]}));
    }

    #[test]
    fn test_channel_name_is_trimmed() {
        let mut dialog = FormDialog::<ChannelDraft>::create();
        dialog.draft.name = "  sales ".to_owned();
        assert_eq!(dialog.payload().unwrap().name, "sales");
    }

    #[test]
    fn test_failed_submit_keeps_draft() {
        let mut dialog = FormDialog::<ChannelDraft>::create();
        dialog.draft.name = "ops".to_owned();
        dialog.begin_submit();
        assert!(dialog.is_submitting());

        dialog.fail_submit("name already exists");
        assert!(!dialog.is_submitting());
        assert_eq!(dialog.error(), Some("name already exists"));
        assert_eq!(dialog.draft.name, "ops");

        dialog.begin_submit();
        assert!(dialog.error().is_none());
    }

    #[test]
    fn test_user_draft_debug_redacts_password() {
        let draft = UserDraft {
            password: SecretString::from("hunter22"),
            ..UserDraft::default()
        };
        let debug_output = format!("{draft:?}");
        assert!(!debug_output.contains("hunter22"));
    }
}
