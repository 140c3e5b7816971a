//! User records and payloads.

use std::borrow::Cow;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use super::entity::Entity;
use super::id::{ChannelId, UserId};
use super::role::UserRole;

/// A managed PTT user as returned by `GET /api/users/`.
///
/// Passwords are never part of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Primary key.
    pub id: UserId,
    /// Login name.
    #[serde(default)]
    pub username: String,
    /// Whether the account may log in.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Permission level.
    #[serde(default)]
    pub role: UserRole,
    /// Channels this user is assigned to.
    #[serde(default)]
    pub channels: Vec<ChannelId>,
}

const fn default_active() -> bool {
    true
}

impl Entity for User {
    type Id = UserId;

    const KIND: &'static str = "user";

    fn id(&self) -> UserId {
        self.id
    }

    fn label(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.username)
    }
}

/// Body of `POST /api/users/` and `PUT /api/users/{id}/`.
///
/// `password` is omitted from the JSON when `None`, which leaves the stored
/// password unchanged on update. `channels` is always the complete set.
#[derive(Clone, Serialize)]
pub struct UserPayload {
    /// Login name.
    pub username: String,
    /// Permission level.
    pub role: UserRole,
    /// Whether the account may log in.
    pub active: bool,
    /// Full replacement set of assigned channels.
    pub channels: Vec<ChannelId>,
    /// New password, if one was entered.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_password"
    )]
    pub password: Option<SecretString>,
}

impl std::fmt::Debug for UserPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPayload")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("active", &self.active)
            .field("channels", &self.channels)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[allow(clippy::ref_option)] // signature fixed by serde's serialize_with
fn serialize_password<S>(password: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match password {
        Some(secret) => serializer.serialize_str(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}
