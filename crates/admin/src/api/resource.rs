//! Collection endpoints for channels and users.
//!
//! Both resources follow the same REST layout:
//!
//! | Action | Method | Path |
//! |---|---|---|
//! | list | GET | `/api/<collection>/` |
//! | create | POST | `/api/<collection>/` |
//! | update | PUT | `/api/<collection>/{id}/` |
//! | delete | DELETE | `/api/<collection>/{id}/` |

use ptt_admin_core::{Channel, ChannelPayload, Entity, User, UserPayload};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::client::ApiClient;
use super::envelope::{decode_rows, normalize_list};
use super::error::ApiError;

/// A record type served by a REST collection.
pub trait Resource: Entity + DeserializeOwned + Send + Sync + 'static {
    /// Body sent on create and update.
    type Payload: Serialize + Send + Sync;

    /// Collection name, used both in the path and as the envelope key.
    const COLLECTION: &'static str;

    /// `/api/<collection>/`
    #[must_use]
    fn collection_path() -> String {
        format!("/api/{}/", Self::COLLECTION)
    }

    /// `/api/<collection>/{id}/`
    #[must_use]
    fn item_path(id: Self::Id) -> String {
        format!("/api/{}/{id}/", Self::COLLECTION)
    }
}

impl Resource for Channel {
    type Payload = ChannelPayload;

    const COLLECTION: &'static str = "channels";
}

impl Resource for User {
    type Payload = UserPayload;

    const COLLECTION: &'static str = "users";
}

/// Fetch every record of a collection.
///
/// The body goes through [`normalize_list`], so envelopes and odd shapes
/// never fail the call; rows that do not decode are skipped.
///
/// # Errors
///
/// Returns `ApiError` if the request itself fails.
#[instrument(skip(client), fields(collection = R::COLLECTION))]
pub async fn list<R: Resource>(client: &ApiClient) -> Result<Vec<R>, ApiError> {
    let body = client.get(&R::collection_path()).await?;
    let (shape, rows) = normalize_list(body, R::COLLECTION);
    let items = decode_rows::<R>(rows);
    debug!(count = items.len(), shape = ?shape, "Fetched collection");
    Ok(items)
}

/// Create a record.
///
/// Returns the created record when the server echoes it back.
///
/// # Errors
///
/// Returns `ApiError` if the request fails.
#[instrument(skip(client, payload), fields(collection = R::COLLECTION))]
pub async fn create<R: Resource>(
    client: &ApiClient,
    payload: &R::Payload,
) -> Result<Option<R>, ApiError> {
    let body = client.post(&R::collection_path(), Some(payload)).await?;
    Ok(echoed(body))
}

/// Replace a record.
///
/// # Errors
///
/// Returns `ApiError` if the request fails.
#[instrument(skip(client, payload), fields(collection = R::COLLECTION, id = %id))]
pub async fn update<R: Resource>(
    client: &ApiClient,
    id: R::Id,
    payload: &R::Payload,
) -> Result<Option<R>, ApiError> {
    let body = client.put(&R::item_path(id), payload).await?;
    Ok(echoed(body))
}

/// Delete a record.
///
/// # Errors
///
/// Returns `ApiError` if the request fails.
#[instrument(skip(client), fields(collection = R::COLLECTION, id = %id))]
pub async fn delete<R: Resource>(client: &ApiClient, id: R::Id) -> Result<(), ApiError> {
    client.delete(&R::item_path(id)).await?;
    Ok(())
}

/// The record in a create/update response, if the body is one.
fn echoed<R: Resource>(body: Option<serde_json::Value>) -> Option<R> {
    body.and_then(|value| serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use ptt_admin_core::{ChannelId, UserId};

    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Channel::collection_path(), "/api/channels/");
        assert_eq!(Channel::item_path(ChannelId::new(7)), "/api/channels/7/");
        assert_eq!(User::collection_path(), "/api/users/");
        assert_eq!(User::item_path(UserId::new(12)), "/api/users/12/");
    }

    #[test]
    fn test_echoed_ignores_non_records() {
        assert!(echoed::<Channel>(None).is_none());
        assert!(echoed::<Channel>(Some(serde_json::json!({"status": "ok"}))).is_none());
        let channel = echoed::<Channel>(Some(serde_json::json!({"id": 4, "name": "ops"})));
        assert_eq!(channel.map(|c| c.id), Some(ChannelId::new(4)));
    }
}
