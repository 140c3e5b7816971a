//! Channel records and payloads.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};

use super::entity::Entity;
use super::id::{ChannelId, UserId};

/// A PTT channel as returned by `GET /api/channels/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Primary key.
    pub id: ChannelId,
    /// Display name. May be blank in legacy rows.
    #[serde(default)]
    pub name: String,
    /// External channel code assigned by the server on create.
    #[serde(default, deserialize_with = "lenient_code")]
    pub channel_id: Option<String>,
    /// Users allowed on this channel.
    #[serde(default)]
    pub authorized_users: Vec<UserId>,
}

impl Entity for Channel {
    type Id = ChannelId;

    const KIND: &'static str = "channel";

    fn id(&self) -> ChannelId {
        self.id
    }

    fn label(&self) -> Cow<'_, str> {
        if self.name.trim().is_empty() {
            Cow::Owned(format!("Channel {}", self.id))
        } else {
            Cow::Borrowed(&self.name)
        }
    }
}

/// Body of `POST /api/channels/` and `PUT /api/channels/{id}/`.
///
/// `authorized_users` is always the complete set; the server replaces the
/// relation with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelPayload {
    /// Channel name.
    pub name: String,
    /// Full replacement set of authorized users.
    pub authorized_users: Vec<UserId>,
}

/// Accepts the channel code as a JSON number, string or null.
fn lenient_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_channel_deserializes_backend_shape() {
        let channel: Channel = serde_json::from_value(json!({
            "id": 7,
            "name": "ops",
            "channel_id": 4_518_220,
            "authorized_users": [1, 2]
        }))
        .unwrap();

        assert_eq!(channel.id, ChannelId::new(7));
        assert_eq!(channel.channel_id.as_deref(), Some("4518220"));
        assert_eq!(channel.authorized_users, vec![UserId::new(1), UserId::new(2)]);
    }

    #[test]
    fn test_channel_defaults_missing_fields() {
        let channel: Channel = serde_json::from_value(json!({"id": 3})).unwrap();
        assert!(channel.authorized_users.is_empty());
        assert_eq!(channel.channel_id, None);
        assert_eq!(channel.label(), "Channel 3");
    }

    #[test]
    fn test_payload_shape() {
        let payload = ChannelPayload {
            name: "ops".to_owned(),
            authorized_users: vec![UserId::new(1), UserId::new(2), UserId::new(3)],
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"name": "ops", "authorized_users": [1, 2, 3]})
        );
    }
}
