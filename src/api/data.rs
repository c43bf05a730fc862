use std::fmt;

use serde::{Deserialize, Deserializer};

/// Server-assigned notification id.
///
/// The API has served both integer and string ids, so either JSON form is
/// accepted and kept verbatim for display.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn new(id: impl ToString) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NotificationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(id) => Self(id.to_string()),
            Raw::Str(id) => Self(id),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub chat_id: i64,
    pub message: String,
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub time: String,
}

/// Body of a creation request. `time` is `""` when the notification should
/// go out immediately.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Draft {
    pub chat_id: i64,
    pub message: String,
    pub time: String,
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct CreateResponse {
    #[serde(default)]
    pub id: Option<NotificationId>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body returned by the status and cancel endpoints.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accepts_integer_and_string_ids() {
        let records: Vec<NotificationRecord> = serde_json::from_str(
            r#"[
                {"id": 7, "chat_id": 42, "message": "hi", "status": "pending", "time": ""},
                {"id": "b3c1", "chat_id": -100, "message": "yo", "status": "sent"}
            ]"#,
        )
        .unwrap();

        assert_eq!(records[0].id.as_str(), "7");
        assert_eq!(records[1].id.as_str(), "b3c1");
        assert_eq!(records[1].chat_id, -100);
        assert_eq!(records[1].time, "");
    }

    #[test]
    fn null_time_is_empty() {
        let record: NotificationRecord = serde_json::from_str(
            r#"{"id": 1, "chat_id": 1, "message": "", "status": "sent", "time": null}"#,
        )
        .unwrap();
        assert!(record.time.is_empty());
    }

    #[test]
    fn draft_serializes_to_wire_shape() {
        let draft = Draft {
            chat_id: 42,
            message: "hello".into(),
            time: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({"chat_id": 42, "message": "hello", "time": ""})
        );
    }

    #[test]
    fn create_response_tolerates_missing_fields() {
        let ok: CreateResponse = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(ok.id, Some(NotificationId::new(7)));
        assert!(ok.error.is_none());

        let err: CreateResponse = serde_json::from_str(r#"{"error": "bad chat id"}"#).unwrap();
        assert!(err.id.is_none());
        assert_eq!(err.error.as_deref(), Some("bad chat id"));
    }
}
