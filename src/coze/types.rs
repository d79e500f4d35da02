//! Wire types for the Coze v3 chat API.
//!
//! Every response is wrapped in an [`Envelope`] carrying a numeric `code`
//! (0 on success), a `msg` and the payload under `data`.

use serde::{Deserialize, Serialize};

use crate::job::JobStatus;

/// Body of `POST /v3/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCreateRequest {
    pub bot_id: String,
    pub user_id: String,
    pub stream: bool,
    pub auto_save_history: bool,
    pub additional_messages: Vec<ChatMessage>,
}

/// A single message sent to the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    pub content_type: String,
}

impl ChatMessage {
    pub fn user_text(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
            content_type: "text".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

/// Chat object returned by create and retrieve.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatDetail {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub last_error: Option<LastError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}

/// The message list endpoint has been seen returning both a bare array and
/// an object wrapping it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageListData {
    Flat(Vec<BotMessage>),
    Wrapped { messages: Vec<BotMessage> },
}

impl MessageListData {
    pub fn into_messages(self) -> Vec<BotMessage> {
        match self {
            MessageListData::Flat(messages) | MessageListData::Wrapped { messages } => messages,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default, rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub content: String,
}

/// Map the remote `status` field onto [`JobStatus`].
pub fn classify_status(status: &str) -> JobStatus {
    match status {
        "created" | "in_progress" => JobStatus::Pending,
        "completed" => JobStatus::Completed,
        "failed" => JobStatus::Failed,
        other => JobStatus::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_documented_statuses() {
        assert_eq!(classify_status("created"), JobStatus::Pending);
        assert_eq!(classify_status("in_progress"), JobStatus::Pending);
        assert_eq!(classify_status("completed"), JobStatus::Completed);
        assert_eq!(classify_status("failed"), JobStatus::Failed);
    }

    #[test]
    fn classify_keeps_unknown_statuses_distinct() {
        assert_eq!(
            classify_status("canceled"),
            JobStatus::Unknown("canceled".into())
        );
        assert_eq!(
            classify_status("requires_action"),
            JobStatus::Unknown("requires_action".into())
        );
    }

    #[test]
    fn create_request_serializes_in_api_format() {
        let req = ChatCreateRequest {
            bot_id: "bot-1".into(),
            user_id: "web-user-1".into(),
            stream: false,
            auto_save_history: true,
            additional_messages: vec![ChatMessage::user_text("hi")],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["additional_messages"][0]["role"], "user");
        assert_eq!(json["additional_messages"][0]["content_type"], "text");
    }

    #[test]
    fn envelope_with_chat_detail() {
        let json = r#"{
            "code": 0,
            "msg": "",
            "data": {"id": "c1", "conversation_id": "v1", "status": "in_progress"}
        }"#;
        let env: Envelope<ChatDetail> = serde_json::from_str(json).unwrap();
        let data = env.data.unwrap();
        assert_eq!(data.id, "c1");
        assert_eq!(data.conversation_id, "v1");
        assert!(data.last_error.is_none());
    }

    #[test]
    fn message_list_accepts_both_shapes() {
        let flat = r#"{"code":0,"data":[{"role":"assistant","type":"answer","content":"a"}]}"#;
        let wrapped = r#"{"code":0,"data":{"messages":[{"role":"assistant","content":"b"}]}}"#;

        let flat: Envelope<MessageListData> = serde_json::from_str(flat).unwrap();
        let wrapped: Envelope<MessageListData> = serde_json::from_str(wrapped).unwrap();

        let flat = flat.data.unwrap().into_messages();
        assert_eq!(flat[0].content, "a");
        assert_eq!(flat[0].message_type, "answer");
        assert_eq!(wrapped.data.unwrap().into_messages()[0].content, "b");
    }
}
