use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::debug;

use super::types::{
    ChatCreateRequest, ChatDetail, ChatMessage, Envelope, MessageListData, classify_status,
};
use crate::config::CozeConfig;
use crate::job::{JobError, JobHandle, JobTransport, StatusReport};

/// HTTP client for the Coze bot chat API, used as an asynchronous job service.
pub struct CozeClient {
    config: CozeConfig,
    client: Client,
}

impl CozeClient {
    pub fn new(config: CozeConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url.trim_end_matches('/'))
    }

    fn handle_query(handle: &JobHandle) -> [(&'static str, &str); 2] {
        [
            ("chat_id", handle.id.as_str()),
            ("conversation_id", handle.conversation_id.as_str()),
        ]
    }
}

impl JobTransport for CozeClient {
    async fn submit(&self, task: &str) -> Result<JobHandle, JobError> {
        let (api_key, bot_id) = self.config.credentials()?;

        let body = ChatCreateRequest {
            bot_id: bot_id.to_string(),
            user_id: format!("web-user-{}", Utc::now().timestamp_millis()),
            stream: false,
            auto_save_history: true,
            additional_messages: vec![ChatMessage::user_text(task)],
        };

        let response = self
            .client
            .post(self.url("/v3/chat"))
            .bearer_auth(api_key)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| JobError::SubmissionFailed {
                status: None,
                body: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(JobError::SubmissionFailed {
                status: Some(status.as_u16()),
                body,
            });
        }

        let envelope: Envelope<ChatDetail> = response
            .json()
            .await
            .map_err(|e| JobError::MalformedSubmissionResponse(e.to_string()))?;

        if envelope.code != 0 {
            return Err(JobError::SubmissionFailed {
                status: Some(status.as_u16()),
                body: format!("code {}: {}", envelope.code, envelope.msg),
            });
        }

        match envelope.data {
            Some(chat) if !chat.id.is_empty() => Ok(JobHandle {
                id: chat.id,
                conversation_id: chat.conversation_id,
            }),
            _ => Err(JobError::MalformedSubmissionResponse(
                "response has no data.id".to_string(),
            )),
        }
    }

    async fn fetch_status(&self, handle: &JobHandle) -> Result<StatusReport, JobError> {
        let (api_key, _) = self.config.credentials()?;

        let response = self
            .client
            .get(self.url("/v3/chat/retrieve"))
            .query(&Self::handle_query(handle))
            .bearer_auth(api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| JobError::NetworkTransient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JobError::NetworkTransient(format!(
                "HTTP {}: {body}",
                status.as_u16()
            )));
        }

        let envelope: Envelope<ChatDetail> = response
            .json()
            .await
            .map_err(|e| JobError::NetworkTransient(e.to_string()))?;

        if envelope.code != 0 {
            return Err(JobError::NetworkTransient(format!(
                "code {}: {}",
                envelope.code, envelope.msg
            )));
        }

        let chat = envelope
            .data
            .ok_or_else(|| JobError::NetworkTransient("status response has no data".into()))?;

        Ok(StatusReport {
            status: classify_status(&chat.status),
            detail: chat
                .last_error
                .filter(|e| !e.msg.is_empty())
                .map(|e| format!("{}: {}", e.code, e.msg)),
        })
    }

    async fn fetch_messages(&self, handle: &JobHandle) -> Result<Vec<String>, JobError> {
        let (api_key, _) = self.config.credentials()?;

        let response = self
            .client
            .get(self.url("/v3/chat/message/list"))
            .query(&Self::handle_query(handle))
            .bearer_auth(api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| JobError::ExtractionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JobError::ExtractionFailed(format!(
                "HTTP {}: {body}",
                status.as_u16()
            )));
        }

        let envelope: Envelope<MessageListData> = response
            .json()
            .await
            .map_err(|e| JobError::ExtractionFailed(e.to_string()))?;

        if envelope.code != 0 {
            return Err(JobError::ExtractionFailed(format!(
                "code {}: {}",
                envelope.code, envelope.msg
            )));
        }

        Ok(envelope
            .data
            .map(MessageListData::into_messages)
            .unwrap_or_default()
            .into_iter()
            .inspect(|m| debug!(role = %m.role, kind = %m.message_type, "job message received"))
            .map(|m| m.content)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobStatus;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> CozeClient {
        CozeClient::new(CozeConfig {
            api_key: "pat_test".into(),
            bot_id: "bot-42".into(),
            api_url: server.uri(),
        })
        .unwrap()
    }

    fn handle() -> JobHandle {
        JobHandle {
            id: "chat-1".into(),
            conversation_id: "conv-1".into(),
        }
    }

    #[tokio::test]
    async fn submit_returns_handle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/chat"))
            .and(bearer_token("pat_test"))
            .and(body_partial_json(json!({"bot_id": "bot-42", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "msg": "",
                "data": {"id": "chat-1", "conversation_id": "conv-1", "status": "created"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let handle = client_for(&server).submit("search").await.unwrap();
        assert_eq!(handle.id, "chat-1");
        assert_eq!(handle.conversation_id, "conv-1");
    }

    #[tokio::test]
    async fn submit_http_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/chat"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let err = client_for(&server).submit("search").await.unwrap_err();
        match err {
            JobError::SubmissionFailed { status, body } => {
                assert_eq!(status, Some(401));
                assert_eq!(body, "bad token");
            }
            other => panic!("expected SubmissionFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn submit_without_id_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0, "data": {}})))
            .mount(&server)
            .await;

        let err = client_for(&server).submit("search").await.unwrap_err();
        assert!(matches!(err, JobError::MalformedSubmissionResponse(_)));
    }

    #[tokio::test]
    async fn submit_non_zero_code_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"code": 4100, "msg": "token expired"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).submit("search").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "job submission failed (status 200): code 4100: token expired"
        );
    }

    #[tokio::test]
    async fn submit_without_credentials_never_hits_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = CozeClient::new(CozeConfig {
            api_key: "your_coze_api_key".into(),
            bot_id: String::new(),
            api_url: server.uri(),
        })
        .unwrap();

        let err = client.submit("search").await.unwrap_err();
        assert!(matches!(err, JobError::Configuration(_)));
    }

    #[tokio::test]
    async fn fetch_status_classifies_remote_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/chat/retrieve"))
            .and(query_param("chat_id", "chat-1"))
            .and(query_param("conversation_id", "conv-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": {"id": "chat-1", "conversation_id": "conv-1", "status": "completed"}
            })))
            .mount(&server)
            .await;

        let report = client_for(&server).fetch_status(&handle()).await.unwrap();
        assert_eq!(report.status, JobStatus::Completed);
        assert_eq!(report.detail, None);
    }

    #[tokio::test]
    async fn fetch_status_reports_failure_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/chat/retrieve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": {
                    "id": "chat-1",
                    "status": "failed",
                    "last_error": {"code": 5000, "msg": "plugin timeout"}
                }
            })))
            .mount(&server)
            .await;

        let report = client_for(&server).fetch_status(&handle()).await.unwrap();
        assert_eq!(report.status, JobStatus::Failed);
        assert_eq!(report.detail.as_deref(), Some("5000: plugin timeout"));
    }

    #[tokio::test]
    async fn fetch_status_http_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/chat/retrieve"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_status(&handle()).await.unwrap_err();
        assert!(matches!(err, JobError::NetworkTransient(_)));
    }

    #[tokio::test]
    async fn fetch_messages_returns_contents_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/chat/message/list"))
            .and(query_param("conversation_id", "conv-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": [
                    {"role": "assistant", "type": "verbose", "content": "thinking"},
                    {"role": "assistant", "type": "answer", "content": "玉林路小酒馆"}
                ]
            })))
            .mount(&server)
            .await;

        let messages = client_for(&server).fetch_messages(&handle()).await.unwrap();
        assert_eq!(messages, vec!["thinking", "玉林路小酒馆"]);
    }

    #[tokio::test]
    async fn fetch_messages_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/chat/message/list"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_messages(&handle()).await.unwrap_err();
        assert!(matches!(err, JobError::ExtractionFailed(_)));
    }
}
