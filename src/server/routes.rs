use std::future::Future;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::error::AppError;
use crate::service::PlanService;

/// Body of both POST endpoints. `tags` is optional here so a missing field
/// reaches validation instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct TagsRequest {
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": message.into(),
            "code": code,
        })),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "request failed");
        } else {
            debug!(code = self.code(), error = %self, "request rejected");
        }
        json_error(status, self.code(), self.user_message())
    }
}

fn requested_tags(
    payload: Result<Json<TagsRequest>, JsonRejection>,
) -> Result<Vec<String>, Response> {
    match payload {
        Ok(Json(body)) => Ok(body.tags.unwrap_or_default()),
        Err(rejection) => {
            debug!(%rejection, "unreadable request body");
            Err(json_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", "请求格式错误"))
        }
    }
}

/// Run `job` on its own task. If the client goes away and this handler is
/// dropped, the guard cancels the token and the task winds down.
async fn run_detached<T, Fut>(
    job: impl FnOnce(CancellationToken) -> Fut,
    render: impl FnOnce(T) -> Response,
) -> Response
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, AppError>> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    match tokio::spawn(job(cancel)).await {
        Ok(Ok(value)) => render(value),
        Ok(Err(e)) => e.into_response(),
        Err(e) => {
            error!(error = %e, "request task aborted");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "服务器内部错误",
            )
        }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn generate_plans(
    State(service): State<Arc<PlanService>>,
    payload: Result<Json<TagsRequest>, JsonRejection>,
) -> Response {
    let tags = match requested_tags(payload) {
        Ok(tags) => tags,
        Err(response) => return response,
    };

    run_detached(
        |cancel| async move { service.generate_plans(tags, &cancel).await },
        |plans| Json(json!({ "plans": plans })).into_response(),
    )
    .await
}

pub async fn search(
    State(service): State<Arc<PlanService>>,
    payload: Result<Json<TagsRequest>, JsonRejection>,
) -> Response {
    let tags = match requested_tags(payload) {
        Ok(tags) => tags,
        Err(response) => return response,
    };

    run_detached(
        |cancel| async move { service.search(tags, &cancel).await },
        |outcome| Json(json!({ "success": true, "data": outcome })).into_response(),
    )
    .await
}
