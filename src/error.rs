use axum::http::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;
use crate::job::JobError;
use crate::plan::NormalizeError;
use crate::siliconflow::ProviderError;

/// Every way a plan-generation or search request can fail.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("search job error: {0}")]
    Job(#[from] JobError),

    #[error("generation provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("response normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("request cancelled")]
    Cancelled,
}

impl AppError {
    /// Configuration problems nested inside a job error surface the same way
    /// as top-level ones.
    fn config(&self) -> Option<&ConfigError> {
        match self {
            AppError::Config(e) | AppError::Job(JobError::Configuration(e)) => Some(e),
            _ => None,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::Job(JobError::EmptyTask) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Cancelled | AppError::Job(JobError::Cancelled) => StatusCode::REQUEST_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        if let Some(e) = self.config() {
            return match e {
                ConfigError::MissingCredentials { .. } => "CONFIGURATION_REQUIRED",
                ConfigError::Io(_) | ConfigError::Parse(_) => "CONFIGURATION_INVALID",
            };
        }
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Cancelled => "CANCELLED",
            AppError::Job(e) => match e {
                JobError::EmptyTask => "INVALID_INPUT",
                JobError::SubmissionFailed { .. } | JobError::MalformedSubmissionResponse(_) => {
                    "SUBMISSION_FAILED"
                }
                JobError::JobFailed { .. } => "JOB_FAILED",
                JobError::JobTimedOut { .. } => "JOB_TIMED_OUT",
                JobError::EmptyResult => "EMPTY_RESULT",
                JobError::ExtractionFailed(_) | JobError::NetworkTransient(_) => "UPSTREAM_FAILED",
                JobError::Cancelled => "CANCELLED",
                JobError::Configuration(_) => "CONFIGURATION_REQUIRED",
            },
            AppError::Provider(ProviderError::EmptyCompletion) => "EMPTY_RESULT",
            AppError::Provider(_) => "UPSTREAM_FAILED",
            AppError::Normalize(NormalizeError::Unparsable(_)) => "UNPARSABLE_RESULT",
            AppError::Normalize(NormalizeError::NoPlans) => "EMPTY_RESULT",
            AppError::Config(_) => "CONFIGURATION_REQUIRED",
        }
    }

    /// Message shown to end users. Internal detail stays in the logs.
    pub fn user_message(&self) -> String {
        if let Some(ConfigError::MissingCredentials { keys }) = self.config() {
            return if keys.iter().all(|k| k.starts_with("COZE_")) {
                "Coze API配置不完整".to_string()
            } else {
                "API密钥未配置".to_string()
            };
        }
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Config(_) => "配置文件无效".to_string(),
            AppError::Cancelled | AppError::Job(JobError::Cancelled) => "请求已取消".to_string(),
            AppError::Job(JobError::JobTimedOut { .. }) => "小红书搜索超时，请重试".to_string(),
            AppError::Job(JobError::EmptyResult) => "未获取到有效的搜索结果".to_string(),
            AppError::Job(JobError::SubmissionFailed { .. }) => {
                "小红书搜索服务调用失败".to_string()
            }
            AppError::Job(_) => "小红书搜索服务响应异常".to_string(),
            AppError::Provider(ProviderError::EmptyCompletion) => "AI响应格式错误".to_string(),
            AppError::Provider(_) => "AI服务调用失败".to_string(),
            AppError::Normalize(NormalizeError::Unparsable(_)) => "AI响应解析失败".to_string(),
            AppError::Normalize(NormalizeError::NoPlans) => "AI响应中未找到有效方案".to_string(),
        }
    }
}
