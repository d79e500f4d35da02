//! The plan-generation pipeline: validate, search, complete, normalize, illustrate.
//!
//! The free functions are generic over the collaborator traits so the whole
//! pipeline can run against in-memory fakes. [`PlanService`] binds them to the
//! real HTTP clients.

use chrono::{Duration as ChronoDuration, Utc};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::coze::{CozeClient, SearchOutcome, search_notes};
use crate::error::AppError;
use crate::job::{JobError, JobTransport, PollSettings};
use crate::plan::prompt::{SYSTEM_PROMPT, user_prompt};
use crate::plan::{NormalizedPlan, image_prompt, normalize_plans};
use crate::siliconflow::{
    ChatCompleter, ChatCompletionRequest, ImageGenerationRequest, ImageGenerator, ProviderError,
    SiliconFlowClient,
};

const NO_TAGS_MESSAGE: &str = "请提供至少一个标签";

/// Generated image URLs stop resolving after this long.
const IMAGE_URL_LIFETIME_HOURS: i64 = 1;

/// Trim the requested tags and drop blank ones. At least one must remain.
pub fn validate_tags(tags: Vec<String>) -> Result<Vec<String>, AppError> {
    let tags: Vec<String> = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if tags.is_empty() {
        return Err(AppError::InvalidInput(NO_TAGS_MESSAGE.to_string()));
    }
    Ok(tags)
}

/// Produce date plans for `tags`.
///
/// The note search is optional: when it is not configured or fails, plans are
/// generated from the tags alone. Every other failure aborts the request.
pub async fn generate_plans(
    config: &AppConfig,
    search: &impl JobTransport,
    provider: &(impl ChatCompleter + ImageGenerator),
    tags: Vec<String>,
    cancel: &CancellationToken,
) -> Result<Vec<NormalizedPlan>, AppError> {
    let tags = validate_tags(tags)?;
    config.siliconflow.credentials()?;

    let search_text = gather_search(config, search, &tags, cancel).await?;

    let request = ChatCompletionRequest::new(
        config.siliconflow.chat_model.as_str(),
        SYSTEM_PROMPT,
        user_prompt(&tags, search_text.as_deref()),
    );
    debug!(model = %request.model, tags = ?tags, "requesting plan completion");

    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(AppError::Cancelled),
        response = provider.complete(&request) => response?,
    };
    let content = response
        .first_content()
        .ok_or(ProviderError::EmptyCompletion)?;

    let mut plans = normalize_plans(content, &tags, &config.imagery)?;
    info!(count = plans.len(), "plans normalized");

    tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(AppError::Cancelled),
        _ = illustrate(provider, &config.siliconflow.image_model, &mut plans, &tags) => {}
    }

    Ok(plans)
}

/// Run the note search and return its text, or `None` when it is skipped or fails.
async fn gather_search(
    config: &AppConfig,
    search: &impl JobTransport,
    tags: &[String],
    cancel: &CancellationToken,
) -> Result<Option<String>, AppError> {
    if let Err(e) = config.coze.credentials() {
        info!(reason = %e, "note search not configured, generating from tags only");
        return Ok(None);
    }

    match search_notes(search, tags, &PollSettings::from(&config.poll), cancel).await {
        Ok(outcome) => {
            info!(keywords = %outcome.keywords, "note search completed");
            Ok(Some(outcome.search_results))
        }
        Err(JobError::Cancelled) => Err(AppError::Cancelled),
        Err(e) => {
            warn!(error = %e, "note search failed, generating from tags only");
            Ok(None)
        }
    }
}

/// Replace each plan's catalog image with a generated one, concurrently.
///
/// A failed generation leaves that plan's catalog asset in place.
async fn illustrate(
    provider: &impl ImageGenerator,
    model: &str,
    plans: &mut [NormalizedPlan],
    tags: &[String],
) {
    let requests: Vec<ImageGenerationRequest> = plans
        .iter()
        .map(|plan| ImageGenerationRequest::new(model, image_prompt(&plan.title, tags)))
        .collect();

    let results = join_all(requests.iter().map(|req| provider.generate_image(req))).await;
    let expires_at = Utc::now() + ChronoDuration::hours(IMAGE_URL_LIFETIME_HOURS);

    for (plan, result) in plans.iter_mut().zip(results) {
        match result {
            Ok(response) => match response.first_url() {
                Some(url) => {
                    plan.image = url.to_string();
                    plan.image_expires_at = Some(expires_at);
                }
                None => debug!(plan = plan.id, "image response had no url"),
            },
            Err(e) => {
                warn!(plan = plan.id, error = %e, "image generation failed, keeping catalog asset")
            }
        }
    }
}

/// Run only the note search for `tags`. Unlike plan generation, failure here is reported.
pub async fn search(
    config: &AppConfig,
    search: &impl JobTransport,
    tags: Vec<String>,
    cancel: &CancellationToken,
) -> Result<SearchOutcome, AppError> {
    let tags = validate_tags(tags)?;
    config.coze.credentials()?;
    Ok(search_notes(search, &tags, &PollSettings::from(&config.poll), cancel).await?)
}

/// The pipeline bound to the real Coze and SiliconFlow clients.
pub struct PlanService {
    config: AppConfig,
    coze: CozeClient,
    siliconflow: SiliconFlowClient,
}

impl PlanService {
    pub fn new(config: AppConfig) -> reqwest::Result<Self> {
        let coze = CozeClient::new(config.coze.clone())?;
        let siliconflow = SiliconFlowClient::with_base_url(
            config.siliconflow.api_key.clone(),
            config.siliconflow.api_url.clone(),
        )?;
        Ok(Self {
            config,
            coze,
            siliconflow,
        })
    }

    pub async fn generate_plans(
        &self,
        tags: Vec<String>,
        cancel: &CancellationToken,
    ) -> Result<Vec<NormalizedPlan>, AppError> {
        generate_plans(&self.config, &self.coze, &self.siliconflow, tags, cancel).await
    }

    pub async fn search(
        &self,
        tags: Vec<String>,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, AppError> {
        search(&self.config, &self.coze, tags, cancel).await
    }
}
