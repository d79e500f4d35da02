//! Xiaohongshu note search, run as a job on the Coze bot.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::job::{JobError, JobTransport, PollSettings, run_job};

/// Result of a completed note search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub search_results: String,
    pub keywords: String,
    pub tags: Vec<String>,
}

/// Search keywords for a tag set: each tag suffixed with the city, joined with `、`.
pub fn search_keywords(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("{tag} 成都"))
        .collect::<Vec<_>>()
        .join("、")
}

/// The instruction sent to the search bot.
pub fn search_prompt(keywords: &str) -> String {
    format!(
        "请搜索关于{keywords}的小红书笔记，重点关注：\n\
         1. 用户推荐的具体地点和店铺\n\
         2. 真实的体验感受和评价\n\
         3. 消费水平和性价比信息\n\
         4. 交通便利性和周边环境\n\
         5. 适合聚会的特色亮点\n\
         \n\
         请返回3-5条最相关的笔记内容，包含地点名称、用户评价、消费信息等。"
    )
}

/// Run the note search for `tags` and return the bot's final answer.
pub async fn search_notes(
    transport: &impl JobTransport,
    tags: &[String],
    settings: &PollSettings,
    cancel: &CancellationToken,
) -> Result<SearchOutcome, JobError> {
    let keywords = search_keywords(tags);
    let prompt = search_prompt(&keywords);
    let search_results = run_job(transport, &prompt, settings, cancel).await?;

    Ok(SearchOutcome {
        search_results,
        keywords,
        tags: tags.to_vec(),
    })
}
