use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TAGS: [&str; 2] = ["#成都", "#聚会"];
pub const DEFAULT_DESCRIPTION: &str = "这是一个精心设计的成都聚会方案";
pub const DEFAULT_DURATION: &str = "3-4小时";
pub const DEFAULT_BUDGET: &str = "¥150-200";
pub const DEFAULT_TRANSPORT: &str = "便捷";
pub const DEFAULT_TIMELINE: [(&str, &str); 2] = [
    ("19:00-20:30", "享受晚餐时光"),
    ("20:30-22:00", "体验特色活动"),
];

/// One step of a plan's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub time: String,
    pub activity: String,
}

/// A fully populated date plan, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPlan {
    pub id: u32,
    pub title: String,
    pub image: String,
    pub tags: Vec<String>,
    pub description: String,
    pub duration: String,
    pub budget: String,
    pub transport: String,
    pub timeline: Vec<TimelineEntry>,
    /// Set when `image` is a generated URL; such URLs stop working after this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_expires_at: Option<DateTime<Utc>>,
}

pub fn default_title(position: u32) -> String {
    format!("成都聚会方案{position}")
}

pub fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
}

pub fn default_timeline() -> Vec<TimelineEntry> {
    DEFAULT_TIMELINE
        .iter()
        .map(|(time, activity)| TimelineEntry {
            time: time.to_string(),
            activity: activity.to_string(),
        })
        .collect()
}
