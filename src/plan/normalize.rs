//! Turns loosely structured model output into complete [`NormalizedPlan`]s.
//!
//! Parsing is strict about the document (a `plans` array must be found) and
//! lenient about each record: every field is repaired independently, so a
//! record never fails on its own.

use serde_json::Value;
use thiserror::Error;

use super::imagery::ImageCatalog;
use super::model::{
    DEFAULT_BUDGET, DEFAULT_DESCRIPTION, DEFAULT_DURATION, DEFAULT_TRANSPORT, NormalizedPlan,
    TimelineEntry, default_tags, default_timeline, default_title,
};

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The content could not be read as a plan document at all.
    #[error("model output is not a valid plan document: {0}")]
    Unparsable(String),

    /// The document parsed but held no plan records.
    #[error("model output contained no plans")]
    NoPlans,
}

/// Parse `raw` as JSON, falling back to the span from the first `{` to the last `}`.
pub fn parse_document(raw: &str) -> Result<Value, NormalizeError> {
    let trimmed = raw.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(doc) => Ok(doc),
        Err(direct) => {
            let span = brace_span(trimmed).ok_or_else(|| {
                NormalizeError::Unparsable(format!("no JSON object found ({direct})"))
            })?;
            serde_json::from_str(span).map_err(|e| NormalizeError::Unparsable(e.to_string()))
        }
    }
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse and repair every plan in `raw`, preserving source order.
///
/// `caller_tags` feed image selection when a plan offers no better signal.
pub fn normalize_plans(
    raw: &str,
    caller_tags: &[String],
    catalog: &ImageCatalog,
) -> Result<Vec<NormalizedPlan>, NormalizeError> {
    let doc = parse_document(raw)?;
    let records = doc
        .get("plans")
        .and_then(Value::as_array)
        .ok_or_else(|| NormalizeError::Unparsable("missing \"plans\" array".to_string()))?;

    if records.is_empty() {
        return Err(NormalizeError::NoPlans);
    }

    Ok(records
        .iter()
        .zip(1u32..)
        .map(|(record, position)| repair_plan(record, position, caller_tags, catalog))
        .collect())
}

/// Fill every absent or invalid field of one record from the default table.
pub fn repair_plan(
    record: &Value,
    position: u32,
    caller_tags: &[String],
    catalog: &ImageCatalog,
) -> NormalizedPlan {
    let title = text_field(record, "title").unwrap_or_else(|| default_title(position));
    let description =
        text_field(record, "description").unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    let tags = string_list(record, "tags").unwrap_or_else(default_tags);

    let image = text_field(record, "image")
        .filter(|path| catalog.is_known_asset(path))
        .unwrap_or_else(|| {
            catalog
                .select(&title, &description, &tags, caller_tags)
                .to_string()
        });

    NormalizedPlan {
        id: position,
        image,
        tags,
        duration: text_field(record, "duration").unwrap_or_else(|| DEFAULT_DURATION.to_string()),
        budget: text_field(record, "budget").unwrap_or_else(|| DEFAULT_BUDGET.to_string()),
        transport: text_field(record, "transport")
            .unwrap_or_else(|| DEFAULT_TRANSPORT.to_string()),
        timeline: timeline(record).unwrap_or_else(default_timeline),
        title,
        description,
        image_expires_at: None,
    }
}

/// A trimmed, non-empty string field.
fn text_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// The usable strings of an array field, or `None` if none remain.
fn string_list(value: &Value, key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = value
        .get(key)?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    (!items.is_empty()).then_some(items)
}

/// Timeline entries that carry both a time and an activity.
fn timeline(value: &Value) -> Option<Vec<TimelineEntry>> {
    let entries: Vec<TimelineEntry> = value
        .get("timeline")?
        .as_array()?
        .iter()
        .filter_map(|entry| {
            Some(TimelineEntry {
                time: text_field(entry, "time")?,
                activity: text_field(entry, "activity")?,
            })
        })
        .collect();
    (!entries.is_empty()).then_some(entries)
}
