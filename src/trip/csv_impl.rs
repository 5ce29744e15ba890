//! CSV encoding and decoding for TripPlan
//!
//! The table is read leniently: columns may be missing or carry the legacy
//! Polish headers, timestamps that do not parse become `None`, and broken
//! numbers fall back to defaults. Writing always produces the current
//! English header set.

use super::item::{Category, CostType, MAX_DURATION_HOURS, PlannedItem};
use super::plan::TripPlan;
use crate::error::{Result, TripError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Column headers written to the CSV file, in order
pub const HEADERS: [&str; 8] = [
    "Title",
    "Category",
    "Duration (h)",
    "Start",
    "End",
    "Scheduled",
    "Cost",
    "Cost type",
];

/// Timestamp format used when writing
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ACCEPTED_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DEFAULT_DURATION_HOURS: f64 = 1.0;

/// One raw CSV row, every column kept as text
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ItemRecord {
    #[serde(rename = "Title", alias = "Tytuł")]
    title: String,
    #[serde(rename = "Category", alias = "Kategoria")]
    category: String,
    #[serde(rename = "Duration (h)", alias = "Czas (h)")]
    duration: String,
    #[serde(rename = "Start")]
    start: String,
    #[serde(rename = "End", alias = "Koniec")]
    end: String,
    #[serde(rename = "Scheduled", alias = "Zaplanowane")]
    scheduled: String,
    #[serde(rename = "Cost", alias = "Koszt")]
    cost: String,
    #[serde(rename = "Cost type", alias = "Typ kosztu")]
    cost_type: String,
}

/// Parse a timestamp cell, returning `None` for empty or unparseable values
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    ACCEPTED_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Parse the scheduled flag the way the data file has always stored it
pub fn parse_flag(value: &str) -> bool {
    value.trim().to_uppercase() == "TRUE"
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl From<ItemRecord> for PlannedItem {
    fn from(record: ItemRecord) -> Self {
        let category = record.category.parse().unwrap_or(Category::Attraction);
        let duration_hours = parse_number(&record.duration)
            .filter(|d| *d > 0.0)
            .map(|d| d.min(MAX_DURATION_HOURS))
            .unwrap_or(DEFAULT_DURATION_HOURS);
        let cost = parse_number(&record.cost)
            .filter(|c| *c >= 0.0)
            .unwrap_or(0.0);
        let cost_type = record.cost_type.parse().unwrap_or(CostType::Individual);

        let mut item = PlannedItem {
            title: record.title,
            category,
            duration_hours,
            start: parse_timestamp(&record.start),
            end: parse_timestamp(&record.end),
            scheduled: parse_flag(&record.scheduled),
            cost,
            cost_type,
        };
        // an end further out than the longest allowed duration is recomputed
        if let (Some(start), Some(end)) = (item.start, item.end)
            && (end - start).num_minutes() > (MAX_DURATION_HOURS * 60.0) as i64
        {
            item.end = start.checked_add_signed(item.duration());
        }
        item
    }
}

impl From<&PlannedItem> for ItemRecord {
    fn from(item: &PlannedItem) -> Self {
        let format_ts = |ts: Option<NaiveDateTime>| {
            ts.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default()
        };
        ItemRecord {
            title: item.title.clone(),
            category: item.category.to_string(),
            duration: item.duration_hours.to_string(),
            start: format_ts(item.start),
            end: format_ts(item.end),
            scheduled: if item.scheduled { "TRUE" } else { "FALSE" }.to_string(),
            cost: item.cost.to_string(),
            cost_type: item.cost_type.to_string(),
        }
    }
}

impl TripPlan {
    /// Decode a plan from CSV text
    ///
    /// Empty content yields an empty plan. Rows without a title are dropped.
    pub fn from_csv(content: &str) -> Result<Self> {
        // A UTF-8 BOM would otherwise end up in the first header name
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.trim().is_empty() {
            return Ok(TripPlan::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut items = Vec::new();
        for record in reader.deserialize::<ItemRecord>() {
            let item = PlannedItem::from(record?);
            if !item.title.is_empty() {
                items.push(item);
            }
        }
        Ok(TripPlan::from_items(items))
    }

    /// Encode the plan as CSV text, header row first
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(HEADERS)?;
        for item in &self.items {
            writer.serialize(ItemRecord::from(item))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| TripError::Csv(e.into_error().into()))?;
        String::from_utf8(bytes).map_err(|e| {
            TripError::Csv(std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
        })
    }
}
