//! Validation helper functions for the trip planner MCP server
//!
//! Parses tool parameters into domain types and builds the public error
//! messages returned to the client.

use crate::config::TripConfig;
use crate::trip::{Category, CostType, MAX_DURATION_HOURS, ScheduleFilter, TripPlan};
use chrono::NaiveDate;
use mcp_attr::Result as McpResult;

/// Build a public INVALID_PARAMS error
pub fn invalid_params(message: String) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message, true)
}

/// Trim a title and reject empty ones
pub fn parse_title(title: &str) -> McpResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(invalid_params("Title must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

pub fn parse_category(category: &str) -> McpResult<Category> {
    category.parse::<Category>().map_err(|_| {
        invalid_params(format!(
            "Invalid category '{}'. Use one of: {}, or any other non-empty label",
            category,
            Category::KNOWN.join(", ")
        ))
    })
}

pub fn parse_cost_type(cost_type: &str) -> McpResult<CostType> {
    cost_type.parse::<CostType>().map_err(invalid_params)
}

pub fn parse_schedule_filter(filter: &str) -> McpResult<ScheduleFilter> {
    filter.parse::<ScheduleFilter>().map_err(invalid_params)
}

/// Parse a YYYY-MM-DD date
pub fn parse_date(date_str: &str) -> McpResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        invalid_params(format!(
            "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2026-07-24')",
            date_str
        ))
    })
}

/// Durations must be positive hours, at most `MAX_DURATION_HOURS`
pub fn validate_duration(hours: f64) -> McpResult<f64> {
    if hours.is_finite() && hours > 0.0 && hours <= MAX_DURATION_HOURS {
        Ok(hours)
    } else {
        Err(invalid_params(format!(
            "Invalid duration {}. Duration must be a positive number of hours, at most {}",
            hours, MAX_DURATION_HOURS
        )))
    }
}

/// Costs must be finite and non-negative
pub fn validate_cost(cost: f64) -> McpResult<f64> {
    if cost.is_finite() && cost >= 0.0 {
        Ok(cost)
    } else {
        Err(invalid_params(format!(
            "Invalid cost {}. Cost must be zero or a positive amount",
            cost
        )))
    }
}

pub fn validate_hour(hour: u32) -> McpResult<u32> {
    if hour < 24 {
        Ok(hour)
    } else {
        Err(invalid_params(format!(
            "Invalid hour {}. Hour must be between 0 and 23",
            hour
        )))
    }
}

/// Check `date` lies inside the trip
pub fn validate_trip_date(date: NaiveDate, config: &TripConfig) -> McpResult<NaiveDate> {
    if config.is_schedulable(date) {
        Ok(date)
    } else {
        Err(invalid_params(format!(
            "Date {} is outside the trip ({} to {})",
            date,
            config.start_date,
            config.end_date()
        )))
    }
}

/// Format an error message for an unknown title with the available titles
pub fn format_unknown_item_error(title: &str, plan: &TripPlan) -> String {
    if plan.is_empty() {
        format!(
            "Item '{}' does not exist. The plan is empty; add items with add_item first.",
            title
        )
    } else {
        let titles: Vec<&str> = plan.items().iter().map(|i| i.title.as_str()).collect();
        format!(
            "Item '{}' does not exist.\nAvailable items: {}",
            title,
            titles.join(", ")
        )
    }
}
