//! Common test utilities for integration tests
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;
use trip_planner_mcp::TripServerHandler;

/// Create a test handler over an empty temporary data directory
pub fn get_test_handler() -> (TripServerHandler, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let handler = TripServerHandler::new(temp_dir.path().to_str().unwrap(), false).unwrap();
    (handler, temp_dir)
}

/// Create a test handler whose trip runs 2026-07-24 for 14 days, 2 participants, 3 days per page
pub async fn get_configured_handler() -> (TripServerHandler, TempDir) {
    let (handler, temp_dir) = get_test_handler();
    handler
        .handle_configure_trip(
            Some("Coast".to_string()),
            Some("2026-07-24".to_string()),
            Some(14),
            Some(2),
            Some(3),
        )
        .await
        .unwrap();
    (handler, temp_dir)
}

/// Build a timestamp from a YYYY-MM-DD date and an hour
pub fn at(date: &str, hour: u32) -> NaiveDateTime {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Add an item with no cost
pub async fn add(handler: &TripServerHandler, title: &str, category: &str, hours: f64) {
    handler
        .handle_add_item(title.to_string(), category.to_string(), hours, None, None)
        .await
        .unwrap();
}
