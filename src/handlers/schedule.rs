//! Calendar placement handlers

use crate::TripServerHandler;
use crate::trip::TIMESTAMP_FORMAT;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};
use tracing::info;

impl TripServerHandler {
    /// **Plan**: Put an item on the calendar at a given day and full hour.
    /// The end time follows from the item's duration. Scheduling an already
    /// scheduled item moves it.
    pub async fn handle_schedule_item(
        &self,
        title: String,
        date: String,
        hour: u32,
    ) -> McpResult<String> {
        let title = validation::parse_title(&title)?;
        let date = validation::parse_date(&date)?;
        let hour = validation::validate_hour(hour)?;

        let mut state = self.refresh()?;
        validation::validate_trip_date(date, &state.config)?;

        let Some(start) = date.and_hms_opt(hour, 0, 0) else {
            bail_public!(_, "Invalid start time {} {:02}:00", date, hour);
        };

        let Some(was_scheduled) = state.plan.find_by_title(&title).map(|i| i.is_scheduled())
        else {
            let msg = validation::format_unknown_item_error(&title, &state.plan);
            drop(state);
            bail_public!(_, "{}", msg);
        };

        let end = state
            .plan
            .schedule(&title, start)
            .and_then(|item| item.end)
            .unwrap_or(start);
        info!(trip = %state.trip_id, title = %title, %start, "item scheduled");

        let note = self.persist_plan(&state, &format!("Schedule {} at {}", title, start))?;
        Ok(format!(
            "{} '{}': {} -> {}{}",
            if was_scheduled { "Moved" } else { "Scheduled" },
            title,
            start.format(TIMESTAMP_FORMAT),
            end.format(TIMESTAMP_FORMAT),
            note
        ))
    }

    /// **Plan**: Take an item off the calendar and return it to the idea pool.
    pub async fn handle_unschedule_item(&self, title: String) -> McpResult<String> {
        let title = validation::parse_title(&title)?;

        let mut state = self.refresh()?;

        let Some(scheduled) = state.plan.find_by_title(&title).map(|i| i.is_scheduled()) else {
            let msg = validation::format_unknown_item_error(&title, &state.plan);
            drop(state);
            bail_public!(_, "{}", msg);
        };
        if !scheduled {
            drop(state);
            bail_public!(_, "Item '{}' is not on the calendar", title);
        }

        state.plan.unschedule(&title);
        info!(trip = %state.trip_id, title = %title, "item unscheduled");

        let note = self.persist_plan(&state, &format!("Unschedule {}", title))?;
        Ok(format!("'{}' moved back to the idea pool{}", title, note))
    }
}
