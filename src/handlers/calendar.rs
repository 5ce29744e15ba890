//! Calendar and agenda views

use crate::TripServerHandler;
use crate::formatting;
use crate::grid::{self, ViewWindow};
use crate::validation;
use mcp_attr::Result as McpResult;

impl TripServerHandler {
    /// Render the day/hour grid for one page of the trip.
    ///
    /// `offset` counts days from the trip start and is clamped so the page
    /// stays inside the trip.
    pub async fn handle_calendar(&self, offset: Option<u32>, days: Option<u32>) -> McpResult<String> {
        let state = self.refresh()?;

        let window = ViewWindow::for_offset(&state.config, offset.unwrap_or(0), days);
        let cells = grid::window_cells(grid::expand_schedule(&state.plan), &window);

        let mut out = formatting::format_calendar(&state.config, &window, &cells);
        let ideas = state.plan.unscheduled().len();
        if ideas > 0 {
            out.push_str(&format!("\n{} item(s) waiting in the idea pool\n", ideas));
        } else if !state.plan.is_empty() {
            out.push_str("\nEverything is scheduled!\n");
        }
        Ok(out)
    }

    /// Day-by-day agenda. Events running past midnight are split per day.
    pub async fn handle_agenda(&self, date: Option<String>) -> McpResult<String> {
        let date = date.as_deref().map(validation::parse_date).transpose()?;

        let state = self.refresh()?;
        let (mut days, errors) = grid::agenda(&state.plan);
        if let Some(date) = date {
            days.retain(|d, _| *d == date);
        }
        Ok(formatting::format_agenda(&days, &errors))
    }
}
