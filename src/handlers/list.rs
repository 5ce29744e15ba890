//! List handler for the trip planner MCP server

use crate::TripServerHandler;
use crate::formatting;
use crate::trip::ScheduleFilter;
use crate::validation;
use mcp_attr::Result as McpResult;

impl TripServerHandler {
    /// Handles list/filter operations - applies filters and formats results for display.
    pub async fn handle_list_items(
        &self,
        filter: Option<String>,
        category: Option<String>,
        cost_type: Option<String>,
    ) -> McpResult<String> {
        let schedule_filter = match filter {
            Some(ref f) => validation::parse_schedule_filter(f)?,
            None => ScheduleFilter::All,
        };
        let category = category
            .as_deref()
            .map(validation::parse_category)
            .transpose()?;
        let cost_type = cost_type
            .as_deref()
            .map(validation::parse_cost_type)
            .transpose()?;

        let state = self.refresh()?;
        let items = state
            .plan
            .list(schedule_filter, category.as_ref(), cost_type);
        Ok(formatting::format_items(&items))
    }
}
