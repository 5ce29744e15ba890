//! Cost summary handler

use crate::TripServerHandler;
use crate::costs::CostSummary;
use crate::formatting;
use mcp_attr::Result as McpResult;

impl TripServerHandler {
    /// Totals by cost type, each participant's share and a per-category breakdown.
    pub async fn handle_cost_summary(&self, scheduled_only: Option<bool>) -> McpResult<String> {
        let scheduled_only = scheduled_only.unwrap_or(false);

        let state = self.refresh()?;
        let participants = state.config.split_count();
        let summary = if scheduled_only {
            CostSummary::scheduled_only(&state.plan, participants)
        } else {
            CostSummary::from_plan(&state.plan, participants)
        };
        Ok(formatting::format_cost_summary(&summary, scheduled_only))
    }
}
