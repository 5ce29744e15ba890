//! Idea pool handlers: adding, editing and deleting planned items

use crate::TripServerHandler;
use crate::trip::{CostType, PlannedItem};
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};
use tracing::info;

impl TripServerHandler {
    /// **Capture**: Add a candidate activity to the idea pool. New items start unscheduled.
    /// **Next**: Use schedule_item to place it on the calendar.
    pub async fn handle_add_item(
        &self,
        title: String,
        category: String,
        duration_hours: f64,
        cost: Option<f64>,
        cost_type: Option<String>,
    ) -> McpResult<String> {
        let title = validation::parse_title(&title)?;
        let category = validation::parse_category(&category)?;
        let duration_hours = validation::validate_duration(duration_hours)?;
        let cost = validation::validate_cost(cost.unwrap_or(0.0))?;
        let cost_type = match cost_type {
            Some(ref s) if !s.trim().is_empty() => validation::parse_cost_type(s)?,
            _ => CostType::Individual,
        };

        let mut state = self.refresh()?;

        if state.plan.contains_title(&title) {
            drop(state);
            bail_public!(
                _,
                "Duplicate title: an item called '{}' already exists. Titles identify items, so please pick a different one.",
                title
            );
        }

        let item = PlannedItem::new(title.clone(), category, duration_hours).with_cost(cost, cost_type);
        state.plan.add(item);
        info!(trip = %state.trip_id, title = %title, "item added");

        let note = self.persist_plan(&state, &format!("Add item {}", title))?;
        Ok(format!("Added '{}' to the idea pool{}", title, note))
    }

    /// **Clarify**: Change an item's title, category, duration or cost.
    /// Changing the duration of a scheduled item moves its end time.
    pub async fn handle_update_item(
        &self,
        title: String,
        new_title: Option<String>,
        category: Option<String>,
        duration_hours: Option<f64>,
        cost: Option<f64>,
        cost_type: Option<String>,
    ) -> McpResult<String> {
        let title = validation::parse_title(&title)?;
        let new_title = new_title.as_deref().map(validation::parse_title).transpose()?;
        let category = category.as_deref().map(validation::parse_category).transpose()?;
        let duration_hours = duration_hours.map(validation::validate_duration).transpose()?;
        let cost = cost.map(validation::validate_cost).transpose()?;
        let cost_type = cost_type
            .as_deref()
            .map(validation::parse_cost_type)
            .transpose()?;

        let mut state = self.refresh()?;

        let Some(mut item) = state.plan.find_by_title(&title).cloned() else {
            let msg = validation::format_unknown_item_error(&title, &state.plan);
            drop(state);
            bail_public!(_, "{}", msg);
        };

        if let Some(new_title) = new_title {
            if new_title != title && state.plan.contains_title(&new_title) {
                drop(state);
                bail_public!(_, "Duplicate title: an item called '{}' already exists.", new_title);
            }
            item.title = new_title;
        }
        if let Some(category) = category {
            item.category = category;
        }
        if let Some(hours) = duration_hours {
            item.duration_hours = hours;
            if item.is_scheduled()
                && let Some(start) = item.start
            {
                item.schedule_at(start);
            }
        }
        if let Some(cost) = cost {
            item.cost = cost;
        }
        if let Some(cost_type) = cost_type {
            item.cost_type = cost_type;
        }

        let updated_title = item.title.clone();
        state.plan.update(&title, item);

        let note = self.persist_plan(&state, &format!("Update item {}", updated_title))?;
        Ok(format!("Item '{}' updated{}", updated_title, note))
    }

    /// **Purge**: Permanently delete items from the idea pool. Scheduled items must be unscheduled first.
    /// **Batch**: Accepts several titles; reports which ones were removed and which were skipped.
    pub async fn handle_remove_items(&self, titles: Vec<String>) -> McpResult<String> {
        if titles.is_empty() {
            bail_public!(_, "No titles provided. Please specify at least one item title.");
        }

        let mut state = self.refresh()?;

        let mut successes = Vec::new();
        let mut failures = Vec::new();

        for title in titles.iter().map(|t| t.trim()) {
            match state.plan.find_by_title(title).map(|i| i.is_scheduled()) {
                None => failures.push(format!("{}: not found", title)),
                Some(true) => failures.push(format!(
                    "{}: scheduled on the calendar, unschedule it first",
                    title
                )),
                Some(false) => {
                    state.plan.remove_by_title(title);
                    successes.push(title.to_string());
                }
            }
        }

        if successes.is_empty() {
            drop(state);
            bail_public!(_, "No items removed:\n{}", failures.join("\n"));
        }

        let note = self.persist_plan(&state, &format!("Remove {}", successes.join(", ")))?;

        let mut result = format!("Removed {} item(s): {}", successes.len(), successes.join(", "));
        if !failures.is_empty() {
            result.push_str(&format!("\nSkipped:\n{}", failures.join("\n")));
        }
        result.push_str(&note);
        Ok(result)
    }
}
