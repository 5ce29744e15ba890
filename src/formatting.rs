//! Formatting helper functions for the trip planner MCP server
//!
//! Renders items, the calendar grid, the agenda and cost summaries as plain
//! text for MCP clients.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::config::{TripConfig, TripRegistry};
use crate::costs::{CostSummary, round_cents};
use crate::error::TripError;
use crate::grid::{self, GridCell, ItemSegment, ViewWindow};
use crate::trip::{Category, PlannedItem, TIMESTAMP_FORMAT};

const CELL_WIDTH: usize = 14;

fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{:<width$}", text, width = width)
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

/// Format a list of items
pub fn format_items(items: &[&PlannedItem]) -> String {
    if items.is_empty() {
        return "No items found".to_string();
    }

    let mut result = format!("Found {} item(s):\n\n", items.len());
    for item in items {
        result.push_str(&format!(
            "- {} ({}, {}h)\n",
            item.title, item.category, item.duration_hours
        ));
        if item.cost > 0.0 {
            result.push_str(&format!(
                "  Cost: {:.2} ({})\n",
                item.cost, item.cost_type
            ));
        }
        if item.is_scheduled()
            && let Some(start) = item.start
        {
            let end = item
                .effective_end()
                .map(|e| e.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default();
            result.push_str(&format!(
                "  Scheduled: {} -> {}\n",
                start.format(TIMESTAMP_FORMAT),
                end
            ));
        } else {
            result.push_str("  Not scheduled\n");
        }
    }
    result
}

/// Render the day/hour grid for a view window
pub fn format_calendar(config: &TripConfig, window: &ViewWindow, cells: &[GridCell]) -> String {
    let mut occupied: HashMap<(NaiveDate, u32), Vec<&GridCell>> = HashMap::new();
    for cell in cells {
        occupied.entry((cell.date, cell.hour)).or_default().push(cell);
    }

    let background = grid::background(window.start, window.days);
    let last_day = window.end().pred_opt().unwrap_or(window.start);

    let mut out = format!(
        "{}: {} to {} (day {} of {})\n\n",
        config.name,
        window.start,
        last_day,
        (window.start - config.start_date).num_days() + 1,
        config.num_days
    );

    out.push_str("Hour  ");
    for cell in background.iter().filter(|c| c.hour == 0) {
        out.push_str(&format!("| {}", fit(&cell.day_label, CELL_WIDTH)));
    }
    out.push('\n');

    let mut used: BTreeSet<Category> = BTreeSet::new();
    for hour in 0..24 {
        out.push_str(&format!("{:02}:00 ", hour));
        for date in window.dates() {
            let text = match occupied.get(&(date, hour)) {
                None => ".".to_string(),
                Some(slot) => {
                    let first = slot[0];
                    let marker = first
                        .category
                        .as_ref()
                        .map(|c| {
                            used.insert(c.clone());
                            c.marker()
                        })
                        .unwrap_or(' ');
                    let mut text = if first.display_title.is_empty() {
                        format!("{} |", marker)
                    } else {
                        format!("{} {}", marker, first.display_title)
                    };
                    if slot.len() > 1 {
                        text = format!("{} +{}", text, slot.len() - 1);
                    }
                    text
                }
            };
            out.push_str(&format!("| {}", fit(&text, CELL_WIDTH)));
        }
        out.push('\n');
    }

    if !used.is_empty() {
        let legend: Vec<String> = used
            .iter()
            .map(|c| format!("{}={} {}", c.marker(), c, c.color()))
            .collect();
        out.push_str(&format!("\nLegend: {}\n", legend.join(", ")));
    }
    out
}

/// Render the per-day agenda
pub fn format_agenda(days: &BTreeMap<NaiveDate, Vec<ItemSegment>>, errors: &[TripError]) -> String {
    let mut out = String::new();
    if days.is_empty() {
        out.push_str("Nothing scheduled\n");
    }
    for (date, segments) in days {
        out.push_str(&format!("{} ({})\n", date, date.format("%A")));
        for seg in segments {
            let from = if seg.segment.continues_before {
                "..".to_string()
            } else {
                seg.segment.start.format("%H:%M").to_string()
            };
            let to = if seg.segment.continues_after {
                "..".to_string()
            } else {
                seg.segment.end.format("%H:%M").to_string()
            };
            out.push_str(&format!(
                "  {:>5}-{:<5} {} [{}]\n",
                from, to, seg.title, seg.category
            ));
        }
    }
    for err in errors {
        out.push_str(&format!("Warning: {}\n", err));
    }
    out
}

/// Render a cost summary
pub fn format_cost_summary(summary: &CostSummary, scheduled_only: bool) -> String {
    let mut out = format!(
        "Costs ({}) for {} participant(s):\n\n",
        if scheduled_only { "scheduled items" } else { "all items" },
        summary.participants
    );
    out.push_str(&format!(
        "  Individual (per person): {:.2}\n",
        round_cents(summary.individual)
    ));
    out.push_str(&format!("  Shared (group): {:.2}\n", round_cents(summary.shared)));
    out.push_str(&format!("  Fuel (group): {:.2}\n", round_cents(summary.fuel)));
    out.push_str(&format!(
        "  Shared + fuel per person: {:.2}\n",
        round_cents(summary.shared_per_person())
    ));
    out.push_str(&format!(
        "  Total per person: {:.2}\n",
        round_cents(summary.per_person())
    ));
    out.push_str(&format!(
        "  Group total: {:.2}\n",
        round_cents(summary.group_total())
    ));

    if !summary.by_category.is_empty() {
        out.push_str("\nBy category (group):\n");
        for (category, amount) in &summary.by_category {
            out.push_str(&format!("  {}: {:.2}\n", category, round_cents(*amount)));
        }
    }
    out
}

/// Render the current trip's configuration
pub fn format_trip(trip_id: &str, config: &TripConfig) -> String {
    format!(
        "Trip '{}' ({})\n  Start: {}\n  Days: {} (until {})\n  Participants: {}\n  Days per calendar page: {}\n",
        config.name,
        trip_id,
        config.start_date,
        config.num_days,
        config.end_date(),
        config.participants,
        config.view_days
    )
}

/// Render the trip registry
pub fn format_trips(registry: &TripRegistry) -> String {
    let mut out = String::from("Trips:\n");
    for (id, name) in registry.iter() {
        let marker = if *id == registry.current { "*" } else { " " };
        out.push_str(&format!("{} {} - {}\n", marker, id, name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{agenda, expand_schedule, window_cells};
    use crate::trip::{CostType, TripPlan};

    fn config() -> TripConfig {
        TripConfig {
            name: "Coast".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 7, 24).unwrap(),
            num_days: 14,
            participants: 2,
            view_days: 3,
        }
    }

    fn plan() -> TripPlan {
        let mut plan = TripPlan::new();
        plan.add(PlannedItem::new("Lighthouse", Category::Attraction, 2.0));
        plan.add(PlannedItem::new("Ferry", Category::Route, 1.0).with_cost(60.0, CostType::Shared));
        let start = NaiveDate::from_ymd_opt(2026, 7, 25)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        plan.schedule("Lighthouse", start);
        plan
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abc~");
    }

    #[test]
    fn test_format_items() {
        let plan = plan();
        let items: Vec<&PlannedItem> = plan.items().iter().collect();
        let text = format_items(&items);
        assert!(text.starts_with("Found 2 item(s)"));
        assert!(text.contains("Scheduled: 2026-07-25 10:00:00 -> 2026-07-25 12:00:00"));
        assert!(text.contains("Cost: 60.00 (Shared)"));
        assert_eq!(format_items(&[]), "No items found");
    }

    #[test]
    fn test_format_calendar_marks_cells() {
        let cfg = config();
        let window = ViewWindow::for_offset(&cfg, 0, None);
        let cells = window_cells(expand_schedule(&plan()), &window);
        let text = format_calendar(&cfg, &window, &cells);

        assert!(text.contains("| 24.07"));
        assert!(text.contains("| 26.07"));
        assert!(!text.contains("27.07"));
        let ten = text.lines().find(|l| l.starts_with("10:00")).unwrap();
        assert!(ten.contains("A Lighthouse"));
        let eleven = text.lines().find(|l| l.starts_with("11:00")).unwrap();
        assert!(eleven.contains("A |"));
        assert!(text.contains("Legend: A=Attraction #66BB6A"));
    }

    #[test]
    fn test_format_agenda() {
        let (days, errors) = agenda(&plan());
        let text = format_agenda(&days, &errors);
        assert!(text.contains("2026-07-25 (Saturday)"));
        assert!(text.contains("10:00-12:00 Lighthouse [Attraction]"));
        assert_eq!(format_agenda(&BTreeMap::new(), &[]), "Nothing scheduled\n");
    }

    #[test]
    fn test_format_cost_summary() {
        let summary = CostSummary::from_plan(&plan(), 2);
        let text = format_cost_summary(&summary, false);
        assert!(text.contains("Shared (group): 60.00"));
        assert!(text.contains("Total per person: 30.00"));
        assert!(text.contains("Route: 60.00"));
    }

    #[test]
    fn test_format_trips_marks_current() {
        let mut registry = TripRegistry::default();
        registry.create("alps", "Alps").unwrap();
        let text = format_trips(&registry);
        assert!(text.contains("  alps - Alps"));
        assert!(text.contains("* default - My Trip"));
    }
}
