//! Query methods for TripPlan
//!
//! Filters used by the list, calendar and cost views. Kept apart from
//! plan.rs so the mutating operations stay short.

use super::item::{Category, CostType, PlannedItem};
use super::plan::TripPlan;

/// Which part of the plan a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleFilter {
    #[default]
    All,
    /// Items placed on the calendar
    Scheduled,
    /// The idea pool
    Unscheduled,
}

impl std::str::FromStr for ScheduleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(ScheduleFilter::All),
            "scheduled" => Ok(ScheduleFilter::Scheduled),
            "unscheduled" | "ideas" => Ok(ScheduleFilter::Unscheduled),
            _ => Err(format!(
                "Invalid filter '{}'. Valid options are: all, scheduled, unscheduled",
                s
            )),
        }
    }
}

impl TripPlan {
    /// Items on the calendar, in insertion order
    pub fn scheduled(&self) -> Vec<&PlannedItem> {
        self.items.iter().filter(|i| i.is_scheduled()).collect()
    }

    /// Items still waiting in the idea pool
    pub fn unscheduled(&self) -> Vec<&PlannedItem> {
        self.items.iter().filter(|i| !i.is_scheduled()).collect()
    }

    pub fn filter_by_cost_type(&self, cost_type: CostType) -> Vec<&PlannedItem> {
        self.items
            .iter()
            .filter(|i| i.cost_type == cost_type)
            .collect()
    }

    pub fn filter_by_category(&self, category: &Category) -> Vec<&PlannedItem> {
        self.items
            .iter()
            .filter(|i| &i.category == category)
            .collect()
    }

    /// Combined filter used by the `list_items` tool
    pub fn list(
        &self,
        schedule: ScheduleFilter,
        category: Option<&Category>,
        cost_type: Option<CostType>,
    ) -> Vec<&PlannedItem> {
        self.items
            .iter()
            .filter(|i| match schedule {
                ScheduleFilter::All => true,
                ScheduleFilter::Scheduled => i.is_scheduled(),
                ScheduleFilter::Unscheduled => !i.is_scheduled(),
            })
            .filter(|i| category.is_none_or(|c| &i.category == c))
            .filter(|i| cost_type.is_none_or(|t| i.cost_type == t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_list_combines_filters() {
        let mut plan = TripPlan::new();
        plan.add(PlannedItem::new("Fuel Berlin", Category::Route, 5.0).with_cost(120.0, CostType::Fuel));
        plan.add(PlannedItem::new("Zoo", Category::Attraction, 3.0).with_cost(25.0, CostType::Individual));
        plan.add(PlannedItem::new("Dinner", Category::Food, 2.0).with_cost(200.0, CostType::Shared));
        let start = NaiveDate::from_ymd_opt(2026, 7, 24)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        plan.schedule("Dinner", start);

        assert_eq!(plan.list(ScheduleFilter::All, None, None).len(), 3);
        assert_eq!(plan.list(ScheduleFilter::Scheduled, None, None).len(), 1);
        assert_eq!(
            plan.list(ScheduleFilter::Unscheduled, Some(&Category::Attraction), None)
                .len(),
            1
        );
        assert!(
            plan.list(ScheduleFilter::Unscheduled, None, Some(CostType::Shared))
                .is_empty()
        );
        assert_eq!(plan.filter_by_cost_type(CostType::Fuel).len(), 1);
        assert_eq!(plan.filter_by_category(&Category::Food).len(), 1);
    }

    #[test]
    fn test_schedule_filter_parse() {
        assert_eq!("".parse::<ScheduleFilter>().unwrap(), ScheduleFilter::All);
        assert_eq!("Ideas".parse::<ScheduleFilter>().unwrap(), ScheduleFilter::Unscheduled);
        assert!("later".parse::<ScheduleFilter>().is_err());
    }
}
