//! Cost aggregation and group expense splitting
//!
//! Individual costs are per-person amounts: everyone pays them. Shared and
//! fuel costs are group totals divided equally among participants.

use std::collections::BTreeMap;

use crate::trip::{Category, CostType, PlannedItem, TripPlan};

/// Totals for one trip
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CostSummary {
    /// Participants the group costs are split among (at least 1)
    pub participants: u32,
    /// Sum of per-person costs
    pub individual: f64,
    /// Sum of shared group costs
    pub shared: f64,
    /// Sum of fuel costs
    pub fuel: f64,
    /// What the whole group spends, per category
    pub by_category: BTreeMap<Category, f64>,
    /// Number of items that carry a non-zero cost
    pub priced_items: usize,
}

impl CostSummary {
    /// Aggregate the costs of every item in the plan
    pub fn from_plan(plan: &TripPlan, participants: u32) -> Self {
        Self::from_items(plan.items().iter(), participants)
    }

    /// Aggregate only the items placed on the calendar
    pub fn scheduled_only(plan: &TripPlan, participants: u32) -> Self {
        Self::from_items(plan.scheduled().into_iter(), participants)
    }

    fn from_items<'a>(items: impl Iterator<Item = &'a PlannedItem>, participants: u32) -> Self {
        let participants = participants.max(1);
        let mut summary = CostSummary {
            participants,
            ..Default::default()
        };

        for item in items {
            if item.cost > 0.0 {
                summary.priced_items += 1;
            }
            let group_amount = match item.cost_type {
                CostType::Individual => {
                    summary.individual += item.cost;
                    item.cost * f64::from(participants)
                }
                CostType::Shared => {
                    summary.shared += item.cost;
                    item.cost
                }
                CostType::Fuel => {
                    summary.fuel += item.cost;
                    item.cost
                }
            };
            *summary
                .by_category
                .entry(item.category.clone())
                .or_insert(0.0) += group_amount;
        }
        summary
    }

    /// Each participant's share of the shared and fuel costs
    pub fn shared_per_person(&self) -> f64 {
        (self.shared + self.fuel) / f64::from(self.participants.max(1))
    }

    /// What one participant pays in total
    pub fn per_person(&self) -> f64 {
        self.individual + self.shared_per_person()
    }

    /// What the whole group pays in total
    pub fn group_total(&self) -> f64 {
        self.individual * f64::from(self.participants) + self.shared + self.fuel
    }
}

/// Round to cents for display
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn plan() -> TripPlan {
        let mut plan = TripPlan::new();
        plan.add(PlannedItem::new("Museum", Category::Attraction, 2.0).with_cost(20.0, CostType::Individual));
        plan.add(PlannedItem::new("Villa", Category::Rest, 1.0).with_cost(1200.0, CostType::Shared));
        plan.add(PlannedItem::new("Drive", Category::Route, 8.0).with_cost(400.0, CostType::Fuel));
        plan.add(PlannedItem::new("Walk", Category::Attraction, 1.0));
        plan
    }

    #[test]
    fn test_summary_splits_group_costs() {
        let summary = CostSummary::from_plan(&plan(), 4);
        assert_eq!(summary.individual, 20.0);
        assert_eq!(summary.shared, 1200.0);
        assert_eq!(summary.fuel, 400.0);
        assert_eq!(summary.shared_per_person(), 400.0);
        assert_eq!(summary.per_person(), 420.0);
        assert_eq!(summary.group_total(), 1680.0);
        assert_eq!(summary.priced_items, 3);
        assert_eq!(summary.by_category[&Category::Attraction], 80.0);
        assert_eq!(summary.by_category[&Category::Route], 400.0);
    }

    #[test]
    fn test_zero_participants_counts_as_one() {
        let summary = CostSummary::from_plan(&plan(), 0);
        assert_eq!(summary.participants, 1);
        assert_eq!(summary.per_person(), 1620.0);
    }

    #[test]
    fn test_scheduled_only() {
        let mut plan = plan();
        let start = NaiveDate::from_ymd_opt(2026, 7, 24)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        plan.schedule("Drive", start);
        let summary = CostSummary::scheduled_only(&plan, 2);
        assert_eq!(summary.fuel, 400.0);
        assert_eq!(summary.shared, 0.0);
        assert_eq!(summary.per_person(), 200.0);
    }

    #[test]
    fn test_empty_plan() {
        let summary = CostSummary::from_plan(&TripPlan::new(), 3);
        assert_eq!(summary.group_total(), 0.0);
        assert!(summary.by_category.is_empty());
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(10.0 / 3.0), 3.33);
        assert_eq!(round_cents(2.005 + 0.001), 2.01);
    }
}
