//! Trip domain models
//!
//! - `item`: a single planned item with its category and cost type
//! - `plan`: the ordered item table of one trip and its mutations
//! - `queries`: filters used by the list, calendar and cost views
//! - `csv_impl`: reading and writing the item table as CSV

mod csv_impl;
mod item;
mod plan;
mod queries;

pub use csv_impl::{HEADERS, TIMESTAMP_FORMAT, parse_flag, parse_timestamp};
pub use item::{Category, CostType, MAX_DURATION_HOURS, PlannedItem, local_date_today};
pub use plan::TripPlan;
pub use queries::ScheduleFilter;
