//! Calendar grid preparation
//!
//! Turns scheduled items into day/hour cells for the calendar view, builds the
//! empty background grid, and splits events that run past midnight into one
//! segment per calendar day for the agenda.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::config::TripConfig;
use crate::error::{Result, TripError};
use crate::trip::{Category, CostType, PlannedItem, TripPlan};

/// Day label format used on the calendar axis
pub const DAY_LABEL_FORMAT: &str = "%d.%m";

/// One hour slot of the calendar
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub date: NaiveDate,
    /// `dd.mm` label of `date`
    pub day_label: String,
    /// Hour of day, 0-23
    pub hour: u32,
    /// Title shown in the cell; only the first hour of an event carries it
    pub display_title: String,
    /// Title of the item occupying the slot, empty for background cells
    pub full_title: String,
    /// `None` marks a background cell
    pub category: Option<Category>,
}

impl GridCell {
    pub fn is_background(&self) -> bool {
        self.category.is_none()
    }
}

fn day_label(date: NaiveDate) -> String {
    date.format(DAY_LABEL_FORMAT).to_string()
}

/// Expand every scheduled item into one cell per started hour
///
/// A fractional duration is truncated to whole hours, but every scheduled
/// item covers at least one cell. Cells past midnight fall on the next day.
/// The cell count follows the clamped `PlannedItem::duration`.
pub fn expand_schedule(plan: &TripPlan) -> Vec<GridCell> {
    let mut cells = Vec::new();
    for item in plan.scheduled() {
        let Some(start) = item.start else { continue };
        let hours = item.duration().num_hours().max(1);
        for i in 0..hours {
            let Some(slot) = start.checked_add_signed(Duration::hours(i)) else {
                break;
            };
            cells.push(GridCell {
                date: slot.date(),
                day_label: day_label(slot.date()),
                hour: slot.hour(),
                display_title: if i == 0 {
                    item.title.clone()
                } else {
                    String::new()
                },
                full_title: item.title.clone(),
                category: Some(item.category.clone()),
            });
        }
    }
    cells
}

/// Empty 24-hour grid for `num_days` days starting at `start_date`
pub fn background(start_date: NaiveDate, num_days: u32) -> Vec<GridCell> {
    let mut cells = Vec::with_capacity(num_days as usize * 24);
    for d in 0..num_days {
        let date = start_date + Duration::days(i64::from(d));
        let label = day_label(date);
        for hour in 0..24 {
            cells.push(GridCell {
                date,
                day_label: label.clone(),
                hour,
                display_title: String::new(),
                full_title: String::new(),
                category: None,
            });
        }
    }
    cells
}

/// Range of days visible in the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindow {
    pub start: NaiveDate,
    pub days: u32,
}

impl ViewWindow {
    /// Window starting `offset` days into the trip
    ///
    /// `offset` is clamped so the window never runs past the trip's last day.
    /// `days` overrides the configured page width when given.
    ///
    /// `config` must have passed `TripConfig::validate`, which keeps every
    /// window date representable.
    pub fn for_offset(config: &TripConfig, offset: u32, days: Option<u32>) -> Self {
        let days = days
            .unwrap_or_else(|| config.effective_view_days())
            .clamp(1, config.num_days.max(1));
        let max_offset = config.num_days.saturating_sub(days);
        let offset = offset.min(max_offset);
        Self {
            start: config.start_date + Duration::days(i64::from(offset)),
            days,
        }
    }

    /// First day after the window
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(i64::from(self.days))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end()
    }

    /// Every date in the window, in order
    pub fn dates(&self) -> Vec<NaiveDate> {
        (0..self.days)
            .map(|d| self.start + Duration::days(i64::from(d)))
            .collect()
    }
}

/// Keep only the cells that fall inside `window`
pub fn window_cells(cells: Vec<GridCell>, window: &ViewWindow) -> Vec<GridCell> {
    cells
        .into_iter()
        .filter(|c| window.contains(c.date))
        .collect()
}

/// Part of an event confined to a single calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySegment {
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// The event started on an earlier day
    pub continues_before: bool,
    /// The event goes on after this day
    pub continues_after: bool,
}

impl DaySegment {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

fn next_midnight(ts: NaiveDateTime) -> Option<NaiveDateTime> {
    ts.date().succ_opt().map(|day| day.and_time(NaiveTime::MIN))
}

/// Split `[start, end]` at every midnight it crosses
///
/// An event ending exactly at midnight stays on its own day. A zero-length
/// event produces a single empty segment.
pub fn split_by_day(start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<DaySegment>> {
    if start > end {
        return Err(TripError::MalformedRange {
            title: String::new(),
            start,
            end,
        });
    }
    if start == end {
        return Ok(vec![DaySegment {
            date: start.date(),
            start,
            end,
            continues_before: false,
            continues_after: false,
        }]);
    }

    let mut segments = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let seg_end = next_midnight(cursor).map_or(end, |midnight| midnight.min(end));
        segments.push(DaySegment {
            date: cursor.date(),
            start: cursor,
            end: seg_end,
            continues_before: cursor != start,
            continues_after: seg_end != end,
        });
        cursor = seg_end;
    }
    Ok(segments)
}

/// A day segment carrying its parent item's metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSegment {
    pub title: String,
    pub category: Category,
    pub cost: f64,
    pub cost_type: CostType,
    pub segment: DaySegment,
}

/// Split a scheduled item into per-day segments
///
/// Unscheduled items yield no segments.
pub fn split_item(item: &PlannedItem) -> Result<Vec<ItemSegment>> {
    let (Some(start), Some(end)) = (item.start, item.effective_end()) else {
        return Ok(Vec::new());
    };
    if !item.is_scheduled() {
        return Ok(Vec::new());
    }
    let segments = split_by_day(start, end).map_err(|_| TripError::MalformedRange {
        title: item.title.clone(),
        start,
        end,
    })?;
    Ok(segments
        .into_iter()
        .map(|segment| ItemSegment {
            title: item.title.clone(),
            category: item.category.clone(),
            cost: item.cost,
            cost_type: item.cost_type,
            segment,
        })
        .collect())
}

/// Day-by-day agenda of every scheduled item, each day sorted by start time
///
/// Items whose stored end precedes their start are skipped and returned
/// separately so the caller can report them.
pub fn agenda(plan: &TripPlan) -> (BTreeMap<NaiveDate, Vec<ItemSegment>>, Vec<TripError>) {
    let mut days: BTreeMap<NaiveDate, Vec<ItemSegment>> = BTreeMap::new();
    let mut errors = Vec::new();
    for item in plan.scheduled() {
        match split_item(item) {
            Ok(segments) => {
                for seg in segments {
                    days.entry(seg.segment.date).or_default().push(seg);
                }
            }
            Err(e) => errors.push(e),
        }
    }
    for segments in days.values_mut() {
        segments.sort_by_key(|s| s.segment.start);
    }
    (days, errors)
}
