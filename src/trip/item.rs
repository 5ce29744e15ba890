use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// Longest duration an item may have: one leap year
pub const MAX_DURATION_HOURS: f64 = 24.0 * 366.0;

/// Get the current date in local timezone
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Kind of activity a planned item represents
///
/// The known categories get a fixed calendar colour. Anything else the user
/// types is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Sightseeing, museums, viewpoints
    Attraction,
    /// Driving or travelling between places
    Route,
    /// Downtime, sleep, beach
    Rest,
    /// Meals and restaurants
    Food,
    /// Evenings out
    Party,
    /// Hiking, kayaking, anything active
    Sport,
    /// Free-form label
    Other(String),
}

impl Category {
    /// Labels accepted for the built-in categories
    pub const KNOWN: [&'static str; 6] = ["Attraction", "Route", "Rest", "Food", "Party", "Sport"];

    /// Calendar colour for this category (hex RGB)
    pub fn color(&self) -> &'static str {
        match self {
            Category::Attraction => "#66BB6A",
            Category::Route => "#42A5F5",
            Category::Rest => "#FFEE58",
            Category::Food => "#FFA726",
            Category::Party => "#AB47BC",
            Category::Sport => "#EF5350",
            Category::Other(_) => "#BDBDBD",
        }
    }

    /// Single character used in the text calendar
    pub fn marker(&self) -> char {
        match self {
            Category::Attraction => 'A',
            Category::Route => 'R',
            Category::Rest => 'z',
            Category::Food => 'F',
            Category::Party => 'P',
            Category::Sport => 'S',
            Category::Other(_) => '*',
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Attraction => f.write_str("Attraction"),
            Category::Route => f.write_str("Route"),
            Category::Rest => f.write_str("Rest"),
            Category::Food => f.write_str("Food"),
            Category::Party => f.write_str("Party"),
            Category::Sport => f.write_str("Sport"),
            Category::Other(label) => f.write_str(label),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Polish labels come from data files written by the first versions of the planner
        match trimmed.to_lowercase().as_str() {
            "" => Err("Category must not be empty".to_string()),
            "attraction" | "atrakcja" => Ok(Category::Attraction),
            "route" | "trasa" => Ok(Category::Route),
            "rest" | "odpoczynek" => Ok(Category::Rest),
            "food" | "jedzenie" => Ok(Category::Food),
            "party" | "impreza" => Ok(Category::Party),
            "sport" => Ok(Category::Sport),
            _ => Ok(Category::Other(trimmed.to_string())),
        }
    }
}

/// How an item's cost is divided among participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CostType {
    /// Every participant pays the full amount
    #[default]
    Individual,
    /// The amount is a group total, split equally
    Shared,
    /// Transport fuel: a group total, split equally, reported on its own line
    Fuel,
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostType::Individual => f.write_str("Individual"),
            CostType::Shared => f.write_str("Shared"),
            CostType::Fuel => f.write_str("Fuel"),
        }
    }
}

impl FromStr for CostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "individual" | "indywidualny" => Ok(CostType::Individual),
            "shared" | "wspólny" | "wspolny" => Ok(CostType::Shared),
            "fuel" | "paliwo" => Ok(CostType::Fuel),
            _ => Err(format!(
                "Invalid cost type '{}'. Valid options are: Individual, Shared, Fuel",
                s
            )),
        }
    }
}

/// A candidate activity, scheduled on the calendar or waiting in the idea pool
///
/// `title` works as the lookup key. Nothing in the data file guarantees it is
/// unique, so lookups pick the first match.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedItem {
    /// Display name and lookup key
    pub title: String,
    /// Kind of activity
    pub category: Category,
    /// Planned length in hours
    pub duration_hours: f64,
    /// Start time, `None` while unscheduled
    pub start: Option<NaiveDateTime>,
    /// End time, `None` while unscheduled
    pub end: Option<NaiveDateTime>,
    /// Scheduled flag as stored in the table
    pub scheduled: bool,
    /// Cost amount, interpreted according to `cost_type`
    pub cost: f64,
    /// How the cost is split
    pub cost_type: CostType,
}

impl PlannedItem {
    /// Create an unscheduled item with no cost
    pub fn new(title: impl Into<String>, category: Category, duration_hours: f64) -> Self {
        Self {
            title: title.into(),
            category,
            duration_hours,
            start: None,
            end: None,
            scheduled: false,
            cost: 0.0,
            cost_type: CostType::Individual,
        }
    }

    /// Builder-style cost setter
    pub fn with_cost(mut self, cost: f64, cost_type: CostType) -> Self {
        self.cost = cost;
        self.cost_type = cost_type;
        self
    }

    /// True when the item is flagged scheduled and actually has a start time
    pub fn is_scheduled(&self) -> bool {
        self.scheduled && self.start.is_some()
    }

    /// Duration as a chrono `Duration`, rounded to whole minutes
    ///
    /// Out-of-range hours are clamped to `0..=MAX_DURATION_HOURS`.
    pub fn duration(&self) -> Duration {
        let hours = if self.duration_hours.is_finite() {
            self.duration_hours.clamp(0.0, MAX_DURATION_HOURS)
        } else {
            0.0
        };
        Duration::try_minutes((hours * 60.0).round() as i64).unwrap_or_else(Duration::zero)
    }

    /// Place the item on the calendar starting at `start`
    ///
    /// An end past the last representable timestamp is left unset.
    pub fn schedule_at(&mut self, start: NaiveDateTime) {
        self.start = Some(start);
        self.end = start.checked_add_signed(self.duration());
        self.scheduled = true;
    }

    /// Take the item off the calendar
    pub fn unschedule(&mut self) {
        self.start = None;
        self.end = None;
        self.scheduled = false;
    }

    /// End time derived from start and duration when the stored end is missing
    pub fn effective_end(&self) -> Option<NaiveDateTime> {
        self.end
            .or_else(|| self.start.and_then(|s| s.checked_add_signed(self.duration())))
    }
}
