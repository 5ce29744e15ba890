//! Trip configuration and the trip registry.
//!
//! Both are small JSON documents stored next to the item tables. The
//! registry names every trip and points at the current one; each trip has
//! its own [`TripConfig`].

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TripError};
use crate::storage::REGISTRY_FILE_NAME;
use crate::trip::local_date_today;

/// Identifier of the trip created when no registry exists yet.
pub const DEFAULT_TRIP_ID: &str = "default";

/// Display name used when nothing else is configured.
pub const DEFAULT_TRIP_NAME: &str = "My Trip";

/// Longest trip, in days.
pub const MAX_TRIP_DAYS: u32 = 366;

/// Per-trip settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripConfig {
    /// Human readable trip name.
    #[serde(alias = "trip_name")]
    pub name: String,
    /// First day of the trip.
    pub start_date: NaiveDate,
    /// Length of the trip in days.
    #[serde(alias = "days")]
    pub num_days: u32,
    /// Number of people sharing costs.
    pub participants: u32,
    /// Days visible at once in the calendar view.
    pub view_days: u32,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TRIP_NAME.to_string(),
            start_date: local_date_today(),
            num_days: 14,
            participants: 1,
            view_days: 5,
        }
    }
}

impl TripConfig {
    /// Parse a config from JSON text. Missing keys take their defaults.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: TripConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the numeric fields are usable.
    pub fn validate(&self) -> Result<()> {
        if self.num_days == 0 {
            return Err(TripError::invalid_config("num_days must be at least 1"));
        }
        if self.participants == 0 {
            return Err(TripError::invalid_config("participants must be at least 1"));
        }
        if self.view_days == 0 {
            return Err(TripError::invalid_config("view_days must be at least 1"));
        }
        if self.num_days > MAX_TRIP_DAYS {
            return Err(TripError::invalid_config(format!(
                "num_days must be at most {}",
                MAX_TRIP_DAYS
            )));
        }
        if self.view_days > MAX_TRIP_DAYS {
            return Err(TripError::invalid_config(format!(
                "view_days must be at most {}",
                MAX_TRIP_DAYS
            )));
        }
        if self
            .start_date
            .checked_add_days(Days::new(u64::from(self.num_days)))
            .is_none()
        {
            return Err(TripError::invalid_config(format!(
                "a {}-day trip starting {} runs past the last supported date",
                self.num_days, self.start_date
            )));
        }
        Ok(())
    }

    /// The day after the last trip day.
    ///
    /// Saturates at `NaiveDate::MAX` for configs that never went through
    /// `validate`.
    pub fn end_date(&self) -> NaiveDate {
        self.start_date
            .checked_add_days(Days::new(u64::from(self.num_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Whether an item may be scheduled on `date`.
    ///
    /// The range is inclusive of `end_date()` so the departure day can still
    /// hold the drive home.
    pub fn is_schedulable(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date()
    }

    /// Days shown per calendar page, never more than the trip length.
    pub fn effective_view_days(&self) -> u32 {
        self.view_days.min(self.num_days).max(1)
    }

    /// Largest calendar offset that still shows a full page.
    pub fn max_offset(&self) -> u32 {
        self.num_days.saturating_sub(self.effective_view_days())
    }

    /// Participant count used for splitting, never zero.
    pub fn split_count(&self) -> u32 {
        self.participants.max(1)
    }
}

/// Mapping of trip identifiers to display names plus the current trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripRegistry {
    /// Identifier of the active trip.
    pub current: String,
    /// Trip identifier to display name.
    pub trips: BTreeMap<String, String>,
}

impl Default for TripRegistry {
    fn default() -> Self {
        let mut trips = BTreeMap::new();
        trips.insert(DEFAULT_TRIP_ID.to_string(), DEFAULT_TRIP_NAME.to_string());
        Self {
            current: DEFAULT_TRIP_ID.to_string(),
            trips,
        }
    }
}

impl TripRegistry {
    /// Parse a registry from JSON text.
    ///
    /// Entries with unusable ids are dropped. A registry whose current
    /// pointer is dangling is repaired to point at the first known trip.
    pub fn from_json(content: &str) -> Result<Self> {
        let mut registry: TripRegistry = serde_json::from_str(content)?;
        registry
            .trips
            .retain(|id, _| Self::validate_trip_id(id).is_ok());
        if registry.trips.is_empty() {
            return Ok(TripRegistry::default());
        }
        if !registry.trips.contains_key(&registry.current)
            && let Some(first) = registry.trips.keys().next()
        {
            registry.current = first.clone();
        }
        Ok(registry)
    }

    /// Serialize the registry as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check a trip identifier is safe to use as a file stem.
    pub fn validate_trip_id(id: &str) -> Result<()> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(TripError::invalid_config(format!(
                "trip id '{}' must be non-empty and use only a-z, 0-9, '-' or '_'",
                id
            )));
        }
        // <id>.json would be the registry file itself
        if REGISTRY_FILE_NAME.strip_suffix(".json") == Some(id) {
            return Err(TripError::invalid_config(format!(
                "trip id '{}' is reserved",
                id
            )));
        }
        Ok(())
    }

    /// Register a new trip. Does not change the current trip.
    pub fn create(&mut self, id: &str, name: &str) -> Result<()> {
        Self::validate_trip_id(id)?;
        if self.trips.contains_key(id) {
            return Err(TripError::invalid_config(format!(
                "trip '{}' already exists",
                id
            )));
        }
        self.trips.insert(id.to_string(), name.to_string());
        Ok(())
    }

    /// Make `id` the current trip.
    pub fn switch(&mut self, id: &str) -> Result<()> {
        if !self.trips.contains_key(id) {
            return Err(TripError::UnknownTrip(id.to_string()));
        }
        self.current = id.to_string();
        Ok(())
    }

    /// Rename an existing trip.
    pub fn rename(&mut self, id: &str, name: &str) -> Result<()> {
        let entry = self
            .trips
            .get_mut(id)
            .ok_or_else(|| TripError::UnknownTrip(id.to_string()))?;
        *entry = name.to_string();
        Ok(())
    }

    /// Display name of the current trip.
    pub fn current_name(&self) -> &str {
        self.trips
            .get(&self.current)
            .map(String::as_str)
            .unwrap_or(DEFAULT_TRIP_NAME)
    }

    /// Trips in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.trips.iter()
    }
}
