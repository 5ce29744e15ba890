//! Trip Planner MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server for planning a
//! trip: collecting candidate activities, placing them on a day/hour calendar,
//! and splitting the costs among the people travelling.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **MCP Layer**: `TripServerHandler` - Handles MCP protocol communication
//! - **Domain Layer**: `trip`, `grid`, `costs` and `config` modules - planned
//!   items, calendar grid preparation, cost aggregation, trip settings
//! - **Persistence Layer**: `storage` module - CSV/JSON files with revision
//!   checks and optional Git sync
//!
//! # Example
//!
//! ```no_run
//! use trip_planner_mcp::TripServerHandler;
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = TripServerHandler::new("trip-data", false)?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod costs;
pub mod error;
pub mod formatting;
mod git_ops;
pub mod grid;
pub mod handlers;
pub mod logging;
pub mod storage;
pub mod trip;
pub mod validation;

use anyhow::{Context, Result};
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

// Re-export commonly used types
pub use config::{TripConfig, TripRegistry};
pub use error::TripError;
pub use storage::Storage;
pub use trip::{Category, CostType, PlannedItem, TripPlan};

/// Everything loaded for the current trip
#[derive(Debug, Clone)]
pub struct TripState {
    /// Identifier of the current trip
    pub trip_id: String,
    pub registry: TripRegistry,
    pub config: TripConfig,
    pub plan: TripPlan,
}

/// MCP Server handler for trip planning
///
/// Every tool call re-reads the data files so edits made by other people (or
/// pulled through git) are visible, mutates the state, and writes the whole
/// file back.
pub struct TripServerHandler {
    pub(crate) state: Mutex<TripState>,
    pub(crate) storage: Storage,
}

impl TripServerHandler {
    /// Create a new trip planner handler
    ///
    /// # Arguments
    /// * `data_dir` - Directory holding `trips.json` and the per-trip files
    /// * `sync_git` - Enable automatic Git synchronization
    ///
    /// # Example
    /// ```no_run
    /// # use trip_planner_mcp::TripServerHandler;
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let handler = TripServerHandler::new("trip-data", false)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(data_dir: &str, sync_git: bool) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir))?;
        let storage = Storage::new(data_dir, sync_git);
        let state = Self::load_state(&storage);
        info!(
            data_dir,
            trip = %state.trip_id,
            items = state.plan.len(),
            "trip planner ready"
        );
        Ok(Self {
            state: Mutex::new(state),
            storage,
        })
    }

    /// Load the current trip, falling back to defaults for anything unreadable
    fn load_state(storage: &Storage) -> TripState {
        if let Err(e) = storage.pull() {
            warn!(error = %e, "git pull failed, using local files");
        }
        let registry = storage.load_registry_or_default();
        let trip_id = registry.current.clone();
        let name = registry.current_name().to_string();
        let config = storage.load_config_or(&trip_id, || TripConfig {
            name,
            ..TripConfig::default()
        });
        let plan = storage.load_plan_or_default(&trip_id);
        TripState {
            trip_id,
            registry,
            config,
            plan,
        }
    }

    fn lock_state(&self) -> McpResult<MutexGuard<'_, TripState>> {
        self.state.lock().map_err(|_| {
            mcp_attr::Error::new(mcp_attr::ErrorCode::INTERNAL_ERROR)
                .with_message("Trip state is unavailable after an earlier failure", true)
        })
    }

    /// Re-read the data files and return the locked, fresh state
    pub(crate) fn refresh(&self) -> McpResult<MutexGuard<'_, TripState>> {
        let mut state = self.lock_state()?;
        *state = Self::load_state(&self.storage);
        Ok(state)
    }

    /// Copy of the current state as last loaded
    pub fn snapshot(&self) -> McpResult<TripState> {
        Ok(self.lock_state()?.clone())
    }

    /// Turn a storage result into a tool result
    ///
    /// A failed git sync still leaves the file written, so it becomes a
    /// warning appended to the tool's answer instead of an error.
    fn save_outcome(result: error::Result<()>) -> McpResult<String> {
        match result {
            Ok(()) => Ok(String::new()),
            Err(TripError::Git(e)) => {
                warn!(error = %e, "saved locally, git sync failed");
                Ok(format!("\nWarning: saved locally but git sync failed: {}", e))
            }
            Err(e) => Err(mcp_attr::Error::new(mcp_attr::ErrorCode::INTERNAL_ERROR)
                .with_message(format!("Failed to save: {}", e), true)),
        }
    }

    pub(crate) fn persist_plan(&self, state: &TripState, message: &str) -> McpResult<String> {
        Self::save_outcome(self.storage.save_plan(&state.trip_id, &state.plan, message))
    }

    pub(crate) fn persist_config(
        &self,
        trip_id: &str,
        config: &TripConfig,
        message: &str,
    ) -> McpResult<String> {
        Self::save_outcome(self.storage.save_config(trip_id, config, message))
    }

    pub(crate) fn persist_registry(
        &self,
        registry: &TripRegistry,
        message: &str,
    ) -> McpResult<String> {
        Self::save_outcome(self.storage.save_registry(registry, message))
    }
}

/// Trip planner: collect activity ideas, place them on a day/hour calendar, and split the costs.
///
/// Key concepts:
/// - **idea pool**: items not yet on the calendar (add_item puts them here)
/// - **scheduled**: items with a start time on the calendar (schedule_item)
/// - **cost types**: Individual (each person pays it), Shared and Fuel (group totals split equally)
/// - **trips**: several independent trips can coexist; one is current
///
/// Items are identified by their title.
#[mcp_server]
impl McpServer for TripServerHandler {
    /// **Capture**: Add an activity idea. It starts unscheduled in the idea pool.
    /// **Next**: schedule_item to put it on the calendar.
    #[tool]
    async fn add_item(
        &self,
        /// Title: unique name of the activity (e.g., "Old town walk")
        title: String,
        /// Category: Attraction/Route/Rest/Food/Party/Sport or any other label
        category: String,
        /// Duration in hours (e.g., 2 or 1.5)
        duration_hours: f64,
        /// Cost amount, 0 if free (optional)
        cost: Option<f64>,
        /// Cost type: Individual/Shared/Fuel, default Individual (optional)
        cost_type: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_item(title, category, duration_hours, cost, cost_type)
            .await
    }

    /// **Clarify**: Edit an item. Only the given fields change.
    #[tool]
    async fn update_item(
        &self,
        /// Title of the item to edit
        title: String,
        /// New title (optional)
        new_title: Option<String>,
        /// New category (optional)
        category: Option<String>,
        /// New duration in hours; a scheduled item's end moves accordingly (optional)
        duration_hours: Option<f64>,
        /// New cost amount (optional)
        cost: Option<f64>,
        /// New cost type: Individual/Shared/Fuel (optional)
        cost_type: Option<String>,
    ) -> McpResult<String> {
        self.handle_update_item(title, new_title, category, duration_hours, cost, cost_type)
            .await
    }

    /// **Purge**: Delete items from the idea pool for good. Unschedule calendar items first.
    #[tool]
    async fn remove_items(
        &self,
        /// Titles of the items to delete
        titles: Vec<String>,
    ) -> McpResult<String> {
        self.handle_remove_items(titles).await
    }

    /// **Plan**: Place an item on the calendar at a day and full hour.
    #[tool]
    async fn schedule_item(
        &self,
        /// Title of the item
        title: String,
        /// Day: YYYY-MM-DD within the trip
        date: String,
        /// Start hour: 0-23
        hour: u32,
    ) -> McpResult<String> {
        self.handle_schedule_item(title, date, hour).await
    }

    /// **Plan**: Take an item off the calendar, back to the idea pool.
    #[tool]
    async fn unschedule_item(
        &self,
        /// Title of the item
        title: String,
    ) -> McpResult<String> {
        self.handle_unschedule_item(title).await
    }

    /// **Review**: List items. filter=unscheduled shows the idea pool.
    #[tool]
    async fn list_items(
        &self,
        /// all/scheduled/unscheduled, default all (optional)
        filter: Option<String>,
        /// Only this category (optional)
        category: Option<String>,
        /// Only this cost type: Individual/Shared/Fuel (optional)
        cost_type: Option<String>,
    ) -> McpResult<String> {
        self.handle_list_items(filter, category, cost_type).await
    }

    /// **Review**: Day/hour calendar grid for one page of the trip.
    #[tool]
    async fn calendar(
        &self,
        /// Days from the trip start to begin the page at, default 0 (optional)
        offset: Option<u32>,
        /// Days per page, default from the trip config (optional)
        days: Option<u32>,
    ) -> McpResult<String> {
        self.handle_calendar(offset, days).await
    }

    /// **Review**: Agenda per day; events past midnight are split across days.
    #[tool]
    async fn agenda(
        &self,
        /// Only this day, YYYY-MM-DD (optional)
        date: Option<String>,
    ) -> McpResult<String> {
        self.handle_agenda(date).await
    }

    /// **Costs**: Totals per cost type, per-person share and per-category breakdown.
    #[tool]
    async fn cost_summary(
        &self,
        /// Count only scheduled items, default false (optional)
        scheduled_only: Option<bool>,
    ) -> McpResult<String> {
        self.handle_cost_summary(scheduled_only).await
    }

    /// **Trip**: Show the current trip's settings.
    #[tool]
    async fn show_trip(&self) -> McpResult<String> {
        self.handle_show_trip().await
    }

    /// **Trip**: Change the current trip's settings. Only the given fields change.
    #[tool]
    async fn configure_trip(
        &self,
        /// Trip name (optional)
        name: Option<String>,
        /// First day, YYYY-MM-DD (optional)
        start_date: Option<String>,
        /// Number of days (optional)
        num_days: Option<u32>,
        /// Number of people splitting shared costs (optional)
        participants: Option<u32>,
        /// Days per calendar page (optional)
        view_days: Option<u32>,
    ) -> McpResult<String> {
        self.handle_configure_trip(name, start_date, num_days, participants, view_days)
            .await
    }

    /// **Trips**: List all trips; the current one is marked with *.
    #[tool]
    async fn list_trips(&self) -> McpResult<String> {
        self.handle_list_trips().await
    }

    /// **Trips**: Create a new trip. Does not switch to it.
    #[tool]
    async fn create_trip(
        &self,
        /// ID: lowercase letters, digits, '-' or '_' (e.g., "alps-2026")
        id: String,
        /// Display name
        name: String,
        /// First day, YYYY-MM-DD, default today (optional)
        start_date: Option<String>,
        /// Number of days, default 14 (optional)
        num_days: Option<u32>,
        /// Number of participants, default 1 (optional)
        participants: Option<u32>,
    ) -> McpResult<String> {
        self.handle_create_trip(id, name, start_date, num_days, participants)
            .await
    }

    /// **Trips**: Make another trip the current one.
    #[tool]
    async fn switch_trip(
        &self,
        /// ID of the trip
        id: String,
    ) -> McpResult<String> {
        self.handle_switch_trip(id).await
    }
}
