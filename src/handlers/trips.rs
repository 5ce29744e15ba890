//! Trip registry and trip configuration handlers

use crate::TripServerHandler;
use crate::config::{TripConfig, TripRegistry};
use crate::formatting;
use crate::trip::local_date_today;
use crate::validation;
use chrono::NaiveDate;
use mcp_attr::{Result as McpResult, bail_public};
use tracing::info;

impl TripServerHandler {
    /// Show the current trip's configuration.
    pub async fn handle_show_trip(&self) -> McpResult<String> {
        let state = self.refresh()?;
        Ok(formatting::format_trip(&state.trip_id, &state.config))
    }

    /// Change the current trip's name, dates, participant count or calendar page width.
    pub async fn handle_configure_trip(
        &self,
        name: Option<String>,
        start_date: Option<String>,
        num_days: Option<u32>,
        participants: Option<u32>,
        view_days: Option<u32>,
    ) -> McpResult<String> {
        let name = name.as_deref().map(validation::parse_title).transpose()?;
        let start_date = start_date
            .as_deref()
            .map(validation::parse_date)
            .transpose()?;

        let mut state = self.refresh()?;
        let mut config = state.config.clone();

        if let Some(ref name) = name {
            config.name = name.clone();
        }
        if let Some(date) = start_date {
            config.start_date = date;
        }
        if let Some(days) = num_days {
            config.num_days = days;
        }
        if let Some(count) = participants {
            config.participants = count;
        }
        if let Some(days) = view_days {
            config.view_days = days;
        }
        config
            .validate()
            .map_err(|e| validation::invalid_params(e.to_string()))?;

        let trip_id = state.trip_id.clone();
        let mut note = self.persist_config(&trip_id, &config, &format!("Configure trip {}", trip_id))?;

        if let Some(name) = name
            && state.registry.trips.get(&trip_id) != Some(&name)
        {
            let mut registry = state.registry.clone();
            if registry.rename(&trip_id, &name).is_ok() {
                note.push_str(&self.persist_registry(&registry, &format!("Rename trip {}", trip_id))?);
                state.registry = registry;
            }
        }

        let outside = state
            .plan
            .scheduled()
            .iter()
            .filter(|i| i.start.is_some_and(|s| !config.is_schedulable(s.date())))
            .count();
        state.config = config;
        info!(trip = %trip_id, "trip configured");

        let mut result = formatting::format_trip(&trip_id, &state.config);
        if outside > 0 {
            result.push_str(&format!(
                "Warning: {} scheduled item(s) now fall outside the trip dates\n",
                outside
            ));
        }
        result.push_str(&note);
        Ok(result)
    }

    /// List every trip, marking the current one.
    pub async fn handle_list_trips(&self) -> McpResult<String> {
        let state = self.refresh()?;
        Ok(formatting::format_trips(&state.registry))
    }

    /// Register a new trip with its own item table and configuration.
    /// The current trip does not change; use switch_trip for that.
    pub async fn handle_create_trip(
        &self,
        id: String,
        name: String,
        start_date: Option<String>,
        num_days: Option<u32>,
        participants: Option<u32>,
    ) -> McpResult<String> {
        let id = id.trim().to_string();
        let name = validation::parse_title(&name)?;
        let start_date: NaiveDate = match start_date {
            Some(ref s) => validation::parse_date(s)?,
            None => local_date_today(),
        };

        let state = self.refresh()?;

        let mut registry = state.registry.clone();
        registry
            .create(&id, &name)
            .map_err(|e| validation::invalid_params(e.to_string()))?;

        let defaults = TripConfig::default();
        let config = TripConfig {
            name: name.clone(),
            start_date,
            num_days: num_days.unwrap_or(defaults.num_days),
            participants: participants.unwrap_or(defaults.participants),
            view_days: defaults.view_days,
        };
        config
            .validate()
            .map_err(|e| validation::invalid_params(e.to_string()))?;

        let config_path = self.storage.config_path(&id);
        if let Err(e) = self.storage.track(&config_path) {
            drop(state);
            bail_public!(_, "Cannot prepare trip '{}': {}", id, e);
        }

        let mut note = self.persist_registry(&registry, &format!("Create trip {}", id))?;
        note.push_str(&self.persist_config(&id, &config, &format!("Configure trip {}", id))?);
        drop(state);
        info!(trip = %id, "trip created");

        Ok(format!(
            "Trip '{}' created with ID: {}. Use switch_trip to start planning it.{}",
            name, id, note
        ))
    }

    /// Make another trip the current one.
    pub async fn handle_switch_trip(&self, id: String) -> McpResult<String> {
        let id = id.trim().to_string();

        let state = self.refresh()?;
        let mut registry: TripRegistry = state.registry.clone();
        if registry.switch(&id).is_err() {
            let available: Vec<&str> = registry.trips.keys().map(String::as_str).collect();
            drop(state);
            bail_public!(
                _,
                "Trip '{}' does not exist.\nAvailable trips: {}",
                id,
                available.join(", ")
            );
        }

        let note = self.persist_registry(&registry, &format!("Switch to trip {}", id))?;
        drop(state);

        let state = self.refresh()?;
        info!(trip = %state.trip_id, "switched trip");
        Ok(format!(
            "Switched to '{}'\n{}{}",
            registry.current_name(),
            formatting::format_trip(&state.trip_id, &state.config),
            note
        ))
    }
}
