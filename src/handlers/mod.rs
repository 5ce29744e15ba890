//! MCP tool handlers for the trip planner server
//!
//! Each group of tools lives in its own file as an `impl TripServerHandler`
//! block; `lib.rs` wires them into the MCP server.

pub mod calendar;
pub mod costs;
pub mod items;
pub mod list;
pub mod schedule;
pub mod trips;
