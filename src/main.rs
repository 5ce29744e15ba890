//! Trip Planner MCP Server - Main Entry Point
//!
//! The actual implementation is in the `trip_planner_mcp` library.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use mcp_attr::server::serve_stdio;
use trip_planner_mcp::TripServerHandler;
use trip_planner_mcp::logging::{Verbosity, init_logging};

/// Trip Planner MCP Server - plan activities, a day/hour calendar and shared costs via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding trips.json and the per-trip CSV/JSON files
    data_dir: String,

    /// Enable git synchronization on save
    #[arg(long)]
    sync_git: bool,

    /// Log more (-v info, -vv trace); logs go to stderr
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let args = Args::parse();
    init_logging(Verbosity::from_flags(args.quiet, args.verbose));

    let handler = TripServerHandler::new(&args.data_dir, args.sync_git)?;
    serve_stdio(handler).await?;
    Ok(())
}
