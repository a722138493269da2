//! Permit Engine — Demo CLI
//!
//! Runs one or all of the three authorization demo scenarios.  Each scenario
//! wires real permit components (action catalog, grant store, role directory,
//! resolver) together and prints every authorization decision.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- end-to-end
//!   cargo run -p demo -- scope-union
//!   cargo run -p demo -- owner-bypass

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use permit_contracts::error::PermitResult;

mod scenarios;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Permit — role-based bitwise authorization demo.
///
/// Each subcommand runs one or all of the authorization scenarios against a
/// user CRUD action catalog with the four built-in roles.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Permit authorization engine demo",
    long_about = "Runs permit demo scenarios showing role grant resolution,\n\
                  resource-wide and per-instance scopes, and owner checks."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three scenarios in sequence.
    RunAll,
    /// Scenario 1: the reference grant set, checked end to end.
    EndToEnd,
    /// Scenario 2: resource-wide and per-instance grants union.
    ScopeUnion,
    /// Scenario 3: owner grants require the explicit owner check.
    OwnerBypass,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::EndToEnd => scenarios::end_to_end(),
        Command::ScopeUnion => scenarios::scope_union(),
        Command::OwnerBypass => scenarios::owner_bypass(),
    };

    match result {
        Ok(()) => {
            println!();
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_all() -> PermitResult<()> {
    scenarios::end_to_end()?;
    scenarios::scope_union()?;
    scenarios::owner_bypass()?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Permit — Role-based Bitwise Authorization");
    println!("=========================================");
    println!();
    println!("Resolution per check:");
    println!("  [1] Action name resolved to its bit in the resource catalog");
    println!("  [2] Role set adjusted: Owner role only enters on an owner check");
    println!("  [3] One grant query: scope targets OR owner clause, mask contains bit");
    println!();
}
