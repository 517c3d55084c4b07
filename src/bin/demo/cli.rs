//! Command-line arguments for the demo harness.
//!
//! Deliberately thin: this binary exists to exercise the Context-level
//! wiring surface described in spec.md §6, not to be a stable, documented
//! CLI in its own right (see SPEC_FULL.md §6).

use structopt::StructOpt;

/// Wires up a small fleet of contexts and actors, sends a handful of pings
/// through each, then shuts down gracefully.
#[derive(Debug, StructOpt)]
#[structopt(name = "actor-rt-demo")]
pub struct Cli {
    /// Number of contexts (loop + worker thread pairs) to create. Defaults
    /// to the number of cores available.
    #[structopt(long)]
    pub contexts: Option<usize>,

    /// Number of ping events each actor sends to itself before stopping.
    #[structopt(long, default_value = "5")]
    pub pings: u64,
}
