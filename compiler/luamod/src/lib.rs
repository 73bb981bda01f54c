//! The `luamod` command line driver.
//!
//! Parses a [`Command`], runs it over each input file in turn and writes
//! one output per input. A file that cannot be read, decoded or written
//! is reported and skipped; the rest of the batch still runs.

mod batch;
mod command;
mod error;

use std::sync::Once;

pub use batch::{output_path, process_file, transform, FileOutcome};
pub use command::{Action, Command, USAGE};
pub use error::DriverError;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber reading `RUST_LOG`. Does nothing when
/// `RUST_LOG` is unset or on repeated calls.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
