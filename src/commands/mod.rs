mod analyze;
mod compare;
mod trace;
mod utils;

use crate::cli::{Cli, Commands, GlobalOptions};
use vectorize::{VectorizeError, VectorizeResult};

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> VectorizeResult<()> {
    let Cli { global, command } = cli;
    configure_threads(&global)?;
    dispatch(command)
}

/// Size the global rayon pool used by per-color tracing.
fn configure_threads(global: &GlobalOptions) -> VectorizeResult<()> {
    let Some(threads) = global.threads else {
        return Ok(());
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|err| VectorizeError::InvalidOption(format!("thread pool: {err}")))
}

/// Dispatch the command to the appropriate handler.
fn dispatch(command: Commands) -> VectorizeResult<()> {
    match command {
        Commands::Trace(cmd) => trace::run(cmd),
        Commands::Analyze(cmd) => analyze::run(cmd),
        Commands::Compare(cmd) => compare::run(cmd),
    }
}
