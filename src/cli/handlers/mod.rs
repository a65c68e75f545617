mod run;
pub use run::cmd_run;

use crate::cli::commands::*;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run a non-interactive subcommand. Returns whether it succeeded.
pub fn dispatch(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    match cli.command {
        None => Err("no subcommand given; run `zen` for the interactive terminal".into()),
        Some(Commands::Run(args)) => cmd_run(args, cli.data_dir.as_deref()),
    }
}
