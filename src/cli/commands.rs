use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "zen", about = concat!("zen v", env!("CARGO_PKG_VERSION"), " - a quiet terminal for your to-do list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Keep data in this directory instead of $ZEN_HOME or ~/.local/share/zen
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one command line and print its result
    Run(RunArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// The command line, e.g. `add buy milk; call mom @home`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub line: Vec<String>,
}
