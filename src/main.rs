use clap::Parser;
use zen::cli::commands::Cli;
use zen::cli::handlers;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → interactive terminal
            if let Err(e) = zen::tui::run(cli.data_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            zen::logging::init_stderr();
            match handlers::dispatch(cli) {
                Ok(true) => {}
                Ok(false) => std::process::exit(1),
                Err(e) => {
                    eprintln!("error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
