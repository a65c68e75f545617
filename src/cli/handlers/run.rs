use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::cli::commands::RunArgs;
use crate::cli::output::{ErrorJson, OutputLine, render_error, render_result};
use crate::engine::{CommandError, CommandResult, Effect};
use crate::io::paths;
use crate::runtime::{Executed, Runtime};

#[derive(Serialize)]
struct RunJson<'a> {
    ok: bool,
    results: &'a [CommandResult],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorJson<'a>>,
}

/// `zen run <line>`: one command against the stored state, then flush.
/// Returns `Ok(false)` when the command itself failed.
pub fn cmd_run(args: RunArgs, data_dir: Option<&Path>) -> Result<bool, Box<dyn std::error::Error>> {
    let dir = paths::data_dir(data_dir);
    let mut runtime = Runtime::open(&dir)?;
    let line = args.line.join(" ");
    debug!(line = %line, dir = %dir.display(), "run");

    let outcome = runtime
        .execute(&line, Utc::now())
        .and_then(|executed| results_of(executed, &line));
    runtime.shutdown()?;

    let (results, error) = match &outcome {
        Ok(results) => (results.as_slice(), None),
        Err(e) => (&[][..], Some(e)),
    };

    if args.json {
        let json = RunJson {
            ok: error.is_none(),
            results,
            error: error.map(ErrorJson::from),
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        for result in results {
            print_lines(&render_result(result));
        }
        if let Some(e) = error {
            print_lines(&render_error(e));
        }
    }
    Ok(error.is_none())
}

fn results_of(executed: Executed, line: &str) -> Result<Vec<CommandResult>, CommandError> {
    match executed {
        Executed::Nothing | Executed::Effect(Effect::Quit) => Ok(Vec::new()),
        Executed::Results(results) => Ok(results),
        Executed::Effect(_) => {
            let verb = line.split_whitespace().next().unwrap_or_default();
            Err(CommandError::ExternalUnavailable(format!(
                "\"{}\" requires an interactive session. Run `zen` to start one.",
                verb
            )))
        }
    }
}

fn print_lines(lines: &[OutputLine]) {
    for line in lines {
        println!("{}", line.plain_text());
    }
}
