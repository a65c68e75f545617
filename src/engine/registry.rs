use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

use crate::model::config::ZenConfig;
use crate::model::session::Session;
use crate::ops::store::TaskStore;

use super::error::CommandError;
use super::handlers;
use super::result::{CommandResult, Reply};

/// Everything a handler may read or mutate
pub struct Context<'a> {
    pub store: &'a mut TaskStore,
    pub session: &'a mut Session,
    pub config: &'a ZenConfig,
    pub now: DateTime<Utc>,
}

pub type Handler = fn(&CommandEngine, &mut Context<'_>, &str) -> Result<Reply, CommandError>;

/// Closed set of second-token completions for a verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    None,
    Fixed(&'static [&'static str]),
    /// Built-in theme names
    Themes,
    /// `tags` plus the live `@tag` set
    Tags,
}

/// One registered verb
#[derive(Clone)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub vocabulary: Vocabulary,
    /// Ring the chime when the command succeeds
    pub chime: bool,
    pub handler: Handler,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .finish()
    }
}

/// Verb registry and dispatcher
#[derive(Debug, Clone)]
pub struct CommandEngine {
    commands: IndexMap<&'static str, CommandSpec>,
}

impl Default for CommandEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandEngine {
    /// Engine with every built-in verb registered
    pub fn new() -> Self {
        let mut engine = CommandEngine::empty();
        for spec in builtin_commands() {
            engine.register(spec);
        }
        engine
    }

    pub fn empty() -> Self {
        CommandEngine {
            commands: IndexMap::new(),
        }
    }

    /// Add or replace a verb. `spec.name` must be lowercase.
    pub fn register(&mut self, spec: CommandSpec) {
        self.commands.insert(spec.name, spec);
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    /// Look up a verb, ignoring case
    pub fn lookup(&self, verb: &str) -> Option<&CommandSpec> {
        self.commands.get(verb.to_lowercase().as_str())
    }

    /// The registered command a line would run, if any
    pub fn resolve(&self, line: &str) -> Option<&CommandSpec> {
        let (verb, _) = split_verb(line)?;
        self.lookup(verb)
    }

    /// Run one line. Blank input yields `Ok(None)`.
    pub fn dispatch(
        &self,
        line: &str,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Reply>, CommandError> {
        let Some((verb, args)) = split_verb(line) else {
            return Ok(None);
        };
        let spec = self
            .lookup(verb)
            .ok_or_else(|| CommandError::CommandNotFound(verb.to_string()))?;
        debug!(verb = spec.name, args, "dispatching command");
        (spec.handler)(self, ctx, args).map(Some)
    }

    /// Help listing generated from the registry
    pub fn help(&self) -> CommandResult {
        let width = self.commands().map(|c| c.usage.len()).max().unwrap_or(0);
        let lines = self
            .commands()
            .map(|c| format!("{:<width$}  {}", c.usage, c.description, width = width))
            .collect();
        CommandResult::Text {
            title: Some("AVAILABLE COMMANDS".into()),
            lines,
        }
    }
}

/// Split a line into its verb and the trimmed rest
fn split_verb(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    })
}

fn builtin_commands() -> Vec<CommandSpec> {
    fn spec(
        name: &'static str,
        usage: &'static str,
        description: &'static str,
        handler: Handler,
    ) -> CommandSpec {
        CommandSpec {
            name,
            description,
            usage,
            vocabulary: Vocabulary::None,
            chime: false,
            handler,
        }
    }

    vec![
        // Tasks
        spec("add", "add <text> [; <text>...]", "Add task(s), prefix or suffix ! to !!! for priority", handlers::add),
        CommandSpec {
            vocabulary: Vocabulary::Tags,
            ..spec("list", "list [tags | @tag]", "Show tasks (all, tags, or by tag)", handlers::list)
        },
        CommandSpec {
            chime: true,
            ..spec("done", "done <id>", "Mark a task as completed", handlers::done)
        },
        spec("edit", "edit <id> <text>", "Rewrite a task", handlers::edit),
        CommandSpec {
            vocabulary: Vocabulary::Fixed(&["all", "done"]),
            ..spec("rm", "rm <id> | all | done", "Remove task(s); completed ones are archived", handlers::remove)
        },
        spec("undo", "undo", "Revert the last change to the task list", handlers::undo),
        CommandSpec {
            vocabulary: Vocabulary::Fixed(&["add", "list", "clear"]),
            ..spec("memo", "memo [add <text> | list | clear]", "Keep free-form notes", handlers::memo)
        },
        spec("archive", "archive", "Show archived tasks", handlers::archive),
        // Focus
        spec("focus", "focus [minutes] [task_id]", "Enter deep work mode", handlers::focus),
        spec("break", "break [minutes]", "Start a breathing break", handlers::take_break),
        // Settings
        CommandSpec {
            vocabulary: Vocabulary::Themes,
            ..spec("theme", "theme [green|amber|cyan]", "Change color scheme", handlers::theme)
        },
        CommandSpec {
            vocabulary: Vocabulary::Fixed(&["on", "off"]),
            ..spec("sound", "sound [on|off]", "Toggle sound effects", handlers::sound)
        },
        CommandSpec {
            vocabulary: Vocabulary::Fixed(&["on", "off"]),
            ..spec("notify", "notify [on|off]", "Toggle notifications", handlers::notify)
        },
        // Sync
        spec("login", "login [email]", "Sign in and sync with the remote store", handlers::login),
        spec("logout", "logout", "Disconnect and return to local mode", handlers::logout),
        spec("sync", "sync", "Push local data to the remote store", handlers::sync),
        spec("whoami", "whoami", "Show current user info", handlers::whoami),
        // Insight
        spec("stats", "stats", "Show productivity statistics", handlers::stats),
        spec("review", "review", "Show achievements from the last 24h", handlers::review),
        spec("zenfetch", "zenfetch", "System summary", handlers::zenfetch),
        spec("history", "history", "Show recent commands", handlers::history),
        // Data
        spec("export", "export", "Export tasks as a portable code", handlers::export),
        spec("import", "import <code>", "Restore tasks from an export code", handlers::import),
        // Terminal
        spec("clear", "clear", "Clear the screen", handlers::clear),
        spec("help", "help", "Show this list", handlers::help),
        spec("exit", "exit", "Leave zen", handlers::exit),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::result::Effect;

    struct Fixture {
        store: TaskStore,
        session: Session,
        config: ZenConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                store: TaskStore::new(),
                session: Session::new("green".into(), 50),
                config: ZenConfig::default(),
            }
        }

        fn run(&mut self, line: &str) -> Result<Option<Reply>, CommandError> {
            let engine = CommandEngine::new();
            let mut ctx = Context {
                store: &mut self.store,
                session: &mut self.session,
                config: &self.config,
                now: Utc::now(),
            };
            engine.dispatch(line, &mut ctx)
        }
    }

    #[test]
    fn blank_line_is_silent() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run("").unwrap(), None);
        assert_eq!(fx.run("   \t ").unwrap(), None);
    }

    #[test]
    fn unknown_verb() {
        let mut fx = Fixture::new();
        let err = fx.run("frobnicate now").unwrap_err();
        assert!(matches!(err, CommandError::CommandNotFound(ref v) if v == "frobnicate"));
    }

    #[test]
    fn verbs_are_case_insensitive() {
        let mut fx = Fixture::new();
        fx.run("ADD Buy milk").unwrap();
        assert_eq!(fx.store.tasks()[0].text, "Buy milk");
        assert_eq!(fx.run("Exit").unwrap(), Some(Reply::Effect(Effect::Quit)));
    }

    #[test]
    fn help_lists_every_registered_verb() {
        let engine = CommandEngine::new();
        let CommandResult::Text { lines, .. } = engine.help() else {
            panic!("expected text");
        };
        assert_eq!(lines.len(), engine.commands().count());
        assert!(lines.iter().any(|l| l.starts_with("rm <id> | all | done")));
    }

    #[test]
    fn resolve_finds_spec() {
        let engine = CommandEngine::new();
        assert!(engine.resolve("  DONE 3").is_some_and(|c| c.chime));
        assert!(engine.resolve("nope").is_none());
        assert!(engine.resolve("").is_none());
    }

    #[test]
    fn custom_registration() {
        fn ping(_: &CommandEngine, _: &mut Context<'_>, args: &str) -> Result<Reply, CommandError> {
            Ok(CommandResult::info(format!("pong {}", args)).into())
        }
        let mut engine = CommandEngine::empty();
        engine.register(CommandSpec {
            name: "ping",
            description: "",
            usage: "ping",
            vocabulary: Vocabulary::None,
            chime: false,
            handler: ping,
        });
        let mut fx = Fixture::new();
        let mut ctx = Context {
            store: &mut fx.store,
            session: &mut fx.session,
            config: &fx.config,
            now: Utc::now(),
        };
        assert_eq!(
            engine.dispatch("PING  x ", &mut ctx).unwrap(),
            Some(Reply::Result(CommandResult::info("pong x")))
        );
    }
}
