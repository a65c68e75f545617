use crate::model::config::is_known_theme;
use crate::ops::store::{Listing, Removal, parse_id};
use crate::ops::summary::zenfetch_rows;
use crate::parse::blob::{ExportBlob, decode_blob, encode_blob};

use super::error::CommandError;
use super::registry::{CommandEngine, Context};
use super::result::{CommandResult, Effect, Reply};

type HandlerResult = Result<Reply, CommandError>;

/// Label used for `focus` when no task is open
pub const DEFAULT_FOCUS_LABEL: &str = "DEEP WORK";

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

pub fn add(_: &CommandEngine, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
    let added = ctx.store.add(args)?;
    let names: Vec<String> = added
        .iter()
        .map(|t| match t.priority_label() {
            label if label.is_empty() => t.text.clone(),
            label => format!("{} {}", t.text, label),
        })
        .collect();
    Ok(CommandResult::success(format!("Task(s) added: \"{}\"", names.join("\", \""))).into())
}

pub fn list(_: &CommandEngine, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
    let result = match ctx.store.list(args) {
        Listing::Tasks { tag, tasks } => CommandResult::Tasks {
            title: tag.map(|t| format!("TASKS [{}]", t)),
            tasks,
        },
        Listing::Tags(tags) => CommandResult::Tags { tags },
        Listing::Empty(message) => CommandResult::info(message),
    };
    Ok(result.into())
}

pub fn done(_: &CommandEngine, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
    ctx.store.done(args, ctx.now)?;
    Ok(CommandResult::success("Dopamine released. Task completed.").into())
}

pub fn edit(_: &CommandEngine, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
    let task = ctx.store.edit(args)?;
    Ok(CommandResult::success(format!("Task {} updated.", task.id)).into())
}

pub fn remove(_: &CommandEngine, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
    let result = match ctx.store.remove(args, ctx.now)? {
        Removal::Cleared(_) => CommandResult::success("Cognitive matrix cleared."),
        Removal::Archived(n) => {
            CommandResult::success(format!("Archived {} completed tasks. Focus restored.", n))
        }
        Removal::NothingDone => CommandResult::info("No completed tasks to remove."),
        Removal::Removed { id, .. } => CommandResult::success(format!("Task {} removed.", id)),
    };
    Ok(result.into())
}

pub fn undo(_: &CommandEngine, ctx: &mut Context<'_>, _: &str) -> HandlerResult {
    let result = if ctx.store.undo() {
        CommandResult::success("Time loop closed. Last change reverted.")
    } else {
        CommandResult::info("Nowhere to return to.")
    };
    Ok(result.into())
}

pub fn memo(_: &CommandEngine, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
    let (sub, rest) = match args.split_once(char::is_whitespace) {
        Some((sub, rest)) => (sub, rest.trim()),
        None => (args, ""),
    };
    let result = match sub.to_lowercase().as_str() {
        "add" => {
            ctx.store.add_memo(rest, ctx.now)?;
            CommandResult::success("Memo saved.")
        }
        "" | "list" => {
            let memos = ctx.store.memos_newest_first();
            if memos.is_empty() {
                CommandResult::info("No memos yet.")
            } else {
                CommandResult::Memos { memos }
            }
        }
        "clear" => {
            let count = ctx.store.clear_memos();
            CommandResult::success(format!("{} memo(s) cleared.", count))
        }
        _ => {
            return Err(CommandError::Validation(
                "Usage: memo [add <text> | list | clear]".into(),
            ));
        }
    };
    Ok(result.into())
}

pub fn archive(_: &CommandEngine, ctx: &mut Context<'_>, _: &str) -> HandlerResult {
    let archived = ctx.store.archive();
    if archived.is_empty() {
        return Ok(CommandResult::info("Archive is empty.").into());
    }
    Ok(CommandResult::Tasks {
        title: Some(format!("ARCHIVE ({})", archived.len())),
        tasks: archived.to_vec(),
    }
    .into())
}

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

pub fn focus(_: &CommandEngine, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
    let mut tokens = args.split_whitespace();
    let minutes = match tokens.next() {
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| CommandError::Validation("Specify valid minutes (e.g., focus 25).".into()))?,
        None => ctx.config.timers.focus_minutes,
    };

    let task = match tokens.next() {
        Some(raw) => parse_id(raw).ok().and_then(|id| ctx.store.find(id)),
        None => ctx.store.first_open(),
    };
    let label = task
        .map(|t| t.text.clone())
        .unwrap_or_else(|| DEFAULT_FOCUS_LABEL.to_string());

    Ok(Effect::Focus { minutes, label }.into())
}

pub fn take_break(_: &CommandEngine, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
    let minutes = args
        .split_whitespace()
        .next()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|m| *m > 0)
        .unwrap_or(ctx.config.timers.break_minutes);
    Ok(Effect::Break { minutes }.into())
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

pub fn theme(_: &CommandEngine, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
    if args.is_empty() {
        return Ok(Effect::ThemePicker.into());
    }
    let name = args.to_lowercase();
    if !is_known_theme(&name) {
        return Err(CommandError::Validation(
            "Unknown theme. Try \"theme\" to select one.".into(),
        ));
    }
    ctx.session.set_theme(&name);
    Ok(CommandResult::success(format!("Theme changed to \"{}\".", name)).into())
}

pub fn sound(_: &CommandEngine, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
    let result = match args.to_lowercase().as_str() {
        "on" => {
            ctx.session.set_sound(true);
            CommandResult::success("Audio module activated.")
        }
        "off" => {
            ctx.session.set_sound(false);
            CommandResult::success("Audio module deactivated (silent mode).")
        }
        _ => CommandResult::Text {
            title: None,
            lines: vec![
                format!("Sound is currently {}.", on_off(ctx.session.sound_enabled)),
                "Use \"sound on\" or \"sound off\".".into(),
            ],
        },
    };
    Ok(result.into())
}

pub fn notify(_: &CommandEngine, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
    let enable = match args.to_lowercase().as_str() {
        "on" => true,
        "off" => false,
        "" => !ctx.session.notifications_enabled,
        _ => {
            return Err(CommandError::Validation("Usage: notify [on|off]".into()));
        }
    };
    ctx.session.set_notifications(enable);
    let verb = if enable { "enabled" } else { "disabled" };
    Ok(CommandResult::success(format!(
        "Notifications {}. Status: {}",
        verb,
        on_off(enable)
    ))
    .into())
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

pub fn login(_: &CommandEngine, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
    if let Some(identity) = &ctx.session.identity {
        return Ok(CommandResult::info(format!("Already logged in as {}", identity.email)).into());
    }
    let email = match (args.is_empty(), &ctx.config.sync.email) {
        (false, _) => args.to_string(),
        (true, Some(email)) => email.clone(),
        (true, None) => {
            return Err(CommandError::Validation("Usage: login <email>".into()));
        }
    };
    if !email.contains('@') {
        return Err(CommandError::Validation(format!(
            "\"{}\" does not look like an email address.",
            email
        )));
    }
    Ok(Effect::Login { email }.into())
}

pub fn logout(_: &CommandEngine, ctx: &mut Context<'_>, _: &str) -> HandlerResult {
    if ctx.session.identity.is_none() {
        return Ok(CommandResult::info("Not logged in.").into());
    }
    Ok(Effect::Logout.into())
}

pub fn sync(_: &CommandEngine, ctx: &mut Context<'_>, _: &str) -> HandlerResult {
    if ctx.session.identity.is_none() {
        return Err(CommandError::ExternalUnavailable(
            "Not logged in. Use \"login\" first.".into(),
        ));
    }
    Ok(Effect::Sync.into())
}

pub fn whoami(_: &CommandEngine, ctx: &mut Context<'_>, _: &str) -> HandlerResult {
    let lines = match &ctx.session.identity {
        Some(identity) => vec![
            format!("Logged in as: {}", identity.email),
            format!("UID: {}", identity.uid),
        ],
        None => vec!["Guest (Local Mode)".to_string()],
    };
    Ok(CommandResult::Text { title: None, lines }.into())
}

// ---------------------------------------------------------------------------
// Insight
// ---------------------------------------------------------------------------

pub fn stats(_: &CommandEngine, ctx: &mut Context<'_>, _: &str) -> HandlerResult {
    let stats = ctx.store.stats();
    Ok(CommandResult::Summary {
        title: "STATISTICS".into(),
        rows: vec![
            ("Total completed tasks".into(), stats.total_completed.to_string()),
            ("Currently in list".into(), stats.in_list.to_string()),
        ],
    }
    .into())
}

pub fn review(_: &CommandEngine, ctx: &mut Context<'_>, _: &str) -> HandlerResult {
    let tasks = ctx.store.review(ctx.now);
    if tasks.is_empty() {
        return Ok(CommandResult::info(
            "No tasks completed in the last 24 hours. Get back to work.",
        )
        .into());
    }
    Ok(CommandResult::Review { tasks }.into())
}

pub fn zenfetch(_: &CommandEngine, ctx: &mut Context<'_>, _: &str) -> HandlerResult {
    Ok(CommandResult::Summary {
        title: "ZENFETCH".into(),
        rows: zenfetch_rows(ctx.store, ctx.session),
    }
    .into())
}

pub fn history(_: &CommandEngine, ctx: &mut Context<'_>, _: &str) -> HandlerResult {
    let entries = ctx.session.history.entries();
    if entries.is_empty() {
        return Ok(CommandResult::info("History is empty.").into());
    }
    let width = entries.len().to_string().len();
    let lines = entries
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}  {}", i + 1, line, width = width))
        .collect();
    Ok(CommandResult::Text {
        title: Some("HISTORY".into()),
        lines,
    }
    .into())
}

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

pub fn export(_: &CommandEngine, ctx: &mut Context<'_>, _: &str) -> HandlerResult {
    let blob = ExportBlob::new(
        ctx.store.tasks().to_vec(),
        &ctx.session.theme,
        ctx.store.total_completed(),
    );
    let code = encode_blob(&blob)
        .map_err(|e| CommandError::Validation(format!("Export failed: {}", e)))?;
    Ok(CommandResult::Text {
        title: Some("DATA EXPORT".into()),
        lines: vec![
            "Copy the following code:".into(),
            String::new(),
            code,
            String::new(),
            "To restore use: import <code>".into(),
        ],
    }
    .into())
}

pub fn import(_: &CommandEngine, ctx: &mut Context<'_>, args: &str) -> HandlerResult {
    if args.is_empty() {
        return Err(CommandError::Validation(
            "Missing import code. Usage: import <code>".into(),
        ));
    }
    let blob = decode_blob(args)?;
    let count = ctx.store.import(blob.tasks, blob.total_completed);
    if let Some(theme) = blob.theme.filter(|t| is_known_theme(t)) {
        ctx.session.set_theme(&theme);
    }
    Ok(CommandResult::success(format!(
        "Data restored from import. Loaded {} tasks.",
        count
    ))
    .into())
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

pub fn clear(_: &CommandEngine, _: &mut Context<'_>, _: &str) -> HandlerResult {
    Ok(Effect::Clear.into())
}

pub fn help(engine: &CommandEngine, _: &mut Context<'_>, _: &str) -> HandlerResult {
    Ok(engine.help().into())
}

pub fn exit(_: &CommandEngine, _: &mut Context<'_>, _: &str) -> HandlerResult {
    Ok(Effect::Quit.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::result::Level;
    use crate::model::config::ZenConfig;
    use crate::model::session::{Identity, Session};
    use crate::model::task::Task;
    use crate::ops::store::TaskStore;
    use chrono::{DateTime, TimeZone, Utc};

    struct Fixture {
        engine: CommandEngine,
        store: TaskStore,
        session: Session,
        config: ZenConfig,
        now: DateTime<Utc>,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                engine: CommandEngine::new(),
                store: TaskStore::new(),
                session: Session::new("green".into(), 50),
                config: ZenConfig::default(),
                now: Utc.with_ymd_and_hms(2025, 5, 14, 9, 30, 0).unwrap(),
            }
        }

        fn run(&mut self, line: &str) -> Result<Reply, CommandError> {
            let mut ctx = Context {
                store: &mut self.store,
                session: &mut self.session,
                config: &self.config,
                now: self.now,
            };
            self.engine
                .dispatch(line, &mut ctx)
                .map(|r| r.expect("non-blank line"))
        }

        fn message(&mut self, line: &str) -> (Level, String) {
            match self.run(line) {
                Ok(Reply::Result(CommandResult::Message { level, text })) => (level, text),
                other => panic!("expected message for {:?}, got {:?}", line, other),
            }
        }

        fn effect(&mut self, line: &str) -> Effect {
            match self.run(line) {
                Ok(Reply::Effect(effect)) => effect,
                other => panic!("expected effect for {:?}, got {:?}", line, other),
            }
        }
    }

    #[test]
    fn add_reports_texts_with_priority() {
        let mut fx = Fixture::new();
        let (level, text) = fx.message("add !! urgent; plain");
        assert_eq!(level, Level::Success);
        assert_eq!(text, "Task(s) added: \"urgent [P2]\", \"plain\"");
    }

    #[test]
    fn list_tag_title() {
        let mut fx = Fixture::new();
        fx.run("add call @mom; fix sink").unwrap();
        let Ok(Reply::Result(CommandResult::Tasks { title, tasks })) = fx.run("list @mom") else {
            panic!("expected tasks");
        };
        assert_eq!(title.as_deref(), Some("TASKS [@mom]"));
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn empty_list_is_info() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.message("list"),
            (Level::Info, "Void. No tasks available.".into())
        );
    }

    #[test]
    fn task_lifecycle_messages() {
        let mut fx = Fixture::new();
        fx.run("add a; b").unwrap();
        assert_eq!(fx.message("done 1").1, "Dopamine released. Task completed.");
        assert_eq!(fx.message("edit 2 bee").1, "Task 2 updated.");
        assert_eq!(
            fx.message("rm done").1,
            "Archived 1 completed tasks. Focus restored."
        );
        assert_eq!(
            fx.message("rm done"),
            (Level::Info, "No completed tasks to remove.".into())
        );
        assert_eq!(fx.message("rm 1").1, "Task 1 removed.");
        assert_eq!(fx.message("undo").1, "Time loop closed. Last change reverted.");
        assert_eq!(fx.message("undo"), (Level::Info, "Nowhere to return to.".into()));
        assert_eq!(fx.message("rm all").1, "Cognitive matrix cleared.");
    }

    #[test]
    fn errors_propagate_with_kind() {
        let mut fx = Fixture::new();
        fx.run("add a").unwrap();
        assert!(matches!(fx.run("done 9"), Err(CommandError::NotFound(_))));
        assert!(matches!(fx.run("done x"), Err(CommandError::Validation(_))));
        assert!(matches!(fx.run("add"), Err(CommandError::Validation(_))));
        assert!(matches!(fx.run("rm nope"), Err(CommandError::Validation(_))));
    }

    #[test]
    fn memo_subcommands() {
        let mut fx = Fixture::new();
        assert_eq!(fx.message("memo"), (Level::Info, "No memos yet.".into()));
        fx.run("memo add remember the milk").unwrap();
        let Ok(Reply::Result(CommandResult::Memos { memos })) = fx.run("memo list") else {
            panic!("expected memos");
        };
        assert_eq!(memos[0].text, "remember the milk");
        assert!(matches!(fx.run("memo add"), Err(CommandError::Validation(_))));
        assert!(matches!(fx.run("memo frob"), Err(CommandError::Validation(_))));
        assert_eq!(fx.message("memo clear").1, "1 memo(s) cleared.");
    }

    #[test]
    fn focus_defaults_and_labels() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.effect("focus"),
            Effect::Focus {
                minutes: 25,
                label: DEFAULT_FOCUS_LABEL.into()
            }
        );

        fx.run("add write report; read paper").unwrap();
        fx.run("done 1").unwrap();
        assert_eq!(
            fx.effect("focus 10"),
            Effect::Focus {
                minutes: 10,
                label: "read paper".into()
            }
        );
        assert_eq!(
            fx.effect("focus 15 1"),
            Effect::Focus {
                minutes: 15,
                label: "write report".into()
            }
        );
        assert_eq!(
            fx.effect("focus 15 9"),
            Effect::Focus {
                minutes: 15,
                label: DEFAULT_FOCUS_LABEL.into()
            }
        );
    }

    #[test]
    fn focus_rejects_bad_minutes() {
        let mut fx = Fixture::new();
        for line in ["focus 0", "focus abc", "focus -5"] {
            let err = fx.run(line).unwrap_err();
            assert_eq!(err.to_string(), "Specify valid minutes (e.g., focus 25).");
        }
    }

    #[test]
    fn break_falls_back_to_default() {
        let mut fx = Fixture::new();
        assert_eq!(fx.effect("break"), Effect::Break { minutes: 5 });
        assert_eq!(fx.effect("break 3"), Effect::Break { minutes: 3 });
        assert_eq!(fx.effect("break soon"), Effect::Break { minutes: 5 });
        assert_eq!(fx.effect("break 0"), Effect::Break { minutes: 5 });
    }

    #[test]
    fn config_drives_timer_defaults() {
        let mut fx = Fixture::new();
        fx.config.timers.focus_minutes = 50;
        fx.config.timers.break_minutes = 10;
        assert!(matches!(fx.effect("focus"), Effect::Focus { minutes: 50, .. }));
        assert_eq!(fx.effect("break"), Effect::Break { minutes: 10 });
    }

    #[test]
    fn theme_by_name_and_picker() {
        let mut fx = Fixture::new();
        assert_eq!(fx.effect("theme"), Effect::ThemePicker);
        assert_eq!(fx.message("theme Amber").1, "Theme changed to \"amber\".");
        assert_eq!(fx.session.theme, "amber");
        assert!(fx.session.take_dirty());
        assert!(matches!(fx.run("theme pink"), Err(CommandError::Validation(_))));
        assert_eq!(fx.session.theme, "amber");
    }

    #[test]
    fn sound_and_notify_toggles() {
        let mut fx = Fixture::new();
        fx.message("sound on");
        assert!(fx.session.sound_enabled);
        assert!(fx.session.take_dirty());
        let Ok(Reply::Result(CommandResult::Text { lines, .. })) = fx.run("sound") else {
            panic!("expected status text");
        };
        assert_eq!(lines[0], "Sound is currently ON.");

        assert_eq!(fx.message("notify").1, "Notifications enabled. Status: ON");
        assert_eq!(fx.message("notify off").1, "Notifications disabled. Status: OFF");
        assert!(!fx.session.notifications_enabled);
    }

    #[test]
    fn login_needs_email() {
        let mut fx = Fixture::new();
        assert!(matches!(fx.run("login"), Err(CommandError::Validation(_))));
        assert!(matches!(fx.run("login nobody"), Err(CommandError::Validation(_))));
        assert_eq!(
            fx.effect("login ada@example.com"),
            Effect::Login {
                email: "ada@example.com".into()
            }
        );
        fx.config.sync.email = Some("bob@example.com".into());
        assert_eq!(
            fx.effect("login"),
            Effect::Login {
                email: "bob@example.com".into()
            }
        );
    }

    #[test]
    fn identity_dependent_commands() {
        let mut fx = Fixture::new();
        assert_eq!(fx.message("logout"), (Level::Info, "Not logged in.".into()));
        assert!(matches!(fx.run("sync"), Err(CommandError::ExternalUnavailable(_))));

        fx.session.identity = Some(Identity {
            uid: "u1".into(),
            email: "ada@example.com".into(),
        });
        assert_eq!(fx.effect("sync"), Effect::Sync);
        assert_eq!(fx.effect("logout"), Effect::Logout);
        assert_eq!(
            fx.message("login other@example.com").1,
            "Already logged in as ada@example.com"
        );
        let Ok(Reply::Result(CommandResult::Text { lines, .. })) = fx.run("whoami") else {
            panic!("expected text");
        };
        assert_eq!(lines, vec!["Logged in as: ada@example.com", "UID: u1"]);
    }

    #[test]
    fn review_empty_and_filled() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.message("review").1,
            "No tasks completed in the last 24 hours. Get back to work."
        );
        fx.run("add a").unwrap();
        fx.run("done 1").unwrap();
        let Ok(Reply::Result(CommandResult::Review { tasks })) = fx.run("review") else {
            panic!("expected review");
        };
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn history_lists_session_entries() {
        let mut fx = Fixture::new();
        assert_eq!(fx.message("history"), (Level::Info, "History is empty.".into()));
        fx.session.record_command("add a");
        fx.session.record_command("list");
        let Ok(Reply::Result(CommandResult::Text { lines, .. })) = fx.run("history") else {
            panic!("expected text");
        };
        assert_eq!(lines, vec!["1  add a", "2  list"]);
    }

    #[test]
    fn export_then_import_restores_tasks() {
        let mut fx = Fixture::new();
        fx.run("add a @x; !!! b").unwrap();
        fx.run("done 1").unwrap();
        fx.run("theme cyan").unwrap();
        let before: Vec<Task> = fx.store.tasks().to_vec();

        let Ok(Reply::Result(CommandResult::Text { lines, .. })) = fx.run("export") else {
            panic!("expected export text");
        };
        let code = lines[2].clone();

        let mut other = Fixture::new();
        assert_eq!(
            other.message(&format!("import {}", code)).1,
            "Data restored from import. Loaded 2 tasks."
        );
        assert_eq!(other.store.tasks(), before.as_slice());
        assert_eq!(other.store.total_completed(), 1);
        assert_eq!(other.session.theme, "cyan");
    }

    #[test]
    fn import_clamps_priority_beyond_three() {
        let mut loud = Task::new(1, "boom".into(), 0);
        loud.priority = 9;
        let code = encode_blob(&ExportBlob::new(vec![loud], "green", 0)).unwrap();

        let mut fx = Fixture::new();
        fx.run(&format!("import {}", code)).unwrap();
        assert_eq!(fx.store.tasks()[0].priority, 3);
        assert_eq!(fx.store.tasks()[0].priority_label(), "[P3]");
    }

    #[test]
    fn bad_import_changes_nothing() {
        let mut fx = Fixture::new();
        fx.run("add keep").unwrap();
        assert!(matches!(fx.run("import"), Err(CommandError::Validation(_))));
        assert!(matches!(fx.run("import %%%"), Err(CommandError::Decode(_))));
        assert_eq!(fx.store.tasks().len(), 1);
        assert!(fx.store.undo());
        assert!(fx.store.tasks().is_empty());
    }

    #[test]
    fn terminal_effects() {
        let mut fx = Fixture::new();
        assert_eq!(fx.effect("clear"), Effect::Clear);
        assert_eq!(fx.effect("exit"), Effect::Quit);
        assert!(matches!(
            fx.run("help"),
            Ok(Reply::Result(CommandResult::Text { .. }))
        ));
    }
}
