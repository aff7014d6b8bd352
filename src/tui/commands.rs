//! Slash commands.
//!
//! Commands are thin: they validate arguments, forward to the agent or the
//! checkpoint store, and report back as system chat lines. List-shaped
//! results open a picker overlay instead of dumping text.

use crate::agent::BackgroundAgent;
use crate::checkpoint::CheckpointStore;

use super::app::{ChatRole, Picker, PickerAction, TuiApp};
use super::select::{SelectItem, SelectList};

pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "/tasks",
        usage: "/tasks",
        description: "Pick a task and view its transcript",
    },
    CommandSpec {
        name: "/task",
        usage: "/task start <prompt> | stop <id> | message <id> <text> | delete <id>",
        description: "Manage background tasks",
    },
    CommandSpec {
        name: "/resume",
        usage: "/resume [id]",
        description: "Restore a saved checkpoint",
    },
    CommandSpec {
        name: "/clear",
        usage: "/clear",
        description: "Clear the chat log",
    },
    CommandSpec {
        name: "/help",
        usage: "/help",
        description: "Show available commands",
    },
    CommandSpec {
        name: "/exit",
        usage: "/exit",
        description: "Quit",
    },
    CommandSpec {
        name: "/quit",
        usage: "/quit",
        description: "Quit",
    },
];

/// Commands whose name starts with the typed prefix.
pub fn matching_commands(prefix: &str) -> Vec<&'static CommandSpec> {
    COMMANDS
        .iter()
        .filter(|spec| spec.name.starts_with(prefix))
        .collect()
}

/// Ghost-text completion for the input bar: the rest of the unique match.
pub fn ghost_suffix(input: &str) -> Option<&'static str> {
    if !input.starts_with('/') || input.contains(' ') {
        return None;
    }
    let matches = matching_commands(input);
    match matches.as_slice() {
        [only] => only.name.strip_prefix(input).filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Run one slash command line against the app state.
pub async fn execute(
    app: &mut TuiApp,
    line: &str,
    agent: &dyn BackgroundAgent,
    store: &CheckpointStore,
) {
    let mut parts = line.splitn(2, ' ');
    let name = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or("").trim();

    match name {
        "/tasks" => open_task_picker(app, agent).await,
        "/task" => task_subcommand(app, rest, agent).await,
        "/resume" => resume(app, rest, store).await,
        "/clear" => app.chat_log.clear(),
        "/help" => help(app),
        "/exit" | "/quit" => app.should_quit = true,
        other => feedback(app, format!("Unknown command: {other}. Try /help.")),
    }
}

async fn open_task_picker(app: &mut TuiApp, agent: &dyn BackgroundAgent) {
    let tasks = match agent.list().await {
        Ok(tasks) => tasks,
        Err(err) => {
            feedback(app, format!("Could not list tasks: {err}"));
            return;
        }
    };
    if tasks.is_empty() {
        feedback(app, "No tasks yet. Start one with /task start <prompt>.");
        return;
    }
    let items = tasks
        .iter()
        .map(|t| {
            SelectItem::new(t.prompt.clone(), t.id.clone())
                .with_display(t.prompt.clone(), format!("({})", t.status.label()))
                .with_disabled(!t.status.is_running())
        })
        .collect();
    app.tasks = tasks;
    let list = SelectList::new(items)
        .with_window(app.picker_window)
        .with_scroll_arrows(app.picker_arrows);
    app.open_picker(Picker {
        title: "Tasks".into(),
        action: PickerAction::ShowTask,
        list,
    });
}

async fn task_subcommand(app: &mut TuiApp, rest: &str, agent: &dyn BackgroundAgent) {
    let mut parts = rest.splitn(2, ' ');
    let verb = parts.next().unwrap_or_default();
    let arg = parts.next().unwrap_or("").trim();

    match verb {
        "start" => {
            if arg.is_empty() {
                feedback(app, "Usage: /task start <prompt>");
                return;
            }
            match agent.start(arg).await {
                Ok(record) => feedback(app, format!("Started task {}", record.id)),
                Err(err) => feedback(app, format!("Could not start task: {err}")),
            }
        }
        "stop" => {
            if arg.is_empty() {
                feedback(app, "Usage: /task stop <id>");
                return;
            }
            match agent.stop(arg).await {
                Ok(()) => feedback(app, format!("Stopped task {arg}")),
                Err(err) => feedback(app, format!("Could not stop {arg}: {err}")),
            }
        }
        "message" => {
            let mut inner = arg.splitn(2, ' ');
            let id = inner.next().unwrap_or_default();
            let text = inner.next().unwrap_or("").trim();
            if id.is_empty() || text.is_empty() {
                feedback(app, "Usage: /task message <id> <text>");
                return;
            }
            match agent.message(id, text).await {
                Ok(()) => feedback(app, format!("Sent message to {id}")),
                Err(err) => feedback(app, format!("Could not message {id}: {err}")),
            }
        }
        "delete" => {
            if arg.is_empty() {
                feedback(app, "Usage: /task delete <id>");
                return;
            }
            match agent.delete(arg).await {
                Ok(()) => feedback(app, format!("Deleted task {arg}")),
                Err(err) => feedback(app, format!("Could not delete {arg}: {err}")),
            }
        }
        _ => feedback(
            app,
            "Usage: /task start <prompt> | stop <id> | message <id> <text> | delete <id>",
        ),
    }
}

async fn resume(app: &mut TuiApp, arg: &str, store: &CheckpointStore) {
    if !arg.is_empty() {
        restore_checkpoint(app, arg, store).await;
        return;
    }
    // No id given: pick one from the store.
    let metas = match store.list() {
        Ok(metas) => metas,
        Err(err) => {
            feedback(app, format!("Could not list checkpoints: {err}"));
            return;
        }
    };
    if metas.is_empty() {
        feedback(app, "No checkpoints found.");
        return;
    }
    let items = metas
        .iter()
        .map(|m| {
            SelectItem::new(m.title.clone(), m.id.clone())
                .with_display(m.title.clone(), format!("({} entries)", m.entries))
        })
        .collect();
    let list = SelectList::new(items)
        .with_window(app.picker_window)
        .with_scroll_arrows(app.picker_arrows);
    app.open_picker(Picker {
        title: "Checkpoints".into(),
        action: PickerAction::ResumeCheckpoint,
        list,
    });
}

/// Load a checkpoint and replay its entries into the chat log.
pub async fn restore_checkpoint(app: &mut TuiApp, id: &str, store: &CheckpointStore) {
    match store.restore(id) {
        Ok((meta, entries)) => {
            for entry in &entries {
                let role = match entry.role.as_str() {
                    "user" => ChatRole::User,
                    "agent" => ChatRole::Agent,
                    _ => ChatRole::System,
                };
                app.push_chat(role, entry.text.clone());
            }
            feedback(
                app,
                format!("Restored checkpoint {} ({} entries)", meta.title, entries.len()),
            );
        }
        Err(err) => feedback(app, format!("Could not restore {id}: {err}")),
    }
}

/// Append a task's transcript to the chat log.
pub async fn show_task(app: &mut TuiApp, id: &str, agent: &dyn BackgroundAgent) {
    match agent.get(id).await {
        Ok(record) => {
            feedback(
                app,
                format!("Task {} [{}]: {}", record.id, record.status.label(), record.prompt),
            );
            for line in &record.transcript {
                app.push_chat(ChatRole::Agent, line.clone());
            }
        }
        Err(err) => feedback(app, format!("Could not show task {id}: {err}")),
    }
}

fn help(app: &mut TuiApp) {
    let mut lines = vec!["Commands:".to_string()];
    for spec in COMMANDS {
        lines.push(format!("  {:<45} {}", spec.usage, spec.description));
    }
    feedback(app, lines.join("\n"));
}

fn feedback(app: &mut TuiApp, text: impl Into<String>) {
    app.push_chat(ChatRole::System, text);
}
