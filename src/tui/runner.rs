//! The tokio event loop.
//!
//! Owns every side effect the model queues: agent calls, checkpoint reads,
//! and the single live debounce timer. Raw terminal events arrive from a
//! dedicated blocking reader thread.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyEventKind};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

use crate::agent::BackgroundAgent;
use crate::checkpoint::CheckpointStore;
use crate::config::Config;

use super::app::{PendingEffect, TuiApp};
use super::event::TuiMessage;
use super::select::TimerOp;
use super::{commands, input, layout};

const RENDER_INTERVAL: Duration = Duration::from_millis(33);
const TICK_INTERVAL: Duration = Duration::from_secs(2);

pub async fn run(
    config: Config,
    agent: Arc<dyn BackgroundAgent>,
    store: CheckpointStore,
) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = run_loop(&mut terminal, config, agent, store).await;
    ratatui::restore();
    result
}

async fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    config: Config,
    agent: Arc<dyn BackgroundAgent>,
    store: CheckpointStore,
) -> Result<()> {
    let mut app = TuiApp::new();
    app.picker_window = config.picker.window_size;
    app.picker_arrows = config.picker.scroll_arrows;
    app.push_chat(
        super::app::ChatRole::System,
        "taskdeck ready — /help for commands",
    );

    let mut key_rx = spawn_key_reader();
    let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();
    let mut timer_task: Option<JoinHandle<()>> = None;

    let mut render = tokio::time::interval(RENDER_INTERVAL);
    let mut tick = tokio::time::interval(TICK_INTERVAL);

    loop {
        let message = tokio::select! {
            Some(key) = key_rx.recv() => TuiMessage::Input(key),
            Some(message) = timer_rx.recv() => message,
            _ = tick.tick() => TuiMessage::Tick,
            _ = render.tick() => TuiMessage::Render,
        };
        match message {
            TuiMessage::Input(key) => input::handle_key(&mut app, key),
            TuiMessage::PickerTimer(token) => app.picker_timer(token),
            TuiMessage::Tick => app.tasks = agent.list().await.unwrap_or_default(),
            TuiMessage::Render => {}
        }

        apply_timer_op(&mut timer_task, app.take_timer_op(), &timer_tx);
        drain_effects(&mut app, agent.as_ref(), &store).await;
        apply_timer_op(&mut timer_task, app.take_timer_op(), &timer_tx);

        if app.should_quit {
            break;
        }
        terminal.draw(|frame| layout::draw(frame, &app))?;
    }

    if let Some(task) = timer_task.take() {
        task.abort();
    }
    Ok(())
}

/// Blocking reader thread for terminal events. Exits once the receiver is
/// dropped.
fn spawn_key_reader() -> mpsc::UnboundedReceiver<crossterm::event::KeyEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        if tx.is_closed() {
            break;
        }
        match crossterm::event::poll(Duration::from_millis(100)) {
            Ok(true) => {
                if let Ok(Event::Key(key)) = crossterm::event::read() {
                    // Release/repeat events would double every keystroke.
                    if key.kind == KeyEventKind::Press && tx.send(key).is_err() {
                        break;
                    }
                }
            }
            Ok(false) => {}
            Err(_) => break,
        }
    });
    rx
}

/// At most one debounce timer is live: `Schedule` replaces it, `Cancel`
/// aborts it. The token travels with the fire so a late abort is harmless.
fn apply_timer_op(
    slot: &mut Option<JoinHandle<()>>,
    op: TimerOp,
    tx: &UnboundedSender<TuiMessage>,
) {
    match op {
        TimerOp::Keep => {}
        TimerOp::Cancel => {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
        TimerOp::Schedule(req) => {
            if let Some(task) = slot.take() {
                task.abort();
            }
            let tx = tx.clone();
            *slot = Some(tokio::spawn(async move {
                tokio::time::sleep(req.delay).await;
                let _ = tx.send(TuiMessage::PickerTimer(req.token));
            }));
        }
    }
}

/// Perform the effects the last update queued.
async fn drain_effects(app: &mut TuiApp, agent: &dyn BackgroundAgent, store: &CheckpointStore) {
    for effect in app.take_effects() {
        match effect {
            PendingEffect::Command(line) => {
                commands::execute(app, &line, agent, store).await;
            }
            PendingEffect::StartTask(prompt) => match agent.start(&prompt).await {
                Ok(record) => app.push_chat(
                    super::app::ChatRole::System,
                    format!("Started task {}", record.id),
                ),
                Err(err) => app.push_chat(
                    super::app::ChatRole::System,
                    format!("Could not start task: {err}"),
                ),
            },
            PendingEffect::Pick(action, id) => match action {
                super::app::PickerAction::ShowTask => {
                    commands::show_task(app, &id, agent).await;
                }
                super::app::PickerAction::ResumeCheckpoint => {
                    commands::restore_checkpoint(app, &id, store).await;
                }
            },
        }
        app.tasks = agent.list().await.unwrap_or_default();
    }
}
