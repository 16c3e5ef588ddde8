// cli/ui.rs — `taskd ui` interactive terminal client.
//
// Mirrors the web client's behavior: one initial fetch, local state as the
// source of truth for rendering, optimistic toggles (background PUT, no
// rollback on failure) and pessimistic deletes (local removal only after the
// DELETE resolves).
//
// Keys:
//   type + Enter   add a task
//   Up / Down      select a task
//   Ctrl-T         toggle the selected task
//   Ctrl-D         delete the selected task
//   Esc / Ctrl-C   quit

use anyhow::Result;
use crossterm::{
    event::{Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::warn;

use super::client::ApiClient;
use crate::store::Task;

struct UiApp {
    client: ApiClient,
    tasks: Vec<Task>,
    input: String,
    selected: ListState,
    status: Option<String>,
}

/// Entry point for `taskd ui`.
pub async fn run_ui(client: ApiClient) -> Result<()> {
    // Initial load happens before the terminal is taken over, so a dead
    // server fails with a readable error instead of a blank screen.
    let tasks = client.list_tasks().await?;

    let mut selected = ListState::default();
    if !tasks.is_empty() {
        selected.select(Some(0));
    }
    let mut app = UiApp {
        client,
        tasks,
        input: String::new(),
        selected,
        status: None,
    };

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut UiApp,
) -> Result<()> {
    // Blocking crossterm reads happen on a plain thread; the async loop only
    // ever awaits the channel and network calls.
    let (tx, mut rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while let Ok(event) = crossterm::event::read() {
            if tx.send(event).is_err() {
                break;
            }
        }
    });

    loop {
        terminal.draw(|frame| draw(frame, app))?;

        let Some(event) = rx.recv().await else {
            return Ok(());
        };
        let Event::Key(key) = event else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Char('c') if ctrl => return Ok(()),
            KeyCode::Char('t') if ctrl => app.toggle_selected(),
            KeyCode::Char('d') if ctrl => app.delete_selected().await,
            KeyCode::Enter => app.add_task().await,
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Up => app.move_selection(-1),
            KeyCode::Down => app.move_selection(1),
            KeyCode::Char(c) if !ctrl => app.input.push(c),
            _ => {}
        }
    }
}

impl UiApp {
    async fn add_task(&mut self) {
        let title = self.input.trim().to_string();
        if title.is_empty() {
            // Client-side guard, same as the web client's alert.
            self.status = Some("Please enter a task".to_string());
            return;
        }
        match self.client.create_task(&title).await {
            Ok(task) => {
                self.tasks.push(task);
                self.input.clear();
                self.status = None;
                if self.selected.selected().is_none() {
                    self.selected.select(Some(0));
                }
            }
            Err(err) => self.status = Some(format!("add failed: {err}")),
        }
    }

    /// Optimistic: flip locally first, send the PUT in the background.
    /// A failed PUT is logged but local state is not rolled back.
    fn toggle_selected(&mut self) {
        let Some(index) = self.selected.selected() else {
            return;
        };
        let Some(task) = self.tasks.get_mut(index) else {
            return;
        };
        task.completed = !task.completed;
        self.status = None;

        let client = self.client.clone();
        let id = task.id.clone();
        let completed = task.completed;
        tokio::spawn(async move {
            if let Err(err) = client.set_completed(&id, completed).await {
                warn!(%id, "toggle failed: {err}");
            }
        });
    }

    /// Pessimistic: the task leaves local state only after the server
    /// confirms the delete.
    async fn delete_selected(&mut self) {
        let Some(index) = self.selected.selected() else {
            return;
        };
        let Some(task) = self.tasks.get(index) else {
            return;
        };
        match self.client.delete_task(&task.id).await {
            Ok(()) => {
                self.tasks.remove(index);
                self.status = None;
                if self.tasks.is_empty() {
                    self.selected.select(None);
                } else {
                    self.selected.select(Some(index.min(self.tasks.len() - 1)));
                }
            }
            Err(err) => self.status = Some(format!("delete failed: {err}")),
        }
    }

    fn move_selection(&mut self, delta: i64) {
        if self.tasks.is_empty() {
            return;
        }
        let current = self.selected.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, self.tasks.len() as i64 - 1);
        self.selected.select(Some(next as usize));
    }
}

fn draw(frame: &mut Frame, app: &mut UiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let input = Paragraph::new(app.input.as_str())
        .block(Block::default().borders(Borders::ALL).title("New task"));
    frame.render_widget(input, chunks[0]);

    if app.tasks.is_empty() {
        let empty = Paragraph::new("No tasks yet")
            .block(Block::default().borders(Borders::ALL).title("Tasks"));
        frame.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = app
            .tasks
            .iter()
            .map(|task| {
                let style = if task.completed {
                    Style::default().add_modifier(Modifier::CROSSED_OUT | Modifier::DIM)
                } else {
                    Style::default()
                };
                ListItem::new(Line::styled(task.title.clone(), style))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Tasks"))
            .highlight_symbol("> ")
            .highlight_style(Style::default().add_modifier(Modifier::BOLD));
        frame.render_stateful_widget(list, chunks[1], &mut app.selected);
    }

    let footer = app.status.clone().unwrap_or_else(|| {
        "Enter: add  ↑/↓: select  Ctrl-T: toggle  Ctrl-D: delete  Esc: quit".to_string()
    });
    frame.render_widget(Paragraph::new(footer), chunks[2]);
}
