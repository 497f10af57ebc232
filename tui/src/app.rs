//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin surface over the widget:
//! - Event loop (keyboard, resize, frame tick)
//! - Draining lookup completions into the widget once per frame
//! - Focus handling over the live tree's controls
//! - Drawing the live tree plus title and hint lines
//!
//! Keys map onto tree interactions:
//!
//! | Key | Effect |
//! |---|---|
//! | printable / Backspace | edit the focused input |
//! | Enter | submit from the input, activate a focused button |
//! | Space | activate a focused button |
//! | Delete | activate a focused delete button |
//! | Tab / Shift-Tab | move focus |
//! | PageUp / PageDown | scroll |
//! | Esc / Ctrl-C | quit |

use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::{Frame, Terminal};

use skycast_core::{
    Action, Completions, Node, State, Tag, UiEvent, WeatherLookup, WeatherWidget,
};

use crate::surface::TerminalSurface;
use crate::theme::{hint_style, LOADING_YELLOW, SKY_BLUE};
use crate::widgets::TreeViewState;

/// Redraw interval when nothing else happens
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Lines scrolled per PageUp / PageDown
const PAGE: isize = 5;

/// Main application state
pub struct App<L> {
    /// Is the app still running?
    running: bool,
    /// The widget, mounted on the terminal surface
    widget: WeatherWidget<L, TerminalSurface>,
    /// Completions from the lookup bridge
    completions: Completions,
    /// Index into the surface's focusable controls
    focus: usize,
    /// Scroll position of the tree view
    view_state: TreeViewState,
}

impl<L: WeatherLookup + 'static> App<L> {
    /// Create the app and mount the widget
    pub fn new(lookup: L, initial: State) -> Self {
        let (widget, completions) = WeatherWidget::new(lookup, initial, TerminalSurface::new());
        Self {
            running: true,
            widget,
            completions,
            focus: 0,
            view_state: TreeViewState::default(),
        }
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Terminal event error");
                        }
                        None => self.running = false,
                    }
                }

                // Frame tick
                () = tokio::time::sleep(FRAME_INTERVAL) => {}
            }

            // Apply lookups that settled since the last frame
            self.process_completions();

            terminal.draw(|frame| self.draw(frame))?;
        }

        Ok(())
    }

    /// Current widget state
    pub fn state(&self) -> &State {
        self.widget.state()
    }

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Path of the focused control
    pub fn focused_path(&self) -> Option<Vec<usize>> {
        self.widget.surface().focusables().into_iter().nth(self.focus)
    }

    /// Dispatch every completion that has arrived
    ///
    /// Returns how many were applied.
    pub fn process_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Some(message) = self.completions.try_recv() {
            self.widget.dispatch(message);
            applied += 1;
        }
        if applied > 0 {
            self.clamp_focus();
        }
        applied
    }

    /// Lookups started and not yet settled
    pub fn in_flight(&self) -> usize {
        self.widget.in_flight()
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        let focused = self.focused_path();
        let node = focused
            .as_deref()
            .and_then(|path| self.widget.surface().node(path))
            .cloned();

        match key.code {
            // Quit
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // Focus
            KeyCode::Tab => self.move_focus(1),
            KeyCode::BackTab => self.move_focus(-1),

            // Scrolling
            KeyCode::PageUp => self.view_state.scroll(-PAGE),
            KeyCode::PageDown => self.view_state.scroll(PAGE),

            // Editing
            KeyCode::Char(c) if is_input(node.as_ref()) => {
                let mut value = input_value(node.as_ref());
                value.push(c);
                self.fire_focused(focused.as_deref(), UiEvent::Input(value));
            }
            KeyCode::Backspace if is_input(node.as_ref()) => {
                let mut value = input_value(node.as_ref());
                if value.pop().is_some() {
                    self.fire_focused(focused.as_deref(), UiEvent::Input(value));
                }
            }

            // Activation
            KeyCode::Enter if is_input(node.as_ref()) => {
                self.widget.submit();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.fire_focused(focused.as_deref(), UiEvent::Click);
            }
            KeyCode::Delete if node.as_ref().is_some_and(is_delete_control) => {
                self.fire_focused(focused.as_deref(), UiEvent::Click);
            }

            _ => {}
        }
    }

    /// Draw one frame
    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        let [title, body, hints] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Line::from(Span::styled(
                "skycast",
                Style::default().fg(SKY_BLUE).add_modifier(Modifier::BOLD),
            )),
            title,
        );

        let focused = self.focused_path();
        self.widget
            .surface()
            .draw(body, frame.buffer_mut(), focused.as_deref(), &mut self.view_state);

        let mut hint = vec![Span::styled(
            "Tab focus · Enter submit · Del delete · Esc quit",
            hint_style(),
        )];
        let in_flight = self.widget.in_flight();
        if in_flight > 0 {
            hint.push(Span::styled(
                format!("  ({in_flight} lookup(s) in flight)"),
                Style::default().fg(LOADING_YELLOW),
            ));
        }
        frame.render_widget(Line::from(hint), hints);
    }

    fn fire_focused(&mut self, path: Option<&[usize]>, event: UiEvent) {
        if let Some(path) = path {
            self.widget.handle_event(path, event);
            self.clamp_focus();
        }
    }

    fn move_focus(&mut self, step: isize) {
        let count = self.widget.surface().focusables().len();
        if count == 0 {
            self.focus = 0;
            return;
        }
        let count = count as isize;
        self.focus = (self.focus as isize + step).rem_euclid(count) as usize;
    }

    /// Keep focus on an existing control after the tree shrinks
    fn clamp_focus(&mut self) {
        let count = self.widget.surface().focusables().len();
        if self.focus >= count {
            self.focus = count.saturating_sub(1);
        }
    }
}

fn is_input(node: Option<&Node>) -> bool {
    node.is_some_and(|n| n.tag == Tag::Input)
}

fn input_value(node: Option<&Node>) -> String {
    node.and_then(|n| n.get_attr("value"))
        .unwrap_or_default()
        .to_string()
}

fn is_delete_control(node: &Node) -> bool {
    node.handlers
        .iter()
        .any(|h| matches!(h.action, Action::DeleteEntry { .. }))
}
