use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{Action, AppEvent, Notice, NoticeLevel};
use super::form::{self, FieldKind, FieldSpec};
use super::theme;
use super::widgets::field_editor::FieldEditor;
use crate::core::wizard::{
    FieldValue, Transition, WizardController, WizardError, WizardState, WizardStatus,
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Central application state (Elm architecture).
pub struct App {
    /// Whether the app is still running.
    pub running: bool,
    wizard: WizardController,
    /// Step whose fields the editor/focus currently refer to.
    shown_step: usize,
    /// Focused field within the shown step.
    focus: usize,
    editor: FieldEditor,
    notice: Option<Notice>,
    spinner: usize,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(wizard: WizardController) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            running: true,
            wizard,
            shown_step: 0,
            focus: 0,
            editor: FieldEditor::new(FieldKind::Text),
            notice: None,
            spinner: 0,
            event_rx,
            event_tx,
        };
        app.load_editor();
        app
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        tick_rate: Duration,
    ) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal
                .draw(|frame| self.render(frame))
                .map_err(Into::into)?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.handle_event(AppEvent::Tick);
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.on_tick(),
            AppEvent::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                self.handle_key(key);
            }
            AppEvent::Input(_) => {}
            AppEvent::Advanced(result) => self.on_advanced(result),
            AppEvent::Quit => self.running = false,
        }
        self.sync_step();
    }

    fn on_tick(&mut self) {
        self.spinner = self.spinner.wrapping_add(1);
        if let Some(notice) = self.notice.as_mut() {
            notice.ttl_ticks = notice.ttl_ticks.saturating_sub(1);
            if notice.ttl_ticks == 0 {
                self.notice = None;
            }
        }
    }

    fn on_advanced(&mut self, result: Result<Transition, WizardError>) {
        match result {
            Ok(Transition::Invalid(errors)) => {
                if let Some((_, message)) = errors.first() {
                    self.notice = Some(Notice::error(message.to_string()));
                }
            }
            Ok(Transition::Moved { .. }) => self.notice = None,
            Ok(Transition::Completed) => {
                self.notice = Some(Notice::info("Submitted"));
            }
            Err(WizardError::Submission(err)) => {
                self.notice = Some(Notice::error(format!("{err}. Press Enter to retry.")));
            }
            Err(err) => self.notice = Some(Notice::info(err.to_string())),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.handle_action(Action::Quit);
            return;
        }

        if self.wizard.is_completed() {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Enter | KeyCode::Esc) {
                self.handle_action(Action::Quit);
            }
            return;
        }

        if let Some(action) = self.map_key(key) {
            self.handle_action(action);
            return;
        }

        self.edit_field(key);
    }

    fn map_key(&self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => Some(Action::Next),
            KeyCode::Esc => Some(Action::Back),
            KeyCode::F(n) if n >= 1 => Some(Action::JumpTo(usize::from(n - 1))),
            KeyCode::Tab | KeyCode::Down => Some(Action::FocusNext),
            KeyCode::BackTab | KeyCode::Up => Some(Action::FocusPrev),
            KeyCode::Char(' ') if self.focused_field()?.kind == FieldKind::Checkbox => {
                Some(Action::Toggle)
            }
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Next => {
                let wizard = self.wizard.clone();
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let result = wizard.next().await;
                    let _ = tx.send(AppEvent::Advanced(result));
                });
            }
            Action::Back => {
                if let Err(e) = self.wizard.back() {
                    self.notice = Some(Notice::info(e.to_string()));
                }
            }
            Action::JumpTo(index) => {
                if let Err(e) = self.wizard.jump_to(index) {
                    self.notice = Some(Notice::info(e.to_string()));
                }
            }
            Action::FocusNext => self.move_focus(1),
            Action::FocusPrev => self.move_focus(-1),
            Action::Toggle => {
                if let Some(spec) = self.focused_field() {
                    let checked = self
                        .wizard
                        .value(spec.name)
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false);
                    self.commit(spec.name, FieldValue::Bool(!checked));
                }
            }
            Action::Quit => {
                let _ = self.event_tx.send(AppEvent::Quit);
            }
        }
    }

    fn edit_field(&mut self, key: KeyEvent) {
        let Some(spec) = self.focused_field() else {
            return;
        };
        if spec.kind == FieldKind::Checkbox {
            return;
        }

        let changed = match key.code {
            KeyCode::Char(c) => self.editor.insert_char(c),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Left => {
                self.editor.move_left();
                false
            }
            KeyCode::Right => {
                self.editor.move_right();
                false
            }
            KeyCode::Home => {
                self.editor.move_home();
                false
            }
            KeyCode::End => {
                self.editor.move_end();
                false
            }
            _ => false,
        };

        if changed {
            let value = self.editor.to_value();
            self.commit(spec.name, value);
        }
    }

    fn commit(&mut self, field: &str, value: FieldValue) {
        if let Err(e) = self.wizard.set_value(field, value) {
            self.notice = Some(Notice::info(e.to_string()));
            // Keep the editor in step with what the store actually holds
            self.load_editor();
        }
    }

    // ── Focus ───────────────────────────────────────────────────────────

    fn current_fields(&self) -> &'static [FieldSpec] {
        self.wizard
            .registry()
            .step_at(self.shown_step)
            .map(|step| form::fields_for(step.label()))
            .unwrap_or(&[])
    }

    fn focused_field(&self) -> Option<FieldSpec> {
        self.current_fields().get(self.focus).copied()
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.current_fields().len();
        if len == 0 {
            return;
        }
        self.focus = (self.focus as isize + delta).rem_euclid(len as isize) as usize;
        self.load_editor();
    }

    fn load_editor(&mut self) {
        if let Some(spec) = self.focused_field() {
            let value = self.wizard.value(spec.name);
            self.editor.load(spec.kind, value.as_ref());
        }
    }

    /// Reset focus when the wizard has moved to another step.
    fn sync_step(&mut self) {
        let current = self.wizard.current_step();
        if current != self.shown_step {
            self.shown_step = current;
            self.focus = 0;
            self.load_editor();
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let state = self.wizard.state();

        let rows = Layout::vertical([
            Constraint::Length(3), // stepper
            Constraint::Min(5),    // step body
            Constraint::Length(1), // notice
            Constraint::Length(1), // buttons
            Constraint::Length(1), // key hints
        ])
        .split(area);

        self.render_stepper(frame, rows[0], &state);

        if state.status == WizardStatus::Completed {
            self.render_done(frame, rows[1]);
        } else {
            self.render_step(frame, rows[1], &state);
        }

        self.render_notice(frame, rows[2], &state);
        self.render_buttons(frame, rows[3], &state);
        self.render_hints(frame, rows[4]);
    }

    fn render_stepper(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let mut spans = Vec::new();
        for marker in self.wizard.step_markers() {
            if marker.index > 0 {
                spans.push(Span::styled(" ── ", theme::step_pending()));
            }
            let (glyph, style) = if marker.completed {
                ("✓", theme::step_completed())
            } else if marker.active {
                ("●", theme::step_active())
            } else {
                ("○", theme::step_pending())
            };
            let style = if marker.active {
                style.patch(theme::step_active())
            } else {
                style
            };
            spans.push(Span::styled(
                format!("{glyph} F{} {}", marker.index + 1, marker.label),
                style,
            ));
        }

        let title = format!("{} · {}", crate::NAME, state.status.as_str());
        let stepper = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(theme::block_default(&title));
        frame.render_widget(stepper, area);
    }

    fn render_step(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let label = self
            .wizard
            .registry()
            .step_at(state.current_step)
            .map(|s| s.label())
            .unwrap_or_default();
        let block = theme::block_focused(label);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        let mut cursor = None;

        for (i, spec) in self.current_fields().iter().enumerate() {
            let focused = i == self.focus;
            let marker = if focused { "› " } else { "  " };
            let value = self.wizard.value(spec.name).unwrap_or_default();

            let rendered = match spec.kind {
                FieldKind::Checkbox => {
                    let checked = value.as_bool().unwrap_or(false);
                    format!("[{}] {}", if checked { "x" } else { " " }, spec.label)
                }
                _ => {
                    let text = if focused {
                        self.editor.text().to_string()
                    } else {
                        value.to_string()
                    };
                    let prefix = format!("{}: ", spec.label);
                    if focused {
                        cursor = Some((
                            marker.chars().count() + prefix.chars().count()
                                + self.editor.cursor_column(),
                            lines.len(),
                        ));
                    }
                    format!("{prefix}{text}")
                }
            };

            let style = if focused {
                theme::step_active()
            } else {
                theme::text()
            };
            lines.push(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(rendered, style),
            ]));

            if let Some(message) = state.errors.get(spec.name) {
                lines.push(Line::from(Span::styled(
                    format!("    {message}"),
                    theme::error(),
                )));
            }
            lines.push(Line::raw(""));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

        if state.status == WizardStatus::Editing {
            if let Some((x, y)) = cursor {
                frame.set_cursor_position(Position::new(
                    inner.x + x as u16,
                    inner.y + y as u16,
                ));
            }
        }
    }

    fn render_done(&self, frame: &mut Frame, area: Rect) {
        let values = self.wizard.values();
        let json = serde_json::to_string_pretty(&values.to_json()).unwrap_or_default();

        let mut lines = vec![
            Line::from(Span::styled("All done!", theme::title())),
            Line::raw(""),
        ];
        lines.extend(json.lines().map(|l| Line::raw(l.to_string())));

        let done = Paragraph::new(lines).block(theme::block_focused("Completed"));
        frame.render_widget(done, area);
    }

    fn render_notice(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        let line = match (&self.notice, &state.submission_error) {
            (Some(notice), _) => {
                let style = match notice.level {
                    NoticeLevel::Error => theme::error(),
                    NoticeLevel::Info => theme::key_hint(),
                };
                Line::from(Span::styled(notice.message.clone(), style))
            }
            (None, Some(err)) => Line::from(Span::styled(err.to_string(), theme::error())),
            (None, None) => Line::raw(""),
        };
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }

    fn render_buttons(&self, frame: &mut Frame, area: Rect, state: &WizardState) {
        if state.status == WizardStatus::Completed {
            return;
        }

        let submitting = state.status == WizardStatus::Submitting;
        let back_style = if state.current_step == 0 || submitting {
            theme::button_disabled()
        } else {
            theme::button_enabled()
        };

        let (next_label, next_style) = if submitting {
            (
                format!(" {} Submitting ", SPINNER[self.spinner % SPINNER.len()]),
                theme::button_busy(),
            )
        } else if self.wizard.is_last_step() {
            (" Submit ".to_string(), theme::button_enabled())
        } else {
            (" Next ".to_string(), theme::button_enabled())
        };

        let buttons = Line::from(vec![
            Span::styled(" Back ", back_style),
            Span::raw("   "),
            Span::styled(next_label, next_style),
        ]);
        frame.render_widget(Paragraph::new(buttons).alignment(Alignment::Center), area);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let hints = if self.wizard.is_completed() {
            "[q] quit"
        } else {
            "[Enter] next  [Esc] back  [Tab] field  [Space] toggle  [F1-F9] go to step  [Ctrl+C] quit"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hints, theme::key_hint())).alignment(Alignment::Center),
            area,
        );
    }
}
