//! Document bar: the open notebook with its share and collaboration buttons.

use std::path::{Path, PathBuf};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::SharedRecord;
use crate::ui::core::{actions::Action, Component, ToolbarState};

pub struct ToolbarComponent {
    document: Option<PathBuf>,
    record: Option<SharedRecord>,
    pub state: ToolbarState,
}

impl ToolbarComponent {
    pub fn new(document: Option<PathBuf>) -> Self {
        Self {
            document,
            record: None,
            state: ToolbarState::new(),
        }
    }

    pub fn document(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    /// Name shown for the open document
    pub fn document_label(&self) -> String {
        self.document
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn record(&self) -> Option<&SharedRecord> {
        self.record.as_ref()
    }

    pub fn set_record(&mut self, record: Option<SharedRecord>) {
        self.state.apply_record(record.as_ref());
        self.record = record;
    }

    /// Render the pane describing the open document
    pub fn render_document(&self, f: &mut Frame, rect: Rect) {
        let mut lines = Vec::new();
        match (&self.document, &self.record) {
            (None, _) => lines.push(Line::from(Span::styled(
                "No notebook open. Start with `nbshare <notebook.ipynb>` to share one.",
                Style::default().fg(Color::DarkGray),
            ))),
            (Some(path), None) => {
                lines.push(Line::from(path.display().to_string()));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Not shared yet. Press p to publish.",
                    Style::default().fg(Color::Yellow),
                )));
            }
            (Some(path), Some(record)) => {
                lines.push(Line::from(path.display().to_string()));
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("Link: ", Style::default().fg(Color::Gray)),
                    Span::raw(record.shareable_link.clone()),
                ]));
                lines.push(Line::from(format!("Version: {}", record.version)));
                let collaborators = record.visible_collaborators();
                lines.push(Line::from(format!("Shared with {} people", collaborators.len())));
                for collaborator in collaborators {
                    lines.push(Line::from(format!(
                        "  {} ({})",
                        collaborator.name,
                        collaborator.role_label()
                    )));
                }
            }
        }

        let pane = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("Document")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(pane, rect);
    }
}

impl Component for ToolbarComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        if self.document.is_none() {
            return Action::None;
        }
        match key.code {
            KeyCode::Char('p') if self.state.share_enabled() => {
                self.state.set_share_busy(true);
                Action::Publish
            }
            KeyCode::Char('L') if self.state.collaboration_enabled() => {
                self.state.set_collaboration_busy(true);
                Action::ToggleLive
            }
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::LookupCompleted(record) => {
                self.set_record(record);
                Action::None
            }
            Action::Published(record) => {
                self.set_record(Some(record.clone()));
                Action::Published(record)
            }
            Action::LiveToggled(toggle) => {
                self.set_record(Some(toggle.record.clone()));
                self.state.set_live_enabled(toggle.live_enabled);
                Action::LiveToggled(toggle)
            }
            Action::ShareIdle => {
                self.state.set_share_busy(false);
                Action::None
            }
            Action::CollaborationIdle => {
                self.state.set_collaboration_busy(false);
                Action::None
            }
            _ => action,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let Some(_) = self.document else {
            f.render_widget(
                Paragraph::new(" nbshare").style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                rect,
            );
            return;
        };

        let share_style = if self.state.share_enabled() {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray).bg(Color::Black)
        };
        let live_style = match (self.state.collaboration_enabled(), self.state.collaboration_pressed()) {
            (false, _) => Style::default().fg(Color::DarkGray),
            (true, true) => Style::default().fg(Color::Black).bg(Color::Green),
            (true, false) => Style::default().fg(Color::Green),
        };

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", self.document_label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(format!(" p {} ", self.state.share_label(Utc::now())), share_style),
            Span::raw(" "),
            Span::styled(" L Live ", live_style),
            Span::styled(
                format!("  {}", self.state.collaboration_tooltip()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(Paragraph::new(line), rect);
    }
}
