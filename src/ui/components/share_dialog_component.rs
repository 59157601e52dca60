//! Share dialog view.
//!
//! Renders the state of a [`ShareDialogController`] and turns key presses and
//! clicks into controller calls. A closed dialog yields
//! [`Action::SubmitShare`]; the app decides whether anything is sent.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use log::debug;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::clipboard::Clipboard;
use crate::constants::DISCARD_CHANGES_PROMPT;
use crate::models::{Collaborator, Contact, SharedRecord};
use crate::ui::core::share_dialog::{
    ClickTarget, DialogButton, DialogEvent, DialogState, InlineMessage, ShareDialogController,
};
use crate::ui::core::{actions::Action, Component};
use crate::ui::layout::{contains, LayoutManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmButton {
    Discard,
    Cancel,
}

/// Rectangles of the last frame, for mouse routing
#[derive(Debug, Default)]
struct HitAreas {
    dialog: Rect,
    buttons: Vec<(DialogButton, Rect)>,
    confirmation: Option<Rect>,
    confirm_buttons: Vec<(ConfirmButton, Rect)>,
}

/// Record whose sharing settings are being fetched.
struct PendingLoad {
    file_id: String,
    title: String,
}

pub struct ShareDialogComponent {
    controller: Option<ShareDialogController>,
    clipboard: Arc<dyn Clipboard>,
    loading: Option<PendingLoad>,
    focused_button: usize,
    collaborator_cursor: usize,
    input_mode: bool,
    input_buffer: String,
    search_results: Vec<Contact>,
    result_state: ListState,
    areas: HitAreas,
}

impl ShareDialogComponent {
    pub fn new(clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            controller: None,
            clipboard,
            loading: None,
            focused_button: 0,
            collaborator_cursor: 0,
            input_mode: false,
            input_buffer: String::new(),
            search_results: Vec::new(),
            result_state: ListState::default(),
            areas: HitAreas::default(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.controller.is_some() || self.loading.is_some()
    }

    /// Show a placeholder while the record is fetched.
    pub fn show_loading(&mut self, file_id: &str, title: &str) {
        self.controller = None;
        self.loading = Some(PendingLoad {
            file_id: file_id.to_string(),
            title: title.to_string(),
        });
    }

    /// Whether a load for this record is still awaited.
    pub fn is_loading(&self, file_id: &str) -> bool {
        self.loading.as_ref().is_some_and(|pending| pending.file_id == file_id)
    }

    pub fn open(&mut self, record: SharedRecord) {
        self.loading = None;
        self.focused_button = 0;
        self.collaborator_cursor = 0;
        self.input_mode = false;
        self.input_buffer.clear();
        self.search_results.clear();
        self.result_state = ListState::default();
        self.controller = Some(ShareDialogController::new(record, Arc::clone(&self.clipboard)));
    }

    pub fn hide(&mut self) {
        self.controller = None;
        self.loading = None;
    }

    pub fn controller(&self) -> Option<&ShareDialogController> {
        self.controller.as_ref()
    }

    /// Results of a user search; stale queries are ignored.
    pub fn set_search_results(&mut self, query: &str, contacts: Vec<Contact>) {
        if self.input_mode && query == self.input_buffer.trim() {
            self.result_state.select((!contacts.is_empty()).then_some(0));
            self.search_results = contacts;
        }
    }

    fn buttons(&self) -> Vec<DialogButton> {
        let live = self.controller.as_ref().is_some_and(|c| c.draft().live_enabled);
        DialogButton::ALL
            .into_iter()
            .filter(|button| *button != DialogButton::CopyLiveLink || live)
            .collect()
    }

    fn author_id(&self) -> String {
        self.controller
            .as_ref()
            .map(|c| c.record().author_contact().id)
            .unwrap_or_default()
    }

    /// Collaborators shown in the list; the author is implied.
    fn visible_collaborators(&self) -> Vec<Collaborator> {
        let author = self.author_id();
        self.controller
            .as_ref()
            .map(|c| {
                c.draft()
                    .collaborators
                    .iter()
                    .filter(|collaborator| collaborator.id.is_empty() || collaborator.id != author)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn event_to_action(&mut self, event: DialogEvent) -> Action {
        match event {
            DialogEvent::Closed(outcome) => {
                self.hide();
                Action::SubmitShare(outcome)
            }
            _ => Action::None,
        }
    }

    fn press(&mut self, button: DialogButton) -> Action {
        let Some(controller) = self.controller.as_mut() else {
            return Action::None;
        };
        let event = controller.press(button);
        self.event_to_action(event)
    }

    fn dismiss(&mut self) -> Action {
        if self.loading.is_some() {
            self.hide();
            return Action::None;
        }
        let Some(controller) = self.controller.as_mut() else {
            return Action::None;
        };
        let event = controller.dismiss();
        self.event_to_action(event)
    }

    fn remove_selected_collaborator(&mut self) {
        let visible = self.visible_collaborators();
        let Some(target) = visible.get(self.collaborator_cursor) else {
            return;
        };
        if let Some(draft) = self.controller.as_mut().and_then(|c| c.draft_mut()) {
            match draft.collaborators.iter().position(|c| c == target) {
                Some(index) => {
                    draft.remove_at(index);
                }
                None => return,
            }
        }
        self.collaborator_cursor = self.collaborator_cursor.min(visible.len().saturating_sub(2));
    }

    fn toggle_selected_editor(&mut self) {
        let visible = self.visible_collaborators();
        let Some(target) = visible.get(self.collaborator_cursor) else {
            return;
        };
        if let Some(draft) = self.controller.as_mut().and_then(|c| c.draft_mut()) {
            draft.set_editor(&target.id, !target.is_editor());
        }
    }

    fn toggle_live(&mut self) {
        if let Some(draft) = self.controller.as_mut().and_then(|c| c.draft_mut()) {
            let enabled = !draft.live_enabled;
            draft.set_live_enabled(enabled);
        }
    }

    fn add_contact(&mut self, contact: Contact) {
        if let Some(draft) = self.controller.as_mut().and_then(|c| c.draft_mut()) {
            draft.add(contact);
        }
        self.input_buffer.clear();
        self.search_results.clear();
        self.result_state = ListState::default();
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = false;
                self.input_buffer.clear();
                self.search_results.clear();
                Action::None
            }
            KeyCode::Enter => {
                let picked = self
                    .result_state
                    .selected()
                    .and_then(|index| self.search_results.get(index))
                    .cloned();
                match picked {
                    Some(contact) => self.add_contact(contact),
                    None if !self.input_buffer.trim().is_empty() => {
                        // An address with no matching user; it invalidates the draft
                        let email = self.input_buffer.trim().to_string();
                        self.add_contact(Contact {
                            email,
                            ..Default::default()
                        });
                    }
                    None => {}
                }
                Action::None
            }
            KeyCode::Down => {
                if !self.search_results.is_empty() {
                    let next = self.result_state.selected().map_or(0, |i| (i + 1) % self.search_results.len());
                    self.result_state.select(Some(next));
                }
                Action::None
            }
            KeyCode::Up => {
                if !self.search_results.is_empty() {
                    let len = self.search_results.len();
                    let prev = self.result_state.selected().map_or(0, |i| (i + len - 1) % len);
                    self.result_state.select(Some(prev));
                }
                Action::None
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
                Action::SearchUsers(self.input_buffer.trim().to_string())
            }
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
                Action::SearchUsers(self.input_buffer.trim().to_string())
            }
            _ => Action::None,
        }
    }

    fn handle_confirmation_key(&mut self, key: KeyEvent) -> Action {
        let Some(controller) = self.controller.as_mut() else {
            return Action::None;
        };
        let event = match key.code {
            KeyCode::Char('y') | KeyCode::Char('d') | KeyCode::Enter => controller.confirm_discard(),
            KeyCode::Char('n') | KeyCode::Char('c') | KeyCode::Esc => controller.cancel_discard(),
            _ => DialogEvent::Ignored,
        };
        self.event_to_action(event)
    }

    fn render_confirmation(&mut self, f: &mut Frame, rect: Rect) {
        let area = LayoutManager::centered_rect_lines(40, 5, rect);
        f.render_widget(Clear, area);
        f.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title("Unsaved changes")
                .border_style(Style::default().fg(Color::Yellow)),
            area,
        );

        let inner = Rect::new(area.x + 1, area.y + 1, area.width.saturating_sub(2), 1);
        f.render_widget(Paragraph::new(DISCARD_CHANGES_PROMPT).alignment(Alignment::Center), inner);

        let row = Rect::new(area.x + 1, area.y + 3, area.width.saturating_sub(2), 1);
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row);
        f.render_widget(
            Paragraph::new("[d] Discard")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Red)),
            halves[0],
        );
        f.render_widget(Paragraph::new("[c] Cancel").alignment(Alignment::Center), halves[1]);

        self.areas.confirmation = Some(area);
        self.areas.confirm_buttons = vec![(ConfirmButton::Discard, halves[0]), (ConfirmButton::Cancel, halves[1])];
    }

    fn render_loading(&mut self, f: &mut Frame, rect: Rect, title: &str) {
        let area = LayoutManager::centered_rect_lines(50, 3, rect);
        self.areas = HitAreas {
            dialog: area,
            ..Default::default()
        };
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(format!("⟳ Loading sharing settings of \"{title}\"..."))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded)),
            area,
        );
    }
}

impl Component for ShareDialogComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        let Some(state) = self.controller.as_ref().map(|c| c.state()) else {
            if key.code == KeyCode::Esc {
                return self.dismiss();
            }
            return Action::None;
        };

        if state == DialogState::PendingClose {
            return self.handle_confirmation_key(key);
        }
        if self.input_mode {
            return self.handle_input_key(key);
        }

        let buttons = self.buttons();
        match key.code {
            KeyCode::Esc => self.dismiss(),
            KeyCode::Tab | KeyCode::Right => {
                self.focused_button = (self.focused_button + 1) % buttons.len();
                Action::None
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.focused_button = (self.focused_button + buttons.len() - 1) % buttons.len();
                Action::None
            }
            KeyCode::Enter => match buttons.get(self.focused_button) {
                Some(button) => self.press(*button),
                None => Action::None,
            },
            KeyCode::Char('c') => self.press(DialogButton::CopyLink),
            KeyCode::Char('n') => self.press(DialogButton::CopyLinkNoCode),
            KeyCode::Char('L') => self.press(DialogButton::CopyLiveLink),
            KeyCode::Char('a') | KeyCode::Char('+') => {
                let editable = self.controller.as_ref().is_some_and(|c| !c.record().is_read_only);
                self.input_mode = editable;
                Action::None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let count = self.visible_collaborators().len();
                if count > 0 {
                    self.collaborator_cursor = (self.collaborator_cursor + 1).min(count - 1);
                }
                Action::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.collaborator_cursor = self.collaborator_cursor.saturating_sub(1);
                Action::None
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                self.remove_selected_collaborator();
                Action::None
            }
            KeyCode::Char('e') => {
                self.toggle_selected_editor();
                Action::None
            }
            KeyCode::Char('l') => {
                self.toggle_live();
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Action {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Action::None;
        }
        let (column, row) = (mouse.column, mouse.row);

        let Some(state) = self.controller.as_ref().map(|c| c.state()) else {
            if !contains(self.areas.dialog, column, row) {
                return self.dismiss();
            }
            return Action::None;
        };

        if state == DialogState::PendingClose {
            let button = self
                .areas
                .confirm_buttons
                .iter()
                .find(|(_, area)| contains(*area, column, row))
                .map(|(button, _)| *button);
            let Some(controller) = self.controller.as_mut() else {
                return Action::None;
            };
            let event = match button {
                Some(ConfirmButton::Discard) => controller.confirm_discard(),
                Some(ConfirmButton::Cancel) => controller.cancel_discard(),
                None if self.areas.confirmation.is_some_and(|a| contains(a, column, row)) => {
                    controller.handle_click(ClickTarget::ConfirmationPopup)
                }
                None => controller.handle_click(ClickTarget::Backdrop),
            };
            return self.event_to_action(event);
        }

        let target = match self.areas.buttons.iter().find(|(_, area)| contains(*area, column, row)) {
            Some((button, _)) => ClickTarget::Button(*button),
            None if contains(self.areas.dialog, column, row) => ClickTarget::Content,
            None => ClickTarget::Backdrop,
        };
        let Some(controller) = self.controller.as_mut() else {
            return Action::None;
        };
        let event = controller.handle_click(target);
        self.event_to_action(event)
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::UsersFound { query, contacts } => {
                self.set_search_results(&query, contacts);
                Action::None
            }
            // Only the load the placeholder waits for may open the dialog
            Action::ShareLoaded(record) => {
                if self.is_loading(&record.id) {
                    self.open(record);
                } else {
                    debug!("Dropping sharing settings of {}, no longer awaited", record.id);
                }
                Action::None
            }
            _ => action,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        if let Some(title) = self.loading.as_ref().map(|pending| pending.title.clone()) {
            self.render_loading(f, rect, &title);
            return;
        }
        let Some(controller) = self.controller.as_ref() else {
            return;
        };

        let area = LayoutManager::centered_rect(70, 70, rect);
        f.render_widget(Clear, area);

        let record = controller.record();
        let draft = controller.draft();
        let form = controller.form_state();
        let read_only = record.is_read_only;
        let title = if form.is_dirty {
            format!("{} *", controller.title())
        } else {
            controller.title()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let input_height = if self.input_mode {
            2 + self.search_results.len().min(5) as u16
        } else {
            0
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(input_height),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Link: ", Style::default().fg(Color::Gray)),
                Span::raw(record.shareable_link.clone()),
            ])),
            chunks[0],
        );

        let live = if draft.live_enabled { "[x]" } else { "[ ]" };
        let mut live_line = vec![Span::raw(format!("{live} Live collaboration"))];
        if read_only {
            live_line.push(Span::styled("  (read only)", Style::default().fg(Color::DarkGray)));
        }
        f.render_widget(Paragraph::new(Line::from(live_line)), chunks[1]);

        f.render_widget(
            Paragraph::new("Collaborators").style(Style::default().add_modifier(Modifier::BOLD)),
            chunks[2],
        );

        let visible = self.visible_collaborators();
        let items: Vec<ListItem> = visible
            .iter()
            .enumerate()
            .map(|(index, collaborator)| {
                let invalid = collaborator.id.is_empty() || collaborator.email.is_empty();
                let name = if collaborator.name.is_empty() {
                    collaborator.email.clone()
                } else {
                    format!("{} <{}>", collaborator.name, collaborator.email)
                };
                let style = if invalid {
                    Style::default().fg(Color::Red)
                } else if index == self.collaborator_cursor {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(name, style),
                    Span::styled(format!("  {}", collaborator.role_label()), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();
        let empty = items.is_empty();
        if empty {
            f.render_widget(
                Paragraph::new("Only you have access").style(Style::default().fg(Color::DarkGray)),
                chunks[3],
            );
        } else {
            f.render_widget(List::new(items), chunks[3]);
        }

        if self.input_mode {
            let input_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(chunks[4]);
            f.render_widget(
                Paragraph::new(format!("Add: {}_", self.input_buffer)).style(Style::default().fg(Color::Yellow)),
                input_chunks[0],
            );
            let results: Vec<ListItem> = self
                .search_results
                .iter()
                .map(|contact| ListItem::new(format!("{} <{}>", contact.display_name(), contact.email)))
                .collect();
            f.render_stateful_widget(
                List::new(results).highlight_style(Style::default().bg(Color::DarkGray)),
                input_chunks[1],
                &mut self.result_state,
            );
        }

        let Some(controller) = self.controller.as_ref() else {
            return;
        };
        let message = match controller.message() {
            Some(InlineMessage::Info(text)) => Paragraph::new(text.clone()).style(Style::default().fg(Color::Green)),
            Some(InlineMessage::Error(text)) => Paragraph::new(text.clone()).style(Style::default().fg(Color::Red)),
            None => match form.error.filter(|_| !form.is_valid) {
                Some(error) => Paragraph::new(error).style(Style::default().fg(Color::Red)),
                None => Paragraph::new(""),
            },
        };
        f.render_widget(message, chunks[5]);

        let buttons = self.buttons();
        let mut x = chunks[6].x;
        let mut button_areas = Vec::new();
        for (index, button) in buttons.iter().enumerate() {
            let label = format!("[ {} ]", button.label());
            let width = (label.chars().count() as u16).min((chunks[6].x + chunks[6].width).saturating_sub(x));
            let button_area = Rect::new(x, chunks[6].y, width, 1);
            let style = if index == self.focused_button {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Cyan)
            };
            f.render_widget(Paragraph::new(label).style(style), button_area);
            button_areas.push((*button, button_area));
            x = x.saturating_add(width + 1);
        }

        let help = if self.input_mode {
            "Type a name or email • ↑/↓ pick • Enter add • Esc back"
        } else if read_only {
            "Tab/Enter buttons • c copy • n copy (no-code) • Esc close"
        } else {
            "a add • x remove • e editor • l live • c copy • Tab/Enter buttons • Esc close"
        };
        f.render_widget(
            Paragraph::new(help)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            chunks[7],
        );

        let pending = controller.state() == DialogState::PendingClose;
        self.areas = HitAreas {
            dialog: area,
            buttons: button_areas,
            confirmation: None,
            confirm_buttons: Vec::new(),
        };
        if pending {
            self.render_confirmation(f, rect);
        }
    }
}
