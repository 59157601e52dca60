//! Modal dialog component for confirmations, errors, logs and previews.
//!
//! The share dialog has its own component; this one hosts every other
//! modal. At most one dialog is shown at a time.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

use crate::logger::Logger;
use crate::preview::PreviewModel;
use crate::ui::components::dialogs::{preview_dialog, system_dialogs, ScrollView};
use crate::ui::core::{
    actions::{Action, DialogType},
    Component,
};

pub struct DialogComponent {
    pub dialog_type: Option<DialogType>,
    view: ScrollView,
    logger: Logger,
    preview: Option<Arc<PreviewModel>>,
    preview_text: Option<String>,
}

impl DialogComponent {
    pub fn new(logger: Logger) -> Self {
        Self {
            dialog_type: None,
            view: ScrollView::default(),
            logger,
            preview: None,
            preview_text: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.dialog_type.is_some()
    }

    /// Show a preview; its text is known already when it was fetched before.
    pub fn show_preview(&mut self, preview: Arc<PreviewModel>) {
        self.preview_text = preview.data().map(crate::preview::html_to_text);
        self.dialog_type = Some(DialogType::Preview {
            file_id: preview.id().to_string(),
        });
        self.preview = Some(preview);
        self.view.reset();
    }

    pub fn preview_text(&self) -> Option<&str> {
        self.preview_text.as_deref()
    }

    fn clear_dialog(&mut self) {
        self.dialog_type = None;
        self.preview = None;
        self.preview_text = None;
        self.view.reset();
    }

    /// Scrolling keys shared by all text dialogs; true when handled.
    fn handle_scroll_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.view.down(1),
            KeyCode::Char('k') | KeyCode::Up => self.view.up(1),
            KeyCode::PageDown => self.view.down(10),
            KeyCode::PageUp => self.view.up(10),
            KeyCode::Home => self.view.top(),
            KeyCode::End => self.view.bottom(),
            _ => return false,
        }
        true
    }
}

impl Component for DialogComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        let Some(dialog_type) = self.dialog_type.clone() else {
            return Action::None;
        };

        match dialog_type {
            DialogType::DeleteConfirmation { file_id, .. } => match key.code {
                KeyCode::Enter | KeyCode::Char('y') => {
                    self.clear_dialog();
                    Action::DeleteFile(file_id)
                }
                KeyCode::Esc | KeyCode::Char('n') => Action::HideDialog,
                _ => Action::None,
            },
            DialogType::Error { .. } | DialogType::Info(_) => {
                if self.handle_scroll_key(key) {
                    Action::None
                } else {
                    Action::HideDialog
                }
            }
            DialogType::Help => match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Action::HideDialog,
                _ => {
                    self.handle_scroll_key(key);
                    Action::None
                }
            },
            DialogType::Logs => match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('G') => Action::HideDialog,
                _ => {
                    self.handle_scroll_key(key);
                    Action::None
                }
            },
            DialogType::Preview { file_id } => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Action::HideDialog,
                KeyCode::Char('h') => Action::SavePreviewHtml(file_id),
                KeyCode::Char('n') => Action::SavePreviewNotebook(file_id),
                _ => {
                    self.handle_scroll_key(key);
                    Action::None
                }
            },
            // Rendered by the share dialog component
            DialogType::Share => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::ShowDialog(ref dialog_type) if *dialog_type != DialogType::Share => {
                self.clear_dialog();
                self.dialog_type = Some(dialog_type.clone());
                action
            }
            Action::HideDialog => {
                self.clear_dialog();
                action
            }
            Action::PreviewLoaded { file_id, text } => {
                // Late results for a preview that is no longer shown are dropped
                if self.preview.as_ref().is_some_and(|preview| preview.id() == file_id) {
                    self.preview_text = Some(text);
                }
                Action::None
            }
            _ => action,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let Some(dialog_type) = self.dialog_type.clone() else {
            return;
        };

        match dialog_type {
            DialogType::DeleteConfirmation { title, .. } => {
                system_dialogs::render_delete_confirmation_dialog(f, rect, &title);
            }
            DialogType::Error { title, message } => {
                system_dialogs::render_error_dialog(f, rect, &title, &message, &mut self.view);
            }
            DialogType::Info(message) => system_dialogs::render_info_dialog(f, rect, &message, &mut self.view),
            DialogType::Help => system_dialogs::render_help_dialog(f, rect, &mut self.view),
            DialogType::Logs => system_dialogs::render_logs_dialog(f, rect, &self.logger, &mut self.view),
            DialogType::Preview { .. } => {
                if let Some(preview) = self.preview.as_ref() {
                    preview_dialog::render_preview_dialog(
                        f,
                        rect,
                        preview,
                        self.preview_text.as_deref(),
                        &mut self.view,
                    );
                }
            }
            DialogType::Share => {}
        }
    }
}
