//! Single-slot toast overlay.
//!
//! Implements [`OverlayHost`] for the terminal: the most recently attached
//! toast owns the slot, and a preempted toast is dismissed so its controller
//! sees it as hidden.

use std::sync::Mutex;

use log::debug;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::core::async_action::{DismissHandle, OverlayHost, Toast, ToastId, ToastPhase};
use crate::ui::layout::{contains, LayoutManager};

const TOAST_WIDTH: u16 = 40;

#[derive(Default)]
pub struct ToastOverlay {
    slot: Mutex<Option<(Toast, DismissHandle)>>,
    area: Mutex<Option<Rect>>,
}

impl ToastOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toast currently on screen
    pub fn current(&self) -> Option<Toast> {
        self.slot
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|(toast, _)| toast.clone()))
    }

    pub fn is_visible(&self) -> bool {
        self.current().is_some()
    }

    /// Close the shown toast if it offers a close control.
    ///
    /// Returns whether a toast was closed.
    pub fn close_current(&self) -> bool {
        let handle = match self.slot.lock() {
            Ok(slot) => match slot.as_ref() {
                Some((toast, handle)) if toast.is_closable() => handle.clone(),
                _ => return false,
            },
            Err(_) => return false,
        };
        // Dismissing detaches through this overlay; the lock must be free
        handle.dismiss();
        true
    }

    /// Whether a click landed on the toast
    pub fn hit(&self, column: u16, row: u16) -> bool {
        self.area
            .lock()
            .ok()
            .and_then(|area| *area)
            .is_some_and(|area| contains(area, column, row))
    }

    pub fn render(&self, f: &mut Frame, rect: Rect) {
        let Some(toast) = self.current() else {
            if let Ok(mut area) = self.area.lock() {
                *area = None;
            }
            return;
        };

        let area = LayoutManager::toast_rect(TOAST_WIDTH, rect);
        if let Ok(mut last) = self.area.lock() {
            *last = Some(area);
        }

        let (color, symbol) = match toast.phase {
            ToastPhase::Pending => (Color::Yellow, "⟳"),
            ToastPhase::Succeeded(_) => (Color::Green, "✓"),
            ToastPhase::Failed(_) => (Color::Red, "✗"),
        };

        let mut spans = vec![Span::styled(
            format!("{} {}", symbol, toast.message()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )];
        if toast.is_closable() {
            spans.push(Span::styled("  [x]", Style::default().fg(Color::DarkGray)));
        }

        let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(toast.tooltip.clone())
                .border_style(Style::default().fg(color)),
        );

        f.render_widget(Clear, area);
        f.render_widget(paragraph, area);
    }
}

impl OverlayHost for ToastOverlay {
    fn attach(&self, toast: Toast, handle: DismissHandle) {
        let previous = match self.slot.lock() {
            Ok(mut slot) => slot.replace((toast, handle)),
            Err(_) => return,
        };
        if let Some((previous, handle)) = previous {
            debug!("Toast {} preempted", previous.id);
            handle.dismiss();
        }
    }

    fn update(&self, toast: Toast) {
        if let Ok(mut slot) = self.slot.lock() {
            if let Some((current, _)) = slot.as_mut() {
                if current.id == toast.id {
                    *current = toast;
                }
            }
        }
    }

    fn detach(&self, id: ToastId) {
        if let Ok(mut slot) = self.slot.lock() {
            if slot.as_ref().is_some_and(|(toast, _)| toast.id == id) {
                slot.take();
            }
        }
    }
}
