//! Status bar component

use ratatui::{
    layout::Alignment,
    style::{Color, Style},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::constants::ERROR_REFRESH_FAILED;
use crate::sync::poll::PollState;

/// What the status bar reports about the list refresh
#[derive(Debug, Clone, Default)]
pub struct RefreshStatus {
    pub refreshing: bool,
    pub visible: bool,
    pub poll: Option<PollState>,
    pub last_error: Option<String>,
}

/// Status bar component
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar
    pub fn render(f: &mut Frame, area: ratatui::layout::Rect, status: &RefreshStatus) {
        let status_text = if status.refreshing {
            "🔄 Refreshing shared notebooks...".to_string()
        } else if let Some(error) = &status.last_error {
            format!("{ERROR_REFRESH_FAILED}: {error}")
        } else {
            let cadence = match &status.poll {
                Some(poll) if poll.backoff_active => format!("refresh every {}s (backing off)", poll.interval.as_secs()),
                Some(poll) => format!("refresh every {}s", poll.interval.as_secs()),
                None => String::new(),
            };
            let standby = if status.visible { "" } else { " • paused while unfocused" };
            format!("s: share • d: remove • r: refresh • ?: help • q: quit • {cadence}{standby}")
        };

        let status_color = if status.refreshing {
            Color::Yellow
        } else if status.last_error.is_some() {
            Color::Red
        } else {
            Color::Gray
        };

        let status_bar = Paragraph::new(status_text)
            .block(Block::default())
            .alignment(Alignment::Center)
            .style(Style::default().fg(status_color));

        f.render_widget(status_bar, area);
    }
}
