use super::scroll_behavior::ScrollView;
use crate::preview::PreviewModel;
use crate::ui::layout::LayoutManager;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
    Frame,
};

/// Shared notebook preview with its save actions.
pub fn render_preview_dialog(
    f: &mut Frame,
    area: Rect,
    preview: &PreviewModel,
    content: Option<&str>,
    view: &mut ScrollView,
) {
    let dialog_area = LayoutManager::centered_rect(85, 85, area);
    f.render_widget(Clear, dialog_area);

    let (label, tooltip) = preview.last_updated();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!("Preview \"{}\"", preview.record().display_title()))
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(dialog_area);
    f.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let button = |text: &str, busy: bool| {
        if busy {
            Span::styled(format!("[ {text}... ] "), Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(format!("[ {text} ] "), Style::default().fg(Color::Cyan))
        }
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            button("h Save As HTML", preview.is_saving_html()),
            button("n Save As Notebook", preview.is_saving_notebook()),
            Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        ])),
        chunks[0],
    );

    match content {
        Some(text) => {
            let (visible, overflow) = view.window(text, chunks[1].height as usize);
            f.render_widget(
                Paragraph::new(visible.join("\n")).wrap(Wrap { trim: false }),
                chunks[1],
            );
            if overflow {
                let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓"));
                f.render_stateful_widget(scrollbar, chunks[1], &mut view.scrollbar);
            }
        }
        None => f.render_widget(
            Paragraph::new("⟳ Loading preview...")
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center),
            chunks[1],
        ),
    }

    f.render_widget(
        Paragraph::new(tooltip)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        chunks[2],
    );
}
