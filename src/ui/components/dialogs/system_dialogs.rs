use super::scroll_behavior::ScrollView;
use crate::constants::DIALOG_TITLE_LOGS;
use crate::logger::Logger;
use crate::ui::layout::LayoutManager;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
    Frame,
};

const HELP_CONTENT: &str = r"
NBSHARE - Notebook sharing from the terminal
============================================

DOCUMENT BAR
------------
p           Publish (share) the open notebook
L           Toggle live collaboration on the open notebook

SIDEBAR
-------
j/k         Move down/up
Enter       Fold a section or preview a notebook
s           Open sharing settings of the selected notebook
d           Remove a notebook you shared (with confirmation)
r           Refresh both lists now
o / O       Cycle sort column / flip sort direction

SHARE DIALOG
------------
a           Add a collaborator (type to search, Enter to add)
x           Remove the selected collaborator
e           Toggle editor access of the selected collaborator
l           Toggle live collaboration
c / n / L   Copy link / copy link without code / copy live link
Tab, Enter  Move between buttons, press the focused one
Esc         Close (asks before discarding changes)

PREVIEW
-------
h           Save the preview as HTML into the working directory
n           Save the notebook into the working directory
j/k         Scroll

GENERAL
-------
x           Close the current toast once it shows a result
G           Show logs
?           Toggle this help
q, Ctrl+C   Quit
";

fn scrollbar() -> Scrollbar<'static> {
    Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .track_symbol(Some("│"))
        .thumb_symbol("▐")
        .style(Style::default().fg(Color::Gray))
        .thumb_style(Style::default().fg(Color::White))
}

/// Bordered box with scrollable text and an instruction line at the bottom.
fn render_message_box(
    f: &mut Frame,
    dialog_area: Rect,
    title: &str,
    color: Color,
    message: &str,
    instructions: &str,
    view: &mut ScrollView,
) {
    f.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .style(Style::default().fg(color));

    let content_area = Rect::new(
        dialog_area.x + 1,
        dialog_area.y + 1,
        dialog_area.width.saturating_sub(2),
        dialog_area.height.saturating_sub(4),
    );

    let instructions_area = Rect::new(
        dialog_area.x + 1,
        dialog_area.y + dialog_area.height.saturating_sub(2),
        dialog_area.width.saturating_sub(2),
        1,
    );

    let (visible, overflow) = view.window(message, content_area.height as usize);

    let message_paragraph = Paragraph::new(visible.join("\n"))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    let instructions_paragraph = Paragraph::new(instructions.to_string())
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    f.render_widget(block, dialog_area);
    f.render_widget(message_paragraph, content_area);
    f.render_widget(instructions_paragraph, instructions_area);

    if overflow {
        f.render_stateful_widget(scrollbar(), content_area, &mut view.scrollbar);
    }
}

pub fn render_delete_confirmation_dialog(f: &mut Frame, area: Rect, title: &str) {
    let dialog_area = LayoutManager::centered_rect_lines(50, 6, area);
    f.render_widget(Clear, dialog_area);

    let message = format!("Stop sharing \"{}\"?", title);
    let instructions = "Press Enter or y to confirm, Esc to cancel";

    let block = Block::default()
        .borders(Borders::ALL)
        .title("⚠ Confirm removal")
        .style(Style::default().fg(Color::Red));

    let message_area = Rect::new(dialog_area.x + 1, dialog_area.y + 1, dialog_area.width.saturating_sub(2), 2);
    let instructions_area = Rect::new(
        dialog_area.x + 1,
        dialog_area.y + dialog_area.height.saturating_sub(2),
        dialog_area.width.saturating_sub(2),
        1,
    );

    f.render_widget(block, dialog_area);
    f.render_widget(
        Paragraph::new(message)
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        message_area,
    );
    f.render_widget(
        Paragraph::new(instructions)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        instructions_area,
    );
}

pub fn render_info_dialog(f: &mut Frame, area: Rect, message: &str, view: &mut ScrollView) {
    let dialog_area = LayoutManager::centered_rect_lines(60, 10, area);
    render_message_box(
        f,
        dialog_area,
        "ℹ Info",
        Color::Blue,
        message,
        "Press any key to continue • j/k to scroll if needed",
        view,
    );
}

pub fn render_error_dialog(f: &mut Frame, area: Rect, title: &str, message: &str, view: &mut ScrollView) {
    let dialog_area = LayoutManager::centered_rect_lines(70, 12, area);
    render_message_box(
        f,
        dialog_area,
        &format!("⚠ {title}"),
        Color::Red,
        message,
        "Press any key to continue • j/k to scroll if needed",
        view,
    );
}

pub fn render_help_dialog(f: &mut Frame, area: Rect, view: &mut ScrollView) {
    let help_area = LayoutManager::centered_rect(80, 90, area);
    render_message_box(
        f,
        help_area,
        "📖 Help",
        Color::White,
        HELP_CONTENT,
        "Press 'Esc' or '?' to close",
        view,
    );
}

pub fn render_logs_dialog(f: &mut Frame, area: Rect, logger: &Logger, view: &mut ScrollView) {
    let logs_area = LayoutManager::centered_rect(90, 90, area);

    let logs = logger.get_logs();
    let logs_content = if logs.is_empty() {
        "No logs available".to_string()
    } else {
        logs.join("\n")
    };

    render_message_box(
        f,
        logs_area,
        DIALOG_TITLE_LOGS,
        Color::White,
        &logs_content,
        "j/k scroll • PageUp/PageDown page • Home/End jump",
        view,
    );
}
