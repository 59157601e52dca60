//! Sidebar listing the shared notebooks.
//!
//! Two collapsible sections, "Shared by me" and "Shared with me", each with
//! an item count. Items are ordered by the current [`SortOptions`] and are
//! replaced wholesale whenever a new snapshot arrives.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::constants::{SECTION_SHARED_BY_ME, SECTION_SHARED_WITH_ME};
use crate::models::{SharedLists, SharedRecord};
use crate::sync::{SortColumn, SortOptions};
use crate::ui::core::{
    actions::{Action, DialogType, SidebarSection},
    Component,
};
use crate::ui::layout::contains;
use crate::utils::datetime::format_human_at;

#[derive(Debug, Clone, PartialEq)]
enum SidebarRow {
    Header(SidebarSection),
    Item(SidebarSection, usize),
}

pub struct SidebarComponent {
    lists: Arc<SharedLists>,
    sort: SortOptions,
    expanded: HashMap<SidebarSection, bool>,
    rows: Vec<SidebarRow>,
    list_state: ListState,
    area: Rect,
}

impl Default for SidebarComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SidebarComponent {
    pub fn new() -> Self {
        let mut component = Self {
            lists: Arc::new(SharedLists::default()),
            sort: SortOptions {
                column: SortColumn::LastModified,
                desc: true,
            },
            expanded: HashMap::new(),
            rows: Vec::new(),
            list_state: ListState::default(),
            area: Rect::default(),
        };
        component.build_rows();
        component.list_state.select(Some(0));
        component
    }

    /// Replace both lists with a new snapshot.
    pub fn update_data(&mut self, lists: Arc<SharedLists>) {
        let selected = self.selected_record().map(|record| record.id.clone());
        let mut lists = (*lists).clone();
        self.sort.sort(&mut lists.shared_by_me);
        self.sort.sort(&mut lists.shared_with_me);
        self.lists = Arc::new(lists);
        self.build_rows();
        self.restore_selection(selected.as_deref());
    }

    pub fn lists(&self) -> &SharedLists {
        &self.lists
    }

    pub fn sort_options(&self) -> SortOptions {
        self.sort
    }

    fn is_expanded(&self, section: SidebarSection) -> bool {
        self.expanded.get(&section).copied().unwrap_or(true)
    }

    fn section_records(&self, section: SidebarSection) -> &[SharedRecord] {
        match section {
            SidebarSection::SharedByMe => &self.lists.shared_by_me,
            SidebarSection::SharedWithMe => &self.lists.shared_with_me,
        }
    }

    fn build_rows(&mut self) {
        self.rows.clear();
        for section in [SidebarSection::SharedByMe, SidebarSection::SharedWithMe] {
            self.rows.push(SidebarRow::Header(section));
            if self.is_expanded(section) {
                let count = self.section_records(section).len();
                self.rows.extend((0..count).map(|index| SidebarRow::Item(section, index)));
            }
        }
    }

    fn restore_selection(&mut self, id: Option<&str>) {
        let index = id.and_then(|id| {
            self.rows.iter().position(|row| match row {
                SidebarRow::Item(section, index) => self.section_records(*section)[*index].id == id,
                SidebarRow::Header(_) => false,
            })
        });
        let fallback = self.list_state.selected().unwrap_or(0).min(self.rows.len().saturating_sub(1));
        self.list_state.select(Some(index.unwrap_or(fallback)));
    }

    fn selected_row(&self) -> Option<&SidebarRow> {
        self.list_state.selected().and_then(|index| self.rows.get(index))
    }

    /// Record under the cursor with the section it belongs to
    pub fn selected(&self) -> Option<(SidebarSection, &SharedRecord)> {
        match self.selected_row()? {
            SidebarRow::Item(section, index) => self.section_records(*section).get(*index).map(|r| (*section, r)),
            SidebarRow::Header(_) => None,
        }
    }

    pub fn selected_record(&self) -> Option<&SharedRecord> {
        self.selected().map(|(_, record)| record)
    }

    pub fn toggle_section(&mut self, section: SidebarSection) {
        let expanded = !self.is_expanded(section);
        self.expanded.insert(section, expanded);
        self.build_rows();
        let header = self.rows.iter().position(|row| *row == SidebarRow::Header(section));
        self.list_state.select(header);
    }

    fn cycle_sort_column(&mut self) {
        self.sort.column = match self.sort.column {
            SortColumn::LastModified => SortColumn::Created,
            SortColumn::Created => SortColumn::Title,
            SortColumn::Title => SortColumn::LastModified,
        };
        self.update_data(Arc::clone(&self.lists));
    }

    fn toggle_sort_direction(&mut self) {
        self.sort.desc = !self.sort.desc;
        self.update_data(Arc::clone(&self.lists));
    }

    fn move_selection(&mut self, forward: bool) {
        if self.rows.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = if forward {
            (current + 1) % self.rows.len()
        } else {
            (current + self.rows.len() - 1) % self.rows.len()
        };
        self.list_state.select(Some(next));
    }

    /// Enter on a header folds it; on an item it opens the preview.
    fn activate(&mut self) -> Action {
        match self.selected_row().cloned() {
            Some(SidebarRow::Header(section)) => {
                self.toggle_section(section);
                Action::None
            }
            Some(SidebarRow::Item(..)) => match self.selected_record() {
                Some(record) => Action::OpenPreview(record.clone()),
                None => Action::None,
            },
            None => Action::None,
        }
    }

    fn share_selected(&self) -> Action {
        match self.selected() {
            Some((section, record)) => Action::OpenShare {
                file_id: record.id.clone(),
                title: record.display_title().to_string(),
                is_read_only: section == SidebarSection::SharedWithMe,
            },
            None => Action::None,
        }
    }

    /// Only documents the user published can be removed.
    fn delete_selected(&self) -> Action {
        match self.selected() {
            Some((SidebarSection::SharedByMe, record)) => Action::ShowDialog(DialogType::DeleteConfirmation {
                file_id: record.id.clone(),
                title: record.display_title().to_string(),
            }),
            _ => Action::None,
        }
    }

    fn render_row(&self, row: &SidebarRow) -> ListItem<'static> {
        match row {
            SidebarRow::Header(section) => {
                let (title, count) = match section {
                    SidebarSection::SharedByMe => (SECTION_SHARED_BY_ME, self.lists.shared_by_me.len()),
                    SidebarSection::SharedWithMe => (SECTION_SHARED_WITH_ME, self.lists.shared_with_me.len()),
                };
                let marker = if self.is_expanded(*section) { "▼" } else { "▶" };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{marker} {title} "),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("({count})"), Style::default().fg(Color::DarkGray)),
                ]))
            }
            SidebarRow::Item(section, index) => {
                let Some(record) = self.section_records(*section).get(*index) else {
                    return ListItem::new("");
                };
                let updated = record
                    .last_modified_at()
                    .map(|time| format_human_at(time, Utc::now()))
                    .unwrap_or_default();
                let mut spans = vec![Span::raw(format!("  {}", record.display_title()))];
                if record.live_enabled {
                    spans.push(Span::styled(" ●", Style::default().fg(Color::Green)));
                }
                if *section == SidebarSection::SharedWithMe {
                    let author = record.author_contact();
                    spans.push(Span::styled(
                        format!(" {}", author.display_name()),
                        Style::default().fg(Color::Magenta),
                    ));
                }
                spans.push(Span::styled(format!(" {updated}"), Style::default().fg(Color::DarkGray)));
                ListItem::new(Line::from(spans))
            }
        }
    }
}

impl Component for SidebarComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(true);
                Action::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(false);
                Action::None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Char('s') => self.share_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('o') => {
                self.cycle_sort_column();
                Action::None
            }
            KeyCode::Char('O') => {
                self.toggle_sort_direction();
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Action {
        if !contains(self.area, mouse.column, mouse.row) {
            return Action::None;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if mouse.row > self.area.y && mouse.row < self.area.y + self.area.height - 1 {
                    let clicked = self.list_state.offset() + (mouse.row - self.area.y - 1) as usize;
                    // Guard against clicks beyond the available rows
                    if clicked >= self.rows.len() {
                        return Action::None;
                    }
                    self.list_state.select(Some(clicked));
                    self.activate()
                } else {
                    Action::None
                }
            }
            MouseEventKind::ScrollUp => {
                self.move_selection(false);
                Action::None
            }
            MouseEventKind::ScrollDown => {
                self.move_selection(true);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::ListsUpdated(lists) => {
                self.update_data(Arc::clone(&lists));
                Action::ListsUpdated(lists)
            }
            _ => action,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        self.area = rect;
        let items: Vec<ListItem> = self.rows.iter().map(|row| self.render_row(row)).collect();

        let sort = match self.sort.column {
            SortColumn::Title => "title",
            SortColumn::LastModified => "updated",
            SortColumn::Created => "created",
        };
        let direction = if self.sort.desc { "↓" } else { "↑" };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title("Shared notebooks")
                    .title_bottom(format!(" sort: {sort} {direction} "))
                    .title_style(Style::default().fg(Color::White))
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .style(Style::default().fg(Color::White));

        f.render_stateful_widget(list, rect, &mut self.list_state);
    }
}
