use ratatui::widgets::ScrollbarState;

/// Scroll position of a text dialog.
///
/// The offset may run past the end; renderers clamp it to the content.
#[derive(Debug, Default)]
pub struct ScrollView {
    pub offset: usize,
    pub scrollbar: ScrollbarState,
}

impl ScrollView {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        self.scrollbar = self.scrollbar.position(self.offset);
    }

    pub fn down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines);
        self.scrollbar = self.scrollbar.position(self.offset);
    }

    pub fn top(&mut self) {
        self.offset = 0;
        self.scrollbar = self.scrollbar.position(0);
    }

    pub fn bottom(&mut self) {
        self.offset = usize::MAX;
        self.scrollbar = self.scrollbar.position(usize::MAX);
    }

    /// Lines of `text` visible in a viewport of `height` rows.
    pub fn window<'a>(&mut self, text: &'a str, height: usize) -> (Vec<&'a str>, bool) {
        let lines: Vec<&str> = text.lines().collect();
        let total = lines.len();
        let clamped = self.offset.min(total.saturating_sub(height));
        self.offset = clamped;
        self.scrollbar = self
            .scrollbar
            .content_length(total)
            .viewport_content_length(height)
            .position(clamped);
        let visible = lines.into_iter().skip(clamped).take(height).collect();
        (visible, total > height)
    }
}
