//! State behind the share and collaboration buttons of the document bar.

use chrono::{DateTime, Utc};

use crate::constants::{
    COLLABORATION_DISABLED_TOOLTIP, COLLABORATION_ENABLED_TOOLTIP, COLLABORATION_UNSHARED_TOOLTIP, SHARE_LABEL,
    SHARE_TOOLTIP,
};
use crate::models::SharedRecord;
use crate::utils::datetime::format_human_at;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolbarState {
    last_shared: Option<DateTime<Utc>>,
    /// Whether the document has a published record on the server
    published: bool,
    live_enabled: bool,
    share_busy: bool,
    collaboration_busy: bool,
}

impl ToolbarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the state of a looked-up or freshly updated record.
    pub fn apply_record(&mut self, record: Option<&SharedRecord>) {
        match record {
            Some(record) => {
                self.published = true;
                self.last_shared = record.last_modified_at();
                self.live_enabled = record.live_enabled;
            }
            None => {
                self.published = false;
                self.last_shared = None;
                self.live_enabled = false;
            }
        }
    }

    pub fn set_share_busy(&mut self, busy: bool) {
        self.share_busy = busy;
    }

    pub fn set_collaboration_busy(&mut self, busy: bool) {
        self.collaboration_busy = busy;
    }

    pub fn set_live_enabled(&mut self, enabled: bool) {
        self.live_enabled = enabled;
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn share_label(&self, now: DateTime<Utc>) -> String {
        match self.last_shared {
            Some(time) => format!("{} (updated {})", SHARE_LABEL, format_human_at(time, now)),
            None => SHARE_LABEL.to_string(),
        }
    }

    pub fn share_tooltip(&self) -> &'static str {
        SHARE_TOOLTIP
    }

    pub fn share_enabled(&self) -> bool {
        !self.share_busy
    }

    pub fn collaboration_pressed(&self) -> bool {
        self.live_enabled
    }

    /// Live collaboration can only be toggled once the document is shared.
    pub fn collaboration_enabled(&self) -> bool {
        self.published && !self.collaboration_busy
    }

    pub fn collaboration_tooltip(&self) -> &'static str {
        if !self.published {
            COLLABORATION_UNSHARED_TOOLTIP
        } else if self.live_enabled {
            COLLABORATION_ENABLED_TOOLTIP
        } else {
            COLLABORATION_DISABLED_TOOLTIP
        }
    }
}
