//! Constants used throughout the application
//!
//! This module centralizes magic strings, UI text, and other constant values
//! to improve maintainability and consistency.

use std::time::Duration;

// Permissions
/// Permission granting real-time collaborative edit rights
pub const LIVE_ACCESS_PERMISSION: &str = "LiveAccess";

// Validation Messages
pub const ERROR_INVALID_EMAILS: &str = "One or more of the emails provided are invalid";

// Share Dialog
pub const COPY_LINK: &str = "Copy link";
pub const COPY_LINK_NO_CODE: &str = "Copy link (no-code)";
pub const COPY_LIVE_LINK: &str = "Copy Live Link";
pub const DONE: &str = "Done";
pub const INFO_LINK_COPIED: &str = "Link copied";
pub const DISCARD_CHANGES_PROMPT: &str = "Discard unsaved changes?";
pub const NO_CODE_QUERY: &str = "view=nocode";

// Toast Titles and Messages
pub const TOAST_SHARING: &str = "Sharing";
pub const TOAST_SAVING: &str = "Saving...";
pub const SUCCESS_SAVED: &str = "Saved successfully";
pub const ERROR_SAVE_FAILED: &str = "Failed to save";

// Error Dialog Titles
pub const ERROR_SHARING_FAILED: &str = "Sharing failed";
pub const ERROR_REMOVE_FAILED: &str = "Failed to remove file.";
pub const ERROR_COLLABORATION_FAILED: &str = "Collaboration update failed";
pub const ERROR_REFRESH_FAILED: &str = "Refresh failed";

// Toolbar Text
pub const SHARE_LABEL: &str = "Share";
pub const SHARE_TOOLTIP: &str = "Publish and create a shareable link";
pub const COLLABORATION_ENABLED_TOOLTIP: &str = "Collaboration mode: enabled";
pub const COLLABORATION_DISABLED_TOOLTIP: &str = "Collaboration mode: disabled";
pub const COLLABORATION_UNSHARED_TOOLTIP: &str =
    "The document must be shared before real-time collaboration is enabled.";

// Sidebar Text
pub const SECTION_SHARED_BY_ME: &str = "Shared by me";
pub const SECTION_SHARED_WITH_ME: &str = "Shared with me";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const DIALOG_TITLE_LOGS: &str = "🔍 Logs - Press 'Esc' or 'q' to close";

// Drive prefix added by the real-time collaboration drive
pub const RTC_DRIVE_PREFIX: &str = "RTC:";

// Timing
/// Delay before a toast that reached a terminal message is dismissed
pub const TOAST_DISMISS_DELAY: Duration = Duration::from_millis(1500);
/// Default refresh interval of the shared notebooks list
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);
/// Upper bound of the refresh interval when backing off
pub const DEFAULT_REFRESH_MAX: Duration = Duration::from_secs(300);
/// Growth factor applied to the refresh interval when backing off
pub const DEFAULT_BACKOFF_GROWTH: u32 = 3;

// UI Layout Constants
/// Column width previews are rendered at
pub const PREVIEW_TEXT_WIDTH: usize = 100;

/// Minimum sidebar width in columns
pub const SIDEBAR_MIN_WIDTH: u16 = 20;
/// Maximum sidebar width in columns
pub const SIDEBAR_MAX_WIDTH: u16 = 80;
/// Default sidebar width in columns
pub const SIDEBAR_DEFAULT_WIDTH: u16 = 40;
