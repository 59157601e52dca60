//! Dialog rendering helpers

pub mod preview_dialog;
pub mod scroll_behavior;
pub mod system_dialogs;

pub use scroll_behavior::ScrollView;
