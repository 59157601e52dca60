//! Core UI functionality for nbshare.
//!
//! This module holds the state machines behind the screen and the plumbing
//! that connects them to the terminal. Nothing in here draws; the
//! components in [`crate::ui::components`] render what these types decide.
//!
//! # Module Components
//!
//! - [`actions`] - Actions exchanged between components, tasks and the app
//! - [`async_action`] - Progress toasts around one network operation
//! - [`component`] - Base component trait
//! - [`event_handler`] - Terminal input, focus changes and ticks
//! - [`form_state`] - Share dialog drafts and their dirty/valid state
//! - [`share_dialog`] - Button routing and close confirmation of the share dialog
//! - [`task_manager`] - Background network operations
//! - [`toolbar`] - Share and collaboration button state

pub mod actions;
pub mod async_action;
pub mod component;
pub mod event_handler;
pub mod form_state;
pub mod share_dialog;
pub mod task_manager;
pub mod toolbar;

// Re-export core types for easier access from other modules
pub use actions::{Action, DialogType, SidebarSection};
pub use async_action::{ActionOptions, AsyncActionController, DismissHandle, OverlayHost, Toast, ToastPhase};
pub use component::Component;
pub use event_handler::{EventHandler, EventType};
pub use form_state::{DraftEdit, FormState};
pub use share_dialog::{ClickTarget, DialogButton, DialogEvent, DialogOutcome, DialogState, ShareDialogController};
pub use task_manager::{TaskId, TaskManager};
pub use toolbar::ToolbarState;
