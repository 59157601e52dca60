#[path = "core/async_action.rs"]
mod async_action;

#[path = "core/form_state.rs"]
mod form_state;

#[path = "core/share_dialog.rs"]
mod share_dialog;

#[path = "core/task_manager.rs"]
mod task_manager;
