//! Reusable UI components

// Component architecture
pub mod dialog_component;
pub mod dialogs;
pub mod share_dialog_component;
pub mod sidebar_component;
pub mod status_bar;
pub mod toast_component;
pub mod toolbar_component;

// Component exports
pub use dialog_component::DialogComponent;
pub use share_dialog_component::ShareDialogComponent;
pub use sidebar_component::SidebarComponent;
pub use status_bar::{RefreshStatus, StatusBar};
pub use toast_component::ToastOverlay;
pub use toolbar_component::ToolbarComponent;
