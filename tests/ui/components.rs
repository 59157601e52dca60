#[path = "components/toast_component.rs"]
mod toast_component;

#[path = "components/share_dialog_component.rs"]
mod share_dialog_component;

#[path = "components/toolbar_component.rs"]
mod toolbar_component;
