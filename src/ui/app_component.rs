use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use log::{debug, info, warn};
use ratatui::{layout::Rect, Frame};
use tokio::sync::mpsc;

use crate::backend::SharingBackend;
use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::constants::{ERROR_REFRESH_FAILED, ERROR_SAVE_FAILED};
use crate::logger::Logger;
use crate::models::SharedLists;
use crate::preview::PreviewModel;
use crate::sharing::SharingService;
use crate::sync::SharedNotebooksModel;
use crate::ui::components::{
    DialogComponent, RefreshStatus, ShareDialogComponent, SidebarComponent, StatusBar, ToastOverlay,
    ToolbarComponent,
};
use crate::ui::core::{
    actions::{Action, DialogType},
    event_handler::EventType,
    task_manager::TaskManager,
    Component,
};
use crate::ui::layout::LayoutManager;

const REFRESH_TASK: &str = "Refresh";

pub struct AppComponent {
    // Component composition
    toolbar: ToolbarComponent,
    sidebar: SidebarComponent,
    share_dialog: ShareDialogComponent,
    dialog: DialogComponent,
    toast: Arc<ToastOverlay>,

    // Services
    sharing: SharingService,
    model: Arc<SharedNotebooksModel>,
    previews: HashMap<String, Arc<PreviewModel>>,
    task_manager: TaskManager,
    background_action_rx: mpsc::UnboundedReceiver<Action>,
    logger: Logger,
    config: Config,

    // Simple UI state
    visible: bool,
    refresh_error: Option<String>,
    should_quit: bool,
}

impl AppComponent {
    pub fn new(
        config: Config,
        backend: Arc<dyn SharingBackend>,
        clipboard: Arc<dyn Clipboard>,
        logger: Logger,
        notebook: Option<PathBuf>,
    ) -> Self {
        let toast = Arc::new(ToastOverlay::new());
        let sharing =
            SharingService::new(Arc::clone(&backend), toast.clone()).with_dismiss_delay(config.toast.dismiss_delay());
        let model = Arc::new(SharedNotebooksModel::new(backend, config.polling.to_poll_config()));
        let (task_manager, background_action_rx) = TaskManager::new();

        Self {
            toolbar: ToolbarComponent::new(notebook),
            sidebar: SidebarComponent::new(),
            share_dialog: ShareDialogComponent::new(clipboard),
            dialog: DialogComponent::new(logger.clone()),
            toast,
            sharing,
            model,
            previews: HashMap::new(),
            task_manager,
            background_action_rx,
            logger,
            config,
            visible: true,
            refresh_error: None,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Get the number of active background tasks
    pub fn active_task_count(&self) -> usize {
        self.task_manager.task_count()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn lists(&self) -> &SharedLists {
        self.sidebar.lists()
    }

    /// Dialog currently shown, excluding the share dialog
    pub fn dialog_type(&self) -> Option<&DialogType> {
        self.dialog.dialog_type.as_ref()
    }

    pub fn is_share_dialog_visible(&self) -> bool {
        self.share_dialog.is_visible()
    }

    /// Whether the list refresh considers the view visible
    pub fn is_visible(&self) -> bool {
        self.visible && self.model.is_visible()
    }

    pub fn open_preview_count(&self) -> usize {
        self.previews.len()
    }

    /// Subscribe to list snapshots, fetch both lists and look up the open document
    pub fn start(&mut self) {
        info!("AppComponent: starting shared notebook refresh");
        self.task_manager.spawn_list_forwarder(self.model.subscribe());
        self.task_manager.spawn_refresh(Arc::clone(&self.model));

        if let Some(path) = self.toolbar.document() {
            let path = path.display().to_string();
            info!("AppComponent: looking up sharing state of {}", path);
            self.task_manager.spawn_lookup(self.sharing.clone(), path);
        }
    }

    /// Stop polling and every background task
    pub fn shutdown(&mut self) {
        self.model.dispose();
        self.task_manager.cancel_all_tasks();
    }

    /// Handle global keyboard shortcuts that aren't component-specific
    fn handle_global_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => {
                info!("Global key: 'q' - quitting application");
                Action::Quit
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                info!("Global key: Ctrl+C - quitting application");
                Action::Quit
            }
            KeyCode::Char('?') => Action::ShowDialog(DialogType::Help),
            KeyCode::Char('G') => Action::ShowDialog(DialogType::Logs),
            KeyCode::Char('x') | KeyCode::Esc => {
                if self.toast.close_current() {
                    debug!("Global key: closed the current toast");
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Action {
        if self.toast.hit(mouse.column, mouse.row) {
            self.toast.close_current();
            return Action::None;
        }
        if self.share_dialog.is_visible() {
            return self.share_dialog.handle_mouse(mouse);
        }
        if self.dialog.is_visible() {
            return Action::None;
        }
        self.sidebar.handle_mouse(mouse)
    }

    fn refresh_lists(&mut self) {
        if self.task_manager.is_running(REFRESH_TASK) {
            debug!("Refresh already in progress, ignoring");
            return;
        }
        self.task_manager.spawn_refresh(Arc::clone(&self.model));
    }

    /// Show the preview of `record`, reusing the one already opened for it
    fn open_preview(&mut self, record: crate::models::SharedRecord) {
        let sharing = &self.sharing;
        let preview = self
            .previews
            .entry(record.id.clone())
            .or_insert_with(|| Arc::new(PreviewModel::new(record, sharing.clone())))
            .clone();

        self.dialog.show_preview(Arc::clone(&preview));
        if !preview.is_ready() {
            self.task_manager.spawn_preview_fetch(preview);
        }
    }

    /// Previews of records that changed or disappeared are dropped
    fn prune_previews(&mut self, lists: &SharedLists) {
        self.previews.retain(|id, preview| {
            lists
                .shared_by_me
                .iter()
                .chain(lists.shared_with_me.iter())
                .any(|record| &record.id == id && record.version == preview.record().version)
        });
    }

    fn save_preview(&mut self, file_id: &str, as_html: bool) -> Action {
        let Some(preview) = self.previews.get(file_id).cloned() else {
            warn!("Save requested for unknown preview {}", file_id);
            return Action::None;
        };
        let dir = match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                return Action::OperationFailed {
                    title: ERROR_SAVE_FAILED.to_string(),
                    message: e.to_string(),
                }
            }
        };
        if as_html {
            self.task_manager.spawn_save_html(preview, dir);
        } else {
            self.task_manager.spawn_save_notebook(preview, dir);
        }
        Action::None
    }

    /// Handle app-level actions that require business logic.
    ///
    /// Returns a follow-up action, or [`Action::None`] when done.
    pub fn handle_app_action(&mut self, action: Action) -> Action {
        match action {
            Action::Quit => {
                self.should_quit = true;
                self.shutdown();
                Action::None
            }
            Action::Publish => {
                if let Some(path) = self.toolbar.document().map(|path| path.to_path_buf()) {
                    info!("Toolbar: publishing {}", path.display());
                    self.task_manager.spawn_publish(self.sharing.clone(), path);
                }
                Action::None
            }
            Action::ToggleLive => {
                if let Some(path) = self.toolbar.document() {
                    let path = path.display().to_string();
                    let label = self.toolbar.document_label();
                    let enabled = self.toolbar.state.collaboration_pressed();
                    info!("Toolbar: toggling live collaboration on {} (enabled: {})", path, enabled);
                    self.task_manager
                        .spawn_toggle_live(self.sharing.clone(), path, label, enabled);
                }
                Action::None
            }
            Action::Published(record) => {
                info!("Published {} as {}", record.display_title(), record.shareable_link);
                self.refresh_lists();
                Action::None
            }
            Action::LiveToggled(toggle) => {
                if toggle.needs_collaborators {
                    info!("Live collaboration enabled without collaborators, opening sharing settings");
                    return Action::OpenShare {
                        file_id: toggle.record.id.clone(),
                        title: toggle.record.display_title().to_string(),
                        is_read_only: false,
                    };
                }
                Action::None
            }
            Action::OpenShare {
                file_id,
                title,
                is_read_only,
            } => {
                self.share_dialog.show_loading(&file_id, &title);
                self.task_manager
                    .spawn_open_share(self.sharing.clone(), file_id, title, is_read_only);
                Action::None
            }
            Action::SubmitShare(outcome) => {
                self.task_manager.spawn_submit(self.sharing.clone(), outcome);
                Action::None
            }
            Action::ShareSubmitted(Some(record)) => {
                info!("Sharing settings of {} updated", record.display_title());
                if self.toolbar.record().is_some_and(|current| current.id == record.id) {
                    self.toolbar.set_record(Some(record));
                }
                self.refresh_lists();
                Action::None
            }
            Action::SearchUsers(query) => {
                self.task_manager.spawn_user_search(self.sharing.clone(), query);
                Action::None
            }
            Action::DeleteFile(file_id) => {
                info!("Removing {} from the sharing service", file_id);
                self.task_manager.spawn_delete(self.sharing.clone(), file_id);
                Action::None
            }
            Action::FileDeleted(file_id) => {
                self.previews.remove(&file_id);
                if self.toolbar.record().is_some_and(|current| current.id == file_id) {
                    self.toolbar.set_record(None);
                }
                self.refresh_lists();
                Action::None
            }
            Action::OpenPreview(record) => {
                self.open_preview(record);
                Action::None
            }
            Action::SavePreviewHtml(file_id) => self.save_preview(&file_id, true),
            Action::SavePreviewNotebook(file_id) => self.save_preview(&file_id, false),
            Action::PreviewSaved(path) => {
                info!("Saved {}", path);
                Action::None
            }
            Action::Refresh => {
                self.refresh_lists();
                Action::None
            }
            Action::ListsUpdated(lists) => {
                self.refresh_error = None;
                self.prune_previews(&lists);
                Action::None
            }
            Action::OperationFailed { title, message } => {
                warn!("{}: {}", title, message);
                if title == ERROR_REFRESH_FAILED {
                    self.refresh_error = Some(message.clone());
                }
                // A share dialog still waiting for its record has nothing to show
                if self.share_dialog.is_visible() && self.share_dialog.controller().is_none() {
                    self.share_dialog.hide();
                }
                Action::ShowDialog(DialogType::Error { title, message })
            }
            Action::FocusChanged(visible) => {
                self.visible = visible;
                self.model.set_visible(visible);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Run an action through the components and the app until nothing follows
    pub fn dispatch(&mut self, action: Action) {
        let mut action = action;
        while !matches!(action, Action::None) {
            debug!("Dispatching {:?}", action);
            let routed = self.update(action);
            action = self.handle_app_action(routed);
        }
    }

    /// Process background actions from task manager
    pub fn process_background_actions(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();

        // Process all available background actions
        while let Ok(action) = self.background_action_rx.try_recv() {
            debug!("Background: received action {:?}", action);
            actions.push(action);
        }

        // Clean up finished tasks
        let completed = self.task_manager.cleanup_finished_tasks();
        if completed > 0 {
            debug!("Background: cleaned up {} finished tasks", completed);
        }

        actions
    }

    /// Check if any background operations are running
    pub fn is_busy(&self) -> bool {
        self.task_manager.task_count() > 0
    }

    fn refresh_status(&self) -> RefreshStatus {
        RefreshStatus {
            refreshing: self.task_manager.is_running(REFRESH_TASK),
            visible: self.visible,
            poll: Some(self.model.poll_state()),
            last_error: self.refresh_error.clone(),
        }
    }

    /// Process an event through the component hierarchy
    pub fn handle_event(&mut self, event_type: EventType) -> anyhow::Result<()> {
        let action = match event_type {
            EventType::Key(key) => {
                // The share dialog renders above everything else
                if self.share_dialog.is_visible() {
                    self.share_dialog.handle_key_events(key)
                } else if self.dialog.is_visible() {
                    self.dialog.handle_key_events(key)
                } else {
                    let toolbar_action = self.toolbar.handle_key_events(key);
                    if !matches!(toolbar_action, Action::None) {
                        toolbar_action
                    } else {
                        let sidebar_action = self.sidebar.handle_key_events(key);
                        if !matches!(sidebar_action, Action::None) {
                            sidebar_action
                        } else {
                            self.handle_global_key(key)
                        }
                    }
                }
            }
            EventType::Mouse(mouse) => {
                if self.config.ui.mouse_enabled {
                    self.handle_mouse(mouse)
                } else {
                    Action::None
                }
            }
            EventType::Focus(visible) => Action::FocusChanged(visible),
            EventType::Resize(_, _) | EventType::Tick | EventType::Other => Action::None,
        };

        self.dispatch(action);
        Ok(())
    }
}

impl Component for AppComponent {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        // This shouldn't be called directly - use handle_event instead
        self.handle_global_key(key)
    }

    fn update(&mut self, action: Action) -> Action {
        // Process through component hierarchy
        let action = self.toolbar.update(action);
        let action = self.share_dialog.update(action);
        let action = self.dialog.update(action);
        self.sidebar.update(action)
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let chunks = LayoutManager::main_layout(rect);
        let body = LayoutManager::body_layout(chunks[1], self.config.ui.sidebar_width);

        self.toolbar.render(f, chunks[0]);
        self.sidebar.render(f, body[0]);
        self.toolbar.render_document(f, body[1]);
        StatusBar::render(f, chunks[2], &self.refresh_status());

        // Modals on top, the share dialog above the others
        if self.dialog.is_visible() {
            self.dialog.render(f, rect);
        }
        if self.share_dialog.is_visible() {
            self.share_dialog.render(f, rect);
        }
        self.toast.render(f, rect);
    }
}
