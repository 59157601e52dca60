//! Progress toasts for long-running network actions.
//!
//! An [`AsyncActionController`] wraps exactly one asynchronous operation. It
//! shows a pending toast right away, swaps in a success or failure message
//! once the operation settles, and removes the toast after
//! [`TOAST_DISMISS_DELAY`] (or immediately when no message is configured).
//! The operation's own result is always handed back to the caller: the
//! controller owns the progress display, the caller owns error handling.
//!
//! The toast is drawn by an injected [`OverlayHost`]; the controller never
//! touches the screen directly.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::sync::watch;

use crate::constants::TOAST_DISMISS_DELAY;

pub type ToastId = u64;

static NEXT_TOAST_ID: AtomicU64 = AtomicU64::new(1);

/// What a toast currently displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastPhase {
    Pending,
    Succeeded(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub title: String,
    pub tooltip: String,
    pub phase: ToastPhase,
}

impl Toast {
    /// Text shown in the toast body
    pub fn message(&self) -> &str {
        match &self.phase {
            ToastPhase::Pending => &self.title,
            ToastPhase::Succeeded(message) | ToastPhase::Failed(message) => message,
        }
    }

    /// The close affordance is offered once a terminal message is shown
    pub fn is_closable(&self) -> bool {
        !matches!(self.phase, ToastPhase::Pending)
    }
}

/// Display surface for toasts.
///
/// `attach` always takes over the display, preempting any toast already
/// shown. `update` and `detach` only affect the toast with the given id, so
/// a finished controller can never hide or overwrite a newer toast.
pub trait OverlayHost: Send + Sync {
    fn attach(&self, toast: Toast, handle: DismissHandle);
    fn update(&self, toast: Toast);
    fn detach(&self, id: ToastId);
}

/// Message shown when the wrapped operation fails.
#[derive(Clone)]
pub enum FailureMessage {
    Static(String),
    FromError(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl FailureMessage {
    fn render(&self, error: &str) -> String {
        match self {
            FailureMessage::Static(message) => message.clone(),
            FailureMessage::FromError(format) => format(error),
        }
    }
}

impl std::fmt::Debug for FailureMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureMessage::Static(message) => f.debug_tuple("Static").field(message).finish(),
            FailureMessage::FromError(_) => f.write_str("FromError(..)"),
        }
    }
}

/// Title, tooltip and terminal messages of one action.
#[derive(Debug, Clone)]
pub struct ActionOptions {
    pub title: String,
    pub tooltip: Option<String>,
    pub success_message: Option<String>,
    pub failure_message: Option<FailureMessage>,
}

impl ActionOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tooltip: None,
            success_message: None,
            failure_message: None,
        }
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(FailureMessage::Static(message.into()));
        self
    }

    pub fn failure_message_with<F>(mut self, format: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.failure_message = Some(FailureMessage::FromError(Arc::new(format)));
        self
    }
}

/// Outcome of the wrapped operation as far as the display is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Pending,
    Succeeded,
    Failed,
}

/// Snapshot published to lifecycle subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    pub phase: ActionPhase,
    pub visible: bool,
}

struct Shared {
    id: ToastId,
    host: Arc<dyn OverlayHost>,
    dismissed: AtomicBool,
    lifecycle: watch::Sender<Lifecycle>,
}

impl Shared {
    fn dismiss(&self) {
        if self.dismissed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("Dismissing toast {}", self.id);
        self.host.detach(self.id);
        self.lifecycle.send_modify(|state| state.visible = false);
    }

    fn set_phase(&self, phase: ActionPhase) {
        self.lifecycle.send_modify(|state| state.phase = phase);
    }
}

/// Closes a toast without touching the operation behind it.
#[derive(Clone)]
pub struct DismissHandle {
    shared: Arc<Shared>,
}

impl DismissHandle {
    pub fn id(&self) -> ToastId {
        self.shared.id
    }

    pub fn dismiss(&self) {
        self.shared.dismiss();
    }

    pub fn is_dismissed(&self) -> bool {
        self.shared.dismissed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for DismissHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DismissHandle").field("id", &self.shared.id).finish()
    }
}

/// Runs one asynchronous action with a progress toast.
///
/// Callers must not start a second controller for the same logical action
/// while one is in flight; disable the triggering control instead.
pub struct AsyncActionController {
    options: ActionOptions,
    dismiss_delay: Duration,
    shared: Arc<Shared>,
}

impl AsyncActionController {
    pub fn new(host: Arc<dyn OverlayHost>, options: ActionOptions) -> Self {
        let (lifecycle, _) = watch::channel(Lifecycle {
            phase: ActionPhase::Pending,
            visible: false,
        });
        Self {
            options,
            dismiss_delay: TOAST_DISMISS_DELAY,
            shared: Arc::new(Shared {
                id: NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed),
                host,
                dismissed: AtomicBool::new(false),
                lifecycle,
            }),
        }
    }

    pub fn with_dismiss_delay(mut self, delay: Duration) -> Self {
        self.dismiss_delay = delay;
        self
    }

    pub fn id(&self) -> ToastId {
        self.shared.id
    }

    pub fn handle(&self) -> DismissHandle {
        DismissHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Follow the toast's lifecycle.
    pub fn subscribe(&self) -> watch::Receiver<Lifecycle> {
        self.shared.lifecycle.subscribe()
    }

    /// Run `action`, mirroring its progress in a toast.
    ///
    /// Returns the action's own result; a failure is displayed *and*
    /// returned so the caller can react to it.
    pub async fn start<T, E, F>(self, action: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut toast = Toast {
            id: self.shared.id,
            title: self.options.title.clone(),
            tooltip: self.options.tooltip.clone().unwrap_or_else(|| self.options.title.clone()),
            phase: ToastPhase::Pending,
        };
        self.shared.host.attach(toast.clone(), self.handle());
        self.shared.lifecycle.send_replace(Lifecycle {
            phase: ActionPhase::Pending,
            visible: true,
        });

        let result = action.await;

        let (phase, message) = match &result {
            Ok(_) => (ActionPhase::Succeeded, self.options.success_message.clone()),
            Err(e) => (
                ActionPhase::Failed,
                self.options
                    .failure_message
                    .as_ref()
                    .map(|failure| failure.render(&e.to_string())),
            ),
        };
        self.shared.set_phase(phase);

        match message {
            Some(message) if !self.handle().is_dismissed() => {
                toast.phase = match phase {
                    ActionPhase::Failed => ToastPhase::Failed(message),
                    _ => ToastPhase::Succeeded(message),
                };
                self.shared.host.update(toast);

                let handle = self.handle();
                let delay = self.dismiss_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    handle.dismiss();
                });
            }
            _ => self.shared.dismiss(),
        }

        result
    }
}
