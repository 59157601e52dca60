//! Clipboard access for copy-link actions.

use std::io::Write;
use std::sync::Mutex;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Something that can receive copied text.
pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<()>;
}

/// Copies through the terminal using the OSC 52 escape sequence.
///
/// Works over SSH and in most modern terminal emulators. The last copied
/// text is remembered so the UI can echo it.
#[derive(Default)]
pub struct TerminalClipboard {
    last: Mutex<Option<String>>,
}

impl TerminalClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_copied(&self) -> Option<String> {
        self.last.lock().ok().and_then(|last| last.clone())
    }
}

/// Escape sequence asking the terminal to set the system clipboard.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

impl Clipboard for TerminalClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(osc52_sequence(text).as_bytes())
            .and_then(|_| stdout.flush())
            .context("Failed to write to the terminal clipboard")?;

        if let Ok(mut last) = self.last.lock() {
            *last = Some(text.to_string());
        }
        Ok(())
    }
}
