//! Clipboard bridge.
//!
//! Copying renders the selection to tab-separated text plus an HTML table
//! and hands both to a [`ClipboardBackend`]. Pasting reads a
//! [`ClipboardPayload`] back, prefers its HTML table, and turns it into a
//! [`PasteData`] grid of cell texts for the grid to apply.
//!
//! Two backends ship with the crate:
//!
//! - `SystemClipboard`: the platform clipboard via `arboard` (feature
//!   `system-clipboard`, on by default)
//! - [`MemoryClipboard`]: an in-process clipboard for headless hosts and
//!   tests
//!
//! When neither rich nor plain text can be written, the grid reports
//! [`ClipboardError::Unsupported`] and emits a notice that names the
//! keyboard shortcut the user can fall back to.

mod backend;
pub mod codec;
mod paste;

use thiserror::Error;

#[cfg(feature = "system-clipboard")]
pub use backend::SystemClipboard;
pub use backend::{ClipboardBackend, CopyMethod, MemoryClipboard, write_with_fallback};
pub use paste::{PasteData, PasteTicket};

/// Errors raised by clipboard backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// The clipboard cannot be opened.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard holds nothing the grid can read.
    #[error("clipboard is empty")]
    Empty,

    /// Programmatic clipboard access is not supported; the user has to use
    /// the keyboard shortcut instead.
    #[error("clipboard access is not supported, use {shortcut} instead")]
    Unsupported { shortcut: String },

    /// Any other backend failure.
    #[error("clipboard error: {0}")]
    Backend(String),

    /// The copied cells could not be encoded as text.
    #[error("failed to encode copied cells: {0}")]
    Encode(String),
}

impl From<csv::Error> for ClipboardError {
    fn from(err: csv::Error) -> Self {
        ClipboardError::Encode(err.to_string())
    }
}

#[cfg(feature = "system-clipboard")]
impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        match err {
            arboard::Error::ContentNotAvailable => ClipboardError::Empty,
            arboard::Error::ClipboardNotSupported => ClipboardError::Unavailable(err.to_string()),
            other => ClipboardError::Backend(other.to_string()),
        }
    }
}

/// Errors raised when a paste cannot be applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasteError {
    #[error("no active cell to paste into")]
    NoActiveCell,

    #[error("cannot paste while a cell is being edited")]
    Editing,

    #[error("nothing to paste")]
    Empty,

    /// Row `row` of the payload has `found` cells where the first row has
    /// `expected`.
    #[error("pasted row {row} has {found} cells, expected {expected}")]
    IrregularShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A newer paste started before this one finished.
    #[error("paste {ticket} was superseded by a newer paste")]
    Superseded { ticket: u64 },
}

/// The platform copy shortcut, for user-facing notices.
pub fn copy_shortcut() -> &'static str {
    if cfg!(target_os = "macos") {
        "⌘C"
    } else {
        "Ctrl+C"
    }
}

/// Notice shown when programmatic copy is impossible.
pub fn unsupported_notice() -> String {
    format!(
        "This action is unavailable here, but you can still use {} to copy the selection.",
        copy_shortcut()
    )
}

/// Clipboard contents in the formats the grid understands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub text: Option<String>,
    pub html: Option<String>,
}

impl ClipboardPayload {
    /// A plain-text payload.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            html: None,
        }
    }

    /// A payload with both HTML and a plain-text alternative.
    pub fn rich(text: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            html: Some(html.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.html.is_none()
    }

    /// Cell texts of the payload.
    ///
    /// An HTML table wins over plain text; HTML without a table falls back
    /// to the text. Returns `None` when there is nothing usable.
    pub fn rows(&self) -> Option<Vec<Vec<String>>> {
        if let Some(rows) = self.html.as_deref().and_then(codec::parse_text_html) {
            return Some(rows);
        }
        self.text.as_deref().map(codec::parse_text_plain)
    }
}
