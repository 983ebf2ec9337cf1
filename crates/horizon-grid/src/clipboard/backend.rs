use horizon_grid_core::logging::targets;

use crate::clipboard::{ClipboardError, ClipboardPayload, copy_shortcut};

/// Clipboard storage the grid copies to and pastes from.
///
/// Backends must be usable from the UI thread only; they are passed to the
/// grid per call rather than owned by it.
pub trait ClipboardBackend {
    /// Read the current contents.
    fn read(&mut self) -> Result<ClipboardPayload, ClipboardError>;

    /// Write HTML with a plain-text alternative.
    fn write_rich(&mut self, text: &str, html: &str) -> Result<(), ClipboardError>;

    /// Write plain text only.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Which write of the copy chain succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyMethod {
    Rich,
    PlainText,
}

/// Write `text` and `html`, falling back to plain text when the backend
/// cannot store rich content.
///
/// Fails with [`ClipboardError::Unsupported`] when neither write succeeds.
pub fn write_with_fallback(
    backend: &mut dyn ClipboardBackend,
    text: &str,
    html: &str,
) -> Result<CopyMethod, ClipboardError> {
    match backend.write_rich(text, html) {
        Ok(()) => return Ok(CopyMethod::Rich),
        Err(err) => {
            tracing::debug!(
                target: targets::CLIPBOARD,
                error = %err,
                "rich clipboard write failed, falling back to plain text"
            );
        }
    }
    match backend.write_text(text) {
        Ok(()) => Ok(CopyMethod::PlainText),
        Err(err) => {
            tracing::warn!(
                target: targets::CLIPBOARD,
                error = %err,
                "plain text clipboard write failed"
            );
            Err(ClipboardError::Unsupported {
                shortcut: copy_shortcut().to_string(),
            })
        }
    }
}

/// In-process clipboard.
///
/// Support for each write kind can be switched off to exercise the copy
/// fallback chain.
#[derive(Debug, Clone)]
pub struct MemoryClipboard {
    payload: ClipboardPayload,
    rich_supported: bool,
    text_supported: bool,
}

impl Default for MemoryClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self {
            payload: ClipboardPayload::default(),
            rich_supported: true,
            text_supported: true,
        }
    }

    /// A clipboard that already holds `payload`.
    pub fn with_payload(payload: ClipboardPayload) -> Self {
        Self {
            payload,
            ..Self::new()
        }
    }

    pub fn with_rich_supported(mut self, supported: bool) -> Self {
        self.rich_supported = supported;
        self
    }

    pub fn with_text_supported(mut self, supported: bool) -> Self {
        self.text_supported = supported;
        self
    }

    pub fn payload(&self) -> &ClipboardPayload {
        &self.payload
    }

    pub fn set_payload(&mut self, payload: ClipboardPayload) {
        self.payload = payload;
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn read(&mut self) -> Result<ClipboardPayload, ClipboardError> {
        if self.payload.is_empty() {
            return Err(ClipboardError::Empty);
        }
        Ok(self.payload.clone())
    }

    fn write_rich(&mut self, text: &str, html: &str) -> Result<(), ClipboardError> {
        if !self.rich_supported {
            return Err(ClipboardError::Backend("rich content not supported".into()));
        }
        self.payload = ClipboardPayload::rich(text, html);
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if !self.text_supported {
            return Err(ClipboardError::Backend("text not supported".into()));
        }
        self.payload = ClipboardPayload::text(text);
        Ok(())
    }
}

/// The platform clipboard.
///
/// Create one when needed and drop it after use; on some platforms a long
/// lived handle keeps the clipboard locked.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    /// Open the system clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be accessed, which can happen
    /// if the system clipboard is unavailable or locked by another process.
    pub fn new() -> Result<Self, ClipboardError> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardBackend for SystemClipboard {
    fn read(&mut self) -> Result<ClipboardPayload, ClipboardError> {
        let html = self.inner.get().html().ok();
        let text = self.inner.get_text().ok();
        let payload = ClipboardPayload { text, html };
        if payload.is_empty() {
            return Err(ClipboardError::Empty);
        }
        Ok(payload)
    }

    fn write_rich(&mut self, text: &str, html: &str) -> Result<(), ClipboardError> {
        self.inner.set_html(html, Some(text)).map_err(Into::into)
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner.set_text(text).map_err(Into::into)
    }
}

#[cfg(feature = "system-clipboard")]
impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard").finish_non_exhaustive()
    }
}
