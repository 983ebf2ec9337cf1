//! Error types for the grid crate.

use thiserror::Error;

use crate::clipboard::{ClipboardError, PasteError};

/// Errors that can occur while driving a [`DataGrid`](crate::DataGrid).
///
/// Geometry and navigation never fail: out-of-range input resolves to a
/// no-op instead. Errors are reserved for clipboard access, malformed paste
/// payloads and configuration.
#[derive(Error, Debug)]
pub enum GridError {
    /// Clipboard access failed.
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    /// A paste could not be applied.
    #[error(transparent)]
    Paste(#[from] PasteError),

    /// Grid options could not be loaded.
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// Layout measurements were rejected.
    #[error("invalid layout: {0}")]
    Layout(#[from] horizon_grid_core::CoreError),

    /// No column has the requested id.
    #[error("no column with id '{0}'")]
    ColumnNotFound(String),
}

/// Errors raised when loading or saving [`GridOptions`](crate::GridOptions).
#[derive(Error, Debug)]
pub enum OptionsError {
    /// The TOML document could not be parsed.
    #[error("failed to parse grid options: {0}")]
    Parse(#[from] toml::de::Error),

    /// The options could not be serialized.
    #[error("failed to serialize grid options: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::ColumnNotFound("sku".into());
        assert_eq!(err.to_string(), "no column with id 'sku'");

        let err = GridError::from(PasteError::Empty);
        assert_eq!(err.to_string(), PasteError::Empty.to_string());
    }
}
