//! Grid configuration.
//!
//! [`GridOptions`] collects the behavioural switches and default
//! measurements of a grid. Options can be built in code with the `with_*`
//! methods or loaded from a TOML document; missing keys take their defaults.
//!
//! ```
//! use horizon_grid::GridOptions;
//!
//! let options = GridOptions::from_toml_str("lock_rows = true\nrow_height = 32.0").unwrap();
//! assert!(options.lock_rows);
//! assert_eq!(options.row_height, 32.0);
//! assert!(options.smart_delete);
//! ```

use horizon_grid_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// What a paste does when the payload rows have different lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaggedPaste {
    /// Apply the cells that exist; missing cells leave the target untouched.
    #[default]
    Tolerate,
    /// Refuse the paste with [`PasteError::IrregularShape`](crate::PasteError::IrregularShape).
    Reject,
}

/// Behaviour switches and default measurements for a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Height of the sticky header row.
    pub header_row_height: f32,
    /// Height of every body row unless a variable height function is set.
    pub row_height: f32,
    /// Width of the row-number gutter column.
    pub gutter_column_width: f32,
    /// Width of the optional sticky column on the right edge.
    pub sticky_right_column_width: Option<f32>,
    /// Disable every row-count-changing operation.
    pub lock_rows: bool,
    /// Enter on the last row while editing appends a row.
    pub auto_add_row: bool,
    /// Deleting an already-empty selection deletes the rows themselves.
    pub smart_delete: bool,
    /// Never emit context menu requests.
    pub disable_context_menu: bool,
    /// Disable the fill handle.
    pub disable_expand_selection: bool,
    /// Handling of pastes whose rows have different lengths.
    pub ragged_paste: RaggedPaste,
    /// Side length of the square fill handle.
    pub fill_handle_size: f32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            header_row_height: 40.0,
            row_height: 40.0,
            gutter_column_width: 40.0,
            sticky_right_column_width: None,
            lock_rows: false,
            auto_add_row: false,
            smart_delete: true,
            disable_context_menu: false,
            disable_expand_selection: false,
            ragged_paste: RaggedPaste::Tolerate,
            fill_handle_size: 10.0,
        }
    }
}

impl GridOptions {
    /// Parse options from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, OptionsError> {
        let options = toml::from_str(source)?;
        tracing::debug!(target: targets::OPTIONS, ?options, "loaded grid options");
        Ok(options)
    }

    /// Serialize the options to a TOML document.
    pub fn to_toml_string(&self) -> Result<String, OptionsError> {
        Ok(toml::to_string(self)?)
    }

    pub fn with_header_row_height(mut self, height: f32) -> Self {
        self.header_row_height = height;
        self
    }

    pub fn with_row_height(mut self, height: f32) -> Self {
        self.row_height = height;
        self
    }

    pub fn with_gutter_column_width(mut self, width: f32) -> Self {
        self.gutter_column_width = width;
        self
    }

    pub fn with_sticky_right_column_width(mut self, width: f32) -> Self {
        self.sticky_right_column_width = Some(width);
        self
    }

    pub fn with_lock_rows(mut self, lock: bool) -> Self {
        self.lock_rows = lock;
        self
    }

    pub fn with_auto_add_row(mut self, enabled: bool) -> Self {
        self.auto_add_row = enabled;
        self
    }

    pub fn with_smart_delete(mut self, enabled: bool) -> Self {
        self.smart_delete = enabled;
        self
    }

    pub fn with_context_menu_disabled(mut self, disabled: bool) -> Self {
        self.disable_context_menu = disabled;
        self
    }

    pub fn with_expand_selection_disabled(mut self, disabled: bool) -> Self {
        self.disable_expand_selection = disabled;
        self
    }

    pub fn with_ragged_paste(mut self, policy: RaggedPaste) -> Self {
        self.ragged_paste = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GridOptions::default();
        assert!(options.smart_delete);
        assert!(!options.lock_rows);
        assert_eq!(options.ragged_paste, RaggedPaste::Tolerate);
        assert_eq!(options.sticky_right_column_width, None);
    }

    #[test]
    fn test_toml_partial_document() {
        let options = GridOptions::from_toml_str(
            r#"
            auto_add_row = true
            ragged_paste = "reject"
            sticky_right_column_width = 48.0
            "#,
        )
        .unwrap();
        assert!(options.auto_add_row);
        assert_eq!(options.ragged_paste, RaggedPaste::Reject);
        assert_eq!(options.sticky_right_column_width, Some(48.0));
        assert_eq!(options.row_height, 40.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let options = GridOptions::default()
            .with_lock_rows(true)
            .with_row_height(24.0);
        let text = options.to_toml_string().unwrap();
        assert_eq!(GridOptions::from_toml_str(&text).unwrap(), options);
    }

    #[test]
    fn test_toml_rejects_bad_types() {
        let err = GridOptions::from_toml_str("lock_rows = \"yes\"").unwrap_err();
        assert!(matches!(err, OptionsError::Parse(_)));
    }
}
