//! Column definitions.
//!
//! A [`Column<T>`] describes how one column of a `T` row behaves: whether
//! its cells can be edited, how they convert to and from clipboard text,
//! what "empty" and "delete" mean, and how they are validated. Every hook is
//! optional and takes the row plus its index.
//!
//! Typical columns come from the presets:
//!
//! - [`Column::text`]: optional text, trimmed and single-lined on paste
//! - [`Column::float`]: optional number, accepting `,` as decimal separator
//! - [`Column::checkbox`]: boolean with lenient truthy/falsy parsing
//!
//! ```
//! use horizon_grid::{Column, ValidationSchema};
//!
//! #[derive(Clone)]
//! struct Product {
//!     sku: Option<String>,
//!     archived: bool,
//! }
//!
//! let sku = Column::text(
//!     "sku",
//!     |p: &Product| p.sku.clone(),
//!     |p: &Product, sku| Product { sku, ..p.clone() },
//! )
//! .with_title("SKU")
//! .with_width(120.0)
//! .with_disabled_when(|p: &Product, _row| p.archived)
//! .with_schema(ValidationSchema::new().required());
//!
//! assert_eq!(sku.id(), "sku");
//! ```

use std::fmt;
use std::sync::Arc;

pub use serde_json::Value;

use crate::validation::{ValidationSchema, is_blank};

type RowPredicate<T> = Arc<dyn Fn(&T, usize) -> bool + Send + Sync>;
type RowTransform<T> = Arc<dyn Fn(&T, usize) -> T + Send + Sync>;

/// Whether a column's cells can be edited.
pub enum Disabled<T> {
    Never,
    Always,
    /// Decided per row.
    Predicate(RowPredicate<T>),
}

impl<T> Disabled<T> {
    pub fn is_disabled(&self, row: &T, index: usize) -> bool {
        match self {
            Disabled::Never => false,
            Disabled::Always => true,
            Disabled::Predicate(predicate) => predicate(row, index),
        }
    }
}

impl<T> Clone for Disabled<T> {
    fn clone(&self) -> Self {
        match self {
            Disabled::Never => Disabled::Never,
            Disabled::Always => Disabled::Always,
            Disabled::Predicate(predicate) => Disabled::Predicate(Arc::clone(predicate)),
        }
    }
}

impl<T> fmt::Debug for Disabled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disabled::Never => write!(f, "Never"),
            Disabled::Always => write!(f, "Always"),
            Disabled::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

/// Conversion between a cell and clipboard text.
pub struct ColumnCodec<T> {
    serialize: Arc<dyn Fn(&T, usize) -> Option<String> + Send + Sync>,
    deserialize: Arc<dyn Fn(&T, &str, usize) -> T + Send + Sync>,
}

impl<T> ColumnCodec<T> {
    /// `serialize` renders the cell (or `None` for an absent value);
    /// `deserialize` returns the row with the cell set from text.
    pub fn new<S, D>(serialize: S, deserialize: D) -> Self
    where
        S: Fn(&T, usize) -> Option<String> + Send + Sync + 'static,
        D: Fn(&T, &str, usize) -> T + Send + Sync + 'static,
    {
        Self {
            serialize: Arc::new(serialize),
            deserialize: Arc::new(deserialize),
        }
    }

    pub fn serialize(&self, row: &T, index: usize) -> Option<String> {
        (self.serialize)(row, index)
    }

    pub fn deserialize(&self, row: &T, text: &str, index: usize) -> T {
        (self.deserialize)(row, text, index)
    }
}

impl<T> Clone for ColumnCodec<T> {
    fn clone(&self) -> Self {
        Self {
            serialize: Arc::clone(&self.serialize),
            deserialize: Arc::clone(&self.deserialize),
        }
    }
}

/// One column of a grid over rows of type `T`.
pub struct Column<T> {
    id: String,
    title: String,
    width: f32,
    min_width: f32,
    disabled: Disabled<T>,
    key_sensitive: bool,
    codec: Option<ColumnCodec<T>>,
    accessor: Option<Arc<dyn Fn(&T) -> Value + Send + Sync>>,
    delete_value: Option<RowTransform<T>>,
    pre_paste_values: Option<Arc<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>>,
    is_cell_empty: Option<RowPredicate<T>>,
    schema: Option<ValidationSchema>,
}

impl<T> Column<T> {
    /// Create a column with no hooks: enabled, without clipboard support.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            width: 100.0,
            min_width: 50.0,
            disabled: Disabled::Never,
            key_sensitive: false,
            codec: None,
            accessor: None,
            delete_value: None,
            pre_paste_values: None,
            is_cell_empty: None,
            schema: None,
        }
    }

    // =========================================================================
    // Builder
    // =========================================================================

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_min_width(mut self, min_width: f32) -> Self {
        self.min_width = min_width;
        self
    }

    /// Disable or enable every cell of the column.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = if disabled {
            Disabled::Always
        } else {
            Disabled::Never
        };
        self
    }

    /// Disable cells for which `predicate` returns true.
    pub fn with_disabled_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T, usize) -> bool + Send + Sync + 'static,
    {
        self.disabled = Disabled::Predicate(Arc::new(predicate));
        self
    }

    /// Arrow keys belong to the cell editor while editing this column.
    pub fn with_key_sensitive(mut self, key_sensitive: bool) -> Self {
        self.key_sensitive = key_sensitive;
        self
    }

    pub fn with_codec(mut self, codec: ColumnCodec<T>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Extract the cell value the validation schema checks.
    pub fn with_accessor<F>(mut self, accessor: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.accessor = Some(Arc::new(accessor));
        self
    }

    /// Row with the cell cleared. Defaults to the unchanged row.
    pub fn with_delete_value<F>(mut self, delete_value: F) -> Self
    where
        F: Fn(&T, usize) -> T + Send + Sync + 'static,
    {
        self.delete_value = Some(Arc::new(delete_value));
        self
    }

    /// Transform the column's pasted texts before they are applied.
    ///
    /// The hook sees every incoming value for the column at once, so it can
    /// resolve them together (e.g. map labels to ids).
    pub fn with_pre_paste_values<F>(mut self, transform: F) -> Self
    where
        F: Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static,
    {
        self.pre_paste_values = Some(Arc::new(transform));
        self
    }

    pub fn with_is_cell_empty<F>(mut self, is_empty: F) -> Self
    where
        F: Fn(&T, usize) -> bool + Send + Sync + 'static,
    {
        self.is_cell_empty = Some(Arc::new(is_empty));
        self
    }

    pub fn with_schema(mut self, schema: ValidationSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Layout width, never below the minimum width.
    pub fn width(&self) -> f32 {
        self.width.max(self.min_width)
    }

    pub fn min_width(&self) -> f32 {
        self.min_width
    }

    pub fn disabled(&self) -> &Disabled<T> {
        &self.disabled
    }

    pub fn is_disabled(&self, row: &T, index: usize) -> bool {
        self.disabled.is_disabled(row, index)
    }

    pub fn is_key_sensitive(&self) -> bool {
        self.key_sensitive
    }

    pub fn codec(&self) -> Option<&ColumnCodec<T>> {
        self.codec.as_ref()
    }

    pub fn schema(&self) -> Option<&ValidationSchema> {
        self.schema.as_ref()
    }

    /// Clipboard text for a cell. Columns without a codec copy as empty.
    pub fn copy_value(&self, row: &T, index: usize) -> Option<String> {
        self.codec.as_ref()?.serialize(row, index)
    }

    /// Row with the cell set from clipboard text, or `None` if the column
    /// does not accept pasted text.
    pub fn paste_value(&self, row: &T, text: &str, index: usize) -> Option<T> {
        Some(self.codec.as_ref()?.deserialize(row, text, index))
    }

    /// Apply the pre-paste hook, if any.
    pub fn pre_paste(&self, values: Vec<String>) -> Vec<String> {
        match &self.pre_paste_values {
            Some(transform) => transform(values),
            None => values,
        }
    }

    /// Whether a cell counts as empty for smart delete.
    ///
    /// Without a hook, a cell is empty when its value is blank, or when it
    /// copies as empty text. Columns with neither accessor nor codec are
    /// always empty.
    pub fn is_cell_empty(&self, row: &T, index: usize) -> bool {
        if let Some(is_empty) = &self.is_cell_empty {
            return is_empty(row, index);
        }
        if let Some(accessor) = &self.accessor {
            return is_blank(&accessor(row));
        }
        self.copy_value(row, index).is_none_or(|text| text.is_empty())
    }

    /// Cell value as seen by validation.
    ///
    /// Falls back to the clipboard text when no accessor is set.
    pub fn value(&self, row: &T) -> Option<Value> {
        if let Some(accessor) = &self.accessor {
            return Some(accessor(row));
        }
        let codec = self.codec.as_ref()?;
        Some(codec.serialize(row, 0).map_or(Value::Null, Value::String))
    }

    /// Validation error for a cell, if the column has a schema.
    pub fn validate(&self, row: &T) -> Option<String> {
        let schema = self.schema.as_ref()?;
        schema.validate(&self.value(row).unwrap_or(Value::Null))
    }
}

impl<T: Clone> Column<T> {
    pub fn delete_value(&self, row: &T, index: usize) -> T {
        match &self.delete_value {
            Some(delete_value) => delete_value(row, index),
            None => row.clone(),
        }
    }
}

impl<T: Clone + 'static> Column<T> {
    /// Optional text column.
    ///
    /// Pasted text is flattened to one line and trimmed; empty text becomes
    /// `None`. Deleting sets `None`.
    pub fn text<G, S>(id: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&T) -> Option<String> + Send + Sync + 'static,
        S: Fn(&T, Option<String>) -> T + Send + Sync + 'static,
    {
        let get = Arc::new(get);
        let set = Arc::new(set);
        let (get_copy, get_value) = (Arc::clone(&get), Arc::clone(&get));
        let (set_paste, set_delete) = (Arc::clone(&set), Arc::clone(&set));

        Column::new(id)
            .with_codec(ColumnCodec::new(
                move |row: &T, _| get_copy(row),
                move |row: &T, text: &str, _| set_paste(row, normalize_text(text)),
            ))
            .with_accessor(move |row| get_value(row).map_or(Value::Null, Value::String))
            .with_delete_value(move |row, _| set_delete(row, None))
    }

    /// Optional numeric column.
    ///
    /// Pasted text accepts `,` as decimal separator; unparsable text
    /// becomes `None`.
    pub fn float<G, S>(id: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&T) -> Option<f64> + Send + Sync + 'static,
        S: Fn(&T, Option<f64>) -> T + Send + Sync + 'static,
    {
        let get = Arc::new(get);
        let set = Arc::new(set);
        let (get_copy, get_value) = (Arc::clone(&get), Arc::clone(&get));
        let (set_paste, set_delete) = (Arc::clone(&set), Arc::clone(&set));

        Column::new(id)
            .with_codec(ColumnCodec::new(
                move |row: &T, _| get_copy(row).map(|n| n.to_string()),
                move |row: &T, text: &str, _| set_paste(row, parse_float(text)),
            ))
            .with_accessor(move |row| {
                get_value(row)
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            })
            .with_delete_value(move |row, _| set_delete(row, None))
    }

    /// Boolean column.
    ///
    /// Pasted text is false for the usual falsy words (`""`, `false`, `no`,
    /// `0`, `off`, ...) and true otherwise. Deleting sets `false`, and an
    /// unchecked cell counts as empty.
    pub fn checkbox<G, S>(id: impl Into<String>, get: G, set: S) -> Self
    where
        G: Fn(&T) -> bool + Send + Sync + 'static,
        S: Fn(&T, bool) -> T + Send + Sync + 'static,
    {
        let get = Arc::new(get);
        let set = Arc::new(set);
        let (get_copy, get_value, get_empty) =
            (Arc::clone(&get), Arc::clone(&get), Arc::clone(&get));
        let (set_paste, set_delete) = (Arc::clone(&set), Arc::clone(&set));

        Column::new(id)
            .with_codec(ColumnCodec::new(
                move |row: &T, _| Some(get_copy(row).to_string()),
                move |row: &T, text: &str, _| set_paste(row, parse_bool(text)),
            ))
            .with_accessor(move |row| Value::Bool(get_value(row)))
            .with_delete_value(move |row, _| set_delete(row, false))
            .with_is_cell_empty(move |row, _| !get_empty(row))
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            width: self.width,
            min_width: self.min_width,
            disabled: self.disabled.clone(),
            key_sensitive: self.key_sensitive,
            codec: self.codec.clone(),
            accessor: self.accessor.clone(),
            delete_value: self.delete_value.clone(),
            pre_paste_values: self.pre_paste_values.clone(),
            is_cell_empty: self.is_cell_empty.clone(),
            schema: self.schema.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("width", &self.width)
            .field("disabled", &self.disabled)
            .field("key_sensitive", &self.key_sensitive)
            .field("has_codec", &self.codec.is_some())
            .field("schema", &self.schema)
            .finish()
    }
}

fn normalize_text(text: &str) -> Option<String> {
    let single_line = text
        .split(['\n', '\r'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let trimmed = single_line.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_float(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

const FALSY: &[&str] = &[
    "", "false", "no", "off", "disabled", "0", "n", "f", "unchecked", "undefined", "null",
    "wrong", "negative",
];

fn parse_bool(text: &str) -> bool {
    !FALSY.contains(&text.trim().to_lowercase().as_str())
}
