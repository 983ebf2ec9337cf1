//! Per-cell validation.
//!
//! Columns may carry a [`ValidationSchema`]: an ordered list of [`Rule`]s
//! checked against the column's value for each row (see
//! [`Column::with_accessor`](crate::Column::with_accessor)). The first
//! failing rule supplies the cell's error message.
//!
//! The grid keeps the outcome in a sparse [`ValidationErrors`] overlay keyed
//! by row then column. The overlay is revalidated for the rows an operation
//! touches and re-indexed when rows are inserted or deleted, so it always
//! describes the current row array.
//!
//! # Built-in Rules
//!
//! - [`Required`]: the value must be present and non-empty
//! - [`MinLength`] / [`MaxLength`]: bounds on text length, in characters
//! - [`Pattern`]: text must match a regular expression
//! - [`Range`]: numbers (or numeric text) must lie within bounds
//! - [`CustomRule`]: any closure

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range as RowRange;
use std::sync::Arc;

use serde_json::Value;

use crate::column::Column;
use crate::operation::{Operation, OperationKind};

/// A single validation check on a cell value.
///
/// Rules return `None` when the value passes and an error message when it
/// does not. Except for [`Required`], rules let absent values
/// (`null`/empty text) through so they compose with optional columns.
pub trait Rule: Send + Sync {
    fn check(&self, value: &Value) -> Option<String>;
}

impl<R: Rule + ?Sized> Rule for Arc<R> {
    fn check(&self, value: &Value) -> Option<String> {
        (**self).check(value)
    }
}

impl<R: Rule + ?Sized> Rule for Box<R> {
    fn check(&self, value: &Value) -> Option<String> {
        (**self).check(value)
    }
}

/// Whether a value counts as absent: null, empty text or an empty array.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// The value must be present and non-empty.
#[derive(Debug, Clone)]
pub struct Required {
    message: String,
}

impl Required {
    pub fn new() -> Self {
        Self {
            message: "Required".into(),
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for Required {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Required {
    fn check(&self, value: &Value) -> Option<String> {
        is_blank(value).then(|| self.message.clone())
    }
}

/// Text must have at least this many characters.
#[derive(Debug, Clone, Copy)]
pub struct MinLength(pub usize);

impl Rule for MinLength {
    fn check(&self, value: &Value) -> Option<String> {
        let text = value.as_str().filter(|s| !s.is_empty())?;
        (text.chars().count() < self.0)
            .then(|| format!("Must contain at least {} character(s)", self.0))
    }
}

/// Text must have at most this many characters.
#[derive(Debug, Clone, Copy)]
pub struct MaxLength(pub usize);

impl Rule for MaxLength {
    fn check(&self, value: &Value) -> Option<String> {
        let text = value.as_str()?;
        (text.chars().count() > self.0)
            .then(|| format!("Must contain at most {} character(s)", self.0))
    }
}

/// Text must match a regular expression.
#[derive(Debug, Clone)]
pub struct Pattern {
    pattern: regex::Regex,
    message: String,
}

impl Pattern {
    /// Create a pattern rule.
    ///
    /// Returns the regex compile error if `pattern` is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let pattern = regex::Regex::new(pattern)?;
        let message = format!("Must match {}", pattern.as_str());
        Ok(Self { pattern, message })
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the pattern string.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Rule for Pattern {
    fn check(&self, value: &Value) -> Option<String> {
        let text = match value {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!self.pattern.is_match(&text)).then(|| self.message.clone())
    }
}

/// Numbers must lie within `[min, max]`.
///
/// Numeric text is parsed; text that is not a number fails.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Rule for Range {
    fn check(&self, value: &Value) -> Option<String> {
        let number = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) if !s.trim().is_empty() => match s.trim().parse::<f64>() {
                Ok(n) => n,
                Err(_) => return Some("Expected a number".into()),
            },
            _ => return None,
        };
        if let Some(min) = self.min.filter(|&min| number < min) {
            return Some(format!("Must be at least {min}"));
        }
        if let Some(max) = self.max.filter(|&max| number > max) {
            return Some(format!("Must be at most {max}"));
        }
        None
    }
}

/// A rule backed by a closure.
pub struct CustomRule(Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>);

impl Rule for CustomRule {
    fn check(&self, value: &Value) -> Option<String> {
        (self.0)(value)
    }
}

/// An ordered list of rules attached to a column.
#[derive(Clone, Default)]
pub struct ValidationSchema {
    rules: Vec<Arc<dyn Rule>>,
}

impl ValidationSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any rule.
    pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn required(self) -> Self {
        self.rule(Required::new())
    }

    pub fn min_length(self, min: usize) -> Self {
        self.rule(MinLength(min))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.rule(MaxLength(max))
    }

    /// Append a [`Pattern`] rule.
    pub fn pattern(self, pattern: &str) -> Result<Self, regex::Error> {
        Ok(self.rule(Pattern::new(pattern)?))
    }

    pub fn range(self, min: Option<f64>, max: Option<f64>) -> Self {
        self.rule(Range { min, max })
    }

    pub fn custom<F>(self, check: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.rule(CustomRule(Arc::new(check)))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run the rules in order, returning the first failure.
    pub fn validate(&self, value: &Value) -> Option<String> {
        self.rules.iter().find_map(|rule| rule.check(value))
    }
}

impl fmt::Debug for ValidationSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationSchema")
            .field("rules", &self.rules.len())
            .finish()
    }
}

// ============================================================================
// Error overlay
// ============================================================================

/// Sparse map of validation errors, keyed by row then column.
///
/// Rows without errors are never stored, so [`is_empty`](Self::is_empty)
/// means the whole grid is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    rows: BTreeMap<usize, BTreeMap<usize, String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every cell of `data`.
    pub fn compute<T>(data: &[T], columns: &[Column<T>]) -> Self {
        let mut errors = Self::new();
        errors.revalidate_rows(data, columns, 0..data.len());
        errors
    }

    /// The error for one cell.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(&row)?.get(&col).map(String::as_str)
    }

    /// All errors of one row, keyed by column.
    pub fn row(&self, row: usize) -> Option<&BTreeMap<usize, String>> {
        self.rows.get(&row)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows with at least one error.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of failing cells.
    pub fn error_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Iterate `(row, col, message)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &str)> + '_ {
        self.rows.iter().flat_map(|(&row, cols)| {
            cols.iter()
                .map(move |(&col, message)| (row, col, message.as_str()))
        })
    }

    fn set(&mut self, row: usize, col: usize, error: Option<String>) {
        match error {
            Some(message) => {
                self.rows.entry(row).or_default().insert(col, message);
            }
            None => {
                if let Some(cols) = self.rows.get_mut(&row) {
                    cols.remove(&col);
                    if cols.is_empty() {
                        self.rows.remove(&row);
                    }
                }
            }
        }
    }

    /// Recompute the errors of `rows`. Returns whether anything changed.
    pub fn revalidate_rows<T>(
        &mut self,
        data: &[T],
        columns: &[Column<T>],
        rows: RowRange<usize>,
    ) -> bool {
        let before = self.clone();
        for row in rows.start..rows.end.min(data.len()) {
            for (col, column) in columns.iter().enumerate() {
                self.set(row, col, column.validate(&data[row]));
            }
        }
        *self != before
    }

    /// Shift rows at or after `at` down by `count`.
    pub fn insert_rows(&mut self, at: usize, count: usize) {
        let tail = self.rows.split_off(&at);
        self.rows
            .extend(tail.into_iter().map(|(row, cols)| (row + count, cols)));
    }

    /// Drop rows in `rows` and shift later rows up.
    pub fn remove_rows(&mut self, rows: RowRange<usize>) {
        let count = rows.end - rows.start;
        let mut tail = self.rows.split_off(&rows.start);
        let after = tail.split_off(&rows.end);
        self.rows
            .extend(after.into_iter().map(|(row, cols)| (row - count, cols)));
    }

    /// Bring the overlay in line with `data` after `operation`.
    ///
    /// Returns whether the overlay changed.
    pub fn apply<T>(&mut self, operation: &Operation, data: &[T], columns: &[Column<T>]) -> bool {
        match operation.kind {
            OperationKind::Update => self.revalidate_rows(data, columns, operation.rows()),
            OperationKind::Create => {
                let before = self.clone();
                self.insert_rows(operation.from_row_index, operation.len());
                self.revalidate_rows(data, columns, operation.rows());
                *self != before
            }
            OperationKind::Delete => {
                let before = self.clone();
                self.remove_rows(operation.rows());
                *self != before
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required() {
        let rule = Required::new();
        assert_eq!(rule.check(&Value::Null).as_deref(), Some("Required"));
        assert_eq!(rule.check(&json!("")).as_deref(), Some("Required"));
        assert_eq!(rule.check(&json!("x")), None);
        assert_eq!(rule.check(&json!(0)), None);
    }

    #[test]
    fn test_length_rules_skip_absent_values() {
        assert_eq!(MinLength(3).check(&Value::Null), None);
        assert!(MinLength(3).check(&json!("ab")).is_some());
        assert_eq!(MinLength(3).check(&json!("abc")), None);
        assert!(MaxLength(2).check(&json!("abc")).is_some());
        assert_eq!(MaxLength(2).check(&json!("ab")), None);
    }

    #[test]
    fn test_pattern() {
        let rule = Pattern::new(r"^\d{3}$").unwrap().with_message("Three digits");
        assert_eq!(rule.check(&json!("123")), None);
        assert_eq!(rule.check(&json!(456)), None);
        assert_eq!(rule.check(&json!("12a")).as_deref(), Some("Three digits"));
        assert_eq!(rule.check(&Value::Null), None);
        assert!(Pattern::new("(").is_err());
    }

    #[test]
    fn test_range() {
        let rule = Range {
            min: Some(0.0),
            max: Some(10.0),
        };
        assert_eq!(rule.check(&json!(5)), None);
        assert_eq!(rule.check(&json!(" 7.5 ")), None);
        assert!(rule.check(&json!(-1)).is_some());
        assert!(rule.check(&json!(11)).is_some());
        assert_eq!(rule.check(&json!("ten")).as_deref(), Some("Expected a number"));
        assert_eq!(rule.check(&json!("")), None);
    }

    #[test]
    fn test_schema_first_failure_wins() {
        let schema = ValidationSchema::new()
            .required()
            .min_length(3)
            .custom(|v| (v == "bad").then(|| "Bad value".to_string()));
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.validate(&json!("")).as_deref(), Some("Required"));
        assert!(schema.validate(&json!("ab")).unwrap().contains("at least 3"));
        assert_eq!(schema.validate(&json!("bad")), None);
        assert_eq!(schema.validate(&json!("good")), None);
    }

    fn overlay(entries: &[(usize, usize)]) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for &(row, col) in entries {
            errors.set(row, col, Some(format!("r{row}c{col}")));
        }
        errors
    }

    #[test]
    fn test_set_prunes_empty_rows() {
        let mut errors = overlay(&[(1, 0), (1, 2)]);
        assert_eq!(errors.row_count(), 1);
        assert_eq!(errors.error_count(), 2);
        errors.set(1, 0, None);
        errors.set(1, 2, None);
        assert!(errors.is_empty());
        assert_eq!(errors.row(1), None);
    }

    #[test]
    fn test_remove_rows_reindexes() {
        let mut errors = overlay(&[(0, 0), (2, 0), (3, 1), (6, 0)]);
        errors.remove_rows(2..4);
        let cells: Vec<_> = errors.iter().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(cells, vec![(0, 0), (4, 0)]);
        assert_eq!(errors.get(4, 0), Some("r6c0"));
    }

    #[test]
    fn test_insert_rows_shifts_tail() {
        let mut errors = overlay(&[(0, 0), (2, 1)]);
        errors.insert_rows(1, 3);
        assert_eq!(errors.get(0, 0), Some("r0c0"));
        assert_eq!(errors.get(5, 1), Some("r2c1"));
        assert_eq!(errors.get(2, 1), None);
    }
}
