//! Row-array mutations.
//!
//! These functions never touch the caller's slice: each returns a fresh row
//! array plus the [`Operation`] that describes the difference. Selection
//! bookkeeping and notification happen in [`DataGrid`](crate::DataGrid).

use std::fmt;
use std::sync::Arc;

use crate::operation::Operation;

/// Creates rows for inserts and duplicates.
pub struct RowFactory<T> {
    create: Arc<dyn Fn() -> T + Send + Sync>,
    duplicate: Option<Arc<dyn Fn(&T) -> T + Send + Sync>>,
}

impl<T> RowFactory<T> {
    /// Build a factory from a row constructor.
    ///
    /// Duplication defaults to cloning the source row.
    pub fn new<F>(create: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            create: Arc::new(create),
            duplicate: None,
        }
    }

    /// Customize duplication, e.g. to reset an id.
    pub fn with_duplicate<F>(mut self, duplicate: F) -> Self
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        self.duplicate = Some(Arc::new(duplicate));
        self
    }

    pub fn create(&self) -> T {
        (self.create)()
    }
}

impl<T: Default + 'static> RowFactory<T> {
    /// Factory producing `T::default()`.
    pub fn from_default() -> Self {
        Self::new(T::default)
    }
}

impl<T: Clone> RowFactory<T> {
    pub fn duplicate(&self, row: &T) -> T {
        match &self.duplicate {
            Some(duplicate) => duplicate(row),
            None => row.clone(),
        }
    }
}

impl<T> Clone for RowFactory<T> {
    fn clone(&self) -> Self {
        Self {
            create: Arc::clone(&self.create),
            duplicate: self.duplicate.clone(),
        }
    }
}

impl<T> fmt::Debug for RowFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowFactory")
            .field("custom_duplicate", &self.duplicate.is_some())
            .finish()
    }
}

/// Insert `count` new rows so the first lands at index `at`.
///
/// `at` is clamped to the array length.
pub fn insert_rows<T: Clone>(
    data: &[T],
    at: usize,
    count: usize,
    factory: &RowFactory<T>,
) -> (Vec<T>, Operation) {
    let at = at.min(data.len());
    let mut rows = Vec::with_capacity(data.len() + count);
    rows.extend_from_slice(&data[..at]);
    rows.extend((0..count).map(|_| factory.create()));
    rows.extend_from_slice(&data[at..]);
    (rows, Operation::create(at, at + count))
}

/// Duplicate rows `min..=max` with `duplicate`, placing the copies right
/// after `max`.
///
/// Returns `None` when the range is out of bounds.
pub fn duplicate_rows<T, F>(data: &[T], min: usize, max: usize, duplicate: F) -> Option<(Vec<T>, Operation)>
where
    T: Clone,
    F: Fn(&T) -> T,
{
    if min > max || max >= data.len() {
        return None;
    }
    let count = max - min + 1;
    let mut rows = Vec::with_capacity(data.len() + count);
    rows.extend_from_slice(&data[..=max]);
    rows.extend(data[min..=max].iter().map(duplicate));
    rows.extend_from_slice(&data[max + 1..]);
    Some((rows, Operation::create(max + 1, max + 1 + count)))
}

/// Remove rows `min..=max`.
///
/// Returns `None` when the range is out of bounds.
pub fn delete_rows<T: Clone>(data: &[T], min: usize, max: usize) -> Option<(Vec<T>, Operation)> {
    if min > max || max >= data.len() {
        return None;
    }
    let mut rows = Vec::with_capacity(data.len() - (max - min + 1));
    rows.extend_from_slice(&data[..min]);
    rows.extend_from_slice(&data[max + 1..]);
    Some((rows, Operation::delete(min, max + 1)))
}
