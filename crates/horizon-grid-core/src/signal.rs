//! Change notifications from the grid to its host.
//!
//! A [`Signal<Args>`] holds any number of slots (callbacks). The grid owns
//! one signal per kind of notification (rows changed, active cell moved,
//! editing toggled, ...) and emits it after the corresponding state change
//! is complete, so a slot always observes a consistent grid.
//!
//! Emission is direct and synchronous: the grid is driven from one UI
//! thread and has no event queue of its own. Slots are snapshotted before
//! they run, so a slot may connect, disconnect or emit further signals.
//!
//! # Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! let rows_changed = Signal::<usize>::new();
//! let id = rows_changed.connect(|count| println!("{count} rows"));
//!
//! rows_changed.emit(12);
//! assert!(rows_changed.disconnect(id));
//! assert!(!rows_changed.has_connections());
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;
use crate::logging::targets;

new_key_type! {
    /// Handle for one connected slot, returned by [`Signal::connect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A notification with a typed payload.
///
/// Slots run in connection order and receive the payload by reference.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect a slot. Keep the returned id to disconnect it later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.slots.lock().insert(Arc::new(slot));
        tracing::trace!(target: targets::SIGNAL, ?id, "slot connected");
        id
    }

    /// Remove a slot. Returns `false` if `id` was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    /// Like [`disconnect`](Self::disconnect), with an unknown id reported as
    /// an error.
    pub fn try_disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        self.disconnect(id)
            .then_some(())
            .ok_or(SignalError::InvalidConnection)
    }

    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }

    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Whether any slot would receive an emission.
    ///
    /// Lets the emitter skip building an expensive payload.
    pub fn has_connections(&self) -> bool {
        !self.slots.lock().is_empty()
    }

    /// Run every connected slot with `args`.
    #[tracing::instrument(skip_all, target = "horizon_grid_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        if slots.is_empty() {
            return;
        }
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emit");
        for slot in &slots {
            slot(&args);
        }
    }
}

impl<Args> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.lock().len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
static_assertions::assert_impl_all!(Signal<Vec<String>>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_slots_run_in_connection_order() {
        let signal = Signal::<(usize, usize)>::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second"] {
            let log = Arc::clone(&log);
            signal.connect(move |&(col, row)| log.lock().push(format!("{name} {col},{row}")));
        }
        signal.emit((2, 7));

        assert_eq!(*log.lock(), vec!["first 2,7", "second 2,7"]);
    }

    #[test]
    fn test_disconnect() {
        let signal = Signal::<bool>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let id = signal.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        signal.emit(true);
        assert!(signal.disconnect(id));
        signal.emit(false);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(signal.try_disconnect(id), Err(SignalError::InvalidConnection));
        assert!(!signal.has_connections());
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();
        for _ in 0..4 {
            signal.connect(|_| {});
        }
        assert_eq!(signal.connection_count(), 4);
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_slot_may_emit_and_disconnect_itself() {
        let signal = Arc::new(Signal::<u32>::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let own_id = Arc::new(Mutex::new(None));

        let inner = Arc::clone(&signal);
        let counter = Arc::clone(&hits);
        let id_slot = Arc::clone(&own_id);
        let id = signal.connect(move |&depth| {
            counter.fetch_add(1, Ordering::SeqCst);
            if depth == 0 {
                inner.emit(1);
            } else if let Some(id) = *id_slot.lock() {
                inner.disconnect(id);
            }
        });
        *own_id.lock() = Some(id);

        signal.emit(0);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(signal.connection_count(), 0);
    }
}
