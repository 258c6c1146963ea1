//! # Registry Events
//!
//! The entity registry decides *when* the store changes; these are the
//! notifications it sends. They can be applied directly with
//! [`Store::apply`], or queued from another thread through an
//! [`EventQueue`] and drained by the thread that owns the store.
//!
//! ```text
//!   Registry thread ──> [EventQueue] ──> drain_into(&mut Store) ──> Renderer
//!                        (crossbeam)       (single writer)
//! ```

use crossbeam_channel::{Receiver, SendError, Sender};

use crate::entity::EntityId;
use crate::error::StoreResult;
use crate::record::Record;
use crate::store::Store;

/// A change notification from the entity registry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StoreEvent<R> {
    /// The entity gained the tracked attribute.
    Attach {
        /// Entity that changed.
        entity: EntityId,
        /// Initial record.
        record: R,
        /// Current value of the entity's visibility flag.
        visible: bool,
    },
    /// The entity lost the tracked attribute or was destroyed.
    Detach {
        /// Entity that changed.
        entity: EntityId,
    },
    /// The entity's visibility flag changed.
    VisibilityChanged {
        /// Entity that changed.
        entity: EntityId,
        /// New visibility.
        visible: bool,
    },
    /// The entity's attributes changed.
    Update {
        /// Entity that changed.
        entity: EntityId,
        /// New record.
        record: R,
    },
}

impl<R> StoreEvent<R> {
    /// Returns the entity the event is about.
    #[inline]
    #[must_use]
    pub fn entity(&self) -> EntityId {
        match self {
            Self::Attach { entity, .. }
            | Self::Detach { entity }
            | Self::VisibilityChanged { entity, .. }
            | Self::Update { entity, .. } => *entity,
        }
    }
}

/// Multi-producer queue of registry events for one store.
///
/// Uses crossbeam for lock-free communication. Producers keep a
/// [`sender`](Self::sender); the thread owning the store calls
/// [`drain_into`](Self::drain_into) once per frame.
pub struct EventQueue<R> {
    sender: Sender<StoreEvent<R>>,
    receiver: Receiver<StoreEvent<R>>,
}

impl<R> EventQueue<R> {
    /// Creates a new bounded queue.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a new unbounded queue.
    #[must_use]
    pub fn unbounded() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { sender, receiver }
    }

    /// Queues an event (blocks while a bounded queue is full).
    ///
    /// # Errors
    ///
    /// Never fails while the queue is alive, since it holds its own receiver.
    pub fn push(&self, event: StoreEvent<R>) -> Result<(), SendError<StoreEvent<R>>> {
        self.sender.send(event)
    }

    /// Gets a sender for another thread.
    #[must_use]
    pub fn sender(&self) -> Sender<StoreEvent<R>> {
        self.sender.clone()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if no event is pending.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<R: Record> EventQueue<R> {
    /// Applies every pending event to `store`, in arrival order. Never blocks.
    ///
    /// Returns the number of events applied.
    ///
    /// # Errors
    ///
    /// Stops at the first event that violates the store's contract and
    /// returns its error. That event is consumed; later events stay queued.
    pub fn drain_into(&self, store: &mut Store<R>) -> StoreResult<usize> {
        let mut applied = 0;

        while let Ok(event) = self.receiver.try_recv() {
            let entity = event.entity();
            if let Err(err) = store.apply(event) {
                tracing::warn!("Registry event for {} rejected: {}", entity, err);
                return Err(err);
            }
            applied += 1;
        }

        Ok(applied)
    }
}

impl<R> Default for EventQueue<R> {
    fn default() -> Self {
        Self::bounded(1024)
    }
}
