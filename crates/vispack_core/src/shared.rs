//! # Shared Store
//!
//! The [`Store`] itself has no locking. When the registry and the renderer
//! live on different threads, this wrapper enforces the discipline the store
//! needs:
//!
//! ```text
//!   Logic thread:   write_handle() ── insert/remove/set_visible ── drop
//!   Render thread:  read_handle()  ── visible_bytes() ── upload ── drop
//! ```
//!
//! - One writer at a time, many readers, never both
//! - Every dropped write handle bumps a version counter, so a renderer can
//!   tell whether its last upload is stale without touching the records

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::StoreResult;
use crate::event::EventQueue;
use crate::record::Record;
use crate::store::Store;

/// Single-writer / many-reader wrapper around a [`Store`].
///
/// # Example
///
/// ```rust,ignore
/// let shared = SharedStore::new(Store::<ShapeRecord>::new());
///
/// // Logic thread
/// shared.write_handle().insert(id, record, true)?;
///
/// // Render thread
/// let read = shared.read_handle();
/// if read.version() != last_uploaded {
///     upload(read.visible_bytes());
/// }
/// ```
pub struct SharedStore<R: Record> {
    /// The guarded store.
    store: RwLock<Store<R>>,
    /// Number of completed write handles.
    version: AtomicU64,
}

impl<R: Record> SharedStore<R> {
    /// Wraps `store` for sharing between threads.
    #[must_use]
    pub fn new(store: Store<R>) -> Arc<Self> {
        Arc::new(Self {
            store: RwLock::new(store),
            version: AtomicU64::new(0),
        })
    }

    /// Returns the number of write handles dropped so far.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Gets exclusive access for mutations. Blocks while readers are active.
    #[must_use]
    pub fn write_handle(&self) -> StoreWriteHandle<'_, R> {
        StoreWriteHandle {
            guard: self.store.write(),
            version: &self.version,
        }
    }

    /// Gets shared access for reading. Blocks while a writer is active.
    #[must_use]
    pub fn read_handle(&self) -> StoreReadHandle<'_, R> {
        let guard = self.store.read();
        let version = self.version.load(Ordering::Acquire);
        StoreReadHandle { guard, version }
    }

    /// Tries to get shared access without blocking.
    #[must_use]
    pub fn try_read_handle(&self) -> Option<StoreReadHandle<'_, R>> {
        let guard = self.store.try_read()?;
        let version = self.version.load(Ordering::Acquire);
        Some(StoreReadHandle { guard, version })
    }

    /// Copies the visible records into `out`, replacing its contents.
    ///
    /// Returns the version the copy was taken at. The lock is held only for
    /// the copy, so a render thread can upload from `out` while the writer
    /// continues.
    pub fn copy_visible_into(&self, out: &mut Vec<R>) -> u64 {
        let read = self.read_handle();
        out.clear();
        out.extend_from_slice(read.visible_records());
        read.version()
    }

    /// Drains `queue` into the store under a single write handle.
    ///
    /// # Errors
    ///
    /// Propagates the first rejected event; see [`EventQueue::drain_into`].
    pub fn apply_events(&self, queue: &EventQueue<R>) -> StoreResult<usize> {
        let mut write = self.write_handle();
        queue.drain_into(&mut write)
    }
}

/// Exclusive access to a shared store. Bumps the version when dropped.
pub struct StoreWriteHandle<'a, R: Record> {
    guard: RwLockWriteGuard<'a, Store<R>>,
    version: &'a AtomicU64,
}

impl<R: Record> Deref for StoreWriteHandle<'_, R> {
    type Target = Store<R>;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<R: Record> DerefMut for StoreWriteHandle<'_, R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<R: Record> Drop for StoreWriteHandle<'_, R> {
    fn drop(&mut self) {
        self.version.fetch_add(1, Ordering::AcqRel);
    }
}

/// Shared access to a shared store.
pub struct StoreReadHandle<'a, R: Record> {
    guard: RwLockReadGuard<'a, Store<R>>,
    version: u64,
}

impl<R: Record> StoreReadHandle<'_, R> {
    /// Returns the version this handle observes.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl<R: Record> Deref for StoreReadHandle<'_, R> {
    type Target = Store<R>;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}
