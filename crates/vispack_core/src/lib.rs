//! # VISPACK Core
//!
//! Dense, visibility-partitioned record store for instanced rendering:
//! - O(1) insert, remove and visibility flip, by swapping slots
//! - Visible records always packed at the front of one contiguous buffer
//! - The visible prefix is uploadable to a draw call as-is
//!
//! ## Architecture Rules
//!
//! 1. **Swaps, never shifts** - Every mutation is at most two slot exchanges
//! 2. **One invariant above all** - Slots `[0, visible)` are visible, slots
//!    `[visible, occupied)` are hidden, after every completed call
//! 3. **Single writer** - The store has no locks; sharing goes through
//!    [`SharedStore`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use vispack_core::{EntityId, ShapeRecord, Store};
//!
//! let mut store: Store<ShapeRecord> = Store::new();
//! store.insert(EntityId::new(1), ShapeRecord::sized(10.0, 20.0), true)?;
//! store.set_visible(EntityId::new(1), false)?;
//! assert!(store.visible_scalars().is_empty());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod buffer;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod partition;
pub mod record;
pub mod shared;
pub mod slots;
pub mod store;

pub use buffer::DenseBuffer;
pub use config::StoreConfig;
pub use entity::EntityId;
pub use error::{StoreError, StoreResult};
pub use event::{EventQueue, StoreEvent};
pub use partition::PartitionManager;
pub use record::{Record, ShapeRecord};
pub use shared::{SharedStore, StoreReadHandle, StoreWriteHandle};
pub use slots::SlotTable;
pub use store::Store;
