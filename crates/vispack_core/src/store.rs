//! # Visibility-Partitioned Store
//!
//! The public facade over [`SlotTable`], [`DenseBuffer`] and
//! [`PartitionManager`].
//!
//! An external registry drives it:
//!
//! ```text
//! attribute attached      -> Store::insert
//! attribute detached      -> Store::remove
//! entity destroyed        -> Store::remove
//! visibility flag changed -> Store::set_visible
//! attribute changed       -> Store::update
//! ```
//!
//! A renderer reads it: [`Store::visible_scalars`] is always exactly the
//! visible records, packed, and can be uploaded to a draw call as-is. Any
//! view must be re-fetched after a mutation, since growth may reallocate.
//!
//! ## Thread Safety
//!
//! The store is NOT thread-safe. It is a single-writer structure with no
//! internal locking; see [`SharedStore`](crate::SharedStore) for a wrapper
//! that serializes a writer and render readers.

use crate::buffer::DenseBuffer;
use crate::config::StoreConfig;
use crate::entity::EntityId;
use crate::error::StoreResult;
use crate::event::StoreEvent;
use crate::partition::PartitionManager;
use crate::record::Record;
use crate::slots::SlotTable;

/// Dense store keeping visible records packed at the front of its buffer.
///
/// # Example
///
/// ```rust,ignore
/// let mut store: Store<ShapeRecord> = Store::new();
///
/// store.insert(EntityId::new(1), ShapeRecord::sized(10.0, 20.0), true)?;
/// store.insert(EntityId::new(2), ShapeRecord::sized(40.0, 50.0), false)?;
///
/// assert_eq!(store.visible_count(), 1);
/// renderer.upload(store.visible_bytes());
/// ```
#[derive(Debug, Clone)]
pub struct Store<R: Record> {
    /// Record storage.
    buffer: DenseBuffer<R>,
    /// Entity <-> slot mapping.
    slots: SlotTable,
    /// Visible/hidden boundary.
    partition: PartitionManager,
}

impl<R: Record> Store<R> {
    /// Creates an empty store with the minimum capacity of one record.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Creates an empty store holding at least `capacity` records before it
    /// has to grow. The capacity is rounded up to a power of two.
    ///
    /// # Panics
    ///
    /// Panics if the capacity cannot be allocated; see
    /// [`with_config`](Self::with_config) for the fallible path.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let buffer = DenseBuffer::with_capacity(capacity);
        let slots = SlotTable::with_capacity(buffer.capacity());

        Self {
            buffer,
            slots,
            partition: PartitionManager::new(),
        }
    }

    /// Creates an empty store from a validated configuration.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidConfig`](crate::StoreError::InvalidConfig) if
    ///   the configuration is inconsistent
    /// - [`StoreError::AllocationFailure`](crate::StoreError::AllocationFailure)
    ///   if the initial capacity cannot be allocated
    pub fn with_config(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;

        let buffer = DenseBuffer::try_with_capacity(config.initial_capacity)?
            .with_max_capacity(config.max_capacity);
        let mut slots = SlotTable::new();
        slots.try_reserve(buffer.capacity())?;

        tracing::debug!(
            "Store built from config: capacity {}, ceiling {:?}",
            buffer.capacity(),
            config.max_capacity
        );

        Ok(Self {
            buffer,
            slots,
            partition: PartitionManager::new(),
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Inserts `entity` with its initial record, returning the slot it lands
    /// in.
    ///
    /// # Errors
    ///
    /// - [`StoreError::DuplicateEntity`](crate::StoreError::DuplicateEntity)
    ///   if the entity is already held
    /// - [`StoreError::InvalidEntity`](crate::StoreError::InvalidEntity) for
    ///   [`EntityId::NULL`]
    /// - [`StoreError::AllocationFailure`](crate::StoreError::AllocationFailure)
    ///   if the buffer cannot grow
    ///
    /// The store is unchanged when an error is returned.
    pub fn insert(&mut self, entity: EntityId, record: R, visible: bool) -> StoreResult<usize> {
        let slot = self
            .partition
            .insert(&mut self.buffer, &mut self.slots, entity, record, visible)?;

        tracing::trace!(
            "Insert {} at slot {} (visible: {}, {}/{} visible/occupied)",
            entity,
            slot,
            visible,
            self.partition.visible(),
            self.partition.occupied()
        );

        Ok(slot)
    }

    /// Removes `entity`, returning the record it held.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEntity`](crate::StoreError::InvalidEntity)
    /// if the entity is not held.
    pub fn remove(&mut self, entity: EntityId) -> StoreResult<R> {
        let record = self
            .partition
            .remove(&mut self.buffer, &mut self.slots, entity)?;

        tracing::trace!(
            "Remove {} ({}/{} visible/occupied)",
            entity,
            self.partition.visible(),
            self.partition.occupied()
        );

        Ok(record)
    }

    /// Shows or hides `entity`. Returns `true` if its visibility changed.
    ///
    /// Calling it again with the same value is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEntity`](crate::StoreError::InvalidEntity)
    /// if the entity is not held.
    pub fn set_visible(&mut self, entity: EntityId, visible: bool) -> StoreResult<bool> {
        let changed =
            self.partition
                .set_visible(&mut self.buffer, &mut self.slots, entity, visible)?;

        if changed {
            tracing::trace!(
                "Visibility of {} -> {} ({} visible)",
                entity,
                visible,
                self.partition.visible()
            );
        }

        Ok(changed)
    }

    /// Overwrites the record of `entity` in place. Never relocates.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEntity`](crate::StoreError::InvalidEntity)
    /// if the entity is not held.
    pub fn update(&mut self, entity: EntityId, record: R) -> StoreResult<()> {
        let slot = self.slots.index_of(entity)?;
        self.buffer.write(slot, record);
        Ok(())
    }

    /// Applies one registry notification.
    ///
    /// # Errors
    ///
    /// Propagates the error of the operation the event maps to.
    pub fn apply(&mut self, event: StoreEvent<R>) -> StoreResult<()> {
        match event {
            StoreEvent::Attach {
                entity,
                record,
                visible,
            } => self.insert(entity, record, visible).map(|_| ()),
            StoreEvent::Detach { entity } => self.remove(entity).map(|_| ()),
            StoreEvent::VisibilityChanged { entity, visible } => {
                self.set_visible(entity, visible).map(|_| ())
            }
            StoreEvent::Update { entity, record } => self.update(entity, record),
        }
    }

    /// Removes every entity. Capacity is kept.
    pub fn clear(&mut self) {
        tracing::debug!("Clearing store ({} entities)", self.partition.occupied());
        self.slots.clear();
        self.partition.clear();
    }

    // =========================================================================
    // Counters
    // =========================================================================

    /// Returns the number of visible records.
    #[inline]
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.partition.visible()
    }

    /// Returns the number of hidden records.
    #[inline]
    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.partition.hidden()
    }

    /// Returns the number of held records (visible + hidden).
    #[inline]
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.partition.occupied()
    }

    /// Checks if the store holds no entity.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partition.occupied() == 0
    }

    /// Returns the capacity in records. Always a power of two.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Returns the number of `f32` scalars per record.
    #[inline]
    #[must_use]
    pub fn record_stride(&self) -> usize {
        R::ATTRIBUTES
    }

    // =========================================================================
    // Per-entity access
    // =========================================================================

    /// Checks if `entity` is held.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.slots.contains(entity)
    }

    /// Returns the current slot of `entity`. Only valid until the next
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEntity`](crate::StoreError::InvalidEntity)
    /// if the entity is not held.
    #[inline]
    pub fn slot_of(&self, entity: EntityId) -> StoreResult<usize> {
        self.slots.index_of(entity)
    }

    /// Returns the entity occupying `slot`, if the slot is occupied.
    #[inline]
    #[must_use]
    pub fn entity_at(&self, slot: usize) -> Option<EntityId> {
        if slot < self.partition.occupied() {
            self.slots.entity_at(slot)
        } else {
            None
        }
    }

    /// Checks if `entity` is in the visible prefix.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEntity`](crate::StoreError::InvalidEntity)
    /// if the entity is not held.
    #[inline]
    pub fn is_visible(&self, entity: EntityId) -> StoreResult<bool> {
        let slot = self.slots.index_of(entity)?;
        Ok(self.partition.is_visible_slot(slot))
    }

    /// Returns the record of `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEntity`](crate::StoreError::InvalidEntity)
    /// if the entity is not held.
    #[inline]
    pub fn get(&self, entity: EntityId) -> StoreResult<&R> {
        let slot = self.slots.index_of(entity)?;
        Ok(&self.buffer.as_slice()[slot])
    }

    /// Returns the record of `entity` mutably, for in-place attribute edits.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEntity`](crate::StoreError::InvalidEntity)
    /// if the entity is not held.
    #[inline]
    pub fn get_mut(&mut self, entity: EntityId) -> StoreResult<&mut R> {
        let slot = self.slots.index_of(entity)?;
        Ok(&mut self.buffer.as_mut_slice()[slot])
    }

    // =========================================================================
    // Packed views (renderer side)
    // =========================================================================

    /// Returns the visible records, packed.
    #[inline]
    #[must_use]
    pub fn visible_records(&self) -> &[R] {
        &self.buffer.as_slice()[..self.partition.visible()]
    }

    /// Returns the visible records mutably.
    #[inline]
    pub fn visible_records_mut(&mut self) -> &mut [R] {
        let visible = self.partition.visible();
        &mut self.buffer.as_mut_slice()[..visible]
    }

    /// Returns the hidden records, packed right after the visible ones.
    #[inline]
    #[must_use]
    pub fn hidden_records(&self) -> &[R] {
        &self.buffer.as_slice()[self.partition.visible()..self.partition.occupied()]
    }

    /// Returns every held record: the visible prefix followed by the hidden
    /// suffix.
    #[inline]
    #[must_use]
    pub fn occupied_records(&self) -> &[R] {
        &self.buffer.as_slice()[..self.partition.occupied()]
    }

    /// Returns the visible prefix as `visible_count() * record_stride()`
    /// scalars.
    #[inline]
    #[must_use]
    pub fn visible_scalars(&self) -> &[f32] {
        bytemuck::cast_slice(self.visible_records())
    }

    /// Returns the visible prefix as mutable scalars.
    #[inline]
    pub fn visible_scalars_mut(&mut self) -> &mut [f32] {
        bytemuck::cast_slice_mut(self.visible_records_mut())
    }

    /// Returns the visible prefix as raw bytes, ready for a GPU upload.
    #[inline]
    #[must_use]
    pub fn visible_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.visible_records())
    }

    /// Iterates over visible entities and their records, in slot order.
    pub fn iter_visible(&self) -> impl Iterator<Item = (EntityId, &R)> {
        self.visible_records()
            .iter()
            .enumerate()
            .filter_map(|(slot, record)| self.slots.entity_at(slot).map(|entity| (entity, record)))
    }

    /// Iterates over every held entity and its record, visible ones first.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &R)> {
        self.occupied_records()
            .iter()
            .enumerate()
            .filter_map(|(slot, record)| self.slots.entity_at(slot).map(|entity| (entity, record)))
    }
}

impl<R: Record> Default for Store<R> {
    fn default() -> Self {
        Self::new()
    }
}
