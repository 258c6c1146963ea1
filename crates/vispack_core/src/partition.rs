//! # Visibility Partition
//!
//! Keeps the occupied slots of a [`DenseBuffer`] split in two contiguous
//! runs:
//!
//! ```text
//!  0                visible            occupied          capacity
//!  | visible records |  hidden records  |  unused capacity  |
//! ```
//!
//! Every operation restores the split with at most two slot exchanges, so
//! insert, remove and visibility flips are O(1) regardless of occupancy.
//! The price is that order among records of the same visibility is not
//! preserved.
//!
//! The partition only holds the two counters. The buffer and slot table it
//! rearranges are passed in by the owner, which keeps each piece testable on
//! its own.

use crate::buffer::DenseBuffer;
use crate::entity::EntityId;
use crate::error::{StoreError, StoreResult};
use crate::record::Record;
use crate::slots::SlotTable;

/// Owner of the visible/hidden boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionManager {
    /// Number of occupied slots (visible + hidden).
    occupied: usize,
    /// Number of visible slots; always `<= occupied`.
    visible: usize,
}

/// Exchanges two slots in both the buffer and the table.
#[inline]
fn exchange<R: Record>(buffer: &mut DenseBuffer<R>, slots: &mut SlotTable, a: usize, b: usize) {
    if a != b {
        buffer.swap(a, b);
        slots.swap(a, b);
    }
}

impl PartitionManager {
    /// Creates an empty partition.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            occupied: 0,
            visible: 0,
        }
    }

    /// Returns the number of occupied slots.
    #[inline]
    #[must_use]
    pub const fn occupied(&self) -> usize {
        self.occupied
    }

    /// Returns the number of visible slots.
    #[inline]
    #[must_use]
    pub const fn visible(&self) -> usize {
        self.visible
    }

    /// Returns the number of hidden slots.
    #[inline]
    #[must_use]
    pub const fn hidden(&self) -> usize {
        self.occupied - self.visible
    }

    /// Checks if `slot` lies in the visible prefix.
    #[inline]
    #[must_use]
    pub const fn is_visible_slot(&self, slot: usize) -> bool {
        slot < self.visible
    }

    /// Inserts `entity` with its initial record, returning its final slot.
    ///
    /// The record is written at the first unoccupied slot. A visible record is
    /// then exchanged with the first hidden slot, which moves that hidden
    /// record to the tail.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidEntity`] for the null entity
    /// - [`StoreError::DuplicateEntity`] if the entity is already held
    /// - [`StoreError::AllocationFailure`] if growth fails
    ///
    /// Nothing is modified when an error is returned.
    pub fn insert<R: Record>(
        &mut self,
        buffer: &mut DenseBuffer<R>,
        slots: &mut SlotTable,
        entity: EntityId,
        record: R,
        visible: bool,
    ) -> StoreResult<usize> {
        if entity.is_null() {
            return Err(StoreError::InvalidEntity(entity));
        }
        if slots.contains(entity) {
            return Err(StoreError::DuplicateEntity(entity));
        }

        let tail = self.occupied;
        slots.try_reserve(1)?;
        buffer.ensure_capacity(tail + 1)?;

        buffer.write(tail, record);
        slots.bind(entity, tail);

        let slot = if visible {
            let boundary = self.visible;
            exchange(buffer, slots, tail, boundary);
            self.visible += 1;
            boundary
        } else {
            tail
        };

        self.occupied += 1;
        Ok(slot)
    }

    /// Removes `entity`, returning the record it held.
    ///
    /// A visible record is first exchanged with the last visible record, then
    /// with the last occupied record. A hidden record is exchanged with the
    /// last occupied record directly. The vacated tail slot is not cleared.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEntity`] if the entity is not held.
    pub fn remove<R: Record>(
        &mut self,
        buffer: &mut DenseBuffer<R>,
        slots: &mut SlotTable,
        entity: EntityId,
    ) -> StoreResult<R> {
        let mut slot = slots.index_of(entity)?;
        let last = self.occupied - 1;

        if slot < self.visible {
            self.visible -= 1;
            exchange(buffer, slots, slot, self.visible);
            slot = self.visible;
        }
        exchange(buffer, slots, slot, last);

        let removed = buffer.as_slice()[last];
        slots.unbind(entity);
        self.occupied = last;

        Ok(removed)
    }

    /// Moves `entity` across the boundary if its visibility changes.
    ///
    /// Returns `true` if the entity changed side, `false` if it already had
    /// the requested visibility.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEntity`] if the entity is not held.
    pub fn set_visible<R: Record>(
        &mut self,
        buffer: &mut DenseBuffer<R>,
        slots: &mut SlotTable,
        entity: EntityId,
        visible: bool,
    ) -> StoreResult<bool> {
        let slot = slots.index_of(entity)?;
        if self.is_visible_slot(slot) == visible {
            return Ok(false);
        }

        if visible {
            exchange(buffer, slots, slot, self.visible);
            self.visible += 1;
        } else {
            self.visible -= 1;
            exchange(buffer, slots, slot, self.visible);
        }

        Ok(true)
    }

    /// Resets both counters to zero.
    #[inline]
    pub fn clear(&mut self) {
        self.occupied = 0;
        self.visible = 0;
    }
}
