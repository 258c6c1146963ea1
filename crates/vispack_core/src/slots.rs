//! # Slot Table
//!
//! Bidirectional mapping between entity ids and dense slot indices.
//!
//! ```text
//! index_of:  { #7 -> 0, #3 -> 1, #9 -> 2 }
//! entity_at: [ #7,      #3,      #9      ]
//! ```
//!
//! Both directions are updated together, so a lookup in one always agrees
//! with the other. The table is a pure index cache: it knows nothing about
//! records or visibility.

use std::collections::HashMap;

use crate::entity::EntityId;
use crate::error::{StoreError, StoreResult};

/// Entity id <-> slot index mapping with O(1) operations in both directions.
#[derive(Debug, Default, Clone)]
pub struct SlotTable {
    /// Entity -> slot.
    index_of: HashMap<EntityId, usize>,
    /// Slot -> entity. Unbound slots hold `EntityId::NULL`.
    entity_at: Vec<EntityId>,
}

impl SlotTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with room for `capacity` entities.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index_of: HashMap::with_capacity(capacity),
            entity_at: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of bound entities.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.index_of.len()
    }

    /// Checks if no entity is bound.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index_of.is_empty()
    }

    /// Checks if `entity` is bound to a slot.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.index_of.contains_key(&entity)
    }

    /// Returns the slot bound to `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidEntity`] if the entity has no slot.
    #[inline]
    pub fn index_of(&self, entity: EntityId) -> StoreResult<usize> {
        self.index_of
            .get(&entity)
            .copied()
            .ok_or(StoreError::InvalidEntity(entity))
    }

    /// Returns the entity bound to `slot`, if any.
    #[inline]
    #[must_use]
    pub fn entity_at(&self, slot: usize) -> Option<EntityId> {
        self.entity_at
            .get(slot)
            .copied()
            .filter(|entity| !entity.is_null())
    }

    /// Reserves room for `additional` more bindings without touching any
    /// existing mapping.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailure`] if memory cannot be acquired.
    pub fn try_reserve(&mut self, additional: usize) -> StoreResult<()> {
        let requested = self.index_of.len() + additional;
        self.index_of
            .try_reserve(additional)
            .map_err(|_| StoreError::AllocationFailure { requested })?;
        let missing = requested.saturating_sub(self.entity_at.len());
        self.entity_at
            .try_reserve(missing)
            .map_err(|_| StoreError::AllocationFailure { requested })
    }

    /// Binds `entity` to `slot`, overwriting any previous binding of either.
    ///
    /// An entity previously bound to `slot` loses its mapping.
    pub fn bind(&mut self, entity: EntityId, slot: usize) {
        debug_assert!(!entity.is_null(), "cannot bind the null entity");

        if let Some(previous) = self.index_of.insert(entity, slot) {
            if previous != slot && self.entity_at.get(previous) == Some(&entity) {
                self.entity_at[previous] = EntityId::NULL;
            }
        }

        if slot >= self.entity_at.len() {
            self.entity_at.resize(slot + 1, EntityId::NULL);
        }

        let displaced = std::mem::replace(&mut self.entity_at[slot], entity);
        if !displaced.is_null() && displaced != entity {
            self.index_of.remove(&displaced);
        }
    }

    /// Removes the binding of `entity`, returning the slot it held.
    pub fn unbind(&mut self, entity: EntityId) -> Option<usize> {
        let slot = self.index_of.remove(&entity)?;
        if self.entity_at.get(slot) == Some(&entity) {
            self.entity_at[slot] = EntityId::NULL;
        }
        Some(slot)
    }

    /// Exchanges the entities bound to two slots, rebinding both.
    ///
    /// Either slot may be unbound.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }

        let high = a.max(b);
        if high >= self.entity_at.len() {
            self.entity_at.resize(high + 1, EntityId::NULL);
        }

        self.entity_at.swap(a, b);

        for slot in [a, b] {
            let entity = self.entity_at[slot];
            if !entity.is_null() {
                self.index_of.insert(entity, slot);
            }
        }
    }

    /// Removes every binding. Reserved memory is kept.
    pub fn clear(&mut self) {
        self.index_of.clear();
        self.entity_at.clear();
    }
}
