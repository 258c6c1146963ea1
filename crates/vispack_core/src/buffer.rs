//! # Dense Record Buffer
//!
//! Growable, contiguous storage for one fixed-size record per slot.
//!
//! The buffer uses a doubling strategy:
//! - Capacity is always a power of two (minimum 1)
//! - Growth preserves every record at its current offset
//! - Capacity never shrinks
//!
//! The buffer has no notion of which slots are occupied or visible; that is
//! the partition's job. It only knows how to grow, address and exchange
//! records.

use crate::error::{StoreError, StoreResult};
use crate::record::Record;

/// Contiguous record storage with power-of-two growth.
///
/// Every slot in `[0, capacity)` holds a valid record; slots that were never
/// written are zeroed.
///
/// # Example
///
/// ```rust,ignore
/// let mut buffer: DenseBuffer<ShapeRecord> = DenseBuffer::new();
/// buffer.ensure_capacity(5)?;
/// assert_eq!(buffer.capacity(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct DenseBuffer<R: Record> {
    /// The records. `records.len()` is the capacity.
    records: Vec<R>,
    /// Hard ceiling on growth, if configured.
    max_capacity: Option<usize>,
}

impl<R: Record> DenseBuffer<R> {
    /// Creates a buffer with the minimum capacity of one record.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Creates a buffer holding at least `capacity` records.
    ///
    /// The capacity is rounded up to a power of two; zero is treated as one.
    ///
    /// # Panics
    ///
    /// Panics if the rounded capacity overflows or cannot be allocated. Use
    /// [`try_with_capacity`](Self::try_with_capacity) for sizes that come
    /// from outside the program.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        debug_assert!(R::ATTRIBUTES > 0);
        let capacity = capacity.max(1).next_power_of_two();

        Self {
            records: vec![R::zeroed(); capacity],
            max_capacity: None,
        }
    }

    /// Creates a buffer holding at least `capacity` records, reporting
    /// allocation problems instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailure`] if the rounded capacity
    /// overflows or cannot be allocated.
    pub fn try_with_capacity(capacity: usize) -> StoreResult<Self> {
        debug_assert!(R::ATTRIBUTES > 0);
        let Some(rounded) = capacity.max(1).checked_next_power_of_two() else {
            return Err(StoreError::AllocationFailure {
                requested: capacity,
            });
        };

        let mut records = Vec::new();
        if records.try_reserve_exact(rounded).is_err() {
            tracing::warn!("Buffer allocation of {} records failed", rounded);
            return Err(StoreError::AllocationFailure { requested: rounded });
        }
        records.resize(rounded, R::zeroed());

        Ok(Self {
            records,
            max_capacity: None,
        })
    }

    /// Sets a hard ceiling on growth. Growth past it fails with
    /// [`StoreError::AllocationFailure`].
    ///
    /// Capacity only takes power-of-two values, so a ceiling that is not a
    /// power of two acts as the power of two below it.
    #[must_use]
    pub fn with_max_capacity(mut self, max_capacity: Option<usize>) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Returns the capacity in records.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    /// Makes room for at least `required` records.
    ///
    /// If `required` exceeds the capacity, reallocates to the next power of
    /// two and zeroes the new tail. Existing records keep their offsets.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AllocationFailure`] if the new capacity overflows,
    /// exceeds the configured ceiling, or cannot be allocated. The buffer is
    /// left unchanged in that case.
    pub fn ensure_capacity(&mut self, required: usize) -> StoreResult<()> {
        let current = self.records.len();
        if required <= current {
            return Ok(());
        }

        let Some(new_capacity) = required.checked_next_power_of_two() else {
            return Err(StoreError::AllocationFailure { requested: required });
        };

        if self.max_capacity.is_some_and(|max| new_capacity > max) {
            tracing::warn!(
                "Buffer growth to {} records exceeds ceiling {:?}",
                new_capacity,
                self.max_capacity
            );
            return Err(StoreError::AllocationFailure {
                requested: new_capacity,
            });
        }

        if self.records.try_reserve_exact(new_capacity - current).is_err() {
            tracing::warn!("Buffer growth to {} records failed to allocate", new_capacity);
            return Err(StoreError::AllocationFailure {
                requested: new_capacity,
            });
        }

        self.records.resize(new_capacity, R::zeroed());
        tracing::debug!("Buffer grown: {} -> {} records", current, new_capacity);

        Ok(())
    }

    /// Gets the record at `slot`.
    #[inline]
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&R> {
        self.records.get(slot)
    }

    /// Gets the record at `slot` mutably.
    #[inline]
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut R> {
        self.records.get_mut(slot)
    }

    /// Returns the scalar attributes of the record at `slot`.
    #[inline]
    pub fn scalars_mut(&mut self, slot: usize) -> Option<&mut [f32]> {
        self.records
            .get_mut(slot)
            .map(|record| bytemuck::cast_slice_mut(std::slice::from_mut(record)))
    }

    /// Overwrites the record at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= capacity`.
    #[inline]
    pub fn write(&mut self, slot: usize, record: R) {
        self.records[slot] = record;
    }

    /// Exchanges the full records of two slots in place.
    ///
    /// # Panics
    ///
    /// Panics if either slot is `>= capacity`.
    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.records.swap(a, b);
    }

    /// Returns every record, occupied or not.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    /// Returns every record mutably, occupied or not.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [R] {
        &mut self.records
    }
}

impl<R: Record> Default for DenseBuffer<R> {
    fn default() -> Self {
        Self::new()
    }
}
