//! Randomized interleavings of insert, remove, and visibility changes,
//! checked against a plain map model after every step.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vispack_core::{EntityId, EventQueue, ShapeRecord, Store, StoreError, StoreEvent};

/// Model entry: the record the entity was last given and its visibility.
type Model = HashMap<EntityId, (ShapeRecord, bool)>;

const ENTITY_POOL: u64 = 48;

fn record_for(raw: u64, generation: u32) -> ShapeRecord {
    ShapeRecord::sized(raw as f32, generation as f32)
}

/// Checks every structural law of the store against the model.
fn check_laws(store: &Store<ShapeRecord>, model: &Model) {
    let occupied = store.occupied_count();
    let visible = store.visible_count();

    assert_eq!(occupied, model.len());
    assert_eq!(visible, model.values().filter(|(_, v)| *v).count());
    assert_eq!(store.hidden_count(), occupied - visible);

    // Capacity: smallest power of two covering the high-water mark, and a
    // power of two no matter what.
    assert!(store.capacity().is_power_of_two());
    assert!(store.capacity() >= occupied.max(1));

    // Partition and record placement.
    for (entity, (record, is_visible)) in model {
        let slot = store.slot_of(*entity).unwrap();
        assert!(slot < occupied);
        assert_eq!(slot < visible, *is_visible, "{entity} in wrong partition");
        assert_eq!(store.occupied_records()[slot], *record);
        assert_eq!(store.entity_at(slot), Some(*entity));
    }

    // Bijection: every occupied slot belongs to exactly one modelled entity.
    let mut seen = std::collections::HashSet::new();
    for slot in 0..occupied {
        let entity = store.entity_at(slot).unwrap();
        assert!(model.contains_key(&entity));
        assert!(seen.insert(entity));
    }
    assert_eq!(store.entity_at(occupied), None);
}

fn run(seed: u64, steps: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut store: Store<ShapeRecord> = Store::new();
    let mut model = Model::new();
    let mut high_water = 0usize;
    let mut generation = 0u32;

    for _ in 0..steps {
        let entity = EntityId::new(rng.gen_range(0..ENTITY_POOL));
        generation += 1;

        match rng.gen_range(0..10) {
            0..=3 => {
                let record = record_for(entity.raw(), generation);
                let visible = rng.gen_bool(0.6);
                let result = store.insert(entity, record, visible);
                if model.contains_key(&entity) {
                    assert_eq!(result, Err(StoreError::DuplicateEntity(entity)));
                } else {
                    let slot = result.unwrap();
                    assert_eq!(slot < store.visible_count(), visible);
                    model.insert(entity, (record, visible));
                }
            }
            4..=6 => {
                let result = store.remove(entity);
                match model.remove(&entity) {
                    Some((record, _)) => assert_eq!(result, Ok(record)),
                    None => assert_eq!(result, Err(StoreError::InvalidEntity(entity))),
                }
            }
            7 | 8 => {
                let visible = rng.gen_bool(0.5);
                let result = store.set_visible(entity, visible);
                match model.get_mut(&entity) {
                    Some(entry) => {
                        assert_eq!(result, Ok(entry.1 != visible));
                        entry.1 = visible;
                    }
                    None => assert_eq!(result, Err(StoreError::InvalidEntity(entity))),
                }
            }
            _ => {
                let record = record_for(entity.raw(), generation);
                let result = store.update(entity, record);
                match model.get_mut(&entity) {
                    Some(entry) => {
                        assert_eq!(result, Ok(()));
                        entry.0 = record;
                    }
                    None => assert_eq!(result, Err(StoreError::InvalidEntity(entity))),
                }
            }
        }

        high_water = high_water.max(model.len());
        assert_eq!(store.capacity(), high_water.max(1).next_power_of_two());
        check_laws(&store, &model);
    }
}

#[test]
fn test_random_interleavings() {
    for seed in 0..16 {
        run(seed, 2_000);
    }
}

#[test]
fn test_visibility_flip_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut store: Store<ShapeRecord> = Store::new();

    for raw in 0..32 {
        store
            .insert(EntityId::new(raw), record_for(raw, 0), rng.gen_bool(0.5))
            .unwrap();
    }

    for _ in 0..500 {
        let entity = EntityId::new(rng.gen_range(0..32));
        let visible = rng.gen_bool(0.5);
        store.set_visible(entity, visible).unwrap();

        let snapshot: Vec<_> = store.iter().map(|(e, r)| (e, *r)).collect();
        let visible_count = store.visible_count();

        assert_eq!(store.set_visible(entity, visible), Ok(false));
        let again: Vec<_> = store.iter().map(|(e, r)| (e, *r)).collect();
        assert_eq!(snapshot, again);
        assert_eq!(store.visible_count(), visible_count);
    }
}

#[test]
fn test_queued_events_match_direct_calls() {
    let mut rng = StdRng::seed_from_u64(99);
    let queue = EventQueue::unbounded();
    let mut direct: Store<ShapeRecord> = Store::new();
    let mut live = std::collections::HashSet::new();

    for step in 0..1_000u32 {
        let raw = rng.gen_range(0..ENTITY_POOL);
        let entity = EntityId::new(raw);

        // Only produce events the registry would send for this entity.
        let event = if live.contains(&entity) {
            if rng.gen_bool(0.3) {
                live.remove(&entity);
                StoreEvent::Detach { entity }
            } else if rng.gen_bool(0.5) {
                StoreEvent::VisibilityChanged {
                    entity,
                    visible: rng.gen_bool(0.5),
                }
            } else {
                StoreEvent::Update {
                    entity,
                    record: record_for(raw, step),
                }
            }
        } else {
            live.insert(entity);
            StoreEvent::Attach {
                entity,
                record: record_for(raw, step),
                visible: rng.gen_bool(0.5),
            }
        };

        direct.apply(event).unwrap();
        queue.push(event).unwrap();
    }

    let mut drained: Store<ShapeRecord> = Store::new();
    assert_eq!(queue.drain_into(&mut drained), Ok(1_000));

    let direct_view: Vec<_> = direct.iter().map(|(e, r)| (e, *r)).collect();
    let drained_view: Vec<_> = drained.iter().map(|(e, r)| (e, *r)).collect();
    assert_eq!(direct_view, drained_view);
    assert_eq!(direct.visible_count(), drained.visible_count());
    assert_eq!(direct.capacity(), drained.capacity());
}
