use anyhow::Result as AnyResult;
use rbac_domain::error::DomainError;
use rbac_domain::snowflake::{EPOCH_MILLIS, IdGenerator, IdParts, ManualClock};
use rbac_domain::Id;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn concurrent_batches_never_collide() -> AnyResult<()> {
    let generator = Arc::new(IdGenerator::new(3)?);

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let generator = Arc::clone(&generator);
            thread::spawn(move || generator.next_ids(100))
        })
        .collect();

    let mut all = HashSet::new();
    for handle in handles {
        let batch = handle.join().expect("worker thread panicked")?;
        assert_eq!(batch.len(), 100);
        // 同一批内部保持发号顺序
        assert!(batch.windows(2).all(|w| w[0] < w[1]));
        all.extend(batch);
    }
    assert_eq!(all.len(), 1000);
    Ok(())
}

#[test]
fn ids_from_distinct_workers_differ() -> AnyResult<()> {
    let clock = Arc::new(ManualClock::new(EPOCH_MILLIS + 5_000));
    let a = IdGenerator::with_clock(1, clock.clone())?;
    let b = IdGenerator::with_clock(2, clock.clone())?;

    let mut seen = HashSet::new();
    for _ in 0..50 {
        assert!(seen.insert(a.next_id()?));
        assert!(seen.insert(b.next_id()?));
    }
    Ok(())
}

#[test]
fn ids_are_monotonic_per_worker() -> AnyResult<()> {
    let generator = IdGenerator::new(9)?;
    let mut last = Id::ROOT;
    for _ in 0..5_000 {
        let id = generator.next_id()?;
        assert!(id > last);
        last = id;
    }
    Ok(())
}

#[test]
fn bit_layout_matches_issue_time() -> AnyResult<()> {
    let generator = IdGenerator::new(1)?;
    let before = chrono::Utc::now().timestamp_millis() as u64;
    let id = generator.next_id()?;
    let after = chrono::Utc::now().timestamp_millis() as u64;

    assert_eq!(id.as_u64() >> 63, 0);
    let parts = id.decompose();
    assert!(parts.timestamp_millis >= before && parts.timestamp_millis <= after);
    assert_eq!(parts.worker_id, 1);
    assert_eq!(Id::compose(parts)?, id);
    Ok(())
}

#[test]
fn worker_one_batch_of_three() -> AnyResult<()> {
    let t = EPOCH_MILLIS + 42;
    let generator = IdGenerator::with_clock(1, ManualClock::new(t))?;
    let ids = generator.next_ids(3)?;

    let expected: Vec<Id> = (0..3)
        .map(|sequence| {
            Id::compose(IdParts {
                timestamp_millis: t,
                worker_id: 1,
                sequence,
            })
        })
        .collect::<Result<_, _>>()?;
    assert_eq!(ids, expected);
    assert_eq!(ids[0].as_u64(), (42 << 22) | (1 << 12));
    Ok(())
}

#[test]
fn batch_fails_whole_on_rollback() -> AnyResult<()> {
    let clock = Arc::new(ManualClock::new(EPOCH_MILLIS + 1_000));
    let generator = IdGenerator::with_clock(4, clock.clone())?;
    generator.next_id()?;

    clock.set(EPOCH_MILLIS + 500);
    match generator.next_ids(10) {
        Err(DomainError::ClockRollback { last_millis, now_millis }) => {
            assert_eq!(last_millis, EPOCH_MILLIS + 1_000);
            assert_eq!(now_millis, EPOCH_MILLIS + 500);
        }
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[test]
fn invalid_worker_ids_are_rejected() {
    for bad in [-1_i64, 1024, 100_000] {
        assert!(matches!(
            IdGenerator::new(bad),
            Err(DomainError::InvalidWorkerId { .. })
        ));
    }
}
