use std::sync::{Arc, Barrier};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::claims::*;
use crate::coords::{ColumnIndex, ColumnPos, TileCoord, WorldId};
use crate::domain::Domain;
use crate::error::{ClaimConflict, DomainsError};
use crate::key::Key;
use crate::privilege::Role;
use crate::repository::{MemoryRepository, Repository};

fn key(text: &str) -> Key {
    Key::parse(text).unwrap()
}

fn world() -> WorldId {
    WorldId(Uuid::from_u128(0xA))
}

fn tile(x: i32, z: i32) -> TileCoord {
    TileCoord::new(world(), x, z)
}

fn col(i: u8, k: u8) -> ColumnIndex {
    ColumnIndex::new(i, k).unwrap()
}

/// Store whose repository already holds every domain the tests claim for.
fn store() -> ClaimStore {
    let repository = MemoryRepository::new();
    let keys = ["no", "no:ak", "ch"]
        .map(String::from)
        .into_iter()
        .chain((0..8).map(|n| format!("d{n}")));
    for k in keys {
        repository
            .save_domain(&Domain::new(key(&k), Role::Outsider, None))
            .unwrap();
    }
    ClaimStore::new(Arc::new(repository))
}

fn conflict(result: Result<impl std::fmt::Debug, DomainsError>) -> ClaimConflict {
    match result {
        Err(DomainsError::Conflict(c)) => c,
        other => panic!("expected a claim conflict, got {other:?}"),
    }
}

#[test]
fn test_unclaimed_is_default() {
    let s = store();
    assert_eq!(s.claim_at(tile(3, -2)).unwrap(), ClaimState::Unclaimed);
    assert_eq!(s.owner_at(ColumnPos::new(world(), 48, -20)).unwrap(), None);
}

#[test]
fn test_annex_exclusive_twice_fails_and_keeps_state() {
    let s = store();
    s.annex_exclusive(tile(0, 0), &key("no")).unwrap();
    let c = conflict(s.annex_exclusive(tile(0, 0), &key("ch")));
    assert_eq!(c, ClaimConflict::AlreadyExclusive { owner: key("no") });
    assert_eq!(s.claim_at(tile(0, 0)).unwrap(), ClaimState::Exclusive(key("no")));
}

#[test]
fn test_annex_for_unknown_domain_fails() {
    let s = store();
    assert!(matches!(
        s.annex_exclusive(tile(0, 0), &key("ghost")),
        Err(DomainsError::UnknownDomain(k)) if k == key("ghost")
    ));
    assert!(matches!(
        s.annex_column(tile(0, 0), col(1, 1), &key("no:ghost")),
        Err(DomainsError::UnknownDomain(_))
    ));
    assert_eq!(s.claim_at(tile(0, 0)).unwrap(), ClaimState::Unclaimed);
    assert_eq!(s.revision(tile(0, 0)), 0);
}

#[test]
fn test_annex_exclusive_on_partitioned_fails() {
    let s = store();
    s.annex_column(tile(0, 0), col(1, 1), &key("no")).unwrap();
    let c = conflict(s.annex_exclusive(tile(0, 0), &key("no")));
    assert_eq!(c, ClaimConflict::AlreadyPartitioned);
    assert_eq!(s.claim_at(tile(0, 0)).unwrap().kind(), ClaimKind::Partitioned);
}

#[test]
fn test_annex_column_on_exclusive_fails() {
    let s = store();
    s.annex_exclusive(tile(0, 0), &key("no")).unwrap();
    let c = conflict(s.annex_column(tile(0, 0), col(5, 3), &key("ch")));
    assert_eq!(c, ClaimConflict::TileFullyClaimed { owner: key("no") });
}

#[test]
fn test_annex_column_partitions_and_fills() {
    let s = store();
    s.annex_column(tile(0, 0), col(5, 3), &key("no:ak")).unwrap();
    s.annex_column(tile(0, 0), col(5, 4), &key("ch")).unwrap();
    let c = conflict(s.annex_column(tile(0, 0), col(5, 3), &key("ch")));
    assert_eq!(c, ClaimConflict::ColumnOccupied { owner: key("no:ak") });

    let ClaimState::Partitioned(columns) = s.claim_at(tile(0, 0)).unwrap() else {
        panic!("tile should be partitioned");
    };
    assert_eq!(columns.occupied_count(), 2);
    assert_eq!(
        s.owner_at(tile(0, 0).column_pos(col(5, 3))).unwrap(),
        Some(key("no:ak"))
    );
    assert_eq!(s.owner_at(tile(0, 0).column_pos(col(0, 0))).unwrap(), None);
}

#[test]
fn test_releasing_sole_column_unclaims_tile() {
    let s = store();
    s.annex_column(tile(0, 0), col(2, 9), &key("no")).unwrap();
    assert_eq!(s.release_column(tile(0, 0), col(2, 9)).unwrap(), key("no"));
    assert_eq!(s.claim_at(tile(0, 0)).unwrap(), ClaimState::Unclaimed);
    // The tile is free for a whole-tile claim again.
    s.annex_exclusive(tile(0, 0), &key("ch")).unwrap();
}

#[test]
fn test_release_errors() {
    let s = store();
    assert_eq!(
        conflict(s.release_exclusive(tile(0, 0))),
        ClaimConflict::NotExclusive
    );
    assert_eq!(
        conflict(s.release_column(tile(0, 0), col(0, 0))),
        ClaimConflict::ColumnVacant
    );
    s.annex_column(tile(0, 0), col(0, 0), &key("no")).unwrap();
    assert_eq!(
        conflict(s.release_column(tile(0, 0), col(0, 1))),
        ClaimConflict::ColumnVacant
    );
    assert_eq!(
        conflict(s.release_exclusive(tile(0, 0))),
        ClaimConflict::NotExclusive
    );
    s.annex_exclusive(tile(1, 0), &key("no")).unwrap();
    assert_eq!(
        conflict(s.release_column(tile(1, 0), col(0, 0))),
        ClaimConflict::TileFullyClaimed { owner: key("no") }
    );
    assert_eq!(s.release_exclusive(tile(1, 0)).unwrap(), key("no"));
}

#[test]
fn test_revision_advances_only_on_commit() {
    let s = store();
    assert_eq!(s.revision(tile(0, 0)), 0);
    s.annex_exclusive(tile(0, 0), &key("no")).unwrap();
    let first = s.revision(tile(0, 0));
    assert!(first > 0);
    let _ = s.annex_exclusive(tile(0, 0), &key("ch"));
    assert_eq!(s.revision(tile(0, 0)), first);
    assert_eq!(s.revision(tile(5, 5)), 0);
    assert_eq!(s.revisions().neighborhood_revision(tile(1, 0)), first);
    assert_eq!(s.revisions().neighborhood_revision(tile(1, 1)), 0);
}

#[test]
fn test_epoch_counts_for_every_tile() {
    let s = store();
    s.annex_exclusive(tile(0, 0), &key("no")).unwrap();
    let before = s.revision(tile(0, 0));
    s.with_all_tiles(|_| Ok(())).unwrap();
    assert!(s.revision(tile(0, 0)) > before);
    assert_eq!(s.revision(tile(9, 9)), s.revisions().epoch());
}

#[test]
fn test_concurrent_annex_of_same_tile_has_one_winner() {
    const THREADS: usize = 8;
    let s = Arc::new(store());
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|n| {
            let s = Arc::clone(&s);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                let owner = key(&format!("d{n}"));
                barrier.wait();
                s.annex_exclusive(tile(0, 0), &owner).is_ok()
            })
        })
        .collect();
    let wins = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(wins, 1);
    assert_eq!(s.held_tile_locks(), 0);
}

#[test]
fn test_concurrent_column_annex_keeps_every_win() {
    const THREADS: usize = 8;
    let s = Arc::new(store());
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|n| {
            let s = Arc::clone(&s);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                let owner = key(&format!("d{n}"));
                barrier.wait();
                // Every thread tries the shared column, then its own.
                let shared = s.annex_column(tile(0, 0), col(0, 0), &owner).is_ok();
                s.annex_column(tile(0, 0), col(1, n as u8), &owner).unwrap();
                shared
            })
        })
        .collect();
    let wins = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(wins, 1);
    let ClaimState::Partitioned(columns) = s.claim_at(tile(0, 0)).unwrap() else {
        panic!("tile should be partitioned");
    };
    assert_eq!(columns.occupied_count(), THREADS + 1);
    assert_eq!(s.held_tile_locks(), 0);
}

#[test]
fn test_tile_locks_are_released_across_many_tiles() {
    let s = store();
    for x in 0..100 {
        s.annex_exclusive(tile(x, 0), &key("no")).unwrap();
        let _ = s.annex_exclusive(tile(x, 0), &key("ch"));
        let _ = s.annex_exclusive(tile(x, 1), &key("ghost"));
    }
    assert_eq!(s.held_tile_locks(), 0);
}

/// Random operations against a small board, checked against a plain
/// model of the state machine.
#[test]
fn test_random_operations_match_model() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let s = store();
    let owners = [key("no"), key("no:ak"), key("ch")];
    let mut model: std::collections::HashMap<TileCoord, ClaimState> = Default::default();

    for _ in 0..2_000 {
        let t = tile(rng.gen_range(0..3), rng.gen_range(0..3));
        let c = col(rng.gen_range(0..2), rng.gen_range(0..2));
        let owner = &owners[rng.gen_range(0..owners.len())];
        let current = model.get(&t).cloned().unwrap_or_default();
        match rng.gen_range(0..4) {
            0 => {
                let ok = s.annex_exclusive(t, owner).is_ok();
                assert_eq!(ok, current.is_unclaimed());
                if ok {
                    model.insert(t, ClaimState::Exclusive(owner.clone()));
                }
            }
            1 => {
                let ok = s.annex_column(t, c, owner).is_ok();
                let expected = match &current {
                    ClaimState::Unclaimed => true,
                    ClaimState::Exclusive(_) => false,
                    ClaimState::Partitioned(columns) => columns.get(c).is_none(),
                };
                assert_eq!(ok, expected);
                if ok {
                    let mut columns = match current {
                        ClaimState::Partitioned(columns) => columns,
                        _ => ColumnClaims::new(),
                    };
                    columns.set(c, owner.clone());
                    model.insert(t, ClaimState::Partitioned(columns));
                }
            }
            2 => {
                let ok = s.release_exclusive(t).is_ok();
                assert_eq!(ok, current.kind() == ClaimKind::Exclusive);
                if ok {
                    model.remove(&t);
                }
            }
            _ => {
                let ok = s.release_column(t, c).is_ok();
                if let ClaimState::Partitioned(mut columns) = current {
                    assert_eq!(ok, columns.clear(c).is_some());
                    if columns.is_empty() {
                        model.remove(&t);
                    } else {
                        model.insert(t, ClaimState::Partitioned(columns));
                    }
                } else {
                    assert!(!ok);
                }
            }
        }
        assert_eq!(s.claim_at(t).unwrap(), model.get(&t).cloned().unwrap_or_default());
    }
}
