//! Integration tests for the record store, identifier index and ordering
//!
//! These tests exercise the catalog the way the command handlers do: load a
//! batch of records, mutate it, then look records up by hash, binary and
//! Fibonacci search and check the index never drifts from the store.

use std::collections::HashSet;

use internship_tracker::app::*;
use internship_tracker::errors::{IndexError, StoreError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SCENARIO: &str = "A|1001|a@x.com|3.5|IT|skills
B|1002|b@x.com|2.9|Biz|skills
C|1003|c@x.com|3.9|IT|skills
";

fn student(id: &str, gpa: f32) -> Student {
    Student::new(id, format!("Student {}", id), format!("{}@x.com", id), gpa, "IT", "rust")
}

fn random_ids(rng: &mut StdRng, count: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    while seen.len() < count {
        seen.insert(format!("{}", rng.gen_range(1_000_000u32..9_999_999)));
    }
    let mut ids: Vec<String> = seen.into_iter().collect();
    ids.sort();
    ids.shuffle(rng);
    ids
}

#[test]
fn test_load_then_hash_and_binary_lookup() {
    let mut students = Catalog::<Student>::with_capacity(100).unwrap();
    let report = students.load_str(SCENARIO, 0).unwrap();
    assert_eq!(report.loaded(), 3);
    assert!(report.is_clean());

    let found = students.get("1002").unwrap();
    assert_eq!(found.diploma, "Biz");
    assert_eq!(found.gpa, 2.9);

    let by_id = students.sorted::<ById>().unwrap();
    let found = by_id.find("1003").unwrap();
    assert_eq!(found.diploma, "IT");
    assert_eq!(found.gpa, 3.9);
    assert!(by_id.find("1004").is_none());
}

#[test]
fn test_malformed_line_is_skipped() {
    let text = "A|1001|a@x.com|3.5|IT|skills
B|1002|b@x.com|2.9
C|1003|c@x.com|3.9|IT|skills
";
    let mut students = Catalog::<Student>::with_capacity(100).unwrap();
    let report = students.load_str(text, 0).unwrap();

    assert_eq!(report.loaded(), 2);
    assert_eq!(report.stats.malformed, 1);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].line, 2);
    assert!(!students.contains("1002"));
    assert_eq!(students.len(), 2);
}

#[test]
fn test_sort_then_search_matches_hash_lookup() {
    let mut rng = StdRng::seed_from_u64(7);

    for algorithm in [
        SortAlgorithm::Selection,
        SortAlgorithm::Bubble,
        SortAlgorithm::Insertion,
        SortAlgorithm::Merge,
    ] {
        let ids = random_ids(&mut rng, 60);
        let (present, absent) = ids.split_at(45);

        let mut students = Catalog::<Student>::with_capacity(100).unwrap();
        for id in present {
            students
                .insert(student(id, rng.gen_range(0..=400) as f32 / 100.0))
                .unwrap();
        }

        let hashed: Vec<Option<Student>> = ids
            .iter()
            .map(|id| students.get(id).cloned())
            .collect();

        let view = students.sorted_with::<ById>(algorithm).unwrap();
        for (id, expected) in ids.iter().zip(&hashed) {
            assert_eq!(view.find(id), expected.as_ref(), "binary search for {}", id);

            let fibonacci = view.fibonacci_search(id).and_then(|p| view.get(p));
            assert_eq!(fibonacci, expected.as_ref(), "fibonacci search for {}", id);
        }
        for id in absent {
            assert!(view.binary_search(id).is_none());
        }
    }
}

#[test]
fn test_index_consistent_after_random_mutations() {
    let mut rng = StdRng::seed_from_u64(42);
    let ids = random_ids(&mut rng, 200);
    let mut students = Catalog::<Student>::with_capacity(80).unwrap();
    let mut live: Vec<String> = Vec::new();

    for step in 0..600 {
        match rng.gen_range(0..10) {
            0..=5 => {
                let id = &ids[rng.gen_range(0..ids.len())];
                let result = students.insert(student(id, 3.0));
                match result {
                    Ok(_) => live.push(id.clone()),
                    Err(StoreError::DuplicateIdentifier { .. }) => assert!(live.contains(id)),
                    Err(StoreError::CapacityExceeded { capacity }) => {
                        assert_eq!(capacity, 80);
                        assert_eq!(live.len(), 80);
                    }
                    Err(e) => panic!("unexpected error at step {}: {}", step, e),
                }
            }
            6..=8 if !live.is_empty() => {
                let id = live.swap_remove(rng.gen_range(0..live.len()));
                assert_eq!(students.remove(&id).unwrap().id, id);
            }
            _ => {
                students.compact().unwrap();
                assert_eq!(students.store().holes(), 0);
            }
        }

        assert!(students.verify().is_empty(), "inconsistent at step {}", step);
    }

    let size = IdentifierIndex::recommended_size(students.len(), 16);
    let rebuilt = IdentifierIndex::build(students.store(), size).unwrap();
    for id in &ids {
        let expected = live.contains(id);
        assert_eq!(students.contains(id), expected, "catalog lookup of {}", id);
        assert_eq!(rebuilt.search(id).is_some(), expected, "rebuilt lookup of {}", id);
    }
    assert_eq!(students.len(), live.len());
}

#[test]
fn test_capacity_boundary() {
    let mut jobs = Catalog::<Job>::with_capacity(5).unwrap();
    for i in 0..5 {
        jobs.insert(Job::new(format!("J{}", i), "Intern", "Acme", "2025-06-30", ""))
            .unwrap();
    }

    let refused = jobs.insert(Job::new("J5", "Intern", "Acme", "2025-06-30", ""));
    assert_eq!(refused, Err(StoreError::CapacityExceeded { capacity: 5 }));
    assert_eq!(jobs.len(), 5);
    assert!(!jobs.contains("J5"));
}

#[test]
fn test_table_full_on_size_plus_one() {
    let size = 10;
    let mut index = IdentifierIndex::new(size).unwrap();
    for i in 0..size {
        index.insert(&format!("{}", 1000 + i), i).unwrap();
    }
    assert_eq!(
        index.insert("2000", size),
        Err(IndexError::TableFull { size })
    );

    // a fixed-size catalog surfaces the same failure and keeps no trace of the record
    let policy = IndexPolicy {
        initial_size: size,
        auto_grow: false,
        ..IndexPolicy::default()
    };
    let mut students = Catalog::<Student>::new(20, policy).unwrap();
    for i in 0..size {
        students.insert(student(&format!("{}", 1000 + i), 3.0)).unwrap();
    }
    let result = students.insert(student("2000", 3.0));
    assert_eq!(
        result,
        Err(StoreError::Index(IndexError::TableFull { size }))
    );
    assert_eq!(students.len(), size);
    assert!(!students.contains("2000"));
}

#[test]
fn test_index_grows_with_default_policy() {
    let mut students = Catalog::<Student>::with_capacity(100).unwrap();
    for i in 0..100 {
        students.insert(student(&format!("{}", 5000 + i), 2.0)).unwrap();
    }

    let stats = students.stats();
    assert_eq!(stats.store.count, 100);
    assert!(stats.index.size >= 100);
    assert!(stats.index.load_factor <= IndexPolicy::default().max_load_factor);
    assert!(students.verify().is_empty());
}

#[test]
fn test_interpolation_search_single_element() {
    let mut students = Catalog::<Student>::with_capacity(10).unwrap();
    students.insert(student("1001", 3.25)).unwrap();

    let view = students.sorted::<ByGpaAscending>().unwrap();
    assert_eq!(view.interpolation_search(3.25), Some(0));
    assert_eq!(view.interpolation_search(3.0), None);
    assert_eq!(view.interpolation_search(3.5), None);
}

#[test]
fn test_interpolation_search_over_sorted_gpas() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut students = Catalog::<Student>::with_capacity(100).unwrap();
    let mut gpas = HashSet::new();
    for i in 0..50 {
        let hundredths = rng.gen_range(0..=400u32);
        if gpas.insert(hundredths) {
            students
                .insert(student(&format!("{}", 7000 + i), hundredths as f32 / 100.0))
                .unwrap();
        }
    }

    let view = students.sorted::<ByGpaAscending>().unwrap();
    for hundredths in 0..=400u32 {
        let gpa = hundredths as f32 / 100.0;
        let found = view.interpolation_search(gpa).and_then(|p| view.get(p));
        assert_eq!(found.is_some(), gpas.contains(&hundredths), "gpa {}", gpa);
        if let Some(found) = found {
            assert_eq!(found.gpa, gpa);
        }
    }
}

#[test]
fn test_sorted_order_persists_and_lookups_follow() {
    let mut jobs = Catalog::<Job>::with_capacity(10).unwrap();
    jobs.insert(Job::new("J3", "Zeta", "Umbrella", "2025-09-01", ""))
        .unwrap();
    jobs.insert(Job::new("J1", "Alpha", "Acme", "2025-07-01", ""))
        .unwrap();
    jobs.insert(Job::new("J2", "Mid", "Initech", "2025-05-01", ""))
        .unwrap();

    let deadlines: Vec<&str> = jobs
        .sorted::<ByDeadline>()
        .unwrap()
        .iter()
        .map(|job| job.id.as_str())
        .collect();
    assert_eq!(deadlines, ["J2", "J1", "J3"]);

    let stored: Vec<&str> = jobs.records().map(|job| job.id.as_str()).collect();
    assert_eq!(stored, ["J2", "J1", "J3"]);
    assert_eq!(jobs.position_of("J3"), Some(2));
    assert!(jobs.verify().is_empty());
}
