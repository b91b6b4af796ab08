//! Search algorithms over record sequences
//!
//! The positional searches (binary, Fibonacci, interpolation) assume the input
//! is already ordered by the probed key and do not check it; on unordered
//! input their result is meaningless. They return a position into the
//! slice they were given. [`Ordered`](crate::app::ordering::Ordered) views
//! wrap them with the ordering guaranteed by type.
//!
//! The linear scans and filters work on any order, including a store with
//! holes, and are what free-text and range queries use.

use std::cmp::Ordering;

use crate::app::models::{Job, Student};
use crate::app::store::RecordStore;

/// Binary search
///
/// `probe` compares an item against the target: `Less` if the item sorts
/// before it, `Greater` if after.
pub fn binary_search_by<T, F>(items: &[T], mut probe: F) -> Option<usize>
where
    F: FnMut(&T) -> Ordering,
{
    let (mut low, mut high) = (0, items.len());
    while low < high {
        let mid = low + (high - low) / 2;
        match probe(&items[mid]) {
            Ordering::Equal => return Some(mid),
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
        }
    }
    None
}

/// Fibonacci search
///
/// Splits the interval at Fibonacci offsets instead of halving it. Same
/// contract as [`binary_search_by`].
pub fn fibonacci_search_by<T, F>(items: &[T], mut probe: F) -> Option<usize>
where
    F: FnMut(&T) -> Ordering,
{
    let len = items.len();
    if len == 0 {
        return None;
    }

    // Smallest Fibonacci number >= len, with its two predecessors
    let (mut fib2, mut fib1) = (0usize, 1usize);
    let mut fib = fib2 + fib1;
    while fib < len {
        fib2 = fib1;
        fib1 = fib;
        fib = fib2 + fib1;
    }

    // Everything before `start` is known to sort below the target
    let mut start = 0;
    while fib > 1 {
        let i = (start + fib2 - 1).min(len - 1);
        match probe(&items[i]) {
            Ordering::Less => {
                fib = fib1;
                fib1 = fib2;
                fib2 = fib - fib1;
                start = i + 1;
            }
            Ordering::Greater => {
                fib = fib2;
                fib1 -= fib2;
                fib2 = fib - fib1;
            }
            Ordering::Equal => return Some(i),
        }
    }

    if fib1 != 0 && start < len && probe(&items[start]) == Ordering::Equal {
        return Some(start);
    }
    None
}

/// Interpolation search over an ascending numeric key
///
/// Probes where `target` falls proportionally between the keys at the current
/// bounds. A single-element interval, or an interval whose bound keys are
/// equal, is checked directly so the estimate never divides by zero.
pub fn interpolation_search_by<T, F>(items: &[T], target: f64, key: F) -> Option<usize>
where
    F: Fn(&T) -> f64,
{
    if items.is_empty() || target.is_nan() {
        return None;
    }

    let (mut low, mut high) = (0, items.len() - 1);
    while low <= high {
        let low_key = key(&items[low]);
        let high_key = key(&items[high]);
        if target < low_key || target > high_key {
            return None;
        }

        if low == high || high_key == low_key {
            return (low_key == target).then_some(low);
        }

        let fraction = (target - low_key) / (high_key - low_key);
        let position = (low + (fraction * (high - low) as f64) as usize).min(high);
        let probed = key(&items[position]);

        if probed == target {
            return Some(position);
        } else if probed < target {
            low = position + 1;
        } else if position == 0 {
            return None;
        } else {
            high = position - 1;
        }
    }
    None
}

/// Position of the first item matching `predicate`
pub fn linear_search<T, P>(items: &[T], predicate: P) -> Option<usize>
where
    P: Fn(&T) -> bool,
{
    items.iter().position(predicate)
}

/// Positions of every item matching `predicate`
pub fn filter_positions<T, P>(items: &[T], predicate: P) -> Vec<usize>
where
    P: Fn(&T) -> bool,
{
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| predicate(item))
        .map(|(position, _)| position)
        .collect()
}

/// Case-insensitive substring test
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Students whose skills mention `skill`
pub fn students_with_skill<'a>(store: &'a RecordStore<Student>, skill: &str) -> Vec<&'a Student> {
    store
        .records()
        .filter(|student| contains_ignore_case(&student.skills, skill))
        .collect()
}

/// Students whose diploma is `diploma`, ignoring case
pub fn students_with_diploma<'a>(
    store: &'a RecordStore<Student>,
    diploma: &str,
) -> Vec<&'a Student> {
    let diploma = diploma.trim();
    store
        .records()
        .filter(|student| student.diploma.eq_ignore_ascii_case(diploma))
        .collect()
}

/// Students with `min <= gpa <= max`
pub fn students_in_gpa_range(store: &RecordStore<Student>, min: f32, max: f32) -> Vec<&Student> {
    store
        .records()
        .filter(|student| student.gpa >= min && student.gpa <= max)
        .collect()
}

/// Jobs whose title or company mentions `keyword`
pub fn jobs_matching<'a>(store: &'a RecordStore<Job>, keyword: &str) -> Vec<&'a Job> {
    store
        .records()
        .filter(|job| {
            contains_ignore_case(&job.title, keyword) || contains_ignore_case(&job.company, keyword)
        })
        .collect()
}

/// Jobs whose company mentions `company`
pub fn jobs_by_company<'a>(store: &'a RecordStore<Job>, company: &str) -> Vec<&'a Job> {
    store
        .records()
        .filter(|job| contains_ignore_case(&job.company, company))
        .collect()
}

/// First job whose title contains `title`
pub fn first_job_with_title<'a>(store: &'a RecordStore<Job>, title: &str) -> Option<&'a Job> {
    store.records().find(|job| job.title.contains(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_search_all_positions() {
        for len in 0..20 {
            let items: Vec<u32> = (0..len).map(|i| i * 2).collect();
            for (position, value) in items.iter().enumerate() {
                assert_eq!(binary_search_by(&items, |x| x.cmp(value)), Some(position));
            }
            assert_eq!(binary_search_by(&items, |x| x.cmp(&1)), None);
            assert_eq!(binary_search_by(&items, |x| x.cmp(&1000)), None);
        }
    }

    #[test]
    fn test_fibonacci_search_all_positions() {
        for len in 0..40 {
            let items: Vec<u32> = (0..len).map(|i| i * 3 + 1).collect();
            for (position, value) in items.iter().enumerate() {
                assert_eq!(
                    fibonacci_search_by(&items, |x| x.cmp(value)),
                    Some(position),
                    "len {} value {}",
                    len,
                    value
                );
            }
            assert_eq!(fibonacci_search_by(&items, |x| x.cmp(&0)), None);
            assert_eq!(fibonacci_search_by(&items, |x| x.cmp(&2)), None);
            assert_eq!(fibonacci_search_by(&items, |x| x.cmp(&10_000)), None);
        }
    }

    #[test]
    fn test_interpolation_single_element() {
        let items = [3.5f64];
        assert_eq!(interpolation_search_by(&items, 3.5, |x| *x), Some(0));
        assert_eq!(interpolation_search_by(&items, 3.6, |x| *x), None);
        assert_eq!(interpolation_search_by(&items, f64::NAN, |x| *x), None);
        assert_eq!(interpolation_search_by(&[] as &[f64], 1.0, |x| *x), None);
    }

    #[test]
    fn test_interpolation_flat_and_clustered_keys() {
        let flat = [2.0f64, 2.0, 2.0, 2.0];
        assert_eq!(interpolation_search_by(&flat, 2.0, |x| *x), Some(0));
        assert_eq!(interpolation_search_by(&flat, 2.5, |x| *x), None);

        let clustered = [0.0f64, 0.1, 0.2, 0.3, 4.0];
        for (position, value) in clustered.iter().enumerate() {
            assert_eq!(
                interpolation_search_by(&clustered, *value, |x| *x),
                Some(position)
            );
        }
        assert_eq!(interpolation_search_by(&clustered, 0.25, |x| *x), None);
    }

    #[test]
    fn test_linear_helpers() {
        let items = ["rust", "go", "python", "rust-async"];
        assert_eq!(linear_search(&items, |s| s.starts_with("py")), Some(2));
        assert_eq!(linear_search(&items, |s| s.is_empty()), None);
        assert_eq!(filter_positions(&items, |s| s.contains("rust")), vec![0, 3]);
        assert!(contains_ignore_case("Data Analysis, SQL", "sql"));
    }

    #[test]
    fn test_store_filters_skip_holes() {
        let mut students = RecordStore::new(5);
        students
            .append(Student::new("1", "A", "a@x.com", 3.5, "IT", "Rust, SQL"))
            .unwrap();
        students
            .append(Student::new("2", "B", "b@x.com", 2.9, "Biz", "Excel"))
            .unwrap();
        students
            .append(Student::new("3", "C", "c@x.com", 3.9, "IT", "sql, Python"))
            .unwrap();
        students.remove_at(0).unwrap();

        let ids: Vec<_> = students_with_skill(&students, "SQL")
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3"]);

        assert_eq!(students_with_diploma(&students, "it").len(), 1);
        assert_eq!(students_with_diploma(&students, " Biz ")[0].id, "2");
        assert!(students_with_diploma(&students, "I").is_empty());

        let in_range = students_in_gpa_range(&students, 2.9, 3.5);
        assert_eq!(in_range.len(), 1);
        assert_eq!(in_range[0].id, "2");

        let mut jobs = RecordStore::new(5);
        jobs.append(Job::new("J1", "Data Intern", "Acme", "2025-01-01", "SQL"))
            .unwrap();
        jobs.append(Job::new("J2", "Web Intern", "DataCorp", "2025-02-01", "JS"))
            .unwrap();
        assert_eq!(jobs_matching(&jobs, "data").len(), 2);
        assert_eq!(jobs_by_company(&jobs, "acme").len(), 1);
        assert_eq!(first_job_with_title(&jobs, "Web").unwrap().id, "J2");
        assert!(first_job_with_title(&jobs, "web").is_none());
    }
}
