//! Sorted-array helpers.
//!
//! Binary-search insertion used to keep small lists ordered without a full
//! re-sort. Both functions take an explicit comparator so callers can order
//! by any key.

use std::cmp::Ordering;

/// Returns the index of the first element that does not compare `Less` than
/// `value`.
///
/// Equal elements are skipped over from the right, so the returned position
/// is before every element equivalent to `value`. The comparator is never
/// called for an empty slice.
pub fn lower_bound<T, F>(slice: &[T], value: &T, mut cmp: F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut min = 0;
    let mut max = slice.len();
    while min < max {
        let mid = min + (max - min) / 2;
        if cmp(&slice[mid], value) == Ordering::Less {
            min = mid + 1;
        } else {
            max = mid;
        }
    }
    min
}

/// Inserts `value` into the sorted `vec`, keeping it sorted, and returns the
/// position it was inserted at.
///
/// # Examples
///
/// ```
/// use eos_shell_core::utils::sorted::insert_sorted;
///
/// let mut modes = vec!["gdm".to_string(), "user".to_string()];
/// let pos = insert_sorted(&mut modes, "initial-setup".to_string(), |a, b| a.cmp(b));
/// assert_eq!(pos, 1);
/// assert_eq!(modes, ["gdm", "initial-setup", "user"]);
/// ```
pub fn insert_sorted<T, F>(vec: &mut Vec<T>, value: T, cmp: F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    let pos = lower_bound(vec, &value, cmp);
    vec.insert(pos, value);
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(&[], 5, 0)]
    #[case(&[1, 3, 5, 7], 0, 0)]
    #[case(&[1, 3, 5, 7], 4, 2)]
    #[case(&[1, 3, 5, 7], 5, 2)]
    #[case(&[1, 3, 5, 7], 9, 4)]
    #[case(&[2, 2, 2], 2, 0)]
    fn test_lower_bound(#[case] input: &[i32], #[case] value: i32, #[case] expected: usize) {
        assert_eq!(lower_bound(input, &value, |a, b| a.cmp(b)), expected);
    }

    #[test]
    fn test_lower_bound_empty_never_calls_comparator() {
        let empty: Vec<i32> = Vec::new();
        let mut calls = 0;
        let pos = lower_bound(&empty, &1, |a, b| {
            calls += 1;
            a.cmp(b)
        });
        assert_eq!(pos, 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_insert_sorted_places_before_equivalents() {
        // Order by the first tuple field only; the second tags insertion order.
        let mut items = vec![(1, 'a'), (2, 'b'), (2, 'c'), (3, 'd')];
        let pos = insert_sorted(&mut items, (2, 'z'), |a, b| a.0.cmp(&b.0));
        assert_eq!(pos, 1);
        assert_eq!(items, vec![(1, 'a'), (2, 'z'), (2, 'b'), (2, 'c'), (3, 'd')]);
    }

    #[test]
    fn test_insert_sorted_builds_sorted_list() {
        let mut items = Vec::new();
        for value in [5, 1, 4, 2, 3] {
            insert_sorted(&mut items, value, |a, b| a.cmp(b));
        }
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }
}
