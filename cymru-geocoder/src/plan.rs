//! Batch grouping.

use std::ops::Range;

/// Splits `total` items into consecutive groups of at most `limit`.
///
/// Every group except the last has exactly `limit` items. A `limit` of zero
/// is treated as one.
pub fn group_ranges(total: usize, limit: usize) -> Vec<Range<usize>> {
    let limit = limit.max(1);
    (0..total)
        .step_by(limit)
        .map(|start| start..(start + limit).min(total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn sizes(total: usize, limit: usize) -> Vec<usize> {
        group_ranges(total, limit).iter().map(|r| r.len()).collect()
    }

    #[test_case(25, 10, vec![10, 10, 5] ; "twenty five by ten")]
    #[test_case(20, 10, vec![10, 10] ; "exact multiple")]
    #[test_case(3, 10, vec![3] ; "single short group")]
    #[test_case(0, 10, vec![] ; "nothing to fetch")]
    #[test_case(4, 0, vec![1, 1, 1, 1] ; "zero limit clamped")]
    fn test_group_sizes(total: usize, limit: usize, expected: Vec<usize>) {
        assert_eq!(sizes(total, limit), expected);
    }

    proptest! {
        #[test]
        fn prop_groups_cover_input_in_order(total in 0usize..500, limit in 0usize..40) {
            let ranges = group_ranges(total, limit);
            let mut next = 0;
            for range in &ranges {
                prop_assert_eq!(range.start, next);
                prop_assert!(range.len() <= limit.max(1));
                prop_assert!(!range.is_empty());
                next = range.end;
            }
            prop_assert_eq!(next, total);
        }

        #[test]
        fn prop_only_last_group_is_short(total in 1usize..500, limit in 1usize..40) {
            let ranges = group_ranges(total, limit);
            for range in &ranges[..ranges.len() - 1] {
                prop_assert_eq!(range.len(), limit);
            }
            prop_assert_eq!(ranges.len(), total.div_ceil(limit));
        }
    }
}
