//! Numbered series

use std::collections::BTreeSet;

/// Returns the smallest positive number missing from `existing`.
///
/// Order and duplicates do not matter and zero is ignored: `[1, 2, 4, 5]`
/// gives `3`, `[1, 2, 3]` gives `4`, `[2, 3]` and `[]` give `1`.
///
/// ```
/// use backoffice_utils::next_sequence_number;
///
/// assert_eq!(next_sequence_number(&[4, 1, 2, 5, 2]), 3);
/// ```
pub fn next_sequence_number(existing: &[u32]) -> u32 {
	let sorted: BTreeSet<u32> = existing.iter().copied().filter(|&n| n > 0).collect();
	let mut expected = 1;
	for n in sorted {
		if n != expected {
			break;
		}
		expected += 1;
	}
	expected
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(&[1, 2, 4, 5], 3)]
	#[case(&[1, 2, 3], 4)]
	#[case(&[], 1)]
	#[case(&[2, 3], 1)]
	#[case(&[3, 1, 3, 2, 1], 4)]
	#[case(&[0, 1], 2)]
	#[case(&[1, 100], 2)]
	fn test_next_sequence_number(#[case] existing: &[u32], #[case] expected: u32) {
		assert_eq!(next_sequence_number(existing), expected);
	}
}

#[cfg(test)]
mod proptests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn prop_result_is_free_and_everything_below_is_taken(existing in prop::collection::vec(0u32..50, 0..40)) {
			let next = next_sequence_number(&existing);
			prop_assert!(next >= 1);
			prop_assert!(!existing.contains(&next));
			for n in 1..next {
				prop_assert!(existing.contains(&n));
			}
		}

		#[test]
		fn prop_order_does_not_matter(mut existing in prop::collection::vec(1u32..30, 0..20)) {
			let before = next_sequence_number(&existing);
			existing.reverse();
			prop_assert_eq!(next_sequence_number(&existing), before);
		}
	}
}
