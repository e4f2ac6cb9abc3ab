//! Keyframe id allocation.

/// Next free numeric keyframe id: one more than the largest numeric id in
/// `ids`. Non-numeric ids are ignored. Returns `"1"` when there are none.
pub fn next_keyframe_id<'a>(ids: impl IntoIterator<Item = &'a str>) -> String {
    let max = ids
        .into_iter()
        .filter_map(|id| id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    // Widened so the largest u64 id still gets a distinct successor.
    (u128::from(max) + 1).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_more_than_largest() {
        assert_eq!(next_keyframe_id(["1", "54", "32"]), "55");
    }

    #[test]
    fn non_numeric_ids_are_ignored() {
        assert_eq!(next_keyframe_id(["1", "abc", "54", "123-2-3", "32"]), "55");
    }

    #[test]
    fn empty_starts_at_one() {
        assert_eq!(next_keyframe_id(std::iter::empty()), "1");
        assert_eq!(next_keyframe_id(["x"]), "1");
    }

    #[test]
    fn largest_u64_id_does_not_overflow() {
        assert_eq!(next_keyframe_id(["3", "18446744073709551615"]), "18446744073709551616");
    }
}
