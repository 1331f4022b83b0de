//! Focus cursor.
//!
//! The cursor is the keyboard-highlighted option. It always names a member of
//! the current matched ids, or nothing.

/// Cursor movement requested by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Move down, wrapping from the last id to the first.
    Next,
    /// Move up, wrapping from the first id to the last.
    Previous,
    /// Jump to the first id.
    First,
    /// Jump to the last id.
    Last,
}

/// Move the cursor over `matched_ids`.
///
/// With no current position (or one that is not matched), `Next` lands on
/// the first id and `Previous` on the last. An empty list always yields
/// `None`.
pub fn advance<S: AsRef<str>>(
    direction: Direction,
    matched_ids: &[S],
    current: Option<&str>,
) -> Option<String> {
    let count = matched_ids.len();
    if count == 0 {
        return None;
    }

    let position = current.and_then(|id| matched_ids.iter().position(|m| m.as_ref() == id));
    let index = match (direction, position) {
        (Direction::First, _) | (Direction::Next, None) => 0,
        (Direction::Last, _) | (Direction::Previous, None) => count - 1,
        (Direction::Next, Some(index)) => (index + 1) % count,
        (Direction::Previous, Some(index)) => (index + count - 1) % count,
    };
    Some(matched_ids[index].as_ref().to_string())
}

/// Keep `current` only if it is still one of `matched_ids`.
///
/// A cursor whose option dropped out of the matched set is reset, not moved
/// to a neighbour.
pub fn revalidate<S: AsRef<str>>(matched_ids: &[S], current: Option<&str>) -> Option<String> {
    current
        .filter(|id| matched_ids.iter().any(|m| m.as_ref() == *id))
        .map(str::to_string)
}
