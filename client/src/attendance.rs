use serde::{Deserialize, Serialize};

/// Attendance mark as the UI cycles it. `Unmarked` is the absence of a
/// record server-side; sending it in a patch deletes the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Unmarked,
    Present,
    Absent,
}

/// Advances a mark one step along the tap cycle:
/// unmarked -> present -> absent -> unmarked.
pub fn next_mark(current: Mark) -> Mark {
    match current {
        Mark::Unmarked => Mark::Present,
        Mark::Present => Mark::Absent,
        Mark::Absent => Mark::Unmarked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_returns_to_unmarked_after_three_taps() {
        let mut mark = Mark::Unmarked;
        mark = next_mark(mark);
        assert_eq!(mark, Mark::Present);
        mark = next_mark(mark);
        assert_eq!(mark, Mark::Absent);
        mark = next_mark(mark);
        assert_eq!(mark, Mark::Unmarked);
    }
}
