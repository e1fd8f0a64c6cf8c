//! Overlap detection between expanded windows.

use crate::expand::ExpandedWindow;

/// The first conflicting pair found between two expansions.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub existing: ExpandedWindow,
    pub candidate: ExpandedWindow,
}

/// Scans two sets of expanded windows for overlap and returns the first
/// conflicting pair, if any.
///
/// Only windows with identical timezone identifiers are compared; a
/// cross-timezone collision is deliberately out of scope. Windows are
/// half-open `[start, end)`, so touching endpoints do not conflict.
pub fn find_conflict(
    existing: &[ExpandedWindow],
    candidate: &[ExpandedWindow],
) -> Option<Conflict> {
    for existing_window in existing {
        for candidate_window in candidate {
            if existing_window.tz != candidate_window.tz {
                continue;
            }

            let overlaps = candidate_window.start < existing_window.end
                && existing_window.start < candidate_window.end;
            if overlaps {
                return Some(Conflict {
                    existing: existing_window.clone(),
                    candidate: candidate_window.clone(),
                });
            }
        }
    }

    None
}
