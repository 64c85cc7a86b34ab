//! In-memory status map and change detection

use crate::models::{Homework, HomeworkStatus, StatusChange};
use std::collections::HashMap;

/// What to do with an assignment id that has never been seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewHomeworkPolicy {
    /// Treat the first sighting as a change
    #[default]
    Notify,
    /// Remember the status silently
    Record,
}

/// Last seen status per assignment id. Lost on restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMap {
    statuses: HashMap<String, HomeworkStatus>,
}

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<HomeworkStatus> {
        self.statuses.get(id).copied()
    }

    pub fn insert(&mut self, id: impl Into<String>, status: HomeworkStatus) -> Option<HomeworkStatus> {
        self.statuses.insert(id.into(), status)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Record every status in `homeworks`, later entries winning
    pub fn apply(&mut self, homeworks: &[Homework]) {
        for hw in homeworks {
            self.statuses.insert(hw.id.clone(), hw.status);
        }
    }
}

impl FromIterator<(String, HomeworkStatus)> for StatusMap {
    fn from_iter<I: IntoIterator<Item = (String, HomeworkStatus)>>(iter: I) -> Self {
        Self {
            statuses: iter.into_iter().collect(),
        }
    }
}

/// Pure change detection.
///
/// Records are compared in order against `previous` overlaid with the earlier
/// records of the same batch, so a duplicate record is reported once and a
/// record that flips twice in one batch is reported twice.
pub fn diff(
    previous: &StatusMap,
    current: &[Homework],
    policy: NewHomeworkPolicy,
) -> Vec<StatusChange> {
    let mut seen: HashMap<&str, HomeworkStatus> = HashMap::new();
    let mut changes = Vec::new();

    for hw in current {
        let last = seen
            .get(hw.id.as_str())
            .copied()
            .or_else(|| previous.get(&hw.id));

        let changed = match last {
            Some(status) => status != hw.status,
            None => policy == NewHomeworkPolicy::Notify,
        };

        if changed {
            changes.push(StatusChange {
                homework: hw.clone(),
                previous: last,
            });
        }
        seen.insert(hw.id.as_str(), hw.status);
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, HomeworkStatus)]) -> StatusMap {
        entries
            .iter()
            .map(|(id, status)| (id.to_string(), *status))
            .collect()
    }

    fn hw(id: &str, status: HomeworkStatus) -> Homework {
        Homework::new(id, format!("{id}.zip"), status)
    }

    #[test]
    fn test_known_id_with_new_status_is_change() {
        let previous = map(&[("A", HomeworkStatus::Reviewing)]);
        let changes = diff(
            &previous,
            &[hw("A", HomeworkStatus::Approved)],
            NewHomeworkPolicy::Notify,
        );

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].homework.id, "A");
        assert_eq!(changes[0].previous, Some(HomeworkStatus::Reviewing));
        assert!(!changes[0].is_first_sighting());
    }

    #[test]
    fn test_unchanged_status_is_not_change() {
        let previous = map(&[("A", HomeworkStatus::Approved)]);
        for policy in [NewHomeworkPolicy::Notify, NewHomeworkPolicy::Record] {
            let changes = diff(&previous, &[hw("A", HomeworkStatus::Approved)], policy);
            assert!(changes.is_empty());
        }
    }

    #[test]
    fn test_new_id_follows_policy() {
        let previous = StatusMap::new();
        let current = [hw("B", HomeworkStatus::Reviewing)];

        let notify = diff(&previous, &current, NewHomeworkPolicy::Notify);
        assert_eq!(notify.len(), 1);
        assert!(notify[0].is_first_sighting());

        let record = diff(&previous, &current, NewHomeworkPolicy::Record);
        assert!(record.is_empty());
    }

    #[test]
    fn test_duplicates_in_batch_reported_once() {
        let previous = map(&[("A", HomeworkStatus::Reviewing)]);
        let current = [
            hw("A", HomeworkStatus::Approved),
            hw("A", HomeworkStatus::Approved),
        ];
        let changes = diff(&previous, &current, NewHomeworkPolicy::Notify);
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_flip_within_batch_reported_twice() {
        let previous = map(&[("A", HomeworkStatus::Reviewing)]);
        let current = [
            hw("A", HomeworkStatus::Rejected),
            hw("A", HomeworkStatus::Reviewing),
        ];
        let changes = diff(&previous, &current, NewHomeworkPolicy::Record);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1].previous, Some(HomeworkStatus::Rejected));
    }

    #[test]
    fn test_diff_does_not_touch_previous() {
        let previous = map(&[("A", HomeworkStatus::Reviewing)]);
        let snapshot = previous.clone();
        let _ = diff(
            &previous,
            &[hw("A", HomeworkStatus::Approved), hw("C", HomeworkStatus::Rejected)],
            NewHomeworkPolicy::Notify,
        );
        assert_eq!(previous, snapshot);
    }

    #[test]
    fn test_apply_last_entry_wins() {
        let mut state = map(&[("A", HomeworkStatus::Reviewing)]);
        state.apply(&[
            hw("A", HomeworkStatus::Rejected),
            hw("B", HomeworkStatus::Reviewing),
            hw("A", HomeworkStatus::Approved),
        ]);
        assert_eq!(state.len(), 2);
        assert_eq!(state.get("A"), Some(HomeworkStatus::Approved));
        assert_eq!(state.get("B"), Some(HomeworkStatus::Reviewing));
    }
}
