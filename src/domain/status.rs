use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Requirement;

/// The derived completion status of a requirement.
///
/// Never stored; always computed from the checklist and grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// No checklist item done (or no checklist at all).
    NotStarted,
    /// Some, but not all, checklist items done.
    OnGoing,
    /// Every checklist item done.
    Done,
    /// Graded.
    Nilai,
}

impl Status {
    /// Every status, in display order.
    pub const ALL: [Self; 4] = [Self::NotStarted, Self::OnGoing, Self::Done, Self::Nilai];

    /// Localised label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Belum Mulai",
            Self::OnGoing => "Sedang Berjalan",
            Self::Done => "Selesai",
            Self::Nilai => "Sudah Dinilai",
        }
    }

    /// Emoji icon.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::NotStarted => "⬜",
            Self::OnGoing => "🟡",
            Self::Done => "🟢",
            Self::Nilai => "⭐",
        }
    }

    /// Hex colour used when rendering the status in exported tables.
    #[must_use]
    pub const fn colour(self) -> &'static str {
        match self {
            Self::NotStarted => "#94a3b8",
            Self::OnGoing => "#eab308",
            Self::Done => "#10b981",
            Self::Nilai => "#f59e0b",
        }
    }

    /// Whether the requirement counts as completed (done or graded).
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Done | Self::Nilai)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derives a requirement's status. The first matching rule wins:
///
/// 1. a non-empty grade → [`Status::Nilai`]
/// 2. an empty checklist → [`Status::NotStarted`]
/// 3. every item done → [`Status::Done`]
/// 4. at least one item done → [`Status::OnGoing`]
/// 5. otherwise → [`Status::NotStarted`]
#[must_use]
pub fn derive_status(requirement: &Requirement) -> Status {
    if requirement.grade().is_some() {
        return Status::Nilai;
    }

    let checklist = &requirement.checklist;
    if checklist.is_empty() {
        Status::NotStarted
    } else if checklist.iter().all(|item| item.done) {
        Status::Done
    } else if checklist.iter().any(|item| item.done) {
        Status::OnGoing
    } else {
        Status::NotStarted
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{RequirementDraft, RequirementType};

    fn requirement(done: &[bool], grade: Option<&str>) -> Requirement {
        let draft = done.iter().fold(
            RequirementDraft::new("Scaling", RequirementType::NonPasien),
            |draft, _| draft.with_item("step"),
        );
        let now = Utc::now();
        let mut requirement = Requirement::from_draft(draft, now);
        for (item, &done) in requirement.checklist.iter_mut().zip(done) {
            if done {
                item.toggle(now);
            }
        }
        requirement.grade = grade.map(str::to_string);
        requirement
    }

    #[test]
    fn empty_checklist_without_grade_is_not_started() {
        assert_eq!(derive_status(&requirement(&[], None)), Status::NotStarted);
    }

    #[test]
    fn nothing_done_is_not_started() {
        assert_eq!(
            derive_status(&requirement(&[false, false], None)),
            Status::NotStarted
        );
    }

    #[test]
    fn partially_done_is_on_going() {
        assert_eq!(
            derive_status(&requirement(&[true, false, false], None)),
            Status::OnGoing
        );
        assert_eq!(
            derive_status(&requirement(&[false, true], None)),
            Status::OnGoing
        );
    }

    #[test]
    fn all_done_is_done() {
        assert_eq!(derive_status(&requirement(&[true], None)), Status::Done);
        assert_eq!(
            derive_status(&requirement(&[true, true, true], None)),
            Status::Done
        );
    }

    #[test]
    fn grade_overrides_checklist() {
        for done in [&[][..], &[false][..], &[true, false][..], &[true, true][..]] {
            assert_eq!(derive_status(&requirement(done, Some("A"))), Status::Nilai);
        }
    }

    #[test]
    fn empty_grade_is_ignored() {
        assert_eq!(derive_status(&requirement(&[true], Some(""))), Status::Done);
    }

    #[test]
    fn labels_and_icons() {
        assert_eq!(Status::NotStarted.label(), "Belum Mulai");
        assert_eq!(Status::OnGoing.icon(), "🟡");
        assert_eq!(Status::Nilai.to_string(), "Sudah Dinilai");
        assert!(Status::Done.is_completed());
        assert!(!Status::OnGoing.is_completed());
    }

    #[test]
    fn serialises_as_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&Status::OnGoing).unwrap(),
            "\"ON_GOING\""
        );
    }
}
