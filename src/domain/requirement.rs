use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::status::{Status, derive_status};

/// One sub-step of a requirement.
///
/// `completed_at` is set if and only if `done` is true. Only
/// [`ChecklistItem::toggle`] flips `done`, so the two never drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    /// Globally unique identifier.
    pub id: String,
    /// Description of the step.
    pub text: String,
    /// Whether the step has been completed.
    pub done: bool,
    /// When the step was completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ChecklistItem {
    /// Creates a new, not yet completed, item with a fresh id.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            done: false,
            completed_at: None,
        }
    }

    /// Flips `done`, stamping or clearing `completed_at` to match.
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.done = !self.done;
        self.completed_at = self.done.then_some(now);
    }
}

/// Patient gender as recorded on the clinic form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Laki-laki
    L,
    /// Perempuan
    P,
}

/// Patient details attached to a [`RequirementType::Pasien`] requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInfo {
    /// Medical record code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rm_code: Option<String>,
    /// Age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Gender, `L` or `P`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Clinical notes about the patient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Whether a requirement is performed on a patient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementType {
    /// Performed on a patient.
    Pasien,
    /// Not patient-bound (presentations, reports, ...).
    #[default]
    NonPasien,
}

impl RequirementType {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pasien => "Pasien",
            Self::NonPasien => "Non-Pasien",
        }
    }
}

impl fmt::Display for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single clinical task a student must complete within a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    /// Globally unique identifier.
    pub id: String,
    /// Display name, e.g. "Scaling".
    pub name: String,
    /// Patient or non-patient requirement.
    #[serde(rename = "type")]
    pub kind: RequirementType,
    /// Ordered sub-steps.
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
    /// Final evaluation (free text). A non-empty grade overrides the
    /// checklist-derived status.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "nilai")]
    pub grade: Option<String>,
    /// Patient details, for patient requirements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientInfo>,
    /// When the requirement was added.
    pub created_at: DateTime<Utc>,
    /// Refreshed by every field or checklist mutation.
    pub updated_at: DateTime<Utc>,
}

impl Requirement {
    /// Builds a requirement from a draft, with a fresh id and both timestamps
    /// set to `now`.
    #[must_use]
    pub fn from_draft(draft: RequirementDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: draft.name,
            kind: draft.kind,
            checklist: draft.checklist,
            notes: draft.notes,
            grade: None,
            patient: draft.patient,
            created_at: now,
            updated_at: now,
        }
    }

    /// The derived status. See [`derive_status`].
    #[must_use]
    pub fn status(&self) -> Status {
        derive_status(self)
    }

    /// Returns the grade, treating an empty string as absent.
    #[must_use]
    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref().filter(|grade| !grade.is_empty())
    }

    /// Number of completed checklist items.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.checklist.iter().filter(|item| item.done).count()
    }

    /// Completed checklist items as a whole-number percentage (0 when the
    /// checklist is empty).
    #[must_use]
    pub fn checklist_percentage(&self) -> u32 {
        let total = self.checklist.len();
        if total == 0 {
            return 0;
        }
        let completed = self.completed_count();
        // round half up
        u32::try_from((completed * 200 + total) / (total * 2)).unwrap_or(100)
    }

    /// The most recent checklist completion, if any item is done.
    #[must_use]
    pub fn last_completed_at(&self) -> Option<DateTime<Utc>> {
        self.checklist.iter().filter_map(|item| item.completed_at).max()
    }

    /// Looks up a checklist item by id.
    #[must_use]
    pub fn checklist_item(&self, id: &str) -> Option<&ChecklistItem> {
        self.checklist.iter().find(|item| item.id == id)
    }

    pub(crate) fn checklist_item_mut(&mut self, id: &str) -> Option<&mut ChecklistItem> {
        self.checklist.iter_mut().find(|item| item.id == id)
    }

    /// Merges every field present in `update` into this requirement.
    ///
    /// Does not touch `updated_at`; the caller stamps it.
    pub fn apply(&mut self, update: RequirementUpdate) {
        let RequirementUpdate {
            name,
            kind,
            checklist,
            notes,
            grade,
            patient,
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(checklist) = checklist {
            self.checklist = checklist;
        }
        if let Some(notes) = notes {
            self.notes = notes;
        }
        if let Some(grade) = grade {
            self.grade = Some(grade);
        }
        if let Some(patient) = patient {
            self.patient = Some(patient);
        }
    }
}

/// The user-supplied fields of a new requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementDraft {
    /// Display name.
    pub name: String,
    /// Patient or non-patient requirement.
    pub kind: RequirementType,
    /// Initial checklist, possibly empty.
    pub checklist: Vec<ChecklistItem>,
    /// Free-text notes.
    pub notes: String,
    /// Patient details, for patient requirements.
    pub patient: Option<PatientInfo>,
}

impl RequirementDraft {
    /// A draft with the given name and type, no checklist and empty notes.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: RequirementType) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Appends a fresh checklist item to the draft.
    #[must_use]
    pub fn with_item(mut self, text: impl Into<String>) -> Self {
        self.checklist.push(ChecklistItem::new(text));
        self
    }
}

/// A partial update to a requirement. `None` fields are left unchanged.
///
/// A grade or patient cannot be cleared through an
/// update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New requirement type.
    pub kind: Option<RequirementType>,
    /// Replacement checklist.
    pub checklist: Option<Vec<ChecklistItem>>,
    /// New notes.
    pub notes: Option<String>,
    /// New grade.
    pub grade: Option<String>,
    /// New patient details.
    pub patient: Option<PatientInfo>,
}
