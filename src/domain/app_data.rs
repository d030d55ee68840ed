// The root aggregate and its singleton companions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Department, Requirement};

/// The student using the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Full name.
    pub name: String,
    /// University or faculty.
    pub university: String,
    /// Cohort year.
    pub angkatan: String,
    /// Rotation period.
    pub periode: String,
    /// When the profile was first set up.
    pub created_at: DateTime<Utc>,
}

/// One line of the activity history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    /// Globally unique identifier.
    pub id: String,
    /// Department the action happened in.
    pub department_id: String,
    /// Requirement the action touched.
    pub requirement_id: String,
    /// Human-readable description of the action.
    pub action: String,
    /// When the action happened.
    pub timestamp: DateTime<Utc>,
}

impl ActivityLogEntry {
    /// A new entry with a fresh id.
    #[must_use]
    pub fn new(
        department_id: &str,
        requirement_id: &str,
        action: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            department_id: department_id.to_string(),
            requirement_id: requirement_id.to_string(),
            action,
            timestamp,
        }
    }
}

/// User preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Use the dark colour scheme.
    pub dark_mode: bool,
    /// The onboarding flow has been completed.
    pub has_onboarded: bool,
}

/// The whole persisted data graph.
///
/// This is the single unit of persistence; there is no partial save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    /// Absent until the student completes setup.
    pub profile: Option<UserProfile>,
    /// The fixed department catalogue and its requirements.
    pub departments: Vec<Department>,
    /// Newest first.
    pub activity_log: Vec<ActivityLogEntry>,
    /// User preferences.
    pub settings: AppSettings,
}

impl Default for AppData {
    /// No profile, the ten seeded departments, an empty log and default
    /// settings.
    fn default() -> Self {
        Self {
            profile: None,
            departments: Department::seed(),
            activity_log: Vec::new(),
            settings: AppSettings::default(),
        }
    }
}

impl AppData {
    /// Looks up a department by id.
    #[must_use]
    pub fn department(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub(crate) fn department_mut(&mut self, id: &str) -> Option<&mut Department> {
        self.departments.iter_mut().find(|d| d.id == id)
    }

    /// Looks up a requirement within a department.
    #[must_use]
    pub fn requirement(&self, department_id: &str, requirement_id: &str) -> Option<&Requirement> {
        self.department(department_id)?.requirement(requirement_id)
    }

    /// Every requirement across all departments, in catalogue order.
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.departments.iter().flat_map(|d| d.requirements.iter())
    }

    /// The `n` most recent activity entries.
    #[must_use]
    pub fn recent_activity(&self, n: usize) -> &[ActivityLogEntry] {
        &self.activity_log[..n.min(self.activity_log.len())]
    }
}
