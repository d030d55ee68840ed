//! The authoritative in-memory data store.
//!
//! A [`Store`] is constructed once and handed to every collaborator that
//! reads or writes the data graph. Each mutation computes the next version
//! with a pure transition from [`crate::domain::mutation`], swaps it in and
//! then persists it. Readers holding an earlier [`Arc`] snapshot keep seeing
//! that version.

use std::sync::Arc;

use chrono::Utc;

use crate::{
    AppData, ChecklistItem, Config, ProgressStats, Requirement, RequirementDraft,
    RequirementUpdate, UserProfile,
    domain::{mutation, progress},
    storage::{Backend, Persistence, SaveError, export_snapshot, parse_snapshot},
};

/// The single owner of the current [`AppData`].
#[derive(Debug)]
pub struct Store<B> {
    current: Arc<AppData>,
    persistence: Persistence<B>,
    activity_log_limit: Option<usize>,
}

/// Failure to import a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The text is not a valid snapshot. The store is unchanged.
    #[error("invalid snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    /// The snapshot replaced the in-memory data but could not be persisted.
    #[error(transparent)]
    Save(#[from] SaveError),
}

impl<B: Backend> Store<B> {
    /// Loads the persisted data (falling back to defaults) using the storage
    /// key and retention policy from `config`.
    pub fn open(backend: B, config: &Config) -> Self {
        let mut persistence = Persistence::new(backend, config.storage_key());
        let current = Arc::new(persistence.load());
        tracing::debug!(
            "Opened '{}' with {} requirements",
            persistence.key(),
            current.requirements().count()
        );
        Self {
            current,
            persistence,
            activity_log_limit: config.activity_log_limit,
        }
    }

    /// The current version of the data graph.
    ///
    /// The returned snapshot is unaffected by later mutations.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AppData> {
        Arc::clone(&self.current)
    }

    /// Borrows the current version of the data graph.
    #[must_use]
    pub fn data(&self) -> &AppData {
        &self.current
    }

    /// The underlying backend.
    pub const fn backend(&self) -> &B {
        self.persistence.backend()
    }

    /// Progress across every department, computed fresh.
    #[must_use]
    pub fn global_progress(&self) -> ProgressStats {
        progress::global_progress(&self.current.departments)
    }

    /// Progress for one department, computed fresh. Unknown departments
    /// yield empty stats.
    #[must_use]
    pub fn department_progress(&self, department_id: &str) -> ProgressStats {
        progress::department_progress(&self.current.departments, department_id)
    }

    /// Replaces the profile wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted. The in-memory
    /// change is kept regardless.
    pub fn update_profile(&mut self, profile: UserProfile) -> Result<(), SaveError> {
        let next = mutation::update_profile(&self.current, profile);
        self.commit(next)
    }

    /// Marks onboarding as complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn complete_onboarding(&mut self) -> Result<(), SaveError> {
        let next = mutation::complete_onboarding(&self.current);
        self.commit(next)
    }

    /// Flips the dark mode preference and returns its new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn toggle_dark_mode(&mut self) -> Result<bool, SaveError> {
        let next = mutation::toggle_dark_mode(&self.current);
        let dark_mode = next.settings.dark_mode;
        self.commit(next)?;
        Ok(dark_mode)
    }

    /// Adds a requirement to a department.
    ///
    /// Returns `None` (and changes nothing) if the department does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn add_requirement(
        &mut self,
        department_id: &str,
        draft: RequirementDraft,
    ) -> Result<Option<Requirement>, SaveError> {
        let Some((next, requirement)) =
            mutation::add_requirement(&self.current, department_id, draft, Utc::now())
        else {
            tracing::debug!("No department '{department_id}', requirement not added");
            return Ok(None);
        };
        self.commit(next)?;
        tracing::info!("Added requirement '{}' to {department_id}", requirement.name);
        Ok(Some(requirement))
    }

    /// Merges `update` into a requirement.
    ///
    /// Returns `false` (and changes nothing) if the requirement does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn update_requirement(
        &mut self,
        department_id: &str,
        requirement_id: &str,
        update: RequirementUpdate,
    ) -> Result<bool, SaveError> {
        let next = mutation::update_requirement(
            &self.current,
            department_id,
            requirement_id,
            update,
            Utc::now(),
        );
        self.commit_if_changed(next)
    }

    /// Flips a checklist item.
    ///
    /// Returns `false` (and changes nothing) if the item does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn toggle_checklist(
        &mut self,
        department_id: &str,
        requirement_id: &str,
        checklist_id: &str,
    ) -> Result<bool, SaveError> {
        let next = mutation::toggle_checklist(
            &self.current,
            department_id,
            requirement_id,
            checklist_id,
            Utc::now(),
        );
        self.commit_if_changed(next)
    }

    /// Appends a checklist item to a requirement.
    ///
    /// Returns `None` (and changes nothing) if the requirement does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn add_checklist_item(
        &mut self,
        department_id: &str,
        requirement_id: &str,
        text: &str,
    ) -> Result<Option<ChecklistItem>, SaveError> {
        let Some((next, item)) = mutation::add_checklist_item(
            &self.current,
            department_id,
            requirement_id,
            text,
            Utc::now(),
        ) else {
            return Ok(None);
        };
        self.commit(next)?;
        Ok(Some(item))
    }

    /// Removes a checklist item.
    ///
    /// Returns `false` (and changes nothing) if the item does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn remove_checklist_item(
        &mut self,
        department_id: &str,
        requirement_id: &str,
        checklist_id: &str,
    ) -> Result<bool, SaveError> {
        let next = mutation::remove_checklist_item(
            &self.current,
            department_id,
            requirement_id,
            checklist_id,
            Utc::now(),
        );
        self.commit_if_changed(next)
    }

    /// Records a grade against a requirement.
    ///
    /// Returns `false` (and changes nothing) if the requirement does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn set_grade(
        &mut self,
        department_id: &str,
        requirement_id: &str,
        grade: &str,
    ) -> Result<bool, SaveError> {
        let next = mutation::set_grade(
            &self.current,
            department_id,
            requirement_id,
            grade,
            Utc::now(),
        );
        self.commit_if_changed(next)
    }

    /// Deletes a requirement and its checklist.
    ///
    /// Returns `false` (and changes nothing) if the requirement does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn delete_requirement(
        &mut self,
        department_id: &str,
        requirement_id: &str,
    ) -> Result<bool, SaveError> {
        let next = mutation::delete_requirement(&self.current, department_id, requirement_id);
        self.commit_if_changed(next)
    }

    /// Serializes the current data graph as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_snapshot(&self) -> serde_json::Result<String> {
        export_snapshot(&self.current)
    }

    /// Replaces the whole data graph with a parsed snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Parse`] if `text` is not a valid snapshot; the
    /// store is left untouched. Returns [`ImportError::Save`] if the imported
    /// data could not be persisted; the import is kept in memory.
    pub fn import_snapshot(&mut self, text: &str) -> Result<(), ImportError> {
        let next = parse_snapshot(text)?;
        self.commit(next)?;
        tracing::info!("Imported snapshot");
        Ok(())
    }

    /// Replaces the data graph with the factory default.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn reset_all(&mut self) -> Result<(), SaveError> {
        self.commit(AppData::default())?;
        tracing::info!("Reset all data");
        Ok(())
    }

    fn commit_if_changed(&mut self, next: Option<AppData>) -> Result<bool, SaveError> {
        match next {
            Some(next) => self.commit(next).map(|()| true),
            None => {
                tracing::debug!("Reference not found, nothing changed");
                Ok(false)
            }
        }
    }

    /// Swaps in `next` and persists it. The swap is not rolled back if the
    /// save fails.
    fn commit(&mut self, next: AppData) -> Result<(), SaveError> {
        let next = mutation::cap_activity_log(next, self.activity_log_limit);
        self.current = Arc::new(next);
        self.persistence.save(&self.current).inspect_err(|e| {
            tracing::warn!("Failed to persist data: {e}");
        })
    }
}
