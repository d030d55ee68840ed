//! Pure state transitions over [`AppData`].
//!
//! Every function takes the current state by reference and returns the next
//! version, leaving the input untouched, so anyone still holding the previous
//! version is unaffected. Functions that address a department, requirement or
//! checklist item return `None` when the reference does not resolve; that is a
//! silent no-op, not an error.
//!
//! Timestamps are passed in explicitly. Fresh ids are UUID v4.

use chrono::{DateTime, Utc};

use crate::domain::{
    ActivityLogEntry, AppData, ChecklistItem, Requirement, RequirementDraft, RequirementUpdate,
    UserProfile,
};

/// Replaces the profile wholesale. No validation is performed.
#[must_use]
pub fn update_profile(data: &AppData, profile: UserProfile) -> AppData {
    AppData {
        profile: Some(profile),
        ..data.clone()
    }
}

/// Marks onboarding as complete. Idempotent.
#[must_use]
pub fn complete_onboarding(data: &AppData) -> AppData {
    let mut next = data.clone();
    next.settings.has_onboarded = true;
    next
}

/// Flips the dark mode preference.
#[must_use]
pub fn toggle_dark_mode(data: &AppData) -> AppData {
    let mut next = data.clone();
    next.settings.dark_mode = !next.settings.dark_mode;
    next
}

/// Appends a new requirement built from `draft` to a department and logs it.
///
/// Returns the created requirement alongside the new state.
#[must_use]
pub fn add_requirement(
    data: &AppData,
    department_id: &str,
    draft: RequirementDraft,
    now: DateTime<Utc>,
) -> Option<(AppData, Requirement)> {
    data.department(department_id)?;

    let requirement = Requirement::from_draft(draft, now);
    let mut next = data.clone();
    next.department_mut(department_id)?
        .requirements
        .push(requirement.clone());

    log(
        &mut next,
        ActivityLogEntry::new(
            department_id,
            &requirement.id,
            format!("Menambahkan requirement: {}", requirement.name),
            now,
        ),
    );

    Some((next, requirement))
}

/// Merges the fields present in `update` into a requirement.
#[must_use]
pub fn update_requirement(
    data: &AppData,
    department_id: &str,
    requirement_id: &str,
    update: RequirementUpdate,
    now: DateTime<Utc>,
) -> Option<AppData> {
    edit_requirement(data, department_id, requirement_id, now, |requirement| {
        requirement.apply(update);
        Some(())
    })
    .map(|(next, ())| next)
}

/// Flips a checklist item and logs the completion (or its reversal).
///
/// The log entry quotes the item's text as it was before the flip.
#[must_use]
pub fn toggle_checklist(
    data: &AppData,
    department_id: &str,
    requirement_id: &str,
    checklist_id: &str,
    now: DateTime<Utc>,
) -> Option<AppData> {
    let (mut next, (was_done, text)) =
        edit_requirement(data, department_id, requirement_id, now, |requirement| {
            let item = requirement.checklist_item_mut(checklist_id)?;
            let before = (item.done, item.text.clone());
            item.toggle(now);
            Some(before)
        })?;

    let verb = if was_done {
        "Membatalkan"
    } else {
        "Menyelesaikan"
    };
    log(
        &mut next,
        ActivityLogEntry::new(
            department_id,
            requirement_id,
            format!("{verb} checklist: {text}"),
            now,
        ),
    );

    Some(next)
}

/// Appends a new, not yet completed, checklist item.
#[must_use]
pub fn add_checklist_item(
    data: &AppData,
    department_id: &str,
    requirement_id: &str,
    text: &str,
    now: DateTime<Utc>,
) -> Option<(AppData, ChecklistItem)> {
    edit_requirement(data, department_id, requirement_id, now, |requirement| {
        let item = ChecklistItem::new(text);
        requirement.checklist.push(item.clone());
        Some(item)
    })
}

/// Removes a checklist item.
#[must_use]
pub fn remove_checklist_item(
    data: &AppData,
    department_id: &str,
    requirement_id: &str,
    checklist_id: &str,
    now: DateTime<Utc>,
) -> Option<AppData> {
    edit_requirement(data, department_id, requirement_id, now, |requirement| {
        let position = requirement
            .checklist
            .iter()
            .position(|item| item.id == checklist_id)?;
        requirement.checklist.remove(position);
        Some(())
    })
    .map(|(next, ())| next)
}

/// Records a grade and logs it. The grade is free text.
#[must_use]
pub fn set_grade(
    data: &AppData,
    department_id: &str,
    requirement_id: &str,
    grade: &str,
    now: DateTime<Utc>,
) -> Option<AppData> {
    let (mut next, ()) = edit_requirement(data, department_id, requirement_id, now, |requirement| {
        requirement.grade = Some(grade.to_string());
        Some(())
    })?;

    log(
        &mut next,
        ActivityLogEntry::new(
            department_id,
            requirement_id,
            format!("Input nilai: {grade}"),
            now,
        ),
    );

    Some(next)
}

/// Removes a requirement together with its checklist.
///
/// Unlike adding, deleting is not recorded in the activity log.
#[must_use]
pub fn delete_requirement(
    data: &AppData,
    department_id: &str,
    requirement_id: &str,
) -> Option<AppData> {
    data.requirement(department_id, requirement_id)?;

    let mut next = data.clone();
    next.department_mut(department_id)?
        .requirements
        .retain(|r| r.id != requirement_id);
    Some(next)
}

/// Keeps at most `limit` of the newest activity entries.
#[must_use]
pub fn cap_activity_log(mut data: AppData, limit: Option<usize>) -> AppData {
    if let Some(limit) = limit {
        data.activity_log.truncate(limit);
    }
    data
}

/// Clones `data`, applies `edit` to the addressed requirement and stamps its
/// `updated_at`. `edit` returning `None` abandons the change.
fn edit_requirement<T>(
    data: &AppData,
    department_id: &str,
    requirement_id: &str,
    now: DateTime<Utc>,
    edit: impl FnOnce(&mut Requirement) -> Option<T>,
) -> Option<(AppData, T)> {
    data.requirement(department_id, requirement_id)?;

    let mut next = data.clone();
    let requirement = next
        .department_mut(department_id)?
        .requirement_mut(requirement_id)?;
    let output = edit(requirement)?;
    requirement.updated_at = now;

    Some((next, output))
}

fn log(data: &mut AppData, entry: ActivityLogEntry) {
    data.activity_log.insert(0, entry);
}
