//! Domain models for clerkship progress tracking.
//!
//! This module contains the persisted data graph (departments, requirements,
//! checklist items, profile and settings), the pure state transitions applied
//! to it, and the derivations (status and progress) computed from it.

/// Requirement, checklist and patient models.
pub mod requirement;
pub use requirement::{
    ChecklistItem, Gender, PatientInfo, Requirement, RequirementDraft, RequirementType,
    RequirementUpdate,
};

/// The fixed department catalogue.
pub mod department;
pub use department::{CATALOG, Department, DepartmentInfo};

mod app_data;
pub use app_data::{ActivityLogEntry, AppData, AppSettings, UserProfile};

/// Requirement status derivation.
pub mod status;
pub use status::{Status, derive_status};

/// Progress aggregation over derived statuses.
pub mod progress;
pub use progress::{Percentages, ProgressStats};

/// Pure `(state, args) -> state` transitions.
pub mod mutation;

mod config;
pub use config::{Config, ConfigError, DEFAULT_STORAGE_KEY};
