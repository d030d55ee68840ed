//! On-device progress tracking for clinical clerkship (KOAS) requirements.
//!
//! Requirements live inside a fixed catalogue of departments. Their status
//! and the aggregate progress figures are always derived from the stored
//! checklist and grade data, never stored themselves.

pub mod domain;
pub use domain::{
    ActivityLogEntry, AppData, AppSettings, ChecklistItem, Config, Department, Gender, PatientInfo,
    ProgressStats, Requirement, RequirementDraft, RequirementType, RequirementUpdate, Status,
    UserProfile,
};

/// Persistence of the data graph and the authoritative in-memory store.
pub mod storage;
pub use storage::{FileBackend, ImportError, MemoryBackend, SaveError, Store};

/// Tabular exports (CSV and spreadsheet tables) built on the read API.
pub mod report;
