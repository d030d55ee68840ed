use serde::{Deserialize, Serialize};

use crate::domain::Requirement;

/// The immutable identity of a department in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentInfo {
    /// Stable identifier, used as a foreign key throughout the data graph.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Abbreviation used in compact views.
    pub short_name: &'static str,
    /// Emoji icon.
    pub icon: &'static str,
}

/// The ten clinical departments every store is seeded with.
pub const CATALOG: [DepartmentInfo; 10] = [
    DepartmentInfo {
        id: "periodonsia",
        name: "Periodonsia",
        short_name: "Perio",
        icon: "🦷",
    },
    DepartmentInfo {
        id: "penyakit-mulut",
        name: "Penyakit Mulut",
        short_name: "PM",
        icon: "👄",
    },
    DepartmentInfo {
        id: "bedah-mulut",
        name: "Bedah Mulut",
        short_name: "BM",
        icon: "🔪",
    },
    DepartmentInfo {
        id: "konservasi",
        name: "Konservasi",
        short_name: "Kons",
        icon: "🛡️",
    },
    DepartmentInfo {
        id: "kedokteran-gigi-anak",
        name: "Kedokteran Gigi Anak",
        short_name: "KGA",
        icon: "👶",
    },
    DepartmentInfo {
        id: "radiologi",
        name: "Radiologi",
        short_name: "Radio",
        icon: "📷",
    },
    DepartmentInfo {
        id: "odontologi-forensik",
        name: "Odontologi Forensik",
        short_name: "OF",
        icon: "🔍",
    },
    DepartmentInfo {
        id: "orthodonsia",
        name: "Orthodonsia",
        short_name: "Ortho",
        icon: "🦷",
    },
    DepartmentInfo {
        id: "prosthodonsia",
        name: "Prosthodonsia",
        short_name: "Prostho",
        icon: "🦿",
    },
    DepartmentInfo {
        id: "ikgmp",
        name: "IKGMP",
        short_name: "IKGMP",
        icon: "🏥",
    },
];

/// A clinical department and the requirements recorded against it.
///
/// Departments are never created or deleted by the user; only the
/// requirement list changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    /// Stable identifier (see [`CATALOG`]).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Abbreviation used in compact views.
    pub short_name: String,
    /// Emoji icon.
    pub icon: String,
    /// Requirements in insertion order.
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

impl From<DepartmentInfo> for Department {
    fn from(info: DepartmentInfo) -> Self {
        Self {
            id: info.id.to_string(),
            name: info.name.to_string(),
            short_name: info.short_name.to_string(),
            icon: info.icon.to_string(),
            requirements: Vec::new(),
        }
    }
}

impl Department {
    /// The full catalogue, each department with an empty requirement list.
    #[must_use]
    pub fn seed() -> Vec<Self> {
        CATALOG.into_iter().map(Self::from).collect()
    }

    /// Looks up a requirement by id.
    #[must_use]
    pub fn requirement(&self, id: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.id == id)
    }

    pub(crate) fn requirement_mut(&mut self, id: &str) -> Option<&mut Requirement> {
        self.requirements.iter_mut().find(|r| r.id == id)
    }
}
