use std::io;

use crate::{AppData, storage::Backend};

/// Loads and saves the whole data graph under a single key.
#[derive(Debug, Clone)]
pub struct Persistence<B> {
    backend: B,
    key: String,
}

/// Failure to persist the data graph.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The data graph could not be serialized.
    #[error("failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The backend rejected the write.
    #[error("failed to write data: {0}")]
    Io(#[from] io::Error),
}

impl<B: Backend> Persistence<B> {
    /// Persists under `key` in `backend`.
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// The key the data graph is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads the persisted data graph.
    ///
    /// Never fails: a missing blob, an unreadable backend or a blob that does
    /// not parse all yield [`AppData::default`]. A blob that exists but cannot
    /// be read or parsed is first set aside (see [`Backend::set_aside`]) so
    /// the next save does not destroy it.
    #[must_use]
    pub fn load(&mut self) -> AppData {
        let blob = match self.backend.read(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                tracing::debug!("No data stored under '{}', starting fresh", self.key);
                return AppData::default();
            }
            Err(e) => {
                tracing::warn!("Failed to read '{}': {e}", self.key);
                self.set_aside();
                return AppData::default();
            }
        };

        serde_json::from_str(&blob).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse stored data: {e}");
            self.set_aside();
            AppData::default()
        })
    }

    fn set_aside(&mut self) {
        match self.backend.set_aside(&self.key) {
            Ok(location) => {
                tracing::warn!("Moved the unreadable data to {location}, starting fresh");
            }
            Err(e) => tracing::warn!(
                "Could not move the unreadable data under '{}' aside, the next save replaces it: {e}",
                self.key
            ),
        }
    }

    /// Writes the whole data graph in a single backend call.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be serialized or the backend
    /// write fails.
    pub fn save(&mut self, data: &AppData) -> Result<(), SaveError> {
        let blob = serde_json::to_string(data)?;
        self.backend.write(&self.key, &blob)?;
        tracing::trace!("Saved {} bytes under '{}'", blob.len(), self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryBackend, domain::mutation};

    const KEY: &str = "koas-tracker-data";

    #[test]
    fn missing_blob_loads_default() {
        let mut persistence = Persistence::new(MemoryBackend::new(), KEY);
        assert_eq!(persistence.load(), AppData::default());
    }

    #[test]
    fn corrupt_blob_loads_default() {
        let mut persistence = Persistence::new(MemoryBackend::with(KEY, "{not json"), KEY);
        assert_eq!(persistence.load(), AppData::default());
    }

    #[test]
    fn corrupt_blob_survives_the_next_save() {
        let mut persistence = Persistence::new(MemoryBackend::with(KEY, "{not json"), KEY);

        let data = persistence.load();
        persistence.save(&data).unwrap();

        let backend = persistence.backend();
        assert_eq!(backend.get("koas-tracker-data.unreadable"), Some("{not json"));
        assert!(backend.get(KEY).is_some());
    }

    #[test]
    fn valid_blob_stays_in_place() {
        let blob = serde_json::to_string(&AppData::default()).unwrap();
        let mut persistence = Persistence::new(MemoryBackend::with(KEY, &blob), KEY);

        assert_eq!(persistence.load(), AppData::default());
        assert_eq!(persistence.backend().get(KEY), Some(blob.as_str()));
        assert_eq!(persistence.backend().get("koas-tracker-data.unreadable"), None);
    }

    #[test]
    fn save_then_load() {
        let mut persistence = Persistence::new(MemoryBackend::new(), KEY);
        let data = mutation::toggle_dark_mode(&AppData::default());

        persistence.save(&data).unwrap();

        assert!(persistence.backend().get(KEY).is_some());
        assert_eq!(persistence.load(), data);
    }

    #[test]
    fn reads_blob_written_by_earlier_versions() {
        // millisecond timestamps and the `nilai` field name
        let blob = r#"{
            "profile": {
                "name": "Sari",
                "university": "UGM",
                "angkatan": "2020",
                "periode": "2024/2025",
                "createdAt": "2024-08-01T02:03:04.567Z"
            },
            "departments": [{
                "id": "radiologi",
                "name": "Radiologi",
                "shortName": "Radio",
                "icon": "📷",
                "requirements": [{
                    "id": "4a1c",
                    "name": "Periapikal",
                    "type": "NON_PASIEN",
                    "checklist": [
                        { "id": "c1", "text": "Foto", "done": true, "completedAt": "2024-08-02T00:00:00.000Z" }
                    ],
                    "notes": "",
                    "nilai": "B",
                    "createdAt": "2024-08-01T02:03:04.567Z",
                    "updatedAt": "2024-08-02T00:00:00.000Z"
                }]
            }],
            "activityLog": [],
            "settings": { "darkMode": true, "hasOnboarded": true }
        }"#;
        let mut persistence = Persistence::new(MemoryBackend::with(KEY, blob), KEY);

        let data = persistence.load();

        assert_eq!(data.profile.as_ref().unwrap().name, "Sari");
        assert!(data.settings.dark_mode);
        let requirement = data.requirement("radiologi", "4a1c").unwrap();
        assert_eq!(requirement.grade(), Some("B"));
    }
}
