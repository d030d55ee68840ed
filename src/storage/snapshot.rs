// JSON snapshots of the whole data graph, for backup and restore.

use crate::AppData;

/// Serializes the data graph as pretty-printed JSON, suitable for
/// [`parse_snapshot`].
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_snapshot(data: &AppData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}

/// Parses a snapshot produced by [`export_snapshot`].
///
/// Text that is not JSON, or JSON that does not have the shape of the data
/// graph (missing sections, wrong field types), is rejected.
///
/// # Errors
///
/// Returns an error if `text` is not a valid snapshot.
pub fn parse_snapshot(text: &str) -> serde_json::Result<AppData> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        RequirementDraft, RequirementType,
        domain::mutation::{add_requirement, set_grade},
    };

    #[test]
    fn export_then_import_reproduces_data() {
        let (data, requirement) = add_requirement(
            &AppData::default(),
            "konservasi",
            RequirementDraft::new("Tumpatan", RequirementType::Pasien).with_item("Preparasi"),
            Utc::now(),
        )
        .unwrap();
        let data = set_grade(&data, "konservasi", &requirement.id, "A-", Utc::now()).unwrap();

        let text = export_snapshot(&data).unwrap();

        assert!(text.contains('\n'), "snapshot should be pretty-printed");
        assert_eq!(parse_snapshot(&text).unwrap(), data);
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(parse_snapshot("not valid json").is_err());
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(parse_snapshot(r#"{"departments": 5}"#).is_err());
        assert!(parse_snapshot("[]").is_err());
    }
}
