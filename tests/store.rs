#![allow(missing_docs)]

use std::fs;

use koas::{
    AppData, Config, FileBackend, ImportError, RequirementDraft, RequirementType, Status, Store,
    report,
};
use tempfile::TempDir;

fn open(dir: &TempDir, config: &Config) -> Store<FileBackend> {
    Store::open(FileBackend::new(dir.path().to_path_buf()), config)
}

#[test]
fn changes_survive_reopening() {
    let dir = TempDir::new().unwrap();
    let config = Config::default();

    let (requirement_id, item_id) = {
        let mut store = open(&dir, &config);
        let requirement = store
            .add_requirement(
                "periodonsia",
                RequirementDraft::new("Scaling", RequirementType::Pasien)
                    .with_item("Anamnesis")
                    .with_item("Scaling RA"),
            )
            .unwrap()
            .unwrap();
        let item_id = requirement.checklist[0].id.clone();
        assert!(
            store
                .toggle_checklist("periodonsia", &requirement.id, &item_id)
                .unwrap()
        );
        (requirement.id, item_id)
    };

    let store = open(&dir, &config);
    let requirement = store
        .data()
        .requirement("periodonsia", &requirement_id)
        .unwrap();
    assert_eq!(requirement.status(), Status::OnGoing);
    assert!(requirement.checklist_item(&item_id).unwrap().done);
    assert_eq!(store.data().activity_log.len(), 2);
    assert_eq!(
        store.data().activity_log[0].action,
        "Menyelesaikan checklist: Anamnesis"
    );

    let global = store.global_progress();
    assert_eq!(global.total, 1);
    assert_eq!(global.ongoing, 1);
}

#[test]
fn corrupt_blob_opens_with_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("koas-tracker-data.json"), "{ not json").unwrap();

    let store = open(&dir, &Config::default());
    assert_eq!(*store.data(), AppData::default());
}

#[test]
fn corrupt_blob_is_kept_when_new_data_is_saved() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("koas-tracker-data.json"), "{ not json").unwrap();

    let mut store = open(&dir, &Config::default());
    store.complete_onboarding().unwrap();

    let kept: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("koas-tracker-data.json.unreadable-")
        })
        .collect();
    assert_eq!(kept.len(), 1);
    assert_eq!(fs::read_to_string(&kept[0]).unwrap(), "{ not json");

    let reopened = open(&dir, &Config::default());
    assert!(reopened.data().settings.has_onboarded);
}

#[test]
fn storage_key_selects_the_file() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    assert!(config.set_storage_key("other"));

    let mut store = open(&dir, &config);
    store.complete_onboarding().unwrap();

    assert!(dir.path().join("other.json").exists());
    assert!(!dir.path().join("koas-tracker-data.json").exists());
}

#[test]
fn activity_log_limit_is_applied_on_commit() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.activity_log_limit = Some(3);
    let mut store = open(&dir, &config);

    for name in ["A", "B", "C", "D", "E"] {
        store
            .add_requirement(
                "radiologi",
                RequirementDraft::new(name, RequirementType::NonPasien),
            )
            .unwrap();
    }

    let log = &store.data().activity_log;
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].action, "Menambahkan requirement: E");
    assert_eq!(log[2].action, "Menambahkan requirement: C");
}

#[test]
fn backup_restores_into_a_fresh_store() {
    let source_dir = TempDir::new().unwrap();
    let mut source = open(&source_dir, &Config::default());
    let requirement = source
        .add_requirement(
            "konservasi",
            RequirementDraft::new("Tumpatan", RequirementType::Pasien).with_item("Preparasi"),
        )
        .unwrap()
        .unwrap();
    source
        .set_grade("konservasi", &requirement.id, "A")
        .unwrap();
    let backup = source.export_snapshot().unwrap();

    let target_dir = TempDir::new().unwrap();
    let mut target = open(&target_dir, &Config::default());
    target.import_snapshot(&backup).unwrap();
    assert_eq!(target.data(), source.data());

    // and the restored data was persisted
    let reopened = open(&target_dir, &Config::default());
    assert_eq!(reopened.data(), source.data());
    assert_eq!(
        reopened
            .data()
            .requirement("konservasi", &requirement.id)
            .unwrap()
            .status(),
        Status::Nilai
    );
}

#[test]
fn rejected_import_leaves_data_alone() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir, &Config::default());
    store.toggle_dark_mode().unwrap();
    let before = store.snapshot();

    let error = store
        .import_snapshot(r#"{"departments": "nope"}"#)
        .unwrap_err();
    assert!(matches!(error, ImportError::Parse(_)));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn reset_persists_factory_state() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir, &Config::default());
    store
        .add_requirement(
            "ikgmp",
            RequirementDraft::new("Penyuluhan", RequirementType::NonPasien),
        )
        .unwrap();
    store.reset_all().unwrap();

    let reopened = open(&dir, &Config::default());
    assert_eq!(*reopened.data(), AppData::default());
    assert_eq!(reopened.data().departments.len(), 10);
}

#[test]
fn csv_export_reflects_stored_data() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir, &Config::default());
    store
        .add_requirement(
            "orthodonsia",
            RequirementDraft::new("Plat \"aktif\"", RequirementType::Pasien).with_item("Cetak"),
        )
        .unwrap();

    let csv = report::to_csv(store.data());
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("\"Departemen\""));
    let row = lines.next().unwrap();
    assert!(row.contains("\"Plat \"\"aktif\"\"\""));
    assert!(row.contains("\"Belum Mulai\""));
    assert!(lines.next().is_none());
}
