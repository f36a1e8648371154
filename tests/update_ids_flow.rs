use registrar_bot::catalog::{PanelDirectoryCatalog, SnapshotCatalog};
use registrar_bot::context::RunContext;
use registrar_bot::error::RegistrarError;
use registrar_bot::registration::{build_request, classify, RegistrationOutcome};
use registrar_bot::runner::Registrar;
use registrar_bot::settings::Settings;
use registrar_bot::storage::LocalStorage;
use registrar_bot::validation::Diagnostic;
use std::fs;
use std::path::Path;

const CSCI_361_PANEL: &str = r#"
<div id="instanceSectionsPanel">
  <input type="checkbox" id="instance_28008_component_34172_section_2" name="Lecture">
  <input type="checkbox" id="instance_28008_component_34172_section_3" name="Lecture">
  <input type="checkbox" id="instance_28008_component_34173_section_2" name="Lab">
  <input type="checkbox" id="instance_28008_component_34173_section_4" name="Lab">
</div>
"#;

const CONFIG: &str = r#"{
    "credentials": {"username": "student", "password": "secret"},
    "user_info": {"user_id": "201912345"},
    "courses_to_register": []
}"#;

fn write_fixture(dir: &Path, wishlist: &str) -> Settings {
    let panels = dir.join("panels");
    fs::create_dir_all(&panels).unwrap();
    fs::write(panels.join("CSCI_361.html"), CSCI_361_PANEL).unwrap();
    fs::write(dir.join("schedule.txt"), wishlist).unwrap();
    fs::write(dir.join("config.json"), CONFIG).unwrap();

    Settings {
        wishlist_file: dir.join("schedule.txt"),
        config_file: dir.join("config.json"),
        session_file: dir.join("session_data.json"),
        ..Settings::default()
    }
}

fn registrar(settings: Settings, dir: &Path) -> Registrar {
    Registrar::new(RunContext::new(settings).with_catalog(PanelDirectoryCatalog::new(dir.join("panels"))))
}

#[test]
fn lecture_and_lab_resolve_to_one_composite_request() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_fixture(dir.path(), "CSCI 361: 2L, 2Lb\n");
    let storage = LocalStorage::new(settings.config_file.clone(), settings.session_file.clone());

    let report = registrar(settings, dir.path()).update_ids(&storage).unwrap();
    assert!(report.resolution.diagnostics.is_empty());

    let config = storage.load_config().unwrap();
    assert_eq!(config.courses_to_register.len(), 1);
    let request = build_request(&config.courses_to_register[0], &config.user_info.user_id, 1);
    assert_eq!(
        request.sections,
        "instance_28008_component_34172_section_2-instance_28008_component_34173_section_2"
    );
    assert_eq!(request.instance_id, "28008");
}

#[test]
fn unavailable_lab_section_leaves_config_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_fixture(dir.path(), "CSCI 361: 2L, 5Lb\n");
    let storage = LocalStorage::new(settings.config_file.clone(), settings.session_file.clone());

    let report = registrar(settings, dir.path()).update_ids(&storage).unwrap();
    assert!(report.resolution.resolved.is_empty());
    match &report.resolution.diagnostics[..] {
        [diagnostic @ Diagnostic::SectionUnavailable { .. }] => {
            let text = diagnostic.to_string();
            assert!(text.contains("CSCI 361"));
            assert!(text.contains("Lab"));
            assert!(text.contains("'5'"));
            assert!(text.contains("[2, 4]"));
        }
        other => panic!("unexpected diagnostics: {other:?}"),
    }

    assert!(storage.load_config().unwrap().courses_to_register.is_empty());
}

#[test]
fn unscraped_course_is_reported_and_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_fixture(dir.path(), "HIST 100: 1L\nCSCI 361: 3L\n");

    let report = registrar(settings, dir.path()).resolve().unwrap();

    assert_eq!(
        report.resolution.diagnostics,
        vec![Diagnostic::NotScraped {
            course: "HIST 100".into()
        }]
    );
    assert_eq!(report.resolution.resolved[0].name, "CSCI 361");
    assert_eq!(report.catalog.len(), 1);
}

#[test]
fn panel_scrape_saved_as_snapshot_resolves_the_same() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_fixture(dir.path(), "CSCI 361: 3L, 4Lb\n");

    let from_panels = registrar(settings.clone(), dir.path()).resolve().unwrap();
    let snapshot = dir.path().join("catalog.json");
    SnapshotCatalog::save(&snapshot, &from_panels.catalog).unwrap();

    let context = RunContext::new(settings).with_catalog(SnapshotCatalog::new(&snapshot));
    let from_snapshot = Registrar::new(context).resolve().unwrap();

    assert_eq!(from_snapshot.catalog, from_panels.catalog);
    assert_eq!(from_snapshot.resolution, from_panels.resolution);
    assert_eq!(from_snapshot.resolution.resolved.len(), 1);
}

#[test]
fn nothing_scraped_aborts_before_update() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_fixture(dir.path(), "HIST 100: 1L\n");
    let storage = LocalStorage::new(settings.config_file.clone(), settings.session_file.clone());

    let err = registrar(settings, dir.path()).update_ids(&storage).unwrap_err();
    assert!(matches!(err, RegistrarError::EmptyCatalog));
}

#[test]
fn missing_wishlist_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        wishlist_file: dir.path().join("nope.txt"),
        ..Settings::default()
    };
    let context = RunContext::new(settings).with_catalog(SnapshotCatalog::new(dir.path().join("catalog.json")));
    let err = Registrar::new(context).resolve().unwrap_err();
    assert!(matches!(err, RegistrarError::MissingInput(_)));
}

#[test]
fn response_classification_examples() {
    assert_eq!(
        classify(200, r#"{"message": "Registration Successful for CSCI 361"}"#),
        RegistrationOutcome::Success
    );
    assert_eq!(
        classify(200, r#"{"message":"Seat full"}"#),
        RegistrationOutcome::Rejected("Seat full".into())
    );
    assert_eq!(classify(200, "Service unavailable"), RegistrationOutcome::InvalidResponse);
}
