use serde_json::json;
use srms_core::db::open_db;
use srms_core::{
    ensure_subject_list, normalize_document, KeyValueStorage, MemoryStorage, RecordStore,
    SqliteStorage, StoreDocument, StudentRecord, SubjectCatalog, DEFAULT_STORAGE_KEY,
};

fn sample_document() -> StoreDocument {
    let mut document = StoreDocument::default();
    document.students.push(StudentRecord::with_id(
        "a1b2c3d4",
        "Kavya Nair",
        "BCA-2024-01",
        "BCA",
        1,
        vec![91.0, 78.5, 66.0, 88.0, 40.0],
    ));
    document.students.push(StudentRecord::with_id(
        "e5f6g7h8",
        "Rohan Das",
        "MCA-2024-07",
        "MCA",
        4,
        vec![33.0, 90.0, 90.0, 90.0, 90.0],
    ));
    document
        .subjects
        .ensure_subject_list("MCA", 4)
        .push("Research Seminar".to_string());
    document
}

#[test]
fn save_then_load_preserves_well_formed_records() {
    let mut store = RecordStore::new(MemoryStorage::new());
    let document = sample_document();

    store.save(&document).unwrap();
    let loaded = store.load();

    assert_eq!(loaded, document);
    assert_eq!(loaded.students[1].roll_no, "MCA-2024-07");
    assert_eq!(loaded.subjects.subjects("MCA", 4).map(<[String]>::len), Some(6));
}

#[test]
fn load_after_save_equals_normalized_document() {
    let mut document = sample_document();
    document.students[0].marks[2] = 140.0;
    document.students[1].cgpa = None;

    let mut store = RecordStore::new(MemoryStorage::new());
    store.save(&document).unwrap();

    let expected = normalize_document(serde_json::to_value(&document).unwrap());
    assert_eq!(store.load(), expected);
    assert_eq!(expected.students[0].marks[2], 100.0);
    assert_eq!(expected.students[1].cgpa, None);
}

#[test]
fn persisted_json_uses_expected_wire_shape() {
    let mut store = RecordStore::new(MemoryStorage::new());
    store.save(&sample_document()).unwrap();

    let raw = store
        .storage()
        .get_item(DEFAULT_STORAGE_KEY)
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let first = &value["students"][0];
    assert_eq!(first["id"], "a1b2c3d4");
    assert_eq!(first["rollNo"], "BCA-2024-01");
    assert_eq!(first["semester"], 1);
    assert_eq!(first["grade"], "B+");
    assert_eq!(first["status"], "Pass");
    assert_eq!(value["subjects"]["BCA"]["1"][0], "Mathematics I");
    assert_eq!(value["students"][1]["status"], "Fail");
}

#[test]
fn malformed_persisted_state_is_treated_as_first_run() {
    for raw in ["", "null", "[]", "\"text\"", "{\"students\": 3"] {
        let mut storage = MemoryStorage::new();
        storage.set_item(DEFAULT_STORAGE_KEY, raw).unwrap();
        let store = RecordStore::new(storage);
        assert_eq!(store.load(), StoreDocument::default(), "raw: {raw}");
    }
}

#[test]
fn partially_valid_document_keeps_valid_fields() {
    let mut storage = MemoryStorage::new();
    let raw = json!({
        "students": "corrupted",
        "subjects": { "BCA": { "2": ["Algorithms", "Compilers", "Networks"] } }
    });
    storage
        .set_item(DEFAULT_STORAGE_KEY, &raw.to_string())
        .unwrap();

    let document = RecordStore::new(storage).load();
    assert!(document.students.is_empty());
    assert_eq!(
        document.subjects.subjects("BCA", 2).map(<[String]>::len),
        Some(3)
    );
    assert!(document.subjects.subjects("BCA", 1).is_none());
}

#[test]
fn ensure_subject_list_populates_once_and_returns_live_list() {
    let mut catalog = SubjectCatalog::new();

    let first = ensure_subject_list(&mut catalog, "BCA", 5) as *const Vec<String>;
    ensure_subject_list(&mut catalog, "BCA", 5).push("Ethical Hacking".to_string());
    let second = ensure_subject_list(&mut catalog, "BCA", 5) as *const Vec<String>;

    assert_eq!(first, second);
    let subjects = catalog.subjects("BCA", 5).unwrap();
    assert_eq!(subjects.len(), 6);
    assert_eq!(subjects[0], "Python Programming");
}

#[test]
fn sqlite_backed_store_round_trips_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.db");
    let document = sample_document();

    {
        let conn = open_db(&path).unwrap();
        let mut store = RecordStore::new(SqliteStorage::new(&conn));
        store.save(&document).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = RecordStore::new(SqliteStorage::new(&conn));
    assert_eq!(store.load(), document);
}
