use srms_core::service::validation::{FIELD_MARKS, FIELD_SUBJECTS};
use srms_core::{
    KeyValueStorage, LetterGrade, MemoryStorage, PassStatus, RecordStore, ResultService,
    SaveOutcome, ServiceError, StoreError, StudentDraft, StudentFilter, DEFAULT_STORAGE_KEY,
};

fn open_service() -> ResultService<MemoryStorage> {
    ResultService::open(RecordStore::new(MemoryStorage::new()))
}

fn draft(name: &str, roll_no: &str, branch: &str, semester: u8, marks: &[f64]) -> StudentDraft {
    StudentDraft {
        name: name.to_string(),
        roll_no: roll_no.to_string(),
        branch: branch.to_string(),
        semester: Some(semester),
        marks: marks.to_vec(),
    }
}

fn validation_errors(err: ServiceError) -> srms_core::ValidationErrors {
    match err {
        ServiceError::Validation(errors) => errors,
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn save_student_creates_record_with_cached_metrics_and_persists() {
    let mut service = open_service();

    let outcome = service
        .save_student(
            &draft("  Priya  ", " BCA-01 ", "BCA", 1, &[90.0, 85.0, 72.0, 64.0, 55.0]),
            None,
        )
        .unwrap();
    let id = match &outcome {
        SaveOutcome::Created(id) => id.clone(),
        other => panic!("unexpected outcome: {other:?}"),
    };

    let student = service.document().find_student(&id).unwrap();
    assert_eq!(student.name, "Priya");
    assert_eq!(student.roll_no, "BCA-01");
    // points: 10 + 9 + 8 + 7 + 6 = 40 / 5
    assert_eq!(student.cgpa, Some(8.0));
    assert_eq!(student.grade, Some(LetterGrade::A));
    assert_eq!(student.status, Some(PassStatus::Pass));

    let reloaded = service.store().load();
    assert_eq!(reloaded.students.len(), 1);
    assert_eq!(reloaded.students[0].id, id);
}

#[test]
fn save_student_with_editing_id_updates_in_place() {
    let mut service = open_service();
    let id = service
        .save_student(&draft("Arjun", "MCA-03", "MCA", 2, &[50.0; 5]), None)
        .unwrap()
        .id()
        .to_string();
    service
        .save_student(&draft("Bina", "MCA-04", "MCA", 2, &[60.0; 5]), None)
        .unwrap();

    let outcome = service
        .save_student(&draft("Arjun K", "MCA-03", "MCA", 2, &[20.0; 5]), Some(&id))
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Updated(id.clone()));

    let students = &service.document().students;
    assert_eq!(students.len(), 2);
    assert_eq!(students[0].id, id);
    assert_eq!(students[0].name, "Arjun K");
    assert_eq!(students[0].status, Some(PassStatus::Fail));
}

#[test]
fn invalid_student_reports_every_field_and_changes_nothing() {
    let mut service = open_service();
    let before = service.document().clone();

    let err = service
        .save_student(
            &StudentDraft {
                name: " ".to_string(),
                marks: vec![120.0],
                ..StudentDraft::default()
            },
            None,
        )
        .unwrap_err();
    let errors = validation_errors(err);

    assert_eq!(errors.message_for("name"), Some("Name is required"));
    assert_eq!(errors.message_for("rollNo"), Some("Roll number is required"));
    assert_eq!(errors.message_for("branch"), Some("Select branch"));
    assert_eq!(errors.message_for("semester"), Some("Select semester"));
    assert_eq!(
        errors.message_for(FIELD_MARKS),
        Some("Marks must be between 0 and 100")
    );
    assert_eq!(service.document(), &before);
    assert!(service
        .store()
        .storage()
        .get_item(DEFAULT_STORAGE_KEY)
        .unwrap()
        .is_none());
}

#[test]
fn marks_must_align_with_subject_list() {
    let mut service = open_service();
    let err = service
        .save_student(&draft("Dev", "BCA-09", "BCA", 3, &[70.0, 70.0]), None)
        .unwrap_err();
    assert_eq!(
        validation_errors(err).message_for(FIELD_MARKS),
        Some("Expected 5 marks, got 2")
    );
}

#[test]
fn semester_without_subjects_is_rejected() {
    let mut service = open_service();
    service
        .replace_subjects("BCA", 2, ["A", "B", "C"])
        .unwrap();
    for index in (0..3).rev() {
        service.remove_subject("BCA", 2, index).unwrap();
    }

    let err = service
        .save_student(&draft("Esha", "BCA-10", "BCA", 2, &[]), None)
        .unwrap_err();
    assert_eq!(
        validation_errors(err).message_for(FIELD_SUBJECTS),
        Some("No subjects configured for this semester")
    );
}

#[test]
fn delete_student_removes_record_and_reports_missing_ids() {
    let mut service = open_service();
    let id = service
        .save_student(&draft("Farah", "BCA-11", "BCA", 4, &[80.0; 5]), None)
        .unwrap()
        .id()
        .to_string();

    service.delete_student(&id).unwrap();
    assert!(service.document().students.is_empty());
    assert!(service.store().load().students.is_empty());

    let err = service.delete_student(&id).unwrap_err();
    assert!(matches!(err, ServiceError::StudentNotFound(missing) if missing == id));
}

#[test]
fn subject_management_enforces_limits() {
    let mut service = open_service();

    service.add_subject("MCA", 1, "  Research   Methods ").unwrap();
    assert_eq!(service.subjects_for("MCA", 1).len(), 6);
    assert_eq!(service.subjects_for("MCA", 1)[5], "Research Methods");

    for extra in ["S7", "S8", "S9", "S10"] {
        service.add_subject("MCA", 1, extra).unwrap();
    }
    let err = service.add_subject("MCA", 1, "S11").unwrap_err();
    assert_eq!(
        validation_errors(err).message_for(FIELD_SUBJECTS),
        Some("Max 10 subjects allowed")
    );

    let err = service.add_subject("MCA", 1, "   ").unwrap_err();
    assert_eq!(
        validation_errors(err).message_for("subjectName"),
        Some("Enter subject name")
    );

    let err = service
        .replace_subjects("MCA", 1, ["Only", " ", "Two"])
        .unwrap_err();
    assert_eq!(
        validation_errors(err).message_for(FIELD_SUBJECTS),
        Some("Please keep at least 3 subjects")
    );

    let eleven: Vec<String> = (1..=11).map(|n| format!("Subject {n}")).collect();
    let err = service.replace_subjects("MCA", 1, &eleven).unwrap_err();
    assert_eq!(
        validation_errors(err).message_for(FIELD_SUBJECTS),
        Some("Limit to 10 subjects")
    );

    service
        .replace_subjects("MCA", 1, ["Algebra", "", "Logic", "Graphs"])
        .unwrap();
    assert_eq!(
        service.store().load().subjects.subjects("MCA", 1).unwrap(),
        ["Algebra", "Logic", "Graphs"]
    );
}

#[test]
fn remove_subject_rejects_out_of_range_positions() {
    let mut service = open_service();
    let removed = service.remove_subject("BCA", 6, 1).unwrap();
    assert_eq!(removed, "Project");
    assert_eq!(service.subjects_for("BCA", 6).len(), 4);

    let err = service.remove_subject("BCA", 6, 4).unwrap_err();
    assert_eq!(
        validation_errors(err).message_for(FIELD_SUBJECTS),
        Some("No subject at position 5")
    );
}

#[test]
fn unknown_branch_is_rejected_for_subject_edits() {
    let mut service = open_service();
    let err = service.add_subject("BSC", 1, "Physics").unwrap_err();
    assert_eq!(
        validation_errors(err).message_for("branch"),
        Some("Unknown branch `BSC`")
    );
}

#[test]
fn clear_all_resets_students_and_custom_subjects() {
    let mut service = open_service();
    service
        .save_student(&draft("Gita", "BCA-12", "BCA", 1, &[75.0; 5]), None)
        .unwrap();
    service.add_subject("BCA", 1, "Yoga").unwrap();

    service.clear_all().unwrap();

    let reloaded = service.store().load();
    assert!(reloaded.students.is_empty());
    assert_eq!(reloaded.subjects.subjects("BCA", 1).map(<[String]>::len), Some(5));
}

#[test]
fn listing_stats_and_detail_projections() {
    let mut service = open_service();
    service
        .save_student(&draft("meena", "BCA-21", "BCA", 1, &[90.0; 5]), None)
        .unwrap();
    service
        .save_student(&draft("Ajay", "BCA-22", "BCA", 1, &[90.0, 90.0, 90.0, 90.0, 20.0]), None)
        .unwrap();
    let id = service
        .save_student(&draft("Chitra", "MCA-01", "MCA", 1, &[45.0; 5]), None)
        .unwrap()
        .id()
        .to_string();

    let bca = StudentFilter {
        branch: Some("BCA".to_string()),
        ..StudentFilter::default()
    };
    let names: Vec<_> = service
        .list_students(&bca)
        .iter()
        .map(|student| student.name.clone())
        .collect();
    assert_eq!(names, vec!["Ajay", "meena"]);

    let stats = service.stats(&StudentFilter::default());
    assert_eq!(stats.total_students, 3);
    assert_eq!(stats.pass_count, 2);
    assert_eq!(stats.pass_rate_percent, 67);
    // (10 + 8 + 5) / 3
    assert_eq!(stats.average_cgpa, 7.67);

    let search = StudentFilter {
        search: Some("mca".to_string()),
        ..StudentFilter::default()
    };
    assert_eq!(service.stats(&search).total_students, 1);

    let detail = service.student_detail(&id).unwrap();
    assert_eq!(detail.rows.len(), 5);
    assert_eq!(detail.rows[0].subject, "Mathematical Foundations");
    assert!(detail.rows.iter().all(|row| row.passed));
    assert_eq!(detail.summary.grade, LetterGrade::C);

    let err = service.student_detail("missing").unwrap_err();
    assert!(matches!(err, ServiceError::StudentNotFound(_)));
}

#[test]
fn failed_save_keeps_in_memory_mutation() {
    let mut service = ResultService::open(RecordStore::new(MemoryStorage::with_quota(64)));

    let err = service
        .save_student(&draft("Hari", "BCA-30", "BCA", 2, &[66.0; 5]), None)
        .unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::Storage(_))));

    assert_eq!(service.document().students.len(), 1);
    assert!(service.store().load().students.is_empty());
}

#[test]
fn blank_editing_id_gets_fresh_id_and_survives_reload() {
    let mut service = open_service();

    for blank in ["", "   "] {
        let outcome = service
            .save_student(&draft("Kavya", "BCA-40", "BCA", 1, &[70.0; 5]), Some(blank))
            .unwrap();
        assert!(matches!(outcome, SaveOutcome::Created(_)));
        assert!(!outcome.id().trim().is_empty());
    }

    assert_eq!(service.document().students.len(), 2);
    assert_eq!(service.store().load().students.len(), 2);
}

#[test]
fn released_storage_reopens_with_saved_students() {
    let mut service = open_service();
    let id = service
        .save_student(&draft("Meera", "MCA-11", "MCA", 3, &[88.0; 5]), None)
        .unwrap()
        .id()
        .to_string();

    let storage = service.into_store().into_storage();
    assert!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap().is_some());

    let reopened = ResultService::open(RecordStore::new(storage));
    assert!(reopened.document().find_student(&id).is_some());
}

#[test]
fn service_can_borrow_caller_owned_storage() {
    let mut backing = MemoryStorage::new();
    {
        let mut service = ResultService::open(RecordStore::new(&mut backing));
        service
            .save_student(&draft("Nisha", "BCA-12", "BCA", 4, &[61.0; 5]), None)
            .unwrap();
    }

    let raw = backing.get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    assert!(raw.contains("Nisha"));
}
