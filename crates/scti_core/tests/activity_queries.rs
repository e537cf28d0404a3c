use scti_core::db::open_db_in_memory;
use scti_core::{
    ActivityRepository, ActivityService, ActivityValidationError, NewActivity, RepoError,
    RegistrationService, SqliteActivityRepository, SqliteRegistrationStore,
};
use uuid::Uuid;

fn new_activity(topic: &str, day: i64, time: &str, spots: u32) -> NewActivity {
    NewActivity {
        spots,
        activity_type: "talk".to_string(),
        room: "Auditorium".to_string(),
        speaker: "Grace".to_string(),
        topic: topic.to_string(),
        description: format!("{topic} session"),
        time: time.to_string(),
        day,
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = ActivityService::new(SqliteActivityRepository::new(&conn));

    let input = new_activity("Ownership", 2, "14:00", 40);
    let id = service.create_activity(&input).unwrap();

    let loaded = service.get_activity_by_id(id).unwrap();
    assert_eq!(loaded, input.into_activity(id));
}

#[test]
fn get_unknown_activity_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteActivityRepository::new(&conn);

    let err = repo.get_activity(99).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(99)));
}

#[test]
fn list_activities_returns_all_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let service = ActivityService::new(SqliteActivityRepository::new(&conn));
    assert!(service.list_activities().unwrap().is_empty());

    let first = service
        .create_activity(&new_activity("Lifetimes", 3, "09:00", 10))
        .unwrap();
    let second = service
        .create_activity(&new_activity("Traits", 1, "11:00", 10))
        .unwrap();

    let ids: Vec<_> = service
        .list_activities()
        .unwrap()
        .into_iter()
        .map(|activity| activity.id)
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn create_rejects_invalid_input_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = ActivityService::new(SqliteActivityRepository::new(&conn));

    let mut input = new_activity("Macros", 1, "7pm", 10);
    let err = service.create_activity(&input).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ActivityValidationError::InvalidTime(_))
    ));

    input.time = "19:00".to_string();
    input.room = String::new();
    let err = service.create_activity(&input).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ActivityValidationError::BlankField("room"))
    ));

    assert!(service.list_activities().unwrap().is_empty());
}

#[test]
fn user_activities_are_ordered_by_day_then_time() {
    let mut conn = open_db_in_memory().unwrap();
    let (late_day, early_day_late_time, early_day_early_time) = {
        let service = ActivityService::new(SqliteActivityRepository::new(&conn));
        (
            service
                .create_activity(&new_activity("Async", 3, "08:00", 5))
                .unwrap(),
            service
                .create_activity(&new_activity("Unsafe", 1, "16:30", 5))
                .unwrap(),
            service
                .create_activity(&new_activity("Cargo", 2, "09:15", 5))
                .unwrap(),
        )
    };

    let user = Uuid::new_v4();
    {
        let mut engine = RegistrationService::new(SqliteRegistrationStore::new(&mut conn));
        engine.sign_up(user, late_day).unwrap();
        engine.sign_up(user, early_day_late_time).unwrap();
        engine.sign_up(user, early_day_early_time).unwrap();
    }

    let service = ActivityService::new(SqliteActivityRepository::new(&conn));
    let topics: Vec<_> = service
        .list_user_activities(user)
        .unwrap()
        .into_iter()
        .map(|activity| activity.topic)
        .collect();
    assert_eq!(topics, vec!["Unsafe", "Cargo", "Async"]);

    assert!(service
        .list_user_activities(Uuid::new_v4())
        .unwrap()
        .is_empty());
}

#[test]
fn corrupt_spots_are_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    // Bypass the CHECK constraint to simulate a corrupted file.
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO activities (spots, activity_type, room, speaker, topic, time, day)
         VALUES (-3, 'talk', 'A1', 'Ada', 'Rust', '10:00', 1);",
    )
    .unwrap();

    let repo = SqliteActivityRepository::new(&conn);
    let err = repo.get_activity(1).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn activity_serializes_type_field_with_external_name() {
    let activity = new_activity("Serde", 1, "10:00", 3).into_activity(5);
    let json = serde_json::to_value(&activity).unwrap();
    assert_eq!(json["type"], "talk");
    assert_eq!(json["id"], 5);
    assert!(json.get("activity_type").is_none());

    let parsed: NewActivity = serde_json::from_str(
        r#"{"spots":2,"type":"workshop","room":"Lab","speaker":"Linus","topic":"Git","time":"13:00","day":2}"#,
    )
    .unwrap();
    assert_eq!(parsed.activity_type, "workshop");
    assert_eq!(parsed.description, "");
}
