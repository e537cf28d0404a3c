use scti_core::db::open_db;
use scti_core::{
    ActivityService, NewActivity, RegistrationError, RegistrationService,
    SqliteActivityRepository, SqliteRegistrationStore,
};
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use uuid::Uuid;

fn seed_activity(path: &Path, spots: u32) -> i64 {
    let conn = open_db(path).unwrap();
    ActivityService::new(SqliteActivityRepository::new(&conn))
        .create_activity(&NewActivity {
            spots,
            activity_type: "workshop".to_string(),
            room: "Lab 3".to_string(),
            speaker: "Dennis".to_string(),
            topic: "Systems programming".to_string(),
            description: String::new(),
            time: "15:00".to_string(),
            day: 1,
        })
        .unwrap()
}

fn race_sign_ups(path: &Path, activity: i64, users: usize) -> Vec<Result<(), RegistrationError>> {
    let barrier = Arc::new(Barrier::new(users));
    let handles: Vec<_> = (0..users)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let path = path.to_path_buf();
            thread::spawn(move || {
                let mut conn = open_db(&path).unwrap();
                let mut engine = RegistrationService::new(SqliteRegistrationStore::new(&mut conn));
                barrier.wait();
                engine.sign_up(Uuid::new_v4(), activity)
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect()
}

#[test]
fn two_users_racing_for_last_seat_yield_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    let activity = seed_activity(&path, 1);

    let results = race_sign_ups(&path, activity, 2);

    let winners = results.iter().filter(|result| result.is_ok()).count();
    let sold_out = results
        .iter()
        .filter(|result| matches!(result, Err(RegistrationError::NoSpotsAvailable(_))))
        .count();
    assert_eq!(winners, 1);
    assert_eq!(sold_out, 1);

    let conn = open_db(&path).unwrap();
    let remaining = ActivityService::new(SqliteActivityRepository::new(&conn))
        .get_activity_by_id(activity)
        .unwrap()
        .spots;
    assert_eq!(remaining, 0);
}

#[test]
fn many_concurrent_sign_ups_never_overbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("load.db");
    let capacity = 5;
    let activity = seed_activity(&path, capacity);

    let results = race_sign_ups(&path, activity, 12);

    let winners = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(winners, capacity as usize);
    assert!(results.iter().all(|result| match result {
        Ok(()) => true,
        Err(err) => matches!(err, RegistrationError::NoSpotsAvailable(_)),
    }));

    let conn = open_db(&path).unwrap();
    let registered: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM registrations WHERE activity_id = ?1;",
            [activity],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(registered, i64::from(capacity));
}
