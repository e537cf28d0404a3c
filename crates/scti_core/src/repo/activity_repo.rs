//! Activity repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide read and create APIs over `activities` storage.
//! - Own the row-to-`Activity` mapping for every query that returns one.
//!
//! # Invariants
//! - Read paths reject invalid persisted state instead of masking it.
//! - `get_activity` reports a missing id as `NotFound`, never as a DB error.
//! - User activity listings are ordered by `day, time` ascending.

use crate::db::DbError;
use crate::model::activity::{Activity, ActivityId, ActivityValidationError, NewActivity};
use crate::model::registration::UserId;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ACTIVITY_SELECT_SQL: &str = "SELECT
    a.id,
    a.spots,
    a.activity_type,
    a.room,
    a.speaker,
    a.topic,
    a.description,
    a.time,
    a.day
FROM activities a";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for activity and registration persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ActivityValidationError),
    Db(DbError),
    NotFound(ActivityId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "no activity found with id: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ActivityValidationError> for RepoError {
    fn from(value: ActivityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for activity data access.
pub trait ActivityRepository {
    /// Returns every activity ordered by id.
    fn get_all_activities(&self) -> RepoResult<Vec<Activity>>;
    /// Returns one activity or `RepoError::NotFound`.
    fn get_activity(&self, id: ActivityId) -> RepoResult<Activity>;
    /// Inserts a validated activity and returns its assigned id.
    fn create_activity(&self, activity: &NewActivity) -> RepoResult<ActivityId>;
    /// Returns the activities a user is registered for, by `day, time`.
    fn get_user_activities(&self, user_id: UserId) -> RepoResult<Vec<Activity>>;
}

/// SQLite-backed activity repository.
pub struct SqliteActivityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActivityRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ActivityRepository for SqliteActivityRepository<'_> {
    fn get_all_activities(&self) -> RepoResult<Vec<Activity>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACTIVITY_SELECT_SQL} ORDER BY a.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut activities = Vec::new();
        while let Some(row) = rows.next()? {
            activities.push(parse_activity_row(row)?);
        }
        Ok(activities)
    }

    fn get_activity(&self, id: ActivityId) -> RepoResult<Activity> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACTIVITY_SELECT_SQL} WHERE a.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return parse_activity_row(row);
        }

        Err(RepoError::NotFound(id))
    }

    fn create_activity(&self, activity: &NewActivity) -> RepoResult<ActivityId> {
        activity.validate()?;

        let id = self
            .conn
            .query_row(
                "INSERT INTO activities (
                    spots,
                    activity_type,
                    room,
                    speaker,
                    topic,
                    description,
                    time,
                    day
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                RETURNING id;",
                params![
                    i64::from(activity.spots),
                    activity.activity_type.as_str(),
                    activity.room.as_str(),
                    activity.speaker.as_str(),
                    activity.topic.as_str(),
                    activity.description.as_str(),
                    activity.time.as_str(),
                    activity.day,
                ],
                |row| row.get::<_, ActivityId>(0),
            )
            .optional()?;

        id.ok_or_else(|| RepoError::InvalidData("activity insert returned no id".to_string()))
    }

    fn get_user_activities(&self, user_id: UserId) -> RepoResult<Vec<Activity>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ACTIVITY_SELECT_SQL}
             INNER JOIN registrations r ON r.activity_id = a.id
             WHERE r.user_id = ?1
             ORDER BY a.day ASC, a.time ASC, a.id ASC;"
        ))?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut activities = Vec::new();
        while let Some(row) = rows.next()? {
            activities.push(parse_activity_row(row)?);
        }
        Ok(activities)
    }
}

/// Maps one `ACTIVITY_SELECT_SQL` row into the domain type.
pub(crate) fn parse_activity_row(row: &Row<'_>) -> RepoResult<Activity> {
    let id: ActivityId = row.get("id")?;
    let spots = parse_spots(row.get("spots")?, id)?;

    Ok(Activity {
        id,
        spots,
        activity_type: row.get("activity_type")?,
        room: row.get("room")?,
        speaker: row.get("speaker")?,
        topic: row.get("topic")?,
        description: row.get("description")?,
        time: row.get("time")?,
        day: row.get("day")?,
    })
}

pub(crate) fn parse_spots(raw: i64, id: ActivityId) -> RepoResult<u32> {
    u32::try_from(raw).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid spots value `{raw}` in activities.spots for id {id}"
        ))
    })
}
