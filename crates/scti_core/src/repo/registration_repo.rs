//! Registration store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Expose the primitive reads/writes the registration engine composes into
//!   signup and unregister.
//! - Scope every mutation to one atomic unit with a single commit point.
//!
//! # Invariants
//! - A `RegistrationUnit` dropped without `commit()` rolls back all its
//!   writes.
//! - SQLite units begin with `BEGIN IMMEDIATE`, so the check-then-act
//!   sequence runs under the database write lock and concurrent signups for
//!   the last seat are serialized.
//! - `decrement_spots` never takes `spots` below zero.

use crate::model::activity::ActivityId;
use crate::model::registration::{Registration, UserId};
use crate::repo::activity_repo::{parse_spots, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use uuid::Uuid;

/// Scheduling facts the engine needs about one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySlot {
    pub day: i64,
    pub spots: u32,
}

/// One atomic unit of registration work.
///
/// Implementations must discard every write when dropped without `commit`.
pub trait RegistrationUnit {
    fn registration_exists(&self, user_id: UserId, activity_id: ActivityId) -> RepoResult<bool>;
    /// Returns `None` when the activity does not exist.
    fn activity_slot(&self, activity_id: ActivityId) -> RepoResult<Option<ActivitySlot>>;
    /// Counts the user's registrations whose activity falls on `day`.
    fn count_registrations_on_day(&self, user_id: UserId, day: i64) -> RepoResult<u32>;
    fn insert_registration(&self, user_id: UserId, activity_id: ActivityId) -> RepoResult<()>;
    /// Returns `false` when there was nothing to delete.
    fn delete_registration(&self, user_id: UserId, activity_id: ActivityId) -> RepoResult<bool>;
    /// Takes one seat. Returns `false` when no seat was left.
    fn decrement_spots(&self, activity_id: ActivityId) -> RepoResult<bool>;
    /// Gives one seat back.
    fn increment_spots(&self, activity_id: ActivityId) -> RepoResult<()>;
    /// Makes every write of this unit durable.
    fn commit(self) -> RepoResult<()>;
}

/// Source of atomic units plus the read-only registration lookups.
pub trait RegistrationStore {
    type Unit<'a>: RegistrationUnit
    where
        Self: 'a;

    /// Opens a new atomic unit.
    fn begin(&mut self) -> RepoResult<Self::Unit<'_>>;
    /// Loads one registration outside any unit.
    fn find_registration(
        &self,
        user_id: UserId,
        activity_id: ActivityId,
    ) -> RepoResult<Option<Registration>>;
}

/// SQLite-backed registration store.
pub struct SqliteRegistrationStore<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteRegistrationStore<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl RegistrationStore for SqliteRegistrationStore<'_> {
    type Unit<'a>
        = SqliteRegistrationUnit<'a>
    where
        Self: 'a;

    fn begin(&mut self) -> RepoResult<Self::Unit<'_>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(SqliteRegistrationUnit { tx })
    }

    fn find_registration(
        &self,
        user_id: UserId,
        activity_id: ActivityId,
    ) -> RepoResult<Option<Registration>> {
        let found = self
            .conn
            .query_row(
                "SELECT user_id, activity_id, created_at
                 FROM registrations
                 WHERE user_id = ?1 AND activity_id = ?2;",
                params![user_id.to_string(), activity_id],
                |row| {
                    Ok((
                        row.get::<_, String>("user_id")?,
                        row.get::<_, ActivityId>("activity_id")?,
                        row.get::<_, i64>("created_at")?,
                    ))
                },
            )
            .optional()?;

        match found {
            Some((user_text, activity_id, created_at)) => Ok(Some(Registration {
                user_id: parse_user_id(&user_text)?,
                activity_id,
                created_at,
            })),
            None => Ok(None),
        }
    }
}

/// SQLite transaction wrapper. Rolls back on drop unless committed.
pub struct SqliteRegistrationUnit<'conn> {
    tx: Transaction<'conn>,
}

impl RegistrationUnit for SqliteRegistrationUnit<'_> {
    fn registration_exists(&self, user_id: UserId, activity_id: ActivityId) -> RepoResult<bool> {
        let exists: i64 = self.tx.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM registrations
                WHERE user_id = ?1 AND activity_id = ?2
            );",
            params![user_id.to_string(), activity_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn activity_slot(&self, activity_id: ActivityId) -> RepoResult<Option<ActivitySlot>> {
        let raw = self
            .tx
            .query_row(
                "SELECT day, spots FROM activities WHERE id = ?1;",
                [activity_id],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;

        match raw {
            Some((day, spots)) => Ok(Some(ActivitySlot {
                day,
                spots: parse_spots(spots, activity_id)?,
            })),
            None => Ok(None),
        }
    }

    fn count_registrations_on_day(&self, user_id: UserId, day: i64) -> RepoResult<u32> {
        let count: u32 = self.tx.query_row(
            "SELECT COUNT(*)
             FROM registrations r
             INNER JOIN activities a ON r.activity_id = a.id
             WHERE r.user_id = ?1 AND a.day = ?2;",
            params![user_id.to_string(), day],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn insert_registration(&self, user_id: UserId, activity_id: ActivityId) -> RepoResult<()> {
        self.tx.execute(
            "INSERT INTO registrations (user_id, activity_id) VALUES (?1, ?2);",
            params![user_id.to_string(), activity_id],
        )?;
        Ok(())
    }

    fn delete_registration(&self, user_id: UserId, activity_id: ActivityId) -> RepoResult<bool> {
        let changed = self.tx.execute(
            "DELETE FROM registrations WHERE user_id = ?1 AND activity_id = ?2;",
            params![user_id.to_string(), activity_id],
        )?;
        Ok(changed > 0)
    }

    fn decrement_spots(&self, activity_id: ActivityId) -> RepoResult<bool> {
        let changed = self.tx.execute(
            "UPDATE activities SET spots = spots - 1 WHERE id = ?1 AND spots > 0;",
            [activity_id],
        )?;
        Ok(changed > 0)
    }

    fn increment_spots(&self, activity_id: ActivityId) -> RepoResult<()> {
        let changed = self.tx.execute(
            "UPDATE activities SET spots = spots + 1 WHERE id = ?1;",
            [activity_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(activity_id));
        }
        Ok(())
    }

    fn commit(self) -> RepoResult<()> {
        self.tx.commit()?;
        Ok(())
    }
}

fn parse_user_id(value: &str) -> RepoResult<UserId> {
    Uuid::parse_str(value).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{value}` in registrations.user_id"
        ))
    })
}
