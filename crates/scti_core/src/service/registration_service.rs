//! Registration engine.
//!
//! # Responsibility
//! - Sign users up for activities and withdraw them, one atomic unit per
//!   call.
//! - Translate repository outcomes into registration rule errors.
//!
//! # Invariants
//! - Signup checks run in a fixed order: already registered, activity
//!   exists, same-day conflict, seats left. The day-conflict query does not
//!   exclude the target activity, so the already-registered check must come
//!   first.
//! - Any failure drops the unit uncommitted; nothing is partially applied.
//! - The engine never retries. Rule violations are not transient and storage
//!   retry policy belongs to the caller.

use crate::model::activity::ActivityId;
use crate::model::registration::{Registration, RegistrationState, UserId};
use crate::repo::activity_repo::RepoError;
use crate::repo::registration_repo::{RegistrationStore, RegistrationUnit};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// Errors from signup/unregister.
#[derive(Debug)]
pub enum RegistrationError {
    /// The user already holds this registration.
    AlreadyRegistered {
        user_id: UserId,
        activity_id: ActivityId,
    },
    /// Target activity does not exist.
    ActivityNotFound(ActivityId),
    /// The user already has an activity on this day.
    DayConflict { user_id: UserId, day: i64 },
    /// The activity has no seats left.
    NoSpotsAvailable(ActivityId),
    /// The user is not registered for this activity.
    NotRegistered {
        user_id: UserId,
        activity_id: ActivityId,
    },
    /// Persistence-layer failure.
    Storage(RepoError),
}

impl RegistrationError {
    /// Returns `true` for user-facing business rule violations.
    pub fn is_rule_violation(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered { .. } => "already_registered",
            Self::ActivityNotFound(_) => "activity_not_found",
            Self::DayConflict { .. } => "day_conflict",
            Self::NoSpotsAvailable(_) => "no_spots_available",
            Self::NotRegistered { .. } => "not_registered",
            Self::Storage(_) => "storage_error",
        }
    }
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRegistered {
                user_id,
                activity_id,
            } => write!(
                f,
                "user {user_id} is already signed up for activity {activity_id}"
            ),
            Self::ActivityNotFound(id) => write!(f, "no activity found with id: {id}"),
            Self::DayConflict { user_id, day } => {
                write!(f, "user {user_id} already has an activity on day {day}")
            }
            Self::NoSpotsAvailable(id) => write!(f, "no spots available for activity {id}"),
            Self::NotRegistered {
                user_id,
                activity_id,
            } => write!(
                f,
                "user {user_id} is not registered for activity {activity_id}"
            ),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RegistrationError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(activity_id) => Self::ActivityNotFound(activity_id),
            other => Self::Storage(other),
        }
    }
}

/// Registration engine over an injected store.
pub struct RegistrationService<S: RegistrationStore> {
    store: S,
}

impl<S: RegistrationStore> RegistrationService<S> {
    /// Creates an engine using the provided store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Signs `user_id` up for `activity_id`.
    ///
    /// On success the registration row exists and the activity has one seat
    /// fewer, both committed together.
    ///
    /// # Errors
    /// - `AlreadyRegistered` when the pair already exists.
    /// - `ActivityNotFound` when the activity does not exist.
    /// - `DayConflict` when the user holds another activity on the same day.
    /// - `NoSpotsAvailable` when no seats are left.
    /// - `Storage` on any persistence failure.
    pub fn sign_up(&mut self, user_id: UserId, activity_id: ActivityId) -> RegistrationResult<()> {
        let started_at = Instant::now();
        let result = self.try_sign_up(user_id, activity_id);
        log_outcome("signup", user_id, activity_id, started_at, &result);
        result
    }

    /// Withdraws `user_id` from `activity_id` and gives the seat back.
    ///
    /// # Errors
    /// - `NotRegistered` when the pair does not exist.
    /// - `Storage` on any persistence failure.
    pub fn unregister(
        &mut self,
        user_id: UserId,
        activity_id: ActivityId,
    ) -> RegistrationResult<()> {
        let started_at = Instant::now();
        let result = self.try_unregister(user_id, activity_id);
        log_outcome("unregister", user_id, activity_id, started_at, &result);
        result
    }

    /// Returns the current state of the `(user, activity)` pair.
    pub fn registration_state(
        &self,
        user_id: UserId,
        activity_id: ActivityId,
    ) -> RegistrationResult<RegistrationState> {
        let found = self.store.find_registration(user_id, activity_id)?;
        Ok(RegistrationState::from_exists(found.is_some()))
    }

    /// Loads the registration record for the pair, if any.
    pub fn registration(
        &self,
        user_id: UserId,
        activity_id: ActivityId,
    ) -> RegistrationResult<Option<Registration>> {
        Ok(self.store.find_registration(user_id, activity_id)?)
    }

    fn try_sign_up(&mut self, user_id: UserId, activity_id: ActivityId) -> RegistrationResult<()> {
        let unit = self.store.begin()?;

        if unit.registration_exists(user_id, activity_id)? {
            return Err(RegistrationError::AlreadyRegistered {
                user_id,
                activity_id,
            });
        }

        let slot = unit
            .activity_slot(activity_id)?
            .ok_or(RegistrationError::ActivityNotFound(activity_id))?;

        if unit.count_registrations_on_day(user_id, slot.day)? > 0 {
            return Err(RegistrationError::DayConflict {
                user_id,
                day: slot.day,
            });
        }

        if slot.spots == 0 {
            return Err(RegistrationError::NoSpotsAvailable(activity_id));
        }

        unit.insert_registration(user_id, activity_id)?;
        if !unit.decrement_spots(activity_id)? {
            return Err(RegistrationError::NoSpotsAvailable(activity_id));
        }

        unit.commit()?;
        Ok(())
    }

    fn try_unregister(
        &mut self,
        user_id: UserId,
        activity_id: ActivityId,
    ) -> RegistrationResult<()> {
        let unit = self.store.begin()?;

        if !unit.registration_exists(user_id, activity_id)? {
            return Err(RegistrationError::NotRegistered {
                user_id,
                activity_id,
            });
        }

        if !unit.delete_registration(user_id, activity_id)? {
            return Err(RegistrationError::NotRegistered {
                user_id,
                activity_id,
            });
        }
        unit.increment_spots(activity_id)?;

        unit.commit()?;
        Ok(())
    }
}

fn log_outcome(
    event: &str,
    user_id: UserId,
    activity_id: ActivityId,
    started_at: Instant,
    result: &RegistrationResult<()>,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(()) => info!(
            "event={} module=registration status=ok user_id={} activity_id={} duration_ms={}",
            event, user_id, activity_id, duration_ms
        ),
        Err(err) if err.is_rule_violation() => info!(
            "event={} module=registration status=rejected user_id={} activity_id={} duration_ms={} reason={}",
            event,
            user_id,
            activity_id,
            duration_ms,
            err.code()
        ),
        Err(err) => error!(
            "event={} module=registration status=error user_id={} activity_id={} duration_ms={} error_code={} error={}",
            event,
            user_id,
            activity_id,
            duration_ms,
            err.code(),
            err
        ),
    }
}
