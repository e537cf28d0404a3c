//! Registration domain model.
//!
//! # Invariants
//! - A `(user_id, activity_id)` pair is registered at most once.
//! - A user holds at most one registration per event day.

use crate::model::activity::ActivityId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable external user identifier.
pub type UserId = Uuid;

/// Link between a user and an activity they are signed up for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub user_id: UserId,
    pub activity_id: ActivityId,
    /// Unix epoch milliseconds, assigned by storage.
    pub created_at: i64,
}

/// Per-(user, activity) registration state.
///
/// `Unregistered -> Registered` only through signup, and
/// `Registered -> Unregistered` only through unregister.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationState {
    #[default]
    Unregistered,
    Registered,
}

impl RegistrationState {
    pub fn from_exists(exists: bool) -> Self {
        if exists {
            Self::Registered
        } else {
            Self::Unregistered
        }
    }

    pub fn is_registered(self) -> bool {
        self == Self::Registered
    }
}
