//! Activity query facade.
//!
//! # Responsibility
//! - Provide list/get/create entry points for activity data.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::activity::{Activity, ActivityId, NewActivity};
use crate::model::registration::UserId;
use crate::repo::activity_repo::{ActivityRepository, RepoResult};
use log::{info, warn};

/// Read-side service over activity storage.
pub struct ActivityService<R: ActivityRepository> {
    repo: R,
}

impl<R: ActivityRepository> ActivityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every activity in stable id order.
    pub fn list_activities(&self) -> RepoResult<Vec<Activity>> {
        self.repo.get_all_activities()
    }

    /// Gets one activity; a missing id surfaces as `RepoError::NotFound`.
    pub fn get_activity_by_id(&self, id: ActivityId) -> RepoResult<Activity> {
        self.repo.get_activity(id)
    }

    /// Creates an activity administratively and returns its assigned id.
    pub fn create_activity(&self, activity: &NewActivity) -> RepoResult<ActivityId> {
        match self.repo.create_activity(activity) {
            Ok(id) => {
                info!(
                    "event=activity_create module=service status=ok activity_id={} day={} spots={}",
                    id, activity.day, activity.spots
                );
                Ok(id)
            }
            Err(err) => {
                warn!(
                    "event=activity_create module=service status=error error={}",
                    err
                );
                Err(err)
            }
        }
    }

    /// Lists a user's registered activities ordered by `day, time`.
    pub fn list_user_activities(&self, user_id: UserId) -> RepoResult<Vec<Activity>> {
        self.repo.get_user_activities(user_id)
    }
}
