//! Registration core for the SCTI event platform.
//! This crate is the single source of truth for seat-capacity and
//! schedule-conflict invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::Config;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{Activity, ActivityId, ActivityValidationError, NewActivity};
pub use model::registration::{Registration, RegistrationState, UserId};
pub use repo::activity_repo::{ActivityRepository, RepoError, RepoResult, SqliteActivityRepository};
pub use repo::registration_repo::{
    ActivitySlot, RegistrationStore, RegistrationUnit, SqliteRegistrationStore,
    SqliteRegistrationUnit,
};
pub use service::activity_service::ActivityService;
pub use service::registration_service::{
    RegistrationError, RegistrationResult, RegistrationService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
