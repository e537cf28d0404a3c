//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from the registration engine and the
//!   query facade.
//!
//! # Invariants
//! - Activity writes must pass `NewActivity::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Registration mutations only happen inside a `RegistrationUnit`.

pub mod activity_repo;
pub mod registration_repo;
