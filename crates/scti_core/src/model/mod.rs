//! Domain model for activities and registrations.
//!
//! # Responsibility
//! - Define canonical data structures used by the registration engine and
//!   the query facade.
//! - Keep these types free of storage concerns; row mapping lives in `repo`.
//!
//! # Invariants
//! - Every activity is identified by a store-assigned `ActivityId`.
//! - Every user is identified by a stable external `UserId`.

pub mod activity;
pub mod registration;
