//! Core use-case services.
//!
//! # Responsibility
//! - Enforce registration business rules on top of repository primitives.
//! - Provide the read-only activity facade callers list and fetch through.
//! - Keep callers (CLI, HTTP boundary) decoupled from storage details.

pub mod activity_service;
pub mod registration_service;
