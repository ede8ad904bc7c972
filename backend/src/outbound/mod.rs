//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: process-local repositories for development and tests.
//! - **password**: Argon2 password hashing.
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business logic.

pub mod memory;
pub mod password;
pub mod persistence;
