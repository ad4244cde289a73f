//! Common test utilities
//!
//! Shared fixtures for database-backed integration tests. These tests
//! need a local PostgreSQL and are marked `#[ignore]`; run them with
//! `cargo test -- --ignored` after pointing DATABASE_URL at a throwaway
//! database.

pub mod database;

pub use database::*;
