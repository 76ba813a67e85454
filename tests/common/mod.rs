//! Common test utilities and helpers
//!
//! This module provides shared utilities for the integration tests:
//! - In-memory database fixtures
//! - Authentication helpers
//! - A router harness for sending JSON requests
//! - Custom assertion macros

#![allow(dead_code)]

pub mod app;
pub mod assertions;
pub mod auth_helpers;
pub mod database;

pub use app::*;
pub use auth_helpers::*;
pub use database::*;
