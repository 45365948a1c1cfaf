//! Restaurant Ratings CLI Library
//!
//! This module exposes the search, storage and statistics modules for use in
//! the binary and in integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod db;
pub mod search;
pub mod stats;
pub mod ui;
