//! Core components, types, and utilities for issue-triage.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Built-in comment templates.
//! - Common types and result handling.

pub mod config;
pub mod templates;
pub mod types;
