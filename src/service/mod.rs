//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by issue-triage:
//! - Issue tracker services (e.g., GitHub)
//! - Comment template rendering
//!
//! The tracker defines both a generic trait and a concrete implementation,
//! allowing for extensibility and easy testing.

pub mod render;
pub mod tracker;
