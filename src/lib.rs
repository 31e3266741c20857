//! resonanze: client for the voice-health dashboard statistics API.
//!
//! The [`dashboard`] module is the core: it fetches the per-user statistics
//! payload and derives the values the dashboard renders. Everything else is
//! plumbing around it (configuration, auth context, activity log) or a
//! presentation layer (CLI, local web page).

pub mod analytics;
pub mod auth;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod web;
