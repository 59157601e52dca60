//! Utility modules for the nbshare application.
//!
//! This module contains common utility functions and helpers that are used
//! throughout the application.
//!
//! # Available Utilities
//!
//! - [`datetime`] - Human-readable relative times and timestamp formatting
//! - [`files`] - Local file naming and notebook loading helpers

pub mod datetime;
pub mod files;
