//! nbshare - A terminal client for publishing and sharing notebooks
//!
//! This library publishes local notebooks to a sharing service, manages who
//! they are shared with, and keeps the "shared by me" and "shared with me"
//! lists fresh by polling. It includes a rich interactive UI built with
//! Ratatui.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`backend`] - Sharing service client and its error type
//! * [`config`] - Application configuration management
//! * [`sharing`] - Publish, collaboration and sharing settings operations
//! * [`sync`] - Polling refresh of the shared notebook lists
//! * [`ui`] - Terminal user interface components
//! * [`utils`] - Utility functions and helpers

/// Sharing service abstraction and its HTTP client
pub mod backend;

/// Terminal clipboard used by the copy-link actions
pub mod clipboard;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// Shared records, collaborators and request payloads
pub mod models;

/// Read-only preview of a shared notebook
pub mod preview;

/// Sharing operations wrapped in progress notifications
pub mod sharing;

/// Polling refresh of the shared notebook lists
pub mod sync;

/// Terminal user interface components and rendering
pub mod ui;

/// Utility functions for date/time handling and other helpers
pub mod utils;
