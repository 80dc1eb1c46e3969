//! Error types and error handling for the analyzer.
//!
//! This module defines the error types raised while checking a program.
//! It includes:
//!
//! - Error structures with optional source position information
//! - One variant per kind of semantic violation
//! - Error names and suggestion tips used by diagnostics rendering

pub mod errors;
