//! Core domain models for lockfresh
//!
//! This module contains the fundamental types used throughout the application:
//! - Locked dependency structures and name normalization
//! - Manifest version constraints
//! - Registry lookup results and per-dependency check outcomes
//! - The aggregated check report

mod constraint;
mod dependency;
mod outcome;
mod report;

pub use constraint::Constraint;
pub use dependency::{normalize_name, DependencySpec, PackageSource};
pub use outcome::{CheckOutcome, CheckStatus, FailureReason, RegistryLookupResult, SkipReason};
pub use report::CheckReport;
