//! Derived-metric calculations.
//!
//! This module turns a raw entry into the financial indicators of the active
//! formula profile, and provides the display rounding shared by renderers.

pub mod common;
pub mod metrics;

pub use metrics::{MetricsCalculator, MetricsError};
