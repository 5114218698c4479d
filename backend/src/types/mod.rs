//! Strongly typed primitives shared across the crate.

pub mod half_days;
pub mod id;

pub use half_days::HalfDays;
pub use id::*;
