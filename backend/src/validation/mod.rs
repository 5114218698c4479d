//! Validation rules for holiday payloads.
//!
//! Payload structs derive `validator::Validate` and reference these rules
//! through `custom(function = ...)`.

pub mod rules;

pub use validator::Validate;
